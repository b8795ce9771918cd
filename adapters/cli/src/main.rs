#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line host that plays a Serpent Defence session.

mod autopilot;

use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serpent_defence_core::{CellCoord, CellKind, Event, FrameSnapshot, GameStatus, SessionConfig};
use serpent_defence_session::Session;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autopilot::Autopilot;

/// Command-line arguments accepted by the host.
#[derive(Debug, Parser)]
#[command(name = "serpent-defence")]
#[command(about = "Runs a headless Serpent Defence session with a scripted builder")]
struct Cli {
    /// JSON file holding session configuration; missing fields keep their defaults.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    /// Overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds per tick.
    #[arg(long, default_value_t = 0.1)]
    dt: f32,
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 6_000)]
    ticks: u32,
    /// Ticks between printed summaries.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    report_every: u32,
    /// Leaves the grid empty instead of running the auto-builder.
    #[arg(long)]
    idle: bool,
    /// Prints the final frame as JSON on stdout instead of the text report.
    #[arg(long)]
    json: bool,
    /// Log filter, such as `debug` or `serpent_defence_world=trace`. Defaults to `RUST_LOG`, then `info`.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());
    ensure!(
        cli.dt.is_finite() && cli.dt > 0.0,
        "--dt must be a positive number of seconds"
    );

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut session = Session::new(config).context("failed to start session")?;
    if !cli.json {
        print_grid(&session);
    }

    let mut autopilot = Autopilot::new(&session);
    let mut elapsed_ticks = 0;
    for tick in 1..=cli.ticks {
        if !cli.idle {
            autopilot.act(&mut session);
        }
        let frame = session.advance(cli.dt);
        elapsed_ticks = tick;

        if !cli.json {
            for event in &frame.events {
                report_event(event);
            }
            if tick % cli.report_every == 0 {
                print_summary(tick, cli.dt, &frame.snapshot);
            }
        }
        if frame.snapshot.status != GameStatus::Running {
            break;
        }
    }

    let snapshot = session.snapshot();
    info!(
        ticks = elapsed_ticks,
        status = ?snapshot.status,
        wave = snapshot.wave.wave,
        "session finished"
    );
    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&snapshot).context("failed to encode final frame")?;
        println!("{rendered}");
    } else {
        print_summary(elapsed_ticks, cli.dt, &snapshot);
    }
    Ok(())
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: SessionConfig = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

fn print_grid(session: &Session) {
    let size = session.grid_size();
    for row in 0..size {
        let line: String = (0..size)
            .map(|column| match session.cell_kind(CellCoord::new(column, row)) {
                Some(CellKind::Start) => 'S',
                Some(CellKind::Base) => 'B',
                Some(CellKind::Path) => '#',
                Some(CellKind::Buildable) | None => '.',
            })
            .collect();
        println!("{line}");
    }
    println!("path length: {}", session.path().len());
}

fn report_event(event: &Event) {
    match event {
        Event::WaveStarted { wave, enemies } => println!("wave {wave} started: {enemies} enemies"),
        Event::WaveCleared { wave } => println!("wave {wave} cleared"),
        Event::GameOver { wave } => println!("game over during wave {wave}"),
        Event::Victory { wave } => println!("victory after wave {wave}"),
        Event::TowerPlaced {
            kind, cell, cost, ..
        } => println!(
            "placed {kind:?} at ({}, {}) for {cost} gold",
            cell.column(),
            cell.row()
        ),
        _ => {}
    }
}

fn print_summary(tick: u32, dt: f32, snapshot: &FrameSnapshot) {
    println!(
        "[t={:>7.1}s] {:?} wave {} {:?} | gold {} | lives {} | towers {} | enemies {} | projectiles {}",
        tick as f32 * dt,
        snapshot.status,
        snapshot.wave.wave,
        snapshot.wave.phase,
        snapshot.gold,
        snapshot.lives,
        snapshot.towers.len(),
        snapshot.enemies.len(),
        snapshot.projectiles.len(),
    );
}
