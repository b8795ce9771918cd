#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Serpent Defence session: the simulation entry point handed to hosts.
//!
//! A [`Session`] owns the authoritative world together with every system. The
//! host feeds it player intents between frames and calls [`Session::advance`]
//! once per frame. Each tick runs the wave scheduler, then enemy movement,
//! then tower targeting and firing, then projectile flight, in that order.

use serde::Serialize;
use serpent_defence_core::{
    CellCoord, CellKind, Command, CommandError, ConfigError, Event, FrameSnapshot, GameStatus,
    Path, SessionConfig, TowerId, TowerKind, TowerTarget,
};
use serpent_defence_system_movement::Movement;
use serpent_defence_system_path_generation::generate_path;
use serpent_defence_system_projectiles::Projectiles;
use serpent_defence_system_tower_combat::TowerCombat;
use serpent_defence_system_tower_targeting::TowerTargeting;
use serpent_defence_system_waves::WaveScheduler;
use serpent_defence_world::{self as world, query, World};
use tracing::{info, trace};

/// State handed back to the host after every call to [`Session::advance`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    /// Read-only picture of the session after the tick.
    pub snapshot: FrameSnapshot,
    /// Events raised since the previous simulated tick, including those of
    /// player commands issued in between.
    pub events: Vec<Event>,
}

/// Outcome of a successful upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct UpgradeReceipt {
    /// Level after the upgrade.
    pub level: u32,
    /// Sublevel after the upgrade.
    pub sublevel: u32,
    /// Whether the upgrade completed a level.
    pub leveled_up: bool,
    /// Gold debited for the upgrade.
    pub cost: u32,
}

/// A single game from the first break until the host drops it.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    world: World,
    scheduler: WaveScheduler,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    projectiles: Projectiles,
    targets: Vec<TowerTarget>,
    pending_events: Vec<Event>,
}

impl Session {
    /// Starts a session on a path generated from the configuration's seed.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let path = generate_path(&config.path, config.seed)?;
        Self::with_path(config, path)
    }

    /// Starts a session on a caller-provided path.
    ///
    /// Every path cell must lie inside the configured grid.
    pub fn with_path(config: SessionConfig, path: Path) -> Result<Self, ConfigError> {
        let world = World::new(path, &config)?;
        info!(
            seed = config.seed,
            path_length = query::path(&world).len(),
            gold = config.starting_gold,
            lives = config.starting_lives,
            "session started"
        );
        Ok(Self {
            scheduler: WaveScheduler::new(&config),
            config,
            world,
            movement: Movement::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            projectiles: Projectiles::new(),
            targets: Vec::new(),
            pending_events: Vec::new(),
        })
    }

    /// Places a tower of `kind` on `cell`.
    pub fn place_tower(
        &mut self,
        cell: CellCoord,
        kind: TowerKind,
    ) -> Result<TowerId, CommandError> {
        self.execute(Command::PlaceTower { kind, cell })
            .find_map(|event| match event {
                Event::TowerPlaced { tower, .. } => Some(Ok(tower)),
                Event::TowerPlacementRejected { reason, .. } => Some(Err(reason)),
                _ => None,
            })
            .unwrap_or(Err(CommandError::SessionOver))
    }

    /// Buys one sublevel for `tower`.
    pub fn upgrade_tower(&mut self, tower: TowerId) -> Result<UpgradeReceipt, CommandError> {
        self.execute(Command::UpgradeTower { tower })
            .find_map(|event| match event {
                Event::TowerUpgraded {
                    level,
                    sublevel,
                    leveled_up,
                    cost,
                    ..
                } => Some(Ok(UpgradeReceipt {
                    level,
                    sublevel,
                    leveled_up,
                    cost,
                })),
                Event::TowerUpgradeRejected { reason, .. } => Some(Err(reason)),
                _ => None,
            })
            .unwrap_or(Err(CommandError::SessionOver))
    }

    /// Sells `tower`, returning the refunded gold.
    pub fn sell_tower(&mut self, tower: TowerId) -> Result<u32, CommandError> {
        self.execute(Command::SellTower { tower })
            .find_map(|event| match event {
                Event::TowerSold { refund, .. } => Some(Ok(refund)),
                Event::TowerSaleRejected { reason, .. } => Some(Err(reason)),
                _ => None,
            })
            .unwrap_or(Err(CommandError::SessionOver))
    }

    /// Ends the current break early. Returns false outside a break.
    pub fn request_wave_start(&mut self) -> bool {
        self.execute(Command::RequestWaveStart)
            .any(|event| event == Event::WaveStartRequested)
    }

    /// Advances the simulation by `elapsed_seconds`.
    ///
    /// Non-positive or non-finite durations and sessions that already ended
    /// perform no simulation work and return the current snapshot. A session
    /// that already ended still reports the rejections of commands issued
    /// since the previous call.
    pub fn advance(&mut self, elapsed_seconds: f32) -> Frame {
        if !self.is_running() {
            return Frame {
                snapshot: query::snapshot(&self.world),
                events: std::mem::take(&mut self.pending_events),
            };
        }
        if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
            return Frame {
                snapshot: query::snapshot(&self.world),
                events: Vec::new(),
            };
        }

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::Tick {
                dt: elapsed_seconds,
            },
            &mut events,
        );
        self.simulate(&mut events);

        let snapshot = query::snapshot(&self.world);
        trace!(
            dt = elapsed_seconds,
            events = events.len(),
            enemies = snapshot.enemies.len(),
            projectiles = snapshot.projectiles.len(),
            gold = snapshot.gold,
            lives = snapshot.lives,
            "tick"
        );

        let mut reported = std::mem::take(&mut self.pending_events);
        reported.append(&mut events);
        Frame {
            snapshot,
            events: reported,
        }
    }

    /// Captures the current frame without simulating.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        query::snapshot(&self.world)
    }

    /// Path walked by enemies.
    #[must_use]
    pub fn path(&self) -> &Path {
        query::path(&self.world)
    }

    /// Role of `cell`, or `None` outside the grid.
    #[must_use]
    pub fn cell_kind(&self, cell: CellCoord) -> Option<CellKind> {
        query::cell_kind(&self.world, cell)
    }

    /// Tower standing on `cell`, if any.
    #[must_use]
    pub fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        query::tower_at(&self.world, cell)
    }

    /// Number of cells along each edge of the grid.
    #[must_use]
    pub fn grid_size(&self) -> u32 {
        query::grid_size(&self.world)
    }

    /// Configuration the session was started with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Reports whether the entity model invariants hold.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        query::invariants_hold(&self.world)
    }

    fn execute(&mut self, command: Command) -> std::vec::IntoIter<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.pending_events.extend_from_slice(&events);
        events.into_iter()
    }

    fn simulate(&mut self, events: &mut Vec<Event>) {
        let mut commands = Vec::new();

        self.scheduler.handle(
            events,
            query::wave_status(&self.world),
            query::enemy_count(&self.world),
            &mut commands,
        );
        self.flush(&mut commands, events);
        if !self.is_running() {
            return;
        }

        self.movement
            .handle(events, &query::enemy_view(&self.world), &mut commands);
        self.flush(&mut commands, events);
        if !self.is_running() {
            return;
        }

        let towers = query::tower_view(&self.world);
        self.targeting.handle(
            &towers,
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        self.combat.handle(&towers, &self.targets, &mut commands);
        self.flush(&mut commands, events);

        self.projectiles.handle(
            events,
            &query::projectile_view(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        self.flush(&mut commands, events);
    }

    fn flush(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn is_running(&self) -> bool {
        query::status(&self.world) == GameStatus::Running
    }
}
