#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Serpent Defence.

mod enemies;
mod grid;
mod projectiles;
mod registry;
mod towers;

use serpent_defence_core::{
    CellCoord, CellKind, Command, CommandError, ConfigError, EnemyId, EnemyKind, Event,
    GameStatus, Path, ProjectileId, SessionConfig, TowerId, TowerKind, WavePhase, WorldPoint,
    WorldVector, KILL_REWARD,
};
use serpent_defence_system_progression as progression;
use tracing::{debug, info};

use enemies::EnemyState;
use grid::Grid;
use projectiles::ProjectileState;
use registry::Registry;
use towers::TowerState;

/// Represents the authoritative Serpent Defence world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    path: Path,
    towers: Registry<TowerId, TowerState>,
    enemies: Registry<EnemyId, EnemyState>,
    projectiles: Registry<ProjectileId, ProjectileState>,
    gold: u32,
    lives: u32,
    status: GameStatus,
    wave: WaveState,
}

#[derive(Clone, Copy, Debug)]
struct WaveState {
    wave: u32,
    phase: WavePhase,
    break_remaining: f32,
    pending_spawns: u32,
}

impl World {
    /// Creates a world around `path`, using the economy and timing parameters of `config`.
    pub fn new(path: Path, config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.path.grid_size, &path)?;
        Ok(Self {
            grid,
            path,
            towers: Registry::new(),
            enemies: Registry::new(),
            projectiles: Registry::new(),
            gold: config.starting_gold,
            lives: config.starting_lives,
            status: GameStatus::Running,
            wave: WaveState {
                wave: 0,
                phase: WavePhase::Break,
                break_remaining: config.first_break_seconds,
                pending_spawns: 0,
            },
        })
    }

    fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    fn debit(&mut self, cost: u32) -> Result<(), CommandError> {
        if self.gold < cost {
            return Err(CommandError::InsufficientFunds {
                required: cost,
                available: self.gold,
            });
        }
        self.gold -= cost;
        Ok(())
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord) -> Result<TowerId, CommandError> {
        if !self.is_running() {
            return Err(CommandError::SessionOver);
        }
        if self.grid.kind(cell) != Some(CellKind::Buildable) {
            return Err(CommandError::CellNotBuildable);
        }
        if self.grid.occupant(cell).is_some() {
            return Err(CommandError::CellOccupied);
        }
        self.debit(kind.cost())?;

        let tower = self
            .towers
            .insert_with(|id| TowerState::placed(id, kind, cell));
        self.grid.occupy(tower, cell);
        Ok(tower)
    }

    fn upgrade_tower(&mut self, tower: TowerId) -> Result<Event, CommandError> {
        if !self.is_running() {
            return Err(CommandError::SessionOver);
        }
        let (kind, progress) = self
            .towers
            .get(tower)
            .map(|state| (state.kind, state.progress))
            .ok_or(CommandError::TowerNotFound)?;
        let outcome =
            progression::add_sublevel(kind, progress).ok_or(CommandError::TowerAtMaxLevel)?;
        let cost = kind.upgrade_cost();
        self.debit(cost)?;

        let state = self
            .towers
            .get_mut(tower)
            .ok_or(CommandError::TowerNotFound)?;
        state.invested = state.invested.saturating_add(cost);
        state.progress = outcome.progress;
        if outcome.leveled_up {
            state.stats = progression::level_up(state.stats);
            state.cooldown_remaining = state.cooldown_remaining.min(state.stats.cooldown);
        }

        Ok(Event::TowerUpgraded {
            tower,
            level: outcome.progress.level,
            sublevel: outcome.progress.sublevel,
            leveled_up: outcome.leveled_up,
            cost,
        })
    }

    fn sell_tower(&mut self, tower: TowerId) -> Result<Event, CommandError> {
        if !self.is_running() {
            return Err(CommandError::SessionOver);
        }
        let state = self
            .towers
            .remove(tower)
            .ok_or(CommandError::TowerNotFound)?;
        let refund = progression::sell_refund(state.kind, state.invested);
        self.gold = self.gold.saturating_add(refund);
        self.grid.vacate(state.cell);
        Ok(Event::TowerSold {
            tower,
            cell: state.cell,
            refund,
        })
    }

    fn tick(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }
        let dt = non_negative(dt);

        if self.wave.phase == WavePhase::Break {
            self.wave.break_remaining = (self.wave.break_remaining - dt).max(0.0);
        }
        for tower in self.towers.iter_mut() {
            tower.cooldown_remaining = (tower.cooldown_remaining - dt).max(0.0);
        }

        out_events.push(Event::TimeAdvanced { dt });
    }

    fn begin_wave(&mut self, wave: u32, enemies: u32, out_events: &mut Vec<Event>) {
        if !self.is_running()
            || self.wave.phase != WavePhase::Break
            || wave != self.wave.wave.saturating_add(1)
        {
            debug!(wave, "ignoring out-of-phase wave start");
            return;
        }

        self.wave = WaveState {
            wave,
            phase: if enemies == 0 {
                WavePhase::Active
            } else {
                WavePhase::Spawning
            },
            break_remaining: 0.0,
            pending_spawns: enemies,
        };
        info!(wave, enemies, "wave started");
        out_events.push(Event::WaveStarted { wave, enemies });
        if enemies == 0 {
            out_events.push(Event::WaveSpawnsCompleted { wave });
        }
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        health: f32,
        speed: f32,
        out_events: &mut Vec<Event>,
    ) {
        if !self.is_running()
            || self.wave.phase != WavePhase::Spawning
            || self.wave.pending_spawns == 0
        {
            return;
        }

        let health = non_negative(health);
        let speed = non_negative(speed);
        let enemy = self
            .enemies
            .insert_with(|id| EnemyState::spawned(id, kind, health, speed));
        self.wave.pending_spawns -= 1;
        let wave = self.wave.wave;
        out_events.push(Event::EnemySpawned { enemy, kind, wave });

        if self.wave.pending_spawns == 0 {
            self.wave.phase = WavePhase::Active;
            debug!(wave, "wave finished spawning");
            out_events.push(Event::WaveSpawnsCompleted { wave });
        }
    }

    fn wave_cleared(&self) -> bool {
        self.is_running() && self.wave.phase == WavePhase::Active && self.enemies.is_empty()
    }

    fn begin_break(&mut self, duration: f32, out_events: &mut Vec<Event>) {
        if !self.wave_cleared() {
            return;
        }
        self.wave.phase = WavePhase::Break;
        self.wave.break_remaining = non_negative(duration);
        info!(wave = self.wave.wave, "wave cleared");
        out_events.push(Event::WaveCleared {
            wave: self.wave.wave,
        });
    }

    fn declare_victory(&mut self, out_events: &mut Vec<Event>) {
        if !self.wave_cleared() {
            return;
        }
        let wave = self.wave.wave;
        self.status = GameStatus::Victory;
        info!(wave, gold = self.gold, lives = self.lives, "campaign won");
        out_events.push(Event::WaveCleared { wave });
        out_events.push(Event::Victory { wave });
    }

    fn move_enemy(&mut self, enemy: EnemyId, progress: f32, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }
        let final_progress = self.path.final_progress();
        let Some(state) = self.enemies.get_mut(enemy) else {
            return;
        };
        let progress = non_negative(progress).max(state.progress);
        if progress < final_progress {
            state.progress = progress;
            return;
        }

        let _ = self.enemies.remove(enemy);
        self.lives = self.lives.saturating_sub(1);
        debug!(enemy = enemy.get(), lives = self.lives, "enemy reached base");
        out_events.push(Event::EnemyReachedBase {
            enemy,
            lives: self.lives,
        });

        if self.lives == 0 {
            self.status = GameStatus::GameOver;
            info!(wave = self.wave.wave, "game over");
            out_events.push(Event::GameOver {
                wave: self.wave.wave,
            });
        }
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }
        let Some(enemy) = self.enemies.get(target) else {
            return;
        };
        let enemy_position = self.path.position_at(enemy.progress);
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if !state.is_ready() {
            return;
        }

        let origin = state.cell.center();
        let velocity = origin
            .vector_to(enemy_position)
            .with_length(state.stats.projectile_speed);
        let damage = state.stats.damage;
        state.cooldown_remaining = state.stats.cooldown;

        let projectile = self.projectiles.insert_with(|id| ProjectileState {
            id,
            tower,
            target,
            position: origin,
            velocity,
            damage,
        });
        out_events.push(Event::ProjectileFired {
            projectile,
            tower,
            target,
        });
    }

    fn move_projectile(
        &mut self,
        projectile: ProjectileId,
        position: WorldPoint,
        velocity: WorldVector,
    ) {
        if !self.is_running() {
            return;
        }
        if let Some(state) = self.projectiles.get_mut(projectile) {
            state.position = position;
            state.velocity = velocity;
        }
    }

    fn resolve_impact(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }
        let Some(state) = self.projectiles.remove(projectile) else {
            return;
        };
        let Some(enemy) = self.enemies.get_mut(state.target) else {
            out_events.push(Event::ProjectileDiscarded { projectile });
            return;
        };

        if !enemy.take_damage(state.damage) {
            out_events.push(Event::EnemyDamaged {
                enemy: state.target,
                damage: state.damage,
                remaining: enemy.health,
            });
            return;
        }

        let _ = self.enemies.remove(state.target);
        self.gold = self.gold.saturating_add(KILL_REWARD);
        out_events.push(Event::EnemyKilled {
            enemy: state.target,
            tower: state.tower,
            reward: KILL_REWARD,
        });
    }

    fn discard_projectile(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) {
        if self.projectiles.remove(projectile).is_some() {
            out_events.push(Event::ProjectileDiscarded { projectile });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::PlaceTower { kind, cell } => match world.place_tower(kind, cell) {
            Ok(tower) => {
                debug!(tower = tower.get(), ?kind, ?cell, "tower placed");
                out_events.push(Event::TowerPlaced {
                    tower,
                    kind,
                    cell,
                    cost: kind.cost(),
                });
            }
            Err(reason) => {
                debug!(?kind, ?cell, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        },
        Command::UpgradeTower { tower } => match world.upgrade_tower(tower) {
            Ok(event) => out_events.push(event),
            Err(reason) => {
                debug!(tower = tower.get(), %reason, "tower upgrade rejected");
                out_events.push(Event::TowerUpgradeRejected { tower, reason });
            }
        },
        Command::SellTower { tower } => match world.sell_tower(tower) {
            Ok(event) => out_events.push(event),
            Err(reason) => {
                debug!(tower = tower.get(), %reason, "tower sale rejected");
                out_events.push(Event::TowerSaleRejected { tower, reason });
            }
        },
        Command::RequestWaveStart => {
            if world.is_running() && world.wave.phase == WavePhase::Break {
                world.wave.break_remaining = 0.0;
                out_events.push(Event::WaveStartRequested);
            }
        }
        Command::BeginWave { wave, enemies } => world.begin_wave(wave, enemies, out_events),
        Command::SpawnEnemy {
            kind,
            health,
            speed,
        } => world.spawn_enemy(kind, health, speed, out_events),
        Command::BeginBreak { duration } => world.begin_break(duration, out_events),
        Command::DeclareVictory => world.declare_victory(out_events),
        Command::MoveEnemy { enemy, progress } => world.move_enemy(enemy, progress, out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events)
        }
        Command::MoveProjectile {
            projectile,
            position,
            velocity,
        } => world.move_projectile(projectile, position, velocity),
        Command::ResolveImpact { projectile } => world.resolve_impact(projectile, out_events),
        Command::DiscardProjectile { projectile } => {
            world.discard_projectile(projectile, out_events)
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use serpent_defence_core::{
        CellCoord, CellKind, EnemyView, FrameSnapshot, GameStatus, Path, ProjectileView,
        TowerId, TowerView, WaveStatus,
    };

    use super::World;

    /// Provides read-only access to the enemy path.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Number of cells along each edge of the grid.
    #[must_use]
    pub fn grid_size(world: &World) -> u32 {
        world.grid.size()
    }

    /// Role of the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn cell_kind(world: &World, cell: CellCoord) -> Option<CellKind> {
        world.grid.kind(cell)
    }

    /// Tower occupying the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.grid.occupant(cell)
    }

    /// Gold currently available.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.gold
    }

    /// Lives currently left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Running, lost or won.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Snapshot of the wave state machine.
    #[must_use]
    pub fn wave_status(world: &World) -> WaveStatus {
        WaveStatus {
            wave: world.wave.wave,
            phase: world.wave.phase,
            break_remaining: world.wave.break_remaining,
            pending_spawns: world.wave.pending_spawns,
        }
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of every tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| enemy.snapshot(&world.path))
                .collect(),
        )
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures the complete frame handed to the presentation layer.
    #[must_use]
    pub fn snapshot(world: &World) -> FrameSnapshot {
        FrameSnapshot {
            status: world.status,
            gold: world.gold,
            lives: world.lives,
            wave: wave_status(world),
            towers: tower_view(world),
            enemies: enemy_view(world),
            projectiles: projectile_view(world),
        }
    }

    /// Checks the entity model invariants.
    ///
    /// Every tower sits alone on a buildable cell that records it as the
    /// occupant, and every enemy holds a health value within `0..=max_health`.
    #[must_use]
    pub fn invariants_hold(world: &World) -> bool {
        let towers_consistent = world.towers.iter().all(|tower| {
            world.grid.kind(tower.cell) == Some(CellKind::Buildable)
                && world.grid.occupant(tower.cell) == Some(tower.id)
        });
        let occupancy_consistent = world.grid.occupied_count() == world.towers.len();
        let health_consistent = world
            .enemies
            .iter()
            .all(|enemy| enemy.health >= 0.0 && enemy.health <= enemy.max_health);

        towers_consistent && occupancy_consistent && health_consistent
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
