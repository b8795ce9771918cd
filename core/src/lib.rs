#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Serpent Defence engine.
//!
//! This crate defines the message surface that connects the session, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values. Systems query
//! immutable views and respond exclusively with new command batches.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

mod catalog;
mod config;
mod error;

pub use catalog::{EnemyKind, TowerKind, TowerStats};
pub use config::{PathConfig, SessionConfig, WaveConfig, WaveProgression};
pub use error::{CommandError, ConfigError};

/// Gold credited for every enemy destroyed by a projectile.
pub const KILL_REWARD: u32 = 10;

/// Distance in cells under which a projectile counts as having hit its target.
pub const HIT_RADIUS: f32 = 0.25;

/// Highest level a tower can reach.
pub const MAX_TOWER_LEVEL: u32 = 10;

/// Movement speed of a standard enemy on the first wave, in cells per second.
pub const BASE_ENEMY_SPEED: f32 = 1.2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided number of seconds.
    Tick {
        /// Seconds of simulated time that elapsed since the previous tick.
        dt: f32,
    },
    /// Requests placement of a tower on a buildable cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell the tower should occupy.
        cell: CellCoord,
    },
    /// Requests a single sublevel upgrade of an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests the sale of an existing tower.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Asks the world to end the current break immediately.
    RequestWaveStart,
    /// Opens the spawning phase of a new wave.
    BeginWave {
        /// One-based index of the wave being started.
        wave: u32,
        /// Number of enemies the wave will spawn.
        enemies: u32,
    },
    /// Creates a new enemy at the start of the path.
    SpawnEnemy {
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Health granted to the enemy.
        health: f32,
        /// Movement speed in cells per second.
        speed: f32,
    },
    /// Closes a cleared wave and opens a break of the given length.
    BeginBreak {
        /// Seconds until the next wave auto-starts.
        duration: f32,
    },
    /// Ends the session in victory after the last campaign wave is cleared.
    DeclareVictory,
    /// Moves an enemy along the path to a new progress value.
    MoveEnemy {
        /// Identifier of the enemy being moved.
        enemy: EnemyId,
        /// Progress along the path, in path indices.
        progress: f32,
    },
    /// Requests that a tower fire a projectile at an enemy.
    FireProjectile {
        /// Tower firing the projectile.
        tower: TowerId,
        /// Enemy the projectile homes toward.
        target: EnemyId,
    },
    /// Updates a projectile's kinematic state.
    MoveProjectile {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// New position in world units.
        position: WorldPoint,
        /// New velocity in world units per second.
        velocity: WorldVector,
    },
    /// Applies a projectile's damage to its target and removes the projectile.
    ResolveImpact {
        /// Identifier of the projectile that reached its target.
        projectile: ProjectileId,
    },
    /// Removes a projectile whose target disappeared.
    DiscardProjectile {
        /// Identifier of the projectile to remove.
        projectile: ProjectileId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Seconds of simulated time that elapsed in the tick.
        dt: f32,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Gold debited for the placement.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: CommandError,
    },
    /// Confirms that a tower gained a sublevel.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level after the upgrade.
        level: u32,
        /// Sublevel progress after the upgrade.
        sublevel: u32,
        /// Indicates whether the upgrade completed a level.
        leveled_up: bool,
        /// Gold debited for the upgrade.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier provided in the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: CommandError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Cell freed by the sale.
        cell: CellCoord,
        /// Gold credited by the sale.
        refund: u32,
    },
    /// Reports that a sale request was rejected.
    TowerSaleRejected {
        /// Identifier provided in the request.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: CommandError,
    },
    /// Confirms that the current break was cut short.
    WaveStartRequested,
    /// Announces the start of a wave's spawning phase.
    WaveStarted {
        /// One-based index of the wave.
        wave: u32,
        /// Number of enemies that will spawn.
        enemies: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Wave the enemy belongs to.
        wave: u32,
    },
    /// Announces that a wave has no more enemies to spawn.
    WaveSpawnsCompleted {
        /// One-based index of the wave.
        wave: u32,
    },
    /// Announces that a wave's last enemy is gone and a break began.
    WaveCleared {
        /// One-based index of the cleared wave.
        wave: u32,
    },
    /// Reports that an enemy walked into the base.
    EnemyReachedBase {
        /// Identifier of the retired enemy.
        enemy: EnemyId,
        /// Lives remaining after the loss.
        lives: u32,
    },
    /// Reports that the player ran out of lives.
    GameOver {
        /// Wave during which the session ended.
        wave: u32,
    },
    /// Reports that the final campaign wave was cleared.
    Victory {
        /// Last wave of the campaign.
        wave: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile homes toward.
        target: EnemyId,
    },
    /// Reports that a projectile lost its target and vanished.
    ProjectileDiscarded {
        /// Identifier of the discarded projectile.
        projectile: ProjectileId,
    },
    /// Reports that an enemy survived an impact.
    EnemyDamaged {
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
        /// Damage applied by the impact.
        damage: f32,
        /// Health left after the impact.
        remaining: f32,
    },
    /// Reports that an enemy was destroyed by an impact.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Tower whose projectile landed the final hit.
        tower: TowerId,
        /// Gold credited for the kill.
        reward: u32,
    },
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }

            /// Identifier allocated after this one.
            #[must_use]
            pub const fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }
    };
}

define_id!(
    /// Unique identifier assigned to a tower.
    TowerId
);
define_id!(
    /// Unique identifier assigned to an enemy. Allocation order equals insertion order.
    EnemyId
);
define_id!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Center of the cell in world units.
    #[must_use]
    pub fn center(self) -> WorldPoint {
        WorldPoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Continuous position measured in cell units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate; grows with the column index.
    pub x: f32,
    /// Vertical coordinate; grows with the row index.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        self.vector_to(other).length()
    }

    /// Squared Euclidean distance, for comparisons.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        self.vector_to(other).length_squared()
    }

    /// Displacement from this point to `other`.
    #[must_use]
    pub fn vector_to(self, other: WorldPoint) -> WorldVector {
        WorldVector::new(other.x - self.x, other.y - self.y)
    }

    /// Point reached by moving along `vector` scaled by `factor`.
    #[must_use]
    pub fn translated(self, vector: WorldVector, factor: f32) -> WorldPoint {
        WorldPoint::new(self.x + vector.x * factor, self.y + vector.y * factor)
    }

    /// Linear interpolation toward `other` by `fraction` in `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: WorldPoint, fraction: f32) -> WorldPoint {
        self.translated(self.vector_to(other), fraction)
    }
}

/// Displacement or velocity measured in cell units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldVector {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl WorldVector {
    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared Euclidean length of the vector.
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Vector pointing the same way with the requested length.
    ///
    /// A zero-length vector stays zero.
    #[must_use]
    pub fn with_length(self, length: f32) -> WorldVector {
        let current = self.length();
        if current <= f32::EPSILON {
            return WorldVector::default();
        }
        let scale = length / current;
        WorldVector::new(self.x * scale, self.y * scale)
    }
}

/// Role of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Free cell that may host a tower.
    Buildable,
    /// Interior cell of the enemy path.
    Path,
    /// First cell of the path where enemies spawn.
    Start,
    /// Last cell of the path that enemies try to reach.
    Base,
}

/// Ordered route walked by enemies from start to base.
///
/// Consecutive cells are 4-adjacent and no cell appears twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Validates and wraps the provided cell sequence.
    pub fn new(cells: Vec<CellCoord>) -> Result<Self, ConfigError> {
        if cells.len() < 2 {
            return Err(ConfigError::invalid("path needs at least two cells"));
        }

        let mut seen = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !seen.insert(*cell) {
                return Err(ConfigError::invalid(format!(
                    "path revisits cell ({}, {})",
                    cell.column(),
                    cell.row()
                )));
            }
        }

        if let Some(pair) = cells.windows(2).find(|pair| !pair[0].is_adjacent(pair[1])) {
            return Err(ConfigError::invalid(format!(
                "path jumps from ({}, {}) to ({}, {})",
                pair[0].column(),
                pair[0].row(),
                pair[1].column(),
                pair[1].row()
            )));
        }

        Ok(Self { cells })
    }

    /// Cells of the path in walking order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a valid path holds at least two cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell where enemies enter.
    #[must_use]
    pub fn start(&self) -> CellCoord {
        self.cells[0]
    }

    /// Cell enemies try to reach.
    #[must_use]
    pub fn base(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }

    /// Progress value at which an enemy reaches the base.
    #[must_use]
    pub fn final_progress(&self) -> f32 {
        (self.cells.len() - 1) as f32
    }

    /// World position matching a progress value, clamped to the path.
    #[must_use]
    pub fn position_at(&self, progress: f32) -> WorldPoint {
        let clamped = progress.clamp(0.0, self.final_progress());
        let index = clamped.floor() as usize;
        let Some(next) = self.cells.get(index + 1) else {
            return self.base().center();
        };
        let fraction = clamped - index as f32;
        self.cells[index].center().lerp(next.center(), fraction)
    }
}

/// Phase of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// Idle period before the next wave starts.
    Break,
    /// Enemies of the current wave are still being spawned.
    Spawning,
    /// Every enemy of the wave spawned; waiting for the field to clear.
    Active,
}

/// Terminal and non-terminal session statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The session accepts commands and simulates ticks.
    Running,
    /// Lives ran out; ticks no longer simulate.
    GameOver,
    /// The final campaign wave was cleared; ticks no longer simulate.
    Victory,
}

/// Snapshot of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaveStatus {
    /// Index of the latest wave started; zero before the first wave.
    pub wave: u32,
    /// Current phase of the state machine.
    pub phase: WavePhase,
    /// Seconds left in the current break.
    pub break_remaining: f32,
    /// Enemies of the current wave that have not spawned yet.
    pub pending_spawns: u32,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Center of the tower in world units.
    pub position: WorldPoint,
    /// Current level, starting at one.
    pub level: u32,
    /// Sublevel progress toward the next level.
    pub sublevel: u32,
    /// Current combat statistics.
    pub stats: TowerStats,
    /// Seconds until the tower may fire again.
    pub cooldown_remaining: f32,
    /// Gold spent on placement and upgrades.
    pub invested: u32,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Position in world units.
    pub position: WorldPoint,
    /// Progress along the path, in path indices.
    pub progress: f32,
    /// Health left.
    pub health: f32,
    /// Health at spawn.
    pub max_health: f32,
    /// Movement speed in cells per second.
    pub speed: f32,
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Enemy the projectile homes toward.
    pub target: EnemyId,
    /// Position in world units.
    pub position: WorldPoint,
    /// Velocity in world units per second.
    pub velocity: WorldVector,
    /// Damage applied on impact.
    pub damage: f32,
}

macro_rules! define_view {
    ($(#[$meta:meta])* $view:ident, $snapshot:ident, $id:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Serialize)]
        pub struct $view {
            snapshots: Vec<$snapshot>,
        }

        impl $view {
            /// Creates a new view from the provided snapshots.
            #[must_use]
            pub fn from_snapshots(mut snapshots: Vec<$snapshot>) -> Self {
                snapshots.sort_by_key(|snapshot| snapshot.id);
                Self { snapshots }
            }

            /// Iterator over the captured snapshots in identifier order.
            pub fn iter(&self) -> impl Iterator<Item = &$snapshot> {
                self.snapshots.iter()
            }

            /// Looks up the snapshot for the provided identifier.
            #[must_use]
            pub fn get(&self, id: $id) -> Option<&$snapshot> {
                self.snapshots
                    .binary_search_by_key(&id, |snapshot| snapshot.id)
                    .ok()
                    .map(|index| &self.snapshots[index])
            }

            /// Number of captured snapshots.
            #[must_use]
            pub fn len(&self) -> usize {
                self.snapshots.len()
            }

            /// Reports whether the view holds no snapshots.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.snapshots.is_empty()
            }

            /// Consumes the view, yielding the underlying snapshots.
            #[must_use]
            pub fn into_vec(self) -> Vec<$snapshot> {
                self.snapshots
            }
        }
    };
}

define_view!(
    /// Read-only snapshot describing all towers.
    TowerView,
    TowerSnapshot,
    TowerId
);
define_view!(
    /// Read-only snapshot describing all live enemies in insertion order.
    EnemyView,
    EnemySnapshot,
    EnemyId
);
define_view!(
    /// Read-only snapshot describing all projectiles in flight.
    ProjectileView,
    ProjectileSnapshot,
    ProjectileId
);

/// Target assignment computed for a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Center of the tower in world units.
    pub tower_position: WorldPoint,
    /// Position of the enemy in world units.
    pub enemy_position: WorldPoint,
}

/// Complete read-only picture of a session handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Whether the session is still running.
    pub status: GameStatus,
    /// Gold available to the player.
    pub gold: u32,
    /// Lives left.
    pub lives: u32,
    /// Wave state machine snapshot.
    pub wave: WaveStatus,
    /// Every tower on the grid.
    pub towers: TowerView,
    /// Every live enemy.
    pub enemies: EnemyView,
    /// Every projectile in flight.
    pub projectiles: ProjectileView,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(coords: &[(u32, u32)]) -> Vec<CellCoord> {
        coords
            .iter()
            .map(|(column, row)| CellCoord::new(*column, *row))
            .collect()
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn path_rejects_revisited_cells() {
        let result = Path::new(cells(&[(0, 0), (1, 0), (1, 1), (0, 1), (0, 0)]));
        assert!(matches!(result, Err(ConfigError::InvalidConfiguration(_))));
    }

    #[test]
    fn path_rejects_diagonal_steps() {
        assert!(Path::new(cells(&[(0, 0), (1, 1)])).is_err());
    }

    #[test]
    fn path_rejects_single_cell() {
        assert!(Path::new(cells(&[(3, 3)])).is_err());
    }

    #[test]
    fn position_interpolates_between_cell_centers() {
        let path = Path::new(cells(&[(0, 0), (1, 0), (1, 1)])).expect("valid path");
        assert_eq!(path.position_at(0.0), WorldPoint::new(0.5, 0.5));
        assert_eq!(path.position_at(0.5), WorldPoint::new(1.0, 0.5));
        assert_eq!(path.position_at(1.5), WorldPoint::new(1.5, 1.0));
        assert_eq!(path.position_at(2.0), WorldPoint::new(1.5, 1.5));
        assert_eq!(path.position_at(9.0), WorldPoint::new(1.5, 1.5));
        assert_eq!(path.position_at(-1.0), WorldPoint::new(0.5, 0.5));
    }

    #[test]
    fn with_length_preserves_direction() {
        let vector = WorldVector::new(3.0, 4.0).with_length(10.0);
        assert!((vector.x - 6.0).abs() < 1e-5);
        assert!((vector.y - 8.0).abs() < 1e-5);
        assert_eq!(WorldVector::default().with_length(5.0), WorldVector::default());
    }

    #[test]
    fn enemy_view_lookup_uses_identifier_order() {
        let snapshot = |id: u32| EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Standard,
            position: WorldPoint::default(),
            progress: 0.0,
            health: 1.0,
            max_health: 1.0,
            speed: 1.0,
        };
        let view = EnemyView::from_snapshots(vec![snapshot(7), snapshot(2), snapshot(4)]);
        let order: Vec<u32> = view.iter().map(|enemy| enemy.id.get()).collect();
        assert_eq!(order, vec![2, 4, 7]);
        assert!(view.get(EnemyId::new(4)).is_some());
        assert!(view.get(EnemyId::new(5)).is_none());
    }
}
