//! Closed archetype catalogs for towers and enemies.

use serde::{Deserialize, Serialize};

/// Combat statistics carried by every tower.
///
/// The catalog hands out copies; level-ups transform the copy owned by the
/// tower and never the catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Targeting radius measured in cells.
    pub range: f32,
    /// Damage applied by a single projectile impact.
    pub damage: f32,
    /// Seconds the tower waits between shots.
    pub cooldown: f32,
    /// Projectile speed measured in cells per second.
    pub projectile_speed: f32,
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Fast-firing tower with low damage per hit.
    Rapid,
    /// Slow tower with heavy hits and a short reach.
    Cannon,
    /// Long-range tower with medium damage.
    Sniper,
}

impl TowerKind {
    /// Every tower kind in catalog order.
    pub const ALL: [TowerKind; 3] = [TowerKind::Rapid, TowerKind::Cannon, TowerKind::Sniper];

    /// Gold debited when the tower is placed.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Rapid => 50,
            Self::Cannon => 120,
            Self::Sniper => 200,
        }
    }

    /// Gold debited by a single sublevel upgrade.
    #[must_use]
    pub const fn upgrade_cost(self) -> u32 {
        match self {
            Self::Rapid => 40,
            Self::Cannon => 80,
            Self::Sniper => 120,
        }
    }

    /// Level-one statistics for the tower kind.
    #[must_use]
    pub const fn base_stats(self) -> TowerStats {
        match self {
            Self::Rapid => TowerStats {
                range: 3.0,
                damage: 2.0,
                cooldown: 0.5,
                projectile_speed: 8.0,
            },
            Self::Cannon => TowerStats {
                range: 2.5,
                damage: 10.0,
                cooldown: 2.0,
                projectile_speed: 5.0,
            },
            Self::Sniper => TowerStats {
                range: 6.0,
                damage: 5.0,
                cooldown: 1.2,
                projectile_speed: 12.0,
            },
        }
    }
}

/// Types of enemies that walk the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline enemy.
    Standard,
    /// Fast enemy that breaks easily.
    Swift,
    /// Slow enemy with a large health pool.
    Brute,
}

impl EnemyKind {
    /// Multiplier applied to the wave's base health.
    #[must_use]
    pub const fn health_factor(self) -> f32 {
        match self {
            Self::Standard => 1.0,
            Self::Swift => 0.6,
            Self::Brute => 2.5,
        }
    }

    /// Multiplier applied to the wave's movement speed.
    #[must_use]
    pub const fn speed_factor(self) -> f32 {
        match self {
            Self::Standard => 1.0,
            Self::Swift => 1.6,
            Self::Brute => 0.6,
        }
    }
}
