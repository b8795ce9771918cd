#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure progression and economy rules: sublevel thresholds, level-up
//! transforms and sell refunds.

use serpent_defence_core::{TowerKind, TowerStats, MAX_TOWER_LEVEL};

/// Sublevels required to leave levels one through nine before archetype offsets.
const SUBLEVEL_TABLE: [u32; 9] = [3, 4, 5, 6, 7, 8, 9, 10, 12];

/// Range multiplier applied on every level-up.
pub const RANGE_GROWTH: f32 = 1.1;
/// Damage multiplier applied on every level-up.
pub const DAMAGE_GROWTH: f32 = 1.25;
/// Cooldown multiplier applied on every level-up.
pub const COOLDOWN_DECAY: f32 = 0.9;
/// Shortest cooldown a tower can reach through upgrades, in seconds.
pub const MIN_COOLDOWN: f32 = 0.15;

/// Share of the placement cost returned on sale.
const BASE_REFUND_RATIO: f64 = 0.5;
/// Share of the upgrade spending returned on sale.
const UPGRADE_REFUND_RATIO: f64 = 0.25;

/// Level and sublevel of a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerProgress {
    /// Current level, starting at one.
    pub level: u32,
    /// Sublevels accumulated within the current level.
    pub sublevel: u32,
}

impl TowerProgress {
    /// Progress of a freshly placed tower.
    #[must_use]
    pub const fn placed() -> Self {
        Self {
            level: 1,
            sublevel: 0,
        }
    }
}

/// Result of adding a single sublevel to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeOutcome {
    /// Progress after the upgrade.
    pub progress: TowerProgress,
    /// Indicates whether the upgrade completed a level.
    pub leveled_up: bool,
}

/// Sublevels a tower of `kind` needs to leave `level`.
///
/// Returns `None` at the level cap.
#[must_use]
pub fn sublevels_required(kind: TowerKind, level: u32) -> Option<u32> {
    if level == 0 || level >= MAX_TOWER_LEVEL {
        return None;
    }
    let index = usize::try_from(level - 1).ok()?;
    let base = SUBLEVEL_TABLE.get(index)?;
    let offset = match kind {
        TowerKind::Rapid => 0,
        TowerKind::Cannon => 1,
        TowerKind::Sniper => 2,
    };
    Some(base + offset)
}

/// Adds one sublevel, rolling over into the next level when the threshold is met.
///
/// Returns `None` when the tower already sits at the level cap.
#[must_use]
pub fn add_sublevel(kind: TowerKind, progress: TowerProgress) -> Option<UpgradeOutcome> {
    let required = sublevels_required(kind, progress.level)?;
    let sublevel = progress.sublevel.saturating_add(1);
    if sublevel >= required {
        return Some(UpgradeOutcome {
            progress: TowerProgress {
                level: progress.level + 1,
                sublevel: 0,
            },
            leveled_up: true,
        });
    }

    Some(UpgradeOutcome {
        progress: TowerProgress {
            level: progress.level,
            sublevel,
        },
        leveled_up: false,
    })
}

/// Applies the level-up buff to a tower's own statistics.
#[must_use]
pub fn level_up(stats: TowerStats) -> TowerStats {
    TowerStats {
        range: stats.range * RANGE_GROWTH,
        damage: stats.damage * DAMAGE_GROWTH,
        cooldown: (stats.cooldown * COOLDOWN_DECAY).max(MIN_COOLDOWN),
        projectile_speed: stats.projectile_speed,
    }
}

/// Gold returned when a tower with the given total investment is sold.
#[must_use]
pub fn sell_refund(kind: TowerKind, invested: u32) -> u32 {
    let cost = kind.cost();
    let upgrades = invested.saturating_sub(cost);
    let refund =
        f64::from(cost) * BASE_REFUND_RATIO + f64::from(upgrades) * UPGRADE_REFUND_RATIO;
    refund.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refund_matches_documented_example() {
        assert_eq!(TowerKind::Rapid.cost(), 50);
        assert_eq!(TowerKind::Rapid.upgrade_cost(), 40);
        assert_eq!(sell_refund(TowerKind::Rapid, 90), 35);
    }

    #[test]
    fn refund_without_upgrades_is_half_the_cost() {
        for kind in TowerKind::ALL {
            assert_eq!(sell_refund(kind, kind.cost()), kind.cost() / 2);
        }
    }

    #[test]
    fn thresholds_ascend_and_stop_at_cap() {
        for kind in TowerKind::ALL {
            let mut previous = 0;
            for level in 1..MAX_TOWER_LEVEL {
                let required = sublevels_required(kind, level).expect("below cap");
                assert!(required > previous);
                previous = required;
            }
            assert_eq!(sublevels_required(kind, MAX_TOWER_LEVEL), None);
        }
    }

    #[test]
    fn sniper_needs_more_sublevels_than_rapid() {
        assert!(
            sublevels_required(TowerKind::Sniper, 1) > sublevels_required(TowerKind::Rapid, 1)
        );
    }

    #[test]
    fn sublevels_roll_over_into_next_level() {
        let mut progress = TowerProgress::placed();
        for _ in 0..2 {
            let outcome = add_sublevel(TowerKind::Rapid, progress).expect("below cap");
            assert!(!outcome.leveled_up);
            progress = outcome.progress;
        }
        let outcome = add_sublevel(TowerKind::Rapid, progress).expect("below cap");
        assert!(outcome.leveled_up);
        assert_eq!(outcome.progress, TowerProgress { level: 2, sublevel: 0 });
    }

    #[test]
    fn capped_tower_cannot_gain_sublevels() {
        let progress = TowerProgress {
            level: MAX_TOWER_LEVEL,
            sublevel: 0,
        };
        assert_eq!(add_sublevel(TowerKind::Cannon, progress), None);
    }

    #[test]
    fn level_up_buffs_a_copy_and_floors_cooldown() {
        let base = TowerKind::Rapid.base_stats();
        let buffed = level_up(base);
        assert!(buffed.range > base.range);
        assert!(buffed.damage > base.damage);
        assert!(buffed.cooldown < base.cooldown);
        assert_eq!(buffed.projectile_speed, base.projectile_speed);
        assert_eq!(TowerKind::Rapid.base_stats(), base);

        let mut stats = base;
        for _ in 0..50 {
            stats = level_up(stats);
        }
        assert!((stats.cooldown - MIN_COOLDOWN).abs() < f32::EPSILON);
    }
}
