#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks the nearest enemy in range for every tower.

use serpent_defence_core::{EnemyId, EnemyView, TowerId, TowerTarget, TowerView, WorldPoint};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided snapshots.
    ///
    /// The output buffer is cleared first. A tower receives a target when at
    /// least one enemy lies within its range, boundary included. Equal
    /// distances resolve to the smaller enemy identifier, so the result does
    /// not depend on snapshot order.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in towers.iter() {
            let range = tower.stats.range;
            if !range.is_finite() || range < 0.0 {
                continue;
            }
            let max_distance_sq = range * range;

            let mut best: Option<BestCandidate> = None;
            for candidate in &self.enemy_workspace {
                let distance_sq = tower.position.distance_squared(candidate.position);
                if distance_sq > max_distance_sq {
                    continue;
                }

                let current = BestCandidate {
                    distance_sq,
                    enemy: candidate.id,
                    position: candidate.position,
                };
                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best.enemy,
                    tower_position: tower.position,
                    enemy_position: best.position,
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());
        self.enemy_workspace
            .extend(enemies.iter().map(|snapshot| EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            }));
    }
}

/// Looks up the target assigned to `tower`, if any.
#[must_use]
pub fn target_of(targets: &[TowerTarget], tower: TowerId) -> Option<EnemyId> {
    targets
        .iter()
        .find(|target| target.tower == tower)
        .map(|target| target.enemy)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: WorldPoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    enemy: EnemyId,
    position: WorldPoint,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }
        self.enemy < other.enemy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serpent_defence_core::{
        CellCoord, EnemyKind, EnemySnapshot, TowerKind, TowerSnapshot, TowerStats,
    };

    fn tower(id: u32, x: f32, y: f32, range: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Rapid,
            cell: CellCoord::new(0, 0),
            position: WorldPoint::new(x, y),
            level: 1,
            sublevel: 0,
            stats: TowerStats {
                range,
                ..TowerKind::Rapid.base_stats()
            },
            cooldown_remaining: 0.0,
            invested: TowerKind::Rapid.cost(),
        }
    }

    fn enemy(id: u32, x: f32, y: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Standard,
            position: WorldPoint::new(x, y),
            progress: 0.0,
            health: 10.0,
            max_health: 10.0,
            speed: 1.0,
        }
    }

    fn run(towers: Vec<TowerSnapshot>, enemies: Vec<EnemySnapshot>) -> Vec<TowerTarget> {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();
        system.handle(
            &TowerView::from_snapshots(towers),
            &EnemyView::from_snapshots(enemies),
            &mut out,
        );
        out
    }

    #[test]
    fn nearest_enemy_in_range_is_chosen() {
        let out = run(
            vec![tower(1, 0.0, 0.0, 15.0)],
            vec![enemy(4, 20.0, 0.0), enemy(7, 10.0, 0.0)],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(7));
        assert_eq!(out[0].enemy_position, WorldPoint::new(10.0, 0.0));
        assert_eq!(out[0].tower_position, WorldPoint::new(0.0, 0.0));
    }

    #[test]
    fn enemy_on_range_boundary_is_targeted() {
        let out = run(vec![tower(1, 0.0, 0.0, 3.0)], vec![enemy(2, 0.0, 3.0)]);
        assert_eq!(target_of(&out, TowerId::new(1)), Some(EnemyId::new(2)));
    }

    #[test]
    fn enemy_outside_range_is_ignored() {
        let out = run(vec![tower(1, 0.0, 0.0, 3.0)], vec![enemy(2, 3.1, 0.0)]);
        assert!(out.is_empty());
    }

    #[test]
    fn equal_distances_prefer_smaller_identifier() {
        let out = run(
            vec![tower(1, 5.0, 5.0, 4.0)],
            vec![enemy(20, 7.0, 5.0), enemy(10, 3.0, 5.0)],
        );
        assert_eq!(out[0].enemy, EnemyId::new(10));
    }

    #[test]
    fn several_towers_may_share_a_target() {
        let out = run(
            vec![tower(1, 0.0, 0.0, 5.0), tower(2, 4.0, 0.0, 5.0)],
            vec![enemy(3, 2.0, 0.0)],
        );
        assert_eq!(target_of(&out, TowerId::new(1)), Some(EnemyId::new(3)));
        assert_eq!(target_of(&out, TowerId::new(2)), Some(EnemyId::new(3)));
    }

    #[test]
    fn empty_collections_clear_previous_targets() {
        let mut system = TowerTargeting::new();
        let mut out = run(vec![tower(1, 0.0, 0.0, 5.0)], vec![enemy(1, 1.0, 0.0)]);
        assert_eq!(out.len(), 1);

        system.handle(
            &TowerView::from_snapshots(vec![tower(1, 0.0, 0.0, 5.0)]),
            &EnemyView::default(),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
