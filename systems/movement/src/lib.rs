#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that advances enemies along the path.

use serpent_defence_core::{Command, EnemyView, Event};

/// Pure system that reacts to elapsed time and emits enemy movement commands.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits one `Command::MoveEnemy` per live enemy for the time that elapsed.
    ///
    /// Enemies cover `speed * dt` path indices. The world retires any enemy
    /// whose new progress reaches the base.
    pub fn handle(&mut self, events: &[Event], enemies: &EnemyView, out: &mut Vec<Command>) {
        let dt: f32 = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .sum();
        if dt <= 0.0 || enemies.is_empty() {
            return;
        }

        out.reserve(enemies.len());
        for enemy in enemies.iter() {
            out.push(Command::MoveEnemy {
                enemy: enemy.id,
                progress: enemy.progress + enemy.speed * dt,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serpent_defence_core::{EnemyId, EnemyKind, EnemySnapshot, WorldPoint};

    fn enemy(id: u32, progress: f32, speed: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Standard,
            position: WorldPoint::default(),
            progress,
            health: 1.0,
            max_health: 1.0,
            speed,
        }
    }

    #[test]
    fn enemies_advance_by_speed_times_dt() {
        let view = EnemyView::from_snapshots(vec![enemy(2, 1.0, 2.0), enemy(1, 0.0, 1.5)]);
        let mut out = Vec::new();
        Movement::new().handle(&[Event::TimeAdvanced { dt: 0.5 }], &view, &mut out);

        assert_eq!(
            out,
            vec![
                Command::MoveEnemy {
                    enemy: EnemyId::new(1),
                    progress: 0.75,
                },
                Command::MoveEnemy {
                    enemy: EnemyId::new(2),
                    progress: 2.0,
                },
            ]
        );
    }

    #[test]
    fn no_elapsed_time_means_no_movement() {
        let view = EnemyView::from_snapshots(vec![enemy(0, 1.0, 2.0)]);
        let mut out = Vec::new();
        Movement::new().handle(&[Event::WaveStartRequested], &view, &mut out);
        Movement::new().handle(&[Event::TimeAdvanced { dt: 0.0 }], &view, &mut out);
        assert!(out.is_empty());
    }
}
