#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Homing projectile flight and impact detection.

use serpent_defence_core::{Command, EnemyView, Event, ProjectileView, HIT_RADIUS};

/// Pure system that steers projectiles toward their targets.
#[derive(Debug, Default)]
pub struct Projectiles;

impl Projectiles {
    /// Creates a new projectile system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits flight, impact and discard commands for the elapsed time.
    ///
    /// Every projectile re-aims at its target's current position while keeping
    /// its speed. A step is clamped to the remaining distance, so a projectile
    /// never flies past its target. Projectiles that end a step within the hit
    /// radius resolve their impact; projectiles without a live target are
    /// discarded.
    pub fn handle(
        &mut self,
        events: &[Event],
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        let dt: f32 = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .sum();
        if dt <= 0.0 || projectiles.is_empty() {
            return;
        }

        for projectile in projectiles.iter() {
            let Some(target) = enemies.get(projectile.target) else {
                out.push(Command::DiscardProjectile {
                    projectile: projectile.id,
                });
                continue;
            };

            let speed = projectile.velocity.length();
            let to_target = projectile.position.vector_to(target.position);
            let distance = to_target.length();
            let step = (speed * dt).min(distance);
            let position = if step >= distance {
                target.position
            } else {
                projectile.position.translated(to_target.with_length(step), 1.0)
            };

            if position.distance(target.position) < HIT_RADIUS {
                out.push(Command::ResolveImpact {
                    projectile: projectile.id,
                });
                continue;
            }

            out.push(Command::MoveProjectile {
                projectile: projectile.id,
                position,
                velocity: to_target.with_length(speed),
            });
        }
    }
}
