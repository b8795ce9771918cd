#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use serpent_defence_core::{Command, TowerTarget, TowerView};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` for every targeted tower whose cooldown elapsed.
    pub fn handle(&mut self, towers: &TowerView, targets: &[TowerTarget], out: &mut Vec<Command>) {
        if targets.is_empty() || towers.is_empty() {
            return;
        }

        self.scratch.clear();
        for target in targets {
            let Some(tower) = towers.get(target.tower) else {
                continue;
            };
            if tower.cooldown_remaining <= 0.0 {
                self.scratch.push(Command::FireProjectile {
                    tower: target.tower,
                    target: target.enemy,
                });
            }
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
