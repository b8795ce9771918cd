//! Authoritative enemy state.

use serpent_defence_core::{EnemyId, EnemyKind, EnemySnapshot, Path};

#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) max_health: f32,
    pub(crate) health: f32,
    /// Movement speed in cells per second.
    pub(crate) speed: f32,
    /// Continuous index along the path.
    pub(crate) progress: f32,
}

impl EnemyState {
    pub(crate) fn spawned(id: EnemyId, kind: EnemyKind, health: f32, speed: f32) -> Self {
        Self {
            id,
            kind,
            max_health: health,
            health,
            speed,
            progress: 0.0,
        }
    }

    /// Subtracts `damage`, clamping health at zero. Returns true when the enemy died.
    pub(crate) fn take_damage(&mut self, damage: f32) -> bool {
        self.health = (self.health - damage.max(0.0)).max(0.0);
        self.health <= 0.0
    }

    pub(crate) fn snapshot(&self, path: &Path) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: path.position_at(self.progress),
            progress: self.progress,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
        }
    }
}
