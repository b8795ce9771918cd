//! Authoritative projectile state.

use serpent_defence_core::{
    EnemyId, ProjectileId, ProjectileSnapshot, TowerId, WorldPoint, WorldVector,
};

#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    /// Weak reference; resolved against the enemy registry on every use.
    pub(crate) target: EnemyId,
    pub(crate) position: WorldPoint,
    pub(crate) velocity: WorldVector,
    pub(crate) damage: f32,
}

impl ProjectileState {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            target: self.target,
            position: self.position,
            velocity: self.velocity,
            damage: self.damage,
        }
    }
}
