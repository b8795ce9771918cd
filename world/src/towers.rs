//! Authoritative tower state.

use serpent_defence_core::{CellCoord, TowerId, TowerKind, TowerSnapshot, TowerStats};
use serpent_defence_system_progression::TowerProgress;

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    pub(crate) progress: TowerProgress,
    /// Per-tower copy of the catalog statistics, transformed by level-ups.
    pub(crate) stats: TowerStats,
    pub(crate) cooldown_remaining: f32,
    /// Gold spent on placement and every upgrade.
    pub(crate) invested: u32,
}

impl TowerState {
    /// Creates a level-one tower carrying the catalog statistics of `kind`.
    pub(crate) fn placed(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            progress: TowerProgress::placed(),
            stats: kind.base_stats(),
            cooldown_remaining: 0.0,
            invested: kind.cost(),
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.cell.center(),
            level: self.progress.level,
            sublevel: self.progress.sublevel,
            stats: self.stats,
            cooldown_remaining: self.cooldown_remaining,
            invested: self.invested,
        }
    }
}
