//! Scripted builder that spends gold on behalf of a headless player.

use serpent_defence_core::{CellCoord, CellKind, TowerId, TowerKind};
use serpent_defence_session::Session;
use tracing::debug;

/// Tower kinds placed in rotation.
const BUILD_ORDER: [TowerKind; 4] = [
    TowerKind::Rapid,
    TowerKind::Rapid,
    TowerKind::Cannon,
    TowerKind::Sniper,
];

/// Towers built before the autopilot switches to upgrading.
const MAX_TOWERS: usize = 8;

/// Spends gold on towers beside the path, then on upgrades.
#[derive(Debug)]
pub(crate) struct Autopilot {
    sites: Vec<CellCoord>,
    towers: Vec<TowerId>,
    next_kind: usize,
}

impl Autopilot {
    /// Prepares build sites along the path, nearest to the start first.
    pub(crate) fn new(session: &Session) -> Self {
        Self {
            sites: build_sites(session),
            towers: Vec::new(),
            next_kind: 0,
        }
    }

    /// Makes at most one purchase.
    pub(crate) fn act(&mut self, session: &mut Session) {
        let gold = session.snapshot().gold;

        if self.towers.len() < MAX_TOWERS {
            let kind = BUILD_ORDER[self.next_kind % BUILD_ORDER.len()];
            if gold < kind.cost() {
                return;
            }
            while let Some(cell) = self.sites.first().copied() {
                let _ = self.sites.remove(0);
                match session.place_tower(cell, kind) {
                    Ok(tower) => {
                        self.towers.push(tower);
                        self.next_kind += 1;
                        return;
                    }
                    Err(reason) => debug!(?cell, %reason, "build site skipped"),
                }
            }
        }

        let snapshot = session.snapshot();
        let Some(weakest) = snapshot
            .towers
            .iter()
            .filter(|tower| gold >= tower.kind.upgrade_cost())
            .min_by_key(|tower| (tower.level, tower.sublevel, tower.id))
        else {
            return;
        };
        if let Err(reason) = session.upgrade_tower(weakest.id) {
            debug!(tower = weakest.id.get(), %reason, "upgrade skipped");
        }
    }
}

fn build_sites(session: &Session) -> Vec<CellCoord> {
    let mut sites = Vec::new();
    for cell in session.path().cells() {
        let (column, row) = (cell.column(), cell.row());
        let neighbours = [
            (Some(column), row.checked_sub(1)),
            (Some(column), row.checked_add(1)),
            (column.checked_sub(1), Some(row)),
            (column.checked_add(1), Some(row)),
        ];
        for neighbour in neighbours {
            let (Some(column), Some(row)) = neighbour else {
                continue;
            };
            let site = CellCoord::new(column, row);
            if session.cell_kind(site) == Some(CellKind::Buildable) && !sites.contains(&site) {
                sites.push(site);
            }
        }
    }
    sites
}
