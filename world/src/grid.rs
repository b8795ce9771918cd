//! Dense cell grid combining the static cell roles with tower occupancy.

use serpent_defence_core::{CellCoord, CellKind, ConfigError, Path, TowerId};

#[derive(Clone, Debug)]
pub(crate) struct Grid {
    size: u32,
    kinds: Vec<CellKind>,
    towers: Vec<Option<TowerId>>,
}

impl Grid {
    /// Lays the path onto an otherwise buildable square grid.
    pub(crate) fn new(size: u32, path: &Path) -> Result<Self, ConfigError> {
        let capacity_u64 = u64::from(size) * u64::from(size);
        let capacity = usize::try_from(capacity_u64).map_err(|_| {
            ConfigError::InvalidConfiguration(format!("grid size {size} is too large"))
        })?;
        let mut grid = Self {
            size,
            kinds: vec![CellKind::Buildable; capacity],
            towers: vec![None; capacity],
        };

        let last = path.len() - 1;
        for (position, cell) in path.cells().iter().enumerate() {
            let Some(index) = grid.index(*cell) else {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "path cell ({}, {}) lies outside the {size}x{size} grid",
                    cell.column(),
                    cell.row()
                )));
            };
            grid.kinds[index] = match position {
                0 => CellKind::Start,
                p if p == last => CellKind::Base,
                _ => CellKind::Path,
            };
        }

        Ok(grid)
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).map(|index| self.kinds[index])
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<TowerId> {
        self.index(cell).and_then(|index| self.towers[index])
    }

    pub(crate) fn occupy(&mut self, tower: TowerId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.towers[index] = Some(tower);
        }
    }

    pub(crate) fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.towers[index] = None;
        }
    }

    /// Number of cells that currently host a tower.
    pub(crate) fn occupied_count(&self) -> usize {
        self.towers.iter().filter(|slot| slot.is_some()).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.size && cell.row() < self.size {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path() -> Path {
        Path::new(vec![
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
        ])
        .expect("valid path")
    }

    #[test]
    fn path_cells_receive_their_roles() {
        let grid = Grid::new(3, &straight_path()).expect("path fits");
        assert_eq!(grid.kind(CellCoord::new(0, 1)), Some(CellKind::Start));
        assert_eq!(grid.kind(CellCoord::new(1, 1)), Some(CellKind::Path));
        assert_eq!(grid.kind(CellCoord::new(2, 1)), Some(CellKind::Base));
        assert_eq!(grid.kind(CellCoord::new(1, 0)), Some(CellKind::Buildable));
        assert_eq!(grid.kind(CellCoord::new(3, 0)), None);
    }

    #[test]
    fn path_outside_grid_is_rejected() {
        assert!(Grid::new(2, &straight_path()).is_err());
    }

    #[test]
    fn occupancy_round_trips() {
        let mut grid = Grid::new(3, &straight_path()).expect("path fits");
        let cell = CellCoord::new(2, 2);
        grid.occupy(TowerId::new(4), cell);
        assert_eq!(grid.occupant(cell), Some(TowerId::new(4)));
        assert_eq!(grid.occupied_count(), 1);
        grid.vacate(cell);
        assert_eq!(grid.occupant(cell), None);
    }
}
