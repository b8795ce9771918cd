#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic boustrophedon path generator.
//!
//! The walk starts on the top margin row, sweeps the interior row by row while
//! alternating direction, and descends one or two rows between sweeps. Two
//! streak caps keep every straight run short: a long sideways run forces a
//! one-cell drop, a long downward run forces a one-cell sideways correction.
//! When the walk reaches the bottom margin row shorter than requested, a
//! serpentine extension winds through the bottom band until the length is met,
//! no free cell remains, or the iteration bound trips. The last two outcomes
//! produce a shorter but still valid path.

use std::collections::HashSet;

use serpent_defence_core::{CellCoord, ConfigError, Path, PathConfig};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Generates the enemy path for the provided configuration and seed.
///
/// The result always starts on the top margin row, never revisits a cell and
/// moves between 4-adjacent cells. Its length is at least
/// `config.min_length` whenever the grid allows it.
pub fn generate_path(config: &PathConfig, seed: u64) -> Result<Path, ConfigError> {
    config.validate()?;

    let mut walker = Walker::new(config, seed);
    walker.sweep_rows();
    if walker.cells.len() < config.min_length {
        walker.extend_along_bottom();
    }

    Path::new(walker.cells)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    East,
    West,
}

impl Heading {
    fn reversed(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Vertical {
    Down,
    Up,
}

#[derive(Debug)]
struct Walker {
    left: u32,
    right: u32,
    bottom: u32,
    floor: u32,
    max_vertical: u32,
    max_horizontal: u32,
    min_length: usize,
    iteration_bound: usize,
    cells: Vec<CellCoord>,
    visited: HashSet<CellCoord>,
    heading: Heading,
    horizontal_streak: u32,
    vertical_streak: u32,
    rng: Lcg,
}

impl Walker {
    fn new(config: &PathConfig, seed: u64) -> Self {
        let margin = config.margin;
        let last = config.grid_size - 1;
        let mut rng = Lcg::new(seed);
        let heading = if rng.below(2) == 0 {
            Heading::East
        } else {
            Heading::West
        };
        let (left, right) = (margin, last - margin);
        let start_column = match heading {
            Heading::East => left,
            Heading::West => right,
        };
        let side = usize::try_from(config.grid_size).unwrap_or(usize::MAX);

        let mut walker = Self {
            left,
            right,
            bottom: last - margin,
            floor: last,
            max_vertical: config.max_vertical_streak,
            max_horizontal: config.max_horizontal_streak,
            min_length: config.min_length,
            iteration_bound: side.saturating_mul(side).saturating_mul(4),
            cells: Vec::new(),
            visited: HashSet::new(),
            heading,
            horizontal_streak: 0,
            vertical_streak: 0,
            rng,
        };
        walker.emit(CellCoord::new(start_column, margin));
        walker
    }

    fn current(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }

    fn emit(&mut self, cell: CellCoord) {
        let _ = self.visited.insert(cell);
        self.cells.push(cell);
    }

    fn at_edge(&self) -> bool {
        let column = self.current().column();
        match self.heading {
            Heading::East => column >= self.right,
            Heading::West => column <= self.left,
        }
    }

    fn step_sideways(&mut self) -> bool {
        if self.horizontal_streak >= self.max_horizontal {
            return false;
        }
        let current = self.current();
        let column = match self.heading {
            Heading::East => current.column().checked_add(1),
            Heading::West => current.column().checked_sub(1),
        };
        let Some(column) = column.filter(|column| (self.left..=self.right).contains(column))
        else {
            return false;
        };
        let next = CellCoord::new(column, current.row());
        if self.visited.contains(&next) {
            return false;
        }
        self.emit(next);
        self.horizontal_streak += 1;
        self.vertical_streak = 0;
        true
    }

    fn step_vertical(&mut self, vertical: Vertical, top: u32, bottom: u32) -> bool {
        if self.vertical_streak >= self.max_vertical {
            return false;
        }
        let current = self.current();
        let row = match vertical {
            Vertical::Down => current.row().checked_add(1),
            Vertical::Up => current.row().checked_sub(1),
        };
        let Some(row) = row.filter(|row| (top..=bottom).contains(row)) else {
            return false;
        };
        let next = CellCoord::new(current.column(), row);
        if self.visited.contains(&next) {
            return false;
        }
        self.emit(next);
        self.vertical_streak += 1;
        self.horizontal_streak = 0;
        true
    }

    fn sweep_rows(&mut self) {
        loop {
            while !self.at_edge() {
                if self.horizontal_streak >= self.max_horizontal {
                    if !self.step_vertical(Vertical::Down, 0, self.bottom) {
                        return;
                    }
                    if self.current().row() >= self.bottom {
                        return;
                    }
                    continue;
                }
                if !self.step_sideways() {
                    break;
                }
            }

            if self.current().row() >= self.bottom {
                return;
            }

            let rows = 1 + u32::try_from(self.rng.below(2)).unwrap_or(0);
            let target = self.current().row().saturating_add(rows).min(self.bottom);
            self.heading = self.heading.reversed();
            while self.current().row() < target {
                if self.vertical_streak >= self.max_vertical {
                    if !self.step_sideways() {
                        return;
                    }
                    continue;
                }
                if !self.step_vertical(Vertical::Down, 0, self.bottom) {
                    return;
                }
            }

            if self.current().row() >= self.bottom {
                return;
            }
        }
    }

    fn extend_along_bottom(&mut self) {
        let column = self.current().column();
        let east_room = self.right.saturating_sub(column);
        let west_room = column.saturating_sub(self.left);
        let heading = if east_room >= west_room {
            Heading::East
        } else {
            Heading::West
        };
        if heading != self.heading {
            self.heading = heading;
            self.horizontal_streak = 0;
        }

        let mut vertical = Vertical::Down;
        let mut iterations = 0;

        while self.cells.len() < self.min_length && iterations < self.iteration_bound {
            iterations += 1;

            if self.step_vertical(vertical, self.bottom, self.floor) {
                continue;
            }
            if !self.step_sideways() {
                break;
            }
            vertical = match vertical {
                Vertical::Down => Vertical::Up,
                Vertical::Up => Vertical::Down,
            };
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Lcg {
    state: u64,
}

impl Lcg {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.state >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}
