use std::collections::HashSet;

use proptest::prelude::*;
use serpent_defence_core::{CellCoord, ConfigError, Path, PathConfig};
use serpent_defence_system_path_generation::generate_path;

fn longest_runs(path: &Path) -> (u32, u32) {
    let mut longest_vertical = 0;
    let mut longest_horizontal = 0;
    let mut vertical = 0;
    let mut horizontal = 0;
    let mut previous_delta: Option<(i64, i64)> = None;

    for pair in path.cells().windows(2) {
        let delta = (
            i64::from(pair[1].column()) - i64::from(pair[0].column()),
            i64::from(pair[1].row()) - i64::from(pair[0].row()),
        );
        let same = previous_delta == Some(delta);
        if delta.0 == 0 {
            vertical = if same { vertical + 1 } else { 1 };
            horizontal = 0;
        } else {
            horizontal = if same { horizontal + 1 } else { 1 };
            vertical = 0;
        }
        longest_vertical = longest_vertical.max(vertical);
        longest_horizontal = longest_horizontal.max(horizontal);
        previous_delta = Some(delta);
    }

    (longest_vertical, longest_horizontal)
}

fn arb_config() -> impl Strategy<Value = PathConfig> {
    (4u32..28, 0u32..4, 1u32..5, 1u32..9, 0usize..400).prop_filter_map(
        "grid must leave an interior",
        |(grid_size, margin, max_vertical_streak, max_horizontal_streak, min_length)| {
            let config = PathConfig {
                grid_size,
                margin,
                max_vertical_streak,
                max_horizontal_streak,
                min_length,
            };
            config.validate().ok().map(|()| config)
        },
    )
}

proptest! {
    #[test]
    fn generated_paths_are_simple_adjacent_walks(config in arb_config(), seed in any::<u64>()) {
        let path = generate_path(&config, seed).expect("valid configuration");
        let cells = path.cells();

        for pair in cells.windows(2) {
            prop_assert!(pair[0].is_adjacent(pair[1]));
        }

        let unique: HashSet<CellCoord> = cells.iter().copied().collect();
        prop_assert_eq!(unique.len(), cells.len());

        prop_assert_eq!(path.start(), cells[0]);
        prop_assert_eq!(path.base(), cells[cells.len() - 1]);
        prop_assert_eq!(path.start().row(), config.margin);

        for cell in cells {
            prop_assert!(cell.column() < config.grid_size);
            prop_assert!(cell.row() < config.grid_size);
        }
    }

    #[test]
    fn streak_caps_are_never_exceeded(config in arb_config(), seed in any::<u64>()) {
        let path = generate_path(&config, seed).expect("valid configuration");
        let (vertical, horizontal) = longest_runs(&path);
        prop_assert!(vertical <= config.max_vertical_streak);
        prop_assert!(horizontal <= config.max_horizontal_streak);
    }

    #[test]
    fn generation_is_deterministic(config in arb_config(), seed in any::<u64>()) {
        prop_assert_eq!(generate_path(&config, seed), generate_path(&config, seed));
    }
}

#[test]
fn default_configuration_meets_minimum_length() {
    let config = PathConfig::default();
    for seed in 0..64 {
        let path = generate_path(&config, seed).expect("default configuration is valid");
        assert!(
            path.len() >= config.min_length,
            "seed {seed} produced {} cells",
            path.len()
        );
    }
}

#[test]
fn main_walk_descends_to_bottom_margin_row() {
    let config = PathConfig {
        min_length: 0,
        ..PathConfig::default()
    };
    let bottom = config.grid_size - 1 - config.margin;
    for seed in 0..64 {
        let path = generate_path(&config, seed).expect("valid configuration");
        assert_eq!(path.base().row(), bottom, "seed {seed}");
    }
}

#[test]
fn extension_lengthens_short_walks() {
    let short = PathConfig {
        grid_size: 10,
        margin: 2,
        min_length: 0,
        ..PathConfig::default()
    };
    let long = PathConfig {
        min_length: 40,
        ..short
    };
    let seed = 11;
    let base_path = generate_path(&short, seed).expect("valid configuration");
    let extended = generate_path(&long, seed).expect("valid configuration");

    assert!(extended.len() > base_path.len());
    assert_eq!(&extended.cells()[..base_path.len()], base_path.cells());
    assert!(extended
        .cells()
        .iter()
        .skip(base_path.len())
        .all(|cell| cell.row() >= short.grid_size - 1 - short.margin));
}

#[test]
fn infeasible_minimum_length_degrades_instead_of_failing() {
    let config = PathConfig {
        grid_size: 4,
        margin: 1,
        max_vertical_streak: 2,
        max_horizontal_streak: 6,
        min_length: 1_000,
    };
    for seed in 0..16 {
        let path = generate_path(&config, seed).expect("degraded output is still valid");
        assert_eq!(path.len(), 6, "seed {seed}");
    }
}

#[test]
fn grid_without_interior_is_invalid() {
    let config = PathConfig {
        grid_size: 3,
        margin: 1,
        ..PathConfig::default()
    };
    assert!(matches!(
        generate_path(&config, 1),
        Err(ConfigError::InvalidConfiguration(_))
    ));
}
