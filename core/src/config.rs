//! Session configuration consumed when a new game starts.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Parameters steering the procedural path generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Number of cells along each edge of the square grid.
    pub grid_size: u32,
    /// Rows and columns kept free around the main walk.
    pub margin: u32,
    /// Longest run of consecutive downward steps before a sideways correction.
    pub max_vertical_streak: u32,
    /// Longest run of consecutive same-direction sideways steps before a forced drop.
    pub max_horizontal_streak: u32,
    /// Desired minimum number of cells in the path. Best effort.
    pub min_length: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            grid_size: 16,
            margin: 1,
            max_vertical_streak: 2,
            max_horizontal_streak: 6,
            min_length: 60,
        }
    }
}

impl PathConfig {
    /// Checks that the grid leaves room for a walk and that both streak caps allow movement.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interior_floor = self.margin.saturating_mul(2).saturating_add(2);
        if self.grid_size < interior_floor {
            return Err(ConfigError::invalid(format!(
                "grid size {} leaves no interior for margin {}",
                self.grid_size, self.margin
            )));
        }
        if self.max_vertical_streak == 0 || self.max_horizontal_streak == 0 {
            return Err(ConfigError::invalid("streak caps must be at least one"));
        }
        Ok(())
    }
}

/// Difficulty parameters describing a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Number of enemies spawned during the wave.
    pub enemy_count: u32,
    /// Multiplier applied to the base enemy speed.
    pub speed_multiplier: f32,
    /// Health granted to a standard enemy before archetype factors.
    pub health_base: f32,
}

/// How wave parameters are chosen as the session progresses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum WaveProgression {
    /// Waves escalate forever; the only terminal state is running out of lives.
    #[default]
    Endless,
    /// A fixed list of waves; clearing the last one wins the session.
    Campaign(Vec<WaveConfig>),
}

/// Complete configuration required to start a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path generator parameters, including the grid size.
    pub path: PathConfig,
    /// Gold available before the first wave.
    pub starting_gold: u32,
    /// Lives available before the first wave.
    pub starting_lives: u32,
    /// Seed shared by the path generator and the archetype sampler.
    pub seed: u64,
    /// Seconds of preparation before the first wave auto-starts.
    pub first_break_seconds: f32,
    /// Seconds of rest between a cleared wave and the next one.
    pub break_seconds: f32,
    /// Seconds between successive spawns within a wave.
    pub spawn_interval_seconds: f32,
    /// Endless escalation or a fixed campaign.
    pub progression: WaveProgression,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathConfig::default(),
            starting_gold: 200,
            starting_lives: 20,
            seed: 0x5eed,
            first_break_seconds: 10.0,
            break_seconds: 10.0,
            spawn_interval_seconds: 0.8,
            progression: WaveProgression::Endless,
        }
    }
}

impl SessionConfig {
    /// Replaces the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the path generator parameters.
    #[must_use]
    pub fn with_path(mut self, path: PathConfig) -> Self {
        self.path = path;
        self
    }

    /// Replaces the starting gold.
    #[must_use]
    pub fn with_starting_gold(mut self, gold: u32) -> Self {
        self.starting_gold = gold;
        self
    }

    /// Replaces the starting lives.
    #[must_use]
    pub fn with_starting_lives(mut self, lives: u32) -> Self {
        self.starting_lives = lives;
        self
    }

    /// Replaces the wave progression mode.
    #[must_use]
    pub fn with_progression(mut self, progression: WaveProgression) -> Self {
        self.progression = progression;
        self
    }

    /// Replaces the first break duration.
    #[must_use]
    pub fn with_first_break(mut self, seconds: f32) -> Self {
        self.first_break_seconds = seconds;
        self
    }

    /// Validates every parameter, including the path generator's.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.path.validate()?;
        if self.starting_lives == 0 {
            return Err(ConfigError::invalid("starting lives must be positive"));
        }
        for (name, value) in [
            ("first break", self.first_break_seconds),
            ("break", self.break_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(format!(
                    "{name} duration must be a non-negative number, got {value}"
                )));
            }
        }
        if !self.spawn_interval_seconds.is_finite() || self.spawn_interval_seconds <= 0.0 {
            return Err(ConfigError::invalid("spawn interval must be positive"));
        }
        if let WaveProgression::Campaign(waves) = &self.progression {
            if waves.is_empty() {
                return Err(ConfigError::invalid("campaign requires at least one wave"));
            }
            if waves
                .iter()
                .any(|wave| wave.enemy_count == 0 || wave.health_base <= 0.0)
            {
                return Err(ConfigError::invalid(
                    "campaign waves need enemies with positive health",
                ));
            }
        }
        Ok(())
    }
}
