#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler: difficulty curve, spawn cadence and archetype selection.
//!
//! The scheduler drives the wave state machine owned by the world. During a
//! break it starts the next wave once the break timer has run out, while
//! spawning it releases one enemy per elapsed spawn interval, and once the
//! field is clear it hands control back to a break (or declares victory after
//! the final campaign wave).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serpent_defence_core::{
    Command, EnemyKind, Event, SessionConfig, WaveConfig, WavePhase, WaveProgression, WaveStatus,
    BASE_ENEMY_SPEED,
};

/// Last wave that spawns only standard enemies.
const STANDARD_ONLY_WAVES: u32 = 2;
/// Growth of the tough-archetype share per wave.
const TOUGH_SHARE_PER_WAVE: f32 = 0.08;
/// Upper bound of the tough-archetype share.
const MAX_TOUGH_SHARE: f32 = 0.7;

/// Difficulty parameters of endless wave `wave`, counting from one.
///
/// Wave zero is treated as the first wave.
#[must_use]
pub fn wave_config(wave: u32) -> WaveConfig {
    let index = wave.max(1) - 1;
    WaveConfig {
        enemy_count: 4u32.saturating_add(wave.max(1).saturating_mul(2)),
        speed_multiplier: 1.0 + (0.05 * index as f32).min(1.0),
        health_base: 10.0 + 5.0 * (index / 2) as f32,
    }
}

/// Maps a uniform sample in `[0, 1)` onto an archetype for `wave`.
#[must_use]
pub fn choose_archetype(wave: u32, sample: f32) -> EnemyKind {
    if wave <= STANDARD_ONLY_WAVES {
        return EnemyKind::Standard;
    }
    let tough = (TOUGH_SHARE_PER_WAVE * wave as f32).min(MAX_TOUGH_SHARE);
    if sample < tough / 2.0 {
        EnemyKind::Brute
    } else if sample < tough {
        EnemyKind::Swift
    } else {
        EnemyKind::Standard
    }
}

/// Pure system that emits wave lifecycle and spawn commands.
#[derive(Debug)]
pub struct WaveScheduler {
    progression: WaveProgression,
    spawn_interval: f32,
    break_seconds: f32,
    spawn_timer: f32,
    rng: ChaCha8Rng,
}

impl WaveScheduler {
    /// Creates a scheduler using the timing, progression and seed of `config`.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            progression: config.progression.clone(),
            spawn_interval: config.spawn_interval_seconds,
            break_seconds: config.break_seconds,
            spawn_timer: config.spawn_interval_seconds,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Parameters of `wave` under the configured progression.
    ///
    /// Returns `None` for waves past the end of a campaign.
    #[must_use]
    pub fn config_for(&self, wave: u32) -> Option<WaveConfig> {
        match &self.progression {
            WaveProgression::Endless => Some(wave_config(wave)),
            WaveProgression::Campaign(waves) => {
                let index = usize::try_from(wave.checked_sub(1)?).ok()?;
                waves.get(index).copied()
            }
        }
    }

    /// Consumes the tick's events and the wave status to emit scheduler commands.
    ///
    /// `live_enemies` is the number of enemies currently on the field.
    pub fn handle(
        &mut self,
        events: &[Event],
        status: WaveStatus,
        live_enemies: usize,
        out: &mut Vec<Command>,
    ) {
        let dt: f32 = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .sum();

        match status.phase {
            WavePhase::Break => {
                if status.break_remaining > 0.0 {
                    return;
                }
                let wave = status.wave.saturating_add(1);
                let Some(config) = self.config_for(wave) else {
                    return;
                };
                self.spawn_timer = self.spawn_interval;
                out.push(Command::BeginWave {
                    wave,
                    enemies: config.enemy_count,
                });
            }
            WavePhase::Spawning => {
                if status.pending_spawns == 0 {
                    return;
                }
                self.spawn_timer -= dt;
                if self.spawn_timer > 0.0 {
                    return;
                }
                self.spawn_timer = self.spawn_interval;
                if let Some(command) = self.spawn_command(status.wave) {
                    out.push(command);
                }
            }
            WavePhase::Active => {
                if live_enemies > 0 {
                    return;
                }
                if self.config_for(status.wave.saturating_add(1)).is_none() {
                    out.push(Command::DeclareVictory);
                } else {
                    out.push(Command::BeginBreak {
                        duration: self.break_seconds,
                    });
                }
            }
        }
    }

    fn spawn_command(&mut self, wave: u32) -> Option<Command> {
        let config = self.config_for(wave)?;
        let kind = if wave <= STANDARD_ONLY_WAVES {
            EnemyKind::Standard
        } else {
            let sample: f32 = self.rng.gen();
            choose_archetype(wave, sample)
        };
        Some(Command::SpawnEnemy {
            kind,
            health: config.health_base * kind.health_factor(),
            speed: BASE_ENEMY_SPEED * config.speed_multiplier * kind.speed_factor(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(phase: WavePhase, wave: u32, break_remaining: f32, pending: u32) -> WaveStatus {
        WaveStatus {
            wave,
            phase,
            break_remaining,
            pending_spawns: pending,
        }
    }

    #[test]
    fn difficulty_curve_matches_formulas() {
        assert_eq!(
            wave_config(1),
            WaveConfig {
                enemy_count: 6,
                speed_multiplier: 1.0,
                health_base: 10.0,
            }
        );
        let fifth = wave_config(5);
        assert_eq!(fifth.enemy_count, 14);
        assert!((fifth.speed_multiplier - 1.2).abs() < 1e-6);
        assert_eq!(fifth.health_base, 20.0);
        assert_eq!(wave_config(100).speed_multiplier, 2.0);
        assert_eq!(wave_config(0), wave_config(1));
    }

    #[test]
    fn early_waves_are_standard_only() {
        for sample in [0.0, 0.01, 0.5, 0.99] {
            assert_eq!(choose_archetype(1, sample), EnemyKind::Standard);
            assert_eq!(choose_archetype(2, sample), EnemyKind::Standard);
        }
    }

    #[test]
    fn archetype_thresholds_follow_tough_share() {
        // Wave 5 has a tough share of 0.4.
        assert_eq!(choose_archetype(5, 0.1), EnemyKind::Brute);
        assert_eq!(choose_archetype(5, 0.3), EnemyKind::Swift);
        assert_eq!(choose_archetype(5, 0.5), EnemyKind::Standard);
        // The share saturates at 0.7.
        assert_eq!(choose_archetype(50, 0.69), EnemyKind::Swift);
        assert_eq!(choose_archetype(50, 0.71), EnemyKind::Standard);
    }

    #[test]
    fn expired_break_starts_next_wave() {
        let mut scheduler = WaveScheduler::new(&SessionConfig::default());
        let mut out = Vec::new();
        scheduler.handle(&[], status(WavePhase::Break, 0, 0.5, 0), 0, &mut out);
        assert!(out.is_empty());

        scheduler.handle(&[], status(WavePhase::Break, 0, 0.0, 0), 0, &mut out);
        assert_eq!(
            out,
            vec![Command::BeginWave {
                wave: 1,
                enemies: 6,
            }]
        );
    }

    #[test]
    fn spawns_follow_the_interval() {
        let mut scheduler = WaveScheduler::new(&SessionConfig::default());
        let mut out = Vec::new();
        let spawning = status(WavePhase::Spawning, 1, 0.0, 6);

        scheduler.handle(&[Event::TimeAdvanced { dt: 0.5 }], spawning, 0, &mut out);
        assert!(out.is_empty());
        scheduler.handle(&[Event::TimeAdvanced { dt: 0.4 }], spawning, 0, &mut out);
        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0],
            Command::SpawnEnemy {
                kind: EnemyKind::Standard,
                ..
            }
        ));
    }

    #[test]
    fn cleared_campaign_declares_victory() {
        let config = SessionConfig::default().with_progression(WaveProgression::Campaign(vec![
            wave_config(1),
            wave_config(2),
        ]));
        let mut scheduler = WaveScheduler::new(&config);
        let mut out = Vec::new();

        scheduler.handle(&[], status(WavePhase::Active, 1, 0.0, 0), 0, &mut out);
        assert_eq!(out, vec![Command::BeginBreak { duration: 10.0 }]);

        out.clear();
        scheduler.handle(&[], status(WavePhase::Active, 2, 0.0, 0), 0, &mut out);
        assert_eq!(out, vec![Command::DeclareVictory]);
    }

    #[test]
    fn live_enemies_keep_the_wave_active() {
        let mut scheduler = WaveScheduler::new(&SessionConfig::default());
        let mut out = Vec::new();
        scheduler.handle(&[], status(WavePhase::Active, 3, 0.0, 0), 2, &mut out);
        assert!(out.is_empty());
    }
}
