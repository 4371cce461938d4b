use rand::Rng;

use crate::error::ConfigError;

/// Linearly annealed probability of playing a random column instead of the
/// network's choice.
///
/// The percentage starts at `start_percent` in round 0 and reaches zero at
/// round `rounds * stop_percent / 100`; every later round is pure
/// exploitation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorationSchedule {
    rounds: usize,
    start_percent: f64,
    stop_percent: f64,
}

impl ExplorationSchedule {
    pub fn new(rounds: usize, start_percent: u32, stop_percent: u32) -> Result<Self, ConfigError> {
        if rounds == 0 {
            return Err(ConfigError::Validation("rounds must be >= 1".into()));
        }
        if start_percent > 100 {
            return Err(ConfigError::Validation(
                "start_percent must be in [0, 100]".into(),
            ));
        }
        if stop_percent == 0 || stop_percent > 100 {
            return Err(ConfigError::Validation(
                "stop_percent must be in [1, 100]".into(),
            ));
        }
        Ok(ExplorationSchedule {
            rounds,
            start_percent: start_percent as f64,
            stop_percent: stop_percent as f64,
        })
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Round at which exploration reaches zero.
    pub fn stop_round(&self) -> f64 {
        self.rounds as f64 * self.stop_percent / 100.0
    }

    /// Exploration percentage for `round`, never negative.
    pub fn percent(&self, round: usize) -> f64 {
        let slope = self.start_percent / self.stop_round();
        (self.start_percent - slope * round as f64).max(0.0)
    }

    /// Draw whether a single move explores, given the round's percentage.
    pub fn should_explore<R: Rng>(percent: f64, rng: &mut R) -> bool {
        let draw: u32 = rng.random_range(0..100);
        (draw as f64) < percent
    }
}
