use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::episode::{derive_seed, MatchContext, INIT_STREAM, REPRODUCTION_STREAM};
use super::metrics::{GenerationSummary, TrainingMetrics};
use super::population::Population;
use super::tournament::{GenerationContext, Tournament};
use crate::ai::{Agent, ExplorationSchedule};
use crate::config::AppConfig;
use crate::error::{ConfigError, TrainingError};

/// Trainer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Generations to run.
    pub rounds: usize,
    /// Exploration percentage at generation zero.
    pub start_percent: u32,
    /// Percentage of `rounds` after which exploration has decayed to zero.
    pub stop_percent: u32,
    /// Base seed; drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Play the matches of a sub-round on the rayon pool.
    pub parallel: bool,
    /// Generations between progress log lines.
    pub log_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            rounds: 100,
            start_percent: 50,
            stop_percent: 50,
            seed: None,
            parallel: false,
            log_interval: 10,
        }
    }
}

/// What a finished run hands back to the caller.
#[derive(Debug)]
pub struct TrainingOutcome {
    /// Top-ranked agent of the last scored generation, with its fitness.
    pub best: Agent,
    /// The population produced by the final reproduction step.
    pub population: Population,
    pub metrics: TrainingMetrics,
    /// Base seed the run used, so it can be reproduced.
    pub seed: u64,
}

/// Generational trainer: score, select, reproduce, repeat.
pub struct Trainer {
    config: AppConfig,
    schedule: ExplorationSchedule,
    tournament: Box<dyn Tournament>,
    seed: u64,
}

impl Trainer {
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let schedule = config.schedule()?;
        let tournament = config.tournament.build(config.population.winners);
        let seed = config.training.seed.unwrap_or_else(rand::random);
        Ok(Trainer {
            config,
            schedule,
            tournament,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rounds(&self) -> usize {
        self.schedule.rounds()
    }

    /// Run the full training loop.
    pub fn train(&self) -> Result<TrainingOutcome, TrainingError> {
        self.train_with(|_| {})
    }

    /// Run the full training loop, calling `on_generation` after each
    /// generation is scored.
    pub fn train_with<F>(&self, mut on_generation: F) -> Result<TrainingOutcome, TrainingError>
    where
        F: FnMut(&GenerationSummary),
    {
        let rounds = self.schedule.rounds();
        let mut metrics = TrainingMetrics::with_capacity(rounds.min(1000));

        info!(
            seed = self.seed,
            rounds,
            agents = self.config.population.agents,
            winners = self.config.population.winners,
            tournament = self.tournament.name(),
            "starting training"
        );

        let mut rng = StdRng::seed_from_u64(derive_seed(self.seed, &[INIT_STREAM]));
        let mut population = Population::random(&self.config.population, &mut rng)?;
        let mut best = None;

        for round in 0..rounds {
            let explore_percent = self.schedule.percent(round);
            let context = GenerationContext {
                generation: round,
                base_seed: self.seed,
                parallel: self.config.training.parallel,
                matches: MatchContext {
                    explore_percent,
                    activation: self.config.network.activation,
                },
            };

            let report = self.tournament.run(population.agents_mut(), &context)?;
            let champion = *report.ranking.first().ok_or(TrainingError::EmptyPopulation)?;

            let summary =
                GenerationSummary::new(round, explore_percent, &report.results, population.agents());
            debug!(
                generation = round,
                ranking = ?report.ranking,
                "generation ranked"
            );
            if (round + 1) % self.config.training.log_interval == 0 || round + 1 == rounds {
                info!(
                    "Generation {}/{} | explore: {:.1}% | best: {} | mean: {:.2} | first-player wins: {}/{} | ties: {} | avg_len: {:.1}",
                    round + 1,
                    rounds,
                    summary.explore_percent,
                    summary.best_fitness,
                    summary.mean_fitness,
                    summary.first_player_wins,
                    summary.matches,
                    summary.ties,
                    summary.average_game_length,
                );
            }
            on_generation(&summary);
            metrics.record_generation(summary);

            best = Some(population.agents()[champion].clone());

            let mut rng =
                StdRng::seed_from_u64(derive_seed(self.seed, &[REPRODUCTION_STREAM, round as u64]));
            population = population.next_generation(
                &report.ranking,
                &self.config.population,
                &self.config.mutation,
                &mut rng,
            )?;
        }

        let best = best.ok_or(TrainingError::EmptyPopulation)?;
        let window = self.config.training.log_interval;
        info!(
            generations = metrics.total_generations(),
            best_fitness = best.fitness(),
            first_player_win_rate = metrics.first_player_win_rate(window),
            tie_rate = metrics.tie_rate(window),
            average_game_length = metrics.average_game_length(window),
            "training complete"
        );

        Ok(TrainingOutcome {
            best,
            population,
            metrics,
            seed: self.seed,
        })
    }
}
