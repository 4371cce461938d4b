use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::ai::Activation;
use crate::config::AppConfig;
use crate::error::ExportError;
use crate::training::tournament::TournamentKind;
use crate::training::trainer::TrainingOutcome;

/// How a run was configured and how its best agent scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: u64,
    pub seed: u64,
    pub rounds: usize,
    pub start_percent: u32,
    pub stop_percent: u32,
    pub agents: usize,
    pub winners: usize,
    pub tournament: TournamentKind,
    pub activation: Activation,
    pub mutation_rate: f64,
    pub mutation_scale: f64,
    pub mutation_clamp: bool,
    pub best_fitness: u32,
    pub final_first_player_win_rate: f32,
    pub final_tie_rate: f32,
}

impl RunSummary {
    pub fn new(config: &AppConfig, outcome: &TrainingOutcome) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        RunSummary {
            timestamp,
            seed: outcome.seed,
            rounds: config.training.rounds,
            start_percent: config.training.start_percent,
            stop_percent: config.training.stop_percent,
            agents: config.population.agents,
            winners: config.population.winners,
            tournament: config.tournament.kind,
            activation: config.network.activation,
            mutation_rate: config.mutation.rate,
            mutation_scale: config.mutation.scale,
            mutation_clamp: config.mutation.clamp,
            best_fitness: outcome.best.fitness(),
            final_first_player_win_rate: outcome.metrics.first_player_win_rate(1),
            final_tie_rate: outcome.metrics.tie_rate(1),
        }
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
