use std::path::Path;

use crate::ai::network::NetworkConfig;
use crate::ai::ExplorationSchedule;
use crate::error::ConfigError;
use crate::export::ExportConfig;
use crate::training::population::{MutationConfig, PopulationConfig};
use crate::training::tournament::TournamentConfig;
use crate::training::trainer::TrainerConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub training: TrainerConfig,
    pub population: PopulationConfig,
    pub mutation: MutationConfig,
    pub tournament: TournamentConfig,
    pub network: NetworkConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::parse(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file without validating it, so callers can apply
    /// overrides before [`AppConfig::validate`] runs.
    pub fn parse(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Parse a TOML file, falling back to defaults if the file does not
    /// exist. The result is not validated.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::parse(path)
        } else {
            tracing::debug!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ExplorationSchedule::new(
            self.training.rounds,
            self.training.start_percent,
            self.training.stop_percent,
        )?;
        if self.training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }

        let agents = self.population.agents;
        if agents < 2 || agents % 2 != 0 {
            return Err(ConfigError::Validation(
                "population.agents must be an even number >= 2".into(),
            ));
        }
        if self.population.winners == 0 || self.population.winners >= agents {
            return Err(ConfigError::Validation(
                "population.winners must be in [1, population.agents)".into(),
            ));
        }

        if !(self.mutation.rate > 0.0 && self.mutation.rate <= 1.0) {
            return Err(ConfigError::Validation(
                "mutation.rate must be in (0, 1]".into(),
            ));
        }
        if !(self.mutation.scale > 0.0 && self.mutation.scale.is_finite()) {
            return Err(ConfigError::Validation(
                "mutation.scale must be > 0".into(),
            ));
        }
        if self.mutation.mutations() == 0 {
            return Err(ConfigError::Validation(
                "mutation.rate is too small to mutate any weight".into(),
            ));
        }

        if self.tournament.fights_per_agent == 0 {
            return Err(ConfigError::Validation(
                "tournament.fights_per_agent must be >= 1".into(),
            ));
        }

        if self.export.weights_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "export.weights_path must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Exploration schedule for the configured run.
    pub fn schedule(&self) -> Result<ExplorationSchedule, ConfigError> {
        ExplorationSchedule::new(
            self.training.rounds,
            self.training.start_percent,
            self.training.stop_percent,
        )
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
