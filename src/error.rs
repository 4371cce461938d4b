use std::collections::TryReserveError;
use std::path::PathBuf;

/// Errors that can occur while writing or reading exported weights.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid weight {value:?} at position {index}")]
    Parse { index: usize, value: String },

    #[error("expected {expected} weights, found {found}")]
    Length { expected: usize, found: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during training.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("agent {agent} selected illegal column {column} (legal: {legal:?})")]
    IllegalMove {
        agent: usize,
        column: usize,
        legal: Vec<usize>,
    },

    #[error("no legal move for agent {agent} on a board that is not full")]
    NoLegalMove { agent: usize },

    #[error("failed to allocate a population of {agents} agents: {source}")]
    Allocation {
        agents: usize,
        source: TryReserveError,
    },

    #[error("population is empty")]
    EmptyPopulation,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_display() {
        let err = ExportError::Length {
            expected: 833,
            found: 832,
        };
        assert_eq!(err.to_string(), "expected 833 weights, found 832");

        let err = ExportError::Parse {
            index: 4,
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "invalid weight \"abc\" at position 4");
    }

    #[test]
    fn test_training_error_display() {
        let err = TrainingError::IllegalMove {
            agent: 3,
            column: 5,
            legal: vec![0, 1, 2],
        };
        assert_eq!(
            err.to_string(),
            "agent 3 selected illegal column 5 (legal: [0, 1, 2])"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("stop_percent must be in [1, 100]".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: stop_percent must be in [1, 100]"
        );
    }
}
