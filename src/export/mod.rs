//! The only durable output of a run: the best agent's weights, plus an
//! optional JSON summary of how they were produced.

mod summary;
mod weights_file;

use std::path::PathBuf;

pub use summary::{write_summary, RunSummary};
pub use weights_file::{format_weights, parse_weights, read_weights, write_weights};

/// Where the results of a run are written.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub weights_path: PathBuf,
    pub summary_path: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            weights_path: PathBuf::from("weights.txt"),
            summary_path: None,
        }
    }
}
