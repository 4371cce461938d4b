use std::fs;
use std::path::{Path, PathBuf};

use crate::ai::{Network, TOTAL_WEIGHTS};
use crate::error::ExportError;

/// Render weights as comma-terminated decimals: `w0,w1,...,wn,` with no
/// newline. Each value uses the shortest representation that parses back to
/// the same `f64`.
pub fn format_weights(weights: &[f64]) -> String {
    let mut out = String::with_capacity(weights.len() * 24);
    for w in weights {
        out.push_str(&w.to_string());
        out.push(',');
    }
    out
}

/// Parse the weight-file format. A trailing comma and surrounding
/// whitespace are accepted; empty fields elsewhere are not.
pub fn parse_weights(text: &str) -> Result<Vec<f64>, ExportError> {
    let text = text.trim();
    let body = text.strip_suffix(',').unwrap_or(text);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    body.split(',')
        .enumerate()
        .map(|(index, field)| {
            let field = field.trim();
            field
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite())
                .ok_or_else(|| ExportError::Parse {
                    index,
                    value: field.to_string(),
                })
        })
        .collect()
}

/// Write weights to `path` through a temporary file and a rename, so a
/// failed write never leaves a truncated file behind.
pub fn write_weights(path: &Path, weights: &[f64]) -> Result<(), ExportError> {
    let tmp_path = temporary_path(path);
    fs::write(&tmp_path, format_weights(weights)).map_err(|source| ExportError::Write {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a weight file back into a network, checking its length.
pub fn read_weights(path: &Path) -> Result<Network, ExportError> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let weights = parse_weights(&text)?;
    Network::from_weights(&weights).ok_or(ExportError::Length {
        expected: TOTAL_WEIGHTS,
        found: weights.len(),
    })
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
