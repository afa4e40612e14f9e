use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::EngineConfig;

pub const CONFIG_FILE: &str = "arrange.toml";

/// Error type for reading arrange.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read a config file. Missing keys fall back to defaults.
pub fn read_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Resolve the config: an explicit path must exist; otherwise
/// `arrange.toml` in `dir` is used if present, else defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<EngineConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let candidate = dir.join(CONFIG_FILE);
    if candidate.is_file() {
        read_config(&candidate)
    } else {
        Ok(EngineConfig::default())
    }
}
