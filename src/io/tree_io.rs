use std::fs;
use std::path::{Path, PathBuf};

use crate::model::tree::Tree;

/// Error type for reading an initial tree
#[derive(Debug, thiserror::Error)]
pub enum TreeIoError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path} as TOML: {source}")]
    TomlError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not parse {path} as JSON: {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize tree: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Serialization format of a tree file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Toml,
    Json,
}

impl TreeFormat {
    /// `.json` files are JSON; everything else is read as TOML.
    pub fn for_path(path: &Path) -> TreeFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TreeFormat::Json,
            _ => TreeFormat::Toml,
        }
    }
}

/// Load the initial tree from a `.toml` or `.json` file.
pub fn read_tree(path: &Path) -> Result<Tree, TreeIoError> {
    let text = fs::read_to_string(path).map_err(|e| TreeIoError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_tree(&text, TreeFormat::for_path(path), path)
}

pub fn parse_tree(text: &str, format: TreeFormat, origin: &Path) -> Result<Tree, TreeIoError> {
    match format {
        TreeFormat::Toml => toml::from_str(text).map_err(|e| TreeIoError::TomlError {
            path: origin.to_path_buf(),
            source: e,
        }),
        TreeFormat::Json => serde_json::from_str(text).map_err(|e| TreeIoError::JsonError {
            path: origin.to_path_buf(),
            source: e,
        }),
    }
}

/// Render a tree as TOML text, in the same shape `read_tree` accepts.
pub fn tree_to_toml(tree: &Tree) -> Result<String, TreeIoError> {
    Ok(toml::to_string_pretty(tree)?)
}
