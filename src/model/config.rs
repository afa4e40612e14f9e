use serde::{Deserialize, Serialize};

/// Configuration from arrange.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Id of the first process, which never moves and never trades subprocesses
    #[serde(default = "default_sentinel_id")]
    pub sentinel_id: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            sentinel_id: default_sentinel_id(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_sentinel_id() -> String {
    "single".to_string()
}

impl EngineConfig {
    pub fn sentinel_id(&self) -> &str {
        &self.tree.sentinel_id
    }

    /// Defaults with a different sentinel id
    pub fn with_sentinel(sentinel_id: &str) -> Self {
        EngineConfig {
            tree: TreeConfig {
                sentinel_id: sentinel_id.to_string(),
            },
            ..EngineConfig::default()
        }
    }
}
