// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration.
//!
//! Stored as RON next to the documents it applies to:
//! - history depth
//! - default log filter
//! - default names for new elements
//! - recently opened documents

use crate::document::check_version;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "blocknet.ron";

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Format version
    pub version: u32,
    /// Maximum number of undoable edits
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    /// Default tracing directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Name given to new blocks
    #[serde(default = "default_block_name")]
    pub default_block_name: String,
    /// Name given to new networks
    #[serde(default = "default_network_name")]
    pub default_network_name: String,
    /// Maximum number of remembered documents
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
    /// Recently opened documents, newest first
    #[serde(default)]
    pub recent_documents: Vec<PathBuf>,
}

fn default_history_depth() -> usize {
    crate::history::MAX_HISTORY
}

fn default_log_filter() -> String {
    "blocknet=info".to_string()
}

fn default_block_name() -> String {
    "Block".to_string()
}

fn default_network_name() -> String {
    "Network".to_string()
}

fn default_max_recent() -> usize {
    10
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            history_depth: default_history_depth(),
            log_filter: default_log_filter(),
            default_block_name: default_block_name(),
            default_network_name: default_network_name(),
            max_recent: default_max_recent(),
            recent_documents: Vec::new(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EditorConfig = ron::from_str(&content)?;
        check_version("Config", config.version, CONFIG_FORMAT_VERSION)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the config file path for a directory
    pub fn config_file_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Remember a document, moving it to the front of the recent list
    pub fn add_recent(&mut self, path: PathBuf) {
        self.recent_documents.retain(|p| p != &path);
        self.recent_documents.insert(0, path);
        self.recent_documents.truncate(self.max_recent);
    }
}
