// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor error type.

use crate::commands::CommandError;
use crate::history::HistoryError;
use blocknet_graph::GraphError;

/// Error from an editor operation
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// RON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Graph operation failed while restoring a document
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Undo/redo failed
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Command failed
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// File was written by a newer format version
    #[error("{kind} version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// What kind of file was read
        kind: &'static str,
        /// Version found in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },

    /// No document path is set
    #[error("No document path set")]
    NoPath,

    /// Tracing could not be initialized
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
