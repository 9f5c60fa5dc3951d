// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blocknet editor shell.
//!
//! The outer layer around the `blocknet_graph` core:
//! - RON documents that round-trip ids and topology
//! - Editor commands with snapshot-based undo/redo
//! - Editor configuration and tracing setup
//!
//! ## Architecture
//!
//! [`EditorState`] owns the open [`blocknet_graph::Project`]. Every edit goes
//! through [`EditorState::execute`] with an [`EditorCommand`]; the document is
//! captured before and after the command and the pair is pushed onto the
//! [`History`].

pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod logging;
pub mod outline;
pub mod state;

pub use commands::{CommandError, EditorCommand};
pub use config::EditorConfig;
pub use document::Document;
pub use error::{EditorError, Result};
pub use history::{History, HistoryError};
pub use logging::init_tracing;
pub use outline::outline;
pub use state::{EditorState, SelectMode, Selection};
