// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor state management.
//!
//! This module contains the core editor state: the open project, selection,
//! undo/redo history and document bookkeeping.

use crate::commands::{DeleteCommand, EditorCommand};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::{EditorError, Result};
use crate::history::{History, Operation, OperationGroup, StateSnapshot};
use blocknet_graph::{EventSink, Id, Project};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Selection mode for multi-select operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// Replace current selection
    #[default]
    Set,
    /// Add to current selection
    Add,
    /// Remove from current selection
    Remove,
    /// Toggle in current selection
    Toggle,
}

/// Selected graph objects, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<Id>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an object is selected
    pub fn contains(&self, id: Id) -> bool {
        self.ids.contains(&id)
    }

    /// Apply a selection gesture
    pub fn select(&mut self, id: Id, mode: SelectMode) {
        match mode {
            SelectMode::Set => {
                self.ids.clear();
                self.ids.push(id);
            }
            SelectMode::Add => {
                if !self.contains(id) {
                    self.ids.push(id);
                }
            }
            SelectMode::Remove => self.ids.retain(|s| *s != id),
            SelectMode::Toggle => {
                if self.contains(id) {
                    self.ids.retain(|s| *s != id);
                } else {
                    self.ids.push(id);
                }
            }
        }
    }

    /// Drop ids that `keep` rejects
    pub fn retain(&mut self, keep: impl FnMut(&Id) -> bool) {
        self.ids.retain(keep);
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Check if selection is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of selected objects
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Most recently selected object
    pub fn primary(&self) -> Option<Id> {
        self.ids.last().copied()
    }
}

/// Main editor state
pub struct EditorState {
    /// The open project
    pub project: Project,

    /// Current selection
    pub selection: Selection,

    /// Undo/redo history
    pub history: History,

    /// Editor configuration
    pub config: EditorConfig,

    /// Document name
    pub name: String,

    /// Current document path
    pub path: Option<PathBuf>,

    /// Whether the document has unsaved changes
    pub dirty: bool,

    /// Sinks re-attached whenever the project is rebuilt
    sinks: Vec<Arc<dyn EventSink>>,
}

impl EditorState {
    /// Create an editor state with an empty document
    pub fn new(config: EditorConfig) -> Self {
        Self {
            project: Project::default(),
            selection: Selection::new(),
            history: History::with_max_depth(config.history_depth),
            config,
            name: "Untitled".to_string(),
            path: None,
            dirty: false,
            sinks: Vec::new(),
        }
    }

    /// Register an event sink on the project, now and after every undo, redo or open
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.project.subscribe(Arc::clone(&sink));
        self.sinks.push(sink);
    }

    /// Start a new empty document
    pub fn new_document(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.install(Project::default());
        self.history.clear();
        self.path = None;
        self.dirty = false;
        tracing::info!("Created new document '{}'", self.name);
    }

    /// Execute a command and record it for undo.
    ///
    /// A failing command leaves the project as it was. Commands that change
    /// nothing are not recorded.
    pub fn execute(&mut self, command: &dyn EditorCommand) -> Result<Option<Id>> {
        let before = self.snapshot()?;
        let created = match command.execute(&mut self.project) {
            Ok(created) => created,
            Err(err) => {
                tracing::debug!("Command '{}' failed: {err}", command.description());
                self.restore(&before)?;
                return Err(err.into());
            }
        };
        let after = self.snapshot()?;
        if before.same_state(&after) {
            return Ok(created);
        }

        let description = command.description();
        let id = self.history.begin_operation();
        let mut group = OperationGroup::new(id, description.clone());
        group.add_operation(Operation::new(id, description, before, after));
        self.history.commit(group);
        self.dirty = true;
        Ok(created)
    }

    /// Delete the selected objects as one undoable edit
    pub fn delete_selection(&mut self) -> Result<()> {
        if self.selection.is_empty() {
            return Ok(());
        }
        let command = DeleteCommand {
            targets: self.selection.ids().to_vec(),
        };
        self.execute(&command)?;
        self.selection.clear();
        Ok(())
    }

    /// Undo the last edit, returning its description
    pub fn undo(&mut self) -> Result<String> {
        let group = self.history.undo()?;
        if let Some(state) = group.undo_state() {
            self.restore(state)?;
        }
        self.dirty = true;
        tracing::debug!("Undid '{}'", group.description);
        Ok(group.description)
    }

    /// Redo the last undone edit, returning its description
    pub fn redo(&mut self) -> Result<String> {
        let group = self.history.redo()?;
        if let Some(state) = group.redo_state() {
            self.restore(state)?;
        }
        self.dirty = true;
        tracing::debug!("Redid '{}'", group.description);
        Ok(group.description)
    }

    /// Save the document to its current path
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(EditorError::NoPath)?;
        self.save_as(&path)
    }

    /// Save the document to a specific path
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        Document::capture(&self.project, &self.name).save(path)?;
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        self.config.add_recent(path.to_path_buf());
        Ok(())
    }

    /// Open a document from a file
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let document = Document::load(path)?;
        let project = document.restore()?;

        self.name = document.name;
        self.install(project);
        self.history.clear();
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        self.config.add_recent(path.to_path_buf());
        Ok(())
    }

    /// Check if the document has unsaved changes
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    fn snapshot(&self) -> Result<StateSnapshot> {
        Ok(StateSnapshot::from_value(&Document::capture(&self.project, &self.name))?)
    }

    fn restore(&mut self, snapshot: &StateSnapshot) -> Result<()> {
        let document: Document = snapshot.to_value()?;
        self.install(document.restore()?);
        Ok(())
    }

    fn install(&mut self, mut project: Project) {
        for sink in &self.sinks {
            project.subscribe(Arc::clone(sink));
        }
        self.project = project;
        let registry = self.project.registry();
        self.selection.retain(|id| registry.contains(*id));
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
