// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history built on document snapshots.
//!
//! Every committed edit stores the serialized document before and after the
//! edit. Undo restores the `before` snapshots of a group in reverse order,
//! redo restores the `after` snapshots in order.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Default undo history depth
pub const MAX_HISTORY: usize = 100;

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Snapshot encoding error
    #[error("Snapshot error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Unique operation ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationID(u64);

impl OperationID {
    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Serialized document state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// bincode-encoded state
    pub data: Vec<u8>,
    /// Timestamp when snapshot was taken
    pub timestamp: u64,
}

impl StateSnapshot {
    /// Create a snapshot from raw bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            timestamp: now(),
        }
    }

    /// Create from serializable value
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self> {
        let data = bincode::serialize(value)?;
        Ok(Self::new(data))
    }

    /// Deserialize to value
    pub fn to_value<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether two snapshots encode the same state
    pub fn same_state(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

/// A single undoable edit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation ID
    pub id: OperationID,
    /// Human-readable description
    pub description: String,
    /// State before the edit
    pub before: StateSnapshot,
    /// State after the edit
    pub after: StateSnapshot,
}

impl Operation {
    /// Create a new operation
    pub fn new(id: OperationID, description: String, before: StateSnapshot, after: StateSnapshot) -> Self {
        Self {
            id,
            description,
            before,
            after,
        }
    }

    /// Get memory size of this operation
    pub fn memory_size(&self) -> usize {
        self.before.size() + self.after.size()
    }
}

/// Group of operations that are undone/redone together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationGroup {
    /// Group ID
    pub id: OperationID,
    /// Human-readable description
    pub description: String,
    /// Operations in this group
    pub operations: Vec<Operation>,
    /// Timestamp
    pub timestamp: u64,
}

impl OperationGroup {
    /// Create a new operation group
    pub fn new(id: OperationID, description: String) -> Self {
        Self {
            id,
            description,
            operations: Vec::new(),
            timestamp: now(),
        }
    }

    /// Add an operation to this group
    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Get total memory size of this group
    pub fn memory_size(&self) -> usize {
        self.operations.iter().map(Operation::memory_size).sum()
    }

    /// Snapshot to restore when undoing the group
    pub fn undo_state(&self) -> Option<&StateSnapshot> {
        self.operations.first().map(|op| &op.before)
    }

    /// Snapshot to restore when redoing the group
    pub fn redo_state(&self) -> Option<&StateSnapshot> {
        self.operations.last().map(|op| &op.after)
    }
}

/// History statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Groups in the undo stack
    pub undo_count: usize,
    /// Groups in the redo stack
    pub redo_count: usize,
    /// Bytes held by the undo stack
    pub memory_used: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<OperationGroup>,
    redo_stack: VecDeque<OperationGroup>,
    next_id: u64,
    max_depth: usize,
    memory_used: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            next_id: 1,
            max_depth,
            memory_used: 0,
        }
    }

    /// Allocate the ID of a new operation
    pub fn begin_operation(&mut self) -> OperationID {
        let id = OperationID(self.next_id);
        self.next_id += 1;
        id
    }

    /// Commit an operation group
    pub fn commit(&mut self, group: OperationGroup) {
        if group.operations.is_empty() {
            return;
        }

        self.redo_stack.clear();
        self.memory_used += group.memory_size();
        self.undo_stack.push_back(group);

        while self.undo_stack.len() > self.max_depth {
            if let Some(old_group) = self.undo_stack.pop_front() {
                self.memory_used = self.memory_used.saturating_sub(old_group.memory_size());
            }
        }
    }

    /// Undo the last group
    pub fn undo(&mut self) -> Result<OperationGroup> {
        let group = self
            .undo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToUndo)?;

        self.memory_used = self.memory_used.saturating_sub(group.memory_size());
        self.redo_stack.push_back(group.clone());

        Ok(group)
    }

    /// Redo the last undone group
    pub fn redo(&mut self) -> Result<OperationGroup> {
        let group = self
            .redo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToRedo)?;

        self.memory_used += group.memory_size();
        self.undo_stack.push_back(group.clone());

        Ok(group)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.memory_used = 0;
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            memory_used: self.memory_used,
            max_depth: self.max_depth,
        }
    }

    /// Get description of next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|g| g.description.as_str())
    }

    /// Get description of next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|g| g.description.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
