// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structural change notifications.
//!
//! Every managed collection reports insertions and removals through
//! [`GraphEvent`]s delivered to the registered [`EventSink`]s. Events are sent
//! after the backing collection has been mutated and before the operation
//! returns, so a sink always observes a consistent graph.

use crate::id::Id;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Structural change in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphEvent {
    /// Element added to a network (`parent` is `None` for roots)
    ElementAdded {
        /// Owning network
        parent: Option<Id>,
        /// New element
        element: Id,
    },
    /// Element removed from a network
    ElementRemoved {
        /// Former owning network
        parent: Option<Id>,
        /// Former id of the element
        element: Id,
    },
    /// Port added to an element
    PortAdded {
        /// Owning element
        element: Id,
        /// New port
        port: Id,
    },
    /// Port removed from an element
    PortRemoved {
        /// Former owning element
        element: Id,
        /// Former id of the port
        port: Id,
    },
    /// Connector added to a network
    ConnectorAdded {
        /// Owning network
        network: Id,
        /// New connector
        connector: Id,
    },
    /// Connector removed from a network
    ConnectorRemoved {
        /// Former owning network
        network: Id,
        /// Former id of the connector
        connector: Id,
    },
    /// Element is about to be torn down
    ElementBeingDeleted {
        /// Element being deleted
        element: Id,
    },
    /// Element teardown finished
    ElementDeleted {
        /// Former id of the element
        element: Id,
    },
}

/// Error reported by an event sink
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Sink no longer accepts events
    #[error("Event sink closed")]
    Closed,

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

/// Receiver of structural change notifications
pub trait EventSink {
    /// Deliver one event
    fn send(&self, event: &GraphEvent) -> Result<(), EventError>;
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: &GraphEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// Sink that records events in memory
#[derive(Debug, Default)]
pub struct VecEventSink {
    events: Mutex<Vec<GraphEvent>>,
}

impl VecEventSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded events
    pub fn events(&self) -> Vec<GraphEvent> {
        self.events.lock().clone()
    }

    /// Take the recorded events, leaving the sink empty
    pub fn take(&self) -> Vec<GraphEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: &GraphEvent) -> Result<(), EventError> {
        self.events.lock().push(*event);
        Ok(())
    }
}

/// Opaque reference an external layer (e.g. geometry exchange) attaches to
/// elements, ports and connectors. Cleared when the object is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepresentationRef(pub String);

/// Registered sinks of a project
#[derive(Default)]
pub(crate) struct EventSinks(Vec<Arc<dyn EventSink>>);

impl EventSinks {
    pub(crate) fn push(&mut self, sink: Arc<dyn EventSink>) {
        self.0.push(sink);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    pub(crate) fn emit(&self, event: GraphEvent) {
        for sink in &self.0 {
            if let Err(err) = sink.send(&event) {
                tracing::warn!("Event sink rejected {event:?}: {err}");
            }
        }
    }
}

impl fmt::Debug for EventSinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSinks").field("len", &self.0.len()).finish()
    }
}
