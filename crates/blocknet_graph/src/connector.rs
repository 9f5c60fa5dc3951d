// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connector (edge) definitions for the graph.

use crate::collection::Owner;
use crate::error::{GraphError, Result};
use crate::events::RepresentationRef;
use crate::id::Id;

/// A directed edge between two ports
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    id: Id,
    source: Id,
    target: Id,
    owner: Option<Owner>,
    representation: Option<RepresentationRef>,
}

impl Connector {
    /// Create a new detached connector
    pub fn new(source: Id, target: Id) -> Self {
        Self {
            id: Id::EMPTY,
            source,
            target,
            owner: None,
            representation: None,
        }
    }

    /// Create a connector carrying an id restored by a parser
    pub fn parsed(id: Id, source: Id, target: Id) -> Result<Self> {
        if id.is_empty() {
            return Err(GraphError::EmptyId);
        }
        Ok(Self {
            id,
            ..Self::new(source, target)
        })
    }

    /// Connector ID (empty while detached)
    pub fn id(&self) -> Id {
        self.id
    }

    /// Source port
    pub fn source(&self) -> Id {
        self.source
    }

    /// Target port
    pub fn target(&self) -> Id {
        self.target
    }

    /// Network owning this connector
    pub fn parent_network(&self) -> Option<Id> {
        match self.owner {
            Some(Owner::Network(network)) => Some(network),
            _ => None,
        }
    }

    /// Check if this connector involves a specific port
    pub fn involves_port(&self, port: Id) -> bool {
        self.source == port || self.target == port
    }

    /// The endpoint opposite to `port`
    pub fn other_end(&self, port: Id) -> Option<Id> {
        if self.source == port {
            Some(self.target)
        } else if self.target == port {
            Some(self.source)
        } else {
            None
        }
    }

    /// External representation reference
    pub fn representation(&self) -> Option<&RepresentationRef> {
        self.representation.as_ref()
    }

    pub(crate) fn owner(&self) -> Option<Owner> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<Owner>) {
        self.owner = owner;
    }

    pub(crate) fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    pub(crate) fn set_representation(&mut self, representation: Option<RepresentationRef>) {
        self.representation = representation;
    }
}
