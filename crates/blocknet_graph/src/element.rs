// SPDX-License-Identifier: MIT OR Apache-2.0
//! Network elements: blocks and networks.

use crate::collection::{ManagedCollection, Owner};
use crate::error::{GraphError, Result};
use crate::events::RepresentationRef;
use crate::id::{Id, ObjectKind};
use blocknet_component::{ComponentId, InstanceId};
use serde::{Deserialize, Serialize};

/// Binding of a block or port to a component through an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Instance created in the component system
    pub instance: InstanceId,
    /// Component the instance belongs to
    pub component: ComponentId,
}

/// Synchronizer state of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BindingState {
    /// Reacting to component changes
    #[default]
    Idle,
    /// A whole component is being bound; incremental reactions are suppressed
    BulkBinding,
    /// The binding or the block itself is being torn down
    TearingDown,
}

/// Block-specific data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockData {
    binding: Option<Binding>,
    state: BindingState,
}

/// Network-specific data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkData {
    elements: ManagedCollection,
    connectors: ManagedCollection,
}

/// Concrete kind of an element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Leaf node, optionally bound to a component
    Block(BlockData),
    /// Composite node owning nested elements and connectors
    Network(NetworkData),
}

/// A node of the network graph
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkElement {
    id: Id,
    /// Display name
    pub name: String,
    /// Position in the editor layout
    pub position: [f32; 2],
    owner: Option<Owner>,
    ports: ManagedCollection,
    kind: ElementKind,
    representation: Option<RepresentationRef>,
}

impl NetworkElement {
    fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: Id::EMPTY,
            name: name.into(),
            position: [0.0, 0.0],
            owner: None,
            ports: ManagedCollection::default(),
            kind,
            representation: None,
        }
    }

    /// Create a detached block
    pub fn block(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Block(BlockData::default()))
    }

    /// Create a detached, empty network
    pub fn network(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Network(NetworkData::default()))
    }

    /// Create a block carrying an id restored by a parser
    pub fn parsed_block(id: Id, name: impl Into<String>) -> Result<Self> {
        Self::parsed(id, Self::block(name))
    }

    /// Create a network carrying an id restored by a parser
    pub fn parsed_network(id: Id, name: impl Into<String>) -> Result<Self> {
        Self::parsed(id, Self::network(name))
    }

    fn parsed(id: Id, mut element: Self) -> Result<Self> {
        if id.is_empty() {
            return Err(GraphError::EmptyId);
        }
        element.id = id;
        Ok(element)
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Element ID (empty while detached)
    pub fn id(&self) -> Id {
        self.id
    }

    /// Kind of registered object
    pub fn object_kind(&self) -> ObjectKind {
        match self.kind {
            ElementKind::Block(_) => ObjectKind::Block,
            ElementKind::Network(_) => ObjectKind::Network,
        }
    }

    /// Concrete kind
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Whether this is a block
    pub fn is_block(&self) -> bool {
        matches!(self.kind, ElementKind::Block(_))
    }

    /// Whether this is a network
    pub fn is_network(&self) -> bool {
        matches!(self.kind, ElementKind::Network(_))
    }

    /// Network containing this element, `None` for roots and detached elements
    pub fn parent_network(&self) -> Option<Id> {
        match self.owner {
            Some(Owner::Network(network)) => Some(network),
            _ => None,
        }
    }

    /// Whether this element is a top-level network
    pub fn is_root(&self) -> bool {
        self.owner == Some(Owner::Roots)
    }

    /// Ports in insertion order
    pub fn ports(&self) -> &[Id] {
        self.ports.as_slice()
    }

    /// Component binding of a block
    pub fn binding(&self) -> Option<Binding> {
        match &self.kind {
            ElementKind::Block(block) => block.binding,
            ElementKind::Network(_) => None,
        }
    }

    /// Synchronizer state of a block (`Idle` for networks)
    pub fn binding_state(&self) -> BindingState {
        match &self.kind {
            ElementKind::Block(block) => block.state,
            ElementKind::Network(_) => BindingState::Idle,
        }
    }

    /// Elements contained in a network (empty for blocks)
    pub fn contained_elements(&self) -> &[Id] {
        match &self.kind {
            ElementKind::Network(network) => network.elements.as_slice(),
            ElementKind::Block(_) => &[],
        }
    }

    /// Connectors contained in a network (empty for blocks)
    pub fn contained_connectors(&self) -> &[Id] {
        match &self.kind {
            ElementKind::Network(network) => network.connectors.as_slice(),
            ElementKind::Block(_) => &[],
        }
    }

    /// External representation reference
    pub fn representation(&self) -> Option<&RepresentationRef> {
        self.representation.as_ref()
    }

    /// Whether ports, elements or connectors are still attached
    pub(crate) fn carries_members(&self) -> bool {
        !self.ports.is_empty()
            || !self.contained_elements().is_empty()
            || !self.contained_connectors().is_empty()
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

    pub(crate) fn ports_mut(&mut self) -> &mut ManagedCollection {
        &mut self.ports
    }

    pub(crate) fn elements_mut(&mut self) -> Option<&mut ManagedCollection> {
        match &mut self.kind {
            ElementKind::Network(network) => Some(&mut network.elements),
            ElementKind::Block(_) => None,
        }
    }

    pub(crate) fn connectors_mut(&mut self) -> Option<&mut ManagedCollection> {
        match &mut self.kind {
            ElementKind::Network(network) => Some(&mut network.connectors),
            ElementKind::Block(_) => None,
        }
    }

    pub(crate) fn set_binding(&mut self, binding: Option<Binding>) {
        if let ElementKind::Block(block) = &mut self.kind {
            block.binding = binding;
        }
    }

    pub(crate) fn set_binding_state(&mut self, state: BindingState) {
        if let ElementKind::Block(block) = &mut self.kind {
            block.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Scope;

    #[test]
    fn test_block_creation() {
        let block = NetworkElement::block("Pump").with_position(10.0, 20.0);
        assert_eq!(block.name, "Pump");
        assert_eq!(block.position, [10.0, 20.0]);
        assert!(block.id().is_empty());
        assert!(block.is_block());
        assert_eq!(block.object_kind(), ObjectKind::Block);
        assert!(block.contained_elements().is_empty());
        assert_eq!(block.binding_state(), BindingState::Idle);
        assert!(!block.carries_members());
    }

    #[test]
    fn test_parsed_network() {
        let id = Id::new(Scope::Element, 4);
        let network = NetworkElement::parsed_network(id, "Plant").unwrap();
        assert_eq!(network.id(), id);
        assert!(network.is_network());
        assert_eq!(network.parent_network(), None);
        assert!(!network.is_root());

        assert_eq!(
            NetworkElement::parsed_block(Id::EMPTY, "Pump"),
            Err(GraphError::EmptyId)
        );
    }
}
