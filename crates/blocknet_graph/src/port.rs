// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for element inputs/outputs.

use crate::collection::Owner;
use crate::element::Binding;
use crate::error::{GraphError, Result};
use crate::events::RepresentationRef;
use crate::id::Id;
use blocknet_component::InstanceType;
use serde::{Deserialize, Serialize};

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

impl PortDirection {
    /// The other direction
    pub fn opposite(&self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }

    /// Direction of a port-typed sub-component, `None` for other roles
    pub fn from_instance_type(instance_type: InstanceType) -> Option<Self> {
        match instance_type {
            InstanceType::InPort => Some(Self::Input),
            InstanceType::OutPort => Some(Self::Output),
            InstanceType::Component | InstanceType::Parameter => None,
        }
    }

    /// Instance type of the sub-component mirroring a port of this direction
    pub fn instance_type(&self) -> InstanceType {
        match self {
            Self::Input => InstanceType::InPort,
            Self::Output => InstanceType::OutPort,
        }
    }
}

/// A port on a network element
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    id: Id,
    /// Port name
    pub name: String,
    direction: PortDirection,
    owner: Option<Owner>,
    binding: Option<Binding>,
    representation: Option<RepresentationRef>,
}

impl Port {
    /// Create a new detached port
    pub fn new(name: impl Into<String>, direction: PortDirection) -> Self {
        Self {
            id: Id::EMPTY,
            name: name.into(),
            direction,
            owner: None,
            binding: None,
            representation: None,
        }
    }

    /// Create a new input port
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, PortDirection::Input)
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>) -> Self {
        Self::new(name, PortDirection::Output)
    }

    /// Create a port carrying an id restored by a parser
    pub fn parsed(id: Id, name: impl Into<String>, direction: PortDirection) -> Result<Self> {
        if id.is_empty() {
            return Err(GraphError::EmptyId);
        }
        Ok(Self {
            id,
            ..Self::new(name, direction)
        })
    }

    /// Port ID (empty while detached)
    pub fn id(&self) -> Id {
        self.id
    }

    /// Port direction
    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    /// Element owning this port
    pub fn parent_element(&self) -> Option<Id> {
        match self.owner {
            Some(Owner::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Binding to a port-typed sub-component
    pub fn binding(&self) -> Option<Binding> {
        self.binding
    }

    /// Whether the port is bound to a sub-component
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// External representation reference
    pub fn representation(&self) -> Option<&RepresentationRef> {
        self.representation.as_ref()
    }

    /// Check if a sibling connection to another port is directionally valid
    pub fn can_connect(&self, other: &Port) -> bool {
        self.direction != other.direction
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

    pub(crate) fn set_binding(&mut self, binding: Option<Binding>) {
        self.binding = binding;
    }

    pub(crate) fn set_representation(&mut self, representation: Option<RepresentationRef>) {
        self.representation = representation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Scope;

    #[test]
    fn test_direction_mapping() {
        assert_eq!(
            PortDirection::from_instance_type(InstanceType::InPort),
            Some(PortDirection::Input)
        );
        assert_eq!(
            PortDirection::from_instance_type(InstanceType::OutPort),
            Some(PortDirection::Output)
        );
        assert_eq!(PortDirection::from_instance_type(InstanceType::Parameter), None);
        assert_eq!(PortDirection::Output.instance_type(), InstanceType::OutPort);
        assert_eq!(PortDirection::Input.opposite(), PortDirection::Output);
    }

    #[test]
    fn test_new_port_is_detached() {
        let port = Port::output("flow");
        assert!(port.id().is_empty());
        assert_eq!(port.parent_element(), None);
        assert!(!port.is_bound());
        assert!(port.can_connect(&Port::input("flow")));
        assert!(!port.can_connect(&Port::output("other")));
    }

    #[test]
    fn test_parsed_port_requires_id() {
        assert_eq!(
            Port::parsed(Id::EMPTY, "in", PortDirection::Input),
            Err(GraphError::EmptyId)
        );
        let id = Id::new(Scope::Port, 9);
        assert_eq!(Port::parsed(id, "in", PortDirection::Input).unwrap().id(), id);
    }
}
