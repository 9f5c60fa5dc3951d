// SPDX-License-Identifier: MIT OR Apache-2.0
//! Component definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub Uuid);

impl ComponentId {
    /// Create a new random component ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a component inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceType {
    /// Regular component (block, assembly, part)
    Component,
    /// Input port of the parent component
    InPort,
    /// Output port of the parent component
    OutPort,
    /// Parameter of the parent component
    Parameter,
}

impl InstanceType {
    /// Whether this is one of the two port roles
    pub fn is_port(&self) -> bool {
        matches!(self, Self::InPort | Self::OutPort)
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Component => "Component",
            Self::InPort => "InPort",
            Self::OutPort => "OutPort",
            Self::Parameter => "Parameter",
        }
    }
}

/// Child entry of a component: a slot wrapping a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildEntry {
    /// Slot name within the parent
    pub slot: String,
    /// Wrapped component
    pub component: ComponentId,
}

/// A component in the tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Unique component ID
    pub id: ComponentId,
    /// Display name
    pub name: String,
    /// Role inside the parent
    pub instance_type: InstanceType,
    /// Parent component, `None` for roots
    pub parent: Option<ComponentId>,
    /// Ordered child entries
    pub children: Vec<ChildEntry>,
    /// Whether child edits require suspended access checks
    pub read_only: bool,
}

impl Component {
    /// Create a detached component
    pub fn new(name: impl Into<String>, instance_type: InstanceType) -> Self {
        Self {
            id: ComponentId::new(),
            name: name.into(),
            instance_type,
            parent: None,
            children: Vec::new(),
            read_only: false,
        }
    }

    /// Find the child entry wrapping `child`
    pub fn child_entry(&self, child: ComponentId) -> Option<&ChildEntry> {
        self.children.iter().find(|entry| entry.component == child)
    }
}
