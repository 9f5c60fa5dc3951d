// SPDX-License-Identifier: MIT OR Apache-2.0
//! The capability set the network graph consumes from a component system.

use crate::access::AccessGuard;
use crate::binding::{EntityKey, InstanceId};
use crate::component::{ComponentId, InstanceType};
use serde::{Deserialize, Serialize};

/// Structural change reported by a component system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentChange {
    /// A child was added to `parent`
    ChildAdded {
        /// Parent component
        parent: ComponentId,
        /// New child
        child: ComponentId,
    },
    /// A child was removed from `parent`
    ChildRemoved {
        /// Parent component
        parent: ComponentId,
        /// Removed child
        child: ComponentId,
    },
}

impl ComponentChange {
    /// Parent component affected by the change
    pub fn parent(&self) -> ComponentId {
        match self {
            Self::ChildAdded { parent, .. } | Self::ChildRemoved { parent, .. } => *parent,
        }
    }
}

/// Hierarchical component system the graph is synchronized with
pub trait ComponentSystem {
    /// Whether the component exists
    fn contains(&self, component: ComponentId) -> bool;

    /// Display name of a component
    fn name(&self, component: ComponentId) -> Option<&str>;

    /// Child components in slot order (empty for unknown components)
    fn children(&self, component: ComponentId) -> Vec<ComponentId>;

    /// Role of a component inside its parent
    fn instance_type(&self, component: ComponentId) -> Option<InstanceType>;

    /// Create a child component under `parent`
    fn add_child(
        &mut self,
        parent: ComponentId,
        slot: &str,
        instance_type: InstanceType,
    ) -> Result<ComponentId, ComponentError>;

    /// Remove `child` (and its subtree) from `parent`
    fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), ComponentError>;

    /// Bind an external entity to a component
    fn add_instance(&mut self, component: ComponentId, entity: EntityKey) -> Result<InstanceId, ComponentError>;

    /// Remove an instance binding
    fn remove_instance(&mut self, instance: InstanceId) -> Result<(), ComponentError>;

    /// Component an instance is bound to
    fn instance_component(&self, instance: InstanceId) -> Option<ComponentId>;

    /// Take every change recorded since the last call
    fn drain_changes(&mut self) -> Vec<ComponentChange>;

    /// Suspend access checks until the guard is dropped
    fn suspend_access_checks(&self) -> AccessGuard;
}

/// Error from a component system operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    /// Component not found
    #[error("Component not found: {0}")]
    UnknownComponent(ComponentId),

    /// Instance not found
    #[error("Instance not found: {0:?}")]
    UnknownInstance(InstanceId),

    /// Component is not a child of the given parent
    #[error("Component {child} is not a child of {parent}")]
    NotAChild {
        /// Expected parent
        parent: ComponentId,
        /// Component that was not found among its children
        child: ComponentId,
    },

    /// Component is read-only and access checks are enforced
    #[error("Component is read-only: {0}")]
    AccessDenied(ComponentId),
}
