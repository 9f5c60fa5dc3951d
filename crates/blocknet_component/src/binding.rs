// SPDX-License-Identifier: MIT OR Apache-2.0
//! Instance bindings between graph entities and components.

use crate::component::ComponentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an instance binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    /// Create a new random instance ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque key of the external entity an instance is bound to.
///
/// The graph uses the display form of its element and port ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKey(pub String);

impl EntityKey {
    /// Create a key from anything displayable
    pub fn of(entity: impl fmt::Display) -> Self {
        Self(entity.to_string())
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binding of an external entity to a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance ID
    pub id: InstanceId,
    /// Component the entity is bound to
    pub component: ComponentId,
    /// Bound entity
    pub entity: EntityKey,
}

impl Instance {
    /// Create a binding of `entity` to `component`
    pub fn new(component: ComponentId, entity: EntityKey) -> Self {
        Self {
            id: InstanceId::new(),
            component,
            entity,
        }
    }
}
