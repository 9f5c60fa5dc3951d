// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory component tree.

use crate::access::{AccessChecks, AccessGuard};
use crate::binding::{EntityKey, Instance, InstanceId};
use crate::component::{ChildEntry, Component, ComponentId, InstanceType};
use crate::system::{ComponentChange, ComponentError, ComponentSystem};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A forest of components with instance bindings and a change feed
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ComponentTree {
    /// Components by ID
    components: IndexMap<ComponentId, Component>,
    /// Instance bindings by ID
    instances: IndexMap<InstanceId, Instance>,
    /// Changes not yet drained
    #[serde(skip)]
    changes: Vec<ComponentChange>,
    #[serde(skip)]
    access: AccessChecks,
}

impl Clone for ComponentTree {
    fn clone(&self) -> Self {
        // A clone gets its own access counter; guards on the original do not leak into it.
        Self {
            components: self.components.clone(),
            instances: self.instances.clone(),
            changes: self.changes.clone(),
            access: AccessChecks::new(),
        }
    }
}

impl ComponentTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root component
    pub fn create(&mut self, name: impl Into<String>, instance_type: InstanceType) -> ComponentId {
        let component = Component::new(name, instance_type);
        let id = component.id;
        self.components.insert(id, component);
        id
    }

    /// Create a named child component under `parent`
    pub fn insert_child(
        &mut self,
        parent: ComponentId,
        slot: impl Into<String>,
        name: impl Into<String>,
        instance_type: InstanceType,
    ) -> Result<ComponentId, ComponentError> {
        self.check_access(parent)?;

        let mut component = Component::new(name, instance_type);
        component.parent = Some(parent);
        let child = component.id;

        let parent_component = self
            .components
            .get_mut(&parent)
            .ok_or(ComponentError::UnknownComponent(parent))?;
        parent_component.children.push(ChildEntry {
            slot: slot.into(),
            component: child,
        });
        self.components.insert(child, component);
        self.changes.push(ComponentChange::ChildAdded { parent, child });

        tracing::trace!("Added component {child} under {parent}");
        Ok(child)
    }

    /// Get a component by ID
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Get all components
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Get the number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the tree has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Mark a component read-only (or writable again)
    pub fn set_read_only(&mut self, id: ComponentId, read_only: bool) -> Result<(), ComponentError> {
        let component = self
            .components
            .get_mut(&id)
            .ok_or(ComponentError::UnknownComponent(id))?;
        component.read_only = read_only;
        Ok(())
    }

    /// Get an instance binding by ID
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(&id)
    }

    /// Get every instance bound to a component
    pub fn instances_of(&self, component: ComponentId) -> impl Iterator<Item = &Instance> {
        self.instances.values().filter(move |i| i.component == component)
    }

    /// Get the number of instance bindings
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Changes recorded but not yet drained
    pub fn pending_changes(&self) -> &[ComponentChange] {
        &self.changes
    }

    fn check_access(&self, component: ComponentId) -> Result<(), ComponentError> {
        let component = self
            .components
            .get(&component)
            .ok_or(ComponentError::UnknownComponent(component))?;
        if component.read_only && self.access.enforced() {
            return Err(ComponentError::AccessDenied(component.id));
        }
        Ok(())
    }

    /// Remove a component, its subtree and every instance bound into it
    fn remove_subtree(&mut self, parent: ComponentId, root: ComponentId) {
        let mut stack = vec![(parent, root)];
        while let Some((parent, id)) = stack.pop() {
            let Some(component) = self.components.shift_remove(&id) else {
                continue;
            };
            self.instances.retain(|_, instance| instance.component != id);
            self.changes.push(ComponentChange::ChildRemoved { parent, child: id });
            // Reverse so children are visited in slot order
            stack.extend(component.children.iter().rev().map(|entry| (id, entry.component)));
        }
    }
}

impl ComponentSystem for ComponentTree {
    fn contains(&self, component: ComponentId) -> bool {
        self.components.contains_key(&component)
    }

    fn name(&self, component: ComponentId) -> Option<&str> {
        self.components.get(&component).map(|c| c.name.as_str())
    }

    fn children(&self, component: ComponentId) -> Vec<ComponentId> {
        self.components
            .get(&component)
            .map(|c| c.children.iter().map(|entry| entry.component).collect())
            .unwrap_or_default()
    }

    fn instance_type(&self, component: ComponentId) -> Option<InstanceType> {
        self.components.get(&component).map(|c| c.instance_type)
    }

    fn add_child(
        &mut self,
        parent: ComponentId,
        slot: &str,
        instance_type: InstanceType,
    ) -> Result<ComponentId, ComponentError> {
        self.insert_child(parent, slot, slot, instance_type)
    }

    fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), ComponentError> {
        self.check_access(parent)?;

        let parent_component = self
            .components
            .get_mut(&parent)
            .ok_or(ComponentError::UnknownComponent(parent))?;
        let index = parent_component
            .children
            .iter()
            .position(|entry| entry.component == child)
            .ok_or(ComponentError::NotAChild { parent, child })?;
        parent_component.children.remove(index);

        self.remove_subtree(parent, child);
        tracing::trace!("Removed component {child} from {parent}");
        Ok(())
    }

    fn add_instance(&mut self, component: ComponentId, entity: EntityKey) -> Result<InstanceId, ComponentError> {
        if !self.components.contains_key(&component) {
            return Err(ComponentError::UnknownComponent(component));
        }
        let instance = Instance::new(component, entity);
        let id = instance.id;
        self.instances.insert(id, instance);
        Ok(id)
    }

    fn remove_instance(&mut self, instance: InstanceId) -> Result<(), ComponentError> {
        self.instances
            .shift_remove(&instance)
            .map(|_| ())
            .ok_or(ComponentError::UnknownInstance(instance))
    }

    fn instance_component(&self, instance: InstanceId) -> Option<ComponentId> {
        self.instances.get(&instance).map(|i| i.component)
    }

    fn drain_changes(&mut self) -> Vec<ComponentChange> {
        std::mem::take(&mut self.changes)
    }

    fn suspend_access_checks(&self) -> AccessGuard {
        self.access.suspend()
    }
}
