// SPDX-License-Identifier: MIT OR Apache-2.0
//! Block/component synchronizer.
//!
//! A bound block keeps its ports in lock-step with the port-typed
//! sub-components of its component: every port carrying a binding maps to
//! exactly one `InPort`/`OutPort` child and vice versa.
//!
//! Graph-side edits (binding, unbinding, removing bound ports, deleting
//! blocks) update the component system directly. Component-side edits are
//! picked up from the change feed by [`Project::sync_components`], which
//! reconciles every idle block bound to an affected component.

use crate::element::{Binding, BindingState};
use crate::error::{GraphError, Result};
use crate::id::Id;
use crate::port::{Port, PortDirection};
use crate::project::Project;
use blocknet_component::{ComponentChange, ComponentError, ComponentId, ComponentSystem, EntityKey, InstanceType};
use std::collections::BTreeSet;

impl<C: ComponentSystem> Project<C> {
    /// Port-typed children of a component in slot order
    fn port_children(&self, component: ComponentId) -> Vec<(ComponentId, PortDirection)> {
        self.components
            .children(component)
            .into_iter()
            .filter_map(|child| {
                let direction = self
                    .components
                    .instance_type(child)
                    .and_then(PortDirection::from_instance_type)?;
                Some((child, direction))
            })
            .collect()
    }

    fn set_state(&mut self, block: Id, state: BindingState) {
        if let Some(element) = self.elements.get_mut(&block) {
            element.set_binding_state(state);
        }
    }

    /// Create an instance for `port` on `component` and record the binding
    fn bind_port(&mut self, port: Id, component: ComponentId) -> Result<()> {
        let instance = self.components.add_instance(component, EntityKey::of(port))?;
        if let Some(p) = self.ports.get_mut(&port) {
            p.set_binding(Some(Binding { instance, component }));
        }
        Ok(())
    }

    /// Bind a block to a component.
    ///
    /// If the component already has port-typed children, one port is created
    /// per child. Otherwise one child is created per unbound port of the block.
    pub fn bind_component(&mut self, block: Id, component: ComponentId) -> Result<()> {
        if self.require_block(block)?.binding().is_some() {
            return Err(GraphError::AlreadyBound(block));
        }
        if !self.components.contains(component) {
            return Err(ComponentError::UnknownComponent(component).into());
        }

        self.set_state(block, BindingState::BulkBinding);
        let result = self.bind_bulk(block, component);
        self.set_state(block, BindingState::Idle);
        result?;

        tracing::debug!("Bound {block} to component {component}");
        self.sync_components();
        Ok(())
    }

    fn bind_bulk(&mut self, block: Id, component: ComponentId) -> Result<()> {
        let _guard = self.components.suspend_access_checks();
        let instance = self.components.add_instance(component, EntityKey::of(block))?;
        if let Some(element) = self.elements.get_mut(&block) {
            element.set_binding(Some(Binding { instance, component }));
        }

        let children = self.port_children(component);
        if children.is_empty() {
            let unbound: Vec<(Id, String, PortDirection)> = self
                .require_block(block)?
                .ports()
                .iter()
                .filter_map(|id| self.ports.get(id))
                .filter(|port| !port.is_bound())
                .map(|port| (port.id(), port.name.clone(), port.direction()))
                .collect();
            for (port, name, direction) in unbound {
                let child = self
                    .components
                    .add_child(component, &name, direction.instance_type())?;
                self.bind_port(port, child)?;
            }
        } else {
            for (child, direction) in children {
                let name = self.components.name(child).unwrap_or("port").to_string();
                let port = self.add_port(block, Port::new(name, direction))?;
                self.bind_port(port, child)?;
            }
        }
        Ok(())
    }

    /// Unbind a block from its component.
    ///
    /// Ports survive but lose their bindings; the sub-components they were
    /// bound to are removed from the component. Returns the former binding.
    pub fn unbind_component(&mut self, block: Id) -> Result<Option<Binding>> {
        let Some(binding) = self.require_block(block)?.binding() else {
            return Ok(None);
        };

        self.set_state(block, BindingState::TearingDown);
        {
            let _guard = self.components.suspend_access_checks();
            let ports = self.require_block(block)?.ports().to_vec();
            for port in ports {
                let Some(port_binding) = self.ports.get(&port).and_then(Port::binding) else {
                    continue;
                };
                self.release_instance(port_binding);
                if self.components.children(binding.component).contains(&port_binding.component) {
                    if let Err(err) = self.components.remove_child(binding.component, port_binding.component) {
                        tracing::warn!("Failed to remove sub-component of {port}: {err}");
                    }
                }
                if let Some(p) = self.ports.get_mut(&port) {
                    p.set_binding(None);
                }
            }
            self.release_instance(binding);
        }
        if let Some(element) = self.elements.get_mut(&block) {
            element.set_binding(None);
            element.set_binding_state(BindingState::Idle);
        }

        tracing::debug!("Unbound {block} from component {}", binding.component);
        self.sync_components();
        Ok(Some(binding))
    }

    fn release_instance(&mut self, binding: Binding) {
        if self.components.instance_component(binding.instance).is_none() {
            return;
        }
        if let Err(err) = self.components.remove_instance(binding.instance) {
            tracing::warn!("Failed to remove instance of {}: {err}", binding.component);
        }
    }

    /// Drop the block's instance and every port instance ahead of deletion.
    ///
    /// The component's sub-components are kept.
    pub(crate) fn release_bindings(&mut self, element: Id) {
        let Some(binding) = self.elements.get(&element).and_then(|e| e.binding()) else {
            return;
        };
        self.set_state(element, BindingState::TearingDown);

        let _guard = self.components.suspend_access_checks();
        let ports = self
            .elements
            .get(&element)
            .map(|e| e.ports().to_vec())
            .unwrap_or_default();
        for port in ports {
            if let Some(port_binding) = self.ports.get(&port).and_then(Port::binding) {
                self.release_instance(port_binding);
            }
            if let Some(p) = self.ports.get_mut(&port) {
                p.set_binding(None);
            }
        }
        self.release_instance(binding);
        if let Some(e) = self.elements.get_mut(&element) {
            e.set_binding(None);
        }
        tracing::debug!("Released bindings of {element}");
    }

    /// Drop the binding of a port that is being removed.
    ///
    /// On an idle bound block the matching sub-component goes too.
    pub(crate) fn release_port_binding(&mut self, port: Id) {
        let Some(port_binding) = self.ports.get(&port).and_then(Port::binding) else {
            return;
        };
        let owner = self
            .ports
            .get(&port)
            .and_then(Port::parent_element)
            .and_then(|e| self.elements.get(&e));
        let block_component = owner
            .filter(|e| e.binding_state() == BindingState::Idle)
            .and_then(|e| e.binding())
            .map(|b| b.component);

        let _guard = self.components.suspend_access_checks();
        self.release_instance(port_binding);
        if let Some(parent) = block_component {
            if self.components.children(parent).contains(&port_binding.component) {
                if let Err(err) = self.components.remove_child(parent, port_binding.component) {
                    tracing::warn!("Failed to remove sub-component of {port}: {err}");
                }
            }
        }
        if let Some(p) = self.ports.get_mut(&port) {
            p.set_binding(None);
        }
    }

    /// Blocks bound to `component`
    pub fn blocks_bound_to(&self, component: ComponentId) -> Vec<Id> {
        self.elements
            .values()
            .filter(|e| e.binding().is_some_and(|b| b.component == component))
            .map(|e| e.id())
            .collect()
    }

    /// First block bound to `component`
    pub fn block_for_component(&self, component: ComponentId) -> Option<Id> {
        self.elements
            .values()
            .find(|e| e.binding().is_some_and(|b| b.component == component))
            .map(|e| e.id())
    }

    /// Drain the component change feed and reconcile every affected block.
    ///
    /// Returns the number of blocks that changed.
    pub fn sync_components(&mut self) -> usize {
        let mut changed = 0;
        loop {
            let changes = self.components.drain_changes();
            if changes.is_empty() {
                break;
            }
            let affected: BTreeSet<Id> = changes
                .iter()
                .flat_map(|change| {
                    let mut blocks = self.blocks_bound_to(change.parent());
                    // Blocks bound to a removed component lose their binding
                    if let ComponentChange::ChildRemoved { child, .. } = change {
                        blocks.extend(self.blocks_bound_to(*child));
                    }
                    blocks
                })
                .collect();
            for block in affected {
                match self.reconcile_block(block) {
                    Ok(true) => changed += 1,
                    Ok(false) => {}
                    Err(err) => tracing::warn!("Failed to reconcile {block}: {err}"),
                }
            }
        }
        changed
    }

    /// Bring a bound block's ports in line with its component.
    ///
    /// Idempotent: returns `false` and changes nothing when the pair is
    /// already consistent or the block is not idle.
    pub fn reconcile_block(&mut self, block: Id) -> Result<bool> {
        let element = self.require_block(block)?;
        if element.binding_state() != BindingState::Idle {
            return Ok(false);
        }
        let Some(binding) = element.binding() else {
            return Ok(false);
        };
        let ports = element.ports().to_vec();

        if !self.components.contains(binding.component) {
            // The component vanished with its instances; only the graph side is left
            for port in &ports {
                if let Some(p) = self.ports.get_mut(port) {
                    p.set_binding(None);
                }
            }
            if let Some(e) = self.elements.get_mut(&block) {
                e.set_binding(None);
            }
            tracing::debug!("Component of {block} disappeared, binding dropped");
            return Ok(true);
        }

        let children = self.port_children(binding.component);
        let expected: BTreeSet<ComponentId> = children.iter().map(|(child, _)| *child).collect();
        let mut changed = false;

        let _guard = self.components.suspend_access_checks();

        // Ports bound to children that are gone (or bound twice)
        let mut seen = BTreeSet::new();
        for port in &ports {
            let Some(port_binding) = self.ports.get(port).and_then(Port::binding) else {
                continue;
            };
            if expected.contains(&port_binding.component) && seen.insert(port_binding.component) {
                continue;
            }
            if let Some(p) = self.ports.get_mut(port) {
                p.set_binding(None);
            }
            self.release_instance(port_binding);
            self.remove_port(*port)?;
            tracing::debug!("Removed {port} of {block}, its sub-component is gone");
            changed = true;
        }

        // Children without a bound port
        for (child, direction) in children {
            if seen.contains(&child) {
                continue;
            }
            let reusable = self
                .require_block(block)?
                .ports()
                .iter()
                .filter_map(|id| self.ports.get(id))
                .find(|p| !p.is_bound() && p.direction() == direction)
                .map(Port::id);
            let port = match reusable {
                Some(port) => port,
                None => {
                    let name = self.components.name(child).unwrap_or("port").to_string();
                    self.add_port(block, Port::new(name, direction))?
                }
            };
            self.bind_port(port, child)?;
            tracing::debug!("Bound {port} of {block} to sub-component {child}");
            changed = true;
        }

        Ok(changed)
    }

    /// Check that the bound ports of a block mirror the port-typed children of its component
    pub fn is_synchronized(&self, block: Id) -> bool {
        let Some(element) = self.elements.get(&block) else {
            return false;
        };
        let Some(binding) = element.binding() else {
            return element
                .ports()
                .iter()
                .filter_map(|p| self.ports.get(p))
                .all(|p| !p.is_bound());
        };

        let expected: Vec<(ComponentId, PortDirection)> = self.port_children(binding.component);
        let mut bound: Vec<(ComponentId, PortDirection)> = element
            .ports()
            .iter()
            .filter_map(|p| self.ports.get(p))
            .filter_map(|p| Some((p.binding()?.component, p.direction())))
            .collect();
        if bound.len() != expected.len() {
            return false;
        }
        bound.sort_by_key(|(c, _)| *c);
        let mut expected = expected;
        expected.sort_by_key(|(c, _)| *c);
        bound == expected
    }

    /// Add a port-typed (or other) child to a component and reconcile bound blocks
    pub fn add_subcomponent(
        &mut self,
        parent: ComponentId,
        slot: &str,
        instance_type: InstanceType,
    ) -> Result<ComponentId> {
        let child = self.components.add_child(parent, slot, instance_type)?;
        self.sync_components();
        Ok(child)
    }

    /// Remove a child from a component and reconcile bound blocks
    pub fn remove_subcomponent(&mut self, parent: ComponentId, child: ComponentId) -> Result<()> {
        self.components.remove_child(parent, child)?;
        self.sync_components();
        Ok(())
    }

    /// Restore a saved block binding without touching the component system (loading only)
    pub fn restore_binding(&mut self, block: Id, binding: Binding) -> Result<()> {
        if !self.is_loading() {
            return Err(GraphError::NotLoading(block));
        }
        if self.require_block(block)?.binding().is_some() {
            return Err(GraphError::AlreadyBound(block));
        }
        if let Some(element) = self.elements.get_mut(&block) {
            element.set_binding(Some(binding));
        }
        Ok(())
    }

    /// Restore a saved port binding without touching the component system (loading only)
    pub fn restore_port_binding(&mut self, port: Id, binding: Binding) -> Result<()> {
        if !self.is_loading() {
            return Err(GraphError::NotLoading(port));
        }
        let p = self.ports.get_mut(&port).ok_or(GraphError::UnknownPort(port))?;
        p.set_binding(Some(binding));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::NetworkElement;
    use blocknet_component::ComponentTree;

    fn pump(tree: &mut ComponentTree) -> (ComponentId, ComponentId, ComponentId) {
        let pump = tree.create("Pump", InstanceType::Component);
        let inlet = tree.add_child(pump, "inlet", InstanceType::InPort).unwrap();
        let outlet = tree.add_child(pump, "outlet", InstanceType::OutPort).unwrap();
        tree.add_child(pump, "speed", InstanceType::Parameter).unwrap();
        tree.drain_changes();
        (pump, inlet, outlet)
    }

    #[test]
    fn test_bind_creates_ports_from_sub_components() {
        let (mut project, root) = project_with_root();
        let (component, inlet, outlet) = pump(project.components_mut());
        let block = project.add_element(root, NetworkElement::block("P-101")).unwrap();

        project.bind_component(block, component).unwrap();

        let ports = project.element(block).unwrap().ports().to_vec();
        assert_eq!(ports.len(), 2);
        let first = project.port(ports[0]).unwrap();
        assert_eq!(first.name, "inlet");
        assert_eq!(first.direction(), PortDirection::Input);
        assert_eq!(first.binding().unwrap().component, inlet);
        assert_eq!(project.port(ports[1]).unwrap().binding().unwrap().component, outlet);
        assert_eq!(project.components().instance_count(), 3);
        assert_eq!(project.element(block).unwrap().binding_state(), BindingState::Idle);
        assert!(project.is_synchronized(block));
        assert_eq!(project.block_for_component(component), Some(block));
    }

    #[test]
    fn test_bind_creates_sub_components_from_ports() {
        let (mut project, root) = project_with_root();
        let component = project.components_mut().create("Valve", InstanceType::Component);
        project.components_mut().set_read_only(component, true).unwrap();
        let block = project.add_element(root, NetworkElement::block("V-1")).unwrap();
        project.add_port(block, Port::input("in")).unwrap();
        project.add_port(block, Port::output("out")).unwrap();

        project.bind_component(block, component).unwrap();

        let children = project.components().children(component);
        assert_eq!(children.len(), 2);
        assert_eq!(project.components().name(children[0]), Some("in"));
        assert_eq!(
            project.components().instance_type(children[1]),
            Some(InstanceType::OutPort)
        );
        assert_eq!(project.element(block).unwrap().ports().len(), 2);
        assert!(project.is_synchronized(block));
    }

    #[test]
    fn test_removing_bound_component_drops_binding() {
        let (mut project, root) = project_with_root();
        let plant = project.components_mut().create("Plant", InstanceType::Component);
        let unit = project
            .components_mut()
            .add_child(plant, "unit", InstanceType::Component)
            .unwrap();
        let feed = project
            .components_mut()
            .add_child(unit, "feed", InstanceType::InPort)
            .unwrap();
        project.components_mut().drain_changes();
        let block = project.add_element(root, NetworkElement::block("U-1")).unwrap();
        project.bind_component(block, unit).unwrap();
        let port = project.element(block).unwrap().ports()[0];
        assert_eq!(project.port(port).unwrap().binding().unwrap().component, feed);

        project.remove_subcomponent(plant, unit).unwrap();

        assert!(!project.components().contains(unit));
        assert_eq!(project.element(block).unwrap().binding(), None);
        assert!(!project.port(port).unwrap().is_bound());
        assert_eq!(project.components().instance_count(), 0);

        let spare = project.components_mut().create("Spare", InstanceType::Component);
        project.bind_component(block, spare).unwrap();
        assert_eq!(project.block_for_component(spare), Some(block));
    }

    #[test]
    fn test_removing_childless_bound_component_drops_binding() {
        let (mut project, root) = project_with_root();
        let plant = project.components_mut().create("Plant", InstanceType::Component);
        let unit = project
            .components_mut()
            .add_child(plant, "unit", InstanceType::Component)
            .unwrap();
        project.components_mut().drain_changes();
        let block = project.add_element(root, NetworkElement::block("U-1")).unwrap();
        project.bind_component(block, unit).unwrap();

        project.remove_subcomponent(plant, unit).unwrap();

        assert_eq!(project.element(block).unwrap().binding(), None);
        assert!(project.bind_component(block, plant).is_ok());
    }

    #[test]
    fn test_bind_rejects_bound_blocks_and_networks() {
        let (mut project, root) = project_with_root();
        let (component, _, _) = pump(project.components_mut());
        let block = project.add_element(root, NetworkElement::block("A")).unwrap();
        project.bind_component(block, component).unwrap();

        assert_eq!(
            project.bind_component(block, component),
            Err(GraphError::AlreadyBound(block))
        );
        assert_eq!(
            project.bind_component(root, component),
            Err(GraphError::NotABlock(root))
        );
        let ghost = ComponentId::new();
        let other = project.add_element(root, NetworkElement::block("B")).unwrap();
        assert_eq!(
            project.bind_component(other, ghost),
            Err(GraphError::Component(ComponentError::UnknownComponent(ghost)))
        );
    }

    #[test]
    fn test_added_sub_component_reuses_unbound_port() {
        let (mut project, root) = project_with_root();
        let component = project.components_mut().create("Tank", InstanceType::Component);
        project
            .components_mut()
            .add_child(component, "drain", InstanceType::OutPort)
            .unwrap();
        let block = project.add_element(root, NetworkElement::block("T-1")).unwrap();
        let feed = project.add_port(block, Port::input("feed")).unwrap();
        project.bind_component(block, component).unwrap();
        assert!(!project.port(feed).unwrap().is_bound());

        let child = project
            .add_subcomponent(component, "feed", InstanceType::InPort)
            .unwrap();

        assert_eq!(project.port(feed).unwrap().binding().unwrap().component, child);
        assert_eq!(project.element(block).unwrap().ports().len(), 2);
        assert!(project.is_synchronized(block));

        // No unbound input left, so the next one gets a fresh port
        project
            .add_subcomponent(component, "vent", InstanceType::InPort)
            .unwrap();
        let ports = project.element(block).unwrap().ports().to_vec();
        assert_eq!(ports.len(), 3);
        assert_eq!(project.port(ports[2]).unwrap().name, "vent");
        assert!(project.is_synchronized(block));
    }

    #[test]
    fn test_removed_sub_component_removes_port_and_connector() {
        let (mut project, root) = project_with_root();
        let (component, _, outlet) = pump(project.components_mut());
        let block = project.add_element(root, NetworkElement::block("P-101")).unwrap();
        project.bind_component(block, component).unwrap();
        let out = project.element(block).unwrap().ports()[1];

        let sink = project.add_element(root, NetworkElement::block("Sink")).unwrap();
        let sink_in = project.add_port(sink, Port::input("in")).unwrap();
        let connector = project.connect(out, sink_in).unwrap().unwrap();

        project.remove_subcomponent(component, outlet).unwrap();

        assert!(project.port(out).is_none());
        assert!(project.connector(connector).is_none());
        assert_eq!(project.element(block).unwrap().ports().len(), 1);
        assert!(project.is_synchronized(block));
        assert_eq!(project.components().instance_count(), 2);
    }

    #[test]
    fn test_removing_bound_port_removes_sub_component() {
        let (mut project, root) = project_with_root();
        let (component, inlet, _) = pump(project.components_mut());
        let block = project.add_element(root, NetworkElement::block("P-101")).unwrap();
        project.bind_component(block, component).unwrap();
        let input = project.element(block).unwrap().ports()[0];

        project.remove_port(input).unwrap();

        assert!(!project.components().contains(inlet));
        assert_eq!(project.sync_components(), 0);
        assert!(project.is_synchronized(block));
    }

    #[test]
    fn test_unbind_keeps_ports() {
        let (mut project, root) = project_with_root();
        let (component, inlet, outlet) = pump(project.components_mut());
        let block = project.add_element(root, NetworkElement::block("P-101")).unwrap();
        project.bind_component(block, component).unwrap();

        let binding = project.unbind_component(block).unwrap().unwrap();

        assert_eq!(binding.component, component);
        assert_eq!(project.element(block).unwrap().binding(), None);
        assert_eq!(project.element(block).unwrap().ports().len(), 2);
        assert!(project.ports().all(|p| !p.is_bound()));
        assert!(!project.components().contains(inlet));
        assert!(!project.components().contains(outlet));
        assert_eq!(project.components().children(component).len(), 1);
        assert_eq!(project.components().instance_count(), 0);
        assert_eq!(project.unbind_component(block), Ok(None));
    }

    #[test]
    fn test_deleting_block_keeps_sub_components() {
        let (mut project, root) = project_with_root();
        let (component, inlet, outlet) = pump(project.components_mut());
        let block = project.add_element(root, NetworkElement::block("P-101")).unwrap();
        project.bind_component(block, component).unwrap();

        project.remove_element(block).unwrap();

        assert!(project.components().contains(inlet));
        assert!(project.components().contains(outlet));
        assert_eq!(project.components().instance_count(), 0);
        assert_eq!(project.block_for_component(component), None);
    }

    #[test]
    fn test_external_edits_reach_graph_on_sync() {
        let (mut project, root) = project_with_root();
        let (component, inlet, _) = pump(project.components_mut());
        let block = project.add_element(root, NetworkElement::block("P-101")).unwrap();
        project.bind_component(block, component).unwrap();

        project.components_mut().remove_child(component, inlet).unwrap();
        project
            .components_mut()
            .add_child(component, "bypass", InstanceType::OutPort)
            .unwrap();
        assert!(!project.is_synchronized(block));

        assert_eq!(project.sync_components(), 1);
        assert!(project.is_synchronized(block));
        assert_eq!(project.reconcile_block(block), Ok(false));
    }

    #[test]
    fn test_restore_binding_requires_loading() {
        let (mut project, root) = project_with_root();
        let (component, _, _) = pump(project.components_mut());
        let block = project.add_element(root, NetworkElement::block("A")).unwrap();
        let binding = Binding {
            instance: blocknet_component::InstanceId::new(),
            component,
        };

        assert_eq!(
            project.restore_binding(block, binding),
            Err(GraphError::NotLoading(block))
        );
        project
            .loading(|p| p.restore_binding(block, binding))
            .unwrap();
        assert_eq!(project.element(block).unwrap().binding(), Some(binding));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Edit {
            AddSub(bool),
            RemoveSub(usize),
            AddPort(bool),
            RemovePort(usize),
            Unbind,
            Rebind,
        }

        fn edit() -> impl Strategy<Value = Edit> {
            prop_oneof![
                any::<bool>().prop_map(Edit::AddSub),
                (0usize..8).prop_map(Edit::RemoveSub),
                any::<bool>().prop_map(Edit::AddPort),
                (0usize..8).prop_map(Edit::RemovePort),
                Just(Edit::Unbind),
                Just(Edit::Rebind),
            ]
        }

        fn instance_type(input: bool) -> InstanceType {
            if input {
                InstanceType::InPort
            } else {
                InstanceType::OutPort
            }
        }

        proptest! {
            #[test]
            fn edits_keep_block_and_component_in_step(edits in prop::collection::vec(edit(), 1..24)) {
                let (mut project, root) = project_with_root();
                let component = project.components_mut().create("Unit", InstanceType::Component);
                let block = project.add_element(root, NetworkElement::block("U-1")).unwrap();
                project.bind_component(block, component).unwrap();

                for (step, edit) in edits.into_iter().enumerate() {
                    match edit {
                        Edit::AddSub(input) => {
                            project
                                .add_subcomponent(component, &format!("s{step}"), instance_type(input))
                                .unwrap();
                        }
                        Edit::RemoveSub(index) => {
                            let children = project.components().children(component);
                            if let Some(child) = children.get(index) {
                                project.remove_subcomponent(component, *child).unwrap();
                            }
                        }
                        Edit::AddPort(input) => {
                            let direction = if input { PortDirection::Input } else { PortDirection::Output };
                            project.add_port(block, Port::new(format!("p{step}"), direction)).unwrap();
                        }
                        Edit::RemovePort(index) => {
                            let ports = project.element(block).unwrap().ports().to_vec();
                            if let Some(port) = ports.get(index) {
                                project.remove_port(*port).unwrap();
                            }
                        }
                        Edit::Unbind => {
                            project.unbind_component(block).unwrap();
                        }
                        Edit::Rebind => {
                            if project.element(block).unwrap().binding().is_none() {
                                project.bind_component(block, component).unwrap();
                            }
                        }
                    }

                    prop_assert!(project.is_synchronized(block));
                    prop_assert_eq!(project.reconcile_block(block), Ok(false));
                    prop_assert_eq!(project.sync_components(), 0);
                    for port in project.element(block).unwrap().ports() {
                        prop_assert_eq!(project.port(*port).unwrap().parent_element(), Some(block));
                    }
                }
            }
        }
    }
}
