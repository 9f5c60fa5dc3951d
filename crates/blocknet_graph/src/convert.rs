// SPDX-License-Identifier: MIT OR Apache-2.0
//! Block to subnetwork conversion (and back).

use crate::collection::Owner;
use crate::connector::Connector;
use crate::element::NetworkElement;
use crate::error::{GraphError, Result};
use crate::id::Id;
use crate::port::{Port, PortDirection};
use crate::project::Project;
use blocknet_component::ComponentSystem;
use std::collections::HashMap;

/// What survives of an element across a conversion
struct Outline {
    parent: Id,
    index: usize,
    ports: Vec<(Id, String, PortDirection)>,
    /// Source, target and owning network of each outside connector
    connectors: Vec<(Id, Id, Id)>,
}

impl<C: ComponentSystem> Project<C> {
    /// Replace a block with a network of the same name, position and ports.
    ///
    /// The block is deleted (dropping its binding); connectors that touched
    /// its ports are recreated on the new boundary ports with the same roles.
    pub fn convert_block_to_subnetwork(&mut self, block: Id) -> Result<Id> {
        let element = self.require_block(block)?;
        let replacement = NetworkElement::network(element.name.clone())
            .with_position(element.position[0], element.position[1]);
        let id = self.swap_element(block, replacement)?;
        tracing::debug!("Converted block {block} into network {id}");
        Ok(id)
    }

    /// Replace a network with a block of the same name, position and ports.
    ///
    /// Contained elements and connectors are deleted; outside connectors are
    /// recreated on the block's ports.
    pub fn convert_subnetwork_to_block(&mut self, network: Id) -> Result<Id> {
        let element = self.require_network(network)?;
        let replacement = NetworkElement::block(element.name.clone())
            .with_position(element.position[0], element.position[1]);
        let id = self.swap_element(network, replacement)?;
        tracing::debug!("Converted network {network} into block {id}");
        Ok(id)
    }

    fn outline(&self, element: Id) -> Result<Outline> {
        let e = self.require_element(element)?;
        let parent = e.parent_network().ok_or(GraphError::NoParentNetwork(element))?;
        let index = self
            .contained_elements(parent)
            .iter()
            .position(|id| *id == element)
            .ok_or(GraphError::UnknownElement(element))?;

        let ports: Vec<_> = e
            .ports()
            .iter()
            .filter_map(|id| self.ports.get(id))
            .map(|p| (p.id(), p.name.clone(), p.direction()))
            .collect();

        let mut connectors = Vec::new();
        let mut seen = Vec::new();
        for (port, _, _) in &ports {
            for connector in self.port_connectors(*port) {
                let Some(c) = self.connectors.get(&connector) else {
                    continue;
                };
                if c.parent_network() != Some(parent) || seen.contains(&connector) {
                    continue;
                }
                seen.push(connector);
                connectors.push((c.source(), c.target(), parent));
            }
        }

        Ok(Outline {
            parent,
            index,
            ports,
            connectors,
        })
    }

    fn swap_element(&mut self, old: Id, replacement: NetworkElement) -> Result<Id> {
        let outline = self.outline(old)?;
        self.remove_element(old)?;
        let new = self.insert_element(outline.parent, outline.index, replacement)?;

        let mut mapping = HashMap::with_capacity(outline.ports.len());
        for (port, name, direction) in outline.ports.into_iter().rev() {
            let replacement = self.insert_port(new, 0, Port::new(name, direction))?;
            mapping.insert(port, replacement);
        }

        let remap = |port: Id| mapping.get(&port).copied().unwrap_or(port);
        for (source, target, network) in outline.connectors {
            let connector = Connector::new(remap(source), remap(target));
            self.insert_member(Owner::Network(network), None, connector)?;
        }
        Ok(new)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use crate::{GraphError, NetworkElement, Port, PortDirection};
    use blocknet_component::{ComponentSystem, InstanceType};

    #[test]
    fn test_block_to_subnetwork_preserves_connectivity() {
        let (mut project, root) = project_with_root();
        let source = project.add_element(root, NetworkElement::block("Source")).unwrap();
        let source_out = project.add_port(source, Port::output("out")).unwrap();
        let block = project
            .add_element(root, NetworkElement::block("Mixer").with_position(4.0, 2.0))
            .unwrap();
        let block_in = project.add_port(block, Port::input("in")).unwrap();
        let block_out = project.add_port(block, Port::output("out")).unwrap();
        let sink = project.add_element(root, NetworkElement::block("Sink")).unwrap();
        let sink_in = project.add_port(sink, Port::input("in")).unwrap();
        project.connect(source_out, block_in).unwrap().unwrap();
        project.connect(block_out, sink_in).unwrap().unwrap();

        let network = project.convert_block_to_subnetwork(block).unwrap();

        assert!(project.element(block).is_none());
        assert!(!project.registry().contains(block_in));
        assert_eq!(project.contained_elements(root), &[source, network, sink]);
        let converted = project.element(network).unwrap();
        assert!(converted.is_network());
        assert_eq!(converted.name, "Mixer");
        assert_eq!(converted.position, [4.0, 2.0]);

        let ports = converted.ports().to_vec();
        let shapes: Vec<_> = ports
            .iter()
            .map(|p| {
                let port = project.port(*p).unwrap();
                (port.name.clone(), port.direction())
            })
            .collect();
        assert_eq!(
            shapes,
            vec![
                ("in".to_string(), PortDirection::Input),
                ("out".to_string(), PortDirection::Output)
            ]
        );

        assert_eq!(project.connected_ports(source_out), vec![ports[0]]);
        assert_eq!(project.connected_ports(sink_in), vec![ports[1]]);
        let incoming = project.port_connectors(ports[0])[0];
        assert_eq!(project.connector(incoming).unwrap().source(), source_out);
        assert_eq!(project.connector(incoming).unwrap().parent_network(), Some(root));
        assert_eq!(project.connector_count(), 2);

        // The new boundary ports accept inner connections
        let inner = project.add_element(network, NetworkElement::block("Inner")).unwrap();
        let inner_in = project.add_port(inner, Port::input("in")).unwrap();
        assert!(project.connect(ports[0], inner_in).unwrap().is_some());
    }

    #[test]
    fn test_subnetwork_to_block_drops_contents() {
        let (mut project, root) = project_with_root();
        let source = project.add_element(root, NetworkElement::block("Source")).unwrap();
        let source_out = project.add_port(source, Port::output("out")).unwrap();
        let sub = project.add_element(root, NetworkElement::network("Sub")).unwrap();
        let sub_in = project.add_port(sub, Port::input("in")).unwrap();
        let inner = project.add_element(sub, NetworkElement::block("Inner")).unwrap();
        let inner_in = project.add_port(inner, Port::input("in")).unwrap();
        project.connect(source_out, sub_in).unwrap().unwrap();
        project.connect(sub_in, inner_in).unwrap().unwrap();

        let block = project.convert_subnetwork_to_block(sub).unwrap();

        assert!(project.element(inner).is_none());
        assert!(project.port(inner_in).is_none());
        let ports = project.element(block).unwrap().ports().to_vec();
        assert_eq!(ports.len(), 1);
        assert_eq!(project.connected_ports(source_out), vec![ports[0]]);
        assert_eq!(project.connector_count(), 1);
        assert_eq!(project.element_count(), 3);
    }

    #[test]
    fn test_roots_cannot_be_converted() {
        let (mut project, root) = project_with_root();
        assert_eq!(
            project.convert_subnetwork_to_block(root),
            Err(GraphError::NoParentNetwork(root))
        );
        assert_eq!(
            project.convert_block_to_subnetwork(root),
            Err(GraphError::NotABlock(root))
        );
    }

    #[test]
    fn test_conversion_severs_binding() {
        let (mut project, root) = project_with_root();
        let component = project.components_mut().create("Heater", InstanceType::Component);
        let inlet = project
            .components_mut()
            .add_child(component, "inlet", InstanceType::InPort)
            .unwrap();
        let block = project.add_element(root, NetworkElement::block("H-1")).unwrap();
        project.bind_component(block, component).unwrap();

        let network = project.convert_block_to_subnetwork(block).unwrap();

        assert_eq!(project.components().instance_count(), 0);
        assert!(project.components().contains(inlet));
        assert_eq!(project.element(network).unwrap().ports().len(), 1);
        assert!(project.ports().all(|p| !p.is_bound()));
    }
}
