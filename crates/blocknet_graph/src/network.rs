// SPDX-License-Identifier: MIT OR Apache-2.0
//! Network composite queries.

use crate::element::NetworkElement;
use crate::id::Id;
use crate::project::Project;
use blocknet_component::ComponentSystem;

/// Pre-order iterator over every element nested in a network.
///
/// Cloning the iterator restarts it from the clone's position, so a caller can
/// walk the same hierarchy several times without re-collecting.
#[derive(Debug)]
pub struct Descendants<'a, C> {
    project: &'a Project<C>,
    stack: Vec<Id>,
}

impl<C> Clone for Descendants<'_, C> {
    fn clone(&self) -> Self {
        Self {
            project: self.project,
            stack: self.stack.clone(),
        }
    }
}

impl<'a, C> Descendants<'a, C> {
    fn new(project: &'a Project<C>, network: Id) -> Self {
        let mut stack: Vec<Id> = project
            .elements
            .get(&network)
            .map(|n| n.contained_elements().to_vec())
            .unwrap_or_default();
        stack.reverse();
        Self { project, stack }
    }
}

impl<'a, C> Iterator for Descendants<'a, C> {
    type Item = &'a NetworkElement;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(element) = self.project.elements.get(&id) else {
                continue;
            };
            self.stack
                .extend(element.contained_elements().iter().rev().copied());
            return Some(element);
        }
        None
    }
}

impl<C: ComponentSystem> Project<C> {
    /// Elements directly contained in a network (empty for blocks and unknown ids)
    pub fn contained_elements(&self, network: Id) -> &[Id] {
        self.elements
            .get(&network)
            .map(NetworkElement::contained_elements)
            .unwrap_or(&[])
    }

    /// Connectors owned by a network
    pub fn contained_connectors(&self, network: Id) -> &[Id] {
        self.elements
            .get(&network)
            .map(NetworkElement::contained_connectors)
            .unwrap_or(&[])
    }

    /// Network containing an element
    pub fn parent_network(&self, element: Id) -> Option<Id> {
        self.elements.get(&element)?.parent_network()
    }

    /// Every element nested in `network` at any depth, pre-order
    pub fn descendants(&self, network: Id) -> Descendants<'_, C> {
        Descendants::new(self, network)
    }

    /// Blocks nested in `network` at any depth
    pub fn all_blocks(&self, network: Id) -> Vec<Id> {
        self.descendants(network)
            .filter(|element| element.is_block())
            .map(NetworkElement::id)
            .collect()
    }

    /// Ports of every element nested in `network`, excluding its own boundary ports
    pub fn all_ports(&self, network: Id) -> Vec<Id> {
        self.descendants(network)
            .flat_map(|element| element.ports().iter().copied())
            .collect()
    }

    /// Path of element names from the root down to `element`
    pub fn path_of(&self, element: Id) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self.elements.get(&element);
        while let Some(e) = current {
            path.push(e.name.as_str());
            current = e.parent_network().and_then(|parent| self.elements.get(&parent));
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use crate::{NetworkElement, Port};

    #[test]
    fn test_descendants_pre_order() {
        let (mut project, root) = project_with_root();
        let a = project.add_element(root, NetworkElement::block("A")).unwrap();
        let sub = project.add_element(root, NetworkElement::network("Sub")).unwrap();
        let b = project.add_element(sub, NetworkElement::block("B")).unwrap();
        let inner = project.add_element(sub, NetworkElement::network("Inner")).unwrap();
        let c = project.add_element(inner, NetworkElement::block("C")).unwrap();
        let d = project.add_element(root, NetworkElement::block("D")).unwrap();

        let order: Vec<_> = project.descendants(root).map(|e| e.id()).collect();
        assert_eq!(order, vec![a, sub, b, inner, c, d]);

        let walk = project.descendants(sub);
        assert_eq!(walk.clone().count(), 3);
        assert_eq!(walk.count(), 3);

        assert_eq!(project.all_blocks(root), vec![a, b, c, d]);
        assert!(project.descendants(a).next().is_none());
    }

    #[test]
    fn test_all_ports_excludes_own_boundary() {
        let (mut project, root) = project_with_root();
        let sub = project.add_element(root, NetworkElement::network("Sub")).unwrap();
        let boundary = project.add_port(sub, Port::input("in")).unwrap();
        let block = project.add_element(sub, NetworkElement::block("B")).unwrap();
        let block_port = project.add_port(block, Port::input("in")).unwrap();

        assert_eq!(project.all_ports(sub), vec![block_port]);
        assert_eq!(project.all_ports(root), vec![boundary, block_port]);
    }

    #[test]
    fn test_path_of() {
        let (mut project, root) = project_with_root();
        let sub = project.add_element(root, NetworkElement::network("Sub")).unwrap();
        let block = project.add_element(sub, NetworkElement::block("Pump")).unwrap();

        assert_eq!(project.path_of(block), vec!["Root", "Sub", "Pump"]);
        assert_eq!(project.parent_network(block), Some(sub));
        assert_eq!(project.parent_network(root), None);
    }
}
