// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection protocol.
//!
//! Whether two ports may be connected is decided from the current topology on
//! every call:
//!
//! - sibling: both elements sit in the same network `N`, the directions
//!   differ and neither port has a connector in `N` yet; the output port is
//!   the source
//! - boundary: one element is a network `M` and the other sits directly in
//!   `M`, the directions match and neither port has a connector in `M` yet;
//!   an input boundary port is the source, an output boundary port the target
//!
//! Anything else is silently rejected.

use crate::collection::Owner;
use crate::connector::Connector;
use crate::error::Result;
use crate::id::Id;
use crate::port::PortDirection;
use crate::project::Project;
use blocknet_component::ComponentSystem;

/// Outcome of a successful legality check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionPlan {
    /// Network that will own the connector
    pub network: Id,
    /// Source port
    pub source: Id,
    /// Target port
    pub target: Id,
}

impl<C: ComponentSystem> Project<C> {
    /// Connect two ports.
    ///
    /// Returns `Ok(None)` when the topology does not allow the connection; the
    /// graph is left untouched in that case. Fails only for unknown ports.
    ///
    /// A port takes at most one connector per network level. A block port
    /// therefore has at most one connector, but a network's boundary port may
    /// carry two at once: one in the parent network (outside) and one in the
    /// network itself (inside), so a signal can pass through the boundary.
    /// [`port_connectors`](Self::port_connectors) lists the outside one first.
    pub fn connect(&mut self, a: Id, b: Id) -> Result<Option<Id>> {
        let Some(plan) = self.plan_connection(a, b)? else {
            tracing::debug!("Rejected connection {a} -> {b}");
            return Ok(None);
        };

        let connector = Connector::new(plan.source, plan.target);
        let id = self.insert_member(Owner::Network(plan.network), None, connector)?;
        tracing::debug!("Connected {} -> {} in {}", plan.source, plan.target, plan.network);
        Ok(Some(id))
    }

    /// Check if [`connect`](Self::connect) would create a connector
    pub fn can_connect(&self, a: Id, b: Id) -> bool {
        matches!(self.plan_connection(a, b), Ok(Some(_)))
    }

    /// Decide where a connector between `a` and `b` would live and which way it points
    pub fn plan_connection(&self, a: Id, b: Id) -> Result<Option<ConnectionPlan>> {
        let port_a = self.require_port(a)?;
        let port_b = self.require_port(b)?;
        let (Some(element_a), Some(element_b)) = (port_a.parent_element(), port_b.parent_element()) else {
            return Ok(None);
        };
        let parent_a = self.parent_network(element_a);
        let parent_b = self.parent_network(element_b);

        // Sibling
        if let Some(network) = parent_a.filter(|n| Some(*n) == parent_b) {
            if !port_a.can_connect(port_b) || self.has_connector_in(a, network) || self.has_connector_in(b, network) {
                return Ok(None);
            }
            let (source, target) = match port_a.direction() {
                PortDirection::Output => (a, b),
                PortDirection::Input => (b, a),
            };
            return Ok(Some(ConnectionPlan { network, source, target }));
        }

        // Boundary: `outer` is a port of network `m`, `inner` belongs to an element inside `m`
        let (outer, inner, m) = if parent_b == Some(element_a) {
            (a, b, element_a)
        } else if parent_a == Some(element_b) {
            (b, a, element_b)
        } else {
            return Ok(None);
        };
        if port_a.direction() != port_b.direction()
            || self.has_connector_in(outer, m)
            || self.has_connector_in(inner, m)
        {
            return Ok(None);
        }
        let (source, target) = match port_a.direction() {
            PortDirection::Input => (outer, inner),
            PortDirection::Output => (inner, outer),
        };
        Ok(Some(ConnectionPlan {
            network: m,
            source,
            target,
        }))
    }

    /// Connector touching `port` owned by `network`
    pub fn connector_in(&self, port: Id, network: Id) -> Option<Id> {
        self.contained_connectors(network)
            .iter()
            .copied()
            .find(|c| self.connectors.get(c).is_some_and(|c| c.involves_port(port)))
    }

    fn has_connector_in(&self, port: Id, network: Id) -> bool {
        self.connector_in(port, network).is_some()
    }

    /// Every connector touching `port`.
    ///
    /// Looks at the element's parent network and, for a boundary port, at the
    /// network's own connectors.
    pub fn port_connectors(&self, port: Id) -> Vec<Id> {
        let Some(element) = self.ports.get(&port).and_then(|p| p.parent_element()) else {
            return Vec::new();
        };
        let outside = self.parent_network(element);
        let inside = self
            .elements
            .get(&element)
            .filter(|e| e.is_network())
            .map(|e| e.id());

        outside
            .into_iter()
            .chain(inside)
            .flat_map(|network| self.contained_connectors(network).iter().copied())
            .filter(|c| self.connectors.get(c).is_some_and(|c| c.involves_port(port)))
            .collect()
    }

    /// Check if any connector touches `port`
    pub fn is_connected(&self, port: Id) -> bool {
        !self.port_connectors(port).is_empty()
    }

    /// Ports on the other end of every connector touching `port`
    pub fn connected_ports(&self, port: Id) -> Vec<Id> {
        self.port_connectors(port)
            .into_iter()
            .filter_map(|c| self.connectors.get(&c)?.other_end(port))
            .collect()
    }

    /// Remove every connector touching `port`, returning how many were removed
    pub fn remove_connections(&mut self, port: Id) -> Result<usize> {
        self.require_port(port)?;
        let connectors = self.port_connectors(port);
        for connector in &connectors {
            self.remove_member::<Connector>(*connector)?;
        }
        Ok(connectors.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::{GraphError, NetworkElement, Port};

    #[test]
    fn test_sibling_scenario() {
        let (mut project, root) = project_with_root();
        let a = project.add_element(root, NetworkElement::block("A")).unwrap();
        let b = project.add_element(root, NetworkElement::block("B")).unwrap();
        let a1 = project.add_port(a, Port::output("A1")).unwrap();
        let b1 = project.add_port(b, Port::input("B1")).unwrap();

        // Argument order does not decide the roles
        let connector = project.connect(b1, a1).unwrap().unwrap();
        let c = project.connector(connector).unwrap();
        assert_eq!(c.source(), a1);
        assert_eq!(c.target(), b1);
        assert_eq!(c.parent_network(), Some(root));
        assert_eq!(project.contained_connectors(root), &[connector]);
        assert_eq!(project.port_connectors(a1), vec![connector]);
        assert_eq!(project.connected_ports(b1), vec![a1]);

        // Second attempt is rejected, nothing changes
        assert_eq!(project.connect(a1, b1), Ok(None));
        assert_eq!(project.connector_count(), 1);

        project.remove_element(a).unwrap();
        assert!(!project.is_connected(b1));
        assert!(project.contained_connectors(root).is_empty());
        assert!(!project.registry().contains(connector));
    }

    #[test]
    fn test_removing_connected_port_drops_connector() {
        let (mut project, root) = project_with_root();
        let a = project.add_element(root, NetworkElement::block("A")).unwrap();
        let b = project.add_element(root, NetworkElement::block("B")).unwrap();
        let a1 = project.add_port(a, Port::output("A1")).unwrap();
        let b1 = project.add_port(b, Port::input("B1")).unwrap();
        let connector = project.connect(a1, b1).unwrap().unwrap();

        project.remove_port(a1).unwrap();

        assert_eq!(project.contained_connectors(root).len(), 0);
        assert_eq!(project.connector_count(), 0);
        assert!(project.get_by_id::<Connector>(connector).is_none());
        assert!(!project.registry().contains(connector));
        assert!(!project.is_connected(b1));
        assert!(project.element(a).unwrap().ports().is_empty());
        assert!(project.port(b1).is_some());
    }

    #[test]
    fn test_same_direction_siblings_are_rejected() {
        let (mut project, root) = project_with_root();
        let a = project.add_element(root, NetworkElement::block("A")).unwrap();
        let b = project.add_element(root, NetworkElement::block("B")).unwrap();
        let a1 = project.add_port(a, Port::output("out")).unwrap();
        let b1 = project.add_port(b, Port::output("out")).unwrap();

        assert!(!project.can_connect(a1, b1));
        assert_eq!(project.connect(a1, b1), Ok(None));
        assert_eq!(project.connect(a1, a1), Ok(None));
        assert_eq!(project.connector_count(), 0);
    }

    #[test]
    fn test_block_port_takes_one_connector() {
        let (mut project, root) = project_with_root();
        let a = project.add_element(root, NetworkElement::block("A")).unwrap();
        let b = project.add_element(root, NetworkElement::block("B")).unwrap();
        let c = project.add_element(root, NetworkElement::block("C")).unwrap();
        let out = project.add_port(a, Port::output("out")).unwrap();
        let b_in = project.add_port(b, Port::input("in")).unwrap();
        let c_in = project.add_port(c, Port::input("in")).unwrap();

        assert!(project.connect(out, b_in).unwrap().is_some());
        assert_eq!(project.connect(out, c_in), Ok(None));
    }

    #[test]
    fn test_unrelated_levels_are_rejected() {
        let (mut project, root) = project_with_root();
        let sub = project.add_element(root, NetworkElement::network("Sub")).unwrap();
        let inner = project.add_element(sub, NetworkElement::block("Inner")).unwrap();
        let outer = project.add_element(root, NetworkElement::block("Outer")).unwrap();
        let inner_in = project.add_port(inner, Port::input("in")).unwrap();
        let outer_out = project.add_port(outer, Port::output("out")).unwrap();

        assert_eq!(project.connect(outer_out, inner_in), Ok(None));
    }

    #[test]
    fn test_boundary_roles() {
        let (mut project, root) = project_with_root();
        let sub = project.add_element(root, NetworkElement::network("Sub")).unwrap();
        let sub_in = project.add_port(sub, Port::input("in")).unwrap();
        let sub_out = project.add_port(sub, Port::output("out")).unwrap();
        let inner = project.add_element(sub, NetworkElement::block("Inner")).unwrap();
        let inner_in = project.add_port(inner, Port::input("in")).unwrap();
        let inner_out = project.add_port(inner, Port::output("out")).unwrap();

        // Opposite directions across the boundary are rejected
        assert_eq!(project.connect(sub_in, inner_out), Ok(None));

        let entering = project.connect(inner_in, sub_in).unwrap().unwrap();
        let leaving = project.connect(sub_out, inner_out).unwrap().unwrap();

        let entering = project.connector(entering).unwrap();
        assert_eq!((entering.source(), entering.target()), (sub_in, inner_in));
        assert_eq!(entering.parent_network(), Some(sub));
        let leaving = project.connector(leaving).unwrap();
        assert_eq!((leaving.source(), leaving.target()), (inner_out, sub_out));
        assert_eq!(project.contained_connectors(sub).len(), 2);
        assert!(project.contained_connectors(root).is_empty());
    }

    #[test]
    fn test_boundary_port_has_one_connector_per_level() {
        let (mut project, root) = project_with_root();
        let source = project.add_element(root, NetworkElement::block("Source")).unwrap();
        let source_out = project.add_port(source, Port::output("out")).unwrap();
        let sub = project.add_element(root, NetworkElement::network("Sub")).unwrap();
        let sub_in = project.add_port(sub, Port::input("in")).unwrap();
        let inner = project.add_element(sub, NetworkElement::block("Inner")).unwrap();
        let inner_in = project.add_port(inner, Port::input("in")).unwrap();
        let other = project.add_element(sub, NetworkElement::block("Other")).unwrap();
        let other_in = project.add_port(other, Port::input("in")).unwrap();

        let outside = project.connect(source_out, sub_in).unwrap().unwrap();
        let inside = project.connect(sub_in, inner_in).unwrap().unwrap();
        assert_eq!(project.connect(sub_in, other_in), Ok(None));

        assert_eq!(project.port_connectors(sub_in), vec![outside, inside]);

        assert_eq!(project.remove_connections(sub_in), Ok(2));
        assert!(!project.is_connected(source_out));
        assert!(!project.is_connected(inner_in));
    }

    #[test]
    fn test_unknown_port_is_an_error() {
        let (mut project, root) = project_with_root();
        let a = project.add_element(root, NetworkElement::block("A")).unwrap();
        let out = project.add_port(a, Port::output("out")).unwrap();
        let ghost = Id::new(crate::Scope::Port, 99);

        assert_eq!(project.connect(out, ghost), Err(GraphError::UnknownPort(ghost)));
        assert_eq!(project.remove_connections(ghost), Err(GraphError::UnknownPort(ghost)));
    }
}
