// SPDX-License-Identifier: MIT OR Apache-2.0
//! The project: arenas, registry and collections of one network hierarchy.

use crate::collection::{ManagedCollection, Owner, Registered};
use crate::connector::Connector;
use crate::element::NetworkElement;
use crate::error::{GraphError, Result};
use crate::events::{EventSink, EventSinks, GraphEvent, RepresentationRef};
use crate::id::{Id, Scope};
use crate::port::Port;
use crate::registry::IdentityRegistry;
use blocknet_component::{ComponentSystem, ComponentTree};
use indexmap::IndexMap;
use std::sync::Arc;

/// Owner of a network hierarchy and the component system it is bound to.
///
/// Elements, ports and connectors live in arenas keyed by [`Id`]; all
/// parent/child links are ids into those arenas. Structural edits go through
/// the managed-collection operations, which keep the registry, the arenas
/// and the collections consistent.
#[derive(Debug)]
pub struct Project<C = ComponentTree> {
    pub(crate) registry: IdentityRegistry,
    pub(crate) elements: IndexMap<Id, NetworkElement>,
    pub(crate) ports: IndexMap<Id, Port>,
    pub(crate) connectors: IndexMap<Id, Connector>,
    pub(crate) roots: ManagedCollection,
    /// Ids detached by soft removal during the current load
    pub(crate) soft_removed: Vec<Id>,
    pub(crate) components: C,
    sinks: EventSinks,
}

impl<C: ComponentSystem + Default> Default for Project<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C: ComponentSystem> Project<C> {
    /// Create an empty project on top of a component system
    pub fn new(components: C) -> Self {
        Self {
            registry: IdentityRegistry::new(),
            elements: IndexMap::new(),
            ports: IndexMap::new(),
            connectors: IndexMap::new(),
            roots: ManagedCollection::default(),
            soft_removed: Vec::new(),
            components,
            sinks: EventSinks::default(),
        }
    }

    /// The component system
    pub fn components(&self) -> &C {
        &self.components
    }

    /// Mutable access to the component system.
    ///
    /// Edits made here reach the graph on the next [`sync_components`](Self::sync_components).
    pub fn components_mut(&mut self) -> &mut C {
        &mut self.components
    }

    /// Consume the project, keeping the component system
    pub fn into_components(self) -> C {
        self.components
    }

    /// The identity registry
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Register a sink for structural change notifications
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Drop every registered sink
    pub fn clear_sinks(&mut self) {
        self.sinks.clear();
    }

    pub(crate) fn emit(&self, event: GraphEvent) {
        self.sinks.emit(event);
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Scope-qualified lookup of any registered object
    pub fn get_by_id<T: Registered>(&self, id: Id) -> Option<&T> {
        if id.scope() != T::SCOPE || !self.registry.contains(id) {
            return None;
        }
        T::lookup(self, id)
    }

    /// Get an element by ID
    pub fn element(&self, id: Id) -> Option<&NetworkElement> {
        self.elements.get(&id)
    }

    /// Get a mutable element by ID (name and position only are public)
    pub fn element_mut(&mut self, id: Id) -> Option<&mut NetworkElement> {
        self.elements.get_mut(&id)
    }

    /// Get a port by ID
    pub fn port(&self, id: Id) -> Option<&Port> {
        self.ports.get(&id)
    }

    /// Get a mutable port by ID (name only is public)
    pub fn port_mut(&mut self, id: Id) -> Option<&mut Port> {
        self.ports.get_mut(&id)
    }

    /// Get a connector by ID
    pub fn connector(&self, id: Id) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    /// Get all elements
    pub fn elements(&self) -> impl Iterator<Item = &NetworkElement> {
        self.elements.values()
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    /// Get all connectors
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.values()
    }

    /// Get the number of elements
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Get the number of ports
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Get the number of connectors
    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Top-level networks in order
    pub fn roots(&self) -> &[Id] {
        self.roots.as_slice()
    }

    pub(crate) fn require_element(&self, id: Id) -> Result<&NetworkElement> {
        self.elements.get(&id).ok_or(GraphError::UnknownElement(id))
    }

    pub(crate) fn require_network(&self, id: Id) -> Result<&NetworkElement> {
        let element = self.require_element(id)?;
        if !element.is_network() {
            return Err(GraphError::NotANetwork(id));
        }
        Ok(element)
    }

    pub(crate) fn require_block(&self, id: Id) -> Result<&NetworkElement> {
        let element = self.require_element(id)?;
        if !element.is_block() {
            return Err(GraphError::NotABlock(id));
        }
        Ok(element)
    }

    pub(crate) fn require_port(&self, id: Id) -> Result<&Port> {
        self.ports.get(&id).ok_or(GraphError::UnknownPort(id))
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Whether explicit ids and soft removal are currently allowed
    pub fn is_loading(&self) -> bool {
        self.registry.is_loading()
    }

    /// Run `load` in loading mode.
    ///
    /// Parsers restore saved ids inside this scope. Items soft-removed and not
    /// re-inserted by the time the outermost scope ends are purged together
    /// with everything they still own.
    pub fn loading<R>(&mut self, load: impl FnOnce(&mut Self) -> R) -> R {
        let nested = self.registry.is_loading();
        self.registry.begin_loading();
        let result = load(self);
        if !nested {
            self.registry.end_loading();
            self.purge_detached();
        }
        result
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    /// Add a top-level network
    pub fn add_root(&mut self, network: NetworkElement) -> Result<Id> {
        self.insert_member(Owner::Roots, None, network)
    }

    /// Remove a top-level network and everything it contains
    pub fn remove_root(&mut self, network: Id) -> Result<NetworkElement> {
        self.remove_element(network)
    }

    /// Append an element to a network
    pub fn add_element(&mut self, network: Id, element: NetworkElement) -> Result<Id> {
        self.insert_member(Owner::Network(network), None, element)
    }

    /// Insert an element into a network at `index`
    pub fn insert_element(&mut self, network: Id, index: usize, element: NetworkElement) -> Result<Id> {
        self.insert_member(Owner::Network(network), Some(index), element)
    }

    /// Remove an element (root or nested) with its full teardown cascade
    pub fn remove_element(&mut self, element: Id) -> Result<NetworkElement> {
        self.remove_member(element)
    }

    /// Replace the element at `index` of a network
    pub fn replace_element(
        &mut self,
        network: Id,
        index: usize,
        element: NetworkElement,
    ) -> Result<(Id, NetworkElement)> {
        self.require_network(network)?;
        self.replace_member(Owner::Network(network), index, element)
    }

    /// Remove every element of a network
    pub fn clear_elements(&mut self, network: Id) -> Result<Vec<NetworkElement>> {
        self.require_network(network)?;
        self.clear_members(Owner::Network(network))
    }

    /// Append a port to an element
    pub fn add_port(&mut self, element: Id, port: Port) -> Result<Id> {
        self.insert_member(Owner::Element(element), None, port)
    }

    /// Insert a port into an element at `index`
    pub fn insert_port(&mut self, element: Id, index: usize, port: Port) -> Result<Id> {
        self.insert_member(Owner::Element(element), Some(index), port)
    }

    /// Remove a port, its connectors and its binding
    pub fn remove_port(&mut self, port: Id) -> Result<Port> {
        self.remove_member(port)
    }

    /// Replace the port at `index` of an element
    pub fn replace_port(&mut self, element: Id, index: usize, port: Port) -> Result<(Id, Port)> {
        self.require_element(element)?;
        self.replace_member(Owner::Element(element), index, port)
    }

    /// Remove every port of an element
    pub fn clear_ports(&mut self, element: Id) -> Result<Vec<Port>> {
        self.require_element(element)?;
        self.clear_members(Owner::Element(element))
    }

    /// Add a connector restored by a parser (loading only).
    ///
    /// Interactive edits use [`connect`](Self::connect), which decides legality.
    pub fn add_connector(&mut self, network: Id, connector: Connector) -> Result<Id> {
        if !self.is_loading() {
            return Err(GraphError::NotLoading(connector.id()));
        }
        self.insert_member(Owner::Network(network), None, connector)
    }

    /// Remove a connector
    pub fn remove_connector(&mut self, connector: Id) -> Result<Connector> {
        self.remove_member(connector)
    }

    /// Remove every connector of a network
    pub fn clear_connectors(&mut self, network: Id) -> Result<Vec<Connector>> {
        self.require_network(network)?;
        self.clear_members(Owner::Network(network))
    }

    /// Detach an element without teardown (loading only)
    pub fn soft_remove_element(&mut self, element: Id) -> Result<NetworkElement> {
        self.soft_remove_member(element)
    }

    /// Detach a port without teardown (loading only)
    pub fn soft_remove_port(&mut self, port: Id) -> Result<Port> {
        self.soft_remove_member(port)
    }

    /// Detach a connector without teardown (loading only)
    pub fn soft_remove_connector(&mut self, connector: Id) -> Result<Connector> {
        self.soft_remove_member(connector)
    }

    // ------------------------------------------------------------------
    // Representation references
    // ------------------------------------------------------------------

    /// Attach (or clear) the external representation of any registered object
    pub fn set_representation(&mut self, id: Id, representation: Option<RepresentationRef>) -> Result<()> {
        match id.scope() {
            Scope::Element => self
                .elements
                .get_mut(&id)
                .ok_or(GraphError::UnknownElement(id))?
                .set_representation(representation),
            Scope::Port => self
                .ports
                .get_mut(&id)
                .ok_or(GraphError::UnknownPort(id))?
                .set_representation(representation),
            Scope::Connector => self
                .connectors
                .get_mut(&id)
                .ok_or(GraphError::UnknownConnector(id))?
                .set_representation(representation),
            Scope::Unowned => return Err(GraphError::EmptyId),
        }
        Ok(())
    }

    /// External representation of any registered object
    pub fn representation(&self, id: Id) -> Option<&RepresentationRef> {
        match id.scope() {
            Scope::Element => self.elements.get(&id)?.representation(),
            Scope::Port => self.ports.get(&id)?.representation(),
            Scope::Connector => self.connectors.get(&id)?.representation(),
            Scope::Unowned => None,
        }
    }

    /// Find the object an external representation belongs to
    pub fn find_by_representation(&self, representation: &RepresentationRef) -> Option<Id> {
        let matches = |candidate: Option<&RepresentationRef>| candidate == Some(representation);
        self.elements
            .values()
            .find(|e| matches(e.representation()))
            .map(NetworkElement::id)
            .or_else(|| {
                self.ports
                    .values()
                    .find(|p| matches(p.representation()))
                    .map(Port::id)
            })
            .or_else(|| {
                self.connectors
                    .values()
                    .find(|c| matches(c.representation()))
                    .map(Connector::id)
            })
    }
}
