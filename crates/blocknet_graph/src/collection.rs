// SPDX-License-Identifier: MIT OR Apache-2.0
//! Managed collections.
//!
//! Ports, contained elements, contained connectors and top-level networks all
//! live in [`ManagedCollection`]s. The generic operations in this module are
//! the only code that assigns or revokes identity and ownership:
//!
//! - insert: ownership check, id assignment or reservation, back-reference
//! - remove: teardown cascade, back-reference and id cleared, id freed
//! - replace / clear: expressed through remove and insert
//! - soft remove: detaches without teardown or notification (loading only)
//!
//! Every mutation notifies the project's event sinks after the collection
//! has been updated.

use crate::connector::Connector;
use crate::element::NetworkElement;
use crate::error::{GraphError, Result};
use crate::events::GraphEvent;
use crate::id::{Id, ObjectKind, Scope};
use crate::port::Port;
use crate::project::Project;
use blocknet_component::ComponentSystem;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Owner of a managed collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// The project's top-level networks
    Roots,
    /// A network (contained elements or contained connectors)
    Network(Id),
    /// An element (its ports)
    Element(Id),
}

impl Owner {
    /// Id of the owning object, `None` for the root collection
    pub fn id(&self) -> Option<Id> {
        match self {
            Self::Roots => None,
            Self::Network(id) | Self::Element(id) => Some(*id),
        }
    }
}

/// Ordered list of member ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedCollection {
    items: Vec<Id>,
}

impl ManagedCollection {
    /// Members in order
    pub fn as_slice(&self) -> &[Id] {
        &self.items
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if `id` is a member
    pub fn contains(&self, id: Id) -> bool {
        self.items.contains(&id)
    }

    /// Index of a member
    pub fn position(&self, id: Id) -> Option<usize> {
        self.items.iter().position(|item| *item == id)
    }

    pub(crate) fn insert(&mut self, index: usize, id: Id) {
        self.items.insert(index, id);
    }

    pub(crate) fn remove(&mut self, id: Id) -> Option<usize> {
        let index = self.position(id)?;
        self.items.remove(index);
        Some(index)
    }
}

/// Object type that can be looked up by id
pub trait Registered: Sized {
    /// Scope ids of this type are issued in
    const SCOPE: Scope;

    /// Look up a registered object in a project
    fn lookup<C>(project: &Project<C>, id: Id) -> Option<&Self>;
}

impl Registered for NetworkElement {
    const SCOPE: Scope = Scope::Element;

    fn lookup<C>(project: &Project<C>, id: Id) -> Option<&Self> {
        project.elements.get(&id)
    }
}

impl Registered for Port {
    const SCOPE: Scope = Scope::Port;

    fn lookup<C>(project: &Project<C>, id: Id) -> Option<&Self> {
        project.ports.get(&id)
    }
}

impl Registered for Connector {
    const SCOPE: Scope = Scope::Connector;

    fn lookup<C>(project: &Project<C>, id: Id) -> Option<&Self> {
        project.connectors.get(&id)
    }
}

/// Member of a managed collection
pub(crate) trait Member: Registered {
    fn id(&self) -> Id;
    fn set_id(&mut self, id: Id);
    fn owner(&self) -> Option<Owner>;
    fn set_owner(&mut self, owner: Option<Owner>);
    fn object_kind(&self) -> ObjectKind;
    fn carries_members(&self) -> bool;
    /// Reset everything a collection assigned while the item was a member
    fn detach(&mut self);

    fn unknown(id: Id) -> GraphError;
    fn arena_mut<C>(project: &mut Project<C>) -> &mut IndexMap<Id, Self>;
    fn collection_mut<C>(project: &mut Project<C>, owner: Owner) -> Option<&mut ManagedCollection>;

    /// Check that `item` may become a member of `owner`
    fn validate<C: ComponentSystem>(project: &Project<C>, owner: Owner, item: &Self) -> Result<()>;

    /// Cascade run while the item is still registered
    fn teardown<C: ComponentSystem>(_project: &mut Project<C>, _id: Id) {}

    /// Hook run after the item left the collection
    fn finished<C: ComponentSystem>(_project: &mut Project<C>, _id: Id) {}

    fn added_event(owner: Owner, id: Id) -> GraphEvent;
    fn removed_event(owner: Owner, id: Id) -> GraphEvent;
}

impl Member for NetworkElement {
    fn id(&self) -> Id {
        NetworkElement::id(self)
    }

    fn set_id(&mut self, id: Id) {
        NetworkElement::set_id(self, id);
    }

    fn owner(&self) -> Option<Owner> {
        NetworkElement::owner(self)
    }

    fn set_owner(&mut self, owner: Option<Owner>) {
        NetworkElement::set_owner(self, owner);
    }

    fn object_kind(&self) -> ObjectKind {
        NetworkElement::object_kind(self)
    }

    fn carries_members(&self) -> bool {
        NetworkElement::carries_members(self)
    }

    fn detach(&mut self) {
        self.set_id(Id::EMPTY);
        self.set_owner(None);
        self.set_representation(None);
        self.set_binding(None);
        self.set_binding_state(Default::default());
    }

    fn unknown(id: Id) -> GraphError {
        GraphError::UnknownElement(id)
    }

    fn arena_mut<C>(project: &mut Project<C>) -> &mut IndexMap<Id, Self> {
        &mut project.elements
    }

    fn collection_mut<C>(project: &mut Project<C>, owner: Owner) -> Option<&mut ManagedCollection> {
        match owner {
            Owner::Roots => Some(&mut project.roots),
            Owner::Network(network) => project.elements.get_mut(&network)?.elements_mut(),
            Owner::Element(_) => None,
        }
    }

    fn validate<C: ComponentSystem>(project: &Project<C>, owner: Owner, item: &Self) -> Result<()> {
        match owner {
            Owner::Roots if item.is_network() => Ok(()),
            Owner::Roots => Err(GraphError::RootRequiresNetwork),
            Owner::Network(network) | Owner::Element(network) => {
                project.require_network(network).map(|_| ())
            }
        }
    }

    fn teardown<C: ComponentSystem>(project: &mut Project<C>, id: Id) {
        project.emit(GraphEvent::ElementBeingDeleted { element: id });
        project.release_bindings(id);

        let (connectors, elements) = match project.elements.get(&id) {
            Some(element) => (
                element.contained_connectors().to_vec(),
                element.contained_elements().to_vec(),
            ),
            None => return,
        };
        for connector in connectors {
            if let Err(err) = project.remove_member::<Connector>(connector) {
                tracing::warn!("Failed to remove {connector} while deleting {id}: {err}");
            }
        }
        for element in elements {
            if let Err(err) = project.remove_member::<NetworkElement>(element) {
                tracing::warn!("Failed to remove {element} while deleting {id}: {err}");
            }
        }

        let ports = project
            .elements
            .get(&id)
            .map(|element| element.ports().to_vec())
            .unwrap_or_default();
        for port in ports {
            if let Err(err) = project.remove_member::<Port>(port) {
                tracing::warn!("Failed to remove {port} while deleting {id}: {err}");
            }
        }
    }

    fn finished<C: ComponentSystem>(project: &mut Project<C>, id: Id) {
        project.emit(GraphEvent::ElementDeleted { element: id });
    }

    fn added_event(owner: Owner, id: Id) -> GraphEvent {
        GraphEvent::ElementAdded {
            parent: owner.id(),
            element: id,
        }
    }

    fn removed_event(owner: Owner, id: Id) -> GraphEvent {
        GraphEvent::ElementRemoved {
            parent: owner.id(),
            element: id,
        }
    }
}

impl Member for Port {
    fn id(&self) -> Id {
        Port::id(self)
    }

    fn set_id(&mut self, id: Id) {
        Port::set_id(self, id);
    }

    fn owner(&self) -> Option<Owner> {
        Port::owner(self)
    }

    fn set_owner(&mut self, owner: Option<Owner>) {
        Port::set_owner(self, owner);
    }

    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Port
    }

    fn carries_members(&self) -> bool {
        false
    }

    fn detach(&mut self) {
        self.set_id(Id::EMPTY);
        self.set_owner(None);
        self.set_representation(None);
        self.set_binding(None);
    }

    fn unknown(id: Id) -> GraphError {
        GraphError::UnknownPort(id)
    }

    fn arena_mut<C>(project: &mut Project<C>) -> &mut IndexMap<Id, Self> {
        &mut project.ports
    }

    fn collection_mut<C>(project: &mut Project<C>, owner: Owner) -> Option<&mut ManagedCollection> {
        match owner {
            Owner::Element(element) => Some(project.elements.get_mut(&element)?.ports_mut()),
            Owner::Roots | Owner::Network(_) => None,
        }
    }

    fn validate<C: ComponentSystem>(project: &Project<C>, owner: Owner, _item: &Self) -> Result<()> {
        match owner {
            Owner::Element(element) | Owner::Network(element) => {
                project.require_element(element).map(|_| ())
            }
            Owner::Roots => Err(GraphError::UnknownElement(Id::EMPTY)),
        }
    }

    fn teardown<C: ComponentSystem>(project: &mut Project<C>, id: Id) {
        if let Err(err) = project.remove_connections(id) {
            tracing::warn!("Failed to disconnect {id} before removal: {err}");
        }
        project.release_port_binding(id);
    }

    fn added_event(owner: Owner, id: Id) -> GraphEvent {
        GraphEvent::PortAdded {
            element: owner.id().unwrap_or_default(),
            port: id,
        }
    }

    fn removed_event(owner: Owner, id: Id) -> GraphEvent {
        GraphEvent::PortRemoved {
            element: owner.id().unwrap_or_default(),
            port: id,
        }
    }
}

impl Member for Connector {
    fn id(&self) -> Id {
        Connector::id(self)
    }

    fn set_id(&mut self, id: Id) {
        Connector::set_id(self, id);
    }

    fn owner(&self) -> Option<Owner> {
        Connector::owner(self)
    }

    fn set_owner(&mut self, owner: Option<Owner>) {
        Connector::set_owner(self, owner);
    }

    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Connector
    }

    fn carries_members(&self) -> bool {
        false
    }

    fn detach(&mut self) {
        self.set_id(Id::EMPTY);
        self.set_owner(None);
        self.set_representation(None);
    }

    fn unknown(id: Id) -> GraphError {
        GraphError::UnknownConnector(id)
    }

    fn arena_mut<C>(project: &mut Project<C>) -> &mut IndexMap<Id, Self> {
        &mut project.connectors
    }

    fn collection_mut<C>(project: &mut Project<C>, owner: Owner) -> Option<&mut ManagedCollection> {
        match owner {
            Owner::Network(network) => project.elements.get_mut(&network)?.connectors_mut(),
            Owner::Roots | Owner::Element(_) => None,
        }
    }

    fn validate<C: ComponentSystem>(project: &Project<C>, owner: Owner, item: &Self) -> Result<()> {
        match owner {
            Owner::Network(network) | Owner::Element(network) => {
                project.require_network(network)?;
            }
            Owner::Roots => return Err(GraphError::NotANetwork(Id::EMPTY)),
        }
        project.require_port(item.source())?;
        project.require_port(item.target())?;
        Ok(())
    }

    fn added_event(owner: Owner, id: Id) -> GraphEvent {
        GraphEvent::ConnectorAdded {
            network: owner.id().unwrap_or_default(),
            connector: id,
        }
    }

    fn removed_event(owner: Owner, id: Id) -> GraphEvent {
        GraphEvent::ConnectorRemoved {
            network: owner.id().unwrap_or_default(),
            connector: id,
        }
    }
}

impl<C: ComponentSystem> Project<C> {
    /// Validate an insertion without touching any state
    fn check_insert<T: Member>(&self, owner: Owner, item: &T) -> Result<()> {
        if item.owner().is_some() {
            return Err(GraphError::AlreadyOwned(item.id()));
        }
        if item.carries_members() && !self.registry.is_loading() {
            return Err(GraphError::CarriesMembers(item.id()));
        }
        T::validate(self, owner, item)?;
        if !item.id().is_empty() {
            self.registry.check_reservable(item.object_kind(), item.id())?;
        }
        Ok(())
    }

    fn collection_len<T: Member>(&mut self, owner: Owner) -> Result<usize> {
        T::collection_mut(self, owner)
            .map(|collection| collection.len())
            .ok_or_else(|| GraphError::UnknownElement(owner.id().unwrap_or_default()))
    }

    /// Insert `item` into the collection of `owner` at `index` (append when `None`)
    pub(crate) fn insert_member<T: Member>(
        &mut self,
        owner: Owner,
        index: Option<usize>,
        mut item: T,
    ) -> Result<Id> {
        self.check_insert(owner, &item)?;
        let len = self.collection_len::<T>(owner)?;
        let index = index.unwrap_or(len);
        if index > len {
            return Err(GraphError::IndexOutOfBounds { index, len });
        }

        let id = if item.id().is_empty() {
            self.registry.next_id(item.object_kind())?
        } else {
            self.registry.reserve(item.object_kind(), item.id())?;
            self.soft_removed.retain(|detached| *detached != item.id());
            item.id()
        };
        item.set_id(id);
        item.set_owner(Some(owner));
        T::arena_mut(self).insert(id, item);
        if let Some(collection) = T::collection_mut(self, owner) {
            collection.insert(index, id);
        }

        tracing::trace!("Inserted {id} into {owner:?} at {index}");
        self.emit(T::added_event(owner, id));
        Ok(id)
    }

    /// Remove a member, running its teardown cascade
    pub(crate) fn remove_member<T: Member>(&mut self, id: Id) -> Result<T> {
        let owner = T::lookup(self, id)
            .and_then(Member::owner)
            .ok_or_else(|| T::unknown(id))?;

        T::teardown(self, id);

        let mut item = T::arena_mut(self)
            .swap_remove(&id)
            .ok_or_else(|| T::unknown(id))?;
        if let Some(collection) = T::collection_mut(self, owner) {
            collection.remove(id);
        }
        self.registry.remove(id);
        item.detach();

        tracing::trace!("Removed {id} from {owner:?}");
        self.emit(T::removed_event(owner, id));
        T::finished(self, id);
        Ok(item)
    }

    /// Replace the member at `index` with `item`
    pub(crate) fn replace_member<T: Member>(&mut self, owner: Owner, index: usize, item: T) -> Result<(Id, T)> {
        self.check_insert(owner, &item)?;
        let old = T::collection_mut(self, owner)
            .ok_or_else(|| GraphError::UnknownElement(owner.id().unwrap_or_default()))
            .and_then(|collection| {
                collection
                    .as_slice()
                    .get(index)
                    .copied()
                    .ok_or(GraphError::IndexOutOfBounds {
                        index,
                        len: collection.len(),
                    })
            })?;

        let removed = self.remove_member::<T>(old)?;
        let id = self.insert_member(owner, Some(index), item)?;
        Ok((id, removed))
    }

    /// Remove every member of the collection of `owner`
    pub(crate) fn clear_members<T: Member>(&mut self, owner: Owner) -> Result<Vec<T>> {
        let ids = T::collection_mut(self, owner)
            .map(|collection| collection.as_slice().to_vec())
            .ok_or_else(|| GraphError::UnknownElement(owner.id().unwrap_or_default()))?;

        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            // Cascades may already have removed later members
            if T::lookup(self, id).is_some() {
                removed.push(self.remove_member::<T>(id)?);
            }
        }
        Ok(removed)
    }

    /// Detach a member without teardown or notification, keeping its id.
    ///
    /// Only legal while loading. The item keeps its own members and may be
    /// inserted again (anywhere) before loading ends.
    pub(crate) fn soft_remove_member<T: Member>(&mut self, id: Id) -> Result<T> {
        if !self.registry.is_loading() {
            return Err(GraphError::NotLoading(id));
        }
        let owner = T::lookup(self, id)
            .and_then(Member::owner)
            .ok_or_else(|| T::unknown(id))?;

        let mut item = T::arena_mut(self)
            .swap_remove(&id)
            .ok_or_else(|| T::unknown(id))?;
        if let Some(collection) = T::collection_mut(self, owner) {
            collection.remove(id);
        }
        self.registry.remove(id);
        item.set_owner(None);
        self.soft_removed.push(id);

        tracing::trace!("Soft-removed {id} from {owner:?}");
        Ok(item)
    }

    /// Drop everything left behind by soft removals that were never undone
    pub(crate) fn purge_detached(&mut self) {
        if self.soft_removed.is_empty() {
            return;
        }
        tracing::warn!(
            "{} item(s) were soft-removed and never re-inserted: {:?}",
            self.soft_removed.len(),
            self.soft_removed
        );
        self.soft_removed.clear();

        loop {
            let orphan_elements: Vec<Id> = self
                .elements
                .values()
                .filter(|e| matches!(e.owner(), Some(Owner::Network(n)) if !self.elements.contains_key(&n)))
                .map(NetworkElement::id)
                .collect();
            let orphan_ports: Vec<Id> = self
                .ports
                .values()
                .filter(|p| matches!(p.owner(), Some(Owner::Element(e)) if !self.elements.contains_key(&e)))
                .map(Port::id)
                .collect();
            let orphan_connectors: Vec<Id> = self
                .connectors
                .values()
                .filter(|c| {
                    matches!(c.owner(), Some(Owner::Network(n)) if !self.elements.contains_key(&n))
                        || !self.ports.contains_key(&c.source())
                        || !self.ports.contains_key(&c.target())
                })
                .map(Connector::id)
                .collect();

            if orphan_elements.is_empty() && orphan_ports.is_empty() && orphan_connectors.is_empty() {
                break;
            }

            for id in orphan_connectors {
                if let Some(connector) = self.connectors.swap_remove(&id) {
                    if let Some(network) = connector.parent_network() {
                        if let Some(collection) = self.elements.get_mut(&network).and_then(NetworkElement::connectors_mut) {
                            collection.remove(id);
                        }
                    }
                }
                self.registry.remove(id);
            }
            for id in orphan_ports {
                self.ports.swap_remove(&id);
                self.registry.remove(id);
            }
            for id in orphan_elements {
                self.elements.swap_remove(&id);
                self.registry.remove(id);
            }
        }
    }
}
