// SPDX-License-Identifier: MIT OR Apache-2.0
//! Identity registry.
//!
//! Every object that is a member of a managed collection is registered here
//! under a unique [`Id`]. Fresh ids are issued per scope; explicit ids coming
//! from a parser are reserved, which is only legal in loading mode.

use crate::error::{GraphError, Result};
use crate::id::{Id, ObjectKind, Scope};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Registry of live ids
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    /// Registered ids and the kind of object behind them
    entries: IndexMap<Id, ObjectKind>,
    /// Next sequence number per scope
    next: BTreeMap<Scope, u64>,
    /// Whether explicit ids may be reserved
    loading: bool,
}

impl IdentityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh id for an object of `kind`
    pub fn next_id(&mut self, kind: ObjectKind) -> Result<Id> {
        let scope = kind.scope();
        let counter = self.next.entry(scope).or_insert(1);
        loop {
            let id = Id::new(scope, *counter);
            *counter = counter.checked_add(1).ok_or(GraphError::IdExhausted(scope))?;
            if !self.entries.contains_key(&id) {
                self.entries.insert(id, kind);
                return Ok(id);
            }
        }
    }

    /// Check that `id` could be reserved for an object of `kind`
    pub fn check_reservable(&self, kind: ObjectKind, id: Id) -> Result<()> {
        if id.is_empty() {
            return Err(GraphError::EmptyId);
        }
        if id.scope() != kind.scope() {
            return Err(GraphError::ScopeMismatch {
                id,
                expected: kind.scope(),
            });
        }
        if !self.loading {
            return Err(GraphError::NotLoading(id));
        }
        if self.entries.contains_key(&id) {
            return Err(GraphError::IdInUse(id));
        }
        Ok(())
    }

    /// Claim a specific id for an object of `kind`
    pub fn reserve(&mut self, kind: ObjectKind, id: Id) -> Result<()> {
        self.check_reservable(kind, id)?;
        // The scope must still be able to issue an id after this one
        let following = id.seq().checked_add(1).ok_or(GraphError::IdExhausted(id.scope()))?;
        self.entries.insert(id, kind);
        let counter = self.next.entry(id.scope()).or_insert(1);
        *counter = (*counter).max(following);
        Ok(())
    }

    /// Free an id
    pub fn remove(&mut self, id: Id) -> Option<ObjectKind> {
        self.entries.swap_remove(&id)
    }

    /// Kind of object registered under `id`
    pub fn kind_of(&self, id: Id) -> Option<ObjectKind> {
        self.entries.get(&id).copied()
    }

    /// Check if an id is registered
    pub fn contains(&self, id: Id) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of registered ids
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no id is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over registered ids
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.entries.keys().copied()
    }

    /// Whether explicit ids may currently be reserved
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub(crate) fn end_loading(&mut self) {
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_is_unique_per_scope() {
        let mut registry = IdentityRegistry::new();
        let a = registry.next_id(ObjectKind::Block).unwrap();
        let b = registry.next_id(ObjectKind::Network).unwrap();
        let p = registry.next_id(ObjectKind::Port).unwrap();

        assert_eq!(a, Id::new(Scope::Element, 1));
        assert_eq!(b, Id::new(Scope::Element, 2));
        assert_eq!(p, Id::new(Scope::Port, 1));
        assert_eq!(registry.kind_of(b), Some(ObjectKind::Network));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_reserve_requires_loading() {
        let mut registry = IdentityRegistry::new();
        let id = Id::new(Scope::Port, 5);

        assert_eq!(
            registry.reserve(ObjectKind::Port, id),
            Err(GraphError::NotLoading(id))
        );

        registry.begin_loading();
        registry.reserve(ObjectKind::Port, id).unwrap();
        assert_eq!(
            registry.reserve(ObjectKind::Port, id),
            Err(GraphError::IdInUse(id))
        );
        registry.end_loading();

        // Fresh ids skip past reserved ones
        assert_eq!(registry.next_id(ObjectKind::Port), Ok(Id::new(Scope::Port, 6)));
    }

    #[test]
    fn test_reserve_rejects_bad_ids() {
        let mut registry = IdentityRegistry::new();
        registry.begin_loading();

        assert_eq!(
            registry.reserve(ObjectKind::Port, Id::EMPTY),
            Err(GraphError::EmptyId)
        );
        let id = Id::new(Scope::Element, 1);
        assert_eq!(
            registry.reserve(ObjectKind::Connector, id),
            Err(GraphError::ScopeMismatch {
                id,
                expected: Scope::Connector
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_frees_id() {
        let mut registry = IdentityRegistry::new();
        let id = registry.next_id(ObjectKind::Connector).unwrap();

        assert_eq!(registry.remove(id), Some(ObjectKind::Connector));
        assert!(!registry.contains(id));
        assert_eq!(registry.remove(id), None);
    }

    #[test]
    fn test_exhausted_scope_is_an_error() {
        let mut registry = IdentityRegistry::new();
        registry.begin_loading();

        let last = Id::new(Scope::Port, u64::MAX);
        assert_eq!(
            registry.reserve(ObjectKind::Port, last),
            Err(GraphError::IdExhausted(Scope::Port))
        );
        assert!(!registry.contains(last));

        registry.reserve(ObjectKind::Port, Id::new(Scope::Port, u64::MAX - 1)).unwrap();
        registry.end_loading();
        assert_eq!(
            registry.next_id(ObjectKind::Port),
            Err(GraphError::IdExhausted(Scope::Port))
        );

        // Other scopes are unaffected
        assert_eq!(registry.next_id(ObjectKind::Block), Ok(Id::new(Scope::Element, 1)));
    }
}
