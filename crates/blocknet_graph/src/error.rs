// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contract violations raised by graph operations.
//!
//! Illegal connection attempts are not errors; see [`Project::connect`](crate::Project::connect).

use crate::id::{Id, Scope};
use blocknet_component::ComponentError;

/// Error from a structural graph operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Element not found
    #[error("Element not found: {0}")]
    UnknownElement(Id),

    /// Port not found
    #[error("Port not found: {0}")]
    UnknownPort(Id),

    /// Connector not found
    #[error("Connector not found: {0}")]
    UnknownConnector(Id),

    /// Element is a network where a block was required
    #[error("Element is not a block: {0}")]
    NotABlock(Id),

    /// Element is a block where a network was required
    #[error("Element is not a network: {0}")]
    NotANetwork(Id),

    /// Item already belongs to a collection
    #[error("Item already belongs to a collection: {0}")]
    AlreadyOwned(Id),

    /// Detached item still carries ports, elements or connectors
    #[error("Detached item still carries members: {0}")]
    CarriesMembers(Id),

    /// Id is already registered
    #[error("Id already in use: {0}")]
    IdInUse(Id),

    /// Explicit id is empty
    #[error("Explicit id must not be empty")]
    EmptyId,

    /// Explicit id belongs to another scope
    #[error("Id {id} is not in scope {expected:?}")]
    ScopeMismatch {
        /// Offending id
        id: Id,
        /// Scope the object lives in
        expected: Scope,
    },

    /// Operation is only legal while loading
    #[error("Operation on {0} requires loading mode")]
    NotLoading(Id),

    /// Only networks can be top-level
    #[error("Only networks can be added as roots")]
    RootRequiresNetwork,

    /// Element has no parent network to convert within
    #[error("Element has no parent network: {0}")]
    NoParentNetwork(Id),

    /// Every sequence number of a scope has been issued
    #[error("No ids left in scope {0:?}")]
    IdExhausted(Scope),

    /// Block is already bound to a component
    #[error("Block is already bound to a component: {0}")]
    AlreadyBound(Id),

    /// Collection index out of bounds
    #[error("Index {index} out of bounds for collection of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Collection length
        len: usize,
    },

    /// Component system rejected an operation
    #[error("Component system error: {0}")]
    Component(#[from] ComponentError),
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
