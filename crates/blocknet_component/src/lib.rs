// SPDX-License-Identifier: MIT OR Apache-2.0
//! Component system contract for blocknet.
//!
//! The network graph in `blocknet_graph` is layered on top of a hierarchical
//! component system. This crate defines the narrow capability set the graph
//! consumes from it:
//! - Child enumeration and classification by instance type
//! - Adding/removing child components
//! - Instance bindings between graph entities and components
//! - A change feed for child additions/removals
//! - Scoped suspension of access checks
//!
//! ## Architecture
//!
//! [`ComponentSystem`] is the seam. [`ComponentTree`] is an in-memory
//! implementation used by the editor and by tests.

pub mod access;
pub mod binding;
pub mod component;
pub mod system;
pub mod tree;

pub use access::AccessGuard;
pub use binding::{EntityKey, Instance, InstanceId};
pub use component::{ChildEntry, Component, ComponentId, InstanceType};
pub use system::{ComponentChange, ComponentError, ComponentSystem};
pub use tree::ComponentTree;
