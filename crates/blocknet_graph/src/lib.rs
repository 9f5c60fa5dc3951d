// SPDX-License-Identifier: MIT OR Apache-2.0
//! Block network core.
//!
//! This crate models a visual network of computational blocks, ports and
//! connectors that is kept consistent with an external component hierarchy:
//! - Identity registry with per-scope ids and load-time reservation
//! - Managed collections enforcing ownership and cascading deletion
//! - Topology-dependent connection protocol
//! - Block/component synchronizer
//! - Block to subnetwork conversion (and back)
//!
//! ## Architecture
//!
//! A [`Project`] owns every element, port and connector in id-keyed arenas.
//! Parent links are plain [`Id`]s; all structural edits go through the
//! managed-collection operations, which raise [`GraphEvent`]s for the
//! registered [`EventSink`]s.

pub mod collection;
pub mod connect;
pub mod connector;
pub mod convert;
pub mod element;
pub mod error;
pub mod events;
pub mod id;
pub mod network;
pub mod port;
pub mod project;
pub mod registry;
pub mod sync;

pub use collection::{ManagedCollection, Owner, Registered};
pub use connect::ConnectionPlan;
pub use connector::Connector;
pub use element::{Binding, BindingState, ElementKind, NetworkElement};
pub use error::{GraphError, Result};
pub use events::{EventError, EventSink, GraphEvent, NullEventSink, RepresentationRef, VecEventSink};
pub use id::{Id, ObjectKind, Scope};
pub use network::Descendants;
pub use port::{Port, PortDirection};
pub use project::Project;
pub use registry::IdentityRegistry;

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use blocknet_component::ComponentTree;

    pub(crate) fn new_project() -> Project<ComponentTree> {
        Project::default()
    }

    pub(crate) fn project_with_root() -> (Project<ComponentTree>, Id) {
        let mut project = new_project();
        let root = project
            .add_root(NetworkElement::network("Root"))
            .expect("root network");
        (project, root)
    }
}
