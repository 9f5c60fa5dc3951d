// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compound identities for registered graph objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Owning scope of an id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    /// Not registered
    Unowned,
    /// Blocks and networks
    Element,
    /// Ports
    Port,
    /// Connectors
    Connector,
}

impl Scope {
    /// Display prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Unowned => "-",
            Self::Element => "E",
            Self::Port => "P",
            Self::Connector => "C",
        }
    }
}

/// Project-wide unique identifier: scope token plus local sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id {
    scope: Scope,
    seq: u64,
}

impl Id {
    /// Id of an object that is not a member of any collection
    pub const EMPTY: Id = Id {
        scope: Scope::Unowned,
        seq: 0,
    };

    /// Create an id from its parts (used by parsers restoring saved ids)
    pub const fn new(scope: Scope, seq: u64) -> Self {
        Self { scope, seq }
    }

    /// Scope token
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Local sequence number
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Whether this is the empty id
    pub fn is_empty(&self) -> bool {
        self.scope == Scope::Unowned
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("-")
        } else {
            write!(f, "{}{}", self.scope.prefix(), self.seq)
        }
    }
}

/// Kind of a registered object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Network element that owns nested elements
    Network,
    /// Leaf network element
    Block,
    /// Port of an element
    Port,
    /// Connector between two ports
    Connector,
}

impl ObjectKind {
    /// Scope ids of this kind are issued in
    pub fn scope(&self) -> Scope {
        match self {
            Self::Network | Self::Block => Scope::Element,
            Self::Port => Scope::Port,
            Self::Connector => Scope::Connector,
        }
    }
}
