// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor commands.
//!
//! Each command is one user-level edit of the project. [`EditorState::execute`]
//! snapshots the document around a command and records it for undo/redo.
//!
//! [`EditorState::execute`]: crate::state::EditorState::execute

use blocknet_component::{ComponentId, InstanceType};
use blocknet_graph::{GraphError, Id, NetworkElement, Port, PortDirection, Project, Scope};
use serde::{Deserialize, Serialize};

/// Error type for command execution
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The graph rejected the edit
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Element not found
    #[error("Element not found: {0}")]
    ElementNotFound(Id),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Trait for editor commands that can be undone/redone
pub trait EditorCommand {
    /// Get a description of this command
    fn description(&self) -> String;

    /// Apply the command, returning the id of the object it created (if any)
    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError>;
}

/// Add a top-level network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddRootCommand {
    /// Network name
    pub name: String,
}

impl EditorCommand for AddRootCommand {
    fn description(&self) -> String {
        format!("Add network {}", self.name)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        Ok(Some(project.add_root(NetworkElement::network(&self.name))?))
    }
}

/// Kind of element to add
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewElement {
    /// A block
    Block,
    /// A subnetwork
    Network,
}

/// Add a block or subnetwork to a network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddElementCommand {
    /// Network receiving the element
    pub network: Id,
    /// Element kind
    pub kind: NewElement,
    /// Element name
    pub name: String,
    /// Layout position
    pub position: [f32; 2],
}

impl AddElementCommand {
    /// Add a block at the origin
    pub fn block(network: Id, name: impl Into<String>) -> Self {
        Self {
            network,
            kind: NewElement::Block,
            name: name.into(),
            position: [0.0, 0.0],
        }
    }

    /// Add a subnetwork at the origin
    pub fn network(network: Id, name: impl Into<String>) -> Self {
        Self {
            kind: NewElement::Network,
            ..Self::block(network, name)
        }
    }

    /// Set the position
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }
}

impl EditorCommand for AddElementCommand {
    fn description(&self) -> String {
        format!("Add {}", self.name)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        let element = match self.kind {
            NewElement::Block => NetworkElement::block(&self.name),
            NewElement::Network => NetworkElement::network(&self.name),
        }
        .with_position(self.position[0], self.position[1]);
        Ok(Some(project.add_element(self.network, element)?))
    }
}

/// Add a port to an element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPortCommand {
    /// Owning element
    pub element: Id,
    /// Port name
    pub name: String,
    /// Direction
    pub direction: PortDirection,
}

impl EditorCommand for AddPortCommand {
    fn description(&self) -> String {
        format!("Add port {}", self.name)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        let port = Port::new(&self.name, self.direction);
        Ok(Some(project.add_port(self.element, port)?))
    }
}

/// Delete elements, ports or connectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommand {
    /// Objects to delete
    pub targets: Vec<Id>,
}

impl DeleteCommand {
    /// Delete a single object
    pub fn one(target: Id) -> Self {
        Self {
            targets: vec![target],
        }
    }
}

impl EditorCommand for DeleteCommand {
    fn description(&self) -> String {
        match self.targets.as_slice() {
            [one] => format!("Delete {one}"),
            many => format!("Delete {} objects", many.len()),
        }
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        for target in &self.targets {
            // Earlier deletions may have cascaded into later targets
            if !project.registry().contains(*target) {
                continue;
            }
            match target.scope() {
                Scope::Element if project.element(*target).is_some_and(NetworkElement::is_root) => {
                    project.remove_root(*target)?;
                }
                Scope::Element => {
                    project.remove_element(*target)?;
                }
                Scope::Port => {
                    project.remove_port(*target)?;
                }
                Scope::Connector => {
                    project.remove_connector(*target)?;
                }
                Scope::Unowned => {
                    return Err(CommandError::InvalidOperation(format!("Cannot delete {target}")));
                }
            }
        }
        Ok(None)
    }
}

/// Connect two ports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectCommand {
    /// First port
    pub a: Id,
    /// Second port
    pub b: Id,
}

impl EditorCommand for ConnectCommand {
    fn description(&self) -> String {
        format!("Connect {} and {}", self.a, self.b)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        Ok(project.connect(self.a, self.b)?)
    }
}

/// Remove every connector touching a port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisconnectCommand {
    /// Port to disconnect
    pub port: Id,
}

impl EditorCommand for DisconnectCommand {
    fn description(&self) -> String {
        format!("Disconnect {}", self.port)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        project.remove_connections(self.port)?;
        Ok(None)
    }
}

/// Bind a block to a component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindCommand {
    /// Block to bind
    pub block: Id,
    /// Component to bind to
    pub component: ComponentId,
}

impl EditorCommand for BindCommand {
    fn description(&self) -> String {
        format!("Bind {}", self.block)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        project.bind_component(self.block, self.component)?;
        Ok(None)
    }
}

/// Unbind a block from its component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnbindCommand {
    /// Block to unbind
    pub block: Id,
}

impl EditorCommand for UnbindCommand {
    fn description(&self) -> String {
        format!("Unbind {}", self.block)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        project.unbind_component(self.block)?;
        Ok(None)
    }
}

/// Add a child to a component (ports of bound blocks follow)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSubcomponentCommand {
    /// Parent component
    pub parent: ComponentId,
    /// Slot name
    pub slot: String,
    /// Role of the child
    pub instance_type: InstanceType,
}

impl EditorCommand for AddSubcomponentCommand {
    fn description(&self) -> String {
        format!("Add {} {}", self.instance_type.name(), self.slot)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        let child = project.add_subcomponent(self.parent, &self.slot, self.instance_type)?;
        Ok(project
            .block_for_component(self.parent)
            .and_then(|block| project.element(block))
            .and_then(|block| {
                block
                    .ports()
                    .iter()
                    .copied()
                    .find(|p| project.port(*p).and_then(Port::binding).is_some_and(|b| b.component == child))
            }))
    }
}

/// Remove a child from a component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveSubcomponentCommand {
    /// Parent component
    pub parent: ComponentId,
    /// Child to remove
    pub child: ComponentId,
}

impl EditorCommand for RemoveSubcomponentCommand {
    fn description(&self) -> String {
        format!("Remove sub-component {}", self.child)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        project.remove_subcomponent(self.parent, self.child)?;
        Ok(None)
    }
}

/// Direction of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conversion {
    /// Block becomes a subnetwork
    ToSubnetwork,
    /// Subnetwork becomes a block
    ToBlock,
}

/// Convert a block into a subnetwork or back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertCommand {
    /// Element to convert
    pub element: Id,
    /// Conversion direction
    pub conversion: Conversion,
}

impl EditorCommand for ConvertCommand {
    fn description(&self) -> String {
        match self.conversion {
            Conversion::ToSubnetwork => format!("Convert {} to subnetwork", self.element),
            Conversion::ToBlock => format!("Convert {} to block", self.element),
        }
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        let id = match self.conversion {
            Conversion::ToSubnetwork => project.convert_block_to_subnetwork(self.element)?,
            Conversion::ToBlock => project.convert_subnetwork_to_block(self.element)?,
        };
        Ok(Some(id))
    }
}

/// Rename an element or port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameCommand {
    /// Element or port
    pub target: Id,
    /// New name
    pub name: String,
}

impl EditorCommand for RenameCommand {
    fn description(&self) -> String {
        format!("Rename {} to {}", self.target, self.name)
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        if let Some(element) = project.element_mut(self.target) {
            element.name.clone_from(&self.name);
        } else if let Some(port) = project.port_mut(self.target) {
            port.name.clone_from(&self.name);
        } else {
            return Err(CommandError::ElementNotFound(self.target));
        }
        Ok(None)
    }
}

/// Move elements to new positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCommand {
    /// Elements and their new positions
    pub moves: Vec<(Id, [f32; 2])>,
}

impl EditorCommand for MoveCommand {
    fn description(&self) -> String {
        match self.moves.len() {
            1 => "Move element".to_string(),
            n => format!("Move {n} elements"),
        }
    }

    fn execute(&self, project: &mut Project) -> Result<Option<Id>, CommandError> {
        for (id, position) in &self.moves {
            let element = project
                .element_mut(*id)
                .ok_or(CommandError::ElementNotFound(*id))?;
            element.position = *position;
        }
        Ok(None)
    }
}
