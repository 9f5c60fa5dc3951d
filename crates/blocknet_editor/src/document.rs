// SPDX-License-Identifier: MIT OR Apache-2.0
//! Network documents.
//!
//! A document is the serializable form of a project: the element hierarchy
//! with its saved ids, ports, connectors and bindings, plus the component
//! tree. Restoring replays it through the project's loading mode so every
//! saved id is reserved again.

use crate::error::{EditorError, Result};
use blocknet_component::ComponentTree;
use blocknet_graph::{
    Binding, Connector, Id, NetworkElement, Port, PortDirection, Project, RepresentationRef,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current document format version
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// Document file extension
pub const DOCUMENT_EXTENSION: &str = "blocknet";

/// Saved port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDoc {
    /// Saved id
    pub id: Id,
    /// Port name
    pub name: String,
    /// Direction
    pub direction: PortDirection,
    /// Binding to a port-typed sub-component
    #[serde(default)]
    pub binding: Option<Binding>,
    /// External representation
    #[serde(default)]
    pub representation: Option<RepresentationRef>,
}

/// Saved connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorDoc {
    /// Saved id
    pub id: Id,
    /// Source port
    pub source: Id,
    /// Target port
    pub target: Id,
    /// External representation
    #[serde(default)]
    pub representation: Option<RepresentationRef>,
}

/// Element-kind specific part of a saved element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementDocKind {
    /// A block with its optional binding
    Block {
        /// Component binding
        #[serde(default)]
        binding: Option<Binding>,
    },
    /// A network with its contents
    Network {
        /// Contained elements in order
        #[serde(default)]
        elements: Vec<ElementDoc>,
        /// Contained connectors in order
        #[serde(default)]
        connectors: Vec<ConnectorDoc>,
    },
}

/// Saved element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDoc {
    /// Saved id
    pub id: Id,
    /// Element name
    pub name: String,
    /// Layout position
    #[serde(default)]
    pub position: [f32; 2],
    /// Ports in order
    #[serde(default)]
    pub ports: Vec<PortDoc>,
    /// Block or network data
    pub kind: ElementDocKind,
    /// External representation
    #[serde(default)]
    pub representation: Option<RepresentationRef>,
}

/// A saved project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Format version
    pub version: u32,
    /// Document name
    pub name: String,
    /// Top-level networks
    pub networks: Vec<ElementDoc>,
    /// Component tree the blocks are bound to
    pub components: ComponentTree,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: DOCUMENT_FORMAT_VERSION,
            name: name.into(),
            networks: Vec::new(),
            components: ComponentTree::new(),
        }
    }

    /// Capture the current state of a project
    pub fn capture(project: &Project, name: impl Into<String>) -> Self {
        let networks = project
            .roots()
            .iter()
            .filter_map(|id| capture_element(project, *id))
            .collect();
        Self {
            version: DOCUMENT_FORMAT_VERSION,
            name: name.into(),
            networks,
            components: project.components().clone(),
        }
    }

    /// Rebuild a project from this document
    pub fn restore(&self) -> Result<Project> {
        check_version("Document", self.version, DOCUMENT_FORMAT_VERSION)?;

        let mut project = Project::new(self.components.clone());
        project.loading(|p| -> Result<()> {
            for network in &self.networks {
                restore_element(p, None, network)?;
            }
            Ok(())
        })?;

        for block in project.elements().filter(|e| e.binding().is_some()) {
            if !project.is_synchronized(block.id()) {
                tracing::warn!("Block {} ({}) does not match its component", block.id(), block.name);
            }
        }
        tracing::debug!(
            "Restored document '{}' with {} element(s)",
            self.name,
            project.element_count()
        );
        Ok(project)
    }

    /// Number of saved elements at any depth
    pub fn element_count(&self) -> usize {
        fn count(doc: &ElementDoc) -> usize {
            match &doc.kind {
                ElementDocKind::Block { .. } => 1,
                ElementDocKind::Network { elements, .. } => 1 + elements.iter().map(count).sum::<usize>(),
            }
        }
        self.networks.iter().map(count).sum()
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from RON
    pub fn from_ron(s: &str) -> Result<Self> {
        let document: Self = ron::from_str(s)?;
        check_version("Document", document.version, DOCUMENT_FORMAT_VERSION)?;
        Ok(document)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!("Saved document '{}' to {:?}", self.name, path);
        Ok(())
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document = Self::from_ron(&content)?;
        tracing::info!("Loaded document '{}' from {:?}", document.name, path);
        Ok(document)
    }
}

pub(crate) fn check_version(kind: &'static str, found: u32, supported: u32) -> Result<()> {
    if found > supported {
        return Err(EditorError::UnsupportedVersion {
            kind,
            found,
            supported,
        });
    }
    Ok(())
}

fn capture_element(project: &Project, id: Id) -> Option<ElementDoc> {
    let element = project.element(id)?;
    let ports = element
        .ports()
        .iter()
        .filter_map(|p| project.port(*p))
        .map(|port| PortDoc {
            id: port.id(),
            name: port.name.clone(),
            direction: port.direction(),
            binding: port.binding(),
            representation: port.representation().cloned(),
        })
        .collect();

    let kind = if element.is_network() {
        ElementDocKind::Network {
            elements: element
                .contained_elements()
                .iter()
                .filter_map(|e| capture_element(project, *e))
                .collect(),
            connectors: element
                .contained_connectors()
                .iter()
                .filter_map(|c| project.connector(*c))
                .map(|c| ConnectorDoc {
                    id: c.id(),
                    source: c.source(),
                    target: c.target(),
                    representation: c.representation().cloned(),
                })
                .collect(),
        }
    } else {
        ElementDocKind::Block {
            binding: element.binding(),
        }
    };

    Some(ElementDoc {
        id,
        name: element.name.clone(),
        position: element.position,
        ports,
        kind,
        representation: element.representation().cloned(),
    })
}

fn restore_element(project: &mut Project, parent: Option<Id>, doc: &ElementDoc) -> Result<Id> {
    let element = match &doc.kind {
        ElementDocKind::Block { .. } => NetworkElement::parsed_block(doc.id, &doc.name)?,
        ElementDocKind::Network { .. } => NetworkElement::parsed_network(doc.id, &doc.name)?,
    }
    .with_position(doc.position[0], doc.position[1]);

    let id = match parent {
        Some(network) => project.add_element(network, element)?,
        None => project.add_root(element)?,
    };
    if doc.representation.is_some() {
        project.set_representation(id, doc.representation.clone())?;
    }

    for port_doc in &doc.ports {
        let port = project.add_port(id, Port::parsed(port_doc.id, &port_doc.name, port_doc.direction)?)?;
        if let Some(binding) = port_doc.binding {
            project.restore_port_binding(port, binding)?;
        }
        if port_doc.representation.is_some() {
            project.set_representation(port, port_doc.representation.clone())?;
        }
    }

    match &doc.kind {
        ElementDocKind::Block { binding } => {
            if let Some(binding) = binding {
                project.restore_binding(id, *binding)?;
            }
        }
        ElementDocKind::Network { elements, connectors } => {
            for child in elements {
                restore_element(project, Some(id), child)?;
            }
            for connector_doc in connectors {
                let connector = Connector::parsed(connector_doc.id, connector_doc.source, connector_doc.target)?;
                let connector = project.add_connector(id, connector)?;
                if connector_doc.representation.is_some() {
                    project.set_representation(connector, connector_doc.representation.clone())?;
                }
            }
        }
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocknet_component::{ComponentSystem, InstanceType};
    use blocknet_graph::GraphError;

    fn sample() -> (Project, Id, Id, Id) {
        let mut project: Project = Project::default();
        let root = project.add_root(NetworkElement::network("Plant")).unwrap();
        let component = project.components_mut().create("Pump", InstanceType::Component);
        project
            .components_mut()
            .add_child(component, "outlet", InstanceType::OutPort)
            .unwrap();
        let pump = project
            .add_element(root, NetworkElement::block("P-101").with_position(1.0, 2.0))
            .unwrap();
        project.bind_component(pump, component).unwrap();
        let outlet = project.element(pump).unwrap().ports()[0];

        let sub = project.add_element(root, NetworkElement::network("Unit")).unwrap();
        let sub_in = project.add_port(sub, Port::input("feed")).unwrap();
        let inner = project.add_element(sub, NetworkElement::block("Mixer")).unwrap();
        let inner_in = project.add_port(inner, Port::input("in")).unwrap();
        project.connect(outlet, sub_in).unwrap().unwrap();
        project.connect(sub_in, inner_in).unwrap().unwrap();
        project
            .set_representation(pump, Some(RepresentationRef("shape-1".to_string())))
            .unwrap();
        (project, root, pump, inner_in)
    }

    #[test]
    fn test_capture_and_restore_keep_ids() {
        let (project, root, pump, inner_in) = sample();
        let document = Document::capture(&project, "plant");
        assert_eq!(document.element_count(), 4);

        let restored = document.restore().unwrap();

        assert_eq!(restored.roots(), &[root]);
        assert_eq!(restored.element(pump).unwrap().name, "P-101");
        assert_eq!(restored.element(pump).unwrap().position, [1.0, 2.0]);
        assert_eq!(
            restored.element(pump).unwrap().binding(),
            project.element(pump).unwrap().binding()
        );
        assert!(restored.is_synchronized(pump));
        assert!(restored.is_connected(inner_in));
        assert_eq!(restored.connector_count(), 2);
        assert_eq!(restored.registry().len(), project.registry().len());
        assert_eq!(
            restored.find_by_representation(&RepresentationRef("shape-1".to_string())),
            Some(pump)
        );
        assert!(!restored.is_loading());
    }

    #[test]
    fn test_restored_project_issues_fresh_ids() {
        let (project, root, _, _) = sample();
        let mut restored = Document::capture(&project, "plant").restore().unwrap();

        let fresh = restored.add_element(root, NetworkElement::block("New")).unwrap();
        assert!(project.element(fresh).is_none());
        assert_eq!(restored.element(fresh).unwrap().name, "New");
    }

    #[test]
    fn test_ron_round_trip() {
        let (project, ..) = sample();
        let document = Document::capture(&project, "plant");

        let text = document.to_ron().unwrap();
        let parsed = Document::from_ron(&text).unwrap();

        assert_eq!(parsed.name, "plant");
        assert_eq!(parsed.networks, document.networks);
        assert_eq!(parsed.components.len(), project.components().len());
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let mut document = Document::new("future");
        document.version = DOCUMENT_FORMAT_VERSION + 1;
        let text = document.to_ron().unwrap();

        assert!(matches!(
            Document::from_ron(&text),
            Err(EditorError::UnsupportedVersion { found, .. }) if found == DOCUMENT_FORMAT_VERSION + 1
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let (project, ..) = sample();
        let mut document = Document::capture(&project, "plant");
        let copy = document.networks[0].clone();
        document.networks.push(copy);

        let id = document.networks[0].id;
        assert!(matches!(
            document.restore(),
            Err(EditorError::Graph(GraphError::IdInUse(dup))) if dup == id
        ));
    }

    #[test]
    fn test_save_and_load() {
        let (project, ..) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("plant.{DOCUMENT_EXTENSION}"));

        Document::capture(&project, "plant").save(&path).unwrap();
        let loaded = Document::load(&path).unwrap();

        assert_eq!(loaded.element_count(), 4);
        assert_eq!(loaded.restore().unwrap().element_count(), project.element_count());
        assert_eq!(loaded.components.len(), 2);
    }
}
