//! Model elements: people, software systems and containers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ModelId;

/// Handle to an element stored in a [`Model`](super::Model).
///
/// Handles are cheap to copy and are how callers refer to elements when
/// creating containers, relationships and views. A handle is only valid in
/// the model that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    pub(super) model: ModelId,
    pub(super) index: usize,
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// The kind of an element, without its kind-specific data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Person,
    SoftwareSystem,
    Container,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Person => "person",
            Self::SoftwareSystem => "software system",
            Self::Container => "container",
        };
        f.write_str(name)
    }
}

/// Whether a software system is owned by the modelled organisation.
///
/// Only affects styling; the model treats both locations alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    #[default]
    Internal,
    External,
}

/// Kind-specific element data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Person,
    SoftwareSystem {
        location: Location,
        containers: Vec<ElementId>,
    },
    Container {
        parent: ElementId,
        technology: String,
    },
}

/// A named element of the architecture model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: ElementId,
    sequence: u32,
    name: String,
    description: String,
    kind: ElementKind,
}

impl Element {
    pub(super) fn new(
        id: ElementId,
        sequence: u32,
        name: String,
        description: String,
        kind: ElementKind,
    ) -> Self {
        Self {
            id,
            sequence,
            name,
            description,
            kind,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Position in the model-wide creation sequence shared with relationships.
    ///
    /// Used as the stable identifier when the workspace is serialized.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn element_type(&self) -> ElementType {
        match self.kind {
            ElementKind::Person => ElementType::Person,
            ElementKind::SoftwareSystem { .. } => ElementType::SoftwareSystem,
            ElementKind::Container { .. } => ElementType::Container,
        }
    }

    /// Returns the technology label for containers.
    pub fn technology(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Container { technology, .. } => Some(technology),
            _ => None,
        }
    }

    /// Returns the owning software system for containers.
    pub fn parent(&self) -> Option<ElementId> {
        match self.kind {
            ElementKind::Container { parent, .. } => Some(parent),
            _ => None,
        }
    }

    /// Returns the containers owned by a software system, in creation order.
    ///
    /// Empty for people and containers.
    pub fn containers(&self) -> &[ElementId] {
        match &self.kind {
            ElementKind::SoftwareSystem { containers, .. } => containers,
            _ => &[],
        }
    }

    /// Returns the location of a software system.
    pub fn location(&self) -> Option<Location> {
        match self.kind {
            ElementKind::SoftwareSystem { location, .. } => Some(location),
            _ => None,
        }
    }

    pub(super) fn push_container(&mut self, container: ElementId) {
        if let ElementKind::SoftwareSystem { containers, .. } = &mut self.kind {
            containers.push(container);
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.element_type(), self.name)
    }
}
