//! Directed, labeled relationships between model elements.
//!
//! Relationships are created through [`Model::connect`]. Endpoints are
//! element handles the caller already holds; nothing here looks elements up
//! by name.

use std::fmt;

use log::trace;

use super::{ElementId, Model, ModelId};
use crate::error::ModelError;

/// Handle to a relationship stored in a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipId {
    model: ModelId,
    index: usize,
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.index)
    }
}

/// A directed edge from `source` to `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    id: RelationshipId,
    sequence: u32,
    source: ElementId,
    destination: ElementId,
    description: String,
    technology: Option<String>,
}

impl Relationship {
    pub fn id(&self) -> RelationshipId {
        self.id
    }

    /// Position in the model-wide creation sequence shared with elements.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn source(&self) -> ElementId {
        self.source
    }

    pub fn destination(&self) -> ElementId {
        self.destination
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn technology(&self) -> Option<&str> {
        self.technology.as_deref()
    }
}

impl Model {
    /// Creates a relationship from `source` to `destination`.
    ///
    /// Both endpoints must belong to this model and the description must not
    /// be blank. Duplicates and self-loops are accepted; each call adds a new
    /// edge.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownElement`] for a foreign handle and
    /// [`ModelError::EmptyLabel`] for a blank description.
    pub fn connect(
        &mut self,
        source: ElementId,
        destination: ElementId,
        description: impl Into<String>,
    ) -> Result<RelationshipId, ModelError> {
        self.connect_with_technology(source, destination, description, None::<String>)
    }

    /// Creates a relationship that also records the technology it uses.
    ///
    /// # Errors
    ///
    /// Same as [`Model::connect`].
    pub fn connect_with_technology(
        &mut self,
        source: ElementId,
        destination: ElementId,
        description: impl Into<String>,
        technology: Option<impl Into<String>>,
    ) -> Result<RelationshipId, ModelError> {
        let from = self.element(source)?.name().to_string();
        let to = self.element(destination)?.name().to_string();

        let description = description.into();
        if description.trim().is_empty() {
            return Err(ModelError::EmptyLabel { from, to });
        }

        let id = RelationshipId {
            model: self.id,
            index: self.relationships.len(),
        };
        let sequence = self.next_sequence();
        self.relationships.push(Relationship {
            id,
            sequence,
            source,
            destination,
            description,
            technology: technology.map(Into::into),
        });

        trace!(from, to, relationship:% = id; "Relationship created");
        Ok(id)
    }

    /// Returns the relationship for the given handle, or `None` for a foreign handle.
    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        if id.model != self.id {
            return None;
        }
        self.relationships.get(id.index)
    }

    /// Returns all relationships in creation order.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Returns the relationships whose source is `source`.
    pub fn relationships_from(&self, source: ElementId) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(move |relationship| relationship.source == source)
    }
}
