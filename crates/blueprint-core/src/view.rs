//! Diagram views derived from a [`Model`].
//!
//! A [`View`] is a snapshot: its membership is computed from whatever the
//! model holds at derivation time and never changes afterwards. Elements
//! added to the model later do not appear in views derived earlier.
//!
//! Two kinds of view are supported:
//!
//! - **System context**: every software system and every person in the model.
//! - **Container**: exactly the containers owned by the scope system.
//!
//! Both kinds include every relationship whose two endpoints are members of
//! the view.

use std::fmt;

use log::debug;

use crate::{
    error::ModelError,
    model::{Element, ElementId, ElementType, Model, RelationshipId},
};

/// The projection a view applies to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    SystemContext,
    Container,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemContext => f.write_str("system context"),
            Self::Container => f.write_str("container"),
        }
    }
}

/// A named, described projection of a subset of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    key: String,
    description: String,
    kind: ViewKind,
    scope: ElementId,
    elements: Vec<ElementId>,
    relationships: Vec<RelationshipId>,
}

impl View {
    /// Derives a system context view scoped to `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if `scope` is not a software system of `model`.
    pub fn system_context(
        model: &Model,
        scope: ElementId,
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ModelError> {
        model.expect_type(scope, ElementType::SoftwareSystem)?;

        let elements = model
            .software_systems()
            .chain(model.people())
            .map(Element::id)
            .collect();

        Ok(Self::derive(
            model,
            ViewKind::SystemContext,
            scope,
            key.into(),
            description.into(),
            elements,
        ))
    }

    /// Derives a container view of the containers owned by `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if `scope` is not a software system of `model`.
    pub fn container(
        model: &Model,
        scope: ElementId,
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let elements = model
            .containers_of(scope)?
            .into_iter()
            .map(Element::id)
            .collect();

        Ok(Self::derive(
            model,
            ViewKind::Container,
            scope,
            key.into(),
            description.into(),
            elements,
        ))
    }

    fn derive(
        model: &Model,
        kind: ViewKind,
        scope: ElementId,
        key: String,
        description: String,
        elements: Vec<ElementId>,
    ) -> Self {
        let relationships = model
            .relationships()
            .iter()
            .filter(|relationship| {
                elements.contains(&relationship.source())
                    && elements.contains(&relationship.destination())
            })
            .map(|relationship| relationship.id())
            .collect::<Vec<_>>();

        debug!(
            key = key.as_str(),
            kind:% = kind,
            elements = elements.len(),
            relationships = relationships.len();
            "View derived"
        );

        Self {
            key,
            description,
            kind,
            scope,
            elements,
            relationships,
        }
    }

    /// The unique key (name) of this view.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// The software system this view is scoped to.
    pub fn scope(&self) -> ElementId {
        self.scope
    }

    /// Member elements in model creation order.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Member relationships in model creation order.
    pub fn relationships(&self) -> &[RelationshipId] {
        &self.relationships
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }
}

/// The views registered in a workspace, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSet {
    views: Vec<View>,
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a derived view.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateViewKey`] if a view with the same key exists.
    pub fn add(&mut self, view: View) -> Result<&View, ModelError> {
        if self.get(view.key()).is_some() {
            return Err(ModelError::DuplicateViewKey(view.key));
        }
        self.views.push(view);
        Ok(&self.views[self.views.len() - 1])
    }

    /// Returns the view with the given key.
    pub fn get(&self, key: &str) -> Option<&View> {
        self.views.iter().find(|view| view.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    /// Returns the views of one kind.
    pub fn of_kind(&self, kind: ViewKind) -> impl Iterator<Item = &View> {
        self.views.iter().filter(move |view| view.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
