//! The workspace: one model plus the views derived from it.

use crate::{
    error::ModelError,
    model::{ElementId, Model},
    view::{View, ViewSet},
};

/// Root container for a model and its views.
///
/// The name and description are fixed when the workspace is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    name: String,
    description: String,
    model: Model,
    views: ViewSet,
}

impl Workspace {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            model: Model::new(),
            views: ViewSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn views(&self) -> &ViewSet {
        &self.views
    }

    /// Derives a system context view from the current model and registers it.
    ///
    /// # Errors
    ///
    /// Fails if `scope` is not a software system or `key` is already taken.
    pub fn create_system_context_view(
        &mut self,
        scope: ElementId,
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&View, ModelError> {
        let view = View::system_context(&self.model, scope, key, description)?;
        self.views.add(view)
    }

    /// Derives a container view from the current model and registers it.
    ///
    /// # Errors
    ///
    /// Fails if `scope` is not a software system or `key` is already taken.
    pub fn create_container_view(
        &mut self,
        scope: ElementId,
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&View, ModelError> {
        let view = View::container(&self.model, scope, key, description)?;
        self.views.add(view)
    }
}
