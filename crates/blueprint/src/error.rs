//! Error types for Blueprint operations.
//!
//! This module provides the main error type [`BlueprintError`] which wraps
//! the error conditions of every pipeline stage: model assembly, output
//! preparation, layout, export and publishing.

use std::{io, path::PathBuf};

use thiserror::Error;

use blueprint_core::ModelError;

use crate::publish::PublishError;

/// The main error type for Blueprint operations.
#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to assemble `{element}`: {source}")]
    Assembly {
        element: String,
        #[source]
        source: ModelError,
    },

    #[error("Output directory `{}` is unusable: {reason}", path.display())]
    OutputDirectory { path: PathBuf, reason: String },

    #[error("Output directory `{}` already exists", path.display())]
    OutputExists { path: PathBuf },

    #[error("Views `{first}` and `{second}` would both be written to `{}`", path.display())]
    ArtifactCollision {
        first: String,
        second: String,
        path: PathBuf,
    },

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::export::Error> for BlueprintError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl BlueprintError {
    /// Wraps a model error with the name of the element being assembled.
    pub fn assembly(element: impl Into<String>, source: ModelError) -> Self {
        Self::Assembly {
            element: element.into(),
            source,
        }
    }

    /// Returns the underlying model error, if this error came from the model.
    pub fn model_error(&self) -> Option<&ModelError> {
        match self {
            Self::Model(err) | Self::Assembly { source: err, .. } => Some(err),
            _ => None,
        }
    }
}
