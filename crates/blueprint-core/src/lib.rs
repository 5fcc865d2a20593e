//! Blueprint Core Types and Definitions
//!
//! This crate provides the architecture model that Blueprint assembles,
//! renders and publishes. It includes:
//!
//! - **Model**: the entity registry and relationship builder ([`model::Model`])
//! - **Views**: snapshot projections of the model for rendering ([`view`] module)
//! - **Workspace**: the root holding one model and its views ([`workspace::Workspace`])
//! - **Colors**: CSS color handling for diagram styling ([`color::Color`])
//! - **Geometry**: basic geometric types used by the layout engines ([`geometry`] module)

pub mod color;
pub mod error;
pub mod geometry;
pub mod model;
pub mod view;
pub mod workspace;

pub use error::ModelError;
