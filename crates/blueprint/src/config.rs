//! Configuration types for Blueprint runs.
//!
//! This module provides configuration structures that control where
//! artifacts are written, which layout engine renders them, how they are
//! styled and where the workspace is published. All types implement
//! [`serde::Deserialize`] with every section defaulted, so an empty TOML
//! document is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`OutputConfig`] - Output directory and its [`OutputPolicy`].
//! - [`LayoutConfig`] - Selects the [`LayoutEngineKind`] and its spacing.
//! - [`StyleConfig`] - Element colors, resolved into a [`Palette`].
//! - [`PublishConfig`] - Remote workspace store endpoint.
//!
//! # Example
//!
//! ```
//! # use blueprint::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().palette().is_ok());
//! assert_eq!(config.publish().api_url(), "https://api.structurizr.com");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use blueprint_core::color::Color;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    output: OutputConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    publish: PublishConfig,

    /// Path to a TOML topology replacing the built-in one.
    #[serde(default)]
    topology: Option<PathBuf>,
}

impl AppConfig {
    pub fn new(
        output: OutputConfig,
        layout: LayoutConfig,
        style: StyleConfig,
        publish: PublishConfig,
    ) -> Self {
        Self {
            output,
            layout,
            style,
            publish,
            topology: None,
        }
    }

    /// Returns a copy of this configuration writing into `directory`.
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output.directory = directory.into();
        self
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn publish(&self) -> &PublishConfig {
        &self.publish
    }

    pub fn topology(&self) -> Option<&Path> {
        self.topology.as_deref()
    }
}

/// How an already existing output directory is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputPolicy {
    /// Create the directory if needed and accept an existing, writable one.
    #[default]
    Reuse,
    /// Require the directory not to exist yet.
    Fresh,
}

/// Where rendered artifacts are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_directory")]
    directory: PathBuf,

    #[serde(default)]
    policy: OutputPolicy,
}

impl OutputConfig {
    pub fn new(directory: impl Into<PathBuf>, policy: OutputPolicy) -> Self {
        Self {
            directory: directory.into(),
            policy,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn policy(&self) -> OutputPolicy {
        self.policy
    }

    fn default_directory() -> PathBuf {
        PathBuf::from("build/generated/diagrams")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(Self::default_directory(), OutputPolicy::default())
    }
}

/// Available layout engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngineKind {
    /// Layered layout rendered to SVG.
    #[default]
    Sugiyama,
    /// DOT source for Graphviz. Requires the `graphviz` feature.
    Graphviz,
}

/// Layout engine selection and spacing.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    #[serde(default)]
    engine: LayoutEngineKind,

    #[serde(default = "LayoutConfig::default_horizontal_spacing")]
    horizontal_spacing: f32,

    #[serde(default = "LayoutConfig::default_vertical_spacing")]
    vertical_spacing: f32,
}

impl LayoutConfig {
    pub fn new(engine: LayoutEngineKind) -> Self {
        Self {
            engine,
            horizontal_spacing: Self::default_horizontal_spacing(),
            vertical_spacing: Self::default_vertical_spacing(),
        }
    }

    pub fn engine(&self) -> LayoutEngineKind {
        self.engine
    }

    /// Gap between neighbouring boxes in the same layer.
    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    /// Gap between layers.
    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    fn default_horizontal_spacing() -> f32 {
        60.0
    }

    fn default_vertical_spacing() -> f32 {
        120.0
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(LayoutEngineKind::default())
    }
}

/// Element colors as CSS color strings. Unset fields use the C4 defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default)]
    person_color: Option<String>,

    #[serde(default)]
    internal_system_color: Option<String>,

    #[serde(default)]
    external_system_color: Option<String>,

    #[serde(default)]
    container_color: Option<String>,

    #[serde(default)]
    relationship_color: Option<String>,
}

impl StyleConfig {
    /// Parses every configured color into a [`Palette`].
    ///
    /// # Errors
    ///
    /// Returns an error naming the first color string that cannot be parsed.
    pub fn palette(&self) -> Result<Palette, String> {
        let parse = |value: &Option<String>, fallback: &str, field: &str| {
            Color::new(value.as_deref().unwrap_or(fallback))
                .map_err(|err| format!("Invalid {field} in config: {err}"))
        };

        let background = self
            .background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background_color in config: {err}"))?;

        Ok(Palette {
            background,
            person: parse(&self.person_color, "#08427b", "person_color")?,
            internal_system: parse(
                &self.internal_system_color,
                "#1168bd",
                "internal_system_color",
            )?,
            external_system: parse(
                &self.external_system_color,
                "#999999",
                "external_system_color",
            )?,
            container: parse(&self.container_color, "#438dd5", "container_color")?,
            relationship: parse(&self.relationship_color, "#707070", "relationship_color")?,
        })
    }
}

/// Resolved colors used by the renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Option<Color>,
    pub person: Color,
    pub internal_system: Color,
    pub external_system: Color,
    pub container: Color,
    pub relationship: Color,
}

impl Default for Palette {
    fn default() -> Self {
        StyleConfig::default()
            .palette()
            .expect("built-in colors are valid")
    }
}

/// Remote workspace store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    #[serde(default = "PublishConfig::default_api_url")]
    api_url: String,
}

impl PublishConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    /// Base URL of the Structurizr API, without a trailing slash.
    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    fn default_api_url() -> String {
        "https://api.structurizr.com".to_string()
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self::new(Self::default_api_url())
    }
}
