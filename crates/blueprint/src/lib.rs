//! Blueprint - architecture models as code.
//!
//! Builds a C4-style workspace from a declarative [`Topology`], renders one
//! diagram per view into an output directory and optionally publishes the
//! workspace to a Structurizr workspace store.

pub mod assemble;
pub mod config;
pub mod export;
pub mod layout;
pub mod publish;
pub mod topology;

mod error;

pub use blueprint_core::{ModelError, color, geometry, model, view, workspace};

pub use error::BlueprintError;

use std::path::PathBuf;

use log::{debug, info};

use assemble::Assembler;
use config::{AppConfig, LayoutEngineKind};
use export::OutputDirectory;
use layout::LayoutEngine;
use publish::{PublishOutcome, RemoteCredentials};
use topology::Topology;
use workspace::Workspace;

/// What a complete run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    artifacts: Vec<PathBuf>,
    publish: PublishOutcome,
}

impl RunReport {
    /// Written artifacts, one per view, in view order.
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    pub fn publish(&self) -> PublishOutcome {
        self.publish
    }
}

/// Runs the build, render and publish stages.
///
/// # Examples
///
/// ```rust,no_run
/// use blueprint::{Blueprint, config::AppConfig, topology::{SystemSpec, Topology, WorkspaceSpec}};
///
/// let topology = Topology::new(
///     WorkspaceSpec::new("Demo", "A demo landscape"),
///     SystemSpec::new("Core", "The core system"),
/// )
/// .with_actor("User", "A user", "Uses");
///
/// let blueprint = Blueprint::new(AppConfig::default());
/// let report = blueprint.run(&topology, None).expect("run failed");
/// println!("{:?}", report.artifacts());
/// ```
#[derive(Default)]
pub struct Blueprint {
    config: AppConfig,
}

impl Blueprint {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Builds the workspace described by `topology`.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Assembly`] for duplicate names, unresolved
    /// links, blank labels or clashing view keys.
    pub fn assemble(&self, topology: &Topology) -> Result<Workspace, BlueprintError> {
        Assembler::new(topology).assemble()
    }

    /// Renders every view of `workspace` into the configured directory.
    ///
    /// # Errors
    ///
    /// Fails if the style is invalid, the output directory is unusable or a
    /// view cannot be laid out or written.
    pub fn render(&self, workspace: &Workspace) -> Result<Vec<PathBuf>, BlueprintError> {
        let palette = self
            .config
            .style()
            .palette()
            .map_err(BlueprintError::Config)?;
        let output = OutputDirectory::prepare(
            self.config.output().directory(),
            self.config.output().policy(),
        )?;

        let engine_kind = self.config.layout().engine();
        info!(engine:? = engine_kind, directory:? = output.path(); "Rendering views");

        let engine: Box<dyn LayoutEngine> = match engine_kind {
            LayoutEngineKind::Sugiyama => Box::new(layout::sugiyama::SugiyamaEngine::new(
                self.config.layout(),
                palette,
            )),
            #[cfg(feature = "graphviz")]
            LayoutEngineKind::Graphviz => Box::new(layout::graphviz::GraphvizEngine::new(palette)),
            #[cfg(not(feature = "graphviz"))]
            LayoutEngineKind::Graphviz => {
                return Err(BlueprintError::Config(
                    "the graphviz layout engine requires the `graphviz` feature".to_string(),
                ));
            }
        };

        let artifacts = engine.apply(workspace, &output)?;
        debug!(artifacts:? = artifacts; "Views rendered");
        Ok(artifacts)
    }

    /// Publishes `workspace` when `credentials` are given.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Publish`] for an invalid workspace id or a
    /// failed upload.
    pub fn publish(
        &self,
        workspace: &Workspace,
        credentials: Option<&RemoteCredentials>,
    ) -> Result<PublishOutcome, BlueprintError> {
        Ok(publish::publish(
            self.config.publish().api_url(),
            workspace,
            credentials,
        )?)
    }

    /// Assembles, renders and publishes, stopping at the first failure.
    pub fn run(
        &self,
        topology: &Topology,
        credentials: Option<&RemoteCredentials>,
    ) -> Result<RunReport, BlueprintError> {
        let workspace = self.assemble(topology)?;
        let artifacts = self.render(&workspace)?;
        let publish = self.publish(&workspace, credentials)?;

        info!(artifacts = artifacts.len(), publish:? = publish; "Run complete");
        Ok(RunReport { artifacts, publish })
    }
}
