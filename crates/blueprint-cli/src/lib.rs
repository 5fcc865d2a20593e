//! CLI logic for generating the NVA architecture diagrams.

pub mod error_adapter;
pub mod topology;

mod args;
mod config;

pub use args::Args;

use log::info;

use blueprint::{
    Blueprint, BlueprintError, RunReport,
    publish::{PublishOutcome, RemoteCredentials},
};

/// Runs the whole build, render and publish sequence.
///
/// Credentials are read from the process environment.
///
/// # Errors
///
/// Returns `BlueprintError` for:
/// - Configuration loading errors
/// - Topology consistency errors
/// - Output directory, layout or export errors
/// - Publish errors when credentials are present
pub fn run(args: &Args) -> Result<RunReport, BlueprintError> {
    run_with_credentials(args, RemoteCredentials::from_env())
}

/// Same as [`run`] with explicitly supplied credentials.
pub fn run_with_credentials(
    args: &Args,
    credentials: Option<RemoteCredentials>,
) -> Result<RunReport, BlueprintError> {
    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(output) = &args.output {
        app_config = app_config.with_output_directory(output);
    }

    let topology = topology::load(app_config.topology())?;

    let blueprint = Blueprint::new(app_config);
    let report = blueprint.run(&topology, credentials.as_ref())?;

    for artifact in report.artifacts() {
        info!(path:? = artifact; "Diagram written");
    }
    if let PublishOutcome::Published { workspace_id } = report.publish() {
        info!(workspace_id; "Workspace published");
    }

    Ok(report)
}
