//! The landscape to assemble.
//!
//! The NVA topology is compiled into the binary. A `topology` path in the
//! configuration replaces it.

use std::{fs, path::Path};

use log::info;

use blueprint::{BlueprintError, topology::Topology};

use crate::config::ConfigError;

const NVA: &str = include_str!("../topology/nva.toml");

/// Returns the built-in NVA topology.
pub fn builtin() -> Result<Topology, BlueprintError> {
    parse(NVA)
}

/// Loads the topology at `path`, or the built-in one when `path` is `None`.
///
/// # Errors
///
/// Fails if the file is missing, unreadable or not a valid topology.
pub fn load(path: Option<&Path>) -> Result<Topology, BlueprintError> {
    let Some(path) = path else {
        info!("Using built-in NVA topology");
        return builtin();
    };

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    info!(path:? = path; "Loading topology");
    let content = fs::read_to_string(path)?;
    parse(&content)
}

fn parse(content: &str) -> Result<Topology, BlueprintError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()).into())
}
