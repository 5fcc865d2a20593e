//! Configuration file discovery.
//!
//! Looks for a TOML configuration in an explicit path, the local project
//! directory and the platform configuration directory, in that order.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use blueprint::{BlueprintError, config::AppConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for BlueprintError {
    fn from(err: ConfigError) -> Self {
        BlueprintError::Config(err.to_string())
    }
}

/// Finds and loads the configuration.
///
/// Search order:
/// 1. `explicit_path` if provided
/// 2. `blueprint/config.toml` in the working directory
/// 3. `config.toml` in the platform-specific config directory
/// 4. Defaults
///
/// # Errors
///
/// Fails if an explicit path does not exist, or if the selected file cannot
/// be read, parsed or validated.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, BlueprintError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path:? = path; "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("blueprint/config.toml");
    if local_config.exists() {
        info!(path:? = local_config; "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("no", "unit", "blueprint") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path:? = system_config; "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path:? = system_config; "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, BlueprintError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    // Colors are only parsed when rendering; reject bad ones up front.
    config.style().palette().map_err(ConfigError::Validation)?;

    Ok(config)
}
