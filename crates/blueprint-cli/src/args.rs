//! Command-line arguments for the blueprint binary.

use std::path::PathBuf;

use clap::Parser;

/// Generates the NVA architecture diagrams and publishes the workspace.
///
/// Publishing happens only when `STRUCTURIZR_API_KEY`,
/// `STRUCTURIZR_SECRET_KEY` and `STRUCTURIZR_WORKSPACE_ID` are all set.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory receiving the rendered views, overriding the configuration
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let args = Args::try_parse_from(["blueprint"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.output.is_none());
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "blueprint",
            "--config",
            "blueprint.toml",
            "-o",
            "out",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("blueprint.toml")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.log_level, "debug");
    }
}
