//! Hands layout over to Graphviz by writing one DOT file per view.

use std::path::PathBuf;

use log::info;

use blueprint_core::workspace::Workspace;

use crate::{
    config::Palette,
    error::BlueprintError,
    export::{OutputDirectory, dot::Dot},
    layout::LayoutEngine,
};

pub struct GraphvizEngine {
    palette: Palette,
}

impl GraphvizEngine {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl LayoutEngine for GraphvizEngine {
    fn apply(
        &self,
        workspace: &Workspace,
        output: &OutputDirectory,
    ) -> Result<Vec<PathBuf>, BlueprintError> {
        let dot = Dot::new(workspace.model(), &self.palette);
        let targets = output.artifact_paths(workspace.views(), "dot")?;
        let mut artifacts = Vec::with_capacity(targets.len());

        for (view, path) in targets {
            dot.write(view, &path)?;
            artifacts.push(path);
        }

        info!(views = artifacts.len(), directory:? = output.path(); "DOT sources written");
        Ok(artifacts)
    }
}
