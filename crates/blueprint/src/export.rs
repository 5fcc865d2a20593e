//! Writing rendered views to disk.

#[cfg(feature = "graphviz")]
pub mod dot;
pub mod svg;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info};

use blueprint_core::view::{View, ViewSet};

use crate::{config::OutputPolicy, error::BlueprintError};

#[derive(Debug)]
pub enum Error {
    Render(String),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

/// A directory prepared to receive artifacts.
///
/// Holding one means the directory existed and was writable when
/// [`OutputDirectory::prepare`] ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Creates the directory and its parents according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::OutputDirectory`] when the path is a file,
    /// when the directory is read-only, when it exists under
    /// [`OutputPolicy::Fresh`], or when it cannot be created. The `Fresh`
    /// case is reported as [`BlueprintError::OutputExists`].
    pub fn prepare(path: impl AsRef<Path>, policy: OutputPolicy) -> Result<Self, BlueprintError> {
        let path = path.as_ref();
        let unusable = |reason: String| BlueprintError::OutputDirectory {
            path: path.to_path_buf(),
            reason,
        };

        if path.exists() {
            if !path.is_dir() {
                return Err(unusable("path exists and is not a directory".to_string()));
            }
            if policy == OutputPolicy::Fresh {
                return Err(BlueprintError::OutputExists {
                    path: path.to_path_buf(),
                });
            }
            debug!(path:? = path; "Reusing output directory");
        } else {
            fs::create_dir_all(path).map_err(|err| unusable(err.to_string()))?;
            info!(path:? = path; "Created output directory");
        }

        let metadata = fs::metadata(path).map_err(|err| unusable(err.to_string()))?;
        if metadata.permissions().readonly() {
            return Err(unusable("directory is read-only".to_string()));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the artifact for `view_key` with the given extension.
    pub fn artifact_path(&self, view_key: &str, extension: &str) -> PathBuf {
        self.path
            .join(format!("{}.{extension}", artifact_stem(view_key)))
    }

    /// Assigns an artifact path to every view, in view order.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::ArtifactCollision`] if two view keys map to
    /// the same file name.
    pub fn artifact_paths<'v>(
        &self,
        views: &'v ViewSet,
        extension: &str,
    ) -> Result<Vec<(&'v View, PathBuf)>, BlueprintError> {
        let mut claimed: HashMap<PathBuf, &str> = HashMap::with_capacity(views.len());
        let mut paths = Vec::with_capacity(views.len());

        for view in views.iter() {
            let path = self.artifact_path(view.key(), extension);
            if let Some(first) = claimed.insert(path.clone(), view.key()) {
                return Err(BlueprintError::ArtifactCollision {
                    first: first.to_string(),
                    second: view.key().to_string(),
                    path,
                });
            }
            paths.push((view, path));
        }
        Ok(paths)
    }
}

/// File stem for a view key: lowercase, with every run of characters other
/// than ASCII letters and digits collapsed to a single `-`.
pub fn artifact_stem(view_key: &str) -> String {
    let mut stem = String::with_capacity(view_key.len());
    for c in view_key.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_end_matches('-');
    if stem.is_empty() {
        "view".to_string()
    } else {
        stem.to_string()
    }
}

/// Writes `contents` to `path`.
pub(crate) fn write_artifact(path: &Path, contents: &str) -> Result<(), Error> {
    info!(path:? = path; "Writing artifact");
    fs::write(path, contents).map_err(|err| {
        error!(path:? = path, err:err; "Failed to write artifact");
        Error::Io(err)
    })
}

#[cfg(test)]
mod tests {
    use blueprint_core::workspace::Workspace;

    use super::*;

    #[test]
    fn test_artifact_stem() {
        assert_eq!(artifact_stem("SystemContext"), "systemcontext");
        assert_eq!(artifact_stem("Container view"), "container-view");
        assert_eq!(artifact_stem("  Odd / key!! "), "odd-key");
        assert_eq!(artifact_stem("???"), "view");
    }

    #[test]
    fn test_prepare_creates_nested_directory() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("build/generated/diagrams");

        let output = OutputDirectory::prepare(&target, OutputPolicy::Reuse).unwrap();
        assert!(target.is_dir());
        assert_eq!(
            output.artifact_path("Container view", "svg"),
            target.join("container-view.svg")
        );
    }

    #[test]
    fn test_prepare_reuses_existing_directory() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("keep.txt"), "x").unwrap();

        OutputDirectory::prepare(temp.path(), OutputPolicy::Reuse).unwrap();
        assert!(temp.path().join("keep.txt").exists());
    }

    #[test]
    fn test_fresh_policy_rejects_existing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let err = OutputDirectory::prepare(temp.path(), OutputPolicy::Fresh).unwrap_err();
        assert!(matches!(err, BlueprintError::OutputExists { ref path } if path == temp.path()));

        let fresh = temp.path().join("new");
        OutputDirectory::prepare(&fresh, OutputPolicy::Fresh).unwrap();
        assert!(fresh.is_dir());
    }

    #[test]
    fn test_file_in_the_way() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("diagrams");
        fs::write(&file, "not a directory").unwrap();

        let err = OutputDirectory::prepare(&file, OutputPolicy::Reuse).unwrap_err();
        match err {
            BlueprintError::OutputDirectory { path, reason } => {
                assert_eq!(path, file);
                assert!(reason.contains("not a directory"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn views_with_keys(first: &str, second: &str) -> Workspace {
        let mut workspace = Workspace::new("NVA", "NVA");
        let core = workspace
            .model_mut()
            .add_software_system("NvaCore", "Core")
            .unwrap();
        workspace.create_system_context_view(core, first, "Context").unwrap();
        workspace.create_container_view(core, second, "Containers").unwrap();
        workspace
    }

    #[test]
    fn test_artifact_paths_follow_view_order() {
        let temp = tempfile::tempdir().unwrap();
        let output = OutputDirectory::prepare(temp.path(), OutputPolicy::Reuse).unwrap();
        let workspace = views_with_keys("SystemContext", "Container view");

        let paths = output.artifact_paths(workspace.views(), "svg").unwrap();

        let keys: Vec<_> = paths.iter().map(|(view, _)| view.key()).collect();
        assert_eq!(keys, ["SystemContext", "Container view"]);
        assert_eq!(paths[1].1, temp.path().join("container-view.svg"));
    }

    #[test]
    fn test_artifact_paths_reject_colliding_stems() {
        let temp = tempfile::tempdir().unwrap();
        let output = OutputDirectory::prepare(temp.path(), OutputPolicy::Reuse).unwrap();
        let workspace = views_with_keys("SystemContext", "system context");

        let err = output.artifact_paths(workspace.views(), "svg").unwrap_err();

        match err {
            BlueprintError::ArtifactCollision { first, second, path } => {
                assert_eq!(first, "SystemContext");
                assert_eq!(second, "system context");
                assert_eq!(path, temp.path().join("systemcontext.svg"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parent_is_a_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("blocker");
        fs::write(&file, "x").unwrap();

        let result = OutputDirectory::prepare(file.join("diagrams"), OutputPolicy::Reuse);
        assert!(matches!(result, Err(BlueprintError::OutputDirectory { .. })));
    }
}
