//! Error adapter for rendering [`BlueprintError`] with miette.
//!
//! The library reports plain `std::error::Error` values; the CLI wraps them
//! to attach a stable diagnostic code and, where one exists, a hint.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use blueprint::{BlueprintError, publish::PublishError};

pub struct ErrorAdapter<'a>(pub &'a BlueprintError);

impl ErrorAdapter<'_> {
    fn code_str(&self) -> &'static str {
        match self.0 {
            BlueprintError::Model(_) | BlueprintError::Assembly { .. } => "blueprint::model",
            BlueprintError::Io(_)
            | BlueprintError::OutputDirectory { .. }
            | BlueprintError::OutputExists { .. } => "blueprint::io",
            BlueprintError::Layout(_) => "blueprint::layout",
            BlueprintError::Export(_) | BlueprintError::ArtifactCollision { .. } => {
                "blueprint::export"
            }
            BlueprintError::Publish(_) => "blueprint::publish",
            BlueprintError::Config(_) => "blueprint::config",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        if let Some(err) = self.0.model_error() {
            return err.help();
        }

        match self.0 {
            BlueprintError::Publish(PublishError::InvalidWorkspaceId(_)) => {
                Some("STRUCTURIZR_WORKSPACE_ID must be the numeric id of the remote workspace")
            }
            BlueprintError::Publish(PublishError::Rejected { status: 401 | 403, .. }) => {
                Some("check STRUCTURIZR_API_KEY and STRUCTURIZR_SECRET_KEY")
            }
            BlueprintError::OutputExists { .. } => {
                Some("remove the directory or set `output.policy = \"reuse\"`")
            }
            BlueprintError::ArtifactCollision { .. } => {
                Some("give every view a key that differs after lowercasing and punctuation")
            }
            _ => None,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_str()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use blueprint::ModelError;

    use super::*;

    fn code(err: &BlueprintError) -> String {
        ErrorAdapter(err).code().unwrap().to_string()
    }

    fn help(err: &BlueprintError) -> Option<String> {
        ErrorAdapter(err).help().map(|h| h.to_string())
    }

    #[test]
    fn test_codes() {
        let assembly = BlueprintError::assembly("Search Service", ModelError::NotFound("Index".into()));
        assert_eq!(code(&assembly), "blueprint::model");
        assert_eq!(code(&BlueprintError::Layout("cycle".into())), "blueprint::layout");
        assert_eq!(code(&BlueprintError::Config("bad".into())), "blueprint::config");
        assert_eq!(
            code(&PublishError::InvalidWorkspaceId("x".into()).into()),
            "blueprint::publish"
        );
    }

    #[test]
    fn test_model_help() {
        let err = BlueprintError::assembly("Search Service", ModelError::NotFound("Index".into()));
        assert_eq!(
            help(&err).as_deref(),
            Some("declare the element before any relationship that references it")
        );
    }

    #[test]
    fn test_publish_help() {
        let err: BlueprintError = PublishError::InvalidWorkspaceId("abc".into()).into();
        assert!(help(&err).unwrap().contains("STRUCTURIZR_WORKSPACE_ID"));
        assert!(help(&BlueprintError::Layout("x".into())).is_none());
    }

    #[test]
    fn test_output_directory_help() {
        let exists = BlueprintError::OutputExists { path: "diagrams".into() };
        assert_eq!(code(&exists), "blueprint::io");
        assert!(help(&exists).unwrap().contains("output.policy"));

        let blocked = BlueprintError::OutputDirectory {
            path: "diagrams".into(),
            reason: "path exists and is not a directory".into(),
        };
        assert_eq!(code(&blocked), "blueprint::io");
        assert!(help(&blocked).is_none());
    }

    #[test]
    fn test_collision_help() {
        let err = BlueprintError::ArtifactCollision {
            first: "SystemContext".into(),
            second: "system context".into(),
            path: "diagrams/systemcontext.svg".into(),
        };
        assert_eq!(code(&err), "blueprint::export");
        assert!(help(&err).is_some());
    }

    #[test]
    fn test_display_and_source() {
        let err = BlueprintError::assembly("Search Service", ModelError::NotFound("Index".into()));
        let adapter = ErrorAdapter(&err);
        assert!(adapter.to_string().contains("Search Service"));
        assert!(std::error::Error::source(&adapter).is_some());
    }
}
