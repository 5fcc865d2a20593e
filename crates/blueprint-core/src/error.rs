//! Error type for model construction and view derivation.
//!
//! Every variant is a consistency error in the topology being assembled: it
//! names the offending element or view so the run can abort with a clear
//! message.

use thiserror::Error;

use crate::model::{ElementId, ElementType};

/// Errors raised while building a [`Model`](crate::model::Model) or deriving views from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("an element named `{name}` already exists as a {existing}")]
    DuplicateName { name: String, existing: ElementType },

    #[error("element names must not be empty")]
    EmptyName,

    #[error("no element named `{0}` exists in the model")]
    NotFound(String),

    #[error("element `{name}` is a {actual}, expected a {expected}")]
    WrongKind {
        name: String,
        expected: ElementType,
        actual: ElementType,
    },

    #[error("element {0} does not belong to this model")]
    UnknownElement(ElementId),

    #[error("relationship from `{from}` to `{to}` has no description")]
    EmptyLabel { from: String, to: String },

    #[error("a view with key `{0}` already exists")]
    DuplicateViewKey(String),
}

impl ModelError {
    /// Returns a short hint on how to fix the topology, if one applies.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateName { .. } => {
                Some("element names are unique across people, systems and containers")
            }
            Self::NotFound(_) => {
                Some("declare the element before any relationship that references it")
            }
            Self::EmptyLabel { .. } => Some("every relationship needs a verb phrase label"),
            Self::WrongKind { .. } => {
                Some("containers and views must be scoped to a software system")
            }
            Self::EmptyName | Self::UnknownElement(_) | Self::DuplicateViewKey(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = ModelError::NotFound("Orcid".to_string());
        assert_eq!(err.to_string(), "no element named `Orcid` exists in the model");

        let err = ModelError::DuplicateName {
            name: "Creator".to_string(),
            existing: ElementType::Person,
        };
        assert_eq!(
            err.to_string(),
            "an element named `Creator` already exists as a person"
        );
    }

    #[test]
    fn test_help_for_missing_element() {
        let err = ModelError::NotFound("Datacite".to_string());
        assert!(err.help().is_some());
        assert!(ModelError::EmptyName.help().is_none());
    }
}
