//! Errors raised when adding clauses to a filter or sort specification.

use crate::types::ValueError;

/// Error returned when a clause cannot be added to a specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseError {
    /// The property path does not resolve on the entity.
    UnknownProperty {
        /// The path as supplied.
        path: String,
        /// The entity the path was resolved against.
        entity: &'static str,
    },
    /// The value cannot be converted to the property's kind.
    InvalidValue(ValueError),
    /// The property already has a clause and only one is allowed.
    DuplicateProperty {
        /// The canonical property path.
        path: String,
    },
}

impl std::fmt::Display for ClauseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProperty { path, entity } => {
                write!(f, "property '{path}' does not exist on entity '{entity}'")
            }
            Self::InvalidValue(e) => write!(f, "invalid value: {e}"),
            Self::DuplicateProperty { path } => {
                write!(f, "property '{path}' already has a clause")
            }
        }
    }
}

impl std::error::Error for ClauseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidValue(e) => Some(e),
            Self::UnknownProperty { .. } | Self::DuplicateProperty { .. } => None,
        }
    }
}

impl From<ValueError> for ClauseError {
    fn from(e: ValueError) -> Self {
        Self::InvalidValue(e)
    }
}
