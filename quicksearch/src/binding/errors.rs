//! Binding diagnostics.
//!
//! Binding never stops at the first problem. Every rejected query parameter
//! is reported to an `ErrorSink` keyed by the raw query key, and the binder
//! decides the overall outcome once all parameters have been seen.

use std::collections::BTreeMap;

use serde::Serialize;

/// Why a query parameter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BindingErrorKind {
    MissingPropertyOrFilter,
    UnrecognizedFilter,
    UnrecognizedProperty,
    InvalidFilterValue,
    MissingProperty,
    MultipleSortingDirections,
    UnrecognizedSortValue,
    InvalidPageValue,
}

impl BindingErrorKind {
    /// The user-facing message for this kind.
    #[must_use]
    pub fn message(self, entity: &str) -> String {
        match self {
            Self::MissingPropertyOrFilter => {
                "Invalid filter data, missing property or filter".to_string()
            }
            Self::UnrecognizedFilter => "Invalid filter type".to_string(),
            Self::UnrecognizedProperty => format!("Property does not exist on entity '{entity}'"),
            Self::InvalidFilterValue => "Invalid filter value for property type".to_string(),
            Self::MissingProperty => "Missing entity property".to_string(),
            Self::MultipleSortingDirections => {
                "Property cannot have multiple sorting directions".to_string()
            }
            Self::UnrecognizedSortValue => "Unrecognized sort direction value".to_string(),
            Self::InvalidPageValue => {
                "Page value must be an integer greater than or equal to 1".to_string()
            }
        }
    }
}

/// A rejected query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingError {
    pub key: String,
    pub kind: BindingErrorKind,
    pub message: String,
}

/// Receives binding errors.
pub trait ErrorSink {
    fn add_error(&mut self, key: &str, kind: BindingErrorKind, message: String);
}

/// Collects binding errors in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BindingErrors(Vec<BindingError>);

impl BindingErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BindingError> {
        self.0.iter()
    }

    /// Kinds reported for a key, in order.
    #[must_use]
    pub fn kinds_for(&self, key: &str) -> Vec<BindingErrorKind> {
        self.0
            .iter()
            .filter(|e| e.key == key)
            .map(|e| e.kind)
            .collect()
    }

    /// Messages grouped by query key.
    #[must_use]
    pub fn messages_by_key(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.0 {
            grouped
                .entry(error.key.clone())
                .or_default()
                .push(error.message.clone());
        }
        grouped
    }
}

impl ErrorSink for BindingErrors {
    fn add_error(&mut self, key: &str, kind: BindingErrorKind, message: String) {
        tracing::debug!("rejected query parameter '{}': {}", key, message);
        self.0.push(BindingError {
            key: key.to_string(),
            kind,
            message,
        });
    }
}

impl IntoIterator for BindingErrors {
    type Item = BindingError;
    type IntoIter = std::vec::IntoIter<BindingError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::fmt::Display for BindingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.key, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for BindingErrors {}

/// Outcome of binding one block of the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding<T> {
    /// At least one clause bound and nothing was rejected.
    Bound(T),
    /// Nothing was rejected and nothing was present.
    Absent,
    /// At least one parameter was rejected. The errors went to the sink.
    Failed,
}

impl<T> Binding<T> {
    /// The bound value, if any.
    #[must_use]
    pub fn bound(self) -> Option<T> {
        match self {
            Self::Bound(value) => Some(value),
            Self::Absent | Self::Failed => None,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            BindingErrorKind::UnrecognizedProperty.message("User"),
            "Property does not exist on entity 'User'"
        );
        assert_eq!(
            BindingErrorKind::MissingPropertyOrFilter.message("User"),
            "Invalid filter data, missing property or filter"
        );
        assert_eq!(
            BindingErrorKind::InvalidPageValue.message("User"),
            "Page value must be an integer greater than or equal to 1"
        );
    }

    #[test]
    fn test_messages_grouped_by_key() {
        let mut errors = BindingErrors::new();
        errors.add_error("f.x.eq", BindingErrorKind::UnrecognizedProperty, "a".to_string());
        errors.add_error("f.x.eq", BindingErrorKind::InvalidFilterValue, "b".to_string());
        errors.add_error("s.y", BindingErrorKind::MissingProperty, "c".to_string());

        let grouped = errors.messages_by_key();
        assert_eq!(grouped["f.x.eq"], vec!["a".to_string(), "b".to_string()]);
        assert_eq!(grouped["s.y"], vec!["c".to_string()]);
        assert_eq!(
            errors.kinds_for("f.x.eq"),
            vec![
                BindingErrorKind::UnrecognizedProperty,
                BindingErrorKind::InvalidFilterValue
            ]
        );
        assert_eq!(errors.to_string(), "f.x.eq: a; f.x.eq: b; s.y: c");
    }

    #[test]
    fn test_binding_bound() {
        assert_eq!(Binding::Bound(3).bound(), Some(3));
        assert_eq!(Binding::<i32>::Absent.bound(), None);
        assert!(Binding::<i32>::Failed.is_failed());
    }
}
