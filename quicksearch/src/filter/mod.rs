//! Filter clause store.
//!
//! A `FilterSpecification` maps each property of an entity to the list of
//! (operator, value) clauses requested for it. Clause values are converted to
//! the property's kind when they are added, so a specification never holds a
//! value its property could not be compared against.
//!
//! # Invariants
//!
//! - Keys keep their first insertion order.
//! - A key is present only if it has at least one clause.
//! - Every clause value is `Value::Null` or a value of the key's kind.

use std::fmt::Write as _;

use percent_encoding::utf8_percent_encode;

use crate::constants::QUERY_VALUE_ENCODE_SET;
use crate::mapping::{MappingError, PropertyMapRegistry};
use crate::schema::{Entity, Field, PropertyKey};
use crate::types::{ClauseError, PropertyValue, Value};

/// Filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Never produced by parsing. Clauses with this operator are ignored
    /// when compiling.
    None,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
    /// Substring match.
    Like,
    /// Negated substring match.
    Nlike,
}

impl FilterOperator {
    /// Parse an operator token, ignoring ASCII case.
    ///
    /// `none` is not a valid token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        const TOKENS: [(&str, FilterOperator); 8] = [
            ("lt", FilterOperator::Lt),
            ("lte", FilterOperator::Lte),
            ("gt", FilterOperator::Gt),
            ("gte", FilterOperator::Gte),
            ("eq", FilterOperator::Eq),
            ("neq", FilterOperator::Neq),
            ("like", FilterOperator::Like),
            ("nlike", FilterOperator::Nlike),
        ];
        TOKENS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|&(_, op)| op)
    }

    /// The canonical name used when serializing.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Lt => "Lt",
            Self::Lte => "Lte",
            Self::Gt => "Gt",
            Self::Gte => "Gte",
            Self::Eq => "Eq",
            Self::Neq => "Neq",
            Self::Like => "Like",
            Self::Nlike => "Nlike",
        }
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single (operator, value) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    operator: FilterOperator,
    value: Value,
}

impl FilterClause {
    #[must_use]
    pub const fn new(operator: FilterOperator, value: Value) -> Self {
        Self { operator, value }
    }

    #[must_use]
    pub const fn operator(&self) -> FilterOperator {
        self.operator
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

/// Filter clauses per property of entity `T`.
pub struct FilterSpecification<T> {
    entries: Vec<(PropertyKey<T>, Vec<FilterClause>)>,
}

impl<T> Default for FilterSpecification<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Clone for FilterSpecification<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> std::fmt::Debug for FilterSpecification<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, clauses)| (key.path(), clauses)))
            .finish()
    }
}

impl<T> FilterSpecification<T> {
    /// Create an empty specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause to a key, creating the entry if needed.
    pub(crate) fn add_clause(&mut self, key: PropertyKey<T>, clause: FilterClause) {
        self.add_clauses(key, vec![clause]);
    }

    /// Append clauses to a key, creating the entry if needed.
    pub(crate) fn add_clauses(&mut self, key: PropertyKey<T>, clauses: Vec<FilterClause>) {
        if clauses.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing)) => existing.extend(clauses),
            None => self.entries.push((key, clauses)),
        }
    }

    /// Iterate over keys and their clauses, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey<T>, &[FilterClause])> {
        self.entries
            .iter()
            .map(|(key, clauses)| (key, clauses.as_slice()))
    }

    /// Clauses for a key, if any.
    #[must_use]
    pub fn clauses(&self, key: &PropertyKey<T>) -> Option<&[FilterClause]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, clauses)| clauses.as_slice())
    }

    /// Whether the specification has no clauses.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys with at least one clause.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render as `prefix.Path.Operator=value` pairs joined with `&`.
    ///
    /// Values are URL-encoded; null renders as the `null` literal.
    #[must_use]
    pub fn to_query_string(&self, prefix: &str) -> String {
        let mut out = String::new();
        for (key, clauses) in &self.entries {
            for clause in clauses {
                if !out.is_empty() {
                    out.push('&');
                }
                let value = clause.value.to_string();
                let _ = write!(
                    out,
                    "{prefix}.{}.{}={}",
                    key.path(),
                    clause.operator.name(),
                    utf8_percent_encode(&value, QUERY_VALUE_ENCODE_SET)
                );
            }
        }
        out
    }
}

impl<T: Entity> FilterSpecification<T> {
    /// Add a clause through a typed field handle.
    ///
    /// # Panics
    ///
    /// Panics if `field` is not a property of `T` (see `Field::key`).
    #[must_use]
    pub fn add<V: PropertyValue>(mut self, field: Field<T, V>, operator: FilterOperator, value: V) -> Self {
        self.add_clause(field.key(), FilterClause::new(operator, value.into_value()));
        self
    }

    /// Add a clause for a property named by a dotted path.
    ///
    /// The path is resolved case-insensitively and the value converted to
    /// the property's kind.
    ///
    /// # Errors
    ///
    /// Returns `ClauseError::UnknownProperty` if the path does not resolve
    /// and `ClauseError::InvalidValue` if the value does not convert. The
    /// specification is unchanged on error.
    pub fn try_add(&mut self, path: &str, operator: FilterOperator, value: Value) -> Result<(), ClauseError> {
        self.try_add_all(path, operator, [value])
    }

    /// Add several clauses sharing a path and operator.
    ///
    /// Either every value is added or none is.
    ///
    /// # Errors
    ///
    /// Same as `try_add`.
    pub fn try_add_all(
        &mut self,
        path: &str,
        operator: FilterOperator,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<(), ClauseError> {
        let schema = T::schema();
        let key = schema
            .resolve(path)
            .ok_or_else(|| ClauseError::UnknownProperty {
                path: path.to_string(),
                entity: schema.name(),
            })?;

        let clauses = values
            .into_iter()
            .map(|value| key.convert(value).map(|value| FilterClause::new(operator, value)))
            .collect::<Result<Vec<_>, _>>()?;

        self.add_clauses(key, clauses);
        Ok(())
    }

    /// Translate this specification to entity `U` through the registry.
    ///
    /// # Errors
    ///
    /// Returns a `MappingError` if the registry is not initialized, has no
    /// map from `T` to `U`, or a key cannot be resolved on `U`.
    pub fn map_to<U: Entity>(&self, registry: &PropertyMapRegistry) -> Result<FilterSpecification<U>, MappingError> {
        registry.map_filter(self)
    }
}
