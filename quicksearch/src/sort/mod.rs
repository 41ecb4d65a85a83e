//! Sort clause store.
//!
//! # Invariants
//!
//! - A property appears at most once.
//! - Insertion order is tie-break precedence: the first entry is the primary
//!   order and each later entry only breaks ties left by the ones before it.

use std::fmt::Write as _;

use crate::mapping::{MappingError, PropertyMapRegistry};
use crate::schema::{Entity, Field, PropertyKey};
use crate::types::{ClauseError, PropertyValue};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Never produced by parsing. Entries with this direction are skipped
    /// when compiling.
    None,
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc` or `desc`, ignoring ASCII case.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Asc => "Asc",
            Self::Desc => "Desc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The requested direction for one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClause {
    direction: SortDirection,
}

impl SortClause {
    #[must_use]
    pub const fn new(direction: SortDirection) -> Self {
        Self { direction }
    }

    #[must_use]
    pub const fn direction(self) -> SortDirection {
        self.direction
    }
}

/// Ordered sort clauses over properties of entity `T`.
pub struct SortSpecification<T> {
    entries: Vec<(PropertyKey<T>, SortClause)>,
}

impl<T> Default for SortSpecification<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Clone for SortSpecification<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> std::fmt::Debug for SortSpecification<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|(key, clause)| (key.path(), clause.direction)),
            )
            .finish()
    }
}

impl<T> SortSpecification<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns `ClauseError::DuplicateProperty` if the key is already present.
    pub(crate) fn insert(&mut self, key: PropertyKey<T>, clause: SortClause) -> Result<(), ClauseError> {
        if self.contains(&key) {
            return Err(ClauseError::DuplicateProperty {
                path: key.path().to_string(),
            });
        }
        self.entries.push((key, clause));
        Ok(())
    }

    /// Whether the key already has an entry.
    #[must_use]
    pub fn contains(&self, key: &PropertyKey<T>) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    /// Iterate over entries in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey<T>, SortClause)> {
        self.entries.iter().map(|(key, clause)| (key, *clause))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render as `prefix.Path=Direction` pairs joined with `&`.
    #[must_use]
    pub fn to_query_string(&self, prefix: &str) -> String {
        let mut out = String::new();
        for (key, clause) in &self.entries {
            if !out.is_empty() {
                out.push('&');
            }
            let _ = write!(out, "{prefix}.{}={}", key.path(), clause.direction.name());
        }
        out
    }
}

impl<T: Entity> SortSpecification<T> {
    /// Append a property through a typed field handle.
    ///
    /// # Panics
    ///
    /// Panics if the property is already present, or if `field` is not a
    /// property of `T`.
    #[must_use]
    pub fn add<V: PropertyValue>(mut self, field: Field<T, V>, direction: SortDirection) -> Self {
        let key = field.key();
        assert!(
            !self.contains(&key),
            "property '{}' cannot have multiple sorting directions",
            key.path()
        );
        self.entries.push((key, SortClause::new(direction)));
        self
    }

    /// Append a property named by a dotted path, resolved case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ClauseError::UnknownProperty` if the path does not resolve
    /// and `ClauseError::DuplicateProperty` if the property is already
    /// present.
    pub fn try_add(&mut self, path: &str, direction: SortDirection) -> Result<(), ClauseError> {
        let schema = T::schema();
        let key = schema
            .resolve(path)
            .ok_or_else(|| ClauseError::UnknownProperty {
                path: path.to_string(),
                entity: schema.name(),
            })?;
        self.insert(key, SortClause::new(direction))
    }

    /// Translate this specification to entity `U` through the registry.
    ///
    /// # Errors
    ///
    /// Returns a `MappingError` if the registry is not initialized, has no
    /// map from `T` to `U`, a key cannot be resolved on `U`, or two keys map
    /// to the same target property.
    pub fn map_to<U: Entity>(&self, registry: &PropertyMapRegistry) -> Result<SortSpecification<U>, MappingError> {
        registry.map_sort(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Item;

    #[test]
    fn test_parse_direction() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("Desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("none"), None);
        assert_eq!(SortDirection::parse("ascending"), None);
    }

    #[test]
    fn test_try_add_keeps_order() {
        let mut spec = SortSpecification::<Item>::new();
        spec.try_add("active", SortDirection::Desc).unwrap();
        spec.try_add("OWNER.score", SortDirection::Asc).unwrap();

        let entries: Vec<(&str, SortDirection)> = spec
            .iter()
            .map(|(key, clause)| (key.path(), clause.direction()))
            .collect();
        assert_eq!(
            entries,
            vec![("Active", SortDirection::Desc), ("Owner.Score", SortDirection::Asc)]
        );
    }

    #[test]
    fn test_try_add_rejects_duplicate() {
        let mut spec = SortSpecification::<Item>::new().add(Item::ID, SortDirection::Asc);
        let err = spec.try_add("id", SortDirection::Desc).unwrap_err();
        assert_eq!(
            err,
            ClauseError::DuplicateProperty {
                path: "Id".to_string()
            }
        );
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn test_try_add_unknown_property() {
        let mut spec = SortSpecification::<Item>::new();
        assert!(matches!(
            spec.try_add("Missing", SortDirection::Asc),
            Err(ClauseError::UnknownProperty { entity: "Item", .. })
        ));
    }

    #[test]
    #[should_panic(expected = "cannot have multiple sorting directions")]
    fn test_add_duplicate_panics() {
        let _ = SortSpecification::<Item>::new()
            .add(Item::NAME, SortDirection::Asc)
            .add(Item::NAME, SortDirection::Desc);
    }

    #[test]
    fn test_to_query_string() {
        let spec = SortSpecification::<Item>::new()
            .add(Item::PRICE, SortDirection::Desc)
            .add(Item::OWNER_SCORE, SortDirection::Asc);
        assert_eq!(spec.to_query_string("s"), "s.Price=Desc&s.Owner.Score=Asc");
    }
}
