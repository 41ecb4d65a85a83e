//! Property remapping between entity shapes.
//!
//! A `PropertyMap<S, T>` declares where properties of a source shape `S`
//! (typically a public DTO) live on a target shape `T` (typically the
//! storage type). Properties without a declared correspondence fall back to
//! the same path on the target.
//!
//! # Example
//!
//! ```ignore
//! let map = PropertyMap::<UserDto, User>::new()
//!     .map(UserDto::ACCOUNT_BALANCE, User::ACCOUNT_BALANCE)?;
//! ```

mod registry;

use std::marker::PhantomData;

pub use registry::{PropertyMapRegistry, RegistryBuilder};

use crate::schema::{Entity, Field, PropertyKey};
use crate::types::{PropertyValue, ValueError};

/// Errors that can occur when building maps or remapping specifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A source property was mapped twice.
    AlreadyMapped {
        source_path: String,
        target_path: String,
        existing_path: String,
    },
    /// A map for the (source, target) pair is already registered.
    AlreadyRegistered {
        source_entity: &'static str,
        target_entity: &'static str,
    },
    /// The registry has not been initialized.
    NotInitialized,
    /// No map is registered for the (source, target) pair.
    MapNotFound {
        source_entity: &'static str,
        target_entity: &'static str,
    },
    /// A source property has no mapping and no same-path property on the
    /// target.
    UnresolvedProperty { path: String, entity: &'static str },
    /// A clause value does not convert to the target property's kind.
    InvalidValue { path: String, error: ValueError },
    /// Two source sort keys map to the same target property.
    ConflictingSort { path: String },
    /// The registry lock was poisoned.
    LockPoisoned,
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyMapped {
                source_path,
                target_path,
                existing_path,
            } => write!(
                f,
                "cannot map property '{source_path}' to '{target_path}', since it is already mapped to '{existing_path}'"
            ),
            Self::AlreadyRegistered {
                source_entity,
                target_entity,
            } => write!(
                f,
                "a map from {source_entity} to {target_entity} is already registered"
            ),
            Self::NotInitialized => write!(f, "property map registry has not been initialized"),
            Self::MapNotFound {
                source_entity,
                target_entity,
            } => write!(f, "no map from type {source_entity} to {target_entity} was found"),
            Self::UnresolvedProperty { path, entity } => {
                write!(f, "property '{path}' does not exist on entity '{entity}'")
            }
            Self::InvalidValue { path, error } => {
                write!(f, "invalid value for property '{path}': {error}")
            }
            Self::ConflictingSort { path } => {
                write!(f, "more than one sort key maps to property '{path}'")
            }
            Self::LockPoisoned => write!(f, "property map registry lock poisoned"),
        }
    }
}

impl std::error::Error for MappingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidValue { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Correspondences from properties of `S` to properties of `T`.
///
/// # Invariants
///
/// - Each source path is mapped at most once, ignoring ASCII case.
pub struct PropertyMap<S, T> {
    entries: Vec<(&'static str, PropertyKey<T>)>,
    _source: PhantomData<fn(&S)>,
}

impl<S, T> Default for PropertyMap<S, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            _source: PhantomData,
        }
    }
}

impl<S: Entity, T: Entity> PropertyMap<S, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `source` on `S` lives at `target` on `T`.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::AlreadyMapped` if `source` is already mapped.
    ///
    /// # Panics
    ///
    /// Panics if either field is not a property of its entity.
    pub fn map<V: PropertyValue>(mut self, source: Field<S, V>, target: Field<T, V>) -> Result<Self, MappingError> {
        let source_key = source.key();
        if let Some((_, existing)) = self
            .entries
            .iter()
            .find(|(path, _)| source_key.matches_path(path))
        {
            return Err(MappingError::AlreadyMapped {
                source_path: source.path().to_string(),
                target_path: target.path().to_string(),
                existing_path: existing.path().to_string(),
            });
        }
        self.entries.push((source.path(), target.key()));
        Ok(self)
    }

    /// Translate a source key to the target shape.
    ///
    /// A declared correspondence wins. Otherwise the same path is resolved
    /// on `T`.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::UnresolvedProperty` if neither applies.
    pub fn apply_map(&self, key: &PropertyKey<S>) -> Result<PropertyKey<T>, MappingError> {
        if let Some((_, target)) = self.entries.iter().find(|(path, _)| key.matches_path(path)) {
            return Ok(target.clone());
        }
        let schema = T::schema();
        schema
            .resolve(key.path())
            .ok_or_else(|| MappingError::UnresolvedProperty {
                path: key.path().to_string(),
                entity: schema.name(),
            })
    }

    /// Number of declared correspondences.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Item, ItemView};

    fn view_map() -> PropertyMap<ItemView, Item> {
        PropertyMap::new()
            .map(ItemView::TITLE, Item::NAME)
            .unwrap()
            .map(ItemView::OWNER_SCORE, Item::OWNER_SCORE)
            .unwrap()
    }

    #[test]
    fn test_declared_correspondence_wins() {
        let map = view_map();
        let target = map.apply_map(&ItemView::OWNER_SCORE.key()).unwrap();
        assert_eq!(target, Item::OWNER_SCORE.key());
        assert_eq!(target.path(), "Owner.Score");
    }

    #[test]
    fn test_identity_fallback() {
        let map = view_map();
        let target = map.apply_map(&ItemView::ID.key()).unwrap();
        assert_eq!(target, Item::ID.key());
    }

    #[test]
    fn test_unresolved_property() {
        let map = PropertyMap::<ItemView, Item>::new();
        let err = map.apply_map(&ItemView::TITLE.key()).unwrap_err();
        assert_eq!(
            err,
            MappingError::UnresolvedProperty {
                path: "Title".to_string(),
                entity: "Item",
            }
        );
    }

    #[test]
    fn test_mapping_source_twice_fails() {
        let err = view_map().map(ItemView::TITLE, Item::NAME).err().unwrap();
        assert_eq!(
            err.to_string(),
            "cannot map property 'Title' to 'Name', since it is already mapped to 'Name'"
        );
    }
}
