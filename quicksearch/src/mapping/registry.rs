//! Property map registry.
//!
//! Holds one `PropertyMap` per (source, target) entity pair. The registry
//! is populated once at startup and is read-only afterwards, so request
//! handlers share it behind an `Arc` without further coordination.
//!
//! # Thread Safety
//!
//! Initialization uses double-checked locking on an `RwLock`: exactly one
//! caller runs its configuration, and readers never observe a partially
//! populated registry.
//!
//! # Invariants
//!
//! - Once initialized, the set of maps never changes.
//! - Each stored map is a `PropertyMap<S, T>` for the pair of its key.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::filter::{FilterClause, FilterSpecification};
use crate::mapping::{MappingError, PropertyMap};
use crate::schema::Entity;
use crate::sort::SortSpecification;
use crate::types::ClauseError;

type MapKey = (TypeId, TypeId);
type ErasedMap = Arc<dyn Any + Send + Sync>;

/// Collects maps during registry initialization.
#[derive(Default)]
pub struct RegistryBuilder {
    maps: HashMap<MapKey, ErasedMap>,
}

impl RegistryBuilder {
    /// Register the map from `S` to `T`.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::AlreadyRegistered` if a map for the pair
    /// already exists.
    pub fn register<S: Entity, T: Entity>(&mut self, map: PropertyMap<S, T>) -> Result<&mut Self, MappingError> {
        let key = (TypeId::of::<S>(), TypeId::of::<T>());
        if self.maps.contains_key(&key) {
            return Err(MappingError::AlreadyRegistered {
                source_entity: S::schema().name(),
                target_entity: T::schema().name(),
            });
        }
        self.maps.insert(key, Arc::new(map));
        Ok(self)
    }
}

/// Registry of property maps, shared across requests.
#[derive(Default)]
pub struct PropertyMapRegistry {
    /// `None` until initialized.
    maps: RwLock<Option<HashMap<MapKey, ErasedMap>>>,
}

impl PropertyMapRegistry {
    /// Create an uninitialized registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the registry.
    ///
    /// Runs `configure` only if the registry is not yet initialized. Returns
    /// `true` if this call initialized the registry, `false` if another call
    /// already had.
    ///
    /// # Errors
    ///
    /// Returns the first error from `configure`, leaving the registry
    /// uninitialized, or `MappingError::LockPoisoned`.
    pub fn initialize<F>(&self, configure: F) -> Result<bool, MappingError>
    where
        F: FnOnce(&mut RegistryBuilder) -> Result<(), MappingError>,
    {
        // Fast path: already initialized (read lock only)
        if self.is_initialized()? {
            return Ok(false);
        }

        let mut maps = self.maps.write().map_err(|_| MappingError::LockPoisoned)?;

        // Double-check: another thread may have initialized while we waited
        if maps.is_some() {
            return Ok(false);
        }

        let mut builder = RegistryBuilder::default();
        configure(&mut builder)?;

        let count = builder.maps.len();
        *maps = Some(builder.maps);
        drop(maps);

        tracing::info!("Property map registry initialized with {} map(s)", count);
        Ok(true)
    }

    /// Whether `initialize` has completed.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::LockPoisoned` if the lock is poisoned.
    pub fn is_initialized(&self) -> Result<bool, MappingError> {
        let maps = self.maps.read().map_err(|_| MappingError::LockPoisoned)?;
        Ok(maps.is_some())
    }

    /// Look up the map from `S` to `T`.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::NotInitialized` or `MappingError::MapNotFound`.
    pub fn get<S: Entity, T: Entity>(&self) -> Result<Arc<PropertyMap<S, T>>, MappingError> {
        let maps = self.maps.read().map_err(|_| MappingError::LockPoisoned)?;
        #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
        let erased = maps
            .as_ref()
            .ok_or(MappingError::NotInitialized)?
            .get(&(TypeId::of::<S>(), TypeId::of::<T>()))
            .map(Arc::clone);
        drop(maps);

        let not_found = || MappingError::MapNotFound {
            source_entity: S::schema().name(),
            target_entity: T::schema().name(),
        };

        erased
            .ok_or_else(not_found)?
            .downcast::<PropertyMap<S, T>>()
            .map_err(|_| not_found())
    }

    /// Remap a filter specification from `S` to `T`.
    ///
    /// Clauses keep their operators. Values are converted to the target
    /// property's kind.
    ///
    /// # Errors
    ///
    /// Returns a lookup error from `get`, `UnresolvedProperty` for a key
    /// with no target, or `InvalidValue` for a value the target rejects.
    pub fn map_filter<S: Entity, T: Entity>(
        &self,
        source: &FilterSpecification<S>,
    ) -> Result<FilterSpecification<T>, MappingError> {
        let map = self.get::<S, T>()?;
        let mut target = FilterSpecification::new();

        for (source_key, clauses) in source.iter() {
            let target_key = map.apply_map(source_key)?;
            let clauses = clauses
                .iter()
                .map(|clause| {
                    target_key
                        .convert(clause.value().clone())
                        .map(|value| FilterClause::new(clause.operator(), value))
                        .map_err(|error| MappingError::InvalidValue {
                            path: target_key.path().to_string(),
                            error,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            target.add_clauses(target_key, clauses);
        }

        Ok(target)
    }

    /// Remap a sort specification from `S` to `T`, keeping entry order.
    ///
    /// # Errors
    ///
    /// Returns a lookup error from `get`, `UnresolvedProperty` for a key
    /// with no target, or `ConflictingSort` if two keys land on the same
    /// target property.
    pub fn map_sort<S: Entity, T: Entity>(
        &self,
        source: &SortSpecification<S>,
    ) -> Result<SortSpecification<T>, MappingError> {
        let map = self.get::<S, T>()?;
        let mut target = SortSpecification::new();

        for (source_key, clause) in source.iter() {
            let target_key = map.apply_map(source_key)?;
            target.insert(target_key, clause).map_err(|e| match e {
                ClauseError::DuplicateProperty { path } => MappingError::ConflictingSort { path },
                ClauseError::UnknownProperty { path, entity } => {
                    MappingError::UnresolvedProperty { path, entity }
                }
                ClauseError::InvalidValue(error) => MappingError::InvalidValue {
                    path: source_key.path().to_string(),
                    error,
                },
            })?;
        }

        Ok(target)
    }
}
