//! Entity schemas and property path resolution.
//!
//! Every searchable type registers its properties once, at first use, through
//! a `SchemaBuilder`. The resulting `Schema` maps each canonical dotted path
//! (including paths into nested entities) to a typed accessor, so resolving a
//! query string path is a single lookup with no per-request reflection.
//!
//! # Example
//!
//! ```ignore
//! impl Entity for User {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: LazyLock<Schema<User>> = LazyLock::new(|| {
//!             Schema::builder("User")
//!                 .property("FirstName", |u: &User| u.first_name.clone())
//!                 .nested("Account", |u: &User| u.account.as_ref(), Account::schema())
//!                 .build()
//!         });
//!         &SCHEMA
//!     }
//! }
//! ```
//!
//! # Invariants
//!
//! - Paths are unique within a schema, ignoring ASCII case.
//! - Path segments are non-empty and never contain the path separator.

mod property;

use std::collections::HashMap;
use std::sync::Arc;

pub use property::{Accessor, Field, PropertyKey};

use crate::constants::PATH_SEPARATOR;
use crate::types::{PropertyValue, Value, ValueKind};

/// A type whose properties can be filtered and sorted from a query string.
pub trait Entity: Sized + Send + Sync + 'static {
    /// The property registry for this type.
    fn schema() -> &'static Schema<Self>;
}

/// The resolvable properties of entity type `T`.
pub struct Schema<T> {
    name: &'static str,
    /// Every resolvable path, in registration order.
    properties: Vec<PropertyKey<T>>,
    /// Lowercased path -> index into `properties`.
    by_path: HashMap<String, usize>,
}

impl<T: 'static> Schema<T> {
    /// Start building a schema for an entity with the given display name.
    #[must_use]
    pub const fn builder(name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            name,
            properties: Vec::new(),
        }
    }

    /// The entity name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Resolve a dotted path, matching each segment case-insensitively.
    ///
    /// Returns `None` if the path is empty, names a segment that does not
    /// exist, or continues past a scalar property.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<PropertyKey<T>> {
        if path.is_empty() {
            return None;
        }
        self.by_path
            .get(&path.to_ascii_lowercase())
            .map(|&index| self.properties[index].clone())
    }

    /// Resolve a dotted path, matching its casing exactly.
    #[must_use]
    pub fn resolve_exact(&self, path: &str) -> Option<PropertyKey<T>> {
        self.resolve(path).filter(|key| key.path() == path)
    }

    /// Resolve a typed field handle.
    ///
    /// # Panics
    ///
    /// Panics if the field path is not registered or its registered kind
    /// does not match `V`.
    #[must_use]
    pub fn key<V: PropertyValue>(&self, field: Field<T, V>) -> PropertyKey<T> {
        let Some(key) = self.resolve_exact(field.path()) else {
            panic!(
                "field '{}' is not a property of entity '{}'",
                field.path(),
                self.name
            );
        };
        assert_eq!(
            key.kind(),
            V::KIND,
            "field '{}' on entity '{}' has a mismatched value type",
            field.path(),
            self.name
        );
        key
    }

    /// Iterate over every resolvable property, in registration order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyKey<T>> {
        self.properties.iter()
    }
}

/// Builder for a `Schema`.
pub struct SchemaBuilder<T> {
    name: &'static str,
    properties: Vec<PropertyKey<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Register a scalar property.
    ///
    /// The value kind and nullability come from the getter's return type;
    /// returning an `Option` marks the property nullable.
    #[must_use]
    pub fn property<V, F>(mut self, name: &'static str, get: F) -> Self
    where
        V: PropertyValue,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        assert_segment(name);
        self.properties.push(PropertyKey::new(
            name,
            V::KIND,
            V::NULLABLE,
            Arc::new(move |item: &T| get(item).into_value()),
        ));
        self
    }

    /// Register a nested entity.
    ///
    /// The nested entity itself becomes a composite property that can be
    /// compared against null, and every property of `schema` becomes
    /// resolvable as `name.<path>`. Nested properties are nullable because
    /// the parent may be absent.
    #[must_use]
    pub fn nested<U, F>(mut self, name: &'static str, get: F, schema: &Schema<U>) -> Self
    where
        U: 'static,
        F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
    {
        assert_segment(name);
        let get = Arc::new(get);

        #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
        let presence = Arc::clone(&get);
        self.properties.push(PropertyKey::new(
            name,
            ValueKind::Composite,
            true,
            Arc::new(move |item: &T| {
                if presence(item).is_some() {
                    Value::Object
                } else {
                    Value::Null
                }
            }),
        ));

        for child in schema.properties() {
            self.properties.push(child.nested_under(name, &get));
        }
        self
    }

    /// Finish the schema.
    ///
    /// # Panics
    ///
    /// Panics if two properties share a path, ignoring ASCII case.
    #[must_use]
    pub fn build(self) -> Schema<T> {
        let mut by_path = HashMap::with_capacity(self.properties.len());
        for (index, key) in self.properties.iter().enumerate() {
            let previous = by_path.insert(key.path().to_ascii_lowercase(), index);
            assert!(
                previous.is_none(),
                "property '{}' is registered twice on entity '{}'",
                key.path(),
                self.name
            );
        }

        Schema {
            name: self.name,
            properties: self.properties,
            by_path,
        }
    }
}

fn assert_segment(name: &str) {
    assert!(!name.is_empty(), "property name must not be empty");
    assert!(
        !name.contains(PATH_SEPARATOR),
        "property name '{name}' must not contain '{PATH_SEPARATOR}'"
    );
}
