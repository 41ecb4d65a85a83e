//! Property handles.
//!
//! - `PropertyKey` - a resolved property path bound to an accessor on the root type
//! - `Field` - a compile-time typed handle naming a property path

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::schema::Entity;
use crate::types::{PropertyValue, Value, ValueError, ValueKind};

/// Reads a property value from a root entity.
pub type Accessor<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

/// A resolved property path on entity type `T`.
///
/// Equality and hashing use the canonical path only, so a key resolved from
/// query string text and a key resolved from a typed `Field` are
/// interchangeable when they name the same property.
///
/// # Invariants
///
/// - `path` is the canonical (declared) casing of the property path.
/// - `accessor` always returns a value of `kind`, or `Value::Null` when
///   `nullable` is set.
pub struct PropertyKey<T> {
    path: Arc<str>,
    kind: ValueKind,
    nullable: bool,
    accessor: Accessor<T>,
}

impl<T> PropertyKey<T> {
    pub(crate) fn new(
        path: impl Into<Arc<str>>,
        kind: ValueKind,
        nullable: bool,
        accessor: Accessor<T>,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            nullable,
            accessor,
        }
    }

    /// The canonical dotted path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The value kind of the property.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether the property can hold null.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Read the property value from an item.
    pub fn value_of(&self, item: &T) -> Value {
        (self.accessor)(item)
    }

    /// Check whether this key names the given path, ignoring ASCII case.
    #[must_use]
    pub fn matches_path(&self, path: &str) -> bool {
        self.path.eq_ignore_ascii_case(path)
    }

    /// Convert a value to this property's kind, enforcing nullability.
    pub fn convert(&self, value: Value) -> Result<Value, ValueError> {
        if value.is_null() {
            return if self.nullable {
                Ok(Value::Null)
            } else {
                Err(ValueError::NullNotAllowed)
            };
        }
        value.coerce(self.kind)
    }

    /// Re-anchor this key under a parent accessor.
    pub(crate) fn nested_under<P, F>(&self, prefix: &str, parent: &Arc<F>) -> PropertyKey<P>
    where
        T: 'static,
        P: 'static,
        F: for<'a> Fn(&'a P) -> Option<&'a T> + Send + Sync + 'static,
    {
        #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
        let parent = Arc::clone(parent);
        #[allow(clippy::disallowed_methods)]
        let inner = Arc::clone(&self.accessor);
        PropertyKey::new(
            format!("{prefix}.{}", self.path),
            self.kind,
            true,
            Arc::new(move |item: &P| parent(item).map_or(Value::Null, |child| inner(child))),
        )
    }
}

impl<T> Clone for PropertyKey<T> {
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    fn clone(&self) -> Self {
        Self {
            path: Arc::clone(&self.path),
            kind: self.kind,
            nullable: self.nullable,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> PartialEq for PropertyKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<T> Eq for PropertyKey<T> {}

impl<T> Hash for PropertyKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl<T> fmt::Debug for PropertyKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyKey")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("accessor", &"<fn>")
            .finish()
    }
}

impl<T> fmt::Display for PropertyKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A typed handle to a property of `T` holding values of type `V`.
///
/// Declared as constants next to the entity, e.g.
/// `pub const FIRST_NAME: Field<User, String> = Field::new("FirstName");`.
/// The path is matched case-sensitively against the entity schema.
pub struct Field<T, V> {
    path: &'static str,
    _marker: PhantomData<fn(&T) -> V>,
}

impl<T, V> Field<T, V> {
    /// Create a field handle for a canonical path.
    #[must_use]
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// The canonical dotted path.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }
}

impl<T: Entity, V: PropertyValue> Field<T, V> {
    /// Resolve this field against the entity schema.
    ///
    /// # Panics
    ///
    /// Panics if the path is not registered on `T` or the registered kind
    /// differs from `V`. Both indicate a wrong field declaration.
    #[must_use]
    pub fn key(&self) -> PropertyKey<T> {
        T::schema().key(*self)
    }
}

impl<T, V> Clone for Field<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Field<T, V> {}

impl<T, V> fmt::Debug for Field<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.path).finish()
    }
}
