//! Property value types and conversions.
//!
//! Provides the `Value` enum and `ValueKind` discriminant used by filter
//! clauses, along with the text conversion rules applied when binding query
//! string values to typed properties.

use std::cmp::Ordering;
use std::fmt;

use crate::constants::NULL_LITERAL;

/// Value kind discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Integer,
    Number,
    String,
    /// A nested entity. Only its presence can be compared.
    Composite,
}

impl ValueKind {
    /// Whether values of this kind have a meaningful total order.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::Integer | Self::Number | Self::String)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Composite => "composite",
        };
        f.write_str(name)
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    /// A non-null composite value.
    Object,
}

/// Errors that can occur when converting a value to a property kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The text could not be parsed as the target kind.
    InvalidFormat { kind: ValueKind, text: String },
    /// The value has a kind that cannot be converted to the target kind.
    IncompatibleKind { from: ValueKind, to: ValueKind },
    /// A null value was supplied for a property that is never null.
    NullNotAllowed,
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat { kind, text } => write!(f, "'{text}' is not a valid {kind}"),
            Self::IncompatibleKind { from, to } => {
                write!(f, "cannot convert {from} value to {to}")
            }
            Self::NullNotAllowed => write!(f, "null is not allowed for this property"),
        }
    }
}

impl std::error::Error for ValueError {}

impl Value {
    /// Get the kind of this value, or `None` for null.
    #[must_use]
    pub const fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(ValueKind::Boolean),
            Self::Integer(_) => Some(ValueKind::Integer),
            Self::Number(_) => Some(ValueKind::Number),
            Self::String(_) => Some(ValueKind::String),
            Self::Object => Some(ValueKind::Composite),
        }
    }

    /// Check if this is the null value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the string slice if this is a string value.
    #[must_use]
    pub const fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Parse query string text into a value.
    ///
    /// The literal `null` (case-sensitive) becomes `Value::Null`; anything
    /// else stays a string until it is coerced to a property kind.
    #[must_use]
    pub fn from_query_text(text: &str) -> Self {
        if text == NULL_LITERAL {
            Self::Null
        } else {
            Self::String(text.to_owned())
        }
    }

    /// Convert this value to the given kind.
    ///
    /// Strings are parsed, integers widen to numbers, and integral numbers
    /// narrow to integers. Null passes through unchanged.
    pub fn coerce(self, kind: ValueKind) -> Result<Self, ValueError> {
        match (self, kind) {
            (Self::Null, _) => Ok(Self::Null),
            (Self::Boolean(b), ValueKind::Boolean) => Ok(Self::Boolean(b)),
            (Self::Integer(n), ValueKind::Integer) => Ok(Self::Integer(n)),
            (Self::Number(n), ValueKind::Number) => Ok(Self::Number(n)),
            (Self::String(s), ValueKind::String) => Ok(Self::String(s)),
            (Self::Object, ValueKind::Composite) => Ok(Self::Object),
            #[allow(clippy::cast_precision_loss)]
            (Self::Integer(n), ValueKind::Number) => Ok(Self::Number(n as f64)),
            (Self::Number(n), ValueKind::Integer) => number_to_integer(n),
            (Self::String(s), kind) => parse_text(&s, kind),
            (other, to) => Err(ValueError::IncompatibleKind {
                // Null was matched above, so every remaining value has a kind.
                from: other.kind().unwrap_or(ValueKind::Composite),
                to,
            }),
        }
    }

    /// Compare two values for equality under query semantics.
    ///
    /// `null` equals `null`. Numbers and integers compare numerically.
    #[must_use]
    pub fn query_eq(&self, other: &Self) -> bool {
        match (self, other) {
            #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
            (Self::Integer(a), Self::Number(b)) | (Self::Number(b), Self::Integer(a)) => {
                *a as f64 == *b
            }
            #[allow(clippy::float_cmp)]
            (Self::Number(a), Self::Number(b)) => a == b,
            _ => self == other,
        }
    }

    /// Compare two values for ordering under query semantics.
    ///
    /// Returns `None` if either side is null or the kinds are not
    /// comparable.
    #[must_use]
    pub fn query_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Integer(a), Self::Number(b)) => (*a as f64).partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Number(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting.
    ///
    /// Null sorts before every other value, so it comes first in ascending
    /// order and last in descending order.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            _ => self.query_cmp(other).unwrap_or(Ordering::Equal),
        }
    }
}

fn number_to_integer(n: f64) -> Result<Value, ValueError> {
    #[allow(clippy::cast_precision_loss)]
    let in_range = n >= i64::MIN as f64 && n <= i64::MAX as f64;
    if n.fract() == 0.0 && in_range {
        #[allow(clippy::cast_possible_truncation)]
        Ok(Value::Integer(n as i64))
    } else {
        Err(ValueError::InvalidFormat {
            kind: ValueKind::Integer,
            text: n.to_string(),
        })
    }
}

fn parse_text(text: &str, kind: ValueKind) -> Result<Value, ValueError> {
    let invalid = || ValueError::InvalidFormat {
        kind,
        text: text.to_owned(),
    };

    match kind {
        ValueKind::String => Ok(Value::String(text.to_owned())),
        ValueKind::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Value::Boolean(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Value::Boolean(false))
            } else {
                Err(invalid())
            }
        }
        ValueKind::Integer => text.trim().parse::<i64>().map(Value::Integer).map_err(|_| invalid()),
        ValueKind::Number => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Number)
            .ok_or_else(invalid),
        ValueKind::Composite => Err(ValueError::IncompatibleKind {
            from: ValueKind::String,
            to: ValueKind::Composite,
        }),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str(NULL_LITERAL),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Object => f.write_str("{object}"),
        }
    }
}

/// A Rust type that can be exposed as an entity property.
///
/// Implemented for the scalar types a schema can register and for `Option`
/// of those types, which marks the property as nullable.
pub trait PropertyValue {
    /// The value kind of the property.
    const KIND: ValueKind;
    /// Whether the property can hold null.
    const NULLABLE: bool = false;

    /// Convert into a dynamically typed value.
    fn into_value(self) -> Value;
}

impl PropertyValue for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl PropertyValue for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn into_value(self) -> Value {
        Value::Integer(self)
    }
}

impl PropertyValue for i32 {
    const KIND: ValueKind = ValueKind::Integer;

    fn into_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl PropertyValue for u32 {
    const KIND: ValueKind = ValueKind::Integer;

    fn into_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl PropertyValue for f64 {
    const KIND: ValueKind = ValueKind::Number;

    fn into_value(self) -> Value {
        Value::Number(self)
    }
}

impl PropertyValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl PropertyValue for &str {
    const KIND: ValueKind = ValueKind::String;

    fn into_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl<V: PropertyValue> PropertyValue for Option<V> {
    const KIND: ValueKind = V::KIND;
    const NULLABLE: bool = true;

    fn into_value(self) -> Value {
        self.map_or(Value::Null, PropertyValue::into_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_text_null_is_case_sensitive() {
        assert_eq!(Value::from_query_text("null"), Value::Null);
        assert_eq!(
            Value::from_query_text("NULL"),
            Value::String("NULL".to_owned())
        );
    }

    #[test]
    fn test_coerce_parses_text() {
        let v = Value::String("-1".to_owned()).coerce(ValueKind::Integer);
        assert_eq!(v, Ok(Value::Integer(-1)));

        let v = Value::String("TRUE".to_owned()).coerce(ValueKind::Boolean);
        assert_eq!(v, Ok(Value::Boolean(true)));

        let v = Value::String("2.5".to_owned()).coerce(ValueKind::Number);
        assert_eq!(v, Ok(Value::Number(2.5)));
    }

    #[test]
    fn test_coerce_rejects_bad_text() {
        let err = Value::String("abc".to_owned())
            .coerce(ValueKind::Integer)
            .unwrap_err();
        assert_eq!(err.to_string(), "'abc' is not a valid integer");

        assert!(
            Value::String("nan".to_owned())
                .coerce(ValueKind::Number)
                .is_err()
        );
        assert!(
            Value::String("x".to_owned())
                .coerce(ValueKind::Composite)
                .is_err()
        );
    }

    #[test]
    fn test_coerce_between_numeric_kinds() {
        assert_eq!(
            Value::Integer(3).coerce(ValueKind::Number),
            Ok(Value::Number(3.0))
        );
        assert_eq!(
            Value::Number(4.0).coerce(ValueKind::Integer),
            Ok(Value::Integer(4))
        );
        assert!(Value::Number(4.5).coerce(ValueKind::Integer).is_err());
        assert_eq!(
            Value::Boolean(true).coerce(ValueKind::Integer),
            Err(ValueError::IncompatibleKind {
                from: ValueKind::Boolean,
                to: ValueKind::Integer
            })
        );
    }

    #[test]
    fn test_null_passes_through_coerce() {
        assert_eq!(Value::Null.coerce(ValueKind::Integer), Ok(Value::Null));
    }

    #[test]
    fn test_query_comparisons() {
        assert!(Value::Null.query_eq(&Value::Null));
        assert!(Value::Integer(2).query_eq(&Value::Number(2.0)));
        assert!(Value::Number(-0.0).query_eq(&Value::Number(0.0)));
        assert!(Value::Integer(0).query_eq(&Value::Number(-0.0)));
        assert_eq!(Value::Null.query_cmp(&Value::Integer(1)), None);
        assert_eq!(
            Value::String("a".to_owned()).query_cmp(&Value::String("b".to_owned())),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_sort_cmp_puts_null_first() {
        assert_eq!(Value::Null.sort_cmp(&Value::Integer(-5)), Ordering::Less);
        assert_eq!(Value::Integer(-5).sort_cmp(&Value::Null), Ordering::Greater);
        assert_eq!(Value::Null.sort_cmp(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::String("a b".to_owned()).to_string(), "a b");
    }

    #[test]
    fn test_property_value_option_is_nullable() {
        assert!(<Option<i64> as PropertyValue>::NULLABLE);
        assert!(!<i64 as PropertyValue>::NULLABLE);
        assert_eq!(<Option<String> as PropertyValue>::KIND, ValueKind::String);
        assert_eq!(None::<i64>.into_value(), Value::Null);
        assert_eq!(Some(7_i32).into_value(), Value::Integer(7));
    }
}
