//! Predicate AST.
//!
//! A compiled filter is a tree of property comparisons joined by `And` and
//! `Or`. The tree can be evaluated in memory or walked by a storage backend
//! that translates it into its own query language.

use std::cmp::Ordering;
use std::fmt;

use crate::filter::FilterOperator;
use crate::schema::PropertyKey;
use crate::types::{Value, ValueKind};

/// Comparison operator of a predicate leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
    /// Substring test on strings.
    Contains,
    /// Negated substring test on strings.
    NotContains,
}

impl ComparisonOperator {
    /// The comparison a filter operator compiles to. `None` compiles to
    /// nothing.
    #[must_use]
    pub const fn from_filter(operator: FilterOperator) -> Option<Self> {
        match operator {
            FilterOperator::None => None,
            FilterOperator::Lt => Some(Self::Lt),
            FilterOperator::Lte => Some(Self::Lte),
            FilterOperator::Gt => Some(Self::Gt),
            FilterOperator::Gte => Some(Self::Gte),
            FilterOperator::Eq => Some(Self::Eq),
            FilterOperator::Neq => Some(Self::Neq),
            FilterOperator::Like => Some(Self::Contains),
            FilterOperator::Nlike => Some(Self::NotContains),
        }
    }

    /// Whether this operator applies to properties of `kind`.
    #[must_use]
    pub const fn supports(self, kind: ValueKind) -> bool {
        match self {
            Self::Eq | Self::Neq => true,
            Self::Lt | Self::Lte | Self::Gt | Self::Gte => kind.is_ordered(),
            Self::Contains | Self::NotContains => matches!(kind, ValueKind::String),
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Contains => "contains",
            Self::NotContains => "not contains",
        }
    }

    /// Apply the operator with `left` as the property value.
    ///
    /// Equality treats null as equal to null. Ordering and substring tests
    /// involving null are false, and `NotContains` is the exact negation of
    /// `Contains`.
    #[must_use]
    pub fn apply(self, left: &Value, right: &Value) -> bool {
        match self {
            Self::Eq => left.query_eq(right),
            Self::Neq => !left.query_eq(right),
            Self::Lt => left.query_cmp(right) == Some(Ordering::Less),
            Self::Lte => matches!(left.query_cmp(right), Some(Ordering::Less | Ordering::Equal)),
            Self::Gt => left.query_cmp(right) == Some(Ordering::Greater),
            Self::Gte => matches!(
                left.query_cmp(right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Contains => contains(left, right),
            Self::NotContains => !contains(left, right),
        }
    }
}

fn contains(left: &Value, right: &Value) -> bool {
    match (left.as_str(), right.as_str()) {
        (Some(haystack), Some(needle)) => haystack.contains(needle),
        _ => false,
    }
}

/// A single `property <op> value` test.
pub struct Comparison<T> {
    pub key: PropertyKey<T>,
    pub operator: ComparisonOperator,
    pub value: Value,
}

impl<T> Comparison<T> {
    #[must_use]
    pub fn evaluate(&self, item: &T) -> bool {
        self.operator.apply(&self.key.value_of(item), &self.value)
    }
}

impl<T> Clone for Comparison<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            operator: self.operator,
            value: self.value.clone(),
        }
    }
}

impl<T> PartialEq for Comparison<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.operator == other.operator && self.value == other.value
    }
}

/// A boolean expression over properties of `T`.
pub enum Predicate<T> {
    Comparison(Comparison<T>),
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
}

impl<T> Predicate<T> {
    /// A comparison leaf.
    #[must_use]
    pub const fn compare(key: PropertyKey<T>, operator: ComparisonOperator, value: Value) -> Self {
        Self::Comparison(Comparison {
            key,
            operator,
            value,
        })
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Evaluate against an item.
    #[must_use]
    pub fn evaluate(&self, item: &T) -> bool {
        match self {
            Self::Comparison(comparison) => comparison.evaluate(item),
            Self::And(left, right) => left.evaluate(item) && right.evaluate(item),
            Self::Or(left, right) => left.evaluate(item) || right.evaluate(item),
        }
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Comparison(comparison) => Self::Comparison(comparison.clone()),
            Self::And(left, right) => Self::And(left.clone(), right.clone()),
            Self::Or(left, right) => Self::Or(left.clone(), right.clone()),
        }
    }
}

impl<T> PartialEq for Predicate<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Comparison(a), Self::Comparison(b)) => a == b,
            (Self::And(a1, a2), Self::And(b1, b2)) | (Self::Or(a1, a2), Self::Or(b1, b2)) => {
                a1 == b1 && a2 == b2
            }
            _ => false,
        }
    }
}

impl<T> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparison(Comparison {
                key,
                operator,
                value,
            }) => match value {
                Value::String(s) => write!(f, "{key} {} {s:?}", operator.symbol()),
                other => write!(f, "{key} {} {other}", operator.symbol()),
            },
            Self::And(left, right) => write!(f, "({left} && {right})"),
            Self::Or(left, right) => write!(f, "({left} || {right})"),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({self})")
    }
}
