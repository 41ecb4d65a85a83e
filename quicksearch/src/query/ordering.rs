//! Multi-key ordering.

use std::cmp::Ordering;
use std::fmt;

use crate::schema::PropertyKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// One key of an ordering.
pub struct OrderKey<T> {
    pub key: PropertyKey<T>,
    pub direction: OrderDirection,
}

impl<T> Clone for OrderKey<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            direction: self.direction,
        }
    }
}

impl<T> PartialEq for OrderKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.direction == other.direction
    }
}

/// An ordering over items of `T`.
///
/// The first key is the primary order. Each later key only decides between
/// items that compare equal on every key before it.
///
/// # Invariants
///
/// - `keys` is never empty.
pub struct OrderBy<T> {
    keys: Vec<OrderKey<T>>,
}

impl<T> OrderBy<T> {
    /// Order by a single key.
    #[must_use]
    pub fn new(key: PropertyKey<T>, direction: OrderDirection) -> Self {
        Self {
            keys: vec![OrderKey { key, direction }],
        }
    }

    /// Add a tie-breaker after the existing keys.
    #[must_use]
    pub fn then_by(mut self, key: PropertyKey<T>, direction: OrderDirection) -> Self {
        self.keys.push(OrderKey { key, direction });
        self
    }

    /// The keys in precedence order.
    #[must_use]
    pub fn keys(&self) -> &[OrderKey<T>] {
        &self.keys
    }

    /// Compare two items. Null sorts first in ascending order.
    #[must_use]
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        for OrderKey { key, direction } in &self.keys {
            let ordering = key.value_of(a).sort_cmp(&key.value_of(b));
            let ordering = match direction {
                OrderDirection::Ascending => ordering,
                OrderDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl<T> Clone for OrderBy<T> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
        }
    }
}

impl<T> PartialEq for OrderBy<T> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl<T> fmt::Display for OrderBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, OrderKey { key, direction }) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let suffix = match direction {
                OrderDirection::Ascending => "asc",
                OrderDirection::Descending => "desc",
            };
            write!(f, "{key} {suffix}")?;
        }
        Ok(())
    }
}

impl<T> fmt::Debug for OrderBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderBy({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Item, item};

    #[test]
    fn test_tie_breaker_only_decides_ties() {
        let order = OrderBy::new(Item::ACTIVE.key(), OrderDirection::Descending)
            .then_by(Item::ID.key(), OrderDirection::Ascending);

        let mut items = vec![item(1), item(2), item(3), item(4)];
        items.sort_by(|a, b| order.compare(a, b));
        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_null_first_ascending_last_descending() {
        // item(3) has a note, item(1) does not.
        let asc = OrderBy::new(Item::NOTE.key(), OrderDirection::Ascending);
        assert_eq!(asc.compare(&item(1), &item(3)), Ordering::Less);

        let desc = OrderBy::new(Item::NOTE.key(), OrderDirection::Descending);
        assert_eq!(desc.compare(&item(1), &item(3)), Ordering::Greater);
    }

    #[test]
    fn test_display() {
        let order = OrderBy::new(Item::PRICE.key(), OrderDirection::Descending)
            .then_by(Item::OWNER_SCORE.key(), OrderDirection::Ascending);
        assert_eq!(order.to_string(), "Price desc, Owner.Score asc");
    }
}
