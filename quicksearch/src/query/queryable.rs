use crate::filter::FilterSpecification;
use crate::query::compile::{compile_filter, compile_sort};
use crate::query::ordering::OrderBy;
use crate::query::predicate::Predicate;
use crate::sort::SortSpecification;

/// A deferred query over items of `T`.
///
/// This is the storage boundary: an implementation receives the compiled
/// predicate and ordering and decides how to execute them.
pub trait Queryable<T>: Sized {
    /// Restrict to items matching `predicate`, on top of any earlier
    /// restriction.
    #[must_use]
    fn filter_by(self, predicate: Predicate<T>) -> Self;

    /// Order by `ordering`, replacing any earlier ordering.
    #[must_use]
    fn order_by(self, ordering: OrderBy<T>) -> Self;

    /// Apply a filter specification.
    ///
    /// Returns `self` untouched when the specification is absent or
    /// compiles to nothing.
    #[must_use]
    fn filtered(self, spec: Option<&FilterSpecification<T>>) -> Self {
        match spec.and_then(compile_filter) {
            Some(predicate) => self.filter_by(predicate),
            None => self,
        }
    }

    /// Apply a sort specification.
    ///
    /// Returns `self` untouched when the specification is absent or every
    /// entry has no direction.
    #[must_use]
    fn sorted(self, spec: Option<&SortSpecification<T>>) -> Self {
        match spec.and_then(compile_sort) {
            Some(ordering) => self.order_by(ordering),
            None => self,
        }
    }
}
