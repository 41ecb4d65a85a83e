//! In-memory queries over borrowed slices.

use std::convert::Infallible;

use crate::pagination::PageSource;
use crate::query::ordering::OrderBy;
use crate::query::predicate::Predicate;
use crate::query::queryable::Queryable;

/// A deferred query over a borrowed slice.
///
/// Nothing is evaluated until `execute`, `count` or a page fetch.
/// Sorting is stable, so items that compare equal keep their source order.
pub struct MemoryQuery<'a, T> {
    source: &'a [T],
    predicates: Vec<Predicate<T>>,
    ordering: Option<OrderBy<T>>,
}

impl<'a, T> MemoryQuery<'a, T> {
    #[must_use]
    pub const fn new(source: &'a [T]) -> Self {
        Self {
            source,
            predicates: Vec::new(),
            ordering: None,
        }
    }

    /// The underlying slice.
    #[must_use]
    pub const fn source(&self) -> &'a [T] {
        self.source
    }

    /// Whether no predicate or ordering has been applied.
    #[must_use]
    pub const fn is_pass_through(&self) -> bool {
        self.predicates.is_empty() && self.ordering.is_none()
    }

    /// The applied predicates, in application order.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate<T>] {
        &self.predicates
    }

    #[must_use]
    pub const fn ordering(&self) -> Option<&OrderBy<T>> {
        self.ordering.as_ref()
    }

    /// Evaluate the query.
    #[must_use]
    pub fn execute(&self) -> Vec<&'a T> {
        select(self.source, &self.predicates, self.ordering.as_ref())
    }

    /// Count matching items without ordering them.
    #[must_use]
    pub fn count(&self) -> usize {
        self.source
            .iter()
            .filter(|item| matches_all(&self.predicates, item))
            .count()
    }
}

impl<T> Queryable<T> for MemoryQuery<'_, T> {
    fn filter_by(mut self, predicate: Predicate<T>) -> Self {
        self.predicates.push(predicate);
        self
    }

    fn order_by(mut self, ordering: OrderBy<T>) -> Self {
        self.ordering = Some(ordering);
        self
    }
}

impl<'a, T> PageSource for MemoryQuery<'a, T> {
    type Item = &'a T;
    type Error = Infallible;

    fn count(&self) -> Result<usize, Infallible> {
        Ok(Self::count(self))
    }

    fn fetch(&self, skip: usize, take: usize) -> Result<Vec<&'a T>, Infallible> {
        Ok(self.execute().into_iter().skip(skip).take(take).collect())
    }
}

/// Filter and order `source`.
pub fn select<'a, T>(
    source: &'a [T],
    predicates: &[Predicate<T>],
    ordering: Option<&OrderBy<T>>,
) -> Vec<&'a T> {
    let mut selected: Vec<&'a T> = source
        .iter()
        .filter(|item| matches_all(predicates, item))
        .collect();
    if let Some(ordering) = ordering {
        selected.sort_by(|a, b| ordering.compare(a, b));
    }
    selected
}

pub fn matches_all<T>(predicates: &[Predicate<T>], item: &T) -> bool {
    predicates.iter().all(|predicate| predicate.evaluate(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterOperator, FilterSpecification};
    use crate::pagination::PageSpec;
    use crate::sort::{SortDirection, SortSpecification};
    use crate::testing::{Item, ids, items};

    #[test]
    fn test_absent_and_empty_specs_leave_query_untouched() {
        let source = items(0..5);
        let empty_filter = FilterSpecification::<Item>::new();
        let none_sort = SortSpecification::new().add(Item::ID, SortDirection::None);

        let query = MemoryQuery::new(&source)
            .filtered(None)
            .filtered(Some(&empty_filter))
            .sorted(None)
            .sorted(Some(&none_sort));

        assert!(query.is_pass_through());
        assert!(std::ptr::eq(query.source(), source.as_slice()));
        assert_eq!(ids(query.execute()), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_filter_then_sort() {
        let source = items(0..20);
        let filter = FilterSpecification::new().add(Item::ID, FilterOperator::Lt, 10);
        let sort = SortSpecification::new()
            .add(Item::ACTIVE, SortDirection::Asc)
            .add(Item::ID, SortDirection::Desc);

        let query = MemoryQuery::new(&source)
            .filtered(Some(&filter))
            .sorted(Some(&sort));

        assert_eq!(ids(query.execute()), vec![9, 7, 5, 3, 1, 8, 6, 4, 2, 0]);
        assert_eq!(query.count(), 10);
    }

    #[test]
    fn test_filters_accumulate_and_ordering_replaces() {
        let source = items(0..10);
        let query = MemoryQuery::new(&source)
            .filtered(Some(&FilterSpecification::new().add(Item::ID, FilterOperator::Gt, 2)))
            .filtered(Some(&FilterSpecification::new().add(Item::ID, FilterOperator::Lt, 6)))
            .sorted(Some(&SortSpecification::new().add(Item::ID, SortDirection::Desc)))
            .sorted(Some(&SortSpecification::new().add(Item::ACTIVE, SortDirection::Asc)));

        assert_eq!(query.predicates().len(), 2);
        let keys = query.ordering().unwrap().keys();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key.path(), "Active");
        assert_eq!(ids(query.execute()), vec![3, 5, 4]);
    }

    #[test]
    fn test_sort_is_stable() {
        let source = items(0..8);
        let sort = SortSpecification::new().add(Item::ACTIVE, SortDirection::Desc);
        let query = MemoryQuery::new(&source).sorted(Some(&sort));
        assert_eq!(ids(query.execute()), vec![0, 2, 4, 6, 1, 3, 5, 7]);
    }

    #[test]
    fn test_sort_precedence_follows_insertion_order() {
        let source = items(0..6);
        let by_active_then_id = SortSpecification::new()
            .add(Item::ACTIVE, SortDirection::Asc)
            .add(Item::ID, SortDirection::Desc);
        let by_id_then_active = SortSpecification::new()
            .add(Item::ID, SortDirection::Desc)
            .add(Item::ACTIVE, SortDirection::Asc);

        let first = MemoryQuery::new(&source).sorted(Some(&by_active_then_id));
        let second = MemoryQuery::new(&source).sorted(Some(&by_id_then_active));
        assert_eq!(ids(first.execute()), vec![5, 3, 1, 4, 2, 0]);
        assert_eq!(ids(second.execute()), vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_nested_nulls_sort_first() {
        let source = items(0..6);
        let sort = SortSpecification::new().add(Item::OWNER_SCORE, SortDirection::Asc);
        let query = MemoryQuery::new(&source).sorted(Some(&sort));
        // 0 and 4 have no owner, 5 has an owner without a score.
        assert_eq!(ids(query.execute()), vec![0, 4, 5, 1, 2, 3]);
    }

    #[test]
    fn test_paged_counts_filtered_items() {
        let source = items(0..30);
        let filter = FilterSpecification::new().add(Item::ACTIVE, FilterOperator::Eq, true);
        let query = MemoryQuery::new(&source).filtered(Some(&filter));

        let page = query.paged(Some(PageSpec::new(2, 10).unwrap())).unwrap();
        assert_eq!(ids(page.items), vec![20, 22, 24, 26, 28]);
        assert_eq!(page.total_items, 15);
        assert_eq!(page.total_pages, 2);
    }
}
