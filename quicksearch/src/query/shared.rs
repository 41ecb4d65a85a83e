//! Shared asynchronous collections.
//!
//! `SharedCollection` stands in for a remote data source: reads go through
//! an async lock, and queries against it are paged with `AsyncPageSource`.

use std::convert::Infallible;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::pagination::AsyncPageSource;
use crate::query::memory::{matches_all, select};
use crate::query::ordering::OrderBy;
use crate::query::predicate::Predicate;
use crate::query::queryable::Queryable;

/// A collection shared between request handlers.
pub struct SharedCollection<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for SharedCollection<T> {
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> SharedCollection<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Start a query over the collection.
    #[must_use]
    pub fn query(&self) -> SharedQuery<T> {
        SharedQuery {
            collection: self.clone(),
            predicates: Vec::new(),
            ordering: None,
        }
    }
}

impl<T: Send + Sync> SharedCollection<T> {
    /// Append an item.
    pub async fn push(&self, item: T) {
        self.items.write().await.push(item);
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

/// A deferred query over a `SharedCollection`.
///
/// The collection is read when the query is counted or fetched, not when
/// it is built.
pub struct SharedQuery<T> {
    collection: SharedCollection<T>,
    predicates: Vec<Predicate<T>>,
    ordering: Option<OrderBy<T>>,
}

impl<T> SharedQuery<T> {
    /// Whether no predicate or ordering has been applied.
    #[must_use]
    pub const fn is_pass_through(&self) -> bool {
        self.predicates.is_empty() && self.ordering.is_none()
    }
}

impl<T: Clone + Send + Sync> SharedQuery<T> {
    /// Evaluate the query and clone out every matching item.
    pub async fn to_vec(&self) -> Vec<T> {
        let items = self.collection.items.read().await;
        select(&items, &self.predicates, self.ordering.as_ref())
            .into_iter()
            .cloned()
            .collect()
    }
}

impl<T> Queryable<T> for SharedQuery<T> {
    fn filter_by(mut self, predicate: Predicate<T>) -> Self {
        self.predicates.push(predicate);
        self
    }

    fn order_by(mut self, ordering: OrderBy<T>) -> Self {
        self.ordering = Some(ordering);
        self
    }
}

impl<T: Clone + Send + Sync> AsyncPageSource for SharedQuery<T> {
    type Item = T;
    type Error = Infallible;

    async fn count(&self) -> Result<usize, Infallible> {
        let items = self.collection.items.read().await;
        Ok(items
            .iter()
            .filter(|item| matches_all(&self.predicates, item))
            .count())
    }

    async fn fetch(&self, skip: usize, take: usize) -> Result<Vec<T>, Infallible> {
        let items = self.collection.items.read().await;
        Ok(select(&items, &self.predicates, self.ordering.as_ref())
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterOperator, FilterSpecification};
    use crate::pagination::PageSpec;
    use crate::sort::{SortDirection, SortSpecification};
    use crate::testing::{Item, ids, items};

    #[test]
    fn test_paged_async() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let collection = SharedCollection::new(items(0..12));
        let sort = SortSpecification::new().add(Item::ID, SortDirection::Desc);

        let query = collection.query().sorted(Some(&sort));
        let page = runtime
            .block_on(query.paged_async(Some(PageSpec::new(2, 5).unwrap())))
            .unwrap();

        assert_eq!(ids(&page.items), vec![6, 5, 4, 3, 2]);
        assert_eq!(page.total_items, 12);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_query_reads_at_execution_time() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let collection = SharedCollection::new(items(0..3));
        let filter = FilterSpecification::new().add(Item::ID, FilterOperator::Gte, 2);
        let query = collection.query().filtered(Some(&filter));

        runtime.block_on(collection.push(crate::testing::item(7)));
        let found = runtime.block_on(query.to_vec());
        assert_eq!(ids(&found), vec![2, 7]);
        assert_eq!(runtime.block_on(collection.len()), 4);
    }

    #[test]
    fn test_empty_specs_pass_through() {
        let collection = SharedCollection::new(items(0..3));
        let query = collection
            .query()
            .filtered(Some(&FilterSpecification::new()))
            .sorted(None);
        assert!(query.is_pass_through());
    }
}
