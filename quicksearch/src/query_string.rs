//! Canonical query string rendering.
//!
//! `QueryStringBuilder` turns typed specifications back into the query
//! string format the binders accept. Blocks are emitted page first, then
//! filter, then sort. Empty blocks are left out.

use crate::filter::FilterSpecification;
use crate::pagination::PageSpec;
use crate::sort::SortSpecification;

/// Error returned when a block is added with an unusable prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStringError {
    /// The prefix is empty.
    MissingPrefix,
}

impl std::fmt::Display for QueryStringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPrefix => write!(f, "query string prefix must not be empty"),
        }
    }
}

impl std::error::Error for QueryStringError {}

/// Builds a query string from a page, a filter and a sort.
pub struct QueryStringBuilder<'a, T> {
    page: Option<(&'a str, PageSpec)>,
    filter: Option<(&'a str, &'a FilterSpecification<T>)>,
    sort: Option<(&'a str, &'a SortSpecification<T>)>,
}

impl<T> Default for QueryStringBuilder<'_, T> {
    fn default() -> Self {
        Self {
            page: None,
            filter: None,
            sort: None,
        }
    }
}

impl<'a, T> QueryStringBuilder<'a, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page block.
    ///
    /// # Errors
    ///
    /// Returns `QueryStringError::MissingPrefix` if `prefix` is empty.
    pub fn page(mut self, prefix: &'a str, page: PageSpec) -> Result<Self, QueryStringError> {
        self.page = Some((non_empty(prefix)?, page));
        Ok(self)
    }

    /// Set the filter block.
    ///
    /// # Errors
    ///
    /// Returns `QueryStringError::MissingPrefix` if `prefix` is empty.
    pub fn filter(
        mut self,
        prefix: &'a str,
        filter: &'a FilterSpecification<T>,
    ) -> Result<Self, QueryStringError> {
        self.filter = Some((non_empty(prefix)?, filter));
        Ok(self)
    }

    /// Set the sort block.
    ///
    /// # Errors
    ///
    /// Returns `QueryStringError::MissingPrefix` if `prefix` is empty.
    pub fn sort(
        mut self,
        prefix: &'a str,
        sort: &'a SortSpecification<T>,
    ) -> Result<Self, QueryStringError> {
        self.sort = Some((non_empty(prefix)?, sort));
        Ok(self)
    }

    /// Render every non-empty block, joined with `&`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let blocks = [
            self.page.map(|(prefix, page)| page.to_query_string(prefix)),
            self.filter
                .map(|(prefix, filter)| filter.to_query_string(prefix)),
            self.sort.map(|(prefix, sort)| sort.to_query_string(prefix)),
        ];
        blocks
            .into_iter()
            .flatten()
            .filter(|block| !block.is_empty())
            .collect::<Vec<_>>()
            .join("&")
    }
}

const fn non_empty(prefix: &str) -> Result<&str, QueryStringError> {
    if prefix.is_empty() {
        return Err(QueryStringError::MissingPrefix);
    }
    Ok(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{SearchPrefixes, SearchRequest};
    use crate::filter::FilterOperator;
    use crate::sort::SortDirection;
    use crate::testing::Item;

    #[test]
    fn test_blocks_in_order() {
        let filter = FilterSpecification::new().add(Item::NAME, FilterOperator::Like, "a b".to_string());
        let sort = SortSpecification::new().add(Item::PRICE, SortDirection::Desc);

        let query = QueryStringBuilder::new()
            .sort("s", &sort)
            .unwrap()
            .filter("f", &filter)
            .unwrap()
            .page("p", PageSpec::new(3, 10).unwrap())
            .unwrap()
            .to_query_string();

        assert_eq!(query, "p.Number=3&p.Size=10&f.Name.Like=a%20b&s.Price=Desc");
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let filter = FilterSpecification::<Item>::new();
        let sort = SortSpecification::new().add(Item::ID, SortDirection::Asc);

        let query = QueryStringBuilder::new()
            .filter("f", &filter)
            .unwrap()
            .sort("s", &sort)
            .unwrap()
            .to_query_string();
        assert_eq!(query, "s.Id=Asc");
        assert_eq!(QueryStringBuilder::<Item>::new().to_query_string(), "");
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        let sort = SortSpecification::<Item>::new();
        assert_eq!(
            QueryStringBuilder::new().sort("", &sort).err(),
            Some(QueryStringError::MissingPrefix)
        );
        assert_eq!(
            QueryStringBuilder::<Item>::new()
                .page("", PageSpec::default())
                .err(),
            Some(QueryStringError::MissingPrefix)
        );
    }

    #[test]
    fn test_rendered_query_binds_back() {
        let filter = FilterSpecification::new()
            .add(Item::ID, FilterOperator::Gt, 49)
            .add(Item::ID, FilterOperator::Lt, 51)
            .add(Item::NOTE, FilterOperator::Neq, None)
            .add(Item::NAME, FilterOperator::Eq, "x&y=z".to_string());
        let sort = SortSpecification::new()
            .add(Item::OWNER_SCORE, SortDirection::Desc)
            .add(Item::ID, SortDirection::Asc);
        let page = PageSpec::new(2, 7).unwrap();

        let query = QueryStringBuilder::new()
            .page("p", page)
            .unwrap()
            .filter("f", &filter)
            .unwrap()
            .sort("s", &sort)
            .unwrap()
            .to_query_string();

        let request = SearchRequest::<Item>::from_query(&query, &SearchPrefixes::default()).unwrap();
        assert_eq!(request.page, Some(page));

        let bound = request.filter.unwrap();
        assert_eq!(bound.to_query_string("f"), filter.to_query_string("f"));
        let bound_sort = request.sort.unwrap();
        assert_eq!(bound_sort.to_query_string("s"), sort.to_query_string("s"));
    }
}
