//! Whole-request binding.

use crate::binding::errors::BindingErrors;
use crate::binding::params::QueryParams;
use crate::binding::{bind_filter, bind_page, bind_sort};
use crate::constants::{DEFAULT_FILTER_PREFIX, DEFAULT_PAGE_PREFIX, DEFAULT_SORT_PREFIX};
use crate::filter::FilterSpecification;
use crate::pagination::PageSpec;
use crate::schema::Entity;
use crate::sort::SortSpecification;

/// Query string prefixes for each block of a search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPrefixes {
    pub page: String,
    pub filter: String,
    pub sort: String,
}

impl Default for SearchPrefixes {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_PREFIX.to_string(),
            filter: DEFAULT_FILTER_PREFIX.to_string(),
            sort: DEFAULT_SORT_PREFIX.to_string(),
        }
    }
}

/// A bound page, filter and sort for entity `T`.
///
/// Each block is `None` when the query string did not mention it.
pub struct SearchRequest<T> {
    pub page: Option<PageSpec>,
    pub filter: Option<FilterSpecification<T>>,
    pub sort: Option<SortSpecification<T>>,
}

impl<T> Default for SearchRequest<T> {
    fn default() -> Self {
        Self {
            page: None,
            filter: None,
            sort: None,
        }
    }
}

impl<T> std::fmt::Debug for SearchRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchRequest")
            .field("page", &self.page)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .finish()
    }
}

impl<T: Entity> SearchRequest<T> {
    /// Bind all three blocks in one pass.
    ///
    /// # Errors
    ///
    /// Returns every rejected parameter from every block if any block
    /// failed.
    pub fn bind(params: &QueryParams, prefixes: &SearchPrefixes) -> Result<Self, BindingErrors> {
        let mut errors = BindingErrors::new();
        let page = bind_page(params, &prefixes.page, &mut errors);
        let filter = bind_filter::<T>(params, &prefixes.filter, &mut errors);
        let sort = bind_sort::<T>(params, &prefixes.sort, &mut errors);

        if page.is_failed() || filter.is_failed() || sort.is_failed() {
            return Err(errors);
        }

        Ok(Self {
            page: page.bound(),
            filter: filter.bound(),
            sort: sort.bound(),
        })
    }

    /// Parse a raw query string and bind it.
    ///
    /// # Errors
    ///
    /// Same as `bind`.
    pub fn from_query(raw: &str, prefixes: &SearchPrefixes) -> Result<Self, BindingErrors> {
        Self::bind(&QueryParams::parse(raw), prefixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::errors::BindingErrorKind;
    use crate::testing::Item;

    #[test]
    fn test_binds_all_blocks() {
        let request = SearchRequest::<Item>::from_query(
            "p.Number=2&p.Size=5&f.Id.gt=3&s.Name=desc",
            &SearchPrefixes::default(),
        )
        .unwrap();

        assert_eq!(request.page, Some(PageSpec::new(2, 5).unwrap()));
        assert_eq!(request.filter.unwrap().len(), 1);
        assert_eq!(request.sort.unwrap().len(), 1);
    }

    #[test]
    fn test_empty_query_binds_nothing() {
        let request = SearchRequest::<Item>::from_query("", &SearchPrefixes::default()).unwrap();
        assert!(request.page.is_none());
        assert!(request.filter.is_none());
        assert!(request.sort.is_none());
    }

    #[test]
    fn test_errors_from_every_block() {
        let errors = SearchRequest::<Item>::from_query(
            "p.Size=0&f.Id=1&s.Id=sideways",
            &SearchPrefixes::default(),
        )
        .unwrap_err();

        let kinds: Vec<BindingErrorKind> = errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BindingErrorKind::InvalidPageValue,
                BindingErrorKind::MissingPropertyOrFilter,
                BindingErrorKind::UnrecognizedSortValue,
            ]
        );
    }

    #[test]
    fn test_custom_prefixes() {
        let prefixes = SearchPrefixes {
            page: "page".to_string(),
            filter: "where".to_string(),
            sort: "order".to_string(),
        };
        let request =
            SearchRequest::<Item>::from_query("page.Size=3&where.Active.eq=true&order.Id=asc&f.Nope=1", &prefixes)
                .unwrap();
        assert_eq!(request.page, Some(PageSpec::new(1, 3).unwrap()));
        assert!(request.filter.is_some());
        assert!(request.sort.is_some());
    }
}
