//! Pagination over filtered and sorted sources.
//!
//! A page is fetched by skipping `(number - 1) * size` items and taking
//! `size`. The total count is taken independently over the whole source, so
//! it reflects any filter already applied but never the page window.
//!
//! # Invariants
//!
//! - `PageSpec::number` and `PageSpec::size` are always at least 1.
//! - `Page::total_pages` is `ceil(total_items / page_size)`, and 0 when there
//!   are no items.

use std::future::Future;

use serde::Serialize;

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

/// Error returned when constructing an out-of-range `PageSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    /// The page number is less than 1.
    InvalidNumber(usize),
    /// The page size is less than 1.
    InvalidSize(usize),
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber(n) => write!(f, "page number must be at least 1, got {n}"),
            Self::InvalidSize(n) => write!(f, "page size must be at least 1, got {n}"),
        }
    }
}

impl std::error::Error for PageError {}

/// Which page to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    number: usize,
    size: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageSpec {
    /// Create a page spec. `number` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns an error if `number` or `size` is 0.
    pub const fn new(number: usize, size: usize) -> Result<Self, PageError> {
        if number == 0 {
            return Err(PageError::InvalidNumber(number));
        }
        if size == 0 {
            return Err(PageError::InvalidSize(size));
        }
        Ok(Self { number, size })
    }

    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of items before this page.
    #[must_use]
    pub const fn skip(&self) -> usize {
        (self.number - 1).saturating_mul(self.size)
    }

    /// Render as `prefix.Number=N&prefix.Size=S`.
    #[must_use]
    pub fn to_query_string(&self, prefix: &str) -> String {
        format!(
            "{prefix}.Number={}&{prefix}.Size={}",
            self.number, self.size
        )
    }
}

/// One page of results plus paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<Item> {
    pub items: Vec<Item>,
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<Item> Page<Item> {
    #[must_use]
    pub const fn new(items: Vec<Item>, spec: PageSpec, total_items: usize) -> Self {
        Self {
            items,
            current_page: spec.number,
            page_size: spec.size,
            total_items,
            total_pages: total_items.div_ceil(spec.size),
        }
    }

    /// Project every item, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(Item) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// A synchronous source that can be counted and windowed.
pub trait PageSource {
    type Item;
    type Error;

    /// Count every item in the source.
    fn count(&self) -> Result<usize, Self::Error>;

    /// Fetch up to `take` items after skipping `skip`.
    fn fetch(&self, skip: usize, take: usize) -> Result<Vec<Self::Item>, Self::Error>;

    /// Fetch one page. `None` means the default page.
    ///
    /// # Errors
    ///
    /// Propagates the first source error unchanged.
    fn paged(&self, page: Option<PageSpec>) -> Result<Page<Self::Item>, Self::Error> {
        let spec = page.unwrap_or_default();
        let items = self.fetch(spec.skip(), spec.size())?;
        let total_items = self.count()?;
        Ok(Page::new(items, spec, total_items))
    }
}

/// An asynchronous source that can be counted and windowed.
///
/// The count and the fetch of a page are issued concurrently and have no
/// ordering relative to each other.
pub trait AsyncPageSource: Sync {
    type Item: Send;
    type Error: Send;

    fn count(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send;

    fn fetch(
        &self,
        skip: usize,
        take: usize,
    ) -> impl Future<Output = Result<Vec<Self::Item>, Self::Error>> + Send;

    /// Fetch one page. `None` means the default page.
    ///
    /// # Errors
    ///
    /// Propagates the first source error unchanged.
    fn paged_async(
        &self,
        page: Option<PageSpec>,
    ) -> impl Future<Output = Result<Page<Self::Item>, Self::Error>> + Send {
        async move {
            let spec = page.unwrap_or_default();
            let (items, total_items) =
                futures::try_join!(self.fetch(spec.skip(), spec.size()), self.count())?;
            Ok(Page::new(items, spec, total_items))
        }
    }
}
