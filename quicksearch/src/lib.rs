// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods))]

// Life of a search request:
// 1. Query string comes in
// 2. Bind it into typed page, filter and sort specifications
//     - Resolve property paths against the entity schema
//     - Convert values to the property's kind
//     - Collect every rejected parameter
// 3. Optionally remap DTO specifications onto the stored entity
// 4. Compile filter and sort into a predicate and an ordering
// 5. Apply them to a queryable and fetch one page
//
// System components:
//  - Schema and property keys
//  - Binders
//  - Predicate / ordering compiler
//  - Property map registry
//  - Pager

pub mod app;
pub mod binding;
pub mod config;
pub mod constants;
pub mod filter;
pub mod http;
pub mod mapping;
pub mod pagination;
pub mod query;
pub mod query_string;
pub mod schema;
pub mod sort;
pub mod types;

mod e2e_tests;
#[cfg(test)]
mod testing;

pub use binding::{QueryParams, SearchPrefixes, SearchRequest};
pub use filter::{FilterClause, FilterOperator, FilterSpecification};
pub use http::Search;
pub use mapping::{MappingError, PropertyMap, PropertyMapRegistry};
pub use pagination::{AsyncPageSource, Page, PageSource, PageSpec};
pub use query::{MemoryQuery, Queryable};
pub use query_string::{QueryStringBuilder, QueryStringError};
pub use schema::{Entity, Field, PropertyKey, Schema};
pub use sort::{SortClause, SortDirection, SortSpecification};
