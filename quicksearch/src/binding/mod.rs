//! Query string binding.
//!
//! Turns untyped query parameters into typed page, filter and sort
//! specifications. Binding collects every problem it finds instead of
//! stopping at the first one, so a client sees all rejected parameters in a
//! single response.
//!
//! # Key grammar
//!
//! - Filter: `<prefix>.<propertyPath>.<operator>=<value>` (repeatable)
//! - Sort: `<prefix>.<propertyPath>=asc|desc`
//! - Page: `<prefix>.Number=<n>` and `<prefix>.Size=<n>`
//!
//! Prefixes, property paths, operators and directions all match ignoring
//! ASCII case. The literal `null` (exact case) is a null filter value.

mod errors;
mod filter;
mod page;
mod params;
mod request;
mod sort;

pub use errors::{Binding, BindingError, BindingErrorKind, BindingErrors, ErrorSink};
pub use filter::bind_filter;
pub use page::bind_page;
pub use params::QueryParams;
pub use request::{SearchPrefixes, SearchRequest};
pub use sort::bind_sort;
