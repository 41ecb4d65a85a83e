//! Shared constants for query string handling.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Query string literal that binds to a null filter value.
pub const NULL_LITERAL: &str = "null";

/// Page number used when a request carries no page block.
pub const DEFAULT_PAGE_NUMBER: usize = 1;

/// Page size used when a request carries no page block.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Default query string prefix for page parameters.
pub const DEFAULT_PAGE_PREFIX: &str = "p";

/// Default query string prefix for filter parameters.
pub const DEFAULT_FILTER_PREFIX: &str = "f";

/// Default query string prefix for sort parameters.
pub const DEFAULT_SORT_PREFIX: &str = "s";

/// Separator between prefix, property path segments and operator.
pub const PATH_SEPARATOR: char = '.';

/// Bytes percent-encoded in rendered filter values. Unreserved characters
/// are left as they are.
pub const QUERY_VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
