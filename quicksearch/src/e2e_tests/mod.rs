//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, driving the demo router with
//! deterministically generated users and checking results against the same
//! operation done directly on those users.

#![cfg(test)]

mod helpers;

mod test_complete;
mod test_dto_search;
mod test_filtering;
mod test_paging;
mod test_prefixes;
mod test_sorting;
mod test_validation;
