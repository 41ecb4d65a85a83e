//! Compiled queries.
//!
//! Filter and sort specifications compile to a `Predicate` AST and an
//! `OrderBy`. Anything implementing `Queryable` can then apply them; two
//! implementations ship here, one over a borrowed slice and one over a
//! shared async collection.
//!
//! # Pre-conditions
//!
//! - Compilation never fails for data reasons. Clauses that cannot apply to
//!   their property are dropped.
//!
//! # Post-conditions
//!
//! - A specification that compiles to nothing leaves the queryable exactly
//!   as it was.

mod compile;
mod memory;
mod ordering;
mod predicate;
mod queryable;
mod shared;

pub use compile::{compile_filter, compile_sort};
pub use memory::MemoryQuery;
pub use ordering::{OrderBy, OrderDirection, OrderKey};
pub use predicate::{Comparison, ComparisonOperator, Predicate};
pub use queryable::Queryable;
pub use shared::{SharedCollection, SharedQuery};
