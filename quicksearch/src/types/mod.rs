pub mod clause_error;
pub mod value;

pub use clause_error::ClauseError;
pub use value::{PropertyValue, Value, ValueError, ValueKind};
