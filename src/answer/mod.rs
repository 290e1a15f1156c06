//! Answer snapshot module
//!
//! Holds the values a respondent has entered so far, keyed by question id,
//! and the coercion rules every predicate uses to read them.

mod snapshot;
mod value;

pub use snapshot::*;
pub use value::*;
