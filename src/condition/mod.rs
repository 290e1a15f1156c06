//! Static condition module
//!
//! This module evaluates the `{fieldKey, operator, value}` conditions attached
//! to question definitions and folds them into per-question visibility.

mod evaluator;
mod model;


pub use evaluator::*;
pub use model::*;
