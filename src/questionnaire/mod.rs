//! Questionnaire module - question visibility from conditions and rules

mod engine;
mod report;

pub use engine::*;
pub use report::*;
