//! Error types for the eligibility rules engine

use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

/// Main error type for the eligibility rules engine
///
/// Only malformed rule expressions and malformed configuration produce
/// errors. Evaluating a well-formed expression against any answers never
/// fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Unterminated escape sequence at position {position}")]
    UnterminatedEscape { position: usize },

    #[error("Invalid number '{lexeme}' at position {position}")]
    InvalidNumber { lexeme: String, position: usize },

    #[error("Expected {expected} but found '{found}' at position {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Unexpected trailing input '{found}' at position {position}")]
    TrailingInput { found: String, position: usize },

    #[error("Rule expression is empty")]
    EmptyExpression,

    #[error("Expression nesting exceeds {limit} levels at position {position}")]
    NestingTooDeep { limit: usize, position: usize },

    #[error("Expression has more than {limit} operators at position {position}")]
    TooManyOperators { limit: usize, position: usize },

    #[error("Invalid rule '{rule_id}': {source}")]
    InvalidRule {
        rule_id: String,
        #[source]
        source: Box<RuleError>,
    },

    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl RuleError {
    /// True for failures raised while tokenizing or parsing an expression
    pub fn is_syntax_error(&self) -> bool {
        match self {
            RuleError::UnexpectedCharacter { .. }
            | RuleError::UnterminatedString { .. }
            | RuleError::UnterminatedEscape { .. }
            | RuleError::InvalidNumber { .. }
            | RuleError::UnexpectedToken { .. }
            | RuleError::TrailingInput { .. }
            | RuleError::EmptyExpression
            | RuleError::NestingTooDeep { .. }
            | RuleError::TooManyOperators { .. } => true,
            RuleError::InvalidRule { source, .. } => source.is_syntax_error(),
            RuleError::InvalidOperator(_) | RuleError::Deserialization(_) => false,
        }
    }

    /// Source position of the failure, when there is one
    pub fn position(&self) -> Option<usize> {
        match self {
            RuleError::UnexpectedCharacter { position, .. }
            | RuleError::UnterminatedString { position }
            | RuleError::UnterminatedEscape { position }
            | RuleError::InvalidNumber { position, .. }
            | RuleError::UnexpectedToken { position, .. }
            | RuleError::TrailingInput { position, .. }
            | RuleError::NestingTooDeep { position, .. }
            | RuleError::TooManyOperators { position, .. } => Some(*position),
            RuleError::InvalidRule { source, .. } => source.position(),
            RuleError::EmptyExpression
            | RuleError::InvalidOperator(_)
            | RuleError::Deserialization(_) => None,
        }
    }
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        RuleError::Deserialization(err.to_string())
    }
}

impl From<RuleError> for PyErr {
    fn from(err: RuleError) -> PyErr {
        match err {
            RuleError::Deserialization(msg) => {
                PyTypeError::new_err(format!("Deserialization error: {}", msg))
            }
            RuleError::InvalidOperator(op) => {
                PyValueError::new_err(format!("Invalid operator: {}", op))
            }
            syntax => PyValueError::new_err(syntax.to_string()),
        }
    }
}

/// Result type alias for the eligibility rules engine
pub type Result<T> = std::result::Result<T, RuleError>;
