//! Answer values and the coercions shared by both evaluators

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single answer as submitted for one question
///
/// Multiselect questions answer with a list of option strings. Explicit
/// `Null` is kept distinct from a missing key, but predicates treat both as
/// "no value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// Null and the empty string carry no value; an empty list still does
    #[inline]
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Null => true,
            AnswerValue::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    /// String form used for text comparisons
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            AnswerValue::Null => Cow::Borrowed(""),
            AnswerValue::Bool(true) => Cow::Borrowed("true"),
            AnswerValue::Bool(false) => Cow::Borrowed("false"),
            AnswerValue::Number(n) => Cow::Owned(format_number(*n)),
            AnswerValue::Str(s) => Cow::Borrowed(s.as_str()),
            AnswerValue::List(items) => Cow::Owned(items.join(",")),
        }
    }

    /// Numeric form: numbers as-is, strings parsed as decimals
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) if n.is_finite() => Some(*n),
            AnswerValue::Str(s) => parse_decimal(s),
            _ => None,
        }
    }

    /// Boolean form: booleans as-is, strings true iff they read "true"
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Bool(b) => Some(*b),
            AnswerValue::Str(s) => Some(s.eq_ignore_ascii_case("true")),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AnswerValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Parse a decimal number, rejecting empty input and non-finite results
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Shortest decimal form: `70`, `70.5`, `-0.25`
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }
    n.to_string()
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Str(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Str(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<i32> for AnswerValue {
    fn from(value: i32) -> Self {
        AnswerValue::Number(f64::from(value))
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::List(value)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(value: Vec<&str>) -> Self {
        AnswerValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<AnswerValue>> From<Option<T>> for AnswerValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AnswerValue::Null, Into::into)
    }
}
