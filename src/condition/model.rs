//! Static condition triples attached to question definitions

use crate::error::{Result, RuleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Single `{fieldKey, operator, value}` predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field_key: String,
    pub operator: ConditionOperator,
    pub value: String,
}

impl Condition {
    pub fn new(field_key: impl Into<String>, operator: ConditionOperator, value: impl Into<String>) -> Self {
        Self {
            field_key: field_key.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Condition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    /// Equal (equals)
    Equals,
    /// Not equal (not_equals)
    NotEquals,
    /// Greater than (gt)
    Gt,
    /// Greater than or equal (gte)
    Gte,
    /// Less than (lt)
    Lt,
    /// Less than or equal (lte)
    Lte,
    /// Substring containment (includes)
    Includes,
}

impl ConditionOperator {
    pub const ALL: [ConditionOperator; 7] = [
        ConditionOperator::Equals,
        ConditionOperator::NotEquals,
        ConditionOperator::Gt,
        ConditionOperator::Gte,
        ConditionOperator::Lt,
        ConditionOperator::Lte,
        ConditionOperator::Includes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not_equals",
            ConditionOperator::Gt => "gt",
            ConditionOperator::Gte => "gte",
            ConditionOperator::Lt => "lt",
            ConditionOperator::Lte => "lte",
            ConditionOperator::Includes => "includes",
        }
    }
}

impl FromStr for ConditionOperator {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        ConditionOperator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| RuleError::InvalidOperator(s.to_string()))
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_names_round_trip() {
        for op in ConditionOperator::ALL {
            assert_eq!(op.as_str().parse::<ConditionOperator>().unwrap(), op);
        }
        assert_eq!(
            "between".parse::<ConditionOperator>(),
            Err(RuleError::InvalidOperator("between".to_string()))
        );
    }

    #[test]
    fn test_condition_wire_format() {
        let cond: Condition =
            serde_json::from_str(r#"{"fieldKey":"state","operator":"not_equals","value":"CA"}"#)
                .unwrap();
        assert_eq!(cond, Condition::new("state", ConditionOperator::NotEquals, "CA"));
    }
}
