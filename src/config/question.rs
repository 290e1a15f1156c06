//! Question, rule and questionnaire definition structures

use crate::condition::Condition;
use serde::{Deserialize, Serialize};

/// Question definition, reduced to what visibility needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionConfig {
    pub key: String,
    /// All must pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_rule_id: Option<String>,
}

impl QuestionConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.conditional_rule_id = Some(rule_id.into());
        self
    }

    /// Static conditions, empty when none are defined
    #[inline]
    pub fn condition_list(&self) -> &[Condition] {
        self.conditions.as_deref().unwrap_or(&[])
    }
}

/// Named rule expression referenced by `conditionalRuleId`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    pub conditional_rule_id: String,
    pub rule_expression: String,
}

impl RuleConfig {
    pub fn new(rule_id: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            conditional_rule_id: rule_id.into(),
            rule_expression: expression.into(),
        }
    }
}

/// Full questionnaire definition for one state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireConfig {
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionConfig>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}
