//! Compiled questionnaire and rule-based visibility

use crate::answer::Answers;
use crate::condition::conditions_pass;
use crate::config::{QuestionConfig, QuestionnaireConfig, RuleConfig};
use crate::error::{Result, RuleError};
use crate::questionnaire::report::VisibilityReport;
use crate::rule::{self, Expr};
use ahash::AHashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Visibility of one question from its `conditionalRuleId`
///
/// A question without a rule id, or whose rule id matches nothing in
/// `rules`, is visible. Static conditions are not consulted here.
pub fn is_question_visible(question: &QuestionConfig, answers: &Answers, rules: &[RuleConfig]) -> Result<bool> {
    let Some(rule_id) = question.conditional_rule_id.as_deref() else {
        return Ok(true);
    };

    match rules.iter().find(|rule| rule.conditional_rule_id == rule_id) {
        Some(rule) => rule::evaluate_rule_expression(&rule.rule_expression, answers),
        None => {
            tracing::debug!(question = %question.key, rule_id, "rule not found, showing question");
            Ok(true)
        }
    }
}

/// Questionnaire with every rule parsed up front
#[derive(Debug, Clone)]
pub struct Questionnaire {
    state_code: Option<String>,
    questions: Vec<QuestionConfig>,
    rules: AHashMap<String, Arc<Expr>>,
}

impl Questionnaire {
    /// Compile every rule; the first malformed one fails construction
    pub fn new(config: QuestionnaireConfig) -> Result<Self> {
        let mut rules = AHashMap::with_capacity(config.rules.len());
        for rule in &config.rules {
            let ast = rule::compile(&rule.rule_expression).map_err(|err| RuleError::InvalidRule {
                rule_id: rule.conditional_rule_id.clone(),
                source: Box::new(err),
            })?;
            rules.insert(rule.conditional_rule_id.clone(), ast);
        }

        Ok(Self {
            state_code: config.state_code,
            questions: config.questions,
            rules,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(QuestionnaireConfig::from_json(json)?)
    }

    pub fn state_code(&self) -> Option<&str> {
        self.state_code.as_deref()
    }

    pub fn questions(&self) -> &[QuestionConfig] {
        &self.questions
    }

    pub fn question(&self, key: &str) -> Option<&QuestionConfig> {
        self.questions.iter().find(|q| q.key == key)
    }

    pub fn rule(&self, rule_id: &str) -> Option<&Expr> {
        self.rules.get(rule_id).map(Arc::as_ref)
    }

    /// Static conditions and the referenced rule must both pass
    pub fn is_visible(&self, question: &QuestionConfig, answers: &Answers) -> bool {
        if !conditions_pass(question, answers) {
            return false;
        }

        let Some(rule_id) = question.conditional_rule_id.as_deref() else {
            return true;
        };
        match self.rules.get(rule_id) {
            Some(ast) => ast.evaluate(answers),
            None => {
                tracing::debug!(question = %question.key, rule_id, "rule not found, showing question");
                true
            }
        }
    }

    /// Visibility of every question, in definition order
    pub fn resolve(&self, answers: &Answers) -> VisibilityReport {
        self.questions
            .iter()
            .map(|question| (question.key.clone(), self.is_visible(question, answers)))
            .collect()
    }

    /// Answer ids each question's visibility reads
    pub fn dependencies(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.questions
            .iter()
            .map(|question| (question.key.clone(), self.question_dependencies(question)))
            .collect()
    }

    /// Questions whose visibility must be recomputed when `answer_id` changes
    pub fn dependents_of(&self, answer_id: &str) -> Vec<&str> {
        self.questions
            .iter()
            .filter(|question| self.question_dependencies(question).contains(answer_id))
            .map(|question| question.key.as_str())
            .collect()
    }

    fn question_dependencies(&self, question: &QuestionConfig) -> BTreeSet<String> {
        let mut ids: BTreeSet<String> = question
            .condition_list()
            .iter()
            .map(|cond| cond.field_key.clone())
            .collect();

        if let Some(ast) = question
            .conditional_rule_id
            .as_deref()
            .and_then(|rule_id| self.rules.get(rule_id))
        {
            ast.collect_ids(&mut ids);
        }
        ids
    }
}
