//! Configuration module for questionnaire definitions
//!
//! This module handles deserialization of questions, conditions, rules and
//! answers from JSON and from Python dicts or objects.

mod question;

pub use question::*;

use crate::answer::{AnswerValue, Answers};
use crate::condition::Condition;
use crate::error::{Result, RuleError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};

impl QuestionnaireConfig {
    /// Parse `{"stateCode": .., "questions": [..], "rules": [..]}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Helper to get attribute from either dict or object, trying each name in turn
fn get_attr_opt<'py>(obj: &Bound<'py, PyAny>, names: &[&str]) -> Option<Bound<'py, PyAny>> {
    let found = if let Ok(dict) = obj.downcast::<PyDict>() {
        names.iter().find_map(|name| dict.get_item(*name).ok().flatten())
    } else {
        names.iter().find_map(|name| obj.getattr(*name).ok())
    };
    found.filter(|value| !value.is_none())
}

/// Helper to get a required attribute
fn get_attr<'py>(obj: &Bound<'py, PyAny>, names: &[&str]) -> PyResult<Bound<'py, PyAny>> {
    get_attr_opt(obj, names).ok_or_else(|| {
        RuleError::Deserialization(format!("missing field '{}'", names[0])).into()
    })
}

/// Convert one Python answer into an `AnswerValue`
pub fn extract_answer_value(obj: &Bound<'_, PyAny>) -> PyResult<AnswerValue> {
    if obj.is_none() {
        return Ok(AnswerValue::Null);
    }
    // bool before int: Python bools are ints
    if obj.is_instance_of::<PyBool>() {
        return Ok(AnswerValue::Bool(obj.extract()?));
    }
    if obj.is_instance_of::<PyInt>() || obj.is_instance_of::<PyFloat>() {
        return Ok(AnswerValue::Number(obj.extract()?));
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(AnswerValue::Str(obj.extract()?));
    }
    if obj.is_instance_of::<PyList>() || obj.is_instance_of::<PyTuple>() {
        let mut items = Vec::new();
        for item in obj.try_iter()? {
            let item = item?;
            if item.is_instance_of::<PyString>() {
                items.push(item.extract()?);
            } else {
                items.push(item.str()?.to_string());
            }
        }
        return Ok(AnswerValue::List(items));
    }

    Err(RuleError::Deserialization(format!(
        "unsupported answer type '{}'",
        obj.get_type().name()?
    ))
    .into())
}

/// Deserialize an answer snapshot from a Python dict
pub fn extract_answers(dict: &Bound<'_, PyDict>) -> PyResult<Answers> {
    let mut answers = Answers::with_capacity(dict.len());
    for (key, value) in dict.iter() {
        let key: String = key.extract()?;
        answers.insert(key, extract_answer_value(&value)?);
    }
    Ok(answers)
}

pub fn extract_condition(obj: &Bound<'_, PyAny>) -> PyResult<Condition> {
    let field_key: String = get_attr(obj, &["fieldKey", "field_key"])?.extract()?;
    let operator: String = get_attr(obj, &["operator"])?.extract()?;
    let value = get_attr(obj, &["value"])?;
    // Numeric thresholds are accepted and compared as text
    let value: String = if value.is_instance_of::<PyString>() {
        value.extract()?
    } else {
        value.str()?.to_string()
    };

    Ok(Condition {
        field_key,
        operator: operator.parse()?,
        value,
    })
}

pub fn extract_question(obj: &Bound<'_, PyAny>) -> PyResult<QuestionConfig> {
    let key: String = get_attr(obj, &["key"])?.extract()?;

    let conditions = match get_attr_opt(obj, &["conditions"]) {
        Some(list) => {
            let mut conditions = Vec::new();
            for item in list.try_iter()? {
                conditions.push(extract_condition(&item?)?);
            }
            Some(conditions)
        }
        None => None,
    };

    let conditional_rule_id: Option<String> =
        match get_attr_opt(obj, &["conditionalRuleId", "conditional_rule_id"]) {
            Some(id) => Some(id.extract()?),
            None => None,
        };

    Ok(QuestionConfig {
        key,
        conditions,
        conditional_rule_id,
    })
}

pub fn extract_questions(list: &Bound<'_, PyAny>) -> PyResult<Vec<QuestionConfig>> {
    let mut questions = Vec::new();
    for item in list.try_iter()? {
        questions.push(extract_question(&item?)?);
    }
    Ok(questions)
}

pub fn extract_rule(obj: &Bound<'_, PyAny>) -> PyResult<RuleConfig> {
    Ok(RuleConfig {
        conditional_rule_id: get_attr(obj, &["conditionalRuleId", "conditional_rule_id"])?.extract()?,
        rule_expression: get_attr(obj, &["ruleExpression", "rule_expression"])?.extract()?,
    })
}

pub fn extract_rules(list: &Bound<'_, PyAny>) -> PyResult<Vec<RuleConfig>> {
    let mut rules = Vec::new();
    for item in list.try_iter()? {
        rules.push(extract_rule(&item?)?);
    }
    Ok(rules)
}

/// Deserialize a questionnaire from a Python config dict
/// Expected format: {"stateCode": "CA", "questions": [...], "rules": [...]}
pub fn deserialize_questionnaire(config: &Bound<'_, PyDict>) -> PyResult<QuestionnaireConfig> {
    let config = config.as_any();

    let state_code: Option<String> = match get_attr_opt(config, &["stateCode", "state_code"]) {
        Some(code) => Some(code.extract()?),
        None => None,
    };
    let questions = match get_attr_opt(config, &["questions"]) {
        Some(list) => extract_questions(&list)?,
        None => Vec::new(),
    };
    let rules = match get_attr_opt(config, &["rules"]) {
        Some(list) => extract_rules(&list)?,
        None => Vec::new(),
    };

    Ok(QuestionnaireConfig {
        state_code,
        questions,
        rules,
    })
}
