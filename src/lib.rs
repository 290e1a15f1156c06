//! Eligibility Rules Core - questionnaire visibility and rule-expression engine
//!
//! This crate decides which questions of an eligibility questionnaire are
//! shown, from static `{fieldKey, operator, value}` conditions and from
//! textual rule expressions, with Python bindings via PyO3.

use pyo3::prelude::*;

pub mod answer;
pub mod condition;
pub mod config;
pub mod error;
pub mod questionnaire;
pub mod rule;

use crate::answer::Answers;
use crate::questionnaire::{Questionnaire, VisibilityReport};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::types::PyDict;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

// ============================================================================
// Cached Questionnaire
// ============================================================================

/// Questionnaire compiled by `init_questionnaire`
static CACHED_QUESTIONNAIRE: OnceCell<RwLock<Arc<Questionnaire>>> = OnceCell::new();

fn cached_questionnaire() -> PyResult<Arc<Questionnaire>> {
    let cell = CACHED_QUESTIONNAIRE.get().ok_or_else(|| {
        PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(
            "Questionnaire not initialized. Call init_questionnaire() first.",
        )
    })?;
    Ok(Arc::clone(&cell.read()))
}

// ============================================================================
// Python Functions
// ============================================================================

/// Evaluate one `{fieldKey, operator, value}` condition
#[pyfunction]
fn evaluate_condition(condition: &Bound<'_, PyAny>, answers: &Bound<'_, PyDict>) -> PyResult<bool> {
    let condition = config::extract_condition(condition)?;
    let answers = config::extract_answers(answers)?;
    Ok(condition::evaluate_condition(&condition, &answers))
}

/// Visibility of every question from its static conditions
///
/// # Returns
/// A dict mapping each question key to its visibility
#[pyfunction]
fn compute_visibility(questions: &Bound<'_, PyAny>, answers: &Bound<'_, PyDict>) -> PyResult<HashMap<String, bool>> {
    let questions = config::extract_questions(questions)?;
    let answers = config::extract_answers(answers)?;
    Ok(condition::compute_visibility(&questions, &answers))
}

/// Parse and evaluate a rule expression
///
/// # Raises
/// ValueError if the expression is malformed
#[pyfunction]
fn evaluate_rule_expression(expression: &str, answers: &Bound<'_, PyDict>) -> PyResult<bool> {
    let answers = config::extract_answers(answers)?;
    Ok(rule::evaluate_rule_expression(expression, &answers)?)
}

/// Question ids a rule expression reads
///
/// # Raises
/// ValueError if the expression is malformed
#[pyfunction]
fn get_referenced_question_ids(expression: &str) -> PyResult<BTreeSet<String>> {
    Ok(rule::get_referenced_question_ids(expression)?)
}

/// Visibility of a question from its `conditionalRuleId`
///
/// Questions without a rule, or whose rule is not in `rules`, are visible.
#[pyfunction]
fn is_question_visible(
    question: &Bound<'_, PyAny>,
    answers: &Bound<'_, PyDict>,
    rules: &Bound<'_, PyAny>,
) -> PyResult<bool> {
    let question = config::extract_question(question)?;
    let answers = config::extract_answers(answers)?;
    let rules = config::extract_rules(rules)?;
    Ok(questionnaire::is_question_visible(&question, &answers, &rules)?)
}

/// Compile and cache a questionnaire (call once per definition change)
///
/// # Arguments
/// * `config` - `{"stateCode": ..., "questions": [...], "rules": [...]}`
///
/// # Raises
/// ValueError if any rule expression is malformed
#[pyfunction]
fn init_questionnaire(config: &Bound<'_, PyDict>) -> PyResult<()> {
    let config = config::deserialize_questionnaire(config)?;
    let compiled = Arc::new(Questionnaire::new(config)?);

    tracing::info!(
        state_code = compiled.state_code().unwrap_or("-"),
        questions = compiled.questions().len(),
        "questionnaire initialized"
    );

    // If already initialized, replace the questionnaire
    let cell = CACHED_QUESTIONNAIRE.get_or_init(|| RwLock::new(Arc::clone(&compiled)));
    *cell.write() = compiled;

    Ok(())
}

/// Check if a questionnaire is initialized
#[pyfunction]
fn is_questionnaire_initialized() -> bool {
    CACHED_QUESTIONNAIRE.get().is_some()
}

/// Resolve visibility of every cached question
///
/// # Raises
/// RuntimeError if `init_questionnaire` was not called first
#[pyfunction]
fn resolve_visibility(answers: &Bound<'_, PyDict>) -> PyResult<VisibilityReport> {
    let questionnaire = cached_questionnaire()?;
    let answers = config::extract_answers(answers)?;
    Ok(questionnaire.resolve(&answers))
}

/// Resolve visibility asynchronously
///
/// Resolution runs on a Tokio blocking thread, keeping Python's event loop
/// responsive for large questionnaires.
///
/// # Example (Python)
/// ```python
/// report = await resolve_visibility_async({"state": "CA", "age": 70})
/// print(report.visible_keys())
/// ```
#[pyfunction]
fn resolve_visibility_async<'py>(py: Python<'py>, answers: &Bound<'py, PyDict>) -> PyResult<Bound<'py, PyAny>> {
    let questionnaire = cached_questionnaire()?;
    let answers: Answers = config::extract_answers(answers)?;

    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let report = tokio::task::spawn_blocking(move || questionnaire.resolve(&answers))
            .await
            .map_err(|e| {
                PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                    "Visibility task panicked: {}",
                    e
                ))
            })?;

        Ok(report)
    })
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn eligibility_rules_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(evaluate_condition, m)?)?;
    m.add_function(wrap_pyfunction!(compute_visibility, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate_rule_expression, m)?)?;
    m.add_function(wrap_pyfunction!(get_referenced_question_ids, m)?)?;
    m.add_function(wrap_pyfunction!(is_question_visible, m)?)?;
    m.add_function(wrap_pyfunction!(init_questionnaire, m)?)?;
    m.add_function(wrap_pyfunction!(is_questionnaire_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(resolve_visibility, m)?)?;
    m.add_function(wrap_pyfunction!(resolve_visibility_async, m)?)?;
    m.add_class::<VisibilityReport>()?;
    Ok(())
}
