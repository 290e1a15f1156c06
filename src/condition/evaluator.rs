//! Condition evaluator

use crate::answer::{parse_decimal, AnswerValue, Answers};
use crate::condition::model::{Condition, ConditionOperator};
use crate::config::QuestionConfig;
use std::collections::HashMap;

/// Evaluate one condition against the answers
///
/// A missing, null or empty answer fails every operator, `not_equals`
/// included.
pub fn evaluate_condition(cond: &Condition, answers: &Answers) -> bool {
    let Some(answer) = answers.present(&cond.field_key) else {
        return false;
    };

    match cond.operator {
        ConditionOperator::Equals => equals(answer, &cond.value),
        ConditionOperator::NotEquals => !equals(answer, &cond.value),
        ConditionOperator::Gt => compare(answer, &cond.value, |a, b| a > b),
        ConditionOperator::Gte => compare(answer, &cond.value, |a, b| a >= b),
        ConditionOperator::Lt => compare(answer, &cond.value, |a, b| a < b),
        ConditionOperator::Lte => compare(answer, &cond.value, |a, b| a <= b),
        ConditionOperator::Includes => includes(answer, &cond.value),
    }
}

/// Visibility of every question: true without conditions, else the AND of them
///
/// Reads raw answers only. A hidden question's answer still counts for the
/// questions that depend on it.
pub fn compute_visibility(questions: &[QuestionConfig], answers: &Answers) -> HashMap<String, bool> {
    let mut visibility = HashMap::with_capacity(questions.len());
    for question in questions {
        visibility.insert(question.key.clone(), conditions_pass(question, answers));
    }
    visibility
}

/// AND of a question's static conditions
#[inline]
pub fn conditions_pass(question: &QuestionConfig, answers: &Answers) -> bool {
    question
        .condition_list()
        .iter()
        .all(|cond| evaluate_condition(cond, answers))
}

#[inline]
fn equals(answer: &AnswerValue, expected: &str) -> bool {
    match answer {
        AnswerValue::List(items) => items.iter().any(|item| item == expected),
        scalar => scalar.as_text() == expected,
    }
}

#[inline]
fn compare(answer: &AnswerValue, expected: &str, op: fn(f64, f64) -> bool) -> bool {
    match (answer.as_number(), parse_decimal(expected)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

#[inline]
fn includes(answer: &AnswerValue, needle: &str) -> bool {
    match answer {
        AnswerValue::List(items) => items.iter().any(|item| item.contains(needle)),
        scalar => scalar.as_text().contains(needle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(field: &str, op: ConditionOperator, value: &str) -> Condition {
        Condition::new(field, op, value)
    }

    #[test]
    fn test_equals_scalar() {
        let answers: Answers = [("state", "CA")].into_iter().collect();
        assert!(evaluate_condition(&cond("state", ConditionOperator::Equals, "CA"), &answers));
        assert!(!evaluate_condition(&cond("state", ConditionOperator::Equals, "ca"), &answers));
        assert!(!evaluate_condition(&cond("state", ConditionOperator::Equals, "NY"), &answers));
    }

    #[test]
    fn test_equals_stringifies_numbers_and_booleans() {
        let mut answers = Answers::new();
        answers.insert("age", 70);
        answers.insert("veteran", true);

        assert!(evaluate_condition(&cond("age", ConditionOperator::Equals, "70"), &answers));
        assert!(evaluate_condition(&cond("veteran", ConditionOperator::Equals, "true"), &answers));
        assert!(!evaluate_condition(&cond("veteran", ConditionOperator::Equals, "True"), &answers));
    }

    #[test]
    fn test_equals_list_membership() {
        let mut answers = Answers::new();
        answers.insert("benefits", vec!["snap", "wic"]);

        assert!(evaluate_condition(&cond("benefits", ConditionOperator::Equals, "wic"), &answers));
        assert!(!evaluate_condition(&cond("benefits", ConditionOperator::Equals, "wi"), &answers));
        assert!(evaluate_condition(&cond("benefits", ConditionOperator::NotEquals, "tanf"), &answers));
        assert!(!evaluate_condition(&cond("benefits", ConditionOperator::NotEquals, "snap"), &answers));
    }

    #[test]
    fn test_not_equals_on_missing_field_is_false() {
        let mut answers = Answers::new();
        answers.insert("blank", "");
        answers.insert("null", AnswerValue::Null);

        for field in ["missing", "blank", "null"] {
            assert!(!evaluate_condition(&cond(field, ConditionOperator::NotEquals, "x"), &answers));
        }
    }

    #[test]
    fn test_numeric_comparisons() {
        let mut answers = Answers::new();
        answers.insert("income", "1500.50");
        answers.insert("household", 3);

        assert!(evaluate_condition(&cond("income", ConditionOperator::Gt, "1500.25"), &answers));
        assert!(evaluate_condition(&cond("income", ConditionOperator::Gte, "1500.5"), &answers));
        assert!(!evaluate_condition(&cond("income", ConditionOperator::Lt, "1500.5"), &answers));
        assert!(evaluate_condition(&cond("household", ConditionOperator::Lte, "3"), &answers));
        assert!(evaluate_condition(&cond("household", ConditionOperator::Lt, "3.5"), &answers));
    }

    #[test]
    fn test_numeric_comparison_with_non_numeric_side() {
        let mut answers = Answers::new();
        answers.insert("income", "abc");
        answers.insert("age", "40");

        for op in [
            ConditionOperator::Gt,
            ConditionOperator::Gte,
            ConditionOperator::Lt,
            ConditionOperator::Lte,
        ] {
            assert!(!evaluate_condition(&cond("income", op, "10"), &answers));
            assert!(!evaluate_condition(&cond("age", op, "forty"), &answers));
        }
    }

    #[test]
    fn test_includes() {
        let mut answers = Answers::new();
        answers.insert("notes", "Lives with grandparents");
        answers.insert("programs", vec!["medicaid-expansion", "chip"]);

        assert!(evaluate_condition(&cond("notes", ConditionOperator::Includes, "grand"), &answers));
        assert!(!evaluate_condition(&cond("notes", ConditionOperator::Includes, "Grand"), &answers));
        assert!(evaluate_condition(&cond("programs", ConditionOperator::Includes, "expansion"), &answers));
        assert!(!evaluate_condition(&cond("programs", ConditionOperator::Includes, "tanf"), &answers));
    }

    #[test]
    fn test_compute_visibility_and_aggregation() {
        let questions = vec![
            QuestionConfig::new("state"),
            QuestionConfig::new("county").with_conditions(vec![cond("state", ConditionOperator::Equals, "CA")]),
            QuestionConfig::new("senior_program").with_conditions(vec![
                cond("state", ConditionOperator::Equals, "CA"),
                cond("age", ConditionOperator::Gte, "65"),
            ]),
            QuestionConfig::new("empty").with_conditions(vec![]),
        ];

        let answers: Answers = [("state", "CA"), ("age", "60")].into_iter().collect();
        let visibility = compute_visibility(&questions, &answers);

        assert_eq!(visibility.len(), 4);
        assert!(visibility["state"]);
        assert!(visibility["county"]);
        assert!(!visibility["senior_program"]);
        assert!(visibility["empty"]);
    }

    #[test]
    fn test_scenario_state_equals() {
        let questions =
            vec![QuestionConfig::new("q").with_conditions(vec![cond("state", ConditionOperator::Equals, "CA")])];

        let ca: Answers = [("state", "CA")].into_iter().collect();
        let ny: Answers = [("state", "NY")].into_iter().collect();
        assert!(compute_visibility(&questions, &ca)["q"]);
        assert!(!compute_visibility(&questions, &ny)["q"]);
        assert!(!compute_visibility(&questions, &Answers::new())["q"]);
    }

    #[test]
    fn test_hidden_answer_is_retained() {
        let questions = vec![
            QuestionConfig::new("A"),
            QuestionConfig::new("B").with_conditions(vec![cond("A", ConditionOperator::Equals, "yes")]),
            QuestionConfig::new("C").with_conditions(vec![cond("B", ConditionOperator::Equals, "yes")]),
        ];
        let answers: Answers = [("A", "no"), ("B", "yes")].into_iter().collect();
        let before = answers.clone();

        let visibility = compute_visibility(&questions, &answers);

        assert!(!visibility["B"]);
        // C reads B's stored answer, not B's visibility
        assert!(visibility["C"]);
        assert_eq!(answers, before);
    }
}
