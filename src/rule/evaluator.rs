//! Rule-expression evaluator

use crate::answer::{parse_decimal, AnswerValue, Answers};
use crate::rule::ast::{Comparison, ComparisonOp, Expr, Literal};

/// Evaluate an AST against an answer snapshot
pub fn check(expr: &Expr, answers: &Answers) -> bool {
    match expr {
        Expr::Or(left, right) => check(left, answers) || check(right, answers),
        Expr::And(left, right) => check(left, answers) && check(right, answers),
        Expr::Not(operand) => !check(operand, answers),
        Expr::Comparison(cmp) => check_comparison(cmp, answers),
    }
}

impl Expr {
    #[inline]
    pub fn evaluate(&self, answers: &Answers) -> bool {
        check(self, answers)
    }
}

/// A missing, null or empty answer fails every operator, `!=` and `NOT IN`
/// included.
fn check_comparison(cmp: &Comparison, answers: &Answers) -> bool {
    let Some(answer) = answers.present(&cmp.question_id) else {
        return false;
    };

    match cmp.operator {
        ComparisonOp::Equals => first_matches(answer, &cmp.values),
        ComparisonOp::NotEquals => !first_matches(answer, &cmp.values),
        ComparisonOp::Greater => compare(answer, &cmp.values, |a, b| a > b),
        ComparisonOp::GreaterOrEqual => compare(answer, &cmp.values, |a, b| a >= b),
        ComparisonOp::Less => compare(answer, &cmp.values, |a, b| a < b),
        ComparisonOp::LessOrEqual => compare(answer, &cmp.values, |a, b| a <= b),
        ComparisonOp::In => cmp.values.iter().any(|lit| matches_literal(answer, lit)),
        ComparisonOp::NotIn => !cmp.values.iter().any(|lit| matches_literal(answer, lit)),
    }
}

#[inline]
fn first_matches(answer: &AnswerValue, values: &[Literal]) -> bool {
    values.first().is_some_and(|lit| matches_literal(answer, lit))
}

#[inline]
fn compare(answer: &AnswerValue, values: &[Literal], op: fn(f64, f64) -> bool) -> bool {
    match (values.first(), answer.as_number()) {
        (Some(Literal::Number(expected)), Some(actual)) => op(actual, *expected),
        _ => false,
    }
}

/// Literal matching shared by `==`, `!=`, `IN` and `NOT IN`
///
/// List answers match when any element does.
pub fn matches_literal(answer: &AnswerValue, literal: &Literal) -> bool {
    match (answer, literal) {
        (AnswerValue::List(items), _) => items.iter().any(|item| matches_text(item, literal)),
        (_, Literal::Number(expected)) => answer.as_number() == Some(*expected),
        (_, Literal::Boolean(expected)) => answer.as_bool() == Some(*expected),
        (_, Literal::String(expected)) => eq_ignore_case(&answer.as_text(), expected),
    }
}

fn matches_text(text: &str, literal: &Literal) -> bool {
    match literal {
        Literal::Number(expected) => parse_decimal(text) == Some(*expected),
        Literal::Boolean(expected) => text.eq_ignore_ascii_case("true") == *expected,
        Literal::String(expected) => eq_ignore_case(text, expected),
    }
}

#[inline]
fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.to_lowercase() == b.to_lowercase()
}
