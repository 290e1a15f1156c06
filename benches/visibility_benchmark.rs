//! Benchmark for visibility resolution
//!
//! Target: resolving a 50-question form should stay well under 1ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eligibility_rules_core::answer::Answers;
use eligibility_rules_core::condition::{compute_visibility, Condition, ConditionOperator};
use eligibility_rules_core::config::{QuestionConfig, QuestionnaireConfig, RuleConfig};
use eligibility_rules_core::questionnaire::Questionnaire;

const RULES: [&str; 5] = [
    "age >= 65",
    "age >= 65 AND income < 25000",
    "state == 'CA' OR state == 'NY'",
    "NOT (lang IN ['en', 'es']) AND household > 3",
    "(disabled == TRUE OR age >= 65) AND state NOT IN ['TX', 'FL']",
];

/// Create a realistic questionnaire definition
fn create_test_config() -> QuestionnaireConfig {
    let operators = [
        ConditionOperator::Equals,
        ConditionOperator::Gte,
        ConditionOperator::Lt,
        ConditionOperator::Includes,
    ];

    // Add 50 questions, at most two conditions each
    let questions = (0..50)
        .map(|i| {
            let mut question = QuestionConfig::new(format!("q{}", i));
            if i % 2 == 0 {
                let mut conditions = vec![Condition::new("age", operators[i % 4], (i * 2).to_string())];
                if i % 4 == 0 {
                    conditions.push(Condition::new("state", ConditionOperator::Equals, "CA"));
                }
                question = question.with_conditions(conditions);
            }
            if i % 3 == 0 {
                question = question.with_rule(format!("r{}", i % RULES.len()));
            }
            question
        })
        .collect();

    let rules = RULES
        .iter()
        .enumerate()
        .map(|(i, expr)| RuleConfig::new(format!("r{}", i), *expr))
        .collect();

    QuestionnaireConfig {
        state_code: Some("CA".to_string()),
        questions,
        rules,
    }
}

fn create_answers() -> Answers {
    let mut answers = Answers::new();
    answers.insert("age", 70);
    answers.insert("income", "18000");
    answers.insert("state", "CA");
    answers.insert("lang", "fr");
    answers.insert("household", 4);
    answers.insert("disabled", false);
    answers
}

fn benchmark_conditions(c: &mut Criterion) {
    let config = create_test_config();
    let answers = create_answers();

    c.bench_function("compute_visibility_50", |b| {
        b.iter(|| black_box(compute_visibility(black_box(&config.questions), black_box(&answers))))
    });
}

fn benchmark_rule_expressions(c: &mut Criterion) {
    use eligibility_rules_core::rule::{evaluate_rule_expression, parse};

    let answers = create_answers();

    c.bench_function("rule_parsing_uncached", |b| {
        b.iter(|| {
            for expr in &RULES {
                let _ = black_box(parse(black_box(expr)));
            }
        })
    });

    c.bench_function("rule_evaluation_cached", |b| {
        // Warm up cache
        for expr in &RULES {
            let _ = evaluate_rule_expression(expr, &answers);
        }

        b.iter(|| {
            for expr in &RULES {
                let _ = black_box(evaluate_rule_expression(black_box(expr), &answers));
            }
        })
    });
}

fn benchmark_questionnaire(c: &mut Criterion) {
    let questionnaire = match Questionnaire::new(create_test_config()) {
        Ok(questionnaire) => questionnaire,
        Err(err) => panic!("benchmark questionnaire failed to compile: {}", err),
    };
    let answers = create_answers();

    c.bench_function("questionnaire_resolve_50", |b| {
        b.iter(|| black_box(questionnaire.resolve(black_box(&answers))))
    });
}

criterion_group!(benches, benchmark_conditions, benchmark_rule_expressions, benchmark_questionnaire);
criterion_main!(benches);
