//! Parsed expression cache

use crate::answer::Answers;
use crate::error::Result;
use crate::rule::ast::Expr;
use crate::rule::parser;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Entries kept before the cache is flushed
pub const MAX_CACHED_EXPRESSIONS: usize = 4096;

/// Global expression cache keyed by exact source text
static EXPRESSION_CACHE: Lazy<RwLock<AHashMap<String, Arc<Expr>>>> = Lazy::new(|| {
    let map = AHashMap::with_capacity(256);
    RwLock::new(map)
});

/// Get or parse an expression, caching successful parses only
#[inline]
pub fn compile(expression: &str) -> Result<Arc<Expr>> {
    {
        let cache = EXPRESSION_CACHE.read();
        if let Some(ast) = cache.get(expression) {
            return Ok(Arc::clone(ast));
        }
    }

    tracing::debug!(expression, "parsing rule expression");
    let ast = Arc::new(parser::parse(expression)?);

    {
        let mut cache = EXPRESSION_CACHE.write();
        if cache.len() >= MAX_CACHED_EXPRESSIONS {
            tracing::warn!(entries = cache.len(), "expression cache full, flushing");
            cache.clear();
        }
        cache.insert(expression.to_string(), Arc::clone(&ast));
    }

    Ok(ast)
}

/// Parse and evaluate a rule expression against the answers
#[inline]
pub fn evaluate_rule_expression(expression: &str, answers: &Answers) -> Result<bool> {
    let ast = compile(expression)?;
    Ok(ast.evaluate(answers))
}

/// Every question id a rule expression reads
pub fn get_referenced_question_ids(expression: &str) -> Result<BTreeSet<String>> {
    Ok(compile(expression)?.referenced_ids())
}

/// Clear the expression cache
pub fn clear_cache() {
    let mut cache = EXPRESSION_CACHE.write();
    cache.clear();
}

/// Number of cached expressions
pub fn cache_size() -> usize {
    let cache = EXPRESSION_CACHE.read();
    cache.len()
}

/// Whether an expression is currently cached
pub fn is_cached(expression: &str) -> bool {
    EXPRESSION_CACHE.read().contains_key(expression)
}
