//! Answer snapshot keyed by question id

use crate::answer::AnswerValue;
use crate::error::Result;
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only snapshot of the answers given so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(HashMap<String, AnswerValue, RandomState>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity_and_hasher(
            capacity,
            RandomState::default(),
        ))
    }

    /// Parse a JSON object such as `{"state": "CA", "age": 70}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Option<AnswerValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Raw lookup; `Some(Null)` for an explicit null
    #[inline]
    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    /// Lookup that folds absent, null and empty-string answers into `None`
    #[inline]
    pub fn present(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key).filter(|value| !value.is_blank())
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Answers
where
    K: Into<String>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut answers = Answers::with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            answers.insert(key, value);
        }
        answers
    }
}
