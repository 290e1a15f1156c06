//! VisibilityReport - resolved visibility handed across the Python boundary
//!
//! Holds per-question results in Rust memory so Python can query single
//! keys without converting the whole map.

use pyo3::exceptions::PyKeyError;
use pyo3::prelude::*;
use std::collections::HashMap;

/// Ordered per-question visibility
#[pyclass(module = "eligibility_rules_core")]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityReport {
    entries: Vec<(String, bool)>,
    index: HashMap<String, usize>,
}

impl VisibilityReport {
    pub fn push(&mut self, key: String, visible: bool) {
        match self.index.get(&key) {
            // Duplicate keys keep the last result, first position
            Some(&at) => self.entries[at].1 = visible,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, visible));
            }
        }
    }

    pub fn is_visible(&self, key: &str) -> Option<bool> {
        self.index.get(key).map(|&at| self.entries[at].1)
    }

    pub fn visible_keys(&self) -> Vec<&str> {
        self.keys_where(true)
    }

    pub fn hidden_keys(&self) -> Vec<&str> {
        self.keys_where(false)
    }

    pub fn entries(&self) -> &[(String, bool)] {
        &self.entries
    }

    pub fn to_map(&self) -> HashMap<String, bool> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn keys_where(&self, visible: bool) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| *v == visible)
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

impl FromIterator<(String, bool)> for VisibilityReport {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        let mut report = VisibilityReport::default();
        for (key, visible) in iter {
            report.push(key, visible);
        }
        report
    }
}

#[pymethods]
impl VisibilityReport {
    /// Visibility of one question; KeyError for unknown keys
    #[pyo3(name = "is_visible")]
    fn py_is_visible(&self, key: &str) -> PyResult<bool> {
        self.is_visible(key)
            .ok_or_else(|| PyKeyError::new_err(key.to_string()))
    }

    #[pyo3(name = "visible_keys")]
    fn py_visible_keys(&self) -> Vec<String> {
        self.visible_keys().into_iter().map(str::to_string).collect()
    }

    #[pyo3(name = "hidden_keys")]
    fn py_hidden_keys(&self) -> Vec<String> {
        self.hidden_keys().into_iter().map(str::to_string).collect()
    }

    fn to_dict(&self) -> HashMap<String, bool> {
        self.to_map()
    }

    fn __len__(&self) -> usize {
        self.len()
    }

    fn __contains__(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn __getitem__(&self, key: &str) -> PyResult<bool> {
        self.py_is_visible(key)
    }

    fn __repr__(&self) -> String {
        format!(
            "VisibilityReport(visible={}, hidden={})",
            self.visible_keys().len(),
            self.hidden_keys().len()
        )
    }
}
