//! Explanation traces
//!
//! A `StepLog` is the ordered list of human-readable lines an operation
//! emits while it works. Each call builds its own log and hands it back with
//! the result; logs are never shared or merged between calls.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepLog {
    steps: Vec<String>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log holding exactly one line
    pub fn single(step: impl Into<String>) -> Self {
        Self::new().with(step)
    }

    /// Builder: append a line
    pub fn with(mut self, step: impl Into<String>) -> Self {
        self.push(step);
        self
    }

    pub fn push(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.steps.iter()
    }

    pub fn last(&self) -> Option<&str> {
        self.steps.last().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.steps
    }
}

impl From<Vec<String>> for StepLog {
    fn from(steps: Vec<String>) -> Self {
        Self { steps }
    }
}

impl<'a> IntoIterator for &'a StepLog {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl std::fmt::Display for StepLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", i + 1, step)?;
        }
        Ok(())
    }
}
