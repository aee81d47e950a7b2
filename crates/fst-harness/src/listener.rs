//! Outcome notifications and the result collector.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::case::{CaseError, TestCase, TestGroup};

/// Outcome recorded for a test
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("Success"),
            Outcome::Failed => f.write_str("Failed"),
        }
    }
}

/// One (test, outcome) pair. Never changed once recorded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestRecord {
    pub description: String,
    pub name: String,
    pub group: String,
    pub outcome: Outcome,
    /// Failure detail; `None` on success.
    pub detail: Option<String>,
}

/// Receives test lifecycle events from the runner.
///
/// Every executed test produces exactly one `on_success` or `on_failure`.
pub trait TestListener {
    fn on_group_start(&mut self, _group: &TestGroup) {}

    fn on_test_start(&mut self, _test: &TestCase) {}

    fn on_success(&mut self, test: &TestCase);

    fn on_failure(&mut self, test: &TestCase, error: &CaseError);

    fn on_group_end(&mut self, _group: &TestGroup) {}
}

/// Accumulates a [`TestRecord`] per test, in execution order.
#[derive(Debug, Default)]
pub struct ResultCollector {
    group: String,
    records: Vec<TestRecord>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    fn push(&mut self, test: &TestCase, outcome: Outcome, detail: Option<String>) {
        self.records.push(TestRecord {
            description: test.description.to_string(),
            name: test.name.to_string(),
            group: self.group.clone(),
            outcome,
            detail,
        });
    }
}

impl TestListener for ResultCollector {
    fn on_group_start(&mut self, group: &TestGroup) {
        self.group = group.name.to_string();
    }

    fn on_success(&mut self, test: &TestCase) {
        self.push(test, Outcome::Success, None);
        debug!("Test passed\n");
    }

    fn on_failure(&mut self, test: &TestCase, error: &CaseError) {
        let detail = error.to_string();
        error!("{}\n{}", test.description, detail);
        self.push(test, Outcome::Failed, Some(detail));
        debug!("Test failed\n");
    }
}
