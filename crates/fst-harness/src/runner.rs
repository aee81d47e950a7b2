//! Sequential test runner.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::case::{CaseError, CaseResult, TestCase, TestContext, TestGroup};
use crate::folder::TestFolder;
use crate::listener::TestListener;

/// Final tally of a run
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub passed: usize,
    /// Assertion mismatches.
    pub failed: usize,
    /// Unexpected errors and panics.
    pub errored: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    fn record(&mut self, result: &CaseResult) {
        match result {
            Ok(()) => self.passed += 1,
            Err(e) if e.is_assertion() => self.failed += 1,
            Err(_) => self.errored += 1,
        }
    }
}

/// Runs test groups one after another, each in its own folder under `base_dir`.
#[derive(Clone, Debug)]
pub struct Runner {
    base_dir: PathBuf,
}

impl Runner {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Run every case of every group in order. A failing test never stops the run.
    pub fn run(&self, groups: &[TestGroup], listener: &mut dyn TestListener) -> RunSummary {
        let mut summary = RunSummary::default();
        for group in groups {
            self.run_group(group, listener, &mut summary);
        }
        summary
    }

    fn run_group(
        &self,
        group: &TestGroup,
        listener: &mut dyn TestListener,
        summary: &mut RunSummary,
    ) {
        debug!("Starting test group: {}", group.description);
        listener.on_group_start(group);

        let folder = match TestFolder::create(&self.base_dir) {
            Ok(folder) => folder,
            Err(e) => {
                error!("Setup of test group {} failed: {}", group.name, e);
                for case in &group.cases {
                    listener.on_test_start(case);
                    let result: CaseResult =
                        Err(anyhow::anyhow!("group setup failed: {}", e).into());
                    report(listener, case, &result);
                    summary.record(&result);
                }
                listener.on_group_end(group);
                return;
            }
        };

        let ctx = TestContext::new(folder.path());
        for case in &group.cases {
            debug!("Starting test: {}", case.description);
            listener.on_test_start(case);
            let result = run_case(case, &ctx);
            report(listener, case, &result);
            summary.record(&result);
        }

        if let Err(e) = folder.remove() {
            error!("Teardown of test group {} failed: {}", group.name, e);
        }
        listener.on_group_end(group);
    }
}

fn report(listener: &mut dyn TestListener, case: &TestCase, result: &CaseResult) {
    match result {
        Ok(()) => listener.on_success(case),
        Err(e) => listener.on_failure(case, e),
    }
}

fn run_case(case: &TestCase, ctx: &TestContext) -> CaseResult {
    match panic::catch_unwind(AssertUnwindSafe(|| (case.procedure)(ctx))) {
        Ok(result) => result,
        Err(payload) => Err(CaseError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
