//! Test cases, test groups and the error a test can end with.

use std::fmt::{self, Debug};
use std::io;
use std::path::{Path, PathBuf};

use fst_probes::{ProbeDir, ProbeError};
use thiserror::Error;

/// Result of running one test procedure.
pub type CaseResult = Result<(), CaseError>;

/// A test procedure: arrange, act and assert against the group folder.
pub type Procedure = fn(&TestContext) -> CaseResult;

/// Why a test did not succeed
#[derive(Error, Debug)]
pub enum CaseError {
    /// An assertion about filesystem behavior did not hold.
    #[error("{0}")]
    Assertion(String),

    /// A step failed in a way the test did not expect.
    #[error("unexpected error: {0:#}")]
    Unexpected(#[from] anyhow::Error),

    /// The procedure panicked.
    #[error("test panicked: {0}")]
    Panicked(String),
}

impl CaseError {
    pub fn assertion<S: Into<String>>(message: S) -> Self {
        Self::Assertion(message.into())
    }

    /// Assertion mismatches count as failures, everything else as errors.
    pub fn is_assertion(&self) -> bool {
        matches!(self, CaseError::Assertion(_))
    }
}

impl From<ProbeError> for CaseError {
    fn from(e: ProbeError) -> Self {
        Self::Unexpected(e.into())
    }
}

/// One scenario of the battery.
#[derive(Clone, Copy)]
pub struct TestCase {
    /// Function-style name, e.g. `test_create_file`.
    pub name: &'static str,
    /// Short description used as the report identifier, e.g. `TC001 Create a file`.
    pub description: &'static str,
    pub procedure: Procedure,
}

impl TestCase {
    pub const fn new(name: &'static str, description: &'static str, procedure: Procedure) -> Self {
        Self {
            name,
            description,
            procedure,
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Related test cases sharing one folder and one setup/teardown lifecycle.
#[derive(Clone, Debug)]
pub struct TestGroup {
    pub name: &'static str,
    pub description: &'static str,
    /// Whether the group runs when no groups were selected explicitly.
    pub default: bool,
    pub cases: Vec<TestCase>,
}

impl TestGroup {
    pub fn new(name: &'static str, description: &'static str, cases: Vec<TestCase>) -> Self {
        Self {
            name,
            description,
            default: true,
            cases,
        }
    }

    /// Only run the group when it is selected by name or flag.
    pub fn opt_in(mut self) -> Self {
        self.default = false;
        self
    }
}

/// What a running test gets to work with.
#[derive(Debug)]
pub struct TestContext {
    folder: PathBuf,
}

impl TestContext {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// The group's folder.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Probe operations rooted at the group's folder.
    pub fn probe_dir(&self) -> ProbeDir {
        ProbeDir::new(&self.folder)
    }
}

/// Fail the test with an assertion error unless `$cond` holds.
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !$cond {
            return Err($crate::CaseError::assertion(concat!(
                "check failed: ",
                stringify!($cond)
            )));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::CaseError::assertion(format!($($arg)+)));
        }
    };
}

/// Fail the test with an assertion error unless both sides are equal.
#[macro_export]
macro_rules! check_eq {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left, right) => {
                if *left != *right {
                    return Err($crate::CaseError::assertion(format!(
                        "{:?} != {:?}",
                        left, right
                    )));
                }
            }
        }
    };
}

/// Require `result` to be an OS error of `kind`.
pub fn expect_io_error<T: Debug>(
    result: Result<T, ProbeError>,
    kind: io::ErrorKind,
    step: &str,
) -> CaseResult {
    match result {
        Err(e) if e.io_kind() == Some(kind) => Ok(()),
        Err(e) => Err(CaseError::assertion(format!(
            "{}: expected {:?}, got: {}",
            step, kind, e
        ))),
        Ok(value) => Err(CaseError::assertion(format!(
            "{}: expected {:?}, but it succeeded ({:?})",
            step, kind, value
        ))),
    }
}

/// Require `result` to fail with `PermissionDenied`.
pub fn expect_denied<T: Debug>(result: Result<T, ProbeError>, step: &str) -> CaseResult {
    expect_io_error(result, io::ErrorKind::PermissionDenied, step)
}
