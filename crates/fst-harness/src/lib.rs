//! Sequential test harness for filesystem semantics checks.
//!
//! Test cases are grouped; each group gets a fresh folder under the base
//! directory. The [`Runner`] executes every case, reports each outcome to a
//! [`TestListener`], and the [`ResultCollector`] keeps the records that end
//! up in the sorted report.

pub mod case;
pub mod config;
pub mod error;
pub mod folder;
pub mod listener;
pub mod logging;
pub mod report;
pub mod runner;

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

pub use case::{
    expect_denied, expect_io_error, CaseError, CaseResult, Procedure, TestCase, TestContext,
    TestGroup,
};
pub use config::HarnessConfig;
pub use error::Error;
pub use folder::TestFolder;
pub use listener::{Outcome, ResultCollector, TestListener, TestRecord};
pub use logging::init_logging;
pub use runner::{RunSummary, Runner};
