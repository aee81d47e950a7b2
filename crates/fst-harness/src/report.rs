//! End-of-run report.
//!
//! Records are sorted by description so the report does not depend on the
//! execution order. Each line is the description padded with dots to
//! [`DESCRIPTION_WIDTH`] columns followed by the outcome.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::listener::TestRecord;
use crate::runner::RunSummary;
use crate::Result;

pub const DESCRIPTION_WIDTH: usize = 60;

/// `TC001 Create a file.....................................Success`
pub fn format_line(record: &TestRecord) -> String {
    format!(
        "{:.<width$}{}",
        record.description,
        record.outcome,
        width = DESCRIPTION_WIDTH
    )
}

/// Records in report order (stable for equal descriptions).
pub fn sorted(records: &[TestRecord]) -> Vec<&TestRecord> {
    let mut sorted: Vec<&TestRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.description.cmp(&b.description));
    sorted
}

pub fn report_lines(records: &[TestRecord]) -> Vec<String> {
    sorted(records).into_iter().map(format_line).collect()
}

pub fn summary_line(summary: &RunSummary) -> String {
    format!(
        "Ran {} tests: {} passed, {} failed, {} errored",
        summary.total(),
        summary.passed,
        summary.failed,
        summary.errored
    )
}

/// Emit the sorted report and the tally at INFO, reaching both the log file
/// and the console.
pub fn log_report(records: &[TestRecord], summary: &RunSummary) {
    for line in report_lines(records) {
        info!("{}", line);
    }
    info!("{}", summary_line(summary));
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: JsonSummary,
    results: Vec<&'a TestRecord>,
}

#[derive(Serialize)]
struct JsonSummary {
    passed: usize,
    failed: usize,
    errored: usize,
    total: usize,
}

/// Write the sorted report as JSON to `path` (truncating it).
pub fn write_json_report(path: &Path, records: &[TestRecord], summary: &RunSummary) -> Result<()> {
    let report = JsonReport {
        summary: JsonSummary {
            passed: summary.passed,
            failed: summary.failed,
            errored: summary.errored,
            total: summary.total(),
        },
        results: sorted(records),
    };
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &report)?;
    info!("JSON report written to {}", path.display());
    Ok(())
}
