//! Filesystem semantics test runner.
//!
//! Runs the battery against folders created under a base directory and
//! writes the sorted report to `log.txt` and the console.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fs_semantics_tests::{all_groups, nfs4_acl};
use fst_harness::{init_logging, report, HarnessConfig, ResultCollector, Runner};
use fst_probes::is_privileged;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "fs_semantics_runner")]
#[command(author, version, about = "Filesystem semantics test runner", long_about = None)]
struct Args {
    /// Directory in which test folders are created [default: current directory]
    base_dir: Option<PathBuf>,

    /// Write DEBUG records to the log file
    #[arg(long)]
    debug: bool,

    /// Show DEBUG records on the console
    #[arg(short, long)]
    verbose: bool,

    /// Log file, truncated at startup [default: ./log.txt]
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Configuration file (JSON); command-line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the report as JSON
    #[arg(long)]
    json_report: Option<PathBuf>,

    /// Run only this group (repeatable)
    #[arg(long = "group", value_name = "NAME")]
    groups: Vec<String>,

    /// Include the NFSv4 ACL group
    #[arg(long)]
    nfs4_acl: bool,

    /// List test groups and cases, then exit
    #[arg(long)]
    list: bool,
}

impl Args {
    fn into_config(self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => HarnessConfig::default(),
        };

        if let Some(base_dir) = self.base_dir {
            config.base_dir = base_dir;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        if self.json_report.is_some() {
            config.json_report = self.json_report;
        }
        if !self.groups.is_empty() {
            config.groups = self.groups;
        }
        config.debug |= self.debug;
        config.verbose |= self.verbose;
        if self.nfs4_acl && !config.include.iter().any(|name| name == nfs4_acl::GROUP) {
            config.include.push(nfs4_acl::GROUP.to_string());
        }
        Ok(config)
    }
}

fn list_groups() {
    for group in all_groups() {
        let note = if group.default { "" } else { " (opt-in)" };
        println!("{} - {}{}", group.name, group.description, note);
        for case in &group.cases {
            println!("    {}", case.description);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.list {
        list_groups();
        return Ok(());
    }

    let config = args.into_config()?;
    config.validate()?;
    init_logging(&config).context("Failed to set up logging")?;

    info!(
        "Starting filesystem semantics tests in {}",
        config.base_dir.display()
    );
    if is_privileged() {
        warn!("Running as root: permission bits do not restrict root, permission tests will fail");
    }

    let groups = config.select_groups(all_groups())?;
    let mut collector = ResultCollector::new();
    let summary = Runner::new(&config.base_dir).run(&groups, &mut collector);

    report::log_report(collector.records(), &summary);
    if let Some(path) = &config.json_report {
        report::write_json_report(path, collector.records(), &summary)
            .with_context(|| format!("Failed to write JSON report {}", path.display()))?;
    }

    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = Args::try_parse_from(["fs_semantics_runner"])
            .unwrap()
            .into_config()
            .unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config.base_dir, cwd);
        assert_eq!(config.log_file, cwd.join("log.txt"));
        assert!(!config.debug);
        assert!(config.groups.is_empty());
        assert!(config.include.is_empty());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "fs_semantics_runner",
            "/tmp",
            "--debug",
            "--group",
            "file_operations",
            "--group",
            "nfs4_acl",
            "--nfs4-acl",
            "--json-report",
            "report.json",
        ])
        .unwrap();
        let config = args.into_config().unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/tmp"));
        assert!(config.debug);
        assert!(!config.verbose);
        assert_eq!(config.groups, ["file_operations", "nfs4_acl"]);
        assert_eq!(config.include, [nfs4_acl::GROUP]);
        assert_eq!(config.json_report, Some(PathBuf::from("report.json")));
    }
}
