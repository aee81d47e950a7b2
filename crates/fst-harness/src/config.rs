//! Harness configuration.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::case::TestGroup;
use crate::error::Error;
use crate::Result;

pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// Settings for one harness run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory under which per-group test folders are created
    pub base_dir: PathBuf,
    /// Write DEBUG records to the log file
    pub debug: bool,
    /// Write DEBUG records to the console
    pub verbose: bool,
    /// Log file, truncated at startup
    pub log_file: PathBuf,
    /// Optional JSON copy of the report
    pub json_report: Option<PathBuf>,
    /// Run only these groups (empty: the default selection)
    pub groups: Vec<String>,
    /// Opt-in groups added to the default selection
    pub include: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            log_file: cwd.join(DEFAULT_LOG_FILE),
            base_dir: cwd,
            debug: false,
            verbose: false,
            json_report: None,
            groups: Vec::new(),
            include: Vec::new(),
        }
    }
}

impl HarnessConfig {
    /// Load a configuration from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_dir.is_dir() {
            return Err(Error::config(format!(
                "base directory {} does not exist or is not a directory",
                self.base_dir.display()
            )));
        }
        Ok(())
    }

    /// Pick the groups to run from `available`, keeping their order.
    pub fn select_groups(&self, available: Vec<TestGroup>) -> Result<Vec<TestGroup>> {
        for name in self.groups.iter().chain(&self.include) {
            if !available.iter().any(|group| name == group.name) {
                let known: Vec<&str> = available.iter().map(|group| group.name).collect();
                return Err(Error::config(format!(
                    "unknown test group `{}` (known: {})",
                    name,
                    known.join(", ")
                )));
            }
        }

        let wanted = |group: &TestGroup| {
            if self.groups.is_empty() {
                group.default || self.include.iter().any(|name| name == group.name)
            } else {
                self.groups.iter().any(|name| name == group.name)
            }
        };
        Ok(available.into_iter().filter(|group| wanted(group)).collect())
    }
}
