use std::collections::HashSet;
use std::fs;

use fs_semantics_tests::{all_groups, file_attributes, file_operations, nfs4_acl};
use fst_harness::report::report_lines;
use fst_harness::{HarnessConfig, Outcome, ResultCollector, Runner};
use fst_probes::{is_privileged, Nfs4AclTool};
use tempfile::TempDir;

#[test]
fn test_registry_descriptions_are_unique() {
    let groups = all_groups();
    let names: Vec<&str> = groups.iter().map(|group| group.name).collect();
    assert_eq!(
        names,
        [file_operations::GROUP, file_attributes::GROUP, nfs4_acl::GROUP]
    );

    let descriptions: Vec<&str> = groups
        .iter()
        .flat_map(|group| group.cases.iter().map(|case| case.description))
        .collect();
    assert_eq!(descriptions.len(), 11);
    assert!(descriptions.iter().all(|d| d.starts_with("TC")));
    let unique: HashSet<&str> = descriptions.iter().copied().collect();
    assert_eq!(unique.len(), descriptions.len());
}

#[test]
fn test_default_battery_passes_and_cleans_up() {
    let base = TempDir::new().unwrap();
    let config = HarnessConfig {
        base_dir: base.path().to_path_buf(),
        ..HarnessConfig::default()
    };
    let groups = config.select_groups(all_groups()).unwrap();
    assert_eq!(groups.len(), 2);

    let mut collector = ResultCollector::new();
    let summary = Runner::new(base.path()).run(&groups, &mut collector);
    assert_eq!(summary.total(), 9);
    assert_eq!(summary.errored, 0);

    let records = collector.records();
    for record in records.iter().filter(|r| r.group == file_operations::GROUP) {
        assert_eq!(record.outcome, Outcome::Success, "{:?}", record);
    }
    let executable = records
        .iter()
        .find(|r| r.name == "test_set_executable_bit")
        .unwrap();
    assert_eq!(executable.outcome, Outcome::Success, "{:?}", executable);

    if is_privileged() {
        eprintln!("Running as root, permission denial checks are not asserted");
    } else {
        assert!(summary.is_success(), "{:?}", records);
    }

    // Group folders are gone once their group finished.
    assert_eq!(fs::read_dir(base.path()).unwrap().count(), 0);

    let lines = report_lines(records);
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert!(lines[0].starts_with("TC001 Create a file."));
}

#[test]
fn test_acl_group_without_tools_is_errored() {
    if Nfs4AclTool::new().is_available() {
        eprintln!("nfs4-acl-tools installed, skipping test");
        return;
    }

    let base = TempDir::new().unwrap();
    let mut collector = ResultCollector::new();
    let summary = Runner::new(base.path()).run(&[nfs4_acl::group()], &mut collector);
    assert_eq!(summary.errored, 2);
    for record in collector.records() {
        assert_eq!(record.outcome, Outcome::Failed);
        let detail = record.detail.as_deref().unwrap();
        assert!(detail.contains("nfs4_setfacl is not installed"), "{}", detail);
    }
    assert_eq!(fs::read_dir(base.path()).unwrap().count(), 0);
}
