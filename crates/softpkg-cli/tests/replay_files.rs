//! # File-Based Replay Tests
//!
//! Exercises scenario and configuration loading from disk.

use std::io::Write;

use softpkg_cli::config_check::{check_config, CheckConfigArgs};
use softpkg_cli::replay::{load_scenario, replay};
use softpkg_service::ServiceConfig;
use softpkg_state::{PackagePhase, ReviewResult};

const REJECTION: &str = r#"
importer: dave
package: left-pad
application:
  source_code:
    address: https://github.com/left-pad/left-pad
    license: WTFPL
  package_desc: Pads strings on the left
  package_platform: github
  importing_pkg_sig: sig-js
  reason_to_import_pkg: Transitive dependency
steps:
  - op: comment
    account: erin
    text: do we really need this?
  - op: reject
    account: erin
  - op: abandon
    account: dave
  - op: comment
    account: erin
    text: closed now
"#;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn rejection_scenario_from_file() {
    let file = write_temp(REJECTION);
    let scenario = load_scenario(file.path()).unwrap();
    let report = replay(scenario, ServiceConfig::default()).unwrap();

    assert_eq!(report.request.phase(), PackagePhase::Closed);
    assert_eq!(report.request.review_result(), ReviewResult::Rejected);
    assert_eq!(report.steps[1].finalized, Some(true));
    assert!(report.steps[2].error.is_some());
    assert!(report.steps[3].error.is_some());
    assert_eq!(report.request.comments().len(), 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["request"]["review_result"], "rejected");
    assert_eq!(json["events"][0]["type"], "rejected");
}

#[test]
fn missing_scenario_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_scenario(&dir.path().join("absent.yaml")).is_err());
}

#[test]
fn check_config_accepts_valid_file() {
    let file = write_temp("review_policy:\n  approvals_required: 3\n");
    let config = check_config(&CheckConfigArgs {
        path: file.path().to_path_buf(),
    })
    .unwrap();
    assert_eq!(config.review_policy.approvals_required, 3);
    assert!(config.notify_importer);
}

#[test]
fn check_config_rejects_zero_threshold() {
    let file = write_temp("review_policy:\n  rejections_required: 0\n");
    let result = check_config(&CheckConfigArgs {
        path: file.path().to_path_buf(),
    });
    assert!(result.is_err());
}
