//! # Replay Subcommand
//!
//! Runs a scripted review against an in-memory service. A scenario names
//! the importer, the package, and the application, followed by the steps
//! to apply in order:
//!
//! ```yaml
//! importer: alice
//! package: libuv
//! application:
//!   source_code:
//!     address: https://github.com/libuv/libuv
//!     license: MIT
//!   package_desc: Cross-platform async I/O
//!   package_platform: gitee
//!   importing_pkg_sig: sig-runtime
//!   reason_to_import_pkg: Needed by nodejs
//! steps:
//!   - op: unfreeze
//!   - op: attach_pr
//!     url: https://gitee.com/openeuler/community/pulls/1
//!   - op: approve
//!     account: bob
//! ```
//!
//! A failing step is recorded and the replay moves on, so a scenario can
//! show which operations the lifecycle refuses.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};

use softpkg_core::{Account, CommentText, PackageName, RequestId, Url};
use softpkg_service::config::CONFIG_ENV_VAR;
use softpkg_service::{
    DomainEvent, Notification, RecordingNotifier, RecordingPublisher, ReviewService,
    ServiceConfig, ServiceError,
};
use softpkg_state::{Application, PackageRequest};

/// Arguments for the replay subcommand.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Scenario file (YAML).
    pub scenario: PathBuf,

    /// Service configuration file (YAML). Defaults apply when absent.
    #[arg(long, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,
}

/// A scripted review.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Account submitting the request.
    pub importer: Account,
    /// Package to import.
    pub package: PackageName,
    /// Submitted application.
    pub application: Application,
    /// Operations applied after submission, in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One operation in a scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Approve as `account`.
    Approve { account: Account },
    /// Reject as `account`.
    Reject { account: Account },
    /// Abandon as `account`.
    Abandon { account: Account },
    /// Comment as `account`.
    Comment { account: Account, text: CommentText },
    /// Attach the relevant pull request.
    AttachPr { url: Url },
    /// Lift the administrative hold.
    Unfreeze,
    /// Restore the administrative hold.
    Freeze,
    /// Record the created repository.
    CompleteRepo { url: Url },
}

impl Step {
    /// Operation name as written in the scenario.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Reject { .. } => "reject",
            Self::Abandon { .. } => "abandon",
            Self::Comment { .. } => "comment",
            Self::AttachPr { .. } => "attach_pr",
            Self::Unfreeze => "unfreeze",
            Self::Freeze => "freeze",
            Self::CompleteRepo { .. } => "complete_repo",
        }
    }
}

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// Zero-based position in the scenario.
    pub index: usize,
    /// Operation name.
    pub op: &'static str,
    /// For votes, whether this step decided the review.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized: Option<bool>,
    /// Error message if the step was refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    /// Whether the step succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Final state of the request.
    pub request: PackageRequest,
    /// Per-step outcomes.
    pub steps: Vec<StepOutcome>,
    /// Events published during the replay.
    pub events: Vec<DomainEvent>,
    /// Notifications sent during the replay.
    pub notifications: Vec<Notification>,
}

/// Read a scenario file.
pub fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("invalid scenario {}", path.display()))
}

/// Submit the scenario's request and apply each step.
pub fn replay(scenario: Scenario, config: ServiceConfig) -> anyhow::Result<ReplayReport> {
    let publisher = Arc::new(RecordingPublisher::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let service = ReviewService::new(config)?
        .with_publisher(publisher.clone())
        .with_notifier(notifier.clone());

    let id = service
        .submit(scenario.importer, scenario.package, scenario.application)
        .context("submission refused")?
        .id();

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.into_iter().enumerate() {
        let op = step.op();
        let outcome = match apply(&service, id, step) {
            Ok(finalized) => StepOutcome {
                index,
                op,
                finalized,
                error: None,
            },
            Err(e) => {
                tracing::warn!(step = index, op, error = %e, "step refused");
                StepOutcome {
                    index,
                    op,
                    finalized: None,
                    error: Some(e.to_string()),
                }
            }
        };
        steps.push(outcome);
    }

    Ok(ReplayReport {
        request: service.get(id)?,
        steps,
        events: publisher.events(),
        notifications: notifier.sent(),
    })
}

fn apply(
    service: &ReviewService,
    id: RequestId,
    step: Step,
) -> Result<Option<bool>, ServiceError> {
    match step {
        Step::Approve { account } => service.approve(id, &account).map(Some),
        Step::Reject { account } => service.reject(id, &account).map(Some),
        Step::Abandon { account } => service.abandon(id, &account).map(|()| None),
        Step::Comment { account, text } => service.add_comment(id, account, text).map(|_| None),
        Step::AttachPr { url } => service.attach_relevant_pr(id, url).map(|()| None),
        Step::Unfreeze => service.unfreeze(id).map(|()| None),
        Step::Freeze => service.freeze(id).map(|()| None),
        Step::CompleteRepo { url } => service.complete_repo_creation(id, url).map(|()| None),
    }
}

/// Handler: load config and scenario, replay, and print the report as JSON.
pub fn run(args: &ReplayArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    let scenario = load_scenario(&args.scenario)?;
    let report = replay(scenario, config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use softpkg_state::{PackagePhase, ReviewResult};

    const SCENARIO: &str = r#"
importer: alice
package: libuv
application:
  source_code:
    address: https://github.com/libuv/libuv
    license: MIT
  package_desc: Cross-platform async I/O
  package_platform: gitee
  importing_pkg_sig: sig-runtime
  reason_to_import_pkg: Needed by nodejs
steps:
  - op: approve
    account: bob
  - op: unfreeze
  - op: attach_pr
    url: https://gitee.com/openeuler/community/pulls/1
  - op: approve
    account: bob
  - op: comment
    account: carol
    text: looks good
  - op: approve
    account: carol
  - op: complete_repo
    url: https://gitee.com/src-openeuler/libuv
"#;

    #[test]
    fn test_replay_approval_scenario() {
        let scenario: Scenario = serde_yaml::from_str(SCENARIO).unwrap();
        let report = replay(scenario, ServiceConfig::default()).unwrap();

        assert!(!report.steps[0].is_ok());
        assert!(report.steps[1..].iter().all(StepOutcome::is_ok));
        assert_eq!(report.steps[3].finalized, Some(false));
        assert_eq!(report.steps[5].finalized, Some(true));

        assert_eq!(report.request.phase(), PackagePhase::Closed);
        assert_eq!(report.request.review_result(), ReviewResult::Approved);
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.notifications.len(), 1);
    }

    #[test]
    fn test_scenario_rejects_invalid_account() {
        let bad = SCENARIO.replace("importer: alice", "importer: \"-alice\"");
        assert!(serde_yaml::from_str::<Scenario>(&bad).is_err());
    }

    #[test]
    fn test_unknown_op_rejected() {
        let bad = format!("{SCENARIO}  - op: merge\n");
        assert!(serde_yaml::from_str::<Scenario>(&bad).is_err());
    }

    #[test]
    fn test_step_op_names_match_tags() {
        let step: Step = serde_yaml::from_str("op: complete_repo\nurl: https://x.org/r\n").unwrap();
        assert_eq!(step.op(), "complete_repo");
        let step: Step = serde_yaml::from_str("op: unfreeze\n").unwrap();
        assert_eq!(step.op(), "unfreeze");
    }
}
