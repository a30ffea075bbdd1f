//! # Review Flow Integration Tests
//!
//! End-to-end flows through [`ReviewService`] with recording collaborators,
//! including concurrent voting on a single request.

use std::sync::Arc;
use std::thread;

use softpkg_core::{
    Account, CommentText, FixedClock, ImportingPkgSig, License, PackageDesc, PackageName,
    PackagePlatform, ReasonToImportPkg, RequestId, Timestamp, Url,
};
use softpkg_service::{
    DomainEvent, NotificationKind, RecordingNotifier, RecordingPublisher, RequestStore,
    ReviewService, ServiceConfig, ServiceError,
};
use softpkg_state::{Application, PackagePhase, ReviewResult, SourceCode};

fn account(name: &str) -> Account {
    Account::new(name).unwrap()
}

fn application(platform: PackagePlatform) -> Application {
    Application {
        source_code: SourceCode {
            address: Url::new("https://github.com/openssl/openssl").unwrap(),
            license: License::new("Apache-2.0").unwrap(),
        },
        package_desc: PackageDesc::new("TLS and crypto toolkit").unwrap(),
        package_platform: platform,
        importing_pkg_sig: ImportingPkgSig::new("sig-security").unwrap(),
        reason_to_import_pkg: ReasonToImportPkg::new("Required by curl").unwrap(),
    }
}

struct Fixture {
    service: Arc<ReviewService>,
    publisher: Arc<RecordingPublisher>,
    notifier: Arc<RecordingNotifier>,
}

fn fixture(config: ServiceConfig) -> Fixture {
    let publisher = Arc::new(RecordingPublisher::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let service = ReviewService::new(config)
        .unwrap()
        .with_publisher(publisher.clone())
        .with_notifier(notifier.clone())
        .with_clock(Arc::new(FixedClock(
            Timestamp::parse("2026-03-15T08:30:00Z").unwrap(),
        )));
    Fixture {
        service: Arc::new(service),
        publisher,
        notifier,
    }
}

fn submit_ready(service: &ReviewService, name: &str) -> RequestId {
    let id = service
        .submit(
            account("importer"),
            PackageName::new(name).unwrap(),
            application(PackagePlatform::Github),
        )
        .unwrap()
        .id();
    service.unfreeze(id).unwrap();
    service
        .attach_relevant_pr(id, Url::new("https://gitee.com/openeuler/community/pulls/1").unwrap())
        .unwrap();
    id
}

#[test]
fn approval_flow_through_repo_creation() {
    let f = fixture(ServiceConfig::default());
    let id = submit_ready(&f.service, "openssl");

    f.service
        .add_comment(id, account("alice"), CommentText::new("license is fine").unwrap())
        .unwrap();
    assert!(!f.service.approve(id, &account("alice")).unwrap());
    assert!(f.service.approve(id, &account("bob")).unwrap());

    // Discussion continues while the repository is created.
    f.service
        .add_comment(id, account("importer"), CommentText::new("thanks").unwrap())
        .unwrap();

    f.service
        .complete_repo_creation(id, Url::new("https://gitee.com/src-openeuler/openssl").unwrap())
        .unwrap();

    let done = f.service.get(id).unwrap();
    assert_eq!(done.phase(), PackagePhase::Closed);
    assert_eq!(done.review_result(), ReviewResult::Approved);
    assert_eq!(done.comments().len(), 2);
    assert_eq!(
        done.repo_link().map(|u| u.as_str()),
        Some("https://gitee.com/src-openeuler/openssl")
    );

    let kinds: Vec<&str> = f.publisher.events().iter().map(DomainEvent::kind).collect();
    assert_eq!(kinds, vec!["approved", "repo_created"]);
    assert_eq!(f.notifier.sent().len(), 1);
}

#[test]
fn rejection_flow_closes_and_blocks_further_votes() {
    let f = fixture(ServiceConfig::default());
    let id = submit_ready(&f.service, "openssl");

    assert!(!f.service.approve(id, &account("alice")).unwrap());
    assert!(f.service.reject(id, &account("carol")).unwrap());

    let err = f.service.approve(id, &account("bob")).unwrap_err();
    assert!(matches!(err, ServiceError::Request(_)));
    assert!(f.service.reject(id, &account("dave")).is_err());

    let closed = f.service.get(id).unwrap();
    assert_eq!(closed.review_result(), ReviewResult::Rejected);
    assert_eq!(closed.approved_by(), &[account("alice")]);
    assert_eq!(closed.rejected_by(), &[account("carol")]);

    let sent = f.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Rejected);
}

#[test]
fn concurrent_approvals_finalize_exactly_once() {
    let f = fixture(ServiceConfig::default());
    let id = submit_ready(&f.service, "openssl");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&f.service);
            thread::spawn(move || service.approve(id, &account(&format!("reviewer{i}"))))
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let signals = outcomes.iter().filter(|r| matches!(r, Ok(true))).count();
    let failures = outcomes.iter().filter(|r| r.is_err()).count();

    assert_eq!(signals, 1);
    assert_eq!(failures, 6);
    assert_eq!(f.service.get(id).unwrap().approved_by().len(), 2);
    assert_eq!(f.publisher.events().len(), 1);
}

#[test]
fn concurrent_submissions_of_one_name_admit_one() {
    let f = fixture(ServiceConfig::default());

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let service = Arc::clone(&f.service);
            thread::spawn(move || {
                service.submit(
                    account("importer"),
                    PackageName::new("zstd").unwrap(),
                    application(PackagePlatform::Gitee),
                )
            })
        })
        .collect();

    let admitted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(Result::is_ok)
        .count();
    assert_eq!(admitted, 1);
    assert_eq!(f.service.list().len(), 1);
}

#[test]
fn shared_store_is_visible_across_services() {
    let store = RequestStore::new();
    let writer = ReviewService::new(ServiceConfig::default())
        .unwrap()
        .with_store(store.clone());
    let reader = ReviewService::new(ServiceConfig::default())
        .unwrap()
        .with_store(store);

    let id = submit_ready(&writer, "openssl");
    assert_eq!(reader.get(id).unwrap().pkg_name().as_str(), "openssl");
    assert_eq!(reader.list_in_phase(PackagePhase::Reviewing).len(), 1);
}

#[test]
fn stricter_policy_from_yaml() {
    let config = ServiceConfig::from_yaml_str(
        "review_policy:\n  approvals_required: 3\nnotify_importer: false\n",
    )
    .unwrap();
    let f = fixture(config);
    let id = submit_ready(&f.service, "openssl");

    assert!(!f.service.approve(id, &account("a")).unwrap());
    assert!(!f.service.approve(id, &account("b")).unwrap());
    assert!(f.service.approve(id, &account("c")).unwrap());
    assert!(f.notifier.sent().is_empty());
    assert_eq!(f.service.get(id).unwrap().phase(), PackagePhase::CreatingRepo);
}
