//! # Review Service
//!
//! Orchestrates one mutation per call on a stored [`PackageRequest`] and
//! discharges the side effects the aggregate signals.
//!
//! ## Operation Shape
//!
//! 1. **Load, guard, mutate, store**: inside [`RequestStore::try_update`],
//!    so no other mutation of the same request can interleave.
//! 2. **Log**: the outcome, with request id and package name.
//! 3. **Side effects**: only for a `true` finalization signal or a
//!    successful close; failures are logged at `warn` and swallowed.

use std::sync::Arc;

use softpkg_core::{Account, Clock, CommentText, PackageName, RequestId, SystemClock, Url};
use softpkg_state::{
    Application, PackagePhase, PackageRequest, RequestError, ReviewComment,
    REASON_COMMENTS_CLOSED,
};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::events::{
    DomainEvent, EventPublisher, NoopNotifier, NoopPublisher, Notification, NotificationKind,
    Notifier,
};
use crate::store::RequestStore;

/// Application service for package import review.
pub struct ReviewService {
    store: RequestStore,
    publisher: Arc<dyn EventPublisher>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl std::fmt::Debug for ReviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewService")
            .field("requests", &self.store.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReviewService {
    /// Create a service with an empty store, the system clock, and no-op
    /// collaborators.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Config`] if the review policy has a zero threshold.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        Ok(Self {
            store: RequestStore::new(),
            publisher: Arc::new(NoopPublisher),
            notifier: Arc::new(NoopNotifier),
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// Use `store` for persistence.
    pub fn with_store(mut self, store: RequestStore) -> Self {
        self.store = store;
        self
    }

    /// Publish domain events through `publisher`.
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Send importer notifications through `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Take creation times from `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Load a request.
    pub fn get(&self, id: RequestId) -> Result<PackageRequest, ServiceError> {
        self.store.get(&id).ok_or(ServiceError::NotFound(id))
    }

    /// All requests, oldest first.
    pub fn list(&self) -> Vec<PackageRequest> {
        self.store.list()
    }

    /// Requests in `phase`, oldest first.
    pub fn list_in_phase(&self, phase: PackagePhase) -> Vec<PackageRequest> {
        self.store.list_in_phase(phase)
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Submit a new import request.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Conflict`] if a request for the same package is
    /// still open.
    pub fn submit(
        &self,
        importer: Account,
        pkg_name: PackageName,
        application: Application,
    ) -> Result<PackageRequest, ServiceError> {
        let request = PackageRequest::new_at(importer, pkg_name, application, self.clock.now());
        self.store
            .insert_if_no_open(request.clone())
            .map_err(|existing| {
                ServiceError::Conflict(format!(
                    "package {} already has an open request {existing}",
                    request.pkg_name()
                ))
            })?;
        tracing::info!(
            request_id = %request.id(),
            pkg = %request.pkg_name(),
            importer = %request.importer(),
            "package request submitted"
        );
        Ok(request)
    }

    // ── Review decisions ─────────────────────────────────────────────

    /// Record an approval. Returns `true` when this vote approved the request.
    pub fn approve(&self, id: RequestId, account: &Account) -> Result<bool, ServiceError> {
        let policy = self.config.review_policy;
        let (approved, request) = self.mutate(id, |req| {
            let approved = req.approve_under(&policy, account)?;
            Ok((approved, req.clone()))
        })?;

        if !approved {
            tracing::debug!(
                request_id = %id,
                voter = %account,
                votes = request.approved_by().len(),
                "approval recorded"
            );
            return Ok(false);
        }

        tracing::info!(request_id = %id, pkg = %request.pkg_name(), "package request approved");
        self.publish(DomainEvent::Approved {
            request_id: id,
            pkg_name: request.pkg_name().clone(),
            importer: request.importer().clone(),
            platform: request.application().package_platform,
            at: self.clock.now(),
        });
        self.notify_importer(&request, NotificationKind::Approved);
        Ok(true)
    }

    /// Record a rejection. Returns `true` when this vote rejected the request.
    pub fn reject(&self, id: RequestId, account: &Account) -> Result<bool, ServiceError> {
        let policy = self.config.review_policy;
        let (rejected, request) = self.mutate(id, |req| {
            let rejected = req.reject_under(&policy, account)?;
            Ok((rejected, req.clone()))
        })?;

        if !rejected {
            tracing::debug!(request_id = %id, voter = %account, "rejection recorded");
            return Ok(false);
        }

        tracing::info!(
            request_id = %id,
            pkg = %request.pkg_name(),
            rejected_by = %account,
            "package request rejected"
        );
        self.publish(DomainEvent::Rejected {
            request_id: id,
            pkg_name: request.pkg_name().clone(),
            importer: request.importer().clone(),
            at: self.clock.now(),
        });
        self.notify_importer(&request, NotificationKind::Rejected);
        Ok(true)
    }

    /// Withdraw a request on behalf of its importer.
    pub fn abandon(&self, id: RequestId, account: &Account) -> Result<(), ServiceError> {
        let pkg_name = self.mutate(id, |req| {
            req.abandon(account)?;
            Ok(req.pkg_name().clone())
        })?;

        tracing::info!(request_id = %id, pkg = %pkg_name, "package request abandoned");
        self.publish(DomainEvent::Abandoned {
            request_id: id,
            pkg_name,
            at: self.clock.now(),
        });
        Ok(())
    }

    // ── Comments ─────────────────────────────────────────────────────

    /// Add a review comment, if the request still accepts them.
    ///
    /// # Errors
    ///
    /// [`RequestError::InvalidState`] once the request is closed.
    pub fn add_comment(
        &self,
        id: RequestId,
        author: Account,
        content: CommentText,
    ) -> Result<ReviewComment, ServiceError> {
        let now = self.clock.now();
        let comment = self.mutate(id, |req| {
            if !req.can_add_comment() {
                return Err(RequestError::InvalidState {
                    id: req.id(),
                    phase: req.phase(),
                    reason: REASON_COMMENTS_CLOSED,
                });
            }
            Ok(req.add_comment_at(author, content, now))
        })?;
        tracing::debug!(request_id = %id, comment_id = %comment.id, "review comment added");
        Ok(comment)
    }

    // ── External prerequisites ───────────────────────────────────────

    /// Record the pull request that approval depends on.
    pub fn attach_relevant_pr(&self, id: RequestId, pr: Url) -> Result<(), ServiceError> {
        let link = pr.to_string();
        self.mutate(id, |req| req.attach_relevant_pr(pr))?;
        tracing::info!(request_id = %id, pr = %link, "relevant PR attached");
        Ok(())
    }

    /// Lift the administrative hold on a request.
    pub fn unfreeze(&self, id: RequestId) -> Result<(), ServiceError> {
        self.mutate(id, PackageRequest::unfreeze)?;
        tracing::info!(request_id = %id, "package request unfrozen");
        Ok(())
    }

    /// Put a request back under administrative hold.
    pub fn freeze(&self, id: RequestId) -> Result<(), ServiceError> {
        self.mutate(id, PackageRequest::freeze)?;
        tracing::info!(request_id = %id, "package request frozen");
        Ok(())
    }

    /// Record the created repository and close the request.
    pub fn complete_repo_creation(&self, id: RequestId, repo_link: Url) -> Result<(), ServiceError> {
        let (pkg_name, repo_link) = self.mutate(id, |req| {
            req.complete_repo_creation(repo_link.clone())?;
            Ok((req.pkg_name().clone(), repo_link))
        })?;

        tracing::info!(request_id = %id, pkg = %pkg_name, repo = %repo_link, "repository created");
        self.publish(DomainEvent::RepoCreated {
            request_id: id,
            pkg_name,
            repo_link,
            at: self.clock.now(),
        });
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Run one guarded mutation under the store lock.
    fn mutate<R>(
        &self,
        id: RequestId,
        f: impl FnOnce(&mut PackageRequest) -> Result<R, RequestError>,
    ) -> Result<R, ServiceError> {
        let result = self.store.try_update(&id, f).ok_or(ServiceError::NotFound(id))?;
        result.map_err(|e| {
            tracing::debug!(request_id = %id, error = %e, "transition rejected");
            ServiceError::from(e)
        })
    }

    fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.publisher.publish(&event) {
            tracing::warn!(
                request_id = %event.request_id(),
                event = event.kind(),
                error = %e,
                "domain event not published"
            );
        }
    }

    fn notify_importer(&self, request: &PackageRequest, kind: NotificationKind) {
        if !self.config.notify_importer {
            return;
        }
        let notification = Notification {
            recipient: request.importer().clone(),
            request_id: request.id(),
            pkg_name: request.pkg_name().clone(),
            kind,
        };
        if let Err(e) = self.notifier.notify(&notification) {
            tracing::warn!(
                request_id = %request.id(),
                recipient = %notification.recipient,
                error = %e,
                "importer notification not sent"
            );
        }
    }
}
