//! # Package Request Aggregate
//!
//! A request to import a software package, from submission through review
//! to repository creation or closure.
//!
//! ## States
//!
//! ```text
//! Reviewing ──approve (threshold)──▶ CreatingRepo ──complete_repo_creation──▶ Closed
//!     │
//!     ├──reject (threshold)──▶ Closed
//!     └──abandon (importer)──▶ Closed
//! ```
//!
//! | Phase        | approve        | reject          | abandon         | comments |
//! |--------------|----------------|-----------------|-----------------|----------|
//! | Reviewing    | vote recorded  | vote recorded   | closes (importer) | yes    |
//! | CreatingRepo | `InvalidState` | `InvalidState`  | `InvalidState`  | yes      |
//! | Closed       | `InvalidState` | `InvalidState`  | `InvalidState`  | no       |
//!
//! ## Guarantees
//!
//! - Every guard runs before any field is touched. A failed operation
//!   leaves the request exactly as it was.
//! - The review result is written only at the moment the phase leaves
//!   `Reviewing` because a vote threshold was reached, so repeated or
//!   late calls can never overwrite it.
//! - `approve`/`reject` return `Ok(true)` only on the call that finalized
//!   the decision. Callers trigger repository creation, events, and
//!   notifications on that signal and nothing else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use softpkg_core::{
    is_same_account, Account, CommentText, PackageName, RequestId, Timestamp, Url,
};

use crate::application::Application;
use crate::comment::ReviewComment;
use crate::phase::{PackagePhase, ReviewResult};
use crate::policy::ReviewPolicy;

/// Reason reported when approval preconditions are not met.
pub const REASON_NOT_READY: &str = "not ready";
/// Reason reported when an operation is attempted outside `Reviewing`.
pub const REASON_CANT_DO_THIS: &str = "can't do this";
/// Reason reported when someone other than the importer abandons.
pub const REASON_NOT_IMPORTER: &str = "not the importer";
/// Reason reported when a comment is attempted on a closed request.
pub const REASON_COMMENTS_CLOSED: &str = "comments are closed";

// ─── Errors ──────────────────────────────────────────────────────────

/// A rejected state transition.
///
/// Neither variant is fatal: the request is unchanged and the same call may
/// succeed later once its preconditions hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request's phase or flags make the operation illegal.
    #[error("request {id} in phase {phase}: {reason}")]
    InvalidState {
        /// The request.
        id: RequestId,
        /// Phase at the time of the call.
        phase: PackagePhase,
        /// Short reason.
        reason: &'static str,
    },

    /// The acting account lacks the required relationship to the request.
    #[error("account {account} on request {id}: {reason}")]
    PermissionDenied {
        /// The request.
        id: RequestId,
        /// The account that attempted the operation.
        account: Account,
        /// Short reason.
        reason: &'static str,
    },
}

impl RequestError {
    /// The short reason string carried by either variant.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidState { reason, .. } | Self::PermissionDenied { reason, .. } => reason,
        }
    }
}

// ─── Package Request ─────────────────────────────────────────────────

/// A software-package import request.
///
/// Fields are private so that phase, review result, and vote lists can only
/// change through the guarded operations below. The type is still plain
/// serde data, so a persistence layer can store and reload it as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequest {
    id: RequestId,
    pkg_name: PackageName,
    importer: Account,
    repo_link: Option<Url>,
    relevant_pr: Option<Url>,
    phase: PackagePhase,
    frozen: bool,
    review_result: ReviewResult,
    applied_at: Timestamp,
    application: Application,
    approved_by: Vec<Account>,
    rejected_by: Vec<Account>,
    comments: Vec<ReviewComment>,
}

impl PackageRequest {
    /// Create a new request, applied now.
    ///
    /// The request starts in `Reviewing`, frozen, with no votes, comments,
    /// PR link, or review result.
    pub fn new(importer: Account, pkg_name: PackageName, application: Application) -> Self {
        Self::new_at(importer, pkg_name, application, Timestamp::now())
    }

    /// Create a new request with an explicit application time.
    pub fn new_at(
        importer: Account,
        pkg_name: PackageName,
        application: Application,
        applied_at: Timestamp,
    ) -> Self {
        Self {
            id: RequestId::new(),
            pkg_name,
            importer,
            repo_link: None,
            relevant_pr: None,
            phase: PackagePhase::Reviewing,
            frozen: true,
            review_result: ReviewResult::Unset,
            applied_at,
            application,
            approved_by: Vec::new(),
            rejected_by: Vec::new(),
            comments: Vec::new(),
        }
    }

    // ── Review decisions ─────────────────────────────────────────────

    /// Record an approval under the default [`ReviewPolicy`].
    ///
    /// Returns `Ok(true)` only on the call that reached the approval
    /// threshold and moved the request to `CreatingRepo`.
    ///
    /// # Errors
    ///
    /// [`RequestError::InvalidState`] ("not ready") if the request is not
    /// reviewing, is frozen, or has no relevant PR, checked in that order.
    pub fn approve(&mut self, account: &Account) -> Result<bool, RequestError> {
        self.approve_under(&ReviewPolicy::default(), account)
    }

    /// Record an approval under an explicit policy.
    pub fn approve_under(
        &mut self,
        policy: &ReviewPolicy,
        account: &Account,
    ) -> Result<bool, RequestError> {
        if !self.phase.is_reviewing() || self.frozen || self.relevant_pr.is_none() {
            return Err(self.invalid_state(REASON_NOT_READY));
        }

        if !record_vote(&mut self.approved_by, account, policy.require_distinct_voters) {
            return Ok(false);
        }

        if self.approved_by.len() == policy.approvals_required {
            self.finalize(ReviewResult::Approved, PackagePhase::CreatingRepo);
            return Ok(true);
        }
        Ok(false)
    }

    /// Record a rejection under the default [`ReviewPolicy`].
    ///
    /// Returns `Ok(true)` only on the call that reached the rejection
    /// threshold and closed the request.
    ///
    /// # Errors
    ///
    /// [`RequestError::InvalidState`] ("can't do this") if the request is
    /// not reviewing.
    pub fn reject(&mut self, account: &Account) -> Result<bool, RequestError> {
        self.reject_under(&ReviewPolicy::default(), account)
    }

    /// Record a rejection under an explicit policy.
    pub fn reject_under(
        &mut self,
        policy: &ReviewPolicy,
        account: &Account,
    ) -> Result<bool, RequestError> {
        if !self.phase.is_reviewing() {
            return Err(self.invalid_state(REASON_CANT_DO_THIS));
        }

        if !record_vote(&mut self.rejected_by, account, policy.require_distinct_voters) {
            return Ok(false);
        }

        if self.rejected_by.len() == policy.rejections_required {
            self.finalize(ReviewResult::Rejected, PackagePhase::Closed);
            return Ok(true);
        }
        Ok(false)
    }

    /// Withdraw the request. Only the importer may do this, and only while
    /// reviewing. The review result stays `Unset`.
    ///
    /// # Errors
    ///
    /// [`RequestError::InvalidState`] if not reviewing, then
    /// [`RequestError::PermissionDenied`] if `account` is not the importer.
    pub fn abandon(&mut self, account: &Account) -> Result<(), RequestError> {
        if !self.phase.is_reviewing() {
            return Err(self.invalid_state(REASON_CANT_DO_THIS));
        }
        if !is_same_account(account, &self.importer) {
            return Err(RequestError::PermissionDenied {
                id: self.id,
                account: account.clone(),
                reason: REASON_NOT_IMPORTER,
            });
        }
        self.move_to(PackagePhase::Closed);
        Ok(())
    }

    // ── Comments ─────────────────────────────────────────────────────

    /// Whether the request still accepts review comments.
    ///
    /// Discussion stays open while the repository is being created.
    pub fn can_add_comment(&self) -> bool {
        self.phase.is_reviewing() || self.phase.is_creating_repo()
    }

    /// Append a comment stamped with the current time.
    ///
    /// Not gated by [`can_add_comment`](Self::can_add_comment); the caller
    /// checks that first.
    pub fn add_comment(&mut self, author: Account, content: CommentText) -> ReviewComment {
        self.add_comment_at(author, content, Timestamp::now())
    }

    /// Append a comment with an explicit creation time.
    pub fn add_comment_at(
        &mut self,
        author: Account,
        content: CommentText,
        created_at: Timestamp,
    ) -> ReviewComment {
        let comment = ReviewComment::new(author, content, created_at);
        self.comments.push(comment.clone());
        comment
    }

    // ── External prerequisites ───────────────────────────────────────

    /// Record the pull request that must exist before approval can finalize.
    /// Replaces any earlier link.
    pub fn attach_relevant_pr(&mut self, pr: Url) -> Result<(), RequestError> {
        if !self.phase.is_reviewing() {
            return Err(self.invalid_state(REASON_CANT_DO_THIS));
        }
        self.relevant_pr = Some(pr);
        Ok(())
    }

    /// Lift the administrative hold.
    pub fn unfreeze(&mut self) -> Result<(), RequestError> {
        if !self.phase.is_reviewing() {
            return Err(self.invalid_state(REASON_CANT_DO_THIS));
        }
        self.frozen = false;
        Ok(())
    }

    /// Place the request under an administrative hold.
    pub fn freeze(&mut self) -> Result<(), RequestError> {
        if !self.phase.is_reviewing() {
            return Err(self.invalid_state(REASON_CANT_DO_THIS));
        }
        self.frozen = true;
        Ok(())
    }

    /// Record the created repository and close the request
    /// (CREATING_REPO → CLOSED). The approved result is kept.
    pub fn complete_repo_creation(&mut self, repo_link: Url) -> Result<(), RequestError> {
        if !self.phase.is_creating_repo() {
            return Err(self.invalid_state(REASON_CANT_DO_THIS));
        }
        self.repo_link = Some(repo_link);
        self.move_to(PackagePhase::Closed);
        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Request identifier.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Package being imported.
    pub fn pkg_name(&self) -> &PackageName {
        &self.pkg_name
    }

    /// Account that submitted the request.
    pub fn importer(&self) -> &Account {
        &self.importer
    }

    /// Whether `account` is the importer.
    pub fn is_importer(&self, account: &Account) -> bool {
        is_same_account(account, &self.importer)
    }

    /// Created repository, once repository creation has completed.
    pub fn repo_link(&self) -> Option<&Url> {
        self.repo_link.as_ref()
    }

    /// Pull request gating approval.
    pub fn relevant_pr(&self) -> Option<&Url> {
        self.relevant_pr.as_ref()
    }

    /// Current phase.
    pub fn phase(&self) -> PackagePhase {
        self.phase
    }

    /// Whether approval is on hold.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Review decision, if any.
    pub fn review_result(&self) -> ReviewResult {
        self.review_result
    }

    /// When the request was submitted.
    pub fn applied_at(&self) -> Timestamp {
        self.applied_at
    }

    /// Submitted application.
    pub fn application(&self) -> &Application {
        &self.application
    }

    /// Approving accounts, in vote order.
    pub fn approved_by(&self) -> &[Account] {
        &self.approved_by
    }

    /// Rejecting accounts, in vote order.
    pub fn rejected_by(&self) -> &[Account] {
        &self.rejected_by
    }

    /// Comments, in the order they were added.
    pub fn comments(&self) -> &[ReviewComment] {
        &self.comments
    }

    /// Whether the request is closed.
    pub fn is_terminal(&self) -> bool {
        self.phase.is_closed()
    }

    fn finalize(&mut self, result: ReviewResult, phase: PackagePhase) {
        self.review_result = result;
        self.move_to(phase);
    }

    /// The single place the phase changes. Callers have already checked
    /// their guards, so the move must be one the transition table allows.
    fn move_to(&mut self, to: PackagePhase) {
        debug_assert!(
            self.phase.can_transition_to(to),
            "illegal phase transition {} -> {to}",
            self.phase
        );
        self.phase = to;
    }

    fn invalid_state(&self, reason: &'static str) -> RequestError {
        RequestError::InvalidState {
            id: self.id,
            phase: self.phase,
            reason,
        }
    }
}

/// Append `account` to `votes`. With `distinct` set, a repeat voter is
/// ignored and `false` is returned.
fn record_vote(votes: &mut Vec<Account>, account: &Account, distinct: bool) -> bool {
    if distinct && votes.iter().any(|v| is_same_account(v, account)) {
        return false;
    }
    votes.push(account.clone());
    true
}

// ─── Tests ───────────────────────────────────────────────────────────
