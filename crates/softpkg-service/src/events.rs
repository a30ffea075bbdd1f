//! # Side-Effect Collaborators
//!
//! Domain events and importer notifications are obligations the aggregate
//! signals through its return values. This module defines the narrow
//! interfaces the service calls to discharge them, plus in-memory
//! implementations for tests and local runs.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use softpkg_core::{Account, PackageName, PackagePlatform, RequestId, Timestamp, Url};

/// A collaborator failed to accept a side effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{collaborator} failed: {message}")]
pub struct SideEffectError {
    /// Which collaborator failed (`publisher`, `notifier`).
    pub collaborator: &'static str,
    /// What went wrong.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Domain events
// ---------------------------------------------------------------------------

/// Something that happened to a package request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// The review reached its approval threshold. Consumers create the
    /// package repository in response.
    Approved {
        request_id: RequestId,
        pkg_name: PackageName,
        importer: Account,
        platform: PackagePlatform,
        at: Timestamp,
    },
    /// The review reached its rejection threshold.
    Rejected {
        request_id: RequestId,
        pkg_name: PackageName,
        importer: Account,
        at: Timestamp,
    },
    /// The importer withdrew the request.
    Abandoned {
        request_id: RequestId,
        pkg_name: PackageName,
        at: Timestamp,
    },
    /// The package repository was created and the request closed.
    RepoCreated {
        request_id: RequestId,
        pkg_name: PackageName,
        repo_link: Url,
        at: Timestamp,
    },
}

impl DomainEvent {
    /// The request the event concerns.
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Approved { request_id, .. }
            | Self::Rejected { request_id, .. }
            | Self::Abandoned { request_id, .. }
            | Self::RepoCreated { request_id, .. } => *request_id,
        }
    }

    /// Short event name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Approved { .. } => "approved",
            Self::Rejected { .. } => "rejected",
            Self::Abandoned { .. } => "abandoned",
            Self::RepoCreated { .. } => "repo_created",
        }
    }
}

/// Delivers domain events to the rest of the system.
pub trait EventPublisher: Send + Sync {
    /// Publish one event.
    fn publish(&self, event: &DomainEvent) -> Result<(), SideEffectError>;
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Why the importer is being notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The request was approved.
    Approved,
    /// The request was rejected.
    Rejected,
}

/// A message to a single account about a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Who receives it.
    pub recipient: Account,
    /// Which request it is about.
    pub request_id: RequestId,
    /// Package name, for the message subject.
    pub pkg_name: PackageName,
    /// What happened.
    pub kind: NotificationKind,
}

/// Delivers notifications to accounts.
pub trait Notifier: Send + Sync {
    /// Send one notification.
    fn notify(&self, notification: &Notification) -> Result<(), SideEffectError>;
}

// ---------------------------------------------------------------------------
// In-memory implementations
// ---------------------------------------------------------------------------

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: &DomainEvent) -> Result<(), SideEffectError> {
        Ok(())
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), SideEffectError> {
        Ok(())
    }
}

/// Keeps every published event in memory, in publication order.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingPublisher {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events published so far.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().clone()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: &DomainEvent) -> Result<(), SideEffectError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Keeps every notification in memory, in send order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notifications sent so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), SideEffectError> {
        self.sent.lock().push(notification.clone());
        Ok(())
    }
}
