//! # softpkg-service: Package Import Review Service
//!
//! Sits between a caller that has already resolved the acting account and
//! the [`PackageRequest`](softpkg_state::PackageRequest) aggregate. For each
//! operation it loads the request, applies one guarded mutation, stores the
//! result, and then performs the side effects the aggregate signalled:
//!
//! - second approval → publish [`DomainEvent::Approved`] (the trigger for
//!   repository creation) and notify the importer;
//! - first rejection → publish [`DomainEvent::Rejected`] and notify the importer;
//! - abandonment → publish [`DomainEvent::Abandoned`].
//!
//! ## Concurrency
//!
//! Every mutation runs as load-validate-mutate-store under the store's
//! write lock, so two concurrent approvals of one request can never both
//! observe a single prior vote. Side effects run after the lock is
//! released and only when the mutation returned a finalization signal.
//!
//! ## Crate Policy
//!
//! - No business rules here; transition guards live in `softpkg-state`.
//! - Collaborator failures are logged and never roll back stored state.

pub mod config;
pub mod error;
pub mod events;
pub mod service;
pub mod store;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use events::{
    DomainEvent, EventPublisher, NoopNotifier, NoopPublisher, Notification, NotificationKind,
    Notifier, RecordingNotifier, RecordingPublisher, SideEffectError,
};
pub use service::ReviewService;
pub use store::RequestStore;
