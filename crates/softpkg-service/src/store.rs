//! # Request Store
//!
//! In-memory persistence for package requests. Stands in for the row store
//! of a real deployment and provides the same guarantee a row lock or
//! transaction would: a mutation's load, guard checks, and write happen as
//! one step that no other mutation can interleave with.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use softpkg_core::{PackageName, RequestId};
use softpkg_state::{PackagePhase, PackageRequest};

/// Thread-safe, cloneable request store.
///
/// All operations are synchronous. The lock is never held across a call
/// into a collaborator, only across the aggregate's own pure methods.
#[derive(Debug, Clone, Default)]
pub struct RequestStore {
    data: Arc<RwLock<HashMap<RequestId, PackageRequest>>>,
}

impl RequestStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `request` unless a non-closed request for the same package
    /// already exists, in which case that request's id is returned.
    pub fn insert_if_no_open(&self, request: PackageRequest) -> Result<(), RequestId> {
        let mut guard = self.data.write();
        if let Some(existing) = find_open(&guard, request.pkg_name()) {
            return Err(existing);
        }
        guard.insert(request.id(), request);
        Ok(())
    }

    /// Retrieve a request by id.
    pub fn get(&self, id: &RequestId) -> Option<PackageRequest> {
        self.data.read().get(id).cloned()
    }

    /// All requests, oldest submission first.
    pub fn list(&self) -> Vec<PackageRequest> {
        let mut all: Vec<_> = self.data.read().values().cloned().collect();
        all.sort_by_key(|r| r.applied_at());
        all
    }

    /// Requests currently in `phase`, oldest submission first.
    pub fn list_in_phase(&self, phase: PackagePhase) -> Vec<PackageRequest> {
        let mut matching: Vec<_> = self
            .data
            .read()
            .values()
            .filter(|r| r.phase() == phase)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.applied_at());
        matching
    }

    /// Atomically read-validate-update a request.
    ///
    /// The closure may inspect the request, check preconditions, mutate it,
    /// and return `Ok(R)` or `Err(E)`. The whole closure runs under one write
    /// lock. The aggregate leaves itself untouched when it returns `Err`, so
    /// no rollback is needed here.
    ///
    /// Returns `None` if the request doesn't exist.
    pub fn try_update<R, E>(
        &self,
        id: &RequestId,
        f: impl FnOnce(&mut PackageRequest) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Number of stored requests.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn find_open(data: &HashMap<RequestId, PackageRequest>, name: &PackageName) -> Option<RequestId> {
    data.values()
        .find(|r| r.pkg_name() == name && !r.is_terminal())
        .map(PackageRequest::id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use softpkg_core::{
        Account, ImportingPkgSig, License, PackageDesc, PackagePlatform, ReasonToImportPkg,
        Timestamp, Url,
    };
    use softpkg_state::{Application, SourceCode};

    fn application() -> Application {
        Application {
            source_code: SourceCode {
                address: Url::new("https://github.com/tukaani-project/xz").unwrap(),
                license: License::new("0BSD").unwrap(),
            },
            package_desc: PackageDesc::new("LZMA compression utilities").unwrap(),
            package_platform: PackagePlatform::Gitee,
            importing_pkg_sig: ImportingPkgSig::new("sig-base").unwrap(),
            reason_to_import_pkg: ReasonToImportPkg::new("Kernel build dependency").unwrap(),
        }
    }

    fn request_at(name: &str, at: &str) -> PackageRequest {
        PackageRequest::new_at(
            Account::new("importer").unwrap(),
            PackageName::new(name).unwrap(),
            application(),
            Timestamp::parse(at).unwrap(),
        )
    }

    fn importer() -> Account {
        Account::new("importer").unwrap()
    }

    // ── Insertion ────────────────────────────────────────────────────

    #[test]
    fn test_new_store_is_empty() {
        let store = RequestStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_open_request_blocks_same_name() {
        let store = RequestStore::new();
        let first = request_at("xz", "2026-01-01T00:00:00Z");
        let first_id = first.id();
        store.insert_if_no_open(first).unwrap();

        let second = request_at("xz", "2026-01-02T00:00:00Z");
        assert_eq!(store.insert_if_no_open(second), Err(first_id));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_other_names_not_blocked() {
        let store = RequestStore::new();
        store
            .insert_if_no_open(request_at("xz", "2026-01-01T00:00:00Z"))
            .unwrap();
        store
            .insert_if_no_open(request_at("zstd", "2026-01-01T00:00:00Z"))
            .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_closed_request_allows_resubmission() {
        let store = RequestStore::new();
        let first = request_at("xz", "2026-01-01T00:00:00Z");
        let first_id = first.id();
        store.insert_if_no_open(first).unwrap();
        store
            .try_update(&first_id, |req| req.abandon(&importer()))
            .unwrap()
            .unwrap();

        let second = request_at("xz", "2026-01-02T00:00:00Z");
        let second_id = second.id();
        store.insert_if_no_open(second).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get(&second_id).is_some());
    }

    // ── Listing ──────────────────────────────────────────────────────

    #[test]
    fn test_list_is_ordered_by_application_time() {
        let store = RequestStore::new();
        for (name, at) in [
            ("zstd", "2026-03-01T00:00:00Z"),
            ("xz", "2026-01-01T00:00:00Z"),
            ("lz4", "2026-02-01T00:00:00Z"),
        ] {
            store.insert_if_no_open(request_at(name, at)).unwrap();
        }
        let names: Vec<String> = store
            .list()
            .iter()
            .map(|r| r.pkg_name().to_string())
            .collect();
        assert_eq!(names, vec!["xz", "lz4", "zstd"]);
    }

    #[test]
    fn test_list_in_phase_filters_and_orders() {
        let store = RequestStore::new();
        let late = request_at("zstd", "2026-03-01T00:00:00Z");
        let early = request_at("xz", "2026-01-01T00:00:00Z");
        let closed = request_at("lz4", "2026-02-01T00:00:00Z");
        let closed_id = closed.id();
        for req in [late, early, closed] {
            store.insert_if_no_open(req).unwrap();
        }
        store
            .try_update(&closed_id, |req| req.abandon(&importer()))
            .unwrap()
            .unwrap();

        let reviewing: Vec<String> = store
            .list_in_phase(PackagePhase::Reviewing)
            .iter()
            .map(|r| r.pkg_name().to_string())
            .collect();
        assert_eq!(reviewing, vec!["xz", "zstd"]);

        let closed = store.list_in_phase(PackagePhase::Closed);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id(), closed_id);
        assert!(store.list_in_phase(PackagePhase::CreatingRepo).is_empty());
    }

    // ── Updates ──────────────────────────────────────────────────────

    #[test]
    fn test_try_update_unknown_id() {
        let store = RequestStore::new();
        let result = store.try_update(&RequestId::new(), |req| req.unfreeze());
        assert!(result.is_none());
    }

    #[test]
    fn test_try_update_persists_mutation() {
        let store = RequestStore::new();
        let req = request_at("xz", "2026-01-01T00:00:00Z");
        let id = req.id();
        store.insert_if_no_open(req).unwrap();
        store.try_update(&id, |req| req.unfreeze()).unwrap().unwrap();
        assert!(!store.get(&id).unwrap().is_frozen());
    }

    #[test]
    fn test_clones_share_state() {
        let store = RequestStore::new();
        let other = store.clone();
        store
            .insert_if_no_open(request_at("xz", "2026-01-01T00:00:00Z"))
            .unwrap();
        assert_eq!(other.len(), 1);
    }
}
