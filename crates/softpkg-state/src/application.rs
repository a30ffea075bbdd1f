//! # Submission Payload
//!
//! The application an importer submits with a request. It is captured
//! whole at creation and never modified afterwards.

use serde::{Deserialize, Serialize};

use softpkg_core::{
    ImportingPkgSig, License, PackageDesc, PackagePlatform, ReasonToImportPkg, Url,
};

/// Where the upstream source lives and under which license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCode {
    /// Upstream source address.
    pub address: Url,
    /// Upstream license.
    pub license: License,
}

/// Snapshot of the import application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Upstream source location and license.
    pub source_code: SourceCode,
    /// What the package does.
    pub package_desc: PackageDesc,
    /// Platform the repository will be created on.
    pub package_platform: PackagePlatform,
    /// SIG that will own the package.
    pub importing_pkg_sig: ImportingPkgSig,
    /// Why the package should be imported.
    pub reason_to_import_pkg: ReasonToImportPkg,
}
