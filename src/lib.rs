//! govuln - Vulnerability audit for Go modules
//!
//! Runs the Go vulnerability scanner over a module, then fetches and scans
//! the source of internally owned dependencies at their exact resolved
//! versions. Per-version scan results are cached on disk so unchanged
//! versions are not scanned again until their result goes stale.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`audit`): Models, parsers, aggregation and staleness policy
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Cache store, child processes, console and formatters
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use govuln::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn audit() -> Result<()> {
//! let runner = CommandRunner::default();
//! let use_case = AuditProjectUseCase::new(
//!     GoModReader::new(),
//!     GovulncheckScanner::new("govulncheck", runner.clone()),
//!     GitSourceFetcher::new(runner),
//!     FileSystemCacheStore::new(FileSystemCacheStore::default_root()),
//!     StderrProgressReporter::new(),
//! );
//!
//! let now = chrono::Local::now().naive_local();
//! let request = AuditRequest::new(PathBuf::from("."), now)
//!     .with_internal_owners(vec!["acme".to_string()]);
//! let report = use_case.execute(request).await?;
//!
//! println!("{}", TableFormatter::new(false).format(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod audit;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemCacheStore, FileSystemWriter, GoModReader, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{
        JsonFormatter, MarkdownFormatter, TableFormatter,
    };
    pub use crate::adapters::outbound::process::{
        CommandRunner, GitSourceFetcher, GovulncheckScanner,
    };
    pub use crate::application::dto::{AuditReport, AuditRequest, OutputFormat};
    pub use crate::application::use_cases::{AuditProjectUseCase, ManageStoreUseCase};
    pub use crate::audit::domain::{
        AggregatedPackageStatus, CacheKey, CacheRecord, CacheStatus, CachedVulnerability,
        Dependency, Finding, InternalScanOutcome, InternalScanResult, VersionKey,
    };
    pub use crate::audit::policies::StalenessPolicy;
    pub use crate::audit::services::{
        OwnershipFilter, ReportAggregator, ScanReportParser, ScanStreamParser,
    };
    pub use crate::ports::outbound::{
        CacheStore, OutputPresenter, ProgressReporter, ProjectManifestReader, ReportFormatter,
        SourceFetcher, VulnerabilityScanner,
    };
    pub use crate::shared::Result;
}
