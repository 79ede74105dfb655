use crate::audit::domain::{AggregatedPackageStatus, InternalScanResult, ScannerMetadata};
use serde::Serialize;

/// AuditReport - Response DTO of the audit use case
///
/// Carries everything a formatter needs; formatters never reach back into
/// the domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub module_path: String,
    pub scanner: ScannerMetadata,
    /// Toolchain version from the SBOM, also the resolved `stdlib` version
    pub go_version: Option<String>,
    /// Packages whose version in use is below the highest known fix
    pub packages: Vec<AggregatedPackageStatus>,
    /// Per internal dependency, what this run did
    pub internal_dependencies: Vec<InternalScanResult>,
    /// Scanner messages that could not be decoded
    pub dropped_messages: usize,
}

impl AuditReport {
    /// Any affected package blocks the run unless warnings were requested
    pub fn has_blocking_findings(&self) -> bool {
        !self.packages.is_empty()
    }

    pub fn failed_internal_dependencies(&self) -> usize {
        self.internal_dependencies
            .iter()
            .filter(|r| r.outcome.is_failure())
            .count()
    }
}
