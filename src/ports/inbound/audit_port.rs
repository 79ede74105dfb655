use crate::application::dto::{AuditReport, AuditRequest, StoreReport, StoreRequest};
use crate::shared::Result;
use async_trait::async_trait;

/// AuditPort - Inbound port for the audit use case
///
/// This port defines the interface that external adapters (the CLI) use to
/// run an audit of a Go module.
#[async_trait(?Send)]
pub trait AuditPort {
    /// Audits the project described by `request`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The project has no go.mod
    /// - The scanner is unavailable and cannot be installed
    /// - The primary scan fails or reports no SBOM
    ///
    /// Failures of individual internal dependencies are reported in the
    /// returned [`AuditReport`] instead.
    async fn audit(&self, request: AuditRequest) -> Result<AuditReport>;
}

/// StoreMaintenancePort - Inbound port for inspecting and clearing the cache
pub trait StoreMaintenancePort {
    /// # Errors
    /// Returns an error if the store root cannot be read or removed
    fn maintain(&self, request: StoreRequest) -> Result<StoreReport>;
}
