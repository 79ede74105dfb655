use super::tool_output::ToolOutput;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// VulnerabilityScanner port wrapping the external scanner binary
///
/// # Async Support
/// Scans are long-running child processes; implementations must be
/// `Send + Sync` so internal dependencies can be scanned concurrently.
#[async_trait]
pub trait VulnerabilityScanner: Send + Sync {
    /// Makes sure the scanner can be invoked, installing it if needed
    ///
    /// # Errors
    /// Returns `AuditError::ToolUnavailable` if the scanner is missing and
    /// cannot be installed
    async fn ensure_available(&self) -> Result<()>;

    /// Runs the streaming JSON scan (SBOM + advisories) over `project_dir`
    async fn scan_module_json(&self, project_dir: &Path) -> Result<ToolOutput>;

    /// Runs the human-readable scan over a fetched source tree
    async fn scan_source_text(&self, source_dir: &Path) -> Result<ToolOutput>;
}
