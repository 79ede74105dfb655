use crate::shared::Result;
use std::path::Path;

/// ProjectManifestReader port for the project's go.mod
pub trait ProjectManifestReader {
    /// Reads the module path declared in `<project_path>/go.mod`
    ///
    /// # Errors
    /// Returns `AuditError::ManifestNotFound` if go.mod does not exist, or
    /// an error if it cannot be read or declares no module
    fn read_module_path(&self, project_path: &Path) -> Result<String>;
}
