use govuln::prelude::*;
use std::path::Path;

/// Mock ProjectManifestReader returning a fixed module path
pub struct MockManifestReader {
    module_path: String,
}

impl MockManifestReader {
    pub fn new(module_path: &str) -> Self {
        Self {
            module_path: module_path.to_string(),
        }
    }
}

impl ProjectManifestReader for MockManifestReader {
    fn read_module_path(&self, _project_path: &Path) -> Result<String> {
        Ok(self.module_path.clone())
    }
}
