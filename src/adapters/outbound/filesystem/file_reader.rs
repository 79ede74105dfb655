use crate::ports::outbound::ProjectManifestReader;
use crate::shared::error::AuditError;
use crate::shared::security::{read_regular_file, MAX_MANIFEST_SIZE};
use crate::shared::Result;
use std::path::Path;

const GO_MOD: &str = "go.mod";

/// GoModReader adapter for reading the project's go.mod
///
/// This adapter implements the ProjectManifestReader port. It only needs the
/// `module` directive; requirements are taken from the scanner's SBOM.
pub struct GoModReader;

impl GoModReader {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the module path from go.mod content
    ///
    /// Accepts both `module example.com/app` and the quoted
    /// `module "example.com/app"` form, with or without a trailing comment.
    pub fn parse_module_path(content: &str) -> Option<String> {
        content.lines().find_map(|line| {
            let line = match line.find("//") {
                Some(index) => &line[..index],
                None => line,
            };
            let rest = line.trim().strip_prefix("module")?;
            if !rest.starts_with(char::is_whitespace) && !rest.starts_with('"') {
                return None;
            }
            let path = rest.trim().trim_matches(|c| c == '"' || c == '`');
            (!path.is_empty()).then(|| path.to_string())
        })
    }
}

impl Default for GoModReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectManifestReader for GoModReader {
    fn read_module_path(&self, project_path: &Path) -> Result<String> {
        let go_mod_path = project_path.join(GO_MOD);

        if !go_mod_path.exists() {
            return Err(AuditError::ManifestNotFound {
                path: go_mod_path,
                suggestion: format!(
                    "go.mod file does not exist in project directory \"{}\".\n   \
                     Please run in the root directory of a Go module, or specify the correct path with the --path option.",
                    project_path.display()
                ),
            }
            .into());
        }

        let content = read_regular_file(&go_mod_path, GO_MOD, MAX_MANIFEST_SIZE).map_err(|e| {
            AuditError::FileReadError {
                path: go_mod_path.clone(),
                details: e.to_string(),
            }
        })?;

        Self::parse_module_path(&content).ok_or_else(|| {
            anyhow::anyhow!(
                "{} declares no module path\n\n💡 Hint: Add a `module` directive, e.g. `module example.com/app`",
                go_mod_path.display()
            )
        })
    }
}
