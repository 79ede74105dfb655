use super::dependency::Dependency;
use super::version_key::VersionKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reserved package name of the Go standard library.
pub const STDLIB_PACKAGE: &str = "stdlib";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomModule {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Resolved module inventory reported by the primary scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sbom {
    #[serde(default)]
    pub go_version: Option<String>,
    #[serde(default)]
    pub modules: Vec<SbomModule>,
    #[serde(default)]
    pub roots: Vec<String>,
}

impl Sbom {
    /// The main module is the first entry without a version.
    pub fn main_module(&self) -> Option<&str> {
        self.modules
            .iter()
            .find(|m| m.version.is_none())
            .map(|m| m.path.as_str())
    }

    /// Every module with a resolved version, in SBOM order.
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.modules
            .iter()
            .filter_map(|m| {
                m.version
                    .as_ref()
                    .map(|version| Dependency::new(m.path.clone(), version.clone()))
            })
            .collect()
    }

    /// Package name to resolved version, with the toolchain under `stdlib`.
    pub fn resolved_versions(&self) -> HashMap<String, VersionKey> {
        let mut resolved: HashMap<String, VersionKey> = self
            .dependencies()
            .iter()
            .map(|d| (d.path().to_string(), VersionKey::parse(d.version())))
            .collect();

        if let Some(go_version) = &self.go_version {
            resolved.insert(STDLIB_PACKAGE.to_string(), VersionKey::parse(go_version));
        }
        resolved
    }
}
