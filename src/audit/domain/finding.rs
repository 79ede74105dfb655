use super::version_key::VersionKey;
use serde::Serialize;

/// Where a finding was reported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSource {
    /// An OSV entry from the public advisory database
    PublicAdvisory,
    /// The text scan of an internally owned dependency
    InternalScan,
}

/// A single reported vulnerability instance tied to a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub advisory_id: String,
    pub summary: String,
    pub affected_package: String,
    pub introduced_version: Option<String>,
    pub fixed_version: Option<String>,
    pub source: FindingSource,
}

impl Finding {
    pub fn new(
        advisory_id: impl Into<String>,
        summary: impl Into<String>,
        affected_package: impl Into<String>,
        source: FindingSource,
    ) -> Self {
        Self {
            advisory_id: advisory_id.into(),
            summary: summary.into(),
            affected_package: affected_package.into(),
            introduced_version: None,
            fixed_version: None,
            source,
        }
    }

    pub fn with_introduced(mut self, version: impl Into<String>) -> Self {
        self.introduced_version = Some(version.into());
        self
    }

    pub fn with_fixed(mut self, version: impl Into<String>) -> Self {
        self.fixed_version = Some(version.into());
        self
    }

    /// Fix version as a comparable key; a finding without a fix never
    /// raises the maximum above the minimum key.
    pub fn fixed_key(&self) -> VersionKey {
        self.fixed_version
            .as_deref()
            .map(VersionKey::parse)
            .unwrap_or_default()
    }
}

/// Per affected package: the version in use against the highest fix any
/// finding names for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedPackageStatus {
    pub package: String,
    pub current_version: VersionKey,
    pub fixed_version: VersionKey,
    pub findings: Vec<Finding>,
}

impl AggregatedPackageStatus {
    pub fn advisory_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.findings.iter().map(|f| f.advisory_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
