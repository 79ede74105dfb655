use super::cache_record::CachedVulnerability;
use super::dependency::Dependency;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of making an internal dependency's source available locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A checkout already exists at the target directory
    AlreadyPresent,
    /// The fetch tool cloned the tag just now
    Fetched,
    /// The tag does not exist upstream; never retried for this version
    BranchNotFound,
    /// Any other failure; retried on the next run
    OtherError(String),
}

impl FetchOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, FetchOutcome::AlreadyPresent | FetchOutcome::Fetched)
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::AlreadyPresent => write!(f, "already present"),
            FetchOutcome::Fetched => write!(f, "fetched"),
            FetchOutcome::BranchNotFound => write!(f, "version tag not found upstream"),
            FetchOutcome::OtherError(reason) => write!(f, "fetch failed: {}", reason),
        }
    }
}

/// What happened to one internal dependency during this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InternalScanOutcome {
    /// Cached vulnerabilities exist, nothing was fetched or scanned
    SkippedPositive {
        vulnerabilities: Vec<CachedVulnerability>,
    },
    /// Clean result checked within the staleness window
    SkippedFresh {
        vulnerabilities: Vec<CachedVulnerability>,
    },
    Checked {
        vulnerabilities: Vec<CachedVulnerability>,
    },
    FetchFailed { reason: String },
    ScanFailed { reason: String },
}

impl InternalScanOutcome {
    pub fn vulnerabilities(&self) -> &[CachedVulnerability] {
        match self {
            InternalScanOutcome::SkippedPositive { vulnerabilities }
            | InternalScanOutcome::SkippedFresh { vulnerabilities }
            | InternalScanOutcome::Checked { vulnerabilities } => vulnerabilities,
            InternalScanOutcome::FetchFailed { .. } | InternalScanOutcome::ScanFailed { .. } => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            InternalScanOutcome::FetchFailed { .. } | InternalScanOutcome::ScanFailed { .. }
        )
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            InternalScanOutcome::FetchFailed { reason } | InternalScanOutcome::ScanFailed { reason } => {
                Some(reason)
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InternalScanOutcome::SkippedPositive { .. } => "cached (vulnerable)",
            InternalScanOutcome::SkippedFresh { .. } => "cached (fresh)",
            InternalScanOutcome::Checked { .. } => "checked",
            InternalScanOutcome::FetchFailed { .. } => "fetch failed",
            InternalScanOutcome::ScanFailed { .. } => "scan failed",
        }
    }
}

/// An internal dependency together with its outcome for this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternalScanResult {
    pub module: String,
    pub version: String,
    #[serde(flatten)]
    pub outcome: InternalScanOutcome,
}

impl InternalScanResult {
    pub fn new(dependency: &Dependency, outcome: InternalScanOutcome) -> Self {
        Self {
            module: dependency.path().to_string(),
            version: dependency.version().to_string(),
            outcome,
        }
    }
}

/// Scanner details from the `config` message of the JSON stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerMetadata {
    #[serde(default)]
    pub scanner_name: Option<String>,
    #[serde(default)]
    pub scanner_version: Option<String>,
    #[serde(default)]
    pub db: Option<String>,
    #[serde(default)]
    pub db_last_modified: Option<String>,
    #[serde(default)]
    pub go_version: Option<String>,
    #[serde(default)]
    pub scan_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_outcome_availability() {
        assert!(FetchOutcome::AlreadyPresent.is_available());
        assert!(FetchOutcome::Fetched.is_available());
        assert!(!FetchOutcome::BranchNotFound.is_available());
        assert!(!FetchOutcome::OtherError("timeout".into()).is_available());
    }

    #[test]
    fn test_failed_outcomes_have_no_vulnerabilities() {
        let outcome = InternalScanOutcome::ScanFailed {
            reason: "exit status 1".to_string(),
        };
        assert!(outcome.is_failure());
        assert_eq!(outcome.failure_reason(), Some("exit status 1"));
        assert!(outcome.vulnerabilities().is_empty());
    }

    #[test]
    fn test_result_serializes_flat() {
        let dep = Dependency::new("github.com/acme/foo", "v1.0.0");
        let result = InternalScanResult::new(
            &dep,
            InternalScanOutcome::Checked {
                vulnerabilities: vec![CachedVulnerability::new("GO-1", "bad", "v1.2.0")],
            },
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["module"], "github.com/acme/foo");
        assert_eq!(json["outcome"], "checked");
        assert_eq!(json["vulnerabilities"][0]["fixed_in"], "v1.2.0");
    }

    #[test]
    fn test_scanner_metadata_ignores_unknown_fields() {
        let metadata: ScannerMetadata = serde_json::from_str(
            r#"{"protocol_version":"v1.0.0","scanner_name":"govulncheck","scanner_version":"v1.1.3","db":"https://vuln.go.dev","go_version":"go1.22.1","scan_level":"symbol"}"#,
        )
        .unwrap();
        assert_eq!(metadata.scanner_name.as_deref(), Some("govulncheck"));
        assert_eq!(metadata.go_version.as_deref(), Some("go1.22.1"));
    }
}
