use crate::audit::domain::CacheStatus;
use serde::Serialize;
use std::path::PathBuf;

/// What to do with the cache of internal scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreRequest {
    /// List every record
    Info,
    /// Remove every record and checkout
    Clear,
}

/// One cached (repository, version) as shown by `--store-info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEntry {
    pub repository: String,
    pub version: String,
    pub status: CacheStatus,
    pub last_update: String,
    pub vulnerabilities: usize,
}

/// Result of a store maintenance request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreReport {
    pub root: PathBuf,
    pub entries: Vec<StoreEntry>,
    pub removed: usize,
}

impl StoreReport {
    /// Human-readable summary written to stdout
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Store: {}\n", self.root.display()));

        if self.removed > 0 {
            out.push_str(&format!("Removed {} record(s)\n", self.removed));
            return out;
        }
        if self.entries.is_empty() {
            out.push_str("No cached records\n");
            return out;
        }

        out.push_str(&format!("{} cached record(s)\n\n", self.entries.len()));
        for entry in &self.entries {
            out.push_str(&format!(
                "  {}@{}  {}  {}  {} vulnerabilit{}\n",
                entry.repository,
                entry.version,
                entry.status,
                entry.last_update,
                entry.vulnerabilities,
                if entry.vulnerabilities == 1 { "y" } else { "ies" }
            ));
        }
        out
    }
}
