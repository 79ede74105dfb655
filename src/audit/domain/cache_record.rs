use super::dependency::InternalIdentity;
use crate::shared::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Fixed textual timestamp format of persisted records
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifies one cache record: a repository at one resolved version.
///
/// Two module paths in the same repository (e.g. `host/acme/foo` and
/// `host/acme/foo/sub`) at the same version map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    domain: String,
    owner: String,
    repository: String,
    version: String,
}

impl CacheKey {
    pub fn new(identity: &InternalIdentity, version: &str) -> Result<Self> {
        Self::from_parts(
            identity.domain(),
            identity.owner(),
            identity.repository(),
            version,
        )
    }

    /// Builds a key from the four path segments of the store layout
    pub fn from_parts(domain: &str, owner: &str, repository: &str, version: &str) -> Result<Self> {
        for (label, value) in [
            ("domain", domain),
            ("owner", owner),
            ("repository", repository),
            ("version", version),
        ] {
            validate_path_segment(label, value)?;
        }

        Ok(Self {
            domain: domain.to_string(),
            owner: owner.to_string(),
            repository: repository.to_string(),
            version: version.to_string(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn qualified_name(&self) -> String {
        format!("{}/{}/{}", self.domain, self.owner, self.repository)
    }

    fn repository_dir(&self) -> PathBuf {
        PathBuf::from(&self.domain)
            .join(&self.owner)
            .join(&self.repository)
    }

    /// `domain/owner/repo/<version>.json`, relative to the store root
    pub fn record_path(&self) -> PathBuf {
        self.repository_dir().join(format!("{}.json", self.version))
    }

    /// `domain/owner/repo/<version>/`, relative to the store root
    pub fn source_dir(&self) -> PathBuf {
        self.repository_dir().join(&self.version)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.qualified_name(), self.version)
    }
}

/// Path segments come from module paths and versions in scanner output, so
/// they must not be able to climb out of the store root.
fn validate_path_segment(label: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        anyhow::bail!("Cache key {} cannot be empty", label);
    }
    if value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        anyhow::bail!(
            "Cache key {} '{}' contains characters that are not allowed in a path segment",
            label,
            value
        );
    }
    Ok(())
}

/// Lifecycle state of a cached (repository, version) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    #[default]
    New,
    #[serde(alias = "cloned")]
    Fetched,
    #[serde(alias = "clone_error")]
    FetchFailed,
    Checked,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CacheStatus::New => "new",
            CacheStatus::Fetched => "fetched",
            CacheStatus::FetchFailed => "fetch_failed",
            CacheStatus::Checked => "checked",
        };
        write!(f, "{}", label)
    }
}

/// A vulnerability reported by the text-mode scan of an internal repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedVulnerability {
    pub code: String,
    pub description: String,
    pub fixed_in: String,
}

impl CachedVulnerability {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        fixed_in: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            fixed_in: fixed_in.into(),
        }
    }

    /// Splits `fixed_in` into an optional package and a version.
    ///
    /// `golang.org/x/net@v0.17.0` gives `(Some("golang.org/x/net"), "v0.17.0")`,
    /// a bare `v1.2.0` gives `(None, "v1.2.0")`.
    pub fn fixed_package_and_version(&self) -> (Option<&str>, &str) {
        match self.fixed_in.rsplit_once('@') {
            Some((package, version)) if !package.is_empty() => (Some(package), version),
            Some((_, version)) => (None, version),
            None => (None, self.fixed_in.as_str()),
        }
    }
}

/// Persisted result of scanning one internal (repository, version).
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    key: CacheKey,
    last_update: NaiveDateTime,
    status: CacheStatus,
    vulnerabilities: Vec<CachedVulnerability>,
}

impl CacheRecord {
    /// A record for a pair never seen before: status NEW, never checked.
    pub fn new(key: CacheKey) -> Self {
        Self {
            key,
            last_update: never(),
            status: CacheStatus::New,
            vulnerabilities: Vec::new(),
        }
    }

    pub fn restore(
        key: CacheKey,
        last_update: NaiveDateTime,
        status: CacheStatus,
        vulnerabilities: Vec<CachedVulnerability>,
    ) -> Self {
        Self {
            key,
            last_update,
            status,
            vulnerabilities,
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn last_update(&self) -> NaiveDateTime {
        self.last_update
    }

    pub fn status(&self) -> CacheStatus {
        self.status
    }

    pub fn vulnerabilities(&self) -> &[CachedVulnerability] {
        &self.vulnerabilities
    }

    pub fn has_vulnerabilities(&self) -> bool {
        !self.vulnerabilities.is_empty()
    }

    /// Checked less than `window` before `now`.
    pub fn is_fresh(&self, now: NaiveDateTime, window: Duration) -> bool {
        self.status == CacheStatus::Checked && now - self.last_update < window
    }

    pub fn mark_fetched(&mut self) {
        self.status = CacheStatus::Fetched;
    }

    pub fn mark_fetch_failed(&mut self) {
        self.status = CacheStatus::FetchFailed;
    }

    pub fn mark_checked(&mut self, now: NaiveDateTime, vulnerabilities: Vec<CachedVulnerability>) {
        self.last_update = now;
        self.status = CacheStatus::Checked;
        self.vulnerabilities = vulnerabilities;
    }
}

/// 0001-01-01 00:00:00, the "never checked" timestamp.
pub fn never() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}
