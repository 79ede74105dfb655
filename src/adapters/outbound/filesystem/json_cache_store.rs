use crate::audit::domain::{CacheKey, CacheRecord, CacheStatus, CachedVulnerability};
use crate::ports::outbound::CacheStore;
use crate::shared::error::CacheError;
use crate::shared::security::{read_regular_file, validate_not_symlink, MAX_CACHE_RECORD_SIZE};
use crate::shared::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory under the home directory used when no store path is configured
pub const DEFAULT_STORE_DIR: &str = ".govuln";

const RECORD_EXTENSION: &str = "json";

/// On-disk shape of a record: `{last_update, status, vulnerabilities}`
#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    #[serde(with = "timestamp")]
    last_update: NaiveDateTime,
    status: CacheStatus,
    #[serde(default)]
    vulnerabilities: Vec<CachedVulnerability>,
}

mod timestamp {
    use crate::audit::domain::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// FileSystemCacheStore adapter persisting one JSON file per record
///
/// Layout under `root`:
///
/// ```text
/// <domain>/<owner>/<repo>/<version>.json   record
/// <domain>/<owner>/<repo>/<version>/       checkout
/// ```
///
/// Writes go to a temporary file in the record's directory which is then
/// renamed over the record, so readers never observe a half-written file.
pub struct FileSystemCacheStore {
    root: PathBuf,
}

impl FileSystemCacheStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `~/.govuln`, or `./.govuln` when no home directory is known
    pub fn default_root() -> PathBuf {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_STORE_DIR)
    }

    fn record_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.record_path())
    }

    fn read_record(&self, key: &CacheKey, path: &Path) -> std::result::Result<CacheRecord, CacheError> {
        let corrupt = |details: String| CacheError::Corrupt {
            path: path.to_path_buf(),
            details,
        };

        let content = read_regular_file(path, "cache record", MAX_CACHE_RECORD_SIZE)
            .map_err(|e| corrupt(e.to_string()))?;
        let persisted: PersistedRecord =
            serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;

        Ok(CacheRecord::restore(
            key.clone(),
            persisted.last_update,
            persisted.status,
            persisted.vulnerabilities,
        ))
    }

    fn write_record(&self, record: &CacheRecord) -> std::result::Result<(), CacheError> {
        let path = self.record_path(record.key());
        let write_error = |details: String| CacheError::Write {
            path: path.clone(),
            details,
        };

        let directory = path
            .parent()
            .ok_or_else(|| write_error("record path has no parent directory".to_string()))?;
        fs::create_dir_all(directory).map_err(|e| write_error(e.to_string()))?;

        let persisted = PersistedRecord {
            last_update: record.last_update(),
            status: record.status(),
            vulnerabilities: record.vulnerabilities().to_vec(),
        };
        let json = serde_json::to_string_pretty(&persisted).map_err(|e| write_error(e.to_string()))?;

        let mut temp = NamedTempFile::new_in(directory).map_err(|e| write_error(e.to_string()))?;
        temp.write_all(json.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(|e| write_error(e.to_string()))?;
        temp.persist(&path)
            .map_err(|e| write_error(e.error.to_string()))?;
        Ok(())
    }

    /// Every `(key, record path)` pair found under the root.
    fn record_files(&self) -> Vec<(CacheKey, PathBuf)> {
        let mut found = Vec::new();
        for domain in subdirectories(&self.root) {
            for owner in subdirectories(&domain) {
                for repository in subdirectories(&owner) {
                    let Ok(entries) = fs::read_dir(&repository) else {
                        continue;
                    };
                    for entry in entries.flatten() {
                        let path = entry.path();
                        if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                            continue;
                        }
                        if let Some(key) = key_from_layout(&domain, &owner, &repository, &path) {
                            found.push((key, path));
                        }
                    }
                }
            }
        }
        found.sort_by(|a, b| a.1.cmp(&b.1));
        found
    }
}

impl CacheStore for FileSystemCacheStore {
    fn load(&self, key: &CacheKey) -> CacheRecord {
        let path = self.record_path(key);

        if path.exists() || fs::symlink_metadata(&path).is_ok() {
            match self.read_record(key, &path) {
                Ok(record) => return record,
                Err(e) => tracing::warn!(error = %e, severity = ?e.severity(), "replacing unreadable cache record"),
            }
        }

        let record = CacheRecord::new(key.clone());
        if let Err(e) = self.save(&record) {
            tracing::warn!(error = %e, "could not initialize cache record");
        }
        record
    }

    fn save(&self, record: &CacheRecord) -> std::result::Result<(), CacheError> {
        let path = self.record_path(record.key());
        if fs::symlink_metadata(&path).is_ok_and(|m| m.is_symlink()) {
            return Err(CacheError::Write {
                path,
                details: "Security: refusing to replace a symbolic link".to_string(),
            });
        }
        self.write_record(record)
    }

    fn list(&self) -> Result<Vec<CacheRecord>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        validate_not_symlink(&self.root, "store")?;

        Ok(self
            .record_files()
            .into_iter()
            .filter_map(|(key, path)| match self.read_record(&key, &path) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable cache record");
                    None
                }
            })
            .collect())
    }

    /// Removes records and their checkouts only, so a misconfigured root
    /// never loses unrelated files.
    fn clear(&self) -> Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }
        validate_not_symlink(&self.root, "store")?;

        let mut removed = 0;
        for (key, path) in self.record_files() {
            fs::remove_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to remove {}: {}", path.display(), e))?;
            removed += 1;

            let checkout = self.source_dir(&key);
            if checkout.is_dir() {
                fs::remove_dir_all(&checkout).map_err(|e| {
                    anyhow::anyhow!("Failed to remove {}: {}", checkout.display(), e)
                })?;
            }
        }

        for domain in subdirectories(&self.root) {
            for owner in subdirectories(&domain) {
                for repository in subdirectories(&owner) {
                    for checkout in subdirectories(&repository) {
                        if checkout.join(".git").is_dir() {
                            fs::remove_dir_all(&checkout).map_err(|e| {
                                anyhow::anyhow!("Failed to remove {}: {}", checkout.display(), e)
                            })?;
                        }
                    }
                    let _ = fs::remove_dir(&repository);
                }
                let _ = fs::remove_dir(&owner);
            }
            let _ = fs::remove_dir(&domain);
        }

        tracing::info!(removed, root = %self.root.display(), "cleared store");
        Ok(removed)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

/// Real (non-symlink) subdirectories of `path`, sorted.
fn subdirectories(path: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(path) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    dirs
}

fn key_from_layout(domain: &Path, owner: &Path, repository: &Path, record: &Path) -> Option<CacheKey> {
    let name = |p: &Path| p.file_name().and_then(|n| n.to_str()).map(str::to_string);
    let version = record.file_stem().and_then(|s| s.to_str())?;
    CacheKey::from_parts(&name(domain)?, &name(owner)?, &name(repository)?, version).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::domain::{Dependency, FetchProtocol, InternalIdentity};
    use tempfile::TempDir;

    fn key(path: &str, version: &str) -> CacheKey {
        let dep = Dependency::new(path, version);
        let identity = InternalIdentity::from_dependency(&dep, FetchProtocol::Ssh).unwrap();
        CacheKey::new(&identity, version).unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_load_missing_record_persists_fresh_one() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemCacheStore::new(temp_dir.path().to_path_buf());
        let key = key("github.com/acme/foo", "v1.0.0");

        let record = store.load(&key);
        assert_eq!(record.status(), CacheStatus::New);

        let path = temp_dir.path().join("github.com/acme/foo/v1.0.0.json");
        let content = fs::read_to_string(path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["last_update"], "0001-01-01 00:00:00");
        assert_eq!(json["status"], "new");
        assert_eq!(json["vulnerabilities"], serde_json::json!([]));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemCacheStore::new(temp_dir.path().to_path_buf());
        let key = key("github.com/acme/foo", "v1.0.0");

        let mut record = store.load(&key);
        record.mark_checked(
            at("2025-02-03 04:05:06"),
            vec![CachedVulnerability::new("GO-2024-0001", "bad", "v1.2.0")],
        );
        store.save(&record).unwrap();

        let reloaded = store.load(&key);
        assert_eq!(reloaded, record);
    }

    #[test]
    fn test_corrupt_record_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemCacheStore::new(temp_dir.path().to_path_buf());
        let key = key("github.com/acme/foo", "v1.0.0");
        let path = temp_dir.path().join("github.com/acme/foo/v1.0.0.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        for corrupt in [
            "{ not json",
            r#"{"status": "checked", "vulnerabilities": []}"#,
            r#"{"last_update": "yesterday", "status": "checked"}"#,
            r#"{"last_update": "2025-01-01 00:00:00", "status": "exploded"}"#,
        ] {
            fs::write(&path, corrupt).unwrap();
            let record = store.load(&key);
            assert_eq!(record.status(), CacheStatus::New, "input: {}", corrupt);

            let rewritten: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(rewritten["status"], "new");
        }
    }

    #[test]
    fn test_legacy_status_names_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemCacheStore::new(temp_dir.path().to_path_buf());
        let key = key("github.com/acme/foo", "v1.0.0");
        let path = temp_dir.path().join("github.com/acme/foo/v1.0.0.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"last_update": "0001-01-01 00:00:00", "status": "clone_error", "vulnerabilities": []}"#,
        )
        .unwrap();

        assert_eq!(store.load(&key).status(), CacheStatus::FetchFailed);
    }

    #[test]
    fn test_save_fails_when_root_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("not-a-dir");
        fs::write(&root, "").unwrap();
        let store = FileSystemCacheStore::new(root);

        let record = CacheRecord::new(key("github.com/acme/foo", "v1.0.0"));
        let error = store.save(&record).unwrap_err();
        assert!(matches!(error, CacheError::Write { .. }));

        // load still succeeds with a fresh record
        let loaded = store.load(record.key());
        assert_eq!(loaded.status(), CacheStatus::New);
    }

    #[test]
    fn test_list_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemCacheStore::new(temp_dir.path().to_path_buf());
        store.load(&key("github.com/acme/foo", "v1.0.0"));
        store.load(&key("github.com/acme/bar", "v0.3.0"));
        let checkout = temp_dir.path().join("github.com/acme/foo/v1.0.0/.git");
        fs::create_dir_all(&checkout).unwrap();
        let unrelated = temp_dir.path().join("notes.txt");
        fs::write(&unrelated, "keep me").unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key().to_string(), "github.com/acme/bar@v0.3.0");

        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.list().unwrap().is_empty());
        assert!(!temp_dir.path().join("github.com").exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_list_missing_root() {
        let store = FileSystemCacheStore::new(PathBuf::from("/nonexistent/govuln-store"));
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.clear().unwrap(), 0);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemCacheStore::new(temp_dir.path().to_path_buf());
        let key = key("github.com/acme/foo", "v1.0.0");
        let record = store.load(&key);
        store.save(&record).unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path().join("github.com/acme/foo"))
            .unwrap()
            .flatten()
            .collect();
        assert_eq!(entries.len(), 1);
    }
}
