use crate::audit::domain::{CacheKey, CacheRecord};
use crate::shared::error::CacheError;
use crate::shared::Result;
use std::path::{Path, PathBuf};

/// CacheStore port for persisted internal scan results
///
/// One record per (domain, owner, repository, version). Implementations must
/// never fail a load: an absent or unreadable record is replaced by a fresh
/// one.
pub trait CacheStore: Send + Sync {
    /// Loads the record for `key`, initializing and persisting a fresh one
    /// when it is absent or corrupt.
    fn load(&self, key: &CacheKey) -> CacheRecord;

    /// Persists `record` atomically
    ///
    /// # Errors
    /// Returns `CacheError::Write` when the record could not be written;
    /// callers log it and carry on.
    fn save(&self, record: &CacheRecord) -> std::result::Result<(), CacheError>;

    /// Lists every readable record under the store root
    fn list(&self) -> Result<Vec<CacheRecord>>;

    /// Removes every record and checkout, returning the number of records removed
    fn clear(&self) -> Result<usize>;

    /// Root directory of the store
    fn root(&self) -> &Path;

    /// Absolute checkout directory for `key`
    fn source_dir(&self, key: &CacheKey) -> PathBuf {
        self.root().join(key.source_dir())
    }
}
