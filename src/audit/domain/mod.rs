pub mod cache_record;
pub mod dependency;
pub mod finding;
pub mod sbom;
pub mod scan_outcome;
pub mod version_key;

pub use cache_record::{
    never, CacheKey, CacheRecord, CacheStatus, CachedVulnerability, TIMESTAMP_FORMAT,
};
pub use dependency::{Dependency, FetchProtocol, InternalIdentity};
pub use finding::{AggregatedPackageStatus, Finding, FindingSource};
pub use sbom::{Sbom, SbomModule, STDLIB_PACKAGE};
pub use scan_outcome::{FetchOutcome, InternalScanOutcome, InternalScanResult, ScannerMetadata};
pub use version_key::{VersionComponent, VersionKey};
