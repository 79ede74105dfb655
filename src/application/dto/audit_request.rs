use crate::audit::domain::FetchProtocol;
use crate::audit::policies::StalenessPolicy;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Lower and upper bound of concurrently processed internal dependencies
pub const MIN_JOBS: usize = 1;
pub const MAX_JOBS: usize = 8;

/// AuditRequest - Request DTO for the audit use case
///
/// `now` is captured once by the caller; every staleness decision of the
/// run is made against it.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Directory containing go.mod
    pub project_path: PathBuf,
    /// Organizations whose modules are scanned from source
    pub internal_owners: Vec<String>,
    /// When false, internal dependencies are not fetched or scanned
    pub check_internal: bool,
    pub staleness: StalenessPolicy,
    pub fetch_protocol: FetchProtocol,
    /// Internal dependencies processed at once, clamped to 1..=8
    pub jobs: usize,
    pub now: NaiveDateTime,
}

impl AuditRequest {
    pub fn new(project_path: PathBuf, now: NaiveDateTime) -> Self {
        Self {
            project_path,
            internal_owners: Vec::new(),
            check_internal: true,
            staleness: StalenessPolicy::default(),
            fetch_protocol: FetchProtocol::default(),
            jobs: MIN_JOBS,
            now,
        }
    }

    pub fn with_internal_owners(mut self, owners: Vec<String>) -> Self {
        self.internal_owners = owners;
        self
    }

    pub fn with_check_internal(mut self, check_internal: bool) -> Self {
        self.check_internal = check_internal;
        self
    }

    pub fn with_staleness(mut self, staleness: StalenessPolicy) -> Self {
        self.staleness = staleness;
        self
    }

    pub fn with_fetch_protocol(mut self, protocol: FetchProtocol) -> Self {
        self.fetch_protocol = protocol;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.clamp(MIN_JOBS, MAX_JOBS);
        self
    }
}
