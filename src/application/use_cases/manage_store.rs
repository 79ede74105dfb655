use crate::application::dto::{StoreEntry, StoreReport, StoreRequest};
use crate::audit::domain::{never, CacheRecord, TIMESTAMP_FORMAT};
use crate::ports::inbound::StoreMaintenancePort;
use crate::ports::outbound::CacheStore;
use crate::shared::Result;

/// ManageStoreUseCase - Lists or clears cached internal scan results
pub struct ManageStoreUseCase<CS> {
    store: CS,
}

impl<CS: CacheStore> ManageStoreUseCase<CS> {
    pub fn new(store: CS) -> Self {
        Self { store }
    }

    fn entry(record: &CacheRecord) -> StoreEntry {
        let last_update = if record.last_update() == never() {
            "never".to_string()
        } else {
            record.last_update().format(TIMESTAMP_FORMAT).to_string()
        };
        StoreEntry {
            repository: record.key().qualified_name(),
            version: record.key().version().to_string(),
            status: record.status(),
            last_update,
            vulnerabilities: record.vulnerabilities().len(),
        }
    }
}

impl<CS: CacheStore> StoreMaintenancePort for ManageStoreUseCase<CS> {
    fn maintain(&self, request: StoreRequest) -> Result<StoreReport> {
        let root = self.store.root().to_path_buf();
        match request {
            StoreRequest::Info => {
                let mut entries: Vec<StoreEntry> =
                    self.store.list()?.iter().map(Self::entry).collect();
                entries.sort_by(|a, b| {
                    (&a.repository, &a.version).cmp(&(&b.repository, &b.version))
                });
                Ok(StoreReport {
                    root,
                    entries,
                    removed: 0,
                })
            }
            StoreRequest::Clear => {
                let removed = self.store.clear()?;
                Ok(StoreReport {
                    root,
                    entries: Vec::new(),
                    removed,
                })
            }
        }
    }
}
