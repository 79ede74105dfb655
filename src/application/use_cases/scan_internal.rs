use super::fetch_dependency::DependencyFetcher;
use crate::audit::domain::{
    CacheKey, Dependency, FetchProtocol, InternalIdentity, InternalScanOutcome,
    InternalScanResult,
};
use crate::audit::policies::StalenessPolicy;
use crate::audit::services::ScanReportParser;
use crate::ports::outbound::{CacheStore, ProgressReporter, SourceFetcher, VulnerabilityScanner};
use chrono::NaiveDateTime;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Exit code of the text scan when vulnerabilities were found
const EXIT_VULNERABILITIES_FOUND: i32 = 3;

/// InternalScanner - Fetches and scans internally owned dependencies
///
/// Per (repository, version):
///
/// 1. cached vulnerabilities exist: skip (never re-fetched or re-scanned)
/// 2. checked within the staleness window: skip
/// 3. ensure a local checkout, giving up on FETCH_FAILED
/// 4. scan the checkout and persist the result as CHECKED
///
/// Dependencies are processed up to `jobs` at a time. Load-modify-save of
/// one record is serialized by a per-key async mutex, so two module paths of
/// the same repository at the same version fetch at most once.
pub struct InternalScanner<'a, SF, VS, CS> {
    fetcher: DependencyFetcher<'a, SF, CS>,
    scanner: &'a VS,
    store: &'a CS,
    staleness: StalenessPolicy,
    protocol: FetchProtocol,
    locks: DashMap<CacheKey, Arc<Mutex<()>>>,
}

impl<'a, SF, VS, CS> InternalScanner<'a, SF, VS, CS>
where
    SF: SourceFetcher,
    VS: VulnerabilityScanner,
    CS: CacheStore,
{
    pub fn new(
        fetcher: &'a SF,
        scanner: &'a VS,
        store: &'a CS,
        staleness: StalenessPolicy,
        protocol: FetchProtocol,
    ) -> Self {
        Self {
            fetcher: DependencyFetcher::new(fetcher, store),
            scanner,
            store,
            staleness,
            protocol,
            locks: DashMap::new(),
        }
    }

    /// Processes every dependency, returning results in input order
    ///
    /// # Arguments
    /// * `dependencies` - Internally owned dependencies from the SBOM
    /// * `jobs` - Maximum number of dependencies processed at once
    /// * `now` - Reference time for staleness and `last_update`
    /// * `reporter` - Receives one progress tick per finished dependency
    pub async fn scan_all<PR: ProgressReporter>(
        &self,
        dependencies: &[Dependency],
        jobs: usize,
        now: NaiveDateTime,
        reporter: &PR,
    ) -> Vec<InternalScanResult> {
        let total = dependencies.len();
        let mut indexed: Vec<(usize, InternalScanResult)> = Vec::with_capacity(total);

        let mut results = stream::iter(dependencies.iter().enumerate())
            .map(|(index, dependency)| async move { (index, self.scan(dependency, now).await) })
            .buffer_unordered(jobs.max(1));

        while let Some((index, result)) = results.next().await {
            indexed.push((index, result));
            let last = &indexed[indexed.len() - 1].1;
            reporter.report_progress(
                indexed.len(),
                total,
                Some(&format!("{}@{} {}", last.module, last.version, last.outcome.label())),
            );
        }

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    /// Processes a single dependency
    pub async fn scan(&self, dependency: &Dependency, now: NaiveDateTime) -> InternalScanResult {
        let outcome = match InternalIdentity::from_dependency(dependency, self.protocol) {
            Some(identity) => self.scan_identity(dependency, &identity, now).await,
            None => InternalScanOutcome::FetchFailed {
                reason: format!("{} is not a host/owner/repository path", dependency.path()),
            },
        };
        InternalScanResult::new(dependency, outcome)
    }

    async fn scan_identity(
        &self,
        dependency: &Dependency,
        identity: &InternalIdentity,
        now: NaiveDateTime,
    ) -> InternalScanOutcome {
        let key = match CacheKey::new(identity, dependency.version()) {
            Ok(key) => key,
            Err(e) => {
                return InternalScanOutcome::FetchFailed {
                    reason: e.to_string(),
                }
            }
        };

        let lock = self.locks.entry(key.clone()).or_default().clone();
        let _guard = lock.lock().await;

        let mut record = self.store.load(&key);

        if record.has_vulnerabilities() {
            tracing::debug!(dependency = %key, "cached vulnerabilities, skipping");
            return InternalScanOutcome::SkippedPositive {
                vulnerabilities: record.vulnerabilities().to_vec(),
            };
        }

        if self.staleness.is_fresh(&record, now) {
            tracing::debug!(dependency = %key, "checked within staleness window, skipping");
            return InternalScanOutcome::SkippedFresh {
                vulnerabilities: record.vulnerabilities().to_vec(),
            };
        }

        let fetch = self.fetcher.ensure_local(identity, &mut record).await;
        if !fetch.is_available() {
            return InternalScanOutcome::FetchFailed {
                reason: fetch.to_string(),
            };
        }

        let source_dir = self.store.source_dir(&key);
        let output = match self.scanner.scan_source_text(&source_dir).await {
            Ok(output) => output,
            Err(e) => {
                return InternalScanOutcome::ScanFailed {
                    reason: e.to_string(),
                }
            }
        };

        match output.exit_code {
            Some(0) | Some(EXIT_VULNERABILITIES_FOUND) => {}
            Some(code) => {
                return InternalScanOutcome::ScanFailed {
                    reason: format!("scanner exited with status {}", code),
                }
            }
            None => {
                return InternalScanOutcome::ScanFailed {
                    reason: "scanner terminated by signal".to_string(),
                }
            }
        }

        let vulnerabilities = ScanReportParser::vulnerabilities(&output.output);
        record.mark_checked(now, vulnerabilities.clone());
        if let Err(e) = self.store.save(&record) {
            tracing::warn!(error = %e, "could not persist scan result");
        }

        InternalScanOutcome::Checked { vulnerabilities }
    }
}
