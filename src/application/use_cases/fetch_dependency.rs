use crate::audit::domain::{CacheRecord, CacheStatus, FetchOutcome, InternalIdentity};
use crate::ports::outbound::{CacheStore, SourceFetcher};
use std::fs;
use std::path::Path;

/// Phrases the fetch tool prints when the requested tag does not exist
const BRANCH_NOT_FOUND_MARKERS: [&str; 2] = ["Remote branch", "not found in upstream origin"];

/// Number of trailing output lines kept in an error reason
const ERROR_TAIL_LINES: usize = 3;

/// DependencyFetcher - Makes an internal dependency's source available locally
///
/// The checkout lives at `<store root>/<domain>/<owner>/<repo>/<version>/`.
/// A missing version tag is terminal: the record moves to FETCH_FAILED and
/// the fetch tool is never invoked again for that (repository, version).
pub struct DependencyFetcher<'a, SF, CS> {
    fetcher: &'a SF,
    store: &'a CS,
}

impl<'a, SF, CS> DependencyFetcher<'a, SF, CS>
where
    SF: SourceFetcher,
    CS: CacheStore,
{
    pub fn new(fetcher: &'a SF, store: &'a CS) -> Self {
        Self { fetcher, store }
    }

    /// Ensures a checkout of `record`'s version exists
    ///
    /// Updates and persists `record` when its status changes. Never fails:
    /// every problem is reported through the returned [`FetchOutcome`].
    pub async fn ensure_local(
        &self,
        identity: &InternalIdentity,
        record: &mut CacheRecord,
    ) -> FetchOutcome {
        if record.status() == CacheStatus::FetchFailed {
            return FetchOutcome::BranchNotFound;
        }

        let destination = self.store.source_dir(record.key());
        if destination.join(".git").is_dir() {
            self.mark_fetched(record);
            return FetchOutcome::AlreadyPresent;
        }

        if let Err(reason) = prepare_destination(&destination) {
            return FetchOutcome::OtherError(reason);
        }

        let tag = record.key().version().to_string();
        tracing::debug!(
            url = identity.fetch_url(),
            tag = %tag,
            destination = %destination.display(),
            "fetching internal dependency"
        );

        let outcome = match self
            .fetcher
            .fetch(identity.fetch_url(), &tag, &destination)
            .await
        {
            Ok(output) if output.success() => FetchOutcome::Fetched,
            Ok(output) if is_branch_not_found(&output.output) => FetchOutcome::BranchNotFound,
            Ok(output) => FetchOutcome::OtherError(match output.exit_code {
                Some(code) => format!("exit status {}: {}", code, tail(&output.output)),
                None => format!("terminated by signal: {}", tail(&output.output)),
            }),
            Err(e) => FetchOutcome::OtherError(e.to_string()),
        };

        match &outcome {
            FetchOutcome::Fetched => self.mark_fetched(record),
            FetchOutcome::BranchNotFound => {
                remove_partial_checkout(&destination);
                record.mark_fetch_failed();
                self.save(record);
            }
            FetchOutcome::OtherError(reason) => {
                tracing::warn!(dependency = %record.key(), %reason, "fetch failed, will retry next run");
                remove_partial_checkout(&destination);
            }
            FetchOutcome::AlreadyPresent => {}
        }
        outcome
    }

    /// A fresh checkout only upgrades NEW records; CHECKED keeps its timestamp.
    fn mark_fetched(&self, record: &mut CacheRecord) {
        if record.status() == CacheStatus::New {
            record.mark_fetched();
            self.save(record);
        }
    }

    fn save(&self, record: &CacheRecord) {
        if let Err(e) = self.store.save(record) {
            tracing::warn!(error = %e, "could not persist cache record");
        }
    }
}

fn is_branch_not_found(output: &str) -> bool {
    BRANCH_NOT_FOUND_MARKERS
        .iter()
        .all(|marker| output.contains(marker))
}

/// A leftover directory without `.git` is an interrupted clone.
fn prepare_destination(destination: &Path) -> Result<(), String> {
    remove_partial_checkout(destination);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            format!(
                "failed to create checkout directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    Ok(())
}

fn remove_partial_checkout(destination: &Path) {
    if destination.exists() {
        if let Err(e) = fs::remove_dir_all(destination) {
            tracing::warn!(
                path = %destination.display(),
                error = %e,
                "could not remove partial checkout"
            );
        }
    }
}

fn tail(output: &str) -> String {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join(" | ")
}
