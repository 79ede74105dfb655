use super::scan_internal::InternalScanner;
use crate::application::dto::{AuditReport, AuditRequest};
use crate::audit::domain::{Finding, InternalScanResult, Sbom};
use crate::audit::services::{OwnershipFilter, ParsedScan, ReportAggregator, ScanStreamParser};
use crate::ports::inbound::AuditPort;
use crate::ports::outbound::{
    CacheStore, ProgressReporter, ProjectManifestReader, SourceFetcher, VulnerabilityScanner,
};
use crate::shared::error::AuditError;
use crate::shared::Result;
use async_trait::async_trait;

/// Number of trailing scanner output lines shown when the primary scan fails
const FAILURE_TAIL_LINES: usize = 5;

/// AuditProjectUseCase - Orchestrates one audit of a Go module
///
/// This use case wires the primary JSON scan, the internal dependency
/// scanner and the aggregator together using generic dependency injection
/// for all infrastructure dependencies. Nothing is kept between calls: the
/// SBOM and every collaborator are threaded through each step.
///
/// # Type Parameters
/// * `MR` - ProjectManifestReader implementation
/// * `VS` - VulnerabilityScanner implementation
/// * `SF` - SourceFetcher implementation
/// * `CS` - CacheStore implementation
/// * `PR` - ProgressReporter implementation
pub struct AuditProjectUseCase<MR, VS, SF, CS, PR> {
    manifest_reader: MR,
    scanner: VS,
    fetcher: SF,
    store: CS,
    progress_reporter: PR,
}

impl<MR, VS, SF, CS, PR> AuditProjectUseCase<MR, VS, SF, CS, PR>
where
    MR: ProjectManifestReader,
    VS: VulnerabilityScanner,
    SF: SourceFetcher,
    CS: CacheStore,
    PR: ProgressReporter,
{
    /// Creates a new AuditProjectUseCase with injected dependencies
    pub fn new(
        manifest_reader: MR,
        scanner: VS,
        fetcher: SF,
        store: CS,
        progress_reporter: PR,
    ) -> Self {
        Self {
            manifest_reader,
            scanner,
            fetcher,
            store,
            progress_reporter,
        }
    }

    /// Executes the audit
    ///
    /// # Errors
    /// Fatal conditions only: missing go.mod, unavailable scanner, a failed
    /// primary scan or invalid internal owners. Internal dependencies that
    /// fail to fetch or scan are reported in the returned [`AuditReport`].
    pub async fn execute(&self, request: AuditRequest) -> Result<AuditReport> {
        // Step 1: The project must be a Go module
        let module_path = self
            .manifest_reader
            .read_module_path(&request.project_path)?;
        self.progress_reporter
            .report(&format!("📖 Auditing module {}", module_path));

        // Step 2: Primary scan (SBOM + public advisories)
        self.scanner.ensure_available().await?;
        let parsed = self.run_primary_scan(&request).await?;
        let sbom = parsed.sbom.clone().ok_or_else(|| AuditError::PrimaryScanFailed {
            path: request.project_path.clone(),
            details: "scanner output contained no SBOM message".to_string(),
        })?;
        self.progress_reporter.report(&format!(
            "✅ Detected {} dependency module(s), {} advisory finding(s)",
            sbom.dependencies().len(),
            parsed.findings.len()
        ));

        // Step 3: Internal dependencies
        let internal_results = self.scan_internal_dependencies(&request, &sbom).await?;

        // Step 4: Merge findings against resolved versions
        let findings = Self::collect_findings(&parsed, &sbom, &internal_results);
        let packages = ReportAggregator::aggregate(&findings, &sbom.resolved_versions());

        let report = AuditReport {
            module_path,
            scanner: parsed.metadata.unwrap_or_default(),
            go_version: sbom.go_version.clone(),
            packages,
            internal_dependencies: internal_results,
            dropped_messages: parsed.dropped,
        };

        self.progress_reporter.report_completion(&format!(
            "🔍 Audit complete: {} affected package(s)",
            report.packages.len()
        ));
        Ok(report)
    }

    async fn run_primary_scan(&self, request: &AuditRequest) -> Result<ParsedScan> {
        self.progress_reporter.report("🔎 Running vulnerability scan...");

        let output = self.scanner.scan_module_json(&request.project_path).await?;
        if !output.success() {
            let lines: Vec<&str> = output.output.lines().collect();
            let tail = lines[lines.len().saturating_sub(FAILURE_TAIL_LINES)..].join("\n");
            return Err(AuditError::PrimaryScanFailed {
                path: request.project_path.clone(),
                details: match output.exit_code {
                    Some(code) => format!("exit status {}\n{}", code, tail),
                    None => format!("terminated by signal\n{}", tail),
                },
            }
            .into());
        }

        // stderr carries toolchain chatter, never scanner messages
        let parsed = ScanStreamParser::collect(&output.stdout);
        if parsed.dropped > 0 {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} malformed scanner message(s) were skipped",
                parsed.dropped
            ));
        }
        Ok(parsed)
    }

    async fn scan_internal_dependencies(
        &self,
        request: &AuditRequest,
        sbom: &Sbom,
    ) -> Result<Vec<InternalScanResult>> {
        if !request.check_internal {
            return Ok(Vec::new());
        }

        let filter = OwnershipFilter::new(request.internal_owners.clone()).map_err(|e| {
            AuditError::InvalidConfig {
                message: e.to_string(),
            }
        })?;
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        let internal = filter.select(&sbom.dependencies());
        if internal.is_empty() {
            self.progress_reporter.report(&format!(
                "ℹ️  No dependencies owned by {}",
                filter.owners().join(", ")
            ));
            return Ok(Vec::new());
        }

        self.progress_reporter.report(&format!(
            "🏢 Checking {} internal dependenc{} (jobs: {})",
            internal.len(),
            if internal.len() == 1 { "y" } else { "ies" },
            request.jobs
        ));

        let scanner = InternalScanner::new(
            &self.fetcher,
            &self.scanner,
            &self.store,
            request.staleness,
            request.fetch_protocol,
        );
        let results = scanner
            .scan_all(&internal, request.jobs, request.now, &self.progress_reporter)
            .await;

        for result in &results {
            if let Some(reason) = result.outcome.failure_reason() {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: {}@{}: {}",
                    result.module, result.version, reason
                ));
            }
        }
        Ok(results)
    }

    fn collect_findings(
        parsed: &ParsedScan,
        sbom: &Sbom,
        internal_results: &[InternalScanResult],
    ) -> Vec<Finding> {
        let mut findings = parsed.findings.clone();
        let dependencies = sbom.dependencies();
        for result in internal_results {
            if let Some(dependency) = dependencies
                .iter()
                .find(|d| d.path() == result.module && d.version() == result.version)
            {
                findings.extend(ReportAggregator::internal_findings(
                    dependency,
                    result.outcome.vulnerabilities(),
                ));
            }
        }
        findings
    }
}

#[async_trait(?Send)]
impl<MR, VS, SF, CS, PR> AuditPort for AuditProjectUseCase<MR, VS, SF, CS, PR>
where
    MR: ProjectManifestReader,
    VS: VulnerabilityScanner,
    SF: SourceFetcher,
    CS: CacheStore,
    PR: ProgressReporter,
{
    async fn audit(&self, request: AuditRequest) -> Result<AuditReport> {
        self.execute(request).await
    }
}
