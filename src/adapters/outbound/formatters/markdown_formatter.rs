use crate::application::dto::AuditReport;
use crate::audit::domain::{AggregatedPackageStatus, InternalScanResult};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// Markdown table header for affected packages
const PACKAGE_TABLE_HEADER: &str = "| Package | Current Version | Fixed Version | Advisories |\n";

/// Markdown table separator line for affected packages
const PACKAGE_TABLE_SEPARATOR: &str = "|---------|-----------------|---------------|------------|\n";

/// Markdown table header for internal dependencies
const INTERNAL_TABLE_HEADER: &str = "| Module | Version | Status | Vulnerabilities |\n";

/// Markdown table separator line for internal dependencies
const INTERNAL_TABLE_SEPARATOR: &str = "|--------|---------|--------|-----------------|\n";

/// MarkdownFormatter adapter for GitHub-flavoured Markdown reports
///
/// This adapter implements the ReportFormatter port. Advisory identifiers
/// from the Go vulnerability database link to pkg.go.dev.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn advisory_link(id: &str) -> String {
        if id.starts_with("GO-") {
            format!("[{}](https://pkg.go.dev/vuln/{})", id, id)
        } else {
            Self::escape_markdown_table_cell(id)
        }
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper methods for rendering sections
impl MarkdownFormatter {
    fn render_header(&self, output: &mut String, report: &AuditReport) {
        output.push_str("# Vulnerability Audit Report\n\n");
        output.push_str(&format!(
            "- **Module:** `{}`\n",
            Self::escape_markdown_table_cell(&report.module_path)
        ));
        if let Some(go_version) = &report.go_version {
            output.push_str(&format!("- **Go version:** {}\n", go_version));
        }
        if let (Some(name), Some(version)) =
            (&report.scanner.scanner_name, &report.scanner.scanner_version)
        {
            output.push_str(&format!("- **Scanner:** {} {}\n", name, version));
        }
        if let Some(db) = &report.scanner.db {
            output.push_str(&format!("- **Database:** {}\n", db));
        }
        output.push('\n');
    }

    fn render_packages(&self, output: &mut String, packages: &[AggregatedPackageStatus]) {
        output.push_str("## Affected Packages\n\n");
        if packages.is_empty() {
            output.push_str("No package in use is below a known fixed version.\n\n");
            return;
        }

        output.push_str(PACKAGE_TABLE_HEADER);
        output.push_str(PACKAGE_TABLE_SEPARATOR);
        for status in packages {
            let advisories: Vec<String> = status
                .advisory_ids()
                .into_iter()
                .map(Self::advisory_link)
                .collect();
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&status.package),
                status.current_version,
                status.fixed_version,
                advisories.join(", ")
            ));
        }
        output.push('\n');

        output.push_str("### Advisory Details\n\n");
        for status in packages {
            for finding in &status.findings {
                output.push_str(&format!(
                    "- {} `{}`: {}\n",
                    Self::advisory_link(&finding.advisory_id),
                    Self::escape_markdown_table_cell(&finding.affected_package),
                    Self::escape_markdown_table_cell(&finding.summary)
                ));
            }
        }
        output.push('\n');
    }

    fn render_internal(&self, output: &mut String, results: &[InternalScanResult]) {
        if results.is_empty() {
            return;
        }

        output.push_str("## Internal Dependencies\n\n");
        output.push_str(INTERNAL_TABLE_HEADER);
        output.push_str(INTERNAL_TABLE_SEPARATOR);
        for result in results {
            let detail = match result.outcome.failure_reason() {
                Some(reason) => Self::escape_markdown_table_cell(reason),
                None => result
                    .outcome
                    .vulnerabilities()
                    .iter()
                    .map(|v| Self::advisory_link(&v.code))
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&result.module),
                Self::escape_markdown_table_cell(&result.version),
                result.outcome.label(),
                detail
            ));
        }
        output.push('\n');
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        let mut output = String::new();
        self.render_header(&mut output, report);
        self.render_packages(&mut output, &report.packages);
        self.render_internal(&mut output, &report.internal_dependencies);
        if report.dropped_messages > 0 {
            output.push_str(&format!(
                "> ⚠️ {} malformed scanner message(s) were skipped.\n",
                report.dropped_messages
            ));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::domain::{
        CachedVulnerability, Dependency, Finding, FindingSource, InternalScanOutcome,
        ScannerMetadata, VersionKey,
    };

    fn report() -> AuditReport {
        AuditReport {
            module_path: "example.com/app".to_string(),
            scanner: ScannerMetadata {
                scanner_name: Some("govulncheck".to_string()),
                scanner_version: Some("v1.1.3".to_string()),
                db: Some("https://vuln.go.dev".to_string()),
                ..ScannerMetadata::default()
            },
            go_version: Some("go1.22.1".to_string()),
            packages: vec![AggregatedPackageStatus {
                package: "github.com/acme/foo".to_string(),
                current_version: VersionKey::parse("v1.0.0"),
                fixed_version: VersionKey::parse("v1.2.0"),
                findings: vec![Finding::new(
                    "GO-2024-0001",
                    "Injection | in parser",
                    "github.com/acme/foo",
                    FindingSource::InternalScan,
                )
                .with_fixed("v1.2.0")],
            }],
            internal_dependencies: vec![
                InternalScanResult::new(
                    &Dependency::new("github.com/acme/foo", "v1.0.0"),
                    InternalScanOutcome::Checked {
                        vulnerabilities: vec![CachedVulnerability::new(
                            "GO-2024-0001",
                            "Injection | in parser",
                            "v1.2.0",
                        )],
                    },
                ),
                InternalScanResult::new(
                    &Dependency::new("github.com/acme/gone", "v9.9.9"),
                    InternalScanOutcome::FetchFailed {
                        reason: "version tag not found upstream".to_string(),
                    },
                ),
            ],
            dropped_messages: 0,
        }
    }

    #[test]
    fn test_format_affected_packages() {
        let output = MarkdownFormatter::new().format(&report()).unwrap();

        assert!(output.starts_with("# Vulnerability Audit Report"));
        assert!(output.contains("- **Module:** `example.com/app`"));
        assert!(output.contains("- **Scanner:** govulncheck v1.1.3"));
        assert!(output.contains(PACKAGE_TABLE_HEADER));
        assert!(output.contains(
            "| github.com/acme/foo | 1.0.0 | 1.2.0 | [GO-2024-0001](https://pkg.go.dev/vuln/GO-2024-0001) |"
        ));
        assert!(output.contains("Injection \\| in parser"));
    }

    #[test]
    fn test_format_internal_dependencies() {
        let output = MarkdownFormatter::new().format(&report()).unwrap();

        assert!(output.contains("## Internal Dependencies"));
        assert!(output.contains("| github.com/acme/gone | v9.9.9 | fetch failed | version tag not found upstream |"));
        assert!(output.contains("| github.com/acme/foo | v1.0.0 | checked |"));
    }

    #[test]
    fn test_format_clean_report() {
        let mut clean = report();
        clean.packages.clear();
        clean.internal_dependencies.clear();
        clean.dropped_messages = 2;

        let output = MarkdownFormatter::new().format(&clean).unwrap();
        assert!(output.contains("No package in use is below a known fixed version."));
        assert!(!output.contains("## Internal Dependencies"));
        assert!(output.contains("2 malformed scanner message(s)"));
    }

    #[test]
    fn test_escape_markdown_table_cell() {
        assert_eq!(
            MarkdownFormatter::escape_markdown_table_cell("a|b\nc"),
            "a\\|b c"
        );
    }
}
