use crate::application::dto::AuditReport;
use crate::audit::domain::{AggregatedPackageStatus, InternalScanResult};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use owo_colors::OwoColorize;

/// Spaces between table columns
const COLUMN_GAP: usize = 2;

/// TableFormatter adapter for terminal output
///
/// Renders aligned plain-text tables. Colours are only emitted when
/// `colored` is set, which the caller decides from the output target.
pub struct TableFormatter {
    colored: bool,
}

impl TableFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn paint_alert(&self, text: &str) -> String {
        if self.colored {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_ok(&self, text: &str) -> String {
        if self.colored {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_dim(&self, text: &str) -> String {
        if self.colored {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Left-aligns each cell to its column's widest value.
///
/// Widths are measured before colouring so escape sequences never skew the
/// alignment; the last column is not padded.
fn render_rows(header: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: Vec<&str>| -> String {
        let last = cells.len().saturating_sub(1);
        let mut line = String::from("  ");
        for (index, cell) in cells.into_iter().enumerate() {
            line.push_str(cell);
            if index < last {
                let padding = widths[index] - cell.chars().count() + COLUMN_GAP;
                line.push_str(&" ".repeat(padding));
            }
        }
        line
    };

    let mut lines = vec![render(header.to_vec())];
    for row in rows {
        lines.push(render(row.iter().map(String::as_str).collect()));
    }
    lines
}

/// Helper methods for rendering sections
impl TableFormatter {
    fn render_header(&self, output: &mut String, report: &AuditReport) {
        output.push_str(&format!("Module:  {}\n", report.module_path));
        if let Some(go_version) = &report.go_version {
            output.push_str(&format!("Go:      {}\n", go_version));
        }
        if let (Some(name), Some(version)) =
            (&report.scanner.scanner_name, &report.scanner.scanner_version)
        {
            let db = report
                .scanner
                .db
                .as_deref()
                .map(|db| format!(" ({})", db))
                .unwrap_or_default();
            output.push_str(&format!("Scanner: {} {}{}\n", name, version, db));
        }
        output.push('\n');
    }

    fn render_packages(&self, output: &mut String, packages: &[AggregatedPackageStatus]) {
        if packages.is_empty() {
            output.push_str(&self.paint_ok("No package in use is below a known fixed version."));
            output.push_str("\n\n");
            return;
        }

        output.push_str(&self.paint_alert(&format!("Affected packages ({})", packages.len())));
        output.push('\n');

        let rows: Vec<Vec<String>> = packages
            .iter()
            .map(|status| {
                vec![
                    status.package.clone(),
                    status.current_version.to_string(),
                    status.fixed_version.to_string(),
                    status.advisory_ids().join(", "),
                ]
            })
            .collect();
        let lines = render_rows(&["PACKAGE", "CURRENT", "FIXED", "ADVISORIES"], &rows);
        output.push_str(&self.paint_dim(&lines[0]));
        output.push('\n');
        for line in &lines[1..] {
            output.push_str(line);
            output.push('\n');
        }
        output.push('\n');
    }

    fn render_internal(&self, output: &mut String, results: &[InternalScanResult]) {
        if results.is_empty() {
            return;
        }

        output.push_str(&format!("Internal dependencies ({})\n", results.len()));

        let rows: Vec<Vec<String>> = results
            .iter()
            .map(|result| {
                let detail = match result.outcome.failure_reason() {
                    Some(reason) => reason.to_string(),
                    None => result
                        .outcome
                        .vulnerabilities()
                        .iter()
                        .map(|v| v.code.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                };
                vec![
                    result.module.clone(),
                    result.version.clone(),
                    result.outcome.label().to_string(),
                    detail,
                ]
            })
            .collect();
        let lines = render_rows(&["MODULE", "VERSION", "STATUS", "DETAILS"], &rows);
        output.push_str(&self.paint_dim(&lines[0]));
        output.push('\n');
        for (line, result) in lines[1..].iter().zip(results) {
            if result.outcome.is_failure() {
                output.push_str(&self.paint_alert(line));
            } else {
                output.push_str(line);
            }
            output.push('\n');
        }
        output.push('\n');
    }
}

impl ReportFormatter for TableFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        let mut output = String::new();
        self.render_header(&mut output, report);
        self.render_packages(&mut output, &report.packages);
        self.render_internal(&mut output, &report.internal_dependencies);
        if report.dropped_messages > 0 {
            output.push_str(&format!(
                "{} malformed scanner message(s) were skipped.\n",
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
        Dependency, Finding, FindingSource, InternalScanOutcome, ScannerMetadata, VersionKey,
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
            packages: vec![
                AggregatedPackageStatus {
                    package: "golang.org/x/net".to_string(),
                    current_version: VersionKey::parse("v0.15.0"),
                    fixed_version: VersionKey::parse("v0.17.0"),
                    findings: vec![Finding::new(
                        "GO-2023-2102",
                        "HTTP/2 rapid reset",
                        "golang.org/x/net",
                        FindingSource::PublicAdvisory,
                    )
                    .with_fixed("v0.17.0")],
                },
                AggregatedPackageStatus {
                    package: "stdlib".to_string(),
                    current_version: VersionKey::parse("go1.22.1"),
                    fixed_version: VersionKey::parse("go1.22.2"),
                    findings: vec![],
                },
            ],
            internal_dependencies: vec![InternalScanResult::new(
                &Dependency::new("github.com/acme/foo", "v1.0.0"),
                InternalScanOutcome::ScanFailed {
                    reason: "scanner exited with status 1".to_string(),
                },
            )],
            dropped_messages: 0,
        }
    }

    #[test]
    fn test_columns_are_aligned() {
        let output = TableFormatter::new(false).format(&report()).unwrap();

        assert!(output.contains("Module:  example.com/app\n"));
        assert!(output.contains("Scanner: govulncheck v1.1.3 (https://vuln.go.dev)\n"));
        assert!(output.contains("Affected packages (2)\n"));
        assert!(output.contains("  PACKAGE           CURRENT  FIXED   ADVISORIES\n"));
        assert!(output.contains("  golang.org/x/net  0.15.0   0.17.0  GO-2023-2102\n"));
        assert!(output.contains("  stdlib            1.22.1   1.22.2  \n"));
    }

    #[test]
    fn test_internal_failures_listed() {
        let output = TableFormatter::new(false).format(&report()).unwrap();

        assert!(output.contains("Internal dependencies (1)\n"));
        assert!(output.contains(
            "  github.com/acme/foo  v1.0.0   scan failed  scanner exited with status 1\n"
        ));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let output = TableFormatter::new(false).format(&report()).unwrap();
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_colored_output_highlights_alerts() {
        let output = TableFormatter::new(true).format(&report()).unwrap();
        assert!(output.contains('\u{1b}'));
    }

    #[test]
    fn test_clean_report() {
        let mut clean = report();
        clean.packages.clear();
        clean.internal_dependencies.clear();

        let output = TableFormatter::new(false).format(&clean).unwrap();
        assert!(output.contains("No package in use is below a known fixed version."));
        assert!(!output.contains("Internal dependencies"));
    }
}
