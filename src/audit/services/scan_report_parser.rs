use crate::audit::domain::CachedVulnerability;
use crate::shared::error::ScanParseError;

const VULNERABILITY_MARKER: &str = "Vulnerability #";
const FIXED_IN_MARKER: &str = "Fixed in:";

/// A block between its marker line and its `Fixed in:` line.
struct OpenBlock {
    line: usize,
    code: String,
    description: Option<String>,
}

/// ScanReportParser - Extracts vulnerabilities from the scanner's text report
///
/// A block looks like:
///
/// ```text
/// Vulnerability #1: GO-2024-2687
///     HTTP/2 CONTINUATION flood in net/http
///   More info: https://pkg.go.dev/vuln/GO-2024-2687
///   Module: golang.org/x/net
///     Found in: golang.org/x/net@v0.21.0
///     Fixed in: golang.org/x/net@v0.23.0
/// ```
///
/// The line after the marker is the description; the block closes at the
/// first `Fixed in:` line.
pub struct ScanReportParser;

impl ScanReportParser {
    pub fn parse(report: &str) -> Vec<Result<CachedVulnerability, ScanParseError>> {
        let mut results = Vec::new();
        let mut open: Option<OpenBlock> = None;

        for (index, raw_line) in report.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.trim();

            if line.starts_with(VULNERABILITY_MARKER) {
                if let Some(block) = open.take() {
                    results.push(Err(ScanParseError::MalformedBlock {
                        line: block.line,
                        reason: format!("{} has no '{}' line", block.code, FIXED_IN_MARKER),
                    }));
                }
                match line.split_once(": ").map(|(_, code)| code.trim()) {
                    Some(code) if !code.is_empty() => {
                        open = Some(OpenBlock {
                            line: line_no,
                            code: code.to_string(),
                            description: None,
                        });
                    }
                    _ => results.push(Err(ScanParseError::MalformedBlock {
                        line: line_no,
                        reason: "vulnerability marker without an identifier".to_string(),
                    })),
                }
                continue;
            }

            let Some(block) = open.as_mut() else {
                continue;
            };

            if block.description.is_none() {
                block.description = Some(line.to_string());
                continue;
            }

            if line.starts_with(FIXED_IN_MARKER) {
                let fixed_in = line
                    .split_once(": ")
                    .map(|(_, value)| value.trim())
                    .unwrap_or_default();
                let result = match open.take() {
                    Some(block) if !fixed_in.is_empty() => Ok(CachedVulnerability::new(
                        block.code,
                        block.description.unwrap_or_default(),
                        fixed_in,
                    )),
                    Some(block) => Err(ScanParseError::MalformedBlock {
                        line: line_no,
                        reason: format!("{} has an empty '{}' value", block.code, FIXED_IN_MARKER),
                    }),
                    None => continue,
                };
                results.push(result);
            }
        }

        if let Some(block) = open {
            results.push(Err(ScanParseError::MalformedBlock {
                line: block.line,
                reason: format!("{} has no '{}' line", block.code, FIXED_IN_MARKER),
            }));
        }
        results
    }

    /// Well-formed entries only; malformed blocks are logged and dropped.
    pub fn vulnerabilities(report: &str) -> Vec<CachedVulnerability> {
        Self::parse(report)
            .into_iter()
            .filter_map(|result| match result {
                Ok(vulnerability) => Some(vulnerability),
                Err(e) => {
                    tracing::debug!(error = %e, severity = ?e.severity(), "dropping vulnerability block");
                    None
                }
            })
            .collect()
    }
}
