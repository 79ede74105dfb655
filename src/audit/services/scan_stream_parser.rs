use crate::audit::domain::{Finding, FindingSource, Sbom, ScannerMetadata, VersionKey};
use crate::shared::error::ScanParseError;
use serde::Deserialize;
use serde_json::Value;

/// One decoded top-level object of the scanner's JSON stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanMessage {
    Config(ScannerMetadata),
    Sbom(Sbom),
    Osv(OsvEntry),
    /// A message kind we do not use (`progress`, `finding`, ...)
    Other(String),
}

/// OSV advisory as embedded in the scanner stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OsvEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub affected: Vec<OsvAffected>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OsvAffected {
    pub package: OsvPackage,
    #[serde(default)]
    pub ranges: Vec<OsvRange>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OsvPackage {
    pub name: String,
    #[serde(default)]
    pub ecosystem: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OsvRange {
    #[serde(default)]
    pub events: Vec<OsvEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OsvEvent {
    #[serde(default)]
    pub introduced: Option<String>,
    #[serde(default)]
    pub fixed: Option<String>,
}

impl OsvEntry {
    /// One finding per affected package, carrying the lowest `introduced`
    /// and the highest `fixed` event across its ranges.
    pub fn findings(&self) -> Vec<Finding> {
        let summary = if self.summary.is_empty() {
            self.details.lines().next().unwrap_or_default().to_string()
        } else {
            self.summary.clone()
        };

        self.affected
            .iter()
            .map(|affected| {
                let events = affected.ranges.iter().flat_map(|r| r.events.iter());
                let introduced = events
                    .clone()
                    .filter_map(|e| e.introduced.as_deref())
                    .min_by_key(|v| VersionKey::parse(v));
                let fixed = events
                    .filter_map(|e| e.fixed.as_deref())
                    .max_by_key(|v| VersionKey::parse(v));

                let mut finding = Finding::new(
                    self.id.clone(),
                    summary.clone(),
                    affected.package.name.clone(),
                    FindingSource::PublicAdvisory,
                );
                if let Some(introduced) = introduced {
                    finding = finding.with_introduced(introduced);
                }
                if let Some(fixed) = fixed {
                    finding = finding.with_fixed(fixed);
                }
                finding
            })
            .collect()
    }
}

/// Everything the audit needs from one primary scan.
#[derive(Debug, Clone, Default)]
pub struct ParsedScan {
    pub metadata: Option<ScannerMetadata>,
    pub sbom: Option<Sbom>,
    pub findings: Vec<Finding>,
    /// Messages that failed to decode and were skipped
    pub dropped: usize,
}

/// Brace nesting of one JSON body, ignoring braces inside strings.
#[derive(Debug, Default)]
struct BraceDepth {
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl BraceDepth {
    /// Consumes one line; true once the outermost object has closed.
    fn feed(&mut self, line: &str) -> bool {
        for c in line.chars() {
            if self.in_string {
                match (self.escaped, c) {
                    (true, _) => self.escaped = false,
                    (false, '\\') => self.escaped = true,
                    (false, '"') => self.in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => self.in_string = true,
                '{' => self.depth += 1,
                '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }
}

/// ScanStreamParser - Decodes `govulncheck -json` output
///
/// The stream is a sequence of JSON objects, pretty-printed or one per
/// line, each opening with `{` at the start of a line. Every object has a
/// single key naming the message kind.
pub struct ScanStreamParser;

impl ScanStreamParser {
    /// Groups the raw output into top-level object bodies.
    ///
    /// A body closes as soon as its braces balance, so each object may span
    /// many lines or sit on one. Lines between objects (toolchain chatter
    /// such as `go: downloading ...`) are skipped.
    pub fn split_objects(output: &str) -> Vec<String> {
        let mut objects = Vec::new();
        let mut current: Option<(String, BraceDepth)> = None;

        for line in output.lines() {
            if line.starts_with('{') {
                if let Some((unterminated, _)) = current.take() {
                    objects.push(unterminated);
                }
                current = Some((String::new(), BraceDepth::default()));
            }
            let Some((body, depth)) = current.as_mut() else {
                if !line.trim().is_empty() {
                    tracing::trace!(line = %line, "skipping non-JSON scanner output");
                }
                continue;
            };
            body.push_str(line);
            body.push('\n');
            if depth.feed(line) {
                if let Some((done, _)) = current.take() {
                    objects.push(done);
                }
            }
        }
        if let Some((unterminated, _)) = current {
            objects.push(unterminated);
        }
        objects
    }

    /// Decodes a single top-level object.
    pub fn decode(body: &str) -> Result<ScanMessage, ScanParseError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| ScanParseError::MalformedMessage {
                details: e.to_string(),
            })?;

        let object = value
            .as_object()
            .ok_or_else(|| ScanParseError::MalformedMessage {
                details: "top-level value is not an object".to_string(),
            })?;

        let mut entries = object.iter();
        let (kind, payload) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(ScanParseError::MalformedMessage {
                    details: format!("expected exactly one key, found {}", object.len()),
                })
            }
        };

        let malformed = |e: serde_json::Error| ScanParseError::MalformedMessage {
            details: format!("invalid '{}' message: {}", kind, e),
        };

        match kind.as_str() {
            "config" => serde_json::from_value(payload.clone())
                .map(ScanMessage::Config)
                .map_err(malformed),
            "SBOM" => serde_json::from_value(payload.clone())
                .map(ScanMessage::Sbom)
                .map_err(malformed),
            "osv" => serde_json::from_value(payload.clone())
                .map(ScanMessage::Osv)
                .map_err(malformed),
            other => Ok(ScanMessage::Other(other.to_string())),
        }
    }

    pub fn parse(output: &str) -> Vec<Result<ScanMessage, ScanParseError>> {
        Self::split_objects(output)
            .iter()
            .map(|body| Self::decode(body))
            .collect()
    }

    /// Parses the stream and folds it into a [`ParsedScan`].
    ///
    /// Malformed messages are logged at debug level and counted.
    pub fn collect(output: &str) -> ParsedScan {
        let mut parsed = ParsedScan::default();

        for message in Self::parse(output) {
            match message {
                Ok(ScanMessage::Config(metadata)) => parsed.metadata = Some(metadata),
                Ok(ScanMessage::Sbom(sbom)) => parsed.sbom = Some(sbom),
                Ok(ScanMessage::Osv(entry)) => parsed.findings.extend(entry.findings()),
                Ok(ScanMessage::Other(_)) => {}
                Err(e) => {
                    tracing::debug!(error = %e, severity = ?e.severity(), "dropping scanner message");
                    parsed.dropped += 1;
                }
            }
        }
        parsed
    }
}
