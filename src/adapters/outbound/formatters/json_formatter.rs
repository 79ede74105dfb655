use crate::application::dto::AuditReport;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    blocking: bool,
    #[serde(flatten)]
    report: &'a AuditReport,
}

/// JsonFormatter adapter for machine-readable reports
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        let document = JsonReport {
            blocking: report.has_blocking_findings(),
            report,
        };
        let mut json = serde_json::to_string_pretty(&document)
            .map_err(|e| anyhow::anyhow!("Failed to serialize report: {}", e))?;
        json.push('\n');
        Ok(json)
    }
}
