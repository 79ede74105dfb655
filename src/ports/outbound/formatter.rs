use crate::application::dto::AuditReport;
use crate::shared::Result;

/// ReportFormatter port for rendering an audit report
///
/// This port abstracts the formatting logic for the different output
/// formats (table, Markdown, JSON).
pub trait ReportFormatter {
    /// # Errors
    /// Returns an error if formatting or serialization fails
    fn format(&self, report: &AuditReport) -> Result<String>;
}
