/// User-facing progress for an audit run.
///
/// Shown on stderr while the primary scan runs and while internal
/// dependencies are fetched and scanned. Diagnostics meant for debugging go
/// through `tracing` instead.
pub trait ProgressReporter {
    /// One-line status, e.g. "Scanning example.com/app..."
    fn report(&self, message: &str);

    /// Position within the internal dependency batch.
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// A non-fatal problem with one dependency (fetch or scan failure).
    fn report_error(&self, message: &str);

    fn report_completion(&self, message: &str);
}
