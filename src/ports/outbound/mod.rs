/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, child processes, console).
pub mod cache_store;
pub mod formatter;
pub mod manifest_reader;
pub mod output_presenter;
pub mod progress_reporter;
pub mod source_fetcher;
pub mod tool_output;
pub mod vulnerability_scanner;

pub use cache_store::CacheStore;
pub use formatter::ReportFormatter;
pub use manifest_reader::ProjectManifestReader;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use source_fetcher::SourceFetcher;
pub use tool_output::ToolOutput;
pub use vulnerability_scanner::VulnerabilityScanner;
