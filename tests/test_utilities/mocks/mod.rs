/// Mock implementations for testing
mod mock_manifest_reader;
mod mock_progress_reporter;
mod mock_source_fetcher;
mod mock_vulnerability_scanner;

pub use mock_manifest_reader::MockManifestReader;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_source_fetcher::MockSourceFetcher;
pub use mock_vulnerability_scanner::MockVulnerabilityScanner;
