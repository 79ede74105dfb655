/// Process adapters wrapping external command-line tools
mod command_runner;
mod git_fetcher;
mod govulncheck;

pub use command_runner::{CommandError, CommandRunner, DEFAULT_TIMEOUT_SECS};
pub use git_fetcher::GitSourceFetcher;
pub use govulncheck::{GovulncheckScanner, DEFAULT_SCANNER_BINARY};
