use clap::{ArgAction, Parser};
use govuln::application::dto::OutputFormat;
use std::path::PathBuf;

/// Audit a Go module for known vulnerabilities, including the source of
/// internally owned dependencies
#[derive(Parser, Debug)]
#[command(name = "govuln")]
#[command(version)]
#[command(about = "Audit a Go module for known vulnerabilities", long_about = None)]
pub struct Args {
    /// Report findings but always exit with status 0
    #[arg(long)]
    pub just_warn: bool,

    /// Organization whose modules are scanned from source.
    /// Repeatable or comma separated: --internal-owner acme,acme-labs
    #[arg(long = "internal-owner", value_name = "OWNER", value_delimiter = ',')]
    pub internal_owners: Vec<String>,

    /// Path to the Go module directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Directory holding cached scan results and checkouts (defaults to ~/.govuln)
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// List cached scan results and exit
    #[arg(long, conflicts_with = "store_clear")]
    pub store_info: bool,

    /// Remove every cached scan result and checkout, then exit
    #[arg(long)]
    pub store_clear: bool,

    /// Do not fetch or scan internal dependencies
    #[arg(long)]
    pub dont_check_subs: bool,

    /// Output format: table, markdown or json
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a config file (defaults to govuln.config.yml in the project directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Internal dependencies processed concurrently (1-8)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=8))]
    pub jobs: Option<u64>,

    /// Timeout in seconds for every fetch and scan command
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Hours after which a clean cached result is scanned again
    #[arg(long, value_name = "HOURS")]
    pub staleness_hours: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print errors and the report
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
