mod cli;

use cli::Args;
use govuln::adapters::outbound::console::StderrProgressReporter;
use govuln::adapters::outbound::filesystem::{FileSystemCacheStore, GoModReader};
use govuln::adapters::outbound::process::{
    CommandRunner, GitSourceFetcher, GovulncheckScanner, DEFAULT_SCANNER_BINARY,
    DEFAULT_TIMEOUT_SECS,
};
use govuln::application::dto::{AuditRequest, OutputFormat, StoreRequest, MIN_JOBS};
use govuln::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use govuln::application::use_cases::{AuditProjectUseCase, ManageStoreUseCase};
use govuln::audit::policies::StalenessPolicy;
use govuln::config::{self, ConfigFile};
use govuln::ports::inbound::{AuditPort, StoreMaintenancePort};
use govuln::shared::error::{AuditError, ExitCode};
use govuln::shared::Result;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    setup_logging(args.verbose, args.quiet);

    let exit_code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };
    process::exit(exit_code.as_i32());
}

/// Diagnostics go to stderr. `RUST_LOG` wins over `-v`/`-q`.
fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("govuln={}", level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

async fn run(args: Args) -> Result<ExitCode> {
    let project_path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));

    // Config file: explicit path, or discovered next to go.mod
    let config = load_config(&args, &project_path)?;

    let store_root = args
        .store
        .clone()
        .or_else(|| config.store_path.clone())
        .unwrap_or_else(FileSystemCacheStore::default_root);
    let store = FileSystemCacheStore::new(store_root);

    // Store maintenance does not need a project
    if args.store_info || args.store_clear {
        let request = if args.store_clear {
            StoreRequest::Clear
        } else {
            StoreRequest::Info
        };
        let report = ManageStoreUseCase::new(store).maintain(request)?;
        print!("{}", report.render());
        return Ok(ExitCode::Success);
    }

    validate_project_path(&project_path)?;

    let format = args.format.or(config.format).unwrap_or_default();
    let just_warn = args.just_warn || config.just_warn.unwrap_or(false);
    let request = build_request(&args, &config, project_path)?;

    let timeout = args
        .timeout
        .or(config.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let runner = CommandRunner::new(Duration::from_secs(timeout));
    let scanner_binary = config
        .scanner_binary
        .clone()
        .unwrap_or_else(|| DEFAULT_SCANNER_BINARY.to_string());

    // Create adapters (Dependency Injection)
    let progress_reporter = if args.quiet {
        StderrProgressReporter::quiet()
    } else {
        StderrProgressReporter::new()
    };
    let use_case = AuditProjectUseCase::new(
        GoModReader::new(),
        GovulncheckScanner::new(scanner_binary, runner.clone()),
        GitSourceFetcher::new(runner),
        store,
        progress_reporter,
    );

    let report = use_case.audit(request).await?;

    if !args.quiet {
        eprintln!("{}", FormatterFactory::progress_message(format));
    }
    let colored = format == OutputFormat::Table
        && args.output.is_none()
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();
    let formatted_output = FormatterFactory::create(format, colored).format(&report)?;

    PresenterFactory::create(PresenterType::from_output(args.output))
        .present(&formatted_output)?;

    if report.has_blocking_findings() && !just_warn {
        return Ok(ExitCode::VulnerabilitiesDetected);
    }
    Ok(ExitCode::Success)
}

fn load_config(args: &Args, project_path: &Path) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        let config = config::load_config_from_path(path)?;
        if !args.quiet {
            eprintln!("📄 Loaded config from: {}", path.display());
        }
        return Ok(config);
    }

    if !project_path.is_dir() {
        return Ok(ConfigFile::default());
    }
    match config::discover_config(project_path)? {
        Some(config) => {
            if !args.quiet {
                eprintln!(
                    "📄 Auto-discovered config file: {}",
                    project_path.join(config::CONFIG_FILENAME).display()
                );
            }
            Ok(config)
        }
        None => Ok(ConfigFile::default()),
    }
}

/// Merges CLI flags over config file values.
fn build_request(args: &Args, config: &ConfigFile, project_path: PathBuf) -> Result<AuditRequest> {
    let internal_owners = if args.internal_owners.is_empty() {
        config.internal_owners.clone().unwrap_or_default()
    } else {
        args.internal_owners.clone()
    };

    let staleness = match args.staleness_hours.or(config.staleness_hours) {
        Some(hours) => StalenessPolicy::from_hours(hours).map_err(|e| AuditError::InvalidConfig {
            message: e.to_string(),
        })?,
        None => StalenessPolicy::default(),
    };

    let jobs = args
        .jobs
        .map(|jobs| jobs as usize)
        .or(config.jobs)
        .unwrap_or(MIN_JOBS);

    let check_internal = !args.dont_check_subs && config.check_internal.unwrap_or(true);

    let now = chrono::Local::now().naive_local();
    Ok(AuditRequest::new(project_path, now)
        .with_internal_owners(internal_owners)
        .with_check_internal(check_internal)
        .with_staleness(staleness)
        .with_fetch_protocol(config.fetch_protocol.unwrap_or_default())
        .with_jobs(jobs))
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| AuditError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}
