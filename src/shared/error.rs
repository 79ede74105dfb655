use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems and pre-commit hooks to distinguish between
/// different types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no blocking findings, or warn-only mode
    Success = 0,
    /// Affected packages were detected and the run is in blocking mode
    VulnerabilitiesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Fatal error (missing go.mod, scanner unavailable, primary scan failed, ...)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::VulnerabilitiesDetected => write!(f, "Vulnerabilities Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Whether an error stops the whole run or only degrades one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort the run before (or instead of) printing a report
    Fatal,
    /// Drop the affected unit (message, block, dependency) and continue
    Recoverable,
}

/// Run-level errors for the audit.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// keeping the hint-style messages users see on stderr.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("go.mod file not found: {path}\n\n💡 Hint: {suggestion}")]
    ManifestNotFound { path: PathBuf, suggestion: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid Go module directory with --path")]
    InvalidProjectPath { path: PathBuf, reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("{tool} is not available\nDetails: {details}\n\n💡 Hint: {hint}")]
    ToolUnavailable {
        tool: String,
        details: String,
        hint: String,
    },

    #[error("Vulnerability scan of {path} failed\nDetails: {details}")]
    PrimaryScanFailed { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },
}

impl AuditError {
    /// Every run-level error aborts the audit.
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

/// Errors raised by the persisted cache of internal scan results.
///
/// Neither variant is allowed to stop the audit: a corrupt record is replaced
/// by a fresh one and a failed write only costs a re-scan on the next run.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache record {path} is corrupt: {details}")]
    Corrupt { path: PathBuf, details: String },

    #[error("Failed to write cache record {path}: {details}")]
    Write { path: PathBuf, details: String },
}

impl CacheError {
    pub fn severity(&self) -> Severity {
        Severity::Recoverable
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            CacheError::Corrupt { path, .. } | CacheError::Write { path, .. } => path,
        }
    }
}

/// A unit of scanner output that could not be decoded.
///
/// Raised per JSON message or per text report block; the unit is dropped
/// and the rest of the output is still used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanParseError {
    #[error("Malformed scanner message: {details}")]
    MalformedMessage { details: String },

    #[error("Malformed vulnerability block at line {line}: {reason}")]
    MalformedBlock { line: usize, reason: String },
}

impl ScanParseError {
    pub fn severity(&self) -> Severity {
        Severity::Recoverable
    }
}
