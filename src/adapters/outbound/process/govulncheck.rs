use super::command_runner::{CommandError, CommandRunner};
use crate::ports::outbound::{ToolOutput, VulnerabilityScanner};
use crate::shared::error::AuditError;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Default scanner binary name
pub const DEFAULT_SCANNER_BINARY: &str = "govulncheck";

/// Module installed when the scanner is missing
const SCANNER_PACKAGE: &str = "golang.org/x/vuln/cmd/govulncheck@latest";

/// GovulncheckScanner adapter running the `govulncheck` binary
pub struct GovulncheckScanner {
    binary: String,
    runner: CommandRunner,
}

impl GovulncheckScanner {
    pub fn new(binary: impl Into<String>, runner: CommandRunner) -> Self {
        Self {
            binary: binary.into(),
            runner,
        }
    }

    fn scan_command(&self, directory: &Path, json: bool) -> Command {
        let mut command = Command::new(&self.binary);
        if json {
            command.arg("-json");
        }
        command.arg("-C").arg(directory).arg("./...");
        command
    }

    async fn probe(&self) -> std::result::Result<ToolOutput, CommandError> {
        let mut command = Command::new(&self.binary);
        command.arg("-version");
        self.runner.run(command).await
    }

    async fn install(&self) -> Result<()> {
        let mut command = Command::new("go");
        command.args(["install", SCANNER_PACKAGE]);

        let unavailable = |details: String| AuditError::ToolUnavailable {
            tool: self.binary.clone(),
            details,
            hint: format!(
                "Install it manually with `go install {}` and make sure $(go env GOPATH)/bin is in PATH",
                SCANNER_PACKAGE
            ),
        };

        match self.runner.run(command).await {
            Ok(output) if output.success() => Ok(()),
            Ok(output) => Err(unavailable(format!(
                "`go install` exited with {:?}: {}",
                output.exit_code,
                output.output.trim()
            ))
            .into()),
            Err(e) => Err(unavailable(e.to_string()).into()),
        }
    }
}

impl Default for GovulncheckScanner {
    fn default() -> Self {
        Self::new(DEFAULT_SCANNER_BINARY, CommandRunner::default())
    }
}

#[async_trait]
impl VulnerabilityScanner for GovulncheckScanner {
    async fn ensure_available(&self) -> Result<()> {
        match self.probe().await {
            Ok(output) if output.success() => return Ok(()),
            Ok(output) => tracing::debug!(output = %output.output, "scanner probe failed"),
            Err(CommandError::NotFound { .. }) => {}
            Err(e) => {
                return Err(AuditError::ToolUnavailable {
                    tool: self.binary.clone(),
                    details: e.to_string(),
                    hint: "Check that the scanner binary can be executed".to_string(),
                }
                .into())
            }
        }

        eprintln!("📦 {} not found, installing {}...", self.binary, SCANNER_PACKAGE);
        self.install().await?;

        match self.probe().await {
            Ok(output) if output.success() => Ok(()),
            _ => Err(AuditError::ToolUnavailable {
                tool: self.binary.clone(),
                details: "installed, but still not runnable".to_string(),
                hint: "Add $(go env GOPATH)/bin to PATH".to_string(),
            }
            .into()),
        }
    }

    async fn scan_module_json(&self, project_dir: &Path) -> Result<ToolOutput> {
        Ok(self.runner.run(self.scan_command(project_dir, true)).await?)
    }

    async fn scan_source_text(&self, source_dir: &Path) -> Result<ToolOutput> {
        Ok(self.runner.run(self.scan_command(source_dir, false)).await?)
    }
}
