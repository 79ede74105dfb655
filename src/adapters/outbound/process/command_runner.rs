use crate::ports::outbound::ToolOutput;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Default per-command timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{program} was not found in PATH")]
    NotFound { program: String },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {seconds}s and was killed")]
    TimedOut { program: String, seconds: u64 },
}

/// CommandRunner - Runs an external command under a timeout
///
/// stdin is closed, stdout and stderr are captured separately. When
/// the timeout expires the child is killed.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn run(&self, mut command: Command) -> Result<ToolOutput, CommandError> {
        let program = command
            .as_std()
            .get_program()
            .to_string_lossy()
            .into_owned();
        tracing::debug!(command = ?command.as_std(), "running external command");

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(CommandError::NotFound { program })
            }
            Ok(Err(source)) => return Err(CommandError::Spawn { program, source }),
            Err(_) => {
                return Err(CommandError::TimedOut {
                    program,
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        tracing::debug!(program = %program, exit_code = ?output.status.code(), "command finished");
        Ok(ToolOutput::from_streams(
            output.status.code(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            &String::from_utf8_lossy(&output.stderr),
        ))
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}
