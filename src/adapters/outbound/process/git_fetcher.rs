use super::command_runner::CommandRunner;
use crate::ports::outbound::{SourceFetcher, ToolOutput};
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// GitSourceFetcher adapter cloning with the `git` binary
///
/// Runs `git clone --branch <tag> --depth 1 <url> <destination>` with
/// terminal prompts disabled, so a repository that needs credentials fails
/// instead of hanging until the timeout.
pub struct GitSourceFetcher {
    runner: CommandRunner,
}

impl GitSourceFetcher {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    fn clone_command(remote_url: &str, tag: &str, destination: &Path) -> Command {
        let mut command = Command::new("git");
        command
            .arg("clone")
            .args(["--branch", tag])
            .args(["--depth", "1"])
            .arg(remote_url)
            .arg(destination)
            .env("GIT_TERMINAL_PROMPT", "0");
        command
    }
}

#[async_trait]
impl SourceFetcher for GitSourceFetcher {
    async fn fetch(&self, remote_url: &str, tag: &str, destination: &Path) -> Result<ToolOutput> {
        let command = Self::clone_command(remote_url, tag, destination);
        Ok(self.runner.run(command).await?)
    }
}
