use super::tool_output::ToolOutput;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// SourceFetcher port for checking out a repository at one tag
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Clones `remote_url` at `tag` into `destination`
    ///
    /// # Returns
    /// The exit status and combined output of the fetch tool
    ///
    /// # Errors
    /// Returns an error if the tool could not be started or timed out
    async fn fetch(&self, remote_url: &str, tag: &str, destination: &Path) -> Result<ToolOutput>;
}
