use async_trait::async_trait;
use govuln::prelude::*;
use govuln::ports::outbound::ToolOutput;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock SourceFetcher that behaves like a shallow clone
///
/// A successful fetch creates `<destination>/.git`. Tags registered with
/// [`MockSourceFetcher::with_missing_tag`] fail the way git reports an
/// unknown branch.
#[derive(Default, Clone)]
pub struct MockSourceFetcher {
    missing_tags: HashSet<String>,
    delay: Option<Duration>,
    fetched: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockSourceFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_tag(mut self, tag: &str) -> Self {
        self.missing_tags.insert(tag.to_string());
        self
    }

    /// Holds every fetch open for `delay`, widening race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }

    pub fn fetched(&self) -> Vec<PathBuf> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceFetcher for MockSourceFetcher {
    async fn fetch(&self, _remote_url: &str, tag: &str, destination: &Path) -> Result<ToolOutput> {
        self.fetched.lock().unwrap().push(destination.to_path_buf());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        std::fs::create_dir_all(destination)?;
        if self.missing_tags.contains(tag) {
            return Ok(ToolOutput::new(
                Some(128),
                format!(
                    "Cloning into '{}'...\nwarning: Could not find remote branch {} to clone.\nfatal: Remote branch {} not found in upstream origin\n",
                    destination.display(),
                    tag,
                    tag
                ),
            ));
        }

        std::fs::create_dir_all(destination.join(".git"))?;
        Ok(ToolOutput::new(
            Some(0),
            format!("Cloning into '{}'...\n", destination.display()),
        ))
    }
}
