use async_trait::async_trait;
use govuln::prelude::*;
use govuln::ports::outbound::ToolOutput;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock VulnerabilityScanner with canned output
///
/// The text report is chosen by the first registered suffix the scanned
/// directory ends with, falling back to a clean report.
#[derive(Clone)]
pub struct MockVulnerabilityScanner {
    json: ToolOutput,
    text_reports: Vec<(PathBuf, ToolOutput)>,
    scanned: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockVulnerabilityScanner {
    pub fn new(json_stream: &str) -> Self {
        Self {
            json: ToolOutput::new(Some(0), json_stream),
            text_reports: Vec::new(),
            scanned: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_text_report(mut self, suffix: &str, exit_code: i32, report: &str) -> Self {
        self.text_reports
            .push((PathBuf::from(suffix), ToolOutput::new(Some(exit_code), report)));
        self
    }

    pub fn scan_count(&self) -> usize {
        self.scanned.lock().unwrap().len()
    }
}

#[async_trait]
impl VulnerabilityScanner for MockVulnerabilityScanner {
    async fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    async fn scan_module_json(&self, _project_dir: &Path) -> Result<ToolOutput> {
        Ok(self.json.clone())
    }

    async fn scan_source_text(&self, source_dir: &Path) -> Result<ToolOutput> {
        self.scanned.lock().unwrap().push(source_dir.to_path_buf());
        let output = self
            .text_reports
            .iter()
            .find(|(suffix, _)| source_dir.ends_with(suffix))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| ToolOutput::new(Some(0), "No vulnerabilities found.\n"));
        Ok(output)
    }
}
