/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// stdout alone; machine-readable output is parsed from here
    pub stdout: String,
    /// stdout followed by stderr, for diagnostics and error matching
    pub output: String,
}

impl ToolOutput {
    /// Output of a command whose streams were not kept apart.
    pub fn new(exit_code: Option<i32>, output: impl Into<String>) -> Self {
        let output = output.into();
        Self {
            exit_code,
            stdout: output.clone(),
            output,
        }
    }

    pub fn from_streams(exit_code: Option<i32>, stdout: String, stderr: &str) -> Self {
        let mut output = stdout.clone();
        output.push_str(stderr);
        Self {
            exit_code,
            stdout,
            output,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
