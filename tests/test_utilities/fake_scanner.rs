/// A stand-in scanner binary for end-to-end runs of the CLI
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Shell script answering `-version`, `-json` and text scans with canned
/// output. The JSON stream is read from a file next to the script and is
/// followed by toolchain chatter on stderr, as a real scan produces.
pub struct FakeScanner {
    dir: TempDir,
}

impl FakeScanner {
    pub fn new(json_stream: &str) -> Self {
        Self::with_json_exit(json_stream, 0)
    }

    /// A scanner whose `-json` run fails with `exit_code`
    pub fn failing(message: &str, exit_code: i32) -> Self {
        Self::with_json_exit(message, exit_code)
    }

    fn with_json_exit(json_output: &str, exit_code: i32) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("stream.json"), json_output).unwrap();

        let script = format!(
            r#"#!/bin/sh
dir="$(dirname "$0")"
case "$1" in
  -version)
    echo "Go: go1.22.1"
    echo "Scanner: govulncheck@v1.1.3"
    exit 0
    ;;
  -json)
    cat "$dir/stream.json"
    echo "go: downloading golang.org/x/net v0.15.0" >&2
    exit {}
    ;;
  *)
    echo "No vulnerabilities found."
    exit 0
    ;;
esac
"#,
            exit_code
        );
        let path = dir.path().join("govulncheck");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("govulncheck")
    }
}

/// Writes `go.mod` plus a `govuln.config.yml` pointing at `scanner`.
pub fn create_project(dir: &Path, scanner: &FakeScanner, extra_config: &str) {
    fs::write(dir.join("go.mod"), "module example.com/app\n\ngo 1.22\n").unwrap();
    fs::write(
        dir.join("govuln.config.yml"),
        format!(
            "scanner_binary: \"{}\"\n{}",
            scanner.path().display(),
            extra_config
        ),
    )
    .unwrap();
}
