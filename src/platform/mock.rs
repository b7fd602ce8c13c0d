//! Scripted platform adapter for tests.
//!
//! `MockPlatform` answers version queries from a table, fails any command
//! whose rendered line contains a registered pattern, and records every
//! query and command in order.
//!
//! # Example
//!
//! ```
//! use basecamp::platform::{MockPlatform, PlatformAdapter, RunOutput};
//! use basecamp::shell::CommandSpec;
//!
//! let mut platform = MockPlatform::new()
//!     .with_version("python3", "Python 3.11.4")
//!     .fail_when("pip install");
//!
//! assert_eq!(platform.query_version("python3").as_deref(), Some("Python 3.11.4"));
//! assert!(platform.query_version("uv").is_none());
//!
//! let spec = CommandSpec::new("pip").args(["install", "-r", "requirements.txt"]);
//! let result = platform.run_command(&spec, RunOutput::Capture).unwrap();
//! assert!(!result.success);
//! assert!(platform.ran("pip install"));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{PlatformAdapter, PosixAdapter, RunOutput};
use crate::error::Result;
use crate::shell::{CommandResult, CommandSpec, OutputLine};

/// Platform adapter that never spawns a process.
#[derive(Debug, Default)]
pub struct MockPlatform {
    versions: HashMap<String, String>,
    failures: Vec<(String, String)>,
    queries: Vec<String>,
    commands: Vec<CommandSpec>,
    layout: PosixAdapter,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `<program> --version` with `output`.
    pub fn with_version(mut self, program: &str, output: &str) -> Self {
        self.versions.insert(program.to_string(), output.to_string());
        self
    }

    /// Fail any command whose rendered line contains `pattern`.
    pub fn fail_when(self, pattern: &str) -> Self {
        let stderr = format!("error: {} failed", pattern);
        self.fail_with(pattern, &stderr)
    }

    /// Fail any command containing `pattern`, writing `stderr`.
    pub fn fail_with(mut self, pattern: &str, stderr: &str) -> Self {
        self.failures
            .push((pattern.to_string(), stderr.to_string()));
        self
    }

    /// Programs whose version was queried, in order.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Commands run, in order.
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Rendered command lines, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.to_string()).collect()
    }

    /// Check whether any command line contains `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.commands.iter().any(|c| c.to_string().contains(pattern))
    }

    /// Index of the first command containing `pattern`.
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|c| c.to_string().contains(pattern))
    }

    fn failure_for(&self, line: &str) -> Option<&str> {
        self.failures
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, stderr)| stderr.as_str())
    }

    // `-m venv DIR` lays out an environment like the real module would, or
    // leaves a bare directory behind when it is scripted to fail.
    fn simulate_venv(&self, spec: &CommandSpec, failed: bool) {
        let Some(pos) = spec.args.iter().position(|a| a == "venv") else {
            return;
        };
        let Some(root) = spec.args.get(pos + 1) else {
            return;
        };
        let root = PathBuf::from(root);
        if failed {
            let _ = std::fs::create_dir_all(&root);
            return;
        }
        let bin = root.join(self.layout.env_bin_dir());
        if std::fs::create_dir_all(&bin).is_ok() {
            let _ = std::fs::write(
                root.join("pyvenv.cfg"),
                "include-system-site-packages = false\n",
            );
            for name in ["python", "pip"] {
                let _ = std::fs::write(self.layout.executable(&bin, name), "");
            }
        }
    }
}

impl PlatformAdapter for MockPlatform {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn default_runtime(&self) -> &'static str {
        self.layout.default_runtime()
    }

    fn env_bin_dir(&self) -> &'static str {
        self.layout.env_bin_dir()
    }

    fn executable(&self, dir: &Path, name: &str) -> PathBuf {
        self.layout.executable(dir, name)
    }

    fn activation_command(&self, env_dir: &Path) -> String {
        self.layout.activation_command(env_dir)
    }

    fn query_version(&mut self, program: &str) -> Option<String> {
        self.queries.push(program.to_string());
        self.versions.get(program).cloned()
    }

    fn run_command(&mut self, spec: &CommandSpec, output: RunOutput) -> Result<CommandResult> {
        self.commands.push(spec.clone());
        let line = spec.to_string();
        let failure = self.failure_for(&line).map(|s| s.to_string());

        if spec.has_args(&["-m", "venv"]) {
            self.simulate_venv(spec, failure.is_some());
        }

        match failure {
            Some(stderr) => {
                if let RunOutput::Stream(callback) = &output {
                    callback(OutputLine::Stderr(stderr.clone()));
                }
                Ok(CommandResult::failure(
                    Some(1),
                    String::new(),
                    stderr,
                    Duration::ZERO,
                ))
            }
            None => {
                let stdout = format!("ok: {}", line);
                if let RunOutput::Stream(callback) = &output {
                    callback(OutputLine::Stdout(stdout.clone()));
                }
                Ok(CommandResult::success(stdout, String::new(), Duration::ZERO))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn records_queries_in_order() {
        let mut platform = MockPlatform::new().with_version("uv", "uv 0.4.0");
        platform.query_version("python3");
        platform.query_version("uv");
        assert_eq!(platform.queries(), &["python3", "uv"]);
    }

    #[test]
    fn scripted_failure_carries_stderr() {
        let mut platform = MockPlatform::new().fail_with("spacy download", "404 not found");
        let spec = CommandSpec::new("python").args(["-m", "spacy", "download", "en_core_web_lg"]);
        let result = platform.run_command(&spec, RunOutput::Capture).unwrap();
        assert!(!result.success);
        assert_eq!(result.stderr, "404 not found");
    }

    #[test]
    fn venv_creation_lays_out_environment() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        let mut platform = MockPlatform::new();
        let spec = CommandSpec::new("python3").args(["-m", "venv", root.to_str().unwrap()]);
        platform.run_command(&spec, RunOutput::Capture).unwrap();
        assert!(root.join("bin").join("python").is_file());
        assert!(root.join("bin").join("pip").is_file());
        assert!(root.join("pyvenv.cfg").is_file());
    }

    #[test]
    fn failed_venv_leaves_partial_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        let mut platform = MockPlatform::new().fail_when("-m venv");
        let spec = CommandSpec::new("python3").args(["-m", "venv", root.to_str().unwrap()]);
        let result = platform.run_command(&spec, RunOutput::Capture).unwrap();
        assert!(!result.success);
        assert!(root.is_dir());
        assert!(!root.join("bin").exists());
    }

    #[test]
    fn streams_output_to_callback() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = Box::new(move |line: OutputLine| {
            if let OutputLine::Stdout(s) = line {
                sink.lock().unwrap().push(s);
            }
        });

        let mut platform = MockPlatform::new();
        platform
            .run_command(&CommandSpec::new("uv").args(["sync"]), RunOutput::Stream(callback))
            .unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), &["ok: uv sync"]);
    }
}
