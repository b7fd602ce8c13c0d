//! Process execution.

use crate::error::{BootstrapError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// A fully-resolved command: program, arguments, environment overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    /// Program to run (bare name resolved via PATH, or an absolute path).
    pub program: PathBuf,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Environment variables set on top of the inherited environment.
    pub env: BTreeMap<String, String>,

    /// Working directory.
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a spec for `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Merge an environment overlay.
    pub fn envs(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Check whether the arguments contain `needle` as a contiguous run.
    pub fn has_args(&self, needle: &[&str]) -> bool {
        !needle.is_empty()
            && self
                .args
                .windows(needle.len())
                .any(|w| w.iter().zip(needle).all(|(a, b)| a == b))
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    /// Render as a copy-pasteable command line (env overlay omitted).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(part: &str) -> String {
    if part.is_empty() || part.contains(char::is_whitespace) || part.contains('"') {
        format!("\"{}\"", part.replace('"', "\\\""))
    } else {
        part.to_string()
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty when inherited).
    pub stdout: String,

    /// Standard error (empty when inherited).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Combined output, stderr last, for diagnostics.
    pub fn combined_output(&self) -> String {
        match (self.stdout.trim(), self.stderr.trim()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }
}

/// How child output is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputHandling {
    /// Capture stdout and stderr.
    #[default]
    Capture,
    /// Let the child write straight to the terminal.
    Inherit,
}

/// Output line from command execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

/// Execute a command, blocking until it exits.
///
/// Returns `Err` only when the process could not be started; a non-zero
/// exit is reported through [`CommandResult::success`].
pub fn execute(spec: &CommandSpec, handling: OutputHandling) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = spec.to_command();

    tracing::debug!(command = %spec, "spawning");

    match handling {
        OutputHandling::Capture => {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        }
        OutputHandling::Inherit => {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }
    }
    cmd.stdin(Stdio::null());

    let output = cmd.output().map_err(|e| BootstrapError::SpawnFailed {
        command: spec.to_string(),
        message: e.to_string(),
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    tracing::debug!(command = %spec, code = ?output.status.code(), "exited");

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Execute a command with streaming output.
///
/// Output is both captured and forwarded line by line to `callback`.
pub fn execute_streaming(spec: &CommandSpec, callback: OutputCallback) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = spec.to_command();

    tracing::debug!(command = %spec, "spawning (streaming)");

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let spawn_failed = |message: String| BootstrapError::SpawnFailed {
        command: spec.to_string(),
        message,
    };

    let mut child = cmd.spawn().map_err(|e| spawn_failed(e.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| spawn_failed("stdout was not captured".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| spawn_failed("stderr was not captured".into()))?;

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle =
        thread::spawn(move || forward_lines(stdout, tx_stdout, OutputLine::Stdout));

    let stderr_handle =
        thread::spawn(move || forward_lines(stderr, tx_stderr, OutputLine::Stderr));

    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|e| spawn_failed(e.to_string()))?;
    let duration = start.elapsed();

    tracing::debug!(command = %spec, code = ?status.code(), "exited");

    if status.success() {
        Ok(CommandResult::success(
            stdout_output,
            stderr_output,
            duration,
        ))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}

/// Drain `pipe` to EOF, forwarding each line and returning all of them.
///
/// Bytes that are not UTF-8 are replaced rather than ending the read, so
/// the child never sees a closed pipe.
fn forward_lines<R: Read>(
    pipe: R,
    tx: mpsc::Sender<OutputLine>,
    wrap: fn(String) -> OutputLine,
) -> String {
    let mut reader = BufReader::new(pipe);
    let mut output = String::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                output.push_str(&line);
                output.push('\n');
                let _ = tx.send(wrap(line));
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!(error = %e, "stopped reading child output");
                break;
            }
        }
    }
    output
}

/// Run `<program> --version` and return its combined output.
///
/// Returns `None` when the program cannot be started or exits non-zero.
/// Older interpreters print their version to stderr, so both streams count.
pub fn version_output(program: &str) -> Option<String> {
    let spec = CommandSpec::new(program).args(["--version"]);
    match execute(&spec, OutputHandling::Capture) {
        Ok(result) if result.success => Some(result.combined_output()),
        Ok(result) => {
            tracing::debug!(program, code = ?result.exit_code, "version query failed");
            None
        }
        Err(e) => {
            tracing::debug!(program, error = %e, "version query could not start");
            None
        }
    }
}
