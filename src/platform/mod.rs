//! Host platform adapters.
//!
//! Everything that differs between POSIX and Windows hosts lives behind
//! [`PlatformAdapter`]: where an environment keeps its executables, how an
//! operator activates it, and how processes are queried and run. The
//! bootstrap engine is written once against this trait.

pub mod mock;
pub mod posix;
pub mod windows;

pub use mock::MockPlatform;
pub use posix::PosixAdapter;
pub use windows::WindowsAdapter;

use std::path::{Path, PathBuf};

use crate::bootstrap::context::{ExecutionContext, Invocation};
use crate::error::Result;
use crate::shell::{self, CommandResult, CommandSpec, OutputCallback, OutputHandling};

/// Where a child process's output goes.
pub enum RunOutput {
    /// Capture both streams for diagnostics.
    Capture,
    /// Let the child write straight to the terminal.
    Inherit,
    /// Capture both streams and forward each line to a callback.
    Stream(OutputCallback),
}

impl RunOutput {
    /// Pick the output routing for a step.
    pub fn for_step(shows_command_output: bool, callback: Option<OutputCallback>) -> Self {
        if shows_command_output {
            Self::Inherit
        } else if let Some(cb) = callback {
            Self::Stream(cb)
        } else {
            Self::Capture
        }
    }
}

impl std::fmt::Debug for RunOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Capture => write!(f, "Capture"),
            Self::Inherit => write!(f, "Inherit"),
            Self::Stream(_) => write!(f, "Stream(..)"),
        }
    }
}

/// Capabilities the bootstrap sequence needs from the host.
pub trait PlatformAdapter {
    /// Short platform name for display.
    fn name(&self) -> &'static str;

    /// Runtime executable name used when the config does not set one.
    fn default_runtime(&self) -> &'static str;

    /// Directory inside an environment that holds its executables.
    fn env_bin_dir(&self) -> &'static str;

    /// Path to executable `name` inside `dir`.
    fn executable(&self, dir: &Path, name: &str) -> PathBuf;

    /// Shell line an operator runs to activate the environment at `env_dir`.
    fn activation_command(&self, env_dir: &Path) -> String;

    /// Run `<program> --version`; `None` when it is absent or fails.
    fn query_version(&mut self, program: &str) -> Option<String>;

    /// Build the concrete command for `invocation` under `ctx`.
    fn build_command(&self, ctx: &ExecutionContext, invocation: &Invocation) -> CommandSpec {
        ctx.command_for(invocation)
    }

    /// Run a command to completion.
    ///
    /// `Err` means the process could not be started; a non-zero exit is
    /// an `Ok` result with `success == false`.
    fn run_command(&mut self, spec: &CommandSpec, output: RunOutput) -> Result<CommandResult>;
}

/// Adapter for the platform this binary was built for.
pub fn current() -> Box<dyn PlatformAdapter> {
    #[cfg(windows)]
    {
        Box::new(WindowsAdapter::new())
    }

    #[cfg(not(windows))]
    {
        Box::new(PosixAdapter::new())
    }
}

/// Run `spec` on the host, routing output as requested.
pub(crate) fn run_on_host(spec: &CommandSpec, output: RunOutput) -> Result<CommandResult> {
    match output {
        RunOutput::Capture => shell::execute(spec, OutputHandling::Capture),
        RunOutput::Inherit => shell::execute(spec, OutputHandling::Inherit),
        RunOutput::Stream(callback) => shell::execute_streaming(spec, callback),
    }
}
