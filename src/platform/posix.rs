//! POSIX (Linux, macOS, BSD) adapter.

use std::path::{Path, PathBuf};

use super::{run_on_host, PlatformAdapter, RunOutput};
use crate::error::Result;
use crate::shell::{self, CommandResult, CommandSpec};

/// Adapter for POSIX hosts: `python3`, `bin/`, `source …/activate`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixAdapter;

impl PosixAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformAdapter for PosixAdapter {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn default_runtime(&self) -> &'static str {
        "python3"
    }

    fn env_bin_dir(&self) -> &'static str {
        "bin"
    }

    fn executable(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(name)
    }

    fn activation_command(&self, env_dir: &Path) -> String {
        format!(
            "source {}",
            env_dir.join(self.env_bin_dir()).join("activate").display()
        )
    }

    fn query_version(&mut self, program: &str) -> Option<String> {
        shell::version_output(program)
    }

    fn run_command(&mut self, spec: &CommandSpec, output: RunOutput) -> Result<CommandResult> {
        run_on_host(spec, output)
    }
}
