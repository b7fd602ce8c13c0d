//! Windows adapter.

use std::path::{Path, PathBuf};

use super::{run_on_host, PlatformAdapter, RunOutput};
use crate::error::Result;
use crate::shell::{self, CommandResult, CommandSpec};

/// Adapter for Windows hosts: `python`, `Scripts\`, `.exe` executables.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsAdapter;

impl WindowsAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformAdapter for WindowsAdapter {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn default_runtime(&self) -> &'static str {
        "python"
    }

    fn env_bin_dir(&self) -> &'static str {
        "Scripts"
    }

    fn executable(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.exe", name))
    }

    // Always backslashes, whatever separator the path was written with.
    fn activation_command(&self, env_dir: &Path) -> String {
        let dir = env_dir.to_string_lossy().replace('/', "\\");
        format!("{}\\{}\\activate", dir.trim_end_matches('\\'), self.env_bin_dir())
    }

    fn query_version(&mut self, program: &str) -> Option<String> {
        shell::version_output(program)
    }

    fn run_command(&mut self, spec: &CommandSpec, output: RunOutput) -> Result<CommandResult> {
        run_on_host(spec, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_layout() {
        let adapter = WindowsAdapter::new();
        assert_eq!(adapter.default_runtime(), "python");
        assert_eq!(adapter.env_bin_dir(), "Scripts");
        assert!(adapter
            .executable(Path::new("venv"), "python")
            .to_string_lossy()
            .ends_with("python.exe"));
    }

    #[test]
    fn windows_activation_line() {
        let adapter = WindowsAdapter::new();
        assert_eq!(
            adapter.activation_command(Path::new("venv")),
            "venv\\Scripts\\activate"
        );
        assert_eq!(
            adapter.activation_command(Path::new("envs/app")),
            "envs\\app\\Scripts\\activate"
        );
    }
}
