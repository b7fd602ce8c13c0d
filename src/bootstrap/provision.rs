//! Isolated environment provisioning for the legacy strategy.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::context::ExecutionContext;
use crate::config::ExistingEnvironment;
use crate::error::{BootstrapError, Result};
use crate::platform::{PlatformAdapter, RunOutput};
use crate::shell::{path_with_prepended, CommandSpec};

/// An environment on disk. basecamp never deletes one it did not just
/// fail to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentHandle {
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub interpreter: PathBuf,
    pub installer: PathBuf,
    /// The environment existed before this run.
    pub reused: bool,
}

impl EnvironmentHandle {
    /// Where an environment rooted at `root` keeps its binaries.
    pub fn planned(adapter: &dyn PlatformAdapter, root: &Path) -> Self {
        let bin_dir = root.join(adapter.env_bin_dir());
        Self {
            root: root.to_path_buf(),
            interpreter: adapter.executable(&bin_dir, "python"),
            installer: adapter.executable(&bin_dir, "pip"),
            bin_dir,
            reused: false,
        }
    }

    /// Marker file every finished environment has at its root.
    pub fn config_file(&self) -> PathBuf {
        self.root.join("pyvenv.cfg")
    }

    /// First file a complete environment would have that is missing here.
    pub fn missing_file(&self) -> Option<PathBuf> {
        [
            self.config_file(),
            self.interpreter.clone(),
            self.installer.clone(),
        ]
        .into_iter()
        .find(|path| !path.is_file())
    }

    /// Marker, interpreter and installer are all present.
    pub fn is_valid(&self) -> bool {
        self.missing_file().is_none()
    }

    /// `VIRTUAL_ENV` plus a `PATH` that finds the environment first.
    pub fn env_overlay(&self) -> BTreeMap<String, String> {
        let path = path_with_prepended(&self.bin_dir, std::env::var_os("PATH"));
        let mut overlay = BTreeMap::new();
        overlay.insert(
            "VIRTUAL_ENV".to_string(),
            self.root.to_string_lossy().into_owned(),
        );
        overlay.insert("PATH".to_string(), path.to_string_lossy().into_owned());
        overlay
    }

    /// Context that runs every later step inside this environment.
    pub fn context(&self, working_dir: &Path) -> ExecutionContext {
        ExecutionContext::legacy(self, working_dir, self.env_overlay())
    }
}

/// The command that creates an environment at `root`.
pub fn creation_command(runtime: &str, root: &Path, working_dir: &Path) -> CommandSpec {
    CommandSpec::new(runtime)
        .args([
            "-m".to_string(),
            "venv".to_string(),
            root.to_string_lossy().into_owned(),
        ])
        .current_dir(working_dir)
}

/// Create (or reuse) the environment at `root`.
///
/// A directory that did not exist before is removed again when creation
/// fails, so the project is left as it was found.
pub fn provision(
    adapter: &mut dyn PlatformAdapter,
    runtime: &str,
    root: &Path,
    working_dir: &Path,
    policy: ExistingEnvironment,
    output: RunOutput,
) -> Result<EnvironmentHandle> {
    let mut handle = EnvironmentHandle::planned(adapter, root);

    if root.exists() {
        return match policy {
            ExistingEnvironment::Reuse if handle.is_valid() => {
                tracing::info!(path = %root.display(), "reusing existing environment");
                handle.reused = true;
                Ok(handle)
            }
            ExistingEnvironment::Reuse => {
                tracing::info!(
                    path = %root.display(),
                    missing = ?handle.missing_file(),
                    "existing directory is not a complete environment"
                );
                Err(BootstrapError::EnvironmentPathOccupied {
                    path: root.to_path_buf(),
                    reason: "is not a complete environment".to_string(),
                })
            }
            ExistingEnvironment::Fail => Err(BootstrapError::EnvironmentPathOccupied {
                path: root.to_path_buf(),
                reason: "already exists and existing_environment is set to fail".to_string(),
            }),
        };
    }

    let spec = creation_command(runtime, root, working_dir);
    let result = adapter.run_command(&spec, output).map_err(|e| {
        rollback(root);
        BootstrapError::ProvisioningFailure {
            path: root.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    if !result.success {
        rollback(root);
        let output = result.combined_output();
        let message = match (result.exit_code, output.lines().last()) {
            (code, Some(last)) => format!("{} exited with {:?}: {}", spec, code, last),
            (code, None) => format!("{} exited with {:?}", spec, code),
        };
        return Err(BootstrapError::ProvisioningFailure {
            path: root.to_path_buf(),
            message,
        });
    }

    if let Some(missing) = handle.missing_file() {
        rollback(root);
        return Err(BootstrapError::ProvisioningFailure {
            path: root.to_path_buf(),
            message: format!("{} was not created", missing.display()),
        });
    }

    tracing::info!(path = %root.display(), "environment created");
    Ok(handle)
}

fn rollback(root: &Path) {
    if root.exists() {
        tracing::debug!(path = %root.display(), "removing partially created environment");
        if let Err(e) = std::fs::remove_dir_all(root) {
            tracing::warn!(path = %root.display(), error = %e, "could not remove partial environment");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::strategy::Strategy;
    use crate::platform::{MockPlatform, PosixAdapter, WindowsAdapter};
    use tempfile::TempDir;

    fn run(
        platform: &mut MockPlatform,
        root: &Path,
        working_dir: &Path,
        policy: ExistingEnvironment,
    ) -> Result<EnvironmentHandle> {
        provision(platform, "python3", root, working_dir, policy, RunOutput::Capture)
    }

    fn lay_out(root: &Path, files: &[&str]) {
        std::fs::create_dir_all(root.join("bin")).unwrap();
        for file in files {
            std::fs::write(root.join(file), "").unwrap();
        }
    }

    #[test]
    fn planned_layout_per_platform() {
        let posix = EnvironmentHandle::planned(&PosixAdapter::new(), Path::new("/p/venv"));
        assert_eq!(posix.installer, PathBuf::from("/p/venv/bin/pip"));

        let windows = EnvironmentHandle::planned(&WindowsAdapter::new(), Path::new("venv"));
        assert!(windows.bin_dir.ends_with("Scripts"));
        assert!(windows.interpreter.to_string_lossy().ends_with("python.exe"));
    }

    #[test]
    fn creates_environment() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        let mut platform = MockPlatform::new();

        let handle = run(&mut platform, &root, temp.path(), ExistingEnvironment::Reuse).unwrap();

        assert!(!handle.reused);
        assert!(handle.is_valid());
        assert_eq!(platform.commands().len(), 1);
        assert!(platform.commands()[0].has_args(&["-m", "venv"]));
    }

    #[test]
    fn failed_creation_removes_new_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        let mut platform = MockPlatform::new().fail_with("-m venv", "Permission denied");

        let err = run(&mut platform, &root, temp.path(), ExistingEnvironment::Reuse).unwrap_err();

        assert!(matches!(err, BootstrapError::ProvisioningFailure { .. }));
        assert!(err.to_string().contains("Permission denied"));
        assert!(!root.exists());
    }

    #[test]
    fn reuses_valid_environment_without_running_anything() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        lay_out(&root, &["pyvenv.cfg", "bin/python", "bin/pip"]);
        let mut platform = MockPlatform::new();

        let handle = run(&mut platform, &root, temp.path(), ExistingEnvironment::Reuse).unwrap();

        assert!(handle.reused);
        assert!(platform.commands().is_empty());
    }

    #[test]
    fn occupied_path_fails_fast_and_is_kept() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("notes.txt"), "mine").unwrap();
        let mut platform = MockPlatform::new();

        let err = run(&mut platform, &root, temp.path(), ExistingEnvironment::Reuse).unwrap_err();

        assert!(matches!(err, BootstrapError::EnvironmentPathOccupied { .. }));
        assert!(root.join("notes.txt").exists());
        assert!(platform.commands().is_empty());
    }

    #[test]
    fn fail_policy_rejects_even_valid_environment() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        lay_out(&root, &["pyvenv.cfg", "bin/python", "bin/pip"]);
        let mut platform = MockPlatform::new();

        let err = run(&mut platform, &root, temp.path(), ExistingEnvironment::Fail).unwrap_err();

        assert!(matches!(err, BootstrapError::EnvironmentPathOccupied { .. }));
        assert!(err.to_string().contains("existing_environment"));
        assert!(!err.to_string().contains("not a complete environment"));
        assert!(root.join("bin").join("python").exists());
    }

    #[test]
    fn interrupted_environment_is_not_reused() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        lay_out(&root, &["bin/python"]);
        let mut platform = MockPlatform::new();

        let err = run(&mut platform, &root, temp.path(), ExistingEnvironment::Reuse).unwrap_err();

        assert!(matches!(err, BootstrapError::EnvironmentPathOccupied { .. }));
        assert!(err.to_string().contains("not a complete environment"));
        assert!(platform.commands().is_empty());
    }

    #[test]
    fn environment_without_marker_is_incomplete() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        lay_out(&root, &["bin/python", "bin/pip"]);

        let handle = EnvironmentHandle::planned(&PosixAdapter::new(), &root);

        assert!(!handle.is_valid());
        assert_eq!(handle.missing_file(), Some(root.join("pyvenv.cfg")));
    }

    #[test]
    fn overlay_activates_environment() {
        let handle = EnvironmentHandle::planned(&PosixAdapter::new(), Path::new("/p/venv"));
        let overlay = handle.env_overlay();

        assert_eq!(overlay.get("VIRTUAL_ENV").map(String::as_str), Some("/p/venv"));
        let path = overlay.get("PATH").unwrap();
        let first = std::env::split_paths(path).next().unwrap();
        assert_eq!(first, PathBuf::from("/p/venv/bin"));

        let ctx = handle.context(Path::new("/p"));
        assert_eq!(ctx.strategy(), Strategy::LegacyVenv);
    }
}
