//! Dependency installation.

use std::path::{Path, PathBuf};

use super::context::{ExecutionContext, Invocation};
use super::outcome::{StepFailure, StepResult};
use super::strategy::Strategy;
use crate::config::BasecampConfig;
use crate::error::{BootstrapError, Result};
use crate::platform::{PlatformAdapter, RunOutput};
use crate::shell::{CommandResult, CommandSpec};

/// Manifest the strategy installs from, relative to the project root.
pub fn manifest_for(strategy: Strategy, config: &BasecampConfig) -> &Path {
    match strategy {
        Strategy::Unified => &config.project_manifest,
        Strategy::LegacyVenv => &config.requirements_file,
    }
}

/// The install command, or `ManifestMissing` when the manifest is absent.
pub fn install_command(
    adapter: &dyn PlatformAdapter,
    ctx: &ExecutionContext,
    config: &BasecampConfig,
) -> Result<CommandSpec> {
    let manifest = manifest_for(ctx.strategy(), config);
    let full: PathBuf = ctx.working_dir().join(manifest);
    if !full.is_file() {
        return Err(BootstrapError::ManifestMissing { path: full });
    }
    Ok(adapter.build_command(
        ctx,
        &Invocation::InstallDependencies {
            manifest: manifest.to_path_buf(),
        },
    ))
}

/// Install dependencies. A non-zero exit is an `InstallationFailure`
/// naming the command, with the captured output attached.
pub fn install(
    adapter: &mut dyn PlatformAdapter,
    ctx: &ExecutionContext,
    config: &BasecampConfig,
    output: RunOutput,
) -> StepResult<CommandResult> {
    let spec = install_command(adapter, ctx, config)?;
    let result = adapter.run_command(&spec, output)?;
    if result.success {
        Ok(result)
    } else {
        Err(StepFailure::with_output(
            BootstrapError::InstallationFailure {
                step: "dependencies".to_string(),
                command: spec.to_string(),
                code: result.exit_code,
            },
            result.combined_output(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MockPlatform;
    use tempfile::TempDir;

    #[test]
    fn unified_runs_sync_against_pyproject() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("pyproject.toml"), "[project]\n").unwrap();
        let ctx = ExecutionContext::unified("uv", temp.path());
        let mut platform = MockPlatform::new();

        install(&mut platform, &ctx, &BasecampConfig::default(), RunOutput::Capture).unwrap();

        assert_eq!(platform.command_lines(), vec!["uv sync"]);
        assert!(!platform.ran("pip"));
    }

    #[test]
    fn missing_manifest_spawns_nothing() {
        let temp = TempDir::new().unwrap();
        let ctx = ExecutionContext::unified("uv", temp.path());
        let mut platform = MockPlatform::new();

        let err = install(&mut platform, &ctx, &BasecampConfig::default(), RunOutput::Capture)
            .unwrap_err()
            .error;

        assert!(matches!(err, BootstrapError::ManifestMissing { .. }));
        assert!(err.to_string().contains("pyproject.toml"));
        assert!(platform.commands().is_empty());
    }

    #[test]
    fn non_zero_exit_names_the_step() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("pyproject.toml"), "").unwrap();
        let ctx = ExecutionContext::unified("uv", temp.path());
        let mut platform = MockPlatform::new().fail_when("uv sync");

        let err = install(&mut platform, &ctx, &BasecampConfig::default(), RunOutput::Capture)
            .unwrap_err();

        assert!(err.output.contains("uv sync failed"));
        match err.error {
            BootstrapError::InstallationFailure { step, command, code } => {
                assert_eq!(step, "dependencies");
                assert_eq!(command, "uv sync");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn manifest_follows_strategy() {
        let config = BasecampConfig::default();
        assert_eq!(manifest_for(Strategy::Unified, &config), Path::new("pyproject.toml"));
        assert_eq!(
            manifest_for(Strategy::LegacyVenv, &config),
            Path::new("requirements.txt")
        );
    }
}
