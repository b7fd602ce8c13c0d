//! Auxiliary model download.

use super::context::{ExecutionContext, Invocation};
use super::outcome::{StepFailure, StepResult};
use crate::config::{ArtifactConfig, FallbackPolicy};
use crate::error::BootstrapError;
use crate::platform::{PlatformAdapter, RunOutput};
use crate::shell::{CommandResult, CommandSpec};

/// Module whose `download` sub-command fetches models.
const DOWNLOAD_MODULE: &str = "spacy";

/// What got installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub name: String,
    /// The primary variant failed and this smaller one was installed instead.
    pub used_fallback: bool,
}

/// A failed attempt that was followed by a fallback.
#[derive(Debug, Clone)]
pub struct FailedAttempt {
    pub command: String,
    pub result: CommandResult,
}

/// The download command for model `name`.
pub fn download_command(
    adapter: &dyn PlatformAdapter,
    ctx: &ExecutionContext,
    name: &str,
) -> CommandSpec {
    adapter.build_command(
        ctx,
        &Invocation::RuntimeModule {
            module: DOWNLOAD_MODULE.to_string(),
            args: vec!["download".to_string(), name.to_string()],
        },
    )
}

/// Fetch the artifact, applying the configured fallback policy.
///
/// `make_output` is called once per attempt. `on_fallback` is told about
/// a failed primary attempt before the fallback runs.
pub fn fetch<F, W>(
    adapter: &mut dyn PlatformAdapter,
    ctx: &ExecutionContext,
    artifact: &ArtifactConfig,
    mut make_output: F,
    mut on_fallback: W,
) -> StepResult<FetchedArtifact>
where
    F: FnMut() -> RunOutput,
    W: FnMut(&FailedAttempt, &str),
{
    let primary = download_command(adapter, ctx, &artifact.name);
    let result = adapter.run_command(&primary, make_output())?;
    if result.success {
        return Ok(FetchedArtifact {
            name: artifact.name.clone(),
            used_fallback: false,
        });
    }

    let failure = || {
        StepFailure::with_output(
            BootstrapError::InstallationFailure {
                step: "model".to_string(),
                command: primary.to_string(),
                code: result.exit_code,
            },
            result.combined_output(),
        )
    };

    let fallback = match (&artifact.fallback, artifact.fallback_policy) {
        (Some(fallback), FallbackPolicy::Attempt) => fallback,
        _ => return Err(failure()),
    };

    tracing::info!(primary = %artifact.name, fallback = %fallback, "primary model failed, trying fallback");
    on_fallback(
        &FailedAttempt {
            command: primary.to_string(),
            result: result.clone(),
        },
        fallback,
    );

    let secondary = download_command(adapter, ctx, fallback);
    let second = adapter.run_command(&secondary, make_output())?;
    if second.success {
        Ok(FetchedArtifact {
            name: fallback.clone(),
            used_fallback: true,
        })
    } else {
        Err(StepFailure::with_output(
            BootstrapError::InstallationFailure {
                step: "model".to_string(),
                command: secondary.to_string(),
                code: second.exit_code,
            },
            second.combined_output(),
        ))
    }
}

/// Hint shown when the primary download failed and the service is left to
/// fall back on its own.
pub fn deferred_hint(artifact: &ArtifactConfig) -> Option<String> {
    match (&artifact.fallback, artifact.fallback_policy) {
        (Some(fallback), FallbackPolicy::Deferred) => Some(format!(
            "the service falls back to {} at startup if {} is missing; set artifact.fallback_policy: attempt to install it here",
            fallback, artifact.name
        )),
        _ => None,
    }
}
