//! Error types for basecamp operations.
//!
//! This module defines [`BootstrapError`], the error type used throughout
//! the bootstrap sequence, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant is fatal: the sequence stops and the process exits 1
//! - Variants are distinguished only by their message, never by exit code
//! - Use `anyhow::Error` (via `BootstrapError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for basecamp operations.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The base runtime could not be found on PATH.
    #[error("{runtime} was not found. Install Python {minimum} or newer and re-run basecamp")]
    EnvironmentMissing { runtime: String, minimum: String },

    /// The base runtime is older than the supported minimum.
    #[error("{runtime} {found} is too old: Python {minimum} or newer is required")]
    EnvironmentTooOld {
        runtime: String,
        found: String,
        minimum: String,
    },

    /// The unified tool was explicitly requested but is not installed.
    #[error("the unified strategy was requested but {tool} was not found on PATH; install it or choose the legacy strategy")]
    UnifiedToolMissing { tool: String },

    /// Creating the isolated environment failed.
    #[error("Failed to create environment at {path}: {message}")]
    ProvisioningFailure { path: PathBuf, message: String },

    /// The environment path exists but cannot be used.
    #[error("{path} {reason}")]
    EnvironmentPathOccupied { path: PathBuf, reason: String },

    /// The dependency manifest for the selected strategy is missing.
    #[error("Dependency manifest not found: {path}")]
    ManifestMissing { path: PathBuf },

    /// An installation command exited non-zero.
    #[error("Installing {step} failed ({}): {command}", exit_status(.code))]
    InstallationFailure {
        step: String,
        command: String,
        code: Option<i32>,
    },

    /// The import smoke test failed after a successful install.
    #[error("Installed packages could not be imported ({command}): {diagnostic}")]
    VerificationFailure { command: String, diagnostic: String },

    /// A command could not be spawned at all.
    #[error("Could not start {command}: {message}")]
    SpawnFailed { command: String, message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BootstrapError {
    /// Short category label shown in front of the diagnostic.
    pub fn category(&self) -> &'static str {
        match self {
            Self::EnvironmentMissing { .. } => "runtime missing",
            Self::EnvironmentTooOld { .. } => "runtime too old",
            Self::UnifiedToolMissing { .. } => "tool missing",
            Self::ProvisioningFailure { .. } | Self::EnvironmentPathOccupied { .. } => {
                "environment"
            }
            Self::ManifestMissing { .. } | Self::InstallationFailure { .. } => "install",
            Self::VerificationFailure { .. } => "verify",
            Self::SpawnFailed { .. } => "process",
            Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. } => "config",
            Self::Io(_) | Self::Other(_) => "error",
        }
    }
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for basecamp operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_missing_names_runtime_and_minimum() {
        let err = BootstrapError::EnvironmentMissing {
            runtime: "python3".into(),
            minimum: "3.8".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("python3"));
        assert!(msg.contains("3.8"));
    }

    #[test]
    fn too_old_is_distinct_from_missing() {
        let missing = BootstrapError::EnvironmentMissing {
            runtime: "python3".into(),
            minimum: "3.8".into(),
        };
        let old = BootstrapError::EnvironmentTooOld {
            runtime: "python3".into(),
            found: "3.6.9".into(),
            minimum: "3.8".into(),
        };
        assert_ne!(missing.to_string(), old.to_string());
        assert!(old.to_string().contains("3.6.9"));
        assert_ne!(missing.category(), old.category());
    }

    #[test]
    fn installation_failure_names_step_and_command() {
        let err = BootstrapError::InstallationFailure {
            step: "dependencies".into(),
            command: "uv sync".into(),
            code: Some(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("dependencies"));
        assert!(msg.contains("uv sync"));
        assert!(msg.contains("exit code 2"));
    }

    #[test]
    fn verification_failure_is_categorized_apart_from_install() {
        let verify = BootstrapError::VerificationFailure {
            command: "python -c 'import spacy'".into(),
            diagnostic: "ModuleNotFoundError".into(),
        };
        let install = BootstrapError::InstallationFailure {
            step: "model".into(),
            command: "python -m spacy download".into(),
            code: Some(1),
        };
        assert_ne!(verify.category(), install.category());
        assert!(verify.to_string().contains("ModuleNotFoundError"));
    }

    #[test]
    fn tool_missing_does_not_name_a_flag() {
        let err = BootstrapError::UnifiedToolMissing { tool: "uv".into() };
        let msg = err.to_string();
        assert!(msg.contains("uv was not found"));
        assert!(!msg.contains("--strategy"));
    }

    #[test]
    fn occupied_path_displays_path() {
        let err = BootstrapError::EnvironmentPathOccupied {
            path: PathBuf::from("/srv/app/venv"),
            reason: "is not a complete environment".into(),
        };
        assert_eq!(
            err.to_string(),
            "/srv/app/venv is not a complete environment"
        );
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BootstrapError = io_err.into();
        assert!(matches!(err, BootstrapError::Io(_)));
    }
}
