//! Configuration validation rules.
//!
//! - The minimum runtime version must parse
//! - Artifact name, launch command and docs URL must not be empty
//! - The smoke test must import at least one module
//! - The environment directory must be relative to the project root

use crate::bootstrap::capability::RuntimeVersion;
use crate::config::schema::BasecampConfig;
use crate::error::{BootstrapError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config key the error is about
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &BasecampConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut push = |field: &str, message: String| {
        errors.push(ValidationError {
            field: field.to_string(),
            message,
        })
    };

    if RuntimeVersion::parse(&config.min_runtime_version).is_none() {
        push(
            "min_runtime_version",
            format!(
                "'{}' is not a version (expected major.minor)",
                config.min_runtime_version
            ),
        );
    }
    if config.unified_tool.trim().is_empty() {
        push("unified_tool", "must not be empty".to_string());
    }
    if config.artifact.name.trim().is_empty() {
        push("artifact.name", "must not be empty".to_string());
    }
    if config.launch_command.trim().is_empty() {
        push("launch_command", "must not be empty".to_string());
    }
    if config.docs_url.trim().is_empty() {
        push("docs_url", "must not be empty".to_string());
    }
    if config.verify_imports.is_empty() {
        push("verify_imports", "must list at least one module".to_string());
    } else if let Some(pos) = config.verify_imports.iter().position(|m| m.trim().is_empty()) {
        push("verify_imports", format!("entry {} is blank", pos + 1));
    }
    if config.environment_dir.is_absolute() {
        push(
            "environment_dir",
            "must be relative to the project root".to_string(),
        );
    }

    errors
}

/// Validate and fold all errors into one `ConfigValidationError`.
pub fn validate(config: &BasecampConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }
    let message = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(BootstrapError::ConfigValidationError { message })
}
