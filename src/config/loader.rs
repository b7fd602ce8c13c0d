//! Configuration file discovery and loading.
//!
//! The project config lives at `.basecamp/config.yml` and is optional.
//! Environment variables are layered on top, then the result is validated.

use crate::config::schema::BasecampConfig;
use crate::config::validator::validate;
use crate::error::{BootstrapError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables that override config file values.
pub const ENV_RUNTIME: &str = "BASECAMP_RUNTIME";
pub const ENV_MIN_RUNTIME_VERSION: &str = "BASECAMP_MIN_RUNTIME_VERSION";
pub const ENV_UNIFIED_TOOL: &str = "BASECAMP_UNIFIED_TOOL";
pub const ENV_STRATEGY: &str = "BASECAMP_STRATEGY";

/// Path of the project config for a project root.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".basecamp").join("config.yml")
}

/// Load a single config file and parse it.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<BasecampConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BootstrapError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BootstrapError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a config.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<BasecampConfig> {
    if content.trim().is_empty() {
        return Ok(BasecampConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| BootstrapError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply `BASECAMP_*` overrides using a custom env var lookup function.
///
/// This allows testing without modifying actual environment variables.
pub fn apply_env_overrides<F>(config: &mut BasecampConfig, env_fn: F) -> Result<()>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    if let Ok(runtime) = env_fn(ENV_RUNTIME) {
        config.runtime = Some(runtime);
    }
    if let Ok(version) = env_fn(ENV_MIN_RUNTIME_VERSION) {
        config.min_runtime_version = version;
    }
    if let Ok(tool) = env_fn(ENV_UNIFIED_TOOL) {
        config.unified_tool = tool;
    }
    if let Ok(strategy) = env_fn(ENV_STRATEGY) {
        config.strategy = strategy
            .parse()
            .map_err(|message| BootstrapError::ConfigValidationError { message })?;
    }
    Ok(())
}

/// Load the effective config for a project.
///
/// If `config_override` is provided, that file must exist. Otherwise the
/// project config is used when present and defaults when not. Environment
/// overrides are applied last, then the result is validated.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<BasecampConfig> {
    let mut config = match config_override {
        Some(path) => load_config_file(path)?,
        None => {
            let path = project_config_path(project_root);
            if path.exists() {
                load_config_file(&path)?
            } else {
                tracing::debug!("no project config at {}, using defaults", path.display());
                BasecampConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key))?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::StrategyPreference;
    use tempfile::TempDir;

    fn no_env(_: &str) -> std::result::Result<String, std::env::VarError> {
        Err(std::env::VarError::NotPresent)
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config.environment_dir, PathBuf::from("venv"));
    }

    #[test]
    fn project_config_is_loaded() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".basecamp");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), "app_name: Ledger\nenvironment_dir: .venv\n").unwrap();

        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config.app_name.as_deref(), Some("Ledger"));
        assert_eq!(config.environment_dir, PathBuf::from(".venv"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        let err = load_config(temp.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, BootstrapError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let err = parse_config("strategy: [", Path::new("/x/config.yml")).unwrap_err();
        assert!(err.to_string().contains("/x/config.yml"));
    }

    #[test]
    fn empty_file_is_defaults() {
        let config = parse_config("\n", Path::new("config.yml")).unwrap();
        assert_eq!(config, BasecampConfig::default());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = BasecampConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            ENV_RUNTIME => Ok("python3.12".to_string()),
            ENV_STRATEGY => Ok("legacy".to_string()),
            _ => Err(std::env::VarError::NotPresent),
        })
        .unwrap();
        assert_eq!(config.runtime.as_deref(), Some("python3.12"));
        assert_eq!(config.strategy, StrategyPreference::Legacy);
        assert_eq!(config.unified_tool, "uv");
    }

    #[test]
    fn bad_strategy_override_is_rejected() {
        let mut config = BasecampConfig::default();
        let err = apply_env_overrides(&mut config, |key| {
            if key == ENV_STRATEGY {
                Ok("conda".to_string())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("conda"));
    }

    #[test]
    fn no_overrides_leaves_config_untouched() {
        let mut config = BasecampConfig::default();
        apply_env_overrides(&mut config, no_env).unwrap();
        assert_eq!(config, BasecampConfig::default());
    }
}
