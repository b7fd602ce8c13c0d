//! Configuration schema definitions for basecamp.
//!
//! This module contains the struct definitions that map to the optional
//! `.basecamp/config.yml` file. Every field has a default, so an absent
//! file and an empty file mean the same thing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Root configuration structure for `.basecamp/config.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasecampConfig {
    /// Application name (for display purposes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Base runtime executable; defaults to the platform's interpreter name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    /// Oldest accepted runtime version (`major.minor[.patch]`)
    pub min_runtime_version: String,

    /// Unified package/environment tool executable
    pub unified_tool: String,

    /// Strategy preference (`auto` picks by tool presence)
    pub strategy: StrategyPreference,

    /// Environment directory, relative to the project root
    pub environment_dir: PathBuf,

    /// Flat requirements listing used by the legacy installer
    pub requirements_file: PathBuf,

    /// Project manifest used by the unified tool's sync
    pub project_manifest: PathBuf,

    /// What to do when the environment directory already exists
    pub existing_environment: ExistingEnvironment,

    /// Auxiliary model artifact
    pub artifact: ArtifactConfig,

    /// Modules imported by the smoke test
    pub verify_imports: Vec<String>,

    /// Command that starts the downstream service
    pub launch_command: String,

    /// Where the service's interactive API docs are served
    pub docs_url: String,
}

impl Default for BasecampConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            runtime: None,
            min_runtime_version: "3.8".to_string(),
            unified_tool: "uv".to_string(),
            strategy: StrategyPreference::Auto,
            environment_dir: PathBuf::from("venv"),
            requirements_file: PathBuf::from("requirements.txt"),
            project_manifest: PathBuf::from("pyproject.toml"),
            existing_environment: ExistingEnvironment::Reuse,
            artifact: ArtifactConfig::default(),
            verify_imports: vec!["fastapi".to_string(), "spacy".to_string()],
            launch_command: "uvicorn app.main:app --reload".to_string(),
            docs_url: "http://127.0.0.1:8000/docs".to_string(),
        }
    }
}

/// Auxiliary model artifact settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Primary model name passed to the download sub-command
    pub name: String,

    /// Smaller variant the service falls back to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    /// Who is responsible for trying the fallback
    pub fallback_policy: FallbackPolicy,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            name: "en_core_web_lg".to_string(),
            fallback: Some("en_core_web_md".to_string()),
            fallback_policy: FallbackPolicy::Deferred,
        }
    }
}

/// Installation strategy preference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StrategyPreference {
    /// Use the unified tool when present, otherwise the legacy flow
    #[default]
    Auto,
    /// Require the unified tool
    Unified,
    /// Always use the legacy environment + installer flow
    Legacy,
}

impl FromStr for StrategyPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "unified" => Ok(Self::Unified),
            "legacy" => Ok(Self::Legacy),
            _ => Err(format!("unknown strategy: {}", s)),
        }
    }
}

/// Policy for a pre-existing environment directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingEnvironment {
    /// Reuse it if it holds an interpreter; fail otherwise
    #[default]
    Reuse,
    /// Always fail
    Fail,
}

/// Fallback policy for the auxiliary artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Only the primary variant is fetched; the service falls back at startup
    #[default]
    Deferred,
    /// The fetcher tries the fallback variant itself
    Attempt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: BasecampConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, BasecampConfig::default());
    }

    #[test]
    fn partial_artifact_keeps_other_defaults() {
        let config: BasecampConfig =
            serde_yaml::from_str("artifact:\n  fallback_policy: attempt\n").unwrap();
        assert_eq!(config.artifact.name, "en_core_web_lg");
        assert_eq!(config.artifact.fallback_policy, FallbackPolicy::Attempt);
    }

    #[test]
    fn enums_use_lowercase_names() {
        let config: BasecampConfig =
            serde_yaml::from_str("strategy: legacy\nexisting_environment: fail\n").unwrap();
        assert_eq!(config.strategy, StrategyPreference::Legacy);
        assert_eq!(config.existing_environment, ExistingEnvironment::Fail);
    }

    #[test]
    fn strategy_preference_from_str() {
        assert_eq!("AUTO".parse::<StrategyPreference>(), Ok(StrategyPreference::Auto));
        assert_eq!("unified".parse::<StrategyPreference>(), Ok(StrategyPreference::Unified));
        assert!("poetry".parse::<StrategyPreference>().is_err());
    }
}
