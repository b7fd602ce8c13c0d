//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, env overrides and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use basecamp::config::{parse_config, validate};
//! use std::path::Path;
//!
//! let config = parse_config("environment_dir: .venv", Path::new("config.yml")).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.unified_tool, "uv");
//! ```
//!
//! # Configuration File Location
//!
//! `.basecamp/config.yml` under the project root, optional. `BASECAMP_RUNTIME`,
//! `BASECAMP_MIN_RUNTIME_VERSION`, `BASECAMP_UNIFIED_TOOL` and
//! `BASECAMP_STRATEGY` override it.

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    apply_env_overrides, load_config, load_config_file, parse_config, project_config_path,
};
pub use schema::{
    ArtifactConfig, BasecampConfig, ExistingEnvironment, FallbackPolicy, StrategyPreference,
};
pub use validator::{validate, validate_config, ValidationError};
