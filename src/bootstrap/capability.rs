//! Runtime and tool capability probing.

use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::config::BasecampConfig;
use crate::error::{BootstrapError, Result};
use crate::platform::PlatformAdapter;

/// Minimum runtime version used when the configured one cannot be parsed.
pub const DEFAULT_MINIMUM: RuntimeVersion = RuntimeVersion {
    major: 3,
    minor: 8,
    patch: 0,
};

/// A `major.minor.patch` runtime version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl RuntimeVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a bare `major.minor[.patch]` string.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(major, minor, patch))
    }

    /// Extract the first version number from `--version` output,
    /// e.g. `Python 3.11.4` or `uv 0.4.18 (Homebrew 2024-10-01)`.
    pub fn extract(output: &str) -> Option<Self> {
        let re = Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").ok()?;
        let caps = re.captures(output)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = caps
            .get(3)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// What the host offers, computed once before anything is installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeCapability {
    /// Runtime program that was queried.
    pub runtime: String,
    /// The runtime answered `--version`.
    pub runtime_version_present: bool,
    /// Parsed runtime version, if the output contained one.
    pub runtime_version: Option<RuntimeVersion>,
    /// Version is known and not below `minimum`.
    pub meets_minimum: bool,
    /// Minimum the runtime was checked against.
    pub minimum: RuntimeVersion,
    /// Unified tool program.
    pub unified_tool: String,
    /// The tool was queried at all; skipped when the runtime is unusable.
    pub unified_tool_probed: bool,
    pub unified_tool_present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified_tool_version: Option<String>,
}

impl RuntimeCapability {
    /// Fail unless the runtime is present and new enough.
    pub fn require_usable(&self) -> Result<()> {
        if !self.runtime_version_present {
            return Err(BootstrapError::EnvironmentMissing {
                runtime: self.runtime.clone(),
                minimum: self.minimum_display(),
            });
        }
        if !self.meets_minimum {
            return Err(BootstrapError::EnvironmentTooOld {
                runtime: self.runtime.clone(),
                found: self
                    .runtime_version
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "(unknown version)".to_string()),
                minimum: self.minimum_display(),
            });
        }
        Ok(())
    }

    /// The runtime is present and new enough.
    pub fn is_usable(&self) -> bool {
        self.runtime_version_present && self.meets_minimum
    }

    fn minimum_display(&self) -> String {
        if self.minimum.patch == 0 {
            format!("{}.{}", self.minimum.major, self.minimum.minor)
        } else {
            self.minimum.to_string()
        }
    }
}

/// Probe the runtime, then the unified tool.
///
/// Never fails: an absent runtime is recorded, and [`RuntimeCapability::require_usable`]
/// turns it into an error. The unified tool is left unqueried when the
/// runtime is unusable.
pub fn probe(adapter: &mut dyn PlatformAdapter, config: &BasecampConfig) -> RuntimeCapability {
    let runtime = config
        .runtime
        .clone()
        .unwrap_or_else(|| adapter.default_runtime().to_string());
    let minimum = RuntimeVersion::parse(&config.min_runtime_version).unwrap_or(DEFAULT_MINIMUM);

    let runtime_output = adapter.query_version(&runtime);
    let runtime_version = runtime_output.as_deref().and_then(RuntimeVersion::extract);
    let meets_minimum = runtime_version.is_some_and(|v| v >= minimum);

    tracing::debug!(
        runtime = %runtime,
        output = ?runtime_output,
        version = ?runtime_version,
        meets_minimum,
        "runtime probed"
    );

    let mut capability = RuntimeCapability {
        runtime,
        runtime_version_present: runtime_output.is_some(),
        runtime_version,
        meets_minimum,
        minimum,
        unified_tool: config.unified_tool.clone(),
        unified_tool_probed: false,
        unified_tool_present: false,
        unified_tool_version: None,
    };

    if !capability.is_usable() {
        return capability;
    }

    let tool_output = adapter.query_version(&config.unified_tool);
    tracing::debug!(tool = %config.unified_tool, output = ?tool_output, "unified tool probed");

    capability.unified_tool_probed = true;
    capability.unified_tool_present = tool_output.is_some();
    capability.unified_tool_version = tool_output
        .as_deref()
        .and_then(RuntimeVersion::extract)
        .map(|v| v.to_string());
    capability
}
