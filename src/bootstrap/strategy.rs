//! Installation strategy selection.

use serde::Serialize;
use std::fmt;

use super::capability::RuntimeCapability;
use crate::config::StrategyPreference;
use crate::error::{BootstrapError, Result};

/// How dependencies get installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// The unified tool manages the environment and runs everything.
    Unified,
    /// A virtual environment plus its own package installer.
    LegacyVenv,
}

impl Strategy {
    /// One-line description for status output.
    pub fn describe(&self, tool: &str) -> String {
        match self {
            Self::Unified => format!("unified ({} manages the environment)", tool),
            Self::LegacyVenv => "legacy (venv + pip)".to_string(),
        }
    }

    pub fn needs_environment(&self) -> bool {
        matches!(self, Self::LegacyVenv)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unified => write!(f, "unified"),
            Self::LegacyVenv => write!(f, "legacy-venv"),
        }
    }
}

/// Pick the strategy from the probe alone: the unified tool wins when present.
pub fn select(capability: &RuntimeCapability) -> Strategy {
    if capability.unified_tool_present {
        Strategy::Unified
    } else {
        Strategy::LegacyVenv
    }
}

/// Apply an operator preference on top of [`select`].
pub fn resolve(preference: StrategyPreference, capability: &RuntimeCapability) -> Result<Strategy> {
    match preference {
        StrategyPreference::Auto => Ok(select(capability)),
        StrategyPreference::Legacy => Ok(Strategy::LegacyVenv),
        StrategyPreference::Unified if capability.unified_tool_present => Ok(Strategy::Unified),
        StrategyPreference::Unified => Err(BootstrapError::UnifiedToolMissing {
            tool: capability.unified_tool.clone(),
        }),
    }
}
