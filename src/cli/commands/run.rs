//! Run command implementation.
//!
//! The `basecamp run` command bootstraps the project: it is also what a bare
//! `basecamp` invocation does.

use std::path::{Path, PathBuf};

use crate::bootstrap::{BootstrapOptions, Bootstrapper};
use crate::config::{load_config, BasecampConfig, StrategyPreference};
use crate::error::Result;
use crate::platform::{self, PlatformAdapter};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Options shared by the commands that load the project config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub project_root: PathBuf,
    pub config_path: Option<PathBuf>,
    /// `--strategy` from the command line; wins over the config.
    pub strategy: Option<StrategyPreference>,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config_path: None,
            strategy: None,
            dry_run: false,
        }
    }

    /// Load the effective config for this project.
    pub fn load_config(&self) -> Result<BasecampConfig> {
        load_config(&self.project_root, self.config_path.as_deref())
    }

    pub fn preference(&self, config: &BasecampConfig) -> StrategyPreference {
        self.strategy.unwrap_or(config.strategy)
    }
}

/// The run command implementation.
pub struct RunCommand {
    options: RunOptions,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.options.project_root
    }

    /// Bootstrap against an explicit platform adapter.
    ///
    /// Step failures have already been rendered by the time this returns;
    /// they only show up here as a non-zero exit code.
    pub fn run_with(
        &self,
        adapter: &mut dyn PlatformAdapter,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let config = self.options.load_config()?;

        let options = BootstrapOptions {
            project_root: self.options.project_root.clone(),
            preference: self.options.preference(&config),
            dry_run: self.options.dry_run,
        };
        tracing::debug!(
            platform = adapter.name(),
            preference = ?options.preference,
            dry_run = options.dry_run,
            "starting bootstrap"
        );

        let report = Bootstrapper::new(adapter, &config, options).run(ui);
        if report.success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(report.exit_code()))
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut adapter = platform::current();
        self.run_with(adapter.as_mut(), ui)
    }
}
