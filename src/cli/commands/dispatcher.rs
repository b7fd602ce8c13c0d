//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::completions::CompletionsCommand;
use super::probe::ProbeCommand;
use super::run::{RunCommand, RunOptions};

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// Returns `Err` only for problems that stop the command from starting
    /// (configuration errors); a failed bootstrap is a [`CommandResult`]
    /// with a non-zero exit code whose diagnostic has already been shown.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn run_options(&self, cli: &Cli) -> RunOptions {
        RunOptions {
            project_root: self.project_root.clone(),
            config_path: cli.config.clone(),
            strategy: cli.strategy,
            dry_run: cli.dry_run,
        }
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. No subcommand means `run`.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Run) | None => RunCommand::new(self.run_options(cli)).execute(ui),
            Some(Commands::Probe(args)) => {
                ProbeCommand::new(self.run_options(cli), args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => CompletionsCommand::new(args.clone()).execute(ui),
        }
    }
}
