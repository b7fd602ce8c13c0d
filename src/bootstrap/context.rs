//! Execution context: how every step after strategy selection runs.
//!
//! Instead of activating an environment in the parent shell, each command
//! is built from an [`ExecutionContext`] that carries the strategy's
//! command form, the working directory and the environment overlay. A
//! context is either unified or legacy, never both, so no command can be
//! built in the other strategy's form.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::provision::EnvironmentHandle;
use super::strategy::Strategy;
use crate::shell::CommandSpec;

/// Runtime executable name inside a unified tool's managed environment.
const MANAGED_RUNTIME: &str = "python";

#[derive(Debug, Clone, PartialEq, Eq)]
enum CommandForm {
    Unified { tool: PathBuf },
    Legacy { interpreter: PathBuf, installer: PathBuf },
}

/// Something a step wants run, independent of strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Install the dependency manifest.
    InstallDependencies { manifest: PathBuf },
    /// `python -m <module> <args>`.
    RuntimeModule { module: String, args: Vec<String> },
    /// `python -c <code>`.
    RuntimeCode { code: String },
}

/// Command form, working directory and environment for all later steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    form: CommandForm,
    working_dir: PathBuf,
    env_overlay: BTreeMap<String, String>,
}

impl ExecutionContext {
    /// Context where the unified tool runs everything.
    pub fn unified(tool: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            form: CommandForm::Unified { tool: tool.into() },
            working_dir: working_dir.into(),
            env_overlay: BTreeMap::new(),
        }
    }

    /// Context bound to a provisioned environment.
    pub fn legacy(
        handle: &EnvironmentHandle,
        working_dir: impl Into<PathBuf>,
        env_overlay: BTreeMap<String, String>,
    ) -> Self {
        Self {
            form: CommandForm::Legacy {
                interpreter: handle.interpreter.clone(),
                installer: handle.installer.clone(),
            },
            working_dir: working_dir.into(),
            env_overlay,
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self.form {
            CommandForm::Unified { .. } => Strategy::Unified,
            CommandForm::Legacy { .. } => Strategy::LegacyVenv,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn env_overlay(&self) -> &BTreeMap<String, String> {
        &self.env_overlay
    }

    /// Words placed in front of every runtime command.
    pub fn prefix(&self) -> Vec<String> {
        match &self.form {
            CommandForm::Unified { tool } => {
                vec![tool.to_string_lossy().into_owned(), "run".to_string()]
            }
            CommandForm::Legacy { .. } => Vec::new(),
        }
    }

    /// Build the concrete command for `invocation`.
    pub fn command_for(&self, invocation: &Invocation) -> CommandSpec {
        let spec = match (&self.form, invocation) {
            (CommandForm::Unified { tool }, Invocation::InstallDependencies { .. }) => {
                CommandSpec::new(tool).args(["sync"])
            }
            (CommandForm::Legacy { installer, .. }, Invocation::InstallDependencies { manifest }) => {
                CommandSpec::new(installer).args([
                    "install".to_string(),
                    "-r".to_string(),
                    manifest.to_string_lossy().into_owned(),
                ])
            }
            (form, Invocation::RuntimeModule { module, args }) => {
                let mut argv = vec!["-m".to_string(), module.clone()];
                argv.extend(args.iter().cloned());
                runtime_command(form, argv)
            }
            (form, Invocation::RuntimeCode { code }) => {
                runtime_command(form, ["-c".to_string(), code.clone()])
            }
        };

        spec.current_dir(&self.working_dir).envs(&self.env_overlay)
    }
}

fn runtime_command<I>(form: &CommandForm, args: I) -> CommandSpec
where
    I: IntoIterator<Item = String>,
{
    match form {
        CommandForm::Unified { tool } => CommandSpec::new(tool)
            .args(["run".to_string(), MANAGED_RUNTIME.to_string()])
            .args(args),
        CommandForm::Legacy { interpreter, .. } => CommandSpec::new(interpreter).args(args),
    }
}
