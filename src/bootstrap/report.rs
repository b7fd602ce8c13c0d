//! Human-readable progress and the final launch instructions.
//!
//! The reporter only renders what the engine tells it; it never decides
//! whether a step succeeded.

use super::capability::RuntimeCapability;
use super::context::ExecutionContext;
use super::strategy::Strategy;
use crate::config::BasecampConfig;
use crate::error::BootstrapError;
use crate::platform::{PlatformAdapter, RunOutput};
use crate::shell::CommandSpec;
use crate::ui::{OutputMode, SpinnerHandle, UserInterface};

/// Commands an operator runs to start the service.
///
/// Unified runs the launch command through the tool; legacy activates the
/// environment first.
pub fn launch_commands(
    adapter: &dyn PlatformAdapter,
    ctx: &ExecutionContext,
    config: &BasecampConfig,
) -> Vec<String> {
    match ctx.strategy() {
        Strategy::Unified => {
            let mut words = ctx.prefix();
            words.push(config.launch_command.clone());
            vec![words.join(" ")]
        }
        Strategy::LegacyVenv => vec![
            adapter.activation_command(&config.environment_dir),
            config.launch_command.clone(),
        ],
    }
}

/// One-line diagnostic for a fatal error.
pub fn diagnostic(error: &BootstrapError) -> String {
    format!("{}: {}", error.category(), error)
}

/// A step in progress.
pub struct StepProgress {
    spinner: Box<dyn SpinnerHandle>,
    mode: OutputMode,
}

impl StepProgress {
    /// Output routing for a command run by this step.
    pub fn run_output(&self) -> RunOutput {
        RunOutput::for_step(self.mode.shows_command_output(), self.spinner.output_callback())
    }

    pub fn succeed(mut self, msg: &str) {
        self.spinner.finish_success(msg);
    }

    pub fn skip(mut self, msg: &str) {
        self.spinner.finish_skipped(msg);
    }

    pub fn fail(mut self, error: &BootstrapError) {
        self.spinner.finish_error(&diagnostic(error));
    }
}

/// Renders bootstrap progress through a [`UserInterface`].
pub struct Reporter<'a> {
    ui: &'a mut dyn UserInterface,
}

impl<'a> Reporter<'a> {
    pub fn new(ui: &'a mut dyn UserInterface) -> Self {
        Self { ui }
    }

    pub fn header(&mut self, title: &str) {
        self.ui.show_header(title);
    }

    pub fn note(&mut self, msg: &str) {
        self.ui.message(msg);
    }

    pub fn warning(&mut self, msg: &str) {
        self.ui.warning(msg);
    }

    /// What the probe found.
    pub fn capability(&mut self, capability: &RuntimeCapability) {
        let version = capability
            .runtime_version
            .map(|v| v.to_string())
            .unwrap_or_default();
        self.ui.success(&format!(
            "Found {} {} (minimum {})",
            capability.runtime, version, capability.minimum
        ));
        match (capability.unified_tool_present, &capability.unified_tool_version) {
            (true, Some(v)) => self
                .ui
                .success(&format!("Found {} {}", capability.unified_tool, v)),
            (true, None) => self.ui.success(&format!("Found {}", capability.unified_tool)),
            (false, _) => self
                .ui
                .message(&format!("{} not found", capability.unified_tool)),
        }
    }

    pub fn strategy(&mut self, strategy: Strategy, tool: &str) {
        self.ui
            .info(&format!("Strategy: {}", strategy.describe(tool)));
    }

    /// Start a step: prints the attempt line (or spinner).
    pub fn begin(&mut self, label: &str) -> StepProgress {
        StepProgress {
            spinner: self.ui.start_spinner(label),
            mode: self.ui.output_mode(),
        }
    }

    /// A fatal error outside any step: exactly one line.
    pub fn fatal(&mut self, error: &BootstrapError) {
        self.ui.error(&diagnostic(error));
    }

    /// The failed command and its output, below a failed step's line.
    pub fn failure_detail(&mut self, error: &BootstrapError, output: &str, hint: Option<&str>) {
        if output.trim().is_empty() && hint.is_none() {
            return;
        }
        let command = match error {
            BootstrapError::InstallationFailure { command, .. }
            | BootstrapError::VerificationFailure { command, .. }
            | BootstrapError::SpawnFailed { command, .. } => command.as_str(),
            _ => "",
        };
        self.ui.show_error_block(command, output.trim_end(), hint);
    }

    /// A command a dry run would execute.
    pub fn planned(&mut self, spec: &CommandSpec) {
        self.ui.info(&format!("Would run: {}", spec));
    }

    pub fn planned_skip(&mut self, msg: &str) {
        self.ui.message(msg);
    }

    pub fn complete(&mut self, msg: &str) {
        self.ui.success(msg);
    }

    /// The one launch block of a successful run.
    pub fn launch(&mut self, commands: &[String], docs_url: &str) {
        self.ui.show_launch_block(commands, docs_url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::provision::EnvironmentHandle;
    use crate::platform::{PosixAdapter, WindowsAdapter};
    use crate::ui::MockUI;
    use std::path::Path;

    #[test]
    fn unified_launch_is_prefixed() {
        let ctx = ExecutionContext::unified("uv", "/p");
        let commands = launch_commands(&PosixAdapter::new(), &ctx, &BasecampConfig::default());
        assert_eq!(commands, vec!["uv run uvicorn app.main:app --reload"]);
    }

    #[test]
    fn legacy_launch_activates_first() {
        let adapter = PosixAdapter::new();
        let handle = EnvironmentHandle::planned(&adapter, Path::new("/p/venv"));
        let ctx = handle.context(Path::new("/p"));
        let commands = launch_commands(&adapter, &ctx, &BasecampConfig::default());
        assert_eq!(
            commands,
            vec!["source venv/bin/activate", "uvicorn app.main:app --reload"]
        );
    }

    #[test]
    fn legacy_launch_on_windows() {
        let adapter = WindowsAdapter::new();
        let handle = EnvironmentHandle::planned(&adapter, Path::new("venv"));
        let ctx = handle.context(Path::new("."));
        let commands = launch_commands(&adapter, &ctx, &BasecampConfig::default());
        assert_eq!(commands[0], "venv\\Scripts\\activate");
    }

    #[test]
    fn fatal_is_one_error_line() {
        let mut ui = MockUI::new();
        let mut reporter = Reporter::new(&mut ui);
        reporter.fatal(&BootstrapError::EnvironmentMissing {
            runtime: "python3".to_string(),
            minimum: "3.8".to_string(),
        });
        assert_eq!(ui.errors().len(), 1);
        assert!(ui.errors()[0].starts_with("runtime missing:"));
        assert!(ui.messages().is_empty());
        assert!(ui.successes().is_empty());
    }

    #[test]
    fn failure_detail_skips_empty_output() {
        let mut ui = MockUI::new();
        let mut reporter = Reporter::new(&mut ui);
        let error = BootstrapError::ManifestMissing {
            path: "/p/requirements.txt".into(),
        };
        reporter.failure_detail(&error, "  \n", None);
        assert!(ui.error_blocks().is_empty());
    }

    #[test]
    fn failure_detail_names_command() {
        let mut ui = MockUI::new();
        let mut reporter = Reporter::new(&mut ui);
        let error = BootstrapError::InstallationFailure {
            step: "dependencies".to_string(),
            command: "uv sync".to_string(),
            code: Some(2),
        };
        reporter.failure_detail(&error, "resolution failed\n", Some("check pyproject.toml"));
        let (command, output, hint) = &ui.error_blocks()[0];
        assert_eq!(command, "uv sync");
        assert_eq!(output, "resolution failed");
        assert_eq!(hint.as_deref(), Some("check pyproject.toml"));
    }
}
