//! Probe command implementation.
//!
//! `basecamp probe` reports what the host offers and which strategy a run
//! would pick, without creating or installing anything.

use serde::Serialize;

use crate::bootstrap::report::diagnostic;
use crate::bootstrap::strategy::{self, Strategy};
use crate::bootstrap::{self, RuntimeCapability};
use crate::cli::args::ProbeArgs;
use crate::error::{BootstrapError, Result};
use crate::platform::{self, PlatformAdapter};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::run::RunOptions;

/// Serialized form of a probe.
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub platform: &'static str,
    pub capability: RuntimeCapability,
    pub usable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

/// The probe command implementation.
pub struct ProbeCommand {
    options: RunOptions,
    args: ProbeArgs,
}

impl ProbeCommand {
    pub fn new(options: RunOptions, args: ProbeArgs) -> Self {
        Self { options, args }
    }

    /// Probe through `adapter` and build the report.
    pub fn report(&self, adapter: &mut dyn PlatformAdapter) -> Result<ProbeReport> {
        let config = self.options.load_config()?;
        let capability = bootstrap::probe(adapter, &config);

        let outcome = capability
            .require_usable()
            .and_then(|()| strategy::resolve(self.options.preference(&config), &capability));
        let (strategy, problem) = match outcome {
            Ok(strategy) => (Some(strategy), None),
            Err(e) => (None, Some(diagnostic(&e))),
        };

        Ok(ProbeReport {
            platform: adapter.name(),
            usable: capability.is_usable(),
            capability,
            strategy,
            problem,
        })
    }

    /// Probe and render through `ui` (or stdout for `--json`).
    pub fn run_with(
        &self,
        adapter: &mut dyn PlatformAdapter,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let report = self.report(adapter)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| BootstrapError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        render(&report, ui);
        Ok(CommandResult::success())
    }
}

fn render(report: &ProbeReport, ui: &mut dyn UserInterface) {
    let cap = &report.capability;
    ui.show_header(&format!("Probe ({})", report.platform));

    match (cap.runtime_version_present, cap.runtime_version) {
        (true, Some(version)) if cap.meets_minimum => {
            ui.success(&format!("{} {} (minimum {})", cap.runtime, version, cap.minimum));
        }
        (true, _) => ui.warning(&format!(
            "{} {} is below the minimum {}",
            cap.runtime,
            cap.runtime_version
                .map(|v| v.to_string())
                .unwrap_or_else(|| "(unknown version)".to_string()),
            cap.minimum
        )),
        (false, _) => ui.warning(&format!("{} not found", cap.runtime)),
    }

    if !cap.unified_tool_probed {
        ui.message(&format!("{} not checked", cap.unified_tool));
    } else if cap.unified_tool_present {
        let version = cap.unified_tool_version.as_deref().unwrap_or("");
        ui.success(&format!("{} {}", cap.unified_tool, version).trim_end().to_string());
    } else {
        ui.message(&format!("{} not found", cap.unified_tool));
    }

    match (&report.strategy, &report.problem) {
        (Some(strategy), _) => {
            ui.info(&format!("Strategy: {}", strategy.describe(&cap.unified_tool)))
        }
        (None, Some(problem)) => ui.warning(problem),
        (None, None) => {}
    }
}

impl Command for ProbeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut adapter = platform::current();
        self.run_with(adapter.as_mut(), ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyPreference;
    use crate::platform::MockPlatform;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn command(temp: &TempDir, strategy: Option<StrategyPreference>) -> ProbeCommand {
        let options = RunOptions {
            strategy,
            ..RunOptions::new(temp.path())
        };
        ProbeCommand::new(options, ProbeArgs::default())
    }

    #[test]
    fn reports_unified_when_tool_present() {
        let temp = TempDir::new().unwrap();
        let mut platform = MockPlatform::new()
            .with_version("python3", "Python 3.12.1")
            .with_version("uv", "uv 0.4.0");

        let report = command(&temp, None).report(&mut platform).unwrap();

        assert!(report.usable);
        assert_eq!(report.strategy, Some(Strategy::Unified));
        assert!(report.problem.is_none());
        assert!(platform.commands().is_empty());
    }

    #[test]
    fn reports_problem_for_old_runtime() {
        let temp = TempDir::new().unwrap();
        let mut platform = MockPlatform::new()
            .with_version("python3", "Python 3.7.9")
            .with_version("uv", "uv 0.4.0");

        let report = command(&temp, None).report(&mut platform).unwrap();

        assert!(!report.usable);
        assert!(report.strategy.is_none());
        assert!(report.problem.unwrap().starts_with("runtime too old"));
        assert!(!report.capability.unified_tool_probed);
    }

    #[test]
    fn forced_unified_without_tool_is_a_problem() {
        let temp = TempDir::new().unwrap();
        let mut platform = MockPlatform::new().with_version("python3", "Python 3.11.4");

        let report = command(&temp, Some(StrategyPreference::Unified))
            .report(&mut platform)
            .unwrap();

        assert!(report.usable);
        assert!(report.strategy.is_none());
        assert!(report.problem.unwrap().contains("uv"));
    }

    #[test]
    fn human_output_always_exits_zero() {
        let temp = TempDir::new().unwrap();
        let mut platform = MockPlatform::new();
        let mut ui = MockUI::new();

        let result = command(&temp, None).run_with(&mut platform, &mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_warning("python3 not found"));
        assert!(ui.has_message("uv not checked"));
    }

    #[test]
    fn report_serializes_strategy_kebab_case() {
        let temp = TempDir::new().unwrap();
        let mut platform = MockPlatform::new().with_version("python3", "Python 3.9.0");

        let report = command(&temp, None).report(&mut platform).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["strategy"], "legacy-venv");
        assert_eq!(json["capability"]["runtime_version"]["minor"], 9);
    }
}
