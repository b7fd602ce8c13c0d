//! The bootstrap sequence.
//!
//! Probe, select, provision (legacy only), install, fetch, verify, report:
//! once, top to bottom, stopping at the first failure. Step failures are
//! rendered where they happen and recorded in the [`BootstrapReport`]; the
//! engine itself never returns an error.

use std::path::{Path, PathBuf};
use std::time::Instant;

use super::artifact::{self, FailedAttempt};
use super::capability::{self, RuntimeCapability};
use super::context::{ExecutionContext, Invocation};
use super::install;
use super::outcome::{InstallOutcome, Phase, StepFailure, StepName};
use super::provision::{self, EnvironmentHandle};
use super::report::{self, Reporter};
use super::strategy::{self, Strategy};
use super::verify;
use crate::config::{BasecampConfig, ExistingEnvironment, StrategyPreference};
use crate::error::BootstrapError;
use crate::platform::PlatformAdapter;
use crate::shell::CommandSpec;
use crate::ui::{format_duration, UserInterface};

/// Per-run options from the command line.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub project_root: PathBuf,
    pub preference: StrategyPreference,
    pub dry_run: bool,
}

impl BootstrapOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            preference: StrategyPreference::Auto,
            dry_run: false,
        }
    }
}

/// Everything a run did.
#[derive(Debug)]
pub struct BootstrapReport {
    pub capability: Option<RuntimeCapability>,
    pub strategy: Option<Strategy>,
    pub outcomes: Vec<InstallOutcome>,
    pub phase: Phase,
    pub failure: Option<BootstrapError>,
    /// Launch commands shown to the operator (empty unless the run succeeded).
    pub launch: Vec<String>,
    /// Commands a dry run would have executed.
    pub planned: Vec<String>,
}

impl BootstrapReport {
    fn new() -> Self {
        Self {
            capability: None,
            strategy: None,
            outcomes: Vec::new(),
            phase: Phase::Start,
            failure: None,
            launch: Vec::new(),
            planned: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    /// Steps that ran, in order.
    pub fn steps(&self) -> Vec<StepName> {
        self.outcomes.iter().map(|o| o.step).collect()
    }
}

/// Drives one bootstrap run.
pub struct Bootstrapper<'a> {
    adapter: &'a mut dyn PlatformAdapter,
    config: &'a BasecampConfig,
    options: BootstrapOptions,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(
        adapter: &'a mut dyn PlatformAdapter,
        config: &'a BasecampConfig,
        options: BootstrapOptions,
    ) -> Self {
        Self {
            adapter,
            config,
            options,
        }
    }

    /// Run the sequence, rendering progress through `ui`.
    pub fn run(&mut self, ui: &mut dyn UserInterface) -> BootstrapReport {
        let mut report = BootstrapReport::new();
        let mut reporter = Reporter::new(ui);
        let start = Instant::now();

        match self.execute(&mut report, &mut reporter) {
            Ok(()) if self.options.dry_run => {
                tracing::info!("dry run finished");
            }
            Ok(()) => {
                self.advance(&mut report, Phase::Reported { success: true });
                reporter.complete(&format!(
                    "Bootstrap complete ({})",
                    format_duration(start.elapsed())
                ));
                reporter.launch(&report.launch, &self.config.docs_url);
            }
            Err(error) => {
                tracing::info!(error = %error, "bootstrap failed");
                report.phase = Phase::Reported { success: false };
                report.failure = Some(error);
                report.launch.clear();
            }
        }
        report
    }

    fn advance(&self, report: &mut BootstrapReport, next: Phase) -> bool {
        match report.phase.advance(next) {
            Some(phase) => {
                tracing::info!(from = ?report.phase, to = ?phase, "phase");
                report.phase = phase;
                true
            }
            None => {
                tracing::error!(from = ?report.phase, to = ?next, "rejected phase transition");
                false
            }
        }
    }

    // Moves to `next` or fails the run; every error is rendered before it
    // is returned.
    fn enter(
        &self,
        report: &mut BootstrapReport,
        reporter: &mut Reporter<'_>,
        next: Phase,
    ) -> Result<(), BootstrapError> {
        if self.advance(report, next) {
            return Ok(());
        }
        let error = BootstrapError::Other(anyhow::anyhow!(
            "step order violated: {:?} cannot follow {:?}",
            next,
            report.phase
        ));
        reporter.fatal(&error);
        Err(error)
    }

    fn execute(
        &mut self,
        report: &mut BootstrapReport,
        reporter: &mut Reporter<'_>,
    ) -> Result<(), BootstrapError> {
        let root = self.options.project_root.clone();

        // Probe. No attempt line: an unusable runtime prints one line only.
        let cap = capability::probe(self.adapter, self.config);
        report.capability = Some(cap.clone());
        if let Err(error) = cap.require_usable() {
            report
                .outcomes
                .push(InstallOutcome::failure(StepName::Probe, error.to_string()));
            reporter.fatal(&error);
            return Err(error);
        }
        report.outcomes.push(InstallOutcome::success(StepName::Probe));
        self.enter(report, reporter, Phase::ProbeDone)?;

        let app_name = self.config.app_name.as_deref().unwrap_or("project");
        reporter.header(&format!("Bootstrapping {}", app_name));
        reporter.capability(&cap);

        // Select.
        let strategy = match strategy::resolve(self.options.preference, &cap) {
            Ok(strategy) => strategy,
            Err(error) => {
                reporter.fatal(&error);
                return Err(error);
            }
        };
        report.strategy = Some(strategy);
        self.enter(report, reporter, Phase::StrategyChosen)?;
        reporter.strategy(strategy, &self.config.unified_tool);

        let env_root = root.join(&self.config.environment_dir);

        if self.options.dry_run {
            self.plan(report, reporter, &cap, strategy, &root, &env_root);
            return Ok(());
        }

        // Provision (legacy only).
        let ctx = if strategy.needs_environment() {
            let handle = self.provision(report, reporter, &cap, &root, &env_root)?;
            self.enter(report, reporter, Phase::EnvironmentReady)?;
            handle.context(&root)
        } else {
            ExecutionContext::unified(&self.config.unified_tool, &root)
        };

        self.install(report, reporter, &ctx)?;
        self.enter(report, reporter, Phase::DependenciesInstalled)?;

        self.fetch(report, reporter, &ctx)?;
        self.enter(report, reporter, Phase::ArtifactFetched)?;

        self.verify(report, reporter, &ctx)?;
        self.enter(report, reporter, Phase::Verified)?;

        report.launch = report::launch_commands(self.adapter, &ctx, self.config);
        Ok(())
    }

    fn provision(
        &mut self,
        report: &mut BootstrapReport,
        reporter: &mut Reporter<'_>,
        cap: &RuntimeCapability,
        root: &Path,
        env_root: &Path,
    ) -> Result<EnvironmentHandle, BootstrapError> {
        let shown = self.config.environment_dir.display().to_string();
        let progress = reporter.begin(&format!("Creating environment at {}", shown));
        let result = provision::provision(
            self.adapter,
            &cap.runtime,
            env_root,
            root,
            self.config.existing_environment,
            progress.run_output(),
        );
        match result {
            Ok(handle) => {
                if handle.reused {
                    progress.skip(&format!("Reusing environment at {}", shown));
                } else {
                    progress.succeed(&format!("Environment ready at {}", shown));
                }
                report
                    .outcomes
                    .push(InstallOutcome::success(StepName::Environment));
                Ok(handle)
            }
            Err(error) => {
                progress.fail(&error);
                let hint = match (&error, self.config.existing_environment) {
                    (BootstrapError::EnvironmentPathOccupied { .. }, ExistingEnvironment::Fail) => {
                        Some("remove the directory or set existing_environment to reuse")
                    }
                    (BootstrapError::EnvironmentPathOccupied { .. }, ExistingEnvironment::Reuse) => {
                        Some("remove the directory and re-run basecamp to create it again")
                    }
                    _ => None,
                };
                reporter.failure_detail(&error, "", hint);
                Err(self.record_failure(report, StepName::Environment, error))
            }
        }
    }

    fn install(
        &mut self,
        report: &mut BootstrapReport,
        reporter: &mut Reporter<'_>,
        ctx: &ExecutionContext,
    ) -> Result<(), BootstrapError> {
        let label = match ctx.strategy() {
            Strategy::Unified => format!("Syncing dependencies with {}", self.config.unified_tool),
            Strategy::LegacyVenv => format!(
                "Installing {}",
                self.config.requirements_file.display()
            ),
        };
        let progress = reporter.begin(&label);
        match install::install(self.adapter, ctx, self.config, progress.run_output()) {
            Ok(_) => {
                progress.succeed("Dependencies installed");
                report
                    .outcomes
                    .push(InstallOutcome::success(StepName::Dependencies));
                Ok(())
            }
            Err(failure) => Err(self.fail_step(report, reporter, progress, StepName::Dependencies, failure, None)),
        }
    }

    fn fetch(
        &mut self,
        report: &mut BootstrapReport,
        reporter: &mut Reporter<'_>,
        ctx: &ExecutionContext,
    ) -> Result<(), BootstrapError> {
        let artifact = &self.config.artifact;
        let progress = reporter.begin(&format!("Downloading model {}", artifact.name));
        let mut fell_back: Option<(String, String)> = None;

        let result = artifact::fetch(
            self.adapter,
            ctx,
            artifact,
            || progress.run_output(),
            |attempt: &FailedAttempt, fallback: &str| {
                tracing::debug!(command = %attempt.command, output = %attempt.result.combined_output(), "primary download output");
                fell_back = Some((attempt.command.clone(), fallback.to_string()));
            },
        );

        match result {
            Ok(fetched) => {
                progress.succeed(&format!("Model {} installed", fetched.name));
                if let Some((command, fallback)) = fell_back {
                    reporter.warning(&format!(
                        "{} failed; installed the smaller {} instead",
                        command, fallback
                    ));
                }
                report
                    .outcomes
                    .push(InstallOutcome::success(StepName::Artifact));
                Ok(())
            }
            Err(failure) => {
                let hint = artifact::deferred_hint(artifact);
                Err(self.fail_step(report, reporter, progress, StepName::Artifact, failure, hint))
            }
        }
    }

    fn verify(
        &mut self,
        report: &mut BootstrapReport,
        reporter: &mut Reporter<'_>,
        ctx: &ExecutionContext,
    ) -> Result<(), BootstrapError> {
        let modules = self.config.verify_imports.join(", ");
        let progress = reporter.begin(&format!("Checking that {} import", modules));
        match verify::verify(self.adapter, ctx, &self.config.verify_imports) {
            Ok(()) => {
                progress.succeed(&format!("{} import cleanly", modules));
                report.outcomes.push(InstallOutcome::success(StepName::Verify));
                Ok(())
            }
            Err(failure) => Err(self.fail_step(
                report,
                reporter,
                progress,
                StepName::Verify,
                failure,
                Some("the packages installed but do not load together; re-run with --verbose to see the installers' output".to_string()),
            )),
        }
    }

    fn fail_step(
        &self,
        report: &mut BootstrapReport,
        reporter: &mut Reporter<'_>,
        progress: report::StepProgress,
        step: StepName,
        failure: StepFailure,
        hint: Option<String>,
    ) -> BootstrapError {
        progress.fail(&failure.error);
        reporter.failure_detail(&failure.error, &failure.output, hint.as_deref());
        self.record_failure(report, step, failure.error)
    }

    fn record_failure(
        &self,
        report: &mut BootstrapReport,
        step: StepName,
        error: BootstrapError,
    ) -> BootstrapError {
        report
            .outcomes
            .push(InstallOutcome::failure(step, error.to_string()));
        error
    }

    // Dry run: show every remaining command without running any of them.
    fn plan(
        &mut self,
        report: &mut BootstrapReport,
        reporter: &mut Reporter<'_>,
        cap: &RuntimeCapability,
        strategy: Strategy,
        root: &Path,
        env_root: &Path,
    ) {
        reporter.note("Dry run: nothing will be executed");
        let mut planned: Vec<CommandSpec> = Vec::new();

        let ctx = if strategy.needs_environment() {
            let handle = EnvironmentHandle::planned(self.adapter, env_root);
            if !env_root.exists() {
                planned.push(provision::creation_command(&cap.runtime, env_root, root));
            } else if handle.is_valid()
                && self.config.existing_environment == ExistingEnvironment::Reuse
            {
                reporter.planned_skip(&format!(
                    "Would reuse environment at {}",
                    self.config.environment_dir.display()
                ));
            } else {
                reporter.warning(&format!(
                    "{} exists and would not be used; the run would stop here",
                    env_root.display()
                ));
            }
            handle.context(root)
        } else {
            ExecutionContext::unified(&self.config.unified_tool, root)
        };

        let manifest = install::manifest_for(strategy, self.config);
        if !root.join(manifest).is_file() {
            reporter.warning(&format!(
                "{} is missing; dependency installation would fail",
                manifest.display()
            ));
        }
        planned.push(self.adapter.build_command(
            &ctx,
            &Invocation::InstallDependencies {
                manifest: manifest.to_path_buf(),
            },
        ));
        planned.push(artifact::download_command(
            self.adapter,
            &ctx,
            &self.config.artifact.name,
        ));
        planned.push(verify::verify_command(
            self.adapter,
            &ctx,
            &self.config.verify_imports,
        ));

        for spec in &planned {
            reporter.planned(spec);
        }
        report.planned = planned.iter().map(|s| s.to_string()).collect();
    }
}
