//! Post-install import smoke test.

use super::context::{ExecutionContext, Invocation};
use super::outcome::{StepFailure, StepResult};
use crate::error::BootstrapError;
use crate::platform::{PlatformAdapter, RunOutput};
use crate::shell::CommandSpec;

/// Lines of runtime output kept in the diagnostic.
const DIAGNOSTIC_LINES: usize = 5;

/// `import a, b, …` for the configured modules.
pub fn import_statement(modules: &[String]) -> String {
    format!("import {}", modules.join(", "))
}

pub fn verify_command(
    adapter: &dyn PlatformAdapter,
    ctx: &ExecutionContext,
    modules: &[String],
) -> CommandSpec {
    adapter.build_command(
        ctx,
        &Invocation::RuntimeCode {
            code: import_statement(modules),
        },
    )
}

/// Import every module in one runtime process.
///
/// Always captures: the runtime's traceback is the diagnostic.
pub fn verify(
    adapter: &mut dyn PlatformAdapter,
    ctx: &ExecutionContext,
    modules: &[String],
) -> StepResult<()> {
    let spec = verify_command(adapter, ctx, modules);
    let result = adapter.run_command(&spec, RunOutput::Capture)?;
    if result.success {
        return Ok(());
    }

    let output = result.combined_output();
    let lines: Vec<&str> = output.lines().collect();
    let tail = lines[lines.len().saturating_sub(DIAGNOSTIC_LINES)..].join("\n");
    let diagnostic = if tail.is_empty() {
        format!("exit code {:?}", result.exit_code)
    } else {
        tail
    };

    Err(StepFailure::with_output(
        BootstrapError::VerificationFailure {
            command: spec.to_string(),
            diagnostic,
        },
        output,
    ))
}
