//! Step outcomes and the bootstrap phase machine.

use serde::Serialize;
use std::fmt;

use crate::error::BootstrapError;

/// The steps of a bootstrap run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepName {
    Probe,
    Environment,
    Dependencies,
    Artifact,
    Verify,
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Probe => "probe",
            Self::Environment => "environment",
            Self::Dependencies => "dependencies",
            Self::Artifact => "artifact",
            Self::Verify => "verify",
        };
        write!(f, "{}", name)
    }
}

/// Result of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallOutcome {
    pub step: StepName,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl InstallOutcome {
    pub fn success(step: StepName) -> Self {
        Self {
            step,
            succeeded: true,
            failure_reason: None,
        }
    }

    pub fn failure(step: StepName, reason: impl Into<String>) -> Self {
        Self {
            step,
            succeeded: false,
            failure_reason: Some(reason.into()),
        }
    }
}

/// A failed step: the error plus whatever the command printed.
#[derive(Debug)]
pub struct StepFailure {
    pub error: BootstrapError,
    /// Captured output of the failing command (empty when nothing ran).
    pub output: String,
}

impl StepFailure {
    pub fn with_output(error: BootstrapError, output: impl Into<String>) -> Self {
        Self {
            error,
            output: output.into(),
        }
    }
}

impl From<BootstrapError> for StepFailure {
    fn from(error: BootstrapError) -> Self {
        Self {
            error,
            output: String::new(),
        }
    }
}

/// Result type for a single step.
pub type StepResult<T> = std::result::Result<T, StepFailure>;

/// Where a run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Start,
    ProbeDone,
    StrategyChosen,
    EnvironmentReady,
    DependenciesInstalled,
    ArtifactFetched,
    Verified,
    Reported { success: bool },
}

impl Phase {
    /// Move to `next`, or return `None` if that transition is not allowed.
    ///
    /// The environment phase may be skipped (unified strategy); nothing
    /// else may, and any non-final phase may end the run as a failure.
    pub fn advance(self, next: Phase) -> Option<Phase> {
        use Phase::*;
        let allowed = match (self, next) {
            (Reported { .. }, _) => false,
            (_, Reported { success: false }) => true,
            (Verified, Reported { success: true }) => true,
            (Start, ProbeDone) => true,
            (ProbeDone, StrategyChosen) => true,
            (StrategyChosen, EnvironmentReady) => true,
            (StrategyChosen, DependenciesInstalled) => true,
            (EnvironmentReady, DependenciesInstalled) => true,
            (DependenciesInstalled, ArtifactFetched) => true,
            (ArtifactFetched, Verified) => true,
            _ => false,
        };
        if allowed {
            Some(next)
        } else {
            None
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Reported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Phase::*;

    fn walk(phases: &[Phase]) -> Option<Phase> {
        phases
            .iter()
            .try_fold(Start, |current, next| current.advance(*next))
    }

    #[test]
    fn legacy_path_is_valid() {
        let end = walk(&[
            ProbeDone,
            StrategyChosen,
            EnvironmentReady,
            DependenciesInstalled,
            ArtifactFetched,
            Verified,
            Reported { success: true },
        ]);
        assert_eq!(end, Some(Reported { success: true }));
    }

    #[test]
    fn unified_path_skips_environment() {
        let end = walk(&[
            ProbeDone,
            StrategyChosen,
            DependenciesInstalled,
            ArtifactFetched,
            Verified,
            Reported { success: true },
        ]);
        assert!(end.is_some());
    }

    #[test]
    fn out_of_order_is_rejected() {
        assert_eq!(Start.advance(StrategyChosen), None);
        assert_eq!(StrategyChosen.advance(ArtifactFetched), None);
        assert_eq!(DependenciesInstalled.advance(EnvironmentReady), None);
        assert_eq!(ArtifactFetched.advance(Reported { success: true }), None);
    }

    #[test]
    fn any_step_may_fail_but_reported_is_final() {
        for phase in [Start, ProbeDone, StrategyChosen, EnvironmentReady, DependenciesInstalled, ArtifactFetched, Verified] {
            assert!(phase.advance(Reported { success: false }).is_some());
        }
        let done = Reported { success: false };
        assert!(done.is_final());
        assert_eq!(done.advance(Reported { success: false }), None);
    }

    #[test]
    fn outcome_constructors() {
        let ok = InstallOutcome::success(StepName::Dependencies);
        assert!(ok.succeeded);
        let failed = InstallOutcome::failure(StepName::Artifact, "exit 1");
        assert_eq!(failed.failure_reason.as_deref(), Some("exit 1"));
        assert_eq!(StepName::Artifact.to_string(), "artifact");
    }
}
