//! Library integration tests.

use basecamp::bootstrap::{BootstrapOptions, Bootstrapper, StepName, Strategy};
use basecamp::config::{parse_config, BasecampConfig, FallbackPolicy};
use basecamp::platform::MockPlatform;
use basecamp::ui::MockUI;
use basecamp::BootstrapError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn error_types_are_public() {
    let err = BootstrapError::ManifestMissing {
        path: "requirements.txt".into(),
    };
    assert!(err.to_string().contains("requirements.txt"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> basecamp::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use basecamp::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["basecamp", "probe", "--json"]);
    if let Some(Commands::Probe(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Probe command");
    }
}

#[test]
fn attempt_policy_recovers_with_fallback_model() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("pyproject.toml"), "[project]\n").unwrap();

    let config = parse_config(
        "artifact:\n  fallback_policy: attempt\n",
        Path::new("config.yml"),
    )
    .unwrap();
    assert_eq!(config.artifact.fallback_policy, FallbackPolicy::Attempt);

    let mut platform = MockPlatform::new()
        .with_version("python3", "Python 3.12.0")
        .with_version("uv", "uv 0.4.0")
        .fail_when("en_core_web_lg");
    let mut ui = MockUI::new();

    let report = Bootstrapper::new(&mut platform, &config, BootstrapOptions::new(temp.path()))
        .run(&mut ui);

    assert!(report.success());
    assert_eq!(report.strategy, Some(Strategy::Unified));
    assert!(platform.ran("en_core_web_md"));
    assert!(!ui.warnings().is_empty());
}

#[test]
fn failed_verification_is_the_last_step() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("requirements.txt"), "fastapi\n").unwrap();

    let config = BasecampConfig::default();
    let mut platform = MockPlatform::new()
        .with_version("python3", "Python 3.10.2")
        .fail_with("import fastapi", "ModuleNotFoundError: No module named 'spacy'");
    let mut ui = MockUI::new();

    let report = Bootstrapper::new(&mut platform, &config, BootstrapOptions::new(temp.path()))
        .run(&mut ui);

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.steps().last(), Some(&StepName::Verify));
    assert!(matches!(
        report.failure,
        Some(BootstrapError::VerificationFailure { .. })
    ));
    assert!(report.launch.is_empty());
}
