//! The bootstrap sequence and its steps.
//!
//! - [`capability`]: what the host offers
//! - [`strategy`]: unified tool or legacy environment
//! - [`context`]: how every later command is built
//! - [`provision`]: the legacy environment
//! - [`install`], [`artifact`], [`verify`]: the install steps
//! - [`report`]: progress and launch instructions
//! - [`engine`]: runs all of the above once, in order
//!
//! # Example
//!
//! ```
//! use basecamp::bootstrap::{BootstrapOptions, Bootstrapper};
//! use basecamp::config::BasecampConfig;
//! use basecamp::platform::MockPlatform;
//! use basecamp::ui::MockUI;
//!
//! // No runtime on this "host": the run stops after the probe.
//! let mut platform = MockPlatform::new();
//! let config = BasecampConfig::default();
//! let mut ui = MockUI::new();
//!
//! let report = Bootstrapper::new(&mut platform, &config, BootstrapOptions::new("."))
//!     .run(&mut ui);
//!
//! assert_eq!(report.exit_code(), 1);
//! assert!(platform.commands().is_empty());
//! ```

pub mod artifact;
pub mod capability;
pub mod context;
pub mod engine;
pub mod install;
pub mod outcome;
pub mod provision;
pub mod report;
pub mod strategy;
pub mod verify;

pub use capability::{probe, RuntimeCapability, RuntimeVersion};
pub use context::{ExecutionContext, Invocation};
pub use engine::{BootstrapOptions, BootstrapReport, Bootstrapper};
pub use outcome::{InstallOutcome, Phase, StepName};
pub use provision::EnvironmentHandle;
pub use strategy::Strategy;
