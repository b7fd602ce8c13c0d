//! basecamp - Bootstrap a Python service checkout in one command.
//!
//! basecamp probes the host for a Python runtime and the `uv` tool, picks an
//! installation strategy, installs the project's dependencies and language
//! model, smoke-tests the imports and prints how to start the service.
//!
//! # Modules
//!
//! - [`bootstrap`] - The bootstrap sequence and its steps
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`platform`] - POSIX and Windows host adapters
//! - [`shell`] - Shell command execution
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use basecamp::bootstrap::RuntimeVersion;
//!
//! let found = RuntimeVersion::extract("Python 3.11.4").unwrap();
//! assert!(found >= RuntimeVersion::new(3, 8, 0));
//! ```
//!
//! For end-to-end runs, see the integration tests.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod platform;
pub mod shell;
pub mod ui;

pub use error::{BootstrapError, Result};
