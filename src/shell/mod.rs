//! Process execution and host environment checks.

pub mod command;
pub mod platform;

pub use command::{
    execute, execute_streaming, version_output, CommandResult, CommandSpec, OutputCallback,
    OutputHandling, OutputLine,
};
pub use platform::{is_ci, path_with_prepended};
