//! Non-interactive UI for pipes, CI and log files.

use super::theme::BasecampTheme;
use super::{OutputMode, SpinnerHandle, StatusKind, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Prints one plain line per event: no spinners, no colors, no cursor
/// movement. Errors go to stderr so a redirected stdout stays readable.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn info(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", StatusKind::Info.format_plain(msg));
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", StatusKind::Success.format_plain(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", StatusKind::Warning.format_plain(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", StatusKind::Failed.format_plain(msg));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.info(message);
        Box::new(NoopSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n⛺ {}\n", title);
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        eprintln!("    ┌─ Command ──────────────────────────");
        eprintln!("    │ {}", command);
        if !output.is_empty() {
            eprintln!("    ├─ Output ───────────────────────────");
            for line in output.lines() {
                eprintln!("    │ {}", line);
            }
        }
        eprintln!("    └────────────────────────────────────");
        if let Some(h) = hint {
            eprintln!("    Hint: {}", h);
        }
    }

    fn show_launch_block(&mut self, commands: &[String], docs_url: &str) {
        println!();
        println!("To start the service:");
        for command in commands {
            println!("  {}", command);
        }
        println!();
        println!("API docs: {}", docs_url);
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints its final state as a plain line.
struct NoopSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", BasecampTheme::plain().format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", BasecampTheme::plain().format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", BasecampTheme::plain().format_skipped(msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_is_not_interactive() {
        let ui = NonInteractiveUI::new(OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn output_mode_preserved() {
        let ui = NonInteractiveUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn noop_spinner_has_no_output_callback() {
        let mut ui = NonInteractiveUI::new(OutputMode::Quiet);
        let spinner = ui.start_spinner("Installing");
        assert!(spinner.output_callback().is_none());
    }

    #[test]
    fn noop_spinner_methods() {
        let mut spinner = NoopSpinner {
            mode: OutputMode::Normal,
        };
        spinner.set_message("test");
        spinner.finish_success("done");
        spinner.finish_skipped("reused");
    }
}
