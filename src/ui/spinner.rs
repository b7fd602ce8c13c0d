//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::shell::{OutputCallback, OutputLine};

use super::theme::BasecampTheme;
use super::SpinnerHandle;

/// Number of trailing output lines shown under a running spinner.
const LIVE_OUTPUT_LINES: usize = 3;

/// A progress spinner for long-running installs.
pub struct ProgressSpinner {
    bar: ProgressBar,
    base_message: String,
    theme: BasecampTheme,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str, theme: BasecampTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.magenta} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            base_message: message.to_string(),
            theme,
        }
    }

    /// Create a spinner that doesn't show.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            base_message: String::new(),
            theme: BasecampTheme::plain(),
        }
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.base_message = msg.to_string();
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish_with(line);
    }

    fn output_callback(&self) -> Option<OutputCallback> {
        Some(live_output_callback(
            self.bar.clone(),
            self.base_message.clone(),
            2,
            LIVE_OUTPUT_LINES,
        ))
    }
}

/// Create an output callback that updates a spinner with live output lines.
///
/// The callback keeps the last `max_lines` output lines in a ring buffer and
/// redraws the spinner as the base message plus those lines, so a long
/// download visibly makes progress.
pub fn live_output_callback(
    bar: ProgressBar,
    base_message: String,
    indent: usize,
    max_lines: usize,
) -> OutputCallback {
    let buffer: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
    let theme = BasecampTheme::new();

    Box::new(move |line: OutputLine| {
        let text = match &line {
            OutputLine::Stdout(s) => s.trim_end().to_string(),
            OutputLine::Stderr(s) => s.trim_end().to_string(),
        };

        if text.is_empty() {
            return;
        }

        let display_text = if text.chars().count() > 72 {
            format!("{}...", text.chars().take(69).collect::<String>())
        } else {
            text
        };

        // Poisoned: keep using the buffer.
        let mut buf = match buffer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        buf.push_back(display_text);
        while buf.len() > max_lines {
            buf.pop_front();
        }

        let prefix = " ".repeat(indent);
        let mut msg = base_message.clone();
        for line in buf.iter() {
            msg.push('\n');
            msg.push_str(&prefix);
            msg.push_str(&theme.dim.apply_to(format!("» {}", line)).to_string());
        }

        bar.set_message(msg);
    })
}
