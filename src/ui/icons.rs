//! Unified status vocabulary for consistent CLI output.
//!
//! Every status line basecamp prints starts with one of these symbols so
//! an operator can scan a long install log by its left column.

use super::theme::BasecampTheme;

/// Canonical status kinds used across all output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// An attempt is starting, or neutral information.
    Info,
    /// Operation completed successfully.
    Success,
    /// Operation failed.
    Failed,
    /// Non-fatal warning.
    Warning,
    /// Operation was not needed (e.g. environment reused).
    Skipped,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "→",
            Self::Success => "✓",
            Self::Failed => "✗",
            Self::Warning => "⚠",
            Self::Skipped => "○",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Info => "[info]",
            Self::Success => "[ok]",
            Self::Failed => "[FAIL]",
            Self::Warning => "[warn]",
            Self::Skipped => "[skip]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &BasecampTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Info => theme.info.apply_to(icon).to_string(),
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
            Self::Skipped => theme.dim.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &BasecampTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }

    /// Format a status line without styling.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.icon(), msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_returns_unicode_symbols() {
        assert_eq!(StatusKind::Info.icon(), "→");
        assert_eq!(StatusKind::Success.icon(), "✓");
        assert_eq!(StatusKind::Failed.icon(), "✗");
        assert_eq!(StatusKind::Warning.icon(), "⚠");
        assert_eq!(StatusKind::Skipped.icon(), "○");
    }

    #[test]
    fn bracketed_returns_text_labels() {
        assert_eq!(StatusKind::Info.bracketed(), "[info]");
        assert_eq!(StatusKind::Failed.bracketed(), "[FAIL]");
    }

    #[test]
    fn styled_returns_string_with_icon() {
        let theme = BasecampTheme::plain();
        for kind in [
            StatusKind::Info,
            StatusKind::Success,
            StatusKind::Failed,
            StatusKind::Warning,
            StatusKind::Skipped,
        ] {
            let styled = kind.styled(&theme);
            assert!(
                styled.contains(kind.icon()),
                "styled({:?}) missing icon",
                kind
            );
        }
    }

    #[test]
    fn format_plain_prefixes_icon() {
        assert_eq!(StatusKind::Failed.format_plain("uv sync"), "✗ uv sync");
    }
}
