//! Visual theme and styling.

use console::Style;

/// Gantry's visual theme.
#[derive(Debug, Clone)]
pub struct GantryTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for informational/running elements (cyan).
    pub info: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for contextual hints (cyan dim).
    pub hint: Style,
}

impl Default for GantryTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl GantryTheme {
    /// Create the default Gantry theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            hint: Style::new().cyan().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            hint: Style::new(),
        }
    }

    /// Pick colored or plain styling based on the environment.
    pub fn auto() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a live status announcement (the `role="status"` analog).
    pub fn format_status(&self, msg: &str) -> String {
        format!("{} {}", self.info.apply_to("◆ status"), msg)
    }
}

/// Whether colored output should be used.
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::colors_enabled()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_success_includes_icon_and_message() {
        let theme = GantryTheme::plain();
        let out = theme.format_success("microphone ready");
        assert!(out.contains('✓'));
        assert!(out.contains("microphone ready"));
    }

    #[test]
    fn format_error_includes_icon_and_message() {
        let theme = GantryTheme::plain();
        let out = theme.format_error("microphone denied");
        assert!(out.contains('✗'));
        assert!(out.contains("microphone denied"));
    }

    #[test]
    fn format_status_prefixes_the_live_region_marker() {
        let theme = GantryTheme::plain();
        let out = theme.format_status("Running readiness checks…");
        assert!(out.contains("status"));
        assert!(out.contains("Running readiness checks…"));
    }
}
