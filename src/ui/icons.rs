//! Unified status vocabulary for checklist output.
//!
//! `StatusGlyph` provides the canonical icons and colors used everywhere a
//! capability state is rendered, so the checklist, the blocked-launch
//! summary, and the JSON-adjacent plain output all agree.

use crate::evaluator::CapabilityState;

use super::theme::GantryTheme;

/// Canonical status kinds used across Gantry output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusGlyph {
    /// Check passed.
    Pass,
    /// Check failed.
    Fail,
    /// Check has not resolved yet.
    Pending,
    /// Launch is blocked by outstanding checks.
    Blocked,
}

impl StatusGlyph {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Fail => "✗",
            Self::Pending => "◌",
            Self::Blocked => "⊘",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Pass => "[ok]",
            Self::Fail => "[FAIL]",
            Self::Pending => "[pending]",
            Self::Blocked => "[blocked]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &GantryTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Pass => theme.success.apply_to(icon).to_string(),
            Self::Fail => theme.error.apply_to(icon).to_string(),
            Self::Pending => theme.dim.apply_to(icon).to_string(),
            Self::Blocked => theme.warning.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &GantryTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }
}

impl From<CapabilityState> for StatusGlyph {
    fn from(state: CapabilityState) -> Self {
        match state {
            CapabilityState::Pending => Self::Pending,
            CapabilityState::Pass => Self::Pass,
            CapabilityState::Fail => Self::Fail,
        }
    }
}
