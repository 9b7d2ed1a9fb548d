//! Terminal status presenter.
//!
//! Renders the readiness checklist as it resolves: terminal results print
//! once each, in display order, while a spinner runs for checks still in
//! flight. Announcements stand in for the landing page's live status
//! region.

use std::collections::HashSet;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::evaluator::{CapabilityResult, CapabilityState, ReadinessSnapshot};
use crate::launch::LaunchEvent;
use crate::registry::CapabilityId;

use super::icons::StatusGlyph;
use super::theme::GantryTheme;
use super::{OutputMode, StatusPresenter};

/// Interactive terminal implementation of [`StatusPresenter`].
pub struct TerminalPresenter {
    theme: GantryTheme,
    mode: OutputMode,
    interactive: bool,
    spinner: Option<ProgressBar>,
    printed: HashSet<CapabilityId>,
    generation: u64,
}

impl TerminalPresenter {
    /// Create a presenter.
    ///
    /// `interactive` controls whether a spinner animates while the deferred
    /// probe is in flight; non-interactive output stays line-oriented.
    pub fn new(theme: GantryTheme, mode: OutputMode, interactive: bool) -> Self {
        Self {
            theme,
            mode,
            interactive,
            spinner: None,
            printed: HashSet::new(),
            generation: 0,
        }
    }

    fn emit(&self, line: &str) {
        match &self.spinner {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }

    fn result_line(&self, result: &CapabilityResult) -> String {
        let glyph = StatusGlyph::from(result.state);
        let message = result.message.as_deref().unwrap_or("checking…");
        let mut line = format!(
            "{} {}  {}",
            glyph.styled(&self.theme),
            self.theme.highlight.apply_to(result.id.as_str()),
            message
        );
        if self.mode == OutputMode::Verbose {
            if let Some(detail) = &result.detail {
                line.push_str(&format!("\n    {}", self.theme.dim.apply_to(detail)));
            }
        }
        line
    }

    fn start_spinner(&mut self, pending: usize) {
        if !self.interactive || self.spinner.is_some() {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("static spinner template"),
        );
        bar.set_message(if pending == 1 {
            "Requesting microphone access…".to_string()
        } else {
            format!("Waiting for {} checks…", pending)
        });
        bar.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(bar);
    }

    fn stop_spinner(&mut self) {
        if let Some(bar) = self.spinner.take() {
            bar.finish_and_clear();
        }
    }
}

impl StatusPresenter for TerminalPresenter {
    fn snapshot_changed(&mut self, snapshot: &ReadinessSnapshot) {
        if snapshot.generation() != self.generation {
            self.generation = snapshot.generation();
            self.printed.clear();
        }

        if self.mode != OutputMode::Quiet {
            for result in snapshot.results() {
                if result.state.is_terminal() && self.printed.insert(result.id) {
                    let line = self.result_line(result);
                    self.emit(&line);
                }
            }
        }

        let pending = snapshot
            .results()
            .iter()
            .filter(|r| r.state == CapabilityState::Pending)
            .count();
        if pending > 0 {
            self.start_spinner(pending);
        } else {
            self.stop_spinner();
        }
    }

    fn announce(&mut self, message: &str) {
        if self.mode == OutputMode::Quiet {
            return;
        }
        let line = self.theme.format_status(message);
        self.emit(&line);
    }

    fn launch_blocked(&mut self, outstanding: &[CapabilityResult]) {
        self.stop_spinner();
        if self.mode == OutputMode::Quiet {
            return;
        }
        self.emit(&self.theme.format_error("Launch blocked."));
        for result in outstanding {
            let glyph = StatusGlyph::Blocked;
            let message = result.message.as_deref().unwrap_or("still checking");
            let line = format!(
                "  {} {}  {}",
                glyph.styled(&self.theme),
                result.id.as_str(),
                message
            );
            self.emit(&line);
        }
    }

    fn launch_proceeding(&mut self, event: &LaunchEvent) {
        self.stop_spinner();
        if self.mode == OutputMode::Quiet {
            return;
        }
        let line = self
            .theme
            .format_success(&format!("Launching Unity Voice Lab → {}", event.url));
        self.emit(&line);
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}
