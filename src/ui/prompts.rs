//! Interactive landing actions.
//!
//! After the checklist settles, the interactive flow offers the same two
//! controls the landing page does: launch and re-check. The prompt lives
//! behind a trait so the controller loop can be driven by a script in
//! tests.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

use crate::error::{GantryError, Result};

/// What the user chose to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingAction {
    /// Attempt the gated launch.
    Launch,
    /// Re-run the readiness checks.
    Recheck,
    /// Leave the landing flow.
    Quit,
}

/// Source of the next landing action.
pub trait LandingPrompter {
    /// Ask for the next action. `all_pass` lets implementations pre-select
    /// the most likely choice.
    fn next_action(&mut self, all_pass: bool) -> Result<LandingAction>;
}

/// Dialoguer-backed prompter for interactive terminals.
#[derive(Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl LandingPrompter for TerminalPrompter {
    fn next_action(&mut self, all_pass: bool) -> Result<LandingAction> {
        let items = ["Launch Unity Voice Lab", "Re-run checks", "Quit"];
        let default = if all_pass { 0 } else { 1 };
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What next?")
            .items(&items)
            .default(default)
            .interact()
            .map_err(|err| GantryError::PromptFailed {
                message: err.to_string(),
            })?;
        Ok(match choice {
            0 => LandingAction::Launch,
            1 => LandingAction::Recheck,
            _ => LandingAction::Quit,
        })
    }
}
