//! Status presentation and interactive prompts.
//!
//! This module provides:
//! - [`StatusPresenter`] trait, the collaborator contract the evaluator and
//!   launch gate report through
//! - [`TerminalPresenter`] for interactive terminal usage
//! - [`LandingPrompter`] / [`TerminalPrompter`] for the recheck/launch loop
//! - [`MockPresenter`] and [`MockPrompter`] for tests
//!
//! The terminal presenter is the CLI analog of the landing page's status
//! markup: per-item checklist lines stand in for the `dependency-item`
//! entries, and [`StatusPresenter::announce`] drives the live `role="status"`
//! region equivalent.

pub mod icons;
pub mod mock;
pub mod prompts;
pub mod terminal;
pub mod theme;

pub use icons::StatusGlyph;
pub use mock::{MockPresenter, MockPrompter, PresenterEvent, SharedPresenter};
pub use prompts::{LandingAction, LandingPrompter, TerminalPrompter};
pub use terminal::TerminalPresenter;
pub use theme::GantryTheme;

use crate::evaluator::{CapabilityResult, ReadinessSnapshot};
use crate::launch::LaunchEvent;

/// How much output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Minimal output: outcomes only.
    Quiet,
    /// Checklist lines and live status.
    #[default]
    Normal,
    /// Everything, including probe details.
    Verbose,
}

/// Receives readiness and launch updates and renders them for the user.
///
/// Implementations only read the snapshot; the evaluator stays the single
/// writer.
pub trait StatusPresenter {
    /// Called whenever the current snapshot changes, including the initial
    /// partial snapshot with pending entries.
    fn snapshot_changed(&mut self, snapshot: &ReadinessSnapshot);

    /// Update the live status region with an aggregate message.
    fn announce(&mut self, message: &str);

    /// A launch attempt was blocked by the given outstanding items.
    fn launch_blocked(&mut self, outstanding: &[CapabilityResult]);

    /// A launch is proceeding to the resolved destination.
    fn launch_proceeding(&mut self, event: &LaunchEvent);
}
