//! Bootstrap controller.
//!
//! Explicit composition of the landing flow: a host builds the evaluator,
//! gate, and presenter, hands them to [`initialize`], and drives the
//! returned [`LandingController`]. Nothing runs at module load; the
//! page-ready hook is [`LandingController::bootstrap`], the Re-check and
//! Launch controls are [`LandingController::recheck`] and
//! [`LandingController::launch`].

use std::time::Duration;

use url::Url;

use crate::config::LandingConfig;
use crate::error::Result;
use crate::evaluator::{ReadinessEvaluator, ReadinessSnapshot};
use crate::launch::{LaunchGate, LaunchOutcome, LaunchRequest};
use crate::ui::{LandingAction, LandingPrompter, StatusPresenter};

/// Coarse application state, mirrored to the page's `data-app-state`
/// attribute by the markup renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// The readiness checklist is in charge.
    Landing,
    /// A launch has been dispatched to the downstream app.
    Launching,
}

impl AppState {
    /// The `data-app-state` attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            AppState::Landing => "landing",
            AppState::Launching => "launching",
        }
    }
}

/// Wires document lifecycle and UI events to the evaluator and launch gate.
pub struct LandingController {
    config: LandingConfig,
    evaluator: ReadinessEvaluator,
    gate: LaunchGate,
    presenter: Box<dyn StatusPresenter>,
    state: AppState,
    bootstrapped: bool,
}

/// Compose the landing flow. Pure wiring; call
/// [`LandingController::bootstrap`] to run the initial evaluation.
pub fn initialize(
    config: LandingConfig,
    evaluator: ReadinessEvaluator,
    gate: LaunchGate,
    presenter: Box<dyn StatusPresenter>,
) -> LandingController {
    LandingController {
        config,
        evaluator,
        gate,
        presenter,
        state: AppState::Landing,
        bootstrapped: false,
    }
}

impl LandingController {
    /// Run the initial evaluation. Idempotent: a second call is a no-op, so
    /// a host cannot double-run the page-ready work.
    pub fn bootstrap(&mut self) {
        if self.bootstrapped {
            tracing::debug!("bootstrap called twice; ignoring");
            return;
        }
        self.bootstrapped = true;
        self.evaluator.evaluate();
        self.notify();
    }

    /// Re-run the readiness checks, superseding any evaluation in flight.
    pub fn recheck(&mut self) {
        self.evaluator.evaluate();
        self.notify();
    }

    /// Wait for the current evaluation to settle, then update the
    /// presenter. Returns whether every check reached a terminal state.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let settled = self.evaluator.wait_settled(timeout);
        self.notify();
        settled
    }

    /// Attempt the gated launch. `base` defaults to the configured origin
    /// (the page location).
    pub fn launch(&mut self, base: Option<Url>) -> Result<LaunchOutcome> {
        let base = match base {
            Some(base) => base,
            None => self.config.origin_url()?,
        };
        // Fold in any resolution that arrived since the last update.
        self.evaluator.poll();
        let outcome = self
            .gate
            .attempt_launch(self.evaluator.snapshot(), LaunchRequest::new(base))?;
        match &outcome {
            LaunchOutcome::Blocked { outstanding } => {
                self.presenter.launch_blocked(outstanding);
            }
            LaunchOutcome::Proceed { event } => {
                self.state = AppState::Launching;
                self.presenter.launch_proceeding(event);
            }
        }
        Ok(outcome)
    }

    /// Drive the interactive recheck/launch loop until the user quits or a
    /// launch proceeds.
    pub fn run_interactive(
        &mut self,
        prompter: &mut dyn LandingPrompter,
        timeout: Duration,
    ) -> Result<AppState> {
        loop {
            self.settle(timeout);
            match prompter.next_action(self.snapshot().all_pass())? {
                LandingAction::Launch => {
                    if self.launch(None)?.proceeded() {
                        return Ok(self.state);
                    }
                }
                LandingAction::Recheck => self.recheck(),
                LandingAction::Quit => return Ok(self.state),
            }
        }
    }

    /// The current readiness snapshot.
    pub fn snapshot(&self) -> &ReadinessSnapshot {
        self.evaluator.snapshot()
    }

    /// The coarse app state (`data-app-state` analog).
    pub fn app_state(&self) -> AppState {
        self.state
    }

    /// The configuration this flow runs under.
    pub fn config(&self) -> &LandingConfig {
        &self.config
    }

    fn notify(&mut self) {
        self.presenter.snapshot_changed(self.evaluator.snapshot());
        let message = aggregate_message(self.evaluator.snapshot());
        self.presenter.announce(&message);
    }
}

/// The live status region message for a snapshot.
fn aggregate_message(snapshot: &ReadinessSnapshot) -> String {
    if !snapshot.is_settled() {
        return "Running readiness checks…".to_string();
    }
    if snapshot.all_pass() {
        return "All readiness checks passed. Ready to launch.".to_string();
    }
    let failing = snapshot.outstanding().len();
    format!(
        "{} of {} checks need attention.",
        failing,
        snapshot.results().len()
    )
}
