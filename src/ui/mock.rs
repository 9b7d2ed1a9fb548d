//! Mock presenter and prompter for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use url::Url;

use crate::error::Result;
use crate::evaluator::{CapabilityResult, ReadinessSnapshot};
use crate::launch::LaunchEvent;

use super::prompts::{LandingAction, LandingPrompter};
use super::StatusPresenter;

/// One recorded presenter interaction.
#[derive(Debug, Clone)]
pub enum PresenterEvent {
    /// A snapshot update, captured by value.
    Snapshot(ReadinessSnapshot),
    /// A live status announcement.
    Announced(String),
    /// A blocked launch with the outstanding items.
    LaunchBlocked(Vec<CapabilityResult>),
    /// A proceeding launch with the resolved destination.
    LaunchProceeding(Url),
}

/// Presenter that records every interaction for assertions.
#[derive(Default)]
pub struct MockPresenter {
    events: Vec<PresenterEvent>,
}

impl MockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in order.
    pub fn events(&self) -> &[PresenterEvent] {
        &self.events
    }

    /// Announcements only, in order.
    pub fn announcements(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Announced(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Snapshot updates only, in order.
    pub fn snapshots(&self) -> Vec<&ReadinessSnapshot> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Snapshot(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Whether a blocked launch was presented.
    pub fn saw_blocked_launch(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, PresenterEvent::LaunchBlocked(_)))
    }

    /// Destinations of proceeding launches, in order.
    pub fn launch_destinations(&self) -> Vec<&Url> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::LaunchProceeding(url) => Some(url),
                _ => None,
            })
            .collect()
    }
}

impl StatusPresenter for MockPresenter {
    fn snapshot_changed(&mut self, snapshot: &ReadinessSnapshot) {
        self.events.push(PresenterEvent::Snapshot(snapshot.clone()));
    }

    fn announce(&mut self, message: &str) {
        self.events
            .push(PresenterEvent::Announced(message.to_string()));
    }

    fn launch_blocked(&mut self, outstanding: &[CapabilityResult]) {
        self.events
            .push(PresenterEvent::LaunchBlocked(outstanding.to_vec()));
    }

    fn launch_proceeding(&mut self, event: &LaunchEvent) {
        self.events
            .push(PresenterEvent::LaunchProceeding(event.url.clone()));
    }
}

/// Cloneable handle to a [`MockPresenter`] owned elsewhere.
///
/// The controller takes its presenter by value; tests hand it a clone of
/// this handle and keep inspecting the shared recorder afterwards.
#[derive(Clone, Default)]
pub struct SharedPresenter(Arc<Mutex<MockPresenter>>);

impl SharedPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the underlying recorder for assertions.
    pub fn lock(&self) -> MutexGuard<'_, MockPresenter> {
        self.0.lock().expect("mock presenter poisoned")
    }
}

impl StatusPresenter for SharedPresenter {
    fn snapshot_changed(&mut self, snapshot: &ReadinessSnapshot) {
        self.lock().snapshot_changed(snapshot);
    }

    fn announce(&mut self, message: &str) {
        self.lock().announce(message);
    }

    fn launch_blocked(&mut self, outstanding: &[CapabilityResult]) {
        self.lock().launch_blocked(outstanding);
    }

    fn launch_proceeding(&mut self, event: &LaunchEvent) {
        self.lock().launch_proceeding(event);
    }
}

/// Prompter that replays a scripted action sequence.
pub struct MockPrompter {
    script: VecDeque<LandingAction>,
}

impl MockPrompter {
    /// A prompter that will answer with the given actions in order and
    /// `Quit` once the script runs out.
    pub fn scripted(actions: impl IntoIterator<Item = LandingAction>) -> Self {
        Self {
            script: actions.into_iter().collect(),
        }
    }
}

impl LandingPrompter for MockPrompter {
    fn next_action(&mut self, _all_pass: bool) -> Result<LandingAction> {
        Ok(self.script.pop_front().unwrap_or(LandingAction::Quit))
    }
}
