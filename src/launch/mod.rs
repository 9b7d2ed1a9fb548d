//! Launch gating and dispatch.
//!
//! The [`LaunchGate`] decides whether the launch action may proceed. It only
//! reads the readiness snapshot; when every check passes it resolves the
//! destination URL and synchronously notifies every registered observer
//! with a typed [`LaunchEvent`]. The event carries the fixed wire name
//! [`LAUNCH_INTENT`] so external shells can keep matching on the
//! `<namespace>:launch` contract.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::error::{GantryError, Result};
use crate::evaluator::{CapabilityResult, ReadinessSnapshot};

/// Wire name of the launch intent event. The namespace segment is the
/// versionable part; the `:launch` suffix is fixed.
pub const LAUNCH_INTENT: &str = "voicelab:launch";

/// Path of the downstream application's entry resource, relative to the
/// landing base URL.
pub const APP_ENTRY_PATH: &str = "AI/index.html";

/// Ephemeral launch intent: where to resolve from and when it was asked.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    base: Url,
    requested_at: DateTime<Utc>,
}

impl LaunchRequest {
    /// A launch request against the given base (the page location).
    pub fn new(base: Url) -> Self {
        Self {
            base,
            requested_at: Utc::now(),
        }
    }

    /// The base URL the destination resolves against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// When the launch was requested.
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }
}

/// The message dispatched to observers when a launch proceeds.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchEvent {
    /// Fixed wire name ([`LAUNCH_INTENT`]).
    pub name: &'static str,
    /// Resolved destination URL of the downstream application.
    pub url: Url,
    /// When the launch was requested.
    pub requested_at: DateTime<Utc>,
}

/// Result of a launch attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum LaunchOutcome {
    /// Every check passed; this event was dispatched.
    Proceed { event: LaunchEvent },
    /// At least one check is failing or still pending; nothing was
    /// dispatched. Surfacing the outstanding items is the presenter's job.
    Blocked { outstanding: Vec<CapabilityResult> },
}

impl LaunchOutcome {
    /// Whether the launch proceeded.
    pub fn proceeded(&self) -> bool {
        matches!(self, LaunchOutcome::Proceed { .. })
    }
}

/// Resolve the downstream application URL against a base.
///
/// Pure and deterministic: the same base always yields the same URL,
/// independent of readiness state.
pub fn resolve_launch_url(base: &Url) -> Result<Url> {
    base.join(APP_ENTRY_PATH)
        .map_err(|err| GantryError::LaunchUrlError {
            base: base.to_string(),
            message: err.to_string(),
        })
}

type LaunchObserver = Box<dyn Fn(&LaunchEvent) + Send>;

/// Decides whether launch may proceed and dispatches launch intent.
#[derive(Default)]
pub struct LaunchGate {
    observers: Vec<LaunchObserver>,
}

impl LaunchGate {
    /// A gate with no observers registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer invoked synchronously on every dispatched
    /// launch event. Dispatch is fire-and-forget; observers cannot veto.
    pub fn subscribe(&mut self, observer: impl Fn(&LaunchEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Attempt to launch against the given snapshot.
    ///
    /// Blocked outcomes dispatch nothing; a proceeding outcome dispatches
    /// exactly one event carrying the resolved URL.
    pub fn attempt_launch(
        &self,
        snapshot: &ReadinessSnapshot,
        request: LaunchRequest,
    ) -> Result<LaunchOutcome> {
        if !snapshot.all_pass() {
            let outstanding = snapshot.outstanding().into_iter().cloned().collect();
            return Ok(LaunchOutcome::Blocked { outstanding });
        }

        let url = resolve_launch_url(request.base())?;
        let event = LaunchEvent {
            name: LAUNCH_INTENT,
            url,
            requested_at: request.requested_at(),
        };
        tracing::debug!("dispatching {} -> {}", event.name, event.url);
        for observer in &self.observers {
            observer(&event);
        }
        Ok(LaunchOutcome::Proceed { event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::CapabilityState;
    use crate::registry::CapabilityId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn snapshot_with(all_pass: bool) -> ReadinessSnapshot {
        let mut snapshot = ReadinessSnapshot::pending(1, CapabilityId::ALL);
        for id in CapabilityId::ALL {
            let state = if all_pass || id != CapabilityId::Microphone {
                CapabilityState::Pass
            } else {
                CapabilityState::Fail
            };
            snapshot.record(id, state, Some("msg".into()), None);
        }
        snapshot
    }

    fn request(base: &str) -> LaunchRequest {
        LaunchRequest::new(Url::parse(base).unwrap())
    }

    #[test]
    fn resolve_launch_url_targets_the_ai_bundle() {
        let url = resolve_launch_url(&Url::parse("https://example.com/landing/").unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/landing/AI/index.html");
    }

    #[test]
    fn resolve_launch_url_is_deterministic() {
        let base = Url::parse("https://unity-lab-ai.github.io/Talk/").unwrap();
        assert_eq!(
            resolve_launch_url(&base).unwrap(),
            resolve_launch_url(&base).unwrap()
        );
    }

    #[test]
    fn resolve_launch_url_rejects_non_base_urls() {
        let base = Url::parse("data:text/plain,hello").unwrap();
        assert!(matches!(
            resolve_launch_url(&base),
            Err(GantryError::LaunchUrlError { .. })
        ));
    }

    #[test]
    fn launch_proceeds_and_dispatches_exactly_one_event() {
        let dispatched = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&dispatched);
        let mut gate = LaunchGate::new();
        gate.subscribe(move |event| {
            assert_eq!(event.name, "voicelab:launch");
            assert_eq!(
                event.url.as_str(),
                "https://example.com/landing/AI/index.html"
            );
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let outcome = gate
            .attempt_launch(&snapshot_with(true), request("https://example.com/landing/"))
            .unwrap();

        assert!(outcome.proceeded());
        assert_eq!(dispatched.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn blocked_launch_dispatches_nothing() {
        let dispatched = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&dispatched);
        let mut gate = LaunchGate::new();
        gate.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let outcome = gate
            .attempt_launch(&snapshot_with(false), request("https://example.com/landing/"))
            .unwrap();

        match outcome {
            LaunchOutcome::Blocked { outstanding } => {
                assert_eq!(outstanding.len(), 1);
                assert_eq!(outstanding[0].id, CapabilityId::Microphone);
            }
            LaunchOutcome::Proceed { .. } => panic!("launch must be blocked"),
        }
        assert_eq!(dispatched.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn pending_snapshot_blocks_launch() {
        let snapshot = ReadinessSnapshot::pending(1, CapabilityId::ALL);
        let gate = LaunchGate::new();
        let outcome = gate
            .attempt_launch(&snapshot, request("https://example.com/landing/"))
            .unwrap();
        match outcome {
            LaunchOutcome::Blocked { outstanding } => assert_eq!(outstanding.len(), 4),
            LaunchOutcome::Proceed { .. } => panic!("pending snapshot must block"),
        }
    }

    #[test]
    fn launch_intent_matches_the_namespaced_pattern() {
        let (namespace, action) = LAUNCH_INTENT.split_once(':').unwrap();
        assert!(!namespace.is_empty());
        assert_eq!(action, "launch");
    }

    #[test]
    fn all_observers_receive_the_event() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut gate = LaunchGate::new();
        for _ in 0..3 {
            let count = Arc::clone(&count);
            gate.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        gate.attempt_launch(&snapshot_with(true), request("https://example.com/landing/"))
            .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
