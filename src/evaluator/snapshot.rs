//! Readiness snapshot types.
//!
//! A snapshot is the single source of truth the presenter and the launch
//! gate read: one result per checklist capability, in display order, plus
//! the derived aggregate verdict.

use serde::Serialize;

use crate::registry::CapabilityId;

/// State of one capability check within an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityState {
    /// The probe has not resolved yet.
    Pending,
    /// The capability is available.
    Pass,
    /// The capability is missing, denied, or errored.
    Fail,
}

impl CapabilityState {
    /// Whether the state is a terminal pass/fail.
    pub fn is_terminal(self) -> bool {
        !matches!(self, CapabilityState::Pending)
    }

    /// Lowercase wire form, matching the JSON serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityState::Pending => "pending",
            CapabilityState::Pass => "pass",
            CapabilityState::Fail => "fail",
        }
    }
}

/// The result of one capability check.
///
/// Created as `Pending` when an evaluation starts and updated in place as
/// its probe resolves. `message` carries the descriptor's pass/fail text
/// once terminal; `detail` carries a denial reason when there is one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityResult {
    pub id: CapabilityId,
    pub state: CapabilityState,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CapabilityResult {
    fn pending(id: CapabilityId) -> Self {
        Self {
            id,
            state: CapabilityState::Pending,
            message: None,
            detail: None,
        }
    }
}

/// Ordered capability results plus the derived aggregate verdict.
///
/// Invariant: `all_pass` is true iff no result is `Pending` or `Fail`.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessSnapshot {
    generation: u64,
    results: Vec<CapabilityResult>,
    all_pass: bool,
}

impl ReadinessSnapshot {
    /// A fresh snapshot with every capability pending.
    pub(crate) fn pending(generation: u64, ids: impl IntoIterator<Item = CapabilityId>) -> Self {
        Self {
            generation,
            results: ids.into_iter().map(CapabilityResult::pending).collect(),
            all_pass: false,
        }
    }

    /// The evaluation generation this snapshot belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Results in checklist display order.
    pub fn results(&self) -> &[CapabilityResult] {
        &self.results
    }

    /// The result for one capability.
    pub fn result(&self, id: CapabilityId) -> Option<&CapabilityResult> {
        self.results.iter().find(|r| r.id == id)
    }

    /// True iff every capability passed. Never true while a probe is
    /// still pending.
    pub fn all_pass(&self) -> bool {
        self.all_pass
    }

    /// Whether every result has reached a terminal state.
    pub fn is_settled(&self) -> bool {
        self.results.iter().all(|r| r.state.is_terminal())
    }

    /// Results that keep the launch gate closed (failing or pending).
    pub fn outstanding(&self) -> Vec<&CapabilityResult> {
        self.results
            .iter()
            .filter(|r| r.state != CapabilityState::Pass)
            .collect()
    }

    /// Record a terminal state for a capability.
    ///
    /// The first terminal write wins: a result that already resolved is
    /// left untouched, so a duplicate or late resolution cannot flip it.
    /// Returns whether the snapshot changed.
    pub(crate) fn record(
        &mut self,
        id: CapabilityId,
        state: CapabilityState,
        message: Option<String>,
        detail: Option<String>,
    ) -> bool {
        let Some(result) = self.results.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        if result.state.is_terminal() {
            return false;
        }
        result.state = state;
        result.message = message;
        result.detail = detail;
        self.all_pass = self
            .results
            .iter()
            .all(|r| r.state == CapabilityState::Pass);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_snapshot() -> ReadinessSnapshot {
        ReadinessSnapshot::pending(1, CapabilityId::ALL)
    }

    #[test]
    fn fresh_snapshot_is_pending_and_not_passing() {
        let snapshot = pending_snapshot();
        assert_eq!(snapshot.results().len(), 4);
        assert!(!snapshot.all_pass());
        assert!(!snapshot.is_settled());
        assert_eq!(snapshot.outstanding().len(), 4);
    }

    #[test]
    fn all_pass_requires_every_result_terminal_and_passing() {
        let mut snapshot = pending_snapshot();
        for id in [
            CapabilityId::SecureContext,
            CapabilityId::SpeechRecognition,
            CapabilityId::SpeechSynthesis,
        ] {
            snapshot.record(id, CapabilityState::Pass, Some("ok".into()), None);
        }
        // Microphone still pending
        assert!(!snapshot.all_pass());
        assert!(!snapshot.is_settled());

        snapshot.record(
            CapabilityId::Microphone,
            CapabilityState::Pass,
            Some("ok".into()),
            None,
        );
        assert!(snapshot.all_pass());
        assert!(snapshot.is_settled());
        assert!(snapshot.outstanding().is_empty());
    }

    #[test]
    fn any_failure_blocks_all_pass() {
        let mut snapshot = pending_snapshot();
        for id in CapabilityId::ALL {
            let state = if id == CapabilityId::Microphone {
                CapabilityState::Fail
            } else {
                CapabilityState::Pass
            };
            snapshot.record(id, state, Some("msg".into()), None);
        }
        assert!(snapshot.is_settled());
        assert!(!snapshot.all_pass());
        let outstanding = snapshot.outstanding();
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].id, CapabilityId::Microphone);
    }

    #[test]
    fn first_terminal_write_wins() {
        let mut snapshot = pending_snapshot();
        assert!(snapshot.record(
            CapabilityId::Microphone,
            CapabilityState::Fail,
            Some("denied".into()),
            None,
        ));
        // A late duplicate must not flip the result.
        assert!(!snapshot.record(
            CapabilityId::Microphone,
            CapabilityState::Pass,
            Some("granted".into()),
            None,
        ));
        let result = snapshot.result(CapabilityId::Microphone).unwrap();
        assert_eq!(result.state, CapabilityState::Fail);
        assert_eq!(result.message.as_deref(), Some("denied"));
    }

    #[test]
    fn snapshot_serializes_wire_states() {
        let mut snapshot = pending_snapshot();
        snapshot.record(
            CapabilityId::SecureContext,
            CapabilityState::Pass,
            Some("Secure context confirmed.".into()),
            None,
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"secure-context\""));
        assert!(json.contains("\"pass\""));
        assert!(json.contains("\"pending\""));
        assert!(json.contains("\"all_pass\":false"));
    }

    #[test]
    fn state_as_str_matches_serialization() {
        for state in [
            CapabilityState::Pending,
            CapabilityState::Pass,
            CapabilityState::Fail,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }
}
