//! Capability probes.
//!
//! A [`CapabilityProbe`] answers one question: is this capability usable on
//! the current host? Probes are polymorphic over the capability being tested
//! so the evaluator can treat the checklist uniformly and tests can
//! substitute fakes.
//!
//! Three of the four probes resolve synchronously. The microphone probe is
//! the exception: it requests capture access, which can block, so it returns
//! a [`DeferredProbe`] task that the evaluator runs on its own thread and
//! that reports back through a generation-tagged [`ProbeCompletion`].
//!
//! Containment contract: no probe failure escapes this boundary. Panics in
//! synchronous checks are caught by the evaluator; a deferred task that dies
//! without resolving converts to a denial when its completion handle drops.

mod host;
mod microphone;
mod secure_context;
mod speech;

pub use host::HostEnvironment;
pub use microphone::MicrophoneProbe;
pub use secure_context::SecureContextProbe;
pub use speech::{SpeechRecognitionProbe, SpeechSynthesisProbe};

use std::sync::mpsc::Sender;

use crate::registry::CapabilityId;

/// Outcome of a capability query.
///
/// `Granted` maps to a passing checklist entry; `Unsupported` and `Denied`
/// both map to a failing one, with `Denied` carrying the reason access was
/// refused or the query errored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// The capability is present and usable.
    Granted,
    /// The capability does not exist on this host.
    Unsupported,
    /// The capability exists but access was refused or the query errored.
    Denied(String),
}

impl ProbeVerdict {
    /// Whether this verdict passes the checklist entry.
    pub fn is_granted(&self) -> bool {
        matches!(self, ProbeVerdict::Granted)
    }

    /// The denial reason, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ProbeVerdict::Denied(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Result of invoking a probe.
pub enum ProbeOutcome {
    /// The probe answered immediately.
    Resolved(ProbeVerdict),
    /// The probe needs to run asynchronously; the evaluator launches the
    /// task with a completion handle tagged for the current evaluation.
    Deferred(DeferredProbe),
}

/// A capability query that cannot answer synchronously.
///
/// The task receives a [`ProbeCompletion`] and must call
/// [`ProbeCompletion::resolve`] exactly once. If the task panics or returns
/// without resolving, the dropped handle reports a denial instead.
pub struct DeferredProbe {
    task: Box<dyn FnOnce(ProbeCompletion) + Send + 'static>,
}

impl DeferredProbe {
    /// Wrap an asynchronous capability query.
    pub fn new(task: impl FnOnce(ProbeCompletion) + Send + 'static) -> Self {
        Self {
            task: Box::new(task),
        }
    }

    /// Run the task on a dedicated thread with the given completion handle.
    pub(crate) fn launch(self, completion: ProbeCompletion) {
        std::thread::spawn(move || (self.task)(completion));
    }
}

/// A single capability check.
///
/// Implementations must never panic past `check`; convert every internal
/// failure into a [`ProbeVerdict`].
pub trait CapabilityProbe: Send + Sync {
    /// Query the capability against the given host environment.
    fn check(&self, env: &HostEnvironment) -> ProbeOutcome;
}

/// A resolved probe verdict tagged with the evaluation it belongs to.
#[derive(Debug)]
pub(crate) struct ProbeResolution {
    pub(crate) generation: u64,
    pub(crate) id: CapabilityId,
    pub(crate) verdict: ProbeVerdict,
}

/// One-shot handle a deferred probe uses to deliver its verdict.
///
/// Carries the evaluation generation so a resolution arriving after a newer
/// evaluation has started is recognized as stale and dropped.
pub struct ProbeCompletion {
    tx: Sender<ProbeResolution>,
    generation: u64,
    id: CapabilityId,
    resolved: bool,
}

impl ProbeCompletion {
    pub(crate) fn new(tx: Sender<ProbeResolution>, generation: u64, id: CapabilityId) -> Self {
        Self {
            tx,
            generation,
            id,
            resolved: false,
        }
    }

    /// The capability this completion belongs to.
    pub fn id(&self) -> CapabilityId {
        self.id
    }

    /// Deliver the verdict. Consumes the handle; delivery is best-effort
    /// (the evaluator may already have moved on to a newer generation).
    pub fn resolve(mut self, verdict: ProbeVerdict) {
        self.resolved = true;
        let _ = self.tx.send(ProbeResolution {
            generation: self.generation,
            id: self.id,
            verdict,
        });
    }
}

impl Drop for ProbeCompletion {
    fn drop(&mut self) {
        if !self.resolved {
            let _ = self.tx.send(ProbeResolution {
                generation: self.generation,
                id: self.id,
                verdict: ProbeVerdict::Denied("probe abandoned before resolving".to_string()),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn verdict_granted_passes() {
        assert!(ProbeVerdict::Granted.is_granted());
        assert!(!ProbeVerdict::Unsupported.is_granted());
        assert!(!ProbeVerdict::Denied("no".into()).is_granted());
    }

    #[test]
    fn verdict_detail_only_for_denied() {
        assert_eq!(ProbeVerdict::Granted.detail(), None);
        assert_eq!(ProbeVerdict::Unsupported.detail(), None);
        assert_eq!(
            ProbeVerdict::Denied("permission denied".into()).detail(),
            Some("permission denied")
        );
    }

    #[test]
    fn completion_resolve_delivers_tagged_verdict() {
        let (tx, rx) = mpsc::channel();
        let completion = ProbeCompletion::new(tx, 7, CapabilityId::Microphone);
        completion.resolve(ProbeVerdict::Granted);

        let resolution = rx.recv().unwrap();
        assert_eq!(resolution.generation, 7);
        assert_eq!(resolution.id, CapabilityId::Microphone);
        assert_eq!(resolution.verdict, ProbeVerdict::Granted);
    }

    #[test]
    fn completion_drop_without_resolve_reports_denial() {
        let (tx, rx) = mpsc::channel();
        let completion = ProbeCompletion::new(tx, 3, CapabilityId::Microphone);
        drop(completion);

        let resolution = rx.recv().unwrap();
        assert_eq!(resolution.generation, 3);
        assert!(matches!(resolution.verdict, ProbeVerdict::Denied(_)));
    }

    #[test]
    fn completion_resolve_sends_exactly_once() {
        let (tx, rx) = mpsc::channel();
        let completion = ProbeCompletion::new(tx, 1, CapabilityId::Microphone);
        completion.resolve(ProbeVerdict::Unsupported);

        assert!(rx.recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn deferred_probe_runs_task_with_completion() {
        let (tx, rx) = mpsc::channel();
        let completion = ProbeCompletion::new(tx, 2, CapabilityId::Microphone);
        let task = DeferredProbe::new(|completion: ProbeCompletion| {
            completion.resolve(ProbeVerdict::Granted);
        });
        task.launch(completion);

        let resolution = rx.recv().unwrap();
        assert_eq!(resolution.verdict, ProbeVerdict::Granted);
    }

    #[test]
    fn deferred_probe_panic_converts_to_denial() {
        let (tx, rx) = mpsc::channel();
        let completion = ProbeCompletion::new(tx, 2, CapabilityId::Microphone);
        let task = DeferredProbe::new(|_completion: ProbeCompletion| {
            panic!("capture backend exploded");
        });
        task.launch(completion);

        let resolution = rx.recv().unwrap();
        assert!(matches!(resolution.verdict, ProbeVerdict::Denied(_)));
    }
}
