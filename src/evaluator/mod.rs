//! Readiness evaluation.
//!
//! The [`ReadinessEvaluator`] runs every registered probe and reconciles the
//! results into the current [`ReadinessSnapshot`]. Synchronous probes
//! resolve during [`ReadinessEvaluator::evaluate`] itself; the deferred
//! microphone probe reports back through an mpsc channel and is folded in by
//! [`ReadinessEvaluator::poll`] / [`ReadinessEvaluator::wait_settled`].
//!
//! Every `evaluate()` call starts a new generation and discards the previous
//! snapshot. Resolutions are tagged with the generation that spawned them;
//! a resolution arriving for an older generation is dropped at the single
//! apply point, so a recheck always supersedes an in-flight evaluation
//! (last request wins, never the other way around).

mod snapshot;

pub use snapshot::{CapabilityResult, CapabilityState, ReadinessSnapshot};

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::probes::{
    HostEnvironment, ProbeCompletion, ProbeOutcome, ProbeResolution, ProbeVerdict,
};
use crate::registry::DependencyRegistry;

/// Runs capability probes and owns the current readiness snapshot.
///
/// Single writer: only the evaluator mutates the snapshot. The presenter
/// and the launch gate read it through [`ReadinessEvaluator::snapshot`].
pub struct ReadinessEvaluator {
    registry: DependencyRegistry,
    env: HostEnvironment,
    generation: u64,
    snapshot: ReadinessSnapshot,
    tx: Sender<ProbeResolution>,
    rx: Receiver<ProbeResolution>,
}

impl ReadinessEvaluator {
    /// Create an evaluator over the given checklist and host view.
    pub fn new(registry: DependencyRegistry, env: HostEnvironment) -> Self {
        let (tx, rx) = mpsc::channel();
        let snapshot = ReadinessSnapshot::pending(0, registry.list().iter().map(|d| d.id()));
        Self {
            registry,
            env,
            generation: 0,
            snapshot,
            tx,
            rx,
        }
    }

    /// The checklist this evaluator runs.
    pub fn registry(&self) -> &DependencyRegistry {
        &self.registry
    }

    /// The host view probes run against.
    pub fn env(&self) -> &HostEnvironment {
        &self.env
    }

    /// The current snapshot. May contain pending entries while the
    /// deferred probe is in flight; callers must not treat a partial
    /// snapshot as final.
    pub fn snapshot(&self) -> &ReadinessSnapshot {
        &self.snapshot
    }

    /// Start a fresh evaluation, superseding any in-flight one.
    ///
    /// Probes run in registry order. The returned snapshot already carries
    /// every synchronous result; deferred probes are still pending and
    /// resolve through [`poll`](Self::poll) or
    /// [`wait_settled`](Self::wait_settled).
    pub fn evaluate(&mut self) -> &ReadinessSnapshot {
        self.generation += 1;
        let generation = self.generation;
        tracing::debug!("starting readiness evaluation (generation {})", generation);
        self.snapshot =
            ReadinessSnapshot::pending(generation, self.registry.list().iter().map(|d| d.id()));

        for index in 0..self.registry.list().len() {
            // Scope the registry borrow so resolutions can be applied below.
            let (id, outcome) = {
                let descriptor = &self.registry.list()[index];
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| descriptor.probe().check(&self.env)));
                (descriptor.id(), outcome)
            };
            match outcome {
                Ok(ProbeOutcome::Resolved(verdict)) => {
                    self.apply(ProbeResolution {
                        generation,
                        id,
                        verdict,
                    });
                }
                Ok(ProbeOutcome::Deferred(task)) => {
                    task.launch(ProbeCompletion::new(self.tx.clone(), generation, id));
                }
                Err(_) => {
                    tracing::warn!("probe for '{}' panicked; recording failure", id);
                    self.apply(ProbeResolution {
                        generation,
                        id,
                        verdict: ProbeVerdict::Denied("capability query panicked".to_string()),
                    });
                }
            }
        }

        &self.snapshot
    }

    /// Fold in any probe resolutions that have arrived, without blocking.
    ///
    /// Returns whether the snapshot changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(resolution) => changed |= self.apply(resolution),
                Err(_) => break,
            }
        }
        changed
    }

    /// Block until every probe has reached a terminal state or the timeout
    /// passes. Returns whether the snapshot settled.
    pub fn wait_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.snapshot.is_settled() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(resolution) => {
                    self.apply(resolution);
                }
                Err(RecvTimeoutError::Timeout) => return self.snapshot.is_settled(),
                Err(RecvTimeoutError::Disconnected) => return self.snapshot.is_settled(),
            }
        }
    }

    /// Apply one resolution to the snapshot, enforcing the generation guard
    /// and deriving the user-facing message from the descriptor.
    fn apply(&mut self, resolution: ProbeResolution) -> bool {
        if resolution.generation != self.generation {
            tracing::debug!(
                "dropping stale resolution for '{}' (generation {} < {})",
                resolution.id,
                resolution.generation,
                self.generation
            );
            return false;
        }
        let Some(descriptor) = self.registry.get(resolution.id) else {
            return false;
        };
        let (state, message) = if resolution.verdict.is_granted() {
            (
                CapabilityState::Pass,
                Some(descriptor.pass_message().to_string()),
            )
        } else {
            (
                CapabilityState::Fail,
                Some(descriptor.fail_message().to_string()),
            )
        };
        let detail = resolution.verdict.detail().map(str::to_string);
        self.snapshot.record(resolution.id, state, message, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::{CapabilityProbe, DeferredProbe};
    use crate::registry::{CapabilityDescriptor, CapabilityId};
    use std::sync::{Arc, Mutex};
    use url::Url;

    /// Probe that answers immediately with a fixed verdict.
    struct StaticProbe(ProbeVerdict);

    impl CapabilityProbe for StaticProbe {
        fn check(&self, _env: &HostEnvironment) -> ProbeOutcome {
            ProbeOutcome::Resolved(self.0.clone())
        }
    }

    /// Probe that panics inside the capability query.
    struct PanickingProbe;

    impl CapabilityProbe for PanickingProbe {
        fn check(&self, _env: &HostEnvironment) -> ProbeOutcome {
            panic!("broken capability query");
        }
    }

    /// Deferred probe that parks its completion for the test to resolve.
    struct ManualProbe {
        slots: Arc<Mutex<Vec<ProbeCompletion>>>,
    }

    impl CapabilityProbe for ManualProbe {
        fn check(&self, _env: &HostEnvironment) -> ProbeOutcome {
            let slots = Arc::clone(&self.slots);
            ProbeOutcome::Deferred(DeferredProbe::new(move |completion| {
                slots.lock().unwrap().push(completion);
            }))
        }
    }

    /// Deferred probe whose task drops the completion without resolving.
    struct AbandoningProbe;

    impl CapabilityProbe for AbandoningProbe {
        fn check(&self, _env: &HostEnvironment) -> ProbeOutcome {
            ProbeOutcome::Deferred(DeferredProbe::new(|completion| {
                drop(completion);
            }))
        }
    }

    fn test_env() -> HostEnvironment {
        HostEnvironment::with_lookup(
            Url::parse("https://unity-lab-ai.github.io/Talk/").unwrap(),
            vec![],
            |_| None,
        )
    }

    fn descriptor(id: CapabilityId, probe: Box<dyn CapabilityProbe>) -> CapabilityDescriptor {
        CapabilityDescriptor::new(
            id,
            format!("{} ready", id),
            format!("{} unavailable", id),
            probe,
        )
    }

    fn registry_with_microphone(probe: Box<dyn CapabilityProbe>) -> DependencyRegistry {
        DependencyRegistry::with_descriptors(vec![
            descriptor(
                CapabilityId::SecureContext,
                Box::new(StaticProbe(ProbeVerdict::Granted)),
            ),
            descriptor(
                CapabilityId::SpeechRecognition,
                Box::new(StaticProbe(ProbeVerdict::Granted)),
            ),
            descriptor(
                CapabilityId::SpeechSynthesis,
                Box::new(StaticProbe(ProbeVerdict::Granted)),
            ),
            descriptor(CapabilityId::Microphone, probe),
        ])
    }

    /// Spin until the manual probe has parked `count` completions.
    fn wait_for_slots(slots: &Arc<Mutex<Vec<ProbeCompletion>>>, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while slots.lock().unwrap().len() < count {
            assert!(Instant::now() < deadline, "deferred probe never parked");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn synchronous_results_are_visible_before_deferred_resolution() {
        let slots = Arc::new(Mutex::new(Vec::new()));
        let registry = registry_with_microphone(Box::new(ManualProbe {
            slots: Arc::clone(&slots),
        }));
        let mut evaluator = ReadinessEvaluator::new(registry, test_env());

        let snapshot = evaluator.evaluate();
        assert_eq!(
            snapshot.result(CapabilityId::SecureContext).unwrap().state,
            CapabilityState::Pass
        );
        assert_eq!(
            snapshot.result(CapabilityId::Microphone).unwrap().state,
            CapabilityState::Pending
        );
        assert!(!snapshot.all_pass());
    }

    #[test]
    fn deferred_resolution_completes_the_snapshot() {
        let slots = Arc::new(Mutex::new(Vec::new()));
        let registry = registry_with_microphone(Box::new(ManualProbe {
            slots: Arc::clone(&slots),
        }));
        let mut evaluator = ReadinessEvaluator::new(registry, test_env());

        evaluator.evaluate();
        wait_for_slots(&slots, 1);
        slots
            .lock()
            .unwrap()
            .pop()
            .unwrap()
            .resolve(ProbeVerdict::Granted);

        assert!(evaluator.wait_settled(Duration::from_secs(5)));
        let snapshot = evaluator.snapshot();
        assert!(snapshot.all_pass());
        assert_eq!(
            snapshot
                .result(CapabilityId::Microphone)
                .unwrap()
                .message
                .as_deref(),
            Some("microphone ready")
        );
    }

    #[test]
    fn stale_resolution_is_dropped_after_recheck() {
        let slots = Arc::new(Mutex::new(Vec::new()));
        let registry = registry_with_microphone(Box::new(ManualProbe {
            slots: Arc::clone(&slots),
        }));
        let mut evaluator = ReadinessEvaluator::new(registry, test_env());

        evaluator.evaluate();
        wait_for_slots(&slots, 1);
        evaluator.evaluate();
        wait_for_slots(&slots, 2);

        let (first, second) = {
            let mut guard = slots.lock().unwrap();
            let second = guard.pop().unwrap();
            let first = guard.pop().unwrap();
            (first, second)
        };

        // The superseded evaluation resolves late with a pass...
        first.resolve(ProbeVerdict::Granted);
        evaluator.poll();
        assert_eq!(
            evaluator
                .snapshot()
                .result(CapabilityId::Microphone)
                .unwrap()
                .state,
            CapabilityState::Pending,
            "stale resolution must not populate the newer snapshot"
        );

        // ...and only the current generation's verdict lands.
        second.resolve(ProbeVerdict::Unsupported);
        assert!(evaluator.wait_settled(Duration::from_secs(5)));
        let result = evaluator
            .snapshot()
            .result(CapabilityId::Microphone)
            .unwrap();
        assert_eq!(result.state, CapabilityState::Fail);
        assert!(!evaluator.snapshot().all_pass());
    }

    #[test]
    fn panicking_probe_fails_without_aborting_others() {
        let registry = DependencyRegistry::with_descriptors(vec![
            descriptor(CapabilityId::SecureContext, Box::new(PanickingProbe)),
            descriptor(
                CapabilityId::SpeechRecognition,
                Box::new(StaticProbe(ProbeVerdict::Granted)),
            ),
            descriptor(
                CapabilityId::SpeechSynthesis,
                Box::new(StaticProbe(ProbeVerdict::Granted)),
            ),
            descriptor(
                CapabilityId::Microphone,
                Box::new(StaticProbe(ProbeVerdict::Granted)),
            ),
        ]);
        let mut evaluator = ReadinessEvaluator::new(registry, test_env());

        let snapshot = evaluator.evaluate();
        let broken = snapshot.result(CapabilityId::SecureContext).unwrap();
        assert_eq!(broken.state, CapabilityState::Fail);
        assert!(broken.detail.as_deref().unwrap().contains("panicked"));
        assert_eq!(
            snapshot
                .result(CapabilityId::SpeechRecognition)
                .unwrap()
                .state,
            CapabilityState::Pass
        );
        assert!(snapshot.is_settled());
    }

    #[test]
    fn abandoned_deferred_probe_settles_as_failure() {
        let registry = registry_with_microphone(Box::new(AbandoningProbe));
        let mut evaluator = ReadinessEvaluator::new(registry, test_env());

        evaluator.evaluate();
        assert!(evaluator.wait_settled(Duration::from_secs(5)));
        let result = evaluator
            .snapshot()
            .result(CapabilityId::Microphone)
            .unwrap();
        assert_eq!(result.state, CapabilityState::Fail);
        assert!(result.detail.as_deref().unwrap().contains("abandoned"));
    }

    #[test]
    fn denial_reason_lands_in_result_detail() {
        let registry = registry_with_microphone(Box::new(StaticProbe(ProbeVerdict::Denied(
            "capture device refused".to_string(),
        ))));
        let mut evaluator = ReadinessEvaluator::new(registry, test_env());

        let snapshot = evaluator.evaluate();
        let result = snapshot.result(CapabilityId::Microphone).unwrap();
        assert_eq!(result.state, CapabilityState::Fail);
        assert_eq!(result.message.as_deref(), Some("microphone unavailable"));
        assert_eq!(result.detail.as_deref(), Some("capture device refused"));
    }

    #[test]
    fn repeated_evaluation_is_idempotent() {
        let registry = registry_with_microphone(Box::new(StaticProbe(ProbeVerdict::Granted)));
        let mut evaluator = ReadinessEvaluator::new(registry, test_env());

        evaluator.evaluate();
        assert!(evaluator.wait_settled(Duration::from_secs(5)));
        let first = evaluator.snapshot().clone();

        evaluator.evaluate();
        assert!(evaluator.wait_settled(Duration::from_secs(5)));
        let second = evaluator.snapshot().clone();

        assert_eq!(first.results(), second.results());
        assert_eq!(first.all_pass(), second.all_pass());
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn timeout_leaves_pending_snapshot_unsettled() {
        let slots = Arc::new(Mutex::new(Vec::new()));
        let registry = registry_with_microphone(Box::new(ManualProbe {
            slots: Arc::clone(&slots),
        }));
        let mut evaluator = ReadinessEvaluator::new(registry, test_env());

        evaluator.evaluate();
        assert!(!evaluator.wait_settled(Duration::from_millis(50)));
        assert!(!evaluator.snapshot().all_pass());
    }
}
