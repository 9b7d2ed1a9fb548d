//! Capability registry and definitions.
//!
//! Defines the fixed checklist of runtime capabilities the landing
//! experience depends on: which capabilities exist, the wire identifiers the
//! page markup keys off, the user-facing pass/fail messaging, and the probe
//! that evaluates each one.
//!
//! The checklist is exactly four entries, in display order. The identifiers
//! are part of the external contract with the landing markup
//! (`data-dependency` attributes) and the downstream app shell, so they must
//! never drift.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::probes::{self, CapabilityProbe};

/// Wire identifier of a checklist capability.
///
/// Serializes to the exact `data-dependency` value the landing markup uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityId {
    /// The page is served from a secure (or local) context.
    SecureContext,
    /// A speech recognition engine is available.
    SpeechRecognition,
    /// A speech synthesis engine is available.
    SpeechSynthesis,
    /// A microphone can be opened for capture.
    Microphone,
}

impl CapabilityId {
    /// All capabilities, in checklist display order. Order is significant.
    pub const ALL: [CapabilityId; 4] = [
        CapabilityId::SecureContext,
        CapabilityId::SpeechRecognition,
        CapabilityId::SpeechSynthesis,
        CapabilityId::Microphone,
    ];

    /// The wire identifier (`data-dependency` value).
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityId::SecureContext => "secure-context",
            CapabilityId::SpeechRecognition => "speech-recognition",
            CapabilityId::SpeechSynthesis => "speech-synthesis",
            CapabilityId::Microphone => "microphone",
        }
    }

    /// Environment variable consulted for a forced probe verdict
    /// (e.g. `VOICELAB_CHECK_MICROPHONE=fail` in CI).
    pub fn override_var(self) -> String {
        format!(
            "VOICELAB_CHECK_{}",
            self.as_str().to_uppercase().replace('-', "_")
        )
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "secure-context" => Ok(CapabilityId::SecureContext),
            "speech-recognition" => Ok(CapabilityId::SpeechRecognition),
            "speech-synthesis" => Ok(CapabilityId::SpeechSynthesis),
            "microphone" => Ok(CapabilityId::Microphone),
            other => Err(format!("unknown capability identifier '{}'", other)),
        }
    }
}

/// One entry of the readiness checklist.
///
/// Immutable once constructed. The pass/fail messages are what the status
/// presenter shows the user; they mirror the `data-pass-status` and
/// `data-fail-status` attributes in the landing markup.
pub struct CapabilityDescriptor {
    id: CapabilityId,
    pass_message: String,
    fail_message: String,
    probe: Box<dyn CapabilityProbe>,
}

impl CapabilityDescriptor {
    /// Create a descriptor. Both messages must be non-empty and distinct.
    pub fn new(
        id: CapabilityId,
        pass_message: impl Into<String>,
        fail_message: impl Into<String>,
        probe: Box<dyn CapabilityProbe>,
    ) -> Self {
        let pass_message = pass_message.into();
        let fail_message = fail_message.into();
        debug_assert!(!pass_message.is_empty());
        debug_assert!(!fail_message.is_empty());
        debug_assert_ne!(pass_message, fail_message);
        Self {
            id,
            pass_message,
            fail_message,
            probe,
        }
    }

    /// The capability identifier.
    pub fn id(&self) -> CapabilityId {
        self.id
    }

    /// Message shown when the capability check passes.
    pub fn pass_message(&self) -> &str {
        &self.pass_message
    }

    /// Message shown when the capability check fails.
    pub fn fail_message(&self) -> &str {
        &self.fail_message
    }

    /// The probe evaluating this capability.
    pub fn probe(&self) -> &dyn CapabilityProbe {
        self.probe.as_ref()
    }
}

impl fmt::Debug for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityDescriptor")
            .field("id", &self.id)
            .field("pass_message", &self.pass_message)
            .field("fail_message", &self.fail_message)
            .finish_non_exhaustive()
    }
}

/// Ordered, fixed registry of the checklist capabilities.
pub struct DependencyRegistry {
    descriptors: Vec<CapabilityDescriptor>,
}

impl DependencyRegistry {
    /// The standard four-entry checklist backed by the real host probes.
    pub fn standard() -> Self {
        let descriptors = vec![
            CapabilityDescriptor::new(
                CapabilityId::SecureContext,
                "Secure context confirmed.",
                "Serve this page over HTTPS (or from localhost) to enable voice features.",
                Box::new(probes::SecureContextProbe),
            ),
            CapabilityDescriptor::new(
                CapabilityId::SpeechRecognition,
                "Speech recognition engine detected.",
                "No speech recognition engine was found on this system.",
                Box::new(probes::SpeechRecognitionProbe),
            ),
            CapabilityDescriptor::new(
                CapabilityId::SpeechSynthesis,
                "Speech synthesis voice available.",
                "No speech synthesis voice was found on this system.",
                Box::new(probes::SpeechSynthesisProbe),
            ),
            CapabilityDescriptor::new(
                CapabilityId::Microphone,
                "Microphone access granted.",
                "Microphone access was denied or no capture device is present.",
                Box::new(probes::MicrophoneProbe),
            ),
        ];
        Self { descriptors }
    }

    /// Build a registry from explicit descriptors.
    ///
    /// This is the substitution seam: tests and embedders can wire fake
    /// probes while keeping evaluator semantics. Identifiers must be unique.
    pub fn with_descriptors(descriptors: Vec<CapabilityDescriptor>) -> Self {
        let mut seen = std::collections::HashSet::new();
        for d in &descriptors {
            assert!(
                seen.insert(d.id()),
                "duplicate capability descriptor for '{}'",
                d.id()
            );
        }
        Self { descriptors }
    }

    /// The descriptors in display order.
    pub fn list(&self) -> &[CapabilityDescriptor] {
        &self.descriptors
    }

    /// Look up a descriptor by identifier.
    pub fn get(&self, id: CapabilityId) -> Option<&CapabilityDescriptor> {
        self.descriptors.iter().find(|d| d.id() == id)
    }

    /// Number of checklist entries.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry is empty (only possible via `with_descriptors`).
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for DependencyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
