//! Speech engine probes.
//!
//! Existence checks only: the landing checklist verifies that a recognition
//! engine and a synthesis voice are present on the host. Neither probe
//! exercises the engine — opening a session or requesting permission happens
//! in the downstream application, not on the landing page.

use crate::registry::CapabilityId;

use super::{CapabilityProbe, HostEnvironment, ProbeOutcome, ProbeVerdict};

/// Known speech-to-text engine binaries, in preference order.
const RECOGNITION_ENGINES: &[&str] = &[
    "whisper",
    "whisper-cpp",
    "vosk-transcriber",
    "pocketsphinx_continuous",
    "julius",
];

/// Known text-to-speech binaries, in preference order.
const SYNTHESIS_ENGINES: &[&str] = &[
    "say",
    "espeak-ng",
    "espeak",
    "spd-say",
    "festival",
    "flite",
    "pico2wave",
];

/// Checks for a usable speech recognition engine.
pub struct SpeechRecognitionProbe;

impl CapabilityProbe for SpeechRecognitionProbe {
    fn check(&self, env: &HostEnvironment) -> ProbeOutcome {
        ProbeOutcome::Resolved(existence_check(
            env,
            CapabilityId::SpeechRecognition,
            RECOGNITION_ENGINES,
        ))
    }
}

/// Checks for a usable speech synthesis voice.
pub struct SpeechSynthesisProbe;

impl CapabilityProbe for SpeechSynthesisProbe {
    fn check(&self, env: &HostEnvironment) -> ProbeOutcome {
        ProbeOutcome::Resolved(existence_check(
            env,
            CapabilityId::SpeechSynthesis,
            SYNTHESIS_ENGINES,
        ))
    }
}

fn existence_check(
    env: &HostEnvironment,
    id: CapabilityId,
    engines: &[&str],
) -> ProbeVerdict {
    if let Some(forced) = env.forced_verdict(id) {
        return forced;
    }
    match env.resolve_any_tool(engines) {
        Some((name, path)) => {
            tracing::debug!("{} engine '{}' found at {}", id, name, path.display());
            ProbeVerdict::Granted
        }
        None => ProbeVerdict::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use url::Url;

    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn env_with_path(dir: &Path) -> HostEnvironment {
        HostEnvironment::with_lookup(
            Url::parse("https://unity-lab-ai.github.io/Talk/").unwrap(),
            vec![dir.to_path_buf()],
            |_| None,
        )
    }

    fn resolved(outcome: ProbeOutcome) -> ProbeVerdict {
        match outcome {
            ProbeOutcome::Resolved(verdict) => verdict,
            ProbeOutcome::Deferred(_) => panic!("speech probes must be synchronous"),
        }
    }

    #[test]
    fn recognition_granted_when_engine_on_path() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("whisper"));
        let verdict = resolved(SpeechRecognitionProbe.check(&env_with_path(temp.path())));
        assert_eq!(verdict, ProbeVerdict::Granted);
    }

    #[test]
    fn recognition_unsupported_on_empty_path() {
        let temp = TempDir::new().unwrap();
        let verdict = resolved(SpeechRecognitionProbe.check(&env_with_path(temp.path())));
        assert_eq!(verdict, ProbeVerdict::Unsupported);
    }

    #[test]
    fn synthesis_granted_when_voice_on_path() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("espeak-ng"));
        let verdict = resolved(SpeechSynthesisProbe.check(&env_with_path(temp.path())));
        assert_eq!(verdict, ProbeVerdict::Granted);
    }

    #[test]
    fn synthesis_unsupported_on_empty_path() {
        let temp = TempDir::new().unwrap();
        let verdict = resolved(SpeechSynthesisProbe.check(&env_with_path(temp.path())));
        assert_eq!(verdict, ProbeVerdict::Unsupported);
    }

    #[test]
    fn forced_verdict_bypasses_path_lookup() {
        let temp = TempDir::new().unwrap();
        let env = HostEnvironment::with_lookup(
            Url::parse("https://unity-lab-ai.github.io/Talk/").unwrap(),
            vec![temp.path().to_path_buf()],
            |key| (key == "VOICELAB_CHECK_SPEECH_RECOGNITION").then(|| "pass".to_string()),
        );
        let verdict = resolved(SpeechRecognitionProbe.check(&env));
        assert_eq!(verdict, ProbeVerdict::Granted);
    }
}
