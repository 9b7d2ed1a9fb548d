//! Microphone access probe.
//!
//! The only asynchronous check on the list. Opening a capture device can
//! block on device enumeration or permission machinery, so the query runs as
//! a deferred task on its own thread and reports through the evaluator's
//! completion channel.
//!
//! On Linux the probe enumerates ALSA capture nodes under `/dev/snd` and
//! verifies one can actually be opened; an open refused with a permission
//! error is a denial, not a missing device. Elsewhere the probe falls back
//! to locating a capture utility on PATH.

use std::io;
use std::path::{Path, PathBuf};

use crate::registry::CapabilityId;

use super::{CapabilityProbe, DeferredProbe, HostEnvironment, ProbeOutcome, ProbeVerdict};

#[cfg(not(target_os = "linux"))]
const CAPTURE_TOOLS: &[&str] = &["sox", "rec", "ffmpeg", "arecord"];

/// Requests microphone/capture access on the host.
pub struct MicrophoneProbe;

impl CapabilityProbe for MicrophoneProbe {
    fn check(&self, env: &HostEnvironment) -> ProbeOutcome {
        let env = env.clone();
        ProbeOutcome::Deferred(DeferredProbe::new(move |completion| {
            completion.resolve(query_capture_access(&env));
        }))
    }
}

fn query_capture_access(env: &HostEnvironment) -> ProbeVerdict {
    if let Some(forced) = env.forced_verdict(CapabilityId::Microphone) {
        return forced;
    }
    platform_capture_access(env)
}

#[cfg(target_os = "linux")]
fn platform_capture_access(_env: &HostEnvironment) -> ProbeVerdict {
    match alsa_capture_nodes(Path::new("/dev/snd")) {
        Ok(nodes) if nodes.is_empty() => ProbeVerdict::Unsupported,
        Ok(nodes) => open_capture_node(&nodes),
        Err(err) if err.kind() == io::ErrorKind::NotFound => ProbeVerdict::Unsupported,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            ProbeVerdict::Denied("sound device directory is not accessible".to_string())
        }
        Err(err) => ProbeVerdict::Denied(format!("cannot enumerate capture devices: {}", err)),
    }
}

#[cfg(not(target_os = "linux"))]
fn platform_capture_access(env: &HostEnvironment) -> ProbeVerdict {
    // No device tree to inspect; a capture utility on PATH is the best
    // signal that the OS can record audio. Permission prompts happen at
    // capture time in the downstream app.
    match env.resolve_any_tool(CAPTURE_TOOLS) {
        Some(_) => ProbeVerdict::Granted,
        None => ProbeVerdict::Unsupported,
    }
}

/// ALSA capture PCM nodes are named `pcmC<card>D<device>c`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn alsa_capture_nodes(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut nodes = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("pcmC") && name.ends_with('c') {
            nodes.push(entry.path());
        }
    }
    nodes.sort();
    Ok(nodes)
}

#[cfg(target_os = "linux")]
fn open_capture_node(nodes: &[PathBuf]) -> ProbeVerdict {
    let mut last_denial = None;
    for node in nodes {
        match std::fs::File::open(node) {
            Ok(_) => return ProbeVerdict::Granted,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                last_denial = Some(format!("opening {} was refused", node.display()));
            }
            Err(err) => {
                // Busy devices still prove a microphone exists.
                if err.raw_os_error() == Some(16) {
                    return ProbeVerdict::Granted;
                }
                last_denial = Some(format!("cannot open {}: {}", node.display(), err));
            }
        }
    }
    match last_denial {
        Some(reason) => ProbeVerdict::Denied(reason),
        None => ProbeVerdict::Unsupported,
    }
}
