//! Secure-context probe.
//!
//! Voice capture is only allowed from a secure browsing context, so the
//! checklist verifies the landing origin up front: TLS schemes and local
//! origins qualify, everything else fails. The check is synchronous and pure
//! over the configured origin URL.

use url::{Host, Url};

use crate::registry::CapabilityId;

use super::{CapabilityProbe, HostEnvironment, ProbeOutcome, ProbeVerdict};

/// Checks that the landing origin counts as a secure context.
pub struct SecureContextProbe;

impl CapabilityProbe for SecureContextProbe {
    fn check(&self, env: &HostEnvironment) -> ProbeOutcome {
        if let Some(forced) = env.forced_verdict(CapabilityId::SecureContext) {
            return ProbeOutcome::Resolved(forced);
        }
        let verdict = if is_secure_origin(env.origin()) {
            ProbeVerdict::Granted
        } else {
            ProbeVerdict::Unsupported
        };
        ProbeOutcome::Resolved(verdict)
    }
}

/// Whether an origin qualifies as a secure context.
///
/// Mirrors the browser rules: TLS schemes and `file:` are always secure;
/// plaintext schemes are secure only for loopback hosts.
pub fn is_secure_origin(origin: &Url) -> bool {
    match origin.scheme() {
        "https" | "wss" | "file" => true,
        "http" | "ws" => is_loopback_host(origin),
        _ => false,
    }
}

fn is_loopback_host(origin: &Url) -> bool {
    match origin.host() {
        Some(Host::Domain(domain)) => {
            domain.eq_ignore_ascii_case("localhost")
                || domain.to_ascii_lowercase().ends_with(".localhost")
        }
        Some(Host::Ipv4(addr)) => addr.is_loopback(),
        Some(Host::Ipv6(addr)) => addr.is_loopback(),
        None => false,
    }
}
