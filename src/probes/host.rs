//! Host environment abstraction for capability probes.
//!
//! Probes never reach into `std::env` or the filesystem PATH directly; they
//! go through a [`HostEnvironment`] so tests can substitute a fully fake
//! host (custom origin, env vars, PATH entries) without touching the real
//! process environment.
//!
//! The environment also carries the forced-verdict escape hatch: setting
//! `VOICELAB_CHECK_<CAPABILITY>=pass|fail|deny` pins a probe's answer, which
//! keeps CI and integration tests hermetic on hosts without audio hardware.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

use crate::registry::CapabilityId;

use super::ProbeVerdict;

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// The slice of the host a probe is allowed to see.
#[derive(Clone)]
pub struct HostEnvironment {
    origin: Url,
    path_entries: Vec<PathBuf>,
    env_lookup: EnvLookup,
}

impl HostEnvironment {
    /// Capture the real process environment.
    ///
    /// `origin` plays the role of the page location: the URL the landing
    /// experience is served from, used by the secure-context probe and as
    /// the default launch base.
    pub fn detect(origin: Url) -> Self {
        let path_entries = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();
        Self {
            origin,
            path_entries,
            env_lookup: Arc::new(|key: &str| std::env::var(key).ok()),
        }
    }

    /// Build a fully substituted environment.
    ///
    /// This is the test seam: probes run against whatever origin, PATH, and
    /// env-var view the caller provides.
    pub fn with_lookup(
        origin: Url,
        path_entries: Vec<PathBuf>,
        env_lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            origin,
            path_entries,
            env_lookup: Arc::new(env_lookup),
        }
    }

    /// The landing page location.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Look up an environment variable.
    pub fn var(&self, key: &str) -> Option<String> {
        (self.env_lookup)(key)
    }

    /// PATH entries used for tool resolution.
    pub fn path_entries(&self) -> &[PathBuf] {
        &self.path_entries
    }

    /// A verdict forced through `VOICELAB_CHECK_<CAPABILITY>`, if any.
    ///
    /// Accepted values: `pass`/`granted` force a pass, `fail`/`unsupported`
    /// force a failure, `deny`/`denied` force a denial. Anything else is
    /// ignored with a warning.
    pub fn forced_verdict(&self, id: CapabilityId) -> Option<ProbeVerdict> {
        let raw = self.var(&id.override_var())?;
        match raw.to_ascii_lowercase().as_str() {
            "pass" | "granted" => Some(ProbeVerdict::Granted),
            "fail" | "unsupported" => Some(ProbeVerdict::Unsupported),
            "deny" | "denied" => Some(ProbeVerdict::Denied(format!(
                "denied by {} override",
                id.override_var()
            ))),
            other => {
                tracing::warn!(
                    "ignoring unrecognized value '{}' for {}",
                    other,
                    id.override_var()
                );
                None
            }
        }
    }

    /// Resolve a tool's binary by iterating over PATH entries.
    ///
    /// Returns the first match that exists and is executable. Does NOT use
    /// the `which` command — `which` behavior varies across systems and is
    /// sometimes a shell builtin with inconsistent error handling.
    pub fn resolve_tool(&self, tool: &str) -> Option<PathBuf> {
        for dir in &self.path_entries {
            let candidate = dir.join(tool);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Resolve the first of several candidate tools present on PATH.
    pub fn resolve_any_tool(&self, tools: &[&str]) -> Option<(String, PathBuf)> {
        for tool in tools {
            if let Some(path) = self.resolve_tool(tool) {
                return Some((tool.to_string(), path));
            }
        }
        None
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("origin", &self.origin.as_str())
            .field("path_entries", &self.path_entries)
            .finish_non_exhaustive()
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
