//! Gantry - readiness checks and launch gating for the Unity Voice Lab
//! landing experience.
//!
//! Gantry probes the runtime capabilities a voice-interaction app depends
//! on (secure context, speech recognition, speech synthesis, microphone
//! access), reports pass/fail status per capability as results arrive, and
//! gates the launch action so the downstream application only starts once
//! every check passes.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `gantry.yml` loading and validation
//! - [`controller`] - Bootstrap/recheck/launch flow composition
//! - [`error`] - Error types and result alias
//! - [`evaluator`] - Probe orchestration and the readiness snapshot
//! - [`launch`] - Launch gate, intent event, and URL resolution
//! - [`page`] - Landing markup rendering and contract audit
//! - [`probes`] - Capability probes and the host environment seam
//! - [`registry`] - The fixed capability checklist
//! - [`ui`] - Status presentation, prompts, and terminal output
//!
//! # Example
//!
//! ```
//! use gantry::launch::resolve_launch_url;
//! use url::Url;
//!
//! let base = Url::parse("https://example.com/landing/").unwrap();
//! let destination = resolve_launch_url(&base).unwrap();
//! assert_eq!(destination.as_str(), "https://example.com/landing/AI/index.html");
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod launch;
pub mod page;
pub mod probes;
pub mod registry;
pub mod ui;

pub use error::{GantryError, Result};
