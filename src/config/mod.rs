//! Configuration loading and validation.
//!
//! Gantry reads an optional `gantry.yml` from the working directory (or a
//! path given with `--config`). Every field has a default matching the
//! shipped Unity Voice Lab landing experience, so running without a config
//! file is the common case.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{GantryError, Result};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gantry.yml";

fn default_origin() -> String {
    "https://unity-lab-ai.github.io/Talk/".to_string()
}

fn default_title() -> String {
    "Unity Voice Lab | System Check".to_string()
}

fn default_bundle_version() -> String {
    "20240606".to_string()
}

fn default_stylesheets() -> Vec<String> {
    vec![
        "styles/landing.css".to_string(),
        "styles/landing-fallback.css".to_string(),
    ]
}

/// Landing experience configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandingConfig {
    /// URL the landing page is served from. Plays the role of the page
    /// location: secure-context checks and launch URL resolution use it.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Document title. Must mention the product so the system-check tab is
    /// recognizable.
    #[serde(default = "default_title")]
    pub title: String,

    /// Cache-busting version appended to the landing bundle reference
    /// (`landing.js?v=<version>`).
    #[serde(default = "default_bundle_version")]
    pub bundle_version: String,

    /// Stylesheet fallbacks served inside `<noscript>`. The markup contract
    /// requires at least two.
    #[serde(default = "default_stylesheets")]
    pub stylesheets: Vec<String>,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            title: default_title(),
            bundle_version: default_bundle_version(),
            stylesheets: default_stylesheets(),
        }
    }
}

impl LandingConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist; the default `gantry.yml` is optional
    /// and falls back to defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path, true),
            None => Self::from_file(Path::new(DEFAULT_CONFIG_FILE), false),
        }
    }

    fn from_file(path: &Path, required: bool) -> Result<Self> {
        let path = path.to_path_buf();
        if !path.exists() {
            if required {
                return Err(GantryError::ConfigNotFound { path });
            }
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        let raw = std::fs::read_to_string(&path)?;
        let config: LandingConfig =
            serde_yaml::from_str(&raw).map_err(|err| GantryError::ConfigParseError {
                path: path.clone(),
                message: err.to_string(),
            })?;
        config.validate()?;
        tracing::debug!("loaded landing config from {}", path.display());
        Ok(config)
    }

    /// Validate field values beyond what serde enforces.
    pub fn validate(&self) -> Result<()> {
        self.origin_url()?;
        if self.title.trim().is_empty() {
            return Err(GantryError::ConfigValidationError {
                message: "title must not be empty".to_string(),
            });
        }
        if self.bundle_version.trim().is_empty() {
            return Err(GantryError::ConfigValidationError {
                message: "bundle_version must not be empty".to_string(),
            });
        }
        if self.stylesheets.len() < 2 {
            return Err(GantryError::ConfigValidationError {
                message: format!(
                    "at least two stylesheet fallbacks are required for the noscript block, found {}",
                    self.stylesheets.len()
                ),
            });
        }
        Ok(())
    }

    /// The origin as a parsed URL.
    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin).map_err(|err| GantryError::InvalidOrigin {
            origin: self.origin.clone(),
            message: err.to_string(),
        })
    }

    /// The cache-busted landing bundle reference (`landing.js?v=<version>`).
    pub fn landing_bundle_src(&self) -> String {
        format!("landing.js?v={}", self.bundle_version)
    }
}
