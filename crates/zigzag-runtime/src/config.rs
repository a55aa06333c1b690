#![forbid(unsafe_code)]

//! Lab configuration.
//!
//! Every tunable of a session (initial key, playback cadence, status
//! message lifetimes, and plot geometry) as one [`LabConfig`] that can be
//! loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # zigzag.toml
//! key = "QWERTYUIOPASDFGHJKLZXCVBNM"
//! tick_interval_ms = 150
//!
//! [layout]
//! col_gap = 32
//! ```
//!
//! ```rust,ignore
//! let config = LabConfig::from_toml_file("zigzag.toml")?;
//! let config = LabConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `LabConfig::default()` matches the browser tool: the `A..Z` key, 300 ms
//! ticks, 1400 ms status messages, 2000 ms sync errors, live redraw on.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::Duration;
use zigzag_core::{ALPHABET, Key, Layout};

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Raw key text. Normalized when a session is built.
    pub key: String,
    /// Playback cadence.
    pub tick_interval_ms: u64,
    /// Lifetime of export status messages.
    pub status_ttl_ms: u64,
    /// Lifetime of the "no ciphertext" sync error.
    pub sync_error_ttl_ms: u64,
    /// Redraw the encode view on every plaintext edit.
    pub realtime: bool,
    /// Plot geometry.
    pub layout: Layout,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            key: ALPHABET.to_owned(),
            tick_interval_ms: 300,
            status_ttl_ms: 1400,
            sync_error_ttl_ms: 2000,
            realtime: true,
            layout: Layout::default(),
        }
    }
}

impl LabConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LabConfigError> {
        toml::from_str(s).map_err(LabConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LabConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, LabConfigError> {
        serde_json::from_str(s).map_err(LabConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LabConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load by extension (`.json` is JSON, anything else TOML), then validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(LabConfigError::Validation(errors));
        }
        tracing::debug!(path = %path.display(), "loaded lab config");
        Ok(config)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.tick_interval_ms == 0 {
            errors.push("tick_interval_ms must be > 0".into());
        }
        if self.status_ttl_ms == 0 {
            errors.push("status_ttl_ms must be > 0".into());
        }
        if self.sync_error_ttl_ms == 0 {
            errors.push("sync_error_ttl_ms must be > 0".into());
        }

        let l = &self.layout;
        for (name, value) in [
            ("width", l.width),
            ("height", l.height),
            ("margin_x", l.margin_x),
            ("top_y", l.top_y),
            ("guide_top_y", l.guide_top_y),
            ("row_gap", l.row_gap),
            ("col_gap", l.col_gap),
        ] {
            if !value.is_finite() {
                errors.push(format!("layout.{name} must be finite, got {value}"));
            }
        }
        if l.row_gap <= 0.0 {
            errors.push(format!("layout.row_gap must be > 0, got {}", l.row_gap));
        }
        if l.col_gap <= 0.0 {
            errors.push(format!("layout.col_gap must be > 0, got {}", l.col_gap));
        }
        if l.width <= 0.0 || l.height <= 0.0 {
            errors.push(format!(
                "layout.width and layout.height must be > 0, got {}x{}",
                l.width, l.height
            ));
        }

        errors
    }

    /// The configured key, normalized.
    #[must_use]
    pub fn normalized_key(&self) -> Key {
        Key::normalize(&self.key)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ttl_ms)
    }

    #[must_use]
    pub fn sync_error_ttl(&self) -> Duration {
        Duration::from_millis(self.sync_error_ttl_ms)
    }
}

/// Errors that can occur when loading a lab configuration.
#[derive(Debug, Error)]
pub enum LabConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
