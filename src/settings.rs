//! Game settings
//!
//! Read from JSON: a settings file for the native demo, or an embedded
//! `<script id="zigzag-settings">` block in the browser. Missing fields
//! fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::SoundConfig;
use crate::ledger::DEMO_LATENCY_MS;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Start muted
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,

    // === Run ===
    /// Fixed seed for the path. When absent the browser seeds from the
    /// clock at page load and the native demo uses 42.
    pub seed: Option<u64>,
    /// Let the autopilot play
    pub autopilot: bool,
    /// Ticks the native demo runs for
    pub demo_ticks: u32,

    // === Ledger ===
    /// Fake network delay for the demo ledger
    pub ledger_latency_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: 0.8,
            seed: None,
            autopilot: false,
            demo_ticks: 3600,
            ledger_latency_ms: DEMO_LATENCY_MS,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(SettingsError::OutOfRange {
                field: "volume",
                value: self.volume,
            });
        }
        Ok(())
    }

    pub fn sound(&self) -> SoundConfig {
        SoundConfig {
            muted: self.muted,
            volume: self.volume,
        }
    }
}
