//! Serde structs for preset files.
//!
//! ```toml
//! [[preset]]
//! name = "slowDrift"
//!
//! [[preset.lfo]]
//! parameter = "carrierFreqX"
//! frequency = 0.05
//! amplitude = 0.2
//! center = 1.0
//! phase = 0.0
//!
//! [[preset]]
//! name = "hold"   # no lfo entries: manual preset
//! ```

use serde::Deserialize;

use crate::error::{PresetError, Result};
use crate::oscillation::{LfoMap, OscillationConfig};

/// Presets file contents.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetsFile {
    /// List of preset definitions, in catalog order.
    #[serde(default)]
    pub preset: Vec<PresetEntry>,
}

/// A single preset definition.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetEntry {
    /// Name used to apply the preset.
    pub name: String,
    /// Oscillations in application order. Empty means manual mode.
    #[serde(default)]
    pub lfo: Vec<LfoEntry>,
}

/// One automated parameter within a preset.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LfoEntry {
    /// Parameter to automate.
    pub parameter: String,
    /// Cycles per second.
    pub frequency: f64,
    /// Peak deviation from `center`.
    pub amplitude: f64,
    /// Value the oscillation swings around.
    pub center: f64,
    /// Phase offset in radians (default 0).
    #[serde(default)]
    pub phase: f64,
}

impl PresetsFile {
    /// Parse a presets file from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PresetError::Parse(e.to_string()))
    }
}

impl PresetEntry {
    /// The entry's LFO map, or `None` for a manual preset.
    pub fn to_map(&self) -> Option<LfoMap> {
        if self.lfo.is_empty() {
            return None;
        }

        Some(
            self.lfo
                .iter()
                .map(|e| {
                    (
                        e.parameter.clone(),
                        OscillationConfig::new(e.frequency, e.amplitude, e.center, e.phase),
                    )
                })
                .collect(),
        )
    }
}
