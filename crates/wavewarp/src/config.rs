//! Session configuration loaded from TOML.
//!
//! ```toml
//! preset = "gentleWaves"
//! automation = "smoothed"
//! notify_depth_limit = 8
//!
//! [initial]
//! carrierFreqX = 2.0
//! speedLevel = 3
//!
//! [smoothing]
//! time_constant = 0.5
//! max_delta = 1.0
//! ```
//!
//! Extra presets are given as inline preset-file TOML in `presets` and are
//! appended after the built-in catalog.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use wavewarp_core::preset::preset_names::MANUAL;
use wavewarp_core::smoothed_lfo::{DEFAULT_MAX_DELTA, DEFAULT_TIME_CONSTANT};
use wavewarp_core::{ParameterCatalog, PresetError, SmoothingTunables, DEFAULT_NOTIFY_DEPTH_LIMIT};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur while loading or validating a [`SynthConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The config is not valid TOML or does not match the schema.
    Parse(String),
    /// `initial` names a parameter that does not exist.
    UnknownParameter(String),
    /// `preset` names a preset that is not in the catalog.
    UnknownPreset(String),
    /// A smoothing tunable is out of range.
    InvalidTunable {
        /// Tunable name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// The extra presets failed to load.
    Presets(PresetError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "failed to read config: {msg}"),
            Self::Parse(msg) => write!(f, "invalid config: {msg}"),
            Self::UnknownParameter(name) => write!(f, "unknown parameter \"{name}\" in initial values"),
            Self::UnknownPreset(name) => write!(f, "unknown preset \"{name}\""),
            Self::InvalidTunable { name, reason } => write!(f, "invalid smoothing.{name}: {reason}"),
            Self::Presets(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Presets(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PresetError> for ConfigError {
    fn from(err: PresetError) -> Self {
        Self::Presets(err)
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// =============================================================================
// SynthConfig
// =============================================================================

/// Which automation engine a session drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationKind {
    /// Values are a pure function of map and time; switching presets snaps.
    #[default]
    Stateless,
    /// Phase is accumulated per frame and amplitude/center glide between
    /// presets.
    Smoothed,
}

/// Tunables for [`AutomationKind::Smoothed`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmoothingConfig {
    /// Exponential time constant in seconds.
    #[serde(default = "default_time_constant")]
    pub time_constant: f64,
    /// Largest frame delta in seconds accepted per update.
    #[serde(default = "default_max_delta")]
    pub max_delta: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            time_constant: DEFAULT_TIME_CONSTANT,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }
}

impl SmoothingConfig {
    /// Convert to engine tunables after validation.
    pub fn tunables(&self) -> Result<SmoothingTunables> {
        check_positive("time_constant", self.time_constant)?;
        check_positive("max_delta", self.max_delta)?;
        Ok(SmoothingTunables::new(self.time_constant, self.max_delta))
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTunable {
            name,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

fn default_time_constant() -> f64 {
    DEFAULT_TIME_CONSTANT
}

fn default_max_delta() -> f64 {
    DEFAULT_MAX_DELTA
}

fn default_preset() -> String {
    MANUAL.to_string()
}

fn default_notify_depth_limit() -> usize {
    DEFAULT_NOTIFY_DEPTH_LIMIT
}

/// Configuration for a [`Synth`](crate::Synth) session.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthConfig {
    /// Initial values by parameter name. Values are clamped by the store.
    #[serde(default)]
    pub initial: BTreeMap<String, f64>,
    /// Preset applied at startup.
    #[serde(default = "default_preset")]
    pub preset: String,
    /// Automation engine.
    #[serde(default)]
    pub automation: AutomationKind,
    /// Smoothing tunables, used when `automation = "smoothed"`.
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    /// Maximum nesting of subscriber notifications.
    #[serde(default = "default_notify_depth_limit")]
    pub notify_depth_limit: usize,
    /// Extra presets in preset-file TOML.
    #[serde(default)]
    pub presets: Option<String>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            initial: BTreeMap::new(),
            preset: default_preset(),
            automation: AutomationKind::default(),
            smoothing: SmoothingConfig::default(),
            notify_depth_limit: default_notify_depth_limit(),
            presets: None,
        }
    }
}

impl SynthConfig {
    /// Default configuration: standard values, manual mode, stateless engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Set an initial parameter value.
    pub fn with_initial(mut self, name: impl Into<String>, value: f64) -> Self {
        self.initial.insert(name.into(), value);
        self
    }

    /// Set the startup preset.
    pub fn with_preset(mut self, name: impl Into<String>) -> Self {
        self.preset = name.into();
        self
    }

    /// Choose the automation engine.
    pub fn with_automation(mut self, kind: AutomationKind) -> Self {
        self.automation = kind;
        self
    }

    /// Set smoothing tunables.
    pub fn with_smoothing(mut self, time_constant: f64, max_delta: f64) -> Self {
        self.smoothing = SmoothingConfig {
            time_constant,
            max_delta,
        };
        self
    }

    /// Set the notification depth limit.
    pub fn with_notify_depth_limit(mut self, limit: usize) -> Self {
        self.notify_depth_limit = limit;
        self
    }

    /// Add extra presets in preset-file TOML.
    pub fn with_presets_toml(mut self, text: impl Into<String>) -> Self {
        self.presets = Some(text.into());
        self
    }

    /// Check names and tunables against a parameter catalog.
    ///
    /// The startup preset is checked when the session builds its catalog.
    pub fn validate(&self, catalog: &ParameterCatalog) -> Result<()> {
        if let Some(name) = self.initial.keys().find(|name| !catalog.contains(name)) {
            return Err(ConfigError::UnknownParameter(name.clone()));
        }
        if self.automation == AutomationKind::Smoothed {
            self.smoothing.tunables()?;
        }
        Ok(())
    }
}
