//! Error types for loading preset catalogs.
//!
//! Runtime operations (get/set, LFO updates, applying presets) never fail
//! hard; they log and fall back. Errors are reserved for construction-time
//! input such as preset files.

/// Errors that can occur while building or loading a preset catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetError {
    /// The preset file is not valid TOML or does not match the schema.
    Parse(String),
    /// A preset has an empty name.
    EmptyName,
    /// Two presets share a name.
    DuplicatePreset(String),
    /// A preset automates a parameter that does not exist.
    UnknownParameter {
        /// Preset name.
        preset: String,
        /// Offending parameter name.
        parameter: String,
    },
    /// An oscillation config holds an unusable value.
    InvalidOscillation {
        /// Preset name.
        preset: String,
        /// Parameter whose config is invalid.
        parameter: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl std::fmt::Display for PresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid preset file: {msg}"),
            Self::EmptyName => write!(f, "preset name must not be empty"),
            Self::DuplicatePreset(name) => write!(f, "duplicate preset \"{name}\""),
            Self::UnknownParameter { preset, parameter } => {
                write!(f, "preset \"{preset}\" automates unknown parameter \"{parameter}\"")
            }
            Self::InvalidOscillation {
                preset,
                parameter,
                reason,
            } => write!(
                f,
                "preset \"{preset}\" has an invalid oscillation for \"{parameter}\": {reason}"
            ),
        }
    }
}

impl std::error::Error for PresetError {}

/// Result type for preset catalog operations.
pub type Result<T> = std::result::Result<T, PresetError>;
