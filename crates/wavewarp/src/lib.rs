//! # Wavewarp
//!
//! An interactive FM-style visual synthesizer for Rust hosts.
//!
//! A fixed set of numeric parameters drives a shader animation. Parameters
//! are edited by the host's UI, or animated by low-frequency oscillators
//! selected through presets.
//!
//! ## Architecture
//!
//! ```text
//! Synth (session, frame loop)
//!        ↓
//! PresetManager ──► Automation (LfoEngine / SmoothedLfoEngine)
//!                          ↓
//!                   ParameterStore ──► UniformSet (shader)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use wavewarp::prelude::*;
//!
//! let mut synth = Synth::new();
//! synth.apply_preset("gentleWaves");
//!
//! // Once per rendered frame, with the host's clock in milliseconds:
//! let uniforms = synth.frame(16.0, 1920.0, 1080.0);
//! for (name, value) in uniforms.iter() {
//!     // upload `value` to the shader uniform `name`
//!     let _ = (name, value);
//! }
//! ```

pub use wavewarp_core as core;

mod config;
mod synth;

pub use config::{AutomationKind, ConfigError, Result, SmoothingConfig, SynthConfig};
pub use synth::Synth;

/// Prelude module for convenient imports.
///
/// ```rust
/// use wavewarp::prelude::*;
/// ```
pub mod prelude {
    pub use wavewarp_core::{
        // Parameters
        names, ParameterCatalog, ParameterDefinition, ParameterId, ParameterSnapshot,
        ParameterStore, Subscription, Formatter,
        // Automation
        Automation, LfoEngine, LfoMap, OscillationConfig, SmoothedLfoEngine, SmoothingTunables,
        // Presets
        Preset, PresetCatalog, PresetError, PresetManager,
        // Host helpers
        AnimationClock, DanceControl, Direction, Joystick, UniformSet, UniformValue,
    };

    pub use crate::{AutomationKind, ConfigError, Synth, SynthConfig};
}
