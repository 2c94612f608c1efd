//! Parameter state, LFO automation and presets for the wavewarp visual
//! synthesizer.
//!
//! Leaves first:
//! - [`ParameterStore`] owns every parameter value, clamps writes and
//!   notifies subscribers.
//! - [`LfoEngine`] (or [`SmoothedLfoEngine`]) turns elapsed time into store
//!   writes for the parameters of its active [`LfoMap`].
//! - [`PresetManager`] swaps the engine's map for named presets.
//!
//! Everything is single-threaded and driven by the host's frame loop:
//!
//! ```text
//! host clock ──► Automation::update(seconds) ──► ParameterStore::set
//!                                                      │
//! UI edits ────────────────────────────────────────────┤
//!                                                      ▼
//!                         UniformSet::from_store ◄── get_all()
//! ```
//!
//! The remaining modules hold host-side helpers that only talk to the store:
//! [`dance`] levels, [`joystick`] mapping, [`uniforms`] and the pausable
//! [`clock`].

pub mod automation;
pub mod clock;
pub mod dance;
mod error;
pub mod joystick;
pub mod lfo_engine;
pub mod oscillation;
pub mod parameter_format;
pub mod parameter_info;
pub mod parameter_store;
pub mod preset;
pub mod preset_file;
pub mod smoothed_lfo;
pub mod smoothing;
pub mod uniforms;

pub use automation::Automation;
pub use clock::AnimationClock;
pub use dance::DanceControl;
pub use error::{PresetError, Result};
pub use joystick::{Direction, Joystick};
pub use lfo_engine::LfoEngine;
pub use oscillation::{LfoMap, OscillationConfig};
pub use parameter_format::Formatter;
pub use parameter_info::{names, ParameterCatalog, ParameterDefinition, ParameterId};
pub use parameter_store::{
    ParameterSnapshot, ParameterStore, Subscription, DEFAULT_NOTIFY_DEPTH_LIMIT,
};
pub use preset::{preset_names, Preset, PresetCatalog, PresetCatalogBuilder, PresetManager};
pub use smoothed_lfo::{SmoothedLfoEngine, SmoothingTunables};
pub use smoothing::Smoother;
pub use uniforms::{UniformSet, UniformValue};
