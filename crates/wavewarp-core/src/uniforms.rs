//! Shader uniform values derived from parameter state.
//!
//! [`UniformSet::from_snapshot`] is a pure read of a [`ParameterSnapshot`];
//! it never writes parameters. The renderer uploads the set in
//! [`iter`](UniformSet::iter) order.

use serde::{Serialize, Serializer};

use crate::parameter_info::names::*;
use crate::parameter_store::{ParameterSnapshot, ParameterStore};

/// A single uniform value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UniformValue {
    /// `float` uniform.
    Float(f64),
    /// `vec2` uniform.
    Vec2([f64; 2]),
}

impl UniformValue {
    /// The scalar value, if this is a `float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Vec2(_) => None,
        }
    }

    /// The pair, if this is a `vec2`.
    pub fn as_vec2(&self) -> Option<[f64; 2]> {
        match self {
            Self::Vec2(v) => Some(*v),
            Self::Float(_) => None,
        }
    }
}

/// Parameters uploaded unchanged, as `(uniform, parameter)`.
const SCALAR_UNIFORMS: [(&str, &str); 5] = [
    ("u_carrierFreqX", CARRIER_FREQ_X),
    ("u_carrierFreqY", CARRIER_FREQ_Y),
    ("u_modulatorFreq", MODULATOR_FREQ),
    ("u_modulationIndex", MODULATION_INDEX),
    ("u_amplitudeModulationIndex", AMPLITUDE_MODULATION_INDEX),
];

/// Scale from eye position (`-1..1`) to shader space (`-2..2`).
const CENTER_SCALE: f64 = 2.0;

/// Uniforms for one frame, in upload order.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSet {
    values: Vec<(&'static str, UniformValue)>,
}

impl UniformSet {
    /// Build the frame's uniforms.
    ///
    /// Missing parameters read as 0.0. `time_ms` is converted to seconds.
    pub fn from_snapshot(params: &ParameterSnapshot, width: f64, height: f64, time_ms: f64) -> Self {
        let read = |key: &str| params.get(key).unwrap_or(0.0);

        let mut values = Vec::with_capacity(10);
        values.push(("u_resolution", UniformValue::Vec2([width, height])));
        for (uniform, parameter) in SCALAR_UNIFORMS {
            values.push((uniform, UniformValue::Float(read(parameter))));
        }
        values.push((
            "u_modulationCenter",
            UniformValue::Vec2([
                CENTER_SCALE * read(MODULATION_CENTER_X),
                CENTER_SCALE * read(MODULATION_CENTER_Y),
            ]),
        ));
        values.push(("u_lfoFrequency", UniformValue::Float(read(LFO_FREQUENCY))));
        values.push(("u_lfoAmplitude", UniformValue::Float(read(LFO_AMPLITUDE))));
        values.push(("u_time", UniformValue::Float(time_ms / 1000.0)));

        Self { values }
    }

    /// Build the frame's uniforms from the store's current values.
    pub fn from_store(store: &ParameterStore, width: f64, height: f64, time_ms: f64) -> Self {
        Self::from_snapshot(&store.get_all(), width, height, time_ms)
    }

    /// Look up a uniform by name.
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    /// Iterate over `(name, value)` pairs in upload order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, UniformValue)> + '_ {
        self.values.iter().copied()
    }

    /// Number of uniforms.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render as a JSON object keyed by uniform name.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for UniformSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter().map(|(k, v)| (*k, v)))
    }
}
