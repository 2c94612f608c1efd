//! Oscillation configs and LFO maps.
//!
//! An [`OscillationConfig`] describes one sinusoid,
//! `value(t) = center + amplitude * sin(2π·frequency·t + phase)`.
//! An [`LfoMap`] assigns configs to parameter names. Its iteration order is
//! its insertion order, so automation writes happen in a fixed sequence.

use std::f64::consts::TAU;

use serde::ser::{Serialize, Serializer};

/// Sinusoid driving a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OscillationConfig {
    /// Cycles per second.
    pub frequency: f64,
    /// Peak deviation from `center`.
    pub amplitude: f64,
    /// Value the oscillation swings around.
    pub center: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

impl OscillationConfig {
    /// Create a new oscillation config.
    pub const fn new(frequency: f64, amplitude: f64, center: f64, phase: f64) -> Self {
        Self {
            frequency,
            amplitude,
            center,
            phase,
        }
    }

    /// Evaluate the sinusoid at `time_seconds`.
    #[inline]
    pub fn value_at(&self, time_seconds: f64) -> f64 {
        self.center + self.amplitude * (TAU * self.frequency * time_seconds + self.phase).sin()
    }

    /// Lowest and highest value the sinusoid reaches.
    pub fn bounds(&self) -> (f64, f64) {
        let swing = self.amplitude.abs();
        (self.center - swing, self.center + swing)
    }

    /// Describe the first non-finite field, if any.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("frequency", self.frequency),
            ("amplitude", self.amplitude),
            ("center", self.center),
            ("phase", self.phase),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(format!("{field} must be finite, got {value}"));
            }
        }
        Ok(())
    }
}

/// Ordered mapping from parameter name to oscillation config.
///
/// Inserting a name that is already present replaces its config in place,
/// keeping its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LfoMap {
    entries: Vec<(String, OscillationConfig)>,
}

impl LfoMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// # Example
    ///
    /// ```
    /// use wavewarp_core::{LfoMap, OscillationConfig};
    ///
    /// let map = LfoMap::new()
    ///     .with("carrierFreqX", OscillationConfig::new(0.2, 0.3, 0.5, 0.0))
    ///     .with("carrierFreqY", OscillationConfig::new(0.15, 0.2, 0.5, 0.0));
    /// assert_eq!(map.names().collect::<Vec<_>>(), ["carrierFreqX", "carrierFreqY"]);
    /// ```
    pub fn with(mut self, name: impl Into<String>, config: OscillationConfig) -> Self {
        self.insert(name, config);
        self
    }

    /// Insert or replace the config for `name`.
    ///
    /// Returns the previous config if one was replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        config: OscillationConfig,
    ) -> Option<OscillationConfig> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, config)),
            None => {
                self.entries.push((name, config));
                None
            }
        }
    }

    /// Config for `name`, if automated.
    pub fn get(&self, name: &str) -> Option<&OscillationConfig> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Whether `name` is a key of this map.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, config)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OscillationConfig)> + '_ {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Iterate over parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Number of automated parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameter is automated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, OscillationConfig)> for LfoMap {
    fn from_iter<I: IntoIterator<Item = (S, OscillationConfig)>>(iter: I) -> Self {
        let mut map = LfoMap::new();
        for (name, config) in iter {
            map.insert(name, config);
        }
        map
    }
}

impl Serialize for LfoMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(n, c)| (n, c)))
    }
}
