//! Parameter metadata types.
//!
//! This module provides types for describing the synthesizer's parameters:
//! - [`ParameterDefinition`] - Static description of one parameter (range, default, step)
//! - [`ParameterCatalog`] - The fixed, ordered table of definitions a store is built from
//! - [`ParameterId`] - Index of a definition within its catalog
//!
//! The catalog is the single source of truth for which keys exist. Stores,
//! preset loaders and UI builders all validate names against it rather than
//! against current values.

use std::fmt;

use crate::parameter_format::Formatter;

/// Canonical parameter names of the standard catalog.
pub mod names {
    /// Vertical stripe frequency of the base wave.
    pub const CARRIER_FREQ_X: &str = "carrierFreqX";
    /// Horizontal stripe frequency of the base wave.
    pub const CARRIER_FREQ_Y: &str = "carrierFreqY";
    /// Ripple detail of the space modulator.
    pub const MODULATOR_FREQ: &str = "modulatorFreq";
    /// Frequency modulation depth ("twist").
    pub const MODULATION_INDEX: &str = "modulationIndex";
    /// Amplitude modulation depth ("sharpen").
    pub const AMPLITUDE_MODULATION_INDEX: &str = "amplitudeModulationIndex";
    /// Horizontal position of the eye.
    pub const MODULATION_CENTER_X: &str = "modulationCenterX";
    /// Vertical position of the eye.
    pub const MODULATION_CENTER_Y: &str = "modulationCenterY";
    /// Discrete dance speed level (1-5).
    pub const SPEED_LEVEL: &str = "speedLevel";
    /// Discrete dance intensity level (1-5).
    pub const INTENSITY_LEVEL: &str = "intensityLevel";
    /// Time modulator frequency, driven by the speed level.
    pub const LFO_FREQUENCY: &str = "lfoFrequency";
    /// Time modulator amplitude, driven by the intensity level.
    pub const LFO_AMPLITUDE: &str = "lfoAmplitude";
}

/// Index of a parameter within a [`ParameterCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterId(pub usize);

impl ParameterId {
    /// Position of the parameter in catalog order.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Static description of a single parameter.
///
/// Immutable once placed in a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    /// Key used by stores, LFO maps and presets (e.g., "carrierFreqX").
    pub name: &'static str,
    /// Short label shown next to the control (e.g., "vertical").
    pub label: &'static str,
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
    /// Value restored by `reset`.
    pub default: f64,
    /// Whether stored values are rounded to whole numbers.
    pub is_integer: bool,
    /// Control increment used by sliders and level buttons.
    pub step: f64,
    /// Formatter for display string conversion.
    pub formatter: Formatter,
}

impl ParameterDefinition {
    /// Create a continuous parameter with a 0.01 step.
    ///
    /// # Panics
    ///
    /// Panics if `min > max` or `default` lies outside `[min, max]`.
    pub fn new(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        assert!(min <= max, "parameter '{name}': min must not exceed max");
        assert!(
            (min..=max).contains(&default),
            "parameter '{name}': default must lie within [min, max]"
        );

        Self {
            name,
            label: name,
            min,
            max,
            default,
            is_integer: false,
            step: 0.01,
            formatter: Formatter::for_step(0.01),
        }
    }

    /// Create an integer parameter with a step of 1.
    ///
    /// # Panics
    ///
    /// Panics if `min > max` or `default` lies outside `[min, max]`.
    pub fn integer(name: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            is_integer: true,
            step: 1.0,
            formatter: Formatter::Integer,
            ..Self::new(name, min as f64, max as f64, default as f64)
        }
    }

    /// Set the control label.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Set the control step, updating the display precision to match.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not positive.
    pub fn with_step(mut self, step: f64) -> Self {
        assert!(step > 0.0, "step must be positive");
        self.step = step;
        if !self.is_integer {
            self.formatter = match self.formatter {
                Formatter::Frequency { .. } => Formatter::Frequency {
                    precision: Formatter::for_step(step).precision().unwrap_or(2),
                },
                _ => Formatter::for_step(step),
            };
        }
        self
    }

    /// Override the display formatter.
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Bring a raw value into this parameter's domain.
    ///
    /// Clamps to `[min, max]`, then rounds to the nearest whole number for
    /// integer parameters.
    pub fn clamp(&self, value: f64) -> f64 {
        let clamped = value.max(self.min).min(self.max);
        if self.is_integer {
            clamped.round()
        } else {
            clamped
        }
    }

    /// Whether `value` already satisfies this definition.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max && (!self.is_integer || value.fract() == 0.0)
    }

    /// Format a value for display (without unit).
    pub fn display(&self, value: f64) -> String {
        self.formatter.text(value)
    }
}

/// Fixed, ordered table of parameter definitions.
///
/// The set of names never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterCatalog {
    definitions: Vec<ParameterDefinition>,
}

impl ParameterCatalog {
    /// Build a catalog from definitions, keeping their order.
    ///
    /// # Panics
    ///
    /// Panics if two definitions share a name.
    pub fn new(definitions: Vec<ParameterDefinition>) -> Self {
        for (i, def) in definitions.iter().enumerate() {
            assert!(
                definitions[..i].iter().all(|d| d.name != def.name),
                "duplicate parameter name '{}'",
                def.name
            );
        }
        Self { definitions }
    }

    /// The synthesizer's standard parameter table.
    pub fn standard() -> Self {
        use names::*;

        Self::new(vec![
            // Stripes - base wave
            ParameterDefinition::new(CARRIER_FREQ_X, 0.1, 10.0, 2.0)
                .with_label("vertical")
                .with_formatter(Formatter::Frequency { precision: 2 }),
            ParameterDefinition::new(CARRIER_FREQ_Y, 0.1, 10.0, 2.0)
                .with_label("horizontal")
                .with_formatter(Formatter::Frequency { precision: 2 }),
            // Warp box - space modulator
            ParameterDefinition::new(MODULATOR_FREQ, 0.1, 10.0, 1.0)
                .with_label("ripples")
                .with_formatter(Formatter::Frequency { precision: 2 }),
            ParameterDefinition::new(MODULATION_INDEX, 0.0, 5.0, 2.0)
                .with_label("twist")
                .with_step(0.05),
            ParameterDefinition::new(AMPLITUDE_MODULATION_INDEX, 0.0, 5.0, 1.0)
                .with_label("sharpen")
                .with_step(0.05),
            ParameterDefinition::new(MODULATION_CENTER_X, -1.0, 1.0, 0.0).with_label("eye x"),
            ParameterDefinition::new(MODULATION_CENTER_Y, -1.0, 1.0, 0.0).with_label("eye y"),
            // Dance - time modulator
            ParameterDefinition::integer(SPEED_LEVEL, 1, 5, 1).with_label("speed"),
            ParameterDefinition::integer(INTENSITY_LEVEL, 1, 5, 3).with_label("intensity"),
            ParameterDefinition::new(LFO_FREQUENCY, 0.0, 10.0, 0.1)
                .with_label("lfo frequency")
                .with_formatter(Formatter::Frequency { precision: 2 }),
            ParameterDefinition::new(LFO_AMPLITUDE, 0.0, 10.0, 0.5).with_label("lfo amplitude"),
        ])
    }

    /// Look up a parameter's ID by name.
    pub fn id(&self, name: &str) -> Option<ParameterId> {
        self.definitions
            .iter()
            .position(|d| d.name == name)
            .map(ParameterId)
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&ParameterDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Look up a definition by ID.
    pub fn by_id(&self, id: ParameterId) -> Option<&ParameterDefinition> {
        self.definitions.get(id.0)
    }

    /// Whether `name` is a valid key.
    pub fn contains(&self, name: &str) -> bool {
        self.id(name).is_some()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog has no parameters.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterDefinition> + '_ {
        self.definitions.iter()
    }

    /// Iterate over names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.iter().map(|d| d.name)
    }
}

impl Default for ParameterCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_matches_table() {
        let catalog = ParameterCatalog::standard();
        assert_eq!(catalog.len(), 11);

        let speed = catalog.get(names::SPEED_LEVEL).unwrap();
        assert_eq!((speed.min, speed.max, speed.default), (1.0, 5.0, 1.0));
        assert!(speed.is_integer);

        let center = catalog.get(names::MODULATION_CENTER_Y).unwrap();
        assert_eq!((center.min, center.max, center.default), (-1.0, 1.0, 0.0));
        assert!(!center.is_integer);

        let lfo = catalog.get(names::LFO_FREQUENCY).unwrap();
        assert_eq!((lfo.min, lfo.max, lfo.default), (0.0, 10.0, 0.1));
    }

    #[test]
    fn test_ids_follow_catalog_order() {
        let catalog = ParameterCatalog::standard();
        assert_eq!(catalog.id(names::CARRIER_FREQ_X), Some(ParameterId(0)));
        assert_eq!(catalog.id(names::LFO_AMPLITUDE), Some(ParameterId(10)));
        assert_eq!(catalog.id("brightness"), None);
        assert_eq!(
            catalog.by_id(ParameterId(2)).map(|d| d.name),
            Some(names::MODULATOR_FREQ)
        );
    }

    #[test]
    fn test_clamp_and_round() {
        let level = ParameterDefinition::integer("level", 1, 5, 3);
        assert_eq!(level.clamp(11.0), 5.0);
        assert_eq!(level.clamp(-2.0), 1.0);
        assert_eq!(level.clamp(2.5), 3.0);
        assert_eq!(level.clamp(2.4), 2.0);

        let twist = ParameterDefinition::new("twist", 0.0, 5.0, 2.0);
        assert_eq!(twist.clamp(2.345), 2.345);
        assert_eq!(twist.clamp(-0.1), 0.0);
        assert!(twist.contains(4.2));
        assert!(!twist.contains(5.1));
        assert!(!level.contains(2.5));
    }

    #[test]
    fn test_step_updates_precision() {
        let twist = ParameterDefinition::new("twist", 0.0, 5.0, 2.0).with_step(0.5);
        assert_eq!(twist.display(2.0), "2.0");

        let freq = ParameterDefinition::new("rate", 0.0, 10.0, 1.0)
            .with_formatter(Formatter::Frequency { precision: 2 })
            .with_step(0.1);
        assert_eq!(freq.formatter, Formatter::Frequency { precision: 1 });
    }

    #[test]
    #[should_panic(expected = "min must not exceed max")]
    fn test_inverted_range_panics() {
        ParameterDefinition::new("bad", 5.0, 1.0, 2.0);
    }

    #[test]
    #[should_panic(expected = "default must lie within")]
    fn test_default_outside_range_panics() {
        ParameterDefinition::new("bad", 0.0, 1.0, 2.0);
    }

    #[test]
    #[should_panic(expected = "duplicate parameter name")]
    fn test_duplicate_names_panic() {
        ParameterCatalog::new(vec![
            ParameterDefinition::new("a", 0.0, 1.0, 0.5),
            ParameterDefinition::new("a", 0.0, 2.0, 0.5),
        ]);
    }
}
