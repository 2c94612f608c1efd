//! Named automation presets.
//!
//! A preset is either an [`LfoMap`] or the manual sentinel (no automation).
//! A [`PresetCatalog`] is built once and never changes; a [`PresetManager`]
//! switches an [`Automation`] engine between the catalog's presets,
//! always replacing the whole map.
//!
//! # Built-in Presets
//!
//! | Name | Automates |
//! |------|-----------|
//! | `manual` | nothing |
//! | `gentleWaves` | carrier X/Y, modulator frequency |
//! | `wildRipples` | carrier X/Y, modulator frequency, modulation index |
//! | `pulsatingEye` | modulation indices, eye position |
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use wavewarp_core::{Automation, LfoEngine, ParameterStore, PresetCatalog, PresetManager};
//!
//! let store = Rc::new(ParameterStore::standard());
//! let engine = Rc::new(LfoEngine::new(Rc::clone(&store)));
//! let mut presets = PresetManager::new(Rc::clone(&engine), PresetCatalog::builtin());
//!
//! assert!(presets.apply("gentleWaves"));
//! assert!(engine.is_parameter_controlled("carrierFreqX"));
//!
//! assert!(!presets.apply("nonexistent"));
//! assert_eq!(presets.get_current(), "gentleWaves");
//! ```

use std::f64::consts::PI;
use std::rc::Rc;

use crate::automation::Automation;
use crate::error::{PresetError, Result};
use crate::lfo_engine::LfoEngine;
use crate::oscillation::{LfoMap, OscillationConfig};
use crate::parameter_info::{names::*, ParameterCatalog};
use crate::preset_file::PresetsFile;

/// Names of the built-in presets.
pub mod preset_names {
    /// No automation.
    pub const MANUAL: &str = "manual";
    /// Slow, shallow carrier drift.
    pub const GENTLE_WAVES: &str = "gentleWaves";
    /// Fast, deep carrier and modulation movement.
    pub const WILD_RIPPLES: &str = "wildRipples";
    /// Breathing modulation with a circling eye.
    pub const PULSATING_EYE: &str = "pulsatingEye";
}

use preset_names::*;

// =============================================================================
// Preset
// =============================================================================

/// A named LFO map, or the manual sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    name: String,
    map: Option<Rc<LfoMap>>,
}

impl Preset {
    /// A preset that returns the engine to manual mode.
    pub fn manual(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map: None,
        }
    }

    /// A preset that installs `map`.
    pub fn lfo(name: impl Into<String>, map: LfoMap) -> Self {
        Self {
            name: name.into(),
            map: Some(Rc::new(map)),
        }
    }

    /// The preset's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The preset's map, or `None` for manual mode.
    pub fn map(&self) -> Option<&Rc<LfoMap>> {
        self.map.as_ref()
    }

    /// Whether this is a manual-mode preset.
    pub fn is_manual(&self) -> bool {
        self.map.is_none()
    }
}

// =============================================================================
// PresetCatalog
// =============================================================================

/// Immutable, ordered collection of presets with unique names.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl PresetCatalog {
    /// Start building a catalog.
    pub fn builder() -> PresetCatalogBuilder {
        PresetCatalogBuilder::default()
    }

    /// The built-in presets: manual, gentleWaves, wildRipples, pulsatingEye.
    pub fn builtin() -> Self {
        let osc = OscillationConfig::new;

        Self {
            presets: vec![
                Preset::manual(MANUAL),
                Preset::lfo(
                    GENTLE_WAVES,
                    LfoMap::new()
                        .with(CARRIER_FREQ_X, osc(0.2, 0.3, 0.5, 0.0))
                        .with(CARRIER_FREQ_Y, osc(0.15, 0.2, 0.5, PI / 2.0))
                        .with(MODULATOR_FREQ, osc(0.1, 0.2, 0.5, PI)),
                ),
                Preset::lfo(
                    WILD_RIPPLES,
                    LfoMap::new()
                        .with(CARRIER_FREQ_X, osc(0.8, 0.6, 0.7, 0.0))
                        .with(CARRIER_FREQ_Y, osc(0.6, 0.5, 0.7, PI / 3.0))
                        .with(MODULATOR_FREQ, osc(0.4, 0.4, 0.6, PI / 2.0))
                        .with(MODULATION_INDEX, osc(0.3, 1.5, 2.0, PI)),
                ),
                Preset::lfo(
                    PULSATING_EYE,
                    LfoMap::new()
                        .with(MODULATION_INDEX, osc(0.2, 1.5, 2.0, 0.0))
                        .with(AMPLITUDE_MODULATION_INDEX, osc(0.15, 1.0, 1.5, PI / 2.0))
                        .with(MODULATION_CENTER_X, osc(0.1, 0.5, 0.0, 0.0))
                        .with(MODULATION_CENTER_Y, osc(0.1, 0.5, 0.0, PI / 2.0)),
                ),
            ],
        }
    }

    /// Load a catalog from TOML and validate it against `parameters`.
    ///
    /// See [`preset_file`](crate::preset_file) for the format.
    pub fn from_toml_str(text: &str, parameters: &ParameterCatalog) -> Result<Self> {
        let file = PresetsFile::parse(text)?;

        let mut builder = Self::builder();
        for entry in &file.preset {
            builder = match entry.to_map() {
                Some(map) => builder.preset(entry.name.clone(), map),
                None => builder.manual(entry.name.clone()),
            };
        }

        let catalog = builder.build()?;
        catalog.validate(parameters)?;
        Ok(catalog)
    }

    /// A new catalog with `other`'s presets appended after this one's.
    pub fn merged(&self, other: &PresetCatalog) -> Result<Self> {
        let mut builder = Self::builder();
        builder.presets = self.presets.clone();
        builder.presets.extend(other.presets.iter().cloned());
        builder.build()
    }

    /// Check every preset against a parameter catalog.
    ///
    /// Fails on automation of unknown parameters and on non-finite configs.
    pub fn validate(&self, parameters: &ParameterCatalog) -> Result<()> {
        for preset in &self.presets {
            let Some(map) = preset.map() else {
                continue;
            };
            for (name, config) in map.iter() {
                if !parameters.contains(name) {
                    return Err(PresetError::UnknownParameter {
                        preset: preset.name.clone(),
                        parameter: name.to_string(),
                    });
                }
                config
                    .validate()
                    .map_err(|reason| PresetError::InvalidOscillation {
                        preset: preset.name.clone(),
                        parameter: name.to_string(),
                        reason,
                    })?;
            }
        }
        Ok(())
    }

    /// Look up a preset by name.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Whether a preset with this name exists.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Preset names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }

    /// Iterate over presets in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> + '_ {
        self.presets.iter()
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builder for [`PresetCatalog`].
#[derive(Debug, Default)]
pub struct PresetCatalogBuilder {
    presets: Vec<Preset>,
}

impl PresetCatalogBuilder {
    /// Add a manual-mode preset.
    pub fn manual(mut self, name: impl Into<String>) -> Self {
        self.presets.push(Preset::manual(name));
        self
    }

    /// Add an LFO preset.
    pub fn preset(mut self, name: impl Into<String>, map: LfoMap) -> Self {
        self.presets.push(Preset::lfo(name, map));
        self
    }

    /// Finish the catalog, rejecting empty and duplicate names.
    pub fn build(self) -> Result<PresetCatalog> {
        for (i, preset) in self.presets.iter().enumerate() {
            if preset.name.is_empty() {
                return Err(PresetError::EmptyName);
            }
            if self.presets[..i].iter().any(|p| p.name == preset.name) {
                return Err(PresetError::DuplicatePreset(preset.name.clone()));
            }
        }
        Ok(PresetCatalog {
            presets: self.presets,
        })
    }
}

// =============================================================================
// PresetManager
// =============================================================================

/// Applies catalog presets to an automation engine.
pub struct PresetManager<A: Automation + ?Sized = LfoEngine> {
    engine: Rc<A>,
    catalog: PresetCatalog,
    current: String,
}

impl<A: Automation + ?Sized> PresetManager<A> {
    /// Create a manager for an engine in manual mode.
    ///
    /// The current preset starts as the catalog's first manual preset, or
    /// as an empty name if the catalog has none. The engine is left
    /// untouched.
    pub fn new(engine: Rc<A>, catalog: PresetCatalog) -> Self {
        let current = catalog
            .iter()
            .find(|p| p.is_manual())
            .map(|p| p.name.clone())
            .unwrap_or_default();

        Self {
            engine,
            catalog,
            current,
        }
    }

    /// Apply a preset by name.
    ///
    /// Manual presets clear the engine; others replace its map. Returns
    /// `false` and changes nothing if the name is not in the catalog.
    pub fn apply(&mut self, name: &str) -> bool {
        let Some(preset) = self.catalog.get(name) else {
            log::warn!("Preset \"{name}\" not found");
            return false;
        };

        match preset.map() {
            Some(map) => self.engine.set_map(Rc::clone(map)),
            None => self.engine.clear(),
        }

        log::debug!("Applied preset \"{name}\"");
        self.current = preset.name.clone();
        true
    }

    /// Name of the most recently applied preset.
    ///
    /// Empty if nothing was applied and the catalog has no manual preset.
    pub fn get_current(&self) -> &str {
        &self.current
    }

    /// Preset names in catalog order.
    pub fn list(&self) -> Vec<&str> {
        self.catalog.names()
    }

    /// Whether a preset exists.
    pub fn has(&self, name: &str) -> bool {
        self.catalog.has(name)
    }

    /// Look up a preset for display.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.catalog.get(name)
    }

    /// The catalog this manager applies from.
    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// The engine this manager drives.
    pub fn engine(&self) -> &Rc<A> {
        &self.engine
    }
}

impl<A: Automation + ?Sized> std::fmt::Debug for PresetManager<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetManager")
            .field("current", &self.current)
            .field("presets", &self.catalog.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_store::ParameterStore;
    use crate::smoothed_lfo::SmoothedLfoEngine;

    fn setup() -> (Rc<ParameterStore>, Rc<LfoEngine>, PresetManager) {
        let store = Rc::new(ParameterStore::standard());
        let engine = Rc::new(LfoEngine::new(Rc::clone(&store)));
        let manager = PresetManager::new(Rc::clone(&engine), PresetCatalog::builtin());
        (store, engine, manager)
    }

    #[test]
    fn test_list_in_catalog_order() {
        let (_, _, manager) = setup();
        assert_eq!(
            manager.list(),
            vec![MANUAL, GENTLE_WAVES, WILD_RIPPLES, PULSATING_EYE]
        );
        assert!(manager.has(WILD_RIPPLES));
        assert!(!manager.has("nonexistent"));
        assert_eq!(manager.get_current(), MANUAL);
    }

    #[test]
    fn test_current_starts_at_catalog_manual_preset() {
        let store = Rc::new(ParameterStore::standard());
        let engine = Rc::new(LfoEngine::new(Rc::clone(&store)));
        let drift = LfoMap::new().with(CARRIER_FREQ_X, OscillationConfig::new(0.05, 0.2, 1.0, 0.0));

        let catalog = PresetCatalog::builder()
            .preset("drift", drift.clone())
            .manual("off")
            .build()
            .unwrap();
        let manager = PresetManager::new(Rc::clone(&engine), catalog);
        assert_eq!(manager.get_current(), "off");
        assert!(manager.has(manager.get_current()));

        let catalog = PresetCatalog::builder().preset("drift", drift).build().unwrap();
        let mut manager = PresetManager::new(Rc::clone(&engine), catalog);
        assert_eq!(manager.get_current(), "");
        assert!(!manager.has(""));

        assert!(manager.apply("drift"));
        assert_eq!(manager.get_current(), "drift");
    }

    #[test]
    fn test_builtin_presets_validate() {
        PresetCatalog::builtin()
            .validate(&ParameterCatalog::standard())
            .unwrap();
    }

    #[test]
    fn test_manual_round_trip() {
        let (_, engine, mut manager) = setup();

        assert!(manager.apply(MANUAL));
        assert!(manager.apply(GENTLE_WAVES));
        assert!(engine.is_active());
        assert!(manager.apply(MANUAL));

        assert!(!engine.is_active());
        assert_eq!(manager.get_current(), MANUAL);
    }

    #[test]
    fn test_unknown_preset_changes_nothing() {
        let (_, engine, mut manager) = setup();
        manager.apply(WILD_RIPPLES);
        let map = engine.get_map();

        assert!(!manager.apply("nonexistent"));
        assert_eq!(manager.get_current(), WILD_RIPPLES);
        assert_eq!(engine.get_map(), map);
    }

    #[test]
    fn test_apply_replaces_whole_map() {
        let (_, engine, mut manager) = setup();
        manager.apply(WILD_RIPPLES);
        manager.apply(PULSATING_EYE);

        assert!(!engine.is_parameter_controlled(CARRIER_FREQ_X));
        assert!(engine.is_parameter_controlled(MODULATION_CENTER_X));
        let installed = engine.get_map().unwrap();
        assert!(Rc::ptr_eq(
            &installed,
            manager.get(PULSATING_EYE).unwrap().map().unwrap()
        ));
    }

    #[test]
    fn test_pulsating_eye_at_time_zero() {
        let (store, engine, mut manager) = setup();
        manager.apply(PULSATING_EYE);
        engine.update(0.0);
        assert!((store.get(MODULATION_INDEX).unwrap() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_gentle_waves_half_period() {
        let (store, engine, mut manager) = setup();
        manager.apply(GENTLE_WAVES);
        engine.update(2.5);
        assert!((store.get(CARRIER_FREQ_X).unwrap() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_manager_drives_smoothed_engine() {
        let store = Rc::new(ParameterStore::standard());
        let engine: Rc<dyn Automation> = Rc::new(SmoothedLfoEngine::new(Rc::clone(&store)));
        let mut manager = PresetManager::new(Rc::clone(&engine), PresetCatalog::builtin());

        assert!(manager.apply(GENTLE_WAVES));
        assert!(engine.is_parameter_controlled(MODULATOR_FREQ));
        assert!(manager.apply(MANUAL));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_builder_rejects_duplicates_and_empty_names() {
        let err = PresetCatalog::builder()
            .manual("a")
            .manual("a")
            .build()
            .unwrap_err();
        assert_eq!(err, PresetError::DuplicatePreset("a".to_string()));

        let err = PresetCatalog::builder().manual("").build().unwrap_err();
        assert_eq!(err, PresetError::EmptyName);
    }

    #[test]
    fn test_from_toml_validates_parameters() {
        let parameters = ParameterCatalog::standard();
        let text = r#"
            [[preset]]
            name = "glow"
            [[preset.lfo]]
            parameter = "brightness"
            frequency = 1.0
            amplitude = 1.0
            center = 0.0
        "#;

        let err = PresetCatalog::from_toml_str(text, &parameters).unwrap_err();
        assert_eq!(
            err,
            PresetError::UnknownParameter {
                preset: "glow".to_string(),
                parameter: "brightness".to_string(),
            }
        );
    }

    #[test]
    fn test_from_toml_rejects_non_finite() {
        let parameters = ParameterCatalog::standard();
        let text = r#"
            [[preset]]
            name = "spike"
            [[preset.lfo]]
            parameter = "carrierFreqX"
            frequency = inf
            amplitude = 1.0
            center = 1.0
        "#;

        let err = PresetCatalog::from_toml_str(text, &parameters).unwrap_err();
        assert!(matches!(err, PresetError::InvalidOscillation { .. }));
    }

    #[test]
    fn test_merge_appends_and_detects_collisions() {
        let parameters = ParameterCatalog::standard();
        let extra = PresetCatalog::from_toml_str(
            r#"
            [[preset]]
            name = "slowDrift"
            [[preset.lfo]]
            parameter = "carrierFreqX"
            frequency = 0.05
            amplitude = 0.2
            center = 1.0
            "#,
            &parameters,
        )
        .unwrap();

        let merged = PresetCatalog::builtin().merged(&extra).unwrap();
        assert_eq!(merged.names().last(), Some(&"slowDrift"));
        assert_eq!(merged.len(), 5);

        let err = merged.merged(&extra).unwrap_err();
        assert_eq!(err, PresetError::DuplicatePreset("slowDrift".to_string()));
    }
}
