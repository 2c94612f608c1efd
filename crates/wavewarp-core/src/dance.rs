//! Discrete "dance" controls.
//!
//! Speed and intensity are whole levels from 1 to 5. Each level maps onto a
//! continuous time-modulator setting (`lfoFrequency` / `lfoAmplitude`) via a
//! fixed table, so the host's up/down buttons only ever touch the levels.

use crate::parameter_info::names::{INTENSITY_LEVEL, LFO_AMPLITUDE, LFO_FREQUENCY, SPEED_LEVEL};
use crate::parameter_store::ParameterStore;

/// Lowest dance level.
pub const MIN_LEVEL: i64 = 1;

/// Highest dance level.
pub const MAX_LEVEL: i64 = 5;

/// `lfoFrequency` per speed level (index 0 unused).
pub const SPEED_MAP: [f64; 6] = [0.0, 0.05, 0.2, 0.5, 1.0, 2.0];

/// `lfoAmplitude` per intensity level (index 0 unused).
pub const INTENSITY_MAP: [f64; 6] = [0.0, 0.25, 0.5, 1.0, 1.5, 2.0];

/// Which dance control a helper acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanceControl {
    /// Speed level, driving `lfoFrequency`.
    Speed,
    /// Intensity level, driving `lfoAmplitude`.
    Intensity,
}

impl DanceControl {
    /// Parameter holding the level.
    pub const fn level_parameter(self) -> &'static str {
        match self {
            Self::Speed => SPEED_LEVEL,
            Self::Intensity => INTENSITY_LEVEL,
        }
    }

    /// Parameter the level maps onto.
    pub const fn target_parameter(self) -> &'static str {
        match self {
            Self::Speed => LFO_FREQUENCY,
            Self::Intensity => LFO_AMPLITUDE,
        }
    }

    /// Mapped value for `level`, after clamping it to the valid range.
    pub fn mapped_value(self, level: i64) -> f64 {
        let table = match self {
            Self::Speed => &SPEED_MAP,
            Self::Intensity => &INTENSITY_MAP,
        };
        table[level.clamp(MIN_LEVEL, MAX_LEVEL) as usize]
    }

    /// Current level read from `store`.
    pub fn level(self, store: &ParameterStore) -> i64 {
        store
            .get(self.level_parameter())
            .map_or(MIN_LEVEL, |v| v.round() as i64)
    }
}

/// Step a dance level by `delta`, then re-sync the mapped parameters.
///
/// Returns the new level.
pub fn change_level(store: &ParameterStore, control: DanceControl, delta: i64) -> i64 {
    let level = control
        .level(store)
        .saturating_add(delta)
        .clamp(MIN_LEVEL, MAX_LEVEL);
    store.set(control.level_parameter(), level as f64);
    sync(store);
    level
}

/// Step the speed level by `delta`.
pub fn change_speed(store: &ParameterStore, delta: i64) -> i64 {
    change_level(store, DanceControl::Speed, delta)
}

/// Step the intensity level by `delta`.
pub fn change_intensity(store: &ParameterStore, delta: i64) -> i64 {
    change_level(store, DanceControl::Intensity, delta)
}

/// Write `lfoFrequency` and `lfoAmplitude` from the current levels.
pub fn sync(store: &ParameterStore) {
    for control in [DanceControl::Speed, DanceControl::Intensity] {
        let value = control.mapped_value(control.level(store));
        store.set(control.target_parameter(), value);
    }
}

/// Whether the level can still go up (enables the "up" button).
pub fn can_increase(store: &ParameterStore, control: DanceControl) -> bool {
    control.level(store) < MAX_LEVEL
}

/// Whether the level can still go down (enables the "down" button).
pub fn can_decrease(store: &ParameterStore, control: DanceControl) -> bool {
    control.level(store) > MIN_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_applies_maps() {
        let store = ParameterStore::standard();
        sync(&store);

        // speedLevel 1, intensityLevel 3
        assert_eq!(store.get(LFO_FREQUENCY), Some(0.05));
        assert_eq!(store.get(LFO_AMPLITUDE), Some(1.0));
    }

    #[test]
    fn test_change_speed_clamps_and_syncs() {
        let store = ParameterStore::standard();

        assert_eq!(change_speed(&store, 1), 2);
        assert_eq!(store.get(LFO_FREQUENCY), Some(0.2));

        assert_eq!(change_speed(&store, 10), 5);
        assert_eq!(store.get(SPEED_LEVEL), Some(5.0));
        assert_eq!(store.get(LFO_FREQUENCY), Some(2.0));

        assert_eq!(change_speed(&store, -10), 1);
        assert_eq!(store.get(LFO_FREQUENCY), Some(0.05));
    }

    #[test]
    fn test_change_intensity() {
        let store = ParameterStore::standard();
        assert_eq!(change_intensity(&store, -1), 2);
        assert_eq!(store.get(LFO_AMPLITUDE), Some(0.5));
        assert_eq!(store.get(INTENSITY_LEVEL), Some(2.0));
    }

    #[test]
    fn test_button_states() {
        let store = ParameterStore::standard();
        assert!(can_increase(&store, DanceControl::Speed));
        assert!(!can_decrease(&store, DanceControl::Speed));

        change_intensity(&store, 5);
        assert!(!can_increase(&store, DanceControl::Intensity));
        assert!(can_decrease(&store, DanceControl::Intensity));
    }

    #[test]
    fn test_mapped_value_clamps_level() {
        assert_eq!(DanceControl::Speed.mapped_value(0), 0.05);
        assert_eq!(DanceControl::Intensity.mapped_value(99), 2.0);
    }
}
