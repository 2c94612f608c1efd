//! Stateless LFO automation.
//!
//! [`LfoEngine`] evaluates every config of the active map at the supplied
//! time and writes the result through the [`ParameterStore`]. It keeps no
//! clock or phase state, so calling [`update`](Automation::update) twice
//! with the same time writes the same values, and an irregular frame rate
//! cannot cause drift.

use std::cell::RefCell;
use std::rc::Rc;

use crate::automation::Automation;
use crate::oscillation::LfoMap;
use crate::parameter_store::ParameterStore;

/// Pure function-of-time LFO engine.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use wavewarp_core::{Automation, LfoEngine, LfoMap, OscillationConfig, ParameterStore};
///
/// let store = Rc::new(ParameterStore::standard());
/// let engine = LfoEngine::new(Rc::clone(&store));
///
/// engine.set_map(Rc::new(
///     LfoMap::new().with("modulationIndex", OscillationConfig::new(0.2, 1.5, 2.0, 0.0)),
/// ));
/// engine.update(0.0);
/// assert_eq!(store.get("modulationIndex"), Some(2.0));
/// ```
pub struct LfoEngine {
    store: Rc<ParameterStore>,
    active: RefCell<Option<Rc<LfoMap>>>,
}

impl LfoEngine {
    /// Create an engine in manual mode writing to `store`.
    pub fn new(store: Rc<ParameterStore>) -> Self {
        Self {
            store,
            active: RefCell::new(None),
        }
    }

    /// The store this engine writes to.
    pub fn store(&self) -> &Rc<ParameterStore> {
        &self.store
    }
}

impl Automation for LfoEngine {
    fn set_map(&self, map: Rc<LfoMap>) {
        log::debug!("LFO map installed ({} parameters)", map.len());
        *self.active.borrow_mut() = Some(map);
    }

    fn get_map(&self) -> Option<Rc<LfoMap>> {
        self.active.borrow().clone()
    }

    fn clear(&self) {
        if self.active.borrow_mut().take().is_some() {
            log::debug!("LFO automation cleared");
        }
    }

    fn update(&self, time_seconds: f64) {
        // Clone the Rc so subscribers may swap the map while we write
        let Some(map) = self.get_map() else {
            return;
        };

        for (name, config) in map.iter() {
            self.store.set(name, config.value_at(time_seconds));
        }
    }
}

impl std::fmt::Debug for LfoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LfoEngine")
            .field("active", &self.active.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillation::OscillationConfig;
    use crate::parameter_info::names::*;
    use std::cell::Cell;
    use std::f64::consts::PI;

    fn setup() -> (Rc<ParameterStore>, LfoEngine) {
        let store = Rc::new(ParameterStore::standard());
        let engine = LfoEngine::new(Rc::clone(&store));
        (store, engine)
    }

    fn eye_map() -> Rc<LfoMap> {
        Rc::new(
            LfoMap::new()
                .with(MODULATION_INDEX, OscillationConfig::new(0.2, 1.5, 2.0, 0.0))
                .with(MODULATION_CENTER_Y, OscillationConfig::new(0.1, 0.5, 0.0, PI / 2.0)),
        )
    }

    #[test]
    fn test_starts_in_manual_mode() {
        let (store, engine) = setup();
        assert!(!engine.is_active());
        assert!(engine.get_map().is_none());

        let before = store.get_all();
        engine.update(12.5);
        assert_eq!(store.get_all(), before);
    }

    #[test]
    fn test_set_map_does_not_write() {
        let (store, engine) = setup();
        let before = store.get_all();
        engine.set_map(eye_map());
        assert!(engine.is_active());
        assert_eq!(store.get_all(), before);
    }

    #[test]
    fn test_update_writes_sinusoid() {
        let (store, engine) = setup();
        engine.set_map(eye_map());
        engine.update(0.0);

        assert!((store.get(MODULATION_INDEX).unwrap() - 2.0).abs() < 1e-10);
        assert!((store.get(MODULATION_CENTER_Y).unwrap() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_written_values_are_clamped() {
        let (store, engine) = setup();
        engine.set_map(Rc::new(
            LfoMap::new().with(CARRIER_FREQ_X, OscillationConfig::new(0.25, 20.0, 0.0, 0.0)),
        ));

        engine.update(1.0); // sin(π/2) = 1 → 20.0
        assert_eq!(store.get(CARRIER_FREQ_X), Some(10.0));
        engine.update(3.0); // sin(3π/2) = -1 → -20.0
        assert_eq!(store.get(CARRIER_FREQ_X), Some(0.1));
    }

    #[test]
    fn test_update_is_idempotent() {
        let (store, engine) = setup();
        engine.set_map(eye_map());
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        store.subscribe(move |_, _, _| counter.set(counter.get() + 1));

        engine.update(3.7);
        let first = store.get_all();
        let notified = changes.get();
        engine.update(3.7);

        assert_eq!(store.get_all(), first);
        assert_eq!(changes.get(), notified);
    }

    #[test]
    fn test_controlled_parameters_match_map() {
        let (_store, engine) = setup();
        engine.set_map(eye_map());

        for def in ParameterStore::standard().catalog().iter() {
            let expected = def.name == MODULATION_INDEX || def.name == MODULATION_CENTER_Y;
            assert_eq!(engine.is_parameter_controlled(def.name), expected, "{}", def.name);
        }

        engine.clear();
        assert!(!engine.is_active());
        assert!(!engine.is_parameter_controlled(MODULATION_INDEX));
    }

    #[test]
    fn test_set_map_replaces_without_merging() {
        let (_store, engine) = setup();
        engine.set_map(eye_map());
        engine.set_map(Rc::new(
            LfoMap::new().with(CARRIER_FREQ_X, OscillationConfig::new(0.2, 0.3, 0.5, 0.0)),
        ));

        assert!(engine.is_parameter_controlled(CARRIER_FREQ_X));
        assert!(!engine.is_parameter_controlled(MODULATION_INDEX));
    }

    #[test]
    fn test_clear_keeps_last_values() {
        let (store, engine) = setup();
        engine.set_map(eye_map());
        engine.update(1.0);
        let automated = store.get(MODULATION_INDEX);

        engine.clear();
        engine.update(2.0);
        assert_eq!(store.get(MODULATION_INDEX), automated);
    }

    #[test]
    fn test_subscriber_may_clear_during_update() {
        let store = Rc::new(ParameterStore::standard());
        let engine = Rc::new(LfoEngine::new(Rc::clone(&store)));
        engine.set_map(eye_map());

        let weak = Rc::downgrade(&engine);
        store.subscribe(move |_, _, _| {
            if let Some(engine) = weak.upgrade() {
                engine.clear();
            }
        });

        engine.update(1.0);
        assert!(!engine.is_active());
        // The in-flight update still finishes its pass
        let expected = 0.5 * (2.0 * PI * 0.1 + PI / 2.0).sin();
        assert!((store.get(MODULATION_CENTER_Y).unwrap() - expected).abs() < 1e-10);
    }
}
