//! LFO automation with continuous transitions between maps.
//!
//! [`SmoothedLfoEngine`] is the alternative to the stateless
//! [`LfoEngine`](crate::LfoEngine). Each automated parameter keeps its own
//! phase accumulator, advanced by `2π·frequency·dt` per update, and its
//! amplitude and center glide exponentially toward the active config.
//! Switching presets mid-animation therefore bends the motion instead of
//! snapping it.
//!
//! # Tunables
//!
//! - [`SmoothingTunables::time_constant`]: seconds for amplitude and center
//!   to cover ~63% of a change.
//! - [`SmoothingTunables::max_delta`]: longest frame step honored. A larger
//!   gap (tab switch, debugger pause) advances by `max_delta` only, and a
//!   non-positive step advances nothing.
//!
//! Because state accumulates, `update` is not a pure function of time:
//! repeating the same time is a no-op step, but jumping backwards does not
//! rewind the oscillators.

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use crate::automation::Automation;
use crate::oscillation::LfoMap;
use crate::parameter_store::ParameterStore;
use crate::smoothing::Smoother;

/// Default amplitude/center time constant in seconds.
pub const DEFAULT_TIME_CONSTANT: f64 = 0.5;

/// Default longest frame step in seconds.
pub const DEFAULT_MAX_DELTA: f64 = 1.0;

/// Explicit tunables of the smoothed engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingTunables {
    /// Time constant for amplitude and center transitions, in seconds.
    pub time_constant: f64,
    /// Upper bound on the per-update time step, in seconds.
    pub max_delta: f64,
}

impl SmoothingTunables {
    /// Create tunables.
    ///
    /// # Panics
    ///
    /// Panics if either value is not positive.
    pub fn new(time_constant: f64, max_delta: f64) -> Self {
        assert!(time_constant > 0.0, "time_constant must be positive");
        assert!(max_delta > 0.0, "max_delta must be positive");
        Self {
            time_constant,
            max_delta,
        }
    }

    /// Bring a raw frame step into the accepted window.
    fn clamp_delta(&self, dt: f64) -> f64 {
        if dt.is_nan() || dt <= 0.0 {
            0.0
        } else {
            dt.min(self.max_delta)
        }
    }
}

impl Default for SmoothingTunables {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_CONSTANT, DEFAULT_MAX_DELTA)
    }
}

/// Per-parameter oscillator state.
#[derive(Debug, Clone)]
struct Voice {
    name: String,
    /// Accumulated phase in radians, wrapped to `[0, 2π)`.
    phase: f64,
    frequency: f64,
    amplitude: Smoother,
    center: Smoother,
}

impl Voice {
    fn value(&self) -> f64 {
        self.center.current() + self.amplitude.current() * self.phase.sin()
    }
}

/// Phase-accumulating LFO engine with smoothed transitions.
pub struct SmoothedLfoEngine {
    store: Rc<ParameterStore>,
    tunables: SmoothingTunables,
    active: RefCell<Option<Rc<LfoMap>>>,
    /// Voices in the active map's order.
    voices: RefCell<Vec<Voice>>,
    last_time: Cell<Option<f64>>,
}

impl SmoothedLfoEngine {
    /// Create an engine in manual mode with default tunables.
    pub fn new(store: Rc<ParameterStore>) -> Self {
        Self::with_tunables(store, SmoothingTunables::default())
    }

    /// Create an engine in manual mode with explicit tunables.
    pub fn with_tunables(store: Rc<ParameterStore>, tunables: SmoothingTunables) -> Self {
        Self {
            store,
            tunables,
            active: RefCell::new(None),
            voices: RefCell::new(Vec::new()),
            last_time: Cell::new(None),
        }
    }

    /// The engine's tunables.
    pub fn tunables(&self) -> SmoothingTunables {
        self.tunables
    }

    /// Whether any amplitude or center is still gliding.
    pub fn is_transitioning(&self) -> bool {
        self.voices
            .borrow()
            .iter()
            .any(|v| v.amplitude.is_smoothing() || v.center.is_smoothing())
    }

    fn smoother(&self, start: f64, target: f64) -> Smoother {
        let mut smoother = Smoother::new(self.tunables.time_constant);
        smoother.reset(start);
        smoother.set_target(target);
        smoother
    }

    /// Current stored value of `name`, without warning for unknown keys.
    fn stored_value(&self, name: &str) -> Option<f64> {
        self.store
            .catalog()
            .id(name)
            .and_then(|id| self.store.get_by_id(id))
    }
}

impl Automation for SmoothedLfoEngine {
    fn set_map(&self, map: Rc<LfoMap>) {
        let mut previous = std::mem::take(&mut *self.voices.borrow_mut());
        let mut voices = Vec::with_capacity(map.len());
        let mut carried = 0;

        for (name, config) in map.iter() {
            let voice = match previous.iter().position(|v| v.name == name) {
                Some(index) => {
                    // Keep phase and glide toward the new shape
                    let mut voice = previous.swap_remove(index);
                    carried += 1;
                    voice.frequency = config.frequency;
                    voice.amplitude.set_target(config.amplitude);
                    voice.center.set_target(config.center);
                    voice
                }
                None => {
                    // Start from where the parameter is now, with no swing
                    let start = self.stored_value(name).unwrap_or(config.center);
                    Voice {
                        name: name.to_string(),
                        phase: config.phase.rem_euclid(TAU),
                        frequency: config.frequency,
                        amplitude: self.smoother(0.0, config.amplitude),
                        center: self.smoother(start, config.center),
                    }
                }
            };
            voices.push(voice);
        }

        log::debug!(
            "Smoothed LFO map installed ({} parameters, {carried} carried over)",
            map.len()
        );

        *self.voices.borrow_mut() = voices;
        *self.active.borrow_mut() = Some(map);
    }

    fn get_map(&self) -> Option<Rc<LfoMap>> {
        self.active.borrow().clone()
    }

    fn clear(&self) {
        if self.active.borrow_mut().take().is_some() {
            log::debug!("Smoothed LFO automation cleared");
        }
        self.voices.borrow_mut().clear();
        self.last_time.set(None);
    }

    fn update(&self, time_seconds: f64) {
        if self.active.borrow().is_none() {
            return;
        }
        if !time_seconds.is_finite() {
            log::warn!("Ignoring non-finite LFO time {time_seconds}");
            return;
        }

        let dt = match self.last_time.get() {
            Some(previous) => self.tunables.clamp_delta(time_seconds - previous),
            None => 0.0,
        };
        self.last_time.set(Some(time_seconds));

        // Compute under the borrow, write after releasing it so subscribers
        // may call back into the engine.
        let writes: Vec<(String, f64)> = {
            let mut voices = self.voices.borrow_mut();
            voices
                .iter_mut()
                .map(|voice| {
                    voice.phase = (voice.phase + TAU * voice.frequency * dt).rem_euclid(TAU);
                    voice.amplitude.tick(dt);
                    voice.center.tick(dt);
                    (voice.name.clone(), voice.value())
                })
                .collect()
        };

        for (name, value) in writes {
            self.store.set(&name, value);
        }
    }
}

impl std::fmt::Debug for SmoothedLfoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmoothedLfoEngine")
            .field("tunables", &self.tunables)
            .field("active", &self.active.borrow())
            .field("voices", &self.voices.borrow().len())
            .finish()
    }
}
