//! The automation seam shared by the LFO engines.
//!
//! An automation engine is either in **manual** mode (no active map) or
//! **automated** mode (one active [`LfoMap`]). Maps are installed and
//! replaced wholesale; they are never merged.
//!
//! Two engines implement [`Automation`]:
//! - [`LfoEngine`](crate::LfoEngine) - stateless, a pure function of map and time
//! - [`SmoothedLfoEngine`](crate::SmoothedLfoEngine) - phase accumulation with
//!   smoothed transitions between maps

use std::rc::Rc;

use crate::oscillation::LfoMap;

/// Time-driven writer of parameter values.
///
/// All methods take `&self` so an engine can be shared (via `Rc`) between
/// the host's frame loop, the preset manager and UI code that renders
/// "under automation" indicators.
pub trait Automation {
    /// Install `map` as the active map, replacing any previous map.
    ///
    /// Does not write any parameter; writes happen on the next
    /// [`update`](Self::update).
    fn set_map(&self, map: Rc<LfoMap>);

    /// The active map, or `None` in manual mode.
    fn get_map(&self) -> Option<Rc<LfoMap>>;

    /// Return to manual mode.
    ///
    /// Previously written values are left as they are.
    fn clear(&self);

    /// Write new values for every automated parameter.
    ///
    /// `time_seconds` comes from the caller's clock. Does nothing in manual
    /// mode.
    fn update(&self, time_seconds: f64);

    /// Whether an LFO map is active.
    fn is_active(&self) -> bool {
        self.get_map().is_some()
    }

    /// Whether `name` is driven by the active map.
    fn is_parameter_controlled(&self, name: &str) -> bool {
        self.get_map().is_some_and(|map| map.contains(name))
    }
}
