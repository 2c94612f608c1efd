//! 2D joystick mapping for the eye position.
//!
//! Maps pointer positions on a `width × height` pad onto two parameters in
//! `[-1, 1]` and back. Screen Y grows downward, parameter Y grows upward.

use crate::automation::Automation;
use crate::parameter_info::names::{MODULATION_CENTER_X, MODULATION_CENTER_Y};
use crate::parameter_store::ParameterStore;

/// Radius of the drawn dot in pixels. Pointer positions are kept this far
/// from the pad's edges.
pub const DOT_RADIUS: f64 = 6.0;

/// Keyboard nudge per arrow press.
pub const NUDGE_STEP: f64 = 0.05;

/// Keyboard nudge per arrow press with the coarse modifier held.
pub const COARSE_NUDGE_STEP: f64 = 0.1;

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Maps pad pixels to a pair of parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Joystick {
    x_parameter: &'static str,
    y_parameter: &'static str,
    width: f64,
    height: f64,
}

impl Joystick {
    /// A pad of the given size controlling the eye position.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x_parameter: MODULATION_CENTER_X,
            y_parameter: MODULATION_CENTER_Y,
            width,
            height,
        }
    }

    /// Control a different pair of parameters.
    pub fn with_parameters(mut self, x: &'static str, y: &'static str) -> Self {
        self.x_parameter = x;
        self.y_parameter = y;
        self
    }

    /// Resize the pad.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Pad size in pixels.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Parameter names for the X and Y axes.
    pub fn parameters(&self) -> (&'static str, &'static str) {
        (self.x_parameter, self.y_parameter)
    }

    /// Parameter values for a pointer at pixel `(x, y)`.
    ///
    /// The pointer is first kept [`DOT_RADIUS`] away from the edges.
    pub fn pointer_to_values(&self, x: f64, y: f64) -> (f64, f64) {
        let (w, h) = (self.width, self.height);
        if w <= 0.0 || h <= 0.0 {
            return (0.0, 0.0);
        }

        let x = x.min(w - DOT_RADIUS).max(DOT_RADIUS);
        let y = y.min(h - DOT_RADIUS).max(DOT_RADIUS);
        ((x / w) * 2.0 - 1.0, -((y / h) * 2.0 - 1.0))
    }

    /// Pixel position of the dot for the given parameter values.
    pub fn values_to_pointer(&self, x: f64, y: f64) -> (f64, f64) {
        ((x + 1.0) / 2.0 * self.width, (1.0 - y) / 2.0 * self.height)
    }

    /// Write the values for a pointer at pixel `(x, y)` to `store`.
    pub fn drag_to(&self, store: &ParameterStore, x: f64, y: f64) {
        let (vx, vy) = self.pointer_to_values(x, y);
        store.set(self.x_parameter, vx);
        store.set(self.y_parameter, vy);
    }

    /// Pixel position of the dot for the values currently in `store`.
    pub fn position(&self, store: &ParameterStore) -> (f64, f64) {
        let x = store.get(self.x_parameter).unwrap_or(0.0);
        let y = store.get(self.y_parameter).unwrap_or(0.0);
        self.values_to_pointer(x, y)
    }

    /// Move one axis by an arrow key press. Up increases Y.
    pub fn nudge(&self, store: &ParameterStore, direction: Direction, coarse: bool) {
        let step = if coarse { COARSE_NUDGE_STEP } else { NUDGE_STEP };
        let (key, delta) = match direction {
            Direction::Left => (self.x_parameter, -step),
            Direction::Right => (self.x_parameter, step),
            Direction::Up => (self.y_parameter, step),
            Direction::Down => (self.y_parameter, -step),
        };

        if let Some(current) = store.get(key) {
            store.set(key, (current + delta).clamp(-1.0, 1.0));
        }
    }

    /// Whether either axis is under automation.
    pub fn is_automated<A: Automation + ?Sized>(&self, engine: &A) -> bool {
        engine.is_parameter_controlled(self.x_parameter)
            || engine.is_parameter_controlled(self.y_parameter)
    }
}
