//! Frame-rate independent value smoothing.
//!
//! A [`Smoother`] moves a current value toward a target with a first-order
//! exponential approach. Unlike per-sample audio smoothers it is ticked with
//! the elapsed time of each frame, so irregular frame rates converge at the
//! same speed.
//!
//! # Example
//!
//! ```
//! use wavewarp_core::Smoother;
//!
//! let mut amp = Smoother::new(0.5);
//! amp.reset(0.0);
//! amp.set_target(1.0);
//! let v = amp.tick(0.5); // one time constant: ~63% of the way
//! assert!((v - 0.632).abs() < 1e-3);
//! ```

/// Values closer than this to the target snap onto it.
const SETTLE_EPSILON: f64 = 1e-9;

/// Moves a value toward a target over time.
#[derive(Debug, Clone)]
pub struct Smoother {
    /// Seconds to cover ~63% of the remaining distance.
    time_constant: f64,
    current: f64,
    target: f64,
}

impl Smoother {
    /// Create a smoother at rest at 0.0.
    ///
    /// # Panics
    ///
    /// Panics if `time_constant` is not positive.
    pub fn new(time_constant: f64) -> Self {
        assert!(time_constant > 0.0, "smoothing time must be positive");

        Self {
            time_constant,
            current: 0.0,
            target: 0.0,
        }
    }

    /// The time constant in seconds.
    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    /// Jump to `value` with no ramp.
    pub fn reset(&mut self, value: f64) {
        self.current = value;
        self.target = value;
    }

    /// Set a new target; the current value starts moving on the next tick.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Current value without advancing.
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the value has not yet reached its target.
    pub fn is_smoothing(&self) -> bool {
        self.current != self.target
    }

    /// Advance by `dt` seconds and return the new current value.
    ///
    /// Non-positive `dt` leaves the value unchanged.
    pub fn tick(&mut self, dt: f64) -> f64 {
        if dt <= 0.0 || !self.is_smoothing() {
            return self.current;
        }

        let coeff = 1.0 - (-dt / self.time_constant).exp();
        self.current += coeff * (self.target - self.current);

        if (self.target - self.current).abs() < SETTLE_EPSILON {
            self.current = self.target;
        }
        self.current
    }
}
