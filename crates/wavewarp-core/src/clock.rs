//! Pausable animation time.
//!
//! The host supplies its own millisecond clock (for example time since page
//! or window start). While paused the elapsed time stays frozen; on resume
//! the paused interval is subtracted from all later readings, so animation
//! picks up exactly where it stopped.

/// Elapsed animation time with pause support.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationClock {
    paused: bool,
    /// Total time spent paused, in host milliseconds.
    offset_ms: f64,
    pause_started_ms: f64,
}

impl AnimationClock {
    /// A running clock with no paused time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Animation time in milliseconds at host time `now_ms`.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        if self.paused {
            self.pause_started_ms - self.offset_ms
        } else {
            now_ms - self.offset_ms
        }
    }

    /// Animation time in seconds at host time `now_ms`.
    pub fn elapsed_seconds(&self, now_ms: f64) -> f64 {
        self.elapsed_ms(now_ms) / 1000.0
    }

    /// Whether the clock is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze the clock. Does nothing if already paused.
    pub fn pause(&mut self, now_ms: f64) {
        if !self.paused {
            self.pause_started_ms = now_ms;
            self.paused = true;
        }
    }

    /// Restart the clock. Does nothing if already running.
    pub fn resume(&mut self, now_ms: f64) {
        if self.paused {
            self.offset_ms += now_ms - self.pause_started_ms;
            self.paused = false;
        }
    }

    /// Pause if running, resume if paused. Returns whether the clock is now
    /// paused.
    pub fn toggle(&mut self, now_ms: f64) -> bool {
        if self.paused {
            self.resume(now_ms);
        } else {
            self.pause(now_ms);
        }
        self.paused
    }
}
