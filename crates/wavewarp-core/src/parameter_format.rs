//! Parameter value formatting and parsing.
//!
//! This module provides the [`Formatter`] enum for converting between
//! parameter values and the display strings shown next to sliders and
//! level buttons.
//!
//! # Design
//!
//! The formatter separates value formatting from unit strings:
//! - `text()` returns the bare value without units (e.g., "2.00", "3")
//! - `unit()` returns the unit string (e.g., "Hz")
//! - The UI combines them for display (e.g., "2.00 Hz")
//!
//! # Example
//!
//! ```
//! use wavewarp_core::parameter_format::Formatter;
//!
//! let rate = Formatter::Frequency { precision: 2 };
//! assert_eq!(rate.text(0.25), "0.25");
//! assert_eq!(rate.unit(), "Hz");
//!
//! let level = Formatter::Integer;
//! assert_eq!(level.text(3.0), "3");
//! ```

/// Parameter value formatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Formatter {
    /// Generic float with configurable precision (e.g., "1.25").
    Float {
        /// Number of decimal places.
        precision: usize,
    },

    /// Oscillation or spatial frequency in Hz.
    ///
    /// Format: "0.10" (unit "Hz" via `unit()`)
    Frequency {
        /// Number of decimal places.
        precision: usize,
    },

    /// Whole-number level (dance speed/intensity).
    ///
    /// Format: "3"
    Integer,
}

impl Formatter {
    /// Pick a float formatter whose precision matches a slider step size.
    ///
    /// A step of 0.01 yields two decimals, 0.5 yields one, 1.0 yields none.
    pub fn for_step(step: f64) -> Self {
        Formatter::Float {
            precision: precision_for_step(step),
        }
    }

    /// Convert a value to a display string (without unit).
    pub fn text(&self, value: f64) -> String {
        match self {
            Formatter::Float { precision } | Formatter::Frequency { precision } => {
                let text = format!("{:.prec$}", value, prec = *precision);
                // "-0.00" reads badly next to a centered slider
                if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
                    text[1..].to_string()
                } else {
                    text
                }
            }

            Formatter::Integer => format!("{}", value.round() as i64),
        }
    }

    /// Parse a display string back to a value.
    ///
    /// Returns `None` if the string cannot be parsed.
    /// Accepts values with or without their unit suffix.
    pub fn parse(&self, s: &str) -> Option<f64> {
        let s = s.trim();

        match self {
            Formatter::Float { .. } => s.parse().ok(),

            Formatter::Frequency { .. } => {
                let hz_str = s
                    .trim_end_matches(" Hz")
                    .trim_end_matches("Hz")
                    .trim_end_matches(" hz")
                    .trim_end_matches("hz")
                    .trim();

                hz_str.parse().ok()
            }

            Formatter::Integer => {
                if let Ok(v) = s.parse::<i64>() {
                    return Some(v as f64);
                }
                s.parse::<f64>().ok().map(f64::round)
            }
        }
    }

    /// Get the unit string for this formatter.
    pub fn unit(&self) -> &'static str {
        match self {
            Formatter::Float { .. } => "",
            Formatter::Frequency { .. } => "Hz",
            Formatter::Integer => "",
        }
    }

    /// Number of decimal places, if the formatter has a precision setting.
    pub fn precision(&self) -> Option<usize> {
        match self {
            Formatter::Float { precision } | Formatter::Frequency { precision } => {
                Some(*precision)
            }
            Formatter::Integer => None,
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::Float { precision: 2 }
    }
}

/// Number of decimals needed to display every multiple of `step` exactly.
fn precision_for_step(step: f64) -> usize {
    if !(step.is_finite() && step > 0.0) {
        return 2;
    }

    let mut precision = 0;
    let mut scaled = step;
    while precision < 6 && (scaled - scaled.round()).abs() > 1e-9 {
        scaled *= 10.0;
        precision += 1;
    }
    precision
}
