//! Frame rate representation.
//!
//! Rates are kept as numerator/denominator pairs so NTSC rates such as
//! 30000/1001 survive the trip from the decoder to the scheduler.

use num_rational::Ratio;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Frame rate as a rational number (e.g., 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 24000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Build a rate from a floating-point fps as reported by a decoder.
    ///
    /// Returns `None` for non-finite or non-positive values, which live
    /// sources commonly report.
    pub fn from_fps_f64(fps: f64) -> Option<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return None;
        }
        let ratio = Ratio::<i64>::approximate_float(fps)?;
        let numerator = u32::try_from(*ratio.numer()).ok()?;
        let denominator = u32::try_from(*ratio.denom()).ok()?;
        if numerator == 0 || denominator == 0 {
            return None;
        }
        Some(Self::new(numerator, denominator))
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Wall-clock time between two frames at this rate, to the nanosecond.
    /// Zero for a zero numerator.
    #[inline]
    pub fn frame_interval(self) -> Duration {
        let nanos = (1_000_000_000u64 * self.denominator as u64)
            .checked_div(self.numerator as u64)
            .unwrap_or(0);
        Duration::from_nanos(nanos)
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_25
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}
