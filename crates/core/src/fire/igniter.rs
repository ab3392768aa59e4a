//! Repeating ignition timer driven by pointer press and release.
//!
//! While the pointer is held the scene attempts an ignition every fixed
//! interval, independent of frame rate. `tick` converts frame time into a
//! whole number of due ignitions and carries the remainder to the next frame.

use crate::error::{FirePlaceError, Result};
use serde::{Deserialize, Serialize};

/// Interval between repeated ignition attempts (seconds)
pub const DEFAULT_IGNITE_INTERVAL: f32 = 0.010;

/// Guard against an interval boundary lost to rounding
const TICK_EPSILON: f64 = 1e-9;

/// Fixed-interval timer that only runs while held
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IgnitionTimer {
    interval: f64,
    accumulated: f64,
    held: bool,
}

impl Default for IgnitionTimer {
    fn default() -> Self {
        Self {
            interval: f64::from(DEFAULT_IGNITE_INTERVAL),
            accumulated: 0.0,
            held: false,
        }
    }
}

impl IgnitionTimer {
    /// Create a timer that fires every `interval` seconds while held.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if `interval` is not finite
    /// and positive.
    pub fn new(interval: f32) -> Result<Self> {
        FirePlaceError::require_positive("interval", interval)?;
        Ok(Self {
            interval: f64::from(interval),
            ..Self::default()
        })
    }

    /// Start repeating. The first attempt is due one interval later.
    pub fn press(&mut self) {
        self.held = true;
        self.accumulated = 0.0;
    }

    /// Stop repeating and drop any partial interval.
    pub fn release(&mut self) {
        self.held = false;
        self.accumulated = 0.0;
    }

    /// Whether the timer is running
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Interval between attempts (seconds)
    pub fn interval(&self) -> f32 {
        self.interval as f32
    }

    /// Advance by `dt` seconds and return how many attempts fell due.
    ///
    /// Returns 0 while released, and ignores negative or non-finite `dt`.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.held || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulated += f64::from(dt);
        let due = (self.accumulated / self.interval + TICK_EPSILON).floor();
        self.accumulated = (self.accumulated - due * self.interval).max(0.0);
        due as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_timer_never_fires() {
        let mut timer = IgnitionTimer::default();
        assert_eq!(timer.tick(1.0), 0);
        assert!(!timer.is_held());
    }

    #[test]
    fn test_held_timer_counts_intervals() {
        let mut timer = IgnitionTimer::new(0.25).unwrap();
        timer.press();
        assert_eq!(timer.tick(0.125), 0);
        assert_eq!(timer.tick(0.125), 1);
        assert_eq!(timer.tick(1.0), 4);
        assert_eq!(timer.tick(0.375), 1);
        assert_eq!(timer.tick(0.125), 1);
    }

    #[test]
    fn test_default_interval_at_sixty_fps() {
        let mut timer = IgnitionTimer::default();
        timer.press();
        let total: u32 = (0..60).map(|_| timer.tick(1.0 / 60.0)).sum();
        // One second of frames at a 10 ms cadence
        assert!((99..=100).contains(&total), "got {total} ignitions");
    }

    #[test]
    fn test_release_drops_remainder() {
        let mut timer = IgnitionTimer::new(0.5).unwrap();
        timer.press();
        assert_eq!(timer.tick(0.25), 0);
        timer.release();
        timer.press();
        assert_eq!(timer.tick(0.25), 0);
        assert_eq!(timer.tick(0.25), 1);
    }

    #[test]
    fn test_bad_input() {
        assert!(IgnitionTimer::new(0.0).is_err());
        let mut timer = IgnitionTimer::default();
        timer.press();
        assert_eq!(timer.tick(-1.0), 0);
        assert_eq!(timer.tick(f32::NAN), 0);
    }
}
