// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timed interpolation between two values.

use understory_mood::{Interpolate, Interpolator, Timing};

/// An interpolation from one value to another, started at a point in time.
///
/// Times are in milliseconds on the clock of the [`ThemeContext`](crate::ThemeContext)
/// that drives the animation.
///
/// # Example
///
/// ```rust
/// use understory_animator::Tween;
/// use understory_mood::Timing;
///
/// let tween = Tween::new(0.0_f64, 10.0, 1000.0, Timing::linear(100.0).with_delay(20.0));
/// assert_eq!(tween.sample(1000.0), (0.0, false));
/// assert_eq!(tween.sample(1070.0), (5.0, false));
/// assert_eq!(tween.sample(1120.0), (10.0, true));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    interpolator: Interpolator<T>,
    start_ms: f64,
    timing: Timing,
}

impl<T: Interpolate> Tween<T> {
    /// Creates a tween from `from` to `to` starting at `start_ms`.
    #[must_use]
    pub fn new(from: T, to: T, start_ms: f64, timing: Timing) -> Self {
        Self {
            interpolator: Interpolator::new(from, to),
            start_ms,
            timing,
        }
    }

    /// The starting value.
    #[must_use]
    #[inline]
    pub fn from(&self) -> &T {
        self.interpolator.from()
    }

    /// The final value.
    #[must_use]
    #[inline]
    pub fn to(&self) -> &T {
        self.interpolator.to()
    }

    /// When the tween started.
    #[must_use]
    #[inline]
    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    /// The timing curve.
    #[must_use]
    #[inline]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Returns `true` once `time` is at or past the end of the tween.
    #[must_use]
    pub fn is_complete(&self, time: f64) -> bool {
        self.timing.progress(time - self.start_ms) >= 1.0
    }

    /// Samples the tween at `time`.
    ///
    /// Returns the eased value and whether the tween has completed. A
    /// completed tween always yields exactly the final value.
    #[must_use]
    pub fn sample(&self, time: f64) -> (T, bool) {
        if self.is_complete(time) {
            return (self.to().clone(), true);
        }
        let u = self.timing.eased(time - self.start_ms);
        (self.interpolator.interpolate(u), false)
    }
}
