// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Continuous interpolation between two look values.

/// Values that can be blended toward another value of the same type.
///
/// `u = 0.0` yields `self`, `u = 1.0` yields `to`. Types without a natural
/// blend (or pairs that cannot be blended, like lengths in different units)
/// switch from `self` to `to` at `u >= 0.5`.
pub trait Interpolate: Clone {
    /// Returns the value a fraction `u` of the way from `self` to `to`.
    #[must_use]
    fn interpolate(&self, to: &Self, u: f64) -> Self;
}

/// Switches from `from` to `to` halfway through.
#[inline]
pub(crate) fn step<T: Clone>(from: &T, to: &T, u: f64) -> T {
    if u >= 0.5 { to.clone() } else { from.clone() }
}

#[inline]
pub(crate) fn lerp(a: f64, b: f64, u: f64) -> f64 {
    a + (b - a) * u
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, u: f64) -> Self {
        lerp(*self, *to, u)
    }
}

impl Interpolate for bool {
    fn interpolate(&self, to: &Self, u: f64) -> Self {
        step(self, to, u)
    }
}

/// A captured pair of endpoints that can be sampled anywhere in between.
///
/// # Example
///
/// ```rust
/// use understory_mood::Interpolator;
///
/// let fade = Interpolator::new(0.4_f64, 1.0);
/// assert!((fade.interpolate(0.5) - 0.7).abs() < 1e-9);
/// assert_eq!(*fade.to(), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Interpolator<T> {
    from: T,
    to: T,
}

impl<T: Interpolate> Interpolator<T> {
    /// Creates an interpolator from `from` to `to`.
    #[must_use]
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }

    /// Samples the interpolator at `u`.
    #[must_use]
    pub fn interpolate(&self, u: f64) -> T {
        if u <= 0.0 {
            self.from.clone()
        } else if u >= 1.0 {
            self.to.clone()
        } else {
            self.from.interpolate(&self.to, u)
        }
    }

    /// Returns the starting value.
    #[must_use]
    #[inline]
    pub fn from(&self) -> &T {
        &self.from
    }

    /// Returns the final value.
    #[must_use]
    #[inline]
    pub fn to(&self) -> &T {
        &self.to
    }
}
