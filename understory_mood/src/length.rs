// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lengths with units.

use core::fmt;
use core::str::FromStr;

use crate::error::LookError;
use crate::interpolate::{Interpolate, lerp, step};

/// The unit a [`Length`] is measured in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    /// Device-independent pixels.
    #[default]
    Px,
    /// Multiples of the element's font size.
    Em,
    /// Multiples of the root font size.
    Rem,
    /// Percent of the containing dimension.
    Percent,
}

impl LengthUnit {
    /// Returns the unit's suffix as written in text.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Percent => "%",
        }
    }
}

/// A scalar with a [`LengthUnit`].
///
/// # Example
///
/// ```rust
/// use understory_mood::{Length, LengthUnit};
///
/// let gap: Length = "1.5em".parse().unwrap();
/// assert_eq!(gap, Length::em(1.5));
/// assert_eq!(gap.unit(), LengthUnit::Em);
/// assert_eq!(Length::px(4.0).to_string(), "4px");
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    /// Zero pixels.
    pub const ZERO: Self = Self::px(0.0);

    /// Creates a length.
    #[must_use]
    #[inline]
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Creates a length in pixels.
    #[must_use]
    #[inline]
    pub const fn px(value: f64) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    /// Creates a length in ems.
    #[must_use]
    #[inline]
    pub const fn em(value: f64) -> Self {
        Self::new(value, LengthUnit::Em)
    }

    /// Creates a length in root ems.
    #[must_use]
    #[inline]
    pub const fn rem(value: f64) -> Self {
        Self::new(value, LengthUnit::Rem)
    }

    /// Creates a percentage.
    #[must_use]
    #[inline]
    pub const fn pct(value: f64) -> Self {
        Self::new(value, LengthUnit::Percent)
    }

    /// Returns the scalar part.
    #[must_use]
    #[inline]
    pub const fn value(self) -> f64 {
        self.value
    }

    /// Returns the unit.
    #[must_use]
    #[inline]
    pub const fn unit(self) -> LengthUnit {
        self.unit
    }

    /// Returns the same length scaled by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.value * factor, self.unit)
    }

    /// Adds `other` if the units match.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        (self.unit == other.unit).then(|| Self::new(self.value + other.value, self.unit))
    }

    /// Resolves to pixels given the font size (for `em`), the root font size
    /// (for `rem`) and the containing dimension (for `%`).
    #[must_use]
    pub fn to_px(self, font_size: f64, root_font_size: f64, container: f64) -> f64 {
        match self.unit {
            LengthUnit::Px => self.value,
            LengthUnit::Em => self.value * font_size,
            LengthUnit::Rem => self.value * root_font_size,
            LengthUnit::Percent => self.value * container / 100.0,
        }
    }
}

impl Interpolate for Length {
    fn interpolate(&self, to: &Self, u: f64) -> Self {
        if self.unit == to.unit {
            Self::new(lerp(self.value, to.value, u), self.unit)
        } else {
            step(self, to, u)
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for Length {
    type Err = LookError;

    /// Parses a number with an optional unit suffix; a bare number is pixels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (number, unit) = [
            ("rem", LengthUnit::Rem),
            ("px", LengthUnit::Px),
            ("em", LengthUnit::Em),
            ("%", LengthUnit::Percent),
        ]
        .into_iter()
        .find_map(|(suffix, unit)| input.strip_suffix(suffix).map(|n| (n, unit)))
        .unwrap_or((input, LengthUnit::Px));
        match number.trim_end().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self::new(value, unit)),
            _ => Err(LookError::InvalidLength(s.into())),
        }
    }
}
