// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font descriptions.

use core::fmt;
use core::str::FromStr;

use crate::error::LookError;
use crate::interpolate::{Interpolate, lerp, step};
use crate::length::{Length, LengthUnit};

/// Slant of a font.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
    /// Oblique.
    Oblique,
}

impl FontStyle {
    fn keyword(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }
}

/// A font: family, size, weight and style.
///
/// # Example
///
/// ```rust
/// use understory_mood::{Font, FontStyle, Length};
///
/// let font: Font = "italic 600 14px Inter".parse().unwrap();
/// assert_eq!(font.family(), "Inter");
/// assert_eq!(font.size(), Length::px(14.0));
/// assert_eq!(font.weight(), 600);
/// assert_eq!(font.style(), FontStyle::Italic);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    family: String,
    size: Length,
    weight: u16,
    style: FontStyle,
}

impl Font {
    /// Creates a regular, normal-weight font.
    #[must_use]
    pub fn new(family: impl Into<String>, size: Length) -> Self {
        Self {
            family: family.into(),
            size,
            weight: 400,
            style: FontStyle::Normal,
        }
    }

    /// Returns this font with a different weight.
    #[must_use]
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    /// Returns this font with a different style.
    #[must_use]
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns this font with a different size.
    #[must_use]
    pub fn with_size(mut self, size: Length) -> Self {
        self.size = size;
        self
    }

    /// The family name.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The size.
    #[must_use]
    pub fn size(&self) -> Length {
        self.size
    }

    /// The weight, `100..=900`.
    #[must_use]
    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// The style.
    #[must_use]
    pub fn style(&self) -> FontStyle {
        self.style
    }
}

impl Interpolate for Font {
    /// Blends size and weight when family and style match.
    fn interpolate(&self, to: &Self, u: f64) -> Self {
        if self.family != to.family || self.style != to.style || self.size.unit() != to.size.unit() {
            return step(self, to, u);
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "weights stay within 1..=1000"
        )]
        let weight = lerp(f64::from(self.weight), f64::from(to.weight), u)
            .round()
            .clamp(1.0, 1000.0) as u16;
        Self {
            family: self.family.clone(),
            size: self.size.interpolate(&to.size, u),
            weight,
            style: self.style,
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.style != FontStyle::Normal {
            write!(f, "{} ", self.style.keyword())?;
        }
        if self.weight != 400 {
            write!(f, "{} ", self.weight)?;
        }
        let needs_quotes = self.family.contains(char::is_whitespace);
        if needs_quotes {
            write!(f, "{} \"{}\"", self.size, self.family)
        } else {
            write!(f, "{} {}", self.size, self.family)
        }
    }
}

impl FromStr for Font {
    type Err = LookError;

    /// Parses `[style] [weight] size family`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LookError::InvalidFont(s.into());
        let mut rest = s.trim();
        let mut style = FontStyle::Normal;
        let mut weight = 400;
        let size = loop {
            let (token, tail) = rest.split_once(char::is_whitespace).ok_or_else(invalid)?;
            rest = tail.trim_start();
            match token.to_ascii_lowercase().as_str() {
                "normal" => {}
                "italic" => style = FontStyle::Italic,
                "oblique" => style = FontStyle::Oblique,
                "bold" => weight = 700,
                "lighter" => weight = 300,
                "bolder" => weight = 800,
                other => {
                    if let Ok(w) = other.parse::<u16>()
                        && (1..=1000).contains(&w)
                    {
                        weight = w;
                        continue;
                    }
                    break token.parse::<Length>().map_err(|_| invalid())?;
                }
            }
        };
        if size.unit() == LengthUnit::Percent || size.value() <= 0.0 {
            return Err(invalid());
        }
        let family = rest.trim().trim_matches(|c| c == '"' || c == '\'');
        if family.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            family: family.into(),
            size,
            weight,
            style,
        })
    }
}
