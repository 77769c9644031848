// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RGBA colors.

use core::fmt;
use core::str::FromStr;

use crate::error::LookError;
use crate::interpolate::{Interpolate, lerp};

/// A color with straight (non-premultiplied) alpha, components in `0.0..=1.0`.
///
/// # Example
///
/// ```rust
/// use understory_mood::Color;
///
/// let blue: Color = "#0000ff".parse().unwrap();
/// assert_eq!(blue, Color::rgb8(0, 0, 255));
/// assert_eq!(blue.to_string(), "#0000ff");
///
/// let faded = blue.with_alpha(0.5);
/// assert_eq!(faded.to_string(), "#0000ff80");
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha; `0.0` is fully transparent.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from float components.
    #[must_use]
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    #[must_use]
    #[inline]
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    /// Creates a color from 8-bit channels.
    #[must_use]
    #[inline]
    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Returns the color as 8-bit channels, rounding each component.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(channel_to_u8)
    }

    /// Returns this color with its alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Returns this color with its alpha multiplied by `factor`.
    #[must_use]
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha((self.a * factor).clamp(0.0, 1.0))
    }

    /// Blends each component toward `other` by `u`.
    #[must_use]
    pub fn lerp(self, other: Self, u: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * u,
            g: self.g + (other.g - self.g) * u,
            b: self.b + (other.b - self.b) * u,
            a: self.a + (other.a - self.a) * u,
        }
    }

    /// Blends toward black by `amount`, keeping alpha.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        self.lerp(Self::BLACK.with_alpha(self.a), amount)
    }

    /// Blends toward white by `amount`, keeping alpha.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        self.lerp(Self::WHITE.with_alpha(self.a), amount)
    }

    /// Relative luminance per WCAG 2, ignoring alpha.
    #[must_use]
    pub fn luminance(self) -> f32 {
        fn linear(c: f32) -> f32 {
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// Returns black or white, whichever contrasts more with this color.
    #[must_use]
    pub fn contrasting(self) -> Self {
        if self.luminance() > 0.179 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "clamped to 0..=255 before the cast"
)]
fn channel_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Interpolate for Color {
    #[expect(clippy::cast_possible_truncation, reason = "blend factors are small")]
    fn interpolate(&self, to: &Self, u: f64) -> Self {
        self.lerp(*to, u as f32)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl FromStr for Color {
    type Err = LookError;

    /// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` and `transparent`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || LookError::InvalidColor(s.into());
        if input.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }
        let lower = input.to_ascii_lowercase();
        let (args, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let args = args.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != if with_alpha { 4 } else { 3 } {
            return Err(invalid());
        }
        let mut channels = [0.0_f32; 3];
        for (channel, part) in channels.iter_mut().zip(&parts) {
            let value: f32 = part.parse().map_err(|_| invalid())?;
            if !(0.0..=255.0).contains(&value) {
                return Err(invalid());
            }
            *channel = value / 255.0;
        }
        let alpha = match parts.get(3) {
            Some(part) => {
                let value: f32 = part.parse().map_err(|_| invalid())?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(invalid());
                }
                value
            }
            None => 1.0,
        };
        Ok(Self::new(channels[0], channels[1], channels[2], alpha))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 | 4 => {
            let mut c = [255_u8; 4];
            for (i, slot) in c.iter_mut().take(hex.len()).enumerate() {
                *slot = digit(i)? * 17;
            }
            Some(Color::rgba8(c[0], c[1], c[2], c[3]))
        }
        6 | 8 => {
            let mut c = [255_u8; 4];
            for (i, slot) in c.iter_mut().take(hex.len() / 2).enumerate() {
                *slot = pair(i * 2)?;
            }
            Some(Color::rgba8(c[0], c[1], c[2], c[3]))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#f00".parse::<Color>(), Ok(Color::rgb8(255, 0, 0)));
        assert_eq!("#f008".parse::<Color>(), Ok(Color::rgba8(255, 0, 0, 0x88)));
        assert_eq!("#00ff00".parse::<Color>(), Ok(Color::rgb8(0, 255, 0)));
        assert_eq!("#0000ff40".parse::<Color>(), Ok(Color::rgba8(0, 0, 255, 0x40)));
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(
            "rgb(10, 20, 30)".parse::<Color>().map(Color::to_rgba8),
            Ok([10, 20, 30, 255])
        );
        assert_eq!(
            "RGBA(0, 0, 0, 0.5)".parse::<Color>().map(Color::to_rgba8),
            Ok([0, 0, 0, 128])
        );
        assert_eq!("transparent".parse::<Color>(), Ok(Color::TRANSPARENT));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#12", "#ggg", "rgb(1,2)", "rgb(300, 0, 0)", "blue"] {
            assert!(
                matches!(bad.parse::<Color>(), Err(LookError::InvalidColor(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        for text in ["#123456", "#12345678"] {
            assert_eq!(text.parse::<Color>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn lerp_midpoint() {
        let mid = Color::BLACK.interpolate(&Color::WHITE, 0.5);
        assert_eq!(mid.to_rgba8(), [128, 128, 128, 255]);
    }

    #[test]
    fn contrasting_picks_readable_ink() {
        assert_eq!(Color::WHITE.contrasting(), Color::BLACK);
        assert_eq!(Color::rgb8(0x20, 0x20, 0x40).contrasting(), Color::WHITE);
    }
}
