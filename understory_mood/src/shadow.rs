// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered box shadows.

use core::fmt;
use core::str::FromStr;

use smallvec::SmallVec;

use crate::color::Color;
use crate::error::LookError;
use crate::interpolate::{Interpolate, lerp, step};

/// One shadow layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxShadow {
    /// Horizontal offset in pixels.
    pub dx: f64,
    /// Vertical offset in pixels.
    pub dy: f64,
    /// Blur radius in pixels.
    pub blur: f64,
    /// Spread in pixels.
    pub spread: f64,
    /// Shadow color.
    pub color: Color,
    /// Whether the shadow is drawn inside the box.
    pub inset: bool,
}

impl BoxShadow {
    /// Creates an outer shadow without spread.
    #[must_use]
    pub const fn new(dx: f64, dy: f64, blur: f64, color: Color) -> Self {
        Self {
            dx,
            dy,
            blur,
            spread: 0.0,
            color,
            inset: false,
        }
    }

    /// Returns this layer with a spread.
    #[must_use]
    pub const fn with_spread(self, spread: f64) -> Self {
        Self { spread, ..self }
    }

    /// Returns this layer drawn inside the box.
    #[must_use]
    pub const fn inset(self) -> Self {
        Self {
            inset: true,
            ..self
        }
    }
}

impl Interpolate for BoxShadow {
    fn interpolate(&self, to: &Self, u: f64) -> Self {
        if self.inset != to.inset {
            return step(self, to, u);
        }
        Self {
            dx: lerp(self.dx, to.dx, u),
            dy: lerp(self.dy, to.dy, u),
            blur: lerp(self.blur, to.blur, u),
            spread: lerp(self.spread, to.spread, u),
            color: self.color.interpolate(&to.color, u),
            inset: self.inset,
        }
    }
}

impl fmt::Display for BoxShadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inset {
            f.write_str("inset ")?;
        }
        write!(f, "{}px {}px {}px", self.dx, self.dy, self.blur)?;
        if self.spread != 0.0 {
            write!(f, " {}px", self.spread)?;
        }
        write!(f, " {}", self.color)
    }
}

/// A stack of [`BoxShadow`] layers, painted first to last.
///
/// # Example
///
/// ```rust
/// use understory_mood::{BoxShadow, Color, Shadow};
///
/// let shadow: Shadow = "0 1px 2px rgba(0, 0, 0, 0.2), 0 4px 8px #0000001a".parse().unwrap();
/// assert_eq!(shadow.layers().len(), 2);
/// assert_eq!(shadow.layers()[0].dy, 1.0);
/// assert!("none".parse::<Shadow>().unwrap().is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shadow {
    layers: SmallVec<[BoxShadow; 2]>,
}

impl Shadow {
    /// No shadow.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A single-layer shadow.
    #[must_use]
    pub fn single(layer: BoxShadow) -> Self {
        Self::from_layers([layer])
    }

    /// A shadow from layers.
    #[must_use]
    pub fn from_layers(layers: impl IntoIterator<Item = BoxShadow>) -> Self {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    /// The layers, first painted first.
    #[must_use]
    pub fn layers(&self) -> &[BoxShadow] {
        &self.layers
    }

    /// Returns `true` if there are no layers.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Interpolate for Shadow {
    /// Blends layer by layer when the layer counts match.
    fn interpolate(&self, to: &Self, u: f64) -> Self {
        if self.layers.len() != to.layers.len() {
            return step(self, to, u);
        }
        Self::from_layers(
            self.layers
                .iter()
                .zip(&to.layers)
                .map(|(a, b)| a.interpolate(b, u)),
        )
    }
}

impl fmt::Display for Shadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layers.is_empty() {
            return f.write_str("none");
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{layer}")?;
        }
        Ok(())
    }
}

impl FromStr for Shadow {
    type Err = LookError;

    /// Parses a comma-separated list of `[inset] dx dy [blur [spread]] [color]`
    /// layers, or `none`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.eq_ignore_ascii_case("none") {
            return Ok(Self::none());
        }
        let invalid = || LookError::InvalidShadow(s.into());
        split_top_level(input, ',')
            .map(|layer| parse_layer(layer).ok_or_else(invalid))
            .collect::<Result<SmallVec<_>, _>>()
            .map(|layers| Self { layers })
    }
}

/// Splits on `sep`, ignoring separators nested inside parentheses.
fn split_top_level(input: &str, sep: char) -> impl Iterator<Item = &str> {
    let mut depth = 0_u32;
    let mut start = 0;
    let mut parts = Vec::new();
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts.into_iter().map(str::trim)
}

fn parse_layer(layer: &str) -> Option<BoxShadow> {
    let mut inset = false;
    let mut color = None;
    let mut lengths: SmallVec<[f64; 4]> = SmallVec::new();
    for token in split_top_level(layer, ' ').filter(|t| !t.is_empty()) {
        if token.eq_ignore_ascii_case("inset") {
            inset = true;
        } else if let Some(value) = parse_px(token) {
            if lengths.len() == 4 {
                return None;
            }
            lengths.push(value);
        } else {
            if color.is_some() {
                return None;
            }
            color = Some(token.parse::<Color>().ok()?);
        }
    }
    if lengths.len() < 2 {
        return None;
    }
    Some(BoxShadow {
        dx: lengths[0],
        dy: lengths[1],
        blur: lengths.get(2).copied().unwrap_or(0.0),
        spread: lengths.get(3).copied().unwrap_or(0.0),
        color: color.unwrap_or(Color::BLACK),
        inset,
    })
}

fn parse_px(token: &str) -> Option<f64> {
    token
        .strip_suffix("px")
        .unwrap_or(token)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
