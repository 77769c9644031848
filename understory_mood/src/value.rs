// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Look value types and their blend rules.
//!
//! Every type a [`Look`](crate::Look) can produce implements [`LookType`],
//! which supplies the rule used to fold weighted per-feel values into one
//! value. [`ThemeValue`] holds any of them, so theme rows of different look
//! types can live in one matrix.

use core::fmt;

use crate::color::Color;
use crate::error::LookError;
use crate::font::Font;
use crate::interpolate::Interpolate;
use crate::length::Length;
use crate::shadow::Shadow;
use crate::timing::Timing;

/// The family of value a look produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LookKind {
    /// `f64`.
    Number,
    /// [`Length`].
    Length,
    /// [`Color`].
    Color,
    /// [`Font`].
    Font,
    /// [`Shadow`].
    Shadow,
    /// [`Timing`].
    Timing,
}

/// A value type that looks can resolve to.
///
/// The blend rule decides how weighted values combine:
///
/// | Type | Rule |
/// |------|------|
/// | `f64` | additive: `acc + weight * value`, starting from `0` |
/// | [`Length`] | additive when units agree, otherwise interpolated |
/// | [`Color`] | interpolated: `acc.lerp(value, weight)`, starting from the first value |
/// | [`Font`], [`Shadow`], [`Timing`] | winner-take-all: the last positively weighted value |
pub trait LookType: Interpolate + PartialEq + fmt::Debug + Sized + 'static {
    /// The family this type belongs to.
    const KIND: LookKind;

    /// Folds `value` at `weight` into the accumulated value.
    #[must_use]
    fn combine(acc: Option<Self>, value: &Self, weight: f64) -> Self;

    /// Parses a value from text.
    fn parse_look(input: &str) -> Result<Self, LookError>;

    /// Wraps the value for heterogeneous storage.
    fn into_theme_value(self) -> ThemeValue;

    /// Borrows the value back out of a [`ThemeValue`] of the same kind.
    fn from_theme_value(value: &ThemeValue) -> Option<&Self>;
}

/// Keeps `value` when `weight` is positive, otherwise the accumulated value.
fn winner_take_all<T: Clone>(acc: Option<T>, value: &T, weight: f64) -> T {
    match acc {
        Some(acc) if weight <= 0.0 => acc,
        _ => value.clone(),
    }
}

impl LookType for f64 {
    const KIND: LookKind = LookKind::Number;

    fn combine(acc: Option<Self>, value: &Self, weight: f64) -> Self {
        acc.unwrap_or(0.0) + weight * value
    }

    fn parse_look(input: &str) -> Result<Self, LookError> {
        match input.trim().parse::<Self>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(LookError::InvalidNumber(input.into())),
        }
    }

    fn into_theme_value(self) -> ThemeValue {
        ThemeValue::Number(self)
    }

    fn from_theme_value(value: &ThemeValue) -> Option<&Self> {
        match value {
            ThemeValue::Number(v) => Some(v),
            _ => None,
        }
    }
}

impl LookType for Length {
    const KIND: LookKind = LookKind::Length;

    fn combine(acc: Option<Self>, value: &Self, weight: f64) -> Self {
        match acc {
            None => value.scale(weight),
            Some(acc) => acc
                .checked_add(value.scale(weight))
                .unwrap_or_else(|| acc.interpolate(value, weight)),
        }
    }

    fn parse_look(input: &str) -> Result<Self, LookError> {
        input.parse()
    }

    fn into_theme_value(self) -> ThemeValue {
        ThemeValue::Length(self)
    }

    fn from_theme_value(value: &ThemeValue) -> Option<&Self> {
        match value {
            ThemeValue::Length(v) => Some(v),
            _ => None,
        }
    }
}

impl LookType for Color {
    const KIND: LookKind = LookKind::Color;

    fn combine(acc: Option<Self>, value: &Self, weight: f64) -> Self {
        match acc {
            None => *value,
            Some(acc) => acc.interpolate(value, weight),
        }
    }

    fn parse_look(input: &str) -> Result<Self, LookError> {
        input.parse()
    }

    fn into_theme_value(self) -> ThemeValue {
        ThemeValue::Color(self)
    }

    fn from_theme_value(value: &ThemeValue) -> Option<&Self> {
        match value {
            ThemeValue::Color(v) => Some(v),
            _ => None,
        }
    }
}

impl LookType for Font {
    const KIND: LookKind = LookKind::Font;

    fn combine(acc: Option<Self>, value: &Self, weight: f64) -> Self {
        winner_take_all(acc, value, weight)
    }

    fn parse_look(input: &str) -> Result<Self, LookError> {
        input.parse()
    }

    fn into_theme_value(self) -> ThemeValue {
        ThemeValue::Font(self)
    }

    fn from_theme_value(value: &ThemeValue) -> Option<&Self> {
        match value {
            ThemeValue::Font(v) => Some(v),
            _ => None,
        }
    }
}

impl LookType for Shadow {
    const KIND: LookKind = LookKind::Shadow;

    fn combine(acc: Option<Self>, value: &Self, weight: f64) -> Self {
        winner_take_all(acc, value, weight)
    }

    fn parse_look(input: &str) -> Result<Self, LookError> {
        input.parse()
    }

    fn into_theme_value(self) -> ThemeValue {
        ThemeValue::Shadow(self)
    }

    fn from_theme_value(value: &ThemeValue) -> Option<&Self> {
        match value {
            ThemeValue::Shadow(v) => Some(v),
            _ => None,
        }
    }
}

impl LookType for Timing {
    const KIND: LookKind = LookKind::Timing;

    fn combine(acc: Option<Self>, value: &Self, weight: f64) -> Self {
        winner_take_all(acc, value, weight)
    }

    fn parse_look(input: &str) -> Result<Self, LookError> {
        input.parse()
    }

    fn into_theme_value(self) -> ThemeValue {
        ThemeValue::Timing(self)
    }

    fn from_theme_value(value: &ThemeValue) -> Option<&Self> {
        match value {
            ThemeValue::Timing(v) => Some(v),
            _ => None,
        }
    }
}

/// A value of any [`LookKind`].
#[derive(Clone, Debug, PartialEq)]
pub enum ThemeValue {
    /// A number.
    Number(f64),
    /// A length.
    Length(Length),
    /// A color.
    Color(Color),
    /// A font.
    Font(Font),
    /// A shadow.
    Shadow(Shadow),
    /// A timing.
    Timing(Timing),
}

impl ThemeValue {
    /// Returns the kind of the held value.
    #[must_use]
    pub fn kind(&self) -> LookKind {
        match self {
            Self::Number(_) => LookKind::Number,
            Self::Length(_) => LookKind::Length,
            Self::Color(_) => LookKind::Color,
            Self::Font(_) => LookKind::Font,
            Self::Shadow(_) => LookKind::Shadow,
            Self::Timing(_) => LookKind::Timing,
        }
    }

    /// Borrows the held value as `T`.
    #[must_use]
    pub fn get<T: LookType>(&self) -> Option<&T> {
        T::from_theme_value(self)
    }

    /// Applies the blend rule of the held kind.
    ///
    /// A kind mismatch between `acc` and `value` restarts the fold at `value`.
    #[must_use]
    pub fn combine(acc: Option<Self>, value: &Self, weight: f64) -> Self {
        fn fold<T: LookType>(acc: Option<ThemeValue>, value: &T, weight: f64) -> ThemeValue {
            let acc = acc.and_then(|a| T::from_theme_value(&a).cloned());
            T::combine(acc, value, weight).into_theme_value()
        }
        match value {
            Self::Number(v) => fold(acc, v, weight),
            Self::Length(v) => fold(acc, v, weight),
            Self::Color(v) => fold(acc, v, weight),
            Self::Font(v) => fold(acc, v, weight),
            Self::Shadow(v) => fold(acc, v, weight),
            Self::Timing(v) => fold(acc, v, weight),
        }
    }

    /// Parses `input` as a value of `kind`.
    pub fn parse(kind: LookKind, input: &str) -> Result<Self, LookError> {
        Ok(match kind {
            LookKind::Number => Self::Number(f64::parse_look(input)?),
            LookKind::Length => Self::Length(Length::parse_look(input)?),
            LookKind::Color => Self::Color(Color::parse_look(input)?),
            LookKind::Font => Self::Font(Font::parse_look(input)?),
            LookKind::Shadow => Self::Shadow(Shadow::parse_look(input)?),
            LookKind::Timing => Self::Timing(Timing::parse_look(input)?),
        })
    }
}

impl fmt::Display for ThemeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Length(v) => write!(f, "{v}"),
            Self::Color(v) => write!(f, "{v}"),
            Self::Font(v) => write!(f, "{v}"),
            Self::Shadow(v) => write!(f, "{v}"),
            Self::Timing(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_add() {
        let acc = f64::combine(None, &0.5, 0.5);
        assert_eq!(f64::combine(Some(acc), &1.0, 0.5), 0.75);
    }

    #[test]
    fn lengths_add_within_a_unit() {
        let acc = Length::combine(None, &Length::px(10.0), 0.5);
        assert_eq!(Length::combine(Some(acc), &Length::px(4.0), 1.0), Length::px(9.0));
        assert_eq!(
            Length::combine(Some(Length::px(10.0)), &Length::em(1.0), 0.75),
            Length::em(1.0)
        );
    }

    #[test]
    fn colors_seed_with_first_value() {
        let red = Color::rgb8(255, 0, 0);
        let blue = Color::rgb8(0, 0, 255);
        assert_eq!(Color::combine(None, &red, 0.3), red);
        assert_eq!(
            Color::combine(Some(red), &blue, 0.5).to_rgba8(),
            [128, 0, 128, 255]
        );
    }

    #[test]
    fn timings_take_the_last_positive_weight() {
        let fast = Timing::linear(100.0);
        let slow = Timing::linear(400.0);
        assert_eq!(Timing::combine(Some(fast), &slow, 0.1), slow);
        assert_eq!(Timing::combine(Some(fast), &slow, -1.0), fast);
    }

    #[test]
    fn erased_combine_matches_typed() {
        let acc = ThemeValue::combine(None, &ThemeValue::Number(2.0), 0.5);
        let acc = ThemeValue::combine(Some(acc), &ThemeValue::Number(4.0), 0.25);
        assert_eq!(acc, ThemeValue::Number(2.0));
        assert_eq!(acc.get::<f64>(), Some(&2.0));
        assert_eq!(acc.get::<Color>(), None);
    }

    #[test]
    fn parse_by_kind() {
        assert_eq!(
            ThemeValue::parse(LookKind::Length, "2em"),
            Ok(ThemeValue::Length(Length::em(2.0)))
        );
        assert!(matches!(
            ThemeValue::parse(LookKind::Number, "NaN"),
            Err(LookError::InvalidNumber(_))
        ));
    }
}
