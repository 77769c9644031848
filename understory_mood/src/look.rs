// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Looks: named, typed visual properties.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use tracing::trace;

use crate::color::Color;
use crate::error::LookError;
use crate::feel::Feel;
use crate::font::Font;
use crate::interpolate::Interpolator;
use crate::length::Length;
use crate::shadow::Shadow;
use crate::timing::Timing;
use crate::value::{LookKind, LookType};
use crate::vector::{LookVector, MoodVector};

/// A look producing plain numbers, like opacity.
pub type NumberLook = Look<f64>;
/// A look producing [`Length`]s.
pub type LengthLook = Look<Length>;
/// A look producing [`Color`]s.
pub type ColorLook = Look<Color>;
/// A look producing [`Font`]s.
pub type FontLook = Look<Font>;
/// A look producing [`Shadow`]s.
pub type ShadowLook = Look<Shadow>;
/// A look producing [`Timing`]s.
pub type TimingLook = Look<Timing>;

/// The untyped identity of a look: its name and value kind.
///
/// Used as the key of [`FeelVector`](crate::FeelVector)s and theme rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LookId {
    name: &'static str,
    kind: LookKind,
}

impl LookId {
    /// Returns the look's name.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns the kind of value the look produces.
    #[must_use]
    #[inline]
    pub const fn kind(self) -> LookKind {
        self.kind
    }
}

impl fmt::Display for LookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A named visual property resolving to values of type `T`.
///
/// The look supplies the behavior, vectors are plain data: combination,
/// interpolation, text coercion and the vector operations over
/// [`LookVector`]s all go through the look, which applies the blend rule of
/// `T` (see [`LookType`]).
///
/// # Example
///
/// ```rust
/// use understory_mood::{Color, LookVector, MoodVector, feels, looks};
///
/// let blue = Color::rgb8(0, 0, 255);
/// let gray = Color::rgb8(128, 128, 128);
/// let background = LookVector::of([(feels::PRIMARY, blue), (feels::DEFAULT, gray)]);
///
/// let mood = MoodVector::of([(feels::PRIMARY, 1.0)]);
/// assert_eq!(looks::BACKGROUND_COLOR.dot(&background, &mood), Some(blue));
/// ```
pub struct Look<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Look<T> {
    /// Creates a look.
    #[must_use]
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Returns the look's name.
    #[must_use]
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: LookType> Look<T> {
    /// Returns the untyped identity of this look.
    #[must_use]
    #[inline]
    pub const fn id(&self) -> LookId {
        LookId {
            name: self.name,
            kind: T::KIND,
        }
    }

    /// Folds `value` at `weight` into `acc` using the blend rule of `T`.
    #[must_use]
    pub fn combine(&self, acc: Option<T>, value: &T, weight: f64) -> T {
        T::combine(acc, value, weight)
    }

    /// Returns an interpolator from `from` to `to`.
    #[must_use]
    pub fn between(&self, from: T, to: T) -> Interpolator<T> {
        Interpolator::new(from, to)
    }

    /// Parses a value of this look from text.
    pub fn coerce(&self, input: &str) -> Result<T, LookError> {
        T::parse_look(input)
    }

    /// Resolves one value from per-feel values weighted by `mood`.
    ///
    /// Entries whose feel has zero or no weight in `mood` are skipped; the
    /// rest are folded in the vector's order. Returns `None` when nothing
    /// remains.
    #[must_use]
    pub fn dot(&self, vector: &LookVector<T>, mood: &MoodVector) -> Option<T> {
        self.dot_entries(vector.iter(), mood)
    }

    pub(crate) fn dot_entries<'a>(
        &self,
        entries: impl Iterator<Item = (&'a Feel, &'a T)>,
        mood: &MoodVector,
    ) -> Option<T> {
        let mut acc = None;
        for (feel, value) in entries {
            let weight = mood.weight(feel);
            if weight == 0.0 {
                continue;
            }
            acc = Some(T::combine(acc, value, weight));
        }
        if acc.is_none() {
            trace!(look = self.name, "no weighted feel for look");
        }
        acc
    }

    /// Entry-wise combination of two look vectors.
    ///
    /// Shared feels are combined at weight `1`; a feel on one side only is
    /// carried over.
    #[must_use]
    pub fn plus(&self, a: &LookVector<T>, b: &LookVector<T>) -> LookVector<T> {
        a.merge(b, |x, y| match (x, y) {
            (Some(x), Some(y)) => Some(T::combine(Some(x.clone()), y, 1.0)),
            (Some(v), None) | (None, Some(v)) => Some(v.clone()),
            (None, None) => None,
        })
    }

    /// Entry-wise combination of `a` with `b` at weight `-1`.
    #[must_use]
    pub fn minus(&self, a: &LookVector<T>, b: &LookVector<T>) -> LookVector<T> {
        a.merge(b, |x, y| match (x, y) {
            (Some(x), Some(y)) => Some(T::combine(Some(x.clone()), y, -1.0)),
            (Some(x), None) => Some(x.clone()),
            (None, Some(y)) => Some(T::combine(None, y, -1.0)),
            (None, None) => None,
        })
    }

    /// Scales every entry by `scalar` through the blend rule.
    #[must_use]
    pub fn times(&self, vector: &LookVector<T>, scalar: f64) -> LookVector<T> {
        vector.map(|_, v| T::combine(None, v, scalar))
    }
}

impl<T> Copy for Look<T> {}

impl<T> Clone for Look<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Look<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for Look<T> {}

impl<T> Hash for Look<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T> fmt::Debug for Look<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Look({})", self.name)
    }
}

impl<T> fmt::Display for Look<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
