// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named dimensions of the theme vector space.

use core::fmt;

use crate::vector::MoodVector;

/// A named dimension of design intent, such as "primary" or "hovering".
///
/// Feels are compared by name. The well-known feels live in
/// [`feels`](crate::feels).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Feel {
    name: &'static str,
}

impl Feel {
    /// Creates a feel with the given name.
    #[must_use]
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Returns the feel's name.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Feel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Feel({})", self.name)
    }
}

impl fmt::Display for Feel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A named mood, which is also a [`Feel`] under the same name.
///
/// A mood names a whole context ("this view is disabled"); as a feel it is
/// one dimension of a [`MoodVector`].
///
/// # Example
///
/// ```rust
/// use understory_mood::{feels, moods};
///
/// assert_eq!(moods::HOVERING.feel(), feels::HOVERING);
/// assert_eq!(moods::HOVERING.vector().get(&feels::HOVERING), Some(&1.0));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mood {
    name: &'static str,
}

impl Mood {
    /// Creates a mood with the given name.
    #[must_use]
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Returns the mood's name.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns the feel this mood stands for.
    #[must_use]
    #[inline]
    pub const fn feel(self) -> Feel {
        Feel::new(self.name)
    }

    /// Returns the unit mood vector along this mood's feel.
    #[must_use]
    pub fn vector(self) -> MoodVector {
        MoodVector::of([(self.feel(), 1.0)])
    }
}

impl From<Mood> for Feel {
    fn from(mood: Mood) -> Self {
        mood.feel()
    }
}

impl fmt::Debug for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mood({})", self.name)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
