// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering context animators resolve looks against.

use understory_mood::{Look, LookType, MoodVector, ThemeMatrix, Timing, looks};

/// What a rendering context supplies to animators on each tick.
///
/// A context that is not attached to a themed root returns `None` from
/// [`theme`](Self::theme); animators then keep their last value.
pub trait ThemeContext {
    /// The theme in effect, if any.
    fn theme(&self) -> Option<&ThemeMatrix>;

    /// The mood looks are resolved under.
    fn mood(&self) -> &MoodVector;

    /// The current time in milliseconds.
    fn time(&self) -> f64;

    /// Resolves the `TIMING` look under the current mood.
    fn timing(&self) -> Option<Timing> {
        self.theme()?.get(&looks::TIMING, self.mood())
    }

    /// Resolves `look` under the current mood.
    fn get_look<T: LookType>(&self, look: &Look<T>) -> Option<T>
    where
        Self: Sized,
    {
        self.theme()?.get(look, self.mood())
    }

    /// Resolves `look` under `mood`, or returns `fallback`.
    fn get_look_or<T: LookType>(&self, look: &Look<T>, mood: &MoodVector, fallback: T) -> T
    where
        Self: Sized,
    {
        self.theme()
            .and_then(|theme| theme.get(look, mood))
            .unwrap_or(fallback)
    }
}

/// A [`ThemeContext`] for a single tick.
///
/// # Example
///
/// ```rust
/// use understory_animator::{ThemeContext, ThemeFrame};
/// use understory_mood::{ThemeMatrix, looks, moods};
///
/// let frame = ThemeFrame::new(Some(ThemeMatrix::light()), moods::DEFAULT.vector(), 16.0);
/// assert_eq!(frame.get_look(&looks::OPACITY), Some(1.0));
/// assert!(frame.timing().is_some());
///
/// let detached = ThemeFrame::detached(0.0);
/// assert_eq!(detached.get_look(&looks::OPACITY), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ThemeFrame {
    theme: Option<ThemeMatrix>,
    mood: MoodVector,
    time: f64,
}

impl ThemeFrame {
    /// Creates a frame.
    #[must_use]
    pub fn new(theme: Option<ThemeMatrix>, mood: MoodVector, time: f64) -> Self {
        Self { theme, mood, time }
    }

    /// Creates a frame with no theme and an empty mood.
    #[must_use]
    pub fn detached(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    /// Returns this frame at another time.
    #[must_use]
    pub fn at(&self, time: f64) -> Self {
        Self {
            time,
            ..self.clone()
        }
    }

    /// Returns this frame with another theme.
    #[must_use]
    pub fn with_theme(&self, theme: ThemeMatrix) -> Self {
        Self {
            theme: Some(theme),
            ..self.clone()
        }
    }

    /// Returns this frame with another mood.
    #[must_use]
    pub fn with_mood(&self, mood: MoodVector) -> Self {
        Self {
            mood,
            ..self.clone()
        }
    }
}

impl ThemeContext for ThemeFrame {
    fn theme(&self) -> Option<&ThemeMatrix> {
        self.theme.as_ref()
    }

    fn mood(&self) -> &MoodVector {
        &self.mood
    }

    fn time(&self) -> f64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_mood::{Color, moods};

    #[test]
    fn get_look_or_falls_back_without_a_theme() {
        let frame = ThemeFrame::detached(0.0);
        let fallback = Color::rgb8(1, 2, 3);
        assert_eq!(
            frame.get_look_or(&looks::TEXT_COLOR, &moods::DEFAULT.vector(), fallback),
            fallback
        );
        assert_eq!(frame.timing(), None);
    }

    #[test]
    fn frames_derive_from_each_other() {
        let frame = ThemeFrame::new(Some(ThemeMatrix::dark()), moods::DEFAULT.vector(), 0.0);
        let later = frame.at(100.0);
        assert_eq!(later.time(), 100.0);
        assert_eq!(later.mood(), frame.mood());

        let disabled = later.with_mood(moods::DISABLED.vector().plus(&moods::DEFAULT.vector()));
        assert_eq!(disabled.get_look(&looks::OPACITY), Some(0.5));
    }
}
