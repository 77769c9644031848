// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Mood: sparse mood vectors and theme matrices.
//!
//! Styling is described as *design intent* rather than concrete values. A
//! component says how it feels ("primary", "hovering", "disabled"), and a
//! theme decides what each look (text color, spacing, shadow, ...) renders
//! as under that feeling.
//!
//! ## Core Concepts
//!
//! - A [`Feel`] is a named dimension of intent. The well-known ones live in
//!   [`feels`]; a [`Mood`] is a named shorthand for the unit vector of one
//!   feel (see [`moods`]).
//! - A [`MoodVector`] weights feels. Moods compose with vector algebra:
//!   [`plus`](MoodVector::plus), [`minus`](MoodVector::minus),
//!   [`times`](MoodVector::times), [`dot`](MoodVector::dot).
//! - A [`Look`] is a named, typed visual property. The well-known ones live
//!   in [`looks`]. The value type decides the blend rule (see [`LookType`]).
//! - A [`LookVector`] holds one value of a look per feel. Resolving a look
//!   under a mood is the look's [`dot`](Look::dot) of the two vectors.
//! - A [`ThemeMatrix`] holds a look vector for every look and resolves any
//!   look under any mood. A [`MoodMatrix`] maps moods to moods and derives
//!   new feels in a theme with [`ThemeMatrix::transform`].
//!
//! All vectors are immutable [`SparseVector`]s with copy-on-write updates,
//! so clones are cheap and snapshots stay valid.
//!
//! ## Example
//!
//! ```rust
//! use understory_mood::{Color, LookVector, MoodVector, feels, looks};
//!
//! let blue = Color::rgb8(0, 0, 255);
//! let gray = Color::rgb8(128, 128, 128);
//! let background = LookVector::of([(feels::PRIMARY, blue), (feels::DEFAULT, gray)]);
//!
//! let mood = MoodVector::of([(feels::PRIMARY, 1.0)]);
//! assert_eq!(looks::BACKGROUND_COLOR.dot(&background, &mood), Some(blue));
//!
//! // Additive looks sum their weighted values.
//! let opacity = LookVector::of([(feels::DEFAULT, 1.0), (feels::DISABLED, -0.5)]);
//! let disabled = MoodVector::of([(feels::DEFAULT, 1.0), (feels::DISABLED, 1.0)]);
//! assert_eq!(looks::OPACITY.dot(&opacity, &disabled), Some(0.5));
//! ```
//!
//! ## Values
//!
//! [`Color`], [`Length`], [`Font`], [`Shadow`], and [`Timing`] all parse
//! from and print to CSS-like text, and implement [`Interpolate`] so that
//! animations can blend between them.
//!
//! ## Logging
//!
//! Lookups that resolve to nothing are reported through `tracing` at `trace`
//! level.

mod catalog;
mod color;
mod error;
mod feel;
mod font;
mod interpolate;
mod length;
mod look;
mod mood_matrix;
mod shadow;
mod theme;
mod timing;
mod value;
mod vector;

pub use catalog::{feels, looks, moods};
pub use color::Color;
pub use error::LookError;
pub use feel::{Feel, Mood};
pub use font::{Font, FontStyle};
pub use interpolate::{Interpolate, Interpolator};
pub use length::{Length, LengthUnit};
pub use look::{
    ColorLook, FontLook, LengthLook, Look, LookId, NumberLook, ShadowLook, TimingLook,
};
pub use mood_matrix::{MoodMatrix, MoodMatrixBuilder};
pub use shadow::{BoxShadow, Shadow};
pub use theme::{ThemeMatrix, ThemeMatrixBuilder};
pub use timing::{Easing, Timing};
pub use value::{LookKind, LookType, ThemeValue};
pub use vector::{FeelVector, LookVector, MoodVector, SparseVector};
