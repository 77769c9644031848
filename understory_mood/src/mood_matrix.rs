// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear maps from moods to moods.

use crate::feel::Feel;
use crate::vector::{MoodVector, SparseVector};

/// A sparse matrix whose rows map a feel to a [`MoodVector`].
///
/// Transforming a mood replaces each weighted feel with its row, scaled by
/// the weight. This is how derived moods are expressed, for instance
/// "hovering means a little more contrast".
///
/// # Example
///
/// ```rust
/// use understory_mood::{MoodMatrix, MoodVector, feels};
///
/// let hover = MoodMatrix::builder()
///     .row(feels::HOVERING, MoodVector::of([(feels::CONTRASTED, 0.1)]))
///     .build();
///
/// let mood = MoodVector::of([(feels::DEFAULT, 1.0), (feels::HOVERING, 1.0)]);
/// let derived = hover.transform(&mood, true);
///
/// assert_eq!(derived.get(&feels::DEFAULT), Some(&1.0));
/// assert_eq!(derived.get(&feels::CONTRASTED), Some(&0.1));
/// assert!(!derived.has(&feels::HOVERING));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoodMatrix {
    rows: SparseVector<Feel, MoodVector>,
}

impl MoodMatrix {
    /// Returns a builder for a new matrix.
    #[must_use]
    pub fn builder() -> MoodMatrixBuilder {
        MoodMatrixBuilder::default()
    }

    /// Returns the row for `feel`.
    #[must_use]
    pub fn row(&self, feel: &Feel) -> Option<&MoodVector> {
        self.rows.get(feel)
    }

    /// Iterates the rows.
    pub fn rows(&self) -> impl Iterator<Item = (&Feel, &MoodVector)> + '_ {
        self.rows.iter()
    }

    /// Returns a matrix with the row for `feel` replaced or removed.
    #[must_use]
    pub fn updated_row(&self, feel: Feel, row: Option<MoodVector>) -> Self {
        Self {
            rows: self.rows.updated(feel, row),
        }
    }

    /// Maps `mood` through the matrix.
    ///
    /// Each feel of `mood` contributes its row scaled by its weight. A feel
    /// without a row passes through unchanged when `identity` is set and is
    /// dropped otherwise.
    #[must_use]
    pub fn transform(&self, mood: &MoodVector, identity: bool) -> MoodVector {
        let mut result = MoodVector::empty();
        for (feel, weight) in mood.iter() {
            match self.rows.get(feel) {
                Some(row) => result = result.plus(&row.times(*weight)),
                None if identity => {
                    result = result.plus(&MoodVector::of([(*feel, *weight)]));
                }
                None => {}
            }
        }
        result
    }
}

/// Builder for [`MoodMatrix`].
#[derive(Debug, Default)]
pub struct MoodMatrixBuilder {
    rows: Vec<(Feel, MoodVector)>,
}

impl MoodMatrixBuilder {
    /// Sets the row for `feel`, replacing any previous row.
    #[must_use]
    pub fn row(mut self, feel: Feel, row: MoodVector) -> Self {
        self.rows.retain(|(f, _)| *f != feel);
        self.rows.push((feel, row));
        self
    }

    /// Builds the matrix.
    #[must_use]
    pub fn build(self) -> MoodMatrix {
        MoodMatrix {
            rows: SparseVector::of(self.rows),
        }
    }
}
