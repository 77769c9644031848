// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme matrices.
//!
//! This module provides [`ThemeMatrix`], which stores how every look renders
//! under every feel and resolves a concrete value for a look under a
//! [`MoodVector`].

use core::fmt;

use tracing::{debug, trace};

use crate::catalog::{feels, looks};
use crate::color::Color;
use crate::feel::Feel;
use crate::font::Font;
use crate::length::Length;
use crate::look::{Look, LookId};
use crate::mood_matrix::MoodMatrix;
use crate::shadow::{BoxShadow, Shadow};
use crate::timing::{Easing, Timing};
use crate::value::{LookType, ThemeValue};
use crate::vector::{FeelVector, LookVector, MoodVector, SparseVector};

type Row = SparseVector<Feel, ThemeValue>;

/// How each look renders under each feel.
///
/// Conceptually a matrix with one row per look (a [`LookVector`]) and one
/// column per feel (a [`FeelVector`]). Resolving a look under a mood is the
/// look's dot product of its row with the mood.
///
/// Theme matrices are immutable and cheap to clone; updates return a new
/// matrix sharing unchanged rows.
///
/// # Example
///
/// ```rust
/// use understory_mood::{Color, MoodVector, ThemeMatrix, feels, looks};
///
/// let blue = Color::rgb8(0, 0, 255);
/// let gray = Color::rgb8(128, 128, 128);
/// let theme = ThemeMatrix::builder()
///     .set(looks::BACKGROUND_COLOR, feels::DEFAULT, gray)
///     .set(looks::BACKGROUND_COLOR, feels::PRIMARY, blue)
///     .build();
///
/// let primary = MoodVector::of([(feels::PRIMARY, 1.0)]);
/// assert_eq!(theme.get(&looks::BACKGROUND_COLOR, &primary), Some(blue));
///
/// let plain = MoodVector::of([(feels::DEFAULT, 1.0)]);
/// assert_eq!(theme.get(&looks::BACKGROUND_COLOR, &plain), Some(gray));
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct ThemeMatrix {
    rows: SparseVector<LookId, Row>,
}

impl fmt::Debug for ThemeMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeMatrix")
            .field("looks", &self.rows.len())
            .finish_non_exhaustive()
    }
}

impl ThemeMatrix {
    /// Returns a builder for a new theme.
    #[must_use]
    pub fn builder() -> ThemeMatrixBuilder {
        ThemeMatrixBuilder::default()
    }

    /// Returns `true` if no look has a row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates the looks that have a row, in insertion order.
    pub fn looks(&self) -> impl Iterator<Item = LookId> + '_ {
        self.rows.keys()
    }

    /// Resolves `look` under `mood`.
    ///
    /// Returns `None` if the look has no row, or if `mood` puts no weight on
    /// any feel the row defines.
    #[must_use]
    pub fn get<T: LookType>(&self, look: &Look<T>, mood: &MoodVector) -> Option<T> {
        let Some(row) = self.rows.get(&look.id()) else {
            trace!(look = look.name(), "theme has no row for look");
            return None;
        };
        let entries = row
            .iter()
            .filter_map(|(feel, value)| Some((feel, T::from_theme_value(value)?)));
        look.dot_entries(entries, mood)
    }

    /// Resolves `look` under `mood`, or returns `fallback`.
    #[must_use]
    pub fn get_or<T: LookType>(&self, look: &Look<T>, mood: &MoodVector, fallback: T) -> T {
        self.get(look, mood).unwrap_or(fallback)
    }

    /// Resolves `look` under `base` composed with a transient `adjustment`.
    ///
    /// See [`MoodVector::compose`].
    #[must_use]
    pub fn get_composed<T: LookType>(
        &self,
        look: &Look<T>,
        base: &MoodVector,
        adjustment: &MoodVector,
    ) -> Option<T> {
        self.get(look, &base.compose(adjustment))
    }

    /// Resolves every look under `mood` at once.
    ///
    /// Looks that resolve to nothing are left out.
    #[must_use]
    pub fn dot(&self, mood: &MoodVector) -> FeelVector {
        self.rows
            .iter()
            .filter_map(|(id, row)| Some((*id, dot_row(row, mood)?)))
            .collect()
    }

    /// Returns the row for `look`.
    #[must_use]
    pub fn row<T: LookType>(&self, look: &Look<T>) -> Option<LookVector<T>> {
        let row = self.rows.get(&look.id())?;
        Some(
            row.iter()
                .filter_map(|(feel, value)| Some((*feel, T::from_theme_value(value)?.clone())))
                .collect(),
        )
    }

    /// Returns the column for `feel`: its value under every look that defines one.
    #[must_use]
    pub fn col(&self, feel: &Feel) -> FeelVector {
        self.rows
            .iter()
            .filter_map(|(id, row)| Some((*id, row.get(feel)?.clone())))
            .collect()
    }

    /// Returns the value of `look` under exactly `feel`.
    #[must_use]
    pub fn cell<T: LookType>(&self, look: &Look<T>, feel: &Feel) -> Option<&T> {
        self.rows
            .get(&look.id())?
            .get(feel)
            .and_then(T::from_theme_value)
    }

    /// Returns a theme with the row for `look` replaced, or removed when `row` is `None`.
    #[must_use]
    pub fn updated_row<T: LookType>(&self, look: &Look<T>, row: Option<LookVector<T>>) -> Self {
        let row = row.map(|r| r.map(|_, v| v.clone().into_theme_value()));
        Self {
            rows: self.rows.updated(look.id(), row),
        }
    }

    /// Returns a theme with a single cell replaced, or removed when `value` is `None`.
    #[must_use]
    pub fn updated<T: LookType>(&self, look: &Look<T>, feel: Feel, value: Option<T>) -> Self {
        let row = self.rows.get(&look.id()).cloned().unwrap_or_default();
        let row = row.updated(feel, value.map(LookType::into_theme_value));
        let row = (!row.is_empty()).then_some(row);
        Self {
            rows: self.rows.updated(look.id(), row),
        }
    }

    /// Returns a theme with the column for `feel` replaced by `col`.
    ///
    /// Looks missing from `col` lose their value under `feel`. Values whose
    /// kind does not match their look are skipped.
    #[must_use]
    pub fn updated_col(&self, feel: Feel, col: &FeelVector) -> Self {
        let mut rows = self.rows.clone();
        for id in self.rows.keys() {
            if !col.has(&id) {
                rows = set_cell(&rows, id, feel, None);
            }
        }
        for (id, value) in col.iter() {
            if value.kind() != id.kind() {
                debug!(look = id.name(), feel = feel.name(), "skipping value of the wrong kind");
                continue;
            }
            rows = set_cell(&rows, *id, feel, Some(value.clone()));
        }
        Self { rows }
    }

    /// Derives new feels from existing ones.
    ///
    /// For every row of `matrix`, the column of its feel is replaced by this
    /// theme resolved under the row's mood. All derived columns are computed
    /// from `self`, so rows of `matrix` do not see each other's results.
    #[must_use]
    pub fn transform(&self, matrix: &MoodMatrix) -> Self {
        let derived: Vec<(Feel, FeelVector)> = matrix
            .rows()
            .map(|(feel, mood)| (*feel, self.dot(mood)))
            .collect();
        derived
            .iter()
            .fold(self.clone(), |theme, (feel, col)| theme.updated_col(*feel, col))
    }

    /// A light palette covering every well-known look.
    #[must_use]
    pub fn light() -> Self {
        Palette {
            background: Color::rgb8(0xff, 0xff, 0xff),
            surface: Color::rgb8(0xf4, 0xf5, 0xf7),
            text: Color::rgb8(0x1f, 0x23, 0x28),
            muted: Color::rgb8(0x6e, 0x77, 0x81),
            accent: Color::rgb8(0x09, 0x69, 0xda),
            border: Color::rgb8(0xd0, 0xd7, 0xde),
            warning: Color::rgb8(0x9a, 0x67, 0x00),
            alert: Color::rgb8(0xcf, 0x22, 0x2e),
            dark: false,
        }
        .build()
    }

    /// A dark palette covering every well-known look.
    #[must_use]
    pub fn dark() -> Self {
        Palette {
            background: Color::rgb8(0x0d, 0x11, 0x17),
            surface: Color::rgb8(0x16, 0x1b, 0x22),
            text: Color::rgb8(0xe6, 0xed, 0xf3),
            muted: Color::rgb8(0x7d, 0x85, 0x90),
            accent: Color::rgb8(0x2f, 0x81, 0xf7),
            border: Color::rgb8(0x30, 0x36, 0x3d),
            warning: Color::rgb8(0xd2, 0x99, 0x22),
            alert: Color::rgb8(0xf8, 0x51, 0x49),
            dark: true,
        }
        .build()
    }
}

fn dot_row(row: &Row, mood: &MoodVector) -> Option<ThemeValue> {
    let mut acc = None;
    for (feel, value) in row.iter() {
        let weight = mood.weight(feel);
        if weight != 0.0 {
            acc = Some(ThemeValue::combine(acc, value, weight));
        }
    }
    acc
}

fn set_cell(
    rows: &SparseVector<LookId, Row>,
    id: LookId,
    feel: Feel,
    value: Option<ThemeValue>,
) -> SparseVector<LookId, Row> {
    let row = rows.get(&id).cloned().unwrap_or_default();
    if value.is_none() && !row.has(&feel) {
        return rows.clone();
    }
    let row = row.updated(feel, value);
    rows.updated(id, (!row.is_empty()).then_some(row))
}

/// Builder for [`ThemeMatrix`].
///
/// Rows keep the order in which looks were first mentioned; within a row,
/// feels keep the order in which they were first set. Since colors blend
/// starting from the first weighted entry, list the baseline feel first.
#[derive(Debug, Default)]
pub struct ThemeMatrixBuilder {
    rows: Vec<(LookId, Vec<(Feel, ThemeValue)>)>,
}

impl ThemeMatrixBuilder {
    fn row_mut(&mut self, id: LookId) -> &mut Vec<(Feel, ThemeValue)> {
        let i = match self.rows.iter().position(|(r, _)| *r == id) {
            Some(i) => i,
            None => {
                self.rows.push((id, Vec::new()));
                self.rows.len() - 1
            }
        };
        &mut self.rows[i].1
    }

    fn put(&mut self, id: LookId, feel: Feel, value: ThemeValue) {
        let row = self.row_mut(id);
        match row.iter_mut().find(|(f, _)| *f == feel) {
            Some(entry) => entry.1 = value,
            None => row.push((feel, value)),
        }
    }

    /// Sets the value of `look` under `feel`.
    #[must_use]
    pub fn set<T: LookType>(mut self, look: Look<T>, feel: Feel, value: T) -> Self {
        self.put(look.id(), feel, value.into_theme_value());
        self
    }

    /// Sets every entry of a row.
    #[must_use]
    pub fn row<T: LookType>(mut self, look: Look<T>, row: LookVector<T>) -> Self {
        for (feel, value) in row.iter() {
            self.put(look.id(), *feel, value.clone().into_theme_value());
        }
        self
    }

    /// Sets every entry of a column.
    ///
    /// Values whose kind does not match their look are skipped.
    #[must_use]
    pub fn col(mut self, feel: Feel, col: &FeelVector) -> Self {
        for (id, value) in col.iter() {
            if value.kind() == id.kind() {
                self.put(*id, feel, value.clone());
            } else {
                debug!(look = id.name(), feel = feel.name(), "skipping value of the wrong kind");
            }
        }
        self
    }

    /// Builds the theme.
    #[must_use]
    pub fn build(self) -> ThemeMatrix {
        ThemeMatrix {
            rows: self
                .rows
                .into_iter()
                .map(|(id, row)| (id, SparseVector::of(row)))
                .collect(),
        }
    }
}

struct Palette {
    background: Color,
    surface: Color,
    text: Color,
    muted: Color,
    accent: Color,
    border: Color,
    warning: Color,
    alert: Color,
    dark: bool,
}

impl Palette {
    fn hover(&self, c: Color) -> Color {
        if self.dark {
            c.lighten(0.08)
        } else {
            c.darken(0.06)
        }
    }

    fn build(self) -> ThemeMatrix {
        use feels::*;

        let ink = |c: Color| {
            LookVector::of([
                (DEFAULT, c),
                (PRIMARY, self.accent.contrasting()),
                (SECONDARY, self.muted),
                (SELECTED, self.accent),
                (DISABLED, self.muted),
                (INACTIVE, self.muted),
                (WARNING, self.warning),
                (ALERT, self.alert),
                (CONTRASTED, self.background),
            ])
        };
        let shadow = Color::BLACK.with_alpha(if self.dark { 0.5 } else { 0.15 });
        let body = Font::new("system-ui", Length::px(14.0));

        ThemeMatrix::builder()
            .row(looks::TEXT_COLOR, ink(self.text))
            .row(looks::ICON_COLOR, ink(self.text))
            .row(looks::LABEL_COLOR, ink(self.text))
            .row(looks::LEGEND_COLOR, ink(self.muted))
            .row(
                looks::PLACEHOLDER_COLOR,
                LookVector::of([(DEFAULT, self.muted), (DISABLED, self.muted.fade(0.6))]),
            )
            .row(
                looks::HIGHLIGHT_COLOR,
                LookVector::of([(DEFAULT, self.accent.with_alpha(0.25))]),
            )
            .row(
                looks::BACKGROUND_COLOR,
                LookVector::of([
                    (DEFAULT, self.background),
                    (PRIMARY, self.accent),
                    (SECONDARY, self.surface),
                    (SELECTED, self.accent.with_alpha(0.2)),
                    (DISABLED, self.surface),
                    (WARNING, self.warning.with_alpha(0.15)),
                    (ALERT, self.alert.with_alpha(0.15)),
                    (AMBIENT, self.surface),
                    (RAISED, self.surface),
                    (FLOATING, self.surface),
                    (OVERLAY, Color::BLACK.with_alpha(0.4)),
                    (TRANSPARENT, Color::TRANSPARENT),
                    (TRANSLUCENT, self.background.with_alpha(0.7)),
                    (HOVERING, self.hover(self.background)),
                    (DARKER, self.background.darken(0.1)),
                    (LIGHTER, self.background.lighten(0.1)),
                    (CONTRASTED, self.text),
                ]),
            )
            .row(
                looks::BORDER_COLOR,
                LookVector::of([
                    (DEFAULT, self.border),
                    (PRIMARY, self.accent),
                    (DISABLED, self.border.fade(0.5)),
                    (WARNING, self.warning),
                    (ALERT, self.alert),
                    (HOVERING, self.hover(self.border)),
                    (CONTRASTED, self.text),
                ]),
            )
            .row(looks::ETCH_COLOR, LookVector::of([(DEFAULT, self.border.fade(0.6))]))
            .row(looks::MASK_COLOR, LookVector::of([(DEFAULT, Color::BLACK.with_alpha(0.5))]))
            .row(looks::TICK_COLOR, LookVector::of([(DEFAULT, self.muted)]))
            .row(looks::GRID_COLOR, LookVector::of([(DEFAULT, self.border.fade(0.5))]))
            .row(
                looks::ACCENT_COLOR,
                LookVector::of([
                    (DEFAULT, self.accent),
                    (DISABLED, self.muted),
                    (HOVERING, self.hover(self.accent)),
                ]),
            )
            .row(looks::FOCUS_COLOR, LookVector::of([(DEFAULT, self.accent)]))
            .row(
                looks::HOVER_COLOR,
                LookVector::of([(DEFAULT, self.text.with_alpha(0.06))]),
            )
            .row(
                looks::OPACITY,
                LookVector::of([
                    (DEFAULT, 1.0),
                    (DISABLED, -0.5),
                    (INACTIVE, -0.25),
                    (TRANSLUCENT, -0.2),
                ]),
            )
            .row(
                looks::SPACING,
                LookVector::of([(DEFAULT, Length::px(8.0)), (NESTED, Length::px(-2.0))]),
            )
            .row(
                looks::CORNER_RADIUS,
                LookVector::of([
                    (DEFAULT, Length::px(4.0)),
                    (FLOATING, Length::px(4.0)),
                    (NESTED, Length::px(-1.0)),
                ]),
            )
            .row(
                looks::SHADOW,
                LookVector::of([
                    (DEFAULT, Shadow::none()),
                    (RAISED, Shadow::single(BoxShadow::new(0.0, 1.0, 3.0, shadow))),
                    (
                        FLOATING,
                        Shadow::from_layers([
                            BoxShadow::new(0.0, 4.0, 12.0, shadow),
                            BoxShadow::new(0.0, 1.0, 3.0, shadow),
                        ]),
                    ),
                    (EMBOSSED, Shadow::single(BoxShadow::new(0.0, 1.0, 2.0, shadow).inset())),
                ]),
            )
            .row(
                looks::TIMING,
                LookVector::of([
                    (DEFAULT, Timing::new(200.0, Easing::EaseInOut)),
                    (HOVERING, Timing::new(100.0, Easing::EaseOut)),
                ]),
            )
            .row(
                looks::FONT,
                LookVector::of([
                    (DEFAULT, body.clone()),
                    (PRIMARY, body.clone().with_weight(600)),
                    (SECONDARY, body.with_size(Length::px(12.0))),
                ]),
            )
            .build()
    }
}
