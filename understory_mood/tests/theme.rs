// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme resolution and mood algebra, end to end.

use std::rc::Rc;

use understory_mood::{
    Color, Easing, Length, LookVector, MoodMatrix, MoodVector, Shadow, ThemeMatrix, Timing,
    feels, looks, moods,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const BLUE: Color = Color::rgb8(0, 0, 255);
const GRAY: Color = Color::rgb8(128, 128, 128);

#[test]
fn primary_mood_picks_the_primary_background() {
    init_tracing();
    let background = LookVector::of([(feels::PRIMARY, BLUE), (feels::DEFAULT, GRAY)]);
    let mood = MoodVector::of([(feels::PRIMARY, 1.0)]);
    assert_eq!(looks::BACKGROUND_COLOR.dot(&background, &mood), Some(BLUE));

    let theme = ThemeMatrix::builder()
        .row(looks::BACKGROUND_COLOR, background)
        .build();
    assert_eq!(theme.get(&looks::BACKGROUND_COLOR, &moods::PRIMARY.vector()), Some(BLUE));
    assert_eq!(theme.get(&looks::BACKGROUND_COLOR, &moods::DEFAULT.vector()), Some(GRAY));
    assert_eq!(theme.get(&looks::BACKGROUND_COLOR, &moods::ALERT.vector()), None);
}

#[test]
fn plus_distributes_over_dot() {
    let a = MoodVector::of([(feels::DEFAULT, 1.0), (feels::PRIMARY, 2.0)]);
    let b = MoodVector::of([(feels::PRIMARY, 0.5), (feels::HOVERING, 3.0)]);
    let c = MoodVector::of([
        (feels::DEFAULT, 2.0),
        (feels::PRIMARY, 4.0),
        (feels::HOVERING, 1.0),
    ]);
    let lhs = a.plus(&b).dot(&c).unwrap();
    let rhs = a.dot(&c).unwrap() + b.dot(&c).unwrap();
    assert!((lhs - rhs).abs() < 1e-12, "{lhs} != {rhs}");
}

#[test]
fn vector_algebra_laws() {
    let a = MoodVector::of([(feels::DEFAULT, 1.0), (feels::DISABLED, -0.25)]);
    assert_eq!(a.negative().negative(), a);
    assert_eq!(a.minus(&a).dot(&a), Some(0.0));
    assert_eq!(a.times(2.0), a.plus(&a));
    assert_eq!(a.updated(feels::DISABLED, None), MoodVector::of([(feels::DEFAULT, 1.0)]));
    assert_eq!(a.dot(&MoodVector::of([(feels::ALERT, 1.0)])), None);
}

#[test]
fn vectors_rebuild_from_their_parts() {
    let a = MoodVector::of([(feels::DEFAULT, 1.0), (feels::HOVERING, 0.5)]);
    let shared = MoodVector::from_array(a.array().clone(), Some(a.index().clone()));
    assert_eq!(shared, a);
    assert!(Rc::ptr_eq(shared.array(), a.array()));

    let reindexed = MoodVector::from_array(a.array().clone(), None);
    assert_eq!(reindexed.get(&feels::HOVERING), Some(&0.5));
}

#[test]
fn zero_weights_do_not_change_resolution() {
    let theme = ThemeMatrix::light();
    let base = moods::PRIMARY.vector();
    let padded = base.updated(feels::ALERT, Some(0.0)).updated(feels::FLOATING, Some(0.0));
    for look in [looks::TEXT_COLOR, looks::BACKGROUND_COLOR, looks::BORDER_COLOR] {
        assert_eq!(theme.get(&look, &base), theme.get(&look, &padded), "{look}");
    }
    assert_eq!(theme.get(&looks::FONT, &base), theme.get(&looks::FONT, &padded));
}

#[test]
fn winner_take_all_looks_follow_the_strongest_layer() {
    let theme = ThemeMatrix::dark();
    let raised = MoodVector::of([(feels::DEFAULT, 1.0), (feels::RAISED, 1.0)]);
    let shadow = theme.get(&looks::SHADOW, &raised).unwrap();
    assert_eq!(shadow.layers().len(), 1);

    let flat = theme.get(&looks::SHADOW, &moods::DEFAULT.vector()).unwrap();
    assert_eq!(flat, Shadow::none());

    let hover = theme
        .get_composed(&looks::TIMING, &moods::DEFAULT.vector(), &moods::HOVERING.vector())
        .unwrap();
    assert_eq!(hover, Timing::new(100.0, Easing::EaseOut));
}

#[test]
fn nested_spacing_shrinks_additively() {
    let theme = ThemeMatrix::light();
    let nested = MoodVector::of([(feels::DEFAULT, 1.0), (feels::NESTED, 2.0)]);
    assert_eq!(theme.get(&looks::SPACING, &nested), Some(Length::px(4.0)));
}

#[test]
fn derived_feels_follow_the_mood_matrix() {
    init_tracing();
    let theme = ThemeMatrix::builder()
        .row(
            looks::BACKGROUND_COLOR,
            LookVector::of([(feels::DEFAULT, GRAY), (feels::PRIMARY, BLUE)]),
        )
        .build();
    let matrix = MoodMatrix::builder()
        .row(feels::SELECTED, moods::PRIMARY.vector())
        .build();
    let derived = theme.transform(&matrix);

    let selected = MoodVector::of([(feels::SELECTED, 1.0)]);
    assert_eq!(theme.get(&looks::BACKGROUND_COLOR, &selected), None);
    assert_eq!(derived.get(&looks::BACKGROUND_COLOR, &selected), Some(BLUE));
    assert_eq!(
        derived.get(&looks::BACKGROUND_COLOR, &moods::DEFAULT.vector()),
        Some(GRAY)
    );
}

#[test]
fn looks_coerce_text() {
    assert_eq!(looks::TEXT_COLOR.coerce("#0000ff"), Ok(BLUE));
    assert_eq!(looks::SPACING.coerce("1.5em"), Ok(Length::em(1.5)));
    assert!(looks::TIMING.coerce("fast").is_err());
}
