// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animators tracking themes across frames.

use understory_animator::{AnimatorPhase, AnimatorRegistry, ThemeAnimator, ThemeFrame};
use understory_fastener::{Affinity, FastenerDescriptor, FastenerTree, UpdateFlags};
use understory_mood::{Color, ThemeMatrix, Timing, feels, looks, moods};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn opacity_theme(value: f64) -> ThemeMatrix {
    ThemeMatrix::builder()
        .set(looks::OPACITY, feels::DEFAULT, value)
        .build()
}

#[test]
fn opacity_tweens_halfway_at_half_time() {
    init_tracing();
    let mut tree = FastenerTree::new();
    let view = tree.insert_root();
    let opacity = tree.insert_fastener(
        view,
        FastenerDescriptor::animator("opacity")
            .default(0.0_f64)
            .affects(UpdateFlags::NEEDS_RENDER),
    );
    tree.mount(view);

    let mut animator = ThemeAnimator::new(opacity);
    animator.set_look(Some(looks::OPACITY), Some(Timing::INSTANT));
    let frame = ThemeFrame::new(Some(opacity_theme(0.4)), moods::DEFAULT.vector(), 0.0);
    animator.recohere(&mut tree, &frame, None);
    assert_eq!(animator.value(&tree), Some(&0.4));
    assert_eq!(animator.phase(), AnimatorPhase::Tracking);

    let frame = frame.with_theme(opacity_theme(1.0));
    assert!(animator.apply_theme(&mut tree, &frame, Some(Timing::linear(300.0))));
    assert_eq!(animator.phase(), AnimatorPhase::Tweening);

    animator.animate(&mut tree, 150.0);
    let value = *animator.value(&tree).unwrap();
    assert!((value - 0.7).abs() < 1e-9, "expected 0.7, got {value}");
    assert!(
        tree.pending_updates(view)
            .contains(UpdateFlags::NEEDS_ANIMATE | UpdateFlags::NEEDS_RENDER)
    );

    animator.animate(&mut tree, 300.0);
    assert_eq!(animator.value(&tree), Some(&1.0));
    assert_eq!(animator.phase(), AnimatorPhase::Tracking);
}

#[test]
fn mood_changes_retarget_mid_flight() {
    let mut tree = FastenerTree::new();
    let view = tree.insert_root();
    let background = tree.insert_fastener(
        view,
        FastenerDescriptor::animator("backgroundColor").default(Color::WHITE),
    );
    tree.mount(view);

    let theme = ThemeMatrix::light();
    let mut animator = ThemeAnimator::new(background);
    animator.set_look(Some(looks::BACKGROUND_COLOR), Some(Timing::linear(100.0)));

    let resting = ThemeFrame::new(Some(theme.clone()), moods::DEFAULT.vector(), 0.0);
    animator.recohere(&mut tree, &resting, None);
    animator.recohere(&mut tree, &resting.at(100.0), None);
    let rest = theme.get(&looks::BACKGROUND_COLOR, &moods::DEFAULT.vector()).unwrap();
    assert_eq!(animator.value(&tree), Some(&rest));

    let hovered_mood = moods::DEFAULT.vector().compose(&moods::HOVERING.vector());
    let hovered = resting.with_mood(hovered_mood.clone()).at(150.0);
    animator.recohere(&mut tree, &hovered, None);
    assert!(animator.is_animating());

    // Back to rest before the hover tween finishes.
    animator.recohere(&mut tree, &resting.at(200.0), None);
    assert_eq!(animator.tween().map(|t| *t.to()), Some(rest));
    animator.recohere(&mut tree, &resting.at(300.0), None);
    assert_eq!(animator.value(&tree), Some(&rest));
}

#[test]
fn registry_drives_a_derived_animator_through_theme_changes() {
    init_tracing();
    let mut tree = FastenerTree::new();
    let parent = tree.insert_root();
    let child = tree.insert_child(parent);
    let parent_color = tree.insert_fastener(
        parent,
        FastenerDescriptor::animator("textColor").default(Color::BLACK),
    );
    let child_color = tree.insert_fastener(
        child,
        FastenerDescriptor::animator("textColor").default(Color::BLACK),
    );
    tree.mount(parent);

    let mut registry = AnimatorRegistry::new();
    let mut source = ThemeAnimator::new(parent_color);
    source.set_look(Some(looks::TEXT_COLOR), Some(Timing::INSTANT));
    registry.insert(source);
    let mut derived = ThemeAnimator::new(child_color);
    derived.set_inlet(Some(parent_color));
    registry.insert(derived);

    // The derived animator has no timing of its own and uses the theme's.
    let light = ThemeFrame::new(Some(ThemeMatrix::light()), moods::DEFAULT.vector(), 0.0);
    let theme_timing = ThemeMatrix::light()
        .get(&looks::TIMING, &moods::DEFAULT.vector())
        .unwrap();
    assert!(registry.tick(&mut tree, &light));
    assert!(!registry.tick(&mut tree, &light.at(theme_timing.total_ms())));
    let light_text = ThemeMatrix::light()
        .get(&looks::TEXT_COLOR, &moods::DEFAULT.vector())
        .unwrap();
    assert_eq!(tree.state(child_color), Some(&light_text));

    // The child follows the look, not a frozen value.
    let dark = light.with_theme(ThemeMatrix::dark()).at(1000.0);
    registry.tick(&mut tree, &dark);
    let dark_text = ThemeMatrix::dark()
        .get(&looks::TEXT_COLOR, &moods::DEFAULT.vector())
        .unwrap();
    assert_eq!(tree.state(parent_color), Some(&dark_text));
    assert!(registry.has_active_animations());
    registry.tick(&mut tree, &dark.at(1000.0 + theme_timing.total_ms()));
    assert_eq!(tree.state(child_color), Some(&dark_text));
    assert!(!registry.has_active_animations());

    // An explicit value on the child detaches it.
    let red = Color::rgb8(255, 0, 0);
    registry
        .get_mut(child_color)
        .unwrap()
        .set_state(&mut tree, red, None, Affinity::Extrinsic);
    registry.tick(&mut tree, &light.at(2000.0));
    assert_eq!(tree.state(child_color), Some(&red));
    assert_eq!(tree.state(parent_color), Some(&light_text));
}

#[test]
fn clearing_an_explicit_value_lets_the_theme_back_in() {
    init_tracing();
    let mut tree = FastenerTree::new();
    let view = tree.insert_root();
    let opacity = tree.insert_fastener(
        view,
        FastenerDescriptor::animator("opacity").default(0.0_f64),
    );
    tree.mount(view);

    let mut animator = ThemeAnimator::new(opacity);
    animator.set_look(Some(looks::OPACITY), Some(Timing::INSTANT));
    let frame = ThemeFrame::new(Some(opacity_theme(0.6)), moods::DEFAULT.vector(), 0.0);
    animator.recohere(&mut tree, &frame, None);
    assert_eq!(animator.value(&tree), Some(&0.6));

    // A user value outranks the theme while it is in force.
    tree.set_state(opacity, 0.2);
    animator.recohere(&mut tree, &frame.at(16.0), None);
    assert_eq!(animator.value(&tree), Some(&0.2));
    assert_eq!(tree.affinity(opacity.id()), Some(Affinity::Extrinsic));

    tree.clear_state(opacity.id());
    assert_eq!(animator.value(&tree), Some(&0.0));
    animator.recohere(&mut tree, &frame.at(32.0), None);
    assert_eq!(animator.value(&tree), Some(&0.6));
    assert_eq!(tree.affinity(opacity.id()), Some(Affinity::Intrinsic));
}
