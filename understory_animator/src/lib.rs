// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Animator: theme-driven animation of fastener state.
//!
//! A [`ThemeAnimator`] pairs a fastener in a
//! [`FastenerTree`](understory_fastener::FastenerTree) with a
//! [`Look`](understory_mood::Look). On every frame it resolves the look
//! against the theme and mood supplied by a [`ThemeContext`], and when the
//! resolved value moves it tweens the fastener toward it with the look's
//! [`Timing`](understory_mood::Timing).
//!
//! ## Phases
//!
//! - [`AnimatorPhase::Idle`]: no look; the fastener behaves like a plain
//!   property and only explicit writes change it.
//! - [`AnimatorPhase::Tracking`]: following a look, at rest.
//! - [`AnimatorPhase::Tweening`]: a [`Tween`] is in progress; the owner has
//!   `UpdateFlags::NEEDS_ANIMATE` raised on every frame until it finishes.
//!
//! An explicit write above `Affinity::Inherited` stops tracking. Theme-driven
//! writes never override such a value.
//!
//! ## Inlets
//!
//! An animator can derive from another animator, its *inlet*. While its own
//! affinity allows inheritance, it adopts the inlet's look (so later theme
//! changes keep flowing), or the inlet's value when the inlet has no look.
//!
//! ## Driving many animators
//!
//! [`AnimatorRegistry`] keeps the animators of a tree and recoheres them all
//! in one [`tick`](AnimatorRegistry::tick).
//!
//! ## Logging
//!
//! Tween start and finish, suppressed writes and look changes are reported
//! through `tracing` at `trace` and `debug` level.

mod animator;
mod context;
mod registry;
mod tween;

pub use animator::{AnimatorPhase, ThemeAnimator};
pub use context::{ThemeContext, ThemeFrame};
pub use registry::AnimatorRegistry;
pub use tween::Tween;
