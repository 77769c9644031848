// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animators that drive a fastener toward a theme-resolved look.

use tracing::{debug, trace};
use understory_fastener::{Affinity, Fastener, FastenerTree, UpdateFlags};
use understory_mood::{Look, LookType, Timing};

use crate::context::ThemeContext;
use crate::tween::Tween;

/// Where a [`ThemeAnimator`] is in its cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimatorPhase {
    /// No look; the fastener behaves like a plain property.
    Idle,
    /// Following a look, at rest on its last resolved value.
    Tracking,
    /// A tween is in progress.
    Tweening,
}

/// Drives a fastener's state toward the value of a [`Look`] in the current theme.
///
/// The animator does not own the state: the value lives in the
/// [`FastenerTree`], and the animator writes interpolated values into it as
/// time advances. Theme-driven writes go through the tree's affinity check, so
/// an explicit write made directly on the tree is never overwritten by a theme.
///
/// A typical frame calls [`recohere`](Self::recohere), which resolves the look,
/// starts a tween if the target moved, and advances the tween to the frame's
/// time. Calling [`set_look`](Self::set_look) or [`set_state`](Self::set_state)
/// mid-tween re-seeds the tween from the current interpolated value.
///
/// # Example
///
/// ```rust
/// use understory_animator::{AnimatorPhase, ThemeAnimator, ThemeFrame};
/// use understory_fastener::{FastenerDescriptor, FastenerTree};
/// use understory_mood::{ThemeMatrix, Timing, feels, looks, moods};
///
/// let mut tree = FastenerTree::new();
/// let view = tree.insert_root();
/// let opacity = tree.insert_fastener(view, FastenerDescriptor::animator("opacity").default(0.0_f64));
/// tree.mount(view);
///
/// let mut animator = ThemeAnimator::new(opacity);
/// animator.set_look(Some(looks::OPACITY), Some(Timing::linear(100.0)));
/// assert_eq!(animator.phase(), AnimatorPhase::Tracking);
///
/// let theme = ThemeMatrix::builder().set(looks::OPACITY, feels::DEFAULT, 1.0).build();
/// let frame = ThemeFrame::new(Some(theme), moods::DEFAULT.vector(), 0.0);
/// animator.recohere(&mut tree, &frame, None);
/// assert_eq!(animator.phase(), AnimatorPhase::Tweening);
///
/// animator.recohere(&mut tree, &frame.at(50.0), None);
/// assert_eq!(animator.value(&tree), Some(&0.5));
///
/// animator.recohere(&mut tree, &frame.at(100.0), None);
/// assert_eq!(animator.value(&tree), Some(&1.0));
/// assert_eq!(animator.phase(), AnimatorPhase::Tracking);
/// ```
#[derive(Debug)]
pub struct ThemeAnimator<T> {
    fastener: Fastener<T>,
    look: Option<Look<T>>,
    timing: Option<Timing>,
    tween: Option<Tween<T>>,
    tween_affinity: Affinity,
    target: Option<T>,
    inlet: Option<Fastener<T>>,
    now: f64,
}

impl<T: LookType> ThemeAnimator<T> {
    /// Creates an idle animator for `fastener`.
    #[must_use]
    pub fn new(fastener: Fastener<T>) -> Self {
        Self {
            fastener,
            look: None,
            timing: None,
            tween: None,
            tween_affinity: Affinity::Intrinsic,
            target: None,
            inlet: None,
            now: 0.0,
        }
    }

    /// The fastener this animator drives.
    #[must_use]
    #[inline]
    pub fn fastener(&self) -> Fastener<T> {
        self.fastener
    }

    /// The look being tracked.
    #[must_use]
    #[inline]
    pub fn look(&self) -> Option<Look<T>> {
        self.look
    }

    /// The timing used when the tracked look changes value.
    #[must_use]
    #[inline]
    pub fn timing(&self) -> Option<Timing> {
        self.timing
    }

    /// The animator this one derives from.
    #[must_use]
    #[inline]
    pub fn inlet(&self) -> Option<Fastener<T>> {
        self.inlet
    }

    /// The tween in progress.
    #[must_use]
    pub fn tween(&self) -> Option<&Tween<T>> {
        self.tween.as_ref()
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self) -> AnimatorPhase {
        if self.tween.is_some() {
            AnimatorPhase::Tweening
        } else if self.look.is_some() {
            AnimatorPhase::Tracking
        } else {
            AnimatorPhase::Idle
        }
    }

    /// Returns `true` while a tween is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// The current value of the fastener.
    #[must_use]
    pub fn value<'a>(&self, tree: &'a FastenerTree) -> Option<&'a T> {
        tree.state(self.fastener)
    }

    /// Starts or stops tracking a look.
    ///
    /// `timing` is used for transitions when the look's value changes; when
    /// `None`, the context's `TIMING` look is used instead. The new look takes
    /// effect on the next [`apply_theme`](Self::apply_theme). Clearing the
    /// look returns the animator to [`AnimatorPhase::Idle`] once any running
    /// tween has finished.
    pub fn set_look(&mut self, look: Option<Look<T>>, timing: Option<Timing>) {
        if self.look != look {
            trace!(
                look = look.map(|l| l.name()),
                previous = self.look.map(|l| l.name()),
                "animator look changed"
            );
            self.target = None;
        }
        self.look = look;
        self.timing = timing;
    }

    /// Derives the look (or, without one, the value) from another animator.
    ///
    /// Derivation applies on [`recohere`](Self::recohere) while this
    /// animator's affinity is at most [`Affinity::Inherited`] and the inlet's
    /// affinity is at least this one's.
    pub fn set_inlet(&mut self, inlet: Option<Fastener<T>>) {
        self.inlet = inlet;
    }

    /// Writes `value` explicitly.
    ///
    /// With a non-instant `timing`, the fastener tweens from its current value
    /// toward `value`. A write above [`Affinity::Inherited`] stops tracking
    /// the look. Returns `false` if a higher-affinity value is in force.
    pub fn set_state(
        &mut self,
        tree: &mut FastenerTree,
        value: T,
        timing: Option<Timing>,
        affinity: Affinity,
    ) -> bool {
        let id = self.fastener.id();
        if !tree.affinity(id).is_some_and(|current| current.admits(affinity)) {
            debug!(fastener = %id, %affinity, "animator write suppressed");
            return false;
        }
        if !affinity.is_inheritable() && self.look.take().is_some() {
            trace!(fastener = %id, "explicit write dropped the look");
        }
        self.target = Some(value.clone());
        match timing.filter(|t| t.total_ms() > 0.0) {
            Some(timing) => {
                // Pin the floor now so automatic writers back off mid-tween.
                tree.set_affinity(id, affinity);
                self.start_tween(tree, value, timing, affinity);
                true
            }
            None => {
                self.tween = None;
                tree.set_state_with(self.fastener, value, affinity)
            }
        }
    }

    /// Resolves the look against `ctx` and starts a tween if its value moved,
    /// or if the fastener no longer holds it.
    ///
    /// Does nothing when the animator is idle, when `ctx` has no theme, when
    /// the look resolves to nothing under the current mood, or when a value
    /// above [`Affinity::Inherited`] is in force. `timing` overrides the
    /// animator's own timing for this transition. Returns `true` if a new
    /// target was taken.
    pub fn apply_theme(
        &mut self,
        tree: &mut FastenerTree,
        ctx: &dyn ThemeContext,
        timing: Option<Timing>,
    ) -> bool {
        let Some(look) = self.look else {
            return false;
        };
        self.now = ctx.time();
        let Some(theme) = ctx.theme() else {
            trace!(look = look.name(), "no theme in context");
            return false;
        };
        let Some(affinity) = tree.affinity(self.fastener.id()) else {
            return false;
        };
        if !affinity.is_inheritable() {
            debug!(look = look.name(), %affinity, "theme write suppressed");
            return false;
        }
        let Some(target) = theme.get(&look, ctx.mood()) else {
            return false;
        };
        // Another writer may have taken the slot since the target was cached.
        let holds_target = self.tween.is_some() || tree.state(self.fastener) == Some(&target);
        if holds_target && self.target.as_ref() == Some(&target) {
            return false;
        }
        self.target = Some(target.clone());
        let timing = timing
            .or(self.timing)
            .or_else(|| ctx.timing())
            .unwrap_or(Timing::INSTANT);
        if timing.total_ms() > 0.0 && tree.state(self.fastener).is_some() {
            self.start_tween(tree, target, timing, affinity);
        } else {
            self.tween = None;
            tree.set_state_with(self.fastener, target, affinity);
        }
        true
    }

    /// Advances the tween to `time`, writing the interpolated value.
    ///
    /// Returns `true` while the tween is still running. A tween whose write is
    /// refused, because a higher-affinity value was written in the meantime,
    /// is cancelled.
    pub fn animate(&mut self, tree: &mut FastenerTree, time: f64) -> bool {
        self.now = time;
        let Some(tween) = &self.tween else {
            return false;
        };
        let (value, done) = tween.sample(time);
        if !tree.set_state_with(self.fastener, value, self.tween_affinity) {
            debug!(fastener = %self.fastener.id(), "tween cancelled by a higher-affinity write");
            self.tween = None;
            self.target = None;
            return false;
        }
        if done {
            trace!(fastener = %self.fastener.id(), "tween finished");
            self.tween = None;
            return false;
        }
        self.require_animate(tree);
        true
    }

    /// Runs one frame: inlet derivation, then [`apply_theme`](Self::apply_theme),
    /// then [`animate`](Self::animate) to the context's time.
    ///
    /// `inlet` is the animator registered with [`set_inlet`](Self::set_inlet),
    /// if the caller holds it.
    pub fn recohere(
        &mut self,
        tree: &mut FastenerTree,
        ctx: &dyn ThemeContext,
        inlet: Option<&Self>,
    ) -> bool {
        self.recohere_with(tree, ctx, inlet.and_then(Self::look))
    }

    pub(crate) fn recohere_with(
        &mut self,
        tree: &mut FastenerTree,
        ctx: &dyn ThemeContext,
        inlet_look: Option<Look<T>>,
    ) -> bool {
        self.derive(tree, inlet_look);
        self.apply_theme(tree, ctx, None);
        self.animate(tree, ctx.time())
    }

    fn derive(&mut self, tree: &mut FastenerTree, inlet_look: Option<Look<T>>) {
        let Some(inlet) = self.inlet else {
            return;
        };
        let (Some(own), Some(theirs)) = (
            tree.affinity(self.fastener.id()),
            tree.affinity(inlet.id()),
        ) else {
            return;
        };
        if !own.is_inheritable() || theirs < own {
            return;
        }
        if let Some(look) = inlet_look {
            if self.look != Some(look) {
                debug!(look = look.name(), fastener = %self.fastener.id(), "adopting inlet look");
                self.set_look(Some(look), self.timing);
            }
            return;
        }
        let Some(value) = tree.state(inlet).cloned() else {
            return;
        };
        if tree.state(self.fastener) != Some(&value) {
            self.look = None;
            self.tween = None;
            self.target = Some(value.clone());
            tree.set_state_with(self.fastener, value, Affinity::Inherited);
        }
    }

    fn start_tween(&mut self, tree: &mut FastenerTree, to: T, timing: Timing, affinity: Affinity) {
        let Some(from) = tree.state(self.fastener).cloned() else {
            tree.set_state_with(self.fastener, to, affinity);
            return;
        };
        trace!(
            fastener = %self.fastener.id(),
            ?from,
            ?to,
            duration_ms = timing.duration_ms(),
            "tween started"
        );
        self.tween = Some(Tween::new(from, to, self.now, timing));
        self.tween_affinity = affinity;
        self.require_animate(tree);
    }

    fn require_animate(&self, tree: &mut FastenerTree) {
        if let Some(owner) = tree.owner_of(self.fastener.id()) {
            tree.require_update(owner, UpdateFlags::NEEDS_ANIMATE);
        }
    }
}
