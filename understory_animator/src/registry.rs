// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A per-tree collection of animators driven together.

use core::any::Any;
use core::fmt;

use hashbrown::HashMap;
use tracing::debug;
use understory_fastener::{Fastener, FastenerId, FastenerTree};
use understory_mood::{Look, LookType};

use crate::animator::ThemeAnimator;
use crate::context::ThemeContext;

trait ErasedAnimator: Any {
    fn fastener_id(&self) -> FastenerId;
    fn inlet_id(&self) -> Option<FastenerId>;
    fn look_name(&self) -> Option<&'static str>;
    fn is_animating(&self) -> bool;
    fn recohere(
        &mut self,
        tree: &mut FastenerTree,
        ctx: &dyn ThemeContext,
        inlet_look: Option<&'static str>,
    ) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: LookType> ErasedAnimator for ThemeAnimator<T> {
    fn fastener_id(&self) -> FastenerId {
        self.fastener().id()
    }

    fn inlet_id(&self) -> Option<FastenerId> {
        self.inlet().map(Fastener::id)
    }

    fn look_name(&self) -> Option<&'static str> {
        self.look().map(|look| look.name())
    }

    fn is_animating(&self) -> bool {
        Self::is_animating(self)
    }

    fn recohere(
        &mut self,
        tree: &mut FastenerTree,
        ctx: &dyn ThemeContext,
        inlet_look: Option<&'static str>,
    ) -> bool {
        // Looks are identified by name, so the inlet's look can be rebuilt at `T`.
        self.recohere_with(tree, ctx, inlet_look.map(Look::new))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Animators keyed by the fastener they drive, ticked together once per frame.
///
/// Animators are recohered in insertion order, so an inlet inserted before
/// the animators deriving from it is resolved first within the same tick.
///
/// # Example
///
/// ```rust
/// use understory_animator::{AnimatorRegistry, ThemeAnimator, ThemeFrame};
/// use understory_fastener::{FastenerDescriptor, FastenerTree};
/// use understory_mood::{ThemeMatrix, Timing, looks, moods};
///
/// let mut tree = FastenerTree::new();
/// let view = tree.insert_root();
/// let color = tree.insert_fastener(
///     view,
///     FastenerDescriptor::animator("textColor").default(understory_mood::Color::BLACK),
/// );
/// tree.mount(view);
///
/// let mut animators = AnimatorRegistry::new();
/// let mut animator = ThemeAnimator::new(color);
/// animator.set_look(Some(looks::TEXT_COLOR), Some(Timing::linear(200.0)));
/// animators.insert(animator);
///
/// let frame = ThemeFrame::new(Some(ThemeMatrix::dark()), moods::DEFAULT.vector(), 0.0);
/// assert!(animators.tick(&mut tree, &frame));
/// assert!(!animators.tick(&mut tree, &frame.at(200.0)));
/// assert_eq!(
///     tree.state(color),
///     ThemeMatrix::dark().get(&looks::TEXT_COLOR, &moods::DEFAULT.vector()).as_ref()
/// );
/// ```
#[derive(Default)]
pub struct AnimatorRegistry {
    animators: Vec<Box<dyn ErasedAnimator>>,
    index: HashMap<FastenerId, usize>,
}

impl fmt::Debug for AnimatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatorRegistry")
            .field("animators", &self.animators.len())
            .field("active", &self.active_count())
            .finish_non_exhaustive()
    }
}

impl AnimatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of animators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.animators.len()
    }

    /// Returns `true` if there are no animators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }

    /// Adds an animator, replacing (in place) any animator for the same fastener.
    ///
    /// Returns `true` if an animator was replaced.
    pub fn insert<T: LookType>(&mut self, animator: ThemeAnimator<T>) -> bool {
        let id = animator.fastener().id();
        match self.index.get(&id) {
            Some(&i) => {
                self.animators[i] = Box::new(animator);
                true
            }
            None => {
                self.index.insert(id, self.animators.len());
                self.animators.push(Box::new(animator));
                false
            }
        }
    }

    /// Returns the animator driving `fastener`.
    #[must_use]
    pub fn get<T: LookType>(&self, fastener: Fastener<T>) -> Option<&ThemeAnimator<T>> {
        let i = *self.index.get(&fastener.id())?;
        self.animators[i].as_any().downcast_ref()
    }

    /// Returns the animator driving `fastener`, mutably.
    #[must_use]
    pub fn get_mut<T: LookType>(&mut self, fastener: Fastener<T>) -> Option<&mut ThemeAnimator<T>> {
        let i = *self.index.get(&fastener.id())?;
        self.animators[i].as_any_mut().downcast_mut()
    }

    /// Removes the animator driving `fastener`.
    ///
    /// Returns `true` if one was removed.
    pub fn remove(&mut self, fastener: FastenerId) -> bool {
        let Some(i) = self.index.remove(&fastener) else {
            return false;
        };
        self.animators.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        true
    }

    /// Recoheres every animator against `ctx`.
    ///
    /// Animators whose fastener no longer exists in `tree` are dropped.
    /// Returns `true` if any animation is still running afterwards.
    pub fn tick(&mut self, tree: &mut FastenerTree, ctx: &dyn ThemeContext) -> bool {
        let stale: Vec<FastenerId> = self
            .animators
            .iter()
            .map(|a| a.fastener_id())
            .filter(|&id| !tree.contains(id))
            .collect();
        for id in stale {
            debug!(fastener = %id, "dropping animator of a removed fastener");
            self.remove(id);
        }

        let mut active = false;
        for i in 0..self.animators.len() {
            let inlet_look = self.animators[i]
                .inlet_id()
                .and_then(|inlet| self.index.get(&inlet))
                .and_then(|&j| self.animators[j].look_name());
            active |= self.animators[i].recohere(tree, ctx, inlet_look);
        }
        active
    }

    /// Returns `true` if any animator is tweening.
    #[must_use]
    pub fn has_active_animations(&self) -> bool {
        self.animators.iter().any(|a| a.is_animating())
    }

    fn active_count(&self) -> usize {
        self.animators.iter().filter(|a| a.is_animating()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ThemeFrame;
    use understory_fastener::{Affinity, FastenerDescriptor, OwnerId};
    use understory_mood::{ThemeMatrix, Timing, feels, looks, moods};

    fn tree_with(names: &[&'static str]) -> (FastenerTree, OwnerId, Vec<Fastener<f64>>) {
        let mut tree = FastenerTree::new();
        let view = tree.insert_root();
        let fasteners = names
            .iter()
            .map(|&name| {
                tree.insert_fastener(view, FastenerDescriptor::animator(name).default(0.0_f64))
            })
            .collect();
        tree.mount(view);
        (tree, view, fasteners)
    }

    fn frame(time: f64) -> ThemeFrame {
        let theme = ThemeMatrix::builder()
            .set(looks::OPACITY, feels::DEFAULT, 0.8)
            .build();
        ThemeFrame::new(Some(theme), moods::DEFAULT.vector(), time)
    }

    #[test]
    fn insert_replaces_in_place() {
        let (_, _, f) = tree_with(&["a", "b"]);
        let mut registry = AnimatorRegistry::new();
        assert!(!registry.insert(ThemeAnimator::new(f[0])));
        assert!(!registry.insert(ThemeAnimator::new(f[1])));
        let mut replacement = ThemeAnimator::new(f[0]);
        replacement.set_look(Some(looks::OPACITY), None);
        assert!(registry.insert(replacement));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(f[0]).and_then(ThemeAnimator::look), Some(looks::OPACITY));
    }

    #[test]
    fn get_checks_the_value_type() {
        let (_, _, f) = tree_with(&["a"]);
        let mut registry = AnimatorRegistry::new();
        registry.insert(ThemeAnimator::new(f[0]));
        let wrong: Fastener<understory_mood::Length> = Fastener::from_id(f[0].id());
        assert!(registry.get(wrong).is_none());
        assert!(registry.get_mut(f[0]).is_some());
    }

    #[test]
    fn remove_keeps_the_index_consistent() {
        let (_, _, f) = tree_with(&["a", "b", "c"]);
        let mut registry = AnimatorRegistry::new();
        for &fastener in &f {
            registry.insert(ThemeAnimator::new(fastener));
        }
        assert!(registry.remove(f[0].id()));
        assert!(!registry.remove(f[0].id()));
        assert_eq!(registry.get(f[2]).map(ThemeAnimator::fastener), Some(f[2]));
        assert_eq!(registry.get(f[1]).map(ThemeAnimator::fastener), Some(f[1]));
    }

    #[test]
    fn inlets_pass_their_look_down() {
        let (mut tree, _, f) = tree_with(&["source", "derived"]);
        let mut registry = AnimatorRegistry::new();

        let mut source = ThemeAnimator::new(f[0]);
        source.set_look(Some(looks::OPACITY), Some(Timing::INSTANT));
        registry.insert(source);

        let mut derived = ThemeAnimator::new(f[1]);
        derived.set_inlet(Some(f[0]));
        registry.insert(derived);

        registry.tick(&mut tree, &frame(0.0));
        assert_eq!(registry.get(f[1]).and_then(ThemeAnimator::look), Some(looks::OPACITY));
        assert_eq!(tree.state(f[1]), Some(&0.8));
    }

    #[test]
    fn inlets_without_a_look_pass_their_value() {
        let (mut tree, _, f) = tree_with(&["source", "derived"]);
        let mut registry = AnimatorRegistry::new();
        registry.insert(ThemeAnimator::new(f[0]));
        let mut derived = ThemeAnimator::new(f[1]);
        derived.set_inlet(Some(f[0]));
        registry.insert(derived);

        tree.set_state_with(f[0], 0.3, Affinity::Inherited);
        registry.tick(&mut tree, &frame(0.0));
        assert_eq!(tree.state(f[1]), Some(&0.3));
        assert_eq!(tree.affinity(f[1].id()), Some(Affinity::Inherited));
    }

    #[test]
    fn overridden_animators_ignore_their_inlet() {
        let (mut tree, _, f) = tree_with(&["source", "derived"]);
        let mut registry = AnimatorRegistry::new();
        let mut source = ThemeAnimator::new(f[0]);
        source.set_look(Some(looks::OPACITY), None);
        registry.insert(source);
        let mut derived = ThemeAnimator::new(f[1]);
        derived.set_inlet(Some(f[0]));
        registry.insert(derived);

        tree.set_state(f[1], 0.1);
        registry.tick(&mut tree, &frame(0.0));
        assert_eq!(registry.get(f[1]).and_then(ThemeAnimator::look), None);
        assert_eq!(tree.state(f[1]), Some(&0.1));
    }

    #[test]
    fn tick_drops_animators_of_removed_owners() {
        let (mut tree, view, f) = tree_with(&["a"]);
        let mut registry = AnimatorRegistry::new();
        registry.insert(ThemeAnimator::new(f[0]));
        tree.remove_owner(view);
        assert!(!registry.tick(&mut tree, &frame(0.0)));
        assert!(registry.is_empty());
    }
}
