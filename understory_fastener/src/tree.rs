// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owner tree and the fastener state machine.
//!
//! [`FastenerTree`] owns every owner node and every fastener. Owners form a
//! parent/child hierarchy; fasteners belong to exactly one owner and link to
//! each other through non-owning super/sub edges that the tree keeps
//! symmetric.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::affinity::Affinity;
use crate::arena::Arena;
use crate::descriptor::{ErasedDescriptor, FastenerDescriptor, FastenerKind, Inherit, OwnerClass};
use crate::error::FastenerError;
use crate::event::{FastenerEvent, FastenerPhase, ListenerId};
use crate::flags::{FastenerFlags, UpdateFlags};
use crate::id::{Fastener, FastenerId, OwnerId};
use crate::value::{ErasedValue, StateValue};

type Listener = Box<dyn FnMut(&FastenerEvent<'_>)>;

struct OwnerNode {
    parent: Option<OwnerId>,
    children: Vec<OwnerId>,
    mounted: bool,
    class: Option<&'static str>,
    fasteners: SmallVec<[FastenerId; 4]>,
    declared: Vec<Rc<dyn ErasedDescriptor>>,
}

struct FastenerSlot {
    owner: OwnerId,
    descriptor: Rc<dyn ErasedDescriptor>,
    inherit: Inherit,
    own_state: Option<ErasedValue>,
    default_state: Option<ErasedValue>,
    super_fastener: Option<FastenerId>,
    sub_fasteners: SmallVec<[FastenerId; 4]>,
    flags: FastenerFlags,
    affinity: Affinity,
}

impl FastenerSlot {
    fn super_name(&self) -> Option<&'static str> {
        self.inherit.super_name(self.descriptor.name())
    }

    /// Inherits only while enabled, without a local value, and not pinned above `Inherited`.
    fn wants_inheritance(&self) -> bool {
        self.inherit.is_enabled() && self.own_state.is_none() && self.affinity.is_inheritable()
    }
}

/// Arena of owners and their fasteners.
///
/// # Example
///
/// ```rust
/// use understory_fastener::{FastenerDescriptor, FastenerTree};
///
/// let mut tree = FastenerTree::new();
/// let root = tree.insert_root();
/// let leaf = tree.insert_child(root);
///
/// let root_color = tree.insert_fastener(root, FastenerDescriptor::property("color").default(0_u32));
/// let leaf_color = tree.insert_fastener(
///     leaf,
///     FastenerDescriptor::property("color").default(0_u32).inherit(true),
/// );
///
/// tree.mount(root);
/// tree.set_state(root_color, 0xFF0000);
///
/// assert_eq!(tree.state(leaf_color), Some(&0xFF0000));
/// assert_eq!(tree.super_fastener(leaf_color.id()), Some(root_color.id()));
/// ```
#[derive(Default)]
pub struct FastenerTree {
    owners: Arena<OwnerNode>,
    fasteners: Arena<FastenerSlot>,
    pending: HashMap<OwnerId, UpdateFlags>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u32,
}

impl fmt::Debug for FastenerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastenerTree")
            .field("owners", &self.owners.len())
            .field("fasteners", &self.fasteners.len())
            .field("pending", &self.pending.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FastenerTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Owners
    // =========================================================================

    fn node(&self, owner: OwnerId) -> Option<&OwnerNode> {
        self.owners.get(owner.idx(), owner.generation())
    }

    fn node_mut(&mut self, owner: OwnerId) -> Option<&mut OwnerNode> {
        self.owners.get_mut(owner.idx(), owner.generation())
    }

    fn live_node(&self, owner: OwnerId) -> &OwnerNode {
        match self.node(owner) {
            Some(node) => node,
            None => panic!("{owner:?} is not a live owner"),
        }
    }

    fn insert_owner(&mut self, parent: Option<OwnerId>, class: Option<&OwnerClass>) -> OwnerId {
        if let Some(parent) = parent {
            self.live_node(parent);
        }
        let (idx, generation) = self.owners.insert(OwnerNode {
            parent,
            children: Vec::new(),
            mounted: false,
            class: class.map(OwnerClass::name),
            fasteners: SmallVec::new(),
            declared: class
                .map(|c| c.declarations().to_vec())
                .unwrap_or_default(),
        });
        let id = OwnerId::new(idx, generation);
        if let Some(parent) = parent
            && let Some(node) = self.node_mut(parent)
        {
            node.children.push(id);
        }
        id
    }

    /// Inserts a parentless owner.
    pub fn insert_root(&mut self) -> OwnerId {
        self.insert_owner(None, None)
    }

    /// Inserts a parentless owner whose fasteners are declared by `class`.
    pub fn insert_root_with(&mut self, class: &OwnerClass) -> OwnerId {
        self.insert_owner(None, Some(class))
    }

    /// Inserts an owner under `parent`.
    ///
    /// The new owner starts unmounted, even if `parent` is mounted.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a live owner.
    pub fn insert_child(&mut self, parent: OwnerId) -> OwnerId {
        self.insert_owner(Some(parent), None)
    }

    /// Inserts an owner of `class` under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a live owner.
    pub fn insert_child_with(&mut self, parent: OwnerId, class: &OwnerClass) -> OwnerId {
        self.insert_owner(Some(parent), Some(class))
    }

    /// Removes `owner` and its whole subtree, including all their fasteners.
    ///
    /// Returns `false` if `owner` was already stale.
    pub fn remove_owner(&mut self, owner: OwnerId) -> bool {
        if self.node(owner).is_none() {
            return false;
        }
        self.unmount(owner);
        self.remove_subtree(owner);
        true
    }

    fn remove_subtree(&mut self, owner: OwnerId) {
        let Some(node) = self.node(owner) else {
            return;
        };
        let children = node.children.clone();
        let fasteners = node.fasteners.clone();
        let parent = node.parent;
        for child in children {
            self.remove_subtree(child);
        }
        for fastener in fasteners {
            self.remove_fastener(fastener);
        }
        if let Some(parent) = parent
            && let Some(parent_node) = self.node_mut(parent)
        {
            parent_node.children.retain(|c| *c != owner);
        }
        self.pending.remove(&owner);
        self.owners.remove(owner.idx(), owner.generation());
        trace!(%owner, "removed owner");
    }

    /// Returns `true` if `owner` refers to a live owner.
    #[must_use]
    pub fn is_alive(&self, owner: OwnerId) -> bool {
        self.node(owner).is_some()
    }

    /// Returns the parent of `owner`, if any.
    #[must_use]
    pub fn parent(&self, owner: OwnerId) -> Option<OwnerId> {
        self.node(owner).and_then(|n| n.parent)
    }

    /// Returns the children of `owner` in insertion order.
    #[must_use]
    pub fn children(&self, owner: OwnerId) -> &[OwnerId] {
        self.node(owner).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Returns the class name `owner` was created with.
    #[must_use]
    pub fn class_name(&self, owner: OwnerId) -> Option<&'static str> {
        self.node(owner).and_then(|n| n.class)
    }

    /// Returns `true` if `owner` is mounted.
    #[must_use]
    pub fn is_mounted(&self, owner: OwnerId) -> bool {
        self.node(owner).is_some_and(|n| n.mounted)
    }

    /// Mounts `owner` and its subtree, parents first.
    ///
    /// Every instantiated fastener binds its super-fastener. Mounting an
    /// already mounted owner is a no-op for that owner.
    pub fn mount(&mut self, owner: OwnerId) {
        let Some(node) = self.node_mut(owner) else {
            return;
        };
        let newly_mounted = !node.mounted;
        node.mounted = true;
        let fasteners = node.fasteners.clone();
        let children = node.children.clone();
        if newly_mounted {
            trace!(%owner, "mount");
        }
        for fastener in fasteners {
            self.mount_slot(fastener);
        }
        for child in children {
            self.mount(child);
        }
    }

    /// Unmounts `owner` and its subtree, children first.
    pub fn unmount(&mut self, owner: OwnerId) {
        let Some(node) = self.node(owner) else {
            return;
        };
        let fasteners = node.fasteners.clone();
        let children = node.children.clone();
        for child in children {
            self.unmount(child);
        }
        for fastener in fasteners {
            self.unmount_fastener(fastener);
        }
        if let Some(node) = self.node_mut(owner)
            && node.mounted
        {
            node.mounted = false;
            trace!(%owner, "unmount");
        }
    }

    // =========================================================================
    // Fastener lookup and creation
    // =========================================================================

    fn slot(&self, id: FastenerId) -> Option<&FastenerSlot> {
        self.fasteners.get(id.idx(), id.generation())
    }

    fn slot_mut(&mut self, id: FastenerId) -> Option<&mut FastenerSlot> {
        self.fasteners.get_mut(id.idx(), id.generation())
    }

    /// Declares a fastener on `owner` without instantiating it.
    ///
    /// The fastener is created on first [`get_lazy_fastener`](Self::get_lazy_fastener).
    ///
    /// # Panics
    ///
    /// Panics if `owner` is not a live owner.
    pub fn declare<T: StateValue>(&mut self, owner: OwnerId, descriptor: FastenerDescriptor<T>) {
        self.live_node(owner);
        if let Some(node) = self.node_mut(owner) {
            node.declared.retain(|d| d.name() != descriptor.name());
            node.declared.push(Rc::new(descriptor));
        }
    }

    /// Instantiates a fastener on `owner`, binding it at once if `owner` is mounted.
    ///
    /// # Panics
    ///
    /// Panics if `owner` is not a live owner, or already has a fastener with
    /// the descriptor's name.
    pub fn insert_fastener<T: StateValue>(
        &mut self,
        owner: OwnerId,
        descriptor: FastenerDescriptor<T>,
    ) -> Fastener<T> {
        let id = self.instantiate(owner, Rc::new(descriptor));
        Fastener::from_id(id)
    }

    fn instantiate(&mut self, owner: OwnerId, descriptor: Rc<dyn ErasedDescriptor>) -> FastenerId {
        let name = descriptor.name();
        assert!(
            self.get_fastener(owner, name).is_none(),
            "Fastener '{name}' is already present on {owner:?}"
        );
        let inherit = descriptor.inherits();
        let mut flags = FastenerFlags::empty();
        if inherit.is_enabled() {
            flags |= FastenerFlags::INHERITED;
        }
        let (idx, generation) = self.fasteners.insert(FastenerSlot {
            owner,
            default_state: descriptor.default_erased(),
            descriptor,
            inherit,
            own_state: None,
            super_fastener: None,
            sub_fasteners: SmallVec::new(),
            flags,
            affinity: Affinity::Intrinsic,
        });
        let id = FastenerId::new(idx, generation);
        let mounted = match self.node_mut(owner) {
            Some(node) => {
                node.fasteners.push(id);
                node.mounted
            }
            None => panic!("{owner:?} is not a live owner"),
        };
        trace!(%owner, fastener = %id, name, "instantiated fastener");
        if mounted {
            self.mount_fastener(id);
        }
        id
    }

    fn remove_fastener(&mut self, id: FastenerId) {
        self.unmount_fastener(id);
        if let Some(slot) = self.fasteners.remove(id.idx(), id.generation())
            && let Some(node) = self.node_mut(slot.owner)
        {
            node.fasteners.retain(|f| *f != id);
        }
    }

    /// Returns the instantiated fastener named `name` on `owner`.
    #[must_use]
    pub fn get_fastener(&self, owner: OwnerId, name: &str) -> Option<FastenerId> {
        self.node(owner)?
            .fasteners
            .iter()
            .copied()
            .find(|f| self.slot(*f).is_some_and(|s| s.descriptor.name() == name))
    }

    /// Returns the fastener named `name` on `owner`, instantiating it from a
    /// declaration if it has not been created yet.
    pub fn get_lazy_fastener(&mut self, owner: OwnerId, name: &str) -> Option<FastenerId> {
        if let Some(id) = self.get_fastener(owner, name) {
            return Some(id);
        }
        let descriptor = self
            .node(owner)?
            .declared
            .iter()
            .find(|d| d.name() == name)
            .cloned()?;
        Some(self.instantiate(owner, descriptor))
    }

    /// Typed lookup of a (possibly lazily declared) fastener.
    ///
    /// Returns `None` if no such fastener exists or its value type is not `T`.
    pub fn fastener<T: StateValue>(&mut self, owner: OwnerId, name: &str) -> Option<Fastener<T>> {
        let id = self.get_lazy_fastener(owner, name)?;
        let slot = self.slot(id)?;
        (slot.descriptor.value_type() == core::any::TypeId::of::<T>())
            .then(|| Fastener::from_id(id))
    }

    /// Returns the instantiated fasteners of `owner`.
    #[must_use]
    pub fn fasteners(&self, owner: OwnerId) -> &[FastenerId] {
        self.node(owner).map(|n| n.fasteners.as_slice()).unwrap_or(&[])
    }

    // =========================================================================
    // Fastener metadata
    // =========================================================================

    /// Returns `true` if `id` refers to a live fastener.
    #[must_use]
    pub fn contains(&self, id: FastenerId) -> bool {
        self.slot(id).is_some()
    }

    /// Returns the fastener's name.
    #[must_use]
    pub fn name(&self, id: FastenerId) -> Option<&'static str> {
        self.slot(id).map(|s| s.descriptor.name())
    }

    /// Returns the fastener's kind.
    #[must_use]
    pub fn kind(&self, id: FastenerId) -> Option<FastenerKind> {
        self.slot(id).map(|s| s.descriptor.kind())
    }

    /// Returns the owner of the fastener.
    #[must_use]
    pub fn owner_of(&self, id: FastenerId) -> Option<OwnerId> {
        self.slot(id).map(|s| s.owner)
    }

    /// Returns the fastener's inheritance descriptor.
    #[must_use]
    pub fn inherit(&self, id: FastenerId) -> Option<Inherit> {
        self.slot(id).map(|s| s.inherit)
    }

    /// Returns the bound super-fastener, if any.
    #[must_use]
    pub fn super_fastener(&self, id: FastenerId) -> Option<FastenerId> {
        self.slot(id).and_then(|s| s.super_fastener)
    }

    /// Returns the fasteners currently bound to this one as their super-fastener.
    #[must_use]
    pub fn sub_fasteners(&self, id: FastenerId) -> &[FastenerId] {
        self.slot(id)
            .map(|s| s.sub_fasteners.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the affinity of the last accepted write.
    #[must_use]
    pub fn affinity(&self, id: FastenerId) -> Option<Affinity> {
        self.slot(id).map(|s| s.affinity)
    }

    /// Returns the fastener's status flags.
    #[must_use]
    pub fn flags(&self, id: FastenerId) -> FastenerFlags {
        self.slot(id).map(|s| s.flags).unwrap_or_default()
    }

    /// Returns `true` if the state is currently sourced from the super-fastener.
    #[must_use]
    pub fn is_inherited(&self, id: FastenerId) -> bool {
        self.slot(id).is_some_and(|s| {
            s.flags.contains(FastenerFlags::INHERITED)
                && s.own_state.is_none()
                && s.super_fastener.is_some()
        })
    }

    /// Returns and clears the fastener's `UPDATED` flag.
    pub fn take_updated(&mut self, id: FastenerId) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                let updated = slot.flags.contains(FastenerFlags::UPDATED);
                slot.flags.remove(FastenerFlags::UPDATED);
                updated
            }
            None => false,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the resolved state: local value, else inherited, else default.
    #[must_use]
    pub fn state_erased(&self, id: FastenerId) -> Option<&ErasedValue> {
        let slot = self.slot(id)?;
        if let Some(value) = &slot.own_state {
            return Some(value);
        }
        if slot.flags.contains(FastenerFlags::INHERITED)
            && let Some(super_fastener) = slot.super_fastener
            && let Some(value) = self.state_erased(super_fastener)
        {
            return Some(value);
        }
        slot.default_state.as_ref()
    }

    /// Returns the resolved state, or `None` if none is available.
    #[must_use]
    pub fn state<T: StateValue>(&self, fastener: Fastener<T>) -> Option<&T> {
        self.state_erased(fastener.id())
            .and_then(ErasedValue::downcast_ref)
    }

    /// Returns the resolved state, failing if none is available.
    pub fn get_state<T: StateValue>(&self, fastener: Fastener<T>) -> Result<&T, FastenerError> {
        let id = fastener.id();
        let slot = self.slot(id).ok_or(FastenerError::StaleFastener(id))?;
        let name = slot.descriptor.name();
        let value = self
            .state_erased(id)
            .ok_or(FastenerError::MissingState { id, name })?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| FastenerError::TypeMismatch {
                id,
                name,
                stored: slot.descriptor.value_type_name(),
                requested: core::any::type_name::<T>(),
            })
    }

    /// Returns the resolved state, or `fallback` if none is available.
    #[must_use]
    pub fn get_state_or<T: StateValue>(&self, fastener: Fastener<T>, fallback: T) -> T {
        self.state(fastener).cloned().unwrap_or(fallback)
    }

    /// Returns the local value, ignoring inheritance and defaults.
    #[must_use]
    pub fn own_state<T: StateValue>(&self, fastener: Fastener<T>) -> Option<&T> {
        self.slot(fastener.id())
            .and_then(|s| s.own_state.as_ref())
            .and_then(ErasedValue::downcast_ref)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Sets the local value unconditionally.
    ///
    /// Marks the fastener overridden, stops inheritance, and raises its
    /// affinity to at least [`Affinity::Extrinsic`]. Returns `false` only when
    /// the handle is stale.
    pub fn set_state<T: StateValue>(&mut self, fastener: Fastener<T>, value: T) -> bool {
        let id = fastener.id();
        let affinity = self
            .affinity(id)
            .map_or(Affinity::Extrinsic, |a| a.max(Affinity::Extrinsic));
        self.write(id, ErasedValue::new(value), affinity, false)
    }

    /// Sets the local value at `affinity`, unless a strictly higher-affinity
    /// write is in force.
    ///
    /// Returns `true` if the write was accepted.
    pub fn set_state_with<T: StateValue>(
        &mut self,
        fastener: Fastener<T>,
        value: T,
        affinity: Affinity,
    ) -> bool {
        self.write(fastener.id(), ErasedValue::new(value), affinity, true)
    }

    /// Sets the local value at [`Affinity::Intrinsic`], deferring to any
    /// higher-affinity value already in force.
    ///
    /// Returns `true` if the write was accepted.
    pub fn set_auto_state<T: StateValue>(&mut self, fastener: Fastener<T>, value: T) -> bool {
        self.set_state_with(fastener, value, Affinity::Intrinsic)
    }

    /// Writes `value` at the origin of the inheritance chain.
    ///
    /// While the fastener inherits and has no local value, the write is
    /// forwarded to its super-fastener, repeatedly, until a fastener that owns
    /// its value (or the root of the chain) is reached. Returns the fastener
    /// that was written.
    pub fn set_base_state<T: StateValue>(
        &mut self,
        fastener: Fastener<T>,
        value: T,
    ) -> Option<Fastener<T>> {
        let mut id = fastener.id();
        loop {
            let slot = self.slot(id)?;
            match slot.super_fastener {
                Some(super_fastener)
                    if slot.own_state.is_none()
                        && slot.flags.contains(FastenerFlags::INHERITED) =>
                {
                    id = super_fastener;
                }
                _ => break,
            }
        }
        let target = Fastener::from_id(id);
        self.set_state(target, value);
        Some(target)
    }

    /// Parses `input` with the descriptor's parser and sets it as the local value.
    ///
    /// Returns [`FastenerError::Coercion`] if the input cannot be parsed.
    pub fn set_state_from_str(&mut self, id: FastenerId, input: &str) -> Result<(), FastenerError> {
        let slot = self.slot(id).ok_or(FastenerError::StaleFastener(id))?;
        let name = slot.descriptor.name();
        let affinity = slot.affinity.max(Affinity::Extrinsic);
        let value =
            slot.descriptor
                .parse_erased(input)
                .map_err(|reason| FastenerError::Coercion {
                    name,
                    input: input.into(),
                    reason,
                })?;
        let stored = slot.descriptor.value_type_name();
        let parsed = value.type_name();
        if self.write(id, value, affinity, false) {
            Ok(())
        } else {
            Err(FastenerError::TypeMismatch {
                id,
                name,
                stored,
                requested: parsed,
            })
        }
    }

    /// Drops the local value and returns the fastener to its default or inherited state.
    ///
    /// The affinity floor is reset to [`Affinity::Intrinsic`].
    pub fn clear_state(&mut self, id: FastenerId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        slot.affinity = Affinity::Intrinsic;
        slot.flags.remove(FastenerFlags::OVERRIDDEN);
        self.reinherit(id);
        true
    }

    /// Re-subscribes a fastener to its super-fastener after a local override.
    ///
    /// Only takes effect when inheritance is enabled and the affinity floor is
    /// at or below [`Affinity::Inherited`]; the local value is dropped and the
    /// inherited state adopted. Returns `true` if the fastener now inherits.
    pub fn update_inherited(&mut self, id: FastenerId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        if !slot.inherit.is_enabled() || !slot.affinity.is_inheritable() {
            return false;
        }
        self.reinherit(id);
        self.is_inherited(id)
    }

    /// Sets the affinity floor directly.
    ///
    /// Lowering it to [`Affinity::Inherited`] or below clears the
    /// `OVERRIDDEN` flag so automatic and inherited writers may take over
    /// again on the next [`update_inherited`](Self::update_inherited) or
    /// automatic write.
    ///
    /// Raising it above [`Affinity::Inherited`] stops inheritance. An
    /// inherited value in force is kept as the local value, so the resolved
    /// state does not change.
    pub fn set_affinity(&mut self, id: FastenerId, affinity: Affinity) {
        let pinned = if !affinity.is_inheritable() && self.is_inherited(id) {
            self.state_erased(id).cloned()
        } else {
            None
        };
        let Some(slot) = self.slot_mut(id) else {
            return;
        };
        slot.affinity = affinity;
        if affinity.is_inheritable() {
            slot.flags.remove(FastenerFlags::OVERRIDDEN);
            return;
        }
        slot.flags.insert(FastenerFlags::OVERRIDDEN);
        slot.flags.remove(FastenerFlags::INHERITED);
        if pinned.is_some() {
            trace!(fastener = %id, %affinity, "pinned inherited value");
            slot.own_state = pinned;
        }
    }

    /// Changes the inheritance descriptor, rebinding when mounted.
    pub fn set_inherit(&mut self, id: FastenerId, inherit: impl Into<Inherit>) {
        let inherit = inherit.into();
        let old_value = self.state_erased(id).cloned();
        self.unbind_super_fastener(id);
        let Some(slot) = self.slot_mut(id) else {
            return;
        };
        slot.inherit = inherit;
        if slot.wants_inheritance() {
            slot.flags.insert(FastenerFlags::INHERITED);
        } else {
            slot.flags.remove(FastenerFlags::INHERITED);
        }
        if slot.flags.contains(FastenerFlags::MOUNTED) && self.bind_super_fastener(id) {
            return;
        }
        self.notify_if_changed(id, old_value);
    }

    /// Drops the local value and resumes inheritance where allowed.
    fn reinherit(&mut self, id: FastenerId) {
        let old_value = self.state_erased(id).cloned();
        let Some(slot) = self.slot_mut(id) else {
            return;
        };
        slot.own_state = None;
        let bind = slot.wants_inheritance();
        if bind {
            slot.flags.insert(FastenerFlags::INHERITED);
        }
        let mounted = slot.flags.contains(FastenerFlags::MOUNTED);
        if bind && mounted && slot.super_fastener.is_none() && self.bind_super_fastener(id) {
            return;
        }
        self.notify_if_changed(id, old_value);
    }

    fn notify_if_changed(&mut self, id: FastenerId, old_value: Option<ErasedValue>) {
        let new_value = self.state_erased(id).cloned();
        if new_value != old_value {
            self.propagate_update(id, old_value, new_value);
        }
    }

    /// The direct write path shared by every setter.
    fn write(&mut self, id: FastenerId, value: ErasedValue, affinity: Affinity, check: bool) -> bool {
        let Some(slot) = self.slot(id) else {
            debug!(fastener = %id, "write to stale fastener ignored");
            return false;
        };
        if value.type_id() != slot.descriptor.value_type() {
            debug!(
                fastener = %id,
                name = slot.descriptor.name(),
                "write with mismatched value type ignored"
            );
            return false;
        }
        if check && !slot.affinity.admits(affinity) {
            trace!(
                fastener = %id,
                name = slot.descriptor.name(),
                stored = %slot.affinity,
                incoming = %affinity,
                "write suppressed by affinity"
            );
            return false;
        }
        let value = slot.descriptor.coerce_erased(value);
        let old_value = self.state_erased(id).cloned();

        self.emit(FastenerPhase::WillSetState, id, Some(&value), old_value.as_ref());
        self.emit(FastenerPhase::WillUpdate, id, Some(&value), old_value.as_ref());

        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        slot.own_state = Some(value.clone());
        slot.affinity = affinity;
        slot.flags.remove(FastenerFlags::INHERITED);
        slot.flags.insert(FastenerFlags::UPDATED);
        if affinity.is_inheritable() {
            slot.flags.remove(FastenerFlags::OVERRIDDEN);
        } else {
            slot.flags.insert(FastenerFlags::OVERRIDDEN);
        }
        let descriptor = slot.descriptor.clone();
        let owner = slot.owner;
        if old_value.as_ref() != Some(&value) {
            self.require_update(owner, descriptor.affects());
        }

        self.emit(FastenerPhase::SetState, id, Some(&value), old_value.as_ref());
        descriptor.notify_changed_erased(old_value.as_ref(), &value);
        self.emit(FastenerPhase::Update, id, Some(&value), old_value.as_ref());
        self.cascade_update(id, old_value.as_ref());
        self.emit(FastenerPhase::DidUpdate, id, Some(&value), old_value.as_ref());
        self.emit(FastenerPhase::DidSetState, id, Some(&value), old_value.as_ref());
        true
    }

    /// Runs the update chain for a fastener whose resolved state changed without a direct write.
    fn propagate_update(
        &mut self,
        id: FastenerId,
        old_value: Option<ErasedValue>,
        new_value: Option<ErasedValue>,
    ) {
        self.emit(FastenerPhase::WillUpdate, id, new_value.as_ref(), old_value.as_ref());
        let Some(slot) = self.slot_mut(id) else {
            return;
        };
        slot.flags.insert(FastenerFlags::UPDATED);
        let descriptor = slot.descriptor.clone();
        let owner = slot.owner;
        self.require_update(owner, descriptor.affects());
        if let Some(new_value) = &new_value {
            descriptor.notify_changed_erased(old_value.as_ref(), new_value);
        }
        self.emit(FastenerPhase::Update, id, new_value.as_ref(), old_value.as_ref());
        self.cascade_update(id, old_value.as_ref());
        self.emit(FastenerPhase::DidUpdate, id, new_value.as_ref(), old_value.as_ref());
    }

    /// Visits every direct sub-fastener that still inherits, depth-first.
    ///
    /// Sub-fasteners holding a local value are skipped, along with their subtrees.
    fn cascade_update(&mut self, id: FastenerId, old_value: Option<&ErasedValue>) {
        let subs = match self.slot(id) {
            Some(slot) if !slot.sub_fasteners.is_empty() => slot.sub_fasteners.clone(),
            _ => return,
        };
        for sub in subs {
            let Some(sub_slot) = self.slot(sub) else {
                continue;
            };
            if sub_slot.own_state.is_some() || !sub_slot.flags.contains(FastenerFlags::INHERITED) {
                continue;
            }
            let sub_old = old_value.cloned().or_else(|| sub_slot.default_state.clone());
            let sub_new = self.state_erased(sub).cloned();
            self.propagate_update(sub, sub_old, sub_new);
        }
    }

    // =========================================================================
    // Binding
    // =========================================================================

    /// Marks the fastener mounted and binds its super-fastener. Idempotent.
    ///
    /// Mounted descendants that bound past this fastener while it was
    /// unmounted rebind to it.
    pub fn mount_fastener(&mut self, id: FastenerId) {
        if !self.mount_slot(id) {
            return;
        }
        if let Some(slot) = self.slot(id) {
            let (owner, name) = (slot.owner, slot.descriptor.name());
            self.rebind_descendants(owner, name);
        }
    }

    /// Mounts a single fastener. Returns `false` if it was stale or already mounted.
    fn mount_slot(&mut self, id: FastenerId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        if slot.flags.contains(FastenerFlags::MOUNTED) {
            return false;
        }
        slot.flags.insert(FastenerFlags::MOUNTED);
        let old_value = self.state_erased(id).cloned();
        if !self.bind_super_fastener(id) {
            self.notify_if_changed(id, old_value);
        }
        true
    }

    /// Unbinds the fastener from its super-fastener and from its sub-fasteners. Idempotent.
    ///
    /// Sub-fasteners that are still mounted rebind to the next ancestor.
    pub fn unmount_fastener(&mut self, id: FastenerId) {
        let Some(slot) = self.slot_mut(id) else {
            return;
        };
        if !slot.flags.contains(FastenerFlags::MOUNTED) {
            return;
        }
        slot.flags.remove(FastenerFlags::MOUNTED);
        let subs = core::mem::take(&mut slot.sub_fasteners);
        self.unbind_super_fastener(id);
        for sub in subs {
            let old_value = self.state_erased(sub).cloned();
            let Some(sub_slot) = self.slot_mut(sub) else {
                continue;
            };
            sub_slot.super_fastener = None;
            let remount = sub_slot.flags.contains(FastenerFlags::MOUNTED);
            self.emit(FastenerPhase::Unbind, sub, None, None);
            if remount && self.bind_super_fastener(sub) {
                continue;
            }
            self.notify_if_changed(sub, old_value);
        }
    }

    /// Walks the owner's ancestors for a mounted fastener under the super name
    /// and links to it.
    ///
    /// Callers are responsible for announcing any resulting change of state,
    /// unless this returns `true`: lazily instantiating an ancestor rebinds its
    /// mounted descendants, and that rebind has already announced the change.
    fn bind_super_fastener(&mut self, id: FastenerId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        if slot.super_fastener.is_some() || !slot.flags.contains(FastenerFlags::MOUNTED) {
            return false;
        }
        let Some(super_name) = slot.super_name() else {
            return false;
        };
        let value_type = slot.descriptor.value_type();
        let name = slot.descriptor.name();
        let mut ancestor = self.parent(slot.owner);
        let mut found = None;
        while let Some(owner) = ancestor {
            if let Some(candidate) = self.get_lazy_fastener(owner, super_name)
                && let Some(candidate_slot) = self.slot(candidate)
            {
                if !candidate_slot.flags.contains(FastenerFlags::MOUNTED) {
                    trace!(
                        fastener = %id,
                        name,
                        candidate = %candidate,
                        "skipping unmounted ancestor fastener"
                    );
                } else if candidate_slot.descriptor.value_type() == value_type {
                    found = Some(candidate);
                    break;
                } else {
                    debug!(
                        fastener = %id,
                        name,
                        candidate = %candidate,
                        "skipping ancestor fastener with a different value type"
                    );
                }
            }
            ancestor = self.parent(owner);
        }
        let Some(super_fastener) = found else {
            trace!(fastener = %id, name, super_name, "no super-fastener found");
            return false;
        };
        // Lazy instantiation above may have bound this fastener already.
        if self.super_fastener(id).is_some() {
            return true;
        }
        if let Some(slot) = self.slot_mut(id) {
            slot.super_fastener = Some(super_fastener);
        }
        if let Some(super_slot) = self.slot_mut(super_fastener) {
            super_slot.sub_fasteners.push(id);
        }
        trace!(fastener = %id, name, super_fastener = %super_fastener, "bound super-fastener");
        self.emit(FastenerPhase::Bind, id, None, None);
        false
    }

    fn unbind_super_fastener(&mut self, id: FastenerId) {
        let Some(slot) = self.slot_mut(id) else {
            return;
        };
        let Some(super_fastener) = slot.super_fastener.take() else {
            return;
        };
        if let Some(super_slot) = self.slot_mut(super_fastener) {
            super_slot.sub_fasteners.retain(|s| *s != id);
        }
        trace!(fastener = %id, super_fastener = %super_fastener, "unbound super-fastener");
        self.emit(FastenerPhase::Unbind, id, None, None);
    }

    /// Rebinds descendants that should now inherit from a fastener newly added to `owner`.
    fn rebind_descendants(&mut self, owner: OwnerId, name: &'static str) {
        let children = self.children(owner).to_vec();
        for child in children {
            let fasteners = self.fasteners(child).to_vec();
            for fastener in fasteners {
                let Some(slot) = self.slot(fastener) else {
                    continue;
                };
                if slot.super_name() != Some(name) || !slot.flags.contains(FastenerFlags::MOUNTED)
                {
                    continue;
                }
                let old_value = self.state_erased(fastener).cloned();
                self.unbind_super_fastener(fastener);
                if !self.bind_super_fastener(fastener) {
                    self.notify_if_changed(fastener, old_value);
                }
            }
            if self.get_fastener(child, name).is_none() {
                self.rebind_descendants(child, name);
            }
        }
    }

    // =========================================================================
    // Scheduler contract
    // =========================================================================

    /// Raises update flags on `owner` for the external scheduler.
    pub fn require_update(&mut self, owner: OwnerId, flags: UpdateFlags) {
        if flags.is_empty() || self.node(owner).is_none() {
            return;
        }
        *self.pending.entry(owner).or_default() |= flags;
    }

    /// Returns the update flags pending on `owner`.
    #[must_use]
    pub fn pending_updates(&self, owner: OwnerId) -> UpdateFlags {
        self.pending.get(&owner).copied().unwrap_or_default()
    }

    /// Drains all pending update flags, ordered by owner handle.
    pub fn take_pending_updates(&mut self) -> Vec<(OwnerId, UpdateFlags)> {
        let mut updates: Vec<_> = self.pending.drain().collect();
        updates.sort_by_key(|(owner, _)| *owner);
        updates
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers a listener that receives every [`FastenerEvent`].
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&FastenerEvent<'_>) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `true` if it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    fn emit(
        &mut self,
        phase: FastenerPhase,
        id: FastenerId,
        new_value: Option<&ErasedValue>,
        old_value: Option<&ErasedValue>,
    ) {
        if self.listeners.is_empty() {
            return;
        }
        let Some(slot) = self.slot(id) else {
            return;
        };
        let event = FastenerEvent {
            phase,
            fastener: id,
            owner: slot.owner,
            name: slot.descriptor.name(),
            kind: slot.descriptor.kind(),
            new_value,
            old_value,
        };
        let mut listeners = core::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener(&event);
        }
        self.listeners = listeners;
    }
}
