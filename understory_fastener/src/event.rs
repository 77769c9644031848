// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle events delivered to fastener listeners.

use crate::descriptor::FastenerKind;
use crate::id::{FastenerId, OwnerId};
use crate::value::ErasedValue;

/// The point in a fastener's lifecycle an event reports.
///
/// A direct write runs the phases in this fixed order:
///
/// `WillSetState → WillUpdate → (mutate) → SetState → Update → (cascade) → DidUpdate → DidSetState`
///
/// A sub-fastener reached by a cascade sees only
/// `WillUpdate → Update → (cascade) → DidUpdate`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FastenerPhase {
    /// A direct write is about to replace the local value.
    WillSetState,
    /// The resolved state is about to change.
    WillUpdate,
    /// The local value has been replaced.
    SetState,
    /// The resolved state has changed; sub-fasteners have not been visited yet.
    Update,
    /// The cascade below this fastener has completed.
    DidUpdate,
    /// The direct write, including its cascade, has completed.
    DidSetState,
    /// A super-fastener link was established.
    Bind,
    /// A super-fastener link was removed.
    Unbind,
}

/// An event delivered to listeners registered with
/// [`FastenerTree::add_listener`](crate::FastenerTree::add_listener).
///
/// Values are the fastener's resolved state before and after the change,
/// type-erased; use [`ErasedValue::downcast_ref`] to read them.
#[derive(Copy, Clone, Debug)]
pub struct FastenerEvent<'a> {
    /// Which lifecycle point this is.
    pub phase: FastenerPhase,
    /// The fastener the event is about.
    pub fastener: FastenerId,
    /// The fastener's owner.
    pub owner: OwnerId,
    /// The fastener's name.
    pub name: &'static str,
    /// The fastener's kind.
    pub kind: FastenerKind,
    /// The resolved state after the change, when known.
    pub new_value: Option<&'a ErasedValue>,
    /// The resolved state before the change, when known.
    pub old_value: Option<&'a ErasedValue>,
}

impl FastenerEvent<'_> {
    /// Returns the new value downcast to `T`.
    #[must_use]
    pub fn new_as<T: 'static>(&self) -> Option<&T> {
        self.new_value.and_then(ErasedValue::downcast_ref)
    }

    /// Returns the old value downcast to `T`.
    #[must_use]
    pub fn old_as<T: 'static>(&self) -> Option<&T> {
        self.old_value.and_then(ErasedValue::downcast_ref)
    }
}

/// Handle for removing a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u32);
