// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owner and fastener identification types.
//!
//! This module provides the generational handles [`OwnerId`] and
//! [`FastenerId`], and [`Fastener<T>`], a type-safe wrapper around a
//! [`FastenerId`].

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// Identifier for an owner in a [`FastenerTree`](crate::FastenerTree).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `OwnerId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `OwnerId`.
///
/// Stale handles never alias a different live owner because the generation must match.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerId(pub(crate) u32, pub(crate) u32);

impl OwnerId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation of this handle.
    #[must_use]
    #[inline]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({}v{})", self.0, self.1)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}

/// Identifier for a fastener in a [`FastenerTree`](crate::FastenerTree).
///
/// Follows the same slot/generation scheme as [`OwnerId`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FastenerId(pub(crate) u32, pub(crate) u32);

impl FastenerId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation of this handle.
    #[must_use]
    #[inline]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Debug for FastenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FastenerId({}v{})", self.0, self.1)
    }
}

impl fmt::Display for FastenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fastener#{}", self.0)
    }
}

/// A type-safe fastener handle.
///
/// This wraps a [`FastenerId`] with a phantom type parameter `T` naming the
/// fastener's value type, so reads and writes are checked at compile time:
///
/// ```rust
/// use understory_fastener::{FastenerDescriptor, FastenerTree};
///
/// let mut tree = FastenerTree::new();
/// let root = tree.insert_root();
/// let width = tree.insert_fastener(root, FastenerDescriptor::property("width").default(0.0_f64));
///
/// tree.set_state(width, 100.0);
/// // tree.set_state(width, "wide"); // Would not compile!
/// assert_eq!(tree.state(width), Some(&100.0));
/// ```
///
/// `Fastener<T>` is the same size as `FastenerId` since `PhantomData` has zero size.
pub struct Fastener<T> {
    id: FastenerId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Fastener<T> {
    /// Creates a typed handle from an untyped one.
    ///
    /// The caller must ensure that the fastener was created with the value type
    /// `T`; reads through a mismatched handle report
    /// [`FastenerError::TypeMismatch`](crate::FastenerError::TypeMismatch).
    #[must_use]
    #[inline]
    pub const fn from_id(id: FastenerId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying fastener ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> FastenerId {
        self.id
    }
}

// Manual trait implementations to avoid requiring T: Clone, etc.

impl<T> Copy for Fastener<T> {}

impl<T> Clone for Fastener<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Fastener<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Fastener<T> {}

impl<T> Hash for Fastener<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Fastener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fastener")
            .field("id", &self.id)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}

impl<T> From<Fastener<T>> for FastenerId {
    fn from(fastener: Fastener<T>) -> Self {
        fastener.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn owner_id_debug_and_display() {
        let id = OwnerId::new(3, 2);
        assert_eq!(format!("{id:?}"), "OwnerId(3v2)");
        assert_eq!(format!("{id}"), "owner#3");
        assert_eq!(id.generation(), 2);
    }

    #[test]
    fn generations_distinguish_reused_slots() {
        let a = FastenerId::new(0, 1);
        let b = FastenerId::new(0, 2);
        assert_ne!(a, b);
        assert_eq!(a.idx(), b.idx());
    }

    #[test]
    fn fastener_type_safety() {
        let id = FastenerId::new(1, 1);
        let as_f64: Fastener<f64> = Fastener::from_id(id);
        let as_string: Fastener<String> = Fastener::from_id(id);

        // Same ID, different phantom types
        assert_eq!(as_f64.id(), as_string.id());
    }

    #[test]
    fn fastener_size() {
        use core::mem::size_of;
        assert_eq!(size_of::<Fastener<f64>>(), size_of::<FastenerId>());
        assert_eq!(size_of::<Fastener<String>>(), 8);
    }
}
