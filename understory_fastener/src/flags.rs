// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fastener status flags and owner update flags.

bitflags::bitflags! {
    /// Per-fastener status bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FastenerFlags: u8 {
        /// State changed since the last [`FastenerTree::take_updated`](crate::FastenerTree::take_updated).
        const UPDATED    = 0b0000_0001;
        /// An explicit value was set, suppressing inheritance.
        const OVERRIDDEN = 0b0000_0010;
        /// State is currently sourced from the super-fastener.
        const INHERITED  = 0b0000_0100;
        /// The fastener is mounted and may hold a super-fastener link.
        const MOUNTED    = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// Work an owner requests from the external scheduler after a fastener change.
    ///
    /// Descriptors name the flags their fastener raises; see
    /// [`FastenerDescriptor::affects`](crate::FastenerDescriptor::affects).
    /// Callers may define their own bits with [`UpdateFlags::from_bits_retain`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct UpdateFlags: u32 {
        /// Owner must run its revise pass (recompute derived state).
        const NEEDS_REVISE  = 1 << 0;
        /// Owner has running animations and must be ticked again.
        const NEEDS_ANIMATE = 1 << 1;
        /// Owner must be laid out again.
        const NEEDS_LAYOUT  = 1 << 2;
        /// Owner must be rendered again.
        const NEEDS_RENDER  = 1 << 3;
    }
}
