// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Write precedence for fastener state.

use core::fmt;

/// Precedence level attached to every state-changing call.
///
/// Levels are totally ordered:
///
/// **Intrinsic < Inherited < Extrinsic < Reflexive**
///
/// A fastener remembers the affinity of the last accepted write. An automatic
/// write (see [`FastenerTree::set_auto_state`](crate::FastenerTree::set_auto_state)
/// and [`FastenerTree::set_state_with`](crate::FastenerTree::set_state_with)) is
/// dropped when the stored affinity is strictly greater than the caller's, so
/// built-in defaults, inherited values, theme-driven values and explicit user
/// values can share one slot.
///
/// ```rust
/// use understory_fastener::Affinity;
///
/// assert!(Affinity::Intrinsic < Affinity::Inherited);
/// assert!(Affinity::Inherited < Affinity::Extrinsic);
/// assert!(Affinity::Extrinsic < Affinity::Reflexive);
/// assert!(Affinity::Extrinsic.admits(Affinity::Inherited) == false);
/// assert!(Affinity::Inherited.admits(Affinity::Extrinsic));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Affinity {
    /// Built-in default or theme-derived value.
    #[default]
    Intrinsic,
    /// Value sourced from an ancestor fastener.
    Inherited,
    /// Value assigned explicitly from outside the owner.
    Extrinsic,
    /// Value derived by the owner from its own state.
    Reflexive,
}

impl Affinity {
    /// Returns `true` if a write at `incoming` may replace a value stored at `self`.
    #[must_use]
    #[inline]
    pub fn admits(self, incoming: Self) -> bool {
        incoming >= self
    }

    /// Returns `true` if this level still lets inheritance supply the value.
    #[must_use]
    #[inline]
    pub fn is_inheritable(self) -> bool {
        self <= Self::Inherited
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Intrinsic => "intrinsic",
            Self::Inherited => "inherited",
            Self::Extrinsic => "extrinsic",
            Self::Reflexive => "reflexive",
        };
        f.write_str(name)
    }
}
