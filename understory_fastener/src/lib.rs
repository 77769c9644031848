// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Fastener: named, inheritable state cells attached to an owner tree.
//!
//! A *fastener* is a named, typed slot of state that belongs to an *owner*
//! (a component, view, or any other node of a hierarchy). A fastener can
//! inherit its value from a same-named (or explicitly named) fastener on an
//! ancestor owner, and pushes changes down to every descendant fastener that
//! still inherits from it.
//!
//! ## Core Concepts
//!
//! ### Owners and fasteners
//!
//! [`FastenerTree`] is an arena holding both the owner hierarchy and all
//! fasteners. Owners are addressed by [`OwnerId`]; fasteners by the typed
//! handle [`Fastener<T>`] (or the untyped [`FastenerId`]). Handles are
//! generational, so a handle to a removed owner or fastener never aliases a
//! newer one.
//!
//! A fastener is configured by a [`FastenerDescriptor`]: its
//! [`FastenerKind`], default value, [`Inherit`] mode, the [`UpdateFlags`] a
//! change raises on the owner, and optional coercion, parsing, and change
//! callbacks. An [`OwnerClass`] declares descriptors shared by many owners;
//! those fasteners are only instantiated when first looked up.
//!
//! ### Resolution
//!
//! The state of a fastener resolves, in order, to:
//!
//! 1. its local value, if one was written;
//! 2. the state of its super-fastener, while it inherits and is bound;
//! 3. its default value.
//!
//! Binding to a super-fastener happens when the owner is mounted, and is
//! undone when it is unmounted.
//!
//! ### Affinity
//!
//! Every accepted write records an [`Affinity`]. An automatic write at a
//! lower affinity than the one in force is refused, so a value set by the
//! user is not clobbered by a theme or a default.
//!
//! ### Lifecycle events
//!
//! Listeners added with [`FastenerTree::add_listener`] observe each
//! [`FastenerPhase`] of a write and its cascade, plus bind and unbind.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_fastener::{Affinity, FastenerDescriptor, FastenerTree, UpdateFlags};
//!
//! let mut tree = FastenerTree::new();
//! let window = tree.insert_root();
//! let button = tree.insert_child(window);
//!
//! let font_size = tree.insert_fastener(
//!     window,
//!     FastenerDescriptor::property("fontSize").default(14.0_f64),
//! );
//! let button_font_size = tree.insert_fastener(
//!     button,
//!     FastenerDescriptor::property("fontSize")
//!         .default(14.0_f64)
//!         .inherit(true)
//!         .affects(UpdateFlags::NEEDS_LAYOUT),
//! );
//! tree.mount(window);
//!
//! // Changes cascade to inheriting descendants.
//! tree.set_state(font_size, 16.0);
//! assert_eq!(tree.state(button_font_size), Some(&16.0));
//! assert!(tree.pending_updates(button).contains(UpdateFlags::NEEDS_LAYOUT));
//!
//! // A user-level write wins over later automatic writes.
//! tree.set_state(button_font_size, 20.0);
//! assert!(!tree.set_auto_state(button_font_size, 12.0));
//! assert_eq!(tree.state(button_font_size), Some(&20.0));
//! assert_eq!(tree.affinity(button_font_size.id()), Some(Affinity::Extrinsic));
//! ```
//!
//! ## Logging
//!
//! Binding decisions and suppressed writes are reported through `tracing` at
//! `trace` and `debug` level.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod affinity;
mod arena;
mod descriptor;
mod error;
mod event;
mod flags;
mod id;
mod tree;
mod value;

pub use affinity::Affinity;
pub use descriptor::{
    CoerceValueCallback, FastenerDescriptor, FastenerKind, Inherit, OwnerClass,
    ParseValueCallback, StateChangedCallback,
};
pub use error::FastenerError;
pub use event::{FastenerEvent, FastenerPhase, ListenerId};
pub use flags::{FastenerFlags, UpdateFlags};
pub use id::{Fastener, FastenerId, OwnerId};
pub use tree::FastenerTree;
pub use value::{ErasedValue, StateValue};
