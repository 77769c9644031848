// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boxed fastener state.
//!
//! The fastener arena holds values of many types side by side. Each slot
//! stores an [`ErasedValue`], and typed access goes back through
//! [`ErasedValue::downcast_ref`]. [`StateValue`] is the bound every fastener
//! value type satisfies.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

/// Bound for types that can be stored in a fastener.
///
/// Equality is needed to detect no-op writes and to let animators compare
/// targets; `Debug` keeps tracing output readable.
pub trait StateValue: Clone + PartialEq + fmt::Debug + 'static {}

impl<T: Clone + PartialEq + fmt::Debug + 'static> StateValue for T {}

/// A fastener value with its concrete type hidden.
///
/// Two erased values are equal only when they hold the same type and the
/// held values compare equal. `Debug` prints the held value as-is.
///
/// # Example
///
/// ```rust
/// use understory_fastener::ErasedValue;
///
/// let opacity = ErasedValue::new(0.5_f64);
/// assert!(opacity.is::<f64>());
/// assert_eq!(opacity.downcast_ref::<f64>(), Some(&0.5));
/// assert_eq!(opacity.downcast_ref::<f32>(), None);
/// assert_ne!(opacity, ErasedValue::new(0.5_f32));
/// ```
pub struct ErasedValue(Box<dyn DynState>);

impl ErasedValue {
    /// Boxes `value`.
    #[must_use]
    pub fn new<T: StateValue>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// The [`TypeId`] of the held value.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    /// The name of the held value's type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Whether the held value is a `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    /// Borrows the held value as a `T`, or `None` for any other type.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref()
    }
}

impl Clone for ErasedValue {
    fn clone(&self) -> Self {
        Self(self.0.boxed_clone())
    }
}

impl PartialEq for ErasedValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_as(other.0.as_any())
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.debug(f)
    }
}

/// Object-safe view of a [`StateValue`].
trait DynState: Any {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
    fn boxed_clone(&self) -> Box<dyn DynState>;
    fn same_as(&self, other: &dyn Any) -> bool;
    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: StateValue> DynState for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    fn boxed_clone(&self) -> Box<dyn DynState> {
        Box::new(self.clone())
    }

    fn same_as(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>() == Some(self)
    }

    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
