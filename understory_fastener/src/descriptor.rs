// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fastener descriptors.
//!
//! This module provides [`FastenerDescriptor`] for configuring a fastener
//! (kind, inheritance, default, callbacks, update flags) and [`OwnerClass`]
//! for declaring a set of fasteners shared by many owners.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use crate::flags::UpdateFlags;
use crate::value::{ErasedValue, StateValue};

/// Callback invoked when a fastener's resolved state changes.
///
/// The callback receives the old value (if any) and the new value.
pub type StateChangedCallback<T> = Box<dyn Fn(Option<&T>, &T)>;

/// Callback for coercing a value before it's stored.
///
/// This can be used to clamp values, validate ranges, etc.
pub type CoerceValueCallback<T> = Box<dyn Fn(T) -> T>;

/// Callback for parsing a raw text value into the fastener's value type.
pub type ParseValueCallback<T> = Box<dyn Fn(&str) -> Result<T, String>>;

/// The variety of a fastener.
///
/// All kinds share the same inheritance and cascade machinery; the kind picks
/// the default inheritance descriptor and is reported to listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FastenerKind {
    /// Scoped state visible to descendants that ask for it.
    Scope,
    /// A plain typed property.
    Property,
    /// A shared service handle, inherited by default.
    Service,
    /// A property whose state is driven by an animator.
    Animator,
}

impl FastenerKind {
    /// Returns the inheritance descriptor a fastener of this kind starts with.
    #[must_use]
    pub fn default_inherit(self) -> Inherit {
        match self {
            Self::Service => Inherit::Same,
            Self::Scope | Self::Property | Self::Animator => Inherit::None,
        }
    }
}

/// Which ancestor fastener, if any, supplies inherited state.
///
/// ```rust
/// use understory_fastener::Inherit;
///
/// assert_eq!(Inherit::from(true), Inherit::Same);
/// assert_eq!(Inherit::from(false), Inherit::None);
/// assert_eq!(Inherit::from("textColor"), Inherit::Named("textColor"));
/// assert_eq!(Inherit::Same.super_name("color"), Some("color"));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Inherit {
    /// Inheritance disabled.
    #[default]
    None,
    /// Inherit from an ancestor fastener with the same name.
    Same,
    /// Inherit from an ancestor fastener with a different name.
    Named(&'static str),
}

impl Inherit {
    /// Returns `true` unless inheritance is disabled.
    #[must_use]
    #[inline]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns the name to look up on ancestors for a fastener called `own_name`.
    #[must_use]
    pub fn super_name(self, own_name: &'static str) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Same => Some(own_name),
            Self::Named(name) => Some(name),
        }
    }
}

impl From<bool> for Inherit {
    fn from(inherit: bool) -> Self {
        if inherit { Self::Same } else { Self::None }
    }
}

impl From<&'static str> for Inherit {
    fn from(name: &'static str) -> Self {
        Self::Named(name)
    }
}

/// Configuration for one fastener.
///
/// # Example
///
/// ```rust
/// use understory_fastener::{FastenerDescriptor, FastenerKind, Inherit, UpdateFlags};
///
/// let descriptor = FastenerDescriptor::property("opacity")
///     .default(1.0_f64)
///     .inherit(true)
///     .affects(UpdateFlags::NEEDS_RENDER)
///     .coerce(|v: f64| v.clamp(0.0, 1.0))
///     .parse_with(|s| s.trim().parse::<f64>().map_err(|e| e.to_string()));
///
/// assert_eq!(descriptor.name(), "opacity");
/// assert_eq!(descriptor.kind(), FastenerKind::Property);
/// assert_eq!(descriptor.inherits(), Inherit::Same);
/// assert_eq!(descriptor.default_value(), Some(&1.0));
/// assert_eq!(descriptor.coerce_value(3.0), 1.0);
/// ```
pub struct FastenerDescriptor<T: StateValue> {
    name: &'static str,
    kind: FastenerKind,
    inherit: Inherit,
    default_value: Option<T>,
    affects: UpdateFlags,
    changed_callback: Option<StateChangedCallback<T>>,
    coerce_callback: Option<CoerceValueCallback<T>>,
    parse_callback: Option<ParseValueCallback<T>>,
}

impl<T: StateValue> FastenerDescriptor<T> {
    /// Creates a descriptor of the given kind.
    ///
    /// The inheritance descriptor starts at [`FastenerKind::default_inherit`].
    #[must_use]
    pub fn new(name: &'static str, kind: FastenerKind) -> Self {
        Self {
            name,
            kind,
            inherit: kind.default_inherit(),
            default_value: None,
            affects: UpdateFlags::empty(),
            changed_callback: None,
            coerce_callback: None,
            parse_callback: None,
        }
    }

    /// Creates a [`FastenerKind::Scope`] descriptor.
    #[must_use]
    pub fn scope(name: &'static str) -> Self {
        Self::new(name, FastenerKind::Scope)
    }

    /// Creates a [`FastenerKind::Property`] descriptor.
    #[must_use]
    pub fn property(name: &'static str) -> Self {
        Self::new(name, FastenerKind::Property)
    }

    /// Creates a [`FastenerKind::Service`] descriptor.
    #[must_use]
    pub fn service(name: &'static str) -> Self {
        Self::new(name, FastenerKind::Service)
    }

    /// Creates a [`FastenerKind::Animator`] descriptor.
    #[must_use]
    pub fn animator(name: &'static str) -> Self {
        Self::new(name, FastenerKind::Animator)
    }

    /// Sets the built-in default used when no local or inherited value exists.
    #[must_use]
    pub fn default(mut self, value: T) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Sets the inheritance descriptor.
    #[must_use]
    pub fn inherit(mut self, inherit: impl Into<Inherit>) -> Self {
        self.inherit = inherit.into();
        self
    }

    /// Sets the update flags raised on the owner when the state changes.
    #[must_use]
    pub fn affects(mut self, flags: UpdateFlags) -> Self {
        self.affects = flags;
        self
    }

    /// Sets a callback to be invoked when the resolved state changes.
    #[must_use]
    pub fn on_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<&T>, &T) + 'static,
    {
        self.changed_callback = Some(Box::new(callback));
        self
    }

    /// Sets a callback to coerce values before they are stored.
    #[must_use]
    pub fn coerce<F>(mut self, callback: F) -> Self
    where
        F: Fn(T) -> T + 'static,
    {
        self.coerce_callback = Some(Box::new(callback));
        self
    }

    /// Sets a callback that parses raw text into a value.
    ///
    /// Used by [`FastenerTree::set_state_from_str`](crate::FastenerTree::set_state_from_str).
    #[must_use]
    pub fn parse_with<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) -> Result<T, String> + 'static,
    {
        self.parse_callback = Some(Box::new(callback));
        self
    }

    /// Returns the fastener name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fastener kind.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> FastenerKind {
        self.kind
    }

    /// Returns the inheritance descriptor.
    #[must_use]
    #[inline]
    pub fn inherits(&self) -> Inherit {
        self.inherit
    }

    /// Returns the built-in default, if any.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    /// Returns the update flags raised on change.
    #[must_use]
    #[inline]
    pub fn affected_flags(&self) -> UpdateFlags {
        self.affects
    }

    /// Coerces a value using the coerce callback if one is set.
    #[inline]
    pub fn coerce_value(&self, value: T) -> T {
        match &self.coerce_callback {
            Some(callback) => callback(value),
            None => value,
        }
    }

    /// Invokes the changed callback if one is set.
    #[inline]
    pub fn notify_changed(&self, old_value: Option<&T>, new_value: &T) {
        if let Some(callback) = &self.changed_callback {
            callback(old_value, new_value);
        }
    }

    /// Parses raw text, or reports that no parser is configured.
    pub fn parse_value(&self, input: &str) -> Result<T, String> {
        match &self.parse_callback {
            Some(parse) => parse(input),
            None => Err(String::from("no parser configured")),
        }
    }
}

// Manual Debug impl since callbacks aren't Debug
impl<T: StateValue> fmt::Debug for FastenerDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastenerDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("inherit", &self.inherit)
            .field("default_value", &self.default_value)
            .field("affects", &self.affects)
            .field("has_changed_callback", &self.changed_callback.is_some())
            .field("has_coerce_callback", &self.coerce_callback.is_some())
            .field("has_parse_callback", &self.parse_callback.is_some())
            .finish()
    }
}

/// Type-erased descriptor stored in the fastener arena.
pub(crate) trait ErasedDescriptor {
    fn name(&self) -> &'static str;
    fn kind(&self) -> FastenerKind;
    fn inherits(&self) -> Inherit;
    fn affects(&self) -> UpdateFlags;
    fn value_type(&self) -> TypeId;
    fn value_type_name(&self) -> &'static str;
    fn default_erased(&self) -> Option<ErasedValue>;
    fn coerce_erased(&self, value: ErasedValue) -> ErasedValue;
    fn notify_changed_erased(&self, old_value: Option<&ErasedValue>, new_value: &ErasedValue);
    fn parse_erased(&self, input: &str) -> Result<ErasedValue, String>;
}

impl<T: StateValue> ErasedDescriptor for FastenerDescriptor<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> FastenerKind {
        self.kind
    }

    fn inherits(&self) -> Inherit {
        self.inherit
    }

    fn affects(&self) -> UpdateFlags {
        self.affects
    }

    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn value_type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    fn default_erased(&self) -> Option<ErasedValue> {
        self.default_value.clone().map(ErasedValue::new)
    }

    fn coerce_erased(&self, value: ErasedValue) -> ErasedValue {
        if self.coerce_callback.is_none() {
            return value;
        }
        match value.downcast_ref::<T>() {
            Some(typed) => ErasedValue::new(self.coerce_value(typed.clone())),
            None => value,
        }
    }

    fn notify_changed_erased(&self, old_value: Option<&ErasedValue>, new_value: &ErasedValue) {
        if self.changed_callback.is_none() {
            return;
        }
        if let Some(new_value) = new_value.downcast_ref::<T>() {
            let old_value = old_value.and_then(ErasedValue::downcast_ref::<T>);
            self.notify_changed(old_value, new_value);
        }
    }

    fn parse_erased(&self, input: &str) -> Result<ErasedValue, String> {
        self.parse_value(input).map(ErasedValue::new)
    }
}

/// A set of fastener declarations shared by every owner created with it.
///
/// Declared fasteners are instantiated lazily, the first time they are looked
/// up with [`FastenerTree::get_lazy_fastener`](crate::FastenerTree::get_lazy_fastener)
/// (which is also how descendants find them while binding inheritance).
///
/// ```rust
/// use understory_fastener::{FastenerDescriptor, FastenerTree, OwnerClass};
///
/// let view_class = OwnerClass::new("View")
///     .declare(FastenerDescriptor::property("color").default(0_u32).inherit(true));
///
/// let mut tree = FastenerTree::new();
/// let root = tree.insert_root_with(&view_class);
///
/// assert!(tree.get_fastener(root, "color").is_none());
/// assert!(tree.get_lazy_fastener(root, "color").is_some());
/// assert!(tree.get_fastener(root, "color").is_some());
/// ```
#[derive(Clone)]
pub struct OwnerClass {
    name: &'static str,
    declarations: Vec<Rc<dyn ErasedDescriptor>>,
}

impl OwnerClass {
    /// Creates an empty class.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            declarations: Vec::new(),
        }
    }

    /// Declares a fastener on every owner of this class.
    #[must_use]
    pub fn declare<T: StateValue>(mut self, descriptor: FastenerDescriptor<T>) -> Self {
        self.declarations.retain(|d| d.name() != descriptor.name());
        self.declarations.push(Rc::new(descriptor));
        self
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared fastener names, in declaration order.
    pub fn declared_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.declarations.iter().map(|d| d.name())
    }

    pub(crate) fn declarations(&self) -> &[Rc<dyn ErasedDescriptor>] {
        &self.declarations
    }
}

impl fmt::Debug for OwnerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerClass")
            .field("name", &self.name)
            .field("declarations", &self.declared_names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use core::cell::Cell;

    #[test]
    fn kind_defaults() {
        let service = FastenerDescriptor::<u32>::service("clock");
        assert_eq!(service.inherits(), Inherit::Same);

        let property = FastenerDescriptor::<u32>::property("width");
        assert_eq!(property.inherits(), Inherit::None);
        assert!(property.default_value().is_none());
        assert!(property.affected_flags().is_empty());
    }

    #[test]
    fn named_inherit() {
        let descriptor = FastenerDescriptor::<u32>::property("fill").inherit("textColor");
        assert_eq!(descriptor.inherits().super_name("fill"), Some("textColor"));
        assert_eq!(Inherit::None.super_name("fill"), None);
    }

    #[test]
    fn coerce_and_parse() {
        let descriptor = FastenerDescriptor::property("count")
            .coerce(|v: i32| v.max(0))
            .parse_with(|s| s.parse::<i32>().map_err(|e| e.to_string()));

        assert_eq!(descriptor.coerce_value(-4), 0);
        assert_eq!(descriptor.parse_value("12"), Ok(12));
        assert!(descriptor.parse_value("twelve").is_err());
    }

    #[test]
    fn missing_parser_is_an_error() {
        let descriptor = FastenerDescriptor::<i32>::property("count");
        assert!(descriptor.parse_value("1").is_err());
    }

    #[test]
    fn erased_changed_callback_downcasts() {
        let seen = Rc::new(Cell::new(0));
        let seen_in_callback = seen.clone();
        let descriptor = FastenerDescriptor::property("count")
            .on_changed(move |_, new: &i32| seen_in_callback.set(*new));

        let erased: &dyn ErasedDescriptor = &descriptor;
        erased.notify_changed_erased(None, &ErasedValue::new(7_i32));
        assert_eq!(seen.get(), 7);

        // Wrong type is ignored
        erased.notify_changed_erased(None, &ErasedValue::new(9_u8));
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn class_redeclaration_replaces() {
        let class = OwnerClass::new("View")
            .declare(FastenerDescriptor::property("color").default(1_u32))
            .declare(FastenerDescriptor::property("color").default(2_u32));
        assert_eq!(class.declared_names().count(), 1);
        assert_eq!(
            class.declarations()[0].default_erased(),
            Some(ErasedValue::new(2_u32))
        );
    }
}
