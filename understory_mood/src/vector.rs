// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persistent sparse vectors.
//!
//! [`SparseVector`] is an immutable, insertion-ordered map with vector
//! algebra on top. Every "mutation" returns a new vector; the entry array and
//! the key index are reference counted and shared until one of them has to
//! change.
//!
//! Three instantiations carry the theme system:
//!
//! - [`MoodVector`]: feel → weight.
//! - [`LookVector<T>`]: feel → look value.
//! - [`FeelVector`]: look → value, one feel rendered across every look.

use std::rc::Rc;

use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::feel::Feel;
use crate::look::LookId;
use crate::value::ThemeValue;

/// Weights over feels.
pub type MoodVector = SparseVector<Feel, f64>;

/// Per-feel values of one look.
pub type LookVector<T> = SparseVector<Feel, T>;

/// Per-look values of one feel.
pub type FeelVector = SparseVector<LookId, ThemeValue>;

/// An immutable sparse vector keyed by `K`.
///
/// Entries keep insertion order. Equality ignores order.
///
/// # Example
///
/// ```rust
/// use understory_mood::{MoodVector, feels};
///
/// let base = MoodVector::of([(feels::DEFAULT, 1.0)]);
/// let hovered = base.updated(feels::HOVERING, Some(0.5));
///
/// assert_eq!(base.len(), 1);
/// assert_eq!(hovered.get(&feels::HOVERING), Some(&0.5));
///
/// // Removing an entry is an update to `None`.
/// assert_eq!(hovered.updated(feels::HOVERING, None), base);
/// ```
pub struct SparseVector<K, V> {
    array: Rc<[(K, V)]>,
    index: Rc<HashMap<K, usize>>,
}

impl<K, V> Clone for SparseVector<K, V> {
    fn clone(&self) -> Self {
        Self {
            array: self.array.clone(),
            index: self.index.clone(),
        }
    }
}

impl<K: Copy + Eq + Hash, V: Clone> Default for SparseVector<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: Copy + Eq + Hash, V: Clone> SparseVector<K, V> {
    /// The empty vector.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            array: Rc::from([]),
            index: Rc::default(),
        }
    }

    /// Builds a vector from entries; a repeated key keeps its first position
    /// and its last value.
    #[must_use]
    pub fn of(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut array: Vec<(K, V)> = Vec::new();
        let mut index = HashMap::new();
        for (key, value) in entries {
            match index.get(&key) {
                Some(&i) => array[i] = (key, value),
                None => {
                    index.insert(key, array.len());
                    array.push((key, value));
                }
            }
        }
        Self {
            array: array.into(),
            index: Rc::new(index),
        }
    }

    /// Reconstructs a vector from its entry array and, optionally, its index.
    ///
    /// Without an index one is rebuilt from the array. A supplied index must
    /// map every key to its position in `array`.
    #[must_use]
    pub fn from_array(array: Rc<[(K, V)]>, index: Option<Rc<HashMap<K, usize>>>) -> Self {
        let index = index.unwrap_or_else(|| {
            let mut index = HashMap::with_capacity(array.len());
            for (i, (key, _)) in array.iter().enumerate() {
                index.entry(*key).or_insert(i);
            }
            Rc::new(index)
        });
        debug_assert!(
            index.len() == array.len()
                && array.iter().enumerate().all(|(i, (k, _))| index.get(k) == Some(&i)),
            "sparse vector index does not match its array"
        );
        Self { array, index }
    }

    /// The entries, in insertion order.
    #[must_use]
    #[inline]
    pub fn array(&self) -> &Rc<[(K, V)]> {
        &self.array
    }

    /// The key index.
    #[must_use]
    #[inline]
    pub fn index(&self) -> &Rc<HashMap<K, usize>> {
        &self.index
    }

    /// Number of entries.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.array[i].1)
    }

    /// Returns `true` if `key` has an entry.
    #[must_use]
    pub fn has(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.array.iter().map(|(k, v)| (k, v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.array.iter().map(|(k, _)| *k)
    }

    /// Returns a vector with `key` set to `value`, or removed when `value` is `None`.
    ///
    /// Replacing an existing entry shares the index with `self`; appending
    /// or removing shares nothing.
    #[must_use]
    pub fn updated(&self, key: K, value: Option<V>) -> Self {
        match (self.index.get(&key).copied(), value) {
            (Some(i), Some(value)) => {
                let mut array = self.array.to_vec();
                array[i].1 = value;
                Self {
                    array: array.into(),
                    index: self.index.clone(),
                }
            }
            (None, Some(value)) => {
                let mut array = self.array.to_vec();
                let mut index = (*self.index).clone();
                index.insert(key, array.len());
                array.push((key, value));
                Self {
                    array: array.into(),
                    index: Rc::new(index),
                }
            }
            (Some(i), None) => {
                let mut array = self.array.to_vec();
                array.remove(i);
                let mut index = (*self.index).clone();
                index.remove(&key);
                for slot in index.values_mut() {
                    if *slot > i {
                        *slot -= 1;
                    }
                }
                Self {
                    array: array.into(),
                    index: Rc::new(index),
                }
            }
            (None, None) => self.clone(),
        }
    }

    /// Returns a vector with every value mapped through `f`.
    #[must_use]
    pub fn map<W: Clone>(&self, mut f: impl FnMut(&K, &V) -> W) -> SparseVector<K, W> {
        SparseVector {
            array: self.array.iter().map(|(k, v)| (*k, f(k, v))).collect(),
            index: self.index.clone(),
        }
    }

    /// Combines two vectors key by key over the union of their keys.
    ///
    /// `f` receives the values present on each side; entries for which it
    /// returns `None` are left out. Keys of `self` come first.
    #[must_use]
    pub fn merge(&self, other: &Self, mut f: impl FnMut(Option<&V>, Option<&V>) -> Option<V>) -> Self {
        let left = self.iter().filter_map(|(k, a)| Some((*k, f(Some(a), other.get(k))?)));
        let left: Vec<_> = left.collect();
        let right = other
            .iter()
            .filter(|(k, _)| !self.has(k))
            .filter_map(|(k, b)| Some((*k, f(None, Some(b))?)));
        Self::of(left.into_iter().chain(right))
    }
}

impl<K: Copy + Eq + Hash, V: Clone + PartialEq> PartialEq for SparseVector<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SparseVector<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.array.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: Copy + Eq + Hash, V: Clone> FromIterator<(K, V)> for SparseVector<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl MoodVector {
    /// Entry-wise sum; keys missing on one side count as zero.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        self.merge(other, |a, b| Some(a.unwrap_or(&0.0) + b.unwrap_or(&0.0)))
    }

    /// Entry-wise difference; keys missing on one side count as zero.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        self.merge(other, |a, b| Some(a.unwrap_or(&0.0) - b.unwrap_or(&0.0)))
    }

    /// Negates every weight.
    #[must_use]
    pub fn negative(&self) -> Self {
        self.map(|_, w| -w)
    }

    /// Scales every weight.
    #[must_use]
    pub fn times(&self, scalar: f64) -> Self {
        self.map(|_, w| w * scalar)
    }

    /// Sparse dot product over the shared feels.
    ///
    /// Returns `None` when no feel is present in both vectors, which is
    /// distinct from a dot product of zero.
    #[must_use]
    pub fn dot(&self, other: &Self) -> Option<f64> {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .iter()
            .filter_map(|(feel, a)| large.get(feel).map(|b| a * b))
            .reduce(|acc, x| acc + x)
    }

    /// The weight of `feel`, zero when absent.
    #[must_use]
    pub fn weight(&self, feel: &Feel) -> f64 {
        self.get(feel).copied().unwrap_or(0.0)
    }

    /// Layers a transient `adjustment` (like "hovering") over a base mood.
    ///
    /// This is the one way moods are composed before resolving a look; it is
    /// the vector sum of the two.
    #[must_use]
    pub fn compose(&self, adjustment: &Self) -> Self {
        self.plus(adjustment)
    }
}
