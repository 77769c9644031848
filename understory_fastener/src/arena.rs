// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage shared by owners and fasteners.

use alloc::vec::Vec;

#[derive(Debug)]
struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Slots addressed by `(index, generation)`; freed slots are reused with a bumped generation.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    entries: Vec<Entry<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Arena<T> {
    /// Inserts a value and returns its `(index, generation)`.
    pub(crate) fn insert(&mut self, value: T) -> (u32, u32) {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let entry = &mut self.entries[idx as usize];
            entry.generation += 1;
            entry.value = Some(value);
            return (idx, entry.generation);
        }
        assert!(self.entries.len() < u32::MAX as usize, "arena is full");
        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let idx = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 1,
            value: Some(value),
        });
        (idx, 1)
    }

    pub(crate) fn get(&self, idx: usize, generation: u32) -> Option<&T> {
        self.entries
            .get(idx)
            .filter(|e| e.generation == generation)
            .and_then(|e| e.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, idx: usize, generation: u32) -> Option<&mut T> {
        self.entries
            .get_mut(idx)
            .filter(|e| e.generation == generation)
            .and_then(|e| e.value.as_mut())
    }

    pub(crate) fn remove(&mut self, idx: usize, generation: u32) -> Option<T> {
        let entry = self.entries.get_mut(idx)?;
        if entry.generation != generation {
            return None;
        }
        let value = entry.value.take()?;
        #[expect(clippy::cast_possible_truncation, reason = "idx came from a u32 slot")]
        self.free.push(idx as u32);
        self.len -= 1;
        Some(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuse_bumps_generation() {
        let mut arena = Arena::default();
        let (idx, generation) = arena.insert("a");
        assert_eq!(arena.remove(idx as usize, generation), Some("a"));
        let (idx2, generation2) = arena.insert("b");
        assert_eq!(idx, idx2);
        assert_eq!(generation2, generation + 1);
        assert!(arena.get(idx as usize, generation).is_none());
        assert_eq!(arena.get(idx2 as usize, generation2), Some(&"b"));
        assert_eq!(arena.len(), 1);
    }
}
