// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Insertion-ordered attribute map
//!
//! Iteration follows insertion order so uploads happen in a stable
//! sequence. Lookup goes through an `FxHashMap` of slot positions.

use crate::attribute::BufferAttribute;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    names: Vec<String>,
    values: Vec<BufferAttribute>,
    slots: FxHashMap<String, usize>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. An overwritten name keeps its original slot.
    pub fn insert(&mut self, name: impl Into<String>, attribute: BufferAttribute) -> Option<BufferAttribute> {
        let name = name.into();
        if let Some(&slot) = self.slots.get(&name) {
            return Some(std::mem::replace(&mut self.values[slot], attribute));
        }

        self.slots.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.values.push(attribute);
        None
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&BufferAttribute> {
        self.slots.get(name).map(|&slot| &self.values[slot])
    }

    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut BufferAttribute> {
        self.slots.get(name).map(|&slot| &mut self.values[slot])
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Remove an attribute, keeping the relative order of the rest
    pub fn remove(&mut self, name: &str) -> Option<BufferAttribute> {
        let slot = self.slots.remove(name)?;
        self.names.remove(slot);
        let removed = self.values.remove(slot);
        for s in self.slots.values_mut() {
            if *s > slot {
                *s -= 1;
            }
        }
        Some(removed)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// `(name, attribute)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BufferAttribute)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Mutable pairs in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut BufferAttribute)> {
        self.names.iter().map(String::as_str).zip(self.values.iter_mut())
    }

    /// Parallel slices of names and attributes, for bulk passes
    pub(crate) fn as_mut_slices(&mut self) -> (&[String], &mut [BufferAttribute]) {
        (&self.names, &mut self.values)
    }
}
