// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-read identity map.

use std::{
    any::TypeId,
    collections::{HashMap, hash_map::Entry},
    fmt,
    sync::Arc
};

use crate::{accessor::SharedEntity, info::Entity, value::Value};

/// Related objects already materialized in the current read pass.
///
/// Keyed by entity type and primary key values. One cache belongs to one
/// read pass; it is not shared between threads.
#[derive(Default)]
pub struct IdentityCache {
    entries: HashMap<(TypeId, Vec<Value>), SharedEntity>,
    hits:    usize
}

impl IdentityCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached object for `key`, or cache and return `fresh`.
    pub fn get_or_insert(&mut self, type_id: TypeId, key: Vec<Value>, fresh: SharedEntity) -> SharedEntity {
        match self.entries.entry((type_id, key)) {
            Entry::Occupied(existing) => {
                self.hits += 1;
                Arc::clone(existing.get())
            }
            Entry::Vacant(slot) => Arc::clone(slot.insert(fresh))
        }
    }

    /// Cached object of type `T` with primary key `key`.
    ///
    /// The materializer stores integer key components as [`Value::I64`].
    pub fn get<T: Entity>(&self, key: &[Value]) -> Option<Arc<T>> {
        let shared = self.entries.get(&(TypeId::of::<T>(), key.to_vec()))?;
        Arc::clone(shared).downcast::<T>().ok()
    }

    /// Number of cached objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups that reused a cached object.
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// Forget every cached object.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
    }
}

impl fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("entries", &self.entries.len())
            .field("hits", &self.hits)
            .finish()
    }
}
