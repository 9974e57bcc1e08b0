// Copyright 2025 Classwatch Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Process-wide listener identity registry.
//!
//! Woven bytecode cannot hold an object reference to its listener; it holds
//! a small integer and looks the listener up at event time. This registry
//! hands out those integers: the same listener object always gets the same
//! id, distinct objects always get distinct ids, under concurrent
//! registration from any number of threads.
//!
//! Keys are object identity, not equality: the address of the listener's
//! allocation. The registry retains a clone of every `Arc` it has numbered,
//! so an address can never be recycled for a different listener while the
//! registry is alive. There is no eviction; listeners are few and ids are
//! cheap.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, OnceLock};

use classwatch_core::EventListener;
use dashmap::DashMap;

static GLOBAL: OnceLock<ObjectIdRegistry> = OnceLock::new();

pub struct ObjectIdRegistry {
    ids: DashMap<usize, i32>,
    listeners: DashMap<i32, Arc<dyn EventListener>>,
    sequence: AtomicI32,
}

impl Default for ObjectIdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectIdRegistry {
    pub fn new() -> Self {
        Self {
            ids: DashMap::new(),
            listeners: DashMap::new(),
            sequence: AtomicI32::new(0),
        }
    }

    /// The process-wide registry used by default at registration time.
    pub fn global() -> &'static ObjectIdRegistry {
        GLOBAL.get_or_init(ObjectIdRegistry::new)
    }

    /// Stable id for a listener object, allocated on first sight.
    ///
    /// Idempotent and race-free: concurrent first lookups of the same
    /// object resolve to a single allocation, because the insert runs under
    /// the map's shard lock.
    pub fn identity(&self, listener: &Arc<dyn EventListener>) -> i32 {
        let key = Arc::as_ptr(listener) as *const () as usize;
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = *self
            .ids
            .entry(key)
            .or_insert_with(|| self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        self.listeners.entry(id).or_insert_with(|| Arc::clone(listener));
        id
    }

    /// Reverse lookup used by event dispatch layers.
    pub fn listener_of(&self, id: i32) -> Option<Arc<dyn EventListener>> {
        self.listeners.get(&id).map(|entry| Arc::clone(&entry))
    }

    /// Number of distinct listeners seen so far.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
