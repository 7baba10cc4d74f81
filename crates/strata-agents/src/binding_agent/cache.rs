// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Caches environment descriptors so pipelines sharing a layout share the descriptor.

use ahash::AHashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strata_lanes::binding_lane::{
    AggregatedSet, BindingSetDescriptor, ResolutionError, SetResolution,
};

type CachedSets = AHashMap<EnvironmentSetKey, Option<Arc<BindingSetDescriptor>>>;

/// Identifies one environment resolution: the aggregated set layout and the shape of
/// the registry it was resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvironmentSetKey {
    /// The aggregated set, including slot names, kinds and stage masks.
    pub layout: AggregatedSet,
    /// The registry's shape generation at resolution time.
    pub shape_generation: u64,
}

/// A thread-safe cache of environment resolutions.
///
/// Foreign results are cached as `None` so repeated misses skip the registry lookups.
/// Entries from an older shape generation are evicted the first time a newer
/// generation misses.
#[derive(Debug, Default)]
pub struct EnvironmentSetCache {
    entries: Mutex<CachedSets>,
}

impl EnvironmentSetCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached resolution for `key`, running `resolve` on a miss.
    ///
    /// `resolve` runs without the cache lock held. Errors are not cached.
    pub fn get_or_resolve(
        &self,
        key: EnvironmentSetKey,
        resolve: impl FnOnce(&AggregatedSet) -> Result<SetResolution, ResolutionError>,
    ) -> Result<Option<Arc<BindingSetDescriptor>>, ResolutionError> {
        if let Some(hit) = self.lock().get(&key) {
            log::trace!("Environment set {} served from cache", key.layout.index());
            return Ok(hit.clone());
        }

        let resolved = match resolve(&key.layout)? {
            SetResolution::Resolved(descriptor) => Some(Arc::new(descriptor)),
            SetResolution::Foreign => None,
        };

        let mut entries = self.lock();
        let generation = key.shape_generation;
        entries.retain(|existing, _| existing.shape_generation == generation);
        Ok(entries.entry(key).or_insert(resolved).clone())
    }

    /// Returns the number of cached resolutions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every cached resolution.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, CachedSets> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
