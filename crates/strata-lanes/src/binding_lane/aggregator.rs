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

//! Merges shader binding declarations from several stages into one view.

use super::error::ResolutionError;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use strata_core::renderer::{ShaderBindingKind, ShaderModuleBindingSet, ShaderStageFlags};

/// One slot of an aggregated binding set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregatedSlot {
    /// The slot index within the set.
    pub binding: u32,
    /// The name used for registry lookup. When stages disagree, the lexicographically
    /// smallest of their names.
    pub name: String,
    /// The first known kind declared for the slot, or `Unknown` if none was.
    pub kind: ShaderBindingKind,
    /// Every stage that declares the slot.
    pub stages: ShaderStageFlags,
}

/// The merged slots of one binding set, keyed by slot index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregatedSet {
    index: u32,
    slots: BTreeMap<u32, AggregatedSlot>,
}

impl AggregatedSet {
    /// Returns the set index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Iterates over the slots in ascending slot order.
    pub fn slots(&self) -> impl Iterator<Item = &AggregatedSlot> {
        self.slots.values()
    }

    /// Returns the slot at `binding`.
    pub fn slot(&self, binding: u32) -> Option<&AggregatedSlot> {
        self.slots.get(&binding)
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the set has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Every binding set declared by a group of shader modules, keyed by set index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedBindings {
    sets: BTreeMap<u32, AggregatedSet>,
}

impl AggregatedBindings {
    /// Iterates over the sets in ascending set order.
    pub fn sets(&self) -> impl Iterator<Item = &AggregatedSet> {
        self.sets.values()
    }

    /// Returns the set with index `index`.
    pub fn set(&self, index: u32) -> Option<&AggregatedSet> {
        self.sets.get(&index)
    }

    /// Iterates over the declared set indices in ascending order.
    pub fn set_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.sets.keys().copied()
    }

    /// Returns the highest declared set index.
    pub fn max_set_index(&self) -> Option<u32> {
        self.sets.keys().next_back().copied()
    }

    /// Returns the number of declared sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if no set declares any binding.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Returns a copy restricted to the sets for which `keep` returns `true`.
    pub fn filtered(&self, mut keep: impl FnMut(u32) -> bool) -> AggregatedBindings {
        AggregatedBindings {
            sets: self
                .sets
                .iter()
                .filter(|(index, _)| keep(**index))
                .map(|(index, set)| (*index, set.clone()))
                .collect(),
        }
    }
}

/// Merges the declarations of `modules` into one per-set, per-slot view.
///
/// Stage masks of declarations sharing a `(set, slot)` are OR-ed together. A slot
/// declared `Unknown` by one stage adopts the kind declared by another; two different
/// known kinds on the same slot abort the whole call with
/// [`ResolutionError::KindConflict`]. Stages naming one slot differently are merged
/// under the lexicographically smallest name, so the result does not depend on the
/// order of `modules`. Empty binding sets contribute nothing.
pub fn aggregate_bindings(
    modules: &[ShaderModuleBindingSet<'_>],
) -> Result<AggregatedBindings, ResolutionError> {
    let mut sets: BTreeMap<u32, AggregatedSet> = BTreeMap::new();

    for module in modules {
        for set_info in &module.binding_sets {
            for info in set_info.bindings() {
                let set = sets
                    .entry(set_info.id())
                    .or_insert_with(|| AggregatedSet {
                        index: set_info.id(),
                        slots: BTreeMap::new(),
                    });

                match set.slots.entry(info.binding) {
                    Entry::Vacant(vacant) => {
                        vacant.insert(AggregatedSlot {
                            binding: info.binding,
                            name: info.name.clone(),
                            kind: info.kind,
                            stages: module.stages,
                        });
                    }
                    Entry::Occupied(mut occupied) => {
                        let slot = occupied.get_mut();
                        if slot.kind.is_known() && info.kind.is_known() && slot.kind != info.kind
                        {
                            log::error!(
                                "Binding '{}' (set {}, binding {}) declared as both {} and {}",
                                info.name,
                                set_info.id(),
                                info.binding,
                                slot.kind,
                                info.kind
                            );
                            return Err(ResolutionError::KindConflict {
                                set: set_info.id(),
                                binding: info.binding,
                                name: info.name.clone(),
                                first: slot.kind,
                                second: info.kind,
                            });
                        }
                        if !slot.kind.is_known() {
                            slot.kind = info.kind;
                        }
                        if slot.name != info.name {
                            log::warn!(
                                "Set {} binding {} is named '{}' and '{}' by different stages; using '{}'",
                                set_info.id(),
                                info.binding,
                                slot.name,
                                info.name,
                                slot.name.as_str().min(info.name.as_str())
                            );
                            if info.name < slot.name {
                                slot.name = info.name.clone();
                            }
                        }
                        slot.stages |= module.stages;
                    }
                }
            }
        }
    }

    Ok(AggregatedBindings { sets })
}
