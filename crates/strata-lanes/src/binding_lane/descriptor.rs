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

//! The resolved, read-only view of one binding set.

use std::sync::Arc;
use strata_core::renderer::{
    BindGroupEntry, BindGroupLayoutEntry, BindingType, BindlessArray, BindlessArrayBinding,
    BufferId, ConstantBufferBinding, NamedBinding, ResolvedBinding, ShaderBindingKind,
    ShaderStageFlags, StructuredBufferBinding, TextureSampler, TextureSamplerBinding,
    TextureViewBinding, TextureViewId,
};

/// The shape of one resolved slot: where it lives and which stages see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingSlotInfo {
    /// The slot index within the set.
    pub binding: u32,
    /// The union of the stages declaring the slot.
    pub stages: ShaderStageFlags,
}

#[derive(Debug)]
struct BoundSlot<T> {
    info: BindingSlotInfo,
    handle: Arc<NamedBinding<T>>,
}

// Derived `Clone` would require `T: Clone`.
impl<T> Clone for BoundSlot<T> {
    fn clone(&self) -> Self {
        Self {
            info: self.info,
            handle: Arc::clone(&self.handle),
        }
    }
}

/// One fully resolved binding set.
///
/// Every slot of the aggregated set appears exactly once, in the list matching the
/// kind of the holder that resolved it. Lists are ordered by slot index. The
/// descriptor holds the registry's [`NamedBinding`] holders themselves, so values
/// swapped into a holder after resolution are seen by every later read.
#[derive(Debug, Clone, Default)]
pub struct BindingSetDescriptor {
    constant_buffers: Vec<BoundSlot<BufferId>>,
    structured_buffers: Vec<BoundSlot<BufferId>>,
    texture_samplers: Vec<BoundSlot<TextureSampler>>,
    texture_views: Vec<BoundSlot<TextureViewId>>,
    bindless_arrays: Vec<BoundSlot<BindlessArray>>,
}

impl BindingSetDescriptor {
    /// Builds a descriptor from resolved `(slot, holder)` pairs.
    pub(crate) fn from_resolved(
        resolved: impl IntoIterator<Item = (BindingSlotInfo, ResolvedBinding)>,
    ) -> Self {
        let mut descriptor = Self::default();
        for (info, binding) in resolved {
            match binding {
                ResolvedBinding::ConstantBuffer(handle) => {
                    descriptor.constant_buffers.push(BoundSlot { info, handle })
                }
                ResolvedBinding::StructuredBuffer(handle) => {
                    descriptor.structured_buffers.push(BoundSlot { info, handle })
                }
                ResolvedBinding::TextureSampler(handle) => {
                    descriptor.texture_samplers.push(BoundSlot { info, handle })
                }
                ResolvedBinding::TextureView(handle) => {
                    descriptor.texture_views.push(BoundSlot { info, handle })
                }
                ResolvedBinding::BindlessArray(handle) => {
                    descriptor.bindless_arrays.push(BoundSlot { info, handle })
                }
            }
        }
        descriptor.constant_buffers.sort_by_key(|slot| slot.info.binding);
        descriptor.structured_buffers.sort_by_key(|slot| slot.info.binding);
        descriptor.texture_samplers.sort_by_key(|slot| slot.info.binding);
        descriptor.texture_views.sort_by_key(|slot| slot.info.binding);
        descriptor.bindless_arrays.sort_by_key(|slot| slot.info.binding);
        descriptor
    }

    /// Returns the number of slots resolved as `kind`.
    ///
    /// Always `0` for [`ShaderBindingKind::Unknown`]: unknown slots are filed under
    /// the kind of the holder that resolved them.
    pub fn binding_count(&self, kind: ShaderBindingKind) -> usize {
        match kind {
            ShaderBindingKind::ConstantBuffer => self.constant_buffers.len(),
            ShaderBindingKind::StructuredBuffer => self.structured_buffers.len(),
            ShaderBindingKind::TextureSampler => self.texture_samplers.len(),
            ShaderBindingKind::TextureView => self.texture_views.len(),
            ShaderBindingKind::BindlessArray => self.bindless_arrays.len(),
            ShaderBindingKind::Unknown => 0,
        }
    }

    /// Returns the total number of slots in the set.
    pub fn total_binding_count(&self) -> usize {
        ShaderBindingKind::CONCRETE
            .iter()
            .map(|kind| self.binding_count(*kind))
            .sum()
    }

    /// Returns the slot shape of the `index`-th binding of `kind`.
    pub fn binding_info(&self, kind: ShaderBindingKind, index: usize) -> Option<BindingSlotInfo> {
        match kind {
            ShaderBindingKind::ConstantBuffer => self.constant_buffers.get(index).map(|s| s.info),
            ShaderBindingKind::StructuredBuffer => {
                self.structured_buffers.get(index).map(|s| s.info)
            }
            ShaderBindingKind::TextureSampler => self.texture_samplers.get(index).map(|s| s.info),
            ShaderBindingKind::TextureView => self.texture_views.get(index).map(|s| s.info),
            ShaderBindingKind::BindlessArray => self.bindless_arrays.get(index).map(|s| s.info),
            ShaderBindingKind::Unknown => None,
        }
    }

    /// Returns the live holder of the `index`-th binding of `kind`.
    pub fn resolved_handle(
        &self,
        kind: ShaderBindingKind,
        index: usize,
    ) -> Option<ResolvedBinding> {
        match kind {
            ShaderBindingKind::ConstantBuffer => self
                .constant_buffers
                .get(index)
                .map(|s| ResolvedBinding::ConstantBuffer(Arc::clone(&s.handle))),
            ShaderBindingKind::StructuredBuffer => self
                .structured_buffers
                .get(index)
                .map(|s| ResolvedBinding::StructuredBuffer(Arc::clone(&s.handle))),
            ShaderBindingKind::TextureSampler => self
                .texture_samplers
                .get(index)
                .map(|s| ResolvedBinding::TextureSampler(Arc::clone(&s.handle))),
            ShaderBindingKind::TextureView => self
                .texture_views
                .get(index)
                .map(|s| ResolvedBinding::TextureView(Arc::clone(&s.handle))),
            ShaderBindingKind::BindlessArray => self
                .bindless_arrays
                .get(index)
                .map(|s| ResolvedBinding::BindlessArray(Arc::clone(&s.handle))),
            ShaderBindingKind::Unknown => None,
        }
    }

    /// Returns the `index`-th constant buffer holder.
    pub fn constant_buffer(&self, index: usize) -> Option<&Arc<ConstantBufferBinding>> {
        self.constant_buffers.get(index).map(|s| &s.handle)
    }

    /// Returns the `index`-th structured buffer holder.
    pub fn structured_buffer(&self, index: usize) -> Option<&Arc<StructuredBufferBinding>> {
        self.structured_buffers.get(index).map(|s| &s.handle)
    }

    /// Returns the `index`-th texture-sampler holder.
    pub fn texture_sampler(&self, index: usize) -> Option<&Arc<TextureSamplerBinding>> {
        self.texture_samplers.get(index).map(|s| &s.handle)
    }

    /// Returns the `index`-th texture view holder.
    pub fn texture_view(&self, index: usize) -> Option<&Arc<TextureViewBinding>> {
        self.texture_views.get(index).map(|s| &s.handle)
    }

    /// Returns the `index`-th bindless array holder.
    pub fn bindless_array(&self, index: usize) -> Option<&Arc<BindlessArrayBinding>> {
        self.bindless_arrays.get(index).map(|s| &s.handle)
    }

    /// Every slot of the set with its holder, ordered by slot index.
    pub fn entries(&self) -> Vec<(BindingSlotInfo, ResolvedBinding)> {
        let mut entries: Vec<_> = ShaderBindingKind::CONCRETE
            .iter()
            .flat_map(|kind| {
                (0..self.binding_count(*kind)).filter_map(move |index| {
                    Some((
                        self.binding_info(*kind, index)?,
                        self.resolved_handle(*kind, index)?,
                    ))
                })
            })
            .collect();
        entries.sort_by_key(|(info, _)| info.binding);
        entries
    }

    /// The layout entries a device needs to create a bind group layout for this set.
    pub fn layout_entries(&self) -> Vec<BindGroupLayoutEntry> {
        self.entries()
            .into_iter()
            .filter_map(|(info, binding)| {
                Some(BindGroupLayoutEntry {
                    binding: info.binding,
                    visibility: info.stages,
                    ty: BindingType::from_kind(binding.kind())?,
                })
            })
            .collect()
    }

    /// Snapshots the values currently held, for bind group creation.
    pub fn bind_group_entries(&self) -> Vec<BindGroupEntry> {
        self.entries()
            .into_iter()
            .map(|(info, binding)| BindGroupEntry {
                binding: info.binding,
                resource: binding.current_resource(),
            })
            .collect()
    }
}

/// A resolved descriptor paired with the set index it belongs to.
#[derive(Debug, Clone)]
pub struct BindingSetInfo {
    /// The binding set index.
    pub set: u32,
    /// The resolved descriptor, shareable across pipelines.
    pub descriptor: Arc<BindingSetDescriptor>,
}

impl BindingSetInfo {
    /// Pairs `descriptor` with `set`.
    pub fn new(set: u32, descriptor: impl Into<Arc<BindingSetDescriptor>>) -> Self {
        Self {
            set,
            descriptor: descriptor.into(),
        }
    }
}
