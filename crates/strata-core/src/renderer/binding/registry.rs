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

//! The lookup surface queried by the binding resolver.

use super::named::{
    BindlessArrayBinding, ConstantBufferBinding, StructuredBufferBinding, TextureSamplerBinding,
    TextureViewBinding,
};
use crate::renderer::api::command::BindingResource;
use crate::renderer::api::shader::ShaderBindingKind;
use std::sync::Arc;

/// The outcome of a successful registry lookup, tagged with the kind that matched.
#[derive(Debug, Clone)]
pub enum ResolvedBinding {
    /// A constant buffer holder.
    ConstantBuffer(Arc<ConstantBufferBinding>),
    /// A structured buffer holder.
    StructuredBuffer(Arc<StructuredBufferBinding>),
    /// A texture-sampler holder.
    TextureSampler(Arc<TextureSamplerBinding>),
    /// A texture view holder.
    TextureView(Arc<TextureViewBinding>),
    /// A bindless array holder.
    BindlessArray(Arc<BindlessArrayBinding>),
}

impl ResolvedBinding {
    /// Returns the kind of the holder.
    pub fn kind(&self) -> ShaderBindingKind {
        match self {
            ResolvedBinding::ConstantBuffer(_) => ShaderBindingKind::ConstantBuffer,
            ResolvedBinding::StructuredBuffer(_) => ShaderBindingKind::StructuredBuffer,
            ResolvedBinding::TextureSampler(_) => ShaderBindingKind::TextureSampler,
            ResolvedBinding::TextureView(_) => ShaderBindingKind::TextureView,
            ResolvedBinding::BindlessArray(_) => ShaderBindingKind::BindlessArray,
        }
    }

    /// Returns the registered name of the holder.
    pub fn name(&self) -> &str {
        match self {
            ResolvedBinding::ConstantBuffer(binding) => binding.name(),
            ResolvedBinding::StructuredBuffer(binding) => binding.name(),
            ResolvedBinding::TextureSampler(binding) => binding.name(),
            ResolvedBinding::TextureView(binding) => binding.name(),
            ResolvedBinding::BindlessArray(binding) => binding.name(),
        }
    }

    /// Reads the value currently held, ready to be written into a bind group.
    pub fn current_resource(&self) -> BindingResource {
        match self {
            ResolvedBinding::ConstantBuffer(binding)
            | ResolvedBinding::StructuredBuffer(binding) => BindingResource::Buffer(binding.get()),
            ResolvedBinding::TextureSampler(binding) => {
                BindingResource::TextureSampler(binding.get())
            }
            ResolvedBinding::TextureView(binding) => BindingResource::TextureView(binding.get()),
            ResolvedBinding::BindlessArray(binding) => {
                BindingResource::TextureViewArray(binding.with(|array| array.views.clone()))
            }
        }
    }
}

/// A lookup surface mapping resource names to live binding holders.
///
/// Registries are supplied by materials, scene objects and environments. The resolver
/// borrows them for the duration of one call and never mutates them. Implementations
/// must keep their *name set* stable while a resolution call is running; swapping the
/// value inside an existing holder is always allowed.
pub trait ResourceBindingRegistry: Send + Sync {
    /// Finds a constant buffer by name.
    fn find_constant_buffer(&self, name: &str) -> Option<Arc<ConstantBufferBinding>>;

    /// Finds a structured buffer by name.
    fn find_structured_buffer(&self, name: &str) -> Option<Arc<StructuredBufferBinding>>;

    /// Finds a combined texture-sampler by name.
    fn find_texture_sampler(&self, name: &str) -> Option<Arc<TextureSamplerBinding>>;

    /// Finds a texture view by name.
    fn find_texture_view(&self, _name: &str) -> Option<Arc<TextureViewBinding>> {
        None
    }

    /// Finds a bindless texture array by name.
    fn find_bindless_array(&self, _name: &str) -> Option<Arc<BindlessArrayBinding>> {
        None
    }

    /// A counter that changes whenever names are added to or removed from the registry.
    ///
    /// Cached resolutions built from this registry stay valid while the value is
    /// unchanged. `None` means the registry does not track its name set, and nothing
    /// resolved against it may be cached.
    fn shape_generation(&self) -> Option<u64> {
        None
    }

    /// Dispatches to the lookup matching `kind`.
    ///
    /// [`ShaderBindingKind::Unknown`] tries every concrete kind in
    /// [`ShaderBindingKind::CONCRETE`] order and returns the first hit.
    fn find(&self, kind: ShaderBindingKind, name: &str) -> Option<ResolvedBinding> {
        match kind {
            ShaderBindingKind::ConstantBuffer => self
                .find_constant_buffer(name)
                .map(ResolvedBinding::ConstantBuffer),
            ShaderBindingKind::StructuredBuffer => self
                .find_structured_buffer(name)
                .map(ResolvedBinding::StructuredBuffer),
            ShaderBindingKind::TextureSampler => self
                .find_texture_sampler(name)
                .map(ResolvedBinding::TextureSampler),
            ShaderBindingKind::TextureView => self
                .find_texture_view(name)
                .map(ResolvedBinding::TextureView),
            ShaderBindingKind::BindlessArray => self
                .find_bindless_array(name)
                .map(ResolvedBinding::BindlessArray),
            ShaderBindingKind::Unknown => ShaderBindingKind::CONCRETE
                .iter()
                .find_map(|concrete| self.find(*concrete, name)),
        }
    }
}

/// A registry that provides nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRegistry;

impl ResourceBindingRegistry for EmptyRegistry {
    fn find_constant_buffer(&self, _name: &str) -> Option<Arc<ConstantBufferBinding>> {
        None
    }

    fn find_structured_buffer(&self, _name: &str) -> Option<Arc<StructuredBufferBinding>> {
        None
    }

    fn find_texture_sampler(&self, _name: &str) -> Option<Arc<TextureSamplerBinding>> {
        None
    }

    fn shape_generation(&self) -> Option<u64> {
        Some(0)
    }
}
