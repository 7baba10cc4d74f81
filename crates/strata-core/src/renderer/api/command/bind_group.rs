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

//! Defines data structures for bind groups and bind group layouts.
//!
//! Bind groups are the mechanism for binding resources (buffers, textures, samplers)
//! to shaders in a pipeline. They provide an abstraction over the different binding
//! models of various graphics APIs (descriptor sets in Vulkan, bind groups in WebGPU).

use crate::renderer::api::{
    resource::{BufferId, TextureSampler, TextureViewId},
    shader::ShaderBindingKind,
    util::flags::ShaderStageFlags,
};

/// An opaque handle to a bind group layout resource.
///
/// A bind group layout describes the structure and types of resources
/// that will be bound to a shader, without specifying the actual resources themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupLayoutId(pub usize);

/// An opaque handle to a bind group resource.
///
/// A bind group represents the actual bound resources (buffers, textures, etc.)
/// that match a specific bind group layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupId(pub usize);

/// Describes the type of buffer binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferBindingType {
    /// A uniform buffer.
    Uniform,
    /// A storage buffer.
    Storage,
}

/// The type of resource bound at a binding point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// A buffer binding (uniform or storage).
    Buffer {
        /// The type of buffer binding.
        ty: BufferBindingType,
    },
    /// A texture sampled through its own sampler.
    CombinedTextureSampler,
    /// A texture view without a sampler.
    Texture,
    /// A variable-length array of texture views.
    TextureArray,
}

impl BindingType {
    /// Maps a resolved binding kind to the layout type the device expects.
    ///
    /// Returns `None` for [`ShaderBindingKind::Unknown`].
    pub const fn from_kind(kind: ShaderBindingKind) -> Option<Self> {
        match kind {
            ShaderBindingKind::ConstantBuffer => Some(BindingType::Buffer {
                ty: BufferBindingType::Uniform,
            }),
            ShaderBindingKind::StructuredBuffer => Some(BindingType::Buffer {
                ty: BufferBindingType::Storage,
            }),
            ShaderBindingKind::TextureSampler => Some(BindingType::CombinedTextureSampler),
            ShaderBindingKind::TextureView => Some(BindingType::Texture),
            ShaderBindingKind::BindlessArray => Some(BindingType::TextureArray),
            ShaderBindingKind::Unknown => None,
        }
    }
}

/// Describes a single binding entry in a bind group layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupLayoutEntry {
    /// The binding index (e.g., `@binding(0)` in WGSL).
    pub binding: u32,
    /// Which shader stages can access this binding.
    pub visibility: ShaderStageFlags,
    /// The type of resource being bound.
    pub ty: BindingType,
}

/// Describes a bind group layout to be created.
#[derive(Debug, Clone)]
pub struct BindGroupLayoutDescriptor<'a> {
    /// Optional debug label.
    pub label: Option<&'a str>,
    /// The entries in this bind group layout.
    pub entries: &'a [BindGroupLayoutEntry],
}

/// Describes a single resource binding in a bind group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingResource {
    /// Binds a whole buffer.
    Buffer(BufferId),
    /// Binds a texture view together with its sampler.
    TextureSampler(TextureSampler),
    /// Binds a texture view.
    TextureView(TextureViewId),
    /// Binds an array of texture views.
    TextureViewArray(Vec<TextureViewId>),
}

/// A single entry in a bind group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindGroupEntry {
    /// The binding index.
    pub binding: u32,
    /// The resource to bind.
    pub resource: BindingResource,
}

/// Describes a bind group to be created.
#[derive(Debug, Clone)]
pub struct BindGroupDescriptor<'a> {
    /// Optional debug label.
    pub label: Option<&'a str>,
    /// The layout this bind group conforms to.
    pub layout: BindGroupLayoutId,
    /// The resources to bind at each binding point.
    pub entries: &'a [BindGroupEntry],
}
