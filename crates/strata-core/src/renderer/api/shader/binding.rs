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

//! Binding declarations extracted from compiled shader modules.

use super::ShaderModuleBinary;
use crate::renderer::api::util::ShaderStageFlags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of resource a shader binding expects.
///
/// The kind drives which registry lookup is used to resolve the binding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum ShaderBindingKind {
    /// A uniform / constant buffer.
    ConstantBuffer,
    /// A read-only or read-write structured (storage) buffer.
    StructuredBuffer,
    /// A combined texture and sampler.
    TextureSampler,
    /// A texture view bound without a sampler.
    TextureView,
    /// A variable-length array of texture views.
    BindlessArray,
    /// Reflection could not determine the resource category.
    #[default]
    Unknown,
}

impl ShaderBindingKind {
    /// Every kind a binding can actually resolve to, in lookup order.
    pub const CONCRETE: [ShaderBindingKind; 5] = [
        ShaderBindingKind::ConstantBuffer,
        ShaderBindingKind::StructuredBuffer,
        ShaderBindingKind::TextureSampler,
        ShaderBindingKind::TextureView,
        ShaderBindingKind::BindlessArray,
    ];

    /// Returns `false` only for [`ShaderBindingKind::Unknown`].
    pub const fn is_known(self) -> bool {
        !matches!(self, ShaderBindingKind::Unknown)
    }
}

impl fmt::Display for ShaderBindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderBindingKind::ConstantBuffer => "constant buffer",
            ShaderBindingKind::StructuredBuffer => "structured buffer",
            ShaderBindingKind::TextureSampler => "texture sampler",
            ShaderBindingKind::TextureView => "texture view",
            ShaderBindingKind::BindlessArray => "bindless array",
            ShaderBindingKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One declared binding inside a compiled shader module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShaderBindingInfo {
    /// Identifier used for registry lookup.
    pub name: String,
    /// The binding set index.
    pub set: u32,
    /// The slot index within the set.
    pub binding: u32,
    /// The resource category.
    #[serde(default)]
    pub kind: ShaderBindingKind,
}

impl ShaderBindingInfo {
    /// Creates a new binding declaration.
    pub fn new(name: impl Into<String>, set: u32, binding: u32, kind: ShaderBindingKind) -> Self {
        Self {
            name: name.into(),
            set,
            binding,
            kind,
        }
    }
}

/// The ordered bindings a module declares for one binding set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderBindingSetInfo {
    id: u32,
    bindings: Vec<ShaderBindingInfo>,
}

impl ShaderBindingSetInfo {
    /// Creates an empty binding set with the given set index.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            bindings: Vec::new(),
        }
    }

    /// Creates a binding set from already validated declarations.
    pub(crate) fn from_bindings(id: u32, bindings: Vec<ShaderBindingInfo>) -> Self {
        Self { id, bindings }
    }

    /// Returns the set index.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the declared bindings in declaration order.
    pub fn bindings(&self) -> &[ShaderBindingInfo] {
        &self.bindings
    }

    /// Returns the number of declared bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if the set declares no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Finds the declaration occupying `slot`, if any.
    pub fn find_slot(&self, slot: u32) -> Option<&ShaderBindingInfo> {
        self.bindings.iter().find(|info| info.binding == slot)
    }
}

/// The binding sets of one shader module together with the stages they are visible in.
///
/// Created transiently by callers to describe one input to the binding aggregator.
#[derive(Debug, Clone)]
pub struct ShaderModuleBindingSet<'a> {
    /// The declared binding sets.
    pub binding_sets: Vec<&'a ShaderBindingSetInfo>,
    /// The stages in which these sets are visible.
    pub stages: ShaderStageFlags,
}

impl<'a> ShaderModuleBindingSet<'a> {
    /// Pairs a list of binding sets with a stage mask.
    pub fn new(binding_sets: Vec<&'a ShaderBindingSetInfo>, stages: ShaderStageFlags) -> Self {
        Self {
            binding_sets,
            stages,
        }
    }

    /// Describes every binding set of `module`, visible in the module's own stages.
    pub fn from_module(module: &'a dyn ShaderModuleBinary) -> Self {
        let binding_sets = (0..module.binding_set_count())
            .filter_map(|index| module.binding_set(index))
            .collect();
        Self::new(binding_sets, module.shader_stages())
    }

    /// Iterates over every declared binding across all sets.
    pub fn bindings(&self) -> impl Iterator<Item = &'a ShaderBindingInfo> + '_ {
        self.binding_sets
            .iter()
            .copied()
            .flat_map(|set| set.bindings().iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_slot_matches_declared_binding() {
        let set = ShaderBindingSetInfo::from_bindings(
            1,
            vec![
                ShaderBindingInfo::new("albedo", 1, 3, ShaderBindingKind::TextureSampler),
                ShaderBindingInfo::new("material", 1, 0, ShaderBindingKind::ConstantBuffer),
            ],
        );

        assert_eq!(set.id(), 1);
        assert_eq!(set.len(), 2);
        assert_eq!(set.find_slot(0).map(|b| b.name.as_str()), Some("material"));
        assert!(set.find_slot(2).is_none());
    }

    #[test]
    fn unknown_is_the_only_unknown_kind() {
        assert!(!ShaderBindingKind::Unknown.is_known());
        assert!(ShaderBindingKind::CONCRETE.iter().all(|kind| kind.is_known()));
        assert_eq!(ShaderBindingKind::default(), ShaderBindingKind::Unknown);
    }
}
