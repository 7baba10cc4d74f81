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

//! Reflected shader modules and their RON manifests.

use super::{
    ShaderBindingInfo, ShaderBindingKind, ShaderBindingSetInfo, ShaderModuleBinary,
    ShaderModuleId,
};
use crate::renderer::api::util::{ShaderStage, ShaderStageFlags};
use crate::renderer::error::ShaderError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// On-disk layout of a reflection manifest.
#[derive(Debug, Deserialize)]
struct ReflectionManifest {
    #[serde(default)]
    label: String,
    stages: Vec<ShaderStage>,
    #[serde(default)]
    bindings: Vec<ShaderBindingInfo>,
}

/// A shader module described purely by its reflected binding data.
///
/// Binding sets are stored in ascending set order; bindings inside a set keep their
/// declaration order. Construction guarantees that every `(set, binding)` pair is
/// unique and that every binding has a name.
#[derive(Debug, Clone)]
pub struct ReflectedShaderModule {
    id: ShaderModuleId,
    label: String,
    stages: ShaderStageFlags,
    binding_sets: Vec<ShaderBindingSetInfo>,
}

impl ReflectedShaderModule {
    /// Starts building a module visible in `stages`.
    pub fn builder(
        id: ShaderModuleId,
        stages: impl Into<ShaderStageFlags>,
    ) -> ReflectedShaderModuleBuilder {
        ReflectedShaderModuleBuilder {
            id,
            label: String::new(),
            stages: stages.into(),
            bindings: Vec::new(),
        }
    }

    /// Parses a module from a RON reflection manifest.
    ///
    /// ```
    /// use strata_core::renderer::{ReflectedShaderModule, ShaderModuleBinary, ShaderModuleId};
    ///
    /// let module = ReflectedShaderModule::from_ron_str(
    ///     ShaderModuleId(0),
    ///     r#"(
    ///         label: "unlit.frag",
    ///         stages: [Fragment],
    ///         bindings: [
    ///             (name: "albedoTexture", set: 1, binding: 3, kind: TextureSampler),
    ///         ],
    ///     )"#,
    /// )
    /// .unwrap();
    /// assert_eq!(module.binding_set_count(), 1);
    /// ```
    pub fn from_ron_str(id: ShaderModuleId, source: &str) -> Result<Self, ShaderError> {
        let manifest: ReflectionManifest =
            ron::from_str(source).map_err(|err| ShaderError::ParseError {
                label: format!("{id:?}"),
                details: err.to_string(),
            })?;

        let stages = manifest
            .stages
            .into_iter()
            .fold(ShaderStageFlags::NONE, |acc, stage| acc | stage.into());

        ReflectedShaderModuleBuilder {
            id,
            label: manifest.label,
            stages,
            bindings: manifest.bindings,
        }
        .build()
    }

    /// Returns every binding set in ascending set order.
    pub fn binding_sets(&self) -> &[ShaderBindingSetInfo] {
        &self.binding_sets
    }

    /// Finds the binding set with set index `set`.
    pub fn find_set(&self, set: u32) -> Option<&ShaderBindingSetInfo> {
        self.binding_sets.iter().find(|info| info.id() == set)
    }
}

impl ShaderModuleBinary for ReflectedShaderModule {
    fn id(&self) -> ShaderModuleId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn binding_set_count(&self) -> usize {
        self.binding_sets.len()
    }

    fn binding_set(&self, index: usize) -> Option<&ShaderBindingSetInfo> {
        self.binding_sets.get(index)
    }

    fn shader_stages(&self) -> ShaderStageFlags {
        self.stages
    }
}

/// Builder for [`ReflectedShaderModule`].
#[derive(Debug, Clone)]
pub struct ReflectedShaderModuleBuilder {
    id: ShaderModuleId,
    label: String,
    stages: ShaderStageFlags,
    bindings: Vec<ShaderBindingInfo>,
}

impl ReflectedShaderModuleBuilder {
    /// Sets the diagnostic label of the module.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Declares one binding.
    pub fn binding(
        mut self,
        name: impl Into<String>,
        set: u32,
        binding: u32,
        kind: ShaderBindingKind,
    ) -> Self {
        self.bindings.push(ShaderBindingInfo::new(name, set, binding, kind));
        self
    }

    /// Validates the declarations and produces the module.
    pub fn build(self) -> Result<ReflectedShaderModule, ShaderError> {
        let mut seen = HashSet::with_capacity(self.bindings.len());
        let mut sets: BTreeMap<u32, Vec<ShaderBindingInfo>> = BTreeMap::new();

        for info in self.bindings {
            if info.name.is_empty() {
                return Err(ShaderError::UnnamedBinding {
                    module: self.id,
                    set: info.set,
                    binding: info.binding,
                });
            }
            if !seen.insert((info.set, info.binding)) {
                return Err(ShaderError::DuplicateBinding {
                    module: self.id,
                    set: info.set,
                    binding: info.binding,
                });
            }
            sets.entry(info.set).or_default().push(info);
        }

        let binding_sets: Vec<ShaderBindingSetInfo> = sets
            .into_iter()
            .map(|(id, bindings)| ShaderBindingSetInfo::from_bindings(id, bindings))
            .collect();

        log::trace!(
            "Reflected shader module {:?} ('{}'): {} binding set(s), stages {}",
            self.id,
            self.label,
            binding_sets.len(),
            self.stages
        );

        Ok(ReflectedShaderModule {
            id: self.id,
            label: self.label,
            stages: self.stages,
            binding_sets,
        })
    }
}
