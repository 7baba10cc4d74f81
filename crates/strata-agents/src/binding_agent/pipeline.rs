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

//! Pipeline shader inputs and the merged bindings built from them.

use super::error::PipelineBindingError;
use std::sync::Arc;
use strata_core::renderer::{
    BindGroupDescriptor, BindGroupId, BindGroupLayoutDescriptor, BindGroupLayoutId,
    BindingDevice, BindingSettings, PipelineLayoutDescriptor, PipelineLayoutId, ResourceError,
    ShaderModuleBinary, ShaderStage,
};
use strata_lanes::binding_lane::BindingSetDescriptor;

/// The shader modules a pipeline is built from.
#[derive(Debug, Clone)]
pub enum PipelineShaders {
    /// A rasterization pipeline.
    Graphics {
        /// The vertex module. Always required.
        vertex: Option<Arc<dyn ShaderModuleBinary>>,
        /// The fragment module. Required unless `require_fragment_stage` is off.
        fragment: Option<Arc<dyn ShaderModuleBinary>>,
    },
    /// A compute pipeline.
    Compute {
        /// The compute module.
        compute: Option<Arc<dyn ShaderModuleBinary>>,
    },
}

impl PipelineShaders {
    /// A graphics pipeline with both stages present.
    pub fn graphics(
        vertex: Arc<dyn ShaderModuleBinary>,
        fragment: Arc<dyn ShaderModuleBinary>,
    ) -> Self {
        PipelineShaders::Graphics {
            vertex: Some(vertex),
            fragment: Some(fragment),
        }
    }

    /// A compute pipeline.
    pub fn compute(compute: Arc<dyn ShaderModuleBinary>) -> Self {
        PipelineShaders::Compute {
            compute: Some(compute),
        }
    }

    /// Returns the modules to aggregate, checking the stages the pipeline kind requires.
    ///
    /// ## Errors
    ///
    /// * `PipelineBindingError::MissingShaderStage` - If a required module is absent.
    pub fn modules(
        &self,
        settings: &BindingSettings,
    ) -> Result<Vec<&dyn ShaderModuleBinary>, PipelineBindingError> {
        match self {
            PipelineShaders::Graphics { vertex, fragment } => {
                let vertex = vertex.as_deref().ok_or(PipelineBindingError::MissingShaderStage {
                    stage: ShaderStage::Vertex,
                })?;
                match fragment.as_deref() {
                    Some(fragment) => Ok(vec![vertex, fragment]),
                    None if settings.require_fragment_stage => {
                        Err(PipelineBindingError::MissingShaderStage {
                            stage: ShaderStage::Fragment,
                        })
                    }
                    None => Ok(vec![vertex]),
                }
            }
            PipelineShaders::Compute { compute } => compute
                .as_deref()
                .map(|compute| vec![compute])
                .ok_or(PipelineBindingError::MissingShaderStage {
                    stage: ShaderStage::Compute,
                }),
        }
    }
}

/// Which layer supplied a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingSetSource {
    /// The environment registry, shared by every pipeline of the environment.
    Environment,
    /// The object's own registry.
    Object,
}

/// One resolved set of a pipeline.
#[derive(Debug, Clone)]
pub struct ResolvedSet {
    /// The set index.
    pub set: u32,
    /// The layer that resolved the set.
    pub source: BindingSetSource,
    /// The resolved descriptor.
    pub descriptor: Arc<BindingSetDescriptor>,
}

/// The device objects backing a pipeline's layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineBindingLayout {
    /// One bind group layout per set index, gaps included.
    pub bind_group_layouts: Vec<BindGroupLayoutId>,
    /// The pipeline layout built from `bind_group_layouts`.
    pub pipeline_layout: PipelineLayoutId,
}

/// Every binding set of one pipeline, indexed by set number.
///
/// Set indices the shaders never declare are `None`.
#[derive(Debug, Clone, Default)]
pub struct PipelineBindings {
    label: String,
    sets: Vec<Option<ResolvedSet>>,
}

impl PipelineBindings {
    pub(crate) fn new(label: impl Into<String>, sets: Vec<Option<ResolvedSet>>) -> Self {
        Self {
            label: label.into(),
            sets,
        }
    }

    /// Returns the diagnostic label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the sets, indexed by set number.
    pub fn sets(&self) -> &[Option<ResolvedSet>] {
        &self.sets
    }

    /// Returns the set with index `set`, if the shaders declare it.
    pub fn set(&self, set: u32) -> Option<&ResolvedSet> {
        self.sets.get(set as usize).and_then(Option::as_ref)
    }

    /// Returns the length of the set array, gaps included.
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    /// Returns the number of declared sets.
    pub fn resolved_count(&self) -> usize {
        self.sets.iter().flatten().count()
    }

    /// Iterates over the declared sets supplied by `source`.
    pub fn sets_from(&self, source: BindingSetSource) -> impl Iterator<Item = &ResolvedSet> {
        self.sets
            .iter()
            .flatten()
            .filter(move |resolved| resolved.source == source)
    }

    /// Creates one bind group layout per set index and the pipeline layout.
    ///
    /// Gaps get an empty bind group layout so set numbers stay aligned.
    ///
    /// ## Errors
    ///
    /// * `PipelineBindingError::Device` - If the device rejects a layout.
    pub fn create_layout(
        &self,
        device: &dyn BindingDevice,
    ) -> Result<PipelineBindingLayout, PipelineBindingError> {
        let mut bind_group_layouts = Vec::with_capacity(self.sets.len());
        for (index, set) in self.sets.iter().enumerate() {
            let entries = set
                .as_ref()
                .map(|resolved| resolved.descriptor.layout_entries())
                .unwrap_or_default();
            let label = format!("{} set {}", self.label, index);
            let layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some(&label),
                entries: &entries,
            })?;
            bind_group_layouts.push(layout);
        }

        let descriptor = PipelineLayoutDescriptor::for_sets(&self.label, &bind_group_layouts);
        let pipeline_layout = device.create_pipeline_layout(&descriptor)?;

        log::debug!(
            "Created pipeline layout for '{}' with {} bind group layout(s)",
            self.label,
            bind_group_layouts.len()
        );
        Ok(PipelineBindingLayout {
            bind_group_layouts,
            pipeline_layout,
        })
    }

    /// Creates bind groups from the values the holders currently contain.
    ///
    /// Call again whenever a holder's value is swapped. Gaps yield `None`.
    ///
    /// ## Errors
    ///
    /// * `PipelineBindingError::Device` - If the device rejects a bind group, or if
    ///   `layout` was not created for these bindings.
    pub fn create_bind_groups(
        &self,
        device: &dyn BindingDevice,
        layout: &PipelineBindingLayout,
    ) -> Result<Vec<Option<BindGroupId>>, PipelineBindingError> {
        if layout.bind_group_layouts.len() != self.sets.len() {
            return Err(ResourceError::InvalidHandle.into());
        }

        self.sets
            .iter()
            .zip(&layout.bind_group_layouts)
            .map(|(set, bind_group_layout)| {
                let Some(resolved) = set else {
                    return Ok(None);
                };
                let entries = resolved.descriptor.bind_group_entries();
                let label = format!("{} set {}", self.label, resolved.set);
                let group = device.create_bind_group(&BindGroupDescriptor {
                    label: Some(&label),
                    layout: *bind_group_layout,
                    entries: &entries,
                })?;
                Ok(Some(group))
            })
            .collect()
    }
}
