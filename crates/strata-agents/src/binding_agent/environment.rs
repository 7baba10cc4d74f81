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

//! The environment/object split driver.

use super::cache::{EnvironmentSetCache, EnvironmentSetKey};
use super::error::PipelineBindingError;
use super::pipeline::{BindingSetSource, PipelineBindings, PipelineShaders, ResolvedSet};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use strata_core::renderer::{BindingSettings, ResourceBindingRegistry, ShaderModuleBindingSet};
use strata_lanes::binding_lane::{
    aggregate_bindings, AggregatedBindings, BindingSetDescriptor, BindingSetResolver,
    SetResolution,
};

/// The steps of one pipeline binding construction attempt.
///
/// `Ready` and `Failed` are terminal. A failed attempt is retried by starting over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingBuildState {
    /// Nothing has run yet.
    Start,
    /// Merging the declarations of every shader stage.
    AggregateBindings,
    /// Resolving the environment's sets.
    ResolveEnvironment,
    /// Resolving the remaining sets against the object's registry.
    ResolveObject,
    /// Assembling the per-set array and checking every set was claimed.
    Merge,
    /// The bindings were built.
    Ready,
    /// The attempt was abandoned.
    Failed,
}

/// The bindings shared by every pipeline rendered in one environment.
pub struct GraphicsEnvironment {
    label: String,
    registry: Arc<dyn ResourceBindingRegistry>,
    claimed_sets: Option<BTreeSet<u32>>,
    settings: BindingSettings,
    cache: EnvironmentSetCache,
}

impl GraphicsEnvironment {
    /// Creates an environment resolving against `registry` with default settings.
    pub fn new(label: impl Into<String>, registry: Arc<dyn ResourceBindingRegistry>) -> Self {
        Self {
            label: label.into(),
            registry,
            claimed_sets: None,
            settings: BindingSettings::default(),
            cache: EnvironmentSetCache::new(),
        }
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: BindingSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Restricts the environment pass to the given set indices.
    ///
    /// Without a declared shape, every set of every shader is offered to the
    /// environment first.
    pub fn with_claimed_sets(mut self, sets: impl IntoIterator<Item = u32>) -> Self {
        self.claimed_sets = Some(sets.into_iter().collect());
        self
    }

    /// Returns the diagnostic label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the environment registry.
    pub fn registry(&self) -> &Arc<dyn ResourceBindingRegistry> {
        &self.registry
    }

    /// Returns the settings.
    pub fn settings(&self) -> &BindingSettings {
        &self.settings
    }

    /// Returns the declared set shape, if any.
    pub fn claimed_sets(&self) -> Option<&BTreeSet<u32>> {
        self.claimed_sets.as_ref()
    }

    /// Returns the cache of environment resolutions.
    pub fn cache(&self) -> &EnvironmentSetCache {
        &self.cache
    }

    /// Returns `true` if the environment pass considers set `index`.
    pub fn claims(&self, index: u32) -> bool {
        self.claimed_sets
            .as_ref()
            .map_or(true, |claimed| claimed.contains(&index))
    }

    /// Builds the bindings of one pipeline.
    ///
    /// The environment resolves the sets it claims first; the object registry then
    /// resolves every set the environment did not. A set that is partially provided
    /// by either registry, or by neither, fails the whole pipeline.
    ///
    /// ## Arguments
    ///
    /// * `label` - A diagnostic label for the pipeline.
    /// * `shaders` - The pipeline's shader modules.
    /// * `object` - The registry of the object the pipeline draws.
    ///
    /// ## Errors
    ///
    /// * `PipelineBindingError::MissingShaderStage` - If a required module is absent.
    /// * `PipelineBindingError::Resolution` - On a kind conflict or an incomplete set.
    /// * `PipelineBindingError::UnresolvedSetAfterBothPasses` - If no registry
    ///   provides some set.
    pub fn build_pipeline_bindings(
        &self,
        label: &str,
        shaders: &PipelineShaders,
        object: &dyn ResourceBindingRegistry,
    ) -> Result<PipelineBindings, PipelineBindingError> {
        let mut state = BindingBuildState::Start;
        match self.run(label, shaders, object, &mut state) {
            Ok(bindings) => {
                self.advance(label, &mut state, BindingBuildState::Ready);
                Ok(bindings)
            }
            Err(err) => {
                log::error!(
                    "{}: pipeline '{}' failed during {:?}: {}",
                    self.label,
                    label,
                    state,
                    err
                );
                self.advance(label, &mut state, BindingBuildState::Failed);
                Err(err)
            }
        }
    }

    fn run(
        &self,
        label: &str,
        shaders: &PipelineShaders,
        object: &dyn ResourceBindingRegistry,
        state: &mut BindingBuildState,
    ) -> Result<PipelineBindings, PipelineBindingError> {
        self.advance(label, state, BindingBuildState::AggregateBindings);
        let modules = shaders.modules(&self.settings)?;
        let inputs: Vec<ShaderModuleBindingSet<'_>> = modules
            .into_iter()
            .map(ShaderModuleBindingSet::from_module)
            .collect();
        let aggregated = aggregate_bindings(&inputs)?;
        let limit = self.settings.max_binding_sets;
        if let Some(set) = aggregated.max_set_index().filter(|max| *max >= limit) {
            return Err(PipelineBindingError::SetIndexOutOfRange { set, limit });
        }

        self.advance(label, state, BindingBuildState::ResolveEnvironment);
        let environment_sets = self.resolve_environment(&aggregated)?;

        self.advance(label, state, BindingBuildState::ResolveObject);
        let remaining = aggregated.filtered(|index| !environment_sets.contains_key(&index));
        let object_sets = BindingSetResolver::with_settings(object, &self.settings)
            .resolve(&remaining)?;

        self.advance(label, state, BindingBuildState::Merge);
        let len = aggregated
            .max_set_index()
            .map_or(0, |max| max as usize + 1);
        let mut sets: Vec<Option<ResolvedSet>> = vec![None; len];
        for (set, descriptor) in environment_sets {
            sets[set as usize] = Some(ResolvedSet {
                set,
                source: BindingSetSource::Environment,
                descriptor,
            });
        }
        for info in object_sets {
            sets[info.set as usize] = Some(ResolvedSet {
                set: info.set,
                source: BindingSetSource::Object,
                descriptor: info.descriptor,
            });
        }

        if let Some(set) = aggregated
            .set_indices()
            .find(|index| sets[*index as usize].is_none())
        {
            return Err(PipelineBindingError::UnresolvedSetAfterBothPasses { set });
        }

        Ok(PipelineBindings::new(label, sets))
    }

    fn resolve_environment(
        &self,
        aggregated: &AggregatedBindings,
    ) -> Result<BTreeMap<u32, Arc<BindingSetDescriptor>>, PipelineBindingError> {
        let resolver = BindingSetResolver::with_settings(self.registry.as_ref(), &self.settings);
        let shape_generation = self
            .registry
            .shape_generation()
            .filter(|_| self.settings.cache_environment_sets);
        let mut resolved = BTreeMap::new();

        for set in aggregated.sets().filter(|set| self.claims(set.index())) {
            let descriptor = match shape_generation {
                Some(shape_generation) => {
                    let key = EnvironmentSetKey {
                        layout: set.clone(),
                        shape_generation,
                    };
                    self.cache
                        .get_or_resolve(key, |layout| resolver.resolve_set(layout))?
                }
                None => match resolver.resolve_set(set)? {
                    SetResolution::Resolved(descriptor) => Some(Arc::new(descriptor)),
                    SetResolution::Foreign => None,
                },
            };

            if let Some(descriptor) = descriptor {
                resolved.insert(set.index(), descriptor);
            }
        }
        Ok(resolved)
    }

    fn advance(&self, label: &str, state: &mut BindingBuildState, next: BindingBuildState) {
        log::trace!("{}: '{}' {:?} -> {:?}", self.label, label, state, next);
        *state = next;
    }
}

impl fmt::Debug for GraphicsEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsEnvironment")
            .field("label", &self.label)
            .field("claimed_sets", &self.claimed_sets)
            .field("settings", &self.settings)
            .field("cached_sets", &self.cache.len())
            .finish()
    }
}
