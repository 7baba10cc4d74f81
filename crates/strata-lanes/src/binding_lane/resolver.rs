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

//! Matches aggregated binding sets against a resource binding registry.

use super::aggregator::{aggregate_bindings, AggregatedBindings, AggregatedSet};
use super::descriptor::{BindingSetDescriptor, BindingSetInfo, BindingSlotInfo};
use super::error::ResolutionError;
use strata_core::renderer::{BindingSettings, ResourceBindingRegistry, ShaderModuleBindingSet};

/// How a single binding set relates to a registry.
#[derive(Debug, Clone)]
pub enum SetResolution {
    /// The registry provides every slot of the set.
    Resolved(BindingSetDescriptor),
    /// The registry provides none of the slots; another layer is expected to.
    Foreign,
}

/// Resolves binding sets against one registry.
///
/// The resolver only borrows the registry and never mutates it, so one registry can
/// serve any number of resolvers running on different threads at once.
#[derive(Clone, Copy)]
pub struct BindingSetResolver<'r> {
    registry: &'r dyn ResourceBindingRegistry,
    log_skipped_sets: bool,
}

impl<'r> BindingSetResolver<'r> {
    /// Creates a resolver over `registry` with default settings.
    pub fn new(registry: &'r dyn ResourceBindingRegistry) -> Self {
        Self::with_settings(registry, &BindingSettings::default())
    }

    /// Creates a resolver over `registry` configured by `settings`.
    pub fn with_settings(
        registry: &'r dyn ResourceBindingRegistry,
        settings: &BindingSettings,
    ) -> Self {
        Self {
            registry,
            log_skipped_sets: settings.log_skipped_sets,
        }
    }

    /// Returns the registry this resolver looks bindings up in.
    pub fn registry(&self) -> &'r dyn ResourceBindingRegistry {
        self.registry
    }

    /// Classifies one set.
    ///
    /// ## Errors
    ///
    /// Returns [`ResolutionError::IncompleteBindingSet`] if the registry provides some,
    /// but not all, of the slots of the set.
    pub fn resolve_set(&self, set: &AggregatedSet) -> Result<SetResolution, ResolutionError> {
        let mut found = Vec::with_capacity(set.len());
        let mut missing = Vec::new();

        for slot in set.slots() {
            match self.registry.find(slot.kind, &slot.name) {
                Some(binding) => found.push((
                    BindingSlotInfo {
                        binding: slot.binding,
                        stages: slot.stages,
                    },
                    binding,
                )),
                None => missing.push(slot.name.clone()),
            }
        }

        if missing.is_empty() {
            log::trace!(
                "Binding set {} resolved with {} binding(s)",
                set.index(),
                found.len()
            );
            return Ok(SetResolution::Resolved(
                BindingSetDescriptor::from_resolved(found),
            ));
        }

        if found.is_empty() {
            if self.log_skipped_sets {
                log::debug!(
                    "Binding set {} provides none of {:?}; leaving it to another registry",
                    set.index(),
                    missing
                );
            }
            return Ok(SetResolution::Foreign);
        }

        log::error!(
            "Binding set {} incomplete: {} binding(s) resolved, missing {:?}",
            set.index(),
            found.len(),
            missing
        );
        Err(ResolutionError::IncompleteBindingSet {
            set: set.index(),
            found: found.len(),
            missing,
        })
    }

    /// Resolves every aggregated set in ascending set order.
    ///
    /// Foreign sets contribute nothing. The first incomplete set aborts the call and
    /// discards every descriptor produced so far.
    pub fn resolve(
        &self,
        aggregated: &AggregatedBindings,
    ) -> Result<Vec<BindingSetInfo>, ResolutionError> {
        let mut resolved = Vec::with_capacity(aggregated.len());
        for set in aggregated.sets() {
            if let SetResolution::Resolved(descriptor) = self.resolve_set(set)? {
                resolved.push(BindingSetInfo::new(set.index(), descriptor));
            }
        }
        Ok(resolved)
    }

    /// Aggregates `modules` and resolves the result.
    ///
    /// A kind conflict between modules is reported before any set is looked up.
    pub fn resolve_modules(
        &self,
        modules: &[ShaderModuleBindingSet<'_>],
    ) -> Result<Vec<BindingSetInfo>, ResolutionError> {
        let aggregated = aggregate_bindings(modules)?;
        self.resolve(&aggregated)
    }

    /// Callback form of [`resolve_modules`](Self::resolve_modules).
    ///
    /// `on_set` is invoked once per resolved set, in ascending set order, and only if
    /// the whole call succeeds. Returns `false` on failure; the cause has already been
    /// logged.
    pub fn resolve_into(
        &self,
        modules: &[ShaderModuleBindingSet<'_>],
        mut on_set: impl FnMut(BindingSetInfo),
    ) -> bool {
        match self.resolve_modules(modules) {
            Ok(sets) => {
                sets.into_iter().for_each(&mut on_set);
                true
            }
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for BindingSetResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingSetResolver")
            .field("shape_generation", &self.registry.shape_generation())
            .field("log_skipped_sets", &self.log_skipped_sets)
            .finish()
    }
}

/// Aggregates `modules` and resolves them against `registry` with default settings.
pub fn resolve_binding_sets(
    modules: &[ShaderModuleBindingSet<'_>],
    registry: &dyn ResourceBindingRegistry,
) -> Result<Vec<BindingSetInfo>, ResolutionError> {
    BindingSetResolver::new(registry).resolve_modules(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strata_core::renderer::{
        BufferId, CompositeRegistry, EmptyRegistry, ReflectedShaderModule, ResolvedBinding,
        SamplerId, ShaderBindingKind, ShaderModuleBinary, ShaderModuleId, ShaderStage,
        ShaderStageFlags, TextureSampler, TextureViewId,
    };

    use strata_core::renderer::ShaderBindingKind::{
        ConstantBuffer, StructuredBuffer, TextureSampler as Sampled,
    };

    fn module(
        stage: ShaderStage,
        bindings: &[(&str, u32, u32, ShaderBindingKind)],
    ) -> ReflectedShaderModule {
        bindings
            .iter()
            .fold(
                ReflectedShaderModule::builder(ShaderModuleId(0), stage),
                |builder, (name, set, binding, kind)| builder.binding(*name, *set, *binding, *kind),
            )
            .build()
            .unwrap()
    }

    fn inputs<'a>(modules: &[&'a ReflectedShaderModule]) -> Vec<ShaderModuleBindingSet<'a>> {
        modules
            .iter()
            .map(|m| ShaderModuleBindingSet::from_module(*m as &dyn ShaderModuleBinary))
            .collect()
    }

    fn registry_with_buffers(names: &[&str]) -> CompositeRegistry {
        let mut registry = CompositeRegistry::new("test");
        for (index, name) in names.iter().enumerate() {
            registry.constant_buffers_mut().add(*name, BufferId(index));
        }
        registry
    }

    #[test]
    fn shader_without_bindings_resolves_to_nothing() {
        let shader = module(ShaderStage::Vertex, &[]);
        let full = registry_with_buffers(&["a", "b"]);

        assert!(resolve_binding_sets(&inputs(&[&shader]), &full)
            .unwrap()
            .is_empty());
        assert!(resolve_binding_sets(&inputs(&[&shader]), &EmptyRegistry)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn resolving_twice_yields_identical_mappings() {
        let shader = module(
            ShaderStage::Fragment,
            &[
                ("camera", 0, 0, ConstantBuffer),
                ("material", 1, 2, ConstantBuffer),
            ],
        );
        let registry = registry_with_buffers(&["camera", "material"]);
        let modules = inputs(&[&shader]);

        let first = resolve_binding_sets(&modules, &registry).unwrap();
        let second = resolve_binding_sets(&modules, &registry).unwrap();

        assert_eq!(first.len(), 2);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.set, b.set);
            let (a_entries, b_entries) = (a.descriptor.entries(), b.descriptor.entries());
            assert_eq!(a_entries.len(), b_entries.len());
            for ((a_info, a_handle), (b_info, b_handle)) in a_entries.iter().zip(&b_entries) {
                assert_eq!(a_info, b_info);
                match (a_handle, b_handle) {
                    (ResolvedBinding::ConstantBuffer(x), ResolvedBinding::ConstantBuffer(y)) => {
                        assert!(Arc::ptr_eq(x, y))
                    }
                    other => panic!("unexpected handles {other:?}"),
                }
            }
        }
    }

    #[test]
    fn partially_resolved_set_fails_the_whole_call() {
        let shader = module(
            ShaderStage::Fragment,
            &[
                ("camera", 0, 0, ConstantBuffer),
                ("a", 1, 0, ConstantBuffer),
                ("b", 1, 1, ConstantBuffer),
                ("c", 1, 2, ConstantBuffer),
            ],
        );
        let modules = inputs(&[&shader]);

        for provided in [&["camera", "a"][..], &["camera", "a", "b"][..]] {
            let registry = registry_with_buffers(provided);
            let err = resolve_binding_sets(&modules, &registry).unwrap_err();
            match err {
                ResolutionError::IncompleteBindingSet { set, found, missing } => {
                    assert_eq!(set, 1);
                    assert_eq!(found + missing.len(), 3);
                }
                other => panic!("unexpected error {other:?}"),
            }

            let mut reported = 0;
            let ok = BindingSetResolver::new(&registry).resolve_into(&modules, |_| reported += 1);
            assert!(!ok);
            assert_eq!(reported, 0);
        }
    }

    #[test]
    fn foreign_set_is_skipped_while_others_resolve() {
        let shader = module(
            ShaderStage::Fragment,
            &[
                ("camera", 0, 0, ConstantBuffer),
                ("lights", 0, 1, ConstantBuffer),
                ("material", 2, 0, ConstantBuffer),
            ],
        );
        let registry = registry_with_buffers(&["material"]);

        let sets = resolve_binding_sets(&inputs(&[&shader]), &registry).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].set, 2);
        assert_eq!(sets[0].descriptor.total_binding_count(), 1);
    }

    #[test]
    fn kind_conflict_fails_before_any_lookup() {
        let vertex = module(
            ShaderStage::Vertex,
            &[("shared", 0, 5, ConstantBuffer), ("other", 1, 0, ConstantBuffer)],
        );
        let fragment = module(ShaderStage::Fragment, &[("shared", 0, 5, StructuredBuffer)]);
        let registry = registry_with_buffers(&["shared", "other"]);

        let mut reported = Vec::new();
        let ok = BindingSetResolver::new(&registry)
            .resolve_into(&inputs(&[&vertex, &fragment]), |info| reported.push(info.set));

        assert!(!ok);
        assert!(reported.is_empty());
        assert!(matches!(
            resolve_binding_sets(&inputs(&[&vertex, &fragment]), &registry),
            Err(ResolutionError::KindConflict { set: 0, binding: 5, .. })
        ));
    }

    #[test]
    fn shared_slot_carries_both_stages() {
        let vertex = module(ShaderStage::Vertex, &[("transform", 1, 0, ConstantBuffer)]);
        let fragment = module(ShaderStage::Fragment, &[("transform", 1, 0, ConstantBuffer)]);
        let registry = registry_with_buffers(&["transform"]);

        let sets = resolve_binding_sets(&inputs(&[&vertex, &fragment]), &registry).unwrap();
        assert_eq!(sets.len(), 1);
        let info = sets[0]
            .descriptor
            .binding_info(ConstantBuffer, 0)
            .unwrap();
        assert_eq!(info.binding, 0);
        assert_eq!(info.stages, ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT);
    }

    #[test]
    fn two_set_shader_resolves_every_declared_slot() {
        let shader = module(
            ShaderStage::Fragment,
            &[
                ("frame", 0, 0, ConstantBuffer),
                ("instances", 0, 2, StructuredBuffer),
                ("lights", 0, 3, StructuredBuffer),
                ("shadow", 0, 5, Sampled),
                ("material", 1, 0, ConstantBuffer),
                ("bones", 1, 1, StructuredBuffer),
                ("albedo", 1, 4, Sampled),
                ("normal", 1, 6, Sampled),
                ("roughness", 1, 7, Sampled),
            ],
        );

        let mut registry = CompositeRegistry::new("fixture");
        registry.constant_buffers_mut().add("frame", BufferId(0));
        registry.constant_buffers_mut().add("material", BufferId(1));
        registry.structured_buffers_mut().add("instances", BufferId(2));
        registry.structured_buffers_mut().add("lights", BufferId(3));
        registry.structured_buffers_mut().add("bones", BufferId(4));
        for (index, name) in ["shadow", "albedo", "normal", "roughness"].iter().enumerate() {
            registry
                .texture_samplers_mut()
                .add(*name, TextureSampler::new(TextureViewId(index), SamplerId(0)));
        }

        let sets = resolve_binding_sets(&inputs(&[&shader]), &registry).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].set, 0);
        assert_eq!(sets[1].set, 1);

        let count = |info: &BindingSetInfo| {
            [ConstantBuffer, StructuredBuffer, Sampled]
                .iter()
                .map(|kind| info.descriptor.binding_count(*kind))
                .sum::<usize>()
        };
        assert_eq!(count(&sets[0]), 4);
        assert_eq!(count(&sets[1]), 5);

        let slots = |info: &BindingSetInfo| -> Vec<u32> {
            info.descriptor
                .entries()
                .iter()
                .map(|(slot, _)| slot.binding)
                .collect()
        };
        assert_eq!(slots(&sets[0]), [0, 2, 3, 5]);
        assert_eq!(slots(&sets[1]), [0, 1, 4, 6, 7]);
        assert_eq!(
            sets[0].descriptor.binding_info(StructuredBuffer, 1).unwrap().binding,
            3
        );
    }

    #[test]
    fn unknown_slot_lands_in_the_list_of_the_matching_holder() {
        let shader = module(
            ShaderStage::Compute,
            &[("particles", 0, 0, ShaderBindingKind::Unknown)],
        );
        let mut registry = CompositeRegistry::new("compute");
        registry.structured_buffers_mut().add("particles", BufferId(3));

        let sets = resolve_binding_sets(&inputs(&[&shader]), &registry).unwrap();
        assert_eq!(sets[0].descriptor.binding_count(StructuredBuffer), 1);
        assert_eq!(sets[0].descriptor.binding_count(ConstantBuffer), 0);
    }

    #[test]
    fn resolve_into_reports_sets_in_ascending_order() {
        let shader = module(
            ShaderStage::Fragment,
            &[
                ("c", 4, 0, ConstantBuffer),
                ("a", 0, 0, ConstantBuffer),
                ("b", 2, 0, ConstantBuffer),
            ],
        );
        let registry = registry_with_buffers(&["a", "b", "c"]);

        let mut reported = Vec::new();
        assert!(BindingSetResolver::new(&registry)
            .resolve_into(&inputs(&[&shader]), |info| reported.push(info.set)));
        assert_eq!(reported, [0, 2, 4]);
    }
}
