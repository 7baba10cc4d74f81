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

//! Container-backed registries.

use super::named::{
    BindlessArrayBinding, ConstantBufferBinding, NamedBinding, StructuredBufferBinding,
    TextureSamplerBinding, TextureViewBinding,
};
use super::registry::ResourceBindingRegistry;
use crate::renderer::api::resource::{BindlessArray, BufferId, TextureSampler, TextureViewId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A named container of binding holders of one resource type.
///
/// The container tracks a generation counter that is bumped whenever a name is added
/// or removed. Replacing the holder registered under an existing name also bumps it,
/// because previously resolved descriptors still point at the old holder.
pub struct BindingCollection<T> {
    bindings: HashMap<String, Arc<NamedBinding<T>>>,
    generation: u64,
}

impl<T> Default for BindingCollection<T> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
            generation: 0,
        }
    }
}

impl<T> BindingCollection<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a holder for `value`, registers it under `name` and returns it.
    pub fn add(&mut self, name: impl Into<String>, value: T) -> Arc<NamedBinding<T>> {
        let binding = Arc::new(NamedBinding::new(name, value));
        self.insert(Arc::clone(&binding));
        binding
    }

    /// Registers an existing holder under its own name, returning the holder it replaces.
    pub fn insert(&mut self, binding: Arc<NamedBinding<T>>) -> Option<Arc<NamedBinding<T>>> {
        self.generation += 1;
        self.bindings.insert(binding.name().to_owned(), binding)
    }

    /// Removes the holder registered under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Arc<NamedBinding<T>>> {
        let removed = self.bindings.remove(name);
        if removed.is_some() {
            self.generation += 1;
        }
        removed
    }

    /// Returns the holder registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<NamedBinding<T>>> {
        self.bindings.get(name).cloned()
    }

    /// Returns `true` if a holder is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Iterates over the registered names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Returns the number of registered holders.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the shape generation of this collection.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T> fmt::Debug for BindingCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("BindingCollection")
            .field("names", &names)
            .field("generation", &self.generation)
            .finish()
    }
}

/// A registry backed by one [`BindingCollection`] per resource kind, optionally
/// chained to fallback registries.
///
/// Lookups consult the registry's own collections first and then each fallback in
/// the order it was added; the first match wins. Materials typically own one of these
/// and chain the shared registry of their shader family behind it.
#[derive(Default)]
pub struct CompositeRegistry {
    label: String,
    constant_buffers: BindingCollection<BufferId>,
    structured_buffers: BindingCollection<BufferId>,
    texture_samplers: BindingCollection<TextureSampler>,
    texture_views: BindingCollection<TextureViewId>,
    bindless_arrays: BindingCollection<BindlessArray>,
    fallbacks: Vec<Arc<dyn ResourceBindingRegistry>>,
}

impl CompositeRegistry {
    /// Creates an empty registry with a diagnostic label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Returns the diagnostic label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Appends a registry consulted when the own collections have no match.
    pub fn push_fallback(&mut self, fallback: Arc<dyn ResourceBindingRegistry>) {
        self.fallbacks.push(fallback);
    }

    /// Constant buffers owned by this registry.
    pub fn constant_buffers(&self) -> &BindingCollection<BufferId> {
        &self.constant_buffers
    }

    /// Mutable access to the owned constant buffers.
    pub fn constant_buffers_mut(&mut self) -> &mut BindingCollection<BufferId> {
        &mut self.constant_buffers
    }

    /// Structured buffers owned by this registry.
    pub fn structured_buffers(&self) -> &BindingCollection<BufferId> {
        &self.structured_buffers
    }

    /// Mutable access to the owned structured buffers.
    pub fn structured_buffers_mut(&mut self) -> &mut BindingCollection<BufferId> {
        &mut self.structured_buffers
    }

    /// Texture samplers owned by this registry.
    pub fn texture_samplers(&self) -> &BindingCollection<TextureSampler> {
        &self.texture_samplers
    }

    /// Mutable access to the owned texture samplers.
    pub fn texture_samplers_mut(&mut self) -> &mut BindingCollection<TextureSampler> {
        &mut self.texture_samplers
    }

    /// Texture views owned by this registry.
    pub fn texture_views(&self) -> &BindingCollection<TextureViewId> {
        &self.texture_views
    }

    /// Mutable access to the owned texture views.
    pub fn texture_views_mut(&mut self) -> &mut BindingCollection<TextureViewId> {
        &mut self.texture_views
    }

    /// Bindless arrays owned by this registry.
    pub fn bindless_arrays(&self) -> &BindingCollection<BindlessArray> {
        &self.bindless_arrays
    }

    /// Mutable access to the owned bindless arrays.
    pub fn bindless_arrays_mut(&mut self) -> &mut BindingCollection<BindlessArray> {
        &mut self.bindless_arrays
    }

    fn find_in<T, F>(
        &self,
        own: &BindingCollection<T>,
        name: &str,
        fallback: F,
    ) -> Option<Arc<NamedBinding<T>>>
    where
        F: Fn(&dyn ResourceBindingRegistry) -> Option<Arc<NamedBinding<T>>>,
    {
        own.get(name).or_else(|| {
            self.fallbacks
                .iter()
                .find_map(|registry| fallback(registry.as_ref()))
        })
    }
}

impl ResourceBindingRegistry for CompositeRegistry {
    fn find_constant_buffer(&self, name: &str) -> Option<Arc<ConstantBufferBinding>> {
        self.find_in(&self.constant_buffers, name, |r| r.find_constant_buffer(name))
    }

    fn find_structured_buffer(&self, name: &str) -> Option<Arc<StructuredBufferBinding>> {
        self.find_in(&self.structured_buffers, name, |r| {
            r.find_structured_buffer(name)
        })
    }

    fn find_texture_sampler(&self, name: &str) -> Option<Arc<TextureSamplerBinding>> {
        self.find_in(&self.texture_samplers, name, |r| r.find_texture_sampler(name))
    }

    fn find_texture_view(&self, name: &str) -> Option<Arc<TextureViewBinding>> {
        self.find_in(&self.texture_views, name, |r| r.find_texture_view(name))
    }

    fn find_bindless_array(&self, name: &str) -> Option<Arc<BindlessArrayBinding>> {
        self.find_in(&self.bindless_arrays, name, |r| r.find_bindless_array(name))
    }

    fn shape_generation(&self) -> Option<u64> {
        // Every component only ever grows, so the sum changes whenever one of them does.
        let own = self.constant_buffers.generation()
            + self.structured_buffers.generation()
            + self.texture_samplers.generation()
            + self.texture_views.generation()
            + self.bindless_arrays.generation()
            + self.fallbacks.len() as u64;
        self.fallbacks
            .iter()
            .try_fold(own, |acc, registry| Some(acc + registry.shape_generation()?))
    }
}

impl fmt::Debug for CompositeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeRegistry")
            .field("label", &self.label)
            .field("constant_buffers", &self.constant_buffers)
            .field("structured_buffers", &self.structured_buffers)
            .field("texture_samplers", &self.texture_samplers)
            .field("texture_views", &self.texture_views)
            .field("bindless_arrays", &self.bindless_arrays)
            .field("fallbacks", &self.fallbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::resource::SamplerId;
    use crate::renderer::api::shader::ShaderBindingKind;

    #[test]
    fn own_collections_take_precedence_over_fallbacks() {
        let mut shared = CompositeRegistry::new("shared");
        shared.constant_buffers_mut().add("lights", BufferId(10));
        shared.constant_buffers_mut().add("material", BufferId(11));

        let mut material = CompositeRegistry::new("material");
        material.constant_buffers_mut().add("material", BufferId(20));
        material.push_fallback(Arc::new(shared));

        assert_eq!(
            material.find_constant_buffer("material").unwrap().get(),
            BufferId(20)
        );
        assert_eq!(
            material.find_constant_buffer("lights").unwrap().get(),
            BufferId(10)
        );
        assert!(material.find_constant_buffer("missing").is_none());
    }

    #[test]
    fn kinds_are_looked_up_in_their_own_collection() {
        let mut registry = CompositeRegistry::new("object");
        registry
            .texture_samplers_mut()
            .add("albedo", TextureSampler::new(TextureViewId(1), SamplerId(2)));

        assert!(registry.find(ShaderBindingKind::TextureSampler, "albedo").is_some());
        assert!(registry.find(ShaderBindingKind::ConstantBuffer, "albedo").is_none());
        assert_eq!(
            registry
                .find(ShaderBindingKind::Unknown, "albedo")
                .map(|found| found.kind()),
            Some(ShaderBindingKind::TextureSampler)
        );
    }

    #[test]
    fn shape_generation_tracks_names_not_values() {
        let mut registry = CompositeRegistry::new("object");
        let start = registry.shape_generation().unwrap();

        let holder = registry.structured_buffers_mut().add("particles", BufferId(1));
        let after_add = registry.shape_generation().unwrap();
        assert!(after_add > start);

        holder.set(BufferId(2));
        assert_eq!(registry.shape_generation(), Some(after_add));

        assert!(registry.structured_buffers_mut().remove("particles").is_some());
        assert!(registry.shape_generation().unwrap() > after_add);
        assert!(registry.structured_buffers_mut().remove("particles").is_none());
    }

    #[derive(Debug)]
    struct UntrackedRegistry;

    impl ResourceBindingRegistry for UntrackedRegistry {
        fn find_constant_buffer(&self, _name: &str) -> Option<Arc<ConstantBufferBinding>> {
            None
        }

        fn find_structured_buffer(&self, _name: &str) -> Option<Arc<StructuredBufferBinding>> {
            None
        }

        fn find_texture_sampler(&self, _name: &str) -> Option<Arc<TextureSamplerBinding>> {
            None
        }
    }

    #[test]
    fn untracked_fallback_makes_the_shape_untracked() {
        let mut registry = CompositeRegistry::new("material");
        registry.constant_buffers_mut().add("material", BufferId(1));
        assert!(registry.shape_generation().is_some());

        registry.push_fallback(Arc::new(UntrackedRegistry));
        assert_eq!(registry.shape_generation(), None);
    }
}
