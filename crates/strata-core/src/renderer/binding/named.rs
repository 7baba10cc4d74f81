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

//! Named holders of live resource handles.

use crate::renderer::api::resource::{BindlessArray, BufferId, TextureSampler, TextureViewId};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// A named holder of a live resource reference.
///
/// The resolver only records *which* holder serves a shader slot. The value inside the
/// holder may be swapped at any time (for example to rotate per-frame constant buffers)
/// without resolving the binding set again.
pub struct NamedBinding<T> {
    name: String,
    value: RwLock<T>,
}

/// A holder for a constant buffer.
pub type ConstantBufferBinding = NamedBinding<BufferId>;
/// A holder for a structured buffer.
pub type StructuredBufferBinding = NamedBinding<BufferId>;
/// A holder for a combined texture and sampler.
pub type TextureSamplerBinding = NamedBinding<TextureSampler>;
/// A holder for a texture view.
pub type TextureViewBinding = NamedBinding<TextureViewId>;
/// A holder for an array of texture views.
pub type BindlessArrayBinding = NamedBinding<BindlessArray>;

impl<T> NamedBinding<T> {
    /// Creates a holder named `name` that initially binds `value`.
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value: RwLock::new(value),
        }
    }

    /// Returns the name the holder is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the bound value, returning the previous one.
    pub fn set(&self, value: T) -> T {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, value)
    }

    /// Runs `f` with a reference to the currently bound value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.value.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

impl<T: Clone> NamedBinding<T> {
    /// Returns a copy of the currently bound value.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

impl<T: fmt::Debug> fmt::Debug for NamedBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| {
            f.debug_struct("NamedBinding")
                .field("name", &self.name)
                .field("value", value)
                .finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn set_swaps_the_bound_value() {
        let binding = ConstantBufferBinding::new("viewportBuffer", BufferId(1));
        assert_eq!(binding.name(), "viewportBuffer");
        assert_eq!(binding.get(), BufferId(1));

        let previous = binding.set(BufferId(2));
        assert_eq!(previous, BufferId(1));
        assert_eq!(binding.get(), BufferId(2));
    }

    #[test]
    fn shared_holders_observe_updates() {
        let binding = Arc::new(BindlessArrayBinding::new(
            "textures",
            BindlessArray::new(vec![TextureViewId(1)]),
        ));
        let observer = Arc::clone(&binding);

        binding.set(BindlessArray::new(vec![TextureViewId(1), TextureViewId(2)]));
        assert_eq!(observer.with(|array| array.len()), 2);
    }
}
