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

//! Opaque handles to GPU resources.
//!
//! The binding subsystem never owns GPU memory; it only refers to resources created
//! by a device through these small, copyable ids.

/// An opaque handle to a GPU buffer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

/// An opaque handle to a GPU texture view resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureViewId(pub usize);

/// An opaque handle to a GPU sampler resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SamplerId(pub usize);

/// A texture view paired with the sampler used to read it.
///
/// This is what a combined texture-sampler binding resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSampler {
    /// The sampled texture view.
    pub view: TextureViewId,
    /// The sampler configuration.
    pub sampler: SamplerId,
}

impl TextureSampler {
    /// Pairs a texture view with a sampler.
    pub fn new(view: TextureViewId, sampler: SamplerId) -> Self {
        Self { view, sampler }
    }
}

/// A variable-length array of texture views bound through a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BindlessArray {
    /// The views, in array-index order.
    pub views: Vec<TextureViewId>,
}

impl BindlessArray {
    /// Creates a bindless array from the given views.
    pub fn new(views: Vec<TextureViewId>) -> Self {
        Self { views }
    }

    /// Returns the number of elements in the array.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if the array holds no views.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
