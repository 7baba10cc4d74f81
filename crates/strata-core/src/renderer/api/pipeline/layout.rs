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

//! The pipeline layout assembled from a pipeline's resolved binding sets.

use crate::renderer::api::command::BindGroupLayoutId;
use std::borrow::Cow;

/// A device handle to a pipeline layout built from resolved binding sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineLayoutId(pub usize);

/// Describes a pipeline layout as one bind group layout per set index.
///
/// Position `n` of `bind_group_layouts` is the layout of binding set `n`. Set indices
/// the shaders leave unused still occupy a position, filled with an empty layout, so
/// the slice is always dense from set 0 to the highest declared set.
#[derive(Debug, Clone)]
pub struct PipelineLayoutDescriptor<'a> {
    /// The pipeline label, used by devices for diagnostics.
    pub label: Option<Cow<'a, str>>,
    /// Bind group layouts in set order.
    pub bind_group_layouts: &'a [BindGroupLayoutId],
}

impl<'a> PipelineLayoutDescriptor<'a> {
    /// Creates a descriptor for the pipeline `label` over per-set layouts.
    pub fn for_sets(label: &'a str, bind_group_layouts: &'a [BindGroupLayoutId]) -> Self {
        Self {
            label: Some(Cow::Borrowed(label)),
            bind_group_layouts,
        }
    }

    /// Returns the number of binding sets the layout spans, gaps included.
    pub fn set_count(&self) -> usize {
        self.bind_group_layouts.len()
    }

    /// Returns the bind group layout used for binding set `set`.
    pub fn set_layout(&self, set: u32) -> Option<BindGroupLayoutId> {
        self.bind_group_layouts.get(set as usize).copied()
    }
}
