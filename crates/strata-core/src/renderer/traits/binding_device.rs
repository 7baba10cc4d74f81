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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The part of a graphics device used to turn resolved binding sets into backend objects.
pub trait BindingDevice: Send + Sync + Debug {
    /// Creates a bind group layout from the provided descriptor.
    /// ## Arguments
    /// * `descriptor` - The entries the layout is made of.
    /// ## Errors
    /// * `ResourceError` - If the backend rejects the layout.
    fn create_bind_group_layout(
        &self,
        descriptor: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayoutId, ResourceError>;

    /// Creates a bind group conforming to an existing layout.
    /// ## Arguments
    /// * `descriptor` - The layout and the resources to bind at each slot.
    /// ## Errors
    /// * `ResourceError` - If the layout is unknown or a resource is invalid.
    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError>;

    /// Creates a pipeline layout from the provided descriptor.
    /// ## Arguments
    /// * `descriptor` - The bind group layouts, indexed by set number.
    /// ## Errors
    /// * `ResourceError` - If the pipeline layout creation fails.
    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError>;
}
