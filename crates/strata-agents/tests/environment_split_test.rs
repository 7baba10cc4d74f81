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

//! Integration tests for splitting pipeline bindings between environment and object.

use std::sync::{Arc, Mutex};
use strata_agents::binding_agent::{
    BindingAgent, BindingSetSource, GraphicsEnvironment, ObjectBindingRequest,
    PipelineBindingError, PipelineShaders,
};
use strata_core::renderer::{
    BindGroupDescriptor, BindGroupEntry, BindGroupId, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindGroupLayoutId, BindingDevice, BindingResource, BindingType,
    BufferId, CompositeRegistry, PipelineLayoutDescriptor, PipelineLayoutId,
    ReflectedShaderModule, ResourceError, SamplerId, ShaderBindingKind, ShaderModuleBinary,
    ShaderModuleId, ShaderStage, ShaderStageFlags, TextureSampler, TextureSamplerBinding,
    TextureViewId,
};

#[derive(Debug, Default)]
struct MockBindingDevice {
    layouts: Mutex<Vec<Vec<BindGroupLayoutEntry>>>,
    groups: Mutex<Vec<(BindGroupLayoutId, Vec<BindGroupEntry>)>>,
    pipeline_layouts: Mutex<Vec<Vec<BindGroupLayoutId>>>,
}

impl BindingDevice for MockBindingDevice {
    fn create_bind_group_layout(
        &self,
        descriptor: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayoutId, ResourceError> {
        let mut layouts = self.layouts.lock().unwrap();
        layouts.push(descriptor.entries.to_vec());
        Ok(BindGroupLayoutId(layouts.len() - 1))
    }

    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError> {
        if descriptor.layout.0 >= self.layouts.lock().unwrap().len() {
            return Err(ResourceError::InvalidHandle);
        }
        let mut groups = self.groups.lock().unwrap();
        groups.push((descriptor.layout, descriptor.entries.to_vec()));
        Ok(BindGroupId(groups.len() - 1))
    }

    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError> {
        let mut layouts = self.pipeline_layouts.lock().unwrap();
        layouts.push(descriptor.bind_group_layouts.to_vec());
        Ok(PipelineLayoutId(layouts.len() - 1))
    }
}

fn vertex_shader() -> Arc<dyn ShaderModuleBinary> {
    Arc::new(
        ReflectedShaderModule::builder(ShaderModuleId(0), ShaderStage::Vertex)
            .label("mesh.vert")
            .binding("viewportBuffer", 0, 0, ShaderBindingKind::ConstantBuffer)
            .build()
            .unwrap(),
    )
}

fn fragment_shader() -> Arc<dyn ShaderModuleBinary> {
    Arc::new(
        ReflectedShaderModule::builder(ShaderModuleId(1), ShaderStage::Fragment)
            .label("mesh.frag")
            .binding("viewportBuffer", 0, 0, ShaderBindingKind::ConstantBuffer)
            .binding("albedoTexture", 1, 3, ShaderBindingKind::TextureSampler)
            .build()
            .unwrap(),
    )
}

fn environment_registry() -> Arc<CompositeRegistry> {
    let mut registry = CompositeRegistry::new("environment");
    registry
        .constant_buffers_mut()
        .add("viewportBuffer", BufferId(10));
    Arc::new(registry)
}

fn object_registry(view: usize) -> (CompositeRegistry, Arc<TextureSamplerBinding>) {
    let mut registry = CompositeRegistry::new("object");
    let albedo = registry.texture_samplers_mut().add(
        "albedoTexture",
        TextureSampler::new(TextureViewId(view), SamplerId(0)),
    );
    (registry, albedo)
}

#[test]
fn test_environment_and_object_sets_are_merged() {
    let environment = GraphicsEnvironment::new("forward", environment_registry());
    let (object, _) = object_registry(3);
    let shaders = PipelineShaders::graphics(vertex_shader(), fragment_shader());

    let bindings = environment
        .build_pipeline_bindings("mesh", &shaders, &object)
        .unwrap();

    assert_eq!(bindings.set_count(), 2);

    let set0 = bindings.set(0).unwrap();
    assert_eq!(set0.source, BindingSetSource::Environment);
    assert_eq!(
        set0.descriptor.binding_count(ShaderBindingKind::ConstantBuffer),
        1
    );
    let info = set0
        .descriptor
        .binding_info(ShaderBindingKind::ConstantBuffer, 0)
        .unwrap();
    assert_eq!(info.binding, 0);
    assert_eq!(info.stages, ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT);

    let set1 = bindings.set(1).unwrap();
    assert_eq!(set1.source, BindingSetSource::Object);
    assert_eq!(
        set1.descriptor
            .binding_info(ShaderBindingKind::TextureSampler, 0)
            .unwrap()
            .binding,
        3
    );
}

#[test]
fn test_device_objects_follow_the_set_array() {
    let device = MockBindingDevice::default();
    let environment = GraphicsEnvironment::new("forward", environment_registry());
    let (object, albedo) = object_registry(3);
    let shaders = PipelineShaders::graphics(vertex_shader(), fragment_shader());

    let bindings = environment
        .build_pipeline_bindings("mesh", &shaders, &object)
        .unwrap();
    let layout = bindings.create_layout(&device).unwrap();

    assert_eq!(layout.bind_group_layouts.len(), 2);
    let created = device.layouts.lock().unwrap().clone();
    assert_eq!(
        Some(created[0][0].ty),
        BindingType::from_kind(ShaderBindingKind::ConstantBuffer)
    );
    assert_eq!(created[1][0].binding, 3);
    assert_eq!(created[1][0].ty, BindingType::CombinedTextureSampler);
    assert_eq!(
        device.pipeline_layouts.lock().unwrap()[layout.pipeline_layout.0],
        layout.bind_group_layouts
    );

    // Swapping the texture does not require resolving again.
    let before = bindings.create_bind_groups(&device, &layout).unwrap();
    albedo.set(TextureSampler::new(TextureViewId(8), SamplerId(0)));
    let after = bindings.create_bind_groups(&device, &layout).unwrap();

    assert!(before.iter().all(Option::is_some));
    assert_ne!(before, after);
    let groups = device.groups.lock().unwrap();
    assert_eq!(
        groups.last().unwrap().1[0].resource,
        BindingResource::TextureSampler(TextureSampler::new(TextureViewId(8), SamplerId(0)))
    );
}

#[test]
fn test_sparse_sets_get_empty_layouts() {
    let device = MockBindingDevice::default();
    let environment = GraphicsEnvironment::new("forward", environment_registry());
    let vertex: Arc<dyn ShaderModuleBinary> = Arc::new(
        ReflectedShaderModule::builder(ShaderModuleId(2), ShaderStage::Vertex)
            .binding("viewportBuffer", 0, 0, ShaderBindingKind::ConstantBuffer)
            .binding("albedoTexture", 3, 0, ShaderBindingKind::TextureSampler)
            .build()
            .unwrap(),
    );
    let fragment: Arc<dyn ShaderModuleBinary> = Arc::new(
        ReflectedShaderModule::builder(ShaderModuleId(3), ShaderStage::Fragment)
            .build()
            .unwrap(),
    );
    let (object, _) = object_registry(1);

    let bindings = environment
        .build_pipeline_bindings(
            "sparse",
            &PipelineShaders::graphics(vertex, fragment),
            &object,
        )
        .unwrap();
    let layout = bindings.create_layout(&device).unwrap();
    let groups = bindings.create_bind_groups(&device, &layout).unwrap();

    assert_eq!(bindings.set_count(), 4);
    assert_eq!(bindings.resolved_count(), 2);
    let created = device.layouts.lock().unwrap();
    assert!(created[1].is_empty());
    assert!(created[2].is_empty());
    assert!(groups[1].is_none() && groups[2].is_none());
    assert!(groups[0].is_some() && groups[3].is_some());
}

#[test]
fn test_missing_fragment_stage_is_reported_before_resolution() {
    let environment = GraphicsEnvironment::new("forward", environment_registry());
    let (object, _) = object_registry(3);
    let shaders = PipelineShaders::Graphics {
        vertex: Some(vertex_shader()),
        fragment: None,
    };

    let err = environment
        .build_pipeline_bindings("mesh", &shaders, &object)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineBindingError::MissingShaderStage {
            stage: ShaderStage::Fragment
        }
    ));
    assert!(environment.cache().is_empty());
}

#[test]
fn test_batch_preparation_shares_environment_sets() {
    let environment = Arc::new(GraphicsEnvironment::new("forward", environment_registry()));
    let agent = BindingAgent::new(Arc::clone(&environment));

    let requests: Vec<_> = (0..8)
        .map(|index| {
            let (object, _) = object_registry(index);
            ObjectBindingRequest::new(
                index,
                format!("mesh {index}"),
                PipelineShaders::graphics(vertex_shader(), fragment_shader()),
                Arc::new(object),
            )
        })
        .collect();

    let report = agent.prepare_objects(requests);
    assert_eq!(report.prepared.len(), 8);
    assert!(report.dropped.is_empty());

    let first = &report.prepared[0].bindings.set(0).unwrap().descriptor;
    for object in &report.prepared {
        assert!(Arc::ptr_eq(first, &object.bindings.set(0).unwrap().descriptor));
    }
    let albedo = report.prepared[5]
        .bindings
        .set(1)
        .unwrap()
        .descriptor
        .texture_sampler(0)
        .unwrap()
        .get();
    assert_eq!(albedo.view, TextureViewId(5));
}
