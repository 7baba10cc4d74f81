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

// Strata Sandbox
// Builds the bindings of a few objects against a shared environment.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use strata_agents::binding_agent::{
    BindingAgent, BindingSetSource, GraphicsEnvironment, ObjectBindingRequest, PipelineShaders,
};
use strata_core::renderer::{
    BindGroupDescriptor, BindGroupId, BindGroupLayoutDescriptor, BindGroupLayoutId, BindingDevice,
    BindingSettings, BufferId, CompositeRegistry, PipelineLayoutDescriptor, PipelineLayoutId,
    ReflectedShaderModule, ResourceError, SamplerId, ShaderModuleBinary, ShaderModuleId,
    TextureSampler, TextureViewId,
};

const SETTINGS: &str = include_str!("../assets/binding_settings.ron");
const LIT_VERT: &str = include_str!("../assets/shaders/lit.vert.ron");
const LIT_FRAG: &str = include_str!("../assets/shaders/lit.frag.ron");

/// A device that hands out sequential ids and logs what it is asked to create.
#[derive(Debug, Default)]
struct LoggingDevice {
    next_id: AtomicUsize,
}

impl LoggingDevice {
    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl BindingDevice for LoggingDevice {
    fn create_bind_group_layout(
        &self,
        descriptor: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayoutId, ResourceError> {
        for entry in descriptor.entries {
            log::debug!(
                "  {:?} binding {}: {:?} visible in {}",
                descriptor.label.unwrap_or_default(),
                entry.binding,
                entry.ty,
                entry.visibility
            );
        }
        Ok(BindGroupLayoutId(self.next()))
    }

    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError> {
        for entry in descriptor.entries {
            log::debug!(
                "  {:?} binding {} <- {:?}",
                descriptor.label.unwrap_or_default(),
                entry.binding,
                entry.resource
            );
        }
        Ok(BindGroupId(self.next()))
    }

    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError> {
        log::debug!(
            "  {:?} uses bind group layouts {:?}",
            descriptor.label.as_deref().unwrap_or_default(),
            descriptor.bind_group_layouts
        );
        Ok(PipelineLayoutId(self.next()))
    }
}

fn load_shader(id: usize, source: &str) -> Result<Arc<dyn ShaderModuleBinary>> {
    let module = ReflectedShaderModule::from_ron_str(ShaderModuleId(id), source)
        .with_context(|| format!("failed to load shader module {id}"))?;
    log::info!(
        "Loaded '{}' with {} binding set(s)",
        module.label(),
        module.binding_set_count()
    );
    Ok(Arc::new(module))
}

fn object_registry(index: usize, with_material: bool) -> CompositeRegistry {
    let mut registry = CompositeRegistry::new(format!("object {index}"));
    registry
        .structured_buffers_mut()
        .add("instanceTransforms", BufferId(100 + index));
    registry.texture_samplers_mut().add(
        "albedoTexture",
        TextureSampler::new(TextureViewId(index), SamplerId(0)),
    );
    if with_material {
        registry
            .constant_buffers_mut()
            .add("materialParams", BufferId(200 + index));
    }
    registry
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = BindingSettings::from_ron_str(SETTINGS).context("invalid binding settings")?;
    let vertex = load_shader(0, LIT_VERT)?;
    let fragment = load_shader(1, LIT_FRAG)?;

    let mut environment_registry = CompositeRegistry::new("forward environment");
    let viewport = environment_registry
        .constant_buffers_mut()
        .add("viewportBuffer", BufferId(1));
    environment_registry
        .structured_buffers_mut()
        .add("lightBuffer", BufferId(2));

    let environment = Arc::new(
        GraphicsEnvironment::new("forward", Arc::new(environment_registry))
            .with_settings(settings)
            .with_claimed_sets([0]),
    );
    let agent = BindingAgent::new(Arc::clone(&environment));

    // The last object forgot its material and is dropped from the batch.
    let requests = (0..4)
        .map(|index| {
            ObjectBindingRequest::new(
                index,
                format!("lit object {index}"),
                PipelineShaders::graphics(Arc::clone(&vertex), Arc::clone(&fragment)),
                Arc::new(object_registry(index, index != 3)),
            )
        })
        .collect();
    let report = agent.prepare_objects(requests);
    log::info!(
        "Prepared {} object(s), dropped {:?}",
        report.prepared.len(),
        report.dropped
    );

    let device = LoggingDevice::default();
    for object in &report.prepared {
        let layout = object.bindings.create_layout(&device)?;
        let groups = object.bindings.create_bind_groups(&device, &layout)?;
        let environment_sets = object
            .bindings
            .sets_from(BindingSetSource::Environment)
            .count();
        log::info!(
            "Object {}: {} set(s) ({} from the environment), bind groups {:?}",
            object.key,
            object.bindings.resolved_count(),
            environment_sets,
            groups
        );
    }

    // A new frame's viewport buffer reaches every pipeline without resolving again.
    viewport.set(BufferId(3));
    if let Some(object) = report.prepared.first() {
        let layout = object.bindings.create_layout(&device)?;
        let groups = object.bindings.create_bind_groups(&device, &layout)?;
        log::info!("Rebuilt bind groups after viewport swap: {:?}", groups);
    }

    log::info!(
        "{} environment resolution(s) cached",
        environment.cache().len()
    );
    Ok(())
}
