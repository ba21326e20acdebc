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

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use wgpu::util::DeviceExt;

use mica_core::gpu::error::ResourceError;
use mica_core::gpu::{
    AdapterProfile, BackendKind, BindGroupDescriptor, BindGroupId, BindGroupLayoutDescriptor,
    BindGroupLayoutId, BindingResource, BufferDescriptor, BufferId, BufferResidency,
    CommandBufferId, CommandEncoder, ComputePipelineDescriptor, ComputePipelineId, DeviceFeatures,
    DeviceKind, GraphicsDevice, IndirectLayoutDescriptor, IndirectLayoutId, MeshPipelineDescriptor,
    MeshPipelineId, PipelineLayoutDescriptor, PipelineLayoutId, QueueType,
    RenderPipelineDescriptor, RenderPipelineId, ShaderModuleDescriptor, ShaderModuleId,
    ShaderSourceData, TextureDescriptor, TextureId, TextureViewDescriptor, TextureViewId,
};

use super::command::WgpuCommandEncoder;
use super::context::WgpuGraphicsContext;
use super::conversions::IntoWgpu;

#[derive(Debug)]
pub(crate) struct WgpuBufferEntry {
    pub(crate) wgpu_buffer: Arc<wgpu::Buffer>,
    #[allow(dead_code)]
    pub(crate) size: u64,
}

/// The internal, non-clonable state of the WgpuDevice.
/// This struct holds all the GPU resource tables, protected by an Arc.
#[derive(Debug)]
pub struct WgpuDeviceInternal {
    context: Arc<WgpuGraphicsContext>,
    features: DeviceFeatures,

    shader_modules: Mutex<HashMap<ShaderModuleId, Arc<wgpu::ShaderModule>>>,
    bind_group_layouts: Mutex<HashMap<BindGroupLayoutId, Arc<wgpu::BindGroupLayout>>>,
    bind_groups: Mutex<HashMap<BindGroupId, Arc<wgpu::BindGroup>>>,
    pipeline_layouts: Mutex<HashMap<PipelineLayoutId, Arc<wgpu::PipelineLayout>>>,
    render_pipelines: Mutex<HashMap<RenderPipelineId, Arc<wgpu::RenderPipeline>>>,
    compute_pipelines: Mutex<HashMap<ComputePipelineId, Arc<wgpu::ComputePipeline>>>,
    buffers: Mutex<HashMap<BufferId, WgpuBufferEntry>>,
    textures: Mutex<HashMap<TextureId, Arc<wgpu::Texture>>>,
    texture_views: Mutex<HashMap<TextureViewId, Arc<wgpu::TextureView>>>,

    next_resource_id: AtomicUsize,

    /// Command buffers that have been finished but not yet submitted.
    pending_command_buffers: Mutex<HashMap<CommandBufferId, wgpu::CommandBuffer>>,
    command_buffer_id_counter: AtomicU64,
}

/// A clonable, thread-safe handle to the WGPU graphics device.
///
/// Wraps the actual device state in an `Arc`, allowing it to be shared
/// across threads and with command encoders.
#[derive(Clone, Debug)]
pub struct WgpuDevice {
    internal: Arc<WgpuDeviceInternal>,
}

fn lock<'m, T>(mutex: &'m Mutex<T>, what: &str) -> Result<MutexGuard<'m, T>, ResourceError> {
    mutex
        .lock()
        .map_err(|e| ResourceError::Backend(format!("Mutex poisoned ({what}): {e}")))
}

impl WgpuDevice {
    /// Creates a device handle over an initialized graphics context.
    pub fn new(context: Arc<WgpuGraphicsContext>) -> Self {
        let features = *context.hal_features();
        Self {
            internal: Arc::new(WgpuDeviceInternal {
                context,
                features,
                shader_modules: Mutex::new(HashMap::new()),
                bind_group_layouts: Mutex::new(HashMap::new()),
                bind_groups: Mutex::new(HashMap::new()),
                pipeline_layouts: Mutex::new(HashMap::new()),
                render_pipelines: Mutex::new(HashMap::new()),
                compute_pipelines: Mutex::new(HashMap::new()),
                buffers: Mutex::new(HashMap::new()),
                textures: Mutex::new(HashMap::new()),
                texture_views: Mutex::new(HashMap::new()),
                next_resource_id: AtomicUsize::new(1),
                pending_command_buffers: Mutex::new(HashMap::new()),
                command_buffer_id_counter: AtomicU64::new(1),
            }),
        }
    }

    fn next_id(&self) -> usize {
        self.internal.next_resource_id.fetch_add(1, Ordering::Relaxed)
    }

    fn wgpu_device(&self) -> &wgpu::Device {
        self.internal.context.device()
    }

    fn wgpu_queue(&self) -> &wgpu::Queue {
        self.internal.context.queue()
    }

    pub(crate) fn get_wgpu_buffer(&self, id: BufferId) -> Option<Arc<wgpu::Buffer>> {
        self.internal
            .buffers
            .lock()
            .ok()?
            .get(&id)
            .map(|e| e.wgpu_buffer.clone())
    }

    pub(crate) fn get_wgpu_render_pipeline(
        &self,
        id: RenderPipelineId,
    ) -> Option<Arc<wgpu::RenderPipeline>> {
        self.internal.render_pipelines.lock().ok()?.get(&id).cloned()
    }

    pub(crate) fn get_wgpu_compute_pipeline(
        &self,
        id: ComputePipelineId,
    ) -> Option<Arc<wgpu::ComputePipeline>> {
        self.internal.compute_pipelines.lock().ok()?.get(&id).cloned()
    }

    pub(crate) fn get_wgpu_bind_group(&self, id: BindGroupId) -> Option<Arc<wgpu::BindGroup>> {
        self.internal.bind_groups.lock().ok()?.get(&id).cloned()
    }

    pub(crate) fn get_wgpu_texture_view(&self, id: TextureViewId) -> Option<Arc<wgpu::TextureView>> {
        self.internal.texture_views.lock().ok()?.get(&id).cloned()
    }

    pub(crate) fn hal_features(&self) -> &DeviceFeatures {
        &self.internal.features
    }

    pub(crate) fn register_command_buffer(&self, buffer: wgpu::CommandBuffer) -> CommandBufferId {
        let id = CommandBufferId(
            self.internal
                .command_buffer_id_counter
                .fetch_add(1, Ordering::Relaxed),
        );
        if let Ok(mut pending) = self.internal.pending_command_buffers.lock() {
            pending.insert(id, buffer);
        }
        id
    }

    /// Maps the requested residency onto wgpu usage flags.
    ///
    /// wgpu exposes no linked host/device heap, so `LinkedDeviceHost`
    /// becomes a device-local buffer with staged uploads through the queue,
    /// the fallback the residency contract allows.
    fn effective_usage(descriptor: &BufferDescriptor) -> wgpu::BufferUsages {
        let mut usage: wgpu::BufferUsages = descriptor.usage.into_wgpu();
        match descriptor.residency {
            BufferResidency::DeviceLocal | BufferResidency::LinkedDeviceHost => {
                usage |= wgpu::BufferUsages::COPY_DST;
            }
            BufferResidency::HostReadback => {
                usage |= wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST;
            }
        }
        usage
    }
}

impl GraphicsDevice for WgpuDevice {
    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError> {
        let source = match &descriptor.source {
            ShaderSourceData::Wgsl(text) => wgpu::ShaderSource::Wgsl(text.clone()),
            ShaderSourceData::Glsl { stage, .. } => {
                return Err(ResourceError::Shader {
                    label: descriptor.label.unwrap_or_default().to_string(),
                    details: format!(
                        "GLSL source for {stage:?} stage is not supported by the wgpu backend"
                    ),
                });
            }
        };

        let module = self
            .wgpu_device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: descriptor.label,
                source,
            });

        let id = ShaderModuleId(self.next_id());
        lock(&self.internal.shader_modules, "shader_modules")?.insert(id, Arc::new(module));
        log::debug!(
            "WgpuDevice: Created shader module '{}' with ID: {id:?}",
            descriptor.label.unwrap_or_default()
        );
        Ok(id)
    }

    fn destroy_shader_module(&self, id: ShaderModuleId) -> Result<(), ResourceError> {
        lock(&self.internal.shader_modules, "shader_modules")?
            .remove(&id)
            .map(|_| ())
            .ok_or(ResourceError::NotFound)
    }

    fn create_bind_group_layout(
        &self,
        descriptor: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayoutId, ResourceError> {
        let entries: Vec<wgpu::BindGroupLayoutEntry> = descriptor
            .entries
            .iter()
            .map(|entry| wgpu::BindGroupLayoutEntry {
                binding: entry.binding,
                visibility: entry.visibility.into_wgpu(),
                ty: entry.ty.into_wgpu(),
                count: None,
            })
            .collect();

        let layout = self
            .wgpu_device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: descriptor.label.as_deref(),
                entries: &entries,
            });

        let id = BindGroupLayoutId(self.next_id());
        lock(&self.internal.bind_group_layouts, "bind_group_layouts")?.insert(id, Arc::new(layout));
        Ok(id)
    }

    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError> {
        if !descriptor.push_constant_ranges.is_empty() && !self.internal.features.push_constants {
            return Err(ResourceError::MissingCapability {
                feature: "push constants",
            });
        }

        let layouts_guard = lock(&self.internal.bind_group_layouts, "bind_group_layouts")?;
        let mut bind_group_layouts = Vec::with_capacity(descriptor.bind_group_layouts.len());
        for id in &descriptor.bind_group_layouts {
            bind_group_layouts.push(layouts_guard.get(id).ok_or(ResourceError::NotFound)?.clone());
        }
        let layout_refs: Vec<&wgpu::BindGroupLayout> =
            bind_group_layouts.iter().map(|l| l.as_ref()).collect();

        let push_constant_ranges: Vec<wgpu::PushConstantRange> = descriptor
            .push_constant_ranges
            .iter()
            .map(|range| wgpu::PushConstantRange {
                stages: range.stages.into_wgpu(),
                range: range.range.clone(),
            })
            .collect();

        let layout = self
            .wgpu_device()
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: descriptor.label.as_deref(),
                bind_group_layouts: &layout_refs,
                push_constant_ranges: &push_constant_ranges,
            });
        drop(layouts_guard);

        let id = PipelineLayoutId(self.next_id());
        lock(&self.internal.pipeline_layouts, "pipeline_layouts")?.insert(id, Arc::new(layout));
        Ok(id)
    }

    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError> {
        let layout = lock(&self.internal.bind_group_layouts, "bind_group_layouts")?
            .get(&descriptor.layout)
            .cloned()
            .ok_or(ResourceError::NotFound)?;

        let buffers_guard = lock(&self.internal.buffers, "buffers")?;
        let mut bound_buffers = Vec::with_capacity(descriptor.entries.len());
        for entry in &descriptor.entries {
            let BindingResource::Buffer(binding) = entry.resource;
            let buffer = buffers_guard
                .get(&binding.buffer)
                .ok_or(ResourceError::NotFound)?
                .wgpu_buffer
                .clone();
            bound_buffers.push((entry.binding, buffer, binding.offset, binding.size));
        }
        drop(buffers_guard);

        let entries: Vec<wgpu::BindGroupEntry> = bound_buffers
            .iter()
            .map(|(binding, buffer, offset, size)| wgpu::BindGroupEntry {
                binding: *binding,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: buffer.as_ref(),
                    offset: *offset,
                    size: (*size).and_then(std::num::NonZeroU64::new),
                }),
            })
            .collect();

        let bind_group = self
            .wgpu_device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: descriptor.label.as_deref(),
                layout: layout.as_ref(),
                entries: &entries,
            });

        let id = BindGroupId(self.next_id());
        lock(&self.internal.bind_groups, "bind_groups")?.insert(id, Arc::new(bind_group));
        Ok(id)
    }

    fn destroy_bind_group(&self, id: BindGroupId) -> Result<(), ResourceError> {
        lock(&self.internal.bind_groups, "bind_groups")?
            .remove(&id)
            .map(|_| ())
            .ok_or(ResourceError::NotFound)
    }

    fn create_render_pipeline(
        &self,
        descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError> {
        let modules_guard = lock(&self.internal.shader_modules, "shader_modules")?;
        let vertex_module = modules_guard
            .get(&descriptor.vertex_shader)
            .cloned()
            .ok_or(ResourceError::NotFound)?;
        let fragment_module = match descriptor.fragment_shader {
            Some(id) => Some(modules_guard.get(&id).cloned().ok_or(ResourceError::NotFound)?),
            None => None,
        };
        drop(modules_guard);

        let layout = lock(&self.internal.pipeline_layouts, "pipeline_layouts")?
            .get(&descriptor.layout)
            .cloned()
            .ok_or(ResourceError::NotFound)?;

        let attribute_storage: Vec<Vec<wgpu::VertexAttribute>> = descriptor
            .vertex_buffers
            .iter()
            .map(|vb| {
                vb.attributes
                    .iter()
                    .map(|attr| wgpu::VertexAttribute {
                        format: attr.format.into_wgpu(),
                        offset: attr.offset,
                        shader_location: attr.shader_location,
                    })
                    .collect()
            })
            .collect();
        let vertex_buffers: Vec<wgpu::VertexBufferLayout> = descriptor
            .vertex_buffers
            .iter()
            .zip(attribute_storage.iter())
            .map(|(vb, attributes)| wgpu::VertexBufferLayout {
                array_stride: vb.array_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            })
            .collect();

        let color_targets: Vec<Option<wgpu::ColorTargetState>> = descriptor
            .color_format
            .iter()
            .map(|format| {
                Some(wgpu::ColorTargetState {
                    format: format.into_wgpu(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })
            })
            .collect();

        let depth_stencil = descriptor.depth.map(|depth| wgpu::DepthStencilState {
            format: depth.format.into_wgpu(),
            depth_write_enabled: depth.depth_write,
            depth_compare: depth.compare.into_wgpu(),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let pipeline = self
            .wgpu_device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: descriptor.label.as_deref(),
                layout: Some(layout.as_ref()),
                vertex: wgpu::VertexState {
                    module: vertex_module.as_ref(),
                    entry_point: Some(descriptor.vertex_entry.as_ref()),
                    buffers: &vertex_buffers,
                    compilation_options: Default::default(),
                },
                fragment: fragment_module.as_ref().map(|module| wgpu::FragmentState {
                    module: module.as_ref(),
                    entry_point: Some(descriptor.fragment_entry.as_ref()),
                    targets: &color_targets,
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: descriptor.topology.into_wgpu(),
                    ..Default::default()
                },
                depth_stencil,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let id = RenderPipelineId(self.next_id());
        lock(&self.internal.render_pipelines, "render_pipelines")?.insert(id, Arc::new(pipeline));
        log::info!(
            "WgpuDevice: Created render pipeline '{}' with ID: {id:?}",
            descriptor.label.as_deref().unwrap_or_default()
        );
        Ok(id)
    }

    fn create_compute_pipeline(
        &self,
        descriptor: &ComputePipelineDescriptor,
    ) -> Result<ComputePipelineId, ResourceError> {
        let module = lock(&self.internal.shader_modules, "shader_modules")?
            .get(&descriptor.shader_module)
            .cloned()
            .ok_or(ResourceError::NotFound)?;
        let layout = lock(&self.internal.pipeline_layouts, "pipeline_layouts")?
            .get(&descriptor.layout)
            .cloned()
            .ok_or(ResourceError::NotFound)?;

        let pipeline = self
            .wgpu_device()
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: descriptor.label.as_deref(),
                layout: Some(layout.as_ref()),
                module: module.as_ref(),
                entry_point: Some(descriptor.entry_point.as_ref()),
                compilation_options: Default::default(),
                cache: None,
            });

        let id = ComputePipelineId(self.next_id());
        lock(&self.internal.compute_pipelines, "compute_pipelines")?.insert(id, Arc::new(pipeline));
        log::info!(
            "WgpuDevice: Created compute pipeline '{}' with ID: {id:?}",
            descriptor.label.as_deref().unwrap_or_default()
        );
        Ok(id)
    }

    fn create_mesh_pipeline(
        &self,
        descriptor: &MeshPipelineDescriptor,
    ) -> Result<MeshPipelineId, ResourceError> {
        log::warn!(
            "WgpuDevice: Mesh pipeline '{}' requested but wgpu exposes no mesh-shading support.",
            descriptor.label.as_deref().unwrap_or_default()
        );
        Err(ResourceError::MissingCapability {
            feature: "mesh shading",
        })
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        // wgpu zero-initializes all new buffer memory, which covers the
        // zero_init contract for atomic-counter buffers without a clear.
        let buffer = self.wgpu_device().create_buffer(&wgpu::BufferDescriptor {
            label: descriptor.label.as_deref(),
            size: descriptor.size,
            usage: Self::effective_usage(descriptor),
            mapped_at_creation: false,
        });

        let id = BufferId(self.next_id());
        lock(&self.internal.buffers, "buffers")?.insert(
            id,
            WgpuBufferEntry {
                wgpu_buffer: Arc::new(buffer),
                size: descriptor.size,
            },
        );
        log::debug!(
            "WgpuDevice: Created buffer '{}' with ID: {id:?}, size: {} bytes",
            descriptor.label.as_deref().unwrap_or_default(),
            descriptor.size
        );
        Ok(id)
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        let buffer = self
            .wgpu_device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: descriptor.label.as_deref(),
                contents: data,
                usage: Self::effective_usage(descriptor),
            });

        let id = BufferId(self.next_id());
        lock(&self.internal.buffers, "buffers")?.insert(
            id,
            WgpuBufferEntry {
                wgpu_buffer: Arc::new(buffer),
                size: data.len() as u64,
            },
        );
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        // Dropping the Arc defers the actual release until in-flight
        // submissions holding their own reference complete.
        lock(&self.internal.buffers, "buffers")?
            .remove(&id)
            .map(|_| ())
            .ok_or(ResourceError::NotFound)
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let buffer = self.get_wgpu_buffer(id).ok_or(ResourceError::NotFound)?;
        self.wgpu_queue().write_buffer(buffer.as_ref(), offset, data);
        Ok(())
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        let texture = self.wgpu_device().create_texture(&wgpu::TextureDescriptor {
            label: descriptor.label.as_deref(),
            size: wgpu::Extent3d {
                width: descriptor.size.width,
                height: descriptor.size.height,
                depth_or_array_layers: descriptor.size.depth_or_array_layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: descriptor.format.into_wgpu(),
            usage: descriptor.usage.into_wgpu(),
            view_formats: &[],
        });

        let id = TextureId(self.next_id());
        lock(&self.internal.textures, "textures")?.insert(id, Arc::new(texture));
        Ok(id)
    }

    fn create_texture_view(
        &self,
        texture_id: TextureId,
        descriptor: &TextureViewDescriptor,
    ) -> Result<TextureViewId, ResourceError> {
        let texture = lock(&self.internal.textures, "textures")?
            .get(&texture_id)
            .cloned()
            .ok_or(ResourceError::NotFound)?;

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: descriptor.label.as_deref(),
            ..Default::default()
        });

        let id = TextureViewId(self.next_id());
        lock(&self.internal.texture_views, "texture_views")?.insert(id, Arc::new(view));
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        lock(&self.internal.textures, "textures")?
            .remove(&id)
            .map(|_| ())
            .ok_or(ResourceError::NotFound)
    }

    fn register_indirect_layout(
        &self,
        descriptor: &IndirectLayoutDescriptor,
    ) -> Result<IndirectLayoutId, ResourceError> {
        log::warn!(
            "WgpuDevice: Indirect layout '{}' requested but wgpu exposes no device-generated commands.",
            descriptor.label.as_deref().unwrap_or_default()
        );
        Err(ResourceError::MissingCapability {
            feature: "device-generated compute",
        })
    }

    fn features(&self) -> &DeviceFeatures {
        &self.internal.features
    }

    fn adapter_profile(&self) -> AdapterProfile {
        let info = self.internal.context.adapter.get_info();
        AdapterProfile {
            name: info.name,
            backend: match info.backend {
                wgpu::Backend::Vulkan => BackendKind::Vulkan,
                wgpu::Backend::Metal => BackendKind::Metal,
                wgpu::Backend::Dx12 => BackendKind::Dx12,
                wgpu::Backend::Gl => BackendKind::Gl,
                _ => BackendKind::Other,
            },
            device_type: match info.device_type {
                wgpu::DeviceType::IntegratedGpu => DeviceKind::IntegratedGpu,
                wgpu::DeviceType::DiscreteGpu => DeviceKind::DiscreteGpu,
                wgpu::DeviceType::VirtualGpu => DeviceKind::VirtualGpu,
                wgpu::DeviceType::Cpu => DeviceKind::Cpu,
                wgpu::DeviceType::Other => DeviceKind::Other,
            },
        }
    }

    fn create_command_encoder(
        &self,
        queue: QueueType,
        label: Option<&str>,
    ) -> Box<dyn CommandEncoder> {
        if queue == QueueType::AsyncCompute {
            // wgpu exposes a single queue; async-compute routing is a
            // scheduling hint this backend cannot honor.
            log::debug!("WgpuDevice: AsyncCompute queue requested, routing to the generic queue.");
        }
        let encoder = self
            .wgpu_device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label });
        Box::new(WgpuCommandEncoder {
            encoder: Some(encoder),
            device: self.clone(),
        })
    }

    fn submit_command_buffer(&self, command_buffer: CommandBufferId) {
        let pending = self
            .internal
            .pending_command_buffers
            .lock()
            .ok()
            .and_then(|mut map| map.remove(&command_buffer));
        match pending {
            Some(buffer) => {
                self.wgpu_queue().submit(std::iter::once(buffer));
            }
            None => {
                log::warn!(
                    "WgpuDevice: Submit requested for unknown command buffer {command_buffer:?}."
                );
            }
        }
    }
}
