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

//! A recording mock of the graphics HAL for lane integration tests.
//!
//! Every operation appends a [`Command`] to a shared log; buffers keep
//! their uploaded bytes so tests can interpret device-visible data (e.g.
//! device-generated command records) without a GPU.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use mica_core::gpu::error::ResourceError;
use mica_core::gpu::*;
use std::any::Any;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded HAL operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginRenderPass {
        label: Option<String>,
        color_attachments: usize,
        has_depth: bool,
    },
    EndRenderPass,
    BeginComputePass,
    EndComputePass,
    SetRenderPipeline(RenderPipelineId),
    SetMeshPipeline(MeshPipelineId),
    SetComputePipeline(ComputePipelineId),
    SetBindGroup(u32, BindGroupId),
    SetVertexBuffer(u32, BufferId),
    SetIndexBuffer(BufferId),
    SetPushConstants { offset: u32, data: Vec<u8> },
    Draw,
    DrawIndexed,
    DrawMeshTasks { x: u32, y: u32, z: u32 },
    MultiDrawIndexedIndirectCount {
        args_buffer: BufferId,
        args_offset: u64,
        count_buffer: BufferId,
        count_offset: u64,
        max_count: u32,
    },
    Dispatch { x: u32, y: u32, z: u32 },
    DispatchIndirect { buffer: BufferId, offset: u64 },
    ComputeToIndirectBarrier,
    CopyBufferToBuffer,
    ExecuteIndirectCommands {
        layout: IndirectLayoutId,
        max_count: u32,
        records: BufferId,
        count_buffer: Option<BufferId>,
    },
    Finish(CommandBufferId),
    Submit(CommandBufferId),
}

#[derive(Debug, Clone)]
pub struct MockBuffer {
    pub label: Option<String>,
    pub size: u64,
    pub usage: BufferUsage,
    pub zero_init: bool,
    pub data: Vec<u8>,
    /// `false` once destroyed; entries are kept so tests can inspect
    /// per-frame allocations after the frame released them.
    pub alive: bool,
}

#[derive(Debug, Default)]
struct MockState {
    commands: Vec<Command>,
    buffers: HashMap<BufferId, MockBuffer>,
    indirect_layouts: HashMap<IndirectLayoutId, (Vec<IndirectLayoutToken>, u32)>,
}

/// A HAL device that records instead of executing.
#[derive(Debug, Clone)]
pub struct MockDevice {
    features: DeviceFeatures,
    state: Arc<Mutex<MockState>>,
    next_id: Arc<AtomicUsize>,
}

impl MockDevice {
    pub fn new(features: DeviceFeatures) -> Self {
        Self {
            features,
            state: Arc::new(Mutex::new(MockState::default())),
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// A device resembling the wgpu backend: fallback-capable, no mesh
    /// shading, no device-generated compute.
    pub fn fallback_capable() -> Self {
        Self::new(DeviceFeatures {
            multi_draw_indirect_count: true,
            push_constants: true,
            ..Default::default()
        })
    }

    /// A device with full native mesh-shading support.
    pub fn mesh_shading_capable(preferred: u32, max: u32) -> Self {
        Self::new(DeviceFeatures {
            mesh_shading: Some(MeshShadingLimits {
                max_preferred_workgroup_invocations: preferred,
                max_workgroup_invocations: max,
            }),
            multi_draw_indirect_count: true,
            push_constants: true,
            subgroup_size_control: true,
            ..Default::default()
        })
    }

    /// A device that can expand pre-built compute command records itself.
    pub fn dgc_capable() -> Self {
        Self::new(DeviceFeatures {
            device_generated_compute: true,
            multi_draw_indirect_count: true,
            push_constants: true,
            ..Default::default()
        })
    }

    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn push(&self, command: Command) {
        self.state.lock().unwrap().commands.push(command);
    }

    /// A copy of the recorded command log.
    pub fn commands(&self) -> Vec<Command> {
        self.state.lock().unwrap().commands.clone()
    }

    /// The live (not yet destroyed) buffer with the given ID.
    pub fn buffer(&self, id: BufferId) -> Option<MockBuffer> {
        self.state.lock().unwrap().buffers.get(&id).cloned()
    }

    /// Finds a live buffer by its debug label.
    pub fn buffer_by_label(&self, label: &str) -> Option<(BufferId, MockBuffer)> {
        let state = self.state.lock().unwrap();
        state
            .buffers
            .iter()
            .find(|(_, b)| b.label.as_deref() == Some(label))
            .map(|(id, b)| (*id, b.clone()))
    }

    /// The registered token list and stride of an indirect layout.
    pub fn indirect_layout(
        &self,
        id: IndirectLayoutId,
    ) -> Option<(Vec<IndirectLayoutToken>, u32)> {
        self.state.lock().unwrap().indirect_layouts.get(&id).cloned()
    }

    fn insert_buffer(&self, descriptor: &BufferDescriptor, data: Vec<u8>) -> BufferId {
        let id = BufferId(self.next());
        self.state.lock().unwrap().buffers.insert(
            id,
            MockBuffer {
                label: descriptor.label.as_ref().map(|l| l.to_string()),
                size: descriptor.size,
                usage: descriptor.usage,
                zero_init: descriptor.zero_init,
                data,
                alive: true,
            },
        );
        id
    }
}

impl GraphicsDevice for MockDevice {
    fn create_shader_module(
        &self,
        _descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError> {
        Ok(ShaderModuleId(self.next()))
    }

    fn destroy_shader_module(&self, _id: ShaderModuleId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_bind_group_layout(
        &self,
        _descriptor: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayoutId, ResourceError> {
        Ok(BindGroupLayoutId(self.next()))
    }

    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError> {
        if !descriptor.push_constant_ranges.is_empty() && !self.features.push_constants {
            return Err(ResourceError::MissingCapability {
                feature: "push constants",
            });
        }
        Ok(PipelineLayoutId(self.next()))
    }

    fn create_bind_group(
        &self,
        _descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError> {
        Ok(BindGroupId(self.next()))
    }

    fn destroy_bind_group(&self, _id: BindGroupId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_render_pipeline(
        &self,
        _descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError> {
        Ok(RenderPipelineId(self.next()))
    }

    fn create_compute_pipeline(
        &self,
        _descriptor: &ComputePipelineDescriptor,
    ) -> Result<ComputePipelineId, ResourceError> {
        Ok(ComputePipelineId(self.next()))
    }

    fn create_mesh_pipeline(
        &self,
        _descriptor: &MeshPipelineDescriptor,
    ) -> Result<MeshPipelineId, ResourceError> {
        if self.features.mesh_shading.is_none() {
            return Err(ResourceError::MissingCapability {
                feature: "mesh shading",
            });
        }
        Ok(MeshPipelineId(self.next()))
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        let data = if descriptor.zero_init {
            vec![0u8; descriptor.size as usize]
        } else {
            Vec::new()
        };
        Ok(self.insert_buffer(descriptor, data))
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        Ok(self.insert_buffer(descriptor, data.to_vec()))
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let mut state = self.state.lock().unwrap();
        let buffer = state.buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        if !buffer.alive {
            return Err(ResourceError::InvalidHandle);
        }
        buffer.alive = false;
        Ok(())
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let mut state = self.state.lock().unwrap();
        let buffer = state.buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        let end = offset as usize + data.len();
        if buffer.data.len() < end {
            buffer.data.resize(end, 0);
        }
        buffer.data[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn create_texture(&self, _descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        Ok(TextureId(self.next()))
    }

    fn create_texture_view(
        &self,
        _texture_id: TextureId,
        _descriptor: &TextureViewDescriptor,
    ) -> Result<TextureViewId, ResourceError> {
        Ok(TextureViewId(self.next()))
    }

    fn destroy_texture(&self, _id: TextureId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn register_indirect_layout(
        &self,
        descriptor: &IndirectLayoutDescriptor,
    ) -> Result<IndirectLayoutId, ResourceError> {
        if !self.features.device_generated_compute {
            return Err(ResourceError::MissingCapability {
                feature: "device-generated compute",
            });
        }
        let id = IndirectLayoutId(self.next());
        self.state
            .lock()
            .unwrap()
            .indirect_layouts
            .insert(id, (descriptor.tokens.clone(), descriptor.stride));
        Ok(id)
    }

    fn features(&self) -> &DeviceFeatures {
        &self.features
    }

    fn adapter_profile(&self) -> AdapterProfile {
        AdapterProfile {
            name: "Mock Adapter".to_string(),
            backend: BackendKind::Other,
            device_type: DeviceKind::Other,
        }
    }

    fn create_command_encoder(
        &self,
        _queue: QueueType,
        _label: Option<&str>,
    ) -> Box<dyn CommandEncoder> {
        Box::new(MockCommandEncoder {
            device: self.clone(),
        })
    }

    fn submit_command_buffer(&self, command_buffer: CommandBufferId) {
        self.push(Command::Submit(command_buffer));
    }
}

pub struct MockCommandEncoder {
    device: MockDevice,
}

impl CommandEncoder for MockCommandEncoder {
    fn begin_render_pass<'encoder>(
        &'encoder mut self,
        descriptor: &RenderPassDescriptor<'encoder>,
    ) -> Box<dyn RenderPass<'encoder> + 'encoder> {
        self.device.push(Command::BeginRenderPass {
            label: descriptor.label.map(str::to_string),
            color_attachments: descriptor.color_attachments.len(),
            has_depth: descriptor.depth_stencil_attachment.is_some(),
        });
        Box::new(MockRenderPass {
            device: self.device.clone(),
        })
    }

    fn begin_compute_pass<'encoder>(
        &'encoder mut self,
        _descriptor: &ComputePassDescriptor<'encoder>,
    ) -> Box<dyn ComputePass<'encoder> + 'encoder> {
        self.device.push(Command::BeginComputePass);
        Box::new(MockComputePass {
            device: self.device.clone(),
        })
    }

    fn compute_to_indirect_barrier(&mut self) {
        self.device.push(Command::ComputeToIndirectBarrier);
    }

    fn copy_buffer_to_buffer(
        &mut self,
        _source: &BufferId,
        _source_offset: u64,
        _destination: &BufferId,
        _destination_offset: u64,
        _size: u64,
    ) {
        self.device.push(Command::CopyBufferToBuffer);
    }

    fn execute_indirect_commands(
        &mut self,
        layout: IndirectLayoutId,
        max_count: u32,
        records: &BufferId,
        _records_offset: u64,
        count_buffer: Option<&BufferId>,
        _count_offset: u64,
    ) {
        self.device.push(Command::ExecuteIndirectCommands {
            layout,
            max_count,
            records: *records,
            count_buffer: count_buffer.copied(),
        });
    }

    fn finish(self: Box<Self>) -> CommandBufferId {
        let id = CommandBufferId(self.device.next() as u64);
        self.device.push(Command::Finish(id));
        id
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub struct MockRenderPass {
    device: MockDevice,
}

impl Drop for MockRenderPass {
    fn drop(&mut self) {
        self.device.push(Command::EndRenderPass);
    }
}

impl<'pass> RenderPass<'pass> for MockRenderPass {
    fn set_pipeline(&mut self, pipeline: &'pass RenderPipelineId) {
        self.device.push(Command::SetRenderPipeline(*pipeline));
    }

    fn set_mesh_pipeline(&mut self, pipeline: &'pass MeshPipelineId) {
        self.device.push(Command::SetMeshPipeline(*pipeline));
    }

    fn set_bind_group(&mut self, index: u32, bind_group: &'pass BindGroupId) {
        self.device.push(Command::SetBindGroup(index, *bind_group));
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &'pass BufferId, _offset: u64) {
        self.device.push(Command::SetVertexBuffer(slot, *buffer));
    }

    fn set_index_buffer(
        &mut self,
        buffer: &'pass BufferId,
        _offset: u64,
        _index_format: IndexFormat,
    ) {
        self.device.push(Command::SetIndexBuffer(*buffer));
    }

    fn set_push_constants(&mut self, _stages: ShaderStageFlags, offset: u32, data: &[u8]) {
        self.device.push(Command::SetPushConstants {
            offset,
            data: data.to_vec(),
        });
    }

    fn draw(&mut self, _vertices: Range<u32>, _instances: Range<u32>) {
        self.device.push(Command::Draw);
    }

    fn draw_indexed(&mut self, _indices: Range<u32>, _base_vertex: i32, _instances: Range<u32>) {
        self.device.push(Command::DrawIndexed);
    }

    fn draw_mesh_tasks(&mut self, x: u32, y: u32, z: u32) {
        self.device.push(Command::DrawMeshTasks { x, y, z });
    }

    fn multi_draw_indexed_indirect_count(
        &mut self,
        args_buffer: &'pass BufferId,
        args_offset: u64,
        count_buffer: &'pass BufferId,
        count_offset: u64,
        max_count: u32,
    ) {
        self.device.push(Command::MultiDrawIndexedIndirectCount {
            args_buffer: *args_buffer,
            args_offset,
            count_buffer: *count_buffer,
            count_offset,
            max_count,
        });
    }
}

pub struct MockComputePass {
    device: MockDevice,
}

impl Drop for MockComputePass {
    fn drop(&mut self) {
        self.device.push(Command::EndComputePass);
    }
}

impl<'pass> ComputePass<'pass> for MockComputePass {
    fn set_pipeline(&mut self, pipeline: &'pass ComputePipelineId) {
        self.device.push(Command::SetComputePipeline(*pipeline));
    }

    fn set_bind_group(&mut self, index: u32, bind_group: &'pass BindGroupId) {
        self.device.push(Command::SetBindGroup(index, *bind_group));
    }

    fn set_push_constants(&mut self, offset: u32, data: &[u8]) {
        self.device.push(Command::SetPushConstants {
            offset,
            data: data.to_vec(),
        });
    }

    fn dispatch_workgroups(&mut self, x: u32, y: u32, z: u32) {
        self.device.push(Command::Dispatch { x, y, z });
    }

    fn dispatch_workgroups_indirect(&mut self, buffer: &'pass BufferId, offset: u64) {
        self.device.push(Command::DispatchIndirect {
            buffer: *buffer,
            offset,
        });
    }
}

/// A registry serving fixed draw ranges over mock-device buffers.
pub struct TestRegistry {
    encoding: MeshEncoding,
    ranges: HashMap<u32, DrawRange>,
    meshlet: Option<MeshletBuffers>,
    conventional: Option<ConventionalBuffers>,
}

impl TestRegistry {
    fn plain_buffer(device: &MockDevice, label: &'static str, size: u64, usage: BufferUsage) -> BufferId {
        device
            .create_buffer(&BufferDescriptor {
                label: Some(std::borrow::Cow::Borrowed(label)),
                size,
                usage,
                residency: BufferResidency::DeviceLocal,
                zero_init: false,
            })
            .expect("mock buffer creation cannot fail")
    }

    /// A registry in conventional (index/vertex buffer) encoding.
    pub fn conventional(device: &MockDevice, ranges: &[(u32, DrawRange)]) -> Self {
        let storage = BufferUsage::STORAGE;
        Self {
            encoding: MeshEncoding::Conventional,
            ranges: ranges.iter().copied().collect(),
            meshlet: None,
            conventional: Some(ConventionalBuffers {
                indices: Self::plain_buffer(device, "registry indices", 1 << 16, BufferUsage::INDEX),
                positions: Self::plain_buffer(device, "registry positions", 1 << 16, BufferUsage::VERTEX),
                attributes: Self::plain_buffer(device, "registry attributes", 1 << 16, BufferUsage::VERTEX),
                group_draws: Self::plain_buffer(device, "registry group draws", 1 << 16, storage),
            }),
        }
    }

    /// A registry in native meshlet encoding.
    pub fn meshlet(device: &MockDevice, ranges: &[(u32, DrawRange)]) -> Self {
        let storage = BufferUsage::STORAGE;
        Self {
            encoding: MeshEncoding::Meshlet,
            ranges: ranges.iter().copied().collect(),
            meshlet: Some(MeshletBuffers {
                headers: Self::plain_buffer(device, "registry meshlet headers", 1 << 16, storage),
                stream_headers: Self::plain_buffer(device, "registry stream headers", 1 << 16, storage),
                payload: Self::plain_buffer(device, "registry payload", 1 << 20, storage),
            }),
            conventional: None,
        }
    }
}

impl MeshRegistry for TestRegistry {
    fn draw_range(&self, mesh: MeshHandle) -> Option<DrawRange> {
        self.ranges.get(&mesh.0).copied()
    }

    fn style(&self, _mesh: MeshHandle) -> MeshStyle {
        MeshStyle::Textured
    }

    fn encoding(&self) -> MeshEncoding {
        self.encoding
    }

    fn meshlet_buffers(&self) -> Option<MeshletBuffers> {
        self.meshlet
    }

    fn conventional_buffers(&self) -> Option<ConventionalBuffers> {
        self.conventional
    }
}
