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

use crate::gpu::api::*;
use crate::gpu::error::ResourceError;
use crate::gpu::traits::CommandEncoder;
use std::fmt::Debug;

/// The backend-agnostic device interface the submission lane records against.
///
/// Implementations are internally synchronized: `&self` methods may be
/// called from any thread, though the lane itself records a frame from a
/// single thread.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Creates a shader module from the provided descriptor.
    ///
    /// ## Errors
    /// * `ResourceError::Shader` - If compilation fails or the source
    ///   language is not supported by the backend.
    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError>;

    /// Destroys the shader module associated with the given ID.
    fn destroy_shader_module(&self, id: ShaderModuleId) -> Result<(), ResourceError>;

    /// Creates a bind group layout from the provided descriptor.
    fn create_bind_group_layout(
        &self,
        descriptor: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayoutId, ResourceError>;

    /// Creates a pipeline layout from the provided descriptor.
    ///
    /// ## Errors
    /// * `ResourceError::MissingCapability` - If the descriptor carries
    ///   push-constant ranges on a device without push-constant support.
    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError>;

    /// Creates a bind group from the provided descriptor.
    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError>;

    /// Destroys a bind group.
    fn destroy_bind_group(&self, id: BindGroupId) -> Result<(), ResourceError>;

    /// Creates a render pipeline from the provided descriptor.
    fn create_render_pipeline(
        &self,
        descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError>;

    /// Creates a compute pipeline from the provided descriptor.
    fn create_compute_pipeline(
        &self,
        descriptor: &ComputePipelineDescriptor,
    ) -> Result<ComputePipelineId, ResourceError>;

    /// Creates a mesh-shading pipeline from the provided descriptor.
    ///
    /// ## Errors
    /// * `ResourceError::MissingCapability` - If the device does not report
    ///   mesh-shading support. Checked before any shader is touched.
    fn create_mesh_pipeline(
        &self,
        descriptor: &MeshPipelineDescriptor,
    ) -> Result<MeshPipelineId, ResourceError>;

    /// Creates a new GPU buffer.
    ///
    /// A request for [`BufferResidency::LinkedDeviceHost`] on a backend
    /// without such a memory type is satisfied with a device-local buffer
    /// plus staged uploads; it does not fail for that reason.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError>;

    /// Creates a new GPU buffer and initializes it with the provided data.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Destroys a GPU buffer.
    ///
    /// Safe to call while previously submitted work still references the
    /// buffer; the backend defers the actual release.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Writes data to a GPU buffer at the given byte offset.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Creates a new GPU texture.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError>;

    /// Creates a new texture view for a given texture.
    fn create_texture_view(
        &self,
        texture_id: TextureId,
        descriptor: &TextureViewDescriptor,
    ) -> Result<TextureViewId, ResourceError>;

    /// Destroys a GPU texture and the views created from it.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Registers an indirect-command layout for device-generated execution.
    ///
    /// The returned layout is immutable and may be referenced by any number
    /// of concurrent `execute_indirect_commands` recordings.
    ///
    /// ## Errors
    /// * `ResourceError::MissingCapability` - If the device does not report
    ///   device-generated compute. Callers must treat this as fatal for the
    ///   device-generated path rather than retrying.
    fn register_indirect_layout(
        &self,
        descriptor: &IndirectLayoutDescriptor,
    ) -> Result<IndirectLayoutId, ResourceError>;

    /// The capability report filled in at device creation.
    fn features(&self) -> &DeviceFeatures;

    /// Identifying information about the underlying adapter.
    fn adapter_profile(&self) -> AdapterProfile;

    /// Creates a new command encoder to record GPU commands for `queue`.
    fn create_command_encoder(
        &self,
        queue: QueueType,
        label: Option<&str>,
    ) -> Box<dyn CommandEncoder>;

    /// Submits a previously recorded command buffer to the GPU for execution.
    fn submit_command_buffer(&self, command_buffer: CommandBufferId);
}
