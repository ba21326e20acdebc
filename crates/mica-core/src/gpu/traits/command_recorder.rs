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

use crate::gpu::api::{
    BindGroupId, BufferId, CommandBufferId, ComputePassDescriptor, ComputePipelineId, IndexFormat,
    IndirectLayoutId, MeshPipelineId, RenderPassDescriptor, RenderPipelineId, ShaderStageFlags,
};
use std::any::Any;
use std::ops::Range;

/// A trait representing an active render pass, used for recording drawing
/// commands.
///
/// A `RenderPass` object is obtained from a [`CommandEncoder`]. The `'pass`
/// lifetime ensures that the pass object cannot outlive the encoder that
/// created it, and that any resources bound to it also live long enough.
pub trait RenderPass<'pass> {
    /// Sets the active render pipeline for subsequent draw calls.
    fn set_pipeline(&mut self, pipeline: &'pass RenderPipelineId);

    /// Sets the active mesh-shading pipeline for subsequent
    /// [`draw_mesh_tasks`](Self::draw_mesh_tasks) calls.
    fn set_mesh_pipeline(&mut self, pipeline: &'pass MeshPipelineId);

    /// Binds a bind group at the given group index.
    fn set_bind_group(&mut self, index: u32, bind_group: &'pass BindGroupId);

    /// Binds a vertex buffer to a specific slot.
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &'pass BufferId, offset: u64);

    /// Binds an index buffer for indexed drawing.
    fn set_index_buffer(&mut self, buffer: &'pass BufferId, offset: u64, index_format: IndexFormat);

    /// Writes a push-constant range visible to `stages`.
    fn set_push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]);

    /// Records a non-indexed draw call.
    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);

    /// Records an indexed draw call.
    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>);

    /// Records one mesh-shading dispatch of `x * y * z` task workgroups.
    ///
    /// Only valid after [`set_mesh_pipeline`](Self::set_mesh_pipeline) on a
    /// device reporting mesh-shading support; callers gate on the feature
    /// before recording.
    fn draw_mesh_tasks(&mut self, x: u32, y: u32, z: u32);

    /// Records one multi-draw of indexed indirect commands with the live
    /// draw count sourced from `count_buffer`.
    ///
    /// The device reads up to `max_count` [`DrawIndexedIndirectArgs`]
    /// records from `args_buffer` starting at `args_offset`, executing only
    /// as many as the `u32` at `count_offset` in `count_buffer` dictates.
    /// The host never learns the executed count.
    ///
    /// [`DrawIndexedIndirectArgs`]: crate::gpu::api::DrawIndexedIndirectArgs
    fn multi_draw_indexed_indirect_count(
        &mut self,
        args_buffer: &'pass BufferId,
        args_offset: u64,
        count_buffer: &'pass BufferId,
        count_offset: u64,
        max_count: u32,
    );
}

/// A trait representing an active compute pass, used for recording dispatch
/// commands.
pub trait ComputePass<'pass> {
    /// Sets the active compute pipeline for subsequent dispatches.
    fn set_pipeline(&mut self, pipeline: &'pass ComputePipelineId);

    /// Binds a bind group at the given group index.
    fn set_bind_group(&mut self, index: u32, bind_group: &'pass BindGroupId);

    /// Writes a push-constant range visible to the compute stage.
    fn set_push_constants(&mut self, offset: u32, data: &[u8]);

    /// Records a dispatch of `x * y * z` workgroups.
    fn dispatch_workgroups(&mut self, x: u32, y: u32, z: u32);

    /// Records a dispatch whose workgroup counts are read from
    /// [`DispatchIndirectArgs`] at `offset` in `buffer`.
    ///
    /// [`DispatchIndirectArgs`]: crate::gpu::api::DispatchIndirectArgs
    fn dispatch_workgroups_indirect(&mut self, buffer: &'pass BufferId, offset: u64);
}

/// A trait for an object that records a sequence of GPU commands.
///
/// A `CommandEncoder` is the main tool for building a [`CommandBufferId`].
/// It creates render and compute passes, and records the inter-stage
/// ordering commands that happen outside of a pass.
pub trait CommandEncoder {
    /// Begins a new render pass, returning a mutable `RenderPass` object.
    ///
    /// The returned pass borrows the encoder mutably, so only one pass can
    /// be active at a time. When the pass object is dropped, the pass ends.
    fn begin_render_pass<'encoder>(
        &'encoder mut self,
        descriptor: &RenderPassDescriptor<'encoder>,
    ) -> Box<dyn RenderPass<'encoder> + 'encoder>;

    /// Begins a new compute pass, returning a mutable `ComputePass` object.
    fn begin_compute_pass<'encoder>(
        &'encoder mut self,
        descriptor: &ComputePassDescriptor<'encoder>,
    ) -> Box<dyn ComputePass<'encoder> + 'encoder>;

    /// Records an execution barrier making all storage-buffer writes of
    /// previously recorded compute work available and visible to indirect
    /// command reads and storage-buffer reads of subsequently recorded work.
    ///
    /// This is the single mandatory ordering point between the cull
    /// dispatch and the indirect draw that consumes its output. Backends
    /// with implicit usage tracking may record nothing, but the call marks
    /// the dependency in the command stream either way.
    fn compute_to_indirect_barrier(&mut self);

    /// Records a command to copy data from one buffer to another on the GPU.
    fn copy_buffer_to_buffer(
        &mut self,
        source: &BufferId,
        source_offset: u64,
        destination: &BufferId,
        destination_offset: u64,
        size: u64,
    );

    /// Records device-side expansion and execution of up to `max_count`
    /// command records laid out per `layout`.
    ///
    /// When `count_buffer` is supplied, the device executes only the number
    /// of records its first `u32` holds (clamped to `max_count`); when
    /// `None`, exactly `max_count` records execute.
    ///
    /// Callers must check `DeviceFeatures::device_generated_compute` before
    /// recording; on a device without the feature this call must never be
    /// reached.
    fn execute_indirect_commands(
        &mut self,
        layout: IndirectLayoutId,
        max_count: u32,
        records: &BufferId,
        records_offset: u64,
        count_buffer: Option<&BufferId>,
        count_offset: u64,
    );

    /// Finalizes the command recording and returns a handle to the
    /// resulting command buffer.
    ///
    /// This method consumes the encoder. The returned [`CommandBufferId`]
    /// can then be submitted to the `GraphicsDevice`'s queue.
    fn finish(self: Box<Self>) -> CommandBufferId;

    /// Returns a mutable reference to the underlying trait object as `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
