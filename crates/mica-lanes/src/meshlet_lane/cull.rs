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

//! The compute cull stage of the fallback path.
//!
//! One shader invocation per task record re-tests the record's bounding
//! box against the frustum; survivors reserve a slot with an atomic
//! counter and write an indirect draw command plus a compacted parameter
//! record at that slot. Writing both at the same reserved index makes the
//! two buffers correspond 1:1 by construction, with no sort or match step.
//!
//! The dispatch is followed by the single mandatory barrier of the whole
//! lane: compute storage writes must become visible as indirect-command
//! and storage reads before the consuming draw. Dropping it does not
//! crash, it flickers.

use bytemuck::{Pod, Zeroable};
use mica_core::gpu::error::ResourceError;
use mica_core::gpu::{
    BindGroupDescriptor, BindGroupEntry, BindGroupId, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingResource, BindingType, BufferBinding, BufferDescriptor, BufferId,
    BufferResidency, BufferUsage, CommandEncoder, ComputePassDescriptor, ComputePipelineDescriptor,
    ComputePipelineId, DrawIndexedIndirectArgs, GraphicsDevice, PipelineLayoutDescriptor,
    PipelineLayoutId, ShaderModuleDescriptor, ShaderSourceData, ShaderStageFlags,
    INDIRECT_DRAW_HEADER_BYTES,
};
use std::borrow::Cow;

use super::shaders;
use super::task_params::MESHLET_GROUP_SIZE;

/// One compacted per-draw record, written by the cull shader for each
/// surviving task record and read by the fallback vertex stage via the
/// draw's instance index.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct CompactedDrawParams {
    /// Index of the instance's first transform.
    pub node_instance: u32,
    /// Number of consecutive transforms (skinning).
    pub node_count: u32,
}

/// The cull stage's GPU-resident output for one frame.
#[derive(Debug, Clone, Copy)]
pub struct CullOutput {
    /// `[count, pad.., DrawIndexedIndirectArgs[capacity]]`; the `u32` at
    /// offset 0 is the atomic draw count, packed arguments start at
    /// [`INDIRECT_DRAW_HEADER_BYTES`].
    pub indirect_draws: BufferId,
    /// `CompactedDrawParams[capacity]`, slot-matched to `indirect_draws`.
    pub compacted_params: BufferId,
    /// Capacity in draws: exactly the dispatched task-record count, since
    /// each invocation appends at most one entry.
    pub capacity: u32,
}

impl CullOutput {
    /// Allocates the output pair sized for `task_count` records.
    pub fn allocate(
        device: &dyn GraphicsDevice,
        task_count: u32,
    ) -> Result<Self, ResourceError> {
        let indirect_draws = device.create_buffer(&BufferDescriptor {
            label: Some(Cow::Borrowed("cull indirect draws")),
            size: INDIRECT_DRAW_HEADER_BYTES
                + task_count as u64 * std::mem::size_of::<DrawIndexedIndirectArgs>() as u64,
            usage: BufferUsage::STORAGE | BufferUsage::INDIRECT,
            residency: BufferResidency::DeviceLocal,
            // The atomic count must start at zero.
            zero_init: true,
        })?;
        let compacted_params = device.create_buffer(&BufferDescriptor {
            label: Some(Cow::Borrowed("cull compacted params")),
            size: task_count as u64 * std::mem::size_of::<CompactedDrawParams>() as u64,
            usage: BufferUsage::STORAGE,
            residency: BufferResidency::DeviceLocal,
            zero_init: false,
        })?;
        Ok(Self {
            indirect_draws,
            compacted_params,
            capacity: task_count,
        })
    }

    /// Releases both buffers.
    pub fn release(self, device: &dyn GraphicsDevice) {
        for id in [self.indirect_draws, self.compacted_params] {
            if let Err(err) = device.destroy_buffer(id) {
                log::warn!("CullOutput: failed to release {id:?}: {err}");
            }
        }
    }
}

/// The persistent GPU state of the cull stage: shader, layouts, pipeline.
/// Built once per device in the created-lifecycle hook.
#[derive(Debug)]
pub struct CullStage {
    pipeline: ComputePipelineId,
    bind_group_layout: mica_core::gpu::BindGroupLayoutId,
    #[allow(dead_code)]
    pipeline_layout: PipelineLayoutId,
}

impl CullStage {
    /// Compiles the cull shader and builds its binding interface.
    pub fn new(device: &dyn GraphicsDevice) -> Result<Self, ResourceError> {
        let module = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("meshlet cull"),
            source: ShaderSourceData::Wgsl(Cow::Borrowed(shaders::MESHLET_CULL_WGSL)),
        })?;

        let storage_read = |binding: u32| BindGroupLayoutEntry {
            binding,
            visibility: ShaderStageFlags::COMPUTE,
            ty: BindingType::StorageBuffer { read_only: true },
        };
        let storage_write = |binding: u32| BindGroupLayoutEntry {
            binding,
            visibility: ShaderStageFlags::COMPUTE,
            ty: BindingType::StorageBuffer { read_only: false },
        };
        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some(Cow::Borrowed("meshlet cull bindings")),
            entries: vec![
                storage_read(0), // cached aabbs
                storage_read(1), // cached transforms
                storage_read(2), // task records
                storage_read(3), // per-group template draws
                storage_write(4), // compacted indirect draws + count
                storage_write(5), // compacted draw params
                BindGroupLayoutEntry {
                    binding: 6,
                    visibility: ShaderStageFlags::COMPUTE,
                    ty: BindingType::UniformBuffer,
                },
            ],
        })?;
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(Cow::Borrowed("meshlet cull layout")),
            bind_group_layouts: vec![bind_group_layout],
            push_constant_ranges: vec![],
        })?;
        let pipeline = device.create_compute_pipeline(&ComputePipelineDescriptor {
            label: Some(Cow::Borrowed("meshlet cull")),
            layout: pipeline_layout,
            shader_module: module,
            entry_point: Cow::Borrowed("cull_meshlet_groups"),
        })?;

        Ok(Self {
            pipeline,
            bind_group_layout,
            pipeline_layout,
        })
    }

    /// Records the cull dispatch for one frame, followed by the mandatory
    /// produce/consume barrier.
    ///
    /// Returns the per-frame bind group so the caller can release it with
    /// the frame's buffers.
    pub fn record(
        &self,
        device: &dyn GraphicsDevice,
        encoder: &mut dyn CommandEncoder,
        frame: &super::frame_buffers::FrameBuffers,
        group_draws: BufferId,
        output: &CullOutput,
        task_count: u32,
    ) -> Result<BindGroupId, ResourceError> {
        let whole = |buffer: BufferId| BindingResource::Buffer(BufferBinding {
            buffer,
            offset: 0,
            size: None,
        });
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some(Cow::Borrowed("meshlet cull frame bindings")),
            layout: self.bind_group_layout,
            entries: vec![
                BindGroupEntry { binding: 0, resource: whole(frame.aabbs) },
                BindGroupEntry { binding: 1, resource: whole(frame.transforms) },
                BindGroupEntry { binding: 2, resource: whole(frame.task_params) },
                BindGroupEntry { binding: 3, resource: whole(group_draws) },
                BindGroupEntry { binding: 4, resource: whole(output.indirect_draws) },
                BindGroupEntry { binding: 5, resource: whole(output.compacted_params) },
                BindGroupEntry { binding: 6, resource: whole(frame.view) },
            ],
        })?;

        {
            let mut pass = encoder.begin_compute_pass(&ComputePassDescriptor {
                label: Some("meshlet cull"),
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group);
            pass.dispatch_workgroups(task_count.div_ceil(MESHLET_GROUP_SIZE), 1, 1);
        }
        encoder.compute_to_indirect_barrier();

        Ok(bind_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compacted_record_is_two_words() {
        assert_eq!(std::mem::size_of::<CompactedDrawParams>(), 8);
    }
}
