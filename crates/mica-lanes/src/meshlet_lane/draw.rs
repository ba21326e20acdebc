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

//! Draw submission for both strategies.
//!
//! Native path: one mesh-task draw per meshlet group, its invocation count
//! recovered from the group's encoded last-slot value, the group's first
//! slot passed as a push constant. Fallback path: a single multi-indirect
//! indexed draw over the cull stage's compacted buffer, with the live draw
//! count read by the device from the GPU-resident counter; the host only
//! ever knows the capacity it reserved.

use mica_core::gpu::{
    BindGroupId, ConventionalBuffers, IndexFormat, RenderPass, ShaderStageFlags,
    INDIRECT_DRAW_HEADER_BYTES,
};

use super::cull::CullOutput;
use super::task_params::{decode_group, TaskParams};
use super::visibility::VisibilityList;

/// Records the native-path draws and returns how many were issued.
///
/// Walks the task records in step with the visibility list they were built
/// from, recovering each group's span from the encoded values alone.
/// Assumes the mesh pipeline and per-frame bind group are already set on
/// the pass.
pub(crate) fn record_native_draws<'pass>(
    pass: &mut (dyn RenderPass<'pass> + 'pass),
    list: &VisibilityList,
    task_params: &[TaskParams],
) -> u32 {
    let mut draws = 0u32;
    let mut cursor = 0usize;
    for vis in list.items() {
        let group_count = vis.draw_range.count.div_ceil(super::task_params::MESHLET_GROUP_SIZE);
        let mut previous = None;
        for _ in 0..group_count {
            let record = &task_params[cursor];
            cursor += 1;
            let span = decode_group(previous, record.mesh_index_count, vis.draw_range.offset);
            previous = Some(record.mesh_index_count);

            pass.set_push_constants(
                ShaderStageFlags::TASK_MESH,
                0,
                bytemuck::bytes_of(&span.first),
            );
            pass.draw_mesh_tasks(span.len, 1, 1);
            draws += 1;
        }
    }
    debug_assert_eq!(cursor, task_params.len());
    draws
}

/// Records the fallback path's single indirect draw.
///
/// Assumes the render pipeline is already set. `bind_group` carries the
/// compacted params, transforms, and frame view.
pub(crate) fn record_fallback_draw<'pass>(
    pass: &mut (dyn RenderPass<'pass> + 'pass),
    bind_group: &'pass BindGroupId,
    geometry: &'pass ConventionalBuffers,
    output: &'pass CullOutput,
) {
    pass.set_bind_group(0, bind_group);
    pass.set_vertex_buffer(0, &geometry.positions, 0);
    pass.set_vertex_buffer(1, &geometry.attributes, 0);
    pass.set_index_buffer(&geometry.indices, 0, IndexFormat::Uint32);
    // Draw count lives in the first word of the indirect buffer; the
    // device reads it, the host never does.
    pass.multi_draw_indexed_indirect_count(
        &output.indirect_draws,
        INDIRECT_DRAW_HEADER_BYTES,
        &output.indirect_draws,
        0,
        output.capacity,
    );
}
