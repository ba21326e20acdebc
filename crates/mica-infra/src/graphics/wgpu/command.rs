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

use mica_core::gpu::{
    BindGroupId, BufferId, CommandBufferId, ComputePassDescriptor, ComputePipelineId, IndexFormat,
    IndirectLayoutId, MeshPipelineId, RenderPassDescriptor, RenderPipelineId, ShaderStageFlags,
};
use mica_core::gpu::{CommandEncoder, ComputePass, RenderPass};
use std::any::Any;
use std::ops::Range;

use super::conversions::IntoWgpu;
use super::device::WgpuDevice;

pub struct WgpuRenderPass<'a> {
    pub(crate) pass: wgpu::RenderPass<'a>,
    pub(crate) device: &'a WgpuDevice,
}

impl<'pass> RenderPass<'pass> for WgpuRenderPass<'pass> {
    fn set_pipeline(&mut self, pipeline_id: &'pass RenderPipelineId) {
        if let Some(pipeline) = self.device.get_wgpu_render_pipeline(*pipeline_id) {
            self.pass.set_pipeline(&pipeline);
        } else {
            log::warn!("WgpuRenderPass: RenderPipelineId {pipeline_id:?} not found.");
        }
    }

    fn set_mesh_pipeline(&mut self, pipeline_id: &'pass MeshPipelineId) {
        // Creation already fails on this backend, so no valid ID can reach
        // this point.
        debug_assert!(false, "mesh pipelines cannot exist on the wgpu backend");
        log::error!("WgpuRenderPass: set_mesh_pipeline({pipeline_id:?}) on a backend without mesh shading.");
    }

    fn set_bind_group(&mut self, index: u32, bind_group_id: &'pass BindGroupId) {
        if let Some(bind_group) = self.device.get_wgpu_bind_group(*bind_group_id) {
            self.pass.set_bind_group(index, bind_group.as_ref(), &[]);
        } else {
            log::warn!("WgpuRenderPass: BindGroupId {bind_group_id:?} not found.");
        }
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer_id: &'pass BufferId, offset: u64) {
        if let Some(buffer) = self.device.get_wgpu_buffer(*buffer_id) {
            self.pass.set_vertex_buffer(slot, buffer.slice(offset..));
        } else {
            log::warn!("WgpuRenderPass: Vertex BufferId {buffer_id:?} not found.");
        }
    }

    fn set_index_buffer(
        &mut self,
        buffer_id: &'pass BufferId,
        offset: u64,
        index_format: IndexFormat,
    ) {
        if let Some(buffer) = self.device.get_wgpu_buffer(*buffer_id) {
            self.pass
                .set_index_buffer(buffer.slice(offset..), index_format.into_wgpu());
        } else {
            log::warn!("WgpuRenderPass: Index BufferId {buffer_id:?} not found.");
        }
    }

    fn set_push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]) {
        self.pass
            .set_push_constants(stages.into_wgpu(), offset, data);
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        self.pass.draw(vertices, instances);
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        self.pass.draw_indexed(indices, base_vertex, instances);
    }

    fn draw_mesh_tasks(&mut self, _x: u32, _y: u32, _z: u32) {
        debug_assert!(false, "mesh pipelines cannot exist on the wgpu backend");
        log::error!("WgpuRenderPass: draw_mesh_tasks on a backend without mesh shading.");
    }

    fn multi_draw_indexed_indirect_count(
        &mut self,
        args_buffer: &'pass BufferId,
        args_offset: u64,
        count_buffer: &'pass BufferId,
        count_offset: u64,
        max_count: u32,
    ) {
        if !self.device.hal_features().multi_draw_indirect_count {
            log::error!(
                "WgpuRenderPass: multi_draw_indexed_indirect_count without MULTI_DRAW_INDIRECT_COUNT."
            );
            return;
        }
        let (Some(args), Some(count)) = (
            self.device.get_wgpu_buffer(*args_buffer),
            self.device.get_wgpu_buffer(*count_buffer),
        ) else {
            log::warn!("WgpuRenderPass: indirect args or count buffer not found.");
            return;
        };
        self.pass.multi_draw_indexed_indirect_count(
            args.as_ref(),
            args_offset,
            count.as_ref(),
            count_offset,
            max_count,
        );
    }
}

pub struct WgpuComputePass<'a> {
    pub(crate) pass: wgpu::ComputePass<'a>,
    pub(crate) device: &'a WgpuDevice,
}

impl<'pass> ComputePass<'pass> for WgpuComputePass<'pass> {
    fn set_pipeline(&mut self, pipeline_id: &'pass ComputePipelineId) {
        if let Some(pipeline) = self.device.get_wgpu_compute_pipeline(*pipeline_id) {
            self.pass.set_pipeline(&pipeline);
        } else {
            log::warn!("WgpuComputePass: ComputePipelineId {pipeline_id:?} not found.");
        }
    }

    fn set_bind_group(&mut self, index: u32, bind_group_id: &'pass BindGroupId) {
        if let Some(bind_group) = self.device.get_wgpu_bind_group(*bind_group_id) {
            self.pass.set_bind_group(index, bind_group.as_ref(), &[]);
        } else {
            log::warn!("WgpuComputePass: BindGroupId {bind_group_id:?} not found.");
        }
    }

    fn set_push_constants(&mut self, offset: u32, data: &[u8]) {
        self.pass.set_push_constants(offset, data);
    }

    fn dispatch_workgroups(&mut self, x: u32, y: u32, z: u32) {
        self.pass.dispatch_workgroups(x, y, z);
    }

    fn dispatch_workgroups_indirect(&mut self, buffer_id: &'pass BufferId, offset: u64) {
        if let Some(buffer) = self.device.get_wgpu_buffer(*buffer_id) {
            self.pass
                .dispatch_workgroups_indirect(buffer.as_ref(), offset);
        } else {
            log::warn!("WgpuComputePass: Indirect BufferId {buffer_id:?} not found.");
        }
    }
}

pub struct WgpuCommandEncoder {
    pub(crate) encoder: Option<wgpu::CommandEncoder>,
    pub(crate) device: WgpuDevice,
}

impl CommandEncoder for WgpuCommandEncoder {
    fn begin_render_pass<'encoder>(
        &'encoder mut self,
        descriptor: &RenderPassDescriptor<'encoder>,
    ) -> Box<dyn RenderPass<'encoder> + 'encoder> {
        let views: Vec<Option<wgpu::TextureView>> = descriptor
            .color_attachments
            .iter()
            .map(|att| {
                self.device
                    .get_wgpu_texture_view(att.view)
                    .map(|arc_view| (*arc_view).clone())
            })
            .collect();

        let color_attachments: Vec<Option<wgpu::RenderPassColorAttachment>> = descriptor
            .color_attachments
            .iter()
            .zip(views.iter())
            .map(|(att, view)| {
                view.as_ref().map(|view| wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: att.ops.into_wgpu(),
                    depth_slice: None,
                })
            })
            .collect();

        let depth_view: Option<wgpu::TextureView> =
            descriptor.depth_stencil_attachment.as_ref().and_then(|ds| {
                self.device
                    .get_wgpu_texture_view(ds.view)
                    .map(|arc_view| (*arc_view).clone())
            });

        let depth_stencil_attachment = match (&descriptor.depth_stencil_attachment, &depth_view) {
            (Some(ds), Some(view)) => Some(wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: ds.depth_ops.map(|ops| ops.into_wgpu()),
                stencil_ops: None,
            }),
            _ => None,
        };

        let pass = self
            .encoder
            .as_mut()
            .unwrap()
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: descriptor.label,
                color_attachments: &color_attachments,
                depth_stencil_attachment,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

        Box::new(WgpuRenderPass {
            pass,
            device: &self.device,
        })
    }

    fn begin_compute_pass<'encoder>(
        &'encoder mut self,
        descriptor: &ComputePassDescriptor<'encoder>,
    ) -> Box<dyn ComputePass<'encoder> + 'encoder> {
        let pass = self
            .encoder
            .as_mut()
            .unwrap()
            .begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: descriptor.label,
                timestamp_writes: None,
            });

        Box::new(WgpuComputePass {
            pass,
            device: &self.device,
        })
    }

    fn compute_to_indirect_barrier(&mut self) {
        // wgpu derives barriers from usage scopes: a storage write in one
        // pass is ordered before indirect/storage reads in the next pass of
        // the same submission. The HAL call stays in the recorded stream so
        // the dependency is explicit; nothing to encode here.
    }

    fn copy_buffer_to_buffer(
        &mut self,
        source: &BufferId,
        source_offset: u64,
        destination: &BufferId,
        destination_offset: u64,
        size: u64,
    ) {
        if let (Some(source_buffer), Some(destination_buffer)) = (
            self.device.get_wgpu_buffer(*source),
            self.device.get_wgpu_buffer(*destination),
        ) {
            self.encoder.as_mut().unwrap().copy_buffer_to_buffer(
                &source_buffer,
                source_offset,
                &destination_buffer,
                destination_offset,
                size,
            );
        }
    }

    fn execute_indirect_commands(
        &mut self,
        layout: IndirectLayoutId,
        _max_count: u32,
        _records: &BufferId,
        _records_offset: u64,
        _count_buffer: Option<&BufferId>,
        _count_offset: u64,
    ) {
        // register_indirect_layout already fails on this backend, so no
        // valid layout ID can reach this point.
        debug_assert!(false, "indirect layouts cannot exist on the wgpu backend");
        log::error!(
            "WgpuCommandEncoder: execute_indirect_commands({layout:?}) on a backend without device-generated commands."
        );
    }

    fn finish(mut self: Box<Self>) -> CommandBufferId {
        let finished_encoder = self.encoder.take().unwrap();
        self.device.register_command_buffer(finished_encoder.finish())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
