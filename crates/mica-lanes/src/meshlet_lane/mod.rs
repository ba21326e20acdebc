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

//! The meshlet submission lane.
//!
//! One `render` call per frame: collect visibility, expand draw ranges
//! into fixed-size meshlet-group records, allocate the frame's buffers,
//! and submit through the strategy pinned at device creation, either
//! native mesh shading where the device expands work itself, or a compute
//! cull pass compacting into an indirect draw everywhere else. The
//! device-generated command batch in [`dgc`] is an independent third
//! submission path for workloads that prefer pre-built command records.
//!
//! Data flows strictly one way, from visibility through task records and
//! frame buffers into the cull (fallback only) and draw stages. The only
//! cross-stage ordering point is the cull-to-draw barrier recorded by the
//! cull stage.

pub mod cull;
pub mod dgc;
pub mod draw;
pub mod frame_buffers;
pub mod shaders;
pub mod strategy;
pub mod task_params;
pub mod visibility;
pub mod world;

pub use cull::{CompactedDrawParams, CullOutput, CullStage};
pub use dgc::IndirectBatch;
pub use frame_buffers::{FrameBuffers, FrameView};
pub use strategy::SubmissionStrategy;
pub use task_params::{decode_group, GroupSpan, TaskParams, MESHLET_GROUP_SIZE};
pub use visibility::{collect, VisibilityList, VisibleInstance};
pub use world::{GpuAabb, MeshletRenderable, Renderable, RenderWorld};

use mica_core::gpu::error::RenderError;
use mica_core::gpu::{
    BindGroupDescriptor, BindGroupEntry, BindGroupId, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingResource, BindingType, BufferBinding, BufferId, Color,
    CommandEncoder, CompareFunction, DepthState, DeviceLifecycle, GraphicsDevice, LoadOp,
    MeshPipelineDescriptor, MeshPipelineId, MeshRegistry, MeshStyle, Operations,
    PipelineLayoutDescriptor, PushConstantRange, QueueType, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, RenderPipelineDescriptor,
    RenderPipelineId, ShaderModuleDescriptor, ShaderSourceData, ShaderStage, ShaderStageFlags,
    StoreOp, TextureFormat, TextureViewId, VertexAttribute, VertexBufferLayout, VertexFormat,
};
use mica_core::math::{Frustum, Mat4};
use std::borrow::Cow;



/// Static configuration of the lane, fixed before the first frame.
#[derive(Debug, Clone)]
pub struct MeshletLaneConfig {
    /// Color attachment format, or `None` to render depth-only.
    pub color_format: Option<TextureFormat>,
    /// Depth attachment format.
    pub depth_format: TextureFormat,
    /// The attribute layout the native-path shader is specialized for.
    pub mesh_style: MeshStyle,
    /// The hardware queue frames are recorded for.
    pub queue: QueueType,
}

impl Default for MeshletLaneConfig {
    fn default() -> Self {
        Self {
            color_format: Some(TextureFormat::Bgra8UnormSrgb),
            depth_format: TextureFormat::Depth32Float,
            mesh_style: MeshStyle::Textured,
            queue: QueueType::Generic,
        }
    }
}

/// Per-frame inputs provided by the frame driver.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// The color attachment, when the lane is configured with a color format.
    pub color_view: Option<TextureViewId>,
    /// The depth attachment.
    pub depth_view: TextureViewId,
    /// Combined view-projection matrix for this frame.
    pub view_projection: Mat4,
}

/// What one `render` call did, for the frame driver and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Renderables that survived frustum culling.
    pub visible_instances: u32,
    /// Meshlet-group task records built from them.
    pub task_records: u32,
    /// Mesh-task draws issued on the native path; `None` on the fallback
    /// path, where only the device learns the executed draw count.
    pub native_draws: Option<u32>,
    /// Whether the frame degenerated to an empty depth pass.
    pub degenerate: bool,
}

#[derive(Debug)]
struct NativeState {
    pipeline: MeshPipelineId,
    bind_group_layout: mica_core::gpu::BindGroupLayoutId,
}

#[derive(Debug)]
struct FallbackState {
    pipeline: RenderPipelineId,
    bind_group_layout: mica_core::gpu::BindGroupLayoutId,
}

/// Everything derived from a live device. Dropped wholesale in the
/// destroyed-lifecycle hook so a device recreation rebuilds from scratch.
#[derive(Debug)]
struct GpuState {
    strategy: SubmissionStrategy,
    cull: Option<CullStage>,
    fallback: Option<FallbackState>,
    native: Option<NativeState>,
}

/// The meshlet submission lane. See the module docs for the frame flow.
#[derive(Debug, Default)]
pub struct MeshletLane {
    config: MeshletLaneConfig,
    visibility: VisibilityList,
    task_records: Vec<TaskParams>,
    gpu: Option<GpuState>,
}

impl MeshletLane {
    /// Creates a lane with the given configuration.
    pub fn new(config: MeshletLaneConfig) -> Self {
        Self {
            config,
            visibility: VisibilityList::new(),
            task_records: Vec::new(),
            gpu: None,
        }
    }

    /// The strategy pinned at device creation, if a device is live.
    pub fn strategy(&self) -> Option<SubmissionStrategy> {
        self.gpu.as_ref().map(|g| g.strategy)
    }

    /// Records and submits one frame. Returns after recording; GPU
    /// completion is never waited on here.
    pub fn render(
        &mut self,
        frustum: &Frustum,
        ctx: &FrameContext,
        world: &RenderWorld,
        registry: &dyn MeshRegistry,
        device: &dyn GraphicsDevice,
    ) -> Result<FrameReport, RenderError> {
        let gpu = self.gpu.as_ref().ok_or(RenderError::NotInitialized)?;

        self.visibility.clear();
        collect(frustum, world, registry, &mut self.visibility);
        self.task_records.clear();
        task_params::build_task_params(&self.visibility, &mut self.task_records);

        let mut encoder = device.create_command_encoder(self.config.queue, Some("meshlet lane"));

        if self.task_records.is_empty() {
            Self::record_degenerate_pass(encoder.as_mut(), ctx);
            let command_buffer = encoder.finish();
            device.submit_command_buffer(command_buffer);
            return Ok(FrameReport {
                visible_instances: self.visibility.len() as u32,
                task_records: 0,
                native_draws: None,
                degenerate: true,
            });
        }

        let task_count = self.task_records.len() as u32;
        let view_block = FrameView::new(ctx.view_projection, frustum, task_count);
        let frame = FrameBuffers::allocate(
            device,
            &self.task_records,
            world.transforms(),
            world.aabbs(),
            &view_block,
        )?;

        let mut frame_bind_groups: Vec<BindGroupId> = Vec::new();
        let mut cull_output: Option<CullOutput> = None;

        let recorded = Self::record_frame(
            gpu,
            device,
            encoder.as_mut(),
            ctx,
            registry,
            &self.visibility,
            &self.task_records,
            &frame,
            &mut frame_bind_groups,
            &mut cull_output,
        );

        let native_draws = match recorded {
            Ok(draws) => draws,
            Err(err) => {
                Self::release_frame(device, frame, frame_bind_groups, cull_output);
                return Err(err);
            }
        };

        let command_buffer = encoder.finish();
        device.submit_command_buffer(command_buffer);

        Self::release_frame(device, frame, frame_bind_groups, cull_output);

        Ok(FrameReport {
            visible_instances: self.visibility.len() as u32,
            task_records: task_count,
            native_draws,
            degenerate: false,
        })
    }

    fn record_degenerate_pass(encoder: &mut dyn CommandEncoder, ctx: &FrameContext) {
        let descriptor = RenderPassDescriptor {
            label: Some("meshlet degenerate"),
            color_attachments: Vec::new(),
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: ctx.depth_view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
            }),
        };
        let _pass = encoder.begin_render_pass(&descriptor);
    }

    fn main_pass_descriptor(ctx: &FrameContext) -> RenderPassDescriptor<'static> {
        RenderPassDescriptor {
            label: Some("meshlet main"),
            color_attachments: ctx
                .color_view
                .map(|view| RenderPassColorAttachment {
                    view,
                    ops: Operations {
                        load: LoadOp::Clear(Color::BLACK),
                        store: StoreOp::Store,
                    },
                })
                .into_iter()
                .collect(),
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: ctx.depth_view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
            }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn record_frame(
        gpu: &GpuState,
        device: &dyn GraphicsDevice,
        encoder: &mut dyn CommandEncoder,
        ctx: &FrameContext,
        registry: &dyn MeshRegistry,
        list: &VisibilityList,
        task_records: &[TaskParams],
        frame: &FrameBuffers,
        bind_groups: &mut Vec<BindGroupId>,
        cull_output: &mut Option<CullOutput>,
    ) -> Result<Option<u32>, RenderError> {
        let whole = |buffer: BufferId| {
            BindingResource::Buffer(BufferBinding {
                buffer,
                offset: 0,
                size: None,
            })
        };

        match gpu.strategy {
            SubmissionStrategy::NativeMeshShading { .. } => {
                let native = gpu
                    .native
                    .as_ref()
                    .expect("native state exists when the native strategy is pinned");
                let meshlets = registry.meshlet_buffers().ok_or_else(|| {
                    RenderError::Recording(
                        "registry reports no meshlet buffers for the native path".to_string(),
                    )
                })?;

                let bind_group = device.create_bind_group(&BindGroupDescriptor {
                    label: Some(Cow::Borrowed("meshlet native frame bindings")),
                    layout: native.bind_group_layout,
                    entries: vec![
                        BindGroupEntry { binding: 0, resource: whole(meshlets.headers) },
                        BindGroupEntry { binding: 1, resource: whole(meshlets.stream_headers) },
                        BindGroupEntry { binding: 2, resource: whole(meshlets.payload) },
                        BindGroupEntry { binding: 3, resource: whole(frame.transforms) },
                        BindGroupEntry { binding: 4, resource: whole(frame.view) },
                    ],
                })?;
                bind_groups.push(bind_group);

                let descriptor = Self::main_pass_descriptor(ctx);
                let mut pass = encoder.begin_render_pass(&descriptor);
                pass.set_mesh_pipeline(&native.pipeline);
                pass.set_bind_group(0, bind_groups.last().unwrap());
                let draws = draw::record_native_draws(pass.as_mut(), list, task_records);
                Ok(Some(draws))
            }
            SubmissionStrategy::ComputeCullFallback => {
                let cull = gpu
                    .cull
                    .as_ref()
                    .expect("cull stage exists when the fallback strategy is pinned");
                let fallback = gpu
                    .fallback
                    .as_ref()
                    .expect("fallback state exists when the fallback strategy is pinned");
                let geometry = registry.conventional_buffers().ok_or_else(|| {
                    RenderError::Recording(
                        "registry reports no conventional buffers for the fallback path"
                            .to_string(),
                    )
                })?;

                let task_count = task_records.len() as u32;
                let output = CullOutput::allocate(device, task_count)?;
                *cull_output = Some(output);

                let cull_bind_group = cull.record(
                    device,
                    encoder,
                    frame,
                    geometry.group_draws,
                    cull_output.as_ref().unwrap(),
                    task_count,
                )?;
                bind_groups.push(cull_bind_group);

                let draw_bind_group = device.create_bind_group(&BindGroupDescriptor {
                    label: Some(Cow::Borrowed("meshlet draw frame bindings")),
                    layout: fallback.bind_group_layout,
                    entries: vec![
                        BindGroupEntry {
                            binding: 0,
                            resource: whole(cull_output.as_ref().unwrap().compacted_params),
                        },
                        BindGroupEntry { binding: 1, resource: whole(frame.transforms) },
                        BindGroupEntry { binding: 2, resource: whole(frame.view) },
                    ],
                })?;
                bind_groups.push(draw_bind_group);

                let descriptor = Self::main_pass_descriptor(ctx);
                let mut pass = encoder.begin_render_pass(&descriptor);
                pass.set_pipeline(&fallback.pipeline);
                draw::record_fallback_draw(
                    pass.as_mut(),
                    bind_groups.last().unwrap(),
                    &geometry,
                    cull_output.as_ref().unwrap(),
                );
                Ok(None)
            }
        }
    }

    fn release_frame(
        device: &dyn GraphicsDevice,
        frame: FrameBuffers,
        bind_groups: Vec<BindGroupId>,
        cull_output: Option<CullOutput>,
    ) {
        for bind_group in bind_groups {
            if let Err(err) = device.destroy_bind_group(bind_group) {
                log::warn!("MeshletLane: failed to release bind group {bind_group:?}: {err}");
            }
        }
        if let Some(output) = cull_output {
            output.release(device);
        }
        frame.release(device);
    }

    fn build_fallback_state(
        device: &dyn GraphicsDevice,
        config: &MeshletLaneConfig,
    ) -> Result<FallbackState, RenderError> {
        let module = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("meshlet draw"),
            source: ShaderSourceData::Wgsl(Cow::Borrowed(shaders::MESHLET_DRAW_WGSL)),
        })?;

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some(Cow::Borrowed("meshlet draw bindings")),
            entries: vec![
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStageFlags::VERTEX,
                    ty: BindingType::StorageBuffer { read_only: true },
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStageFlags::VERTEX,
                    ty: BindingType::StorageBuffer { read_only: true },
                },
                BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStageFlags::VERTEX_FRAGMENT,
                    ty: BindingType::UniformBuffer,
                },
            ],
        })?;
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(Cow::Borrowed("meshlet draw layout")),
            bind_group_layouts: vec![bind_group_layout],
            push_constant_ranges: vec![],
        })?;

        let float3 = |location: u32| VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: 0,
            shader_location: location,
        };
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(Cow::Borrowed("meshlet draw")),
            layout,
            vertex_shader: module,
            vertex_entry: Cow::Borrowed("vs_main"),
            fragment_shader: config.color_format.map(|_| module),
            fragment_entry: Cow::Borrowed("fs_main"),
            vertex_buffers: vec![
                VertexBufferLayout {
                    array_stride: 12,
                    attributes: vec![float3(0)],
                },
                VertexBufferLayout {
                    array_stride: 12,
                    attributes: vec![float3(1)],
                },
            ],
            topology: Default::default(),
            color_format: config.color_format,
            depth: Some(DepthState {
                format: config.depth_format,
                depth_write: true,
                compare: CompareFunction::Less,
            }),
        })?;

        Ok(FallbackState {
            pipeline,
            bind_group_layout,
        })
    }

    fn build_native_state(
        device: &dyn GraphicsDevice,
        config: &MeshletLaneConfig,
        large_workgroup: bool,
    ) -> Result<NativeState, RenderError> {
        let mesh_module = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("meshlet render mesh"),
            source: ShaderSourceData::Glsl {
                source: Cow::Borrowed(shaders::MESHLET_RENDER_MESH_GLSL),
                stage: ShaderStage::Mesh,
            },
        })?;
        let fragment_module = match config.color_format {
            Some(_) => Some(device.create_shader_module(&ShaderModuleDescriptor {
                label: Some("meshlet render frag"),
                source: ShaderSourceData::Glsl {
                    source: Cow::Borrowed(shaders::MESHLET_RENDER_FRAG_GLSL),
                    stage: ShaderStage::Fragment,
                },
            })?),
            None => None,
        };

        let storage_read = |binding: u32| BindGroupLayoutEntry {
            binding,
            visibility: ShaderStageFlags::MESH,
            ty: BindingType::StorageBuffer { read_only: true },
        };
        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some(Cow::Borrowed("meshlet native bindings")),
            entries: vec![
                storage_read(0), // meshlet headers
                storage_read(1), // stream headers
                storage_read(2), // payload
                storage_read(3), // cached transforms
                BindGroupLayoutEntry {
                    binding: 4,
                    visibility: ShaderStageFlags::TASK_MESH | ShaderStageFlags::FRAGMENT,
                    ty: BindingType::UniformBuffer,
                },
            ],
        })?;
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(Cow::Borrowed("meshlet native layout")),
            bind_group_layouts: vec![bind_group_layout],
            push_constant_ranges: vec![PushConstantRange {
                stages: ShaderStageFlags::TASK_MESH,
                range: 0..4,
            }],
        })?;

        let features = device.features();
        let pipeline = device.create_mesh_pipeline(&MeshPipelineDescriptor {
            label: Some(Cow::Borrowed("meshlet render")),
            layout,
            task_shader: None,
            mesh_shader: mesh_module,
            fragment_shader: fragment_module,
            color_format: config.color_format,
            depth: Some(DepthState {
                format: config.depth_format,
                depth_write: true,
                compare: CompareFunction::Less,
            }),
            constants: vec![
                (
                    Cow::Borrowed("ATTRIBUTE_STREAM_COUNT"),
                    f64::from(config.mesh_style.attribute_stream_count()),
                ),
                (
                    Cow::Borrowed("MESHLET_PAYLOAD_LARGE_WORKGROUP"),
                    f64::from(u32::from(large_workgroup)),
                ),
            ],
            subgroup_size_log2: features.subgroup_size_control.then_some(5),
        })?;

        Ok(NativeState {
            pipeline,
            bind_group_layout,
        })
    }
}

impl DeviceLifecycle for MeshletLane {
    fn on_device_created(&mut self, device: &dyn GraphicsDevice) -> Result<(), RenderError> {
        let features = device.features();
        let strategy = SubmissionStrategy::select(features);
        log::info!(
            "MeshletLane: pinned {strategy:?} on '{}'.",
            device.adapter_profile().name
        );

        let state = match strategy {
            SubmissionStrategy::NativeMeshShading { large_workgroup } => GpuState {
                strategy,
                cull: None,
                fallback: None,
                native: Some(Self::build_native_state(device, &self.config, large_workgroup)?),
            },
            SubmissionStrategy::ComputeCullFallback => {
                // The fallback consumes its draw count from a GPU counter;
                // without multi-draw-indirect-count there is no strategy
                // left to degrade to.
                if !features.multi_draw_indirect_count {
                    return Err(RenderError::Capability {
                        feature: "multi-draw indirect count",
                    });
                }
                GpuState {
                    strategy,
                    cull: Some(CullStage::new(device)?),
                    fallback: Some(Self::build_fallback_state(device, &self.config)?),
                    native: None,
                }
            }
        };
        self.gpu = Some(state);
        Ok(())
    }

    fn on_device_destroyed(&mut self) {
        log::debug!("MeshletLane: dropping device-derived state.");
        self.gpu = None;
    }
}
