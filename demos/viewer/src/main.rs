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

//! Headless viewer driving the meshlet lane over a procedural cube field.
//!
//! Renders a fixed number of frames into offscreen attachments, printing a
//! per-frame report, and optionally exercises the device-generated command
//! batch path (which a device without the feature must refuse before any
//! execution).

use anyhow::{anyhow, Context, Result};
use bytemuck::cast_slice;
use mica_core::gpu::error::RenderError;
use mica_core::gpu::{
    BufferDescriptor, BufferResidency, BufferUsage, ConventionalBuffers, DispatchIndirectArgs,
    DrawIndexedIndirectArgs, DrawRange, Extent3d, GraphicsDevice, IndirectLayoutDescriptor,
    IndirectLayoutToken, MeshEncoding, MeshHandle, MeshletBuffers, MeshStyle, MeshRegistry,
    PipelineLayoutDescriptor, PushConstantRange, QueueType, ShaderStageFlags, TextureDescriptor,
    TextureFormat, TextureUsage, TextureViewDescriptor, TextureViewId,
};
use mica_core::math::{Aabb, Frustum, Mat4, Vec3};
use mica_infra::{WgpuDevice, WgpuGraphicsContext};
use mica_lanes::meshlet_lane::{
    FrameContext, IndirectBatch, MeshletLane, MeshletLaneConfig, MeshletRenderable, Renderable,
    RenderWorld, MESHLET_GROUP_SIZE,
};
use mica_core::gpu::DeviceLifecycle;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

struct Options {
    frames: u32,
    instances: u32,
    run_dgc: bool,
    dgc_max_count: u32,
    dgc_indirect_count: Option<u32>,
    dgc_dispatch: u32,
    async_compute: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            frames: 8,
            instances: 256,
            run_dgc: false,
            dgc_max_count: 64,
            dgc_indirect_count: None,
            dgc_dispatch: 4,
            async_compute: false,
        }
    }
}

fn print_help() {
    println!(
        "Usage: mica-viewer\n\
         \t[--frames (number of frames to render before exiting)]\n\
         \t[--instances (number of cube instances in the field)]\n\
         \t[--dgc (exercise the device-generated command batch)]\n\
         \t[--max-count (DGC record count)]\n\
         \t[--indirect-count (live count placed in the DGC count buffer)]\n\
         \t[--dispatch (workgroups per DGC record)]\n\
         \t[--async (record on the async-compute queue)]"
    );
}

fn parse_options() -> Result<Option<Options>> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut next_u32 = |flag: &str| -> Result<u32> {
            args.next()
                .ok_or_else(|| anyhow!("{flag} expects a value"))?
                .parse()
                .with_context(|| format!("{flag} expects an unsigned integer"))
        };
        match arg.as_str() {
            "--frames" => options.frames = next_u32("--frames")?,
            "--instances" => options.instances = next_u32("--instances")?,
            "--dgc" => options.run_dgc = true,
            "--max-count" => options.dgc_max_count = next_u32("--max-count")?,
            "--indirect-count" => {
                options.dgc_indirect_count = Some(next_u32("--indirect-count")?)
            }
            "--dispatch" => options.dgc_dispatch = next_u32("--dispatch")?,
            "--async" => options.async_compute = true,
            "--help" => {
                print_help();
                return Ok(None);
            }
            other => {
                print_help();
                return Err(anyhow!("unknown argument: {other}"));
            }
        }
    }
    Ok(Some(options))
}

/// A registry serving one procedural cube mesh in conventional encoding.
///
/// Every meshlet-group slot of the mesh draws the same 36-index cube; the
/// per-slot template table is what the cull stage compacts from.
struct CubeRegistry {
    range: DrawRange,
    buffers: ConventionalBuffers,
}

impl CubeRegistry {
    fn new(device: &dyn GraphicsDevice, group_count: u32) -> Result<Self, RenderError> {
        // 8 corners, 36 indices.
        let positions: [[f32; 3]; 8] = [
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ];
        // Corner normals; good enough for a debug field.
        let normals: Vec<[f32; 3]> = positions
            .iter()
            .map(|p| {
                let v = Vec3::new(p[0], p[1], p[2]).normalize();
                [v.x, v.y, v.z]
            })
            .collect();
        let indices: [u32; 36] = [
            0, 1, 2, 2, 3, 0, // back
            5, 4, 7, 7, 6, 5, // front
            4, 0, 3, 3, 7, 4, // left
            1, 5, 6, 6, 2, 1, // right
            3, 2, 6, 6, 7, 3, // top
            4, 5, 1, 1, 0, 4, // bottom
        ];

        let upload = |label: &'static str, usage: BufferUsage, bytes: &[u8]| {
            device.create_buffer_with_data(
                &BufferDescriptor {
                    label: Some(Cow::Borrowed(label)),
                    size: bytes.len() as u64,
                    usage,
                    residency: BufferResidency::DeviceLocal,
                    zero_init: false,
                },
                bytes,
            )
        };

        let group_draws: Vec<DrawIndexedIndirectArgs> = (0..group_count)
            .map(|_| DrawIndexedIndirectArgs {
                index_count: indices.len() as u32,
                instance_count: 1,
                first_index: 0,
                base_vertex: 0,
                first_instance: 0,
            })
            .collect();

        let buffers = ConventionalBuffers {
            indices: upload("cube indices", BufferUsage::INDEX, cast_slice(&indices))?,
            positions: upload("cube positions", BufferUsage::VERTEX, cast_slice(&positions))?,
            attributes: upload("cube normals", BufferUsage::VERTEX, cast_slice(&normals))?,
            group_draws: upload(
                "cube group draws",
                BufferUsage::STORAGE,
                cast_slice(&group_draws),
            )?,
        };

        Ok(Self {
            range: DrawRange {
                offset: 0,
                count: group_count,
            },
            buffers,
        })
    }
}

impl MeshRegistry for CubeRegistry {
    fn draw_range(&self, mesh: MeshHandle) -> Option<DrawRange> {
        (mesh.0 == 0).then_some(self.range)
    }

    fn style(&self, _mesh: MeshHandle) -> MeshStyle {
        MeshStyle::Untextured
    }

    fn encoding(&self) -> MeshEncoding {
        MeshEncoding::Conventional
    }

    fn meshlet_buffers(&self) -> Option<MeshletBuffers> {
        None
    }

    fn conventional_buffers(&self) -> Option<ConventionalBuffers> {
        Some(self.buffers)
    }
}

fn build_world(instances: u32) -> RenderWorld {
    let mut world = RenderWorld::new();
    let side = (instances as f32).cbrt().ceil() as u32;
    let spacing = 3.0;
    let half = side as f32 * spacing * 0.5;
    for i in 0..instances {
        let x = (i % side) as f32 * spacing - half;
        let y = ((i / side) % side) as f32 * spacing - half;
        let z = (i / (side * side)) as f32 * spacing - half;
        let center = Vec3::new(x, y, z);
        let transform_index = world.push_transforms(&[Mat4::from_translation(center)]);
        let aabb_index = world.push_aabb(Aabb::from_center_half_extents(
            center,
            Vec3::new(0.5, 0.5, 0.5),
        ));
        world.push_renderable(Renderable::Mesh(MeshletRenderable {
            mesh: MeshHandle(0),
            aabb_index,
            transform_index,
        }));
    }
    world
}

fn create_attachments(device: &dyn GraphicsDevice) -> Result<(TextureViewId, TextureViewId)> {
    let size = Extent3d {
        width: WIDTH,
        height: HEIGHT,
        depth_or_array_layers: 1,
    };
    let color = device.create_texture(&TextureDescriptor {
        label: Some(Cow::Borrowed("viewer color")),
        size,
        format: TextureFormat::Bgra8UnormSrgb,
        usage: TextureUsage::RENDER_ATTACHMENT,
    })?;
    let depth = device.create_texture(&TextureDescriptor {
        label: Some(Cow::Borrowed("viewer depth")),
        size,
        format: TextureFormat::Depth32Float,
        usage: TextureUsage::RENDER_ATTACHMENT,
    })?;
    let color_view = device.create_texture_view(color, &TextureViewDescriptor::default())?;
    let depth_view = device.create_texture_view(depth, &TextureViewDescriptor::default())?;
    Ok((color_view, depth_view))
}

/// The DGC record both sides of the contract agree on.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct DgcRecord {
    push: u32,
    dispatch: DispatchIndirectArgs,
}

fn run_dgc_batch(device: &dyn GraphicsDevice, options: &Options) -> Result<()> {
    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some(Cow::Borrowed("dgc compute layout")),
        bind_group_layouts: vec![],
        push_constant_ranges: vec![PushConstantRange {
            stages: ShaderStageFlags::COMPUTE,
            range: 0..4,
        }],
    })?;

    let records: Vec<DgcRecord> = (0..options.dgc_max_count)
        .map(|i| DgcRecord {
            push: i,
            dispatch: DispatchIndirectArgs {
                x: options.dgc_dispatch,
                y: 1,
                z: 1,
            },
        })
        .collect();

    let layout = IndirectLayoutDescriptor {
        label: Some(Cow::Borrowed("dgc dispatch records")),
        tokens: vec![
            IndirectLayoutToken::PushConstant {
                record_offset: 0,
                dst_offset: 0,
                size: 4,
                layout: pipeline_layout,
            },
            IndirectLayoutToken::Dispatch { record_offset: 4 },
        ],
        stride: std::mem::size_of::<DgcRecord>() as u32,
    };

    // Fails fast on devices without the feature; nothing gets recorded.
    let batch = IndirectBatch::new(device, &layout, &records, options.dgc_indirect_count)?;

    let queue = if options.async_compute {
        QueueType::AsyncCompute
    } else {
        QueueType::Generic
    };
    let mut encoder = device.create_command_encoder(queue, Some("dgc batch"));
    batch.execute(encoder.as_mut());
    let command_buffer = encoder.finish();
    device.submit_command_buffer(command_buffer);
    log::info!(
        "DGC: executed a batch of up to {} records in one device-side expansion.",
        batch.max_count()
    );
    batch.release(device);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let Some(options) = parse_options()? else {
        return Ok(());
    };

    let context = pollster::block_on(WgpuGraphicsContext::new())
        .context("failed to initialize the graphics context")?;
    let device = WgpuDevice::new(Arc::new(context));
    log::info!("Adapter: {}", device.adapter_profile().name);

    if options.run_dgc {
        // A workload whose whole point is the DGC path shuts down on the
        // capability error instead of degrading silently.
        if let Err(err) = run_dgc_batch(&device, &options) {
            log::error!("DGC workload cannot run here: {err}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let registry = CubeRegistry::new(&device, MESHLET_GROUP_SIZE * 2)
        .map_err(|e| anyhow!("failed to build the cube registry: {e}"))?;
    let world = build_world(options.instances);
    let (color_view, depth_view) = create_attachments(&device)?;

    let mut lane = MeshletLane::new(MeshletLaneConfig {
        queue: if options.async_compute {
            QueueType::AsyncCompute
        } else {
            QueueType::Generic
        },
        ..Default::default()
    });
    lane.on_device_created(&device)
        .map_err(|e| anyhow!("lane initialization failed: {e}"))?;
    log::info!("Strategy: {:?}", lane.strategy().unwrap());

    let projection =
        Mat4::perspective_rh_zo(60f32.to_radians(), WIDTH as f32 / HEIGHT as f32, 0.1, 500.0);
    let started = Instant::now();

    for frame in 0..options.frames {
        let angle = frame as f32 * 0.05;
        let eye = Vec3::new(angle.sin() * 60.0, 25.0, angle.cos() * 60.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y)
            .ok_or_else(|| anyhow!("degenerate camera"))?;
        let view_projection = projection * view;
        let frustum = Frustum::from_view_projection(&view_projection);
        let ctx = FrameContext {
            color_view: Some(color_view),
            depth_view,
            view_projection,
        };

        let report = lane
            .render(&frustum, &ctx, &world, &registry, &device)
            .map_err(|e| anyhow!("frame {frame} failed: {e}"))?;
        log::info!(
            "frame {frame}: {} visible, {} task records{}",
            report.visible_instances,
            report.task_records,
            match report.native_draws {
                Some(draws) => format!(", {draws} mesh-task draws"),
                None => String::new(),
            }
        );
    }

    let elapsed = started.elapsed();
    println!(
        "{:.3} ms / frame over {} frames",
        1e3 * elapsed.as_secs_f64() / f64::from(options.frames.max(1)),
        options.frames
    );

    lane.on_device_destroyed();
    Ok(())
}
