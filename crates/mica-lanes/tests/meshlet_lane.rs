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

//! Integration tests of the meshlet lane against a recording mock device.

mod common;

use common::{Command, MockDevice, TestRegistry};
use mica_core::gpu::error::RenderError;
use mica_core::gpu::{DeviceFeatures, DeviceLifecycle, DrawRange, MeshHandle, TextureViewId};
use mica_core::math::{Aabb, Frustum, Mat4, Vec3};
use mica_lanes::meshlet_lane::{
    FrameContext, MeshletLane, MeshletLaneConfig, MeshletRenderable, Renderable, RenderWorld,
    SubmissionStrategy,
};

fn camera() -> (Frustum, Mat4) {
    let proj = Mat4::perspective_rh_zo(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 200.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, Vec3::Y).unwrap();
    let view_projection = proj * view;
    (Frustum::from_view_projection(&view_projection), view_projection)
}

fn frame_context(view_projection: Mat4) -> FrameContext {
    FrameContext {
        color_view: Some(TextureViewId(9001)),
        depth_view: TextureViewId(9002),
        view_projection,
    }
}

/// A world with one renderable per entry, each a unit box at the given
/// center, mesh handles counting up from zero.
fn world_with(centers: &[Vec3]) -> RenderWorld {
    let mut world = RenderWorld::new();
    for (i, center) in centers.iter().enumerate() {
        let transform_index = world.push_transforms(&[Mat4::from_translation(*center)]);
        let aabb_index = world.push_aabb(Aabb::from_center_half_extents(*center, Vec3::ONE));
        world.push_renderable(Renderable::Mesh(MeshletRenderable {
            mesh: MeshHandle(i as u32),
            aabb_index,
            transform_index,
        }));
    }
    world
}

fn position_of(commands: &[Command], predicate: impl Fn(&Command) -> bool) -> Option<usize> {
    commands.iter().position(predicate)
}

#[test]
fn zero_visible_instances_submit_one_empty_depth_pass() {
    let device = MockDevice::fallback_capable();
    let registry = TestRegistry::conventional(&device, &[(0, DrawRange { offset: 0, count: 64 })]);
    let mut lane = MeshletLane::new(MeshletLaneConfig::default());
    lane.on_device_created(&device).unwrap();

    let (frustum, view_projection) = camera();
    // Everything far behind the camera.
    let world = world_with(&[Vec3::new(0.0, 0.0, 500.0)]);

    let report = lane
        .render(&frustum, &frame_context(view_projection), &world, &registry, &device)
        .unwrap();

    assert!(report.degenerate);
    assert_eq!(report.task_records, 0);

    let commands = device.commands();
    // Exactly one pass: depth-only, no color attachments, no draws, no cull.
    let begins: Vec<&Command> = commands
        .iter()
        .filter(|c| matches!(c, Command::BeginRenderPass { .. }))
        .collect();
    assert_eq!(begins.len(), 1);
    assert!(matches!(
        begins[0],
        Command::BeginRenderPass {
            color_attachments: 0,
            has_depth: true,
            ..
        }
    ));
    assert!(!commands.iter().any(|c| matches!(c, Command::BeginComputePass)));
    assert!(!commands.iter().any(|c| matches!(
        c,
        Command::Draw | Command::DrawIndexed | Command::DrawMeshTasks { .. }
            | Command::MultiDrawIndexedIndirectCount { .. }
    )));
    assert!(commands.iter().any(|c| matches!(c, Command::Submit(_))));
}

#[test]
fn fallback_frame_orders_cull_barrier_then_indirect_draw() {
    let device = MockDevice::fallback_capable();
    // One instance with 65 meshlet slots -> 3 task records.
    let registry = TestRegistry::conventional(&device, &[(0, DrawRange { offset: 0, count: 65 })]);
    let mut lane = MeshletLane::new(MeshletLaneConfig::default());
    lane.on_device_created(&device).unwrap();
    assert_eq!(lane.strategy(), Some(SubmissionStrategy::ComputeCullFallback));

    let (frustum, view_projection) = camera();
    let world = world_with(&[Vec3::ZERO]);

    let report = lane
        .render(&frustum, &frame_context(view_projection), &world, &registry, &device)
        .unwrap();

    assert_eq!(report.visible_instances, 1);
    assert_eq!(report.task_records, 3);
    // The executed draw count lives on the GPU; the host only has capacity.
    assert_eq!(report.native_draws, None);

    let commands = device.commands();
    let dispatch = position_of(&commands, |c| matches!(c, Command::Dispatch { .. })).unwrap();
    let barrier =
        position_of(&commands, |c| matches!(c, Command::ComputeToIndirectBarrier)).unwrap();
    let draw = position_of(&commands, |c| {
        matches!(c, Command::MultiDrawIndexedIndirectCount { .. })
    })
    .unwrap();

    // The one mandatory ordering point sits between producer and consumer.
    assert!(dispatch < barrier && barrier < draw);

    // ceil(3 / 32) workgroups.
    assert!(matches!(commands[dispatch], Command::Dispatch { x: 1, y: 1, z: 1 }));

    // Count and arguments come from the same buffer: count word at offset
    // zero, packed arguments after the header; capacity is the task count.
    let Command::MultiDrawIndexedIndirectCount {
        args_buffer,
        args_offset,
        count_buffer,
        count_offset,
        max_count,
    } = commands[draw]
    else {
        unreachable!();
    };
    assert_eq!(args_buffer, count_buffer);
    assert_eq!(args_offset, 256);
    assert_eq!(count_offset, 0);
    assert_eq!(max_count, 3);
}

#[test]
fn fallback_output_buffers_are_sized_for_one_entry_per_task_record() {
    let device = MockDevice::fallback_capable();
    let registry = TestRegistry::conventional(&device, &[(0, DrawRange { offset: 0, count: 65 })]);
    let mut lane = MeshletLane::new(MeshletLaneConfig::default());
    lane.on_device_created(&device).unwrap();

    let (frustum, view_projection) = camera();
    let world = world_with(&[Vec3::ZERO]);

    let report = lane
        .render(&frustum, &frame_context(view_projection), &world, &registry, &device)
        .unwrap();

    // 65 slots in one range -> groups of 32, 32, 1.
    assert_eq!(report.task_records, 3);

    // The compaction outputs hold exactly one slot per task record each,
    // so the two buffers correspond 1:1 by construction and the atomic
    // counter can never exceed the dispatched record count.
    let (_, indirect) = device.buffer_by_label("cull indirect draws").unwrap();
    assert_eq!(indirect.size, 256 + 3 * 20);
    assert!(indirect.zero_init, "the atomic draw count must start at zero");
    let (_, params) = device.buffer_by_label("cull compacted params").unwrap();
    assert_eq!(params.size, 3 * 8);

    // Per-frame resources do not outlive the frame.
    assert!(!indirect.alive);
    assert!(!params.alive);
    let (_, task_params) = device.buffer_by_label("frame task params").unwrap();
    assert!(!task_params.alive);
    assert_eq!(task_params.size, 3 * 16);
}

#[test]
fn native_path_issues_one_mesh_task_draw_per_group() {
    let device = MockDevice::mesh_shading_capable(64, 512);
    // Range offset 64 (32-aligned), 65 slots -> groups (64..95), (96..127), (128).
    let registry = TestRegistry::meshlet(&device, &[(0, DrawRange { offset: 64, count: 65 })]);
    let mut lane = MeshletLane::new(MeshletLaneConfig::default());
    lane.on_device_created(&device).unwrap();
    assert_eq!(
        lane.strategy(),
        Some(SubmissionStrategy::NativeMeshShading {
            large_workgroup: true
        })
    );

    let (frustum, view_projection) = camera();
    let world = world_with(&[Vec3::ZERO]);

    let report = lane
        .render(&frustum, &frame_context(view_projection), &world, &registry, &device)
        .unwrap();

    assert_eq!(report.native_draws, Some(3));

    let commands = device.commands();
    assert!(!commands.iter().any(|c| matches!(c, Command::BeginComputePass)));

    let draws: Vec<(u32, u32)> = commands
        .iter()
        .filter_map(|c| match c {
            Command::DrawMeshTasks { x, .. } => Some(*x),
            _ => None,
        })
        .zip(commands.iter().filter_map(|c| match c {
            Command::SetPushConstants { data, .. } => {
                Some(u32::from_le_bytes(data.as_slice().try_into().unwrap()))
            }
            _ => None,
        }))
        .map(|(count, first)| (first, count))
        .collect();

    // Spans recovered from the encoded last-slot values alone.
    assert_eq!(draws, vec![(64, 32), (96, 32), (128, 1)]);
}

#[test]
fn small_mesh_shading_limits_still_pick_the_small_variant() {
    let device = MockDevice::mesh_shading_capable(32, 128);
    let mut lane = MeshletLane::new(MeshletLaneConfig::default());
    lane.on_device_created(&device).unwrap();
    assert_eq!(
        lane.strategy(),
        Some(SubmissionStrategy::NativeMeshShading {
            large_workgroup: false
        })
    );
}

#[test]
fn strategy_is_pinned_between_lifecycle_events() {
    let device = MockDevice::fallback_capable();
    let registry = TestRegistry::conventional(&device, &[(0, DrawRange { offset: 0, count: 32 })]);
    let mut lane = MeshletLane::new(MeshletLaneConfig::default());
    lane.on_device_created(&device).unwrap();
    let pinned = lane.strategy().unwrap();

    let (frustum, view_projection) = camera();
    let world = world_with(&[Vec3::ZERO]);
    for _ in 0..3 {
        lane.render(&frustum, &frame_context(view_projection), &world, &registry, &device)
            .unwrap();
        assert_eq!(lane.strategy(), Some(pinned));
    }

    // Device teardown drops the pinned strategy with the rest of the arena.
    lane.on_device_destroyed();
    assert_eq!(lane.strategy(), None);
    let err = lane
        .render(&frustum, &frame_context(view_projection), &world, &registry, &device)
        .unwrap_err();
    assert!(matches!(err, RenderError::NotInitialized));
}

#[test]
fn fallback_without_indirect_count_is_a_fatal_capability_miss() {
    // No mesh shading and no multi-draw-indirect-count: nothing to select.
    let device = MockDevice::new(DeviceFeatures {
        push_constants: true,
        ..Default::default()
    });
    let mut lane = MeshletLane::new(MeshletLaneConfig::default());
    let err = lane.on_device_created(&device).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Capability {
            feature: "multi-draw indirect count"
        }
    ));
    assert_eq!(lane.strategy(), None);
}
