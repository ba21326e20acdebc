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

//! Per-frame GPU buffer management.
//!
//! One [`FrameBuffers`] set is allocated per rendered frame, sized exactly
//! to that frame's data, and released after submission. Buffers are
//! write-once read-many within the frame and never cross a frame boundary;
//! the per-frame allocation churn is the price of a trivial lifetime model
//! for viewer/debug workloads, where a production renderer would pool.

use bytemuck::{cast_slice, Pod, Zeroable};
use mica_core::gpu::error::ResourceError;
use mica_core::gpu::{
    BufferDescriptor, BufferId, BufferResidency, BufferUsage, GraphicsDevice,
};
use mica_core::math::{Frustum, Mat4};
use std::borrow::Cow;

use super::task_params::TaskParams;
use super::world::GpuAabb;

/// The per-frame view block shared by the cull and draw shaders.
///
/// Byte layout mirrors the WGSL `FrameView` uniform struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameView {
    /// Combined view-projection matrix.
    pub view_projection: Mat4,
    /// The six frustum planes as `(normal, distance)` coefficient vectors.
    pub frustum_planes: [[f32; 4]; 6],
    /// Number of task records dispatched this frame.
    pub task_count: u32,
    /// Padding to a 16-byte boundary.
    pub _pad: [u32; 3],
}

impl FrameView {
    /// Builds the view block for one frame.
    pub fn new(view_projection: Mat4, frustum: &Frustum, task_count: u32) -> Self {
        let mut planes = [[0.0f32; 4]; 6];
        for (dst, plane) in planes.iter_mut().zip(frustum.planes.iter()) {
            *dst = [
                plane.normal.x,
                plane.normal.y,
                plane.normal.z,
                plane.distance,
            ];
        }
        Self {
            view_projection,
            frustum_planes: planes,
            task_count,
            _pad: [0; 3],
        }
    }
}

/// The per-frame input buffers: task records, cached transforms, cached
/// bounding boxes, and the view block.
#[derive(Debug, Clone, Copy)]
pub struct FrameBuffers {
    /// The task parameter records, one per meshlet group.
    pub task_params: BufferId,
    /// The snapshot's transform pool.
    pub transforms: BufferId,
    /// The snapshot's bounding-box pool.
    pub aabbs: BufferId,
    /// The [`FrameView`] uniform.
    pub view: BufferId,
}

impl FrameBuffers {
    /// Allocates and populates all per-frame buffers.
    ///
    /// Sizes are exact. Residency prefers host-visible device memory; a
    /// backend without that memory type satisfies the request with a
    /// device-local buffer behind a staged upload, so the only failure
    /// mode left is actual exhaustion, which propagates and fails the
    /// frame.
    pub fn allocate(
        device: &dyn GraphicsDevice,
        task_params: &[TaskParams],
        transforms: &[Mat4],
        aabbs: &[GpuAabb],
        view: &FrameView,
    ) -> Result<Self, ResourceError> {
        debug_assert!(
            !task_params.is_empty() && !transforms.is_empty() && !aabbs.is_empty(),
            "degenerate frames must not allocate buffers"
        );

        let storage = |label: &'static str, bytes: usize| BufferDescriptor {
            label: Some(Cow::Borrowed(label)),
            size: bytes as u64,
            usage: BufferUsage::STORAGE,
            residency: BufferResidency::LinkedDeviceHost,
            zero_init: false,
        };

        let task_params_buffer = device.create_buffer_with_data(
            &storage(
                "frame task params",
                std::mem::size_of_val(task_params),
            ),
            cast_slice(task_params),
        )?;
        let transforms_buffer = device.create_buffer_with_data(
            &storage("frame cached transforms", std::mem::size_of_val(transforms)),
            cast_slice(transforms),
        )?;
        let aabbs_buffer = device.create_buffer_with_data(
            &storage("frame cached aabbs", std::mem::size_of_val(aabbs)),
            cast_slice(aabbs),
        )?;
        let view_buffer = device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Borrowed("frame view")),
                size: std::mem::size_of::<FrameView>() as u64,
                usage: BufferUsage::UNIFORM,
                residency: BufferResidency::LinkedDeviceHost,
                zero_init: false,
            },
            bytemuck::bytes_of(view),
        )?;

        Ok(Self {
            task_params: task_params_buffer,
            transforms: transforms_buffer,
            aabbs: aabbs_buffer,
            view: view_buffer,
        })
    }

    /// Releases all buffers of the set.
    ///
    /// Safe right after submission: backends defer the actual release
    /// until in-flight GPU work no longer references the memory.
    pub fn release(self, device: &dyn GraphicsDevice) {
        for id in [self.task_params, self.transforms, self.aabbs, self.view] {
            if let Err(err) = device.destroy_buffer(id) {
                log::warn!("FrameBuffers: failed to release {id:?}: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_view_layout_matches_shader_struct() {
        // mat4 (64) + 6 * vec4 (96) + counts vec4 (16)
        assert_eq!(std::mem::size_of::<FrameView>(), 176);
    }

    #[test]
    fn frame_view_packs_plane_coefficients() {
        use mica_core::math::Vec3;
        let proj = Mat4::perspective_rh_zo(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y).unwrap();
        let frustum = Frustum::from_view_projection(&(proj * view));

        let block = FrameView::new(proj * view, &frustum, 7);
        assert_eq!(block.task_count, 7);
        for (packed, plane) in block.frustum_planes.iter().zip(frustum.planes.iter()) {
            assert_eq!(packed[0], plane.normal.x);
            assert_eq!(packed[3], plane.distance);
        }
    }
}
