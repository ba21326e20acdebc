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

//! The scene snapshot the lane renders from.
//!
//! The lane never walks a scene graph; the owning scene flattens what the
//! renderer needs into a [`RenderWorld`] once per frame: the cached
//! world-space transform pool, the cached world-space bounding-box pool,
//! and the renderable records pointing into both. The pools are stored in
//! GPU byte layout so buffer upload is a plain byte borrow.

use bytemuck::{Pod, Zeroable};
use mica_core::gpu::MeshHandle;
use mica_core::math::{Aabb, Mat4, Vec3};

/// A world-space bounding box in the GPU's 16-byte-aligned layout.
///
/// Mirrors the `Aabb` struct of the cull shader; the fourth component of
/// each corner is padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuAabb {
    /// Minimum corner; `.w` unused.
    pub min: [f32; 4],
    /// Maximum corner; `.w` unused.
    pub max: [f32; 4],
}

impl GpuAabb {
    /// Packs a math [`Aabb`] into GPU layout.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self {
            min: [aabb.min.x, aabb.min.y, aabb.min.z, 0.0],
            max: [aabb.max.x, aabb.max.y, aabb.max.z, 0.0],
        }
    }

    /// Unpacks back into the math [`Aabb`] for CPU-side tests.
    pub fn to_aabb(&self) -> Aabb {
        Aabb {
            min: Vec3::new(self.min[0], self.min[1], self.min[2]),
            max: Vec3::new(self.max[0], self.max[1], self.max[2]),
        }
    }
}

/// The draw payload shared by every renderable kind the lane can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshletRenderable {
    /// The mesh, resolved through the registry for its draw range.
    pub mesh: MeshHandle,
    /// Index of the cached world-space bounding box in the AABB pool.
    pub aabb_index: u32,
    /// Index of the first transform in the cached transform pool.
    pub transform_index: u32,
}

/// A renderable scene entry.
///
/// A closed set of kinds replaces the scene graph's virtual renderable
/// interface: the collector double-dispatches by matching, and each kind
/// answers the bounding-volume and transform-range queries itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderable {
    /// Rigidly transformed meshlet geometry (a single transform).
    Mesh(MeshletRenderable),
    /// Skinned meshlet geometry; `transform_index` is the first of
    /// `joint_count` consecutive joint transforms.
    SkinnedMesh {
        /// The shared draw payload.
        mesh: MeshletRenderable,
        /// Number of joint transforms, at least 2.
        joint_count: u32,
    },
}

impl Renderable {
    /// The shared draw payload of any renderable kind.
    pub fn meshlet(&self) -> &MeshletRenderable {
        match self {
            Renderable::Mesh(m) => m,
            Renderable::SkinnedMesh { mesh, .. } => mesh,
        }
    }

    /// How many consecutive transforms the instance consumes: 1, or the
    /// joint count when skinned.
    pub fn transform_count(&self) -> u32 {
        match self {
            Renderable::Mesh(_) => 1,
            Renderable::SkinnedMesh { joint_count, .. } => *joint_count,
        }
    }
}

/// The flattened, read-only scene snapshot for one frame.
#[derive(Debug, Default)]
pub struct RenderWorld {
    transforms: Vec<Mat4>,
    aabbs: Vec<GpuAabb>,
    renderables: Vec<Renderable>,
}

impl RenderWorld {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all pools for reuse without releasing their storage.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.aabbs.clear();
        self.renderables.clear();
    }

    /// Appends a run of transforms, returning the index of the first.
    pub fn push_transforms(&mut self, transforms: &[Mat4]) -> u32 {
        let offset = self.transforms.len() as u32;
        self.transforms.extend_from_slice(transforms);
        offset
    }

    /// Appends a world-space bounding box, returning its index.
    pub fn push_aabb(&mut self, aabb: Aabb) -> u32 {
        let index = self.aabbs.len() as u32;
        self.aabbs.push(GpuAabb::from_aabb(&aabb));
        index
    }

    /// Appends a renderable record.
    pub fn push_renderable(&mut self, renderable: Renderable) {
        self.renderables.push(renderable);
    }

    /// The cached transform pool.
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    /// The cached bounding-box pool.
    pub fn aabbs(&self) -> &[GpuAabb] {
        &self.aabbs
    }

    /// The renderable records, in snapshot order.
    pub fn renderables(&self) -> &[Renderable] {
        &self.renderables
    }
}
