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

//! Mesh identity and the GPU-resident mesh data the resource manager owns.
//!
//! The submission lane does not own any mesh storage; it looks meshes up
//! through the [`MeshRegistry`](crate::gpu::traits::MeshRegistry) port and
//! references the registry's global buffers in its passes.

use super::buffer::BufferId;

/// An opaque handle to a registered mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// The half-open range of meshlet-group slots a mesh occupies in the
/// registry's global tables.
///
/// `offset` is the first slot and is always 32-aligned for meshes that go
/// through the grouped submission path; `count` is the number of slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawRange {
    /// First meshlet slot of the mesh.
    pub offset: u32,
    /// Number of meshlet slots.
    pub count: u32,
}

/// The attribute layout a mesh was encoded with.
///
/// Determines how many u32 attribute streams each meshlet carries, which
/// the mesh stage needs as a compile-time constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshStyle {
    /// Positions only.
    Wireframe,
    /// Positions and normals.
    Untextured,
    /// Positions, normals, tangents and UVs.
    Textured,
    /// Textured plus joint indices and weights.
    Skinned,
}

impl MeshStyle {
    /// The number of u32 attribute streams per meshlet for this style.
    pub const fn attribute_stream_count(&self) -> u32 {
        match self {
            MeshStyle::Wireframe => 3,
            MeshStyle::Untextured => 4,
            MeshStyle::Textured => 7,
            MeshStyle::Skinned => 9,
        }
    }
}

/// How the registry stores mesh geometry on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshEncoding {
    /// Native meshlet encoding: header/stream/payload buffers decoded by
    /// the mesh stage.
    Meshlet,
    /// Conventional index + vertex buffers consumed by fixed-function
    /// vertex fetch.
    Conventional,
}

/// The registry's global meshlet buffers, used by the native path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshletBuffers {
    /// Per-meshlet headers.
    pub headers: BufferId,
    /// Per-stream headers.
    pub stream_headers: BufferId,
    /// Packed attribute/index payload.
    pub payload: BufferId,
}

/// The registry's global conventional-geometry buffers, used by the
/// fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConventionalBuffers {
    /// The shared index buffer.
    pub indices: BufferId,
    /// Vertex positions, one tightly packed `vec3<f32>` per vertex.
    pub positions: BufferId,
    /// Non-position vertex attributes.
    pub attributes: BufferId,
    /// Template draw arguments, one [`DrawIndexedIndirectArgs`] per
    /// meshlet-group slot, indexed by `DrawRange` slot; the cull stage
    /// copies and compacts survivors from this table.
    ///
    /// [`DrawIndexedIndirectArgs`]: super::indirect::DrawIndexedIndirectArgs
    pub group_draws: BufferId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_counts_by_style() {
        assert_eq!(MeshStyle::Wireframe.attribute_stream_count(), 3);
        assert_eq!(MeshStyle::Untextured.attribute_stream_count(), 4);
        assert_eq!(MeshStyle::Textured.attribute_stream_count(), 7);
        assert_eq!(MeshStyle::Skinned.attribute_stream_count(), 9);
    }
}
