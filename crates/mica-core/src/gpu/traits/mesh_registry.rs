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
    ConventionalBuffers, DrawRange, MeshEncoding, MeshHandle, MeshletBuffers, MeshStyle,
};

/// The narrow interface to the resource manager that owns mesh data.
///
/// The submission lane consumes meshes exclusively through this port: it
/// never uploads geometry itself, only references the registry's global
/// buffers and per-mesh draw ranges.
pub trait MeshRegistry {
    /// The meshlet-group slot range a mesh occupies, or `None` for a mesh
    /// the registry has not (yet) made resident.
    fn draw_range(&self, mesh: MeshHandle) -> Option<DrawRange>;

    /// The attribute layout the mesh was encoded with.
    fn style(&self, mesh: MeshHandle) -> MeshStyle;

    /// How the registry stores geometry on the device. Fixed per session.
    fn encoding(&self) -> MeshEncoding;

    /// The global meshlet buffers, when [`Self::encoding`] is
    /// [`MeshEncoding::Meshlet`].
    fn meshlet_buffers(&self) -> Option<MeshletBuffers>;

    /// The global conventional-geometry buffers, when [`Self::encoding`]
    /// is [`MeshEncoding::Conventional`].
    fn conventional_buffers(&self) -> Option<ConventionalBuffers>;
}
