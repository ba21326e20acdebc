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

//! Compile-time embedded shader sources of the meshlet lane.

/// Compute kernel of the fallback path: per-group frustum test plus
/// atomic-append compaction of indirect draws and draw parameters.
pub const MESHLET_CULL_WGSL: &str = include_str!("meshlet_cull.wgsl");

/// Vertex/fragment pair of the fallback path's indirect draw. The vertex
/// stage fetches per-draw parameters by instance index.
pub const MESHLET_DRAW_WGSL: &str = include_str!("meshlet_draw.wgsl");

/// Mesh stage of the native path (GLSL, `GL_EXT_mesh_shader`); decodes
/// meshlets directly from the registry's buffers. Only compiled on
/// backends reporting mesh-shading support.
pub const MESHLET_RENDER_MESH_GLSL: &str = include_str!("meshlet_render.mesh.glsl");

/// Fragment stage of the native path (GLSL).
pub const MESHLET_RENDER_FRAG_GLSL: &str = include_str!("meshlet_render.frag.glsl");
