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

//! Pipeline and pipeline layout descriptors for the three pipeline kinds
//! the lane records: compute (cull), classic raster (fallback draw), and
//! mesh shading (native draw).

use super::binding::BindGroupLayoutId;
use super::shader::{ShaderModuleId, ShaderStageFlags};
use super::texture::TextureFormat;
use std::borrow::Cow;
use std::ops::Range;

/// A push-constant range within a pipeline layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushConstantRange {
    /// The stages that can read the range.
    pub stages: ShaderStageFlags,
    /// The byte range within the push-constant block.
    pub range: Range<u32>,
}

/// A descriptor used to create a [`PipelineLayoutId`].
#[derive(Debug, Clone)]
pub struct PipelineLayoutDescriptor<'a> {
    /// An optional debug label for the layout.
    pub label: Option<Cow<'a, str>>,
    /// The bind group layouts, by group index.
    pub bind_group_layouts: Vec<BindGroupLayoutId>,
    /// The push-constant ranges of the layout.
    pub push_constant_ranges: Vec<PushConstantRange>,
}

/// An opaque handle to a pipeline layout.
///
/// Besides pipeline creation, this identity is what an indirect-command
/// layout token references as the target of a device-generated push
/// constant write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineLayoutId(pub usize);

/// A descriptor used to create a [`ComputePipelineId`].
#[derive(Debug, Clone)]
pub struct ComputePipelineDescriptor<'a> {
    /// An optional debug label for the compute pipeline.
    pub label: Option<Cow<'a, str>>,
    /// The pipeline layout, describing the bind groups used by this pipeline.
    pub layout: PipelineLayoutId,
    /// The compiled compute shader module.
    pub shader_module: ShaderModuleId,
    /// The name of the entry point function in the compute shader.
    pub entry_point: Cow<'a, str>,
}

/// An opaque handle to a compiled compute pipeline state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComputePipelineId(pub usize);

/// The format of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Two 32-bit floats.
    Float32x2,
    /// Three 32-bit floats.
    Float32x3,
    /// Four 32-bit floats.
    Float32x4,
    /// One unsigned 32-bit integer.
    Uint32,
}

/// One attribute within a [`VertexBufferLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// The attribute data format.
    pub format: VertexFormat,
    /// Byte offset of the attribute within one element.
    pub offset: u64,
    /// The `@location` the attribute feeds in the vertex shader.
    pub shader_location: u32,
}

/// The layout of one bound vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexBufferLayout {
    /// Byte stride between elements.
    pub array_stride: u64,
    /// The attributes sourced from this buffer.
    pub attributes: Vec<VertexAttribute>,
}

/// Primitive assembly mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Every three vertices form an independent triangle.
    #[default]
    TriangleList,
    /// Every two vertices form an independent line.
    LineList,
}

/// Depth-test comparison function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunction {
    /// Pass when the fragment depth is less than the stored depth.
    #[default]
    Less,
    /// Pass when the fragment depth is less than or equal to the stored depth.
    LessEqual,
    /// Always pass.
    Always,
}

/// Depth attachment state shared by the raster and mesh pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthState {
    /// The depth attachment format.
    pub format: TextureFormat,
    /// Whether the pipeline writes depth.
    pub depth_write: bool,
    /// The depth comparison function.
    pub compare: CompareFunction,
}

/// A descriptor used to create a [`RenderPipelineId`].
#[derive(Debug, Clone)]
pub struct RenderPipelineDescriptor<'a> {
    /// An optional debug label for the pipeline.
    pub label: Option<Cow<'a, str>>,
    /// The pipeline layout.
    pub layout: PipelineLayoutId,
    /// The vertex shader module.
    pub vertex_shader: ShaderModuleId,
    /// The vertex entry point name.
    pub vertex_entry: Cow<'a, str>,
    /// The fragment shader module, or `None` for a depth-only pipeline.
    pub fragment_shader: Option<ShaderModuleId>,
    /// The fragment entry point name.
    pub fragment_entry: Cow<'a, str>,
    /// The bound vertex buffer layouts, by slot.
    pub vertex_buffers: Vec<VertexBufferLayout>,
    /// Primitive assembly mode.
    pub topology: PrimitiveTopology,
    /// The color attachment format, or `None` for a depth-only pipeline.
    pub color_format: Option<TextureFormat>,
    /// The depth attachment state, or `None` when no depth attachment is bound.
    pub depth: Option<DepthState>,
}

/// An opaque handle to a compiled render pipeline state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPipelineId(pub usize);

/// A descriptor used to create a [`MeshPipelineId`].
///
/// Only meaningful on devices reporting mesh-shading support; backends
/// without it reject creation with a capability error before any shader is
/// compiled.
#[derive(Debug, Clone)]
pub struct MeshPipelineDescriptor<'a> {
    /// An optional debug label for the pipeline.
    pub label: Option<Cow<'a, str>>,
    /// The pipeline layout.
    pub layout: PipelineLayoutId,
    /// The task (amplification) stage module, if the pipeline uses one.
    pub task_shader: Option<ShaderModuleId>,
    /// The mesh stage module.
    pub mesh_shader: ShaderModuleId,
    /// The fragment shader module, or `None` for a depth-only pipeline.
    pub fragment_shader: Option<ShaderModuleId>,
    /// The color attachment format, or `None` for a depth-only pipeline.
    pub color_format: Option<TextureFormat>,
    /// The depth attachment state, or `None` when no depth attachment is bound.
    pub depth: Option<DepthState>,
    /// Pipeline-overridable constants, by name. Carries the attribute
    /// stream count and the large-workgroup variant switch.
    pub constants: Vec<(Cow<'a, str>, f64)>,
    /// Required subgroup size for the mesh stage as `log2(size)`, when the
    /// device supports subgroup size control.
    pub subgroup_size_log2: Option<u32>,
}

/// An opaque handle to a compiled mesh-shading pipeline state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshPipelineId(pub usize);
