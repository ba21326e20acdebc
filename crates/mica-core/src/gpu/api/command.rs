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

//! Command recording data types: pass descriptors, attachment operations,
//! and queue selection.

use super::texture::TextureViewId;

/// An opaque handle to a finished, submittable command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandBufferId(pub u64);

/// The hardware queue a command buffer is recorded for.
///
/// Per-workload routing only; the frame itself is always recorded from a
/// single thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueueType {
    /// The general graphics + compute queue.
    #[default]
    Generic,
    /// A compute-only queue that can overlap graphics work.
    AsyncCompute,
}

/// An RGBA color used for clear operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel, in `[0, 1]`.
    pub r: f64,
    /// Green channel, in `[0, 1]`.
    pub g: f64,
    /// Blue channel, in `[0, 1]`.
    pub b: f64,
    /// Alpha channel, in `[0, 1]`.
    pub a: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
}

/// The load operation applied to an attachment at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOp<V> {
    /// Clear the attachment to the given value.
    Clear(V),
    /// Preserve the existing contents.
    Load,
}

/// The store operation applied to an attachment at the end of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreOp {
    /// Write results back to the attachment.
    #[default]
    Store,
    /// Discard results (the attachment is transient).
    Discard,
}

/// Combined load and store operations for one attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operations<V> {
    /// Operation at pass start.
    pub load: LoadOp<V>,
    /// Operation at pass end.
    pub store: StoreOp,
}

/// One color attachment of a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPassColorAttachment {
    /// The attached texture view.
    pub view: TextureViewId,
    /// Load/store operations for the attachment.
    pub ops: Operations<Color>,
}

/// The depth attachment of a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPassDepthStencilAttachment {
    /// The attached depth texture view.
    pub view: TextureViewId,
    /// Load/store operations for the depth aspect, or `None` to leave depth
    /// untouched.
    pub depth_ops: Option<Operations<f32>>,
}

/// A descriptor used to begin a render pass.
///
/// A pass with no color attachments and cleared depth is the degenerate
/// frame the lane emits when nothing is visible.
#[derive(Debug, Clone, Default)]
pub struct RenderPassDescriptor<'a> {
    /// An optional debug label for the pass.
    pub label: Option<&'a str>,
    /// The color attachments, by index.
    pub color_attachments: Vec<RenderPassColorAttachment>,
    /// The depth attachment, if any.
    pub depth_stencil_attachment: Option<RenderPassDepthStencilAttachment>,
}

/// A descriptor used to begin a compute pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputePassDescriptor<'a> {
    /// An optional debug label for the pass.
    pub label: Option<&'a str>,
}

/// The index element type of a bound index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned indices.
    Uint16,
    /// 32-bit unsigned indices.
    #[default]
    Uint32,
}
