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

//! Minimal texture surface of the HAL.
//!
//! The submission lane only needs render attachments (a depth target for
//! the cull/draw passes and an optional color target), so the texture API
//! stays deliberately small.

use crate::mica_bitflags;
use std::borrow::Cow;

/// The pixel formats the lane's attachments can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit RGBA, sRGB-encoded.
    Rgba8UnormSrgb,
    /// 8-bit BGRA, sRGB-encoded (common swapchain format).
    Bgra8UnormSrgb,
    /// 32-bit floating-point depth.
    Depth32Float,
}

impl TextureFormat {
    /// Whether the format is a depth format.
    #[inline]
    pub const fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth32Float)
    }
}

mica_bitflags! {
    /// Allowed usages of a [`TextureId`].
    pub struct TextureUsage: u32 {
        /// The texture can be used as the source of a copy operation.
        const COPY_SRC = 1 << 0;
        /// The texture can be used as the destination of a copy operation.
        const COPY_DST = 1 << 1;
        /// The texture can be sampled in shaders.
        const TEXTURE_BINDING = 1 << 2;
        /// The texture can be used as a color or depth attachment.
        const RENDER_ATTACHMENT = 1 << 3;
    }
}

/// The size of a texture in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent3d {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth, or number of array layers.
    pub depth_or_array_layers: u32,
}

/// A descriptor used to create a [`TextureId`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label for the texture.
    pub label: Option<Cow<'a, str>>,
    /// The texture dimensions.
    pub size: Extent3d,
    /// The texel format.
    pub format: TextureFormat,
    /// A bitmask of [`TextureUsage`] flags.
    pub usage: TextureUsage,
}

/// A descriptor used to create a [`TextureViewId`] covering the whole texture.
#[derive(Debug, Clone, Default)]
pub struct TextureViewDescriptor<'a> {
    /// An optional debug label for the view.
    pub label: Option<Cow<'a, str>>,
}

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// An opaque handle to a view over a [`TextureId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureViewId(pub usize);
