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

//! Conversions from HAL enums and flag sets to their wgpu counterparts.

use mica_core::gpu::{
    BindingType, BufferUsage, Color, CompareFunction, IndexFormat, LoadOp, Operations,
    PrimitiveTopology, ShaderStage, ShaderStageFlags, StoreOp, TextureFormat, TextureUsage,
    VertexFormat,
};

/// Converts a HAL value into the equivalent wgpu value.
pub(crate) trait IntoWgpu<W> {
    fn into_wgpu(self) -> W;
}

impl IntoWgpu<wgpu::BufferUsages> for BufferUsage {
    fn into_wgpu(self) -> wgpu::BufferUsages {
        let mut usages = wgpu::BufferUsages::empty();
        if self.contains(BufferUsage::MAP_READ) {
            usages |= wgpu::BufferUsages::MAP_READ;
        }
        if self.contains(BufferUsage::MAP_WRITE) {
            usages |= wgpu::BufferUsages::MAP_WRITE;
        }
        if self.contains(BufferUsage::COPY_SRC) {
            usages |= wgpu::BufferUsages::COPY_SRC;
        }
        if self.contains(BufferUsage::COPY_DST) {
            usages |= wgpu::BufferUsages::COPY_DST;
        }
        if self.contains(BufferUsage::VERTEX) {
            usages |= wgpu::BufferUsages::VERTEX;
        }
        if self.contains(BufferUsage::INDEX) {
            usages |= wgpu::BufferUsages::INDEX;
        }
        if self.contains(BufferUsage::UNIFORM) {
            usages |= wgpu::BufferUsages::UNIFORM;
        }
        if self.contains(BufferUsage::STORAGE) {
            usages |= wgpu::BufferUsages::STORAGE;
        }
        if self.contains(BufferUsage::INDIRECT) {
            usages |= wgpu::BufferUsages::INDIRECT;
        }
        usages
    }
}

impl IntoWgpu<wgpu::TextureUsages> for TextureUsage {
    fn into_wgpu(self) -> wgpu::TextureUsages {
        let mut usages = wgpu::TextureUsages::empty();
        if self.contains(TextureUsage::COPY_SRC) {
            usages |= wgpu::TextureUsages::COPY_SRC;
        }
        if self.contains(TextureUsage::COPY_DST) {
            usages |= wgpu::TextureUsages::COPY_DST;
        }
        if self.contains(TextureUsage::TEXTURE_BINDING) {
            usages |= wgpu::TextureUsages::TEXTURE_BINDING;
        }
        if self.contains(TextureUsage::RENDER_ATTACHMENT) {
            usages |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }
        usages
    }
}

impl IntoWgpu<wgpu::TextureFormat> for TextureFormat {
    fn into_wgpu(self) -> wgpu::TextureFormat {
        match self {
            TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
        }
    }
}

impl IntoWgpu<wgpu::IndexFormat> for IndexFormat {
    fn into_wgpu(self) -> wgpu::IndexFormat {
        match self {
            IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
            IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
        }
    }
}

impl IntoWgpu<wgpu::VertexFormat> for VertexFormat {
    fn into_wgpu(self) -> wgpu::VertexFormat {
        match self {
            VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
            VertexFormat::Uint32 => wgpu::VertexFormat::Uint32,
        }
    }
}

impl IntoWgpu<wgpu::PrimitiveTopology> for PrimitiveTopology {
    fn into_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveTopology::LineList => wgpu::PrimitiveTopology::LineList,
        }
    }
}

impl IntoWgpu<wgpu::CompareFunction> for CompareFunction {
    fn into_wgpu(self) -> wgpu::CompareFunction {
        match self {
            CompareFunction::Less => wgpu::CompareFunction::Less,
            CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
            CompareFunction::Always => wgpu::CompareFunction::Always,
        }
    }
}

impl IntoWgpu<wgpu::ShaderStages> for ShaderStageFlags {
    fn into_wgpu(self) -> wgpu::ShaderStages {
        let mut stages = wgpu::ShaderStages::empty();
        if self.contains(ShaderStage::Vertex) {
            stages |= wgpu::ShaderStages::VERTEX;
        }
        if self.contains(ShaderStage::Fragment) {
            stages |= wgpu::ShaderStages::FRAGMENT;
        }
        if self.contains(ShaderStage::Compute) {
            stages |= wgpu::ShaderStages::COMPUTE;
        }
        // Task/mesh stages have no wgpu equivalent; pipeline creation for
        // them is rejected before any flag conversion happens.
        stages
    }
}

impl IntoWgpu<wgpu::BindingType> for BindingType {
    fn into_wgpu(self) -> wgpu::BindingType {
        match self {
            BindingType::UniformBuffer => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            BindingType::StorageBuffer { read_only } => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
        }
    }
}

impl IntoWgpu<wgpu::Operations<wgpu::Color>> for Operations<Color> {
    fn into_wgpu(self) -> wgpu::Operations<wgpu::Color> {
        wgpu::Operations {
            load: match self.load {
                LoadOp::Clear(c) => wgpu::LoadOp::Clear(wgpu::Color {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                    a: c.a,
                }),
                LoadOp::Load => wgpu::LoadOp::Load,
            },
            store: self.store.into_wgpu(),
        }
    }
}

impl IntoWgpu<wgpu::Operations<f32>> for Operations<f32> {
    fn into_wgpu(self) -> wgpu::Operations<f32> {
        wgpu::Operations {
            load: match self.load {
                LoadOp::Clear(v) => wgpu::LoadOp::Clear(v),
                LoadOp::Load => wgpu::LoadOp::Load,
            },
            store: self.store.into_wgpu(),
        }
    }
}

impl IntoWgpu<wgpu::StoreOp> for StoreOp {
    fn into_wgpu(self) -> wgpu::StoreOp {
        match self {
            StoreOp::Store => wgpu::StoreOp::Store,
            StoreOp::Discard => wgpu::StoreOp::Discard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_usage_flags_map_one_to_one() {
        let usage = BufferUsage::STORAGE | BufferUsage::INDIRECT | BufferUsage::COPY_DST;
        let wgpu_usage: wgpu::BufferUsages = usage.into_wgpu();
        assert!(wgpu_usage.contains(wgpu::BufferUsages::STORAGE));
        assert!(wgpu_usage.contains(wgpu::BufferUsages::INDIRECT));
        assert!(wgpu_usage.contains(wgpu::BufferUsages::COPY_DST));
        assert!(!wgpu_usage.contains(wgpu::BufferUsages::VERTEX));
    }

    #[test]
    fn compute_only_stage_flags() {
        let stages: wgpu::ShaderStages = ShaderStageFlags::COMPUTE.into_wgpu();
        assert_eq!(stages, wgpu::ShaderStages::COMPUTE);
    }
}
