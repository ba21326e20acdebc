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

//! Bind group and bind group layout descriptors.
//!
//! Layouts are explicit rather than reflected from shaders: the cull and
//! draw stages know their binding interfaces statically, and an explicit
//! pipeline layout is also what the indirect-command layout tokens need to
//! reference.

use super::buffer::BufferId;
use super::shader::ShaderStageFlags;
use std::borrow::Cow;

/// The kind of resource a binding slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// A uniform buffer binding.
    UniformBuffer,
    /// A storage buffer binding.
    StorageBuffer {
        /// `true` when shaders only read the buffer. Writable storage
        /// bindings must set this to `false`.
        read_only: bool,
    },
}

/// One slot of a [`BindGroupLayoutDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupLayoutEntry {
    /// The binding index within the group.
    pub binding: u32,
    /// The shader stages that can access the binding.
    pub visibility: ShaderStageFlags,
    /// The kind of resource bound at this slot.
    pub ty: BindingType,
}

/// A descriptor used to create a [`BindGroupLayoutId`].
#[derive(Debug, Clone)]
pub struct BindGroupLayoutDescriptor<'a> {
    /// An optional debug label for the layout.
    pub label: Option<Cow<'a, str>>,
    /// The binding slots of the group.
    pub entries: Vec<BindGroupLayoutEntry>,
}

/// A sub-range of a buffer bound to a bind group slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferBinding {
    /// The bound buffer.
    pub buffer: BufferId,
    /// Byte offset of the bound range.
    pub offset: u64,
    /// Size of the bound range in bytes, or `None` for the rest of the buffer.
    pub size: Option<u64>,
}

/// The resource bound at a [`BindGroupEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingResource {
    /// A buffer range.
    Buffer(BufferBinding),
}

/// One populated slot of a [`BindGroupDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupEntry {
    /// The binding index within the group.
    pub binding: u32,
    /// The resource bound at this slot.
    pub resource: BindingResource,
}

/// A descriptor used to create a [`BindGroupId`].
#[derive(Debug, Clone)]
pub struct BindGroupDescriptor<'a> {
    /// An optional debug label for the bind group.
    pub label: Option<Cow<'a, str>>,
    /// The layout the group conforms to.
    pub layout: BindGroupLayoutId,
    /// The populated binding slots.
    pub entries: Vec<BindGroupEntry>,
}

/// An opaque handle to a bind group layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupLayoutId(pub usize);

/// An opaque handle to a bind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupId(pub usize);
