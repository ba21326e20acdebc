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

//! Indirect-command argument records and the device-generated-command
//! layout description.
//!
//! The argument structs are byte-exact mirrors of what indirect draw and
//! dispatch commands read from GPU memory; the compute cull shader writes
//! the same layout from the device side, so any change here is a change to
//! the shader interface as well.

use super::pipeline::PipelineLayoutId;
use bytemuck::{Pod, Zeroable};
use std::borrow::Cow;

/// Arguments of one indexed indirect draw, as read by the device.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct DrawIndexedIndirectArgs {
    /// Number of indices to draw.
    pub index_count: u32,
    /// Number of instances to draw.
    pub instance_count: u32,
    /// First index within the bound index buffer.
    pub first_index: u32,
    /// Signed offset added to each index.
    pub base_vertex: i32,
    /// First instance; the cull shader stores the compacted slot here so
    /// the vertex stage can address per-draw parameters by instance index.
    pub first_instance: u32,
}

/// Arguments of one indirect compute dispatch, as read by the device.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct DispatchIndirectArgs {
    /// Workgroup count along x.
    pub x: u32,
    /// Workgroup count along y.
    pub y: u32,
    /// Workgroup count along z.
    pub z: u32,
}

/// Byte offset at which packed draw arguments begin inside the compacted
/// indirect buffer.
///
/// The first word of the buffer is the atomic draw count; the remainder of
/// the header is padding so the argument array starts at a
/// storage-buffer-friendly alignment. The count word at offset 0 doubles as
/// the GPU-resident draw count consumed by `multi_draw_indexed_indirect_count`.
pub const INDIRECT_DRAW_HEADER_BYTES: u64 = 256;

/// One token of an indirect-command layout: what the device writes or
/// executes from a slice of each fixed-size command record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndirectLayoutToken {
    /// The record carries a push-constant payload at `record_offset`.
    PushConstant {
        /// Byte offset of the payload within the record.
        record_offset: u32,
        /// Destination byte offset within the pipeline's push-constant block.
        dst_offset: u32,
        /// Payload size in bytes.
        size: u32,
        /// The pipeline layout the push constant targets.
        layout: PipelineLayoutId,
    },
    /// The record carries [`DispatchIndirectArgs`] at `record_offset`.
    Dispatch {
        /// Byte offset of the dispatch arguments within the record.
        record_offset: u32,
    },
}

/// A descriptor used to register an [`IndirectLayoutId`].
///
/// Registered once per layout; the token list and `stride` must stay
/// byte-identical between host-side record construction and device-side
/// interpretation for the lifetime of the layout.
#[derive(Debug, Clone)]
pub struct IndirectLayoutDescriptor<'a> {
    /// An optional debug label for the layout.
    pub label: Option<Cow<'a, str>>,
    /// The tokens of one record, in execution order.
    pub tokens: Vec<IndirectLayoutToken>,
    /// The size of one record in bytes.
    pub stride: u32,
}

/// An opaque handle to a registered indirect-command layout.
///
/// Immutable after registration; safe to reference from any number of
/// concurrent executions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndirectLayoutId(pub usize);
