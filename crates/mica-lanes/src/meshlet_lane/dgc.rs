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

//! Device-generated command batches.
//!
//! An independent submission path: a declarative token layout (push
//! constant slot, dispatch slot, byte offsets within a fixed-size record)
//! is registered once; a buffer of such records is built host-side; the
//! whole batch is then handed to the device for expansion and execution in
//! one call, with no per-record host submission.
//!
//! The path is feature-gated. Construction checks the capability report
//! first and fails fast, so an `execute` on a device without support can
//! never be recorded; callers that require the path shut down on the
//! construction error instead.

use bytemuck::Pod;
use mica_core::gpu::error::RenderError;
use mica_core::gpu::{
    BufferDescriptor, BufferId, BufferResidency, BufferUsage, CommandEncoder, GraphicsDevice,
    IndirectLayoutDescriptor, IndirectLayoutId,
};
use std::borrow::Cow;

/// A pre-built batch of device-generated command records.
///
/// Immutable after construction; the registered layout and the record
/// buffer may be executed any number of times, concurrently.
#[derive(Debug)]
pub struct IndirectBatch {
    layout: IndirectLayoutId,
    records: BufferId,
    count_buffer: Option<BufferId>,
    max_count: u32,
}

impl IndirectBatch {
    /// Registers `layout_desc` and uploads `records`, optionally with a
    /// device-readable live count.
    ///
    /// When `live_count` is `Some(n)`, execution runs `min(n, records.len())`
    /// records; when `None`, all of them.
    ///
    /// ## Errors
    /// * [`RenderError::Capability`] - the device lacks device-generated
    ///   compute. Fatal for this path; no GPU work has been recorded.
    pub fn new<R: Pod>(
        device: &dyn GraphicsDevice,
        layout_desc: &IndirectLayoutDescriptor,
        records: &[R],
        live_count: Option<u32>,
    ) -> Result<Self, RenderError> {
        if !device.features().device_generated_compute {
            return Err(RenderError::Capability {
                feature: "device-generated compute",
            });
        }
        debug_assert_eq!(
            std::mem::size_of::<R>() as u32,
            layout_desc.stride,
            "record type does not match the registered stride"
        );

        let layout = device.register_indirect_layout(layout_desc)?;

        let records_buffer = device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Borrowed("dgc records")),
                size: std::mem::size_of_val(records) as u64,
                usage: BufferUsage::INDIRECT | BufferUsage::STORAGE,
                residency: BufferResidency::LinkedDeviceHost,
                zero_init: false,
            },
            bytemuck::cast_slice(records),
        )?;

        let count_buffer = match live_count {
            Some(count) => Some(device.create_buffer_with_data(
                &BufferDescriptor {
                    label: Some(Cow::Borrowed("dgc live count")),
                    size: std::mem::size_of::<u32>() as u64,
                    usage: BufferUsage::INDIRECT,
                    residency: BufferResidency::LinkedDeviceHost,
                    zero_init: false,
                },
                bytemuck::bytes_of(&count),
            )?),
            None => None,
        };

        Ok(Self {
            layout,
            records: records_buffer,
            count_buffer,
            max_count: records.len() as u32,
        })
    }

    /// Records device-side expansion and execution of the whole batch.
    ///
    /// Infallible by construction: a batch only exists on a device that
    /// reported the capability.
    pub fn execute(&self, encoder: &mut dyn CommandEncoder) {
        encoder.execute_indirect_commands(
            self.layout,
            self.max_count,
            &self.records,
            0,
            self.count_buffer.as_ref(),
            0,
        );
    }

    /// The registered layout handle.
    pub fn layout(&self) -> IndirectLayoutId {
        self.layout
    }

    /// The record buffer.
    pub fn records(&self) -> BufferId {
        self.records
    }

    /// The batch capacity (records built).
    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// Releases the batch's buffers. The registered layout stays with the
    /// device arena.
    pub fn release(self, device: &dyn GraphicsDevice) {
        let mut release = |id: BufferId| {
            if let Err(err) = device.destroy_buffer(id) {
                log::warn!("IndirectBatch: failed to release {id:?}: {err}");
            }
        };
        release(self.records);
        if let Some(count) = self.count_buffer {
            release(count);
        }
    }
}

/// Convenience check mirroring the construction gate, for callers that
/// must decide between this path and per-record recording before building
/// anything.
pub fn device_generated_compute_available(device: &dyn GraphicsDevice) -> bool {
    device.features().device_generated_compute
}
