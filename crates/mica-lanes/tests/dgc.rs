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

//! Integration tests of the device-generated command batch.

mod common;

use bytemuck::{Pod, Zeroable};
use common::{Command, MockDevice};
use mica_core::gpu::error::RenderError;
use mica_core::gpu::{
    BindGroupLayoutDescriptor, DispatchIndirectArgs, GraphicsDevice, IndirectLayoutDescriptor,
    IndirectLayoutToken, PipelineLayoutDescriptor, PushConstantRange, QueueType, ShaderStageFlags,
};
use mica_lanes::meshlet_lane::IndirectBatch;
use std::borrow::Cow;

/// The record layout both submission paths agree on: a push-constant word
/// followed by dispatch arguments.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
struct DispatchRecord {
    push: u32,
    dispatch: DispatchIndirectArgs,
}

fn test_records() -> Vec<DispatchRecord> {
    (0..4u32)
        .map(|i| DispatchRecord {
            push: i,
            dispatch: DispatchIndirectArgs {
                x: i + 1,
                y: 1,
                z: 1,
            },
        })
        .collect()
}

fn layout_descriptor(device: &dyn GraphicsDevice) -> IndirectLayoutDescriptor<'static> {
    let bind_group_layout = device
        .create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some(Cow::Borrowed("dgc output")),
            entries: vec![],
        })
        .unwrap();
    let pipeline_layout = device
        .create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(Cow::Borrowed("dgc compute layout")),
            bind_group_layouts: vec![bind_group_layout],
            push_constant_ranges: vec![PushConstantRange {
                stages: ShaderStageFlags::COMPUTE,
                range: 0..4,
            }],
        })
        .unwrap();

    IndirectLayoutDescriptor {
        label: Some(Cow::Borrowed("dgc dispatch records")),
        tokens: vec![
            IndirectLayoutToken::PushConstant {
                record_offset: 0,
                dst_offset: 0,
                size: 4,
                layout: pipeline_layout,
            },
            IndirectLayoutToken::Dispatch { record_offset: 4 },
        ],
        stride: std::mem::size_of::<DispatchRecord>() as u32,
    }
}

/// Decodes `(push, x, y, z)` per record the way the device-side expansion
/// would, from the registered tokens and the raw record bytes.
fn interpret_batch(
    device: &MockDevice,
    command: &Command,
) -> Vec<(u32, u32, u32, u32)> {
    let Command::ExecuteIndirectCommands {
        layout,
        max_count,
        records,
        count_buffer,
    } = command
    else {
        panic!("not an execute command: {command:?}");
    };

    let (tokens, stride) = device.indirect_layout(*layout).expect("layout registered");
    let bytes = device.buffer(*records).expect("records buffer").data;

    let executed = match count_buffer {
        Some(id) => {
            let count_bytes = device.buffer(*id).expect("count buffer").data;
            u32::from_le_bytes(count_bytes[0..4].try_into().unwrap()).min(*max_count)
        }
        None => *max_count,
    };

    let word = |base: usize, offset: u32| {
        let at = base + offset as usize;
        u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    };

    (0..executed as usize)
        .map(|i| {
            let base = i * stride as usize;
            let mut push = 0;
            let mut dispatch = (0, 0, 0);
            for token in &tokens {
                match token {
                    IndirectLayoutToken::PushConstant { record_offset, .. } => {
                        push = word(base, *record_offset);
                    }
                    IndirectLayoutToken::Dispatch { record_offset } => {
                        dispatch = (
                            word(base, *record_offset),
                            word(base, record_offset + 4),
                            word(base, record_offset + 8),
                        );
                    }
                }
            }
            (push, dispatch.0, dispatch.1, dispatch.2)
        })
        .collect()
}

#[test]
fn batch_execution_matches_per_record_manual_recording() {
    let device = MockDevice::dgc_capable();
    let records = test_records();
    let live_count = 3u32;

    // Device-generated path: one execute call for the whole batch.
    let batch = IndirectBatch::new(
        &device,
        &layout_descriptor(&device),
        &records,
        Some(live_count),
    )
    .unwrap();
    {
        let mut encoder = device.create_command_encoder(QueueType::AsyncCompute, Some("dgc"));
        batch.execute(encoder.as_mut());
        let command_buffer = encoder.finish();
        device.submit_command_buffer(command_buffer);
    }

    let commands = device.commands();
    let execute = commands
        .iter()
        .find(|c| matches!(c, Command::ExecuteIndirectCommands { .. }))
        .expect("the batch records exactly one device-side expansion call");
    let expanded = interpret_batch(&device, execute);

    // Manual path: per-record push constant + indirect dispatch, the loop
    // the batch replaces.
    let manual: Vec<(u32, u32, u32, u32)> = records
        .iter()
        .take(live_count as usize)
        .map(|r| (r.push, r.dispatch.x, r.dispatch.y, r.dispatch.z))
        .collect();

    assert_eq!(expanded, manual);
    assert_eq!(expanded.len(), live_count as usize);
}

#[test]
fn omitted_count_buffer_executes_the_full_batch() {
    let device = MockDevice::dgc_capable();
    let records = test_records();

    let batch = IndirectBatch::new(&device, &layout_descriptor(&device), &records, None).unwrap();
    let mut encoder = device.create_command_encoder(QueueType::Generic, None);
    batch.execute(encoder.as_mut());
    let command_buffer = encoder.finish();
    device.submit_command_buffer(command_buffer);

    let commands = device.commands();
    let execute = commands
        .iter()
        .find(|c| matches!(c, Command::ExecuteIndirectCommands { .. }))
        .unwrap();
    assert!(matches!(
        execute,
        Command::ExecuteIndirectCommands {
            count_buffer: None,
            max_count: 4,
            ..
        }
    ));
    assert_eq!(interpret_batch(&device, execute).len(), 4);
}

#[test]
fn missing_capability_fails_before_any_execution() {
    let device = MockDevice::fallback_capable();
    let records = test_records();

    let err = IndirectBatch::new(&device, &layout_descriptor(&device), &records, None)
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::Capability {
            feature: "device-generated compute"
        }
    ));

    // Fail-fast means fail-fast: nothing was recorded, nothing executed.
    assert!(!device
        .commands()
        .iter()
        .any(|c| matches!(c, Command::ExecuteIndirectCommands { .. } | Command::Submit(_))));
}
