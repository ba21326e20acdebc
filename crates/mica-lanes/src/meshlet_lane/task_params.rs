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

//! Expansion of visible instances into fixed-size meshlet-group records.
//!
//! Each visible instance's draw range is split into groups of up to
//! [`MESHLET_GROUP_SIZE`] consecutive meshlet slots; the last group takes
//! the remainder. One [`TaskParams`] record is emitted per group, in input
//! order, groups within an instance in ascending slot order.

use bytemuck::{Pod, Zeroable};
use mica_core::gpu::DrawRange;

use super::visibility::VisibilityList;

/// Meshlet slots per task record; also the cull dispatch workgroup width.
pub const MESHLET_GROUP_SIZE: u32 = 32;

/// One meshlet-group record, in the byte layout the cull shader reads.
///
/// `mesh_index_count` encodes the absolute slot index of the group's
/// **last** meshlet. The consumer recovers the group's first slot from the
/// previous record's encoded value plus one (or the range offset for the
/// first group), and its length without a separate count field; see
/// [`decode_group`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct TaskParams {
    /// Index of the instance's cached world-space bounding box.
    pub aabb_instance: u32,
    /// Index of the instance's first transform.
    pub node_instance: u32,
    /// Number of consecutive transforms (skinning).
    pub node_count: u32,
    /// Encoded absolute slot index of the group's last meshlet.
    pub mesh_index_count: u32,
}

/// A group's recovered first slot and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpan {
    /// Absolute index of the group's first meshlet slot.
    pub first: u32,
    /// Number of meshlet slots in the group, in `1..=MESHLET_GROUP_SIZE`.
    pub len: u32,
}

/// Recovers a group's span from its encoded last-slot value.
///
/// `previous` is the previous group's encoded value within the same
/// instance, or `None` for the instance's first group, in which case the
/// group starts at `range_offset`.
#[inline]
pub fn decode_group(previous: Option<u32>, encoded: u32, range_offset: u32) -> GroupSpan {
    let first = previous.map_or(range_offset, |p| p + 1);
    GroupSpan {
        first,
        len: encoded - first + 1,
    }
}

/// Expands every visible instance into task records, appended to `out`.
///
/// Draw-range offsets must be 32-aligned; an unaligned offset is a broken
/// contract with the registry, not a runtime condition.
pub fn build_task_params(list: &VisibilityList, out: &mut Vec<TaskParams>) {
    for vis in list.items() {
        let range: DrawRange = vis.draw_range;
        debug_assert_eq!(
            range.offset % MESHLET_GROUP_SIZE,
            0,
            "draw-range offset {} is not {}-aligned",
            range.offset,
            MESHLET_GROUP_SIZE
        );

        let mut record = TaskParams {
            aabb_instance: vis.aabb_index,
            node_instance: vis.transform_index,
            node_count: vis.transform_count,
            mesh_index_count: 0,
        };

        let mut i = 0;
        while i < range.count {
            record.mesh_index_count =
                range.offset + i + ((range.count - i).min(MESHLET_GROUP_SIZE) - 1);
            out.push(record);
            i += MESHLET_GROUP_SIZE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshlet_lane::visibility::VisibleInstance;

    fn list_with_ranges(ranges: &[(u32, u32)]) -> VisibilityList {
        let mut list = VisibilityList::new();
        for (i, &(offset, count)) in ranges.iter().enumerate() {
            list.push(VisibleInstance {
                renderable: i as u32,
                transform_index: i as u32,
                transform_count: 1,
                aabb_index: i as u32,
                draw_range: DrawRange { offset, count },
            });
        }
        list
    }

    #[test]
    fn sixty_five_slots_make_three_groups() {
        let mut out = Vec::new();
        build_task_params(&list_with_ranges(&[(0, 65)]), &mut out);
        assert_eq!(out.len(), 3);
        let spans = decode_all(&out, 0);
        assert_eq!(spans, vec![(0, 32), (32, 32), (64, 1)]);
    }

    #[test]
    fn encoded_values_are_strictly_increasing_and_end_at_range_end() {
        let (offset, count) = (96, 100);
        let mut out = Vec::new();
        build_task_params(&list_with_ranges(&[(offset, count)]), &mut out);

        assert_eq!(out.len(), count.div_ceil(32) as usize);
        for pair in out.windows(2) {
            assert!(pair[0].mesh_index_count < pair[1].mesh_index_count);
        }
        assert_eq!(
            out.last().unwrap().mesh_index_count,
            offset + count - 1
        );
    }

    #[test]
    fn exact_multiple_has_no_remainder_group() {
        let mut out = Vec::new();
        build_task_params(&list_with_ranges(&[(32, 64)]), &mut out);
        let spans = decode_all(&out, 32);
        assert_eq!(spans, vec![(32, 32), (64, 32)]);
    }

    #[test]
    fn zero_count_range_emits_nothing() {
        let mut out = Vec::new();
        build_task_params(&list_with_ranges(&[(0, 0)]), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn groups_follow_instance_order() {
        let mut out = Vec::new();
        build_task_params(&list_with_ranges(&[(0, 33), (64, 32)]), &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].node_instance, 0);
        assert_eq!(out[1].node_instance, 0);
        assert_eq!(out[2].node_instance, 1);
        assert_eq!(out[2].mesh_index_count, 95);
    }

    #[test]
    fn record_layout_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<TaskParams>(), 16);
    }

    #[test]
    #[should_panic(expected = "not 32-aligned")]
    #[cfg(debug_assertions)]
    fn unaligned_offset_is_a_contract_violation() {
        let mut out = Vec::new();
        build_task_params(&list_with_ranges(&[(5, 10)]), &mut out);
    }

    fn decode_all(records: &[TaskParams], range_offset: u32) -> Vec<(u32, u32)> {
        let mut previous = None;
        records
            .iter()
            .map(|r| {
                let span = decode_group(previous, r.mesh_index_count, range_offset);
                previous = Some(r.mesh_index_count);
                (span.first, span.len)
            })
            .collect()
    }
}
