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

//! Submission strategy selection.
//!
//! A pure function of the device capability report, evaluated once in the
//! device-created lifecycle hook and pinned until the device goes away. A
//! capability change (device loss and recreation) re-runs selection
//! through the same hook; nothing re-evaluates mid-session.

use mica_core::gpu::DeviceFeatures;

/// Minimum preferred mesh-stage workgroup invocation count for the native
/// path to be worth taking.
pub const MIN_PREFERRED_MESH_INVOCATIONS: u32 = 32;

/// Preferred-invocation threshold above which the large-workgroup shader
/// variant pays off.
pub const LARGE_WORKGROUP_PREFERRED_INVOCATIONS: u32 = 32;

/// Hard invocation limit the large-workgroup variant requires.
pub const LARGE_WORKGROUP_MAX_INVOCATIONS: u32 = 256;

/// How the lane submits meshlet work on the current device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStrategy {
    /// The GPU expands per-meshlet work itself through task/mesh stages.
    NativeMeshShading {
        /// Use the shader variant sized for large mesh workgroups.
        large_workgroup: bool,
    },
    /// A compute pass culls and compacts work into an indirect buffer
    /// consumed by a conventional multi-indirect draw.
    ComputeCullFallback,
}

impl SubmissionStrategy {
    /// Selects the strategy for a device. Deterministic: the same report
    /// always yields the same strategy.
    pub fn select(features: &DeviceFeatures) -> Self {
        match features.mesh_shading {
            Some(limits)
                if limits.max_preferred_workgroup_invocations
                    >= MIN_PREFERRED_MESH_INVOCATIONS =>
            {
                SubmissionStrategy::NativeMeshShading {
                    large_workgroup: limits.max_preferred_workgroup_invocations
                        > LARGE_WORKGROUP_PREFERRED_INVOCATIONS
                        && limits.max_workgroup_invocations >= LARGE_WORKGROUP_MAX_INVOCATIONS,
                }
            }
            _ => SubmissionStrategy::ComputeCullFallback,
        }
    }

    /// Whether the native mesh-shading path was selected.
    pub fn is_native(&self) -> bool {
        matches!(self, SubmissionStrategy::NativeMeshShading { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mica_core::gpu::MeshShadingLimits;

    fn with_mesh_shading(preferred: u32, max: u32) -> DeviceFeatures {
        DeviceFeatures {
            mesh_shading: Some(MeshShadingLimits {
                max_preferred_workgroup_invocations: preferred,
                max_workgroup_invocations: max,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn no_mesh_shading_selects_the_fallback() {
        assert_eq!(
            SubmissionStrategy::select(&DeviceFeatures::default()),
            SubmissionStrategy::ComputeCullFallback
        );
    }

    #[test]
    fn small_preferred_invocation_count_selects_the_fallback() {
        assert_eq!(
            SubmissionStrategy::select(&with_mesh_shading(16, 1024)),
            SubmissionStrategy::ComputeCullFallback
        );
    }

    #[test]
    fn threshold_table() {
        // (preferred, max) -> expected large_workgroup flag
        let cases = [
            (32, 128, false), // at the minimum, small variant
            (32, 1024, false),
            (33, 255, false), // preferred clears, hard limit does not
            (33, 256, true),
            (64, 256, true),
            (128, 1024, true),
        ];
        for (preferred, max, large) in cases {
            assert_eq!(
                SubmissionStrategy::select(&with_mesh_shading(preferred, max)),
                SubmissionStrategy::NativeMeshShading {
                    large_workgroup: large
                },
                "preferred={preferred} max={max}"
            );
        }
    }

    #[test]
    fn selection_is_idempotent() {
        let features = with_mesh_shading(64, 512);
        let first = SubmissionStrategy::select(&features);
        for _ in 0..8 {
            assert_eq!(SubmissionStrategy::select(&features), first);
        }
    }
}
