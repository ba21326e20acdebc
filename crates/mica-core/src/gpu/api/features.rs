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

//! The device capability report the submission strategy is selected from.

/// Mesh-shading limits of a device that reports the feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshShadingLimits {
    /// The workgroup invocation count the device prefers for mesh-stage
    /// work. Below the lane's minimum, the native path is not worth taking.
    pub max_preferred_workgroup_invocations: u32,
    /// The hard maximum mesh-stage workgroup invocation count.
    pub max_workgroup_invocations: u32,
}

/// The feature report a backend fills in once at device creation.
///
/// The strategy selector is a pure function of this struct; it is queried
/// in the device-created lifecycle hook and never re-read mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceFeatures {
    /// Mesh-shading support and its limits, or `None` when absent.
    pub mesh_shading: Option<MeshShadingLimits>,
    /// Whether the device can expand and execute pre-built compute command
    /// records on its own (device-generated commands).
    pub device_generated_compute: bool,
    /// Whether multi-draw-indirect with a GPU-resident draw count is
    /// available. Required by the compute-cull fallback path.
    pub multi_draw_indirect_count: bool,
    /// Whether pipeline layouts may carry push-constant ranges.
    pub push_constants: bool,
    /// Whether the required subgroup size can be pinned per stage.
    pub subgroup_size_control: bool,
}

/// The kind of backend an adapter runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Vulkan.
    Vulkan,
    /// Metal.
    Metal,
    /// Direct3D 12.
    Dx12,
    /// OpenGL / GLES.
    Gl,
    /// Anything else (software, test doubles).
    Other,
}

/// The physical kind of device behind an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// A GPU integrated with the CPU.
    IntegratedGpu,
    /// A discrete GPU.
    DiscreteGpu,
    /// A GPU virtualized by the environment.
    VirtualGpu,
    /// A CPU-based software renderer.
    Cpu,
    /// Anything else.
    Other,
}

/// Identifying information about the adapter a device was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterProfile {
    /// The adapter's marketing name.
    pub name: String,
    /// The API backend in use.
    pub backend: BackendKind,
    /// The physical device kind.
    pub device_type: DeviceKind,
}
