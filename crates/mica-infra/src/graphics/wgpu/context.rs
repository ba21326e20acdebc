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

use anyhow::{anyhow, Result};
use mica_core::gpu::DeviceFeatures;
use wgpu::{Adapter, Features, Instance};

/// Maximum push-constant block size requested when the adapter supports
/// push constants at all.
const PUSH_CONSTANT_BYTES: u32 = 128;

/// Holds the core WGPU state objects required for GPU submission.
///
/// Initialized headless: no surface or swapchain is created, the lane
/// renders into caller-provided attachments.
#[derive(Debug)]
pub struct WgpuGraphicsContext {
    pub(crate) adapter: wgpu::Adapter,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,

    /// The HAL-level capability report derived from the adapter at creation.
    pub(crate) hal_features: DeviceFeatures,
    pub(crate) active_device_features: wgpu::Features,
}

impl WgpuGraphicsContext {
    /// Asynchronously initializes a headless graphics context on the
    /// highest-performance adapter the instance offers.
    pub async fn new() -> Result<Self> {
        let instance = Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("Failed to find a suitable adapter: {e}"))?;

        Self::from_adapter(adapter).await
    }

    /// Initializes the context from a pre-selected adapter.
    pub async fn from_adapter(adapter: Adapter) -> Result<Self> {
        let adapter_info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (Backend: {:?})",
            adapter_info.name,
            adapter_info.backend
        );

        // Everything here is optional; the lane degrades by strategy
        // selection rather than refusing to start.
        let wanted: Features = Features::MULTI_DRAW_INDIRECT
            | Features::MULTI_DRAW_INDIRECT_COUNT
            | Features::INDIRECT_FIRST_INSTANCE
            | Features::PUSH_CONSTANTS;
        let features_to_enable = adapter.features() & wanted;

        let mut limits = wgpu::Limits::default();
        if features_to_enable.contains(Features::PUSH_CONSTANTS) {
            limits.max_push_constant_size = PUSH_CONSTANT_BYTES;
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Mica Logical Device"),
                required_features: features_to_enable,
                required_limits: limits,
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
            })
            .await
            .map_err(|e| anyhow!("Failed to create logical device: {e}"))?;
        log::info!("Logical device and command queue created.");

        device.on_uncaptured_error(Box::new(|e| {
            log::error!("WGPU Uncaptured Error: {e:?}");
        }));

        let active_device_features = device.features();
        log::debug!("Active device features: {active_device_features:?}");

        let hal_features = Self::report_features(active_device_features);
        log::info!("HAL capability report: {hal_features:?}");

        Ok(WgpuGraphicsContext {
            adapter,
            device,
            queue,
            hal_features,
            active_device_features,
        })
    }

    /// Maps active wgpu features onto the HAL capability report.
    ///
    /// wgpu exposes neither mesh shading nor device-generated commands, so
    /// both are truthfully reported absent and the lane's strategy selector
    /// always lands on the compute-cull fallback over this backend.
    fn report_features(active: wgpu::Features) -> DeviceFeatures {
        DeviceFeatures {
            mesh_shading: None,
            device_generated_compute: false,
            multi_draw_indirect_count: active
                .contains(Features::MULTI_DRAW_INDIRECT | Features::MULTI_DRAW_INDIRECT_COUNT),
            push_constants: active.contains(Features::PUSH_CONSTANTS),
            subgroup_size_control: false,
        }
    }

    /// The wgpu device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The wgpu submission queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// The HAL capability report.
    pub fn hal_features(&self) -> &DeviceFeatures {
        &self.hal_features
    }
}
