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

use crate::gpu::error::RenderError;
use crate::gpu::traits::GraphicsDevice;

/// Explicit device lifecycle hooks.
///
/// The owning device context invokes these at well-defined points:
/// `on_device_created` after a device exists, `on_device_destroyed` before
/// it is torn down. Everything a hook derives from the device (pipelines,
/// registered layouts, persistent buffers) is scoped to that lifetime:
/// implementors hold it in a single state arena built in the created hook
/// and dropped wholesale in the destroyed hook, so a device recreation
/// (e.g. after device loss) rebuilds all derived state from scratch.
pub trait DeviceLifecycle {
    /// Called once after a device has been created.
    ///
    /// This is where submission strategy selection happens; the choice is
    /// pinned until the matching [`on_device_destroyed`](Self::on_device_destroyed).
    fn on_device_created(&mut self, device: &dyn GraphicsDevice) -> Result<(), RenderError>;

    /// Called once before the device is destroyed. Drops all derived state.
    fn on_device_destroyed(&mut self);
}
