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

//! Backend-agnostic GPU submission contracts.
//!
//! This module defines the "common language" for everything that touches the
//! device: resource descriptors and opaque IDs (`api`), the device and
//! command-recording traits (`traits`), and the error hierarchy (`error`).
//! The `mica-infra` crate provides the concrete wgpu implementation of these
//! traits; `mica-lanes` records whole frames against them without knowing
//! which backend is underneath.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{RenderError, ResourceError};
pub use self::traits::{
    CommandEncoder, ComputePass, DeviceLifecycle, GraphicsDevice, MeshRegistry, RenderPass,
};
