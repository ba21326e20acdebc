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

//! # Mica Lanes
//!
//! Hot-path execution pipelines recorded against the `mica-core` graphics
//! HAL. The one lane here drives GPU-culled meshlet submission: visibility
//! collection, per-group task parameter expansion, per-frame buffer
//! management, and draw submission through either native mesh shading or a
//! compute-cull + indirect-draw fallback, selected once per device from its
//! capability report.

#![warn(missing_docs)]

pub mod meshlet_lane;
