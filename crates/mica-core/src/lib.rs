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

//! # Mica Core
//!
//! Foundational crate containing the math types, graphics HAL traits, and
//! interface contracts that define the renderer's architecture.
//!
//! Following the hexagonal split used across the workspace, this crate
//! defines the 'what' of GPU submission (descriptors, opaque IDs, device
//! and command-recording traits), while the 'how' is handled by a concrete
//! backend in `mica-infra`. The hot-path lanes in `mica-lanes` are written
//! against these traits only.

#![warn(missing_docs)]

pub mod gpu;
pub mod math;
pub mod utils;
