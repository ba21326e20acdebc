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

//! Math primitives for spatial reasoning on the CPU side of the renderer.
//!
//! The types here are deliberately small: vectors and matrices in the GPU's
//! column-major layout, plus the bounding-volume and frustum primitives the
//! visibility path needs. All of them are `#[repr(C)]` and byte-castable so
//! cached pools can be uploaded to the GPU without a conversion pass.

pub mod geometry;
pub mod matrix;
pub mod vector;

pub use geometry::{Aabb, Frustum, Plane};
pub use matrix::Mat4;
pub use vector::{Vec3, Vec4};

/// Default tolerance used for floating-point comparisons.
pub const EPSILON: f32 = 1e-6;
