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

//! Plain data types of the GPU HAL: descriptors, opaque IDs, and the
//! byte-layout records shared between host and device.

pub mod binding;
pub mod buffer;
pub mod command;
pub mod features;
pub mod indirect;
pub mod mesh;
pub mod pipeline;
pub mod shader;
pub mod texture;

pub use binding::*;
pub use buffer::*;
pub use command::*;
pub use features::*;
pub use indirect::*;
pub use mesh::*;
pub use pipeline::*;
pub use shader::*;
pub use texture::*;
