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

//! Defines the hierarchy of error types for the GPU submission subsystem.
//!
//! The taxonomy follows the frame-driver contract: capability mismatches are
//! fatal for the code path that hit them and must never degrade silently;
//! resource failures fail the frame; contract violations (alignment,
//! mismatched record sizes) are programming errors and are asserted rather
//! than represented here.

use std::fmt;

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A resource referenced by ID could not be found.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// A buffer or texture allocation failed.
    Allocation {
        /// A descriptive label for the resource, if available.
        label: String,
        /// The requested size in bytes.
        size: u64,
        /// Detailed error messages from the backend.
        details: String,
    },
    /// A shader module failed to compile into a backend-specific module.
    Shader {
        /// A descriptive label for the shader, if available.
        label: String,
        /// Detailed error messages from the shader compiler.
        details: String,
    },
    /// The operation requires a device feature the current device does not
    /// report. Surfaced before any command touching the feature is recorded.
    MissingCapability {
        /// The name of the missing feature.
        feature: &'static str,
    },
    /// An error originating from the specific graphics backend implementation.
    Backend(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::Allocation {
                label,
                size,
                details,
            } => {
                write!(f, "Allocation of '{label}' ({size} bytes) failed: {details}")
            }
            ResourceError::Shader { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
            ResourceError::MissingCapability { feature } => {
                write!(f, "Device is missing required capability: {feature}")
            }
            ResourceError::Backend(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error that can occur while recording or submitting a frame.
#[derive(Debug)]
pub enum RenderError {
    /// An operation was attempted before the device-created lifecycle hook
    /// ran (no pipelines or persistent GPU state exist yet).
    NotInitialized,
    /// A code path was entered that the device cannot execute. Fatal for
    /// that path: the caller must fall back or shut the workload down.
    Capability {
        /// The name of the missing feature.
        feature: &'static str,
    },
    /// An error occurred while managing a GPU resource.
    Resource(ResourceError),
    /// A failure occurred while recording commands for the frame.
    Recording(String),
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => {
                write!(f, "The submission lane is not initialized for a device.")
            }
            RenderError::Capability { feature } => {
                write!(
                    f,
                    "Execution path requires unsupported device capability: {feature}"
                )
            }
            RenderError::Resource(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::Recording(msg) => {
                write!(f, "Command recording failed: {msg}")
            }
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        // Capability misses keep their taxonomy when lifted to frame level.
        match err {
            ResourceError::MissingCapability { feature } => RenderError::Capability { feature },
            other => RenderError::Resource(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn resource_error_display() {
        let err = ResourceError::Allocation {
            label: "frame task params".to_string(),
            size: 4096,
            details: "out of device memory".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Allocation of 'frame task params' (4096 bytes) failed: out of device memory"
        );
    }

    #[test]
    fn capability_miss_keeps_taxonomy_when_lifted() {
        let err = ResourceError::MissingCapability {
            feature: "device-generated compute",
        };
        let render_err: RenderError = err.into();
        assert!(matches!(
            render_err,
            RenderError::Capability {
                feature: "device-generated compute"
            }
        ));
    }

    #[test]
    fn render_error_display_wrapping_resource_error() {
        let err: RenderError = ResourceError::NotFound.into();
        assert_eq!(
            format!("{err}"),
            "Graphics resource operation failed: Resource not found with ID."
        );
        assert!(err.source().is_some());
    }
}
