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

//! Geometric primitives for visibility culling.
//!
//! This module contains the bounding volume and frustum structures used by
//! the visibility collector and, mirrored into GPU layout, by the compute
//! cull stage.

use super::{Mat4, Vec3, Vec4, EPSILON};

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// An AABB is a rectangular prism aligned with the coordinate axes, defined by
/// its minimum and maximum corner points. It is the only bounding volume the
/// culling path works with.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a new `Aabb` from two corner points.
    ///
    /// The `min` field receives the component-wise minimum and `max` the
    /// component-wise maximum, regardless of argument order.
    #[inline]
    pub fn from_min_max(min_pt: Vec3, max_pt: Vec3) -> Self {
        Self {
            min: Vec3::new(
                min_pt.x.min(max_pt.x),
                min_pt.y.min(max_pt.y),
                min_pt.z.min(max_pt.z),
            ),
            max: Vec3::new(
                min_pt.x.max(max_pt.x),
                min_pt.y.max(max_pt.y),
                min_pt.z.max(max_pt.z),
            ),
        }
    }

    /// Creates a new `Aabb` from a center point and its half-extents.
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let he = half_extents.abs();
        Self {
            min: center - he,
            max: center + he,
        }
    }

    /// Calculates the center point of the `Aabb`.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the half-extents (half the size on each axis) of the `Aabb`.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Checks if the `Aabb` is valid (i.e., `min` <= `max` on all axes).
    /// Degenerate boxes where `min == max` are considered valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and another one.
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: Vec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Transforms the eight corners of the box by `matrix` and returns their
    /// axis-aligned bounds.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let mut min = Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = (*matrix * Vec4::from_vec3(corner, 1.0)).truncate();
            min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Self { min, max }
    }
}

/// A plane in constant-normal form: `normal · p + distance = 0`.
///
/// Points with a positive signed distance lie on the side the normal points
/// towards (the "inside" for frustum planes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// The plane normal. Not required to be unit length until [`Self::normalize`].
    pub normal: Vec3,
    /// The signed distance term.
    pub distance: f32,
}

impl Plane {
    /// Builds a plane from a `(a, b, c, d)` coefficient vector.
    #[inline]
    pub fn from_coefficients(v: Vec4) -> Self {
        Self {
            normal: v.truncate(),
            distance: v.w,
        }
    }

    /// Rescales the plane so the normal has unit length.
    ///
    /// Required before signed distances can be compared against extents.
    pub fn normalize(&self) -> Self {
        let len = self.normal.length();
        if len > EPSILON {
            Self {
                normal: self.normal * (1.0 / len),
                distance: self.distance / len,
            }
        } else {
            *self
        }
    }

    /// Signed distance from the plane to a point.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// A view frustum as six inward-facing planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far planes, each normalized and
    /// pointing into the frustum interior.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the six clip planes from a combined view-projection matrix.
    ///
    /// Uses the Gribb-Hartmann row combinations for a \[0, 1\] depth range:
    /// the near plane is row 2 itself rather than `row3 + row2`.
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let r0 = view_projection.get_row(0);
        let r1 = view_projection.get_row(1);
        let r2 = view_projection.get_row(2);
        let r3 = view_projection.get_row(3);

        let planes = [
            Plane::from_coefficients(r3 + r0).normalize(), // left
            Plane::from_coefficients(r3 - r0).normalize(), // right
            Plane::from_coefficients(r3 + r1).normalize(), // bottom
            Plane::from_coefficients(r3 - r1).normalize(), // top
            Plane::from_coefficients(r2).normalize(),      // near
            Plane::from_coefficients(r3 - r2).normalize(), // far
        ];
        Self { planes }
    }

    /// Conservative frustum/AABB intersection test.
    ///
    /// Tests the box's projected radius against each plane (the "p-vertex"
    /// test). Boxes straddling a plane count as intersecting; the test can
    /// accept boxes outside the frustum near its corners, never reject
    /// visible ones.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let center = aabb.center();
        let half = aabb.half_extents();
        for plane in &self.planes {
            let radius = half.x * plane.normal.x.abs()
                + half.y * plane.normal.y.abs()
                + half.z * plane.normal.z.abs();
            if plane.signed_distance(center) < -radius {
                return false;
            }
        }
        true
    }

    /// Checks whether a single point lies inside the frustum.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.signed_distance(point) >= 0.0)
    }
}
