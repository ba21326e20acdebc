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

//! Column-major 4x4 matrix, laid out exactly as shaders expect it.

use bytemuck::{Pod, Zeroable};
use std::ops::Mul;

use super::{Vec3, Vec4, EPSILON};

/// A 4x4 column-major matrix of `f32`.
///
/// The memory layout matches `mat4x4<f32>` in WGSL and `mat4` in GLSL, so a
/// flat `&[Mat4]` can be uploaded to a storage buffer unchanged.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4 {
            x: self.cols[0].get(index),
            y: self.cols[1].get(index),
            z: self.cols[2].get(index),
            w: self.cols[3].get(index),
        }
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self {
            cols: [
                Vec4::X,
                Vec4::Y,
                Vec4::Z,
                Vec4::new(v.x, v.y, v.z, 1.0),
            ],
        }
    }

    /// Creates a non-uniform scale matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            cols: [
                Vec4::new(scale.x, 0.0, 0.0, 0.0),
                Vec4::new(0.0, scale.y, 0.0, 0.0),
                Vec4::new(0.0, 0.0, scale.z, 0.0),
                Vec4::W,
            ],
        }
    }

    /// Creates a rotation matrix around the y axis.
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            cols: [
                Vec4::new(c, 0.0, -s, 0.0),
                Vec4::Y,
                Vec4::new(s, 0.0, c, 0.0),
                Vec4::W,
            ],
        }
    }

    /// Creates a right-handed perspective projection with a \[0, 1\] depth range.
    ///
    /// `fov_y` is the vertical field of view in radians. The camera looks down
    /// the negative z axis.
    pub fn perspective_rh_zo(fov_y: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        debug_assert!(z_near > 0.0 && z_far > z_near);
        let f = 1.0 / (fov_y * 0.5).tan();
        let r = z_far / (z_near - z_far);
        Self {
            cols: [
                Vec4::new(f / aspect, 0.0, 0.0, 0.0),
                Vec4::new(0.0, f, 0.0, 0.0),
                Vec4::new(0.0, 0.0, r, -1.0),
                Vec4::new(0.0, 0.0, r * z_near, 0.0),
            ],
        }
    }

    /// Creates a right-handed view matrix looking from `eye` towards `target`.
    ///
    /// Returns `None` when the view direction is degenerate (eye and target
    /// coincide, or the direction is parallel to `up`).
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let forward = (target - eye).normalize();
        if forward.length_squared() < EPSILON {
            return None;
        }
        let side = forward.cross(up).normalize();
        if side.length_squared() < EPSILON {
            return None;
        }
        let new_up = side.cross(forward);
        Some(Self {
            cols: [
                Vec4::new(side.x, new_up.x, -forward.x, 0.0),
                Vec4::new(side.y, new_up.y, -forward.y, 0.0),
                Vec4::new(side.z, new_up.z, -forward.z, 0.0),
                Vec4::new(-side.dot(eye), -new_up.dot(eye), forward.dot(eye), 1.0),
            ],
        })
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> Self {
        Self {
            cols: [
                self.get_row(0),
                self.get_row(1),
                self.get_row(2),
                self.get_row(3),
            ],
        }
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut cols = [Vec4::ZERO; 4];
        for (i, col) in cols.iter_mut().enumerate() {
            *col = self * rhs.cols[i];
        }
        Mat4 { cols }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Vec4 {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_is_neutral() {
        let v = Vec4::new(1.0, -2.0, 3.0, 1.0);
        assert_eq!(Mat4::IDENTITY * v, v);
        let t = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(Mat4::IDENTITY * t, t);
    }

    #[test]
    fn translation_moves_points() {
        let t = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let p = t * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p.truncate(), Vec3::new(1.0, 2.0, 3.0));
        // Directions (w = 0) are unaffected.
        let d = t * Vec4::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(d.truncate(), Vec3::Z);
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        let proj = Mat4::perspective_rh_zo(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let near = proj * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        let far = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_places_eye_at_origin() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y).unwrap();
        let eye = view * Vec4::new(0.0, 0.0, 5.0, 1.0);
        assert_relative_eq!(eye.truncate().length(), 0.0, epsilon = 1e-5);
        // A point in front of the camera lands on the negative z axis.
        let ahead = view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(ahead.z < 0.0);
    }

    #[test]
    fn look_at_rejects_degenerate_input() {
        assert!(Mat4::look_at_rh(Vec3::ZERO, Vec3::ZERO, Vec3::Y).is_none());
        assert!(Mat4::look_at_rh(Vec3::ZERO, Vec3::Y, Vec3::Y).is_none());
    }
}
