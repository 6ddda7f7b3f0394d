//! Invertible affine transforms
//!
//! A transform carries both its matrix and the analytically-built inverse;
//! every builder maintains the pair, so a transform without a valid inverse
//! cannot be constructed. Composing two transforms composes both matrices.

use super::mat::{Mat3, Mat4};
use super::vec::{Vec2, Vec3, Vec4};

/// 2D affine transform (3x3 matrix + inverse)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    mat: Mat3,
    inv: Mat3,
}

/// 3D affine transform (4x4 matrix + inverse)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3 {
    mat: Mat4,
    inv: Mat4,
}

impl Transform2 {
    /// Identity transform.
    pub fn new() -> Self {
        Self { mat: Mat3::identity(), inv: Mat3::identity() }
    }

    pub(crate) fn from_parts(mat: Mat3, inv: Mat3) -> Self {
        Self { mat, inv }
    }

    /// Forward matrix.
    pub fn mat(&self) -> &Mat3 {
        &self.mat
    }

    /// Inverse matrix.
    pub fn mat_inv(&self) -> &Mat3 {
        &self.inv
    }

    /// Apply the transform to a point.
    pub fn apply(&self, v: Vec2) -> Vec2 {
        (self.mat * Vec3::from_vec2(v, 1.0)).xy()
    }

    /// Apply the transform to a direction (ignores translation).
    pub fn apply_to_dir(&self, v: Vec2) -> Vec2 {
        (self.mat * Vec3::from_vec2(v, 0.0)).xy()
    }

    /// Apply the inverse transform to a point.
    pub fn apply_inv(&self, v: Vec2) -> Vec2 {
        (self.inv * Vec3::from_vec2(v, 1.0)).xy()
    }

    /// Transform performing the inverse action.
    pub fn inversed(self) -> Self {
        Self { mat: self.inv, inv: self.mat }
    }

    /// Transform performing the transposed action.
    pub fn transposed(self) -> Self {
        Self { mat: self.mat.transposed(), inv: self.inv.transposed() }
    }

    /// Stack another transform on top of this one (applied after).
    pub fn stack(self, that: &Transform2) -> Self {
        self.stack_parts(that.mat, that.inv)
    }

    fn stack_parts(self, mat: Mat3, inv: Mat3) -> Self {
        Self { mat: mat * self.mat, inv: self.inv * inv }
    }

    /// Stack `(x', y') = (x + delta.x, y + delta.y)`.
    pub fn translate(self, delta: Vec2) -> Self {
        let mut mr = Mat3::identity();
        let mut mi = Mat3::identity();
        mr[(0, 2)] = delta.x;
        mr[(1, 2)] = delta.y;
        mi[(0, 2)] = -delta.x;
        mi[(1, 2)] = -delta.y;
        self.stack_parts(mr, mi)
    }

    /// Stack a rotation by `angle` radians (counter-clockwise).
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mr = Mat3::from_rows(
            Vec3::new(cos, -sin, 0.0),
            Vec3::new(sin, cos, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        // rotations are orthonormal
        self.stack_parts(mr, mr.transposed())
    }

    /// Stack `(x', y') = (scale.x * x, scale.y * y)`, factors nonzero.
    pub fn scale(self, scale: Vec2) -> Self {
        assert!(scale.x != 0.0 && scale.y != 0.0, "scale factors must be nonzero");
        let mut mr = Mat3::identity();
        let mut mi = Mat3::identity();
        mr[(0, 0)] = scale.x;
        mr[(1, 1)] = scale.y;
        mi[(0, 0)] = 1.0 / scale.x;
        mi[(1, 1)] = 1.0 / scale.y;
        self.stack_parts(mr, mi)
    }

    /// Stack `(x', y') = (-x, y)`.
    pub fn reflect_x(self) -> Self {
        self.scale(Vec2::new(-1.0, 1.0))
    }

    /// Stack `(x', y') = (x, -y)`.
    pub fn reflect_y(self) -> Self {
        self.scale(Vec2::new(1.0, -1.0))
    }

    /// Stack `(x', y') = (x + t * y, y)`.
    pub fn shear_x(self, t: f32) -> Self {
        let mut mr = Mat3::identity();
        let mut mi = Mat3::identity();
        mr[(0, 1)] = t;
        mi[(0, 1)] = -t;
        self.stack_parts(mr, mi)
    }

    /// Stack `(x', y') = (x, y + t * x)`.
    pub fn shear_y(self, t: f32) -> Self {
        let mut mr = Mat3::identity();
        let mut mi = Mat3::identity();
        mr[(1, 0)] = t;
        mi[(1, 0)] = -t;
        self.stack_parts(mr, mi)
    }
}

impl Transform3 {
    /// Identity transform.
    pub fn new() -> Self {
        Self { mat: Mat4::identity(), inv: Mat4::identity() }
    }

    pub(crate) fn from_parts(mat: Mat4, inv: Mat4) -> Self {
        Self { mat, inv }
    }

    /// Forward matrix.
    pub fn mat(&self) -> &Mat4 {
        &self.mat
    }

    /// Inverse matrix.
    pub fn mat_inv(&self) -> &Mat4 {
        &self.inv
    }

    /// Apply the transform to a point.
    pub fn apply(&self, v: Vec3) -> Vec3 {
        (self.mat * Vec4::from_vec3(v, 1.0)).xyz()
    }

    /// Apply the transform to a direction (ignores translation).
    pub fn apply_to_dir(&self, v: Vec3) -> Vec3 {
        (self.mat * Vec4::from_vec3(v, 0.0)).xyz()
    }

    /// Apply the inverse transform to a point.
    pub fn apply_inv(&self, v: Vec3) -> Vec3 {
        (self.inv * Vec4::from_vec3(v, 1.0)).xyz()
    }

    /// Apply the full homogeneous matrix to a clip-space vector.
    pub fn apply_vec4(&self, v: Vec4) -> Vec4 {
        self.mat * v
    }

    /// Transform performing the inverse action.
    pub fn inversed(self) -> Self {
        Self { mat: self.inv, inv: self.mat }
    }

    /// Transform performing the transposed action.
    pub fn transposed(self) -> Self {
        Self { mat: self.mat.transposed(), inv: self.inv.transposed() }
    }

    /// Stack another transform on top of this one (applied after).
    pub fn stack(self, that: &Transform3) -> Self {
        self.stack_parts(that.mat, that.inv)
    }

    fn stack_parts(self, mat: Mat4, inv: Mat4) -> Self {
        Self { mat: mat * self.mat, inv: self.inv * inv }
    }

    /// Stack a translation by `delta`.
    pub fn translate(self, delta: Vec3) -> Self {
        let mut mr = Mat4::identity();
        let mut mi = Mat4::identity();
        mr[(0, 3)] = delta.x;
        mr[(1, 3)] = delta.y;
        mr[(2, 3)] = delta.z;
        mi[(0, 3)] = -delta.x;
        mi[(1, 3)] = -delta.y;
        mi[(2, 3)] = -delta.z;
        self.stack_parts(mr, mi)
    }

    /// Stack a rotation around the x axis by `angle` radians.
    pub fn rotate_x(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mr = Mat4::from_rows(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, cos, -sin, 0.0),
            Vec4::new(0.0, sin, cos, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        );
        self.stack_parts(mr, mr.transposed())
    }

    /// Stack a rotation around the y axis by `angle` radians.
    pub fn rotate_y(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mr = Mat4::from_rows(
            Vec4::new(cos, 0.0, sin, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(-sin, 0.0, cos, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        );
        self.stack_parts(mr, mr.transposed())
    }

    /// Stack a rotation around the z axis by `angle` radians.
    pub fn rotate_z(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mr = Mat4::from_rows(
            Vec4::new(cos, -sin, 0.0, 0.0),
            Vec4::new(sin, cos, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        );
        self.stack_parts(mr, mr.transposed())
    }

    /// Stack a per-axis scale, factors nonzero.
    pub fn scale(self, scale: Vec3) -> Self {
        assert!(
            scale.x != 0.0 && scale.y != 0.0 && scale.z != 0.0,
            "scale factors must be nonzero"
        );
        let mut mr = Mat4::identity();
        let mut mi = Mat4::identity();
        mr[(0, 0)] = scale.x;
        mr[(1, 1)] = scale.y;
        mr[(2, 2)] = scale.z;
        mi[(0, 0)] = 1.0 / scale.x;
        mi[(1, 1)] = 1.0 / scale.y;
        mi[(2, 2)] = 1.0 / scale.z;
        self.stack_parts(mr, mi)
    }

    /// Stack `(x', y', z') = (-x, y, z)`.
    pub fn reflect_x(self) -> Self {
        self.scale(Vec3::new(-1.0, 1.0, 1.0))
    }

    /// Stack `(x', y', z') = (x, -y, z)`.
    pub fn reflect_y(self) -> Self {
        self.scale(Vec3::new(1.0, -1.0, 1.0))
    }

    /// Stack `(x', y', z') = (x, y, -z)`.
    pub fn reflect_z(self) -> Self {
        self.scale(Vec3::new(1.0, 1.0, -1.0))
    }

    /// Stack `(x', y', z') = (x + s * z, y + t * z, z)`.
    pub fn shear_xy(self, s: f32, t: f32) -> Self {
        let mut mr = Mat4::identity();
        let mut mi = Mat4::identity();
        mr[(0, 2)] = s;
        mr[(1, 2)] = t;
        mi[(0, 2)] = -s;
        mi[(1, 2)] = -t;
        self.stack_parts(mr, mi)
    }

    /// Stack `(x', y', z') = (x + s * y, y, z + t * y)`.
    pub fn shear_xz(self, s: f32, t: f32) -> Self {
        let mut mr = Mat4::identity();
        let mut mi = Mat4::identity();
        mr[(0, 1)] = s;
        mr[(2, 1)] = t;
        mi[(0, 1)] = -s;
        mi[(2, 1)] = -t;
        self.stack_parts(mr, mi)
    }

    /// Stack `(x', y', z') = (x, y + s * x, z + t * x)`.
    pub fn shear_yz(self, s: f32, t: f32) -> Self {
        let mut mr = Mat4::identity();
        let mut mi = Mat4::identity();
        mr[(1, 0)] = s;
        mr[(2, 0)] = t;
        mi[(1, 0)] = -s;
        mi[(2, 0)] = -t;
        self.stack_parts(mr, mi)
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Transform3 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::float::{almost_eq_ulps, radians};

    const ULPS: u32 = 64; // composed matrices accumulate a few rounding steps
    const EPS: f32 = 1e-4; // absolute, for entries that should cancel to 0

    fn assert_identity3(m: Mat3) {
        let id = Mat3::identity();
        for i in 0..3 {
            for j in 0..3 {
                assert!(
                    (m[(i, j)] - id[(i, j)]).abs() <= EPS,
                    "expected identity, got {:?}",
                    m
                );
            }
        }
    }

    fn assert_identity4(m: Mat4) {
        let id = Mat4::identity();
        for i in 0..4 {
            for j in 0..4 {
                assert!(
                    (m[(i, j)] - id[(i, j)]).abs() <= EPS,
                    "expected identity, got {:?}",
                    m
                );
            }
        }
    }

    #[test]
    fn test_forward_times_inverse_2d() {
        let t = Transform2::new()
            .scale(Vec2::new(3.0, 0.5))
            .rotate(radians(30.0))
            .translate(Vec2::new(-2.0, 7.0))
            .reflect_x()
            .shear_x(0.25);
        assert_identity3(*t.mat() * *t.mat_inv());
        assert_identity3(*t.mat_inv() * *t.mat());
    }

    #[test]
    fn test_forward_times_inverse_3d() {
        let t = Transform3::new()
            .translate(Vec3::new(1.0, 2.0, 3.0))
            .rotate_x(radians(15.0))
            .rotate_y(radians(-40.0))
            .rotate_z(radians(75.0))
            .scale(Vec3::new(2.0, 4.0, 0.25))
            .reflect_z()
            .shear_yz(0.5, -0.5);
        assert_identity4(*t.mat() * *t.mat_inv());
        assert_identity4(*t.mat_inv() * *t.mat());
    }

    #[test]
    fn test_apply_roundtrip() {
        let t = Transform3::new()
            .rotate_y(radians(90.0))
            .translate(Vec3::new(5.0, 0.0, -1.0));
        let p = Vec3::new(1.0, 2.0, 3.0);
        let q = t.apply_inv(t.apply(p));
        assert!(almost_eq_ulps(p.x, q.x, ULPS));
        assert!(almost_eq_ulps(p.y, q.y, ULPS));
        assert!(almost_eq_ulps(p.z, q.z, ULPS));
    }

    #[test]
    fn test_stack_composes_both_matrices() {
        let a = Transform2::new().translate(Vec2::new(1.0, 0.0));
        let b = Transform2::new().scale(Vec2::new(2.0, 2.0));
        let ab = a.stack(&b);
        // apply a first, then b
        assert_eq!(ab.apply(Vec2::ZERO), Vec2::new(2.0, 0.0));
        assert_identity3(*ab.mat() * *ab.mat_inv());
    }

    #[test]
    fn test_inversed_swaps_action() {
        let t = Transform2::new().translate(Vec2::new(3.0, -1.0));
        assert_eq!(t.inversed().apply(Vec2::ZERO), Vec2::new(-3.0, 1.0));
    }

    #[test]
    fn test_apply_to_dir_ignores_translation() {
        let t = Transform2::new().translate(Vec2::new(10.0, 10.0));
        assert_eq!(t.apply_to_dir(Vec2::new(1.0, 0.0)), Vec2::new(1.0, 0.0));
    }
}
