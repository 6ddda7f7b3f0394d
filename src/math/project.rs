//! Canonical view volume and projection builders
//!
//! The pipeline uses reverse depth: all visible geometry is mapped into
//! `[-1,1] x [-1,1] x [0,1]` with z = 1 at the near plane and z = 0 at the
//! far plane. Projection transforms carry analytically-derived inverses
//! rather than numerically-inverted matrices.

use super::aabb::{Aabb2, Aabb3};
use super::float::almost_eq;
use super::mat::Mat4;
use super::transform::Transform3;
use super::vec::{Vec2, Vec3, Vec4};

/// Normalized device coordinate bounds (reverse depth).
pub const NDC_BOUNDS: Aabb3 = Aabb3 {
    min: Vec3 { x: -1.0, y: -1.0, z: 0.0 },
    max: Vec3 { x: 1.0, y: 1.0, z: 1.0 },
};

/// Normalized screen bounds mapped to the frame buffer by
/// `FrameBuffer::screen_to_window_transform`.
pub const SCREEN_BOUNDS: Aabb2 = Aabb2 {
    min: Vec2 { x: -1.0, y: -1.0 },
    max: Vec2 { x: 1.0, y: 1.0 },
};

/// Linear reverse depth: 1 at `z = near`, 0 at `z = far`.
pub fn reverse_depth_linear(z: f32, near: f32, far: f32) -> f32 {
    debug_assert!(!almost_eq(near, far), "near must differ from far");
    (far - z) / (far - near)
}

/// Hyperbolic reverse depth numerator `A*z + B`; divide by `z` to get the
/// depth value a perspective matrix produces.
pub fn reverse_depth_hyperbolic(z: f32, near: f32, far: f32) -> f32 {
    debug_assert!(!almost_eq(near, far), "near must differ from far");
    let a = -near / (far - near);
    let b = -far * a;
    a * z + b
}

/// Orthographic projection: maps the camera box spanned by `min_`/`max_`
/// between `near` and `far` onto the canonical view volume.
pub fn make_orthographic(near: f32, far: f32, min_: Vec2, max_: Vec2) -> Transform3 {
    debug_assert!(near < far, "near plane must sit in front of the far plane");
    let camera_box = Aabb3::from_min_max(Vec3::from_vec2(min_, near), Vec3::from_vec2(max_, far));
    camera_box
        .to_transform()
        .inversed()
        .stack(&NDC_BOUNDS.to_transform())
        .reflect_z()
        .translate(Vec3::new(0.0, 0.0, 1.0))
}

/// Perspective projection for a symmetric frustum: maps camera space onto
/// the canonical view volume, putting the camera z coordinate into w.
pub fn make_perspective(near: f32, far: f32, fovy_rad: f32, aspect_ratio: f32) -> Transform3 {
    let tan_half_fov = (fovy_rad / 2.0).tan();
    assert!(tan_half_fov != 0.0, "degenerate field of view");
    assert!(aspect_ratio != 0.0, "degenerate aspect ratio");
    assert!(!almost_eq(near, far), "near must differ from far");

    let sx = tan_half_fov * aspect_ratio;
    let sy = tan_half_fov;

    let a = -near / (far - near);
    let b = -far * a;

    let mat = Mat4::from_rows(
        Vec4::new(1.0 / sx, 0.0, 0.0, 0.0), // x' = x / sx
        Vec4::new(0.0, 1.0 / sy, 0.0, 0.0), // y' = y / sy
        Vec4::new(0.0, 0.0, a, b),          // z' = A * z + B * w
        Vec4::new(0.0, 0.0, 1.0, 0.0),      // w' = z
    );
    let mat_inv = Mat4::from_rows(
        Vec4::new(sx, 0.0, 0.0, 0.0),
        Vec4::new(0.0, sy, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),          // z = w'
        Vec4::new(0.0, 0.0, 1.0 / b, -a / b),   // w = z'/B - A*w'/B
    );

    Transform3::from_parts(mat, mat_inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::float::radians;
    use crate::math::mat::Mat4;

    const EPS: f32 = 1e-4; // absolute, for entries that should cancel to 0

    fn assert_identity(m: Mat4) {
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
    fn test_perspective_inverse_is_exact() {
        let t = make_perspective(0.1, 100.0, radians(90.0), 16.0 / 9.0);
        assert_identity(*t.mat() * *t.mat_inv());
        assert_identity(*t.mat_inv() * *t.mat());
    }

    #[test]
    fn test_orthographic_inverse_is_exact() {
        let t = make_orthographic(1.0, 50.0, Vec2::new(-4.0, -3.0), Vec2::new(4.0, 3.0));
        assert_identity(*t.mat() * *t.mat_inv());
    }

    #[test]
    fn test_orthographic_reverse_depth() {
        let t = make_orthographic(1.0, 10.0, Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let near = t.apply(Vec3::new(0.0, 0.0, 1.0));
        let far = t.apply(Vec3::new(0.0, 0.0, 10.0));
        assert!(almost_eq(near.z, 1.0), "near -> 1, got {}", near.z);
        assert!(almost_eq(far.z, 0.0), "far -> 0, got {}", far.z);
    }

    #[test]
    fn test_perspective_reverse_depth() {
        let t = make_perspective(1.0, 10.0, radians(90.0), 1.0);
        // near plane center: z'/w' = 1
        let near = t.apply_vec4(Vec4::new(0.0, 0.0, 1.0, 1.0));
        assert!(almost_eq(near.z / near.w, 1.0));
        // far plane center: z'/w' = 0
        let far = t.apply_vec4(Vec4::new(0.0, 0.0, 10.0, 1.0));
        assert!(almost_eq(far.z / far.w, 0.0));
        // frustum edge at near plane maps to x = +-w
        let edge = t.apply_vec4(Vec4::new(1.0, 0.0, 1.0, 1.0));
        assert!(almost_eq(edge.x, edge.w));
    }

    #[test]
    fn test_reverse_depth_helpers() {
        assert!(almost_eq(reverse_depth_linear(1.0, 1.0, 10.0), 1.0));
        assert!(almost_eq(reverse_depth_linear(10.0, 1.0, 10.0), 0.0));
        // hyperbolic numerator divided by z matches the perspective matrix
        let z = 3.5;
        assert!(almost_eq(
            reverse_depth_hyperbolic(z, 1.0, 10.0) / z,
            {
                let t = make_perspective(1.0, 10.0, radians(90.0), 1.0);
                let p = t.apply_vec4(Vec4::new(0.0, 0.0, z, 1.0));
                p.z / p.w
            }
        ));
    }

    #[test]
    fn test_ndc_bounds_shape() {
        assert_eq!(NDC_BOUNDS.size(), Vec3::new(2.0, 2.0, 1.0));
        assert_eq!(SCREEN_BOUNDS.center(), Vec2::ZERO);
    }
}
