//! Fragment types and varying interpolation
//!
//! A `Fragment` is a vertex-shader output in homogeneous clip space; a
//! `ProjectedFragment` is the same payload after perspective division and
//! window mapping, carrying reverse depth (1 = near, 0 = far) and 1/w for
//! perspective-correct attribute interpolation.

use crate::math::{Vec2, Vec4};
use crate::types::AttrInterpolation;
use std::ops::{Add, Mul};

/// Per-vertex payload interpolated across a primitive's interior.
///
/// Anything closed under addition and f32 scaling qualifies; the blanket
/// impl covers `f32`, the vector types and user structs with those ops.
pub trait Varying: Copy + Add<Output = Self> + Mul<f32, Output = Self> {}

impl<T> Varying for T where T: Copy + Add<Output = T> + Mul<f32, Output = T> {}

/// Varying for programs that interpolate nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmptyVarying;

impl Add for EmptyVarying {
    type Output = EmptyVarying;
    fn add(self, _: EmptyVarying) -> EmptyVarying {
        EmptyVarying
    }
}

impl Mul<f32> for EmptyVarying {
    type Output = EmptyVarying;
    fn mul(self, _: f32) -> EmptyVarying {
        EmptyVarying
    }
}

/// Vertex-stage output: clip-space position plus vertex attributes.
#[derive(Debug, Clone, Copy)]
pub struct Fragment<V: Varying> {
    /// Position in homogeneous clip space
    pub pos: Vec4,
    /// Vertex attributes
    pub attrs: V,
}

/// Fragment after perspective divide and window mapping.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedFragment<V: Varying> {
    /// Window-space position
    pub pos: Vec2,
    /// Reverse depth in [0,1]: 1 = near, 0 = far
    pub depth: f32,
    /// 1/w of the clip-space position
    pub w_inv: f32,
    /// Fragment attributes
    pub attrs: V,
}

/// Linear interpolation of varyings.
pub fn lerp_varying<V: Varying>(a: V, b: V, t: f32) -> V {
    a * (1.0 - t) + b * t
}

/// Perspective-corrected interpolation of varyings: weights are scaled by
/// each endpoint's 1/w and renormalized by the interpolated 1/w.
pub fn lerp_varying_perspective<V: Varying>(
    a: V,
    b: V,
    t: f32,
    w_inv0: f32,
    w_inv1: f32,
    w_inv_t: f32,
) -> V {
    if w_inv_t == 0.0 || !w_inv_t.is_finite() {
        return lerp_varying(a, b, t);
    }
    (a * ((1.0 - t) * w_inv0) + b * (t * w_inv1)) * (1.0 / w_inv_t)
}

/// Linear interpolation of clip-space fragments (used while clipping,
/// before the perspective divide).
pub fn lerp_fragment<V: Varying>(a: &Fragment<V>, b: &Fragment<V>, t: f32) -> Fragment<V> {
    Fragment {
        pos: a.pos.lerp(b.pos, t),
        attrs: lerp_varying(a.attrs, b.attrs, t),
    }
}

/// Interpolation of projected fragments along a screen-space parameter.
///
/// Position, depth and 1/w are linear in screen space; attributes follow
/// the configured interpolation qualifier.
pub fn lerp_projected<V: Varying>(
    a: &ProjectedFragment<V>,
    b: &ProjectedFragment<V>,
    t: f32,
    mode: AttrInterpolation,
) -> ProjectedFragment<V> {
    if t == 0.0 {
        return *a;
    } else if t == 1.0 {
        return *b;
    }
    let w_inv_t = a.w_inv + (b.w_inv - a.w_inv) * t;
    let attrs = match mode {
        AttrInterpolation::Smooth => {
            lerp_varying_perspective(a.attrs, b.attrs, t, a.w_inv, b.w_inv, w_inv_t)
        }
        AttrInterpolation::NoPerspective => lerp_varying(a.attrs, b.attrs, t),
        AttrInterpolation::Flat => a.attrs,
    };
    ProjectedFragment {
        pos: a.pos.lerp(b.pos, t),
        depth: a.depth + (b.depth - a.depth) * t,
        w_inv: w_inv_t,
        attrs,
    }
}

/// Perspective divide: clip space to screen space.
///
/// The caller must have clipped away geometry with w near zero first; a
/// zero w here is a programming error.
pub fn project_fragment<V: Varying>(frag: &Fragment<V>) -> ProjectedFragment<V> {
    debug_assert!(frag.pos.w != 0.0, "perspective divide by zero w");
    let w_inv = 1.0 / frag.pos.w;
    let v = frag.pos.xyz() * w_inv;
    ProjectedFragment {
        pos: v.xy(),
        depth: v.z,
        w_inv,
        attrs: frag.attrs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{almost_eq, Vec3};

    #[test]
    fn test_lerp_varying_midpoint() {
        let v = lerp_varying(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), 0.5);
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_lerp_varying_perspective_endpoints() {
        let a = 10.0_f32;
        let b = 20.0_f32;
        let r0 = lerp_varying_perspective(a, b, 0.0, 0.5, 0.1, 0.5);
        let r1 = lerp_varying_perspective(a, b, 1.0, 0.5, 0.1, 0.1);
        assert!(almost_eq(r0, a));
        assert!(almost_eq(r1, b));
    }

    #[test]
    fn test_lerp_varying_perspective_pulls_toward_near() {
        // near endpoint has larger 1/w; midpoint is weighted toward it
        let near = 0.0_f32;
        let far = 1.0_f32;
        let w_inv_t = 0.5 * 1.0 + 0.5 * 0.1;
        let mid = lerp_varying_perspective(near, far, 0.5, 1.0, 0.1, w_inv_t);
        assert!(mid < 0.5);
    }

    #[test]
    fn test_project_fragment() {
        let frag = Fragment {
            pos: Vec4::new(2.0, -2.0, 1.0, 2.0),
            attrs: EmptyVarying,
        };
        let p = project_fragment(&frag);
        assert!(almost_eq(p.pos.x, 1.0));
        assert!(almost_eq(p.pos.y, -1.0));
        assert!(almost_eq(p.depth, 0.5));
        assert!(almost_eq(p.w_inv, 0.5));
    }

    #[test]
    fn test_lerp_projected_flat_keeps_start_attrs() {
        let a = ProjectedFragment { pos: Vec2::ZERO, depth: 1.0, w_inv: 1.0, attrs: 5.0_f32 };
        let b = ProjectedFragment { pos: Vec2::new(10.0, 0.0), depth: 0.0, w_inv: 0.1, attrs: 9.0_f32 };
        let m = lerp_projected(&a, &b, 0.25, AttrInterpolation::Flat);
        assert!(almost_eq(m.attrs, 5.0));
        assert!(almost_eq(m.pos.x, 2.5));
        assert!(almost_eq(m.depth, 0.75));
    }
}
