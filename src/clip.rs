//! Clipping: 2D segment vs. box, and homogeneous clipping against the
//! view volume
//!
//! Lines clip to a parametric interval (Liang-Barsky); triangles clip
//! plane-by-plane over a working set, splitting into one or two triangles
//! per plane crossing. Everything that would divide by a near-zero w later
//! in the pipeline is discarded here.

use crate::fragment::{lerp_varying, lerp_varying_perspective, Varying};
use crate::math::{almost_eq, Aabb2, Vec2, Vec4};
use crate::types::AttrInterpolation;

// --- 2D segment vs. box (outcode algorithm) ---

const INSIDE: u8 = 0b0000;
const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BOTTOM: u8 = 0b0100;
const TOP: u8 = 0b1000;

fn outcode(bounds: &Aabb2, p: Vec2) -> u8 {
    let mut code = INSIDE;
    if p.x < bounds.min.x {
        code |= LEFT;
    } else if p.x > bounds.max.x {
        code |= RIGHT;
    }
    if p.y < bounds.min.y {
        code |= BOTTOM;
    } else if p.y > bounds.max.y {
        code |= TOP;
    }
    code
}

/// Clip a segment to a box, returning the clamped endpoints, or `None`
/// when the segment lies entirely outside.
pub fn clip_line_to_rect(bounds: &Aabb2, p0: Vec2, p1: Vec2) -> Option<(Vec2, Vec2)> {
    let (mut p0, mut p1) = (p0, p1);
    let mut code0 = outcode(bounds, p0);
    let mut code1 = outcode(bounds, p1);

    loop {
        if code0 | code1 == INSIDE {
            // both endpoints inside
            return Some((p0, p1));
        }
        if code0 & code1 != INSIDE {
            // both endpoints outside the same boundary
            return None;
        }
        // pick the endpoint with the more complex outside code and pull it
        // onto the boundary it violates
        let out = code0.max(code1);
        let delta = p1 - p0;
        let p = if out & TOP != 0 {
            Vec2::new(p0.x + delta.x * (bounds.max.y - p0.y) / delta.y, bounds.max.y)
        } else if out & BOTTOM != 0 {
            Vec2::new(p0.x + delta.x * (bounds.min.y - p0.y) / delta.y, bounds.min.y)
        } else if out & RIGHT != 0 {
            Vec2::new(bounds.max.x, p0.y + delta.y * (bounds.max.x - p0.x) / delta.x)
        } else {
            Vec2::new(bounds.min.x, p0.y + delta.y * (bounds.min.x - p0.x) / delta.x)
        };
        if out == code0 {
            p0 = p;
            code0 = outcode(bounds, p0);
        } else {
            p1 = p;
            code1 = outcode(bounds, p1);
        }
    }
}

// --- view volume tests (clip space, before perspective divide) ---
//
// The view volume is -w <= x <= w, -w <= y <= w, 0 <= z <= w, matching the
// reverse-depth canonical box after division.

#[derive(Debug, Clone, Copy)]
enum FrustumPlane {
    Left,
    Right,
    Bottom,
    Top,
    Near,
    Far,
}

const FRUSTUM_PLANES: [FrustumPlane; 6] = [
    FrustumPlane::Left,
    FrustumPlane::Right,
    FrustumPlane::Bottom,
    FrustumPlane::Top,
    FrustumPlane::Near,
    FrustumPlane::Far,
];

fn frustum_inside(plane: FrustumPlane, p: Vec4) -> bool {
    match plane {
        FrustumPlane::Left => -p.w <= p.x,
        FrustumPlane::Right => p.x <= p.w,
        FrustumPlane::Bottom => -p.w <= p.y,
        FrustumPlane::Top => p.y <= p.w,
        FrustumPlane::Near => 0.0 <= p.z,
        FrustumPlane::Far => p.z <= p.w,
    }
}

/// Boundary distance `q` at the segment tail and its rate of decrease `p`
/// along the segment, so that inside means `q - t*p >= 0`.
fn frustum_qp(plane: FrustumPlane, p0: Vec4, delta: Vec4) -> (f32, f32) {
    match plane {
        FrustumPlane::Left => (p0.x + p0.w, -(delta.x + delta.w)),
        FrustumPlane::Right => (p0.w - p0.x, delta.x - delta.w),
        FrustumPlane::Bottom => (p0.y + p0.w, -(delta.y + delta.w)),
        FrustumPlane::Top => (p0.w - p0.y, delta.y - delta.w),
        FrustumPlane::Near => (p0.z, -delta.z),
        FrustumPlane::Far => (p0.w - p0.z, delta.z - delta.w),
    }
}

/// Shrink the parametric interval `[t0,t1]` by one boundary; false when
/// the interval empties.
fn shrink_interval(q: f32, p: f32, t0: &mut f32, t1: &mut f32) -> bool {
    if almost_eq(p, 0.0) {
        // parallel to the boundary: keep iff on the inside
        return q >= 0.0;
    }
    let t = q / p;
    if p < 0.0 {
        // proceeds from outside to inside
        if *t1 < t {
            return false;
        }
        *t0 = t0.max(t);
    } else {
        // proceeds from inside to outside
        if t < *t0 {
            return false;
        }
        *t1 = t1.min(t);
    }
    true
}

/// Cull test for a single clip-space point.
pub fn point_in_frustum(p: Vec4) -> bool {
    if p.is_zero() {
        // degenerate point
        return false;
    }
    FRUSTUM_PLANES.iter().all(|&plane| frustum_inside(plane, p))
}

/// Clip a clip-space segment against the view volume, returning the
/// surviving parametric interval.
pub fn line_in_frustum(p0: Vec4, p1: Vec4) -> Option<(f32, f32)> {
    if p0.is_zero() || p1.is_zero() {
        // degenerate line
        return None;
    }
    let delta = p1 - p0;
    let mut t0 = 0.0;
    let mut t1 = 1.0;
    for &plane in &FRUSTUM_PLANES {
        let (q, p) = frustum_qp(plane, p0, delta);
        if !shrink_interval(q, p, &mut t0, &mut t1) {
            return None;
        }
    }
    Some((t0, t1))
}

// --- 2D screen bounds tests (after perspective divide) ---

#[derive(Debug, Clone, Copy)]
enum RectPlane {
    Left,
    Right,
    Bottom,
    Top,
}

const RECT_PLANES: [RectPlane; 4] = [
    RectPlane::Left,
    RectPlane::Right,
    RectPlane::Bottom,
    RectPlane::Top,
];

fn rect_inside(plane: RectPlane, bounds: &Aabb2, p: Vec2) -> bool {
    match plane {
        RectPlane::Left => bounds.min.x <= p.x,
        RectPlane::Right => p.x <= bounds.max.x,
        RectPlane::Bottom => bounds.min.y <= p.y,
        RectPlane::Top => p.y <= bounds.max.y,
    }
}

fn rect_qp(plane: RectPlane, bounds: &Aabb2, p0: Vec2, delta: Vec2) -> (f32, f32) {
    match plane {
        RectPlane::Left => (p0.x - bounds.min.x, -delta.x),
        RectPlane::Right => (bounds.max.x - p0.x, delta.x),
        RectPlane::Bottom => (p0.y - bounds.min.y, -delta.y),
        RectPlane::Top => (bounds.max.y - p0.y, delta.y),
    }
}

/// Clip a screen-space segment against a box, returning the surviving
/// parametric interval.
pub fn line_in_screen(bounds: &Aabb2, p0: Vec2, p1: Vec2) -> Option<(f32, f32)> {
    let delta = p1 - p0;
    let mut t0 = 0.0;
    let mut t1 = 1.0;
    for &plane in &RECT_PLANES {
        let (q, p) = rect_qp(plane, bounds, p0, delta);
        if !shrink_interval(q, p, &mut t0, &mut t1) {
            return None;
        }
    }
    Some((t0, t1))
}

// --- triangle clipping ---

/// Triangle entry in a clip working set: three positions plus the matching
/// varying triplet. Positions are clip-space `(x,y,z,w)` for the frustum
/// stage and packed `(x, y, depth, 1/w)` for the screen stage.
#[derive(Debug, Clone, Copy)]
pub struct ClipTriangle<V: Varying> {
    pub pos: [Vec4; 3],
    pub attrs: [V; 3],
}

/// Cyclic rotation placing the single inside vertex first.
fn order_one_inside(inside: [bool; 3]) -> [usize; 3] {
    if inside[0] {
        [0, 1, 2]
    } else if inside[1] {
        [1, 2, 0]
    } else {
        [2, 0, 1]
    }
}

/// Cyclic rotation placing the two inside vertices first.
fn order_two_inside(inside: [bool; 3]) -> [usize; 3] {
    if inside[0] && inside[1] {
        [0, 1, 2]
    } else if inside[2] && inside[0] {
        [2, 0, 1]
    } else {
        [1, 2, 0]
    }
}

/// Intersection parameter for an edge from an inside vertex `a` to an
/// outside vertex `b`.
fn edge_t(q: f32, p: f32) -> f32 {
    debug_assert!(p > 0.0, "edge must leave the half-space");
    (q / p).clamp(0.0, 1.0)
}

fn clip_lerp_attrs<V: Varying>(
    a: V,
    b: V,
    t: f32,
    w_inv0: f32,
    w_inv1: f32,
    mode: AttrInterpolation,
) -> V {
    match mode {
        AttrInterpolation::Smooth => {
            let w_inv_t = w_inv0 + (w_inv1 - w_inv0) * t;
            lerp_varying_perspective(a, b, t, w_inv0, w_inv1, w_inv_t)
        }
        AttrInterpolation::NoPerspective => lerp_varying(a, b, t),
        AttrInterpolation::Flat => a,
    }
}

/// Clip the triangles in `work` against the view volume, in place.
/// `scratch` is ping-pong storage reused across calls. Returns false when
/// nothing survives. One input triangle yields between 0 and ~8 outputs.
pub fn clip_triangle_frustum<V: Varying>(
    work: &mut Vec<ClipTriangle<V>>,
    scratch: &mut Vec<ClipTriangle<V>>,
) -> bool {
    debug_assert!(!work.is_empty());
    if work[0].pos.iter().any(|p| p.is_zero()) {
        // degenerate triangle
        work.clear();
        return false;
    }

    for &plane in &FRUSTUM_PLANES {
        scratch.clear();
        for tri in work.iter() {
            let inside = [
                frustum_inside(plane, tri.pos[0]),
                frustum_inside(plane, tri.pos[1]),
                frustum_inside(plane, tri.pos[2]),
            ];
            match inside.iter().filter(|&&b| b).count() {
                0 => {}
                3 => scratch.push(*tri),
                1 => {
                    let [i0, i1, i2] = order_one_inside(inside);
                    let (a, b, c) = (tri.pos[i0], tri.pos[i1], tri.pos[i2]);
                    let (aa, ab, ac) = (tri.attrs[i0], tri.attrs[i1], tri.attrs[i2]);

                    let (q, p) = frustum_qp(plane, a, b - a);
                    let t01 = edge_t(q, p);
                    let (q, p) = frustum_qp(plane, a, c - a);
                    let t02 = edge_t(q, p);

                    scratch.push(ClipTriangle {
                        pos: [a, a.lerp(b, t01), a.lerp(c, t02)],
                        attrs: [aa, lerp_varying(aa, ab, t01), lerp_varying(aa, ac, t02)],
                    });
                }
                2 => {
                    let [i0, i1, i2] = order_two_inside(inside);
                    let (a, b, c) = (tri.pos[i0], tri.pos[i1], tri.pos[i2]);
                    let (aa, ab, ac) = (tri.attrs[i0], tri.attrs[i1], tri.attrs[i2]);

                    let (q, p) = frustum_qp(plane, a, c - a);
                    let t02 = edge_t(q, p);
                    let (q, p) = frustum_qp(plane, b, c - b);
                    let t12 = edge_t(q, p);

                    let p02 = a.lerp(c, t02);
                    let p12 = b.lerp(c, t12);
                    let a02 = lerp_varying(aa, ac, t02);
                    let a12 = lerp_varying(ab, ac, t12);

                    // split the resulting quad along the b..p02 diagonal
                    scratch.push(ClipTriangle { pos: [a, b, p02], attrs: [aa, ab, a02] });
                    scratch.push(ClipTriangle { pos: [b, p12, p02], attrs: [ab, a12, a02] });
                }
                _ => unreachable!(),
            }
        }
        std::mem::swap(work, scratch);
        if work.is_empty() {
            return false;
        }
    }
    true
}

/// Clip projected triangles against a screen box, in place. Positions are
/// packed `(x, y, depth, 1/w)`; xy, depth and 1/w interpolate linearly in
/// screen space while attributes follow the interpolation qualifier.
pub fn clip_triangle_screen<V: Varying>(
    bounds: &Aabb2,
    work: &mut Vec<ClipTriangle<V>>,
    scratch: &mut Vec<ClipTriangle<V>>,
    mode: AttrInterpolation,
) -> bool {
    debug_assert!(!work.is_empty());

    for &plane in &RECT_PLANES {
        scratch.clear();
        for tri in work.iter() {
            let inside = [
                rect_inside(plane, bounds, tri.pos[0].xy()),
                rect_inside(plane, bounds, tri.pos[1].xy()),
                rect_inside(plane, bounds, tri.pos[2].xy()),
            ];
            let lerp_vertex = |a: Vec4, b: Vec4, aa: V, ab: V, t: f32| -> (Vec4, V) {
                (
                    a.lerp(b, t),
                    clip_lerp_attrs(aa, ab, t, a.w, b.w, mode),
                )
            };
            match inside.iter().filter(|&&b| b).count() {
                0 => {}
                3 => scratch.push(*tri),
                1 => {
                    let [i0, i1, i2] = order_one_inside(inside);
                    let (a, b, c) = (tri.pos[i0], tri.pos[i1], tri.pos[i2]);
                    let (aa, ab, ac) = (tri.attrs[i0], tri.attrs[i1], tri.attrs[i2]);

                    let (q, p) = rect_qp(plane, bounds, a.xy(), (b - a).xy());
                    let t01 = edge_t(q, p);
                    let (q, p) = rect_qp(plane, bounds, a.xy(), (c - a).xy());
                    let t02 = edge_t(q, p);

                    let (p01, a01) = lerp_vertex(a, b, aa, ab, t01);
                    let (p02, a02) = lerp_vertex(a, c, aa, ac, t02);
                    scratch.push(ClipTriangle { pos: [a, p01, p02], attrs: [aa, a01, a02] });
                }
                2 => {
                    let [i0, i1, i2] = order_two_inside(inside);
                    let (a, b, c) = (tri.pos[i0], tri.pos[i1], tri.pos[i2]);
                    let (aa, ab, ac) = (tri.attrs[i0], tri.attrs[i1], tri.attrs[i2]);

                    let (q, p) = rect_qp(plane, bounds, a.xy(), (c - a).xy());
                    let t02 = edge_t(q, p);
                    let (q, p) = rect_qp(plane, bounds, b.xy(), (c - b).xy());
                    let t12 = edge_t(q, p);

                    let (p02, a02) = lerp_vertex(a, c, aa, ac, t02);
                    let (p12, a12) = lerp_vertex(b, c, ab, ac, t12);

                    scratch.push(ClipTriangle { pos: [a, b, p02], attrs: [aa, ab, a02] });
                    scratch.push(ClipTriangle { pos: [b, p12, p02], attrs: [ab, a12, a02] });
                }
                _ => unreachable!(),
            }
        }
        std::mem::swap(work, scratch);
        if work.is_empty() {
            return false;
        }
    }
    true
}
