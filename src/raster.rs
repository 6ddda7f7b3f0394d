//! Line and triangle rasterization
//!
//! Both rasterizers are lazy iterators over pixel candidates: the consumer
//! pulls `ProjectedFragment`s one at a time, so a primitive never
//! materializes more than one candidate at once.
//!
//! Lines use the integer error-term algorithm over the major axis (all 8
//! octants via axis swap + direction normalization). Triangles walk the
//! clamped bounding box with three incrementally-updated edge functions
//! and interpolate through barycentric weights.

use crate::fragment::{lerp_varying, lerp_varying_perspective, ProjectedFragment, Varying};
use crate::math::{almost_eq, Aabb2, Vec2, Vec2i, Vec3};
use crate::types::{AttrInterpolation, LineEndsInclusion, TriangleFillBias};

/// Lazy pixel candidates along a line.
pub struct LinePixels<V: Varying> {
    a: ProjectedFragment<V>,
    b: ProjectedFragment<V>,
    mode: AttrInterpolation,
    // integer stepping state
    x: i32,
    y: i32,
    x_major: bool,
    major_len: i32,
    minor_len: i32,
    major_step: i32,
    minor_step: i32,
    d: i32,
    i: i32,
    i_start: i32,
    i_end: i32,
    steps: i32,
}

impl<V: Varying> LinePixels<V> {
    /// Build the stepper for a segment with pre-rounded window positions.
    pub fn new(
        a: &ProjectedFragment<V>,
        b: &ProjectedFragment<V>,
        ends: LineEndsInclusion,
        mode: AttrInterpolation,
    ) -> Self {
        let p0 = Vec2i::from_vec2(a.pos);
        let p1 = Vec2i::from_vec2(b.pos);
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let (adx, ady) = (dx.abs(), dy.abs());

        let steps = adx.max(ady);
        let x_major = adx >= ady;
        let (major_len, minor_len) = if x_major { (adx, ady) } else { (ady, adx) };
        let major_step = if x_major { dx.signum() } else { dy.signum() };
        let minor_step = if x_major { dy.signum() } else { dx.signum() };

        let i_start = match ends {
            LineEndsInclusion::IncludeStart | LineEndsInclusion::IncludeBoth => 0,
            _ => 1,
        };
        let i_end = match ends {
            LineEndsInclusion::IncludeEnd | LineEndsInclusion::IncludeBoth => steps,
            _ => steps - 1,
        };

        Self {
            a: *a,
            b: *b,
            mode,
            x: p0.x,
            y: p0.y,
            x_major,
            major_len,
            minor_len,
            major_step,
            minor_step,
            d: 2 * minor_len - major_len,
            // zero-length lines yield nothing
            i: 0,
            i_start,
            i_end: if steps == 0 { -1 } else { i_end },
            steps,
        }
    }

    fn fragment_at(&self, x: i32, y: i32, t: f32) -> ProjectedFragment<V> {
        let w_inv = self.a.w_inv + (self.b.w_inv - self.a.w_inv) * t;
        let attrs = match self.mode {
            AttrInterpolation::Smooth => lerp_varying_perspective(
                self.a.attrs,
                self.b.attrs,
                t,
                self.a.w_inv,
                self.b.w_inv,
                w_inv,
            ),
            AttrInterpolation::NoPerspective => lerp_varying(self.a.attrs, self.b.attrs, t),
            AttrInterpolation::Flat => self.a.attrs,
        };
        ProjectedFragment {
            pos: Vec2::new(x as f32, y as f32),
            depth: self.a.depth + (self.b.depth - self.a.depth) * t,
            w_inv,
            attrs,
        }
    }
}

impl<V: Varying> Iterator for LinePixels<V> {
    type Item = ProjectedFragment<V>;

    fn next(&mut self) -> Option<ProjectedFragment<V>> {
        loop {
            if self.i > self.i_end {
                return None;
            }
            let emit = self.i >= self.i_start;
            let (x, y) = (self.x, self.y);
            let t = self.i as f32 / self.steps as f32;

            // advance the stepper past the current pixel
            self.i += 1;
            if self.d > 0 {
                if self.x_major {
                    self.y += self.minor_step;
                } else {
                    self.x += self.minor_step;
                }
                self.d -= 2 * self.major_len;
            }
            self.d += 2 * self.minor_len;
            if self.x_major {
                self.x += self.major_step;
            } else {
                self.y += self.major_step;
            }

            if emit {
                return Some(self.fragment_at(x, y, t));
            }
        }
    }
}

/// Classify an edge under the top-left fill rule (window space, y down,
/// winding normalized so the signed area is positive): top edges run
/// rightward, left edges run upward.
fn is_top_left_edge(src: Vec2, dst: Vec2) -> bool {
    let e = src.vector_to(dst);
    let horizontal = almost_eq(e.y, 0.0);
    (horizontal && e.x > 0.0) || e.y < 0.0
}

/// Lazy pixel candidates inside a triangle.
pub struct TrianglePixels<V: Varying> {
    depths: Vec3,
    w_invs: Vec3,
    attrs: [V; 3],
    mode: AttrInterpolation,
    area2: f32,
    /// per-edge: boundary pixels included?
    incl: [bool; 3],
    // incremental edge function state
    w_row: Vec3,
    w: Vec3,
    dwx: Vec3,
    dwy: Vec3,
    x: i32,
    y: i32,
    x_min: i32,
    x_max: i32,
    y_max: i32,
    done: bool,
}

impl<V: Varying> TrianglePixels<V> {
    /// Build the scanner for a winding-normalized triangle (non-negative
    /// signed area) with pre-rounded window positions. The bounding box is
    /// clamped to `bounds` (the frame buffer's pixel rectangle).
    pub fn new(
        f0: &ProjectedFragment<V>,
        f1: &ProjectedFragment<V>,
        f2: &ProjectedFragment<V>,
        bounds: &Aabb2,
        bias: TriangleFillBias,
        mode: AttrInterpolation,
    ) -> Self {
        let (v0, v1, v2) = (f0.pos, f1.pos, f2.pos);
        let area2 = v0.vector_to(v1).cross(v0.vector_to(v2));
        debug_assert!(area2 >= 0.0, "triangle winding not normalized");

        let mut done = almost_eq(area2, 0.0); // degenerate: no pixels

        let min = v0.min(v1).min(v2).max(bounds.min);
        let max = v0.max(v1).max(v2).min(bounds.max);
        let x_min = min.x.floor() as i32;
        let y_min = min.y.floor() as i32;
        let x_max = max.x.ceil() as i32;
        let y_max = max.y.ceil() as i32;
        if x_min > x_max || y_min > y_max {
            done = true;
        }

        let e0 = v1.vector_to(v2);
        let e1 = v2.vector_to(v0);
        let e2 = v0.vector_to(v1);

        let incl = match bias {
            TriangleFillBias::TopLeft => [
                is_top_left_edge(v1, v2),
                is_top_left_edge(v2, v0),
                is_top_left_edge(v0, v1),
            ],
            TriangleFillBias::BottomRight => [
                !is_top_left_edge(v1, v2),
                !is_top_left_edge(v2, v0),
                !is_top_left_edge(v0, v1),
            ],
            TriangleFillBias::Neither => [false; 3],
        };

        // edge function values at the bounding box corner
        let p = Vec2::new(x_min as f32, y_min as f32);
        let w_row = Vec3::new(
            e0.cross(v1.vector_to(p)),
            e1.cross(v2.vector_to(p)),
            e2.cross(v0.vector_to(p)),
        );

        Self {
            depths: Vec3::new(f0.depth, f1.depth, f2.depth),
            w_invs: Vec3::new(f0.w_inv, f1.w_inv, f2.w_inv),
            attrs: [f0.attrs, f1.attrs, f2.attrs],
            mode,
            area2,
            incl,
            w_row,
            w: w_row,
            dwx: Vec3::new(-e0.y, -e1.y, -e2.y),
            dwy: Vec3::new(e0.x, e1.x, e2.x),
            x: x_min,
            y: y_min,
            x_min,
            x_max,
            y_max,
            done,
        }
    }

    fn covered(&self) -> bool {
        let pass = |w: f32, incl: bool| if incl { w >= 0.0 } else { w > 0.0 };
        pass(self.w.x, self.incl[0])
            && pass(self.w.y, self.incl[1])
            && pass(self.w.z, self.incl[2])
    }

    fn fragment_at(&self, x: i32, y: i32) -> ProjectedFragment<V> {
        let weights = self.w / self.area2;
        let w_inv = self.w_invs.dot(weights);
        let attrs = match self.mode {
            AttrInterpolation::Smooth => {
                // perspective-correct: scale weights by 1/w, renormalize
                if w_inv == 0.0 || !w_inv.is_finite() {
                    lerp_attrs_linear(&self.attrs, weights)
                } else {
                    let s = Vec3::new(
                        weights.x * self.w_invs.x,
                        weights.y * self.w_invs.y,
                        weights.z * self.w_invs.z,
                    ) / w_inv;
                    lerp_attrs_linear(&self.attrs, s)
                }
            }
            AttrInterpolation::NoPerspective => lerp_attrs_linear(&self.attrs, weights),
            AttrInterpolation::Flat => self.attrs[0],
        };
        ProjectedFragment {
            pos: Vec2::new(x as f32, y as f32),
            depth: self.depths.dot(weights),
            w_inv,
            attrs,
        }
    }
}

fn lerp_attrs_linear<V: Varying>(attrs: &[V; 3], weights: Vec3) -> V {
    attrs[0] * weights.x + attrs[1] * weights.y + attrs[2] * weights.z
}

impl<V: Varying> Iterator for TrianglePixels<V> {
    type Item = ProjectedFragment<V>;

    fn next(&mut self) -> Option<ProjectedFragment<V>> {
        loop {
            if self.done {
                return None;
            }
            let (x, y) = (self.x, self.y);
            let hit = self.covered();

            // advance the scan past the current pixel
            if self.x < self.x_max {
                self.x += 1;
                self.w += self.dwx;
            } else if self.y < self.y_max {
                self.x = self.x_min;
                self.y += 1;
                self.w_row += self.dwy;
                self.w = self.w_row;
            } else {
                self.done = true;
            }

            if hit {
                return Some(self.fragment_at(x, y));
            }
        }
    }
}
