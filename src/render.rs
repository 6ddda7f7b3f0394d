//! Renderer orchestration
//!
//! Drives each primitive through the pipeline:
//! vertex shade -> clip -> perspective divide -> viewport map ->
//! window map -> rasterize -> fragment shade -> depth-tested write.
//!
//! A draw call runs to completion on the calling thread and assumes
//! exclusive access to the frame buffer. Scratch buffers live in a
//! caller-owned `RenderContext` and are reused across calls; the per-pixel
//! loop allocates nothing.

use crate::clip::{
    clip_line_to_rect, clip_triangle_frustum, clip_triangle_screen, line_in_frustum,
    line_in_screen, point_in_frustum, ClipTriangle,
};
use crate::fragment::{
    lerp_fragment, lerp_projected, project_fragment, Fragment, ProjectedFragment, Varying,
};
use crate::framebuffer::FrameBuffer;
use crate::math::{Aabb2, Transform2, Vec2, Vec2i, SCREEN_BOUNDS};
use crate::program::Program;
use crate::raster::{LinePixels, TrianglePixels};
use crate::types::{
    IndexedVertexBuffer, LineDrawingDirection, RendererOptions, ShapeType, VertexBuffer,
    WindingOrder,
};
use log::debug;

/// Caller-owned scratch for the clipping stages, reused across draw calls.
#[derive(Debug, Clone)]
pub struct RenderContext<V: Varying> {
    frustum_work: Vec<ClipTriangle<V>>,
    frustum_scratch: Vec<ClipTriangle<V>>,
    screen_work: Vec<ClipTriangle<V>>,
    screen_scratch: Vec<ClipTriangle<V>>,
}

impl<V: Varying> RenderContext<V> {
    pub fn new() -> Self {
        Self {
            frustum_work: Vec::new(),
            frustum_scratch: Vec::new(),
            screen_work: Vec::new(),
            screen_scratch: Vec::new(),
        }
    }
}

impl<V: Varying> Default for RenderContext<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// The rendering pipeline front end.
pub struct Renderer {
    screen_to_viewport: Transform2,
    requires_screen_clipping: bool,
}

impl Renderer {
    /// Renderer covering the whole screen.
    pub fn new() -> Self {
        Self {
            screen_to_viewport: Transform2::new(),
            requires_screen_clipping: false,
        }
    }

    /// Renderer mapping the screen onto `viewport` (in screen units).
    /// When the viewport leaves the screen bounds, projected geometry is
    /// clipped a second time in screen space.
    pub fn with_viewport(viewport: Aabb2) -> Self {
        let size = viewport.size();
        assert!(size.x != 0.0 && size.y != 0.0, "viewport must have area");

        let rel = Vec2::new(
            size.x / SCREEN_BOUNDS.size().x,
            size.y / SCREEN_BOUNDS.size().y,
        );
        let offset = viewport.min
            - Vec2::new(SCREEN_BOUNDS.min.x * rel.x, SCREEN_BOUNDS.min.y * rel.y);
        Self {
            screen_to_viewport: Transform2::new().scale(rel).translate(offset),
            requires_screen_clipping: !SCREEN_BOUNDS.contains_box(&viewport),
        }
    }

    /// Draw a flat vertex buffer.
    pub fn draw<P, F>(
        &self,
        program: &P,
        uniform: &P::Uniform,
        buffer: &VertexBuffer<P::Vertex>,
        options: &RendererOptions,
        ctx: &mut RenderContext<P::Varying>,
        framebuffer: &mut F,
    ) where
        P: Program,
        F: FrameBuffer<Targets = P::Targets>,
    {
        self.draw_range(
            program,
            uniform,
            buffer.shape_type,
            buffer.vertices.len(),
            |i| &buffer.vertices[i],
            options,
            ctx,
            framebuffer,
        );
    }

    /// Draw an indexed vertex buffer. Indices must be inside the vertex
    /// array.
    pub fn draw_indexed<P, F>(
        &self,
        program: &P,
        uniform: &P::Uniform,
        buffer: &IndexedVertexBuffer<P::Vertex>,
        options: &RendererOptions,
        ctx: &mut RenderContext<P::Varying>,
        framebuffer: &mut F,
    ) where
        P: Program,
        F: FrameBuffer<Targets = P::Targets>,
    {
        self.draw_range(
            program,
            uniform,
            buffer.shape_type,
            buffer.indices.len(),
            |i| {
                let idx = buffer.indices[i];
                assert!(idx < buffer.vertices.len(), "vertex index out of bounds");
                &buffer.vertices[idx]
            },
            options,
            ctx,
            framebuffer,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_range<'a, P, F>(
        &self,
        program: &P,
        uniform: &P::Uniform,
        shape_type: ShapeType,
        len: usize,
        vertex: impl Fn(usize) -> &'a P::Vertex,
        options: &RendererOptions,
        ctx: &mut RenderContext<P::Varying>,
        framebuffer: &mut F,
    ) where
        P: Program,
        P::Vertex: 'a,
        F: FrameBuffer<Targets = P::Targets>,
    {
        let screen_to_window = framebuffer.screen_to_window_transform();
        let a = screen_to_window.apply(SCREEN_BOUNDS.min);
        let b = screen_to_window.apply(SCREEN_BOUNDS.max);
        let window_bounds = Aabb2::from_min_max(a.min(b), a.max(b));

        debug!("draw: {:?} over {} vertices", shape_type, len);

        let mut pass = DrawPass {
            program,
            uniform,
            options: *options,
            screen_to_viewport: self.screen_to_viewport,
            requires_screen_clipping: self.requires_screen_clipping,
            screen_to_window,
            window_bounds,
            framebuffer,
        };
        let shade = |i: usize| program.on_vertex(uniform, vertex(i));

        match shape_type {
            ShapeType::Points => {
                for i in 0..len {
                    pass.point(shade(i));
                }
            }
            ShapeType::Lines => {
                for i in 0..len / 2 {
                    pass.line(shade(2 * i), shade(2 * i + 1));
                }
            }
            ShapeType::LineStrip => {
                for i in 1..len {
                    pass.line(shade(i - 1), shade(i));
                }
            }
            ShapeType::LineLoop => {
                for i in 1..len {
                    pass.line(shade(i - 1), shade(i));
                }
                if len >= 2 {
                    pass.line(shade(len - 1), shade(0));
                }
            }
            ShapeType::Triangles => {
                for i in 0..len / 3 {
                    pass.triangle(ctx, [shade(3 * i), shade(3 * i + 1), shade(3 * i + 2)]);
                }
            }
            ShapeType::TriangleStrip => {
                for i in 0..len.saturating_sub(2) {
                    // flip odd triangles to keep a consistent winding
                    let frags = if i % 2 == 0 {
                        [shade(i), shade(i + 1), shade(i + 2)]
                    } else {
                        [shade(i + 1), shade(i), shade(i + 2)]
                    };
                    pass.triangle(ctx, frags);
                }
            }
            ShapeType::TriangleFan => {
                for i in 1..len.saturating_sub(1) {
                    pass.triangle(ctx, [shade(0), shade(i), shade(i + 1)]);
                }
            }
            ShapeType::Quads => {
                for i in 0..len / 4 {
                    pass.quad(
                        ctx,
                        [
                            shade(4 * i),
                            shade(4 * i + 1),
                            shade(4 * i + 2),
                            shade(4 * i + 3),
                        ],
                    );
                }
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Round a window position onto the pixel grid.
fn round_pos(p: Vec2) -> Vec2 {
    (p + Vec2::new(0.5, 0.5)).floor()
}

/// Parameter of `q` along the segment `p0..p1`, measured on the major axis.
fn param_along(p0: Vec2, p1: Vec2, q: Vec2) -> f32 {
    let d = p0.vector_to(p1);
    if d.x.abs() >= d.y.abs() {
        if d.x == 0.0 {
            0.0
        } else {
            (q.x - p0.x) / d.x
        }
    } else {
        (q.y - p0.y) / d.y
    }
}

/// Everything fixed for the duration of one draw call.
struct DrawPass<'a, P, F>
where
    P: Program,
    F: FrameBuffer<Targets = P::Targets>,
{
    program: &'a P,
    uniform: &'a P::Uniform,
    options: RendererOptions,
    screen_to_viewport: Transform2,
    requires_screen_clipping: bool,
    screen_to_window: Transform2,
    window_bounds: Aabb2,
    framebuffer: &'a mut F,
}

impl<P, F> DrawPass<'_, P, F>
where
    P: Program,
    F: FrameBuffer<Targets = P::Targets>,
{
    fn to_viewport(&self, f: ProjectedFragment<P::Varying>) -> ProjectedFragment<P::Varying> {
        ProjectedFragment {
            pos: self.screen_to_viewport.apply(f.pos),
            ..f
        }
    }

    fn to_window(&self, f: ProjectedFragment<P::Varying>) -> ProjectedFragment<P::Varying> {
        ProjectedFragment {
            pos: round_pos(self.screen_to_window.apply(f.pos)),
            ..f
        }
    }

    /// Fragment shade, depth test, write.
    fn shade_and_plot(&mut self, frag: ProjectedFragment<P::Varying>) {
        let targets = self.program.on_fragment(self.uniform, &frag);
        let pos = Vec2i::from_vec2(frag.pos);
        if self.framebuffer.test_and_set_depth(pos, frag.depth) {
            self.framebuffer.plot(pos, targets);
        }
    }

    fn point(&mut self, frag: Fragment<P::Varying>) {
        // cull outside the view volume
        if !point_in_frustum(frag.pos) {
            return;
        }
        let pfrag = self.to_viewport(project_fragment(&frag));
        if self.requires_screen_clipping && !SCREEN_BOUNDS.contains(pfrag.pos) {
            return;
        }
        let wfrag = self.to_window(pfrag);
        self.shade_and_plot(wfrag);
    }

    fn line(&mut self, frag0: Fragment<P::Varying>, frag1: Fragment<P::Varying>) {
        let mode = self.options.attr_interpolation;

        // clip to the view volume
        let Some((t0, t1)) = line_in_frustum(frag0.pos, frag1.pos) else {
            return;
        };
        let tfrag0 = lerp_fragment(&frag0, &frag1, t0);
        let tfrag1 = lerp_fragment(&frag0, &frag1, t1);

        // perspective divide, then viewport
        let mut vfrag0 = self.to_viewport(project_fragment(&tfrag0));
        let mut vfrag1 = self.to_viewport(project_fragment(&tfrag1));

        // clip to the screen when the viewport exceeds it
        if self.requires_screen_clipping {
            let Some((s0, s1)) = line_in_screen(&SCREEN_BOUNDS, vfrag0.pos, vfrag1.pos) else {
                return;
            };
            let clipped0 = lerp_projected(&vfrag0, &vfrag1, s0, mode);
            let clipped1 = lerp_projected(&vfrag0, &vfrag1, s1, mode);
            vfrag0 = clipped0;
            vfrag1 = clipped1;
        }

        // window space; guard against transforms mapping beyond the buffer
        let mut wfrag0 = ProjectedFragment {
            pos: self.screen_to_window.apply(vfrag0.pos),
            ..vfrag0
        };
        let mut wfrag1 = ProjectedFragment {
            pos: self.screen_to_window.apply(vfrag1.pos),
            ..vfrag1
        };
        let Some((c0, c1)) = clip_line_to_rect(&self.window_bounds, wfrag0.pos, wfrag1.pos)
        else {
            return;
        };
        if c0 != wfrag0.pos || c1 != wfrag1.pos {
            let u0 = param_along(wfrag0.pos, wfrag1.pos, c0);
            let u1 = param_along(wfrag0.pos, wfrag1.pos, c1);
            let clipped0 = lerp_projected(&wfrag0, &wfrag1, u0, mode);
            let clipped1 = lerp_projected(&wfrag0, &wfrag1, u1, mode);
            wfrag0 = clipped0;
            wfrag1 = clipped1;
        }
        wfrag0.pos = round_pos(wfrag0.pos);
        wfrag1.pos = round_pos(wfrag1.pos);

        // normalize the stepping direction
        let delta = wfrag0.pos.vector_to(wfrag1.pos);
        let keep = match self.options.line_drawing_direction {
            LineDrawingDirection::Upwards => delta.y > 0.0,
            LineDrawingDirection::Downwards => delta.y < 0.0,
            LineDrawingDirection::Leftwards => delta.x < 0.0,
            LineDrawingDirection::Rightwards => delta.x > 0.0,
        };
        if !keep {
            std::mem::swap(&mut wfrag0, &mut wfrag1);
        }

        let pixels = LinePixels::new(&wfrag0, &wfrag1, self.options.line_ends_inclusion, mode);
        for frag in pixels {
            self.shade_and_plot(frag);
        }
    }

    fn triangle(&mut self, ctx: &mut RenderContext<P::Varying>, frags: [Fragment<P::Varying>; 3]) {
        let mode = self.options.attr_interpolation;

        // clip to the view volume; one triangle may come back as several
        ctx.frustum_work.clear();
        ctx.frustum_work.push(ClipTriangle {
            pos: [frags[0].pos, frags[1].pos, frags[2].pos],
            attrs: [frags[0].attrs, frags[1].attrs, frags[2].attrs],
        });
        if !clip_triangle_frustum(&mut ctx.frustum_work, &mut ctx.frustum_scratch) {
            return;
        }

        for idx in 0..ctx.frustum_work.len() {
            let tri = ctx.frustum_work[idx];

            // perspective divide, then viewport
            let project = |i: usize| {
                self.to_viewport(project_fragment(&Fragment {
                    pos: tri.pos[i],
                    attrs: tri.attrs[i],
                }))
            };
            let vfrag0 = project(0);
            let vfrag1 = project(1);
            let vfrag2 = project(2);

            if !self.requires_screen_clipping {
                let w0 = self.to_window(vfrag0);
                let w1 = self.to_window(vfrag1);
                let w2 = self.to_window(vfrag2);
                self.raster_triangle(w0, w1, w2);
                continue;
            }

            // clip to the screen: positions packed as (x, y, depth, 1/w)
            let pack = |f: &ProjectedFragment<P::Varying>| {
                crate::math::Vec4::from_vec2(f.pos, f.depth, f.w_inv)
            };
            ctx.screen_work.clear();
            ctx.screen_work.push(ClipTriangle {
                pos: [pack(&vfrag0), pack(&vfrag1), pack(&vfrag2)],
                attrs: [vfrag0.attrs, vfrag1.attrs, vfrag2.attrs],
            });
            if !clip_triangle_screen(
                &SCREEN_BOUNDS,
                &mut ctx.screen_work,
                &mut ctx.screen_scratch,
                mode,
            ) {
                continue;
            }
            for inner in &ctx.screen_work {
                let unpack = |i: usize| ProjectedFragment {
                    pos: inner.pos[i].xy(),
                    depth: inner.pos[i].z,
                    w_inv: inner.pos[i].w,
                    attrs: inner.attrs[i],
                };
                let w0 = self.to_window(unpack(0));
                let w1 = self.to_window(unpack(1));
                let w2 = self.to_window(unpack(2));
                self.raster_triangle(w0, w1, w2);
            }
        }
    }

    fn raster_triangle(
        &mut self,
        w0: ProjectedFragment<P::Varying>,
        w1: ProjectedFragment<P::Varying>,
        w2: ProjectedFragment<P::Varying>,
    ) {
        // window-space signed area; positive = clockwise on screen (y down)
        let area2 = w0.pos.vector_to(w1.pos).cross(w0.pos.vector_to(w2.pos));
        let culled = match self.options.winding_order {
            WindingOrder::Clockwise => area2 < 0.0,
            WindingOrder::CounterClockwise => area2 > 0.0,
            WindingOrder::Neither => false,
        };
        if culled {
            return;
        }

        // normalize the winding for the rasterizer
        let (w1, w2) = if area2 < 0.0 { (w2, w1) } else { (w1, w2) };

        let pixels = TrianglePixels::new(
            &w0,
            &w1,
            &w2,
            &self.window_bounds,
            self.options.triangle_fill_bias,
            self.options.attr_interpolation,
        );
        for frag in pixels {
            self.shade_and_plot(frag);
        }
    }

    fn quad(&mut self, ctx: &mut RenderContext<P::Varying>, frags: [Fragment<P::Varying>; 4]) {
        let [f0, f1, f2, f3] = frags;

        // split along the shorter diagonal (in clip space)
        let v0 = f0.pos.xyz();
        let v1 = f1.pos.xyz();
        let v2 = f2.pos.xyz();
        let v3 = f3.pos.xyz();
        let d02 = v0.vector_to(v2);
        let d13 = v1.vector_to(v3);

        if d02.dot(d02) < d13.dot(d13) {
            self.triangle_pair(ctx, [f0, f1, f2], [f2, f3, f0]);
        } else {
            self.triangle_pair(ctx, [f0, f1, f3], [f1, f2, f3]);
        }
    }

    fn triangle_pair(
        &mut self,
        ctx: &mut RenderContext<P::Varying>,
        a: [Fragment<P::Varying>; 3],
        b: [Fragment<P::Varying>; 3],
    ) {
        self.triangle(ctx, a);
        self.triangle(ctx, b);
    }
}
