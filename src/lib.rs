//! termrast: surface-agnostic software rasterization engine
//!
//! Converts points, lines and triangles in a user-defined vertex format
//! into depth-tested pixels on an abstract output surface (a terminal
//! character grid, a pixel buffer, anything implementing [`FrameBuffer`]):
//! - homogeneous clipping against the view volume before the divide
//! - integer error-term lines and incremental edge-function triangles
//! - perspective-correct, screen-linear or flat attribute interpolation
//! - reverse depth (1 = near, 0 = far) with shared-edge fill rules
//!
//! Client code supplies the two boundary capabilities: a [`Program`]
//! (vertex + fragment callbacks) and a [`FrameBuffer`]. Everything from
//! clip space to the final pixel write is owned by [`Renderer::draw`].

pub mod math;

mod clip;
mod fragment;
mod framebuffer;
mod program;
mod raster;
mod render;
mod types;

pub use clip::{
    clip_line_to_rect, clip_triangle_frustum, clip_triangle_screen, line_in_frustum,
    line_in_screen, point_in_frustum, ClipTriangle,
};
pub use fragment::{
    lerp_fragment, lerp_projected, lerp_varying, lerp_varying_perspective, project_fragment,
    EmptyVarying, Fragment, ProjectedFragment, Varying,
};
pub use framebuffer::{FrameBuffer, GridBuffer};
pub use program::Program;
pub use raster::{LinePixels, TrianglePixels};
pub use render::{RenderContext, Renderer};
pub use types::{
    AttrInterpolation, IndexedVertexBuffer, LineDrawingDirection, LineEndsInclusion,
    RendererOptions, ShapeType, TriangleFillBias, VertexBuffer, WindingOrder,
};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
