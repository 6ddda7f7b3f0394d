//! Renderer configuration and vertex buffers
//!
//! Quads vertex order (0-1 top, 3-2 bottom):
//!  0 --- 1
//!  |     |
//!  3 --- 2

use serde::{Deserialize, Serialize};

/// Shape primitives a vertex buffer decomposes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
}

/// Triangle winding order used for back-face culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindingOrder {
    Clockwise,
    CounterClockwise,
    #[default]
    Neither,
}

/// Which shared triangle edge owns its boundary pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriangleFillBias {
    #[default]
    TopLeft,
    BottomRight,
    Neither,
}

/// Preferred stepping direction for line drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineDrawingDirection {
    Upwards,
    #[default]
    Downwards,
    Leftwards,
    Rightwards,
}

/// Which endpoints of a line are plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEndsInclusion {
    ExcludeBoth,
    IncludeStart,
    IncludeEnd,
    #[default]
    IncludeBoth,
}

/// Attribute interpolation qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttrInterpolation {
    /// Perspective-correct
    #[default]
    Smooth,
    /// Linear in screen space
    NoPerspective,
    /// Constant over the primitive (first vertex provokes)
    Flat,
}

/// Renderer options, fixed per draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RendererOptions {
    pub winding_order: WindingOrder,
    pub triangle_fill_bias: TriangleFillBias,
    pub line_drawing_direction: LineDrawingDirection,
    pub line_ends_inclusion: LineEndsInclusion,
    pub attr_interpolation: AttrInterpolation,
}

/// Flat array of vertices plus the shape they form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VertexBuffer<V> {
    pub shape_type: ShapeType,
    pub vertices: Vec<V>,
}

/// Indexed array of vertices plus the shape the indices form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexedVertexBuffer<V> {
    pub shape_type: ShapeType,
    pub vertices: Vec<V>,
    pub indices: Vec<usize>,
}

impl Default for ShapeType {
    fn default() -> Self {
        ShapeType::Points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RendererOptions::default();
        assert_eq!(opts.winding_order, WindingOrder::Neither);
        assert_eq!(opts.triangle_fill_bias, TriangleFillBias::TopLeft);
        assert_eq!(opts.line_ends_inclusion, LineEndsInclusion::IncludeBoth);
        assert_eq!(opts.attr_interpolation, AttrInterpolation::Smooth);
    }

    #[test]
    fn test_options_from_ron() {
        let opts: RendererOptions = ron::from_str(
            "(winding_order: Clockwise, \
              triangle_fill_bias: Neither, \
              line_drawing_direction: Rightwards, \
              line_ends_inclusion: ExcludeBoth, \
              attr_interpolation: Flat)",
        )
        .unwrap();
        assert_eq!(opts.winding_order, WindingOrder::Clockwise);
        assert_eq!(opts.triangle_fill_bias, TriangleFillBias::Neither);
        assert_eq!(opts.attr_interpolation, AttrInterpolation::Flat);
    }

    #[test]
    fn test_vertex_buffer_from_ron() {
        let buf: VertexBuffer<[f32; 2]> = ron::from_str(
            "(shape_type: LineStrip, vertices: [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])",
        )
        .unwrap();
        assert_eq!(buf.shape_type, ShapeType::LineStrip);
        assert_eq!(buf.vertices.len(), 3);
    }
}
