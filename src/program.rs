//! Shader program interface
//!
//! A `Program` is the pair of callbacks the renderer drives: `on_vertex`
//! lifts a user vertex into clip space, `on_fragment` turns an
//! interpolated fragment into whatever the frame buffer stores.

use crate::fragment::{Fragment, ProjectedFragment, Varying};

/// The shading callbacks for one draw call, polymorphic over the uniform,
/// vertex, varying and render-target types.
pub trait Program {
    /// Read-only per-draw state (camera, lights, time, ...)
    type Uniform;
    /// Opaque user vertex format
    type Vertex;
    /// Interpolated per-vertex payload
    type Varying: Varying;
    /// What `on_fragment` produces and the frame buffer stores
    type Targets;

    /// Map a vertex into homogeneous clip space.
    fn on_vertex(&self, uniform: &Self::Uniform, vertex: &Self::Vertex) -> Fragment<Self::Varying>;

    /// Shade one window-space fragment.
    fn on_fragment(
        &self,
        uniform: &Self::Uniform,
        frag: &ProjectedFragment<Self::Varying>,
    ) -> Self::Targets;
}
