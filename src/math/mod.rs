//! Math kernel: vectors, matrices, invertible transforms, projections
//!
//! Everything the pipeline needs to express its math contracts and nothing
//! more. All scalar work is `f32`; comparisons go through the ULP-scaled
//! helpers in [`float`].

pub mod aabb;
pub mod float;
pub mod mat;
pub mod project;
pub mod transform;
pub mod vec;

pub use aabb::{Aabb2, Aabb3};
pub use float::{almost_eq, almost_eq_ulps, almost_lt, almost_lt_ulps, degrees, radians};
pub use mat::{Mat3, Mat4};
pub use project::{
    make_orthographic, make_perspective, reverse_depth_hyperbolic, reverse_depth_linear,
    NDC_BOUNDS, SCREEN_BOUNDS,
};
pub use transform::{Transform2, Transform3};
pub use vec::{Vec2, Vec2i, Vec3, Vec4};
