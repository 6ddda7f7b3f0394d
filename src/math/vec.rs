//! Fixed-size vector types for the rendering pipeline
//!
//! Concrete 2/3/4-component value types with named fields. Multi-component
//! ("swizzle") access is spelled out as explicit methods returning new
//! values (`xy()`, `xyz()`) or writing fields (`set_xy()`); there is no
//! aliased storage.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 2D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 4D (homogeneous) vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Signed magnitude of the parallelogram spanned by the two vectors.
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - other.x * self.y
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalized copy. Zero-length input is a precondition violation.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        debug_assert!(len != 0.0, "normalizing zero-length vector");
        self / len
    }

    /// Vector with its tail at `self` and head at `other`.
    pub fn vector_to(self, other: Vec2) -> Vec2 {
        other - self
    }

    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        self * (1.0 - t) + other * t
    }

    pub fn min(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.max(other.x), self.y.max(other.y))
    }

    pub fn abs(self) -> Vec2 {
        Vec2::new(self.x.abs(), self.y.abs())
    }

    pub fn floor(self) -> Vec2 {
        Vec2::new(self.x.floor(), self.y.floor())
    }

    /// Projection of `self` onto `other`.
    pub fn project_onto(self, other: Vec2, is_normalized: bool) -> Vec2 {
        let unit = if is_normalized { other } else { other.normalized() };
        unit * self.dot(unit)
    }

    /// Reflection across the plane with the given normal.
    pub fn reflect(self, normal: Vec2, is_normalized: bool) -> Vec2 {
        self - self.project_onto(normal, is_normalized) * 2.0
    }
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const RIGHT: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const FORWARD: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_vec2(v: Vec2, z: f32) -> Self {
        Self { x: v.x, y: v.y, z }
    }

    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn set_xy(&mut self, v: Vec2) {
        self.x = v.x;
        self.y = v.y;
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalized copy. Zero-length input is a precondition violation.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        debug_assert!(len != 0.0, "normalizing zero-length vector");
        self / len
    }

    /// Vector with its tail at `self` and head at `other`.
    pub fn vector_to(self, other: Vec3) -> Vec3 {
        other - self
    }

    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self * (1.0 - t) + other * t
    }

    pub fn min(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    pub fn abs(self) -> Vec3 {
        Vec3::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Projection of `self` onto `other`.
    pub fn project_onto(self, other: Vec3, is_normalized: bool) -> Vec3 {
        let unit = if is_normalized { other } else { other.normalized() };
        unit * self.dot(unit)
    }

    /// Reflection across the plane with the given normal.
    pub fn reflect(self, normal: Vec3, is_normalized: bool) -> Vec3 {
        self - self.project_onto(normal, is_normalized) * 2.0
    }
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4 { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn from_vec2(v: Vec2, z: f32, w: f32) -> Self {
        Self { x: v.x, y: v.y, z, w }
    }

    pub fn from_vec3(v: Vec3, w: f32) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w }
    }

    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn set_xy(&mut self, v: Vec2) {
        self.x = v.x;
        self.y = v.y;
    }

    pub fn set_xyz(&mut self, v: Vec3) {
        self.x = v.x;
        self.y = v.y;
        self.z = v.z;
    }

    pub fn dot(self, other: Vec4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn lerp(self, other: Vec4, t: f32) -> Vec4 {
        self * (1.0 - t) + other * t
    }

    /// All components exactly zero (degenerate clip position).
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0 && self.w == 0.0
    }
}

impl Vec2i {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Truncate a (pre-rounded) window position to integer coordinates.
    pub fn from_vec2(v: Vec2) -> Self {
        Self { x: v.x as i32, y: v.y as i32 }
    }
}

macro_rules! impl_vec_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = $ty;
            fn add(self, other: $ty) -> $ty {
                $ty { $($field: self.$field + other.$field),+ }
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, other: $ty) {
                $(self.$field += other.$field;)+
            }
        }

        impl Sub for $ty {
            type Output = $ty;
            fn sub(self, other: $ty) -> $ty {
                $ty { $($field: self.$field - other.$field),+ }
            }
        }

        impl SubAssign for $ty {
            fn sub_assign(&mut self, other: $ty) {
                $(self.$field -= other.$field;)+
            }
        }

        impl Neg for $ty {
            type Output = $ty;
            fn neg(self) -> $ty {
                $ty { $($field: -self.$field),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = $ty;
            fn mul(self, s: f32) -> $ty {
                $ty { $($field: self.$field * s),+ }
            }
        }

        impl Div<f32> for $ty {
            type Output = $ty;
            fn div(self, s: f32) -> $ty {
                $ty { $($field: self.$field / s),+ }
            }
        }
    };
}

impl_vec_ops!(Vec2 { x, y });
impl_vec_ops!(Vec3 { x, y, z });
impl_vec_ops!(Vec4 { x, y, z, w });

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::float::almost_eq;

    #[test]
    fn test_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!(almost_eq(a.dot(b), 32.0));
    }

    #[test]
    fn test_cross_3d() {
        let c = Vec3::RIGHT.cross(Vec3::UP);
        assert!(almost_eq(c.z, 1.0));
        assert!(almost_eq(c.x, 0.0) && almost_eq(c.y, 0.0));
    }

    #[test]
    fn test_cross_2d_sign() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert!(a.cross(b) > 0.0);
        assert!(b.cross(a) < 0.0);
    }

    #[test]
    fn test_normalized() {
        let v = Vec3::new(3.0, 0.0, 4.0).normalized();
        assert!(almost_eq(v.length(), 1.0));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 6.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vec2::new(2.0, 4.0));
    }

    #[test]
    fn test_reflect() {
        // reflect a downward vector across the ground plane
        let v = Vec2::new(1.0, -1.0);
        let r = v.reflect(Vec2::new(0.0, 1.0), true);
        assert!(almost_eq(r.x, 1.0));
        assert!(almost_eq(r.y, 1.0));
    }

    #[test]
    fn test_reflect_unnormalized_normal() {
        let v = Vec3::new(1.0, -2.0, 0.0);
        let a = v.reflect(Vec3::new(0.0, 5.0, 0.0), false);
        let b = v.reflect(Vec3::UP, true);
        assert!(almost_eq(a.y, b.y));
    }

    #[test]
    fn test_swizzles() {
        let v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.xy(), Vec2::new(1.0, 2.0));
        assert_eq!(v.xyz(), Vec3::new(1.0, 2.0, 3.0));

        let mut u = Vec3::ZERO;
        u.set_xy(Vec2::new(7.0, 8.0));
        assert_eq!(u, Vec3::new(7.0, 8.0, 0.0));
    }

    #[test]
    fn test_vector_to() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 5.0);
        assert_eq!(a.vector_to(b), Vec2::new(3.0, 4.0));
    }
}
