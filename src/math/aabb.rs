//! Axis-aligned bounding boxes

use super::transform::{Transform2, Transform3};
use super::vec::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// 2D axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

/// 3D axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb2 {
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y, "inverted bounds");
        Self { min, max }
    }

    /// Check if a point is inside the box (boundary included).
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Check if another box is fully inside this one.
    pub fn contains_box(&self, that: &Aabb2) -> bool {
        self.contains(that.min) && self.contains(that.max)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Transform mapping the unit box `[0,1]^2` onto this box.
    pub fn to_transform(&self) -> Transform2 {
        Transform2::new().scale(self.size()).translate(self.min)
    }

    /// Box spanned by the images of the unit box corners under `t`.
    pub fn from_transform(t: &Transform2) -> Self {
        let a = t.apply(Vec2::ZERO);
        let b = t.apply(Vec2::ONE);
        Self { min: a.min(b), max: a.max(b) }
    }
}

impl Aabb3 {
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "inverted bounds"
        );
        Self { min, max }
    }

    /// Check if a point is inside the box (boundary included).
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Check if another box is fully inside this one.
    pub fn contains_box(&self, that: &Aabb3) -> bool {
        self.contains(that.min) && self.contains(that.max)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Transform mapping the unit box `[0,1]^3` onto this box.
    pub fn to_transform(&self) -> Transform3 {
        Transform3::new().scale(self.size()).translate(self.min)
    }

    /// Box spanned by the images of the unit box corners under `t`.
    pub fn from_transform(t: &Transform3) -> Self {
        let a = t.apply(Vec3::ZERO);
        let b = t.apply(Vec3::ONE);
        Self { min: a.min(b), max: a.max(b) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::float::almost_eq;

    #[test]
    fn test_contains_point() {
        let b = Aabb2::from_min_max(Vec2::ZERO, Vec2::new(9.0, 9.0));
        assert!(b.contains(Vec2::new(5.0, 5.0)));
        assert!(b.contains(Vec2::new(0.0, 9.0))); // boundary
        assert!(!b.contains(Vec2::new(-0.1, 5.0)));
    }

    #[test]
    fn test_contains_box() {
        let outer = Aabb2::from_min_max(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let inner = Aabb2::from_min_max(Vec2::new(-0.5, 0.0), Vec2::new(0.5, 1.0));
        assert!(outer.contains_box(&inner));
        assert!(!inner.contains_box(&outer));
    }

    #[test]
    fn test_to_transform_maps_unit_box() {
        let b = Aabb2::from_min_max(Vec2::new(2.0, 3.0), Vec2::new(6.0, 5.0));
        let t = b.to_transform();
        assert_eq!(t.apply(Vec2::ZERO), b.min);
        assert_eq!(t.apply(Vec2::ONE), b.max);
        assert_eq!(t.apply_inv(b.center()), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_transform_roundtrip() {
        let b = Aabb3::from_min_max(Vec3::new(-2.0, 0.0, 1.0), Vec3::new(2.0, 4.0, 9.0));
        let back = Aabb3::from_transform(&b.to_transform());
        assert!(almost_eq(back.min.z, b.min.z));
        assert!(almost_eq(back.max.y, b.max.y));
    }
}
