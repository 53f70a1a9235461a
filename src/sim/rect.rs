//! Axis-aligned box geometry for blocks and the paddle
//!
//! Everything solid in the arena is an axis-aligned rectangle; the ball is
//! the only circle. An `Aabb` is stored as min/max corners with +y up.

use glam::Vec2;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build a box from its center point and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Check if a point lies inside (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if two boxes overlap (touching edges count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Closest point on (or inside) the box to the given point
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Return a copy shifted by `offset`
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center_size() {
        let b = Aabb::from_center_size(Vec2::new(10.0, -20.0), Vec2::new(80.0, 30.0));
        assert_eq!(b.min, Vec2::new(-30.0, -35.0));
        assert_eq!(b.max, Vec2::new(50.0, -5.0));
        assert_eq!(b.center(), Vec2::new(10.0, -20.0));
    }

    #[test]
    fn test_contains() {
        let b = Aabb::from_center_size(Vec2::ZERO, Vec2::new(100.0, 20.0));
        assert!(b.contains(Vec2::ZERO));
        assert!(b.contains(Vec2::new(50.0, 10.0))); // corner is inclusive
        assert!(!b.contains(Vec2::new(51.0, 0.0)));
        assert!(!b.contains(Vec2::new(0.0, 11.0)));
    }

    #[test]
    fn test_overlaps() {
        let a = Aabb::from_center_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::from_center_size(Vec2::new(8.0, 0.0), Vec2::new(10.0, 10.0));
        let c = Aabb::from_center_size(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_closest_point() {
        let b = Aabb::from_center_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        // Point outside: clamped to the nearest edge
        assert_eq!(b.closest_point(Vec2::new(20.0, 3.0)), Vec2::new(5.0, 3.0));
        // Point inside: unchanged
        assert_eq!(b.closest_point(Vec2::new(1.0, -2.0)), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn test_translate() {
        let b = Aabb::from_center_size(Vec2::ZERO, Vec2::new(4.0, 4.0));
        let moved = b.translate(Vec2::new(3.0, 0.0));
        assert_eq!(moved.center(), Vec2::new(3.0, 0.0));
        assert_eq!(moved.size(), b.size());
    }
}
