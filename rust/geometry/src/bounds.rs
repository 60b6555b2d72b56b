// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding volumes

use nalgebra::{Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Box3 {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Box3 {
    /// Identity for `expand_by_point`: min at +inf, max at -inf
    pub const EMPTY: Box3 = Box3 {
        min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Degenerate box at the origin, reported for geometry without vertices
    pub const ZERO: Box3 = Box3 {
        min: Point3::new(0.0, 0.0, 0.0),
        max: Point3::new(0.0, 0.0, 0.0),
    };

    #[inline]
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    #[inline]
    pub fn expand_by_point(&mut self, p: &Point3<f32>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    #[inline]
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    #[inline]
    pub fn contains_point(&self, p: &Point3<f32>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

impl Default for Box3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Bounding sphere
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains_point(&self, p: &Point3<f32>) -> bool {
        nalgebra::distance_squared(&self.center, p) <= self.radius * self.radius
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Point3::origin(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_box_expands_to_point() {
        let mut b = Box3::EMPTY;
        assert!(b.is_empty());
        b.expand_by_point(&Point3::new(1.0, -2.0, 3.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, b.max);
        assert_eq!(b.size(), Vector3::zeros());
    }

    #[test]
    fn test_box_center_and_contains() {
        let b = Box3::new(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 2.0, 4.0));
        assert_eq!(b.center(), Point3::new(0.0, 1.0, 2.0));
        assert!(b.contains_point(&Point3::new(0.5, 0.5, 0.5)));
        assert!(!b.contains_point(&Point3::new(0.5, 2.5, 0.5)));
    }

    #[test]
    fn test_sphere_contains() {
        let s = Sphere::new(Point3::new(1.0, 0.0, 0.0), 1.0);
        assert!(s.contains_point(&Point3::new(2.0, 0.0, 0.0)));
        assert!(!s.contains_point(&Point3::new(2.1, 0.0, 0.0)));
    }
}
