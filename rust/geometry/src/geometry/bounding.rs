// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding box and bounding sphere computation

use super::{BufferGeometry, POSITION};
use crate::bounds::{Box3, Sphere};
use nalgebra::Point3;

/// Box enclosing every `xyz` triple of a flat position array
fn scan_box(positions: &crate::array::AttributeArray) -> Box3 {
    let mut bb = Box3::EMPTY;
    for i in (0..positions.len() - positions.len() % 3).step_by(3) {
        bb.expand_by_point(&Point3::new(
            positions.get_f32(i),
            positions.get_f32(i + 1),
            positions.get_f32(i + 2),
        ));
    }
    bb
}

impl BufferGeometry {
    /// Compute the axis-aligned box around all positions
    ///
    /// Without positions (missing attribute or zero vertices) the box is
    /// [`Box3::ZERO`] rather than the infinite empty box.
    pub fn compute_bounding_box(&mut self) -> &Box3 {
        let bb = match self.attributes.get(POSITION) {
            Some(position) if !position.array().is_empty() => scan_box(position.array()),
            _ => Box3::ZERO,
        };
        self.bounding_box.insert(bb)
    }

    /// Compute a sphere centred on the box centre with the smallest radius
    /// enclosing every position
    ///
    /// Centering on the box and measuring the farthest vertex is usually
    /// tighter than the box's circumscribed sphere, at the price of a second
    /// scan. Without vertices the previous centre is kept and the radius is 0.
    pub fn compute_bounding_sphere(&mut self) -> &Sphere {
        let sphere = self.bounding_sphere.get_or_insert_with(Sphere::default);

        let Some(position) = self.attributes.get(POSITION) else {
            return sphere;
        };
        let positions = position.array();
        if positions.len() < 3 {
            sphere.radius = 0.0;
            return sphere;
        }

        let center = scan_box(positions).center();

        let mut max_radius_sq = 0.0f32;
        for i in (0..positions.len() - positions.len() % 3).step_by(3) {
            let p = Point3::new(
                positions.get_f32(i),
                positions.get_f32(i + 1),
                positions.get_f32(i + 2),
            );
            max_radius_sq = max_radius_sq.max(nalgebra::distance_squared(&center, &p));
        }

        sphere.center = center;
        sphere.radius = max_radius_sq.sqrt();
        sphere
    }
}
