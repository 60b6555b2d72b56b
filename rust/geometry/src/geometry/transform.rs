// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Baking affine transforms into vertex data
//!
//! Matrices are `f64` like the rest of the placement pipeline; positions are
//! widened, transformed and narrowed back to `f32`.

use super::{BufferGeometry, NORMAL, POSITION};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

impl BufferGeometry {
    /// Transform `position` by `matrix` and `normal` by its normal matrix
    ///
    /// Bounding volumes that were already computed are recomputed.
    pub fn apply_matrix(&mut self, matrix: &Matrix4<f64>) {
        if let Some(position) = self.attributes.get_mut(POSITION) {
            for v in 0..position.count() {
                let p = position.get_xyz(v).cast::<f64>();
                let transformed = matrix.transform_point(&Point3::from(p));
                position.set_xyz(v, &transformed.coords.cast::<f32>());
            }
            position.needs_update = true;
        }

        if let Some(normal) = self.attributes.get_mut(NORMAL) {
            let inverse_transpose = normal_matrix(matrix);
            for v in 0..normal.count() {
                let n = inverse_transpose * normal.get_xyz(v).cast::<f64>();
                normal.set_xyz(v, &n.cast::<f32>());
            }
            normal.needs_update = true;
        }

        if self.bounding_box.is_some() {
            self.compute_bounding_box();
        }
        if self.bounding_sphere.is_some() {
            self.compute_bounding_sphere();
        }
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.apply_matrix(&Matrix4::new_translation(&Vector3::new(x, y, z)));
    }

    pub fn scale(&mut self, x: f64, y: f64, z: f64) {
        self.apply_matrix(&Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z)));
    }

    /// Rotate about the X axis, angle in radians
    pub fn rotate_x(&mut self, angle: f64) {
        self.apply_matrix(&Matrix4::from_axis_angle(&Vector3::x_axis(), angle));
    }

    /// Rotate about the Y axis, angle in radians
    pub fn rotate_y(&mut self, angle: f64) {
        self.apply_matrix(&Matrix4::from_axis_angle(&Vector3::y_axis(), angle));
    }

    /// Rotate about the Z axis, angle in radians
    pub fn rotate_z(&mut self, angle: f64) {
        self.apply_matrix(&Matrix4::from_axis_angle(&Vector3::z_axis(), angle));
    }

    /// Move the bounding box centre to the origin and return the applied offset
    pub fn center(&mut self) -> Vector3<f32> {
        let offset = -self.compute_bounding_box().center().coords;
        self.translate(offset.x as f64, offset.y as f64, offset.z as f64);
        offset
    }
}

/// Inverse-transpose of the upper 3x3; the matrix itself if singular
fn normal_matrix(matrix: &Matrix4<f64>) -> Matrix3<f64> {
    let linear: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    linear.try_inverse().unwrap_or(linear).transpose()
}
