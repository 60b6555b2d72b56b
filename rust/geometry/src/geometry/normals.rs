// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex normal computation

use super::{BufferGeometry, INDEX, NORMAL, POSITION};
use crate::array::AttributeArray;
use crate::attribute::BufferAttribute;
use crate::error::{Error, Result};
use nalgebra::Vector3;

/// Outcome of a normal pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalStats {
    /// Triangles whose face normal was accumulated or assigned
    pub triangles: usize,
    /// Normals that had zero length before normalization (now NaN)
    pub degenerate: usize,
}

#[inline]
fn read_xyz(array: &AttributeArray, offset: usize) -> Vector3<f32> {
    Vector3::new(
        array.get_f32(offset),
        array.get_f32(offset + 1),
        array.get_f32(offset + 2),
    )
}

#[inline]
fn add_xyz(array: &mut AttributeArray, offset: usize, v: &Vector3<f32>) {
    for k in 0..3 {
        array.set_f32(offset + k, array.get_f32(offset + k) + v[k]);
    }
}

#[inline]
fn write_xyz(array: &mut AttributeArray, offset: usize, v: &Vector3<f32>) {
    for k in 0..3 {
        array.set_f32(offset + k, v[k]);
    }
}

/// Unnormalized face normal, `(C - B) x (A - B)`
#[inline]
fn face_normal(a: &Vector3<f32>, b: &Vector3<f32>, c: &Vector3<f32>) -> Vector3<f32> {
    (c - b).cross(&(a - b))
}

impl BufferGeometry {
    /// Recompute the `normal` attribute from triangle geometry
    ///
    /// Normals are reset to zero first, then every face normal is summed
    /// into its three vertices (indexed) or assigned to them (non-indexed),
    /// and finally normalized. Larger faces weigh more in the sum.
    ///
    /// Returns `MissingAttribute` without touching the geometry when there
    /// is no `position`.
    pub fn compute_vertex_normals(&mut self) -> Result<NormalStats> {
        let position_len = self
            .attributes
            .get(POSITION)
            .ok_or_else(|| Error::missing(POSITION))?
            .array()
            .len();

        let mut normals = match self.attributes.get_mut(NORMAL) {
            Some(normal) => {
                let mut array = std::mem::replace(normal.array_mut(), AttributeArray::F32(Vec::new()));
                array.fill_zero();
                array
            }
            None => AttributeArray::F32(vec![0.0; position_len]),
        };
        let positions = match self.attributes.get(POSITION) {
            Some(position) => position.array(),
            None => return Err(Error::missing(POSITION)),
        };

        let mut triangles = 0;
        if let Some(index) = self.attributes.get(INDEX) {
            let indices = index.array();
            for dc in self.effective_draw_calls(indices.len()) {
                for i in dc.triangle_starts() {
                    let va = (dc.base_index + indices.get_u32(i) as usize) * 3;
                    let vb = (dc.base_index + indices.get_u32(i + 1) as usize) * 3;
                    let vc = (dc.base_index + indices.get_u32(i + 2) as usize) * 3;

                    let n = face_normal(
                        &read_xyz(positions, va),
                        &read_xyz(positions, vb),
                        &read_xyz(positions, vc),
                    );

                    add_xyz(&mut normals, va, &n);
                    add_xyz(&mut normals, vb, &n);
                    add_xyz(&mut normals, vc, &n);
                    triangles += 1;
                }
            }
        } else {
            // Triangle soup: no vertex is shared, so assignment is enough
            for i in (0..positions.len() - positions.len() % 9).step_by(9) {
                let n = face_normal(
                    &read_xyz(positions, i),
                    &read_xyz(positions, i + 3),
                    &read_xyz(positions, i + 6),
                );

                write_xyz(&mut normals, i, &n);
                write_xyz(&mut normals, i + 3, &n);
                write_xyz(&mut normals, i + 6, &n);
                triangles += 1;
            }
        }

        match self.attributes.get_mut(NORMAL) {
            Some(normal) => normal.replace_rows(normals),
            None => {
                self.attributes.insert(NORMAL, BufferAttribute::new(normals, 3)?);
            }
        }

        let mut stats = self.normalize_normals()?;
        stats.triangles = triangles;
        Ok(stats)
    }

    /// Scale every normal to unit length
    ///
    /// Zero-length normals are divided by zero and come out as NaN; they
    /// are counted in [`NormalStats::degenerate`] so callers can react.
    pub fn normalize_normals(&mut self) -> Result<NormalStats> {
        let normal = self.attributes.get_mut(NORMAL).ok_or_else(|| Error::missing(NORMAL))?;
        let array = normal.array_mut();

        let mut stats = NormalStats::default();
        for i in (0..array.len() - array.len() % 3).step_by(3) {
            let n = read_xyz(array, i);
            let len_sq = n.norm_squared();
            if len_sq == 0.0 {
                stats.degenerate += 1;
            }
            write_xyz(array, i, &(n * (1.0 / len_sq.sqrt())));
        }
        normal.needs_update = true;

        if stats.degenerate > 0 {
            tracing::debug!(degenerate = stats.degenerate, "Zero-length vertex normals");
        }
        Ok(stats)
    }
}
