// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-vertex tangent computation
//!
//! Lengyel's method: accumulate the UV-space derivative directions of every
//! triangle into its vertices, then orthogonalize against the vertex normal
//! and store the bitangent handedness in `w`.

use super::{BufferGeometry, INDEX, NORMAL, POSITION, TANGENT, UV};
use crate::array::AttributeArray;
use crate::attribute::BufferAttribute;
use crate::error::{Error, Result};
use nalgebra::{Vector2, Vector3};

/// Outcome of a tangent pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TangentStats {
    pub triangles: usize,
    /// Triangles with zero UV area; their contribution is infinite or NaN
    pub degenerate_uv: usize,
    /// Vertices that received a tangent
    pub vertices: usize,
}

/// Per-vertex accumulators for the `s` and `t` directions
struct TangentAccumulator {
    tan1: Vec<Vector3<f32>>,
    tan2: Vec<Vector3<f32>>,
}

impl TangentAccumulator {
    fn new(vertex_count: usize) -> Self {
        Self {
            tan1: vec![Vector3::zeros(); vertex_count],
            tan2: vec![Vector3::zeros(); vertex_count],
        }
    }

    /// Add one triangle's `sdir`/`tdir` to its vertices.
    /// Returns false when the UV triangle has zero area.
    fn add_triangle(
        &mut self,
        positions: &BufferAttribute,
        uvs: &BufferAttribute,
        [a, b, c]: [usize; 3],
    ) -> bool {
        let v_a = positions.get_xyz(a);
        let e1 = positions.get_xyz(b) - v_a;
        let e2 = positions.get_xyz(c) - v_a;

        let uv_a: Vector2<f32> = uvs.get_xy(a);
        let d1 = uvs.get_xy(b) - uv_a;
        let d2 = uvs.get_xy(c) - uv_a;
        let (s1, t1, s2, t2) = (d1.x, d1.y, d2.x, d2.y);

        let det = s1 * t2 - s2 * t1;
        let r = 1.0 / det;

        let sdir = (e1 * t2 - e2 * t1) * r;
        let tdir = (e2 * s1 - e1 * s2) * r;

        for v in [a, b, c] {
            self.tan1[v] += sdir;
            self.tan2[v] += tdir;
        }

        det != 0.0
    }

    /// Gram-Schmidt tangent and handedness for vertex `v`
    fn tangent(&self, normal: &Vector3<f32>, v: usize) -> [f32; 4] {
        let t = self.tan1[v];
        let tangent = (t - normal * normal.dot(&t)).normalize();
        let w = if normal.cross(&t).dot(&self.tan2[v]) < 0.0 {
            -1.0
        } else {
            1.0
        };
        [tangent.x, tangent.y, tangent.z, w]
    }
}

impl BufferGeometry {
    /// Compute a 4-component `tangent` attribute (xyz + handedness)
    ///
    /// Needs `index`, `position`, `normal` and `uv`. When any is missing a
    /// warning is logged and `MissingAttributes` is returned; the geometry
    /// is left untouched. Draw calls are honoured; without any, the whole
    /// index buffer is treated as one draw call.
    pub fn compute_tangents(&mut self) -> Result<TangentStats> {
        let (Some(index), Some(positions), Some(normals), Some(uvs)) = (
            self.attributes.get(INDEX),
            self.attributes.get(POSITION),
            self.attributes.get(NORMAL),
            self.attributes.get(UV),
        ) else {
            let missing: Vec<String> = [INDEX, POSITION, NORMAL, UV]
                .into_iter()
                .filter(|name| !self.attributes.contains(name))
                .map(str::to_string)
                .collect();
            tracing::warn!(?missing, "Missing required attributes for tangent computation");
            return Err(Error::MissingAttributes(missing));
        };

        let vertex_count = positions.count();
        let mut out = match self.attributes.get(TANGENT) {
            Some(t) if t.item_size() == 4 && t.count() == vertex_count => t.array().clone(),
            _ => AttributeArray::F32(vec![0.0; vertex_count * 4]),
        };

        let indices = index.array();
        let draw_calls = self.effective_draw_calls(indices.len());

        let mut stats = TangentStats::default();
        let mut acc = TangentAccumulator::new(vertex_count);
        let mut referenced = vec![false; vertex_count];

        for dc in &draw_calls {
            for i in dc.triangle_starts() {
                let tri = [0, 1, 2].map(|k| dc.base_index + indices.get_u32(i + k) as usize);
                if !acc.add_triangle(positions, uvs, tri) {
                    stats.degenerate_uv += 1;
                }
                for v in tri {
                    referenced[v] = true;
                }
                stats.triangles += 1;
            }
        }

        for v in (0..vertex_count).filter(|&v| referenced[v]) {
            let t = acc.tangent(&normals.get_xyz(v), v);
            for (k, value) in t.into_iter().enumerate() {
                out.set_f32(v * 4 + k, value);
            }
            stats.vertices += 1;
        }

        if stats.degenerate_uv > 0 {
            tracing::debug!(
                degenerate_uv = stats.degenerate_uv,
                "Triangles with zero UV area produced non-finite tangents"
            );
        }

        let reuse = matches!(self.attributes.get(TANGENT), Some(t) if t.item_size() == 4);
        match self.attributes.get_mut(TANGENT) {
            Some(t) if reuse => t.replace_rows(out),
            _ => {
                self.attributes.insert(TANGENT, BufferAttribute::new(out, 4)?);
            }
        }
        self.has_tangents = true;
        Ok(stats)
    }
}
