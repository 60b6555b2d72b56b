// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face/vertex meshes and their conversion to flat attribute buffers
//!
//! A [`FaceMesh`] shares vertices between faces and stores normals, colours
//! and texture coordinates per face. Converting it to a [`BufferGeometry`]
//! unrolls every face into three independent vertices, which is what a
//! non-indexed draw needs.

use crate::attribute::BufferAttribute;
use crate::error::{Error, Result};
use crate::geometry::{BufferGeometry, COLOR, NORMAL, POSITION, UV};
use nalgebra::{Point3, Vector2, Vector3};

/// Linear RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Triangle referencing three vertices of a [`FaceMesh`]
#[derive(Debug, Clone, PartialEq)]
pub struct Face3 {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    /// Face normal
    pub normal: Vector3<f32>,
    /// Per-corner normals; used only when every face has them
    pub vertex_normals: Option<[Vector3<f32>; 3]>,
    pub color: Color,
    pub vertex_colors: Option<[Color; 3]>,
}

impl Face3 {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            a,
            b,
            c,
            normal: Vector3::zeros(),
            vertex_normals: None,
            color: Color::new(1.0, 1.0, 1.0),
            vertex_colors: None,
        }
    }

    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_vertex_normals(mut self, normals: [Vector3<f32>; 3]) -> Self {
        self.vertex_normals = Some(normals);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_vertex_colors(mut self, colors: [Color; 3]) -> Self {
        self.vertex_colors = Some(colors);
        self
    }
}

/// Where vertex colours come from when flattening a [`FaceMesh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexColors {
    /// No `color` attribute
    #[default]
    None,
    /// Every corner takes its face colour
    Face,
    /// Every corner takes its own vertex colour (white when absent)
    Vertex,
}

/// Indexed mesh with per-face attributes
#[derive(Debug, Clone, Default)]
pub struct FaceMesh {
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<Face3>,
    /// First UV layer: one entry per face, one UV per corner
    pub face_vertex_uvs: Vec<[Vector2<f32>; 3]>,
}

impl FaceMesh {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BufferGeometry {
    /// Flatten a face/vertex mesh into `position`, `normal`, `color` and `uv`
    /// attributes, three vertices per face, then compute the bounding sphere.
    pub fn from_face_mesh(mesh: &FaceMesh, vertex_colors: VertexColors) -> Result<Self> {
        if mesh.faces.is_empty() {
            return Err(Error::EmptyMesh("face mesh has no faces".to_string()));
        }

        let corners = mesh.faces.len() * 3;
        let has_uvs = mesh.face_vertex_uvs.len() == mesh.faces.len();
        let has_vertex_normals = mesh.faces.iter().all(|f| f.vertex_normals.is_some());

        let mut positions = Vec::with_capacity(corners * 3);
        let mut normals = Vec::with_capacity(corners * 3);
        let mut colors = Vec::with_capacity(if vertex_colors == VertexColors::None { 0 } else { corners * 3 });
        let mut uvs = Vec::with_capacity(if has_uvs { corners * 2 } else { 0 });

        for (i, face) in mesh.faces.iter().enumerate() {
            for id in [face.a, face.b, face.c] {
                let v = mesh.vertices.get(id as usize).ok_or_else(|| Error::IndexOutOfRange {
                    draw_call: 0,
                    position: i * 3,
                    vertex: id as usize,
                    limit: mesh.vertices.len(),
                })?;
                positions.extend_from_slice(&[v.x, v.y, v.z]);
            }

            let corner_normals = match face.vertex_normals {
                Some(n) if has_vertex_normals => n,
                _ => [face.normal; 3],
            };
            for n in &corner_normals {
                normals.extend_from_slice(&[n.x, n.y, n.z]);
            }

            let corner_colors = match vertex_colors {
                VertexColors::None => None,
                VertexColors::Face => Some([face.color; 3]),
                VertexColors::Vertex => Some(face.vertex_colors.unwrap_or([Color::new(1.0, 1.0, 1.0); 3])),
            };
            if let Some(cs) = corner_colors {
                for c in &cs {
                    colors.extend_from_slice(&[c.r, c.g, c.b]);
                }
            }

            if has_uvs {
                for uv in &mesh.face_vertex_uvs[i] {
                    uvs.extend_from_slice(&[uv.x, uv.y]);
                }
            }
        }

        let mut geometry = BufferGeometry::new();
        geometry.add_attribute(POSITION, BufferAttribute::from_f32(positions, 3)?);
        geometry.add_attribute(NORMAL, BufferAttribute::from_f32(normals, 3)?);
        if vertex_colors != VertexColors::None {
            geometry.add_attribute(COLOR, BufferAttribute::from_f32(colors, 3)?);
        }
        if has_uvs {
            geometry.add_attribute(UV, BufferAttribute::from_f32(uvs, 2)?);
        }

        geometry.compute_bounding_sphere();
        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> FaceMesh {
        let mut mesh = FaceMesh::new();
        mesh.vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        mesh.faces = vec![
            Face3::new(0, 1, 2)
                .with_normal(Vector3::z())
                .with_color(Color::new(1.0, 0.0, 0.0)),
            Face3::new(0, 2, 3)
                .with_normal(Vector3::z())
                .with_color(Color::new(0.0, 1.0, 0.0)),
        ];
        mesh
    }

    #[test]
    fn test_flattens_faces() {
        let geometry = BufferGeometry::from_face_mesh(&quad(), VertexColors::None).unwrap();

        assert_eq!(geometry.vertex_count(), 6);
        assert!(!geometry.has_attribute(COLOR));
        assert!(!geometry.has_attribute(UV));

        let position = geometry.attribute(POSITION).unwrap();
        assert_eq!(position.get_xyz(4), Vector3::new(1.0, 1.0, 0.0));
        let normal = geometry.attribute(NORMAL).unwrap();
        assert_eq!(normal.get_xyz(5), Vector3::z());
    }

    #[test]
    fn test_face_colors_and_uvs() {
        let mut mesh = quad();
        mesh.face_vertex_uvs = vec![
            [Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(1.0, 1.0)],
            [Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0), Vector2::new(0.0, 1.0)],
        ];
        let geometry = BufferGeometry::from_face_mesh(&mesh, VertexColors::Face).unwrap();

        let color = geometry.attribute(COLOR).unwrap();
        assert_eq!(color.get_xyz(2), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(color.get_xyz(3), Vector3::new(0.0, 1.0, 0.0));

        let uv = geometry.attribute(UV).unwrap();
        assert_eq!(uv.count(), 6);
        assert_eq!(uv.get_xy(5), Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_vertex_normals_used_when_complete() {
        let mut mesh = quad();
        let n = [Vector3::x(), Vector3::y(), Vector3::z()];
        mesh.faces = mesh.faces.into_iter().map(|f| f.with_vertex_normals(n)).collect();

        let geometry = BufferGeometry::from_face_mesh(&mesh, VertexColors::None).unwrap();
        let normal = geometry.attribute(NORMAL).unwrap();
        assert_eq!(normal.get_xyz(0), Vector3::x());
        assert_eq!(normal.get_xyz(4), Vector3::y());
    }

    #[test]
    fn test_computes_bounding_sphere() {
        let geometry = BufferGeometry::from_face_mesh(&quad(), VertexColors::None).unwrap();
        let sphere = geometry.bounding_sphere().unwrap();
        assert_relative_eq!(sphere.center, Point3::new(0.5, 0.5, 0.0));
        assert_relative_eq!(sphere.radius, 0.5f32.hypot(0.5), epsilon = 1e-6);
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let err = BufferGeometry::from_face_mesh(&FaceMesh::new(), VertexColors::None).unwrap_err();
        assert!(matches!(err, Error::EmptyMesh(_)));
    }

    #[test]
    fn test_dangling_vertex_rejected() {
        let mut mesh = quad();
        mesh.faces.push(Face3::new(0, 1, 9));
        let err = BufferGeometry::from_face_mesh(&mesh, VertexColors::None).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { vertex: 9, limit: 4, .. }));
    }
}
