// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Trellis Geometry
//!
//! Indexed triangle meshes stored as named flat attribute buffers, ready for
//! WebGL-style upload. Derives bounding volumes, vertex normals and tangent
//! frames in place, and splits large meshes into draw calls whose indices
//! fit a 16-bit element buffer.
//!
//! ```
//! use trellis_geometry::{BufferAttribute, BufferGeometry, INDEX, POSITION};
//!
//! let mut geometry = BufferGeometry::new();
//! geometry.add_attribute(
//!     POSITION,
//!     BufferAttribute::from_f32(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], 3)?,
//! );
//! geometry.add_attribute(INDEX, BufferAttribute::from_u16(vec![0, 1, 2], 1)?);
//!
//! geometry.compute_vertex_normals()?;
//! geometry.compute_bounding_sphere();
//! let draw_calls = geometry.compute_offsets()?;
//! assert_eq!(draw_calls.len(), 1);
//! # Ok::<(), trellis_geometry::Error>(())
//! ```

pub mod array;
pub mod attribute;
pub mod attribute_map;
pub mod bounds;
pub mod draw_call;
pub mod error;
pub mod face_mesh;
pub mod geometry;
pub mod upload;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};

pub use array::{ArrayFormat, AttributeArray};
pub use attribute::BufferAttribute;
pub use attribute_map::AttributeMap;
pub use bounds::{Box3, Sphere};
pub use draw_call::{DrawCall, DrawCalls, DEFAULT_CHUNK_SIZE};
pub use error::{Error, Result};
pub use face_mesh::{Color, Face3, FaceMesh, VertexColors};
pub use geometry::{
    BufferGeometry, NormalStats, TangentStats, COLOR, INDEX, NORMAL, POSITION, TANGENT, UV,
};
pub use upload::{BufferTarget, BufferUploader, GpuBufferHandle};
