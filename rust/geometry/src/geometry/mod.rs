// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh attribute store
//!
//! A [`BufferGeometry`] owns named vertex attributes and the draw calls that
//! slice its index buffer. Derived data is computed in place by the methods
//! in the submodules:
//!
//! - `bounding` - bounding box and sphere
//! - `normals` - vertex normal accumulation
//! - `tangents` - per-vertex tangent frames
//! - `offsets` - splitting into draw calls that fit a 16-bit index buffer
//! - `transform` - baking matrices into positions and normals
//!
//! # Preconditions
//!
//! Every attribute except `index` must hold the same number of elements.
//! This is not checked when attributes are added; algorithms reading
//! mismatched attributes panic on out-of-bounds access.

mod bounding;
mod normals;
mod offsets;
mod tangents;
mod transform;


pub use normals::NormalStats;
pub use tangents::TangentStats;

use crate::attribute::BufferAttribute;
use crate::attribute_map::AttributeMap;
use crate::bounds::{Box3, Sphere};
use crate::draw_call::{DrawCall, DrawCalls};
use crate::error::{Error, Result};
use smallvec::smallvec;

pub const POSITION: &str = "position";
pub const NORMAL: &str = "normal";
pub const COLOR: &str = "color";
pub const UV: &str = "uv";
pub const TANGENT: &str = "tangent";
pub const INDEX: &str = "index";

/// Indexed triangle mesh stored as flat attribute buffers
#[derive(Debug, Clone, Default)]
pub struct BufferGeometry {
    attributes: AttributeMap,
    draw_calls: DrawCalls,
    bounding_box: Option<Box3>,
    bounding_sphere: Option<Sphere>,
    has_tangents: bool,
}

impl BufferGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute
    pub fn add_attribute(&mut self, name: impl Into<String>, attribute: BufferAttribute) {
        self.attributes.insert(name, attribute);
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&BufferAttribute> {
        self.attributes.get(name)
    }

    #[inline]
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut BufferAttribute> {
        self.attributes.get_mut(name)
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<BufferAttribute> {
        self.attributes.remove(name)
    }

    #[inline]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    #[inline]
    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.attributes
    }

    /// The `index` attribute, if the geometry is indexed
    #[inline]
    pub fn index(&self) -> Option<&BufferAttribute> {
        self.attributes.get(INDEX)
    }

    /// Vertex count N, taken from `position`
    pub fn vertex_count(&self) -> usize {
        self.attributes.get(POSITION).map_or(0, BufferAttribute::count)
    }

    pub fn add_draw_call(&mut self, start: usize, count: usize, base_index: usize) {
        self.draw_calls.push(DrawCall::new(start, count, base_index));
    }

    #[inline]
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn set_draw_calls(&mut self, draw_calls: DrawCalls) {
        self.draw_calls = draw_calls;
    }

    pub fn clear_draw_calls(&mut self) {
        self.draw_calls.clear();
    }

    /// Registered draw calls, or one implicit call spanning `index_len`
    pub(crate) fn effective_draw_calls(&self, index_len: usize) -> DrawCalls {
        if self.draw_calls.is_empty() {
            smallvec![DrawCall::whole(index_len)]
        } else {
            self.draw_calls.clone()
        }
    }

    #[inline]
    pub fn bounding_box(&self) -> Option<&Box3> {
        self.bounding_box.as_ref()
    }

    #[inline]
    pub fn bounding_sphere(&self) -> Option<&Sphere> {
        self.bounding_sphere.as_ref()
    }

    /// Set once `compute_tangents` has filled the `tangent` attribute
    #[inline]
    pub fn has_tangents(&self) -> bool {
        self.has_tangents
    }

    /// Check that every draw call stays inside the index buffer, that every
    /// raw index is below `span`, and that every effective vertex reference
    /// addresses an existing vertex.
    pub fn validate_draw_calls(&self, span: usize) -> Result<()> {
        let index = self.index().ok_or_else(|| Error::missing(INDEX))?;
        let indices = index.array();
        let vertex_count = self.vertex_count();

        for (d, dc) in self.effective_draw_calls(indices.len()).iter().enumerate() {
            if dc.end() > indices.len() {
                return Err(Error::IndexOutOfRange {
                    draw_call: d,
                    position: dc.end(),
                    vertex: 0,
                    limit: indices.len(),
                });
            }

            for i in dc.start..dc.end() {
                let raw = indices.get_u32(i) as usize;
                if raw >= span {
                    return Err(Error::IndexOutOfRange {
                        draw_call: d,
                        position: i,
                        vertex: raw,
                        limit: span,
                    });
                }
                let vertex = dc.base_index + raw;
                if vertex >= vertex_count {
                    return Err(Error::IndexOutOfRange {
                        draw_call: d,
                        position: i,
                        vertex,
                        limit: vertex_count,
                    });
                }
            }
        }

        Ok(())
    }

    /// Copy every attribute `other` shares with `self` into `self`,
    /// starting at vertex `offset`. Nothing is written unless every shared
    /// attribute fits.
    pub fn merge(&mut self, other: &BufferGeometry, offset: usize) -> Result<()> {
        for (name, attribute) in self.attributes.iter() {
            if let Some(source) = other.attributes.get(name) {
                let needed = offset * source.item_size() + source.array().len();
                if needed > attribute.array().len() {
                    return Err(Error::AttributeOverflow {
                        name: name.to_string(),
                        needed,
                        available: attribute.array().len(),
                    });
                }
            }
        }

        for (name, attribute) in self.attributes.iter_mut() {
            let Some(source) = other.attributes.get(name) else {
                continue;
            };
            let src = source.array();
            attribute
                .array_mut()
                .copy_elements(offset * source.item_size(), src, 0, src.len());
            attribute.needs_update = true;
        }

        Ok(())
    }

    /// Expand every attribute through the index buffer into a new,
    /// non-indexed geometry. Non-indexed input is returned as a copy.
    ///
    /// Draw calls are resolved, so chunked geometry expands correctly.
    pub fn to_non_indexed(&self) -> BufferGeometry {
        let Some(index) = self.index() else {
            tracing::warn!("to_non_indexed called on a geometry that is already non-indexed");
            return self.clone();
        };
        let indices = index.array();
        let rev_map: Vec<u32> = self
            .effective_draw_calls(indices.len())
            .iter()
            .flat_map(|dc| {
                (dc.start..dc.end())
                    .map(move |i| (dc.base_index + indices.get_u32(i) as usize) as u32)
            })
            .collect();

        let mut geometry = BufferGeometry::new();
        for (name, attribute) in self.attributes.iter() {
            if name == INDEX {
                continue;
            }
            let mut expanded = attribute.clone();
            expanded.replace_rows(attribute.array().gather(attribute.item_size(), &rev_map));
            geometry.add_attribute(name, expanded);
        }
        geometry
    }
}
