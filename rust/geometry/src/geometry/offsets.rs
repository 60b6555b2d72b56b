// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Draw-call chunking for index formats with a limited range
//!
//! WebGL 1 element buffers hold 16-bit indices, so one draw call can address
//! at most 65535 vertices. `compute_offsets` walks the faces in order and
//! assigns vertices to consecutive chunks, never splitting a triangle.
//! A vertex shared with an already closed chunk is duplicated into the
//! current one. Afterwards every attribute is reordered to the new vertex
//! numbering and the index buffer holds chunk-relative indices.

use super::{BufferGeometry, INDEX, POSITION};
use crate::array::AttributeArray;
use crate::draw_call::{DrawCall, DrawCalls, DEFAULT_CHUNK_SIZE};
use crate::error::{Error, Result};
use rayon::prelude::*;

/// Placement of one face corner in the current chunk
#[derive(Debug, Clone, Copy)]
enum Corner {
    /// Needs a fresh vertex slot: first use, or mapped into a closed chunk
    Fresh,
    /// Already has a slot inside the current chunk
    Reuse(usize),
}

impl BufferGeometry {
    /// Chunk the mesh for 16-bit indices (65535 vertices per draw call)
    pub fn compute_offsets(&mut self) -> Result<&[DrawCall]> {
        self.compute_offsets_with_size(DEFAULT_CHUNK_SIZE)
    }

    /// Split the indexed mesh into draw calls addressing at most `size`
    /// vertices each, rewriting `index` and reordering every other attribute.
    ///
    /// The vertex count may grow: vertices shared across a chunk boundary are
    /// duplicated, and vertices no face references are dropped. Requires
    /// `index` and `position`; on error nothing is modified.
    pub fn compute_offsets_with_size(&mut self, size: usize) -> Result<&[DrawCall]> {
        if size < 3 {
            return Err(Error::InvalidChunkSize(size));
        }
        let vertex_count = self
            .attributes
            .get(POSITION)
            .ok_or_else(|| Error::missing(POSITION))?
            .count();
        let indices = self
            .attributes
            .get(INDEX)
            .ok_or_else(|| Error::missing(INDEX))?
            .array();
        let face_count = indices.len() / 3;

        let mut sorted_indices = AttributeArray::index_for_span(face_count * 3, size);
        let mut vertex_map: Vec<Option<usize>> = vec![None; vertex_count];
        let mut rev_map: Vec<u32> = Vec::with_capacity(vertex_count);
        let mut index_ptr = 0;
        let mut duplicated = 0;

        let mut draw_calls = DrawCalls::new();
        let mut current = DrawCall::default();

        for face in 0..face_count {
            let mut corners = [(0usize, Corner::Fresh); 3];
            for (k, corner) in corners.iter_mut().enumerate() {
                let vid = indices.get_u32(face * 3 + k) as usize;
                if vid >= vertex_count {
                    return Err(Error::IndexOutOfRange {
                        draw_call: draw_calls.len(),
                        position: face * 3 + k,
                        vertex: vid,
                        limit: vertex_count,
                    });
                }
                *corner = match vertex_map[vid] {
                    Some(mapped) if mapped >= current.base_index => (vid, Corner::Reuse(mapped)),
                    _ => (vid, Corner::Fresh),
                };
            }

            // Duplicates take slots too, so they count toward the limit
            let fresh = corners
                .iter()
                .filter(|(_, c)| matches!(c, Corner::Fresh))
                .count();
            let vertex_ptr = rev_map.len();
            if vertex_ptr + fresh > current.base_index + size {
                draw_calls.push(current);
                current = DrawCall::new(index_ptr, 0, vertex_ptr);

                for (_, c) in corners.iter_mut() {
                    if matches!(*c, Corner::Reuse(mapped) if mapped < current.base_index) {
                        *c = Corner::Fresh;
                    }
                }
            }

            for (vid, c) in corners {
                let new_vid = match c {
                    Corner::Reuse(mapped) => mapped,
                    Corner::Fresh => {
                        if vertex_map[vid].is_some() {
                            duplicated += 1;
                        }
                        rev_map.push(vid as u32);
                        rev_map.len() - 1
                    }
                };
                vertex_map[vid] = Some(new_vid);
                sorted_indices.set_u32(index_ptr, (new_vid - current.base_index) as u32);
                index_ptr += 1;
                current.count += 1;
            }
        }
        draw_calls.push(current);

        self.reorder_buffers(sorted_indices, &rev_map)?;
        self.draw_calls = draw_calls;

        tracing::debug!(
            draw_calls = self.draw_calls.len(),
            duplicated,
            vertices = rev_map.len(),
            "Computed draw offsets"
        );

        #[cfg(feature = "debug_geometry")]
        {
            for (i, dc) in self.draw_calls.iter().enumerate() {
                tracing::trace!(
                    i,
                    start = dc.start,
                    count = dc.count,
                    base_index = dc.base_index,
                    "Draw offset"
                );
            }
            self.validate_draw_calls(size)?;
        }

        Ok(&self.draw_calls)
    }

    /// Move attribute values to a new vertex numbering
    ///
    /// `rev_map[new_vid]` is the old vertex id whose data lands at
    /// `new_vid`; its length is the new vertex count and may exceed the old
    /// one. `index_array` replaces the `index` attribute as is.
    pub fn reorder_buffers(&mut self, index_array: AttributeArray, rev_map: &[u32]) -> Result<()> {
        if !self.attributes.contains(INDEX) {
            return Err(Error::missing(INDEX));
        }

        let (names, values) = self.attributes.as_mut_slices();
        names
            .par_iter()
            .zip(values.par_iter_mut())
            .filter(|(name, _)| name.as_str() != INDEX)
            .for_each(|(_, attribute)| {
                let sorted = attribute.array().gather(attribute.item_size(), rev_map);
                attribute.replace_rows(sorted);
            });

        if let Some(index) = self.attributes.get_mut(INDEX) {
            index.set_array(index_array)?;
        }
        Ok(())
    }
}
