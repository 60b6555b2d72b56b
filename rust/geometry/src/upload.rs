// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seam to the rendering context that owns GPU buffers
//!
//! The geometry never talks to a graphics API directly. A renderer
//! implements [`BufferUploader`] and [`BufferGeometry::upload`] pushes every
//! dirty attribute through it in insertion order.

use crate::geometry::{BufferGeometry, INDEX};

/// Opaque GPU buffer name handed out by the rendering context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuBufferHandle(pub u32);

/// Binding point for an uploaded buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex data (`ARRAY_BUFFER`)
    Array,
    /// Indices (`ELEMENT_ARRAY_BUFFER`)
    ElementArray,
}

/// Rendering-side buffer management
pub trait BufferUploader {
    /// Allocate a new, empty GPU buffer
    fn create_buffer(&mut self) -> GpuBufferHandle;

    /// Replace the contents of `handle` with `data` (static draw usage)
    fn buffer_data(&mut self, target: BufferTarget, handle: GpuBufferHandle, data: &[u8]);
}

impl BufferGeometry {
    /// Upload every dirty attribute and clear its dirty flag
    ///
    /// Attributes without a GPU buffer get one and are uploaded regardless
    /// of their flag. Returns the number of uploads performed.
    pub fn upload<U: BufferUploader + ?Sized>(&mut self, uploader: &mut U) -> usize {
        let mut uploads = 0;

        for (name, attribute) in self.attributes_mut().iter_mut() {
            let handle = match attribute.gpu_buffer() {
                Some(handle) => handle,
                None => {
                    let handle = uploader.create_buffer();
                    attribute.set_gpu_buffer(Some(handle));
                    attribute.needs_update = true;
                    handle
                }
            };

            if attribute.needs_update {
                let target = if name == INDEX {
                    BufferTarget::ElementArray
                } else {
                    BufferTarget::Array
                };
                uploader.buffer_data(target, handle, attribute.array().as_bytes());
                attribute.needs_update = false;
                uploads += 1;
            }
        }

        uploads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::BufferAttribute;

    #[derive(Default)]
    struct RecordingUploader {
        next: u32,
        uploads: Vec<(BufferTarget, GpuBufferHandle, usize)>,
    }

    impl BufferUploader for RecordingUploader {
        fn create_buffer(&mut self) -> GpuBufferHandle {
            self.next += 1;
            GpuBufferHandle(self.next)
        }

        fn buffer_data(&mut self, target: BufferTarget, handle: GpuBufferHandle, data: &[u8]) {
            self.uploads.push((target, handle, data.len()));
        }
    }

    fn triangle() -> BufferGeometry {
        let mut geometry = BufferGeometry::new();
        geometry.add_attribute(
            "position",
            BufferAttribute::from_f32(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], 3).unwrap(),
        );
        geometry.add_attribute("index", BufferAttribute::from_u16(vec![0, 1, 2], 1).unwrap());
        geometry
    }

    #[test]
    fn test_upload_in_insertion_order() {
        let mut geometry = triangle();
        let mut uploader = RecordingUploader::default();

        assert_eq!(geometry.upload(&mut uploader), 2);
        assert_eq!(
            uploader.uploads,
            vec![
                (BufferTarget::Array, GpuBufferHandle(1), 36),
                (BufferTarget::ElementArray, GpuBufferHandle(2), 6),
            ]
        );
    }

    #[test]
    fn test_upload_skips_clean_attributes() {
        let mut geometry = triangle();
        let mut uploader = RecordingUploader::default();
        geometry.upload(&mut uploader);

        assert_eq!(geometry.upload(&mut uploader), 0);

        geometry.attribute_mut("position").unwrap().needs_update = true;
        assert_eq!(geometry.upload(&mut uploader), 1);
        assert_eq!(uploader.uploads.last().unwrap().1, GpuBufferHandle(1));
    }
}
