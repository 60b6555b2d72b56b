// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named per-vertex attribute buffers

use crate::array::AttributeArray;
use crate::error::{Error, Result};
use crate::face_mesh::{Color, Face3};
use crate::upload::GpuBufferHandle;
use nalgebra::{Vector2, Vector3, Vector4};

/// A numeric buffer plus the number of components per logical element
///
/// `array.len()` is always a multiple of `item_size`; `count()` is the
/// number of elements (vertices for vertex attributes, indices for `index`).
#[derive(Debug)]
pub struct BufferAttribute {
    array: AttributeArray,
    item_size: usize,
    /// Set when the array changed since the last upload
    pub needs_update: bool,
    gpu_buffer: Option<GpuBufferHandle>,
}

impl BufferAttribute {
    /// Create an attribute, checking the length/item-size invariant
    pub fn new(array: impl Into<AttributeArray>, item_size: usize) -> Result<Self> {
        let array = array.into();
        check_shape(&array, item_size)?;
        Ok(Self {
            array,
            item_size,
            needs_update: true,
            gpu_buffer: None,
        })
    }

    pub fn from_f32(values: Vec<f32>, item_size: usize) -> Result<Self> {
        Self::new(AttributeArray::F32(values), item_size)
    }

    pub fn from_u16(values: Vec<u16>, item_size: usize) -> Result<Self> {
        Self::new(AttributeArray::U16(values), item_size)
    }

    pub fn from_u32(values: Vec<u32>, item_size: usize) -> Result<Self> {
        Self::new(AttributeArray::U32(values), item_size)
    }

    /// Zero-filled float attribute holding `count` elements
    pub fn zeroed_f32(count: usize, item_size: usize) -> Result<Self> {
        Self::from_f32(vec![0.0; count * item_size], item_size)
    }

    #[inline]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Number of logical elements
    #[inline]
    pub fn count(&self) -> usize {
        self.array.len() / self.item_size
    }

    #[inline]
    pub fn array(&self) -> &AttributeArray {
        &self.array
    }

    /// Mutable access to the raw array. Length must not change.
    #[inline]
    pub fn array_mut(&mut self) -> &mut AttributeArray {
        &mut self.array
    }

    /// Replace the whole array and mark the attribute dirty
    pub fn set_array(&mut self, array: AttributeArray) -> Result<()> {
        check_shape(&array, self.item_size)?;
        self.array = array;
        self.needs_update = true;
        Ok(())
    }

    /// Swap in an array known to hold whole rows
    pub(crate) fn replace_rows(&mut self, array: AttributeArray) {
        debug_assert_eq!(array.len() % self.item_size, 0);
        self.array = array;
        self.needs_update = true;
    }

    #[inline]
    pub fn gpu_buffer(&self) -> Option<GpuBufferHandle> {
        self.gpu_buffer
    }

    #[inline]
    pub fn set_gpu_buffer(&mut self, handle: Option<GpuBufferHandle>) {
        self.gpu_buffer = handle;
    }

    /// Component `k` of element `i`
    #[inline]
    pub fn component(&self, i: usize, k: usize) -> f32 {
        self.array.get_f32(i * self.item_size + k)
    }

    #[inline]
    pub fn get_xy(&self, i: usize) -> Vector2<f32> {
        let base = i * self.item_size;
        Vector2::new(self.array.get_f32(base), self.array.get_f32(base + 1))
    }

    #[inline]
    pub fn get_xyz(&self, i: usize) -> Vector3<f32> {
        let base = i * self.item_size;
        Vector3::new(
            self.array.get_f32(base),
            self.array.get_f32(base + 1),
            self.array.get_f32(base + 2),
        )
    }

    #[inline]
    pub fn get_xyzw(&self, i: usize) -> Vector4<f32> {
        let base = i * self.item_size;
        Vector4::new(
            self.array.get_f32(base),
            self.array.get_f32(base + 1),
            self.array.get_f32(base + 2),
            self.array.get_f32(base + 3),
        )
    }

    #[inline]
    pub fn set_xyz(&mut self, i: usize, v: &Vector3<f32>) {
        let base = i * self.item_size;
        self.array.set_f32(base, v.x);
        self.array.set_f32(base + 1, v.y);
        self.array.set_f32(base + 2, v.z);
    }

    /// Copy element `index2` of `other` into element `index1` of `self`
    pub fn copy_at(&mut self, index1: usize, other: &BufferAttribute, index2: usize) -> Result<()> {
        let dst = index1 * self.item_size;
        let src = index2 * other.item_size;
        self.ensure_room("copy_at", dst + self.item_size)?;
        if src + self.item_size > other.array.len() {
            return Err(Error::AttributeOverflow {
                name: "copy_at source".to_string(),
                needed: src + self.item_size,
                available: other.array.len(),
            });
        }

        self.array.copy_elements(dst, &other.array, src, self.item_size);
        self.needs_update = true;
        Ok(())
    }

    /// Copy flat values from the start of the array
    pub fn copy_array(&mut self, values: &[f32]) -> Result<()> {
        self.ensure_room("copy_array", values.len())?;
        for (i, &v) in values.iter().enumerate() {
            self.array.set_f32(i, v);
        }
        self.needs_update = true;
        Ok(())
    }

    pub fn copy_colors_array(&mut self, colors: &[Color]) -> Result<()> {
        self.ensure_room("copy_colors_array", colors.len() * 3)?;
        for (i, c) in colors.iter().enumerate() {
            self.array.set_f32(i * 3, c.r);
            self.array.set_f32(i * 3 + 1, c.g);
            self.array.set_f32(i * 3 + 2, c.b);
        }
        self.needs_update = true;
        Ok(())
    }

    /// Write the vertex ids of each face as consecutive triples
    pub fn copy_indices_array(&mut self, faces: &[Face3]) -> Result<()> {
        self.ensure_room("copy_indices_array", faces.len() * 3)?;
        for (i, face) in faces.iter().enumerate() {
            self.array.set_u32(i * 3, face.a);
            self.array.set_u32(i * 3 + 1, face.b);
            self.array.set_u32(i * 3 + 2, face.c);
        }
        self.needs_update = true;
        Ok(())
    }

    pub fn copy_vector2s_array(&mut self, vectors: &[Vector2<f32>]) -> Result<()> {
        self.ensure_room("copy_vector2s_array", vectors.len() * 2)?;
        for (i, v) in vectors.iter().enumerate() {
            self.array.set_f32(i * 2, v.x);
            self.array.set_f32(i * 2 + 1, v.y);
        }
        self.needs_update = true;
        Ok(())
    }

    pub fn copy_vector3s_array(&mut self, vectors: &[Vector3<f32>]) -> Result<()> {
        self.ensure_room("copy_vector3s_array", vectors.len() * 3)?;
        for (i, v) in vectors.iter().enumerate() {
            self.array.set_f32(i * 3, v.x);
            self.array.set_f32(i * 3 + 1, v.y);
            self.array.set_f32(i * 3 + 2, v.z);
        }
        self.needs_update = true;
        Ok(())
    }

    pub fn copy_vector4s_array(&mut self, vectors: &[Vector4<f32>]) -> Result<()> {
        self.ensure_room("copy_vector4s_array", vectors.len() * 4)?;
        for (i, v) in vectors.iter().enumerate() {
            self.array.set_f32(i * 4, v.x);
            self.array.set_f32(i * 4 + 1, v.y);
            self.array.set_f32(i * 4 + 2, v.z);
            self.array.set_f32(i * 4 + 3, v.w);
        }
        self.needs_update = true;
        Ok(())
    }

    fn ensure_room(&self, op: &str, needed: usize) -> Result<()> {
        if needed > self.array.len() {
            return Err(Error::AttributeOverflow {
                name: op.to_string(),
                needed,
                available: self.array.len(),
            });
        }
        Ok(())
    }
}

/// Clones share no GPU buffer and are uploaded on their own
impl Clone for BufferAttribute {
    fn clone(&self) -> Self {
        Self {
            array: self.array.clone(),
            item_size: self.item_size,
            needs_update: true,
            gpu_buffer: None,
        }
    }
}

fn check_shape(array: &AttributeArray, item_size: usize) -> Result<()> {
    if item_size == 0 {
        return Err(Error::InvalidItemSize(item_size));
    }
    if array.len() % item_size != 0 {
        return Err(Error::LengthNotMultiple {
            len: array.len(),
            item_size,
        });
    }
    Ok(())
}
