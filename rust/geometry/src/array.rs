// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed numeric arrays backing vertex attributes
//!
//! One enum covers every element format the GPU collaborator understands.
//! Algorithms read and write through `get_f32`/`get_u32`/`set_f32`, so they
//! never care which variant they hold.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Element format of an [`AttributeArray`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayFormat {
    Float32,
    Uint16,
    Uint32,
}

impl ArrayFormat {
    /// Size in bytes of a single element
    #[inline]
    pub fn element_size(&self) -> usize {
        match self {
            Self::Float32 | Self::Uint32 => 4,
            Self::Uint16 => 2,
        }
    }
}

/// Dense, fixed-length numeric buffer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeArray {
    F32(Vec<f32>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl AttributeArray {
    /// Index array able to address `span` vertices (values `0..span`)
    ///
    /// Picks 16-bit storage whenever the span fits, which is what a
    /// WebGL 1 element buffer requires.
    pub fn index_for_span(len: usize, span: usize) -> Self {
        if span <= u16::MAX as usize + 1 {
            Self::U16(vec![0; len])
        } else {
            Self::U32(vec![0; len])
        }
    }

    #[inline]
    pub fn format(&self) -> ArrayFormat {
        match self {
            Self::F32(_) => ArrayFormat::Float32,
            Self::U16(_) => ArrayFormat::Uint16,
            Self::U32(_) => ArrayFormat::Uint32,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read element `i` as a float
    #[inline]
    pub fn get_f32(&self, i: usize) -> f32 {
        match self {
            Self::F32(v) => v[i],
            Self::U16(v) => v[i] as f32,
            Self::U32(v) => v[i] as f32,
        }
    }

    /// Read element `i` as an unsigned integer (index access)
    #[inline]
    pub fn get_u32(&self, i: usize) -> u32 {
        match self {
            Self::F32(v) => v[i] as u32,
            Self::U16(v) => v[i] as u32,
            Self::U32(v) => v[i],
        }
    }

    /// Write element `i`, converting to the storage format
    #[inline]
    pub fn set_f32(&mut self, i: usize, value: f32) {
        match self {
            Self::F32(v) => v[i] = value,
            Self::U16(v) => v[i] = value as u16,
            Self::U32(v) => v[i] = value as u32,
        }
    }

    /// Write an integer element `i`, converting to the storage format
    #[inline]
    pub fn set_u32(&mut self, i: usize, value: u32) {
        match self {
            Self::F32(v) => v[i] = value as f32,
            Self::U16(v) => v[i] = value as u16,
            Self::U32(v) => v[i] = value,
        }
    }

    /// Zero-filled array of the same format with `len` elements
    pub fn zeroed_like(&self, len: usize) -> Self {
        match self {
            Self::F32(_) => Self::F32(vec![0.0; len]),
            Self::U16(_) => Self::U16(vec![0; len]),
            Self::U32(_) => Self::U32(vec![0; len]),
        }
    }

    /// Reset every element to zero without reallocating
    pub fn fill_zero(&mut self) {
        match self {
            Self::F32(v) => v.fill(0.0),
            Self::U16(v) => v.fill(0),
            Self::U32(v) => v.fill(0),
        }
    }

    /// Copy `len` elements of `src`, starting at `from`, into `self` at `to`
    ///
    /// Same-format copies are bit exact. Integer targets read the source as
    /// `u32`, so ids above 2^24 are never rounded through `f32`.
    pub fn copy_elements(&mut self, to: usize, src: &AttributeArray, from: usize, len: usize) {
        match (self, src) {
            (Self::F32(d), Self::F32(s)) => d[to..to + len].copy_from_slice(&s[from..from + len]),
            (Self::U16(d), Self::U16(s)) => d[to..to + len].copy_from_slice(&s[from..from + len]),
            (Self::U32(d), Self::U32(s)) => d[to..to + len].copy_from_slice(&s[from..from + len]),
            (dst, s) if dst.format() == ArrayFormat::Float32 => {
                for i in 0..len {
                    dst.set_f32(to + i, s.get_f32(from + i));
                }
            }
            (dst, s) => {
                for i in 0..len {
                    dst.set_u32(to + i, s.get_u32(from + i));
                }
            }
        }
    }

    /// Build a reordered copy: element row `new` is row `rev_map[new]` of `self`
    pub fn gather(&self, item_size: usize, rev_map: &[u32]) -> Self {
        fn rows<T: Copy>(src: &[T], item_size: usize, rev_map: &[u32]) -> Vec<T> {
            let mut out = Vec::with_capacity(rev_map.len() * item_size);
            for &old in rev_map {
                let from = old as usize * item_size;
                out.extend_from_slice(&src[from..from + item_size]);
            }
            out
        }

        match self {
            Self::F32(v) => Self::F32(rows(v, item_size, rev_map)),
            Self::U16(v) => Self::U16(rows(v, item_size, rev_map)),
            Self::U32(v) => Self::U32(rows(v, item_size, rev_map)),
        }
    }

    /// Raw bytes in native endianness, ready for a `bufferData` call
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::F32(v) => bytemuck::cast_slice(v),
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
        }
    }

    /// Float view, if the array stores floats
    #[inline]
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Self::F32(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Vec<f32>> for AttributeArray {
    fn from(v: Vec<f32>) -> Self {
        Self::F32(v)
    }
}

impl From<Vec<u16>> for AttributeArray {
    fn from(v: Vec<u16>) -> Self {
        Self::U16(v)
    }
}

impl From<Vec<u32>> for AttributeArray {
    fn from(v: Vec<u32>) -> Self {
        Self::U32(v)
    }
}
