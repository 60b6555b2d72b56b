// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Draw-call descriptors

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Maximum vertex span addressable by a 16-bit element buffer
pub const DEFAULT_CHUNK_SIZE: usize = 65535;

/// Contiguous slice of the index buffer drawn with a vertex offset
///
/// Every index read from `start..start + count` is offset by `base_index`
/// before addressing the vertex attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrawCall {
    pub start: usize,
    pub count: usize,
    pub base_index: usize,
}

/// Most meshes need a single draw call
pub type DrawCalls = SmallVec<[DrawCall; 4]>;

impl DrawCall {
    #[inline]
    pub fn new(start: usize, count: usize, base_index: usize) -> Self {
        Self {
            start,
            count,
            base_index,
        }
    }

    /// Implicit draw call covering a whole index buffer
    #[inline]
    pub fn whole(index_len: usize) -> Self {
        Self::new(0, index_len, 0)
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    /// Start positions of each full triangle in this draw call
    #[inline]
    pub fn triangle_starts(&self) -> impl Iterator<Item = usize> {
        let end = self.start + self.count - self.count % 3;
        (self.start..end).step_by(3)
    }
}
