// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or processing a geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Missing attributes: {}", .0.join(", "))]
    MissingAttributes(Vec<String>),

    #[error("Invalid item size {0}: an attribute needs at least one component per element")]
    InvalidItemSize(usize),

    #[error("Array length {len} is not a multiple of item size {item_size}")]
    LengthNotMultiple { len: usize, item_size: usize },

    #[error("Invalid chunk size {0}: a chunk must address at least one triangle")]
    InvalidChunkSize(usize),

    #[error("Attribute '{name}' overflow: {needed} values needed, {available} available")]
    AttributeOverflow {
        name: String,
        needed: usize,
        available: usize,
    },

    #[error("Draw call {draw_call}: index at {position} resolves to vertex {vertex}, limit is {limit}")]
    IndexOutOfRange {
        draw_call: usize,
        position: usize,
        vertex: usize,
        limit: usize,
    },

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),
}

impl Error {
    /// Shorthand for a missing named attribute
    pub fn missing(name: &str) -> Self {
        Error::MissingAttribute(name.to_string())
    }
}
