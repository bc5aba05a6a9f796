// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for reading IFC/STEP content.

use thiserror::Error;

/// Result type for core parsing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening or decoding a model
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a STEP physical file (missing ISO-10303-21 header)")]
    NotStep,

    #[error("STEP file has no DATA section")]
    MissingDataSection,

    #[error("Parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Entity #{0} not found")]
    EntityNotFound(u32),

    #[error("Entity #{id}: expected {expected}, found {found}")]
    UnexpectedType {
        id: u32,
        expected: &'static str,
        found: String,
    },
}

impl Error {
    /// Create a parse error at a byte offset
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}
