// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Boxed error coming from a building model or mesh source implementation
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for segment extraction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting roof segments
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid face set: {0}")]
    InvalidFaceSet(String),

    /// The building model could not be queried; aborts the whole run
    #[error("Building model error: {0}")]
    Model(#[source] SourceError),

    /// Mesh extraction failed for one element; the element is skipped
    #[error("Mesh extraction failed: {0}")]
    Mesh(#[source] SourceError),
}

impl Error {
    pub fn model(error: impl Into<SourceError>) -> Self {
        Error::Model(error.into())
    }

    pub fn mesh(error: impl Into<SourceError>) -> Self {
        Error::Mesh(error.into())
    }
}
