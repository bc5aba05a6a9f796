// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The file could not be read or indexed
    #[error("Failed to read IFC model: {0}")]
    Model(#[from] ifc_roof_core::Error),

    #[error(transparent)]
    Extraction(#[from] ifc_roof_segments::Error),
}
