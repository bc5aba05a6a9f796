// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP header handling: magic line, FILE_SCHEMA, and the DATA section offset.

use crate::error::{Error, Result};

const MAGIC: &str = "ISO-10303-21;";

/// Byte offset just past the `DATA;` keyword that opens the instance section
pub fn locate_data_section(content: &str) -> Result<usize> {
    if !content.trim_start_matches('\u{feff}').trim_start().starts_with(MAGIC) {
        return Err(Error::NotStep);
    }

    // Strings in the header may contain the keyword, so look past the header's ENDSEC
    let search_from = content.find("ENDSEC;").unwrap_or(0);
    content[search_from..]
        .find("DATA;")
        .map(|offset| search_from + offset + "DATA;".len())
        .ok_or(Error::MissingDataSection)
}

/// Schema identifiers from `FILE_SCHEMA(('IFC4'));`, e.g. `IFC2X3`, `IFC4X3_ADD2`
pub fn parse_file_schema(content: &str) -> Option<String> {
    let start = content.find("FILE_SCHEMA")?;
    let rest = &content[start..];
    let open = rest.find('\'')?;
    let close = rest[open + 1..].find('\'')?;
    let schema = rest[open + 1..open + 1 + close].trim();
    if schema.is_empty() {
        None
    } else {
        Some(schema.to_ascii_uppercase())
    }
}
