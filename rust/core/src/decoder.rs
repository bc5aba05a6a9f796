// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity Decoder - On-demand entity parsing
//!
//! The file is scanned once into an [`EntityIndex`] of byte offsets; entities
//! are parsed only when something asks for them.

use crate::entity::DecodedEntity;
use crate::error::{Error, Result};
use crate::parser::parse_entity;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Byte offsets of every entity instance, plus the ids of each type in file order
#[derive(Debug, Default)]
pub struct EntityIndex {
    offsets: FxHashMap<u32, (usize, usize)>,
    by_type: FxHashMap<String, Vec<u32>>,
}

impl EntityIndex {
    /// Byte range `(start, end)` of an entity, `end` exclusive and past the `;`
    #[inline]
    pub fn get(&self, id: u32) -> Option<(usize, usize)> {
        self.offsets.get(&id).copied()
    }

    /// Ids of all instances of an upper-case type name, in file order
    pub fn ids_of_type(&self, type_name: &str) -> &[u32] {
        self.by_type
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ids of all instances of several type names, merged in file order
    pub fn ids_of_types(&self, type_names: &[&str]) -> Vec<u32> {
        let mut ids: Vec<u32> = type_names
            .iter()
            .flat_map(|name| self.ids_of_type(name).iter().copied())
            .collect();
        ids.sort_by_key(|id| self.get(*id).map_or(usize::MAX, |(start, _)| start));
        ids
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Build entity index from content - O(n) scan using SIMD-accelerated search
///
/// Scanning starts at `data_start` (the byte after `DATA;`). Semicolons
/// inside quoted strings do not terminate an entity.
pub fn build_entity_index(content: &str, data_start: usize) -> EntityIndex {
    let bytes = content.as_bytes();
    let len = bytes.len();

    // Roughly 1 entity per 50 bytes
    let mut index = EntityIndex {
        offsets: FxHashMap::with_capacity_and_hasher(len / 50, Default::default()),
        by_type: FxHashMap::default(),
    };

    let mut pos = data_start.min(len);

    while pos < len {
        let hash_offset = match memchr::memchr(b'#', &bytes[pos..]) {
            Some(offset) => offset,
            None => break,
        };

        let start = pos + hash_offset;
        pos = start + 1;

        let id_start = pos;
        while pos < len && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let id_end = pos;

        // Handles both `#45=` and `#45 = `
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        if id_end == id_start || pos >= len || bytes[pos] != b'=' {
            continue;
        }
        pos += 1;

        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let name_start = pos;
        while pos < len && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
            pos += 1;
        }
        let type_name = content[name_start..pos].to_ascii_uppercase();

        let end = match find_entity_end(bytes, pos) {
            Some(end) => end,
            None => break, // Unterminated entity, malformed tail
        };

        if let Some(id) = parse_u32(&bytes[id_start..id_end]) {
            index.offsets.insert(id, (start, end));
            index.by_type.entry(type_name).or_default().push(id);
        }
        pos = end;
    }

    index
}

/// Position just past the `;` closing an entity, skipping quoted strings
fn find_entity_end(bytes: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let offset = memchr::memchr2(b';', b'\'', &bytes[pos..])?;
        pos += offset;
        if bytes[pos] == b';' {
            return Some(pos + 1);
        }
        // Inside a string; a doubled quote is an escaped quote and simply
        // reopens the string on the next iteration.
        let close = memchr::memchr(b'\'', &bytes[pos + 1..])?;
        pos += close + 2;
    }
}

/// u32 parsing without string allocation; `None` on overflow
#[inline]
fn parse_u32(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &byte| {
        acc.checked_mul(10)?.checked_add(u32::from(byte - b'0'))
    })
}

/// Entity decoder for lazy parsing - uses Arc for efficient cache sharing
pub struct EntityDecoder<'a> {
    content: &'a str,
    /// Index of entity offsets, shared with the owning model
    index: Arc<EntityIndex>,
    /// Cache of decoded entities (entity_id -> `Arc<DecodedEntity>`)
    cache: FxHashMap<u32, Arc<DecodedEntity>>,
}

impl<'a> EntityDecoder<'a> {
    /// Create decoder over content with a pre-built index
    pub fn new(content: &'a str, index: Arc<EntityIndex>) -> Self {
        Self {
            content,
            index,
            cache: FxHashMap::default(),
        }
    }

    /// Decode entity by ID - O(1) lookup using entity index
    pub fn decode_by_id(&mut self, entity_id: u32) -> Result<Arc<DecodedEntity>> {
        if let Some(entity) = self.cache.get(&entity_id) {
            return Ok(Arc::clone(entity));
        }

        let (start, end) = self
            .index
            .get(entity_id)
            .ok_or(Error::EntityNotFound(entity_id))?;

        let (id, type_name, attributes) = parse_entity(&self.content[start..end])
            .map_err(|e| match e {
                Error::Parse { message, .. } => Error::Parse {
                    position: start,
                    message,
                },
                other => other,
            })?;

        let entity = Arc::new(DecodedEntity::new(
            id,
            &type_name.to_ascii_uppercase(),
            attributes,
        ));
        self.cache.insert(entity_id, Arc::clone(&entity));
        Ok(entity)
    }

    /// Resolve entity reference (if attribute is a ref, decode it)
    /// Returns None for null/derived values
    pub fn resolve_ref(
        &mut self,
        entity: &DecodedEntity,
        index: usize,
    ) -> Result<Option<Arc<DecodedEntity>>> {
        match entity.get_ref(index) {
            Some(id) => self.decode_by_id(id).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve a list of entity references, failing on the first missing one
    pub fn resolve_ref_list(
        &mut self,
        entity: &DecodedEntity,
        index: usize,
    ) -> Result<Vec<Arc<DecodedEntity>>> {
        entity
            .get_ref_list(index)
            .into_iter()
            .map(|id| self.decode_by_id(id))
            .collect()
    }

    /// Ids of every instance of an upper-case type name, in file order
    pub fn ids_of_type(&self, type_name: &str) -> &[u32] {
        self.index.ids_of_type(type_name)
    }

    /// Shared entity index
    pub fn index(&self) -> &Arc<EntityIndex> {
        &self.index
    }
}
