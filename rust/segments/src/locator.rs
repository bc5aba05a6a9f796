// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Discovery of the elements that carry roof geometry

use crate::element::{BuildingModel, ElementRef};
use crate::error::Result;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

/// Roof elements to mesh, in discovery order without duplicates
///
/// A roof with aggregated parts is replaced by its direct children. Slabs
/// tagged as roof that were not reached through a roof are appended.
pub fn locate_roof_elements<M: BuildingModel + ?Sized>(model: &M) -> Result<Vec<ElementRef>> {
    let mut seen = FxHashSet::default();
    let mut elements = Vec::new();
    let mut push = |element: ElementRef, elements: &mut Vec<ElementRef>| {
        if seen.insert(element.id) {
            elements.push(element);
        }
    };

    for roof in model.roofs()? {
        let children = model.aggregated_children(&roof)?;
        if children.is_empty() {
            debug!(id = roof.id, "roof has no parts, using it directly");
            push(roof, &mut elements);
        } else {
            debug!(id = roof.id, parts = children.len(), "roof decomposed into parts");
            for child in children {
                push(child, &mut elements);
            }
        }
    }

    for slab in model.roof_slabs()? {
        push(slab, &mut elements);
    }

    if elements.is_empty() {
        warn!("no roof elements found in model");
    } else {
        info!(count = elements.len(), "found roof elements");
    }

    Ok(elements)
}
