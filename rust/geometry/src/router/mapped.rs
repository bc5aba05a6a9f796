// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapped items: shared representations instanced through a type's
//! IfcRepresentationMap.

use super::GeometryRouter;
use crate::processors::helpers::{axis2_placement_3d, transformation_operator};
use crate::{Error, Mesh, Result};
use ifc_roof_core::{DecodedEntity, EntityDecoder, IfcType};
use nalgebra::Matrix4;

impl GeometryRouter {
    /// Nesting limit for mapped items inside mapped representations
    const MAX_MAPPING_DEPTH: usize = 8;

    /// Mesh an IfcMappedItem in the coordinates of the item that uses it
    ///
    /// The mapped representation is meshed, moved by its MappingOrigin and
    /// then by the MappingTarget operator.
    pub(super) fn process_mapped_item(
        &self,
        item: &DecodedEntity,
        decoder: &mut EntityDecoder,
        depth: usize,
    ) -> Result<Mesh> {
        if depth > Self::MAX_MAPPING_DEPTH {
            return Err(Error::invalid(item.id, "mapped items nested too deeply"));
        }

        // IfcMappedItem: MappingSource (0), MappingTarget (1)
        let source = decoder
            .resolve_ref(item, 0)?
            .ok_or_else(|| Error::invalid(item.id, "missing MappingSource"))?;
        if source.ifc_type != IfcType::IfcRepresentationMap {
            return Err(Error::invalid(
                source.id,
                format!("expected IfcRepresentationMap, got {}", source.type_name),
            ));
        }

        // IfcRepresentationMap: MappingOrigin (0), MappedRepresentation (1)
        let representation = decoder
            .resolve_ref(&source, 1)?
            .ok_or_else(|| Error::invalid(source.id, "missing MappedRepresentation"))?;

        let mut mesh = Mesh::new();
        for sub_item in decoder.resolve_ref_list(&representation, 3)? {
            let result = if sub_item.ifc_type == IfcType::IfcMappedItem {
                self.process_mapped_item(&sub_item, decoder, depth + 1)
            } else {
                self.process_item(&sub_item, decoder)
            };
            match result {
                Ok(sub_mesh) => mesh.merge(&sub_mesh),
                Err(e) => tracing::debug!(
                    mapped_item = item.id,
                    item = sub_item.id,
                    error = %e,
                    "skipping mapped representation item"
                ),
            }
        }

        if mesh.is_empty() {
            return Err(Error::EmptyMesh(format!(
                "mapped item #{} has no supported geometry",
                item.id
            )));
        }

        let origin = match decoder.resolve_ref(&source, 0)? {
            Some(placement) if placement.ifc_type == IfcType::IfcAxis2Placement3D => {
                axis2_placement_3d(&placement, decoder)?
            }
            _ => Matrix4::identity(),
        };
        let target = match decoder.resolve_ref(item, 1)? {
            Some(operator) => transformation_operator(&operator, decoder)?,
            None => Matrix4::identity(),
        };

        mesh.transform(&(target * origin));
        Ok(mesh)
    }
}
