// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement resolution: IfcLocalPlacement chains to a world transform.

use super::GeometryRouter;
use crate::processors::helpers::axis2_placement_3d;
use crate::Result;
use ifc_roof_core::{DecodedEntity, EntityDecoder, IfcType};
use nalgebra::Matrix4;

impl GeometryRouter {
    /// Depth limit for placement chains, guarding against cycles in malformed files
    const MAX_PLACEMENT_DEPTH: usize = 100;

    /// World transform of an element's ObjectPlacement (attribute 5)
    pub fn element_placement(
        &self,
        element: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Matrix4<f64>> {
        match decoder.resolve_ref(element, 5)? {
            Some(placement) => self.placement_transform(&placement, decoder, 0),
            None => Ok(Matrix4::identity()),
        }
    }

    /// Recursively resolve an IfcLocalPlacement: parent * relative
    fn placement_transform(
        &self,
        placement: &DecodedEntity,
        decoder: &mut EntityDecoder,
        depth: usize,
    ) -> Result<Matrix4<f64>> {
        if depth > Self::MAX_PLACEMENT_DEPTH || placement.ifc_type != IfcType::IfcLocalPlacement {
            return Ok(Matrix4::identity());
        }

        // IfcLocalPlacement: PlacementRelTo, RelativePlacement
        let parent = match decoder.resolve_ref(placement, 0)? {
            Some(parent) => self.placement_transform(&parent, decoder, depth + 1)?,
            None => Matrix4::identity(),
        };

        let local = match decoder.resolve_ref(placement, 1)? {
            Some(relative) if relative.ifc_type == IfcType::IfcAxis2Placement3D => {
                axis2_placement_3d(&relative, decoder)?
            }
            _ => Matrix4::identity(),
        };

        Ok(parent * local)
    }
}
