// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ExtrudedAreaSolid processor - extrusion of 2D profiles.

use super::helpers::{axis2_placement_3d, optional_direction};
use crate::extrusion::extrude_profile;
use crate::profile::parse_profile;
use crate::router::GeometryProcessor;
use crate::{Error, Mesh, Result, Vector3};
use ifc_roof_core::{DecodedEntity, EntityDecoder, IfcType};

/// ExtrudedAreaSolid processor
/// Handles IfcExtrudedAreaSolid - extrusion of 2D profiles
#[derive(Default)]
pub struct ExtrudedAreaSolidProcessor;

impl ExtrudedAreaSolidProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryProcessor for ExtrudedAreaSolidProcessor {
    fn process(&self, entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Mesh> {
        // IfcExtrudedAreaSolid attributes:
        // 0: SweptArea (IfcProfileDef)
        // 1: Position (IfcAxis2Placement3D, optional in IFC4)
        // 2: ExtrudedDirection (IfcDirection)
        // 3: Depth (IfcPositiveLengthMeasure)
        let profile_entity = decoder
            .resolve_ref(entity, 0)?
            .ok_or_else(|| Error::invalid(entity.id, "missing SweptArea"))?;
        let profile = parse_profile(&profile_entity, decoder)?;

        let direction = optional_direction(entity, 2, decoder, Vector3::z())?;
        let depth = entity
            .get_float(3)
            .ok_or_else(|| Error::invalid(entity.id, "missing Depth"))?;

        let mut mesh = extrude_profile(&profile, depth, direction)?;

        if let Some(position) = decoder.resolve_ref(entity, 1)? {
            let transform = axis2_placement_3d(&position, decoder)?;
            mesh.transform(&transform);
        }

        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcExtrudedAreaSolid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ifc_roof_core::build_entity_index;
    use std::sync::Arc;

    fn process(content: &str, id: u32) -> Result<Mesh> {
        let index = Arc::new(build_entity_index(content, 0));
        let mut decoder = EntityDecoder::new(content, index);
        let entity = decoder.decode_by_id(id)?;
        ExtrudedAreaSolidProcessor::new().process(&entity, &mut decoder)
    }

    #[test]
    fn test_rectangle_slab_rotated_to_slope() {
        // 4 x 3 rectangle, 0.2 thick, local Z tilted 30 degrees towards -Y
        let content = "#1=IFCCARTESIANPOINT((0.,0.,10.));\
            #2=IFCDIRECTION((0.,-0.5,0.8660254037844386));\
            #3=IFCDIRECTION((1.,0.,0.));\
            #4=IFCAXIS2PLACEMENT3D(#1,#2,#3);\
            #5=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,4.,3.);\
            #6=IFCDIRECTION((0.,0.,1.));\
            #7=IFCEXTRUDEDAREASOLID(#5,#4,#6,0.2);";
        let mesh = process(content, 7).unwrap();

        let mut top_area = 0.0;
        for [a, b, c] in mesh.triangles() {
            let cross = (b - a).cross(&(c - a));
            let normal = cross.normalize();
            if normal.z > 0.8 {
                assert_relative_eq!(normal.y, -0.5, epsilon = 1e-9);
                top_area += cross.norm() * 0.5;
            }
            assert!(a.z > 8.0);
        }
        assert_relative_eq!(top_area, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_polyline_profile_with_void() {
        let content = "#1=IFCCARTESIANPOINT((0.,0.));\
            #2=IFCCARTESIANPOINT((5.,0.));\
            #3=IFCCARTESIANPOINT((5.,5.));\
            #4=IFCCARTESIANPOINT((0.,5.));\
            #5=IFCPOLYLINE((#1,#2,#3,#4,#1));\
            #11=IFCCARTESIANPOINT((1.,1.));\
            #12=IFCCARTESIANPOINT((2.,1.));\
            #13=IFCCARTESIANPOINT((2.,2.));\
            #14=IFCCARTESIANPOINT((1.,2.));\
            #15=IFCPOLYLINE((#11,#12,#13,#14,#11));\
            #20=IFCARBITRARYPROFILEDEFWITHVOIDS(.AREA.,$,#5,(#15));\
            #21=IFCEXTRUDEDAREASOLID(#20,$,$,1.);";
        let mesh = process(content, 21).unwrap();

        let up: f64 = mesh
            .triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)))
            .filter(|n| n.z > 0.0 && n.normalize().z > 0.99)
            .map(|n| n.norm() * 0.5)
            .sum();
        assert_relative_eq!(up, 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unsupported_profile() {
        let content = "#1=IFCCIRCLEPROFILEDEF(.AREA.,$,$,1.);\
            #2=IFCEXTRUDEDAREASOLID(#1,$,$,1.);";
        assert!(matches!(process(content, 2), Err(Error::Unsupported(_))));
    }
}
