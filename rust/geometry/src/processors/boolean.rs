// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BooleanClipping processor.
//!
//! Handles IfcBooleanResult and IfcBooleanClippingResult by meshing the first
//! operand only. Roof slabs are commonly clipped by half spaces at eaves and
//! ridges; the upward faces of the unclipped operand keep the same
//! orientation, so only areas near the cut are overstated.

use super::brep::FacetedBrepProcessor;
use super::extrusion::ExtrudedAreaSolidProcessor;
use super::tessellated::{PolygonalFaceSetProcessor, TriangulatedFaceSetProcessor};
use crate::router::GeometryProcessor;
use crate::{Error, Mesh, Result};
use ifc_roof_core::{DecodedEntity, EntityDecoder, IfcType};

/// Maximum nesting of boolean results before giving up
const MAX_BOOLEAN_DEPTH: u32 = 20;

/// BooleanResult processor
#[derive(Default)]
pub struct BooleanClippingProcessor;

impl BooleanClippingProcessor {
    pub fn new() -> Self {
        Self
    }

    fn process_with_depth(
        &self,
        entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
        depth: u32,
    ) -> Result<Mesh> {
        if depth > MAX_BOOLEAN_DEPTH {
            return Err(Error::invalid(entity.id, "boolean nesting too deep"));
        }

        // IfcBooleanResult: Operator, FirstOperand, SecondOperand
        let operator = entity.get_enum(0).unwrap_or("DIFFERENCE");
        let first = decoder
            .resolve_ref(entity, 1)?
            .ok_or_else(|| Error::invalid(entity.id, "missing FirstOperand"))?;

        tracing::debug!(
            id = entity.id,
            operator,
            operand = %first.type_name,
            "using first boolean operand only"
        );

        match first.ifc_type {
            IfcType::IfcExtrudedAreaSolid => ExtrudedAreaSolidProcessor::new().process(&first, decoder),
            IfcType::IfcFacetedBrep => FacetedBrepProcessor::new().process(&first, decoder),
            IfcType::IfcTriangulatedFaceSet => {
                TriangulatedFaceSetProcessor::new().process(&first, decoder)
            }
            IfcType::IfcPolygonalFaceSet => PolygonalFaceSetProcessor::new().process(&first, decoder),
            IfcType::IfcBooleanResult | IfcType::IfcBooleanClippingResult => {
                self.process_with_depth(&first, decoder, depth + 1)
            }
            _ => Err(Error::Unsupported(format!(
                "boolean operand type {}",
                first.type_name
            ))),
        }
    }
}

impl GeometryProcessor for BooleanClippingProcessor {
    fn process(&self, entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Mesh> {
        self.process_with_depth(entity, decoder, 0)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcBooleanResult, IfcType::IfcBooleanClippingResult]
    }
}
