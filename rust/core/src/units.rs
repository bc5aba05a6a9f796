// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit extraction and conversion for IFC files
//!
//! Resolves the project length unit to a factor converting model coordinates
//! to metres.

use crate::decoder::EntityDecoder;
use crate::entity::DecodedEntity;
use crate::error::Result;
use crate::schema::IfcType;

/// SI prefix multipliers as defined by the IFC schema
#[inline]
pub fn get_si_prefix_multiplier(prefix: &str) -> f64 {
    match prefix {
        "ATTO" => 1e-18,
        "FEMTO" => 1e-15,
        "PICO" => 1e-12,
        "NANO" => 1e-9,
        "MICRO" => 1e-6,
        "MILLI" => 1e-3,
        "CENTI" => 1e-2,
        "DECI" => 1e-1,
        "DECA" => 1e1,
        "HECTO" => 1e2,
        "KILO" => 1e3,
        "MEGA" => 1e6,
        "GIGA" => 1e9,
        "TERA" => 1e12,
        "PETA" => 1e15,
        "EXA" => 1e18,
        _ => 1.0,
    }
}

/// Extract length unit scale factor from IFC file
///
/// Follows IFCPROJECT → IFCUNITASSIGNMENT → IFCSIUNIT / IFCCONVERSIONBASEDUNIT.
/// Anything missing along the way means metres (1.0).
pub fn extract_length_unit_scale(decoder: &mut EntityDecoder, project_id: u32) -> Result<f64> {
    let project = decoder.decode_by_id(project_id)?;
    if project.ifc_type != IfcType::IfcProject {
        return Ok(1.0);
    }

    // IFCPROJECT attribute 8: UnitsInContext
    let assignment = match decoder.resolve_ref(&project, 8)? {
        Some(entity) if entity.ifc_type == IfcType::IfcUnitAssignment => entity,
        _ => return Ok(1.0),
    };

    for unit_id in assignment.get_ref_list(0) {
        let unit = match decoder.decode_by_id(unit_id) {
            Ok(entity) => entity,
            Err(_) => continue,
        };
        if let Some(scale) = length_unit_scale(decoder, &unit)? {
            return Ok(scale);
        }
    }

    Ok(1.0)
}

/// Scale of a single unit entity if it is a length unit
fn length_unit_scale(decoder: &mut EntityDecoder, unit: &DecodedEntity) -> Result<Option<f64>> {
    // Both IFCSIUNIT and IFCCONVERSIONBASEDUNIT carry UnitType at attribute 1
    if unit.get_enum(1) != Some("LENGTHUNIT") {
        return Ok(None);
    }

    match unit.ifc_type {
        // IFCSIUNIT(Dimensions, UnitType, Prefix, Name)
        IfcType::IfcSIUnit => Ok(Some(
            unit.get_enum(2).map(get_si_prefix_multiplier).unwrap_or(1.0),
        )),
        // IFCCONVERSIONBASEDUNIT(Dimensions, UnitType, Name, ConversionFactor)
        // ConversionFactor is IFCMEASUREWITHUNIT(ValueComponent, UnitComponent)
        IfcType::IfcConversionBasedUnit => {
            let measure = match decoder.resolve_ref(unit, 3)? {
                Some(entity) if entity.ifc_type == IfcType::IfcMeasureWithUnit => entity,
                _ => return Ok(None),
            };
            let value = match measure.get_float(0) {
                Some(value) if value > 0.0 => value,
                _ => return Ok(None),
            };
            let base = match decoder.resolve_ref(&measure, 1)? {
                Some(base_unit) => match base_unit.ifc_type {
                    IfcType::IfcSIUnit => base_unit
                        .get_enum(2)
                        .map(get_si_prefix_multiplier)
                        .unwrap_or(1.0),
                    _ => 1.0,
                },
                None => 1.0,
            };
            Ok(Some(value * base))
        }
        _ => Ok(None),
    }
}
