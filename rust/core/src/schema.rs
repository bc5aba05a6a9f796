// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema Types
//!
//! The subset of IFC entity types the roof pipeline inspects. Anything else
//! decodes as [`IfcType::Unknown`] and keeps its raw name on the entity.

use std::fmt;

/// IFC Entity Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfcType {
    // Elements that can carry roof geometry
    IfcRoof,
    IfcSlab,
    IfcSlabStandardCase,
    IfcSlabElementedCase,
    IfcCovering,
    IfcPlate,
    IfcMember,
    IfcBuildingElementProxy,

    // Project and units
    IfcProject,
    IfcUnitAssignment,
    IfcSIUnit,
    IfcConversionBasedUnit,
    IfcMeasureWithUnit,

    // Relationships
    IfcRelAggregates,
    IfcRelDefinesByProperties,
    IfcRelDefinesByType,

    // Properties
    IfcPropertySet,
    IfcPropertySingleValue,
    IfcElementQuantity,
    IfcQuantityArea,

    // Placement
    IfcLocalPlacement,
    IfcAxis2Placement3D,
    IfcAxis2Placement2D,
    IfcCartesianPoint,
    IfcDirection,

    // Representation
    IfcProductDefinitionShape,
    IfcShapeRepresentation,
    IfcMappedItem,
    IfcRepresentationMap,
    IfcCartesianTransformationOperator3D,
    IfcCartesianTransformationOperator3DnonUniform,

    // Tessellated geometry
    IfcTriangulatedFaceSet,
    IfcPolygonalFaceSet,
    IfcIndexedPolygonalFace,
    IfcIndexedPolygonalFaceWithVoids,
    IfcCartesianPointList3D,

    // Boundary representations
    IfcFacetedBrep,
    IfcClosedShell,
    IfcOpenShell,
    IfcConnectedFaceSet,
    IfcFace,
    IfcFaceOuterBound,
    IfcFaceBound,
    IfcPolyLoop,
    IfcShellBasedSurfaceModel,
    IfcFaceBasedSurfaceModel,

    // Swept solids and profiles
    IfcExtrudedAreaSolid,
    IfcRectangleProfileDef,
    IfcArbitraryClosedProfileDef,
    IfcArbitraryProfileDefWithVoids,
    IfcPolyline,
    IfcIndexedPolyCurve,
    IfcCartesianPointList2D,
    IfcCompositeCurve,
    IfcCompositeCurveSegment,

    // Booleans
    IfcBooleanResult,
    IfcBooleanClippingResult,

    // Fallback for unknown types
    Unknown(u16), // Store hash for unknown types
}

impl IfcType {
    /// Parse IFC type from an upper-case STEP type name
    pub fn from_name(s: &str) -> Self {
        match s {
            "IFCROOF" => Self::IfcRoof,
            "IFCSLAB" => Self::IfcSlab,
            "IFCSLABSTANDARDCASE" => Self::IfcSlabStandardCase,
            "IFCSLABELEMENTEDCASE" => Self::IfcSlabElementedCase,
            "IFCCOVERING" => Self::IfcCovering,
            "IFCPLATE" => Self::IfcPlate,
            "IFCMEMBER" => Self::IfcMember,
            "IFCBUILDINGELEMENTPROXY" => Self::IfcBuildingElementProxy,

            "IFCPROJECT" => Self::IfcProject,
            "IFCUNITASSIGNMENT" => Self::IfcUnitAssignment,
            "IFCSIUNIT" => Self::IfcSIUnit,
            "IFCCONVERSIONBASEDUNIT" => Self::IfcConversionBasedUnit,
            "IFCMEASUREWITHUNIT" => Self::IfcMeasureWithUnit,

            "IFCRELAGGREGATES" => Self::IfcRelAggregates,
            "IFCRELDEFINESBYPROPERTIES" => Self::IfcRelDefinesByProperties,
            "IFCRELDEFINESBYTYPE" => Self::IfcRelDefinesByType,

            "IFCPROPERTYSET" => Self::IfcPropertySet,
            "IFCPROPERTYSINGLEVALUE" => Self::IfcPropertySingleValue,
            "IFCELEMENTQUANTITY" => Self::IfcElementQuantity,
            "IFCQUANTITYAREA" => Self::IfcQuantityArea,

            "IFCLOCALPLACEMENT" => Self::IfcLocalPlacement,
            "IFCAXIS2PLACEMENT3D" => Self::IfcAxis2Placement3D,
            "IFCAXIS2PLACEMENT2D" => Self::IfcAxis2Placement2D,
            "IFCCARTESIANPOINT" => Self::IfcCartesianPoint,
            "IFCDIRECTION" => Self::IfcDirection,

            "IFCPRODUCTDEFINITIONSHAPE" => Self::IfcProductDefinitionShape,
            "IFCSHAPEREPRESENTATION" => Self::IfcShapeRepresentation,
            "IFCMAPPEDITEM" => Self::IfcMappedItem,
            "IFCREPRESENTATIONMAP" => Self::IfcRepresentationMap,
            "IFCCARTESIANTRANSFORMATIONOPERATOR3D" => Self::IfcCartesianTransformationOperator3D,
            "IFCCARTESIANTRANSFORMATIONOPERATOR3DNONUNIFORM" => {
                Self::IfcCartesianTransformationOperator3DnonUniform
            }

            "IFCTRIANGULATEDFACESET" => Self::IfcTriangulatedFaceSet,
            "IFCPOLYGONALFACESET" => Self::IfcPolygonalFaceSet,
            "IFCINDEXEDPOLYGONALFACE" => Self::IfcIndexedPolygonalFace,
            "IFCINDEXEDPOLYGONALFACEWITHVOIDS" => Self::IfcIndexedPolygonalFaceWithVoids,
            "IFCCARTESIANPOINTLIST3D" => Self::IfcCartesianPointList3D,

            "IFCFACETEDBREP" => Self::IfcFacetedBrep,
            "IFCCLOSEDSHELL" => Self::IfcClosedShell,
            "IFCOPENSHELL" => Self::IfcOpenShell,
            "IFCCONNECTEDFACESET" => Self::IfcConnectedFaceSet,
            "IFCFACE" => Self::IfcFace,
            "IFCFACEOUTERBOUND" => Self::IfcFaceOuterBound,
            "IFCFACEBOUND" => Self::IfcFaceBound,
            "IFCPOLYLOOP" => Self::IfcPolyLoop,
            "IFCSHELLBASEDSURFACEMODEL" => Self::IfcShellBasedSurfaceModel,
            "IFCFACEBASEDSURFACEMODEL" => Self::IfcFaceBasedSurfaceModel,

            "IFCEXTRUDEDAREASOLID" => Self::IfcExtrudedAreaSolid,
            "IFCRECTANGLEPROFILEDEF" => Self::IfcRectangleProfileDef,
            "IFCARBITRARYCLOSEDPROFILEDEF" => Self::IfcArbitraryClosedProfileDef,
            "IFCARBITRARYPROFILEDEFWITHVOIDS" => Self::IfcArbitraryProfileDefWithVoids,
            "IFCPOLYLINE" => Self::IfcPolyline,
            "IFCINDEXEDPOLYCURVE" => Self::IfcIndexedPolyCurve,
            "IFCCARTESIANPOINTLIST2D" => Self::IfcCartesianPointList2D,
            "IFCCOMPOSITECURVE" => Self::IfcCompositeCurve,
            "IFCCOMPOSITECURVESEGMENT" => Self::IfcCompositeCurveSegment,

            "IFCBOOLEANRESULT" => Self::IfcBooleanResult,
            "IFCBOOLEANCLIPPINGRESULT" => Self::IfcBooleanClippingResult,

            _ => Self::Unknown(simple_hash(s)),
        }
    }

    /// Get the upper-case STEP name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IfcRoof => "IFCROOF",
            Self::IfcSlab => "IFCSLAB",
            Self::IfcSlabStandardCase => "IFCSLABSTANDARDCASE",
            Self::IfcSlabElementedCase => "IFCSLABELEMENTEDCASE",
            Self::IfcCovering => "IFCCOVERING",
            Self::IfcPlate => "IFCPLATE",
            Self::IfcMember => "IFCMEMBER",
            Self::IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",

            Self::IfcProject => "IFCPROJECT",
            Self::IfcUnitAssignment => "IFCUNITASSIGNMENT",
            Self::IfcSIUnit => "IFCSIUNIT",
            Self::IfcConversionBasedUnit => "IFCCONVERSIONBASEDUNIT",
            Self::IfcMeasureWithUnit => "IFCMEASUREWITHUNIT",

            Self::IfcRelAggregates => "IFCRELAGGREGATES",
            Self::IfcRelDefinesByProperties => "IFCRELDEFINESBYPROPERTIES",
            Self::IfcRelDefinesByType => "IFCRELDEFINESBYTYPE",

            Self::IfcPropertySet => "IFCPROPERTYSET",
            Self::IfcPropertySingleValue => "IFCPROPERTYSINGLEVALUE",
            Self::IfcElementQuantity => "IFCELEMENTQUANTITY",
            Self::IfcQuantityArea => "IFCQUANTITYAREA",

            Self::IfcLocalPlacement => "IFCLOCALPLACEMENT",
            Self::IfcAxis2Placement3D => "IFCAXIS2PLACEMENT3D",
            Self::IfcAxis2Placement2D => "IFCAXIS2PLACEMENT2D",
            Self::IfcCartesianPoint => "IFCCARTESIANPOINT",
            Self::IfcDirection => "IFCDIRECTION",

            Self::IfcProductDefinitionShape => "IFCPRODUCTDEFINITIONSHAPE",
            Self::IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",
            Self::IfcMappedItem => "IFCMAPPEDITEM",
            Self::IfcRepresentationMap => "IFCREPRESENTATIONMAP",
            Self::IfcCartesianTransformationOperator3D => "IFCCARTESIANTRANSFORMATIONOPERATOR3D",
            Self::IfcCartesianTransformationOperator3DnonUniform => {
                "IFCCARTESIANTRANSFORMATIONOPERATOR3DNONUNIFORM"
            }

            Self::IfcTriangulatedFaceSet => "IFCTRIANGULATEDFACESET",
            Self::IfcPolygonalFaceSet => "IFCPOLYGONALFACESET",
            Self::IfcIndexedPolygonalFace => "IFCINDEXEDPOLYGONALFACE",
            Self::IfcIndexedPolygonalFaceWithVoids => "IFCINDEXEDPOLYGONALFACEWITHVOIDS",
            Self::IfcCartesianPointList3D => "IFCCARTESIANPOINTLIST3D",

            Self::IfcFacetedBrep => "IFCFACETEDBREP",
            Self::IfcClosedShell => "IFCCLOSEDSHELL",
            Self::IfcOpenShell => "IFCOPENSHELL",
            Self::IfcConnectedFaceSet => "IFCCONNECTEDFACESET",
            Self::IfcFace => "IFCFACE",
            Self::IfcFaceOuterBound => "IFCFACEOUTERBOUND",
            Self::IfcFaceBound => "IFCFACEBOUND",
            Self::IfcPolyLoop => "IFCPOLYLOOP",
            Self::IfcShellBasedSurfaceModel => "IFCSHELLBASEDSURFACEMODEL",
            Self::IfcFaceBasedSurfaceModel => "IFCFACEBASEDSURFACEMODEL",

            Self::IfcExtrudedAreaSolid => "IFCEXTRUDEDAREASOLID",
            Self::IfcRectangleProfileDef => "IFCRECTANGLEPROFILEDEF",
            Self::IfcArbitraryClosedProfileDef => "IFCARBITRARYCLOSEDPROFILEDEF",
            Self::IfcArbitraryProfileDefWithVoids => "IFCARBITRARYPROFILEDEFWITHVOIDS",
            Self::IfcPolyline => "IFCPOLYLINE",
            Self::IfcIndexedPolyCurve => "IFCINDEXEDPOLYCURVE",
            Self::IfcCartesianPointList2D => "IFCCARTESIANPOINTLIST2D",
            Self::IfcCompositeCurve => "IFCCOMPOSITECURVE",
            Self::IfcCompositeCurveSegment => "IFCCOMPOSITECURVESEGMENT",

            Self::IfcBooleanResult => "IFCBOOLEANRESULT",
            Self::IfcBooleanClippingResult => "IFCBOOLEANCLIPPINGRESULT",

            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// Schema spelling of the building element types (`IfcSlab`, `IfcRoof`...)
    ///
    /// Returns `None` for types that are not building elements.
    pub fn element_name(&self) -> Option<&'static str> {
        match self {
            Self::IfcRoof => Some("IfcRoof"),
            Self::IfcSlab => Some("IfcSlab"),
            Self::IfcSlabStandardCase => Some("IfcSlabStandardCase"),
            Self::IfcSlabElementedCase => Some("IfcSlabElementedCase"),
            Self::IfcCovering => Some("IfcCovering"),
            Self::IfcPlate => Some("IfcPlate"),
            Self::IfcMember => Some("IfcMember"),
            Self::IfcBuildingElementProxy => Some("IfcBuildingElementProxy"),
            _ => None,
        }
    }

    /// `IfcSlab` and its IFC4 subtypes
    pub const SLABS: [IfcType; 3] = [
        Self::IfcSlab,
        Self::IfcSlabStandardCase,
        Self::IfcSlabElementedCase,
    ];

    /// Check if this is a building element that can carry roof geometry
    pub fn is_building_element(&self) -> bool {
        self.element_name().is_some()
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Simple hash function for unknown IFC types
fn simple_hash(s: &str) -> u16 {
    let mut hash: u32 = 5381;
    for byte in s.bytes() {
        hash = ((hash << 5).wrapping_add(hash)).wrapping_add(byte as u32);
    }
    (hash & 0xFFFF) as u16
}
