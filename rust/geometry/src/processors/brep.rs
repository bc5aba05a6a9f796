// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary representation processors.
//!
//! IfcFacetedBrep, IfcShellBasedSurfaceModel and IfcFaceBasedSurfaceModel all
//! bottom out in IfcFace entities bounded by IfcPolyLoop loops.

use super::helpers::point_refs;
use crate::router::GeometryProcessor;
use crate::triangulation::triangulate_face;
use crate::{Error, Mesh, Point3, Result};
use ifc_roof_core::{DecodedEntity, EntityDecoder, IfcType};

/// Points of a face bound, reversed when its Orientation flag is `.F.`
fn bound_points(bound: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Vec<Point3<f64>>> {
    // IfcFaceBound / IfcFaceOuterBound: Bound, Orientation
    let polyloop = decoder
        .resolve_ref(bound, 0)?
        .ok_or_else(|| Error::invalid(bound.id, "face bound without loop"))?;
    if polyloop.ifc_type != IfcType::IfcPolyLoop {
        return Err(Error::Unsupported(format!("face loop type {}", polyloop.type_name)));
    }

    // IfcPolyLoop: Polygon
    let mut points = point_refs(&polyloop, 0, decoder)?;
    if bound.get(1).and_then(|v| v.as_bool()) == Some(false) {
        points.reverse();
    }
    Ok(points)
}

/// Triangulate one IfcFace into `mesh`
fn add_face(face: &DecodedEntity, decoder: &mut EntityDecoder, mesh: &mut Mesh) -> Result<()> {
    // IfcFace: Bounds
    let bounds = decoder.resolve_ref_list(face, 0)?;
    let outer_at = bounds
        .iter()
        .position(|b| b.ifc_type == IfcType::IfcFaceOuterBound)
        .unwrap_or(0);

    let mut outer = None;
    let mut holes = Vec::new();
    for (i, bound) in bounds.iter().enumerate() {
        let points = bound_points(bound, decoder)?;
        if i == outer_at {
            outer = Some(points);
        } else {
            holes.push(points);
        }
    }

    match outer {
        Some(outer) => triangulate_face(&outer, &holes, mesh),
        None => Err(Error::invalid(face.id, "face without bounds")),
    }
}

/// Triangulate every face of a connected face set (IfcClosedShell, IfcOpenShell,
/// IfcConnectedFaceSet); faces that fail are logged and skipped
fn add_face_set(shell: &DecodedEntity, decoder: &mut EntityDecoder, mesh: &mut Mesh) -> Result<()> {
    match shell.ifc_type {
        IfcType::IfcClosedShell | IfcType::IfcOpenShell | IfcType::IfcConnectedFaceSet => {}
        _ => {
            return Err(Error::invalid(
                shell.id,
                format!("expected a face set, got {}", shell.type_name),
            ))
        }
    }

    // CfsFaces
    for face in decoder.resolve_ref_list(shell, 0)? {
        if let Err(e) = add_face(&face, decoder, mesh) {
            tracing::debug!(face = face.id, error = %e, "skipping brep face");
        }
    }
    Ok(())
}

/// FacetedBrep processor
/// Handles IfcFacetedBrep - a closed shell of planar polygonal faces
#[derive(Default)]
pub struct FacetedBrepProcessor;

impl FacetedBrepProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryProcessor for FacetedBrepProcessor {
    fn process(&self, entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Mesh> {
        // IfcFacetedBrep: Outer (IfcClosedShell)
        let shell = decoder
            .resolve_ref(entity, 0)?
            .ok_or_else(|| Error::invalid(entity.id, "FacetedBrep without Outer shell"))?;
        let mut mesh = Mesh::new();
        add_face_set(&shell, decoder, &mut mesh)?;
        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcFacetedBrep]
    }
}

/// ShellBasedSurfaceModel processor
/// Handles IfcShellBasedSurfaceModel - a set of open or closed shells
#[derive(Default)]
pub struct ShellBasedSurfaceModelProcessor;

impl ShellBasedSurfaceModelProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryProcessor for ShellBasedSurfaceModelProcessor {
    fn process(&self, entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Mesh> {
        // IfcShellBasedSurfaceModel: SbsmBoundary
        let mut mesh = Mesh::new();
        for shell in decoder.resolve_ref_list(entity, 0)? {
            add_face_set(&shell, decoder, &mut mesh)?;
        }
        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcShellBasedSurfaceModel]
    }
}

/// FaceBasedSurfaceModel processor
/// Handles IfcFaceBasedSurfaceModel - a set of connected face sets
#[derive(Default)]
pub struct FaceBasedSurfaceModelProcessor;

impl FaceBasedSurfaceModelProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryProcessor for FaceBasedSurfaceModelProcessor {
    fn process(&self, entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Mesh> {
        // IfcFaceBasedSurfaceModel: FbsmFaces
        let mut mesh = Mesh::new();
        for face_set in decoder.resolve_ref_list(entity, 0)? {
            add_face_set(&face_set, decoder, &mut mesh)?;
        }
        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcFaceBasedSurfaceModel]
    }
}
