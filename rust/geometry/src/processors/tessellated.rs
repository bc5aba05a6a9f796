// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellated geometry processors - pre-tessellated/polygon meshes.
//!
//! Handles IfcTriangulatedFaceSet (explicit triangle meshes) and
//! IfcPolygonalFaceSet (polygon meshes requiring triangulation).

use super::helpers::{coordinate_list, index_tuple};
use crate::router::GeometryProcessor;
use crate::triangulation::triangulate_face;
use crate::{Error, Mesh, Point3, Result};
use ifc_roof_core::{DecodedEntity, EntityDecoder, IfcType};

/// Coordinates of an IfcCartesianPointList3D referenced at `index`
fn point_list(
    entity: &DecodedEntity,
    index: usize,
    decoder: &mut EntityDecoder,
) -> Result<Vec<Point3<f64>>> {
    let list = decoder
        .resolve_ref(entity, index)?
        .ok_or_else(|| Error::invalid(entity.id, "missing Coordinates"))?;
    if list.ifc_type != IfcType::IfcCartesianPointList3D {
        return Err(Error::invalid(
            list.id,
            format!("expected IfcCartesianPointList3D, got {}", list.type_name),
        ));
    }
    // IfcCartesianPointList3D: CoordList
    coordinate_list(&list, 0)
}

/// Optional PnIndex remapping list, 0-based
fn pn_index(entity: &DecodedEntity, index: usize) -> Result<Option<Vec<usize>>> {
    match entity.get(index) {
        Some(value) if !value.is_null() => index_tuple(value, entity.id).map(Some),
        _ => Ok(None),
    }
}

/// Map a 0-based face index through PnIndex and bounds-check it
fn resolve_point(
    index: usize,
    pn: Option<&[usize]>,
    points: &[Point3<f64>],
    id: u32,
) -> Result<Point3<f64>> {
    let index = match pn {
        Some(pn) => *pn
            .get(index)
            .ok_or_else(|| Error::invalid(id, format!("PnIndex has no entry {}", index + 1)))?,
        None => index,
    };
    points
        .get(index)
        .copied()
        .ok_or_else(|| Error::invalid(id, format!("coordinate index {} out of range", index + 1)))
}

/// TriangulatedFaceSet processor
/// Handles IfcTriangulatedFaceSet - explicit triangle meshes
#[derive(Default)]
pub struct TriangulatedFaceSetProcessor;

impl TriangulatedFaceSetProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryProcessor for TriangulatedFaceSetProcessor {
    fn process(&self, entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Mesh> {
        // IfcTriangulatedFaceSet attributes:
        // 0: Coordinates (IfcCartesianPointList3D)
        // 1: Normals (optional)
        // 2: Closed (optional)
        // 3: CoordIndex (list of list of IfcPositiveInteger)
        // 4: PnIndex (optional)
        let points = point_list(entity, 0, decoder)?;
        let pn = pn_index(entity, 4)?;
        let triangles = entity
            .get_list(3)
            .ok_or_else(|| Error::invalid(entity.id, "missing CoordIndex"))?;

        let mut mesh = Mesh::with_capacity(triangles.len() * 3, triangles.len() * 3);
        for triangle in triangles {
            let corners = index_tuple(triangle, entity.id)?;
            if corners.len() != 3 {
                return Err(Error::invalid(entity.id, "CoordIndex entries must be triples"));
            }
            let mut vertex_ids = [0u32; 3];
            for (slot, &corner) in vertex_ids.iter_mut().zip(&corners) {
                *slot = mesh.add_vertex(resolve_point(corner, pn.as_deref(), &points, entity.id)?);
            }
            mesh.add_triangle(vertex_ids[0], vertex_ids[1], vertex_ids[2]);
        }

        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcTriangulatedFaceSet]
    }
}

/// PolygonalFaceSet processor
/// Handles IfcPolygonalFaceSet - indexed polygons, optionally with voids
#[derive(Default)]
pub struct PolygonalFaceSetProcessor;

impl PolygonalFaceSetProcessor {
    pub fn new() -> Self {
        Self
    }

    fn face_loop(
        value: &ifc_roof_core::AttributeValue,
        pn: Option<&[usize]>,
        points: &[Point3<f64>],
        id: u32,
    ) -> Result<Vec<Point3<f64>>> {
        index_tuple(value, id)?
            .into_iter()
            .map(|i| resolve_point(i, pn, points, id))
            .collect()
    }
}

impl GeometryProcessor for PolygonalFaceSetProcessor {
    fn process(&self, entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Mesh> {
        // IfcPolygonalFaceSet attributes:
        // 0: Coordinates, 1: Closed, 2: Faces, 3: PnIndex
        let points = point_list(entity, 0, decoder)?;
        let pn = pn_index(entity, 3)?;
        let faces = decoder.resolve_ref_list(entity, 2)?;

        let mut mesh = Mesh::new();
        for face in faces {
            // IfcIndexedPolygonalFace: CoordIndex
            // IfcIndexedPolygonalFaceWithVoids: CoordIndex, InnerCoordIndices
            let outer_value = match face.ifc_type {
                IfcType::IfcIndexedPolygonalFace | IfcType::IfcIndexedPolygonalFaceWithVoids => face
                    .get(0)
                    .ok_or_else(|| Error::invalid(face.id, "missing CoordIndex"))?,
                _ => {
                    return Err(Error::invalid(
                        face.id,
                        format!("unexpected face type {}", face.type_name),
                    ))
                }
            };
            let outer = Self::face_loop(outer_value, pn.as_deref(), &points, face.id)?;

            let mut holes = Vec::new();
            if face.ifc_type == IfcType::IfcIndexedPolygonalFaceWithVoids {
                for inner in face.get_list(1).unwrap_or(&[]) {
                    holes.push(Self::face_loop(inner, pn.as_deref(), &points, face.id)?);
                }
            }

            if let Err(e) = triangulate_face(&outer, &holes, &mut mesh) {
                tracing::debug!(face = face.id, error = %e, "skipping polygonal face");
            }
        }

        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcPolygonalFaceSet]
    }
}
