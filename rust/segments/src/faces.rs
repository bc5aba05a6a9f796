// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-face normals and areas, and the upward-facing filter.

use crate::error::{Error, Result};
use nalgebra::Vector3;

/// Normals shorter than this are treated as degenerate
const MIN_NORMAL_LENGTH: f64 = 1e-9;

/// One mesh face: unit normal, area and position in the element mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub index: usize,
    pub normal: Vector3<f64>,
    pub area: f64,
}

/// Parallel arrays of face normals and areas for one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceSet {
    normals: Vec<Vector3<f64>>,
    areas: Vec<f64>,
}

impl FaceSet {
    /// Build from explicit unit normals and areas
    pub fn new(normals: Vec<Vector3<f64>>, areas: Vec<f64>) -> Result<Self> {
        if normals.len() != areas.len() {
            return Err(Error::InvalidFaceSet(format!(
                "{} normals but {} areas",
                normals.len(),
                areas.len()
            )));
        }
        if let Some(i) = areas.iter().position(|a| !a.is_finite() || *a < 0.0) {
            return Err(Error::InvalidFaceSet(format!(
                "face {} has invalid area {}",
                i, areas[i]
            )));
        }
        Ok(Self { normals, areas })
    }

    /// Build from a triangle mesh: flat `[x, y, z, ...]` positions and
    /// counter-clockwise triangle indices
    ///
    /// Degenerate triangles keep their slot with a zero normal and zero area.
    pub fn from_triangles(positions: &[f64], indices: &[u32]) -> Result<Self> {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Err(Error::InvalidFaceSet(
                "positions and indices must come in triples".to_string(),
            ));
        }
        let vertex_count = positions.len() / 3;
        let vertex = |i: u32| -> Result<Vector3<f64>> {
            let i = i as usize;
            if i >= vertex_count {
                return Err(Error::InvalidFaceSet(format!(
                    "triangle index {} out of range ({} vertices)",
                    i, vertex_count
                )));
            }
            Ok(Vector3::new(
                positions[i * 3],
                positions[i * 3 + 1],
                positions[i * 3 + 2],
            ))
        };

        let triangle_count = indices.len() / 3;
        let mut normals = Vec::with_capacity(triangle_count);
        let mut areas = Vec::with_capacity(triangle_count);

        for t in indices.chunks_exact(3) {
            let (a, b, c) = (vertex(t[0])?, vertex(t[1])?, vertex(t[2])?);
            let cross = (b - a).cross(&(c - a));
            let length = cross.norm();
            if length > 0.0 && length.is_finite() {
                normals.push(cross / length);
                areas.push(length * 0.5);
            } else {
                normals.push(Vector3::zeros());
                areas.push(0.0);
            }
        }

        Ok(Self { normals, areas })
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    pub fn areas(&self) -> &[f64] {
        &self.areas
    }

    /// Sum of all face areas, before any filtering
    pub fn total_area(&self) -> f64 {
        self.areas.iter().sum()
    }

    /// Faces in mesh order
    pub fn iter(&self) -> impl Iterator<Item = Face> + '_ {
        self.normals
            .iter()
            .zip(&self.areas)
            .enumerate()
            .map(|(index, (normal, area))| Face {
                index,
                normal: *normal,
                area: *area,
            })
    }
}

/// Faces facing sufficiently upward, in mesh order
///
/// A face is dropped when its normal Z component is below `min_nz`, or when
/// its normal is not finite or has no length.
pub fn filter_upward_faces(faces: &FaceSet, min_nz: f64) -> Vec<Face> {
    faces
        .iter()
        .filter(|face| {
            let n = &face.normal;
            n.iter().all(|c| c.is_finite()) && n.norm() > MIN_NORMAL_LENGTH && n.z >= min_nz
        })
        .collect()
}
