// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting 2D profiles to 3D meshes

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::profile::Profile2D;
use crate::triangulation::{signed_area_2d, triangulate_polygon_with_holes};
use nalgebra::{Point3, Vector3};

/// Extrude a profile lying in the local XY plane along `direction * depth`
///
/// The profile must be normalized (outer counter-clockwise, holes clockwise).
/// Caps and walls face outward; a direction pointing below the profile
/// plane flips every triangle so the solid stays outward-facing.
pub fn extrude_profile(profile: &Profile2D, depth: f64, direction: Vector3<f64>) -> Result<Mesh> {
    if !(depth.is_finite() && depth > 0.0) {
        return Err(Error::InvalidExtrusion(format!(
            "depth must be positive, got {}",
            depth
        )));
    }
    let direction = direction
        .try_normalize(1e-12)
        .ok_or_else(|| Error::InvalidExtrusion("zero extrusion direction".to_string()))?;
    if direction.z.abs() < 1e-9 {
        return Err(Error::InvalidExtrusion(
            "extrusion direction lies in the profile plane".to_string(),
        ));
    }

    let offset = direction * depth;
    let indices = triangulate_polygon_with_holes(&profile.outer, &profile.holes)?;
    let points: Vec<_> = profile
        .outer
        .iter()
        .chain(profile.holes.iter().flatten())
        .copied()
        .collect();

    let n = points.len() as u32;
    let mut mesh = Mesh::with_capacity(points.len() * 4, indices.len() * 2 + points.len() * 6);

    // Bottom cap vertices [0, n), top cap vertices [n, 2n)
    for p in &points {
        mesh.add_vertex(Point3::new(p.x, p.y, 0.0));
    }
    for p in &points {
        mesh.add_vertex(Point3::new(p.x, p.y, 0.0) + offset);
    }

    for t in indices.chunks_exact(3) {
        let (a, b, c) = (t[0], t[1], t[2]);
        let area = signed_area_2d(&points[a], &points[b], &points[c]);
        if area == 0.0 {
            continue;
        }
        let (a, b, c) = if area > 0.0 { (a, b, c) } else { (a, c, b) };
        let (a, b, c) = (a as u32, b as u32, c as u32);
        // Top faces +Z, bottom faces -Z
        mesh.add_triangle(n + a, n + b, n + c);
        mesh.add_triangle(a, c, b);
    }

    let mut ring_start = 0u32;
    for ring in std::iter::once(&profile.outer).chain(profile.holes.iter()) {
        let len = ring.len() as u32;
        for i in 0..len {
            let b0 = ring_start + i;
            let b1 = ring_start + (i + 1) % len;
            mesh.add_triangle(b0, b1, n + b1);
            mesh.add_triangle(b0, n + b1, n + b0);
        }
        ring_start += len;
    }

    if direction.z < 0.0 {
        mesh.reverse_winding();
    }

    Ok(mesh)
}
