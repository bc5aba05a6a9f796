// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Wrapper around earcutr for 2D polygon triangulation, plus the planar
//! projection used to triangulate 3D face loops.

use crate::{Error, Mesh, Point2, Point3, Result, Vector3};

/// Squared length below which a Newell normal counts as degenerate
const DEGENERATE_NORMAL_SQ: f64 = 1e-20;

/// Check if a polygon is convex (all cross products have same sign)
#[inline]
fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() > 1e-10 {
            let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
            if sign == 0 {
                sign = current_sign;
            } else if sign != current_sign {
                return false;
            }
        }
    }

    true
}

/// Simple fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.extend_from_slice(&[0, i, i + 1]);
    }
    indices
}

/// Twice the signed area of a 2D triangle (positive when counter-clockwise)
#[inline]
pub fn signed_area_2d(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Signed area of a closed 2D ring (positive when counter-clockwise)
pub fn ring_area_2d(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (p, q) = (&points[i], &points[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<f64>()
        * 0.5
}

/// Triangulate a simple polygon (no holes)
/// Returns triangle indices into the input points
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();

    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    if n == 3 {
        return Ok(vec![0, 1, 2]);
    }

    if n <= 8 && is_convex(points) {
        return Ok(fan_triangulate(n));
    }

    let vertices: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    earcutr::earcut(&vertices, &[], 2).map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

/// Triangulate a polygon with holes
/// Returns triangle indices into the combined vertex array (outer + all holes)
pub fn triangulate_polygon_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points in outer boundary".to_string(),
        ));
    }

    if holes.is_empty() {
        return triangulate_polygon(outer);
    }

    let total_points = outer.len() + holes.iter().map(Vec::len).sum::<usize>();
    let mut vertices = Vec::with_capacity(total_points * 2);
    vertices.extend(outer.iter().flat_map(|p| [p.x, p.y]));

    let mut hole_indices = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_indices.push(vertices.len() / 2);
        vertices.extend(hole.iter().flat_map(|p| [p.x, p.y]));
    }

    earcutr::earcut(&vertices, &hole_indices, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

/// Calculate the normal of a polygon from its vertices using Newell's method
///
/// The direction follows the loop orientation (counter-clockwise seen from
/// the tip of the normal). Returns `None` for collinear or repeated points.
pub fn polygon_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    if normal.norm_squared() > DEGENERATE_NORMAL_SQ {
        Some(normal.normalize())
    } else {
        None
    }
}

/// Orthonormal in-plane axes `(u, v)` with `u × v = normal`
fn plane_basis(normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    // Axis least parallel to the normal for a stable cross product
    let reference = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
        Vector3::x()
    } else if normal.y.abs() <= normal.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };

    let u_axis = normal.cross(&reference).normalize();
    let v_axis = normal.cross(&u_axis).normalize();
    (u_axis, v_axis)
}

/// Project 3D points into the plane basis of `normal`
pub fn project_to_2d(
    points: &[Point3<f64>],
    origin: &Point3<f64>,
    normal: &Vector3<f64>,
) -> Vec<Point2<f64>> {
    let (u_axis, v_axis) = plane_basis(normal);
    points
        .iter()
        .map(|p| {
            let v = p - origin;
            Point2::new(v.dot(&u_axis), v.dot(&v_axis))
        })
        .collect()
}

/// Drop repeated consecutive points and an explicit closing point
pub fn clean_loop(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    const EPS_SQ: f64 = 1e-18;
    let mut cleaned: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if cleaned
            .last()
            .map_or(true, |last| (p - last).norm_squared() > EPS_SQ)
        {
            cleaned.push(*p);
        }
    }
    while cleaned.len() > 1 {
        let closing = (cleaned[0] - cleaned[cleaned.len() - 1]).norm_squared() <= EPS_SQ;
        if !closing {
            break;
        }
        cleaned.pop();
    }
    cleaned
}

/// Triangulate a planar 3D face (outer loop plus optional holes) into `mesh`
///
/// Output triangles face the same way as the outer loop's Newell normal,
/// whatever the orientation of the hole loops.
pub fn triangulate_face(
    outer: &[Point3<f64>],
    holes: &[Vec<Point3<f64>>],
    mesh: &mut Mesh,
) -> Result<()> {
    let outer = clean_loop(outer);
    let normal = polygon_normal(&outer).ok_or_else(|| {
        Error::TriangulationError("Degenerate face loop (no area)".to_string())
    })?;

    let origin = outer[0];
    let outer_2d = project_to_2d(&outer, &origin, &normal);

    let mut vertices = outer.clone();
    let mut holes_2d = Vec::with_capacity(holes.len());
    for hole in holes {
        let hole = clean_loop(hole);
        if hole.len() < 3 {
            continue;
        }
        holes_2d.push(project_to_2d(&hole, &origin, &normal));
        vertices.extend(hole);
    }

    let indices = triangulate_polygon_with_holes(&outer_2d, &holes_2d)?;
    let points_2d: Vec<Point2<f64>> = outer_2d
        .into_iter()
        .chain(holes_2d.into_iter().flatten())
        .collect();

    let base = mesh.vertex_count() as u32;
    for p in &vertices {
        mesh.add_vertex(*p);
    }
    for t in indices.chunks_exact(3) {
        let (a, b, c) = (t[0], t[1], t[2]);
        let area = signed_area_2d(&points_2d[a], &points_2d[b], &points_2d[c]);
        if area > 0.0 {
            mesh.add_triangle(base + a as u32, base + b as u32, base + c as u32);
        } else if area < 0.0 {
            mesh.add_triangle(base + a as u32, base + c as u32, base + b as u32);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_triangulate_square() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];

        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn test_triangulate_concave_polygon() {
        // L-shape: 6 vertices, 4 triangles
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices.len(), 12);

        let area: f64 = indices
            .chunks_exact(3)
            .map(|t| signed_area_2d(&points[t[0]], &points[t[1]], &points[t[2]]).abs() * 0.5)
            .sum();
        assert_relative_eq!(area, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_triangulate_insufficient_points() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(triangulate_polygon(&points).is_err());
    }

    #[test]
    fn test_polygon_normal_follows_winding() {
        let ccw = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert_relative_eq!(polygon_normal(&ccw).unwrap(), Vector3::z());

        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_relative_eq!(polygon_normal(&cw).unwrap(), -Vector3::z());

        let line = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(polygon_normal(&line).is_none());
    }

    #[test]
    fn test_clean_loop_drops_closing_point() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        assert_eq!(clean_loop(&points).len(), 3);
    }

    #[test]
    fn test_triangulate_face_with_hole_keeps_orientation() {
        // Sloped square, 4x4 with a 2x2 hole, facing up and south-ish
        let outer = vec![
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(4.0, 0.0, 2.0),
            Point3::new(4.0, 4.0, 4.0),
            Point3::new(0.0, 4.0, 4.0),
        ];
        let hole = vec![
            Point3::new(1.0, 1.0, 2.5),
            Point3::new(3.0, 1.0, 2.5),
            Point3::new(3.0, 3.0, 3.5),
            Point3::new(1.0, 3.0, 3.5),
        ];
        let outer_normal = polygon_normal(&outer).unwrap();

        let mut mesh = Mesh::new();
        triangulate_face(&outer, &[hole], &mut mesh).unwrap();

        let slope_factor = (1.0f64 + 0.25).sqrt();
        assert_relative_eq!(mesh.surface_area(), 12.0 * slope_factor, epsilon = 1e-9);
        for [a, b, c] in mesh.triangles() {
            let n = (b - a).cross(&(c - a));
            assert!(n.dot(&outer_normal) > 0.0);
        }
    }
}
