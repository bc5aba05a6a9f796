// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Profile definitions

use crate::error::{Error, Result};
use crate::processors::helpers::{apply_axis2_placement_2d, coordinate_list, index_tuple, point_refs};
use crate::triangulation::ring_area_2d;
use ifc_roof_core::{AttributeValue, DecodedEntity, EntityDecoder, IfcType};
use nalgebra::Point2;
use std::f64::consts::{PI, TAU};

/// Nesting limit for composite curves built from composite curves
const MAX_CURVE_DEPTH: usize = 8;

/// 2D Profile with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Outer boundary
    pub outer: Vec<Point2<f64>>,
    /// Holes
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Add a hole to the profile
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(hole);
    }

    /// Outer boundary counter-clockwise, holes clockwise, no closing duplicates
    pub fn normalized(mut self) -> Self {
        normalize_ring(&mut self.outer, true);
        for hole in &mut self.holes {
            normalize_ring(hole, false);
        }
        self.holes.retain(|hole| hole.len() >= 3);
        self
    }

    /// Net enclosed area (outer minus holes)
    pub fn area(&self) -> f64 {
        ring_area_2d(&self.outer).abs()
            - self
                .holes
                .iter()
                .map(|h| ring_area_2d(h).abs())
                .sum::<f64>()
    }
}

fn normalize_ring(ring: &mut Vec<Point2<f64>>, counter_clockwise: bool) {
    ring.dedup_by(|a, b| (*a - *b).norm_squared() < 1e-18);
    while ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm_squared() < 1e-18 {
        ring.pop();
    }
    if (ring_area_2d(ring) > 0.0) != counter_clockwise {
        ring.reverse();
    }
}

/// Axis-aligned rectangle centred on the origin
pub fn create_rectangle(width: f64, height: f64) -> Profile2D {
    let (hw, hh) = (width / 2.0, height / 2.0);
    Profile2D::new(vec![
        Point2::new(-hw, -hh),
        Point2::new(hw, -hh),
        Point2::new(hw, hh),
        Point2::new(-hw, hh),
    ])
}

/// Build a profile from an IfcProfileDef entity
///
/// Supports IfcRectangleProfileDef and IfcArbitraryClosedProfileDef /
/// IfcArbitraryProfileDefWithVoids bounded by IfcPolyline,
/// IfcIndexedPolyCurve or IfcCompositeCurve boundaries.
pub fn parse_profile(profile: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Profile2D> {
    let parsed = match profile.ifc_type {
        // ProfileType, ProfileName, Position, XDim, YDim
        IfcType::IfcRectangleProfileDef => {
            let x_dim = profile.get_float(3);
            let y_dim = profile.get_float(4);
            let (x_dim, y_dim) = match (x_dim, y_dim) {
                (Some(x), Some(y)) if x > 0.0 && y > 0.0 => (x, y),
                _ => {
                    return Err(Error::InvalidProfile(format!(
                        "#{}: rectangle needs positive XDim and YDim",
                        profile.id
                    )))
                }
            };
            let mut rectangle = create_rectangle(x_dim, y_dim);
            if let Some(position) = decoder.resolve_ref(profile, 2)? {
                apply_axis2_placement_2d(&position, decoder, &mut rectangle.outer)?;
            }
            rectangle
        }
        // ProfileType, ProfileName, OuterCurve[, InnerCurves]
        IfcType::IfcArbitraryClosedProfileDef | IfcType::IfcArbitraryProfileDefWithVoids => {
            let outer_curve = decoder.resolve_ref(profile, 2)?.ok_or_else(|| {
                Error::InvalidProfile(format!("#{}: missing OuterCurve", profile.id))
            })?;
            let mut parsed = Profile2D::new(curve_points(&outer_curve, decoder, 0)?);

            if profile.ifc_type == IfcType::IfcArbitraryProfileDefWithVoids {
                for inner in decoder.resolve_ref_list(profile, 3)? {
                    parsed.add_hole(curve_points(&inner, decoder, 0)?);
                }
            }
            parsed
        }
        _ => {
            return Err(Error::Unsupported(format!(
                "profile type {}",
                profile.type_name
            )))
        }
    };

    let parsed = parsed.normalized();
    if parsed.outer.len() < 3 {
        return Err(Error::InvalidProfile(format!(
            "#{}: profile must have at least 3 vertices",
            profile.id
        )));
    }
    Ok(parsed)
}

/// 2D points along a bounded profile curve
fn curve_points(
    curve: &DecodedEntity,
    decoder: &mut EntityDecoder,
    depth: usize,
) -> Result<Vec<Point2<f64>>> {
    match curve.ifc_type {
        // IfcPolyline: Points
        IfcType::IfcPolyline => Ok(point_refs(curve, 0, decoder)?
            .into_iter()
            .map(|p| Point2::new(p.x, p.y))
            .collect()),
        IfcType::IfcIndexedPolyCurve => indexed_polycurve_points(curve, decoder),
        IfcType::IfcCompositeCurve if depth < MAX_CURVE_DEPTH => {
            composite_curve_points(curve, decoder, depth)
        }
        _ => Err(Error::Unsupported(format!(
            "profile curve type {}",
            curve.type_name
        ))),
    }
}

/// IfcIndexedPolyCurve: Points (0), Segments (1), SelfIntersect (2)
///
/// Without Segments the points are joined in order. IFCLINEINDEX segments
/// contribute their points, IFCARCINDEX segments a sampled circular arc.
fn indexed_polycurve_points(
    curve: &DecodedEntity,
    decoder: &mut EntityDecoder,
) -> Result<Vec<Point2<f64>>> {
    let list = decoder
        .resolve_ref(curve, 0)?
        .ok_or_else(|| Error::InvalidProfile(format!("#{}: missing Points", curve.id)))?;
    // IfcCartesianPointList2D / 3D: CoordList
    let points: Vec<Point2<f64>> = coordinate_list(&list, 0)?
        .into_iter()
        .map(|p| Point2::new(p.x, p.y))
        .collect();

    let segments = match curve.get_list(1) {
        Some(segments) => segments,
        None => return Ok(points),
    };

    let point = |i: usize| {
        points.get(i).copied().ok_or_else(|| {
            Error::InvalidProfile(format!(
                "#{}: segment index {} out of range",
                curve.id,
                i + 1
            ))
        })
    };

    let mut result = Vec::new();
    for segment in segments {
        let (kind, indices) = match segment {
            AttributeValue::Typed(kind, inner) => (kind.as_str(), &**inner),
            other => ("IFCLINEINDEX", other),
        };
        let indices = index_tuple(indices, curve.id)?;
        match (kind, indices.as_slice()) {
            ("IFCARCINDEX", &[start, mid, end]) => {
                result.extend(arc_through(point(start)?, point(mid)?, point(end)?));
            }
            _ => {
                for &i in &indices {
                    result.push(point(i)?);
                }
            }
        }
    }
    Ok(result)
}

/// IfcCompositeCurve: Segments (0), SelfIntersect (1)
fn composite_curve_points(
    curve: &DecodedEntity,
    decoder: &mut EntityDecoder,
    depth: usize,
) -> Result<Vec<Point2<f64>>> {
    let mut result = Vec::new();
    for segment in decoder.resolve_ref_list(curve, 0)? {
        // IfcCompositeCurveSegment: Transition (0), SameSense (1), ParentCurve (2)
        let parent = decoder.resolve_ref(&segment, 2)?.ok_or_else(|| {
            Error::InvalidProfile(format!("#{}: segment without ParentCurve", segment.id))
        })?;
        let mut points = curve_points(&parent, decoder, depth + 1)?;
        if segment.get(1).and_then(AttributeValue::as_bool) == Some(false) {
            points.reverse();
        }
        result.extend(points);
    }
    Ok(result)
}

/// Points along the circular arc from `start` through `mid` to `end`
///
/// Collinear points come back unchanged.
fn arc_through(start: Point2<f64>, mid: Point2<f64>, end: Point2<f64>) -> Vec<Point2<f64>> {
    // Twice the signed area of the triangle; positive when counter-clockwise
    let d = 2.0
        * (start.x * (mid.y - end.y) + mid.x * (end.y - start.y) + end.x * (start.y - mid.y));
    if d.abs() < 1e-12 {
        return vec![start, mid, end];
    }

    let sq = |p: Point2<f64>| p.x * p.x + p.y * p.y;
    let center = Point2::new(
        (sq(start) * (mid.y - end.y) + sq(mid) * (end.y - start.y) + sq(end) * (start.y - mid.y))
            / d,
        (sq(start) * (end.x - mid.x) + sq(mid) * (start.x - end.x) + sq(end) * (mid.x - start.x))
            / d,
    );
    let radius = (start - center).norm();
    let angle = |p: Point2<f64>| (p.y - center.y).atan2(p.x - center.x);

    let from = angle(start);
    let mut sweep = angle(end) - from;
    if d > 0.0 && sweep <= 0.0 {
        sweep += TAU;
    } else if d < 0.0 && sweep >= 0.0 {
        sweep -= TAU;
    }

    let steps = ((sweep.abs() / (PI / 16.0)).ceil() as usize).clamp(4, 64);
    (0..=steps)
        .map(|i| {
            let a = from + sweep * i as f64 / steps as f64;
            Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}
