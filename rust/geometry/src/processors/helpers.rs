// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared helper functions for geometry processors.
//!
//! Parsing of the small entities every processor needs: points, directions,
//! point lists and axis placements.

use crate::{Error, Point2, Point3, Result, Vector3};
use ifc_roof_core::{AttributeValue, DecodedEntity, EntityDecoder, IfcType};
use nalgebra::{Matrix3, Matrix4};

/// Read an IfcCartesianPoint entity (2D points get z = 0)
pub(crate) fn cartesian_point(point: &DecodedEntity) -> Result<Point3<f64>> {
    if point.ifc_type != IfcType::IfcCartesianPoint {
        return Err(Error::invalid(
            point.id,
            format!("expected IfcCartesianPoint, got {}", point.type_name),
        ));
    }
    let [x, y, z] = point
        .get(0)
        .and_then(AttributeValue::as_coordinates)
        .ok_or_else(|| Error::invalid(point.id, "IfcCartesianPoint without coordinates"))?;
    Ok(Point3::new(x, y, z))
}

/// Read an IfcDirection entity, unnormalized
pub(crate) fn direction(direction: &DecodedEntity) -> Result<Vector3<f64>> {
    if direction.ifc_type != IfcType::IfcDirection {
        return Err(Error::invalid(
            direction.id,
            format!("expected IfcDirection, got {}", direction.type_name),
        ));
    }
    let [x, y, z] = direction
        .get(0)
        .and_then(AttributeValue::as_coordinates)
        .ok_or_else(|| Error::invalid(direction.id, "IfcDirection without ratios"))?;
    Ok(Vector3::new(x, y, z))
}

/// Optional point attribute; `$` gives the origin
pub(crate) fn optional_point(
    entity: &DecodedEntity,
    index: usize,
    decoder: &mut EntityDecoder,
) -> Result<Point3<f64>> {
    match decoder.resolve_ref(entity, index)? {
        Some(point) => cartesian_point(&point),
        None => Ok(Point3::origin()),
    }
}

/// Optional direction attribute, normalized; `$` or a zero vector gives `default`
pub(crate) fn optional_direction(
    entity: &DecodedEntity,
    index: usize,
    decoder: &mut EntityDecoder,
    default: Vector3<f64>,
) -> Result<Vector3<f64>> {
    let dir = match decoder.resolve_ref(entity, index)? {
        Some(dir) => direction(&dir)?,
        None => return Ok(default),
    };
    Ok(dir.try_normalize(1e-12).unwrap_or(default))
}

/// Points of a list attribute whose members are IfcCartesianPoint references
pub(crate) fn point_refs(
    entity: &DecodedEntity,
    index: usize,
    decoder: &mut EntityDecoder,
) -> Result<Vec<Point3<f64>>> {
    decoder
        .resolve_ref_list(entity, index)?
        .iter()
        .map(|point| cartesian_point(point))
        .collect()
}

/// Inline coordinate list `((x,y,z),(x,y,z),...)` such as IfcCartesianPointList3D
pub(crate) fn coordinate_list(list: &DecodedEntity, index: usize) -> Result<Vec<Point3<f64>>> {
    let items = list
        .get_list(index)
        .ok_or_else(|| Error::invalid(list.id, "missing coordinate list"))?;
    items
        .iter()
        .map(|item| {
            item.as_coordinates()
                .map(|[x, y, z]| Point3::new(x, y, z))
                .ok_or_else(|| Error::invalid(list.id, "malformed coordinate tuple"))
        })
        .collect()
}

/// 1-based index tuple `(i, j, k, ...)` converted to 0-based
pub(crate) fn index_tuple(value: &AttributeValue, id: u32) -> Result<Vec<usize>> {
    let items = value
        .as_list()
        .ok_or_else(|| Error::invalid(id, "expected an index list"))?;
    items
        .iter()
        .map(|v| match v.as_int() {
            Some(i) if i >= 1 => Ok(i as usize - 1),
            _ => Err(Error::invalid(id, "index list entries must be positive integers")),
        })
        .collect()
}

/// Right-handed orthonormal frame from a Z axis and an approximate X axis
fn frame(z_axis: Vector3<f64>, ref_direction: Vector3<f64>) -> Matrix3<f64> {
    let z_axis = z_axis.normalize();
    // Project RefDirection onto the plane normal to Axis; fall back when parallel
    let mut x_axis = ref_direction - z_axis * ref_direction.dot(&z_axis);
    if x_axis.norm_squared() < 1e-20 {
        let fallback = if z_axis.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        x_axis = fallback - z_axis * fallback.dot(&z_axis);
    }
    let x_axis = x_axis.normalize();
    let y_axis = z_axis.cross(&x_axis);
    Matrix3::from_columns(&[x_axis, y_axis, z_axis])
}

/// Parse IfcAxis2Placement3D (Location, Axis, RefDirection) into a transform
pub(crate) fn axis2_placement_3d(
    placement: &DecodedEntity,
    decoder: &mut EntityDecoder,
) -> Result<Matrix4<f64>> {
    let location = optional_point(placement, 0, decoder)?;
    let z_axis = optional_direction(placement, 1, decoder, Vector3::z())?;
    let x_axis = optional_direction(placement, 2, decoder, Vector3::x())?;

    let mut transform = frame(z_axis, x_axis).to_homogeneous();
    transform[(0, 3)] = location.x;
    transform[(1, 3)] = location.y;
    transform[(2, 3)] = location.z;
    Ok(transform)
}

/// Parse IfcCartesianTransformationOperator3D (and the non-uniform variant)
/// into a transform
///
/// Attributes: Axis1 (0), Axis2 (1), LocalOrigin (2), Scale (3), Axis3 (4),
/// then Scale2 (5) and Scale3 (6) for the non-uniform operator. An Axis2
/// opposite to Axis3 x Axis1 mirrors the Y axis.
pub(crate) fn transformation_operator(
    operator: &DecodedEntity,
    decoder: &mut EntityDecoder,
) -> Result<Matrix4<f64>> {
    let x_hint = optional_direction(operator, 0, decoder, Vector3::x())?;
    let y_hint = match decoder.resolve_ref(operator, 1)? {
        Some(axis) => Some(direction(&axis)?),
        None => None,
    };
    let origin = optional_point(operator, 2, decoder)?;
    let z_axis = optional_direction(operator, 4, decoder, Vector3::z())?;

    let scale = operator.get_float(3).unwrap_or(1.0);
    let scales = [
        scale,
        operator.get_float(5).unwrap_or(scale),
        operator.get_float(6).unwrap_or(scale),
    ];
    if scales.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(Error::invalid(operator.id, "transformation scale must be positive"));
    }

    let mut axes = frame(z_axis, x_hint);
    if let Some(y_hint) = y_hint {
        let y_axis: Vector3<f64> = axes.column(1).into_owned();
        if y_hint.dot(&y_axis) < 0.0 {
            axes.set_column(1, &(-y_axis));
        }
    }

    let mut transform = Matrix4::identity();
    for (col, factor) in scales.iter().enumerate() {
        for row in 0..3 {
            transform[(row, col)] = axes[(row, col)] * factor;
        }
    }
    transform[(0, 3)] = origin.x;
    transform[(1, 3)] = origin.y;
    transform[(2, 3)] = origin.z;
    Ok(transform)
}

/// Parse IfcAxis2Placement2D (Location, RefDirection) and map profile points
pub(crate) fn apply_axis2_placement_2d(
    placement: &DecodedEntity,
    decoder: &mut EntityDecoder,
    points: &mut [Point2<f64>],
) -> Result<()> {
    let location = optional_point(placement, 0, decoder)?;
    let x_axis = optional_direction(placement, 1, decoder, Vector3::x())?;
    let (cos, sin) = (x_axis.x, x_axis.y);

    for p in points.iter_mut() {
        *p = Point2::new(
            location.x + p.x * cos - p.y * sin,
            location.y + p.x * sin + p.y * cos,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_orthogonalizes_ref_direction() {
        let m = frame(Vector3::z(), Vector3::new(1.0, 0.0, 0.5));
        assert_relative_eq!(m.column(0).into_owned(), Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(m.column(1).into_owned(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_frame_with_parallel_ref_direction() {
        let m = frame(Vector3::x(), Vector3::x());
        assert_relative_eq!(m.column(2).into_owned(), Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_operator_scales_and_mirrors() {
        use ifc_roof_core::build_entity_index;
        use std::sync::Arc;

        let content = "#1=IFCCARTESIANPOINT((5.,0.,0.));\
            #2=IFCDIRECTION((0.,-1.,0.));\
            #3=IFCCARTESIANTRANSFORMATIONOPERATOR3D($,#2,#1,2.,$);\
            #4=IFCCARTESIANTRANSFORMATIONOPERATOR3DNONUNIFORM($,$,$,1.,$,3.,$);\
            #5=IFCCARTESIANTRANSFORMATIONOPERATOR3D($,$,$,0.,$);";
        let mut decoder = EntityDecoder::new(content, Arc::new(build_entity_index(content, 0)));

        let mirrored = decoder.decode_by_id(3).unwrap();
        let m = transformation_operator(&mirrored, &mut decoder).unwrap();
        let p = m.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3::new(7.0, -2.0, 2.0), epsilon = 1e-12);
        assert!(m.fixed_view::<3, 3>(0, 0).determinant() < 0.0);

        let stretched = decoder.decode_by_id(4).unwrap();
        let m = transformation_operator(&stretched, &mut decoder).unwrap();
        let p = m.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3::new(1.0, 3.0, 1.0), epsilon = 1e-12);

        let flat = decoder.decode_by_id(5).unwrap();
        assert!(transformation_operator(&flat, &mut decoder).is_err());
    }

    #[test]
    fn test_index_tuple_is_zero_based() {
        let value = AttributeValue::List(vec![
            AttributeValue::Integer(1),
            AttributeValue::Integer(3),
        ]);
        assert_eq!(index_tuple(&value, 1).unwrap(), vec![0, 2]);

        let bad = AttributeValue::List(vec![AttributeValue::Integer(0)]);
        assert!(index_tuple(&bad, 1).is_err());
    }
}
