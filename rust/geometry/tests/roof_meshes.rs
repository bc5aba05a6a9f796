// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Meshing complete roof elements through the router

use approx::assert_relative_eq;
use ifc_roof_core::{build_entity_index, EntityDecoder};
use ifc_roof_geometry::{GeometryRouter, Mesh};
use std::sync::Arc;

/// Hip roof as a faceted brep pyramid: 10 x 10 m base, 5 m rise, in
/// millimetres, placed 3 m above the origin
const HIP_ROOF: &str = "#1=IFCCARTESIANPOINT((0.,0.,3000.));
#2=IFCAXIS2PLACEMENT3D(#1,$,$);
#3=IFCLOCALPLACEMENT($,#2);
#10=IFCCARTESIANPOINT((0.,0.,0.));
#11=IFCCARTESIANPOINT((10000.,0.,0.));
#12=IFCCARTESIANPOINT((10000.,10000.,0.));
#13=IFCCARTESIANPOINT((0.,10000.,0.));
#14=IFCCARTESIANPOINT((5000.,5000.,5000.));
#20=IFCPOLYLOOP((#10,#11,#14));
#21=IFCPOLYLOOP((#11,#12,#14));
#22=IFCPOLYLOOP((#12,#13,#14));
#23=IFCPOLYLOOP((#13,#10,#14));
#24=IFCPOLYLOOP((#10,#13,#12,#11));
#30=IFCFACEOUTERBOUND(#20,.T.);
#31=IFCFACEOUTERBOUND(#21,.T.);
#32=IFCFACEOUTERBOUND(#22,.T.);
#33=IFCFACEOUTERBOUND(#23,.T.);
#34=IFCFACEOUTERBOUND(#24,.T.);
#40=IFCFACE((#30));
#41=IFCFACE((#31));
#42=IFCFACE((#32));
#43=IFCFACE((#33));
#44=IFCFACE((#34));
#50=IFCCLOSEDSHELL((#40,#41,#42,#43,#44));
#51=IFCFACETEDBREP(#50);
#52=IFCSHAPEREPRESENTATION($,'Body','Brep',(#51));
#53=IFCPRODUCTDEFINITIONSHAPE($,$,(#52));
#60=IFCROOF('hip',$,'Hip roof',$,$,#3,#53,$,.HIP_ROOF.);
";

fn mesh_roof(content: &str, id: u32, unit_scale: f64) -> Mesh {
    let mut decoder = EntityDecoder::new(content, Arc::new(build_entity_index(content, 0)));
    let roof = decoder.decode_by_id(id).unwrap();
    GeometryRouter::with_unit_scale(unit_scale)
        .process_element(&roof, &mut decoder)
        .unwrap()
}

/// Normals of each triangle, unit length
fn normals(mesh: &Mesh) -> Vec<[f64; 3]> {
    mesh.triangles()
        .map(|[a, b, c]| {
            let n = (b - a).cross(&(c - a)).normalize();
            [n.x, n.y, n.z]
        })
        .collect()
}

#[test]
fn hip_roof_brep_in_millimetres() {
    let mesh = mesh_roof(HIP_ROOF, 60, 0.001);

    // Four sloped triangles plus the base split in two
    assert_eq!(mesh.triangle_count(), 6);

    let slope_area = 4.0 * 0.5 * 10.0 * 50f64.sqrt();
    assert_relative_eq!(mesh.surface_area(), slope_area + 100.0, epsilon = 1e-9);

    let min_z = mesh
        .triangles()
        .flat_map(|t| t.into_iter().map(|p| p.z))
        .fold(f64::INFINITY, f64::min);
    assert_relative_eq!(min_z, 3.0, epsilon = 1e-12);
}

#[test]
fn hip_roof_faces_point_outward() {
    let mesh = mesh_roof(HIP_ROOF, 60, 0.001);
    let normals = normals(&mesh);

    let up: Vec<_> = normals.iter().filter(|n| n[2] > 0.05).collect();
    let down: Vec<_> = normals.iter().filter(|n| n[2] < -0.99).collect();
    assert_eq!(up.len(), 4);
    assert_eq!(down.len(), 2);

    for n in up {
        // 45 degree pitches facing the four compass directions
        assert_relative_eq!(n[2], 0.5f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(n[0].abs() + n[1].abs(), 0.5f64.sqrt(), epsilon = 1e-9);
    }
}

#[test]
fn reversed_bound_orientation_flips_face() {
    let content = HIP_ROOF.replace("#30=IFCFACEOUTERBOUND(#20,.T.)", "#30=IFCFACEOUTERBOUND(#20,.F.)");
    let mesh = mesh_roof(&content, 60, 1.0);
    let down = normals(&mesh).iter().filter(|n| n[2] < -0.05).count();
    assert_eq!(down, 3);
}
