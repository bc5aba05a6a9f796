// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof extraction from complete IFC files

use approx::assert_relative_eq;
use ifc_roof_processing::{analyze_content, analyze_file, AssignmentPolicy, Error, RoofConfig};

const HEADER: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [ReferenceView]'),'2;1');
FILE_NAME('house.ifc','2024-05-01T12:00:00',('Architect'),('Office'),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
";

const FOOTER: &str = "ENDSEC;
END-ISO-10303-21;
";

/// Gable roof of two tessellated panes aggregated under an IfcRoof, a flat
/// extruded roof slab over the garage and a roof slab without geometry
const HOUSE: &str = "#1=IFCPROJECT('proj',$,'House',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3,#4));
#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);
#4=IFCSIUNIT(*,.AREAUNIT.,$,.SQUARE_METRE.);
#5=IFCCARTESIANPOINT((0.,0.,0.));
#6=IFCAXIS2PLACEMENT3D(#5,$,$);
#7=IFCLOCALPLACEMENT($,#6);
#8=IFCGEOMETRICREPRESENTATIONCONTEXT($,'Model',3,1.E-05,#6,$);
#100=IFCROOF('3vB2YO$MX4xv5uCqZZG05x',$,'Main roof',$,$,#7,$,$,.GABLE_ROOF.);
#101=IFCRELAGGREGATES('rel-roof',$,$,$,#100,(#110,#120));
#111=IFCCARTESIANPOINTLIST3D(((0.,5.,5.),(10.,5.,5.),(10.,10.,3.),(0.,10.,3.)),$);
#112=IFCTRIANGULATEDFACESET(#111,$,.F.,((1,2,3),(1,3,4)),$);
#113=IFCSHAPEREPRESENTATION(#8,'Body','Tessellation',(#112));
#114=IFCPRODUCTDEFINITIONSHAPE($,$,(#113));
#110=IFCSLAB('0n1nHOHqf0bQpEx$k9F8Zt',$,'North pane',$,$,#7,#114,$,.ROOF.);
#121=IFCCARTESIANPOINTLIST3D(((0.,0.,3.),(10.,0.,3.),(10.,5.,5.),(0.,5.,5.)),$);
#122=IFCTRIANGULATEDFACESET(#121,$,.F.,((1,2,3),(1,3,4)),$);
#123=IFCSHAPEREPRESENTATION(#8,'Body','Tessellation',(#122));
#124=IFCPRODUCTDEFINITIONSHAPE($,$,(#123));
#120=IFCSLAB('1Xk7pLh1j3QBhsdpWJp3Ui',$,'South pane',$,$,#7,#124,$,.ROOF.);
#131=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,4.,3.);
#132=IFCDIRECTION((0.,0.,1.));
#133=IFCCARTESIANPOINT((15.,2.,2.8));
#134=IFCAXIS2PLACEMENT3D(#133,$,$);
#135=IFCEXTRUDEDAREASOLID(#131,#134,#132,0.2);
#136=IFCSHAPEREPRESENTATION(#8,'Body','SweptSolid',(#135));
#137=IFCPRODUCTDEFINITIONSHAPE($,$,(#136));
#130=IFCSLAB('2pQ8nYw2r0VhsfD1c3kZ1a',$,$,$,$,#7,#137,$,.ROOF.);
#140=IFCSLAB('3aB9x$F2n1Fg6G0qT8wHkP',$,'Skylight frame',$,$,#7,$,$,.ROOF.);
#150=IFCSLAB('floor',$,'Ground floor',$,$,#7,#137,$,.FLOOR.);
#160=IFCPROPERTYSINGLEVALUE('TotalArea',$,IFCAREAMEASURE(110.),$);
#161=IFCPROPERTYSET('pset-roof',$,'Pset_RoofCommon',$,(#160));
#162=IFCRELDEFINESBYPROPERTIES('rdp',$,$,$,(#110,#120),#161);
";

fn file(data: &str) -> String {
    format!("{}{}{}", HEADER, data, FOOTER)
}

#[test]
fn gable_house_segments() {
    let report = analyze_content(file(HOUSE), &RoofConfig::default()).unwrap();

    assert_eq!(report.segments.len(), 3);

    let north = &report.segments[0];
    assert_eq!(north.id, "Roof_Seg_01");
    assert_eq!(north.source_element, "North pane");
    assert_eq!(north.element_id, 110);
    assert_eq!(north.global_id.as_deref(), Some("0n1nHOHqf0bQpEx$k9F8Zt"));
    assert_eq!(north.area, 53.85);
    assert_eq!(north.tilt, 21.8);
    assert_eq!(north.azimuth, 0.0);
    assert_eq!(north.face_count, 2);

    let south = &report.segments[1];
    assert_eq!(south.id, "Roof_Seg_02");
    assert_eq!(south.source_element, "South pane");
    assert_eq!(south.area, 53.85);
    assert_eq!(south.tilt, 21.8);
    assert_eq!(south.azimuth, 180.0);

    // Flat garage roof: top cap only, walls and underside are filtered out
    let garage = &report.segments[2];
    assert_eq!(garage.id, "Roof_Seg_03");
    assert_eq!(garage.source_element, "IfcSlab");
    assert_eq!(garage.element_type, "IfcSlab");
    assert_eq!(garage.area, 12.0);
    assert_eq!(garage.tilt, 0.0);
    assert_eq!(garage.face_count, 2);

    assert_relative_eq!(report.total_area(), 119.7, epsilon = 1e-9);

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].element_id, 140);
    assert_eq!(report.skipped[0].label, "Skylight frame");
}

#[test]
fn millimetre_model_is_scaled_to_metres() {
    let data = "#1=IFCPROJECT('proj',$,'House',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#10=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(4000.,0.,0.),(4000.,2500.,0.),(0.,2500.,0.)),$);
#11=IFCTRIANGULATEDFACESET(#10,$,$,((1,2,3),(1,3,4)),$);
#12=IFCSHAPEREPRESENTATION($,'Body','Tessellation',(#11));
#13=IFCPRODUCTDEFINITIONSHAPE($,$,(#12));
#20=IFCROOF('roof',$,'Flat roof',$,$,$,#13,$,.FLAT_ROOF.);
";
    let report = analyze_content(file(data), &RoofConfig::default()).unwrap();
    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.segments[0].area, 10.0);
    assert_eq!(report.segments[0].source_element, "Flat roof");
    assert_eq!(report.segments[0].element_type, "IfcRoof");
}

#[test]
fn strict_minimum_area_drops_small_panes() {
    let config = RoofConfig::default().with_min_segment_area(50.0);
    let report = analyze_content(file(HOUSE), &config).unwrap();
    let ids: Vec<&str> = report.segments.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["Roof_Seg_01", "Roof_Seg_02"]);
}

#[test]
fn wide_tolerance_merges_opposite_pitches_only_within_an_element() {
    let config = RoofConfig::default()
        .with_cluster_tolerance(60.0)
        .with_policy(AssignmentPolicy::BestMatch);
    let report = analyze_content(file(HOUSE), &config).unwrap();
    // Clustering never crosses element boundaries
    assert_eq!(report.segments.len(), 3);
}

#[test]
fn model_without_roofs() {
    let data = "#1=IFCPROJECT('proj',$,'Empty',$,$,$,$,$,$);\n";
    let report = analyze_content(file(data), &RoofConfig::default()).unwrap();
    assert!(report.segments.is_empty());
    assert!(report.skipped.is_empty());
}

#[test]
fn report_serializes_to_json() {
    let report = analyze_content(file(HOUSE), &RoofConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["segments"][0]["id"], "Roof_Seg_01");
    assert_eq!(json["segments"][1]["azimuth"], 180.0);
    assert_eq!(json["skipped"][0]["element_id"], 140);
}

#[test]
fn unreadable_inputs_are_fatal() {
    assert!(matches!(
        analyze_content("not an ifc file".to_string(), &RoofConfig::default()),
        Err(Error::Model(_))
    ));
    assert!(matches!(
        analyze_file("/nonexistent/house.ifc", &RoofConfig::default()),
        Err(Error::Model(_))
    ));
}

#[test]
fn invalid_config_is_rejected() {
    let config = RoofConfig::default().with_min_segment_area(f64::NAN);
    assert!(matches!(
        analyze_content(file(HOUSE), &config),
        Err(Error::Extraction(_))
    ));
}

/// IFC4 roof slabs: a standard-case slab, a slab instancing a type's
/// representation map lifted 4 m, and a slab extruded from an indexed poly
/// curve profile
const IFC4_SLABS: &str = "#1=IFCPROJECT('proj',$,'Annex',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);
#5=IFCCARTESIANPOINT((0.,0.,0.));
#6=IFCAXIS2PLACEMENT3D(#5,$,$);
#7=IFCLOCALPLACEMENT($,#6);
#10=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(5.,0.,0.),(5.,4.,0.),(0.,4.,0.)),$);
#11=IFCTRIANGULATEDFACESET(#10,$,$,((1,2,3),(1,3,4)),$);
#12=IFCSHAPEREPRESENTATION($,'Body','Tessellation',(#11));
#13=IFCPRODUCTDEFINITIONSHAPE($,$,(#12));
#20=IFCSLABSTANDARDCASE('std',$,'Standard case',$,$,#7,#13,$,.ROOF.);
#30=IFCREPRESENTATIONMAP(#6,#12);
#31=IFCCARTESIANPOINT((0.,0.,4.));
#32=IFCCARTESIANTRANSFORMATIONOPERATOR3D($,$,#31,$,$);
#33=IFCMAPPEDITEM(#30,#32);
#34=IFCSHAPEREPRESENTATION($,'Body','MappedRepresentation',(#33));
#35=IFCPRODUCTDEFINITIONSHAPE($,$,(#34));
#40=IFCSLAB('mapped',$,'Mapped',$,$,#7,#35,$,.ROOF.);
#50=IFCSLABELEMENTEDCASE('floor',$,'Elemented floor',$,$,#7,#13,$,.FLOOR.);
#60=IFCCARTESIANPOINTLIST2D(((0.,0.),(3.,0.),(3.,2.),(0.,2.)),$);
#61=IFCINDEXEDPOLYCURVE(#60,(IFCLINEINDEX((1,2,3,4,1))),$);
#62=IFCARBITRARYCLOSEDPROFILEDEF(.AREA.,$,#61);
#63=IFCDIRECTION((0.,0.,1.));
#64=IFCEXTRUDEDAREASOLID(#62,$,#63,0.3);
#65=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#64));
#66=IFCPRODUCTDEFINITIONSHAPE($,$,(#65));
#67=IFCSLAB('profile',$,'Indexed profile',$,$,#7,#66,$,.ROOF.);
";

#[test]
fn slab_subtypes_mapped_items_and_indexed_profiles() {
    let report = analyze_content(file(IFC4_SLABS), &RoofConfig::default()).unwrap();

    assert!(report.skipped.is_empty());
    let summary: Vec<(&str, &str, f64)> = report
        .segments
        .iter()
        .map(|s| (s.source_element.as_str(), s.element_type.as_str(), s.area))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Standard case", "IfcSlabStandardCase", 20.0),
            ("Mapped", "IfcSlab", 20.0),
            ("Indexed profile", "IfcSlab", 6.0),
        ]
    );
    assert!(report.segments.iter().all(|s| s.tilt == 0.0));
    assert_eq!(report.segments[2].id, "Roof_Seg_03");
}
