// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction runs against an in-memory building model

use approx::assert_relative_eq;
use ifc_roof_segments::{
    cluster_faces, extract_roof_segments, filter_upward_faces, AssignmentPolicy, BuildingModel,
    ElementRef, Error, FaceSet, MeshSource, Result, RoofConfig,
};
use nalgebra::Vector3;
use std::collections::HashMap;

const COS_30: f64 = 0.8660254037844386;

#[derive(Default)]
struct MemoryModel {
    roofs: Vec<ElementRef>,
    children: HashMap<u32, Vec<ElementRef>>,
    slabs: Vec<ElementRef>,
    areas: HashMap<u32, f64>,
}

impl BuildingModel for MemoryModel {
    fn roofs(&self) -> Result<Vec<ElementRef>> {
        Ok(self.roofs.clone())
    }

    fn aggregated_children(&self, element: &ElementRef) -> Result<Vec<ElementRef>> {
        Ok(self.children.get(&element.id).cloned().unwrap_or_default())
    }

    fn roof_slabs(&self) -> Result<Vec<ElementRef>> {
        Ok(self.slabs.clone())
    }

    fn authored_area(&self, element: &ElementRef) -> Result<Option<f64>> {
        Ok(self.areas.get(&element.id).copied())
    }
}

struct BrokenModel;

impl BuildingModel for BrokenModel {
    fn roofs(&self) -> Result<Vec<ElementRef>> {
        Err(Error::model("unreadable file"))
    }

    fn aggregated_children(&self, _: &ElementRef) -> Result<Vec<ElementRef>> {
        Ok(Vec::new())
    }

    fn roof_slabs(&self) -> Result<Vec<ElementRef>> {
        Ok(Vec::new())
    }
}

/// Face sets keyed by element id; missing ids fail
#[derive(Default)]
struct MemoryMeshes {
    faces: HashMap<u32, (Vec<Vector3<f64>>, Vec<f64>)>,
    requested: Vec<u32>,
}

impl MemoryMeshes {
    fn insert(&mut self, id: u32, faces: &[(f64, f64, f64, f64)]) {
        let normals = faces
            .iter()
            .map(|&(x, y, z, _)| Vector3::new(x, y, z).normalize())
            .collect();
        let areas = faces.iter().map(|&(_, _, _, a)| a).collect();
        self.faces.insert(id, (normals, areas));
    }
}

impl MeshSource for MemoryMeshes {
    fn face_set(&mut self, element: &ElementRef) -> Result<FaceSet> {
        self.requested.push(element.id);
        match self.faces.get(&element.id) {
            Some((normals, areas)) => FaceSet::new(normals.clone(), areas.clone()),
            None => Err(Error::mesh(format!("no geometry for #{}", element.id))),
        }
    }
}

fn single_roof(faces: &[(f64, f64, f64, f64)]) -> (MemoryModel, MemoryMeshes) {
    let model = MemoryModel {
        roofs: vec![ElementRef::new(1, "IfcRoof")],
        ..Default::default()
    };
    let mut meshes = MemoryMeshes::default();
    meshes.insert(1, faces);
    (model, meshes)
}

#[test]
fn flat_roof_single_face() {
    let (model, mut meshes) = single_roof(&[(0.0, 0.0, 1.0, 10.0)]);
    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();

    assert_eq!(report.segments.len(), 1);
    let segment = &report.segments[0];
    assert_eq!(segment.id, "Roof_Seg_01");
    assert_eq!(segment.area, 10.0);
    assert_eq!(segment.tilt, 0.0);
    assert_eq!(segment.azimuth, 0.0);
    assert_eq!(segment.source_element, "IfcRoof");
    assert_eq!(segment.face_count, 1);
}

#[test]
fn south_facing_pitch() {
    let (model, mut meshes) = single_roof(&[(0.0, -0.5, COS_30, 5.0)]);
    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();

    assert_eq!(report.segments.len(), 1);
    assert_relative_eq!(report.segments[0].tilt, 30.0);
    assert_relative_eq!(report.segments[0].azimuth, 180.0);
    assert_eq!(report.segments[0].area, 5.0);
}

#[test]
fn coplanar_faces_form_one_segment() {
    let (model, mut meshes) = single_roof(&[(0.0, 0.0, 1.0, 3.0), (0.0, 0.0, 1.0, 4.0)]);
    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();

    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.segments[0].area, 7.0);
    assert_eq!(report.segments[0].tilt, 0.0);
    assert_eq!(report.segments[0].azimuth, 0.0);
    assert_eq!(report.segments[0].face_count, 2);
}

#[test]
fn no_upward_faces_yields_nothing() {
    let (model, mut meshes) = single_roof(&[(0.0, 0.0, -1.0, 50.0), (1.0, 0.0, 0.0, 20.0)]);
    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();

    assert!(report.is_empty());
    assert!(report.skipped.is_empty());
    assert_eq!(report.total_area(), 0.0);
}

#[test]
fn near_vertical_face_is_excluded_regardless_of_area() {
    let (model, mut meshes) = single_roof(&[(0.0, 1.0, 0.04, 1000.0), (0.0, 0.0, 1.0, 2.0)]);
    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();

    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.segments[0].area, 2.0);
}

#[test]
fn gable_roof_with_small_dormer() {
    let (model, mut meshes) = single_roof(&[
        (0.0, 0.5, COS_30, 40.0),
        (0.0, -0.5, COS_30, 40.0),
        (1.0, 0.0, 0.2, 0.6),
        (0.0, 0.5, COS_30, 10.0),
    ]);
    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();

    assert_eq!(report.segments.len(), 2);
    assert_eq!(report.segments[0].azimuth, 0.0);
    assert_eq!(report.segments[0].area, 50.0);
    assert_eq!(report.segments[1].azimuth, 180.0);
    assert_relative_eq!(report.total_area(), 90.0);
}

#[test]
fn failing_element_is_skipped_and_ids_continue() {
    let model = MemoryModel {
        roofs: vec![ElementRef::new(1, "IfcRoof")],
        children: HashMap::from([(
            1,
            vec![
                ElementRef::new(10, "IfcSlab").with_name("North"),
                ElementRef::new(11, "IfcSlab").with_name("Broken"),
                ElementRef::new(12, "IfcSlab").with_name("South"),
            ],
        )]),
        slabs: vec![ElementRef::new(12, "IfcSlab"), ElementRef::new(13, "IfcSlab")],
        ..Default::default()
    };
    let mut meshes = MemoryMeshes::default();
    meshes.insert(10, &[(0.0, 0.5, COS_30, 12.0)]);
    meshes.insert(12, &[(0.0, -0.5, COS_30, 15.0)]);
    meshes.insert(13, &[(0.0, 0.0, 1.0, 8.0)]);

    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();

    assert_eq!(meshes.requested, vec![10, 11, 12, 13]);
    let ids: Vec<&str> = report.segments.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["Roof_Seg_01", "Roof_Seg_02", "Roof_Seg_03"]);
    let sources: Vec<&str> = report.segments.iter().map(|s| s.source_element.as_str()).collect();
    assert_eq!(sources, vec!["North", "South", "IfcSlab"]);

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].element_id, 11);
    assert_eq!(report.skipped[0].label, "Broken");
}

#[test]
fn empty_mesh_is_skipped() {
    let (model, mut meshes) = single_roof(&[]);
    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();
    assert!(report.segments.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, "empty mesh");
}

#[test]
fn authored_area_does_not_change_segments() {
    let (mut model, mut meshes) = single_roof(&[(0.0, 0.0, 1.0, 10.0)]);
    let before = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();
    model.areas.insert(1, 250.0);
    let after = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn model_without_roofs_is_not_an_error() {
    let mut meshes = MemoryMeshes::default();
    let report =
        extract_roof_segments(&MemoryModel::default(), &mut meshes, &RoofConfig::default()).unwrap();
    assert!(report.is_empty());
    assert!(meshes.requested.is_empty());
}

#[test]
fn model_errors_are_fatal() {
    let mut meshes = MemoryMeshes::default();
    let result = extract_roof_segments(&BrokenModel, &mut meshes, &RoofConfig::default());
    assert!(matches!(result, Err(Error::Model(_))));
}

#[test]
fn invalid_config_rejected_before_any_work() {
    let (model, mut meshes) = single_roof(&[(0.0, 0.0, 1.0, 10.0)]);
    let config = RoofConfig::default().with_cluster_tolerance(-5.0);
    let result = extract_roof_segments(&model, &mut meshes, &config);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
    assert!(meshes.requested.is_empty());
}

#[test]
fn minimum_area_is_respected() {
    let (model, mut meshes) = single_roof(&[(0.0, 0.0, 1.0, 0.99), (0.0, -0.5, COS_30, 1.0)]);
    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();
    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.segments[0].azimuth, 180.0);

    let config = RoofConfig::default().with_min_segment_area(0.0);
    let report = extract_roof_segments(&model, &mut meshes, &config).unwrap();
    assert_eq!(report.segments.len(), 2);
}

#[test]
fn cluster_invariants_hold_on_a_noisy_roof() {
    // Deterministic spread of normals around four roof pitches
    let mut normals = Vec::new();
    let mut areas = Vec::new();
    for i in 0..200 {
        let pitch = [0.0f64, 90.0, 180.0, 270.0][i % 4].to_radians();
        let jitter = ((i * 37) % 11) as f64 - 5.0;
        let azimuth = pitch + jitter.to_radians();
        let tilt = (30.0 + jitter).to_radians();
        normals.push(Vector3::new(
            azimuth.sin() * tilt.sin(),
            azimuth.cos() * tilt.sin(),
            tilt.cos(),
        ));
        areas.push(0.5 + (i % 7) as f64 * 0.25);
    }
    let faces = FaceSet::new(normals, areas.clone()).unwrap();
    let upward = filter_upward_faces(&faces, 0.05);

    for policy in [AssignmentPolicy::FirstMatch, AssignmentPolicy::BestMatch] {
        let clusters = cluster_faces(&upward, 25.0, policy);
        let mut assigned = 0;
        for cluster in &clusters {
            assert_relative_eq!(cluster.centroid.norm(), 1.0, epsilon = 1e-9);
            let member_area: f64 = cluster.members.iter().map(|&i| areas[i]).sum();
            assert_relative_eq!(cluster.area, member_area, epsilon = 1e-9);
            assigned += cluster.members.len();
        }
        assert_eq!(assigned, upward.len());
    }

    let (model, mut meshes) = single_roof(&[]);
    meshes.faces.insert(1, (faces.normals().to_vec(), areas));
    let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default()).unwrap();
    for segment in &report.segments {
        assert!((0.0..=90.0).contains(&segment.tilt));
        assert!((0.0..360.0).contains(&segment.azimuth));
        assert!(segment.area >= 1.0);
    }
}
