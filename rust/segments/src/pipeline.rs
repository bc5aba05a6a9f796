// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end extraction over a building model

use crate::cluster::cluster_faces;
use crate::config::RoofConfig;
use crate::crosscheck::cross_check_area;
use crate::element::{BuildingModel, ElementRef, MeshSource};
use crate::error::Result;
use crate::faces::filter_upward_faces;
use crate::locator::locate_roof_elements;
use crate::segment::{assemble_segments, RoofSegment, SegmentCounter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// An element that produced no geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedElement {
    pub element_id: u32,
    pub label: String,
    pub reason: String,
}

impl SkippedElement {
    fn new(element: &ElementRef, reason: impl Into<String>) -> Self {
        Self {
            element_id: element.id,
            label: element.label().to_string(),
            reason: reason.into(),
        }
    }
}

/// Result of a full extraction run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoofReport {
    /// Segments in emission order
    pub segments: Vec<RoofSegment>,
    pub skipped: Vec<SkippedElement>,
}

impl RoofReport {
    /// Sum of the (rounded) segment areas
    pub fn total_area(&self) -> f64 {
        self.segments.iter().map(|s| s.area).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Extract roof segments from every roof element of `model`
///
/// Configuration and model errors are fatal. Elements whose mesh cannot be
/// produced are logged, recorded in [`RoofReport::skipped`] and do not
/// affect the others.
pub fn extract_roof_segments<M, S>(
    model: &M,
    meshes: &mut S,
    config: &RoofConfig,
) -> Result<RoofReport>
where
    M: BuildingModel + ?Sized,
    S: MeshSource + ?Sized,
{
    config.validate()?;

    let elements = locate_roof_elements(model)?;
    let mut report = RoofReport::default();
    let mut counter = SegmentCounter::new();

    for element in &elements {
        let faces = match meshes.face_set(element) {
            Ok(faces) if faces.is_empty() => {
                warn!(element = %element.label(), id = element.id, "empty mesh, skipping element");
                report.skipped.push(SkippedElement::new(element, "empty mesh"));
                continue;
            }
            Ok(faces) => faces,
            Err(e) => {
                warn!(element = %element.label(), id = element.id, error = %e, "mesh extraction failed, skipping element");
                report.skipped.push(SkippedElement::new(element, e.to_string()));
                continue;
            }
        };

        let authored = match model.authored_area(element) {
            Ok(area) => area,
            Err(e) => {
                warn!(id = element.id, error = %e, "could not read authored area");
                None
            }
        };
        cross_check_area(element, faces.total_area(), authored);

        let upward = filter_upward_faces(&faces, config.min_upward_nz);
        debug!(
            id = element.id,
            faces = faces.len(),
            upward = upward.len(),
            "filtered faces"
        );

        let clusters = cluster_faces(&upward, config.cluster_tolerance, config.policy);
        let (segments, next) =
            assemble_segments(element, &clusters, config.min_segment_area, counter);
        counter = next;

        info!(
            element = %element.label(),
            id = element.id,
            clusters = clusters.len(),
            segments = segments.len(),
            "processed roof element"
        );
        report.segments.extend(segments);
    }

    info!(
        "Parsed {} segment(s), total usable area: {:.2} m²",
        report.segments.len(),
        report.total_area()
    );

    Ok(report)
}
