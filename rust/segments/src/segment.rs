// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof segments assembled from face clusters

use crate::cluster::FaceCluster;
use crate::element::ElementRef;
use crate::orientation::orientation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One planar roof region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSegment {
    /// `Roof_Seg_01`, `Roof_Seg_02`, ... across the whole model
    pub id: String,
    /// m², two decimals
    pub area: f64,
    /// Degrees from horizontal, one decimal
    pub tilt: f64,
    /// Degrees clockwise from north, one decimal
    pub azimuth: f64,
    /// Element name, or its type when unnamed
    pub source_element: String,
    pub element_id: u32,
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_id: Option<String>,
    pub face_count: usize,
}

/// Running count of emitted segments
///
/// Threaded through every assembly step so identifiers stay unique and
/// increasing across elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentCounter(u32);

impl SegmentCounter {
    pub fn new() -> Self {
        Self(0)
    }

    /// Segments issued so far
    pub fn issued(&self) -> u32 {
        self.0
    }

    /// Next identifier and the advanced counter
    pub fn next_id(self) -> (String, Self) {
        let n = self.0 + 1;
        (format!("Roof_Seg_{:02}", n), Self(n))
    }
}

/// Round to `decimals` places, exact halves going to the even neighbour
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Turn one element's clusters into segments
///
/// Clusters with area below `min_area` are dropped. The rest are emitted in
/// cluster order, each taking the next identifier from `counter`.
pub fn assemble_segments(
    element: &ElementRef,
    clusters: &[FaceCluster],
    min_area: f64,
    mut counter: SegmentCounter,
) -> (Vec<RoofSegment>, SegmentCounter) {
    let mut segments = Vec::new();

    for cluster in clusters {
        if cluster.area < min_area {
            debug!(
                element = element.id,
                area = cluster.area,
                faces = cluster.face_count(),
                "cluster below minimum area, dropped"
            );
            continue;
        }

        let (tilt, azimuth) = orientation(&cluster.centroid);
        let (id, next) = counter.next_id();
        counter = next;

        debug!(
            id = %id,
            element = element.id,
            area = cluster.area,
            tilt,
            azimuth,
            faces = cluster.face_count(),
            "roof segment"
        );

        segments.push(RoofSegment {
            id,
            area: round_to(cluster.area, 2),
            tilt: round_to(tilt, 1),
            azimuth: round_to(azimuth, 1),
            source_element: element.label().to_string(),
            element_id: element.id,
            element_type: element.type_name.clone(),
            global_id: element.global_id.clone(),
            face_count: cluster.face_count(),
        });
    }

    (segments, counter)
}
