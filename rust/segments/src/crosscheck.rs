// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Advisory comparison of mesh area against authored area metadata

use crate::element::ElementRef;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Mesh area next to the authored area of one element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaComparison {
    /// Sum of all face areas before filtering
    pub geometry_area: f64,
    pub authored_area: Option<f64>,
}

impl AreaComparison {
    pub fn new(geometry_area: f64, authored_area: Option<f64>) -> Self {
        Self {
            geometry_area,
            authored_area,
        }
    }

    /// `(geometry - authored) / authored`, when an authored area is known
    /// and non-zero
    pub fn relative_difference(&self) -> Option<f64> {
        self.authored_area
            .filter(|authored| authored.abs() > f64::EPSILON)
            .map(|authored| (self.geometry_area - authored) / authored)
    }
}

/// Log the comparison for one element and return it
///
/// Never influences the extracted segments.
pub fn cross_check_area(
    element: &ElementRef,
    geometry_area: f64,
    authored_area: Option<f64>,
) -> AreaComparison {
    let comparison = AreaComparison::new(geometry_area, authored_area);
    match (comparison.authored_area, comparison.relative_difference()) {
        (Some(authored), Some(diff)) => info!(
            element = %element.label(),
            id = element.id,
            geometry_area,
            authored_area = authored,
            relative_difference = diff,
            "area check"
        ),
        (Some(authored), None) => info!(
            element = %element.label(),
            id = element.id,
            geometry_area,
            authored_area = authored,
            "area check"
        ),
        (None, _) => info!(
            element = %element.label(),
            id = element.id,
            geometry_area,
            "area check, no authored area"
        ),
    }
    comparison
}
