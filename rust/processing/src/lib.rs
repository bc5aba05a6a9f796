// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Roof Processing
//!
//! Runs roof segment extraction on IFC files: opens the model, wires the
//! IFC reader and geometry kernel into the segment engine and returns the
//! report.
//!
//! ```rust,ignore
//! use ifc_roof_processing::{analyze_file, RoofConfig};
//!
//! let report = analyze_file("house.ifc", &RoofConfig::default())?;
//! println!("{} segments, {:.2} m²", report.segments.len(), report.total_area());
//! ```

pub mod adapters;
pub mod error;

pub use adapters::{IfcBuildingModel, IfcMeshSource};
pub use error::{Error, Result};
pub use ifc_roof_segments::{AssignmentPolicy, RoofConfig, RoofReport, RoofSegment, SkippedElement};

use ifc_roof_core::IfcModel;
use ifc_roof_segments::extract_roof_segments;
use std::path::Path;

/// Extract roof segments from an IFC file on disk
pub fn analyze_file(path: impl AsRef<Path>, config: &RoofConfig) -> Result<RoofReport> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "Opening IFC model");
    let model = IfcModel::open(path)?;
    analyze_model(&model, config)
}

/// Extract roof segments from IFC content already in memory
pub fn analyze_content(content: String, config: &RoofConfig) -> Result<RoofReport> {
    let model = IfcModel::from_content(content)?;
    analyze_model(&model, config)
}

/// Extract roof segments from an opened model
pub fn analyze_model(model: &IfcModel, config: &RoofConfig) -> Result<RoofReport> {
    tracing::info!(
        schema = model.schema().unwrap_or("unknown"),
        entities = model.entity_count(),
        unit_scale = model.unit_scale(),
        "Model indexed"
    );

    let buildings = IfcBuildingModel::new(model);
    let mut meshes = IfcMeshSource::new(model);
    Ok(extract_roof_segments(&buildings, &mut meshes, config)?)
}
