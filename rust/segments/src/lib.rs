// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Roof Segments
//!
//! Groups the upward-facing triangles of roof meshes into planar segments
//! and reports each segment's area, tilt and compass azimuth.
//!
//! ## Overview
//!
//! - **Locator**: roofs, their aggregated parts and roof-typed slabs
//! - **Filter**: drops faces whose normal does not point upward
//! - **Clustering**: greedy grouping by angular distance to an
//!   area-weighted centroid
//! - **Assembly**: minimum-area filter, `Roof_Seg_NN` identifiers, rounding
//!
//! The building model and mesh provider are traits ([`BuildingModel`],
//! [`MeshSource`]) so the engine runs against any backend.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_roof_segments::{extract_roof_segments, RoofConfig};
//!
//! let report = extract_roof_segments(&model, &mut meshes, &RoofConfig::default())?;
//! for segment in &report.segments {
//!     println!("{} {:.2} m² tilt {} az {}", segment.id, segment.area, segment.tilt, segment.azimuth);
//! }
//! ```

pub mod cluster;
pub mod config;
pub mod crosscheck;
pub mod element;
pub mod error;
pub mod faces;
pub mod locator;
pub mod orientation;
pub mod pipeline;
pub mod segment;

pub use cluster::{angular_distance, cluster_faces, FaceCluster};
pub use config::{
    AssignmentPolicy, RoofConfig, DEFAULT_CLUSTER_TOLERANCE, DEFAULT_MIN_SEGMENT_AREA,
    DEFAULT_MIN_UPWARD_NZ,
};
pub use crosscheck::{cross_check_area, AreaComparison};
pub use element::{BuildingModel, ElementRef, MeshSource};
pub use error::{Error, Result, SourceError};
pub use faces::{filter_upward_faces, Face, FaceSet};
pub use locator::locate_roof_elements;
pub use orientation::{azimuth_degrees, orientation, tilt_degrees};
pub use pipeline::{extract_roof_segments, RoofReport, SkippedElement};
pub use segment::{assemble_segments, RoofSegment, SegmentCounter};
