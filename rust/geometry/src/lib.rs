// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Roof Geometry
//!
//! Turns the body representation of a building element into a world-space
//! triangle mesh in metres.
//!
//! ## Overview
//!
//! - **Placement**: `IfcLocalPlacement` chains resolved to 4x4 transforms
//! - **Tessellations**: `IfcTriangulatedFaceSet`, `IfcPolygonalFaceSet`
//! - **Boundary representations**: `IfcFacetedBrep` and surface models
//! - **Extrusions**: `IfcExtrudedAreaSolid` over rectangle and arbitrary
//!   profiles (polylines, indexed poly curves with arcs, composite curves)
//! - **Instancing**: `IfcMappedItem` with its origin and target transforms
//! - **Triangulation**: [earcutr](https://docs.rs/earcutr) on planar face loops
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_roof_core::IfcModel;
//! use ifc_roof_geometry::GeometryRouter;
//!
//! let model = IfcModel::open("house.ifc")?;
//! let router = GeometryRouter::with_unit_scale(model.unit_scale());
//! let mut decoder = model.decoder();
//!
//! for &roof in model.roofs() {
//!     let entity = decoder.decode_by_id(roof)?;
//!     let mesh = router.process_element(&entity, &mut decoder)?;
//!     println!("#{}: {} triangles", roof, mesh.triangle_count());
//! }
//! ```

pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod processors;
pub mod profile;
pub mod router;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector3};

pub use error::{Error, Result};
pub use extrusion::extrude_profile;
pub use mesh::Mesh;
pub use profile::{create_rectangle, parse_profile, Profile2D};
pub use router::{GeometryProcessor, GeometryRouter};
pub use triangulation::{polygon_normal, triangulate_face, triangulate_polygon};
