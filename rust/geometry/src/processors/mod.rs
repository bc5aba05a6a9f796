// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Processors
//!
//! One processor per family of representation items found on roofs:
//!
//! - `extrusion`: ExtrudedAreaSolid (extruded rectangle and arbitrary curve profiles)
//! - `tessellated`: TriangulatedFaceSet, PolygonalFaceSet (pre-tessellated meshes)
//! - `brep`: FacetedBrep, FaceBasedSurfaceModel, ShellBasedSurfaceModel (boundary representations)
//! - `boolean`: BooleanResult, BooleanClippingResult (first operand)
//! - `helpers`: Shared parse functions used by multiple processors

pub(crate) mod helpers;
mod boolean;
mod brep;
mod extrusion;
mod tessellated;

pub use boolean::BooleanClippingProcessor;
pub use brep::{FaceBasedSurfaceModelProcessor, FacetedBrepProcessor, ShellBasedSurfaceModelProcessor};
pub use extrusion::ExtrudedAreaSolidProcessor;
pub use tessellated::{PolygonalFaceSetProcessor, TriangulatedFaceSetProcessor};
