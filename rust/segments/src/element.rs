// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interfaces to the building model and the mesh provider

use crate::error::Result;
use crate::faces::FaceSet;
use serde::{Deserialize, Serialize};

/// Handle to one building element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    /// Entity id, unique within the model
    pub id: u32,
    pub global_id: Option<String>,
    pub name: Option<String>,
    /// IFC entity name, e.g. `IfcSlab`
    pub type_name: String,
}

impl ElementRef {
    pub fn new(id: u32, type_name: impl Into<String>) -> Self {
        Self {
            id,
            global_id: None,
            name: None,
            type_name: type_name.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_global_id(mut self, global_id: impl Into<String>) -> Self {
        self.global_id = Some(global_id.into());
        self
    }

    /// Name when present, otherwise the type name
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.type_name,
        }
    }
}

/// Read access to the elements and relationships of a building model
///
/// All lists are in model order. Errors abort extraction.
pub trait BuildingModel {
    /// Monolithic roof elements (`IfcRoof`)
    fn roofs(&self) -> Result<Vec<ElementRef>>;

    /// Direct children of an element through aggregation
    fn aggregated_children(&self, element: &ElementRef) -> Result<Vec<ElementRef>>;

    /// Elements tagged with the roof predefined type (`IfcSlab .ROOF.`)
    fn roof_slabs(&self) -> Result<Vec<ElementRef>>;

    /// Previously authored roof area in m², if any
    fn authored_area(&self, _element: &ElementRef) -> Result<Option<f64>> {
        Ok(None)
    }
}

/// Produces the world-space faces of an element
///
/// Failures are reported per element and do not stop extraction.
pub trait MeshSource {
    fn face_set(&mut self, element: &ElementRef) -> Result<FaceSet>;
}
