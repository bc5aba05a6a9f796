// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! [`BuildingModel`] and [`MeshSource`] over an opened IFC file.

use ifc_roof_core::{EntityDecoder, IfcModel};
use ifc_roof_geometry::GeometryRouter;
use ifc_roof_segments::{BuildingModel, ElementRef, Error, FaceSet, MeshSource, Result};

/// Roof discovery and property lookups on an [`IfcModel`]
pub struct IfcBuildingModel<'m> {
    model: &'m IfcModel,
}

impl<'m> IfcBuildingModel<'m> {
    pub fn new(model: &'m IfcModel) -> Self {
        Self { model }
    }

    fn element(&self, id: u32) -> Result<ElementRef> {
        let info = self.model.element(id).map_err(Error::model)?;
        Ok(ElementRef {
            id: info.id,
            global_id: info.global_id,
            name: info.name,
            type_name: info.type_name,
        })
    }

    fn elements(&self, ids: &[u32]) -> Result<Vec<ElementRef>> {
        ids.iter().map(|&id| self.element(id)).collect()
    }
}

impl BuildingModel for IfcBuildingModel<'_> {
    fn roofs(&self) -> Result<Vec<ElementRef>> {
        self.elements(self.model.roofs())
    }

    fn aggregated_children(&self, element: &ElementRef) -> Result<Vec<ElementRef>> {
        self.elements(self.model.aggregated_children(element.id))
    }

    fn roof_slabs(&self) -> Result<Vec<ElementRef>> {
        let ids = self.model.roof_slabs().map_err(Error::model)?;
        self.elements(&ids)
    }

    fn authored_area(&self, element: &ElementRef) -> Result<Option<f64>> {
        self.model.authored_area(element.id).map_err(Error::model)
    }
}

/// World-space faces of IFC elements, meshed by the geometry router
pub struct IfcMeshSource<'m> {
    decoder: EntityDecoder<'m>,
    router: GeometryRouter,
}

impl<'m> IfcMeshSource<'m> {
    pub fn new(model: &'m IfcModel) -> Self {
        Self {
            decoder: model.decoder(),
            router: GeometryRouter::with_unit_scale(model.unit_scale()),
        }
    }
}

impl MeshSource for IfcMeshSource<'_> {
    fn face_set(&mut self, element: &ElementRef) -> Result<FaceSet> {
        let entity = self.decoder.decode_by_id(element.id).map_err(Error::mesh)?;
        let mesh = self
            .router
            .process_element(&entity, &mut self.decoder)
            .map_err(Error::mesh)?;

        tracing::debug!(
            id = element.id,
            triangles = mesh.triangle_count(),
            area = mesh.surface_area(),
            "meshed element"
        );

        FaceSet::from_triangles(&mesh.positions, &mesh.indices)
    }
}
