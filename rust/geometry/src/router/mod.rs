// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Router - Dynamic dispatch to geometry processors
//!
//! Routes IFC representation items to the processor registered for their
//! type, then places the merged element mesh in world coordinates (metres).

mod mapped;
mod transforms;

use crate::processors::{
    BooleanClippingProcessor, ExtrudedAreaSolidProcessor, FaceBasedSurfaceModelProcessor,
    FacetedBrepProcessor, PolygonalFaceSetProcessor, ShellBasedSurfaceModelProcessor,
    TriangulatedFaceSetProcessor,
};
use crate::{Error, Mesh, Result};
use ifc_roof_core::{DecodedEntity, EntityDecoder, IfcType};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Representation identifiers that never describe the 3D body
const NON_BODY_IDENTIFIERS: &[&str] = &["Axis", "FootPrint", "Box", "Annotation", "Profile"];

/// Geometry processor trait
/// Each processor handles one type of IFC representation item
pub trait GeometryProcessor {
    /// Process entity into a mesh in the item's own coordinate system
    fn process(&self, entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Mesh>;

    /// Get supported IFC types
    fn supported_types(&self) -> Vec<IfcType>;
}

/// Geometry router - routes entities to processors
pub struct GeometryRouter {
    processors: FxHashMap<IfcType, Arc<dyn GeometryProcessor>>,
    /// Unit scale factor (e.g., 0.001 for millimeters -> meters)
    /// Applied to all mesh positions after placement
    unit_scale: f64,
}

impl GeometryRouter {
    /// Create new router with default processors
    pub fn new() -> Self {
        let mut router = Self {
            processors: FxHashMap::default(),
            unit_scale: 1.0,
        };

        router.register(Box::new(ExtrudedAreaSolidProcessor::new()));
        router.register(Box::new(TriangulatedFaceSetProcessor::new()));
        router.register(Box::new(PolygonalFaceSetProcessor::new()));
        router.register(Box::new(FacetedBrepProcessor::new()));
        router.register(Box::new(ShellBasedSurfaceModelProcessor::new()));
        router.register(Box::new(FaceBasedSurfaceModelProcessor::new()));
        router.register(Box::new(BooleanClippingProcessor::new()));

        router
    }

    /// Create router with a model length unit scale
    pub fn with_unit_scale(unit_scale: f64) -> Self {
        let mut router = Self::new();
        router.unit_scale = unit_scale;
        router
    }

    /// Unit scale applied to output meshes
    pub fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    /// Register a processor for all the types it supports
    pub fn register(&mut self, processor: Box<dyn GeometryProcessor>) {
        let processor: Arc<dyn GeometryProcessor> = Arc::from(processor);
        for ifc_type in processor.supported_types() {
            self.processors.insert(ifc_type, Arc::clone(&processor));
        }
    }

    /// Whether an item type has a registered processor
    pub fn supports(&self, ifc_type: IfcType) -> bool {
        ifc_type == IfcType::IfcMappedItem || self.processors.contains_key(&ifc_type)
    }

    /// Mesh a single representation item in its own coordinates
    ///
    /// Mapped items are expanded by the router so their nested items reach
    /// every registered processor.
    pub fn process_item(&self, item: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Mesh> {
        if item.ifc_type == IfcType::IfcMappedItem {
            return self.process_mapped_item(item, decoder, 0);
        }
        match self.processors.get(&item.ifc_type) {
            Some(processor) => processor.process(item, decoder),
            None => Err(Error::Unsupported(item.type_name.clone())),
        }
    }

    /// Mesh a building element: Body representation items merged, placed in
    /// world coordinates and scaled to metres
    ///
    /// Items that fail or are unsupported are skipped; if nothing is left the
    /// result is [`Error::EmptyMesh`].
    pub fn process_element(
        &self,
        element: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Mesh> {
        let items = self.body_items(element, decoder)?;

        let mut mesh = Mesh::new();
        for item in &items {
            match self.process_item(item, decoder) {
                Ok(item_mesh) => mesh.merge(&item_mesh),
                Err(e) => tracing::debug!(
                    element = element.id,
                    item = item.id,
                    error = %e,
                    "skipping representation item"
                ),
            }
        }

        if mesh.is_empty() {
            return Err(Error::EmptyMesh(format!(
                "#{} has no supported body geometry",
                element.id
            )));
        }

        let placement = self.element_placement(element, decoder)?;
        mesh.transform(&placement);
        mesh.scale(self.unit_scale);
        Ok(mesh)
    }

    /// Items of the element's Body shape representation
    fn body_items(
        &self,
        element: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Arc<DecodedEntity>>> {
        // IfcProduct: Representation (6) -> IfcProductDefinitionShape
        let shape = match decoder.resolve_ref(element, 6)? {
            Some(shape) => shape,
            None => {
                return Err(Error::EmptyMesh(format!(
                    "#{} has no representation",
                    element.id
                )))
            }
        };

        // IfcProductDefinitionShape: Name, Description, Representations
        let representations = decoder.resolve_ref_list(&shape, 2)?;

        // IfcShapeRepresentation: ContextOfItems, RepresentationIdentifier, RepresentationType, Items
        let body = representations
            .iter()
            .find(|rep| rep.get_string(1) == Some("Body"))
            .or_else(|| {
                representations.iter().find(|rep| {
                    rep.get_string(1)
                        .map_or(true, |id| !NON_BODY_IDENTIFIERS.contains(&id))
                })
            })
            .cloned();

        match body {
            Some(body) => Ok(decoder.resolve_ref_list(&body, 3)?),
            None => Err(Error::EmptyMesh(format!(
                "#{} has no body representation",
                element.id
            ))),
        }
    }
}

impl Default for GeometryRouter {
    fn default() -> Self {
        Self::new()
    }
}
