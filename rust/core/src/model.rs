// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opened IFC model: raw content, entity index, unit scale and the
//! relationship lookups needed to find roof elements.

use crate::decoder::{build_entity_index, EntityDecoder, EntityIndex};
use crate::entity::DecodedEntity;
use crate::error::Result;
use crate::header::{locate_data_section, parse_file_schema};
use crate::schema::IfcType;
use crate::units::extract_length_unit_scale;
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::Arc;

/// Identity and descriptive attributes of a building element
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementInfo {
    pub id: u32,
    pub global_id: Option<String>,
    pub name: Option<String>,
    /// Schema spelling (`IfcSlab`) for known types, the raw upper-case name otherwise
    pub type_name: String,
    pub predefined_type: Option<String>,
}

/// A parsed IFC file ready for querying
pub struct IfcModel {
    content: String,
    index: Arc<EntityIndex>,
    schema: Option<String>,
    unit_scale: f64,
    /// RelatingObject -> RelatedObjects, relationships in file order
    aggregates: FxHashMap<u32, Vec<u32>>,
    /// Object -> property definitions attached through IfcRelDefinesByProperties
    property_definitions: FxHashMap<u32, Vec<u32>>,
    /// Object -> type objects attached through IfcRelDefinesByType
    type_objects: FxHashMap<u32, Vec<u32>>,
}

impl IfcModel {
    /// Read and index an IFC file from disk
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected; STEP text is
    /// ASCII with escapes, so only comments or broken exporters produce them.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        Self::from_content(content)
    }

    /// Index STEP content already in memory
    pub fn from_content(content: String) -> Result<Self> {
        let data_start = locate_data_section(&content)?;
        let schema = parse_file_schema(&content[..data_start]);
        let index = Arc::new(build_entity_index(&content, data_start));

        let (unit_scale, aggregates, property_definitions, type_objects) = {
            let mut decoder = EntityDecoder::new(&content, Arc::clone(&index));

            let unit_scale = match index.ids_of_type("IFCPROJECT").first() {
                Some(&project_id) => extract_length_unit_scale(&mut decoder, project_id)?,
                None => 1.0,
            };

            // IFCRELAGGREGATES: RelatingObject (4), RelatedObjects (5)
            let aggregates = collect_relationships(&mut decoder, "IFCRELAGGREGATES", |rel| {
                rel.get_ref(4)
                    .map(|parent| (vec![parent], rel.get_ref_list(5)))
            })?;

            // IFCRELDEFINESBYPROPERTIES: RelatedObjects (4), RelatingPropertyDefinition (5)
            let property_definitions =
                collect_relationships(&mut decoder, "IFCRELDEFINESBYPROPERTIES", |rel| {
                    rel.get_ref(5)
                        .map(|definition| (rel.get_ref_list(4), vec![definition]))
                })?;

            // IFCRELDEFINESBYTYPE: RelatedObjects (4), RelatingType (5)
            let type_objects = collect_relationships(&mut decoder, "IFCRELDEFINESBYTYPE", |rel| {
                rel.get_ref(5)
                    .map(|type_object| (rel.get_ref_list(4), vec![type_object]))
            })?;

            (unit_scale, aggregates, property_definitions, type_objects)
        };

        Ok(Self {
            content,
            index,
            schema,
            unit_scale,
            aggregates,
            property_definitions,
            type_objects,
        })
    }

    /// Fresh decoder over this model, sharing the entity index
    pub fn decoder(&self) -> EntityDecoder<'_> {
        EntityDecoder::new(&self.content, Arc::clone(&self.index))
    }

    /// Schema identifier from the header, e.g. `IFC4`
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Factor converting model length units to metres
    pub fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    pub fn entity_count(&self) -> usize {
        self.index.len()
    }

    /// Monolithic IfcRoof elements in file order
    pub fn roofs(&self) -> &[u32] {
        self.index.ids_of_type("IFCROOF")
    }

    /// IfcSlab elements (subtypes included) whose PredefinedType is
    /// `.ROOF.`, in file order
    pub fn roof_slabs(&self) -> Result<Vec<u32>> {
        let slab_types = IfcType::SLABS.map(|ty| ty.as_str());
        let mut decoder = self.decoder();
        let mut slabs = Vec::new();
        for id in self.index.ids_of_types(&slab_types) {
            let slab = decoder.decode_by_id(id)?;
            if slab.get_enum(8) == Some("ROOF") {
                slabs.push(id);
            }
        }
        Ok(slabs)
    }

    /// Elements aggregated under `id`, one level deep, in relationship order
    pub fn aggregated_children(&self, id: u32) -> &[u32] {
        self.aggregates
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Identity and descriptive attributes of an element
    pub fn element(&self, id: u32) -> Result<ElementInfo> {
        let entity = self.decoder().decode_by_id(id)?;
        Ok(element_info(&entity))
    }

    /// Numeric value of `property` inside the property set or quantity set
    /// named `set` attached to element `id`
    ///
    /// Sets on the element itself win over sets inherited from its type object.
    pub fn property_value(&self, id: u32, set: &str, property: &str) -> Result<Option<f64>> {
        let mut decoder = self.decoder();

        if let Some(definitions) = self.property_definitions.get(&id) {
            if let Some(value) = find_property(&mut decoder, definitions, set, property)? {
                return Ok(Some(value));
            }
        }

        for &type_id in self.type_objects.get(&id).map(Vec::as_slice).unwrap_or(&[]) {
            // IfcTypeObject: HasPropertySets (5)
            let type_object = decoder.decode_by_id(type_id)?;
            let definitions = type_object.get_ref_list(5);
            if let Some(value) = find_property(&mut decoder, &definitions, set, property)? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }

    /// Area recorded by the authoring tool: `Pset_RoofCommon.TotalArea`,
    /// else `Dimensions.Area`
    pub fn authored_area(&self, id: u32) -> Result<Option<f64>> {
        match self.property_value(id, "Pset_RoofCommon", "TotalArea")? {
            Some(area) => Ok(Some(area)),
            None => self.property_value(id, "Dimensions", "Area"),
        }
    }
}

/// Fold every relationship of one type into a `from -> [to]` map
fn collect_relationships<F>(
    decoder: &mut EntityDecoder,
    type_name: &str,
    mut endpoints: F,
) -> Result<FxHashMap<u32, Vec<u32>>>
where
    F: FnMut(&DecodedEntity) -> Option<(Vec<u32>, Vec<u32>)>,
{
    let ids = decoder.ids_of_type(type_name).to_vec();
    let mut map: FxHashMap<u32, Vec<u32>> = FxHashMap::default();

    for id in ids {
        let relationship = decoder.decode_by_id(id)?;
        if let Some((sources, targets)) = endpoints(&relationship) {
            for source in sources {
                map.entry(source).or_default().extend(targets.iter().copied());
            }
        }
    }

    Ok(map)
}

/// First numeric `property` of a set named `set` among `definitions`
fn find_property(
    decoder: &mut EntityDecoder,
    definitions: &[u32],
    set: &str,
    property: &str,
) -> Result<Option<f64>> {
    for &definition_id in definitions {
        let definition = decoder.decode_by_id(definition_id)?;
        // IfcPropertySet and IfcElementQuantity both carry Name at attribute 2
        if definition.get_string(2) != Some(set) {
            continue;
        }

        let (members_at, value_at, member_type) = match definition.ifc_type {
            // HasProperties (4) of IfcPropertySingleValue: Name (0), NominalValue (2)
            IfcType::IfcPropertySet => (4, 2, IfcType::IfcPropertySingleValue),
            // Quantities (5) of IfcQuantityArea: Name (0), AreaValue (3)
            IfcType::IfcElementQuantity => (5, 3, IfcType::IfcQuantityArea),
            _ => continue,
        };

        for member in decoder.resolve_ref_list(&definition, members_at)? {
            if member.ifc_type == member_type && member.get_string(0) == Some(property) {
                if let Some(value) = member.get_float(value_at) {
                    return Ok(Some(value));
                }
            }
        }
    }

    Ok(None)
}

fn element_info(entity: &DecodedEntity) -> ElementInfo {
    // IfcRoot: GlobalId (0), Name (2); IfcRoof/IfcSlab: PredefinedType (8)
    let type_name = entity
        .ifc_type
        .element_name()
        .map(str::to_string)
        .unwrap_or_else(|| entity.type_name.clone());

    ElementInfo {
        id: entity.id,
        global_id: entity.get_string(0).map(str::to_string),
        name: entity
            .get_string(2)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        type_name,
        predefined_type: entity.get_enum(8).map(str::to_string),
    }
}

impl std::fmt::Debug for IfcModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IfcModel")
            .field("schema", &self.schema)
            .field("entities", &self.index.len())
            .field("unit_scale", &self.unit_scale)
            .finish()
    }
}
