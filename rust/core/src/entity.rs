// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded entity instances and their attribute values.

use crate::schema::IfcType;

/// IFC entity attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal with STEP escapes resolved
    String(String),
    /// Integer: 42
    Integer(i64),
    /// Real: 3.14, 0., 1.5E-10
    Float(f64),
    /// Enumeration without the surrounding dots: .ROOF. -> ROOF
    Enum(String),
    /// List: (1, 2, 3)
    List(Vec<AttributeValue>),
    /// Typed value: IFCAREAMEASURE(12.5)
    Typed(String, Box<AttributeValue>),
    /// Null value: $
    Null,
    /// Derived value: *
    Derived,
}

impl AttributeValue {
    /// Get as entity reference
    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as string (also unwraps typed labels such as IFCLABEL('x'))
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::Typed(_, inner) => inner.as_string(),
            _ => None,
        }
    }

    /// Get as enum value
    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Get as boolean (.T. / .F.)
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_enum()? {
            "T" | "TRUE" => Some(true),
            "F" | "FALSE" => Some(false),
            _ => None,
        }
    }

    /// Get as float; integers and typed measures are converted
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Typed(_, inner) => inner.as_float(),
            _ => None,
        }
    }

    /// Get as integer
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            AttributeValue::Typed(_, inner) => inner.as_int(),
            _ => None,
        }
    }

    /// Get as list
    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if null/derived
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }

    /// Read a coordinate tuple `(x, y[, z])`, padding missing components with 0
    pub fn as_coordinates(&self) -> Option<[f64; 3]> {
        let list = self.as_list()?;
        if list.is_empty() {
            return None;
        }
        let mut coords = [0.0; 3];
        for (slot, value) in coords.iter_mut().zip(list) {
            *slot = value.as_float()?;
        }
        Some(coords)
    }
}

/// Decoded IFC entity with attributes
#[derive(Debug, Clone)]
pub struct DecodedEntity {
    pub id: u32,
    pub ifc_type: IfcType,
    /// Upper-case type name exactly as written in the file
    pub type_name: String,
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    /// Create new decoded entity
    pub fn new(id: u32, type_name: &str, attributes: Vec<AttributeValue>) -> Self {
        Self {
            id,
            ifc_type: IfcType::from_name(type_name),
            type_name: type_name.to_string(),
            attributes,
        }
    }

    /// Get attribute by index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference attribute
    pub fn get_ref(&self, index: usize) -> Option<u32> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get string attribute
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    /// Get enum attribute
    pub fn get_enum(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_enum())
    }

    /// Get float attribute
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    /// Get list attribute
    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index).and_then(|v| v.as_list())
    }

    /// Entity references held in a list attribute; non-references are skipped
    pub fn get_ref_list(&self, index: usize) -> Vec<u32> {
        self.get_list(index)
            .map(|items| items.iter().filter_map(|v| v.as_entity_ref()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_values_unwrap() {
        let area = AttributeValue::Typed(
            "IFCAREAMEASURE".to_string(),
            Box::new(AttributeValue::Float(42.5)),
        );
        assert_eq!(area.as_float(), Some(42.5));

        let label = AttributeValue::Typed(
            "IFCLABEL".to_string(),
            Box::new(AttributeValue::String("Roof".to_string())),
        );
        assert_eq!(label.as_string(), Some("Roof"));
    }

    #[test]
    fn test_as_coordinates_pads_2d_points() {
        let point = AttributeValue::List(vec![
            AttributeValue::Float(1.0),
            AttributeValue::Integer(2),
        ]);
        assert_eq!(point.as_coordinates(), Some([1.0, 2.0, 0.0]));
        assert_eq!(AttributeValue::Null.as_coordinates(), None);
    }

    #[test]
    fn test_decoded_entity_accessors() {
        let entity = DecodedEntity::new(
            7,
            "IFCSLAB",
            vec![
                AttributeValue::String("guid".to_string()),
                AttributeValue::Null,
                AttributeValue::List(vec![AttributeValue::EntityRef(3), AttributeValue::Null]),
                AttributeValue::Enum("ROOF".to_string()),
            ],
        );
        assert_eq!(entity.ifc_type, IfcType::IfcSlab);
        assert_eq!(entity.get_string(0), Some("guid"));
        assert_eq!(entity.get_ref_list(2), vec![3]);
        assert_eq!(entity.get_enum(3), Some("ROOF"));
        assert!(entity.get(1).is_some_and(|v| v.is_null()));
        assert!(entity.get(9).is_none());
    }
}
