// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The FilterOperand family. FilterOperand itself is abstract and declares no fields, so every
//! operand is one of the four leaves and travels with the leaf's own encoding id.

use std::convert::TryFrom;

use crate::{
    encoding::{EncodingError, EncodingResult},
    extension_object::ExtensionObject,
    node_id::NodeId,
    node_ids::DataTypeId,
    qualified_name::QualifiedName,
    status_code::StatusCode,
    string::UAString,
    struct_codec::{scalar_element, FieldValue, StructValue},
    variant::Variant,
};

use super::{RelativePath, Structure, UaStructure};

/// The Value attribute, the attribute an operand reads unless told otherwise.
pub const VALUE_ATTRIBUTE_ID: u32 = 13;

/// Refers to the result of another element of the same content filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementOperand {
    pub index: u32,
}

impl UaStructure for ElementOperand {
    fn data_type_id() -> NodeId {
        DataTypeId::ElementOperand.into()
    }

    fn to_struct_value(&self) -> StructValue {
        StructValue::new(DataTypeId::ElementOperand).with("Index", self.index)
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(ElementOperand {
            index: value.take_scalar("Index")?,
        })
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiteralOperand {
    pub value: Variant,
}

impl UaStructure for LiteralOperand {
    fn data_type_id() -> NodeId {
        DataTypeId::LiteralOperand.into()
    }

    fn to_struct_value(&self) -> StructValue {
        StructValue::new(DataTypeId::LiteralOperand).with("Value", self.value.clone())
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(LiteralOperand {
            value: value.take_variant("Value")?,
        })
    }
}

macro_rules! literal_operand_from_impl {
    ($($rtype: ty),*) => {
        $(
            impl From<$rtype> for LiteralOperand {
                fn from(v: $rtype) -> Self {
                    Self::from(Variant::from(v))
                }
            }
        )*
    };
}

literal_operand_from_impl!(i8, u8, i16, u16, i32, u32, f32, f64, bool, &str, ());

impl From<Variant> for LiteralOperand {
    fn from(v: Variant) -> Self {
        LiteralOperand { value: v }
    }
}

/// An attribute of a node reached by a browse path, with an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeOperand {
    pub node_id: NodeId,
    pub alias: UAString,
    pub browse_path: RelativePath,
    pub attribute_id: u32,
    pub index_range: UAString,
}

impl UaStructure for AttributeOperand {
    fn data_type_id() -> NodeId {
        DataTypeId::AttributeOperand.into()
    }

    fn to_struct_value(&self) -> StructValue {
        StructValue::new(DataTypeId::AttributeOperand)
            .with("NodeId", self.node_id.clone())
            .with("Alias", self.alias.clone())
            .with("BrowsePath", self.browse_path.to_struct_value())
            .with("AttributeId", self.attribute_id)
            .with("IndexRange", self.index_range.clone())
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(AttributeOperand {
            node_id: value.take_scalar("NodeId")?,
            alias: value.take_scalar("Alias")?,
            browse_path: RelativePath::from_struct_value(value.take_struct("BrowsePath")?)
                .map_err(|e| e.with_field("BrowsePath"))?,
            attribute_id: value.take_scalar("AttributeId")?,
            index_range: value.take_scalar("IndexRange")?,
        })
    }
}

/// An attribute of a node reached from a type definition by a path of browse names.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleAttributeOperand {
    pub type_definition_id: NodeId,
    pub browse_path: Option<Vec<QualifiedName>>,
    pub attribute_id: u32,
    pub index_range: UAString,
}

impl UaStructure for SimpleAttributeOperand {
    fn data_type_id() -> NodeId {
        DataTypeId::SimpleAttributeOperand.into()
    }

    fn to_struct_value(&self) -> StructValue {
        let browse_path = FieldValue::Array(
            self.browse_path
                .as_ref()
                .map(|p| p.iter().cloned().map(FieldValue::from).collect()),
        );
        StructValue::new(DataTypeId::SimpleAttributeOperand)
            .with("TypeDefinitionId", self.type_definition_id.clone())
            .with("BrowsePath", browse_path)
            .with("AttributeId", self.attribute_id)
            .with("IndexRange", self.index_range.clone())
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(SimpleAttributeOperand {
            type_definition_id: value.take_scalar("TypeDefinitionId")?,
            browse_path: value.take_array("BrowsePath", scalar_element::<QualifiedName>)?,
            attribute_id: value.take_scalar("AttributeId")?,
            index_range: value.take_scalar("IndexRange")?,
        })
    }
}

impl SimpleAttributeOperand {
    /// Creates a simple attribute operand. The browse path is the browse names separated by `/`,
    /// with `\/` standing for a slash inside a name.
    pub fn new<T>(
        type_definition_id: T,
        browse_path: &str,
        attribute_id: u32,
        index_range: UAString,
    ) -> Self
    where
        T: Into<NodeId>,
    {
        let mut names = Vec::new();
        let mut name = String::new();
        let mut chars = browse_path.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'/') => {
                    name.push('/');
                    chars.next();
                }
                '/' => names.push(QualifiedName::new(0, std::mem::take(&mut name))),
                c => name.push(c),
            }
        }
        names.push(QualifiedName::new(0, name));
        SimpleAttributeOperand {
            type_definition_id: type_definition_id.into(),
            browse_path: Some(names),
            attribute_id,
            index_range,
        }
    }
}

/// An operand of a content filter element.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOperand {
    Element(ElementOperand),
    Literal(LiteralOperand),
    Attribute(AttributeOperand),
    SimpleAttribute(SimpleAttributeOperand),
}

impl From<ElementOperand> for FilterOperand {
    fn from(v: ElementOperand) -> Self {
        FilterOperand::Element(v)
    }
}

impl From<LiteralOperand> for FilterOperand {
    fn from(v: LiteralOperand) -> Self {
        FilterOperand::Literal(v)
    }
}

impl From<AttributeOperand> for FilterOperand {
    fn from(v: AttributeOperand) -> Self {
        FilterOperand::Attribute(v)
    }
}

impl From<SimpleAttributeOperand> for FilterOperand {
    fn from(v: SimpleAttributeOperand) -> Self {
        FilterOperand::SimpleAttribute(v)
    }
}

impl From<FilterOperand> for Structure {
    fn from(v: FilterOperand) -> Self {
        match v {
            FilterOperand::Element(op) => Structure::ElementOperand(op),
            FilterOperand::Literal(op) => Structure::LiteralOperand(op),
            FilterOperand::Attribute(op) => Structure::AttributeOperand(op),
            FilterOperand::SimpleAttribute(op) => Structure::SimpleAttributeOperand(op),
        }
    }
}

impl From<&FilterOperand> for ExtensionObject {
    fn from(v: &FilterOperand) -> Self {
        ExtensionObject::from_structure(v.clone())
    }
}

impl From<FilterOperand> for ExtensionObject {
    fn from(v: FilterOperand) -> Self {
        ExtensionObject::from_structure(v)
    }
}

impl TryFrom<Structure> for FilterOperand {
    type Error = EncodingError;

    fn try_from(v: Structure) -> Result<Self, Self::Error> {
        match v {
            Structure::ElementOperand(op) => Ok(FilterOperand::Element(op)),
            Structure::LiteralOperand(op) => Ok(FilterOperand::Literal(op)),
            Structure::AttributeOperand(op) => Ok(FilterOperand::Attribute(op)),
            Structure::SimpleAttributeOperand(op) => Ok(FilterOperand::SimpleAttribute(op)),
            other => {
                error!("Structure {} is not a filter operand", other.type_id());
                Err(EncodingError::decoding_status(
                    StatusCode::BadFilterOperandInvalid,
                    format!("structure {} is not a filter operand", other.type_id()),
                ))
            }
        }
    }
}

impl TryFrom<&ExtensionObject> for FilterOperand {
    type Error = EncodingError;

    fn try_from(v: &ExtensionObject) -> Result<Self, Self::Error> {
        match v.structure() {
            Some(structure) => FilterOperand::try_from(structure.clone()),
            None => Err(EncodingError::decoding_status(
                StatusCode::BadFilterOperandInvalid,
                format!("extension object {} holds no decoded operand", v.node_id),
            )),
        }
    }
}

impl FilterOperand {
    pub fn element(index: u32) -> FilterOperand {
        ElementOperand { index }.into()
    }

    pub fn literal<T>(literal: T) -> FilterOperand
    where
        T: Into<LiteralOperand>,
    {
        FilterOperand::Literal(literal.into())
    }

    /// Creates a simple attribute operand. The browse path is the browse name using / as a separator.
    pub fn simple_attribute<T>(
        type_definition_id: T,
        browse_path: &str,
        attribute_id: u32,
        index_range: UAString,
    ) -> FilterOperand
    where
        T: Into<NodeId>,
    {
        SimpleAttributeOperand::new(type_definition_id, browse_path, attribute_id, index_range)
            .into()
    }

    pub fn is_element(&self) -> bool {
        matches!(self, FilterOperand::Element(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, FilterOperand::Literal(_))
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, FilterOperand::Attribute(_))
    }

    pub fn is_simple_attribute(&self) -> bool {
        matches!(self, FilterOperand::SimpleAttribute(_))
    }
}
