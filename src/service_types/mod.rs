// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Rust types for the structures of the standard type table.
//!
//! Every leaf is a thin consumer of the struct engine: it converts itself to and from a
//! [`StructValue`] and the engine does the encoding in each format. [`Structure`] is the sum of
//! all the leaves, which is what a decoded extension object body holds.

use std::io::{Read, Write};

use serde_json::Value;

use crate::{
    encoding::*,
    json::JsonEncoder,
    node_id::NodeId,
    node_ids::DataTypeId,
    status_code::StatusCode,
    struct_codec::{self, StructDecoder, StructEncoder, StructValue},
    xml::{XmlEncoder, XmlNode},
};

mod argument;
pub(crate) mod content_filter;
mod eu_information;
mod operand;
mod range;
mod relative_path;

pub use self::{
    argument::Argument,
    content_filter::{ContentFilter, ContentFilterBuilder, ContentFilterElement, FilterOperator},
    eu_information::EUInformation,
    operand::{
        AttributeOperand, ElementOperand, FilterOperand, LiteralOperand, SimpleAttributeOperand,
    },
    range::{Range, XVType},
    relative_path::{RelativePath, RelativePathElement},
};

/// A structure with a Rust representation.
pub trait UaStructure: Sized {
    /// The data type id of the structure.
    fn data_type_id() -> NodeId;

    fn to_struct_value(&self) -> StructValue;

    fn from_struct_value(value: StructValue) -> EncodingResult<Self>;

    /// Encodes the structure through any of the struct engine's framings.
    fn encode_with<E: StructEncoder>(&self, encoder: &mut E, ctx: &Context<'_>) -> EncodingResult<()> {
        struct_codec::encode_struct(encoder, None, &self.to_struct_value(), ctx)
    }

    fn decode_with<D: StructDecoder>(decoder: &mut D, ctx: &Context<'_>) -> EncodingResult<Self> {
        let value = struct_codec::decode_struct(decoder, None, &Self::data_type_id(), ctx)?;
        Self::from_struct_value(value)
    }
}

/// Implements the three wire encodings of a structure on top of its `UaStructure` impl.
macro_rules! ua_structure_codecs {
    ($($t: ident),* $(,)?) => {
        $(
            impl BinaryEncoder<$t> for $t {
                fn byte_len(&self, ctx: &Context<'_>) -> usize {
                    struct_codec::byte_len(&self.to_struct_value(), ctx).unwrap_or(0)
                }

                fn encode<S: Write>(&self, stream: &mut S, ctx: &Context<'_>) -> EncodingResult<usize> {
                    struct_codec::encode_binary(stream, &self.to_struct_value(), ctx)
                }

                fn decode<S: Read>(stream: &mut S, ctx: &Context<'_>) -> EncodingResult<Self> {
                    Self::from_struct_value(struct_codec::decode_binary(stream, &Self::data_type_id(), ctx)?)
                }
            }

            impl JsonEncoder for $t {
                fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value> {
                    struct_codec::encode_json(&self.to_struct_value(), ctx)
                }

                fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
                    Self::from_struct_value(struct_codec::decode_json(json, &Self::data_type_id(), ctx)?)
                }
            }

            impl XmlEncoder for $t {
                fn encode_xml(&self, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()> {
                    let encoded = struct_codec::encode_xml(&self.to_struct_value(), ctx)?;
                    node.children.extend(encoded.children);
                    Ok(())
                }

                fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
                    Self::from_struct_value(struct_codec::decode_xml(node, &Self::data_type_id(), ctx)?)
                }
            }
        )*
    };
}

ua_structure_codecs!(
    Range,
    XVType,
    EUInformation,
    Argument,
    RelativePathElement,
    RelativePath,
    ContentFilterElement,
    ContentFilter,
    ElementOperand,
    LiteralOperand,
    AttributeOperand,
    SimpleAttributeOperand,
);

/// Every structure a decoded extension object body can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Structure {
    Range(Range),
    XVType(XVType),
    EUInformation(EUInformation),
    Argument(Argument),
    RelativePathElement(RelativePathElement),
    RelativePath(RelativePath),
    ContentFilterElement(ContentFilterElement),
    ContentFilter(ContentFilter),
    ElementOperand(ElementOperand),
    LiteralOperand(LiteralOperand),
    AttributeOperand(AttributeOperand),
    SimpleAttributeOperand(SimpleAttributeOperand),
    /// A registered structure with no Rust type of its own.
    Dynamic(StructValue),
}

macro_rules! structure_from_impl {
    ($($t: ident),*) => {
        $(
            impl From<$t> for Structure {
                fn from(v: $t) -> Self {
                    Structure::$t(v)
                }
            }
        )*
    };
}

structure_from_impl!(
    Range,
    XVType,
    EUInformation,
    Argument,
    RelativePathElement,
    RelativePath,
    ContentFilterElement,
    ContentFilter,
    ElementOperand,
    LiteralOperand,
    AttributeOperand,
    SimpleAttributeOperand
);

impl From<StructValue> for Structure {
    fn from(v: StructValue) -> Self {
        Structure::Dynamic(v)
    }
}

impl Structure {
    /// The data type id of the structure.
    pub fn type_id(&self) -> NodeId {
        match self {
            Structure::Range(_) => Range::data_type_id(),
            Structure::XVType(_) => XVType::data_type_id(),
            Structure::EUInformation(_) => EUInformation::data_type_id(),
            Structure::Argument(_) => Argument::data_type_id(),
            Structure::RelativePathElement(_) => RelativePathElement::data_type_id(),
            Structure::RelativePath(_) => RelativePath::data_type_id(),
            Structure::ContentFilterElement(_) => ContentFilterElement::data_type_id(),
            Structure::ContentFilter(_) => ContentFilter::data_type_id(),
            Structure::ElementOperand(_) => ElementOperand::data_type_id(),
            Structure::LiteralOperand(_) => LiteralOperand::data_type_id(),
            Structure::AttributeOperand(_) => AttributeOperand::data_type_id(),
            Structure::SimpleAttributeOperand(_) => SimpleAttributeOperand::data_type_id(),
            Structure::Dynamic(value) => value.type_id.clone(),
        }
    }

    pub fn to_struct_value(&self) -> StructValue {
        match self {
            Structure::Range(v) => v.to_struct_value(),
            Structure::XVType(v) => v.to_struct_value(),
            Structure::EUInformation(v) => v.to_struct_value(),
            Structure::Argument(v) => v.to_struct_value(),
            Structure::RelativePathElement(v) => v.to_struct_value(),
            Structure::RelativePath(v) => v.to_struct_value(),
            Structure::ContentFilterElement(v) => v.to_struct_value(),
            Structure::ContentFilter(v) => v.to_struct_value(),
            Structure::ElementOperand(v) => v.to_struct_value(),
            Structure::LiteralOperand(v) => v.to_struct_value(),
            Structure::AttributeOperand(v) => v.to_struct_value(),
            Structure::SimpleAttributeOperand(v) => v.to_struct_value(),
            Structure::Dynamic(value) => value.clone(),
        }
    }

    /// Converts a decoded value into the leaf of its data type. Values of types without a leaf
    /// stay dynamic.
    pub fn from_struct_value(value: StructValue) -> EncodingResult<Structure> {
        let data_type_id = match value.type_id.as_data_type_id() {
            Some(data_type_id) => data_type_id,
            None => return Ok(Structure::Dynamic(value)),
        };
        let structure = match data_type_id {
            DataTypeId::Range => Range::from_struct_value(value)?.into(),
            DataTypeId::XVType => XVType::from_struct_value(value)?.into(),
            DataTypeId::EUInformation => EUInformation::from_struct_value(value)?.into(),
            DataTypeId::Argument => Argument::from_struct_value(value)?.into(),
            DataTypeId::RelativePathElement => RelativePathElement::from_struct_value(value)?.into(),
            DataTypeId::RelativePath => RelativePath::from_struct_value(value)?.into(),
            DataTypeId::ContentFilterElement => ContentFilterElement::from_struct_value(value)?.into(),
            DataTypeId::ContentFilter => ContentFilter::from_struct_value(value)?.into(),
            DataTypeId::ElementOperand => ElementOperand::from_struct_value(value)?.into(),
            DataTypeId::LiteralOperand => LiteralOperand::from_struct_value(value)?.into(),
            DataTypeId::AttributeOperand => AttributeOperand::from_struct_value(value)?.into(),
            DataTypeId::SimpleAttributeOperand => {
                SimpleAttributeOperand::from_struct_value(value)?.into()
            }
            _ => Structure::Dynamic(value),
        };
        Ok(structure)
    }

    /// Converts the structure into the leaf type `T`.
    pub fn into_leaf<T: UaStructure>(self) -> EncodingResult<T> {
        let type_id = self.type_id();
        if type_id != T::data_type_id() {
            Err(EncodingError::decoding_status(
                StatusCode::BadTypeMismatch,
                format!("structure {} is not a {}", type_id, T::data_type_id()),
            ))
        } else {
            T::from_struct_value(self.to_struct_value())
        }
    }
}
