// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The OPC UA XML encoding of the builtin types, in the style of the Types.xsd schema.
//!
//! A value is written into an element created by its owner, i.e. the element named after the
//! field or the array item. Null values are marked with `xsi:nil="true"`.

use crate::{
    byte_string::ByteString,
    data_value::DataValue,
    date_time::DateTime,
    diagnostic_info::DiagnosticInfo,
    encoding::*,
    expanded_node_id::ExpandedNodeId,
    extension_object::ExtensionObject,
    guid::Guid,
    localized_text::LocalizedText,
    node_id::NodeId,
    qualified_name::QualifiedName,
    status_code::StatusCode,
    string::{UAString, XmlElement},
    variant::Variant,
    variant_type_id::VariantTypeId,
};

mod builtins;
mod node;
mod variant;

pub use self::node::{escape, XmlNode, XSI_NIL};

/// Implemented by every type that has an XML encoding.
pub trait XmlEncoder: Sized {
    /// Writes the value as the content of the element.
    fn encode_xml(&self, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()>;
    /// Reads the value from the content of the element.
    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self>;
}

/// Logs and returns the error for XML content that cannot be read.
pub(crate) fn unexpected(expected: &str, node: &XmlNode) -> EncodingError {
    error!(
        "Expected {} in element {}, got {:?}",
        expected, node.name, node.text
    );
    EncodingError::decoding(format!(
        "expected {} in element {}",
        expected, node.name
    ))
}

/// Writes a value into a new child element.
pub(crate) fn encode_child<T: XmlEncoder>(
    node: &mut XmlNode,
    name: &str,
    value: &T,
    ctx: &Context<'_>,
) -> EncodingResult<()> {
    let child = node.add_child(XmlNode::new(name));
    value.encode_xml(child, ctx).map_err(|e| e.with_field(name))
}

/// Reads a value from a child element. A missing child reads as a null element.
pub(crate) fn decode_child<T: XmlEncoder>(
    node: &XmlNode,
    name: &str,
    ctx: &Context<'_>,
) -> EncodingResult<T> {
    let result = match node.child(name) {
        Some(child) => T::decode_xml(child, ctx),
        None => T::decode_xml(&XmlNode::nil(name), ctx),
    };
    result.map_err(|e| e.with_field(name))
}

/// Reads a value from a child element that is left out when absent.
pub(crate) fn decode_optional_child<T: XmlEncoder>(
    node: &XmlNode,
    name: &str,
    ctx: &Context<'_>,
) -> EncodingResult<Option<T>> {
    match node.child(name) {
        Some(child) if !child.is_nil() => T::decode_xml(child, ctx)
            .map(Some)
            .map_err(|e| e.with_field(name)),
        _ => Ok(None),
    }
}

/// Encodes the value of a scalar variant into the element. An element of an array of `Variant`
/// is encoded as a complete variant.
pub fn encode_value(value: &Variant, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()> {
    match value {
        Variant::Empty => {
            node.set_nil();
            Ok(())
        }
        Variant::Boolean(v) => v.encode_xml(node, ctx),
        Variant::SByte(v) => v.encode_xml(node, ctx),
        Variant::Byte(v) => v.encode_xml(node, ctx),
        Variant::Int16(v) => v.encode_xml(node, ctx),
        Variant::UInt16(v) => v.encode_xml(node, ctx),
        Variant::Int32(v) => v.encode_xml(node, ctx),
        Variant::UInt32(v) => v.encode_xml(node, ctx),
        Variant::Int64(v) => v.encode_xml(node, ctx),
        Variant::UInt64(v) => v.encode_xml(node, ctx),
        Variant::Float(v) => v.encode_xml(node, ctx),
        Variant::Double(v) => v.encode_xml(node, ctx),
        Variant::String(v) | Variant::XmlElement(v) => v.encode_xml(node, ctx),
        Variant::DateTime(v) => v.encode_xml(node, ctx),
        Variant::Guid(v) => v.encode_xml(node, ctx),
        Variant::ByteString(v) => v.encode_xml(node, ctx),
        Variant::NodeId(v) => v.encode_xml(node, ctx),
        Variant::ExpandedNodeId(v) => v.encode_xml(node, ctx),
        Variant::StatusCode(v) => v.encode_xml(node, ctx),
        Variant::QualifiedName(v) => v.encode_xml(node, ctx),
        Variant::LocalizedText(v) => v.encode_xml(node, ctx),
        Variant::ExtensionObject(v) => v.encode_xml(node, ctx),
        Variant::Variant(v) => v.encode_xml(node, ctx),
        Variant::DataValue(v) => v.encode_xml(node, ctx),
        Variant::DiagnosticInfo(v) => v.encode_xml(node, ctx),
        Variant::Array(_) => Err(EncodingError::encoding_status(
            StatusCode::BadTypeMismatch,
            "nested arrays cannot be encoded",
        )),
    }
}

/// Decodes the value of a scalar of the kind from the element.
pub fn decode_value(kind: VariantTypeId, node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Variant> {
    let value = match kind {
        VariantTypeId::Empty => Variant::Empty,
        VariantTypeId::Boolean => Variant::from(bool::decode_xml(node, ctx)?),
        VariantTypeId::SByte => Variant::from(i8::decode_xml(node, ctx)?),
        VariantTypeId::Byte => Variant::from(u8::decode_xml(node, ctx)?),
        VariantTypeId::Int16 => Variant::from(i16::decode_xml(node, ctx)?),
        VariantTypeId::UInt16 => Variant::from(u16::decode_xml(node, ctx)?),
        VariantTypeId::Int32 => Variant::from(i32::decode_xml(node, ctx)?),
        VariantTypeId::UInt32 => Variant::from(u32::decode_xml(node, ctx)?),
        VariantTypeId::Int64 => Variant::from(i64::decode_xml(node, ctx)?),
        VariantTypeId::UInt64 => Variant::from(u64::decode_xml(node, ctx)?),
        VariantTypeId::Float => Variant::from(f32::decode_xml(node, ctx)?),
        VariantTypeId::Double => Variant::from(f64::decode_xml(node, ctx)?),
        VariantTypeId::String => Variant::from(UAString::decode_xml(node, ctx)?),
        VariantTypeId::XmlElement => Variant::XmlElement(XmlElement::decode_xml(node, ctx)?),
        VariantTypeId::DateTime => Variant::from(DateTime::decode_xml(node, ctx)?),
        VariantTypeId::Guid => Variant::from(Guid::decode_xml(node, ctx)?),
        VariantTypeId::ByteString => Variant::from(ByteString::decode_xml(node, ctx)?),
        VariantTypeId::NodeId => Variant::from(NodeId::decode_xml(node, ctx)?),
        VariantTypeId::ExpandedNodeId => Variant::from(ExpandedNodeId::decode_xml(node, ctx)?),
        VariantTypeId::StatusCode => Variant::from(StatusCode::decode_xml(node, ctx)?),
        VariantTypeId::QualifiedName => Variant::from(QualifiedName::decode_xml(node, ctx)?),
        VariantTypeId::LocalizedText => Variant::from(LocalizedText::decode_xml(node, ctx)?),
        VariantTypeId::ExtensionObject => Variant::from(ExtensionObject::decode_xml(node, ctx)?),
        VariantTypeId::Variant => {
            let _depth_lock = ctx.depth_lock()?;
            Variant::Variant(Box::new(Variant::decode_xml(node, ctx)?))
        }
        VariantTypeId::DataValue => {
            let _depth_lock = ctx.depth_lock()?;
            Variant::from(DataValue::decode_xml(node, ctx)?)
        }
        VariantTypeId::DiagnosticInfo => Variant::from(DiagnosticInfo::decode_xml(node, ctx)?),
    };
    Ok(value)
}
