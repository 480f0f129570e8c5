// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The reversible OPC UA JSON encoding of the builtin types.
//!
//! Values are converted to and from `serde_json::Value` trees. A missing member or a JSON `null`
//! decodes to the null / default value of the type, which is how the encoding omits defaults.

use serde_json::{Map, Value};

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
mod variant;

/// Stands in for members that are absent.
pub(crate) static NULL: Value = Value::Null;

/// Implemented by every type that has a JSON encoding.
pub trait JsonEncoder: Sized {
    fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value>;
    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self>;
}

/// Logs and returns the error for a JSON value of the wrong shape.
pub(crate) fn unexpected(expected: &str, json: &Value) -> EncodingError {
    error!("Expected {} in JSON, got {}", expected, json);
    EncodingError::decoding(format!("expected {}, got {}", expected, json))
}

/// Returns the members of a JSON object. `null` is treated as an object with no members.
pub(crate) fn object<'v>(json: &'v Value, expected: &str) -> EncodingResult<Option<&'v Map<String, Value>>> {
    match json {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        json => Err(unexpected(expected, json)),
    }
}

/// Returns a member of an optional object, `Value::Null` when it is absent.
pub(crate) fn member<'v>(map: Option<&'v Map<String, Value>>, name: &str) -> &'v Value {
    map.and_then(|m| m.get(name)).unwrap_or(&NULL)
}

/// Decodes an object member, adding the member name to the path of any error.
pub(crate) fn decode_member<T: JsonEncoder>(
    map: Option<&Map<String, Value>>,
    name: &str,
    ctx: &Context<'_>,
) -> EncodingResult<T> {
    T::decode_json(member(map, name), ctx).map_err(|e| e.with_field(name))
}

/// Decodes an object member that is left out when absent.
pub(crate) fn decode_optional_member<T: JsonEncoder>(
    map: Option<&Map<String, Value>>,
    name: &str,
    ctx: &Context<'_>,
) -> EncodingResult<Option<T>> {
    match member(map, name) {
        Value::Null => Ok(None),
        json => T::decode_json(json, ctx)
            .map(Some)
            .map_err(|e| e.with_field(name)),
    }
}

/// Encodes the value of a scalar variant, i.e. the body without the type. An element of an array
/// of `Variant` is encoded as a complete variant.
pub fn encode_value(value: &Variant, ctx: &Context<'_>) -> EncodingResult<Value> {
    match value {
        Variant::Empty => Ok(Value::Null),
        Variant::Boolean(v) => v.encode_json(ctx),
        Variant::SByte(v) => v.encode_json(ctx),
        Variant::Byte(v) => v.encode_json(ctx),
        Variant::Int16(v) => v.encode_json(ctx),
        Variant::UInt16(v) => v.encode_json(ctx),
        Variant::Int32(v) => v.encode_json(ctx),
        Variant::UInt32(v) => v.encode_json(ctx),
        Variant::Int64(v) => v.encode_json(ctx),
        Variant::UInt64(v) => v.encode_json(ctx),
        Variant::Float(v) => v.encode_json(ctx),
        Variant::Double(v) => v.encode_json(ctx),
        Variant::String(v) | Variant::XmlElement(v) => v.encode_json(ctx),
        Variant::DateTime(v) => v.encode_json(ctx),
        Variant::Guid(v) => v.encode_json(ctx),
        Variant::ByteString(v) => v.encode_json(ctx),
        Variant::NodeId(v) => v.encode_json(ctx),
        Variant::ExpandedNodeId(v) => v.encode_json(ctx),
        Variant::StatusCode(v) => v.encode_json(ctx),
        Variant::QualifiedName(v) => v.encode_json(ctx),
        Variant::LocalizedText(v) => v.encode_json(ctx),
        Variant::ExtensionObject(v) => v.encode_json(ctx),
        Variant::Variant(v) => v.encode_json(ctx),
        Variant::DataValue(v) => v.encode_json(ctx),
        Variant::DiagnosticInfo(v) => v.encode_json(ctx),
        Variant::Array(_) => Err(EncodingError::encoding_status(
            StatusCode::BadTypeMismatch,
            "nested arrays cannot be encoded",
        )),
    }
}

/// Decodes the value of a scalar of the kind.
pub fn decode_value(kind: VariantTypeId, json: &Value, ctx: &Context<'_>) -> EncodingResult<Variant> {
    let value = match kind {
        VariantTypeId::Empty => Variant::Empty,
        VariantTypeId::Boolean => Variant::from(bool::decode_json(json, ctx)?),
        VariantTypeId::SByte => Variant::from(i8::decode_json(json, ctx)?),
        VariantTypeId::Byte => Variant::from(u8::decode_json(json, ctx)?),
        VariantTypeId::Int16 => Variant::from(i16::decode_json(json, ctx)?),
        VariantTypeId::UInt16 => Variant::from(u16::decode_json(json, ctx)?),
        VariantTypeId::Int32 => Variant::from(i32::decode_json(json, ctx)?),
        VariantTypeId::UInt32 => Variant::from(u32::decode_json(json, ctx)?),
        VariantTypeId::Int64 => Variant::from(i64::decode_json(json, ctx)?),
        VariantTypeId::UInt64 => Variant::from(u64::decode_json(json, ctx)?),
        VariantTypeId::Float => Variant::from(f32::decode_json(json, ctx)?),
        VariantTypeId::Double => Variant::from(f64::decode_json(json, ctx)?),
        VariantTypeId::String => Variant::from(UAString::decode_json(json, ctx)?),
        VariantTypeId::XmlElement => Variant::XmlElement(XmlElement::decode_json(json, ctx)?),
        VariantTypeId::DateTime => Variant::from(DateTime::decode_json(json, ctx)?),
        VariantTypeId::Guid => Variant::from(Guid::decode_json(json, ctx)?),
        VariantTypeId::ByteString => Variant::from(ByteString::decode_json(json, ctx)?),
        VariantTypeId::NodeId => Variant::from(NodeId::decode_json(json, ctx)?),
        VariantTypeId::ExpandedNodeId => Variant::from(ExpandedNodeId::decode_json(json, ctx)?),
        VariantTypeId::StatusCode => Variant::from(StatusCode::decode_json(json, ctx)?),
        VariantTypeId::QualifiedName => Variant::from(QualifiedName::decode_json(json, ctx)?),
        VariantTypeId::LocalizedText => Variant::from(LocalizedText::decode_json(json, ctx)?),
        VariantTypeId::ExtensionObject => Variant::from(ExtensionObject::decode_json(json, ctx)?),
        VariantTypeId::Variant => {
            let _depth_lock = ctx.depth_lock()?;
            Variant::Variant(Box::new(Variant::decode_json(json, ctx)?))
        }
        VariantTypeId::DataValue => {
            let _depth_lock = ctx.depth_lock()?;
            Variant::from(DataValue::decode_json(json, ctx)?)
        }
        VariantTypeId::DiagnosticInfo => Variant::from(DiagnosticInfo::decode_json(json, ctx)?),
    };
    Ok(value)
}
