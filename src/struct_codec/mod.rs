// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The struct engine encodes and decodes any registered structure by walking its field schema.
//!
//! The engine only knows the layout rules: supertype fields first, optional field masks, union
//! switches, arrays and matrices. Framing is left to a [`StructEncoder`] / [`StructDecoder`]
//! pair, implemented once for each of the binary, JSON and XML encodings.

use std::io::{Read, Write};

use crate::{
    array::dimensions_length,
    encoding::*,
    node_id::NodeId,
    status_code::StatusCode,
    type_registry::{EnumDescriptor, FieldDescriptor, FieldType, StructureKind, TypeDescriptor},
    variant::Variant,
    variant_type_id::VariantTypeId,
    xml::XmlNode,
};

mod binary;
mod json;
mod value;
mod xml;

pub use self::{
    binary::{BinaryStructDecoder, BinaryStructEncoder},
    json::{JsonStructDecoder, JsonStructEncoder},
    value::*,
    xml::{XmlStructDecoder, XmlStructEncoder},
};

/// Name of the mask that precedes the fields of a structure with optional fields.
pub const ENCODING_MASK: &str = "EncodingMask";
/// Name of the switch that precedes the field of a union.
pub const SWITCH_FIELD: &str = "SwitchField";

/// The framing operations of one wire format, driven by the engine while encoding.
pub trait StructEncoder {
    fn begin_struct(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<()>;
    fn end_struct(&mut self, ctx: &Context<'_>) -> EncodingResult<()>;
    /// Writes the UInt32 encoding mask or union switch.
    fn write_switch(&mut self, name: &str, value: u32, ctx: &Context<'_>) -> EncodingResult<()>;
    /// Writes a value of a builtin kind. A field of kind `Variant` takes any value.
    fn write_scalar(
        &mut self,
        name: &str,
        kind: VariantTypeId,
        value: &Variant,
        ctx: &Context<'_>,
    ) -> EncodingResult<()>;
    fn write_enum(
        &mut self,
        name: &str,
        value: i32,
        descriptor: &EnumDescriptor,
        ctx: &Context<'_>,
    ) -> EncodingResult<()>;
    /// Writes a null array or a null matrix.
    fn write_null_array(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<()>;
    fn begin_array(&mut self, name: &str, len: usize, ctx: &Context<'_>) -> EncodingResult<()>;
    fn end_array(&mut self, ctx: &Context<'_>) -> EncodingResult<()>;
    fn begin_matrix(
        &mut self,
        name: &str,
        dimensions: &[u32],
        ctx: &Context<'_>,
    ) -> EncodingResult<()>;
    fn end_matrix(&mut self, ctx: &Context<'_>) -> EncodingResult<()>;
}

/// The framing operations of one wire format, driven by the engine while decoding.
pub trait StructDecoder {
    fn enter_struct(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<()>;
    fn leave_struct(&mut self, ctx: &Context<'_>) -> EncodingResult<()>;
    fn read_switch(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<u32>;
    fn read_scalar(
        &mut self,
        name: &str,
        kind: VariantTypeId,
        ctx: &Context<'_>,
    ) -> EncodingResult<Variant>;
    fn read_enum(
        &mut self,
        name: &str,
        descriptor: &EnumDescriptor,
        ctx: &Context<'_>,
    ) -> EncodingResult<i32>;
    /// Enters an array, returning its length or `None` for a null array. A null array is not
    /// left again.
    fn enter_array(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<Option<usize>>;
    fn leave_array(&mut self, ctx: &Context<'_>) -> EncodingResult<()>;
    /// Enters a matrix, returning its dimensions or `None` for a null matrix. A null matrix is
    /// not left again.
    fn enter_matrix(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<Option<Vec<u32>>>;
    fn leave_matrix(&mut self, ctx: &Context<'_>) -> EncodingResult<()>;
}

/// Encodes a structure in the binary encoding, returning the number of bytes written.
pub fn encode_binary<S: Write>(
    stream: &mut S,
    value: &StructValue,
    ctx: &Context<'_>,
) -> EncodingResult<usize> {
    let mut encoder = BinaryStructEncoder::new(stream);
    encode_struct(&mut encoder, None, value, ctx)?;
    Ok(encoder.size())
}

/// Decodes a structure of the data type from the binary encoding.
pub fn decode_binary<S: Read>(
    stream: &mut S,
    type_id: &NodeId,
    ctx: &Context<'_>,
) -> EncodingResult<StructValue> {
    let mut decoder = BinaryStructDecoder::new(stream);
    decode_struct(&mut decoder, None, type_id, ctx)
}

/// Returns the number of bytes the binary encoding of a structure takes.
pub fn byte_len(value: &StructValue, ctx: &Context<'_>) -> EncodingResult<usize> {
    encode_binary(&mut std::io::sink(), value, ctx)
}

/// Encodes a structure in the JSON encoding.
pub fn encode_json(value: &StructValue, ctx: &Context<'_>) -> EncodingResult<serde_json::Value> {
    let mut encoder = JsonStructEncoder::new();
    encode_struct(&mut encoder, None, value, ctx)?;
    encoder.into_value()
}

/// Decodes a structure of the data type from the JSON encoding.
pub fn decode_json(
    json: &serde_json::Value,
    type_id: &NodeId,
    ctx: &Context<'_>,
) -> EncodingResult<StructValue> {
    let mut decoder = JsonStructDecoder::new(json);
    decode_struct(&mut decoder, None, type_id, ctx)
}

/// Encodes a structure in the XML encoding as an element named after its type.
pub fn encode_xml(value: &StructValue, ctx: &Context<'_>) -> EncodingResult<XmlNode> {
    let mut encoder = XmlStructEncoder::new();
    encode_struct(&mut encoder, None, value, ctx)?;
    encoder.into_node()
}

/// Decodes a structure of the data type from its XML element.
pub fn decode_xml(node: &XmlNode, type_id: &NodeId, ctx: &Context<'_>) -> EncodingResult<StructValue> {
    let mut decoder = XmlStructDecoder::new(node);
    decode_struct(&mut decoder, None, type_id, ctx)
}

fn descriptor<'a>(type_id: &NodeId, ctx: &Context<'a>) -> EncodingResult<(&'a TypeDescriptor, &'a [FieldDescriptor])> {
    let registry = ctx.registry();
    match (registry.get(type_id), registry.fields(type_id)) {
        (Some(descriptor), Some(fields)) => Ok((descriptor, fields)),
        _ => Err(EncodingError::schema(format!(
            "structure {} is not registered",
            type_id
        ))),
    }
}

fn type_mismatch(message: String) -> EncodingError {
    EncodingError::encoding_status(StatusCode::BadTypeMismatch, message)
}

/// Encodes a structure. `name` is the field holding the structure, `None` for a structure that
/// is encoded on its own and named after its type.
pub fn encode_struct<E: StructEncoder>(
    encoder: &mut E,
    name: Option<&str>,
    value: &StructValue,
    ctx: &Context<'_>,
) -> EncodingResult<()> {
    let (descriptor, fields) = descriptor(&value.type_id, ctx)?;
    if descriptor.is_abstract {
        return Err(EncodingError::encoding(format!(
            "abstract type {} cannot be encoded",
            descriptor.name
        )));
    }

    // Every field of the value must be declared by the type
    if let Some((unknown, _)) = value
        .fields
        .iter()
        .find(|(n, _)| !fields.iter().any(|f| f.name == *n))
    {
        error!("Field {} is not a field of {}", unknown, descriptor.name);
        return Err(EncodingError::encoding(format!(
            "{} has no field named {}",
            descriptor.name, unknown
        ))
        .with_field(unknown));
    }

    encoder.begin_struct(name.unwrap_or(&descriptor.name), ctx)?;
    match descriptor.structure_kind {
        StructureKind::Structure => {
            for field in fields {
                let field_value = required_field(field, value)?;
                encode_field(encoder, field, field_value, ctx)?;
            }
        }
        StructureKind::StructureWithOptionalFields => {
            let mut encoding_mask = 0u32;
            let mut optional_index = 0;
            for field in fields.iter().filter(|f| f.optional) {
                if optional_index >= 32 {
                    return Err(EncodingError::encoding(format!(
                        "{} has more than 32 optional fields",
                        descriptor.name
                    )));
                }
                if value.get(&field.name).is_some() {
                    encoding_mask |= 1 << optional_index;
                }
                optional_index += 1;
            }
            encoder.write_switch(ENCODING_MASK, encoding_mask, ctx)?;
            for field in fields {
                match value.get(&field.name) {
                    Some(field_value) => encode_field(encoder, field, field_value, ctx)?,
                    None if field.optional => {}
                    None => {
                        required_field(field, value)?;
                    }
                }
            }
        }
        StructureKind::Union => {
            let mut present = fields
                .iter()
                .enumerate()
                .filter_map(|(i, f)| value.get(&f.name).map(|v| (i, f, v)));
            match (present.next(), present.next()) {
                (None, _) => encoder.write_switch(SWITCH_FIELD, 0, ctx)?,
                (Some((i, field, field_value)), None) => {
                    encoder.write_switch(SWITCH_FIELD, (i + 1) as u32, ctx)?;
                    encode_field(encoder, field, field_value, ctx)?;
                }
                (Some(_), Some(_)) => {
                    return Err(EncodingError::encoding(format!(
                        "union {} has more than one field set",
                        descriptor.name
                    )));
                }
            }
        }
    }
    encoder.end_struct(ctx)
}

fn required_field<'v>(field: &FieldDescriptor, value: &'v StructValue) -> EncodingResult<&'v FieldValue> {
    value.get(&field.name).ok_or_else(|| {
        error!("Required field {} has no value", field.name);
        EncodingError::encoding("required field has no value").with_field(&field.name)
    })
}

fn encode_field<E: StructEncoder>(
    encoder: &mut E,
    field: &FieldDescriptor,
    value: &FieldValue,
    ctx: &Context<'_>,
) -> EncodingResult<()> {
    encode_field_value(encoder, field, value, ctx).map_err(|e| e.with_field(&field.name))
}

fn encode_field_value<E: StructEncoder>(
    encoder: &mut E,
    field: &FieldDescriptor,
    value: &FieldValue,
    ctx: &Context<'_>,
) -> EncodingResult<()> {
    let field_type = ctx.registry().field_type(&field.data_type_id)?;
    let name = field.name.as_str();
    if field.is_array() {
        match value {
            FieldValue::Array(None) => encoder.write_null_array(name, ctx),
            FieldValue::Array(Some(values)) => {
                encoder.begin_array(name, values.len(), ctx)?;
                encode_elements(encoder, field_type, values, ctx)?;
                encoder.end_array(ctx)
            }
            other => Err(type_mismatch(format!("expected an array, got {:?}", other))),
        }
    } else if field.is_matrix() {
        match value {
            FieldValue::Matrix(None) => encoder.write_null_array(name, ctx),
            FieldValue::Matrix(Some(matrix)) => {
                if matrix.dimensions.len() != field.value_rank as usize {
                    return Err(type_mismatch(format!(
                        "matrix has {} dimensions, field has rank {}",
                        matrix.dimensions.len(),
                        field.value_rank
                    )));
                }
                if dimensions_length(&matrix.dimensions) != Some(matrix.values.len()) {
                    return Err(type_mismatch(format!(
                        "matrix dimensions {:?} do not match {} values",
                        matrix.dimensions,
                        matrix.values.len()
                    )));
                }
                encoder.begin_matrix(name, &matrix.dimensions, ctx)?;
                encode_elements(encoder, field_type, &matrix.values, ctx)?;
                encoder.end_matrix(ctx)
            }
            other => Err(type_mismatch(format!("expected a matrix, got {:?}", other))),
        }
    } else {
        encode_element(encoder, name, field_type, value, ctx)
    }
}

fn encode_elements<E: StructEncoder>(
    encoder: &mut E,
    field_type: FieldType<'_>,
    values: &[FieldValue],
    ctx: &Context<'_>,
) -> EncodingResult<()> {
    let element_name = element_name(field_type);
    for (i, value) in values.iter().enumerate() {
        encode_element(encoder, element_name, field_type, value, ctx)
            .map_err(|e| e.with_field(&format!("[{}]", i)))?;
    }
    Ok(())
}

fn encode_element<E: StructEncoder>(
    encoder: &mut E,
    name: &str,
    field_type: FieldType<'_>,
    value: &FieldValue,
    ctx: &Context<'_>,
) -> EncodingResult<()> {
    match (field_type, value) {
        (FieldType::Builtin(kind), FieldValue::Scalar(v)) => {
            if kind != VariantTypeId::Variant && v.type_id() != kind {
                Err(type_mismatch(format!(
                    "expected a value of {:?}, got {:?}",
                    kind, v
                )))
            } else {
                encoder.write_scalar(name, kind, v, ctx)
            }
        }
        (FieldType::Enumeration(descriptor), FieldValue::Enum(v)) => {
            encoder.write_enum(name, *v, descriptor, ctx)
        }
        (FieldType::Structure(descriptor), FieldValue::Struct(v)) => {
            if v.type_id != descriptor.type_id {
                Err(type_mismatch(format!(
                    "expected a {}, got structure {}",
                    descriptor.name, v.type_id
                )))
            } else {
                encode_struct(encoder, Some(name), v, ctx)
            }
        }
        (field_type, value) => Err(type_mismatch(format!(
            "value {:?} does not match {}",
            value,
            type_name(field_type)
        ))),
    }
}

/// The name array elements of the field type are written under.
fn element_name(field_type: FieldType<'_>) -> &str {
    match field_type {
        FieldType::Builtin(kind) => kind.name(),
        FieldType::Enumeration(descriptor) => &descriptor.name,
        FieldType::Structure(descriptor) => &descriptor.name,
    }
}

fn type_name(field_type: FieldType<'_>) -> String {
    match field_type {
        FieldType::Builtin(kind) => format!("{:?}", kind),
        FieldType::Enumeration(descriptor) => format!("enumeration {}", descriptor.name),
        FieldType::Structure(descriptor) => format!("structure {}", descriptor.name),
    }
}

/// Decodes a structure of the data type. `name` is the field holding the structure, `None` for
/// a structure that is decoded on its own.
pub fn decode_struct<D: StructDecoder>(
    decoder: &mut D,
    name: Option<&str>,
    type_id: &NodeId,
    ctx: &Context<'_>,
) -> EncodingResult<StructValue> {
    let (descriptor, fields) = descriptor(type_id, ctx)?;
    if descriptor.is_abstract {
        error!("Abstract type {} cannot be decoded", descriptor.name);
        return Err(EncodingError::decoding(format!(
            "abstract type {} cannot be decoded",
            descriptor.name
        )));
    }

    decoder.enter_struct(name.unwrap_or(&descriptor.name), ctx)?;
    let mut values = Vec::with_capacity(fields.len());
    match descriptor.structure_kind {
        StructureKind::Structure => {
            for field in fields {
                let value = decode_field(decoder, field, ctx)?;
                values.push((field.name.clone(), Some(value)));
            }
        }
        StructureKind::StructureWithOptionalFields => {
            let encoding_mask = decoder.read_switch(ENCODING_MASK, ctx)?;
            let optional_count = fields.iter().filter(|f| f.optional).count();
            if optional_count < 32 && encoding_mask >> optional_count != 0 {
                error!(
                    "Encoding mask {:#x} of {} sets bits beyond its {} optional fields",
                    encoding_mask, descriptor.name, optional_count
                );
                return Err(EncodingError::decoding(format!(
                    "encoding mask {:#x} has unknown bits",
                    encoding_mask
                ))
                .with_field(ENCODING_MASK));
            }
            let mut optional_index = 0;
            for field in fields {
                let present = if field.optional {
                    let present = encoding_mask & (1 << optional_index) != 0;
                    optional_index += 1;
                    present
                } else {
                    true
                };
                let value = if present {
                    Some(decode_field(decoder, field, ctx)?)
                } else {
                    None
                };
                values.push((field.name.clone(), value));
            }
        }
        StructureKind::Union => {
            let switch_field = decoder.read_switch(SWITCH_FIELD, ctx)? as usize;
            if switch_field > fields.len() {
                error!(
                    "Switch field {} of union {} is out of range",
                    switch_field, descriptor.name
                );
                return Err(EncodingError::decoding(format!(
                    "switch field {} is out of range",
                    switch_field
                ))
                .with_field(SWITCH_FIELD));
            }
            for (i, field) in fields.iter().enumerate() {
                let value = if i + 1 == switch_field {
                    Some(decode_field(decoder, field, ctx)?)
                } else {
                    None
                };
                values.push((field.name.clone(), value));
            }
        }
    }
    decoder.leave_struct(ctx)?;

    Ok(StructValue {
        type_id: descriptor.type_id.clone(),
        fields: values,
    })
}

fn decode_field<D: StructDecoder>(
    decoder: &mut D,
    field: &FieldDescriptor,
    ctx: &Context<'_>,
) -> EncodingResult<FieldValue> {
    decode_field_value(decoder, field, ctx).map_err(|e| e.with_field(&field.name))
}

fn decode_field_value<D: StructDecoder>(
    decoder: &mut D,
    field: &FieldDescriptor,
    ctx: &Context<'_>,
) -> EncodingResult<FieldValue> {
    let field_type = ctx.registry().field_type(&field.data_type_id)?;
    let name = field.name.as_str();
    if field.is_array() {
        match decoder.enter_array(name, ctx)? {
            None => Ok(FieldValue::Array(None)),
            Some(len) => {
                let values = decode_elements(decoder, field_type, len, ctx)?;
                decoder.leave_array(ctx)?;
                Ok(FieldValue::Array(Some(values)))
            }
        }
    } else if field.is_matrix() {
        match decoder.enter_matrix(name, ctx)? {
            None => Ok(FieldValue::Matrix(None)),
            Some(dimensions) => {
                if dimensions.len() != field.value_rank as usize {
                    error!(
                        "Matrix {} has {} dimensions, expected {}",
                        name,
                        dimensions.len(),
                        field.value_rank
                    );
                    return Err(EncodingError::decoding(format!(
                        "matrix has {} dimensions, field has rank {}",
                        dimensions.len(),
                        field.value_rank
                    )));
                }
                let len = matrix_length(&dimensions, ctx)?;
                let values = decode_elements(decoder, field_type, len, ctx)?;
                decoder.leave_matrix(ctx)?;
                Ok(FieldValue::Matrix(Some(Matrix { dimensions, values })))
            }
        }
    } else {
        decode_element(decoder, name, field_type, ctx)
    }
}

/// Returns the number of elements of a matrix, checked against the array limit.
pub(crate) fn matrix_length(dimensions: &[u32], ctx: &Context<'_>) -> EncodingResult<usize> {
    let len = dimensions_length(dimensions).ok_or_else(|| {
        error!("Invalid matrix dimensions {:?}", dimensions);
        EncodingError::decoding(format!("invalid matrix dimensions {:?}", dimensions))
    })?;
    ctx.options().check_array_length(len)?;
    Ok(len)
}

fn decode_elements<D: StructDecoder>(
    decoder: &mut D,
    field_type: FieldType<'_>,
    len: usize,
    ctx: &Context<'_>,
) -> EncodingResult<Vec<FieldValue>> {
    let element_name = element_name(field_type);
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        let value = decode_element(decoder, element_name, field_type, ctx)
            .map_err(|e| e.with_field(&format!("[{}]", i)))?;
        values.push(value);
    }
    Ok(values)
}

fn decode_element<D: StructDecoder>(
    decoder: &mut D,
    name: &str,
    field_type: FieldType<'_>,
    ctx: &Context<'_>,
) -> EncodingResult<FieldValue> {
    match field_type {
        FieldType::Builtin(kind) => Ok(FieldValue::Scalar(decoder.read_scalar(name, kind, ctx)?)),
        FieldType::Enumeration(descriptor) => {
            Ok(FieldValue::Enum(decoder.read_enum(name, descriptor, ctx)?))
        }
        FieldType::Structure(descriptor) => {
            // Nested structures are depth checked to prevent deep recursion
            let _depth_lock = ctx.depth_lock()?;
            Ok(FieldValue::Struct(decode_struct(
                decoder,
                Some(name),
                &descriptor.type_id,
                ctx,
            )?))
        }
    }
}
