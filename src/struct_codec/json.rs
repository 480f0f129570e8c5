// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! JSON framing of structures. A structure is an object with a member per present field, arrays
//! are JSON arrays and matrices are `{"Dimensions": [..], "Array": [..]}` objects.

use serde_json::{Map, Value};

use crate::{
    encoding::*,
    json::{self, JsonEncoder, NULL},
    type_registry::EnumDescriptor,
    variant::Variant,
    variant_type_id::VariantTypeId,
};

const DIMENSIONS: &str = "Dimensions";
const ARRAY: &str = "Array";

enum EncoderFrame {
    Object(String, Map<String, Value>),
    Array(String, Vec<Value>),
    Matrix(String, Vec<u32>, Vec<Value>),
}

/// Builds the JSON value of a structure.
pub struct JsonStructEncoder {
    stack: Vec<EncoderFrame>,
    root: Option<Value>,
}

impl Default for JsonStructEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStructEncoder {
    pub fn new() -> Self {
        JsonStructEncoder {
            stack: Vec::new(),
            root: None,
        }
    }

    /// Returns the encoded structure.
    pub fn into_value(self) -> EncodingResult<Value> {
        if !self.stack.is_empty() {
            return Err(EncodingError::encoding("structure was not completed"));
        }
        self.root
            .ok_or_else(|| EncodingError::encoding("no structure was encoded"))
    }

    fn put(&mut self, name: &str, value: Value) {
        match self.stack.last_mut() {
            Some(EncoderFrame::Object(_, map)) => {
                map.insert(name.to_string(), value);
            }
            Some(EncoderFrame::Array(_, values)) | Some(EncoderFrame::Matrix(_, _, values)) => {
                values.push(value)
            }
            None => self.root = Some(value),
        }
    }
}

impl super::StructEncoder for JsonStructEncoder {
    fn begin_struct(&mut self, name: &str, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.stack
            .push(EncoderFrame::Object(name.to_string(), Map::new()));
        Ok(())
    }

    fn end_struct(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        match self.stack.pop() {
            Some(EncoderFrame::Object(name, map)) => {
                self.put(&name, Value::Object(map));
                Ok(())
            }
            _ => Err(EncodingError::encoding("end of structure without a structure")),
        }
    }

    fn write_switch(&mut self, name: &str, value: u32, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.put(name, Value::from(value));
        Ok(())
    }

    fn write_scalar(
        &mut self,
        name: &str,
        kind: VariantTypeId,
        value: &Variant,
        ctx: &Context<'_>,
    ) -> EncodingResult<()> {
        let value = if kind == VariantTypeId::Variant {
            value.encode_json(ctx)?
        } else {
            json::encode_value(value, ctx)?
        };
        self.put(name, value);
        Ok(())
    }

    fn write_enum(
        &mut self,
        name: &str,
        value: i32,
        _descriptor: &EnumDescriptor,
        _ctx: &Context<'_>,
    ) -> EncodingResult<()> {
        self.put(name, Value::from(value));
        Ok(())
    }

    fn write_null_array(&mut self, name: &str, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.put(name, Value::Null);
        Ok(())
    }

    fn begin_array(&mut self, name: &str, len: usize, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.stack
            .push(EncoderFrame::Array(name.to_string(), Vec::with_capacity(len)));
        Ok(())
    }

    fn end_array(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        match self.stack.pop() {
            Some(EncoderFrame::Array(name, values)) => {
                self.put(&name, Value::Array(values));
                Ok(())
            }
            _ => Err(EncodingError::encoding("end of array without an array")),
        }
    }

    fn begin_matrix(
        &mut self,
        name: &str,
        dimensions: &[u32],
        _ctx: &Context<'_>,
    ) -> EncodingResult<()> {
        self.stack.push(EncoderFrame::Matrix(
            name.to_string(),
            dimensions.to_vec(),
            Vec::new(),
        ));
        Ok(())
    }

    fn end_matrix(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        match self.stack.pop() {
            Some(EncoderFrame::Matrix(name, dimensions, values)) => {
                let mut map = Map::new();
                map.insert(
                    DIMENSIONS.to_string(),
                    Value::Array(dimensions.into_iter().map(Value::from).collect()),
                );
                map.insert(ARRAY.to_string(), Value::Array(values));
                self.put(&name, Value::Object(map));
                Ok(())
            }
            _ => Err(EncodingError::encoding("end of matrix without a matrix")),
        }
    }
}

enum DecoderFrame<'v> {
    Object(Option<&'v Map<String, Value>>),
    List(&'v [Value], usize),
}

/// Reads a structure from its JSON value.
pub struct JsonStructDecoder<'v> {
    root: &'v Value,
    stack: Vec<DecoderFrame<'v>>,
}

impl<'v> JsonStructDecoder<'v> {
    pub fn new(root: &'v Value) -> Self {
        JsonStructDecoder {
            root,
            stack: Vec::new(),
        }
    }

    /// The value of the named member, or of the next element of the enclosing array. Absent
    /// members are null.
    fn next(&mut self, name: &str) -> &'v Value {
        match self.stack.last_mut() {
            Some(DecoderFrame::Object(map)) => json::member(*map, name),
            Some(DecoderFrame::List(values, index)) => {
                let values: &'v [Value] = *values;
                let value = values.get(*index).unwrap_or(&NULL);
                *index += 1;
                value
            }
            None => self.root,
        }
    }

    fn pop(&mut self) -> EncodingResult<()> {
        self.stack
            .pop()
            .map(|_| ())
            .ok_or_else(|| EncodingError::decoding("unbalanced structure"))
    }
}

impl<'v> super::StructDecoder for JsonStructDecoder<'v> {
    fn enter_struct(&mut self, name: &str, _ctx: &Context<'_>) -> EncodingResult<()> {
        let value = self.next(name);
        let map = json::object(value, "a structure")?;
        self.stack.push(DecoderFrame::Object(map));
        Ok(())
    }

    fn leave_struct(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.pop()
    }

    fn read_switch(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<u32> {
        u32::decode_json(self.next(name), ctx).map_err(|e| e.with_field(name))
    }

    fn read_scalar(
        &mut self,
        name: &str,
        kind: VariantTypeId,
        ctx: &Context<'_>,
    ) -> EncodingResult<Variant> {
        let value = self.next(name);
        if kind == VariantTypeId::Variant {
            Variant::decode_json(value, ctx)
        } else {
            json::decode_value(kind, value, ctx)
        }
    }

    fn read_enum(
        &mut self,
        name: &str,
        _descriptor: &EnumDescriptor,
        ctx: &Context<'_>,
    ) -> EncodingResult<i32> {
        i32::decode_json(self.next(name), ctx)
    }

    fn enter_array(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<Option<usize>> {
        match self.next(name) {
            Value::Null => Ok(None),
            Value::Array(values) => {
                ctx.options().check_array_length(values.len())?;
                self.stack.push(DecoderFrame::List(values.as_slice(), 0));
                Ok(Some(values.len()))
            }
            value => Err(json::unexpected("an array", value)),
        }
    }

    fn leave_array(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.pop()
    }

    fn enter_matrix(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<Option<Vec<u32>>> {
        let map = match self.next(name) {
            Value::Null => return Ok(None),
            Value::Object(map) => map,
            value => return Err(json::unexpected("a matrix", value)),
        };
        let dimensions = match map.get(DIMENSIONS).unwrap_or(&NULL) {
            Value::Array(dimensions) => {
                ctx.options().check_array_length(dimensions.len())?;
                dimensions
                    .iter()
                    .map(|d| match i32::decode_json(d, ctx)? {
                        d if d > 0 => Ok(d as u32),
                        d => {
                            error!("Matrix dimension {} is invalid", d);
                            Err(EncodingError::decoding(format!(
                                "invalid matrix dimension {}",
                                d
                            )))
                        }
                    })
                    .collect::<EncodingResult<Vec<u32>>>()?
            }
            value => return Err(json::unexpected("matrix dimensions", value)),
        };
        let values = match map.get(ARRAY).unwrap_or(&NULL) {
            Value::Array(values) => values,
            value => return Err(json::unexpected("matrix elements", value)),
        };
        let len = super::matrix_length(&dimensions, ctx)?;
        if len != values.len() {
            error!(
                "Matrix dimensions {:?} do not match {} elements",
                dimensions,
                values.len()
            );
            return Err(EncodingError::decoding(format!(
                "matrix dimensions {:?} do not match {} elements",
                dimensions,
                values.len()
            )));
        }
        self.stack.push(DecoderFrame::List(values.as_slice(), 0));
        Ok(Some(dimensions))
    }

    fn leave_matrix(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.pop()
    }
}
