// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! JSON encoding of `Variant`, `DataValue` and `DiagnosticInfo`.

use serde_json::{Map, Value};

use super::*;
use crate::array::Array;

impl JsonEncoder for Variant {
    fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value> {
        let mut map = Map::new();
        match self {
            Variant::Empty => {}
            Variant::Variant(_) => {
                error!("Variant contains a nested variant outside of an array");
                return Err(EncodingError::encoding(
                    "a variant cannot directly contain another variant",
                ));
            }
            Variant::Array(array) => {
                array.validate()?;
                map.insert("Type".into(), Value::from(array.value_type.code()));
                let body = match array.values {
                    // A null array is the only variant with an explicit null body
                    None => Value::Null,
                    Some(ref values) => Value::Array(
                        values
                            .iter()
                            .enumerate()
                            .map(|(i, v)| {
                                encode_value(v, ctx).map_err(|e| e.with_field(&format!("[{}]", i)))
                            })
                            .collect::<EncodingResult<Vec<Value>>>()?,
                    ),
                };
                map.insert("Body".into(), body);
                if array.has_dimensions() {
                    map.insert(
                        "Dimensions".into(),
                        Value::Array(array.dimensions.iter().map(|d| Value::from(*d)).collect()),
                    );
                }
            }
            value => {
                map.insert("Type".into(), Value::from(value.type_id().code()));
                // A null scalar has no body
                let body = encode_value(value, ctx)?;
                if !body.is_null() {
                    map.insert("Body".into(), body);
                }
            }
        }
        Ok(Value::Object(map))
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        let map = object(json, "a variant")?;
        let map = match map {
            Some(map) if !map.is_empty() => Some(map),
            _ => return Ok(Variant::Empty),
        };
        let code: u8 = decode_member(map, "Type", ctx)?;
        if code >= 64 {
            error!("Variant type {} is out of range", code);
            return Err(EncodingError::decoding(format!("invalid variant type {}", code)));
        }
        let value_type = VariantTypeId::from_encoding_mask(code)?;
        match map.and_then(|m| m.get("Body")) {
            Some(Value::Null) => {
                if value_type == VariantTypeId::Empty {
                    error!("Null array of variant has no element type");
                    return Err(EncodingError::decoding("array has no element type"));
                }
                Ok(Variant::from(Array::null(value_type)))
            }
            Some(Value::Array(values)) => {
                if value_type == VariantTypeId::Empty {
                    error!("Array of variant has no element type");
                    return Err(EncodingError::decoding("array has no element type"));
                }
                ctx.options().check_array_length(values.len())?;
                let values = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| {
                        decode_value(value_type, v, ctx).map_err(|e| e.with_field(&format!("[{}]", i)))
                    })
                    .collect::<EncodingResult<Vec<Variant>>>()?;
                let dimensions: Option<Vec<i32>> = decode_optional_array(map, "Dimensions", ctx)?;
                let array = match dimensions {
                    None => Array::new_single(value_type, values),
                    Some(dimensions) => {
                        if dimensions.iter().any(|d| *d <= 0) {
                            error!("Invalid array dimensions {:?}", dimensions);
                            return Err(EncodingError::decoding(format!(
                                "invalid array dimensions {:?}",
                                dimensions
                            )));
                        }
                        let dimensions: Vec<u32> = dimensions.into_iter().map(|d| d as u32).collect();
                        Array::new_multi(value_type, values, dimensions)
                    }
                };
                // A malformed array is a decoding failure, not an encoding one
                array.map(Variant::from).map_err(|e| {
                    error!("Variant array is invalid, {}", e);
                    EncodingError::decoding(e.to_string())
                })
            }
            body => {
                let body = body.unwrap_or(&NULL);
                if value_type == VariantTypeId::Variant {
                    error!("Variant contains a nested variant outside of an array");
                    return Err(EncodingError::decoding(
                        "a variant cannot directly contain another variant",
                    ));
                }
                decode_value(value_type, body, ctx).map_err(|e| e.with_field("Body"))
            }
        }
    }
}

/// Decodes an optional JSON array of numbers.
fn decode_optional_array<T: JsonEncoder>(
    map: Option<&Map<String, Value>>,
    name: &str,
    ctx: &Context<'_>,
) -> EncodingResult<Option<Vec<T>>> {
    match member(map, name) {
        Value::Null => Ok(None),
        Value::Array(values) => {
            ctx.options().check_array_length(values.len())?;
            values
                .iter()
                .map(|v| T::decode_json(v, ctx))
                .collect::<EncodingResult<Vec<T>>>()
                .map(Some)
                .map_err(|e| e.with_field(name))
        }
        json => Err(unexpected("an array", json).with_field(name)),
    }
}

impl JsonEncoder for DataValue {
    fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value> {
        let mut map = Map::new();
        if let Some(ref value) = self.value {
            map.insert(
                "Value".into(),
                value.encode_json(ctx).map_err(|e| e.with_field("Value"))?,
            );
        }
        if let Some(ref status) = self.status {
            map.insert("Status".into(), status.encode_json(ctx)?);
        }
        if let Some(ref source_timestamp) = self.source_timestamp {
            map.insert("SourceTimestamp".into(), source_timestamp.encode_json(ctx)?);
            if let Some(source_picoseconds) = self.source_picoseconds {
                map.insert("SourcePicoseconds".into(), Value::from(source_picoseconds));
            }
        }
        if let Some(ref server_timestamp) = self.server_timestamp {
            map.insert("ServerTimestamp".into(), server_timestamp.encode_json(ctx)?);
            if let Some(server_picoseconds) = self.server_picoseconds {
                map.insert("ServerPicoseconds".into(), Value::from(server_picoseconds));
            }
        }
        Ok(Value::Object(map))
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        let map = object(json, "a data value")?;
        let source_timestamp: Option<DateTime> = {
            // The source timestamp is never adjusted for clock skew
            let options = DecodingOptions {
                client_offset: chrono::Duration::zero(),
                ..ctx.options().clone()
            };
            let ctx = ctx.clone().with_options(options);
            decode_optional_member(map, "SourceTimestamp", &ctx)?
        };
        let server_timestamp: Option<DateTime> = decode_optional_member(map, "ServerTimestamp", ctx)?;
        let source_picoseconds: Option<u16> = decode_optional_member(map, "SourcePicoseconds", ctx)?;
        let server_picoseconds: Option<u16> = decode_optional_member(map, "ServerPicoseconds", ctx)?;
        Ok(DataValue {
            value: decode_optional_member(map, "Value", ctx)?,
            status: decode_optional_member(map, "Status", ctx)?,
            source_picoseconds: source_timestamp.and(source_picoseconds),
            source_timestamp,
            server_picoseconds: server_timestamp.and(server_picoseconds),
            server_timestamp,
        })
    }
}

impl JsonEncoder for DiagnosticInfo {
    fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value> {
        let mut map = Map::new();
        let indices = [
            ("SymbolicId", self.symbolic_id),
            ("NamespaceUri", self.namespace_uri),
            ("Locale", self.locale),
            ("LocalizedText", self.localized_text),
        ];
        for (name, index) in indices {
            if let Some(index) = index {
                map.insert(name.into(), Value::from(index));
            }
        }
        if let Some(ref additional_info) = self.additional_info {
            map.insert("AdditionalInfo".into(), additional_info.encode_json(ctx)?);
        }
        if let Some(ref inner_status_code) = self.inner_status_code {
            map.insert("InnerStatusCode".into(), inner_status_code.encode_json(ctx)?);
        }
        if let Some(ref inner_diagnostic_info) = self.inner_diagnostic_info {
            map.insert(
                "InnerDiagnosticInfo".into(),
                inner_diagnostic_info
                    .encode_json(ctx)
                    .map_err(|e| e.with_field("InnerDiagnosticInfo"))?,
            );
        }
        Ok(Value::Object(map))
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        let map = object(json, "a diagnostic info")?;
        let inner_diagnostic_info = match member(map, "InnerDiagnosticInfo") {
            Value::Null => None,
            json => {
                let _depth_lock = ctx.depth_lock()?;
                let inner = DiagnosticInfo::decode_json(json, ctx)
                    .map_err(|e| e.with_field("InnerDiagnosticInfo"))?;
                Some(Box::new(inner))
            }
        };
        Ok(DiagnosticInfo {
            symbolic_id: decode_optional_member(map, "SymbolicId", ctx)?,
            namespace_uri: decode_optional_member(map, "NamespaceUri", ctx)?,
            locale: decode_optional_member(map, "Locale", ctx)?,
            localized_text: decode_optional_member(map, "LocalizedText", ctx)?,
            additional_info: decode_optional_member(map, "AdditionalInfo", ctx)?,
            inner_status_code: decode_optional_member(map, "InnerStatusCode", ctx)?,
            inner_diagnostic_info,
        })
    }
}
