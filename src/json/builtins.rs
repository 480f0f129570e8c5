// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! JSON encoding of the primitive and composite builtin types.

use std::str::FromStr;

use serde_json::{json, Map, Number, Value};

use super::*;
use crate::node_id::Identifier;

/// The date times that stand for the earliest and latest instants in JSON.
const JSON_MIN_DATE_TIME: &str = "0001-01-01T00:00:00Z";
const JSON_MAX_DATE_TIME: &str = "9999-12-31T23:59:59Z";

impl JsonEncoder for bool {
    fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn decode_json(json: &Value, _: &Context<'_>) -> EncodingResult<Self> {
        match json {
            Value::Null => Ok(false),
            Value::Bool(v) => Ok(*v),
            json => Err(unexpected("a boolean", json)),
        }
    }
}

// Integers up to 32 bits are JSON numbers
macro_rules! json_number_impl {
    ( $t: ty ) => {
        impl JsonEncoder for $t {
            fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
                Ok(Value::from(*self))
            }

            fn decode_json(json: &Value, _: &Context<'_>) -> EncodingResult<Self> {
                match json {
                    Value::Null => Ok(0),
                    Value::Number(n) => n
                        .as_i64()
                        .and_then(|v| <$t>::try_from(v).ok())
                        .ok_or_else(|| unexpected(stringify!($t), json)),
                    json => Err(unexpected(stringify!($t), json)),
                }
            }
        }
    };
}

json_number_impl!(i8);
json_number_impl!(u8);
json_number_impl!(i16);
json_number_impl!(u16);
json_number_impl!(i32);
json_number_impl!(u32);

// 64-bit integers are decimal strings, numbers are accepted on decode
macro_rules! json_long_impl {
    ( $t: ty, $as: ident ) => {
        impl JsonEncoder for $t {
            fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
                Ok(Value::String(self.to_string()))
            }

            fn decode_json(json: &Value, _: &Context<'_>) -> EncodingResult<Self> {
                match json {
                    Value::Null => Ok(0),
                    Value::String(s) => s
                        .parse::<$t>()
                        .map_err(|_| unexpected(stringify!($t), json)),
                    Value::Number(n) => n.$as().ok_or_else(|| unexpected(stringify!($t), json)),
                    json => Err(unexpected(stringify!($t), json)),
                }
            }
        }
    };
}

json_long_impl!(i64, as_i64);
json_long_impl!(u64, as_u64);

fn encode_float(value: f64) -> Value {
    if value.is_nan() {
        Value::String("NaN".to_string())
    } else if value.is_infinite() {
        if value > 0.0 {
            Value::String("Infinity".to_string())
        } else {
            Value::String("-Infinity".to_string())
        }
    } else {
        Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn decode_float(json: &Value) -> EncodingResult<f64> {
    match json {
        Value::Null => Ok(0.0),
        Value::Number(n) => n.as_f64().ok_or_else(|| unexpected("a number", json)),
        Value::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            _ => Err(unexpected("a number", json)),
        },
        json => Err(unexpected("a number", json)),
    }
}

impl JsonEncoder for f32 {
    fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
        Ok(encode_float(f64::from(*self)))
    }

    fn decode_json(json: &Value, _: &Context<'_>) -> EncodingResult<Self> {
        Ok(decode_float(json)? as f32)
    }
}

impl JsonEncoder for f64 {
    fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
        Ok(encode_float(*self))
    }

    fn decode_json(json: &Value, _: &Context<'_>) -> EncodingResult<Self> {
        decode_float(json)
    }
}

impl JsonEncoder for UAString {
    fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
        Ok(match self.value() {
            Some(v) => Value::String(v.clone()),
            None => Value::Null,
        })
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        match json {
            Value::Null => Ok(UAString::null()),
            Value::String(s) => {
                let max_string_length = ctx.options().max_string_length;
                if s.len() > max_string_length {
                    warn!(
                        "String length {} exceeds decoding limit {}",
                        s.len(),
                        max_string_length
                    );
                    Err(EncodingError::decoding_status(
                        StatusCode::BadEncodingLimitsExceeded,
                        format!(
                            "string length {} exceeds limit {}",
                            s.len(),
                            max_string_length
                        ),
                    ))
                } else {
                    Ok(UAString::from(s.as_str()))
                }
            }
            json => Err(unexpected("a string", json)),
        }
    }
}

impl JsonEncoder for ByteString {
    fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
        Ok(if self.is_null() {
            Value::Null
        } else {
            Value::String(self.as_base64())
        })
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        match json {
            Value::Null => Ok(ByteString::null()),
            Value::String(s) => {
                let value = ByteString::from_base64(s)
                    .ok_or_else(|| unexpected("a base64 byte string", json))?;
                let max_byte_string_length = ctx.options().max_byte_string_length;
                if value.as_ref().len() > max_byte_string_length {
                    warn!(
                        "Byte string length {} exceeds decoding limit {}",
                        value.as_ref().len(),
                        max_byte_string_length
                    );
                    Err(EncodingError::decoding_status(
                        StatusCode::BadEncodingLimitsExceeded,
                        format!(
                            "byte string length {} exceeds limit {}",
                            value.as_ref().len(),
                            max_byte_string_length
                        ),
                    ))
                } else {
                    Ok(value)
                }
            }
            json => Err(unexpected("a base64 string", json)),
        }
    }
}

impl JsonEncoder for Guid {
    fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn decode_json(json: &Value, _: &Context<'_>) -> EncodingResult<Self> {
        match json {
            Value::Null => Ok(Guid::null()),
            Value::String(s) => Guid::from_str(s).map_err(|_| unexpected("a guid", json)),
            json => Err(unexpected("a guid", json)),
        }
    }
}

impl JsonEncoder for DateTime {
    fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
        let value = if self.is_null() {
            JSON_MIN_DATE_TIME.to_string()
        } else if self.is_endtimes() {
            JSON_MAX_DATE_TIME.to_string()
        } else {
            self.to_iso8601()
        };
        Ok(Value::String(value))
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        let date_time = match json {
            Value::Null => return Ok(DateTime::null()),
            Value::String(s) => {
                DateTime::from_str(s).map_err(|_| unexpected("an ISO 8601 date time", json))?
            }
            json => return Err(unexpected("a date time", json)),
        };
        let client_offset = ctx.options().client_offset;
        if client_offset.is_zero() || date_time.is_null() || date_time.is_endtimes() {
            Ok(date_time)
        } else {
            Ok(date_time - client_offset)
        }
    }
}

impl JsonEncoder for StatusCode {
    fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
        Ok(Value::from(self.bits()))
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        Ok(StatusCode::from_bits_truncate(u32::decode_json(json, ctx)?))
    }
}

/// The members shared by node ids and expanded node ids. The namespace is left to the caller.
fn encode_identifier(identifier: &Identifier, map: &mut Map<String, Value>, ctx: &Context<'_>) -> EncodingResult<()> {
    match identifier {
        Identifier::Numeric(v) => {
            map.insert("Id".into(), Value::from(*v));
        }
        Identifier::String(v) => {
            map.insert("IdType".into(), json!(1));
            map.insert("Id".into(), v.encode_json(ctx)?);
        }
        Identifier::Guid(v) => {
            map.insert("IdType".into(), json!(2));
            map.insert("Id".into(), v.encode_json(ctx)?);
        }
        Identifier::ByteString(v) => {
            map.insert("IdType".into(), json!(3));
            map.insert("Id".into(), v.encode_json(ctx)?);
        }
    }
    Ok(())
}

fn decode_identifier(map: Option<&Map<String, Value>>, ctx: &Context<'_>) -> EncodingResult<Identifier> {
    let id_type: u8 = decode_member(map, "IdType", ctx)?;
    let identifier = match id_type {
        0 => Identifier::Numeric(decode_member(map, "Id", ctx)?),
        1 => Identifier::String(decode_member(map, "Id", ctx)?),
        2 => Identifier::Guid(decode_member(map, "Id", ctx)?),
        3 => Identifier::ByteString(decode_member(map, "Id", ctx)?),
        id_type => {
            error!("Unrecognized node id type {}", id_type);
            return Err(EncodingError::decoding(format!(
                "unrecognized node id type {}",
                id_type
            ))
            .with_field("IdType"));
        }
    };
    Ok(identifier)
}

impl JsonEncoder for NodeId {
    fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value> {
        let mut map = Map::new();
        encode_identifier(&self.identifier, &mut map, ctx)?;
        if self.namespace != 0 {
            map.insert("Namespace".into(), Value::from(self.namespace));
        }
        Ok(Value::Object(map))
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        let map = object(json, "a node id")?;
        if map.is_none() {
            return Ok(NodeId::null());
        }
        Ok(NodeId {
            namespace: decode_member(map, "Namespace", ctx)?,
            identifier: decode_identifier(map, ctx)?,
        })
    }
}

impl JsonEncoder for ExpandedNodeId {
    fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value> {
        let mut map = Map::new();
        encode_identifier(&self.node_id.identifier, &mut map, ctx)?;
        if !self.namespace_uri.is_null() {
            map.insert("Namespace".into(), self.namespace_uri.encode_json(ctx)?);
        } else if self.node_id.namespace != 0 {
            map.insert("Namespace".into(), Value::from(self.node_id.namespace));
        }
        if self.server_index != 0 {
            map.insert("ServerUri".into(), Value::from(self.server_index));
        }
        Ok(Value::Object(map))
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        let map = object(json, "an expanded node id")?;
        if map.is_none() {
            return Ok(ExpandedNodeId::null());
        }
        let identifier = decode_identifier(map, ctx)?;
        // The namespace is either an index or a uri
        let (namespace, namespace_uri) = match member(map, "Namespace") {
            Value::String(_) => {
                let namespace_uri: UAString = decode_member(map, "Namespace", ctx)?;
                let namespace = ctx
                    .namespaces()
                    .index_of(namespace_uri.as_ref())
                    .unwrap_or_else(|| {
                        debug!(
                            "Namespace uri {} is not in the namespace table, index left as 0",
                            namespace_uri
                        );
                        0
                    });
                (namespace, namespace_uri)
            }
            _ => (decode_member(map, "Namespace", ctx)?, UAString::null()),
        };
        Ok(ExpandedNodeId {
            node_id: NodeId {
                namespace,
                identifier,
            },
            namespace_uri,
            server_index: decode_member(map, "ServerUri", ctx)?,
        })
    }
}

impl JsonEncoder for QualifiedName {
    fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value> {
        let mut map = Map::new();
        if !self.name.is_null() {
            map.insert("Name".into(), self.name.encode_json(ctx)?);
        }
        if self.namespace_index != 0 {
            map.insert("Uri".into(), Value::from(self.namespace_index));
        }
        Ok(Value::Object(map))
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        let map = object(json, "a qualified name")?;
        Ok(QualifiedName {
            namespace_index: decode_member(map, "Uri", ctx)?,
            name: decode_member(map, "Name", ctx)?,
        })
    }
}

impl JsonEncoder for LocalizedText {
    fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value> {
        let mut map = Map::new();
        if !self.locale.is_null() {
            map.insert("Locale".into(), self.locale.encode_json(ctx)?);
        }
        if !self.text.is_null() {
            map.insert("Text".into(), self.text.encode_json(ctx)?);
        }
        Ok(Value::Object(map))
    }

    fn decode_json(json: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        let map = object(json, "a localized text")?;
        Ok(LocalizedText {
            locale: decode_member(map, "Locale", ctx)?,
            text: decode_member(map, "Text", ctx)?,
        })
    }
}
