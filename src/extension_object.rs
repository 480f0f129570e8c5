// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `ExtensionObject`.

use std::{
    fmt,
    io::{Cursor, Read, Write},
};

use serde_json::{Map, Value};

use crate::{
    byte_string::ByteString,
    encoding::*,
    json::{self, JsonEncoder},
    node_id::NodeId,
    service_types::{Structure, UaStructure},
    status_code::StatusCode,
    string::{UAString, XmlElement},
    struct_codec,
    type_registry::{EncodingKind, Resolution},
    variant::CountingSink,
    xml::{self, XmlEncoder, XmlNode},
};

/// Enumeration that holds the kinds of encoding that an ExtensionObject data may be encoded with.
#[derive(PartialEq, Debug, Clone)]
pub enum ExtensionObjectEncoding {
    /// For an extension object with nothing encoded with it
    None,
    /// For an extension object whose body is an opaque binary payload
    ByteString(ByteString),
    /// For an extension object whose body is an opaque XML document
    XmlElement(XmlElement),
    /// For an extension object whose body is an opaque JSON value
    Json(Value),
    /// For an extension object whose body was resolved through the type registry
    Decoded(Box<Structure>),
}

/// An extension object holds a serialized object identified by its node id.
///
/// An opaque body keeps the encoding id it arrived with and is written back unchanged. A decoded
/// body holds the *data type* id instead, and encoding writes the encoding id of whichever format
/// it is encoded in.
#[derive(PartialEq, Debug, Clone)]
pub struct ExtensionObject {
    pub node_id: NodeId,
    pub body: ExtensionObjectEncoding,
}

impl Default for ExtensionObject {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for ExtensionObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ExtensionObject({})", self.node_id)
    }
}

impl BinaryEncoder<ExtensionObject> for ExtensionObject {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        let mut counter = CountingSink::default();
        // An object that fails to encode has no meaningful length
        match self.encode(&mut counter, ctx) {
            Ok(_) => counter.count,
            Err(_) => 0,
        }
    }

    fn encode<S: Write>(&self, stream: &mut S, ctx: &Context<'_>) -> EncodingResult<usize> {
        let mut size = 0;
        match self.body {
            ExtensionObjectEncoding::None => {
                size += self.node_id.encode(stream, ctx)?;
                size += write_u8(stream, 0x0)?;
            }
            ExtensionObjectEncoding::ByteString(ref value) => {
                // Encoding mask + data
                size += self.node_id.encode(stream, ctx)?;
                size += write_u8(stream, 0x1)?;
                size += value.encode(stream, ctx)?;
            }
            ExtensionObjectEncoding::XmlElement(ref value) => {
                // Encoding mask + data
                size += self.node_id.encode(stream, ctx)?;
                size += write_u8(stream, 0x2)?;
                size += value.encode(stream, ctx)?;
            }
            ExtensionObjectEncoding::Json(_) => {
                error!(
                    "Extension object {} has a JSON body which has no binary encoding",
                    self.node_id
                );
                return Err(EncodingError::encoding(format!(
                    "extension object {} has a JSON body",
                    self.node_id
                )));
            }
            ExtensionObjectEncoding::Decoded(ref structure) => {
                let encoding_id = encoding_id(structure, EncodingKind::Binary, ctx)?;
                let mut body = Vec::new();
                struct_codec::encode_binary(&mut body, &structure.to_struct_value(), ctx)?;
                size += encoding_id.encode(stream, ctx)?;
                size += write_u8(stream, 0x1)?;
                size += ByteString::from(body).encode(stream, ctx)?;
            }
        }
        Ok(size)
    }

    fn decode<S: Read>(stream: &mut S, ctx: &Context<'_>) -> EncodingResult<Self> {
        // Extension object is depth checked to prevent deep recursion
        let _depth_lock = ctx.depth_lock()?;
        let node_id = NodeId::decode(stream, ctx)?;
        let encoding_type = u8::decode(stream, ctx)?;
        let body = match encoding_type {
            0x0 => ExtensionObjectEncoding::None,
            0x1 => {
                let value = ByteString::decode(stream, ctx)?;
                decode_binary_body(&node_id, value, ctx)?
            }
            0x2 => {
                let value = XmlElement::decode(stream, ctx)?;
                decode_xml_body(&node_id, value, ctx)?
            }
            _ => {
                error!("Invalid encoding type {} in stream", encoding_type);
                return Err(EncodingError::decoding(format!(
                    "invalid extension object encoding {}",
                    encoding_type
                )));
            }
        };
        Ok(ExtensionObject::with_body(node_id, body))
    }
}

/// The encoding id a decoded body is written with in the format.
fn encoding_id<'a>(
    structure: &Structure,
    kind: EncodingKind,
    ctx: &Context<'a>,
) -> EncodingResult<&'a NodeId> {
    let type_id = structure.type_id();
    ctx.registry().encoding_id(&type_id, kind).ok_or_else(|| {
        error!("Type {} has no {:?} encoding id", type_id, kind);
        EncodingError::encoding_status(
            StatusCode::BadDataTypeIdUnknown,
            format!("type {} has no {:?} encoding", type_id, kind),
        )
    })
}

fn decoded(value: struct_codec::StructValue) -> EncodingResult<ExtensionObjectEncoding> {
    Ok(ExtensionObjectEncoding::Decoded(Box::new(
        Structure::from_struct_value(value)?,
    )))
}

/// Decodes a binary body when its encoding id is registered, otherwise keeps it opaque.
fn decode_binary_body(
    node_id: &NodeId,
    value: ByteString,
    ctx: &Context<'_>,
) -> EncodingResult<ExtensionObjectEncoding> {
    match ctx.registry().resolve_unknown(node_id, EncodingKind::Binary) {
        Resolution::Registered(descriptor) => {
            let bytes = value.value.unwrap_or_default();
            let mut stream = Cursor::new(bytes);
            let value = struct_codec::decode_binary(&mut stream, &descriptor.type_id, ctx)
                .map_err(|e| {
                    error!("Cannot decode body of extension object {}, {}", node_id, e);
                    e
                })?;
            let remaining = stream.get_ref().len() as u64 - stream.position();
            if remaining > 0 {
                debug!(
                    "Extension object {} has {} bytes after its body",
                    node_id, remaining
                );
            }
            decoded(value)
        }
        Resolution::Unregistered => {
            debug!(
                "Extension object {} is not registered, binary body is kept opaque",
                node_id
            );
            Ok(ExtensionObjectEncoding::ByteString(value))
        }
    }
}

/// Decodes an XML body when its encoding id is registered, otherwise keeps it opaque.
fn decode_xml_body(
    node_id: &NodeId,
    value: XmlElement,
    ctx: &Context<'_>,
) -> EncodingResult<ExtensionObjectEncoding> {
    match ctx.registry().resolve_unknown(node_id, EncodingKind::Xml) {
        Resolution::Registered(descriptor) => {
            let node = XmlNode::parse(value.as_ref())?;
            decoded(struct_codec::decode_xml(&node, &descriptor.type_id, ctx)?)
        }
        Resolution::Unregistered => {
            debug!(
                "Extension object {} is not registered, XML body is kept opaque",
                node_id
            );
            Ok(ExtensionObjectEncoding::XmlElement(value))
        }
    }
}

/// Names of the members and elements of an extension object.
const TYPE_ID: &str = "TypeId";
const ENCODING: &str = "Encoding";
const BODY: &str = "Body";

impl JsonEncoder for ExtensionObject {
    fn encode_json(&self, ctx: &Context<'_>) -> EncodingResult<Value> {
        if self.is_null() {
            return Ok(Value::Null);
        }
        let mut map = Map::new();
        match self.body {
            ExtensionObjectEncoding::None => {
                map.insert(TYPE_ID.into(), self.node_id.encode_json(ctx)?);
            }
            ExtensionObjectEncoding::ByteString(ref value) => {
                map.insert(TYPE_ID.into(), self.node_id.encode_json(ctx)?);
                map.insert(ENCODING.into(), Value::from(1));
                map.insert(BODY.into(), value.encode_json(ctx)?);
            }
            ExtensionObjectEncoding::XmlElement(ref value) => {
                map.insert(TYPE_ID.into(), self.node_id.encode_json(ctx)?);
                map.insert(ENCODING.into(), Value::from(2));
                map.insert(BODY.into(), value.encode_json(ctx)?);
            }
            ExtensionObjectEncoding::Json(ref value) => {
                map.insert(TYPE_ID.into(), self.node_id.encode_json(ctx)?);
                map.insert(BODY.into(), value.clone());
            }
            ExtensionObjectEncoding::Decoded(ref structure) => {
                let encoding_id = encoding_id(structure, EncodingKind::Json, ctx)?;
                map.insert(TYPE_ID.into(), encoding_id.encode_json(ctx)?);
                map.insert(
                    BODY.into(),
                    struct_codec::encode_json(&structure.to_struct_value(), ctx)?,
                );
            }
        }
        Ok(Value::Object(map))
    }

    fn decode_json(value: &Value, ctx: &Context<'_>) -> EncodingResult<Self> {
        let map = match json::object(value, "an extension object")? {
            None => return Ok(ExtensionObject::null()),
            map => map,
        };
        let _depth_lock = ctx.depth_lock()?;
        let node_id: NodeId = json::decode_member(map, TYPE_ID, ctx)?;
        let encoding: u8 = json::decode_member(map, ENCODING, ctx)?;
        let body = json::member(map, BODY);
        let body = match (encoding, body) {
            (_, Value::Null) => ExtensionObjectEncoding::None,
            (0, body) => match ctx.registry().resolve_unknown(&node_id, EncodingKind::Json) {
                Resolution::Registered(descriptor) => decoded(
                    struct_codec::decode_json(body, &descriptor.type_id, ctx)
                        .map_err(|e| e.with_field(BODY))?,
                )?,
                Resolution::Unregistered => {
                    debug!(
                        "Extension object {} is not registered, JSON body is kept opaque",
                        node_id
                    );
                    ExtensionObjectEncoding::Json(body.clone())
                }
            },
            (1, body) => {
                let value = ByteString::decode_json(body, ctx).map_err(|e| e.with_field(BODY))?;
                decode_binary_body(&node_id, value, ctx)?
            }
            (2, body) => {
                let value = XmlElement::decode_json(body, ctx).map_err(|e| e.with_field(BODY))?;
                decode_xml_body(&node_id, value, ctx)?
            }
            (encoding, _) => {
                error!("Invalid encoding type {} in JSON", encoding);
                return Err(EncodingError::decoding(format!(
                    "invalid extension object encoding {}",
                    encoding
                ))
                .with_field(ENCODING));
            }
        };
        Ok(ExtensionObject::with_body(node_id, body))
    }
}

impl XmlEncoder for ExtensionObject {
    fn encode_xml(&self, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()> {
        let type_id = match self.body {
            ExtensionObjectEncoding::Decoded(ref structure) => {
                encoding_id(structure, EncodingKind::Xml, ctx)?
            }
            _ => &self.node_id,
        };
        xml::encode_child(node, TYPE_ID, type_id, ctx)?;
        match self.body {
            ExtensionObjectEncoding::None => {}
            ExtensionObjectEncoding::ByteString(ref value) => {
                let body = node.add_child(XmlNode::new(BODY));
                xml::encode_child(body, "ByteString", value, ctx)?;
            }
            ExtensionObjectEncoding::XmlElement(ref value) => {
                let element = XmlNode::parse(value.as_ref()).map_err(|e| e.with_field(BODY))?;
                node.add_child(XmlNode::new(BODY)).add_child(element);
            }
            ExtensionObjectEncoding::Json(_) => {
                error!(
                    "Extension object {} has a JSON body which has no XML encoding",
                    self.node_id
                );
                return Err(EncodingError::encoding(format!(
                    "extension object {} has a JSON body",
                    self.node_id
                )));
            }
            ExtensionObjectEncoding::Decoded(ref structure) => {
                let element = struct_codec::encode_xml(&structure.to_struct_value(), ctx)?;
                node.add_child(XmlNode::new(BODY)).add_child(element);
            }
        }
        Ok(())
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        let _depth_lock = ctx.depth_lock()?;
        let node_id: NodeId = xml::decode_child(node, TYPE_ID, ctx)?;
        let element = node.child(BODY).and_then(|b| b.children.first());
        let body = match element {
            None => ExtensionObjectEncoding::None,
            Some(element) if element.name == "ByteString" => {
                let value = ByteString::decode_xml(element, ctx).map_err(|e| e.with_field(BODY))?;
                decode_binary_body(&node_id, value, ctx)?
            }
            Some(element) => match ctx.registry().resolve_unknown(&node_id, EncodingKind::Xml) {
                Resolution::Registered(descriptor) => decoded(
                    struct_codec::decode_xml(element, &descriptor.type_id, ctx)
                        .map_err(|e| e.with_field(BODY))?,
                )?,
                Resolution::Unregistered => {
                    debug!(
                        "Extension object {} is not registered, XML body is kept opaque",
                        node_id
                    );
                    let body = match element.raw {
                        Some(ref raw) => raw.clone(),
                        None => element.to_document(),
                    };
                    ExtensionObjectEncoding::XmlElement(UAString::from(body))
                }
            },
        };
        Ok(ExtensionObject::with_body(node_id, body))
    }
}

impl ExtensionObject {
    /// Creates a null extension object, i.e. one with no value or payload
    pub fn null() -> ExtensionObject {
        ExtensionObject {
            node_id: NodeId::null(),
            body: ExtensionObjectEncoding::None,
        }
    }

    /// Tests for null node id.
    pub fn is_null(&self) -> bool {
        self.node_id.is_null() && matches!(self.body, ExtensionObjectEncoding::None)
    }

    /// Tests if the body was resolved through the type registry.
    pub fn is_decoded(&self) -> bool {
        matches!(self.body, ExtensionObjectEncoding::Decoded(_))
    }

    /// Creates an extension object holding a structure.
    pub fn from_structure<T: Into<Structure>>(structure: T) -> ExtensionObject {
        let structure = structure.into();
        ExtensionObject {
            node_id: structure.type_id(),
            body: ExtensionObjectEncoding::Decoded(Box::new(structure)),
        }
    }

    /// The decoded structure, if the body was resolved.
    pub fn structure(&self) -> Option<&Structure> {
        match self.body {
            ExtensionObjectEncoding::Decoded(ref structure) => Some(structure),
            _ => None,
        }
    }

    /// Converts the decoded body into a structure type. An opaque body or a body of another type
    /// is an error.
    pub fn decode_structure<T: UaStructure>(&self) -> EncodingResult<T> {
        match self.structure() {
            Some(structure) if structure.type_id() == T::data_type_id() => {
                T::from_struct_value(structure.to_struct_value())
            }
            Some(structure) => Err(EncodingError::decoding_status(
                StatusCode::BadTypeMismatch,
                format!(
                    "extension object holds {}, not {}",
                    structure.type_id(),
                    T::data_type_id()
                ),
            )),
            None => Err(EncodingError::decoding_status(
                StatusCode::BadDataTypeIdUnknown,
                format!("extension object {} has no decoded body", self.node_id),
            )),
        }
    }

    /// Takes the decoded structure out of the extension object.
    pub fn into_structure(self) -> Option<Structure> {
        match self.body {
            ExtensionObjectEncoding::Decoded(structure) => Some(*structure),
            _ => None,
        }
    }

    /// A decoded body takes its data type id as the node id.
    fn with_body(node_id: NodeId, body: ExtensionObjectEncoding) -> ExtensionObject {
        let node_id = match body {
            ExtensionObjectEncoding::Decoded(ref structure) => structure.type_id(),
            _ => node_id,
        };
        ExtensionObject { node_id, body }
    }
}
