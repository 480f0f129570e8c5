// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `NodeId` and its `Identifier`.

use std::{
    self, fmt,
    io::{Read, Write},
    str::FromStr,
};

use crate::{
    byte_string::ByteString,
    encoding::*,
    guid::Guid,
    namespace_table::NamespaceTable,
    node_ids::{DataTypeId, ObjectId},
    status_code::StatusCode,
    string::*,
};

/// The kind of identifier, numeric, string, guid or byte
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub enum Identifier {
    Numeric(u32),
    String(UAString),
    Guid(Guid),
    ByteString(ByteString),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Identifier::Numeric(v) => write!(f, "i={}", *v),
            Identifier::String(v) => write!(f, "s={}", v),
            Identifier::Guid(v) => write!(f, "g={:?}", v),
            Identifier::ByteString(v) => write!(f, "b={}", v.as_base64()),
        }
    }
}

impl FromStr for Identifier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 2 || !s.is_char_boundary(2) {
            Err(())
        } else {
            let k = &s[..2];
            let v = &s[2..];
            match k {
                "i=" => v.parse::<u32>().map(|v| v.into()).map_err(|_| ()),
                "s=" => Ok(UAString::from(v).into()),
                "g=" => Guid::from_str(v).map(|v| v.into()),
                "b=" => ByteString::from_base64(v).map(|v| v.into()).ok_or(()),
                _ => Err(()),
            }
        }
    }
}

impl From<u32> for Identifier {
    fn from(v: u32) -> Self {
        Identifier::Numeric(v)
    }
}

impl<'a> From<&'a str> for Identifier {
    fn from(v: &'a str) -> Self {
        Identifier::from(UAString::from(v))
    }
}

impl From<String> for Identifier {
    fn from(v: String) -> Self {
        Identifier::from(UAString::from(v))
    }
}

impl From<UAString> for Identifier {
    fn from(v: UAString) -> Self {
        Identifier::String(v)
    }
}

impl From<Guid> for Identifier {
    fn from(v: Guid) -> Self {
        Identifier::Guid(v)
    }
}

impl From<ByteString> for Identifier {
    fn from(v: ByteString) -> Self {
        Identifier::ByteString(v)
    }
}

/// An identifier for a node in the address space of an OPC UA Server.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct NodeId {
    /// The index for a namespace
    pub namespace: u16,
    /// The identifier for the node in the address space
    pub identifier: Identifier,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};{}", self.namespace, self.identifier)
        } else {
            write!(f, "{}", self.identifier)
        }
    }
}

// Encoding byte values of the node id forms
const TWO_BYTE: u8 = 0x0;
const FOUR_BYTE: u8 = 0x1;
const NUMERIC: u8 = 0x2;
const STRING: u8 = 0x3;
const GUID: u8 = 0x4;
const BYTE_STRING: u8 = 0x5;

impl BinaryEncoder<NodeId> for NodeId {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        // Type determines the byte code
        match self.identifier {
            Identifier::Numeric(value) => {
                if self.namespace == 0 && value <= 255 {
                    2
                } else if self.namespace <= 255 && value <= 65535 {
                    4
                } else {
                    7
                }
            }
            Identifier::String(ref value) => 3 + value.byte_len(ctx),
            Identifier::Guid(ref value) => 3 + value.byte_len(ctx),
            Identifier::ByteString(ref value) => 3 + value.byte_len(ctx),
        }
    }

    fn encode<S: Write>(&self, stream: &mut S, ctx: &Context<'_>) -> EncodingResult<usize> {
        self.encode_with_flags(stream, 0, ctx)
    }

    fn decode<S: Read>(stream: &mut S, ctx: &Context<'_>) -> EncodingResult<Self> {
        let encoding = read_u8(stream)?;
        if encoding & 0xf0 != 0 {
            error!("Node id encoding byte {:#04x} has expanded node id flags", encoding);
            return Err(EncodingError::decoding(format!(
                "unexpected node id encoding byte {:#04x}",
                encoding
            )));
        }
        Self::decode_body(stream, encoding, ctx)
    }
}

impl NodeId {
    /// Writes the encoding byte, or'd with the supplied flags, and then the node id in the most
    /// compact form its namespace and identifier allow.
    pub(crate) fn encode_with_flags<S: Write>(
        &self,
        stream: &mut S,
        flags: u8,
        ctx: &Context<'_>,
    ) -> EncodingResult<usize> {
        let mut size: usize = 0;
        // Type determines the byte code
        match &self.identifier {
            Identifier::Numeric(value) => {
                if self.namespace == 0 && *value <= 255 {
                    // node id fits into 2 bytes when the namespace is 0 and the value <= 255
                    size += write_u8(stream, flags | TWO_BYTE)?;
                    size += write_u8(stream, *value as u8)?;
                } else if self.namespace <= 255 && *value <= 65535 {
                    // node id fits into 4 bytes when namespace <= 255 and value <= 65535
                    size += write_u8(stream, flags | FOUR_BYTE)?;
                    size += write_u8(stream, self.namespace as u8)?;
                    size += write_u16(stream, *value as u16)?;
                } else {
                    // full node id
                    size += write_u8(stream, flags | NUMERIC)?;
                    size += write_u16(stream, self.namespace)?;
                    size += write_u32(stream, *value)?;
                }
            }
            Identifier::String(value) => {
                size += write_u8(stream, flags | STRING)?;
                size += write_u16(stream, self.namespace)?;
                size += value.encode(stream, ctx)?;
            }
            Identifier::Guid(value) => {
                size += write_u8(stream, flags | GUID)?;
                size += write_u16(stream, self.namespace)?;
                size += value.encode(stream, ctx)?;
            }
            Identifier::ByteString(value) => {
                size += write_u8(stream, flags | BYTE_STRING)?;
                size += write_u16(stream, self.namespace)?;
                size += value.encode(stream, ctx)?;
            }
        }
        Ok(size)
    }

    /// Reads the node id that follows an encoding byte. Only the low nibble of the byte selects
    /// the form, the high nibble carries the expanded node id flags.
    pub(crate) fn decode_body<S: Read>(
        stream: &mut S,
        encoding: u8,
        ctx: &Context<'_>,
    ) -> EncodingResult<NodeId> {
        let node_id = match encoding & 0x0f {
            TWO_BYTE => {
                let value = read_u8(stream)?;
                NodeId::new(0, u32::from(value))
            }
            FOUR_BYTE => {
                let namespace = read_u8(stream)?;
                let value = read_u16(stream)?;
                NodeId::new(u16::from(namespace), u32::from(value))
            }
            NUMERIC => {
                let namespace = read_u16(stream)?;
                let value = read_u32(stream)?;
                NodeId::new(namespace, value)
            }
            STRING => {
                let namespace = read_u16(stream)?;
                let value = UAString::decode(stream, ctx)?;
                NodeId::new(namespace, value)
            }
            GUID => {
                let namespace = read_u16(stream)?;
                let value = Guid::decode(stream, ctx)?;
                NodeId::new(namespace, value)
            }
            BYTE_STRING => {
                let namespace = read_u16(stream)?;
                let value = ByteString::decode(stream, ctx)?;
                NodeId::new(namespace, value)
            }
            identifier => {
                error!("Unrecognized node id type {}", identifier);
                return Err(EncodingError::decoding(format!(
                    "unrecognized node id type {}",
                    identifier
                )));
            }
        };
        Ok(node_id)
    }
}

impl FromStr for NodeId {
    type Err = StatusCode;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use regex::Regex;

        // Parses a node from a string using the format specified in 5.3.1.10 part 6
        //
        // ns=<namespaceindex>;<type>=<value>
        //
        // Where type:
        //   i = NUMERIC
        //   s = STRING
        //   g = GUID
        //   b = OPAQUE (ByteString)
        //
        // If namespace == 0, the ns=0; will be omitted

        lazy_static! {
            // Contains capture groups "ns" and "t" for namespace and type respectively
            static ref RE: Regex = Regex::new(r"^(ns=(?P<ns>[0-9]+);)?(?P<t>[isgb]=.+)$").unwrap();
        }

        let captures = RE.captures(s).ok_or(StatusCode::BadNodeIdInvalid)?;

        // Check namespace (optional)
        let namespace = if let Some(ns) = captures.name("ns") {
            ns.as_str()
                .parse::<u16>()
                .map_err(|_| StatusCode::BadNodeIdInvalid)?
        } else {
            0
        };

        // Type identifier
        let t = captures.name("t").ok_or(StatusCode::BadNodeIdInvalid)?;
        Identifier::from_str(t.as_str())
            .map(|t| NodeId::new(namespace, t))
            .map_err(|_| StatusCode::BadNodeIdInvalid)
    }
}

impl From<&NodeId> for NodeId {
    fn from(v: &NodeId) -> Self {
        v.clone()
    }
}

impl<'a> From<(u16, &'a str)> for NodeId {
    fn from(v: (u16, &'a str)) -> Self {
        Self::new(v.0, UAString::from(v.1))
    }
}

impl From<(u16, u32)> for NodeId {
    fn from(v: (u16, u32)) -> Self {
        Self::new(v.0, v.1)
    }
}

impl From<(u16, Guid)> for NodeId {
    fn from(v: (u16, Guid)) -> Self {
        Self::new(v.0, v.1)
    }
}

impl From<(u16, ByteString)> for NodeId {
    fn from(v: (u16, ByteString)) -> Self {
        Self::new(v.0, v.1)
    }
}

impl From<ObjectId> for NodeId {
    fn from(v: ObjectId) -> Self {
        NodeId::new(0, v as u32)
    }
}

impl From<DataTypeId> for NodeId {
    fn from(v: DataTypeId) -> Self {
        NodeId::new(0, v as u32)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::null()
    }
}

impl NodeId {
    // Constructs a new NodeId from anything that can be turned into Identifier
    // u32, Guid, ByteString or String
    pub fn new<T>(namespace: u16, value: T) -> NodeId
    where
        T: Into<Identifier>,
    {
        NodeId {
            namespace,
            identifier: value.into(),
        }
    }

    /// Test if the node id is null, i.e. 0 namespace and 0 identifier
    pub fn is_null(&self) -> bool {
        self.namespace == 0 && self.identifier == Identifier::Numeric(0)
    }

    /// Returns a null node id
    pub fn null() -> NodeId {
        NodeId::new(0, 0u32)
    }

    /// Returns the numeric identifier of a namespace 0 node id.
    pub fn as_ns0_numeric(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(id) if self.namespace == 0 => Some(id),
            _ => None,
        }
    }

    /// Extracts an ObjectId from a node id, providing the node id holds an object id
    pub fn as_object_id(&self) -> Option<ObjectId> {
        self.as_ns0_numeric()
            .and_then(|id| ObjectId::try_from(id).ok())
    }

    /// Extracts a DataTypeId from a node id, providing the node id holds a data type id
    pub fn as_data_type_id(&self) -> Option<DataTypeId> {
        self.as_ns0_numeric()
            .and_then(|id| DataTypeId::try_from(id).ok())
    }

    /// Returns the same node id with its namespace index translated from one namespace table to
    /// another.
    pub fn translate(&self, from: &NamespaceTable, to: &NamespaceTable) -> EncodingResult<NodeId> {
        Ok(NodeId {
            namespace: NamespaceTable::translate(self.namespace, from, to)?,
            identifier: self.identifier.clone(),
        })
    }

    /// Test if the node id is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self.identifier, Identifier::Numeric(_))
    }

    /// Test if the node id is a string
    pub fn is_string(&self) -> bool {
        matches!(self.identifier, Identifier::String(_))
    }

    /// Test if the node id is a guid
    pub fn is_guid(&self) -> bool {
        matches!(self.identifier, Identifier::Guid(_))
    }

    /// Test if the node id us a byte string
    pub fn is_byte_string(&self) -> bool {
        matches!(self.identifier, Identifier::ByteString(_))
    }
}
