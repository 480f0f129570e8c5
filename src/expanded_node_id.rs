// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `ExpandedNodeId`.

use std::{
    self, fmt,
    io::{Read, Write},
    str::FromStr,
};

use crate::{
    encoding::*,
    namespace_table::NamespaceTable,
    node_id::{Identifier, NodeId},
    status_code::StatusCode,
    string::*,
};

/// Flag on the encoding byte when a namespace uri follows the node id
const NAMESPACE_URI_FLAG: u8 = 0x80;
/// Flag on the encoding byte when a server index follows the node id
const SERVER_INDEX_FLAG: u8 = 0x40;

/// A NodeId that allows the namespace URI to be specified instead of an index.
///
/// When `namespace_uri` is set it is authoritative: the index written on the wire is 0 and
/// decoding replaces the index with the uri's position in the context's namespace table.
#[derive(PartialEq, Eq, Debug, Clone, Hash, Default)]
pub struct ExpandedNodeId {
    pub node_id: NodeId,
    pub namespace_uri: UAString,
    pub server_index: u32,
}

impl BinaryEncoder<ExpandedNodeId> for ExpandedNodeId {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        let mut size = self.wire_node_id().byte_len(ctx);
        if !self.namespace_uri.is_null() {
            size += self.namespace_uri.byte_len(ctx);
        }
        if self.server_index != 0 {
            size += self.server_index.byte_len(ctx);
        }
        size
    }

    fn encode<S: Write>(&self, stream: &mut S, ctx: &Context<'_>) -> EncodingResult<usize> {
        let mut flags = 0;
        if !self.namespace_uri.is_null() {
            flags |= NAMESPACE_URI_FLAG;
        }
        if self.server_index != 0 {
            flags |= SERVER_INDEX_FLAG;
        }

        let mut size = self.wire_node_id().encode_with_flags(stream, flags, ctx)?;
        if !self.namespace_uri.is_null() {
            size += self.namespace_uri.encode(stream, ctx)?;
        }
        if self.server_index != 0 {
            size += self.server_index.encode(stream, ctx)?;
        }
        Ok(size)
    }

    fn decode<S: Read>(stream: &mut S, ctx: &Context<'_>) -> EncodingResult<Self> {
        let encoding = read_u8(stream)?;
        if encoding & 0x30 != 0 {
            error!("Expanded node id encoding byte {:#04x} is invalid", encoding);
            return Err(EncodingError::decoding(format!(
                "invalid expanded node id encoding byte {:#04x}",
                encoding
            )));
        }
        let mut node_id = NodeId::decode_body(stream, encoding, ctx)?;

        // Optional stuff
        let namespace_uri = if encoding & NAMESPACE_URI_FLAG != 0 {
            let namespace_uri = UAString::decode(stream, ctx)?;
            if let Some(index) = ctx.namespaces().index_of(namespace_uri.as_ref()) {
                node_id.namespace = index;
            } else {
                debug!(
                    "Namespace uri {} is not in the namespace table, index left as {}",
                    namespace_uri, node_id.namespace
                );
            }
            namespace_uri
        } else {
            UAString::null()
        };
        let server_index = if encoding & SERVER_INDEX_FLAG != 0 {
            u32::decode(stream, ctx)?
        } else {
            0
        };

        Ok(ExpandedNodeId {
            node_id,
            namespace_uri,
            server_index,
        })
    }
}

impl<'a> From<&'a NodeId> for ExpandedNodeId {
    fn from(v: &'a NodeId) -> Self {
        v.clone().into()
    }
}

impl From<(NodeId, u32)> for ExpandedNodeId {
    fn from(v: (NodeId, u32)) -> Self {
        ExpandedNodeId {
            node_id: v.0,
            namespace_uri: UAString::null(),
            server_index: v.1,
        }
    }
}

impl From<(NodeId, &str)> for ExpandedNodeId {
    fn from(v: (NodeId, &str)) -> Self {
        ExpandedNodeId {
            node_id: v.0,
            namespace_uri: v.1.into(),
            server_index: 0,
        }
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(v: NodeId) -> Self {
        ExpandedNodeId {
            node_id: v,
            namespace_uri: UAString::null(),
            server_index: 0,
        }
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        if self.namespace_uri.is_null() {
            // [svr=<serverindex>;]ns=<namespaceindex>;<type>=<value>
            write!(f, "{}", self.node_id)
        } else {
            // The % and ; chars have to be escaped out in the uri
            let namespace_uri = String::from(self.namespace_uri.as_ref())
                .replace('%', "%25")
                .replace(';', "%3b");
            // [svr=<serverindex>;]nsu=<uri>;<type>=<value>
            write!(f, "nsu={};{}", namespace_uri, self.node_id.identifier)
        }
    }
}

impl FromStr for ExpandedNodeId {
    type Err = StatusCode;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use regex::Regex;

        // Parses a node from a string using the format specified in 5.3.1.11 part 6
        //
        // [svr=<serverindex>;][ns=<namespaceindex>;]<type>=<value>
        // or
        // [svr=<serverindex>;]nsu=<uri>;<type>=<value>

        lazy_static! {
            // Contains capture groups "svr", either "ns" or "nsu" and then "t" for type
            static ref RE: Regex = Regex::new(r"^(svr=(?P<svr>[0-9]+);)?((ns=(?P<ns>[0-9]+)|nsu=(?P<nsu>[^;]+));)?(?P<t>[isgb]=.+)$").unwrap();
        }

        let captures = RE.captures(s).ok_or(StatusCode::BadNodeIdInvalid)?;

        let server_index = match captures.name("svr") {
            Some(svr) => svr
                .as_str()
                .parse::<u32>()
                .map_err(|_| StatusCode::BadNodeIdInvalid)?,
            None => 0,
        };

        // Check for namespace uri
        let namespace_uri = if let Some(nsu) = captures.name("nsu") {
            // The % and ; chars need to be unescaped
            let nsu = String::from(nsu.as_str())
                .replace("%3b", ";")
                .replace("%25", "%");
            UAString::from(nsu)
        } else {
            UAString::null()
        };

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
            .map(|t| ExpandedNodeId {
                server_index,
                namespace_uri,
                node_id: NodeId::new(namespace, t),
            })
            .map_err(|_| StatusCode::BadNodeIdInvalid)
    }
}

impl ExpandedNodeId {
    /// Creates an expanded node id from a node id
    pub fn new<T>(value: T) -> ExpandedNodeId
    where
        T: Into<ExpandedNodeId>,
    {
        value.into()
    }

    pub fn null() -> ExpandedNodeId {
        Self::new(NodeId::null())
    }

    pub fn is_null(&self) -> bool {
        self.node_id.is_null()
    }

    /// Resolves the expanded node id into a node id local to the supplied namespace table. An
    /// absent namespace uri, or a reference to another server, fails with a remap error.
    pub fn to_node_id(&self, namespaces: &NamespaceTable) -> EncodingResult<NodeId> {
        if self.server_index != 0 {
            return Err(EncodingError::remap(format!(
                "{} refers to server index {}",
                self, self.server_index
            )));
        }
        if self.namespace_uri.is_null() {
            Ok(self.node_id.clone())
        } else {
            let uri = self.namespace_uri.as_ref();
            let namespace = namespaces.index_of(uri).ok_or_else(|| {
                EncodingError::remap(format!("namespace uri {} is not in the table", uri))
            })?;
            Ok(NodeId {
                namespace,
                identifier: self.node_id.identifier.clone(),
            })
        }
    }

    /// The node id as written on the wire, which has a 0 index when a uri is present.
    fn wire_node_id(&self) -> NodeId {
        if self.namespace_uri.is_null() {
            self.node_id.clone()
        } else {
            NodeId {
                namespace: 0,
                identifier: self.node_id.identifier.clone(),
            }
        }
    }
}
