// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Default decoding limits.

/// Maximum number of elements in an array
pub const MAX_ARRAY_LENGTH: usize = 100000;
/// Maximum size of a string in bytes
pub const MAX_STRING_LENGTH: usize = 65535;
/// Maximum size of a byte string in bytes
pub const MAX_BYTE_STRING_LENGTH: usize = 65535;
/// Maximum depth of nested structures, variants, extension objects and diagnostic infos
pub const MAX_DECODING_DEPTH: usize = 10;

/// URI of namespace 0
pub const OPC_UA_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";
/// XML namespace of the standard types schema
pub const OPC_UA_TYPES_XML_NAMESPACE: &str = "http://opcfoundation.org/UA/2008/02/Types.xsd";
/// XML schema instance namespace, used for `xsi:nil`
pub const XML_SCHEMA_INSTANCE_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
