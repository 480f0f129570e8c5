// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! A schema driven codec for OPC UA structures.
//!
//! Structured types are described by a [`TypeRegistry`] of field descriptors keyed by their
//! protocol node ids. One generic engine walks those descriptors to encode and decode values in
//! the OPC UA binary, XML and JSON encodings. Types that are not in the registry travel through
//! `ExtensionObject`s as opaque payloads so a stream containing them is never broken.
//!
//! Every codec call takes a [`Context`] that bundles the registry, the namespace table of the
//! message and the decoding limits.

#![allow(clippy::float_cmp)]
#![allow(clippy::from_over_into)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate serde_derive;

pub mod array;
pub mod basic_types;
pub mod byte_string;
pub mod config;
#[cfg(feature = "console-logging")]
pub mod console_logging;
pub mod constants;
pub mod data_value;
pub mod date_time;
pub mod diagnostic_info;
pub mod encoding;
pub mod error;
pub mod expanded_node_id;
pub mod extension_object;
pub mod guid;
pub mod json;
pub mod localized_text;
pub mod namespace_table;
pub mod node_id;
pub mod node_ids;
pub mod option_set;
pub mod qualified_name;
pub mod service_types;
pub mod status_code;
pub mod string;
pub mod struct_codec;
pub mod type_registry;
pub mod type_table;
pub mod variant;
pub mod variant_type_id;
pub mod xml;

#[cfg(test)]
mod tests;

pub use crate::{
    array::*,
    byte_string::ByteString,
    config::{CodecConfig, Config},
    data_value::DataValue,
    date_time::*,
    diagnostic_info::*,
    encoding::*,
    error::*,
    expanded_node_id::ExpandedNodeId,
    extension_object::*,
    guid::Guid,
    json::JsonEncoder,
    localized_text::LocalizedText,
    namespace_table::NamespaceTable,
    node_id::*,
    node_ids::*,
    option_set::*,
    qualified_name::QualifiedName,
    service_types::*,
    status_code::StatusCode,
    string::*,
    struct_codec::{FieldValue, Matrix, StructValue},
    type_registry::*,
    type_table::standard_registry,
    variant::Variant,
    variant_type_id::VariantTypeId,
    xml::{XmlEncoder, XmlNode},
};

pub mod prelude {
    pub use crate::*;
}
