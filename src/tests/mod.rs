// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

mod date_time;
mod encoding;
mod json;
mod namespace_table;
mod node_id;
mod option_set;
mod service_types;
mod struct_codec;
mod type_registry;
mod variant;
mod xml;

use std::cmp::PartialEq;
use std::fmt::Debug;
use std::io::Cursor;

use crate::*;

lazy_static! {
    static ref NAMESPACES: NamespaceTable = NamespaceTable::new();
}

/// A context over the standard registry and a namespace table holding only ns0.
pub fn ctx() -> Context<'static> {
    Context::new(standard_registry(), &NAMESPACES)
}

pub fn serialize_as_stream<T>(value: T, ctx: &Context<'_>) -> Cursor<Vec<u8>>
where
    T: BinaryEncoder<T> + Debug,
{
    // Ask the struct for its byte length
    let byte_len = value.byte_len(ctx);
    let mut stream = Cursor::new(vec![0u8; byte_len]);

    // Encode to stream
    let start_pos = stream.position();
    let result = value.encode(&mut stream, ctx);
    let end_pos = stream.position();
    assert!(result.is_ok(), "encode failed {:?}", result);

    // This ensures the size reported is the same as the byte length impl
    assert_eq!(result.unwrap(), byte_len);

    // Test that the position matches the byte_len
    assert_eq!((end_pos - start_pos) as usize, byte_len);

    let actual = stream.into_inner();
    println!("value = {:?}", value);
    println!("encoded bytes = {:?}", actual);
    Cursor::new(actual)
}

pub fn serialize_test_and_return_expected<T>(value: T, expected_value: T) -> T
where
    T: BinaryEncoder<T> + Debug + PartialEq,
{
    let ctx = ctx();
    let mut stream = serialize_as_stream(value, &ctx);
    let new_value: T = T::decode(&mut stream, &ctx).unwrap();
    println!("new value = {:?}", new_value);
    assert_eq!(expected_value, new_value);
    new_value
}

pub fn serialize_test<T>(value: T)
where
    T: BinaryEncoder<T> + Debug + PartialEq + Clone,
{
    let _ = serialize_test_and_return_expected(value.clone(), value);
}

pub fn serialize_test_expected<T>(value: T, expected_value: T)
where
    T: BinaryEncoder<T> + Debug + PartialEq,
{
    let _ = serialize_test_and_return_expected(value, expected_value);
}

/// Encodes the value, compares the bytes to the expected bytes and decodes them back.
pub fn serialize_and_compare<T>(value: T, expected: &[u8])
where
    T: BinaryEncoder<T> + Debug + PartialEq,
{
    let ctx = ctx();
    let mut stream = serialize_as_stream(value, &ctx);
    assert_eq!(stream.get_ref().as_slice(), expected);

    let new_value = T::decode(&mut stream, &ctx).unwrap();
    println!("new value = {:?}", new_value);
    assert_eq!(stream.position() as usize, expected.len());
}

/// Decodes the bytes as a value of the type.
pub fn decode_bytes<T>(bytes: &[u8], ctx: &Context<'_>) -> EncodingResult<T>
where
    T: BinaryEncoder<T>,
{
    let mut stream = Cursor::new(bytes.to_vec());
    T::decode(&mut stream, ctx)
}

pub fn json_test<T>(value: T) -> serde_json::Value
where
    T: JsonEncoder + Debug + PartialEq,
{
    let ctx = ctx();
    let json = value.encode_json(&ctx).unwrap();
    println!("json = {}", json);
    let new_value = T::decode_json(&json, &ctx).unwrap();
    assert_eq!(value, new_value);
    json
}

pub fn xml_test<T>(value: T, name: &str) -> XmlNode
where
    T: XmlEncoder + Debug + PartialEq,
{
    let ctx = ctx();
    let mut node = XmlNode::new(name);
    value.encode_xml(&mut node, &ctx).unwrap();

    // Through text and back again so the parser sees what a peer would send
    let document = node.to_document();
    println!("xml = {}", document);
    let node = XmlNode::parse(&document).unwrap();
    let new_value = T::decode_xml(&node, &ctx).unwrap();
    assert_eq!(value, new_value);
    node
}
