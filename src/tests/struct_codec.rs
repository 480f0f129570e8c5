// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::{io::Cursor, sync::Arc};

use parking_lot::Mutex;
use serde_json::json;

use crate::{
    struct_codec::{byte_len, decode_binary, decode_json, decode_xml, encode_binary, encode_json, encode_xml},
    tests::*,
    *,
};

const BASE: u32 = 1000;
const MIDDLE: u32 = 1010;
const LEAF: u32 = 1020;
const OPTIONS: u32 = 1030;
const CHOICE: u32 = 1040;
const HOLDER: u32 = 1050;
const COLOR: u32 = 1060;
const GRID: u32 = 1070;

fn id(value: u32) -> NodeId {
    NodeId::new(1, value)
}

/// A registry of test types in ns=1. Each structure's binary encoding id is its data type id + 1.
fn registry() -> TypeRegistry {
    let mut builder = TypeRegistryBuilder::new();
    builder
        .register(
            TypeDescriptor::new(id(BASE), "Base")
                .binary_encoding(id(BASE + 1))
                .super_type(DataTypeId::Structure)
                .field(FieldDescriptor::new("Id", DataTypeId::UInt32)),
        )
        .unwrap()
        .register(
            TypeDescriptor::new(id(MIDDLE), "Middle")
                .binary_encoding(id(MIDDLE + 1))
                .super_type(id(BASE))
                .field(FieldDescriptor::new("Name", DataTypeId::String)),
        )
        .unwrap()
        .register(
            TypeDescriptor::new(id(LEAF), "Leaf")
                .binary_encoding(id(LEAF + 1))
                .super_type(id(MIDDLE))
                .field(FieldDescriptor::new("Values", DataTypeId::Int16).array()),
        )
        .unwrap()
        .register(
            TypeDescriptor::new(id(OPTIONS), "Options")
                .binary_encoding(id(OPTIONS + 1))
                .structure_kind(StructureKind::StructureWithOptionalFields)
                .field(FieldDescriptor::new("A", DataTypeId::Byte))
                .field(FieldDescriptor::new("B", DataTypeId::Byte).optional())
                .field(FieldDescriptor::new("C", DataTypeId::Byte).optional()),
        )
        .unwrap()
        .register(
            TypeDescriptor::new(id(CHOICE), "Choice")
                .binary_encoding(id(CHOICE + 1))
                .structure_kind(StructureKind::Union)
                .field(FieldDescriptor::new("Number", DataTypeId::Int32))
                .field(FieldDescriptor::new("Text", DataTypeId::String)),
        )
        .unwrap()
        .register(
            TypeDescriptor::new(id(HOLDER), "Holder")
                .binary_encoding(id(HOLDER + 1))
                .field(FieldDescriptor::new("Items", id(BASE)).array())
                .field(FieldDescriptor::new("Color", id(COLOR)))
                .field(FieldDescriptor::new("Any", DataTypeId::BaseDataType)),
        )
        .unwrap()
        .register(
            TypeDescriptor::new(id(GRID), "Grid")
                .binary_encoding(id(GRID + 1))
                .field(FieldDescriptor::new("Cells", DataTypeId::Byte).value_rank(2)),
        )
        .unwrap()
        .register_enum(EnumDescriptor::new(
            id(COLOR),
            "Color",
            &[("Red", 0), ("Green", 1), ("Blue", 2)],
        ))
        .unwrap();
    builder.build().unwrap()
}

fn leaf() -> StructValue {
    StructValue::new(id(LEAF))
        .with("Id", 7u32)
        .with("Name", "ab")
        .with("Values", FieldValue::array([1i16, -1]))
}

fn encode(value: &StructValue, ctx: &Context<'_>) -> EncodingResult<Vec<u8>> {
    let mut stream = Cursor::new(Vec::new());
    encode_binary(&mut stream, value, ctx)?;
    Ok(stream.into_inner())
}

fn decode(bytes: &[u8], type_id: u32, ctx: &Context<'_>) -> EncodingResult<StructValue> {
    let mut stream = Cursor::new(bytes.to_vec());
    decode_binary(&mut stream, &id(type_id), ctx)
}

#[test]
fn inherited_fields_come_first() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let names: Vec<&str> = registry
        .fields(&id(LEAF))
        .unwrap()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["Id", "Name", "Values"]);

    let value = leaf();
    let bytes = encode(&value, &ctx).unwrap();
    assert_eq!(
        bytes,
        vec![
            0x07, 0x00, 0x00, 0x00, // Id
            0x02, 0x00, 0x00, 0x00, b'a', b'b', // Name
            0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0xff, 0xff, // Values
        ]
    );
    assert_eq!(byte_len(&value, &ctx).unwrap(), bytes.len());
    assert_eq!(decode(&bytes, LEAF, &ctx).unwrap(), value);
}

#[test]
fn field_order_of_value_does_not_matter() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let shuffled = StructValue::new(id(LEAF))
        .with("Values", FieldValue::array([1i16, -1]))
        .with("Name", "ab")
        .with("Id", 7u32);
    assert_eq!(encode(&shuffled, &ctx).unwrap(), encode(&leaf(), &ctx).unwrap());
}

#[test]
fn optional_fields() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    // Only C is present, the mask has bit 1 set
    let value = StructValue::new(id(OPTIONS))
        .with("A", 1u8)
        .with_optional("B", None::<u8>)
        .with("C", 3u8);
    let bytes = encode(&value, &ctx).unwrap();
    assert_eq!(bytes, vec![0x02, 0x00, 0x00, 0x00, 0x01, 0x03]);
    assert_eq!(decode(&bytes, OPTIONS, &ctx).unwrap(), value);

    // A field left out altogether is absent too
    let value = StructValue::new(id(OPTIONS)).with("A", 1u8);
    let bytes = encode(&value, &ctx).unwrap();
    assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x00, 0x01]);
    let decoded = decode(&bytes, OPTIONS, &ctx).unwrap();
    assert_eq!(decoded.get("B"), None);
    assert_eq!(decoded.get("C"), None);

    // A required field cannot be absent
    let value = StructValue::new(id(OPTIONS)).with("B", 2u8);
    let err = encode(&value, &ctx).unwrap_err();
    assert_eq!(err.path(), "A");
}

#[test]
fn optional_mask_with_unknown_bits() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let err = decode(&[0x04, 0x00, 0x00, 0x00, 0x01], OPTIONS, &ctx).unwrap_err();
    assert!(err.is_decoding());
    assert_eq!(err.path(), "EncodingMask");
}

#[test]
fn union_switch() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let value = StructValue::new(id(CHOICE)).with("Text", "x");
    let bytes = encode(&value, &ctx).unwrap();
    assert_eq!(
        bytes,
        vec![0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, b'x']
    );
    let decoded = decode(&bytes, CHOICE, &ctx).unwrap();
    assert_eq!(decoded.get("Text"), Some(&FieldValue::from("x")));
    assert_eq!(decoded.get("Number"), None);

    // No field set
    let bytes = encode(&StructValue::new(id(CHOICE)), &ctx).unwrap();
    assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x00]);
    let decoded = decode(&bytes, CHOICE, &ctx).unwrap();
    assert!(decoded.fields.iter().all(|(_, v)| v.is_none()));

    // Two fields set
    let value = StructValue::new(id(CHOICE))
        .with("Number", 1i32)
        .with("Text", "x");
    assert!(encode(&value, &ctx).is_err());

    // Switch beyond the last field
    let err = decode(&[0x03, 0x00, 0x00, 0x00], CHOICE, &ctx).unwrap_err();
    assert_eq!(err.path(), "SwitchField");
}

#[test]
fn nested_structures_enums_and_variants() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let value = StructValue::new(id(HOLDER))
        .with(
            "Items",
            FieldValue::array([
                StructValue::new(id(BASE)).with("Id", 1u32),
                StructValue::new(id(BASE)).with("Id", 2u32),
            ]),
        )
        .with("Color", FieldValue::Enum(2))
        .with("Any", Variant::from(1.5f32));
    let bytes = encode(&value, &ctx).unwrap();
    assert_eq!(
        bytes,
        vec![
            0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, // Items
            0x02, 0x00, 0x00, 0x00, // Color
            0x0a, 0x00, 0x00, 0xc0, 0x3f, // Any
        ]
    );
    assert_eq!(decode(&bytes, HOLDER, &ctx).unwrap(), value);

    // A null array is not an empty array
    let value = StructValue::new(id(HOLDER))
        .with("Items", FieldValue::null_array())
        .with("Color", FieldValue::Enum(0))
        .with("Any", Variant::Empty);
    let bytes = encode(&value, &ctx).unwrap();
    assert_eq!(&bytes[0..4], &[0xff, 0xff, 0xff, 0xff]);
    assert_eq!(decode(&bytes, HOLDER, &ctx).unwrap(), value);
}

#[test]
fn matrix_field() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let value = StructValue::new(id(GRID)).with(
        "Cells",
        FieldValue::Matrix(Some(Matrix {
            dimensions: vec![2, 2],
            values: (1..=4u8).map(FieldValue::from).collect(),
        })),
    );
    let bytes = encode(&value, &ctx).unwrap();
    assert_eq!(
        bytes,
        vec![
            0x02, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 1, 2, 3, 4
        ]
    );
    assert_eq!(decode(&bytes, GRID, &ctx).unwrap(), value);

    // The values must fill the dimensions
    let value = StructValue::new(id(GRID)).with(
        "Cells",
        FieldValue::Matrix(Some(Matrix {
            dimensions: vec![2, 2],
            values: vec![FieldValue::from(1u8)],
        })),
    );
    assert_eq!(encode(&value, &ctx).unwrap_err().path(), "Cells");

    // A one dimensional matrix does not fit a field of rank 2
    let err = decode(
        &[0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x05],
        GRID,
        &ctx,
    )
    .unwrap_err();
    assert_eq!(err.path(), "Cells");
}

#[test]
fn error_path_inside_arrays() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    // The second item holds a string where a UInt32 belongs
    let value = StructValue::new(id(HOLDER))
        .with(
            "Items",
            FieldValue::array([
                StructValue::new(id(BASE)).with("Id", 1u32),
                StructValue::new(id(BASE)).with("Id", "two"),
            ]),
        )
        .with("Color", FieldValue::Enum(0))
        .with("Any", Variant::Empty);
    let err = encode(&value, &ctx).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadTypeMismatch);
    assert_eq!(err.path(), "Items[1].Id");

    // The stream ends inside the second item
    let bytes = [0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02];
    let err = decode(&bytes, HOLDER, &ctx).unwrap_err();
    assert!(err.is_decoding());
    assert_eq!(err.path(), "Items[1].Id");

    // Matrix elements carry the field name too
    let value = StructValue::new(id(GRID)).with(
        "Cells",
        FieldValue::Matrix(Some(Matrix {
            dimensions: vec![1, 2],
            values: vec![FieldValue::from(1u8), FieldValue::from(2u16)],
        })),
    );
    let err = encode(&value, &ctx).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadTypeMismatch);
    assert_eq!(err.path(), "Cells[1]");

    let bytes = [
        0x02, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 1, 2, 3,
    ];
    let err = decode(&bytes, GRID, &ctx).unwrap_err();
    assert_eq!(err.path(), "Cells[3]");

    // The same paths come out of the JSON decoder
    let json = json!({"Items": [{"Id": 1}, {"Id": "two"}], "Color": 0});
    let err = decode_json(&json, &id(HOLDER), &ctx).unwrap_err();
    assert_eq!(err.path(), "Items[1].Id");
}

#[test]
fn undeclared_and_unregistered() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let value = StructValue::new(id(BASE)).with("Id", 1u32).with("Extra", 2u32);
    let err = encode(&value, &ctx).unwrap_err();
    assert_eq!(err.path(), "Extra");

    let err = encode(&StructValue::new(id(BASE)), &ctx).unwrap_err();
    assert_eq!(err.path(), "Id");

    let err = encode(&StructValue::new(id(9999)), &ctx).unwrap_err();
    assert!(err.is_schema());
    let err = decode(&[], 9999, &ctx).unwrap_err();
    assert!(err.is_schema());
}

#[test]
fn nesting_depth_is_limited() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces).with_options(DecodingOptions {
        decoding_depth_gauge: Arc::new(Mutex::new(DepthGauge::new(0))),
        ..Default::default()
    });

    let bytes = [
        0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let err = decode(&bytes, HOLDER, &ctx).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadEncodingLimitsExceeded);
}

#[test]
fn json_structures() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let value = leaf();
    let json = encode_json(&value, &ctx).unwrap();
    assert_eq!(json, json!({"Id": 7, "Name": "ab", "Values": [1, -1]}));
    assert_eq!(decode_json(&json, &id(LEAF), &ctx).unwrap(), value);

    let value = StructValue::new(id(OPTIONS)).with("A", 1u8).with("C", 3u8);
    let json = encode_json(&value, &ctx).unwrap();
    assert_eq!(json, json!({"EncodingMask": 2, "A": 1, "C": 3}));
    let decoded = decode_json(&json, &id(OPTIONS), &ctx).unwrap();
    assert_eq!(decoded.get("C"), Some(&FieldValue::from(3u8)));
    assert_eq!(decoded.get("B"), None);

    let value = StructValue::new(id(CHOICE)).with("Number", 5i32);
    let json = encode_json(&value, &ctx).unwrap();
    assert_eq!(json, json!({"SwitchField": 1, "Number": 5}));

    let value = StructValue::new(id(GRID)).with(
        "Cells",
        FieldValue::Matrix(Some(Matrix {
            dimensions: vec![1, 2],
            values: vec![FieldValue::from(1u8), FieldValue::from(2u8)],
        })),
    );
    let json = encode_json(&value, &ctx).unwrap();
    assert_eq!(
        json,
        json!({"Cells": {"Dimensions": [1, 2], "Array": [1, 2]}})
    );
    assert_eq!(decode_json(&json, &id(GRID), &ctx).unwrap(), value);
}

#[test]
fn xml_structures() {
    let registry = registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let value = leaf();
    let node = encode_xml(&value, &ctx).unwrap();
    assert_eq!(node.name, "Leaf");
    assert_eq!(node.child("Id").unwrap().text(), "7");
    assert_eq!(node.child("Name").unwrap().text(), "ab");
    let values = node.child("Values").unwrap();
    assert_eq!(values.children.len(), 2);
    assert_eq!(values.children[0].name, "Int16");

    // Through text and back
    let node = XmlNode::parse(&node.to_document()).unwrap();
    assert_eq!(decode_xml(&node, &id(LEAF), &ctx).unwrap(), value);

    let value = StructValue::new(id(HOLDER))
        .with(
            "Items",
            FieldValue::array([StructValue::new(id(BASE)).with("Id", 1u32)]),
        )
        .with("Color", FieldValue::Enum(1))
        .with("Any", Variant::from("text"));
    let node = encode_xml(&value, &ctx).unwrap();
    assert_eq!(node.child("Items").unwrap().children[0].name, "Base");
    let node = XmlNode::parse(&node.to_document()).unwrap();
    assert_eq!(decode_xml(&node, &id(HOLDER), &ctx).unwrap(), value);
}

#[test]
fn extending_the_standard_registry() {
    let mut builder = TypeRegistryBuilder::from(standard_registry());
    builder
        .register(
            TypeDescriptor::new(id(BASE), "Base")
                .binary_encoding(id(BASE + 1))
                .field(FieldDescriptor::new("Range", DataTypeId::Range)),
        )
        .unwrap();
    let registry = builder.build().unwrap();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(&registry, &namespaces);

    let value = StructValue::new(id(BASE)).with(
        "Range",
        StructValue::new(DataTypeId::Range)
            .with("Low", 1.0f64)
            .with("High", 2.0f64),
    );
    let bytes = encode(&value, &ctx).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(decode(&bytes, BASE, &ctx).unwrap(), value);
}
