// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::str::FromStr;

use serde_json::json;

use crate::{tests::*, *};

#[test]
fn json_numbers() {
    assert_eq!(json_test(5u8), json!(5));
    assert_eq!(json_test(-5i32), json!(-5));
    // 64-bit integers are strings so they survive a double
    assert_eq!(json_test(i64::MIN), json!("-9223372036854775808"));
    assert_eq!(json_test(u64::MAX), json!("18446744073709551615"));
    assert_eq!(json_test(1.5f64), json!(1.5));

    let ctx = ctx();
    // 64-bit integers are also accepted as numbers
    assert_eq!(i64::decode_json(&json!(12), &ctx).unwrap(), 12);
    // Out of range for the type
    assert!(u8::decode_json(&json!(256), &ctx).is_err());
    assert!(i32::decode_json(&json!("1"), &ctx).is_err());
}

#[test]
fn json_special_floats() {
    let ctx = ctx();
    assert_eq!(f64::NAN.encode_json(&ctx).unwrap(), json!("NaN"));
    assert_eq!(f64::INFINITY.encode_json(&ctx).unwrap(), json!("Infinity"));
    assert_eq!(f32::NEG_INFINITY.encode_json(&ctx).unwrap(), json!("-Infinity"));
    assert!(f64::decode_json(&json!("NaN"), &ctx).unwrap().is_nan());
    assert_eq!(
        f32::decode_json(&json!("-Infinity"), &ctx).unwrap(),
        f32::NEG_INFINITY
    );
    assert!(f64::decode_json(&json!("Nope"), &ctx).is_err());
}

#[test]
fn json_strings() {
    assert_eq!(json_test(UAString::from("abc")), json!("abc"));
    assert_eq!(json_test(UAString::null()), json!(null));
    assert_eq!(json_test(ByteString::from(&[1u8, 2, 3])), json!("AQID"));
    assert_eq!(
        json_test(Guid::from_str("72962B91-FA75-4ae6-8D28-B404DC7DAF63").unwrap()),
        json!("72962b91-fa75-4ae6-8d28-b404dc7daf63")
    );

    let ctx = ctx();
    assert!(ByteString::decode_json(&json!("not base64!"), &ctx).is_err());
}

#[test]
fn json_date_time() {
    let dt = DateTime::ymd_hms(2020, 2, 3, 4, 5, 6).unwrap();
    assert_eq!(json_test(dt), json!("2020-02-03T04:05:06Z"));
    assert_eq!(json_test(DateTime::null()), json!("0001-01-01T00:00:00Z"));
    assert_eq!(json_test(DateTime::endtimes()), json!("9999-12-31T23:59:59Z"));

    let ctx = ctx();
    assert!(DateTime::decode_json(&json!(12), &ctx).is_err());
}

#[test]
fn json_status_code() {
    assert_eq!(json_test(StatusCode::Good), json!(0));
    assert_eq!(json_test(StatusCode::BadDecodingError), json!(0x8007_0000u32));
}

#[test]
fn json_node_ids() {
    assert_eq!(json_test(NodeId::new(0, 13u32)), json!({"Id": 13}));
    assert_eq!(
        json_test(NodeId::new(2, "abc")),
        json!({"IdType": 1, "Id": "abc", "Namespace": 2})
    );
    assert_eq!(
        json_test(NodeId::new(1, ByteString::from(&[1u8, 2, 3]))),
        json!({"IdType": 3, "Id": "AQID", "Namespace": 1})
    );
    json_test(NodeId::new(3, Guid::new()));

    let ctx = ctx();
    assert!(NodeId::decode_json(&json!({"IdType": 4, "Id": 1}), &ctx).is_err());
    assert_eq!(NodeId::decode_json(&json!(null), &ctx).unwrap(), NodeId::null());
}

#[test]
fn json_expanded_node_ids() {
    assert_eq!(
        json_test(ExpandedNodeId::from(NodeId::new(4, 5u32))),
        json!({"Id": 5, "Namespace": 4})
    );
    let node_id = ExpandedNodeId {
        node_id: NodeId::new(0, "x"),
        namespace_uri: UAString::from("urn:other"),
        server_index: 2,
    };
    assert_eq!(
        json_test(node_id),
        json!({"IdType": 1, "Id": "x", "Namespace": "urn:other", "ServerUri": 2})
    );

    // A known uri is resolved to its index
    let registry = standard_registry();
    let namespaces = NamespaceTable::with_uris(["urn:a", "urn:b"]).unwrap();
    let ctx = Context::new(registry, &namespaces);
    let decoded =
        ExpandedNodeId::decode_json(&json!({"Id": 5, "Namespace": "urn:b"}), &ctx).unwrap();
    assert_eq!(decoded.node_id, NodeId::new(2, 5u32));
    assert_eq!(decoded.namespace_uri.as_ref(), "urn:b");
}

#[test]
fn json_names_and_text() {
    assert_eq!(
        json_test(QualifiedName::new(2, "Name")),
        json!({"Name": "Name", "Uri": 2})
    );
    assert_eq!(json_test(QualifiedName::new(0, "Name")), json!({"Name": "Name"}));
    assert_eq!(
        json_test(LocalizedText::new("en", "Hello")),
        json!({"Locale": "en", "Text": "Hello"})
    );
    assert_eq!(json_test(LocalizedText::null()), json!({}));
}

#[test]
fn json_variants() {
    assert_eq!(json_test(Variant::Empty), json!({}));
    assert_eq!(json_test(Variant::from(true)), json!({"Type": 1, "Body": true}));
    assert_eq!(
        json_test(Variant::from(7u64)),
        json!({"Type": 9, "Body": "7"})
    );
    assert_eq!(
        json_test(Variant::from(vec![1i16, 2])),
        json!({"Type": 4, "Body": [1, 2]})
    );
    let values: Vec<Variant> = (1..=4).map(|i| Variant::from(i as u8)).collect();
    let array = Array::new_multi(VariantTypeId::Byte, values, vec![2u32, 2]).unwrap();
    assert_eq!(
        json_test(Variant::from(array)),
        json!({"Type": 3, "Body": [1, 2, 3, 4], "Dimensions": [2, 2]})
    );
    json_test(Variant::from(LocalizedText::new("en", "x")));
    json_test(Variant::from(ExtensionObject::from_structure(Range::new(0.0, 10.0))));

    // Only a null array has an explicit null body, a null scalar has none
    assert_eq!(
        json_test(Variant::from(Array::null(VariantTypeId::Int32))),
        json!({"Type": 6, "Body": null})
    );
    assert_eq!(
        json_test(Variant::from(UAString::null())),
        json!({"Type": 12})
    );
    assert_eq!(
        json_test(Variant::from(Vec::<i32>::new())),
        json!({"Type": 6, "Body": []})
    );

    let ctx = ctx();
    // Dimensions that do not match the values
    assert!(Variant::decode_json(
        &json!({"Type": 3, "Body": [1, 2, 3], "Dimensions": [2, 2]}),
        &ctx
    )
    .is_err());
    // A scalar variant in a variant
    assert!(Variant::decode_json(&json!({"Type": 24, "Body": {"Type": 1, "Body": true}}), &ctx).is_err());
    assert!(Variant::decode_json(&json!({"Type": 99, "Body": 1}), &ctx).is_err());
    assert!(Variant::decode_json(&json!([1, 2]), &ctx).is_err());
}

#[test]
fn json_data_value() {
    let data_value = DataValue {
        value: Some(Variant::from(1.5f32)),
        status: Some(StatusCode::BadOutOfRange),
        source_timestamp: DateTime::ymd_hms(2020, 1, 1, 0, 0, 0),
        source_picoseconds: Some(10),
        server_timestamp: None,
        server_picoseconds: None,
    };
    let json = json_test(data_value);
    assert_eq!(json["Value"], json!({"Type": 10, "Body": 1.5}));
    assert_eq!(json["SourceTimestamp"], json!("2020-01-01T00:00:00Z"));
    assert_eq!(json["SourcePicoseconds"], json!(10));
    assert!(json.get("ServerTimestamp").is_none());

    assert_eq!(json_test(DataValue::null()), json!({}));
}

#[test]
fn json_diagnostic_info() {
    json_test(DiagnosticInfo {
        symbolic_id: Some(1),
        additional_info: Some(UAString::from("more")),
        inner_status_code: Some(StatusCode::BadTypeMismatch),
        inner_diagnostic_info: Some(Box::new(DiagnosticInfo {
            locale: Some(3),
            ..DiagnosticInfo::null()
        })),
        ..DiagnosticInfo::null()
    });
}
