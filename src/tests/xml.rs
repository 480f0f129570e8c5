// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::str::FromStr;

use crate::{tests::*, *};

#[test]
fn xml_primitives() {
    assert_eq!(xml_test(true, "Boolean").text(), "true");
    assert_eq!(xml_test(-12i16, "Int16").text(), "-12");
    assert_eq!(xml_test(u64::MAX, "UInt64").text(), "18446744073709551615");
    assert_eq!(xml_test(2.5f64, "Double").text(), "2.5");

    let ctx = ctx();
    // Empty content is the default
    assert_eq!(i32::decode_xml(&XmlNode::new("Int32"), &ctx).unwrap(), 0);
    assert!(u8::decode_xml(&XmlNode::with_text("Byte", "300"), &ctx).is_err());
    assert!(bool::decode_xml(&XmlNode::with_text("Boolean", "yes"), &ctx).is_err());
}

#[test]
fn xml_special_floats() {
    assert_eq!(xml_test(f64::INFINITY, "Double").text(), "INF");
    assert_eq!(xml_test(f32::NEG_INFINITY, "Float").text(), "-INF");

    let ctx = ctx();
    let mut node = XmlNode::new("Double");
    f64::NAN.encode_xml(&mut node, &ctx).unwrap();
    assert_eq!(node.text(), "NaN");
    assert!(f64::decode_xml(&node, &ctx).unwrap().is_nan());
}

#[test]
fn xml_strings() {
    assert_eq!(xml_test(UAString::from("a < b & c"), "String").text(), "a < b & c");
    // Null is nil, empty is an empty element
    let node = xml_test(UAString::null(), "String");
    assert!(node.is_nil());
    let node = xml_test(UAString::from(""), "String");
    assert!(!node.is_nil());

    assert_eq!(xml_test(ByteString::from(&[1u8, 2, 3]), "ByteString").text(), "AQID");
    assert!(xml_test(ByteString::null(), "ByteString").is_nil());

    // Base64 may be wrapped
    let ctx = ctx();
    let node = XmlNode::with_text("ByteString", "AQ\n  ID");
    assert_eq!(
        ByteString::decode_xml(&node, &ctx).unwrap(),
        ByteString::from(&[1u8, 2, 3])
    );
}

#[test]
fn xml_guid_and_date_time() {
    let guid = Guid::from_str("72962B91-FA75-4ae6-8D28-B404DC7DAF63").unwrap();
    let node = xml_test(guid, "Guid");
    assert_eq!(
        node.child("String").unwrap().text(),
        "72962b91-fa75-4ae6-8d28-b404dc7daf63"
    );

    let dt = DateTime::ymd_hms(2019, 12, 31, 23, 0, 1).unwrap();
    assert_eq!(xml_test(dt, "DateTime").text(), "2019-12-31T23:00:01Z");
    assert_eq!(xml_test(DateTime::null(), "DateTime").text(), "0001-01-01T00:00:00Z");
    assert_eq!(xml_test(DateTime::endtimes(), "DateTime").text(), "9999-12-31T23:59:59Z");
}

#[test]
fn xml_node_ids() {
    let node = xml_test(NodeId::new(2, "abc"), "NodeId");
    assert_eq!(node.child("Identifier").unwrap().text(), "ns=2;s=abc");
    xml_test(NodeId::new(0, 85u32), "NodeId");
    xml_test(ExpandedNodeId::from((NodeId::new(0, 85u32), 3)), "ExpandedNodeId");

    let ctx = ctx();
    let node = XmlNode::parse("<NodeId><Identifier>nonsense</Identifier></NodeId>").unwrap();
    let err = NodeId::decode_xml(&node, &ctx).unwrap_err();
    assert_eq!(err.path(), "Identifier");
}

#[test]
fn xml_composites() {
    let node = xml_test(QualifiedName::new(3, "Name"), "QualifiedName");
    assert_eq!(node.child("NamespaceIndex").unwrap().text(), "3");
    assert_eq!(node.child("Name").unwrap().text(), "Name");

    let node = xml_test(LocalizedText::new("de", "Hallo"), "LocalizedText");
    assert_eq!(node.child("Locale").unwrap().text(), "de");
    let node = xml_test(LocalizedText::null(), "LocalizedText");
    assert!(node.children.is_empty());

    let node = xml_test(StatusCode::BadTypeMismatch, "StatusCode");
    assert_eq!(node.child("Code").unwrap().text(), "2155085824");

    xml_test(
        DataValue {
            value: Some(Variant::from("x")),
            status: Some(StatusCode::Good),
            source_timestamp: DateTime::ymd_hms(2020, 1, 1, 0, 0, 0),
            source_picoseconds: None,
            server_timestamp: None,
            server_picoseconds: None,
        },
        "DataValue",
    );
    xml_test(
        DiagnosticInfo {
            symbolic_id: Some(4),
            additional_info: Some(UAString::from("info")),
            ..DiagnosticInfo::null()
        },
        "DiagnosticInfo",
    );
}

#[test]
fn xml_variants() {
    let node = xml_test(Variant::from(5i32), "Value");
    assert_eq!(node.child("Int32").unwrap().text(), "5");
    assert!(xml_test(Variant::Empty, "Value").children.is_empty());

    let node = xml_test(Variant::from(vec!["a".to_string(), "b".to_string()]), "Value");
    let list = node.child("ListOfString").unwrap();
    assert_eq!(list.children.len(), 2);
    assert_eq!(list.children[1].text(), "b");

    let values: Vec<Variant> = (1..=6).map(|i| Variant::from(i as u16)).collect();
    let array = Array::new_multi(VariantTypeId::UInt16, values, vec![3u32, 2]).unwrap();
    let node = xml_test(Variant::from(array), "Value");
    let matrix = node.child("Matrix").unwrap();
    assert_eq!(matrix.child("Dimensions").unwrap().children.len(), 2);
    assert_eq!(matrix.child("Elements").unwrap().children.len(), 6);

    // A null array is a nil list, an empty array an empty one
    let node = xml_test(Variant::from(Array::null(VariantTypeId::Double)), "Value");
    assert!(node.child("ListOfDouble").unwrap().is_nil());
    let node = xml_test(Variant::from(Vec::<f64>::new()), "Value");
    assert!(!node.child("ListOfDouble").unwrap().is_nil());

    xml_test(Variant::from(QualifiedName::new(1, "q")), "Value");
    xml_test(Variant::from(ExtensionObject::from_structure(Range::new(1.0, 5.0))), "Value");

    let ctx = ctx();
    // Elements of another kind than the list
    let node =
        XmlNode::parse("<Value><ListOfInt32><Int32>1</Int32><String>x</String></ListOfInt32></Value>")
            .unwrap();
    let err = Variant::decode_xml(&node, &ctx).unwrap_err();
    assert_eq!(err.path(), "[1]");
}

#[test]
fn xml_node_text() {
    let mut node = XmlNode::new("Root");
    node.add_child(XmlNode::with_text("A", "1 < 2"));
    node.add_child(XmlNode::nil("B"));
    let document = node.to_document();
    assert!(document.contains("1 &lt; 2"));

    let parsed = XmlNode::parse(&document).unwrap();
    assert_eq!(parsed.name, "Root");
    assert_eq!(parsed.child("A").unwrap().text(), "1 < 2");
    assert!(parsed.child("B").unwrap().is_nil());
    assert!(parsed.child("C").is_none());

    assert!(XmlNode::parse("<Root>").is_err());
}
