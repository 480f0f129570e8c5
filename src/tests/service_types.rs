// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::convert::TryFrom;

use serde_json::json;

use crate::{tests::*, *};

#[test]
fn range() {
    let range = Range::new(1.0, 2.0);
    serialize_and_compare(
        range.clone(),
        &[
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x40,
        ],
    );
    assert!(range.contains(1.0));
    assert!(range.contains(1.5));
    assert!(range.contains(2.0));
    assert!(!range.contains(2.1));
    assert!(!range.contains(f64::NAN));

    assert_eq!(json_test(range.clone()), json!({"Low": 1.0, "High": 2.0}));
    let node = xml_test(range, "Range");
    assert_eq!(node.child("High").unwrap().text(), "2");
}

#[test]
fn xv_type() {
    serialize_test(XVType { x: -3.5, value: 0.25 });
    json_test(XVType { x: 1.0, value: f32::INFINITY });
}

#[test]
fn eu_information() {
    let celsius = EUInformation::unece("CEL", "°C", "degree Celsius");
    assert_eq!(celsius.unit_id, 0x43_45_4c);
    assert_eq!(celsius.display_name, LocalizedText::new("en", "°C"));
    serialize_test(celsius.clone());
    xml_test(celsius, "EUInformation");
}

#[test]
fn argument() {
    let mut argument = Argument::from(("Values", DataTypeId::Double));
    argument.value_rank = 2;
    argument.array_dimensions = Some(vec![3, 4]);
    serialize_test(argument.clone());
    json_test(argument.clone());
    xml_test(argument.clone(), "Argument");

    let scalar = Argument::from(("Value", DataTypeId::Int32));
    assert_eq!(scalar.value_rank, -1);
    assert!(scalar.array_dimensions.is_none());
    serialize_test(scalar);

    // Dimensions that do not match the value rank are kept as sent
    argument.array_dimensions = Some(vec![3]);
    let ctx = ctx();
    let bytes = argument.encode_to_vec(&ctx).unwrap();
    let decoded = decode_bytes::<Argument>(&bytes, &ctx).unwrap();
    assert_eq!(decoded.value_rank, 2);
    assert_eq!(decoded.array_dimensions, Some(vec![3]));
    serialize_test(argument);
}

#[test]
fn relative_path() {
    let names = [QualifiedName::new(0, "Objects"), QualifiedName::new(2, "Pump")];
    let path = RelativePath::from(&names[..]);
    let elements = path.elements.as_ref().unwrap();
    assert_eq!(elements.len(), 2);
    assert!(elements[1].include_subtypes);
    assert!(!elements[1].is_inverse);
    assert_eq!(elements[1].target_name, names[1]);
    serialize_test(path.clone());
    json_test(path);

    serialize_test(RelativePath::default());
}

#[test]
fn simple_attribute_operand() {
    let operand = SimpleAttributeOperand::new(
        NodeId::new(0, 2041u32),
        "Message/a\\/b",
        13,
        UAString::null(),
    );
    assert_eq!(
        operand.browse_path,
        Some(vec![QualifiedName::new(0, "Message"), QualifiedName::new(0, "a/b")])
    );
    serialize_test(operand.clone());
    json_test(operand);
}

#[test]
fn attribute_operand() {
    let operand = AttributeOperand {
        node_id: NodeId::new(2, "Tank"),
        alias: UAString::from("t"),
        browse_path: RelativePath::from(&[QualifiedName::new(2, "Level")][..]),
        attribute_id: 13,
        index_range: UAString::from("1:2"),
    };
    serialize_test(operand.clone());
    xml_test(operand, "AttributeOperand");
}

#[test]
fn content_filter() {
    let filter = ContentFilterBuilder::new()
        .eq(FilterOperand::literal(10), FilterOperand::element(1))
        .gt(
            FilterOperand::simple_attribute(NodeId::new(0, 2041u32), "Severity", 13, UAString::null()),
            FilterOperand::literal(500u16),
        )
        .in_list(FilterOperand::element(2), vec![LiteralOperand::from("a"), LiteralOperand::from("b")])
        .build();

    let elements = filter.elements.as_ref().unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[0].filter_operator, FilterOperator::Equals);
    assert_eq!(elements[2].filter_operands.as_ref().unwrap().len(), 3);

    let decoded = serialize_test_and_return_expected(filter.clone(), filter.clone());
    let operands = decoded.elements.as_ref().unwrap()[1].operands().unwrap();
    assert!(operands[0].is_simple_attribute());
    assert_eq!(operands[1], FilterOperand::literal(500u16));

    json_test(filter.clone());
    xml_test(filter, "ContentFilter");
}

#[test]
fn filter_operand_errors() {
    // An operand that is not a filter operand
    let element = ContentFilterElement {
        filter_operator: FilterOperator::Not,
        filter_operands: Some(vec![
            ExtensionObject::from(FilterOperand::element(0)),
            ExtensionObject::from_structure(Range::new(0.0, 1.0)),
        ]),
    };
    let err = element.operands().unwrap_err();
    assert_eq!(err.status(), StatusCode::BadFilterOperandInvalid);
    assert_eq!(err.path(), "FilterOperands[1]");

    let opaque = ExtensionObject {
        node_id: NodeId::new(2, 1u32),
        body: ExtensionObjectEncoding::ByteString(ByteString::from(&[1u8])),
    };
    assert!(FilterOperand::try_from(&opaque).is_err());

    // An operator out of range
    let value = StructValue::new(DataTypeId::ContentFilterElement)
        .with("FilterOperator", FieldValue::Enum(99))
        .with("FilterOperands", FieldValue::Array(None));
    let err = ContentFilterElement::from_struct_value(value).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadOutOfRange);
    assert_eq!(err.path(), "FilterOperator");
    assert_eq!(FilterOperator::try_from(17).unwrap(), FilterOperator::BitwiseOr);
}

#[test]
fn structure_leaves() {
    let structure = Structure::from(XVType { x: 1.0, value: 2.0 });
    assert_eq!(structure.type_id(), NodeId::from(DataTypeId::XVType));
    let leaf: XVType = structure.clone().into_leaf().unwrap();
    assert_eq!(leaf.x, 1.0);
    let err = structure.clone().into_leaf::<Range>().unwrap_err();
    assert_eq!(err.status(), StatusCode::BadTypeMismatch);

    // A decoded value becomes the leaf of its type
    let value = Range::new(3.0, 4.0).to_struct_value();
    assert_eq!(
        Structure::from_struct_value(value).unwrap(),
        Structure::Range(Range::new(3.0, 4.0))
    );

    // Types without a leaf stay dynamic
    let value = StructValue::new(NodeId::new(1, 77u32)).with("A", 1i32);
    assert_eq!(
        Structure::from_struct_value(value.clone()).unwrap(),
        Structure::Dynamic(value)
    );
}
