// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::convert::TryFrom;

use crate::{tests::*, *};

#[test]
fn variant_scalars() {
    serialize_and_compare(Variant::Empty, &[0x00]);
    serialize_and_compare(Variant::from(true), &[0x01, 0x01]);
    serialize_and_compare(Variant::from(-1i32), &[0x06, 0xff, 0xff, 0xff, 0xff]);
    serialize_and_compare(
        Variant::from("ab"),
        &[0x0c, 0x02, 0x00, 0x00, 0x00, b'a', b'b'],
    );
    serialize_test(Variant::from(1.5f64));
    serialize_test(Variant::from(DateTime::ymd_hms(2001, 2, 3, 4, 5, 6).unwrap()));
    serialize_test(Variant::from(Guid::new()));
    serialize_test(Variant::from(NodeId::new(2, "node")));
    serialize_test(Variant::from(QualifiedName::new(1, "Name")));
    serialize_test(Variant::from(LocalizedText::new("en", "Text")));
    serialize_test(Variant::from(StatusCode::BadTypeMismatch));
    serialize_test(Variant::from(DataValue::value_only(10u8)));
    serialize_test(Variant::from(DiagnosticInfo::null()));
    serialize_test(Variant::from(ExtensionObject::null()));
}

#[test]
fn variant_single_array() {
    let v = Variant::from(vec![1i32, 2]);
    assert!(v.is_array());
    assert_eq!(v.type_id(), VariantTypeId::Empty);
    assert_eq!(v.array_type_id(), Some(VariantTypeId::Int32));
    serialize_and_compare(
        v,
        &[
            0x86, 0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
        ],
    );
    serialize_test(Variant::from(vec!["a".to_string(), "b".to_string()]));
    serialize_test(Variant::from(Vec::<f64>::new()));
}

#[test]
fn variant_multi_array() {
    let values: Vec<Variant> = (1..=6).map(|i| Variant::from(i as u8)).collect();
    let array = Array::new_multi(VariantTypeId::Byte, values, vec![2u32, 3]).unwrap();
    // Values bit, dimensions bit and the type code of Byte
    assert_eq!(array.encoding_mask(), 0x80 | 0x40 | 0x03);
    serialize_and_compare(
        Variant::from(array),
        &[
            0xc3, 0x06, 0x00, 0x00, 0x00, 1, 2, 3, 4, 5, 6, 0x02, 0x00, 0x00, 0x00, 0x02, 0x00,
            0x00, 0x00, 0x03, 0x00, 0x00, 0x00,
        ],
    );
}

#[test]
fn variant_array_of_variants() {
    let values = vec![
        Variant::Variant(Box::new(Variant::from(1i32))),
        Variant::Variant(Box::new(Variant::from("x"))),
    ];
    let array = Array::new_single(VariantTypeId::Variant, values).unwrap();
    serialize_test(Variant::from(array));
}

#[test]
fn variant_array_construction() {
    // Dimensions must cover the values exactly
    let values: Vec<Variant> = (0..5).map(|i| Variant::from(i as i32)).collect();
    let err = Array::new_multi(VariantTypeId::Int32, values.clone(), vec![2u32, 3]).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadTypeMismatch);
    assert!(Array::new_multi(VariantTypeId::Int32, values.clone(), vec![5u32, 0]).is_err());

    // Every element must be of the array's kind
    let mixed = vec![Variant::from(1i32), Variant::from(1u32)];
    assert!(Array::new_single(VariantTypeId::Int32, mixed).is_err());
    assert!(Array::new_single(VariantTypeId::Empty, values).is_err());

    // No arrays in arrays
    let nested = vec![Variant::from(vec![1i32])];
    assert!(Array::new_single(VariantTypeId::Int32, nested).is_err());

    assert_eq!(dimensions_length(&[2, 3, 4]), Some(24));
    assert_eq!(dimensions_length(&[2, 0]), None);
    assert_eq!(dimensions_length(&[u32::MAX, u32::MAX, u32::MAX]), None);
}

#[test]
fn variant_scalar_variant_rejected() {
    let ctx = ctx();
    let nested = Variant::Variant(Box::new(Variant::from(1i32)));
    assert!(nested.encode_to_vec(&ctx).is_err());

    // Type code 24 without the array bit
    let err = decode_bytes::<Variant>(&[0x18, 0x06, 0x01, 0x00, 0x00, 0x00], &ctx).unwrap_err();
    assert!(err.is_decoding());
}

#[test]
fn variant_invalid_masks() {
    let ctx = ctx();
    // Unknown type code
    assert!(decode_bytes::<Variant>(&[0x1f], &ctx).is_err());
    // Dimensions without values
    assert!(decode_bytes::<Variant>(&[0x46, 0x01, 0x00, 0x00, 0x00], &ctx).is_err());
    // An array of nothing
    assert!(decode_bytes::<Variant>(&[0x80, 0x00, 0x00, 0x00, 0x00], &ctx).is_err());
    // Null array with dimensions
    assert!(decode_bytes::<Variant>(
        &[0xc6, 0xff, 0xff, 0xff, 0xff, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
        &ctx
    )
    .is_err());
}

#[test]
fn variant_invalid_dimensions() {
    let ctx = ctx();
    // Five values with dimensions [2, 3]
    let mut bytes = vec![0xc6, 0x05, 0x00, 0x00, 0x00];
    for i in 0..5u8 {
        bytes.extend_from_slice(&[i, 0, 0, 0]);
    }
    bytes.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00]);
    let err = decode_bytes::<Variant>(&bytes, &ctx).unwrap_err();
    assert!(err.is_decoding());

    // A zero dimension
    let bytes = [
        0xc6, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ];
    assert!(decode_bytes::<Variant>(&bytes, &ctx).is_err());

    // A negative dimension
    let bytes = [
        0xc6, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0xff, 0xff,
        0xff, 0xff,
    ];
    assert!(decode_bytes::<Variant>(&bytes, &ctx).is_err());
}

#[test]
fn variant_element_error_path() {
    let ctx = ctx();
    // The second string of the array has an invalid length
    let bytes = [
        0x8c, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xfe, 0xff, 0xff, 0xff,
    ];
    let err = decode_bytes::<Variant>(&bytes, &ctx).unwrap_err();
    assert_eq!(err.path(), "[1]");
}

#[test]
fn variant_type_ids() {
    assert_eq!(VariantTypeId::Double.code(), 11);
    assert_eq!(VariantTypeId::from_encoding_mask(0x86).unwrap(), VariantTypeId::Int32);
    assert_eq!(VariantTypeId::from_name("LocalizedText"), Some(VariantTypeId::LocalizedText));
    assert_eq!(VariantTypeId::from_name("Nope"), None);
    assert_eq!(VariantTypeId::UInt16.data_type_id(), NodeId::new(0, 5u32));
    assert_eq!(
        VariantTypeId::try_from(&NodeId::new(0, 13u32)),
        Ok(VariantTypeId::DateTime)
    );
    assert!(VariantTypeId::try_from(&NodeId::new(1, 13u32)).is_err());
    assert_eq!(Variant::default_of(VariantTypeId::Int16), Variant::Int16(0));
}

#[test]
fn variant_try_from() {
    assert_eq!(i32::try_from(Variant::from(5i32)), Ok(5));
    assert_eq!(
        u32::try_from(Variant::from(5i32)),
        Err(Variant::Int32(5))
    );

    // A data value only comes out of a data value variant
    let data_value = DataValue::value_only(3u16);
    assert_eq!(data_value.value, Some(Variant::UInt16(3)));
    assert_eq!(
        DataValue::try_from(Variant::from(data_value.clone())),
        Ok(data_value)
    );
    assert_eq!(
        DataValue::try_from(Variant::from(3u16)),
        Err(Variant::UInt16(3))
    );
}

#[test]
fn variant_null_array() {
    let ctx = ctx();
    // A null array of Int32 is not an empty one
    let bytes = [0x86, 0xff, 0xff, 0xff, 0xff];
    let v = decode_bytes::<Variant>(&bytes, &ctx).unwrap();
    let expected = Variant::from(Array::null(VariantTypeId::Int32));
    assert_eq!(v, expected);
    assert_ne!(v, Variant::from(Vec::<i32>::new()));
    assert_eq!(v.encode_to_vec(&ctx).unwrap(), bytes.to_vec());
    serialize_test(v);
    serialize_and_compare(
        Variant::from(Vec::<i32>::new()),
        &[0x86, 0x00, 0x00, 0x00, 0x00],
    );

    let array = Array::null(VariantTypeId::String);
    assert!(array.is_null());
    assert!(array.values().is_empty());

    // Null arrays cannot have dimensions
    let array = Array {
        dimensions: vec![1],
        ..Array::null(VariantTypeId::Byte)
    };
    assert!(Variant::from(array).encode_to_vec(&ctx).is_err());
}
