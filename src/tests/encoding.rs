// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::{io::Cursor, str::FromStr, sync::Arc};

use parking_lot::Mutex;

use crate::{tests::*, *};

#[test]
fn encoding_bool() {
    serialize_test(true);
    serialize_test(false);
}

#[test]
fn encoding_sbyte() {
    serialize_test(0 as i8);
    serialize_test(100 as i8);
    serialize_test(-90 as i8);
}

#[test]
fn encoding_int16() {
    serialize_test(0 as i16);
    serialize_test(-17000 as i16);
    serialize_test(32000 as i16);
}

#[test]
fn encoding_uint32() {
    serialize_test(0 as u32);
    serialize_test(57055500 as u32);
    serialize_test(32555000 as u32);
}

#[test]
fn encoding_int64() {
    serialize_test(0 as i64);
    serialize_test(-17442224000 as i64);
    serialize_test(32022204440 as i64);
}

#[test]
fn encoding_f64() {
    serialize_test(0 as f64);
    serialize_test(12.43 as f64);
    serialize_test(-123.44 as f64);
}

#[test]
fn little_endian_bytes() {
    serialize_and_compare(0x0102_0304u32, &[0x04, 0x03, 0x02, 0x01]);
    serialize_and_compare(-2i16, &[0xfe, 0xff]);
    serialize_and_compare(1.0f32, &[0x00, 0x00, 0x80, 0x3f]);
}

#[test]
fn encoding_string() {
    serialize_test(UAString::null());
    serialize_test(UAString::from(""));
    serialize_test(UAString::from("ショッピング"));
    serialize_test(UAString::from("This is a test"));

    // Null and empty are distinct on the wire
    serialize_and_compare(UAString::null(), &[0xff, 0xff, 0xff, 0xff]);
    serialize_and_compare(UAString::from(""), &[0x00, 0x00, 0x00, 0x00]);
    serialize_and_compare(UAString::from("ab"), &[0x02, 0x00, 0x00, 0x00, b'a', b'b']);
}

#[test]
fn string_invalid_length() {
    let ctx = ctx();
    let result = decode_bytes::<UAString>(&[0xfe, 0xff, 0xff, 0xff], &ctx);
    assert_eq!(result.unwrap_err().status(), StatusCode::BadDecodingError);

    // Invalid UTF-8
    let result = decode_bytes::<UAString>(&[0x02, 0x00, 0x00, 0x00, 0xc3, 0x28], &ctx);
    assert!(result.unwrap_err().is_decoding());
}

#[test]
fn string_limit() {
    let registry = standard_registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(registry, &namespaces).with_options(DecodingOptions {
        max_string_length: 3,
        ..Default::default()
    });

    let ok = decode_bytes::<UAString>(&[0x03, 0x00, 0x00, 0x00, b'a', b'b', b'c'], &ctx).unwrap();
    assert_eq!(ok.as_ref(), "abc");

    let err = decode_bytes::<UAString>(&[0x04, 0x00, 0x00, 0x00, b'a', b'b', b'c', b'd'], &ctx)
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BadEncodingLimitsExceeded);
}

#[test]
fn byte_string_limit() {
    let registry = standard_registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(registry, &namespaces).with_options(DecodingOptions {
        max_byte_string_length: 1,
        ..Default::default()
    });
    let err = decode_bytes::<ByteString>(&[0x02, 0x00, 0x00, 0x00, 0x01, 0x02], &ctx).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadEncodingLimitsExceeded);
}

#[test]
fn encoding_byte_string() {
    serialize_test(ByteString::null());
    serialize_test(ByteString::from(Vec::<u8>::new()));
    serialize_test(ByteString::from(&[0x1u8, 0x2, 0x3, 0x4]));
    serialize_and_compare(ByteString::from(&[0xaau8]), &[0x01, 0x00, 0x00, 0x00, 0xaa]);
}

#[test]
fn encoding_guid() {
    let guid = Guid::from_str("72962B91-FA75-4ae6-8D28-B404DC7DAF63").unwrap();
    assert_eq!("72962b91-fa75-4ae6-8d28-b404dc7daf63", format!("{}", guid));
    // The first three groups are little endian on the wire
    serialize_and_compare(
        guid,
        &[
            0x91, 0x2b, 0x96, 0x72, 0x75, 0xfa, 0xe6, 0x4a, 0x8d, 0x28, 0xb4, 0x04, 0xdc, 0x7d,
            0xaf, 0x63,
        ],
    );
    serialize_test(Guid::new());
}

#[test]
fn encoding_qualified_name() {
    serialize_test(QualifiedName::null());
    serialize_test(QualifiedName::new(100, "this is a qualified name"));
    serialize_and_compare(
        QualifiedName::new(2, "x"),
        &[0x02, 0x00, 0x01, 0x00, 0x00, 0x00, b'x'],
    );
}

#[test]
fn encoding_localized_text() {
    serialize_test(LocalizedText::null());
    serialize_test(LocalizedText::new("en-GB", "Hello"));
    // Only the text
    serialize_and_compare(
        LocalizedText {
            locale: UAString::null(),
            text: UAString::from("x"),
        },
        &[0x02, 0x01, 0x00, 0x00, 0x00, b'x'],
    );
}

#[test]
fn encoding_status_code() {
    serialize_and_compare(StatusCode::Good, &[0x00, 0x00, 0x00, 0x00]);
    serialize_and_compare(StatusCode::BadDecodingError, &[0x00, 0x00, 0x07, 0x80]);
    assert!(StatusCode::BadDecodingError.is_bad());
    assert!(StatusCode::UncertainInitialValue.is_uncertain());
    assert!(StatusCode::Good.is_good());
    assert_eq!(StatusCode::BadTypeMismatch.name(), "BadTypeMismatch");
}

#[test]
fn encoding_data_value() {
    serialize_test(DataValue::null());
    serialize_test(DataValue {
        value: Some(Variant::from(100u16)),
        status: Some(StatusCode::BadOutOfRange),
        source_timestamp: DateTime::ymd_hms(2020, 1, 1, 0, 0, 0),
        source_picoseconds: Some(123),
        server_timestamp: DateTime::ymd_hms(2021, 2, 3, 4, 5, 6),
        server_picoseconds: None,
    });

    // Value only
    serialize_and_compare(
        DataValue::value_only(true),
        &[0x01, 0x01, 0x01],
    );
}

#[test]
fn encoding_diagnostic_info() {
    serialize_test(DiagnosticInfo::null());
    serialize_test(DiagnosticInfo {
        symbolic_id: Some(10),
        namespace_uri: Some(20),
        locale: None,
        localized_text: Some(30),
        additional_info: Some(UAString::from("Hello world")),
        inner_status_code: Some(StatusCode::BadDecodingError),
        inner_diagnostic_info: Some(Box::new(DiagnosticInfo {
            symbolic_id: Some(1),
            ..DiagnosticInfo::null()
        })),
    });
}

#[test]
fn array_length_limit() {
    let registry = standard_registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(registry, &namespaces).with_options(DecodingOptions {
        max_array_length: 2,
        ..Default::default()
    });

    let mut stream = Cursor::new(vec![0x02, 0x00, 0x00, 0x00, 0x01, 0x02]);
    let values: Option<Vec<u8>> = read_array(&mut stream, &ctx).unwrap();
    assert_eq!(values, Some(vec![1, 2]));

    // The length is checked before anything is read
    let mut stream = Cursor::new(vec![0x03, 0x00, 0x00, 0x00]);
    let err = read_array::<_, u8>(&mut stream, &ctx).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadEncodingLimitsExceeded);

    // Null array vs empty array
    let mut stream = Cursor::new(vec![0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(read_array::<_, u8>(&mut stream, &ctx).unwrap(), None);
    assert_eq!(read_array::<_, u8>(&mut stream, &ctx).unwrap(), Some(vec![]));

    let values = Some(vec![7u16, 8]);
    let mut stream = Cursor::new(Vec::new());
    let size = write_array(&mut stream, &values, &ctx).unwrap();
    assert_eq!(size, byte_len_array(&values, &ctx));
    assert_eq!(stream.get_ref(), &vec![0x02, 0x00, 0x00, 0x00, 0x07, 0x00, 0x08, 0x00]);
    let mut stream = Cursor::new(Vec::new());
    write_array::<_, u16>(&mut stream, &None, &ctx).unwrap();
    assert_eq!(stream.get_ref(), &vec![0xff, 0xff, 0xff, 0xff]);
}

#[test]
fn truncated_stream() {
    let ctx = ctx();
    let err = decode_bytes::<u32>(&[0x01, 0x02], &ctx).unwrap_err();
    assert!(err.is_decoding());
    let err = decode_bytes::<UAString>(&[0x05, 0x00, 0x00, 0x00, b'a'], &ctx).unwrap_err();
    assert!(err.is_decoding());
}

#[test]
fn depth_gauge() {
    let dg = Arc::new(Mutex::new(DepthGauge::new(2)));
    {
        let _l1 = DepthLock::obtain(dg.clone()).unwrap();
        let _l2 = DepthLock::obtain(dg.clone()).unwrap();
        assert_eq!(dg.lock().current_depth(), 2);
        let err = DepthLock::obtain(dg.clone()).unwrap_err();
        assert_eq!(err.status(), StatusCode::BadEncodingLimitsExceeded);
    }
    // Locks release the depth when they drop
    assert_eq!(dg.lock().current_depth(), 0);
}

#[test]
fn error_paths() {
    let err = EncodingError::decoding("bad")
        .with_field("Value")
        .with_field("[2]")
        .with_field("Elements");
    assert_eq!(err.path(), "Elements[2].Value");
    assert_eq!(err.status(), StatusCode::BadDecodingError);
    assert_eq!(
        err.to_string(),
        "decoding error at Elements[2].Value: bad (BadDecodingError)"
    );

    // Schema and remap errors have no path
    let err = EncodingError::schema("no such type").with_field("Foo");
    assert_eq!(err.path(), "");
    assert_eq!(err.status(), StatusCode::BadConfigurationError);
    assert_eq!(
        StatusCode::from(EncodingError::remap("x")),
        StatusCode::BadNodeIdUnknown
    );
}
