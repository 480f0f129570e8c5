// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::str::FromStr;

use crate::{tests::*, *};

#[test]
fn parse_invalid_node_id() {
    // These are all malformed node ids that should fail parsing
    [
        "",
        "ns=2",
        "i= 0",
        "ns=2;i=0 ",
        " ns=2;i=0 ",
        "ns=99 ;i=35",
        "ns=99;i=x",
        "ns=99;s=",
        "ns=;s=valid str",
        "ns=;g=efa38e40-f232-497a-a534-f205e800d73", // Missing char
        "ns=65537;s=valid str",
    ]
    .iter()
    .for_each(|s| {
        assert_eq!(NodeId::from_str(s), Err(StatusCode::BadNodeIdInvalid), "{}", s);
    });
}

#[test]
fn parse_node_id_integer() {
    let node_id = NodeId::from_str("i=13").unwrap();
    assert_eq!(node_id.namespace, 0);
    assert_eq!(node_id.identifier, Identifier::Numeric(13));
    assert_eq!(format!("{}", node_id), "i=13");

    let node_id = NodeId::from_str("ns=99;i=35").unwrap();
    assert_eq!(node_id.namespace, 99);
    assert_eq!(node_id.identifier, Identifier::Numeric(35));
    assert_eq!(format!("{}", node_id), "ns=99;i=35");
}

#[test]
fn parse_node_id_string() {
    let node_id = NodeId::from_str("ns=1;s=Hello World").unwrap();
    assert_eq!(node_id.namespace, 1);
    assert_eq!(
        node_id.identifier,
        Identifier::String(UAString::from("Hello World"))
    );
    assert_eq!(format!("{}", node_id), "ns=1;s=Hello World");

    let node_id = NodeId::from_str("s=No NS this time").unwrap();
    assert_eq!(node_id.namespace, 0);
    assert_eq!(format!("{}", node_id), "s=No NS this time");
}

#[test]
fn parse_node_id_guid() {
    // Guid (note the mixed case)
    let node_id = NodeId::from_str("g=72962B91-FA75-4ae6-8D28-B404DC7DAF63").unwrap();
    assert_eq!(node_id.namespace, 0);
    assert_eq!(
        node_id.identifier,
        Identifier::Guid(Guid::from_str("72962B91-FA75-4ae6-8D28-B404DC7DAF63").unwrap())
    );
    // All lower case when returned
    assert_eq!(
        format!("{}", node_id),
        "g=72962b91-fa75-4ae6-8d28-b404dc7daf63"
    );
}

#[test]
fn parse_node_id_byte_string() {
    let node_id = NodeId::from_str("ns=1;b=M/RbKBsRVkePCePcx24oRA==").unwrap();
    assert_eq!(node_id.namespace, 1);
    assert_eq!(
        node_id.identifier,
        Identifier::ByteString(ByteString::from_base64("M/RbKBsRVkePCePcx24oRA==").unwrap())
    );
    assert_eq!(format!("{}", node_id), "ns=1;b=M/RbKBsRVkePCePcx24oRA==");
}

#[test]
fn node_id_compact_forms() {
    // Two byte
    serialize_and_compare(NodeId::new(0, 13u32), &[0x00, 0x0d]);
    // Four byte
    serialize_and_compare(NodeId::new(1, 1025u32), &[0x01, 0x01, 0x01, 0x04]);
    // A namespace above 255 needs the full form
    serialize_and_compare(
        NodeId::new(256, 1u32),
        &[0x02, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00],
    );
    // So does an identifier above 65535
    serialize_and_compare(
        NodeId::new(0, 70000u32),
        &[0x02, 0x00, 0x00, 0x70, 0x11, 0x01, 0x00],
    );
    serialize_and_compare(
        NodeId::new(1, "ab"),
        &[0x03, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, b'a', b'b'],
    );
    serialize_test(NodeId::new(5, Guid::new()));
    serialize_test(NodeId::new(5, ByteString::from(&[1u8, 2, 3])));
    serialize_test(NodeId::null());
}

#[test]
fn node_id_invalid_encoding() {
    let ctx = ctx();
    // Unknown form
    assert!(decode_bytes::<NodeId>(&[0x06, 0x00], &ctx).is_err());
    // Expanded node id flags are not allowed on a plain node id
    assert!(decode_bytes::<NodeId>(&[0x80, 0x01], &ctx).is_err());
}

#[test]
fn node_id_well_known() {
    let node_id: NodeId = DataTypeId::Range.into();
    assert_eq!(node_id, NodeId::new(0, 884u32));
    assert_eq!(node_id.as_data_type_id(), Some(DataTypeId::Range));
    assert_eq!(node_id.as_object_id(), None);

    let node_id: NodeId = ObjectId::Range_Encoding_DefaultBinary.into();
    assert_eq!(node_id.as_ns0_numeric(), Some(886));
    assert_eq!(
        node_id.as_object_id(),
        Some(ObjectId::Range_Encoding_DefaultBinary)
    );
    assert_eq!(NodeId::new(1, 884u32).as_data_type_id(), None);
}

#[test]
fn node_id_translate() {
    let from = NamespaceTable::with_uris(["urn:a", "urn:b"]).unwrap();
    let to = NamespaceTable::with_uris(["urn:b", "urn:c", "urn:a"]).unwrap();

    let node_id = NodeId::new(2, "x");
    assert_eq!(node_id.translate(&from, &to).unwrap(), NodeId::new(1, "x"));
    // ns0 is always ns0
    let node_id = NodeId::new(0, 10u32);
    assert_eq!(node_id.translate(&from, &to).unwrap(), node_id);

    // urn:c is not in the source table
    let err = NodeId::new(2, 1u32).translate(&to, &from).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadNodeIdUnknown);
}

#[test]
fn parse_expanded_node_id() {
    // Parse invalid expanded node ids
    [
        "",
        " ns=1;s=Hello World",
        "svr=33;nsu=http://foo;i=10 ",
        "svr=;nsu=foo;s=Hello World",
        "svr=5;nsu=;s=Hello World",
        "svr=5;ns=;s=Hello World",
        "svr=5;ns=5;",
        "svr=5;ns=5;x=",
        "svr=5;ns u=foo;s=Hello World",
        "svr=5;nsu=foo;ns=5;s=Hello World",
        "svr=5;ns=5;nsu=foo;s=Hello World",
    ]
    .iter()
    .for_each(|s| {
        assert!(
            ExpandedNodeId::from_str(s).is_err(),
            "{} is supposed to be invalid expanded node id",
            s
        );
    });

    assert!(ExpandedNodeId::from_str("svr=5;ns=22;s=Hello World").is_ok());
    assert!(ExpandedNodeId::from_str("svr=5;nsu=foo;s=Hello World").is_ok());
    assert!(ExpandedNodeId::from_str("nsu=foo;s=Hello World").is_ok());

    // Test escaping from a string
    let node_id = ExpandedNodeId::from_str("svr=5;nsu=foo%3b%25;i=22").unwrap();
    assert_eq!(node_id.server_index, 5);
    assert_eq!(node_id.namespace_uri.as_ref(), "foo;%");
    assert_eq!(node_id.node_id, NodeId::from_str("i=22").unwrap());

    // Test escaping into a string
    let node_id = ExpandedNodeId {
        node_id: NodeId::from_str("ns=1;s=Hello World").unwrap(),
        namespace_uri: UAString::from("http://foo;blah%"),
        server_index: 33,
    };
    assert_eq!(
        format!("{}", node_id),
        "svr=33;nsu=http://foo%3bblah%25;s=Hello World"
    );

    let node_id = ExpandedNodeId {
        node_id: NodeId::from_str("ns=1;s=Hello World").unwrap(),
        namespace_uri: UAString::null(),
        server_index: 33,
    };
    assert_eq!(format!("{}", node_id), "svr=33;ns=1;s=Hello World");
    assert_eq!(
        ExpandedNodeId::from_str("svr=33;ns=1;s=Hello World").unwrap(),
        node_id
    );
}

#[test]
fn expanded_node_id_binary() {
    // A plain expanded node id is written like a node id
    serialize_and_compare(ExpandedNodeId::from(NodeId::new(0, 13u32)), &[0x00, 0x0d]);

    // Server index only
    serialize_and_compare(
        ExpandedNodeId {
            node_id: NodeId::new(0, 13u32),
            namespace_uri: UAString::null(),
            server_index: 2,
        },
        &[0x40, 0x0d, 0x02, 0x00, 0x00, 0x00],
    );
}

#[test]
fn expanded_node_id_namespace_uri() {
    let registry = standard_registry();
    let namespaces = NamespaceTable::with_uris(["urn:a"]).unwrap();
    let ctx = Context::new(registry, &namespaces);

    let node_id = ExpandedNodeId {
        node_id: NodeId::new(1, 5u32),
        namespace_uri: UAString::from("urn:a"),
        server_index: 0,
    };
    // The index is written as 0 when the uri follows
    let bytes = node_id.encode_to_vec(&ctx).unwrap();
    assert_eq!(
        bytes,
        vec![0x80, 0x05, 0x05, 0x00, 0x00, 0x00, b'u', b'r', b'n', b':', b'a']
    );

    // The uri is resolved against the namespace table on decode
    let decoded = decode_bytes::<ExpandedNodeId>(&bytes, &ctx).unwrap();
    assert_eq!(decoded, node_id);
    assert_eq!(decoded.to_node_id(&namespaces).unwrap(), NodeId::new(1, 5u32));

    // An unknown uri leaves the index as it was on the wire
    let empty = NamespaceTable::new();
    let ctx = Context::new(registry, &empty);
    let decoded = decode_bytes::<ExpandedNodeId>(&bytes, &ctx).unwrap();
    assert_eq!(decoded.node_id.namespace, 0);
    assert_eq!(
        decoded.to_node_id(&empty).unwrap_err().status(),
        StatusCode::BadNodeIdUnknown
    );
}

#[test]
fn expanded_node_id_other_server() {
    let node_id = ExpandedNodeId {
        node_id: NodeId::new(0, 13u32),
        namespace_uri: UAString::null(),
        server_index: 1,
    };
    assert!(node_id.to_node_id(&NamespaceTable::new()).is_err());
}
