// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use crate::{constants, tests::*, *};

#[test]
fn new_table_holds_ns0() {
    let table = NamespaceTable::new();
    assert_eq!(table.len(), 1);
    assert_eq!(table.uri(0), Some(constants::OPC_UA_NAMESPACE_URI));
    assert_eq!(table.index_of(constants::OPC_UA_NAMESPACE_URI), Some(0));
    assert_eq!(table.uri(1), None);
}

#[test]
fn add_uris() {
    let mut table = NamespaceTable::with_uris(["urn:a", "urn:b"]).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.index_of("urn:b"), Some(2));
    assert_eq!(table.add("urn:c").unwrap(), 3);
    // An existing uri keeps its index
    assert_eq!(table.add("urn:a").unwrap(), 1);
    assert_eq!(table.len(), 4);
    assert_eq!(table.uris()[3], "urn:c");
    assert_eq!(table.index_of("urn:z"), None);
}

#[test]
fn translate_between_tables() {
    let server = NamespaceTable::with_uris(["urn:a", "urn:b"]).unwrap();
    let client = NamespaceTable::with_uris(["urn:b", "urn:c", "urn:a"]).unwrap();

    assert_eq!(NamespaceTable::translate(0, &server, &client).unwrap(), 0);
    assert_eq!(NamespaceTable::translate(1, &server, &client).unwrap(), 3);
    assert_eq!(NamespaceTable::translate(2, &server, &client).unwrap(), 1);

    // Unknown index in the source
    let err = NamespaceTable::translate(5, &server, &client).unwrap_err();
    assert!(err.is_remap());
    assert_eq!(err.status(), StatusCode::BadNodeIdUnknown);
    // Uri missing from the target
    let err = NamespaceTable::translate(2, &client, &server).unwrap_err();
    assert!(err.is_remap());
}
