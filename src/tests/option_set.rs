// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::collections::BTreeSet;

use serde_json::json;

use crate::{tests::*, *};

#[test]
fn access_level_bits() {
    let set = AccessLevelType::of(&[AccessLevel::CurrentRead, AccessLevel::HistoryWrite]).unwrap();
    assert_eq!(set.bits(), 0b1001);
    assert!(set.current_read());
    assert!(set.history_write());
    assert!(!set.current_write());
    assert_eq!(
        set.to_set(),
        [AccessLevel::CurrentRead, AccessLevel::HistoryWrite]
            .into_iter()
            .collect::<BTreeSet<_>>()
    );
    assert_eq!(set.to_string(), "CurrentRead | HistoryWrite");
    assert_eq!(set.to_variant(), Variant::Byte(9));
    serialize_and_compare(set, &[0x09]);
}

#[test]
fn widths() {
    assert_eq!(AccessLevelType::width(), 8);
    assert_eq!(AccessRestrictionType::width(), 16);
    assert_eq!(AccessLevelExType::width(), 32);
    assert_eq!(EventNotifierType::width(), 8);

    serialize_and_compare(
        AccessRestrictionType::of(&[AccessRestriction::SessionRequired]).unwrap(),
        &[0x04, 0x00],
    );
    serialize_and_compare(
        AccessLevelExType::of(&[AccessLevelEx::NoSubDataTypes]).unwrap(),
        &[0x00, 0x08, 0x00, 0x00],
    );
}

#[test]
fn bits_beyond_width() {
    let err = AccessLevelType::from_bits(0x100).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadOutOfRange);
    let err = AccessLevelType::default().with_bit(8).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadOutOfRange);
    assert!(AccessRestrictionType::from_bits(0xffff).is_ok());
    assert!(AccessRestrictionType::from_bits(0x1_0000).is_err());

    // Bits without a flag are kept but not named
    let set = EventNotifierType::from_bits(0b0110).unwrap();
    assert_eq!(set.bits(), 0b0110);
    assert_eq!(set.to_string(), "HistoryRead");
}

#[test]
fn valid_bits() {
    let set = AccessLevelType::of(&[AccessLevel::CurrentRead])
        .unwrap()
        .with_valid_bits(0b0011)
        .unwrap();
    assert_eq!(set.is_asserted(AccessLevel::CurrentRead), Some(true));
    assert_eq!(set.is_asserted(AccessLevel::CurrentWrite), Some(false));
    assert_eq!(set.is_asserted(AccessLevel::HistoryRead), None);

    // Without valid bits every flag is asserted either way
    let set = AccessLevelType::from_bits(0).unwrap();
    assert_eq!(set.is_asserted(AccessLevel::HistoryRead), Some(false));

    // Valid bits are not part of equality
    let a = AccessLevelType::from_bits(1).unwrap();
    assert_eq!(a, a.with_valid_bits(0xff).unwrap());
    assert!(a.with_valid_bits(0x100).is_err());
}

#[test]
fn variants() {
    let set = AccessLevelExType::from_bits(0x300).unwrap();
    let variant = Variant::from(set);
    assert_eq!(variant, Variant::UInt32(0x300));
    assert_eq!(AccessLevelExType::from_variant(&variant).unwrap(), set);
    assert!(set.nonatomic_read());
    assert!(set.nonatomic_write());

    let err = AccessLevelExType::from_variant(&Variant::Byte(1)).unwrap_err();
    assert_eq!(err.status(), StatusCode::BadTypeMismatch);
}

#[test]
fn json_and_xml() {
    let set = AccessLevelType::of(&[AccessLevel::CurrentWrite, AccessLevel::StatusWrite]).unwrap();
    assert_eq!(json_test(set), json!(34));

    let ctx = ctx();
    assert!(AccessLevelType::decode_json(&json!(256), &ctx).is_err());
    assert!(AccessLevelType::decode_json(&json!(null), &ctx).unwrap().is_empty());

    let node = xml_test(set, "AccessLevel");
    assert_eq!(node.text(), "34");
    assert!(AccessLevelType::decode_xml(&XmlNode::with_text("AccessLevel", "256"), &ctx).is_err());
}
