// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::str::FromStr;

use chrono::Duration;

use crate::{tests::*, *};

#[test]
fn date_time_epoch() {
    let epoch = DateTime::epoch();
    assert!(epoch.is_null());
    assert_eq!(epoch.ticks(), 0);
    assert_eq!(epoch.to_iso8601(), "1601-01-01T00:00:00Z");
    serialize_and_compare(epoch, &[0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn date_time_unix_epoch() {
    let dt = DateTime::ymd_hms(1970, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(dt.ticks(), 116_444_736_000_000_000);
    assert_eq!(dt.to_iso8601(), "1970-01-01T00:00:00Z");
}

#[test]
fn date_time_clamping() {
    // Anything before 1601 is the epoch
    assert!(DateTime::from(-1).is_null());
    assert!(DateTime::from(i64::MIN).is_null());
    // The end of time is written as i64::MAX
    let endtimes = DateTime::endtimes();
    assert_eq!(endtimes.to_iso8601(), "9999-12-31T23:59:59Z");
    assert_eq!(endtimes.checked_ticks(), i64::MAX);
    assert_eq!(DateTime::from(i64::MAX), endtimes);
    assert_eq!(DateTime::from(DateTime::endtimes_ticks() + 1), endtimes);
    serialize_and_compare(
        endtimes,
        &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f],
    );

    // Arithmetic saturates at both ends
    assert!((DateTime::epoch() - Duration::days(1)).is_null());
    assert!((endtimes + Duration::days(1)).is_endtimes());
}

#[test]
fn date_time_invalid() {
    assert!(DateTime::ymd_hms(2020, 2, 30, 0, 0, 0).is_none());
    assert!(DateTime::ymd_hms(2020, 1, 1, 24, 0, 0).is_none());
    assert!(DateTime::from_str("not a date").is_err());
}

#[test]
fn date_time_iso8601() {
    let dt = DateTime::ymd_hms_nano(2021, 3, 4, 5, 6, 7, 123_400_000).unwrap();
    assert_eq!(dt.to_iso8601(), "2021-03-04T05:06:07.123400Z");
    assert_eq!(DateTime::from_str("2021-03-04T05:06:07.1234Z").unwrap(), dt);
    // Offsets are converted to UTC
    assert_eq!(
        DateTime::from_str("2021-03-04T06:06:07.1234+01:00").unwrap(),
        dt
    );
}

#[test]
fn date_time_sub_tick_precision() {
    // Anything finer than 100ns is dropped
    let a = DateTime::ymd_hms_nano(2000, 1, 1, 0, 0, 0, 199).unwrap();
    let b = DateTime::ymd_hms_nano(2000, 1, 1, 0, 0, 0, 100).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        DateTime::ymd_hms_nano(2000, 1, 1, 0, 0, 0, 250).unwrap() - a,
        Duration::nanoseconds(100)
    );
}

#[test]
fn date_time_arithmetic() {
    let dt = DateTime::ymd_hms(2020, 6, 1, 12, 0, 0).unwrap();
    let later = dt + Duration::seconds(90);
    assert_eq!(later, DateTime::ymd_hms(2020, 6, 1, 12, 1, 30).unwrap());
    assert_eq!(later - dt, Duration::seconds(90));
    assert_eq!(later - Duration::seconds(90), dt);
}

#[test]
fn date_time_client_offset() {
    let registry = standard_registry();
    let namespaces = NamespaceTable::new();
    let ctx = Context::new(registry, &namespaces).with_options(DecodingOptions {
        client_offset: Duration::seconds(10),
        ..Default::default()
    });

    let dt = DateTime::ymd_hms(2020, 6, 1, 12, 0, 10).unwrap();
    let bytes = dt.encode_to_vec(&ctx).unwrap();
    let decoded = decode_bytes::<DateTime>(&bytes, &ctx).unwrap();
    assert_eq!(decoded, DateTime::ymd_hms(2020, 6, 1, 12, 0, 0).unwrap());

    // Null and the end of time are not adjusted
    let bytes = DateTime::null().encode_to_vec(&ctx).unwrap();
    assert!(decode_bytes::<DateTime>(&bytes, &ctx).unwrap().is_null());
    let bytes = DateTime::endtimes().encode_to_vec(&ctx).unwrap();
    assert!(decode_bytes::<DateTime>(&bytes, &ctx).unwrap().is_endtimes());
}
