// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `DateTime`.

use std::{
    fmt,
    io::{Read, Write},
    ops::{Add, Sub},
    str::FromStr,
};

use chrono::{Duration, SecondsFormat, Utc};

use crate::encoding::*;

const NANOS_PER_TICK: i64 = 100;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Seconds between 1601-01-01T00:00:00Z and the unix epoch
const EPOCH_OFFSET_SECONDS: i64 = 11_644_473_600;
/// Ticks at 9999-12-31T23:59:59Z, the last instant OPC UA represents. Anything at or after it is
/// encoded as `i64::MAX`.
const MAX_TICKS: i64 = 265_046_774_399 * TICKS_PER_SECOND;

pub type DateTimeUtc = chrono::DateTime<Utc>;

/// A date/time value held as the number of 100 nanosecond ticks since 1601-01-01 UTC.
///
/// The value is always inside the range OPC UA can represent: earlier instants become the epoch
/// (tick 0), later instants become the end of time.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Default)]
pub struct DateTime {
    ticks: i64,
}

/// DateTime encoded as 64-bit signed int
impl BinaryEncoder<DateTime> for DateTime {
    fn byte_len(&self, _: &Context<'_>) -> usize {
        8
    }

    fn encode<S: Write>(&self, stream: &mut S, _: &Context<'_>) -> EncodingResult<usize> {
        write_i64(stream, self.checked_ticks())
    }

    fn decode<S: Read>(stream: &mut S, ctx: &Context<'_>) -> EncodingResult<Self> {
        let date_time = DateTime::from(read_i64(stream)?);
        // Client offset compensates for clock differences between peers
        let client_offset = ctx.options().client_offset;
        if client_offset.is_zero() || date_time.is_null() || date_time.is_endtimes() {
            Ok(date_time)
        } else {
            Ok(date_time - client_offset)
        }
    }
}

impl Add<Duration> for DateTime {
    type Output = Self;

    fn add(self, duration: Duration) -> Self {
        DateTime::from_ticks_clamped(i128::from(self.ticks) + duration_ticks(duration))
    }
}

impl Sub<Duration> for DateTime {
    type Output = Self;

    fn sub(self, duration: Duration) -> Self {
        DateTime::from_ticks_clamped(i128::from(self.ticks) - duration_ticks(duration))
    }
}

impl Sub<DateTime> for DateTime {
    type Output = Duration;

    fn sub(self, other: Self) -> Duration {
        let ticks = self.ticks - other.ticks;
        Duration::seconds(ticks / TICKS_PER_SECOND)
            + Duration::nanoseconds((ticks % TICKS_PER_SECOND) * NANOS_PER_TICK)
    }
}

/// Ticks on the wire. Values before the epoch clamp to the epoch, values from the end of time
/// onwards (including `i64::MAX`) clamp to the end of time.
impl From<i64> for DateTime {
    fn from(value: i64) -> Self {
        DateTime::from_ticks_clamped(i128::from(value))
    }
}

impl From<DateTimeUtc> for DateTime {
    fn from(date_time: DateTimeUtc) -> Self {
        // OPC UA date time is 100ns granular so anything finer is dropped
        let seconds = i128::from(date_time.timestamp()) + i128::from(EPOCH_OFFSET_SECONDS);
        let ticks = seconds * i128::from(TICKS_PER_SECOND)
            + i128::from(date_time.timestamp_subsec_nanos()) / i128::from(NANOS_PER_TICK);
        DateTime::from_ticks_clamped(ticks)
    }
}

impl From<DateTime> for i64 {
    fn from(value: DateTime) -> i64 {
        value.checked_ticks()
    }
}

impl From<DateTime> for DateTimeUtc {
    fn from(value: DateTime) -> DateTimeUtc {
        value.as_chrono()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_iso8601())
    }
}

impl FromStr for DateTime {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        chrono::DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| DateTime::from(dt.with_timezone(&Utc)))
            .map_err(|e| {
                error!("Cannot parse date {}, error = {}", s, e);
            })
    }
}

fn duration_ticks(duration: Duration) -> i128 {
    let seconds = i128::from(duration.num_seconds());
    let remainder = duration - Duration::seconds(duration.num_seconds());
    let nanos = i128::from(remainder.num_nanoseconds().unwrap_or(0));
    seconds * i128::from(TICKS_PER_SECOND) + nanos / i128::from(NANOS_PER_TICK)
}

impl DateTime {
    /// Constructs from the current time
    pub fn now() -> DateTime {
        DateTime::from(Utc::now())
    }

    /// Creates a null date time (i.e. the epoch)
    pub fn null() -> DateTime {
        DateTime::epoch()
    }

    /// Tests if the date time is null (i.e. equal to epoch)
    pub fn is_null(&self) -> bool {
        self.ticks == 0
    }

    /// Constructs a date time for the epoch, 1601-01-01T00:00:00Z
    pub fn epoch() -> DateTime {
        DateTime { ticks: 0 }
    }

    /// Constructs a date time for the endtimes, 9999-12-31T23:59:59Z
    pub fn endtimes() -> DateTime {
        DateTime { ticks: MAX_TICKS }
    }

    /// Tests if the date time is the end of time
    pub fn is_endtimes(&self) -> bool {
        self.ticks == MAX_TICKS
    }

    /// Returns the maximum tick value, corresponding to the end of time
    pub fn endtimes_ticks() -> i64 {
        MAX_TICKS
    }

    /// Constructs from a year, month, day, hour, minute, second. Returns `None` for an invalid
    /// date.
    pub fn ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<DateTime> {
        Self::ymd_hms_nano(year, month, day, hour, minute, second, 0)
    }

    /// Constructs from a year, month, day, hour, minute, second, nanosecond. Returns `None` for
    /// an invalid date.
    pub fn ymd_hms_nano(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nanos: u32,
    ) -> Option<DateTime> {
        chrono::NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_nano_opt(hour, minute, second, nanos))
            .map(|dt| DateTime::from(dt.and_utc()))
    }

    /// Returns the time in ticks, of 100 nanosecond intervals
    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Returns the ticks as written on the wire, i.e. `i64::MAX` for the end of time
    pub fn checked_ticks(&self) -> i64 {
        if self.ticks >= MAX_TICKS {
            i64::MAX
        } else {
            self.ticks
        }
    }

    /// Time as chrono
    pub fn as_chrono(&self) -> DateTimeUtc {
        let seconds = self.ticks / TICKS_PER_SECOND - EPOCH_OFFSET_SECONDS;
        let nanos = (self.ticks % TICKS_PER_SECOND) * NANOS_PER_TICK;
        DateTimeUtc::from(std::time::UNIX_EPOCH) + Duration::seconds(seconds) + Duration::nanoseconds(nanos)
    }

    /// Formats the date time as an ISO 8601 / RFC 3339 UTC string
    pub fn to_iso8601(&self) -> String {
        self.as_chrono()
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    fn from_ticks_clamped(ticks: i128) -> DateTime {
        let ticks = if ticks < 0 {
            0
        } else if ticks >= i128::from(MAX_TICKS) {
            MAX_TICKS
        } else {
            ticks as i64
        };
        DateTime { ticks }
    }
}
