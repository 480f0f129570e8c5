// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `DataValue`.

use std::io::{Read, Write};

use crate::{date_time::*, encoding::*, status_code::StatusCode, variant::Variant};

bitflags! {
    pub struct DataValueFlags: u8 {
        /// False if the Value is Null.
        const HAS_VALUE = 0x1;
        /// False if the StatusCode is Good.
        const HAS_STATUS = 0x2;
        /// False if the Source Timestamp is DateTime.MinValue.
        const HAS_SOURCE_TIMESTAMP = 0x4;
        /// False if the Server Timestamp is DateTime.MinValue.
        const HAS_SERVER_TIMESTAMP = 0x8;
        /// False if the Source Picoseconds is 0.
        const HAS_SOURCE_PICOSECONDS = 0x10;
        /// False if the Server Picoseconds is 0.
        const HAS_SERVER_PICOSECONDS = 0x20;
    }
}

/// A data value is a value of a variable together with its status and change timestamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValue {
    /// The value. Not present if the Value bit in the EncodingMask is False.
    pub value: Option<Variant>,
    /// The status associated with the value.
    pub status: Option<StatusCode>,
    /// The source timestamp associated with the value.
    pub source_timestamp: Option<DateTime>,
    /// The number of 10 picosecond intervals for the SourceTimestamp.
    /// If the source timestamp is missing the picoseconds are ignored.
    pub source_picoseconds: Option<u16>,
    /// The Server timestamp associated with the value.
    pub server_timestamp: Option<DateTime>,
    /// The number of 10 picosecond intervals for the ServerTimestamp.
    /// If the Server timestamp is missing the picoseconds are ignored.
    pub server_picoseconds: Option<u16>,
}

impl BinaryEncoder<DataValue> for DataValue {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        let mut size = 1;
        if let Some(ref value) = self.value {
            size += value.byte_len(ctx);
        }
        if self.status.is_some() {
            size += 4;
        }
        if self.source_timestamp.is_some() {
            size += 8;
            if self.source_picoseconds.is_some() {
                size += 2;
            }
        }
        if self.server_timestamp.is_some() {
            size += 8;
            if self.server_picoseconds.is_some() {
                size += 2;
            }
        }
        size
    }

    fn encode<S: Write>(&self, stream: &mut S, ctx: &Context<'_>) -> EncodingResult<usize> {
        let mut size = 0;
        size += write_u8(stream, self.encoding_mask().bits())?;
        if let Some(ref value) = self.value {
            size += value.encode(stream, ctx).map_err(|e| e.with_field("Value"))?;
        }
        if let Some(ref status) = self.status {
            size += status.encode(stream, ctx)?;
        }
        if let Some(ref source_timestamp) = self.source_timestamp {
            size += source_timestamp.encode(stream, ctx)?;
            if let Some(source_picoseconds) = self.source_picoseconds {
                size += write_u16(stream, source_picoseconds)?;
            }
        }
        if let Some(ref server_timestamp) = self.server_timestamp {
            size += server_timestamp.encode(stream, ctx)?;
            if let Some(server_picoseconds) = self.server_picoseconds {
                size += write_u16(stream, server_picoseconds)?;
            }
        }
        Ok(size)
    }

    fn decode<S: Read>(stream: &mut S, ctx: &Context<'_>) -> EncodingResult<Self> {
        let encoding_mask = DataValueFlags::from_bits_truncate(read_u8(stream)?);

        // Value
        let value = if encoding_mask.contains(DataValueFlags::HAS_VALUE) {
            Some(Variant::decode(stream, ctx).map_err(|e| e.with_field("Value"))?)
        } else {
            None
        };
        // Status
        let status = if encoding_mask.contains(DataValueFlags::HAS_STATUS) {
            Some(StatusCode::decode(stream, ctx)?)
        } else {
            None
        };
        // Source timestamp
        let source_timestamp = if encoding_mask.contains(DataValueFlags::HAS_SOURCE_TIMESTAMP) {
            // The source timestamp should never be adjusted, not even when ignoring clock skew
            let options = DecodingOptions {
                client_offset: chrono::Duration::zero(),
                ..ctx.options().clone()
            };
            let ctx = ctx.clone().with_options(options);
            Some(DateTime::decode(stream, &ctx)?)
        } else {
            None
        };
        let source_picoseconds = if encoding_mask.contains(DataValueFlags::HAS_SOURCE_PICOSECONDS)
        {
            Some(read_u16(stream)?)
        } else {
            None
        };
        // Server timestamp
        let server_timestamp = if encoding_mask.contains(DataValueFlags::HAS_SERVER_TIMESTAMP) {
            Some(DateTime::decode(stream, ctx)?)
        } else {
            None
        };
        let server_picoseconds = if encoding_mask.contains(DataValueFlags::HAS_SERVER_PICOSECONDS)
        {
            Some(read_u16(stream)?)
        } else {
            None
        };

        // Pico second values are discarded if associated timestamp is not supplied
        Ok(DataValue {
            value,
            status,
            source_picoseconds: source_timestamp.and(source_picoseconds),
            source_timestamp,
            server_picoseconds: server_timestamp.and(server_picoseconds),
            server_timestamp,
        })
    }
}

impl DataValue {
    /// Creates a data value holding only a value.
    pub fn value_only<V>(value: V) -> DataValue
    where
        V: Into<Variant>,
    {
        DataValue {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Creates a data value holding a value and a server timestamp of now.
    pub fn new_now<V>(value: V) -> DataValue
    where
        V: Into<Variant>,
    {
        DataValue {
            value: Some(value.into()),
            status: Some(StatusCode::Good),
            server_timestamp: Some(DateTime::now()),
            ..Default::default()
        }
    }

    /// Creates an empty DataValue
    pub fn null() -> DataValue {
        DataValue::default()
    }

    pub fn is_null(&self) -> bool {
        self.encoding_mask().is_empty()
    }

    /// Returns the status code or Good if there is no code on the value
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::Good)
    }

    pub fn encoding_mask(&self) -> DataValueFlags {
        let mut encoding_mask = DataValueFlags::empty();
        if self.value.is_some() {
            encoding_mask |= DataValueFlags::HAS_VALUE;
        }
        if self.status.is_some() {
            encoding_mask |= DataValueFlags::HAS_STATUS;
        }
        if self.source_timestamp.is_some() {
            encoding_mask |= DataValueFlags::HAS_SOURCE_TIMESTAMP;
            if self.source_picoseconds.is_some() {
                encoding_mask |= DataValueFlags::HAS_SOURCE_PICOSECONDS;
            }
        }
        if self.server_timestamp.is_some() {
            encoding_mask |= DataValueFlags::HAS_SERVER_TIMESTAMP;
            if self.server_picoseconds.is_some() {
                encoding_mask |= DataValueFlags::HAS_SERVER_PICOSECONDS;
            }
        }
        encoding_mask
    }
}
