// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the `StatusCode` type with the status values the codec reports.

use std::{
    fmt,
    fmt::Formatter,
    io::{Read, Write},
};

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::encoding::*;

bitflags! {
    /// A 32-bit OPC UA status code. The top 16 bits hold the status value, the low 16 bits hold
    /// flags describing the value it is attached to.
    pub struct StatusCode: u32 {
        const STATUS_MASK = 0xffff_0000;
        const BIT_MASK = 0x0000_ffff;

        const IS_ERROR = 0x8000_0000;
        const IS_UNCERTAIN = 0x4000_0000;

        #[allow(non_upper_case_globals)]
        const Good = 0;
        #[allow(non_upper_case_globals)]
        const BadUnexpectedError = 0x8001_0000;
        #[allow(non_upper_case_globals)]
        const BadInternalError = 0x8002_0000;
        #[allow(non_upper_case_globals)]
        const BadEncodingError = 0x8006_0000;
        #[allow(non_upper_case_globals)]
        const BadDecodingError = 0x8007_0000;
        #[allow(non_upper_case_globals)]
        const BadEncodingLimitsExceeded = 0x8008_0000;
        #[allow(non_upper_case_globals)]
        const BadDataTypeIdUnknown = 0x8011_0000;
        #[allow(non_upper_case_globals)]
        const BadNodeIdInvalid = 0x8033_0000;
        #[allow(non_upper_case_globals)]
        const BadNodeIdUnknown = 0x8034_0000;
        #[allow(non_upper_case_globals)]
        const BadOutOfRange = 0x803C_0000;
        #[allow(non_upper_case_globals)]
        const BadFilterOperandInvalid = 0x8049_0000;
        #[allow(non_upper_case_globals)]
        const BadTypeMismatch = 0x8074_0000;
        #[allow(non_upper_case_globals)]
        const BadConfigurationError = 0x8089_0000;
        #[allow(non_upper_case_globals)]
        const UncertainInitialValue = 0x4092_0000;
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        // Displays the StatusCode as it's name, or its name+bitflags
        let bits = self.bitflags();
        if bits.is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{}+{:#06x}", self.name(), bits.bits())
        }
    }
}

impl BinaryEncoder<StatusCode> for StatusCode {
    fn byte_len(&self, _: &Context<'_>) -> usize {
        4
    }

    fn encode<S: Write>(&self, stream: &mut S, _: &Context<'_>) -> EncodingResult<usize> {
        write_u32(stream, self.bits())
    }

    fn decode<S: Read>(stream: &mut S, _: &Context<'_>) -> EncodingResult<Self> {
        Ok(StatusCode::from_bits_truncate(read_u32(stream)?))
    }
}

impl StatusCode {
    /// Returns the bit flags of the status code, i.e. it masks out the actual status code value
    pub fn bitflags(&self) -> StatusCode {
        *self & StatusCode::BIT_MASK
    }

    /// Returns the status only, i.e. it masks out any bit flags that come with the status code
    pub fn status(&self) -> StatusCode {
        *self & StatusCode::STATUS_MASK
    }

    /// Tests if the status code is bad
    pub fn is_bad(&self) -> bool {
        self.contains(StatusCode::IS_ERROR)
    }

    /// Tests if the status code is uncertain
    pub fn is_uncertain(&self) -> bool {
        self.contains(StatusCode::IS_UNCERTAIN)
    }

    /// Tests if the status code is good (i.e. not bad or uncertain)
    pub fn is_good(&self) -> bool {
        !self.is_bad() && !self.is_uncertain()
    }

    /// Returns the symbolic name of the status value, ignoring any flag bits.
    pub fn name(&self) -> &'static str {
        match self.status() {
            StatusCode::Good => "Good",
            StatusCode::BadUnexpectedError => "BadUnexpectedError",
            StatusCode::BadInternalError => "BadInternalError",
            StatusCode::BadEncodingError => "BadEncodingError",
            StatusCode::BadDecodingError => "BadDecodingError",
            StatusCode::BadEncodingLimitsExceeded => "BadEncodingLimitsExceeded",
            StatusCode::BadDataTypeIdUnknown => "BadDataTypeIdUnknown",
            StatusCode::BadNodeIdInvalid => "BadNodeIdInvalid",
            StatusCode::BadNodeIdUnknown => "BadNodeIdUnknown",
            StatusCode::BadOutOfRange => "BadOutOfRange",
            StatusCode::BadFilterOperandInvalid => "BadFilterOperandInvalid",
            StatusCode::BadTypeMismatch => "BadTypeMismatch",
            StatusCode::BadConfigurationError => "BadConfigurationError",
            StatusCode::UncertainInitialValue => "UncertainInitialValue",
            _ => "Unknown",
        }
    }
}

// Serialize / Deserialize are manually implemented because bitflags! doesn't do it.

impl Serialize for StatusCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

struct StatusCodeVisitor;

impl<'de> Visitor<'de> for StatusCodeVisitor {
    type Value = u32;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an unsigned 32-bit integer")
    }

    fn visit_u32<E>(self, value: u32) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u32::try_from(value).map_err(|_| E::custom("status code out of range"))
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as Deserializer<'de>>::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(StatusCode::from_bits_truncate(
            deserializer.deserialize_u32(StatusCodeVisitor)?,
        ))
    }
}

#[test]
fn status_code() {
    assert!(StatusCode::Good.is_good());
    assert!(!StatusCode::Good.is_bad());
    assert!(!StatusCode::Good.is_uncertain());

    assert!(StatusCode::UncertainInitialValue.is_uncertain());
    assert!(!StatusCode::UncertainInitialValue.is_bad());
    assert!(!StatusCode::UncertainInitialValue.is_good());

    assert!(StatusCode::BadDecodingError.is_bad());
    assert!(!StatusCode::BadDecodingError.is_uncertain());
    assert!(!StatusCode::BadDecodingError.is_good());

    assert_eq!(StatusCode::BadDecodingError.name(), "BadDecodingError");
    assert_eq!(
        (StatusCode::BadDecodingError | StatusCode::from_bits_truncate(0x0400)).name(),
        "BadDecodingError"
    );
}
