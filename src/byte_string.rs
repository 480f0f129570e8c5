// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `ByteString`.

use std::io::{Read, Write};

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{
    encoding::{
        array_length, process_decode_io_result, read_i32, write_i32, write_raw, BinaryEncoder,
        Context, EncodingError, EncodingResult,
    },
    status_code::StatusCode,
};

/// A sequence of octets. A null byte string is distinct from an empty one.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub struct ByteString {
    pub value: Option<Vec<u8>>,
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        self.value.as_deref().unwrap_or(&[])
    }
}

impl BinaryEncoder<ByteString> for ByteString {
    fn byte_len(&self, _: &Context<'_>) -> usize {
        // Length plus the actual length of bytes (if not null)
        4 + self.value.as_ref().map(|v| v.len()).unwrap_or(0)
    }

    fn encode<S: Write>(&self, stream: &mut S, _: &Context<'_>) -> EncodingResult<usize> {
        // Byte strings are encoded as the octets preceded by an Int32 length. A -1 indicates null
        match self.value {
            None => write_i32(stream, -1),
            Some(ref value) => {
                let mut size = write_i32(stream, array_length(value.len())?)?;
                size += write_raw(stream, value)?;
                Ok(size)
            }
        }
    }

    fn decode<S: Read>(stream: &mut S, ctx: &Context<'_>) -> EncodingResult<Self> {
        let len = read_i32(stream)?;
        let max_byte_string_length = ctx.options().max_byte_string_length;
        // Null string?
        if len == -1 {
            Ok(ByteString::null())
        } else if len < -1 {
            error!("ByteString buf length is a negative number {}", len);
            Err(EncodingError::decoding(format!(
                "invalid byte string length {}",
                len
            )))
        } else if len as usize > max_byte_string_length {
            error!(
                "ByteString length {} exceeds decoding limit {}",
                len, max_byte_string_length
            );
            Err(EncodingError::decoding_status(
                StatusCode::BadEncodingLimitsExceeded,
                format!(
                    "byte string length {} exceeds limit {}",
                    len, max_byte_string_length
                ),
            ))
        } else {
            // Create a buffer filled with zeroes and read the byte string over the top
            let mut buf: Vec<u8> = vec![0u8; len as usize];
            process_decode_io_result(stream.read_exact(&mut buf))?;
            Ok(ByteString { value: Some(buf) })
        }
    }
}

impl<'a, T> From<&'a T> for ByteString
where
    T: AsRef<[u8]> + ?Sized,
{
    fn from(value: &'a T) -> Self {
        Self::from(value.as_ref().to_vec())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        // Empty bytes will be treated as Some([])
        ByteString { value: Some(value) }
    }
}

impl ByteString {
    /// Create a null string (not the same as an empty string)
    pub fn null() -> ByteString {
        ByteString { value: None }
    }

    /// Test if the string is null
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    // Test if the bytestring has an empty value (not the same as null)
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map(|v| v.is_empty()).unwrap_or(false)
    }

    /// Creates a byte string from a Base64 encoded string
    pub fn from_base64(data: &str) -> Option<ByteString> {
        STANDARD.decode(data.trim()).ok().map(Self::from)
    }

    /// Encodes the bytestring as a Base64 encoded string
    pub fn as_base64(&self) -> String {
        STANDARD.encode(self.as_ref())
    }
}

#[test]
fn bytestring_null() {
    let v = ByteString::null();
    assert!(v.is_null());
    assert!(!v.is_empty());
}

#[test]
fn bytestring_empty() {
    let v = ByteString::from(&[0u8; 0]);
    assert!(!v.is_null());
    assert!(v.is_empty());
    assert_eq!(v.as_base64(), "");
}

#[test]
fn bytestring_base64() {
    let v = ByteString::from(&[1u8, 2, 3, 4]);
    let b64 = v.as_base64();
    assert_eq!(b64, "AQIDBA==");
    assert_eq!(ByteString::from_base64(&b64).unwrap(), v);
    assert!(ByteString::from_base64("***").is_none());
}
