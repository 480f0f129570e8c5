// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the definition of `LocalizedText`.

use std::{
    fmt,
    io::{Read, Write},
};

use crate::{encoding::*, string::*};

const HAS_LOCALE: u8 = 0x1;
const HAS_TEXT: u8 = 0x2;

/// A human readable text with an optional locale identifier.
#[derive(PartialEq, Eq, Default, Debug, Clone, Hash)]
pub struct LocalizedText {
    /// The locale. Omitted from stream if null
    pub locale: UAString,
    /// The text in the specified locale. Omitted from stream if null
    pub text: UAString,
}

impl<'a> From<&'a str> for LocalizedText {
    fn from(value: &'a str) -> Self {
        Self {
            locale: UAString::null(),
            text: UAString::from(value),
        }
    }
}

impl From<String> for LocalizedText {
    fn from(value: String) -> Self {
        Self {
            locale: UAString::null(),
            text: UAString::from(value),
        }
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl BinaryEncoder<LocalizedText> for LocalizedText {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        let mut size = 1;
        if !self.locale.is_null() {
            size += self.locale.byte_len(ctx);
        }
        if !self.text.is_null() {
            size += self.text.byte_len(ctx);
        }
        size
    }

    fn encode<S: Write>(&self, stream: &mut S, ctx: &Context<'_>) -> EncodingResult<usize> {
        let mut size = 0;
        size += write_u8(stream, self.encoding_mask())?;
        if !self.locale.is_null() {
            size += self.locale.encode(stream, ctx)?;
        }
        if !self.text.is_null() {
            size += self.text.encode(stream, ctx)?;
        }
        Ok(size)
    }

    fn decode<S: Read>(stream: &mut S, ctx: &Context<'_>) -> EncodingResult<Self> {
        let encoding_mask = read_u8(stream)?;
        let locale = if encoding_mask & HAS_LOCALE != 0 {
            UAString::decode(stream, ctx)?
        } else {
            UAString::null()
        };
        let text = if encoding_mask & HAS_TEXT != 0 {
            UAString::decode(stream, ctx)?
        } else {
            UAString::null()
        };
        Ok(LocalizedText { locale, text })
    }
}

impl LocalizedText {
    pub fn new(locale: &str, text: &str) -> LocalizedText {
        LocalizedText {
            locale: UAString::from(locale),
            text: UAString::from(text),
        }
    }

    pub fn null() -> LocalizedText {
        LocalizedText {
            locale: UAString::null(),
            text: UAString::null(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.locale.is_null() && self.text.is_null()
    }

    // A bit mask that indicates which fields are present in the stream.
    // 0x01    Locale
    // 0x02    Text
    fn encoding_mask(&self) -> u8 {
        let mut encoding_mask: u8 = 0;
        if !self.locale.is_null() {
            encoding_mask |= HAS_LOCALE;
        }
        if !self.text.is_null() {
            encoding_mask |= HAS_TEXT;
        }
        encoding_mask
    }
}
