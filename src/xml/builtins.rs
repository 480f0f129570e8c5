// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! XML encoding of the primitive and composite builtin types.

use std::str::FromStr;

use super::*;

const XML_MIN_DATE_TIME: &str = "0001-01-01T00:00:00Z";
const XML_MAX_DATE_TIME: &str = "9999-12-31T23:59:59Z";

impl XmlEncoder for bool {
    fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
        node.text = Some(self.to_string());
        Ok(())
    }

    fn decode_xml(node: &XmlNode, _: &Context<'_>) -> EncodingResult<Self> {
        match node.text().trim() {
            "" => Ok(false),
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(unexpected("a boolean", node)),
        }
    }
}

// Integers are decimal text, empty content reads as 0
macro_rules! xml_integer_impl {
    ( $t: ty ) => {
        impl XmlEncoder for $t {
            fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
                node.text = Some(self.to_string());
                Ok(())
            }

            fn decode_xml(node: &XmlNode, _: &Context<'_>) -> EncodingResult<Self> {
                match node.text().trim() {
                    "" => Ok(0),
                    text => text
                        .parse::<$t>()
                        .map_err(|_| unexpected(stringify!($t), node)),
                }
            }
        }
    };
}

xml_integer_impl!(i8);
xml_integer_impl!(u8);
xml_integer_impl!(i16);
xml_integer_impl!(u16);
xml_integer_impl!(i32);
xml_integer_impl!(u32);
xml_integer_impl!(i64);
xml_integer_impl!(u64);

// Floats use the xs:double spelling of the special values
macro_rules! xml_float_impl {
    ( $t: ident ) => {
        impl XmlEncoder for $t {
            fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
                let text = if self.is_nan() {
                    "NaN".to_string()
                } else if self.is_infinite() {
                    let text = if *self > 0.0 { "INF" } else { "-INF" };
                    text.to_string()
                } else {
                    self.to_string()
                };
                node.text = Some(text);
                Ok(())
            }

            fn decode_xml(node: &XmlNode, _: &Context<'_>) -> EncodingResult<Self> {
                match node.text().trim() {
                    "" => Ok(0.0),
                    "NaN" => Ok($t::NAN),
                    "INF" => Ok($t::INFINITY),
                    "-INF" => Ok($t::NEG_INFINITY),
                    text => text
                        .parse::<$t>()
                        .map_err(|_| unexpected(stringify!($t), node)),
                }
            }
        }
    };
}

xml_float_impl!(f32);
xml_float_impl!(f64);

impl XmlEncoder for UAString {
    fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
        match self.value() {
            Some(v) => node.text = Some(v.clone()),
            None => node.set_nil(),
        }
        Ok(())
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        if node.is_nil() {
            return Ok(UAString::null());
        }
        let text = node.text();
        let max_string_length = ctx.options().max_string_length;
        if text.len() > max_string_length {
            warn!(
                "String length {} exceeds decoding limit {}",
                text.len(),
                max_string_length
            );
            Err(EncodingError::decoding_status(
                StatusCode::BadEncodingLimitsExceeded,
                format!(
                    "string length {} exceeds limit {}",
                    text.len(),
                    max_string_length
                ),
            ))
        } else {
            Ok(UAString::from(text))
        }
    }
}

impl XmlEncoder for ByteString {
    fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
        if self.is_null() {
            node.set_nil();
        } else {
            node.text = Some(self.as_base64());
        }
        Ok(())
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        if node.is_nil() {
            return Ok(ByteString::null());
        }
        // Base64 content may be wrapped over several lines
        let text: String = node.text().split_whitespace().collect();
        let value =
            ByteString::from_base64(&text).ok_or_else(|| unexpected("a base64 byte string", node))?;
        let max_byte_string_length = ctx.options().max_byte_string_length;
        if value.as_ref().len() > max_byte_string_length {
            warn!(
                "Byte string length {} exceeds decoding limit {}",
                value.as_ref().len(),
                max_byte_string_length
            );
            Err(EncodingError::decoding_status(
                StatusCode::BadEncodingLimitsExceeded,
                format!(
                    "byte string length {} exceeds limit {}",
                    value.as_ref().len(),
                    max_byte_string_length
                ),
            ))
        } else {
            Ok(value)
        }
    }
}

impl XmlEncoder for Guid {
    fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
        node.add_child(XmlNode::with_text("String", self.to_string()));
        Ok(())
    }

    fn decode_xml(node: &XmlNode, _: &Context<'_>) -> EncodingResult<Self> {
        match node.child("String") {
            None => Ok(Guid::null()),
            Some(child) => {
                Guid::from_str(child.text().trim()).map_err(|_| unexpected("a guid", child))
            }
        }
    }
}

impl XmlEncoder for DateTime {
    fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
        let text = if self.is_null() {
            XML_MIN_DATE_TIME.to_string()
        } else if self.is_endtimes() {
            XML_MAX_DATE_TIME.to_string()
        } else {
            self.to_iso8601()
        };
        node.text = Some(text);
        Ok(())
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        let text = node.text().trim();
        if node.is_nil() || text.is_empty() {
            return Ok(DateTime::null());
        }
        let date_time =
            DateTime::from_str(text).map_err(|_| unexpected("an ISO 8601 date time", node))?;
        let client_offset = ctx.options().client_offset;
        if client_offset.is_zero() || date_time.is_null() || date_time.is_endtimes() {
            Ok(date_time)
        } else {
            Ok(date_time - client_offset)
        }
    }
}

impl XmlEncoder for StatusCode {
    fn encode_xml(&self, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()> {
        encode_child(node, "Code", &self.bits(), ctx)
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        let code: u32 = decode_child(node, "Code", ctx)?;
        Ok(StatusCode::from_bits_truncate(code))
    }
}

impl XmlEncoder for NodeId {
    fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
        node.add_child(XmlNode::with_text("Identifier", self.to_string()));
        Ok(())
    }

    fn decode_xml(node: &XmlNode, _: &Context<'_>) -> EncodingResult<Self> {
        match node.child("Identifier") {
            None => Ok(NodeId::null()),
            Some(child) => NodeId::from_str(child.text().trim())
                .map_err(|_| unexpected("a node id", child).with_field("Identifier")),
        }
    }
}

impl XmlEncoder for ExpandedNodeId {
    fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
        node.add_child(XmlNode::with_text("Identifier", self.to_string()));
        Ok(())
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        let child = match node.child("Identifier") {
            None => return Ok(ExpandedNodeId::null()),
            Some(child) => child,
        };
        let mut value = ExpandedNodeId::from_str(child.text().trim())
            .map_err(|_| unexpected("an expanded node id", child).with_field("Identifier"))?;
        if !value.namespace_uri.is_null() {
            match ctx.namespaces().index_of(value.namespace_uri.as_ref()) {
                Some(index) => value.node_id.namespace = index,
                None => debug!(
                    "Namespace uri {} is not in the namespace table, index left as 0",
                    value.namespace_uri
                ),
            }
        }
        Ok(value)
    }
}

impl XmlEncoder for QualifiedName {
    fn encode_xml(&self, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()> {
        encode_child(node, "NamespaceIndex", &self.namespace_index, ctx)?;
        encode_child(node, "Name", &self.name, ctx)
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        Ok(QualifiedName {
            namespace_index: decode_child(node, "NamespaceIndex", ctx)?,
            name: decode_child(node, "Name", ctx)?,
        })
    }
}

impl XmlEncoder for LocalizedText {
    fn encode_xml(&self, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()> {
        if !self.locale.is_null() {
            encode_child(node, "Locale", &self.locale, ctx)?;
        }
        if !self.text.is_null() {
            encode_child(node, "Text", &self.text, ctx)?;
        }
        Ok(())
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        Ok(LocalizedText {
            locale: decode_child(node, "Locale", ctx)?,
            text: decode_child(node, "Text", ctx)?,
        })
    }
}
