// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `Variant`.

use std::{
    convert::TryFrom,
    fmt,
    io::{self, Read, Write},
};

use crate::{
    array::*,
    byte_string::ByteString,
    data_value::DataValue,
    date_time::DateTime,
    diagnostic_info::DiagnosticInfo,
    encoding::*,
    expanded_node_id::ExpandedNodeId,
    extension_object::ExtensionObject,
    guid::Guid,
    localized_text::LocalizedText,
    node_id::NodeId,
    qualified_name::QualifiedName,
    status_code::StatusCode,
    string::{UAString, XmlElement},
    variant_type_id::{EncodingMask, VariantTypeId},
};

/// A `Variant` holds built-in OPC UA data types, including single and multi dimensional arrays,
/// data values and extension objects.
///
/// As variants may be passed around a lot on the stack, Boxes are used for more complex types to
/// keep the size of this type down a bit, especially when used in arrays.
///
/// A scalar `Variant::Variant` is representable but is never encoded, a variant may only hold
/// another variant as an element of an array of `Variant`.
#[derive(PartialEq, Debug, Clone, Default)]
pub enum Variant {
    /// Empty type has no value. It is equivalent to a Null value (part 6 5.1.6)
    #[default]
    Empty,
    /// Boolean
    Boolean(bool),
    /// Signed byte
    SByte(i8),
    /// Unsigned byte
    Byte(u8),
    /// Signed 16-bit int
    Int16(i16),
    /// Unsigned 16-bit int
    UInt16(u16),
    /// Signed 32-bit int
    Int32(i32),
    /// Unsigned 32-bit int
    UInt32(u32),
    /// Signed 64-bit int
    Int64(i64),
    /// Unsigned 64-bit int
    UInt64(u64),
    /// Float
    Float(f32),
    /// Double
    Double(f64),
    /// String
    String(UAString),
    /// DateTime
    DateTime(Box<DateTime>),
    /// Guid
    Guid(Box<Guid>),
    /// StatusCode
    StatusCode(StatusCode),
    /// ByteString
    ByteString(ByteString),
    /// XmlElement
    XmlElement(XmlElement),
    /// QualifiedName
    QualifiedName(Box<QualifiedName>),
    /// LocalizedText
    LocalizedText(Box<LocalizedText>),
    /// NodeId
    NodeId(Box<NodeId>),
    /// ExpandedNodeId
    ExpandedNodeId(Box<ExpandedNodeId>),
    /// ExtensionObject
    ExtensionObject(Box<ExtensionObject>),
    /// Variant, only valid as an element of an array of Variant
    Variant(Box<Variant>),
    /// DataValue
    DataValue(Box<DataValue>),
    /// DiagnosticInfo
    DiagnosticInfo(Box<DiagnosticInfo>),
    /// Single dimension array which can contain any scalar type, all the same type. Nested
    /// arrays will be rejected.
    /// To represent matrices or nested arrays, set the `array_dimensions` attribute of the array.
    Array(Box<Array>),
}

impl From<()> for Variant {
    fn from(_: ()) -> Self {
        Variant::Empty
    }
}

impl<'a> From<&'a str> for Variant {
    fn from(v: &'a str) -> Self {
        Variant::String(UAString::from(v))
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::String(UAString::from(v))
    }
}

impl From<Array> for Variant {
    fn from(v: Array) -> Self {
        Variant::Array(Box::new(v))
    }
}

macro_rules! variant_from_impl {
    ($rtype: ty, $vtype: ident) => {
        impl From<$rtype> for Variant {
            fn from(v: $rtype) -> Self {
                Variant::$vtype(v)
            }
        }
    };
    ($rtype: ty, $vtype: ident, boxed) => {
        impl From<$rtype> for Variant {
            fn from(v: $rtype) -> Self {
                Variant::$vtype(Box::new(v))
            }
        }
    };
}

variant_from_impl!(bool, Boolean);
variant_from_impl!(i8, SByte);
variant_from_impl!(u8, Byte);
variant_from_impl!(i16, Int16);
variant_from_impl!(u16, UInt16);
variant_from_impl!(i32, Int32);
variant_from_impl!(u32, UInt32);
variant_from_impl!(i64, Int64);
variant_from_impl!(u64, UInt64);
variant_from_impl!(f32, Float);
variant_from_impl!(f64, Double);
variant_from_impl!(UAString, String);
variant_from_impl!(StatusCode, StatusCode);
variant_from_impl!(ByteString, ByteString);
variant_from_impl!(DateTime, DateTime, boxed);
variant_from_impl!(Guid, Guid, boxed);
variant_from_impl!(QualifiedName, QualifiedName, boxed);
variant_from_impl!(LocalizedText, LocalizedText, boxed);
variant_from_impl!(NodeId, NodeId, boxed);
variant_from_impl!(ExpandedNodeId, ExpandedNodeId, boxed);
variant_from_impl!(ExtensionObject, ExtensionObject, boxed);
variant_from_impl!(DataValue, DataValue, boxed);
variant_from_impl!(DiagnosticInfo, DiagnosticInfo, boxed);

macro_rules! from_array_to_variant_impl {
    ($vtype: ident, $rtype: ty) => {
        impl From<Vec<$rtype>> for Variant {
            fn from(v: Vec<$rtype>) -> Self {
                Variant::from(v.as_slice())
            }
        }

        impl<'a> From<&'a [$rtype]> for Variant {
            fn from(v: &'a [$rtype]) -> Self {
                let values: Vec<Variant> = v.iter().map(|v| Variant::from(v.clone())).collect();
                Variant::from(Array {
                    value_type: VariantTypeId::$vtype,
                    values: Some(values),
                    dimensions: Vec::new(),
                })
            }
        }
    };
}

from_array_to_variant_impl!(String, String);
from_array_to_variant_impl!(Boolean, bool);
from_array_to_variant_impl!(SByte, i8);
from_array_to_variant_impl!(Int16, i16);
from_array_to_variant_impl!(UInt16, u16);
from_array_to_variant_impl!(Int32, i32);
from_array_to_variant_impl!(UInt32, u32);
from_array_to_variant_impl!(Int64, i64);
from_array_to_variant_impl!(UInt64, u64);
from_array_to_variant_impl!(Float, f32);
from_array_to_variant_impl!(Double, f64);

/// Extracts a scalar of the matching kind from a variant, handing the variant back when it holds
/// something else.
macro_rules! try_from_variant_impl {
    ($rtype: ty, $($vtype: ident)|+) => {
        impl TryFrom<Variant> for $rtype {
            type Error = Variant;

            fn try_from(value: Variant) -> Result<Self, Self::Error> {
                match value {
                    $(Variant::$vtype(v) => Ok(v),)+
                    other => Err(other),
                }
            }
        }
    };
    ($rtype: ty, $vtype: ident, boxed) => {
        impl TryFrom<Variant> for $rtype {
            type Error = Variant;

            fn try_from(value: Variant) -> Result<Self, Self::Error> {
                match value {
                    Variant::$vtype(v) => Ok(*v),
                    other => Err(other),
                }
            }
        }
    };
}

try_from_variant_impl!(bool, Boolean);
try_from_variant_impl!(i8, SByte);
try_from_variant_impl!(u8, Byte);
try_from_variant_impl!(i16, Int16);
try_from_variant_impl!(u16, UInt16);
try_from_variant_impl!(i32, Int32);
try_from_variant_impl!(u32, UInt32);
try_from_variant_impl!(i64, Int64);
try_from_variant_impl!(u64, UInt64);
try_from_variant_impl!(f32, Float);
try_from_variant_impl!(f64, Double);
try_from_variant_impl!(UAString, String | XmlElement);
try_from_variant_impl!(StatusCode, StatusCode);
try_from_variant_impl!(ByteString, ByteString);
try_from_variant_impl!(DateTime, DateTime, boxed);
try_from_variant_impl!(Guid, Guid, boxed);
try_from_variant_impl!(QualifiedName, QualifiedName, boxed);
try_from_variant_impl!(LocalizedText, LocalizedText, boxed);
try_from_variant_impl!(NodeId, NodeId, boxed);
try_from_variant_impl!(ExpandedNodeId, ExpandedNodeId, boxed);
try_from_variant_impl!(ExtensionObject, ExtensionObject, boxed);
try_from_variant_impl!(DataValue, DataValue, boxed);
try_from_variant_impl!(DiagnosticInfo, DiagnosticInfo, boxed);

impl BinaryEncoder<Variant> for Variant {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        // Encoding mask
        let mut size: usize = 1;

        // Value itself
        size += match self {
            Variant::Array(array) => {
                // Array length
                let mut size = 4;
                // Size of each value
                size += array
                    .values()
                    .iter()
                    .map(|v| Variant::byte_len_variant_value(v, ctx))
                    .sum::<usize>();
                if array.has_dimensions() {
                    // Dimensions (size + num elements)
                    size += 4 + array.dimensions.len() * 4;
                }
                size
            }
            value => Variant::byte_len_variant_value(value, ctx),
        };
        size
    }

    fn encode<S: Write>(&self, stream: &mut S, ctx: &Context<'_>) -> EncodingResult<usize> {
        let mut size: usize = 0;

        match self {
            Variant::Variant(_) => {
                error!("Variant contains a nested variant outside of an array");
                return Err(EncodingError::encoding(
                    "a variant cannot directly contain another variant",
                ));
            }
            Variant::Array(array) => array.validate()?,
            _ => {}
        }

        // Encoding mask will include the array bits if applicable for the type
        size += write_u8(stream, self.encoding_mask())?;

        size += match self {
            Variant::Array(array) => {
                let mut size = match array.values {
                    Some(ref values) => write_i32(stream, array_length(values.len())?)?,
                    None => write_i32(stream, -1)?,
                };
                for (i, value) in array.values().iter().enumerate() {
                    size += Variant::encode_variant_value(stream, value, ctx)
                        .map_err(|e| e.with_field(&format!("[{}]", i)))?;
                }
                if array.has_dimensions() {
                    // Note array dimensions are encoded as Int32 even though they are presented
                    // as UInt32 through attribute.
                    size += write_i32(stream, array_length(array.dimensions.len())?)?;
                    for dimension in &array.dimensions {
                        size += write_i32(stream, *dimension as i32)?;
                    }
                }
                size
            }
            value => Variant::encode_variant_value(stream, value, ctx)?,
        };
        Ok(size)
    }

    fn decode<S: Read>(stream: &mut S, ctx: &Context<'_>) -> EncodingResult<Self> {
        let encoding_mask = read_u8(stream)?;
        let value_type_id = VariantTypeId::from_encoding_mask(encoding_mask)?;

        // IMPORTANT NOTE: Arrays are checked here before they are constructed, this is
        // potentially malicious data.

        if encoding_mask & EncodingMask::ARRAY_VALUES_BIT == 0 {
            if encoding_mask & EncodingMask::ARRAY_DIMENSIONS_BIT != 0 {
                error!("Array dimensions bit specified without any values");
                return Err(EncodingError::decoding(
                    "array dimensions without array values",
                ));
            }
            if value_type_id == VariantTypeId::Variant {
                error!("Variant contains a nested variant outside of an array");
                return Err(EncodingError::decoding(
                    "a variant cannot directly contain another variant",
                ));
            }
            // Read a single variant
            return Variant::decode_variant_value(stream, value_type_id, ctx);
        }

        if value_type_id == VariantTypeId::Empty {
            error!("Array of variant has no element type");
            return Err(EncodingError::decoding("array has no element type"));
        }

        // null array of type
        let array_length = match read_array_length(stream, ctx)? {
            None => {
                if encoding_mask & EncodingMask::ARRAY_DIMENSIONS_BIT != 0 {
                    error!("Null array has array dimensions");
                    return Err(EncodingError::decoding("null array with array dimensions"));
                }
                return Ok(Variant::from(Array::null(value_type_id)));
            }
            Some(array_length) => array_length,
        };

        let mut values: Vec<Variant> = Vec::with_capacity(array_length);
        for i in 0..array_length {
            let value = Variant::decode_variant_value(stream, value_type_id, ctx)
                .map_err(|e| e.with_field(&format!("[{}]", i)))?;
            values.push(value);
        }

        let dimensions = if encoding_mask & EncodingMask::ARRAY_DIMENSIONS_BIT != 0 {
            let dimensions: Vec<i32> = read_array(stream, ctx)?.ok_or_else(|| {
                error!("No array dimensions despite the bit flag being set");
                EncodingError::decoding("array dimensions flag set with a null dimensions array")
            })?;
            if dimensions.iter().any(|d| *d <= 0) {
                error!("Invalid array dimensions {:?}", dimensions);
                return Err(EncodingError::decoding(format!(
                    "invalid array dimensions {:?}",
                    dimensions
                )));
            }
            let dimensions: Vec<u32> = dimensions.into_iter().map(|d| d as u32).collect();
            // This looks clunky but it's to prevent a panic from malicious data causing an
            // overflow panic
            match dimensions_length(&dimensions) {
                Some(length) if length == array_length => dimensions,
                _ => {
                    error!(
                        "Array dimensions {:?} do not match array length {}",
                        dimensions, array_length
                    );
                    return Err(EncodingError::decoding(format!(
                        "array dimensions {:?} do not match array length {}",
                        dimensions, array_length
                    )));
                }
            }
        } else {
            Vec::new()
        };

        Ok(Variant::from(Array {
            value_type: value_type_id,
            values: Some(values),
            dimensions,
        }))
    }
}

/// This implementation is mainly for debugging / convenience purposes, to eliminate some of the
/// noise in common types from using the Debug trait.
impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Variant::SByte(v) => write!(f, "{}", v),
            Variant::Byte(v) => write!(f, "{}", v),
            Variant::Int16(v) => write!(f, "{}", v),
            Variant::UInt16(v) => write!(f, "{}", v),
            Variant::Int32(v) => write!(f, "{}", v),
            Variant::UInt32(v) => write!(f, "{}", v),
            Variant::Int64(v) => write!(f, "{}", v),
            Variant::UInt64(v) => write!(f, "{}", v),
            Variant::Float(v) => write!(f, "{}", v),
            Variant::Double(v) => write!(f, "{}", v),
            Variant::Boolean(v) => write!(f, "{}", v),
            Variant::String(ref v) => write!(f, "{}", v),
            Variant::Guid(ref v) => write!(f, "{}", v),
            Variant::DateTime(ref v) => write!(f, "{}", v),
            Variant::NodeId(ref v) => write!(f, "{}", v),
            Variant::ExpandedNodeId(ref v) => write!(f, "{}", v),
            Variant::Variant(ref v) => write!(f, "Variant({})", v),
            value => write!(f, "{:?}", value),
        }
    }
}

impl Variant {
    /// Returns the length of just the value, not the encoding flag
    pub(crate) fn byte_len_variant_value(value: &Variant, ctx: &Context<'_>) -> usize {
        match value {
            Variant::Empty => 0,
            Variant::Boolean(value) => value.byte_len(ctx),
            Variant::SByte(value) => value.byte_len(ctx),
            Variant::Byte(value) => value.byte_len(ctx),
            Variant::Int16(value) => value.byte_len(ctx),
            Variant::UInt16(value) => value.byte_len(ctx),
            Variant::Int32(value) => value.byte_len(ctx),
            Variant::UInt32(value) => value.byte_len(ctx),
            Variant::Int64(value) => value.byte_len(ctx),
            Variant::UInt64(value) => value.byte_len(ctx),
            Variant::Float(value) => value.byte_len(ctx),
            Variant::Double(value) => value.byte_len(ctx),
            Variant::String(value) => value.byte_len(ctx),
            Variant::DateTime(value) => value.byte_len(ctx),
            Variant::Guid(value) => value.byte_len(ctx),
            Variant::ByteString(value) => value.byte_len(ctx),
            Variant::XmlElement(value) => value.byte_len(ctx),
            Variant::NodeId(value) => value.byte_len(ctx),
            Variant::ExpandedNodeId(value) => value.byte_len(ctx),
            Variant::StatusCode(value) => value.byte_len(ctx),
            Variant::QualifiedName(value) => value.byte_len(ctx),
            Variant::LocalizedText(value) => value.byte_len(ctx),
            Variant::ExtensionObject(value) => value.byte_len(ctx),
            Variant::Variant(value) => value.byte_len(ctx),
            Variant::DataValue(value) => value.byte_len(ctx),
            Variant::DiagnosticInfo(value) => value.byte_len(ctx),
            Variant::Array(_) => {
                let mut counter = CountingSink::default();
                // Nested arrays are rejected by encode, so the length is only an estimate
                let _ = Variant::encode_variant_value(&mut counter, value, ctx);
                counter.count
            }
        }
    }

    /// Encodes just the value, not the encoding flag. An element of an array of `Variant` is
    /// written as a complete variant with its own encoding mask.
    pub(crate) fn encode_variant_value<S: Write>(
        stream: &mut S,
        value: &Variant,
        ctx: &Context<'_>,
    ) -> EncodingResult<usize> {
        match value {
            Variant::Empty => Ok(0),
            Variant::Boolean(value) => value.encode(stream, ctx),
            Variant::SByte(value) => value.encode(stream, ctx),
            Variant::Byte(value) => value.encode(stream, ctx),
            Variant::Int16(value) => value.encode(stream, ctx),
            Variant::UInt16(value) => value.encode(stream, ctx),
            Variant::Int32(value) => value.encode(stream, ctx),
            Variant::UInt32(value) => value.encode(stream, ctx),
            Variant::Int64(value) => value.encode(stream, ctx),
            Variant::UInt64(value) => value.encode(stream, ctx),
            Variant::Float(value) => value.encode(stream, ctx),
            Variant::Double(value) => value.encode(stream, ctx),
            Variant::String(value) => value.encode(stream, ctx),
            Variant::DateTime(value) => value.encode(stream, ctx),
            Variant::Guid(value) => value.encode(stream, ctx),
            Variant::ByteString(value) => value.encode(stream, ctx),
            Variant::XmlElement(value) => value.encode(stream, ctx),
            Variant::NodeId(value) => value.encode(stream, ctx),
            Variant::ExpandedNodeId(value) => value.encode(stream, ctx),
            Variant::StatusCode(value) => value.encode(stream, ctx),
            Variant::QualifiedName(value) => value.encode(stream, ctx),
            Variant::LocalizedText(value) => value.encode(stream, ctx),
            Variant::ExtensionObject(value) => value.encode(stream, ctx),
            Variant::Variant(value) => value.encode(stream, ctx),
            Variant::DataValue(value) => value.encode(stream, ctx),
            Variant::DiagnosticInfo(value) => value.encode(stream, ctx),
            Variant::Array(_) => {
                warn!("Cannot encode a nested array");
                Err(EncodingError::encoding_status(
                    StatusCode::BadTypeMismatch,
                    "nested arrays cannot be encoded",
                ))
            }
        }
    }

    /// Reads just the value of the kind from the stream
    pub(crate) fn decode_variant_value<S: Read>(
        stream: &mut S,
        value_type: VariantTypeId,
        ctx: &Context<'_>,
    ) -> EncodingResult<Self> {
        let result = match value_type {
            VariantTypeId::Empty => Variant::Empty,
            VariantTypeId::Boolean => Self::from(bool::decode(stream, ctx)?),
            VariantTypeId::SByte => Self::from(i8::decode(stream, ctx)?),
            VariantTypeId::Byte => Self::from(u8::decode(stream, ctx)?),
            VariantTypeId::Int16 => Self::from(i16::decode(stream, ctx)?),
            VariantTypeId::UInt16 => Self::from(u16::decode(stream, ctx)?),
            VariantTypeId::Int32 => Self::from(i32::decode(stream, ctx)?),
            VariantTypeId::UInt32 => Self::from(u32::decode(stream, ctx)?),
            VariantTypeId::Int64 => Self::from(i64::decode(stream, ctx)?),
            VariantTypeId::UInt64 => Self::from(u64::decode(stream, ctx)?),
            VariantTypeId::Float => Self::from(f32::decode(stream, ctx)?),
            VariantTypeId::Double => Self::from(f64::decode(stream, ctx)?),
            VariantTypeId::String => Self::from(UAString::decode(stream, ctx)?),
            VariantTypeId::DateTime => Self::from(DateTime::decode(stream, ctx)?),
            VariantTypeId::Guid => Self::from(Guid::decode(stream, ctx)?),
            VariantTypeId::ByteString => Self::from(ByteString::decode(stream, ctx)?),
            // Force the type to be XmlElement since its typedef'd to UAString
            VariantTypeId::XmlElement => Variant::XmlElement(XmlElement::decode(stream, ctx)?),
            VariantTypeId::NodeId => Self::from(NodeId::decode(stream, ctx)?),
            VariantTypeId::ExpandedNodeId => Self::from(ExpandedNodeId::decode(stream, ctx)?),
            VariantTypeId::StatusCode => Self::from(StatusCode::decode(stream, ctx)?),
            VariantTypeId::QualifiedName => Self::from(QualifiedName::decode(stream, ctx)?),
            VariantTypeId::LocalizedText => Self::from(LocalizedText::decode(stream, ctx)?),
            // Extension object internally does depth checking to prevent deep recursion
            VariantTypeId::ExtensionObject => Self::from(ExtensionObject::decode(stream, ctx)?),
            VariantTypeId::Variant => {
                // Nested variant is depth checked to prevent deep recursion
                let _depth_lock = ctx.depth_lock()?;
                Variant::Variant(Box::new(Variant::decode(stream, ctx)?))
            }
            VariantTypeId::DataValue => {
                let _depth_lock = ctx.depth_lock()?;
                Self::from(DataValue::decode(stream, ctx)?)
            }
            VariantTypeId::DiagnosticInfo => Self::from(DiagnosticInfo::decode(stream, ctx)?),
        };
        Ok(result)
    }

    /// Returns the type of the value held by the variant. An array reports `Empty`, use
    /// `array_type_id` for the kind of its elements.
    pub fn type_id(&self) -> VariantTypeId {
        match self {
            Variant::Empty | Variant::Array(_) => VariantTypeId::Empty,
            Variant::Boolean(_) => VariantTypeId::Boolean,
            Variant::SByte(_) => VariantTypeId::SByte,
            Variant::Byte(_) => VariantTypeId::Byte,
            Variant::Int16(_) => VariantTypeId::Int16,
            Variant::UInt16(_) => VariantTypeId::UInt16,
            Variant::Int32(_) => VariantTypeId::Int32,
            Variant::UInt32(_) => VariantTypeId::UInt32,
            Variant::Int64(_) => VariantTypeId::Int64,
            Variant::UInt64(_) => VariantTypeId::UInt64,
            Variant::Float(_) => VariantTypeId::Float,
            Variant::Double(_) => VariantTypeId::Double,
            Variant::String(_) => VariantTypeId::String,
            Variant::DateTime(_) => VariantTypeId::DateTime,
            Variant::Guid(_) => VariantTypeId::Guid,
            Variant::ByteString(_) => VariantTypeId::ByteString,
            Variant::XmlElement(_) => VariantTypeId::XmlElement,
            Variant::NodeId(_) => VariantTypeId::NodeId,
            Variant::ExpandedNodeId(_) => VariantTypeId::ExpandedNodeId,
            Variant::StatusCode(_) => VariantTypeId::StatusCode,
            Variant::QualifiedName(_) => VariantTypeId::QualifiedName,
            Variant::LocalizedText(_) => VariantTypeId::LocalizedText,
            Variant::ExtensionObject(_) => VariantTypeId::ExtensionObject,
            Variant::Variant(_) => VariantTypeId::Variant,
            Variant::DataValue(_) => VariantTypeId::DataValue,
            Variant::DiagnosticInfo(_) => VariantTypeId::DiagnosticInfo,
        }
    }

    /// Returns the element kind of an array variant.
    pub fn array_type_id(&self) -> Option<VariantTypeId> {
        match self {
            Variant::Array(array) => Some(array.value_type),
            _ => None,
        }
    }

    /// Test if the variant holds a numeric type
    pub fn is_numeric(&self) -> bool {
        self.type_id().is_numeric()
    }

    /// Test if the variant holds an array
    pub fn is_array(&self) -> bool {
        matches!(self, Variant::Array(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    /// Returns the default value of a kind, i.e. what a missing value of that kind decodes to.
    pub fn default_of(value_type: VariantTypeId) -> Variant {
        match value_type {
            VariantTypeId::Empty | VariantTypeId::Variant => Variant::Empty,
            VariantTypeId::Boolean => Variant::Boolean(false),
            VariantTypeId::SByte => Variant::SByte(0),
            VariantTypeId::Byte => Variant::Byte(0),
            VariantTypeId::Int16 => Variant::Int16(0),
            VariantTypeId::UInt16 => Variant::UInt16(0),
            VariantTypeId::Int32 => Variant::Int32(0),
            VariantTypeId::UInt32 => Variant::UInt32(0),
            VariantTypeId::Int64 => Variant::Int64(0),
            VariantTypeId::UInt64 => Variant::UInt64(0),
            VariantTypeId::Float => Variant::Float(0.0),
            VariantTypeId::Double => Variant::Double(0.0),
            VariantTypeId::String => Variant::String(UAString::null()),
            VariantTypeId::DateTime => Variant::from(DateTime::null()),
            VariantTypeId::Guid => Variant::from(Guid::null()),
            VariantTypeId::ByteString => Variant::ByteString(ByteString::null()),
            VariantTypeId::XmlElement => Variant::XmlElement(XmlElement::null()),
            VariantTypeId::NodeId => Variant::from(NodeId::null()),
            VariantTypeId::ExpandedNodeId => Variant::from(ExpandedNodeId::null()),
            VariantTypeId::StatusCode => Variant::StatusCode(StatusCode::Good),
            VariantTypeId::QualifiedName => Variant::from(QualifiedName::null()),
            VariantTypeId::LocalizedText => Variant::from(LocalizedText::null()),
            VariantTypeId::ExtensionObject => Variant::from(ExtensionObject::null()),
            VariantTypeId::DataValue => Variant::from(DataValue::null()),
            VariantTypeId::DiagnosticInfo => Variant::from(DiagnosticInfo::null()),
        }
    }

    pub(crate) fn encoding_mask(&self) -> u8 {
        match self {
            Variant::Array(array) => array.encoding_mask(),
            value => value.type_id().code(),
        }
    }
}

/// A writer that discards its input and counts the bytes.
#[derive(Default)]
pub(crate) struct CountingSink {
    pub count: usize,
}

impl Write for CountingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.count += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
