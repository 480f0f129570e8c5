// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::convert::TryFrom;

use crate::{
    encoding::{EncodingError, EncodingResult},
    node_id::{Identifier, NodeId},
    node_ids::DataTypeId,
};

/// The builtin kind of a value without its payload. The discriminant of each kind is the type
/// code used in a variant's encoding mask and the numeric id of its data type in namespace 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariantTypeId {
    // Null / Empty
    Empty = 0,
    // Scalar types
    Boolean = 1,
    SByte = 2,
    Byte = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
    Int64 = 8,
    UInt64 = 9,
    Float = 10,
    Double = 11,
    String = 12,
    DateTime = 13,
    Guid = 14,
    ByteString = 15,
    XmlElement = 16,
    NodeId = 17,
    ExpandedNodeId = 18,
    StatusCode = 19,
    QualifiedName = 20,
    LocalizedText = 21,
    ExtensionObject = 22,
    DataValue = 23,
    Variant = 24,
    DiagnosticInfo = 25,
}

const ALL_KINDS: [VariantTypeId; 26] = [
    VariantTypeId::Empty,
    VariantTypeId::Boolean,
    VariantTypeId::SByte,
    VariantTypeId::Byte,
    VariantTypeId::Int16,
    VariantTypeId::UInt16,
    VariantTypeId::Int32,
    VariantTypeId::UInt32,
    VariantTypeId::Int64,
    VariantTypeId::UInt64,
    VariantTypeId::Float,
    VariantTypeId::Double,
    VariantTypeId::String,
    VariantTypeId::DateTime,
    VariantTypeId::Guid,
    VariantTypeId::ByteString,
    VariantTypeId::XmlElement,
    VariantTypeId::NodeId,
    VariantTypeId::ExpandedNodeId,
    VariantTypeId::StatusCode,
    VariantTypeId::QualifiedName,
    VariantTypeId::LocalizedText,
    VariantTypeId::ExtensionObject,
    VariantTypeId::DataValue,
    VariantTypeId::Variant,
    VariantTypeId::DiagnosticInfo,
];

impl TryFrom<&NodeId> for VariantTypeId {
    type Error = ();

    /// Maps a builtin data type id, or one of the abstract parents that stand for a builtin
    /// kind, onto the kind.
    fn try_from(value: &NodeId) -> Result<Self, Self::Error> {
        if value.namespace != 0 {
            return Err(());
        }
        if let Identifier::Numeric(type_id) = value.identifier {
            match DataTypeId::try_from(type_id)? {
                DataTypeId::BaseDataType
                | DataTypeId::Number
                | DataTypeId::Integer
                | DataTypeId::UInteger => Ok(VariantTypeId::Variant),
                DataTypeId::Structure => Ok(VariantTypeId::ExtensionObject),
                DataTypeId::Enumeration => Ok(VariantTypeId::Int32),
                _ if (1..=25).contains(&type_id) => VariantTypeId::from_code(type_id as u8),
                _ => Err(()),
            }
        } else {
            Err(())
        }
    }
}

impl VariantTypeId {
    /// The type code of the kind as it appears in the low 6 bits of a variant encoding mask.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    fn from_code(code: u8) -> Result<Self, ()> {
        ALL_KINDS.get(code as usize).copied().ok_or(())
    }

    /// Returns the kind named in the low 6 bits of a variant encoding mask.
    pub fn from_encoding_mask(encoding_mask: u8) -> EncodingResult<Self> {
        let code = encoding_mask & !EncodingMask::ARRAY_MASK;
        Self::from_code(code).map_err(|_| {
            error!("Unrecognized encoding mask {:#04x}", encoding_mask);
            EncodingError::decoding(format!("unrecognized variant type code {}", code))
        })
    }

    /// The data type node id of the kind.
    pub fn data_type_id(&self) -> NodeId {
        match self {
            VariantTypeId::Empty => NodeId::null(),
            VariantTypeId::Variant => DataTypeId::BaseDataType.into(),
            _ => NodeId::new(0, u32::from(self.code())),
        }
    }

    /// The name of the kind, used as the element name of the kind in XML.
    pub fn name(&self) -> &'static str {
        match self {
            VariantTypeId::Empty => "Null",
            VariantTypeId::Boolean => "Boolean",
            VariantTypeId::SByte => "SByte",
            VariantTypeId::Byte => "Byte",
            VariantTypeId::Int16 => "Int16",
            VariantTypeId::UInt16 => "UInt16",
            VariantTypeId::Int32 => "Int32",
            VariantTypeId::UInt32 => "UInt32",
            VariantTypeId::Int64 => "Int64",
            VariantTypeId::UInt64 => "UInt64",
            VariantTypeId::Float => "Float",
            VariantTypeId::Double => "Double",
            VariantTypeId::String => "String",
            VariantTypeId::DateTime => "DateTime",
            VariantTypeId::Guid => "Guid",
            VariantTypeId::ByteString => "ByteString",
            VariantTypeId::XmlElement => "XmlElement",
            VariantTypeId::NodeId => "NodeId",
            VariantTypeId::ExpandedNodeId => "ExpandedNodeId",
            VariantTypeId::StatusCode => "StatusCode",
            VariantTypeId::QualifiedName => "QualifiedName",
            VariantTypeId::LocalizedText => "LocalizedText",
            VariantTypeId::ExtensionObject => "ExtensionObject",
            VariantTypeId::DataValue => "DataValue",
            VariantTypeId::Variant => "Variant",
            VariantTypeId::DiagnosticInfo => "DiagnosticInfo",
        }
    }

    /// Finds a kind by its XML element name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_KINDS.iter().copied().find(|k| k.name() == name)
    }

    /// Tests and returns true if the kind is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            VariantTypeId::SByte
                | VariantTypeId::Byte
                | VariantTypeId::Int16
                | VariantTypeId::UInt16
                | VariantTypeId::Int32
                | VariantTypeId::UInt32
                | VariantTypeId::Int64
                | VariantTypeId::UInt64
                | VariantTypeId::Float
                | VariantTypeId::Double
        )
    }
}

/// Bits of the variant encoding byte above the type code. Bit 7 flags array values and bit 6
/// flags array dimensions, which follow the elements on the wire.
pub(crate) struct EncodingMask;

impl EncodingMask {
    /// Bit indicates an array with dimensions
    pub const ARRAY_DIMENSIONS_BIT: u8 = 1 << 6;
    /// Bit indicates an array with values
    pub const ARRAY_VALUES_BIT: u8 = 1 << 7;

    pub const ARRAY_MASK: u8 = EncodingMask::ARRAY_DIMENSIONS_BIT | EncodingMask::ARRAY_VALUES_BIT;
}
