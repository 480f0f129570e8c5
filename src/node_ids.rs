// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Well known namespace 0 identifiers used by the codec and the standard type table.

use std::convert::TryFrom;

/// Data type node ids.
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum DataTypeId {
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
    Structure = 22,
    DataValue = 23,
    BaseDataType = 24,
    DiagnosticInfo = 25,
    Number = 26,
    Integer = 27,
    UInteger = 28,
    Enumeration = 29,
    AccessRestrictionType = 95,
    IntegerId = 288,
    Counter = 289,
    Duration = 290,
    NumericRange = 291,
    UtcTime = 294,
    LocaleId = 295,
    Argument = 296,
    RelativePathElement = 537,
    RelativePath = 540,
    FilterOperator = 576,
    ContentFilterElement = 583,
    ContentFilter = 586,
    FilterOperand = 589,
    ElementOperand = 592,
    LiteralOperand = 595,
    AttributeOperand = 598,
    SimpleAttributeOperand = 601,
    Range = 884,
    EUInformation = 887,
    XVType = 12080,
    AccessLevelType = 15031,
    EventNotifierType = 15033,
    AccessLevelExType = 15406,
}

/// Object node ids, here the encoding nodes of the standard structures.
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum ObjectId {
    Argument_Encoding_DefaultXml = 297,
    Argument_Encoding_DefaultBinary = 298,
    RelativePathElement_Encoding_DefaultXml = 538,
    RelativePathElement_Encoding_DefaultBinary = 539,
    RelativePath_Encoding_DefaultXml = 541,
    RelativePath_Encoding_DefaultBinary = 542,
    ContentFilterElement_Encoding_DefaultXml = 584,
    ContentFilterElement_Encoding_DefaultBinary = 585,
    ContentFilter_Encoding_DefaultXml = 587,
    ContentFilter_Encoding_DefaultBinary = 588,
    ElementOperand_Encoding_DefaultXml = 593,
    ElementOperand_Encoding_DefaultBinary = 594,
    LiteralOperand_Encoding_DefaultXml = 596,
    LiteralOperand_Encoding_DefaultBinary = 597,
    AttributeOperand_Encoding_DefaultXml = 599,
    AttributeOperand_Encoding_DefaultBinary = 600,
    SimpleAttributeOperand_Encoding_DefaultXml = 602,
    SimpleAttributeOperand_Encoding_DefaultBinary = 603,
    Range_Encoding_DefaultXml = 885,
    Range_Encoding_DefaultBinary = 886,
    EUInformation_Encoding_DefaultXml = 888,
    EUInformation_Encoding_DefaultBinary = 889,
    XVType_Encoding_DefaultXml = 12082,
    XVType_Encoding_DefaultBinary = 12090,
    Argument_Encoding_DefaultJson = 15081,
    RelativePathElement_Encoding_DefaultJson = 15188,
    RelativePath_Encoding_DefaultJson = 15189,
    ContentFilterElement_Encoding_DefaultJson = 15204,
    ContentFilter_Encoding_DefaultJson = 15205,
    ElementOperand_Encoding_DefaultJson = 15207,
    LiteralOperand_Encoding_DefaultJson = 15208,
    AttributeOperand_Encoding_DefaultJson = 15209,
    SimpleAttributeOperand_Encoding_DefaultJson = 15210,
    Range_Encoding_DefaultJson = 15375,
    EUInformation_Encoding_DefaultJson = 15376,
    XVType_Encoding_DefaultJson = 15380,
}

macro_rules! try_from_u32 {
    ($t: ident, [$($v: ident),* $(,)?]) => {
        impl TryFrom<u32> for $t {
            type Error = ();
            fn try_from(value: u32) -> Result<Self, Self::Error> {
                $(
                    if value == $t::$v as u32 {
                        return Ok($t::$v);
                    }
                )*
                Err(())
            }
        }
    };
}

try_from_u32!(
    DataTypeId,
    [
        Boolean,
        SByte,
        Byte,
        Int16,
        UInt16,
        Int32,
        UInt32,
        Int64,
        UInt64,
        Float,
        Double,
        String,
        DateTime,
        Guid,
        ByteString,
        XmlElement,
        NodeId,
        ExpandedNodeId,
        StatusCode,
        QualifiedName,
        LocalizedText,
        Structure,
        DataValue,
        BaseDataType,
        DiagnosticInfo,
        Number,
        Integer,
        UInteger,
        Enumeration,
        AccessRestrictionType,
        IntegerId,
        Counter,
        Duration,
        NumericRange,
        UtcTime,
        LocaleId,
        Argument,
        RelativePathElement,
        RelativePath,
        FilterOperator,
        ContentFilterElement,
        ContentFilter,
        FilterOperand,
        ElementOperand,
        LiteralOperand,
        AttributeOperand,
        SimpleAttributeOperand,
        Range,
        EUInformation,
        XVType,
        AccessLevelType,
        EventNotifierType,
        AccessLevelExType,
    ]
);

try_from_u32!(
    ObjectId,
    [
        Argument_Encoding_DefaultXml,
        Argument_Encoding_DefaultBinary,
        RelativePathElement_Encoding_DefaultXml,
        RelativePathElement_Encoding_DefaultBinary,
        RelativePath_Encoding_DefaultXml,
        RelativePath_Encoding_DefaultBinary,
        ContentFilterElement_Encoding_DefaultXml,
        ContentFilterElement_Encoding_DefaultBinary,
        ContentFilter_Encoding_DefaultXml,
        ContentFilter_Encoding_DefaultBinary,
        ElementOperand_Encoding_DefaultXml,
        ElementOperand_Encoding_DefaultBinary,
        LiteralOperand_Encoding_DefaultXml,
        LiteralOperand_Encoding_DefaultBinary,
        AttributeOperand_Encoding_DefaultXml,
        AttributeOperand_Encoding_DefaultBinary,
        SimpleAttributeOperand_Encoding_DefaultXml,
        SimpleAttributeOperand_Encoding_DefaultBinary,
        Range_Encoding_DefaultXml,
        Range_Encoding_DefaultBinary,
        EUInformation_Encoding_DefaultXml,
        EUInformation_Encoding_DefaultBinary,
        XVType_Encoding_DefaultXml,
        XVType_Encoding_DefaultBinary,
        Argument_Encoding_DefaultJson,
        RelativePathElement_Encoding_DefaultJson,
        RelativePath_Encoding_DefaultJson,
        ContentFilterElement_Encoding_DefaultJson,
        ContentFilter_Encoding_DefaultJson,
        ElementOperand_Encoding_DefaultJson,
        LiteralOperand_Encoding_DefaultJson,
        AttributeOperand_Encoding_DefaultJson,
        SimpleAttributeOperand_Encoding_DefaultJson,
        Range_Encoding_DefaultJson,
        EUInformation_Encoding_DefaultJson,
        XVType_Encoding_DefaultJson,
    ]
);
