// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use crate::{
    encoding::EncodingResult, localized_text::LocalizedText, node_id::NodeId,
    node_ids::DataTypeId, string::UAString, struct_codec::StructValue,
};

use super::UaStructure;

/// The namespace of the UNECE unit codes used as unit ids.
pub const UNECE_NAMESPACE_URI: &str = "http://www.opcfoundation.org/UA/units/un/cefact";

/// Engineering units of a value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EUInformation {
    pub namespace_uri: UAString,
    pub unit_id: i32,
    pub display_name: LocalizedText,
    pub description: LocalizedText,
}

impl UaStructure for EUInformation {
    fn data_type_id() -> NodeId {
        DataTypeId::EUInformation.into()
    }

    fn to_struct_value(&self) -> StructValue {
        StructValue::new(DataTypeId::EUInformation)
            .with("NamespaceUri", self.namespace_uri.clone())
            .with("UnitId", self.unit_id)
            .with("DisplayName", self.display_name.clone())
            .with("Description", self.description.clone())
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(EUInformation {
            namespace_uri: value.take_scalar("NamespaceUri")?,
            unit_id: value.take_scalar("UnitId")?,
            display_name: value.take_scalar("DisplayName")?,
            description: value.take_scalar("Description")?,
        })
    }
}

impl EUInformation {
    /// Creates the information for a UNECE unit, e.g. `"CEL"` for degrees Celsius.
    pub fn unece(common_code: &str, display_name: &str, description: &str) -> EUInformation {
        EUInformation {
            namespace_uri: UNECE_NAMESPACE_URI.into(),
            unit_id: unece_unit_id(common_code),
            display_name: LocalizedText::new("en", display_name),
            description: LocalizedText::new("en", description),
        }
    }
}

/// The unit id of a UNECE common code. Each character of the code, at most three, fills one byte
/// from the high end.
pub fn unece_unit_id(common_code: &str) -> i32 {
    common_code
        .bytes()
        .take(3)
        .fold(0i32, |unit_id, c| (unit_id << 8) | i32::from(c))
}
