// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use crate::{
    encoding::EncodingResult,
    localized_text::LocalizedText,
    node_id::NodeId,
    node_ids::DataTypeId,
    string::UAString,
    struct_codec::{scalar_element, FieldValue, StructValue},
};

use super::UaStructure;

/// Describes an input or output argument of a method.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: UAString,
    pub data_type: NodeId,
    pub value_rank: i32,
    pub array_dimensions: Option<Vec<u32>>,
    pub description: LocalizedText,
}

impl UaStructure for Argument {
    fn data_type_id() -> NodeId {
        DataTypeId::Argument.into()
    }

    fn to_struct_value(&self) -> StructValue {
        let array_dimensions = FieldValue::Array(
            self.array_dimensions
                .as_ref()
                .map(|d| d.iter().map(|v| FieldValue::from(*v)).collect()),
        );
        StructValue::new(DataTypeId::Argument)
            .with("Name", self.name.clone())
            .with("DataType", self.data_type.clone())
            .with("ValueRank", self.value_rank)
            .with("ArrayDimensions", array_dimensions)
            .with("Description", self.description.clone())
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        let argument = Argument {
            name: value.take_scalar("Name")?,
            data_type: value.take_scalar("DataType")?,
            value_rank: value.take_scalar("ValueRank")?,
            array_dimensions: value.take_array("ArrayDimensions", scalar_element::<u32>)?,
            description: value.take_scalar("Description")?,
        };
        if let Some(ref array_dimensions) = argument.array_dimensions {
            // Mismatched dimensions are logged, not rejected
            if argument.value_rank > 0 && argument.value_rank as usize != array_dimensions.len() {
                warn!(
                    "Argument {} has {} array dimensions for value rank {}",
                    argument.name,
                    array_dimensions.len(),
                    argument.value_rank
                );
            }
        }
        Ok(argument)
    }
}

impl From<(&str, DataTypeId)> for Argument {
    fn from(v: (&str, DataTypeId)) -> Self {
        Argument {
            name: UAString::from(v.0),
            data_type: v.1.into(),
            value_rank: -1,
            array_dimensions: None,
            description: LocalizedText::new("", ""),
        }
    }
}
