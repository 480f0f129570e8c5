// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use crate::{
    encoding::EncodingResult, node_id::NodeId, node_ids::DataTypeId, struct_codec::StructValue,
};

use super::UaStructure;

/// The range of a value, e.g. the EURange property of an analog item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl UaStructure for Range {
    fn data_type_id() -> NodeId {
        DataTypeId::Range.into()
    }

    fn to_struct_value(&self) -> StructValue {
        StructValue::new(DataTypeId::Range)
            .with("Low", self.low)
            .with("High", self.high)
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(Range {
            low: value.take_scalar("Low")?,
            high: value.take_scalar("High")?,
        })
    }
}

impl Range {
    pub fn new(low: f64, high: f64) -> Range {
        Range { low, high }
    }

    /// Tests if the value lies inside the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// One point of an XY array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XVType {
    pub x: f64,
    pub value: f32,
}

impl UaStructure for XVType {
    fn data_type_id() -> NodeId {
        DataTypeId::XVType.into()
    }

    fn to_struct_value(&self) -> StructValue {
        StructValue::new(DataTypeId::XVType)
            .with("X", self.x)
            .with("Value", self.value)
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(XVType {
            x: value.take_scalar("X")?,
            value: value.take_scalar("Value")?,
        })
    }
}
