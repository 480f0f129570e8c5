// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use crate::{
    encoding::EncodingResult,
    node_id::NodeId,
    node_ids::DataTypeId,
    qualified_name::QualifiedName,
    struct_codec::{struct_element, FieldValue, StructValue},
};

use super::UaStructure;

/// The HierarchicalReferences reference type, the default reference of a browse path.
pub const HIERARCHICAL_REFERENCES: u32 = 33;

/// One step of a relative path.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativePathElement {
    pub reference_type_id: NodeId,
    pub is_inverse: bool,
    pub include_subtypes: bool,
    pub target_name: QualifiedName,
}

impl UaStructure for RelativePathElement {
    fn data_type_id() -> NodeId {
        DataTypeId::RelativePathElement.into()
    }

    fn to_struct_value(&self) -> StructValue {
        StructValue::new(DataTypeId::RelativePathElement)
            .with("ReferenceTypeId", self.reference_type_id.clone())
            .with("IsInverse", self.is_inverse)
            .with("IncludeSubtypes", self.include_subtypes)
            .with("TargetName", self.target_name.clone())
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(RelativePathElement {
            reference_type_id: value.take_scalar("ReferenceTypeId")?,
            is_inverse: value.take_scalar("IsInverse")?,
            include_subtypes: value.take_scalar("IncludeSubtypes")?,
            target_name: value.take_scalar("TargetName")?,
        })
    }
}

impl RelativePathElement {
    /// Follows any hierarchical reference forward to the target.
    pub fn hierarchical<T: Into<QualifiedName>>(target_name: T) -> RelativePathElement {
        RelativePathElement {
            reference_type_id: NodeId::new(0, HIERARCHICAL_REFERENCES),
            is_inverse: false,
            include_subtypes: true,
            target_name: target_name.into(),
        }
    }
}

/// A sequence of references and browse names to follow from a starting node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelativePath {
    pub elements: Option<Vec<RelativePathElement>>,
}

impl UaStructure for RelativePath {
    fn data_type_id() -> NodeId {
        DataTypeId::RelativePath.into()
    }

    fn to_struct_value(&self) -> StructValue {
        let elements = FieldValue::Array(self.elements.as_ref().map(|elements| {
            elements
                .iter()
                .map(|e| FieldValue::from(e.to_struct_value()))
                .collect()
        }));
        StructValue::new(DataTypeId::RelativePath).with("Elements", elements)
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(RelativePath {
            elements: value.take_array("Elements", |v| {
                RelativePathElement::from_struct_value(struct_element(v)?)
            })?,
        })
    }
}

impl<'a> From<&'a [QualifiedName]> for RelativePath {
    /// A path of hierarchical references through each of the browse names.
    fn from(browse_names: &'a [QualifiedName]) -> Self {
        RelativePath {
            elements: Some(
                browse_names
                    .iter()
                    .map(|n| RelativePathElement::hierarchical(n.clone()))
                    .collect(),
            ),
        }
    }
}
