// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The declarative field schema the struct engine is driven by.

use crate::{node_id::NodeId, variant_type_id::VariantTypeId};

/// Value rank of a scalar field.
pub const VALUE_RANK_SCALAR: i32 = -1;
/// Value rank of a one dimensional array field.
pub const VALUE_RANK_ONE_DIMENSION: i32 = 1;

/// The three wire encodings an encoding id can belong to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EncodingKind {
    Binary,
    Xml,
    Json,
}

/// How the fields of a structure are laid out on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// Every field is always present.
    Structure,
    /// A UInt32 mask precedes the fields, one bit per optional field.
    StructureWithOptionalFields,
    /// A UInt32 switch precedes the single field that is present.
    Union,
}

/// A field of a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub data_type_id: NodeId,
    /// -1 for a scalar, 1 for an array, n >= 2 for a matrix of n dimensions
    pub value_rank: i32,
    pub optional: bool,
}

impl FieldDescriptor {
    /// Creates a scalar field.
    pub fn new<N, T>(name: N, data_type_id: T) -> FieldDescriptor
    where
        N: Into<String>,
        T: Into<NodeId>,
    {
        FieldDescriptor {
            name: name.into(),
            data_type_id: data_type_id.into(),
            value_rank: VALUE_RANK_SCALAR,
            optional: false,
        }
    }

    /// Makes the field a one dimensional array.
    pub fn array(self) -> Self {
        self.value_rank(VALUE_RANK_ONE_DIMENSION)
    }

    pub fn value_rank(mut self, value_rank: i32) -> Self {
        self.value_rank = value_rank;
        self
    }

    /// Marks the field optional, only meaningful inside a structure with optional fields.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn is_array(&self) -> bool {
        self.value_rank == VALUE_RANK_ONE_DIMENSION
    }

    pub fn is_matrix(&self) -> bool {
        self.value_rank > VALUE_RANK_ONE_DIMENSION
    }
}

/// The schema of one structured data type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// The data type id.
    pub type_id: NodeId,
    pub name: String,
    pub binary_encoding_id: Option<NodeId>,
    pub xml_encoding_id: Option<NodeId>,
    pub json_encoding_id: Option<NodeId>,
    /// The structure this one extends. `None` or the Structure data type for a root.
    pub super_type_id: Option<NodeId>,
    pub structure_kind: StructureKind,
    pub is_abstract: bool,
    /// The fields this type declares, not counting the fields of its supertypes.
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new<N, T>(type_id: T, name: N) -> TypeDescriptor
    where
        N: Into<String>,
        T: Into<NodeId>,
    {
        TypeDescriptor {
            type_id: type_id.into(),
            name: name.into(),
            binary_encoding_id: None,
            xml_encoding_id: None,
            json_encoding_id: None,
            super_type_id: None,
            structure_kind: StructureKind::Structure,
            is_abstract: false,
            fields: Vec::new(),
        }
    }

    /// Sets the binary, XML and JSON encoding ids.
    pub fn encodings<B, X, J>(mut self, binary: B, xml: X, json: J) -> Self
    where
        B: Into<NodeId>,
        X: Into<NodeId>,
        J: Into<NodeId>,
    {
        self.binary_encoding_id = Some(binary.into());
        self.xml_encoding_id = Some(xml.into());
        self.json_encoding_id = Some(json.into());
        self
    }

    pub fn binary_encoding<B: Into<NodeId>>(mut self, binary: B) -> Self {
        self.binary_encoding_id = Some(binary.into());
        self
    }

    pub fn super_type<T: Into<NodeId>>(mut self, super_type_id: T) -> Self {
        self.super_type_id = Some(super_type_id.into());
        self
    }

    pub fn structure_kind(mut self, structure_kind: StructureKind) -> Self {
        self.structure_kind = structure_kind;
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the encoding id of the kind.
    pub fn encoding_id(&self, kind: EncodingKind) -> Option<&NodeId> {
        match kind {
            EncodingKind::Binary => self.binary_encoding_id.as_ref(),
            EncodingKind::Xml => self.xml_encoding_id.as_ref(),
            EncodingKind::Json => self.json_encoding_id.as_ref(),
        }
    }

    pub(crate) fn encoding_ids(&self) -> impl Iterator<Item = (EncodingKind, &NodeId)> {
        [EncodingKind::Binary, EncodingKind::Xml, EncodingKind::Json]
            .into_iter()
            .filter_map(move |kind| self.encoding_id(kind).map(|id| (kind, id)))
    }
}

/// An enumerated data type. Values are encoded as Int32.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub type_id: NodeId,
    pub name: String,
    pub values: Vec<(String, i32)>,
}

impl EnumDescriptor {
    pub fn new<N, T>(type_id: T, name: N, values: &[(&str, i32)]) -> EnumDescriptor
    where
        N: Into<String>,
        T: Into<NodeId>,
    {
        EnumDescriptor {
            type_id: type_id.into(),
            name: name.into(),
            values: values.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
        }
    }

    /// Returns the name of a value.
    pub fn name_of(&self, value: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| n.as_str())
    }

    /// Returns the value of a name.
    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

/// A data type that is an alias of a builtin kind, e.g. Duration is a Double.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleTypeDescriptor {
    pub type_id: NodeId,
    pub name: String,
    pub kind: VariantTypeId,
}
