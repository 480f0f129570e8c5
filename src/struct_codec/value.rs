// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The dynamic values the struct engine produces and consumes.

use std::convert::TryFrom;

use crate::{
    byte_string::ByteString,
    data_value::DataValue,
    date_time::DateTime,
    diagnostic_info::DiagnosticInfo,
    encoding::{EncodingError, EncodingResult},
    expanded_node_id::ExpandedNodeId,
    extension_object::ExtensionObject,
    guid::Guid,
    localized_text::LocalizedText,
    node_id::NodeId,
    qualified_name::QualifiedName,
    status_code::StatusCode,
    string::UAString,
    variant::Variant,
};

/// The value of one field of a structure.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A builtin value, including simple subtypes and extension objects.
    Scalar(Variant),
    /// The Int32 value of an enumeration.
    Enum(i32),
    /// A nested structure.
    Struct(StructValue),
    /// A one dimensional array. `None` is the null array, distinct from an empty one.
    Array(Option<Vec<FieldValue>>),
    /// A multi dimensional array. `None` is the null matrix.
    Matrix(Option<Matrix>),
}

/// A multi dimensional array held flattened, higher rank dimensions first.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub dimensions: Vec<u32>,
    pub values: Vec<FieldValue>,
}

impl From<Variant> for FieldValue {
    fn from(v: Variant) -> Self {
        FieldValue::Scalar(v)
    }
}

impl<'a> From<&'a str> for FieldValue {
    fn from(v: &'a str) -> Self {
        FieldValue::Scalar(Variant::from(v))
    }
}

macro_rules! field_value_from_impl {
    ($($rtype: ty),*) => {
        $(
            impl From<$rtype> for FieldValue {
                fn from(v: $rtype) -> Self {
                    FieldValue::Scalar(Variant::from(v))
                }
            }
        )*
    };
}

field_value_from_impl!(
    bool,
    i8,
    u8,
    i16,
    u16,
    i32,
    u32,
    i64,
    u64,
    f32,
    f64,
    String,
    UAString,
    DateTime,
    Guid,
    StatusCode,
    ByteString,
    QualifiedName,
    LocalizedText,
    NodeId,
    ExpandedNodeId,
    ExtensionObject,
    DataValue,
    DiagnosticInfo
);

impl From<StructValue> for FieldValue {
    fn from(v: StructValue) -> Self {
        FieldValue::Struct(v)
    }
}

impl FieldValue {
    /// Creates an array of the values.
    pub fn array<T, I>(values: I) -> FieldValue
    where
        T: Into<FieldValue>,
        I: IntoIterator<Item = T>,
    {
        FieldValue::Array(Some(values.into_iter().map(|v| v.into()).collect()))
    }

    pub fn null_array() -> FieldValue {
        FieldValue::Array(None)
    }
}

/// A structure as an ordered list of named fields. A field holding `None` is absent, which is
/// only legal for optional fields and the fields of a union.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    /// The data type id of the structure.
    pub type_id: NodeId,
    pub fields: Vec<(String, Option<FieldValue>)>,
}

impl StructValue {
    pub fn new<T: Into<NodeId>>(type_id: T) -> StructValue {
        StructValue {
            type_id: type_id.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a present field.
    pub fn with<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.push((name.into(), Some(value.into())));
        self
    }

    /// Appends a field that may be absent.
    pub fn with_optional<N, V>(mut self, name: N, value: Option<V>) -> Self
    where
        N: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.push((name.into(), value.map(|v| v.into())));
        self
    }

    /// Returns the value of a field, `None` if the field is absent or unknown.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Removes a field and returns its value.
    pub fn take(&mut self, name: &str) -> Option<FieldValue> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.take())
    }

    /// Removes a field that must be present.
    pub fn take_required(&mut self, name: &str) -> EncodingResult<FieldValue> {
        self.take(name).ok_or_else(|| {
            EncodingError::decoding(format!("field {} is missing", name)).with_field(name)
        })
    }

    /// Removes a scalar field and converts it to the Rust type it holds.
    pub fn take_scalar<T>(&mut self, name: &str) -> EncodingResult<T>
    where
        T: TryFrom<Variant, Error = Variant>,
    {
        match self.take_required(name)? {
            FieldValue::Scalar(v) => T::try_from(v).map_err(|v| mismatch(name, &v)),
            other => Err(mismatch(name, &other)),
        }
    }

    /// Removes an optional scalar field.
    pub fn take_optional_scalar<T>(&mut self, name: &str) -> EncodingResult<Option<T>>
    where
        T: TryFrom<Variant, Error = Variant>,
    {
        match self.take(name) {
            None => Ok(None),
            Some(FieldValue::Scalar(v)) => T::try_from(v).map(Some).map_err(|v| mismatch(name, &v)),
            Some(other) => Err(mismatch(name, &other)),
        }
    }

    /// Removes a field of any builtin kind, returning the variant as is.
    pub fn take_variant(&mut self, name: &str) -> EncodingResult<Variant> {
        match self.take_required(name)? {
            FieldValue::Scalar(v) => Ok(v),
            other => Err(mismatch(name, &other)),
        }
    }

    /// Removes an enumeration field.
    pub fn take_enum(&mut self, name: &str) -> EncodingResult<i32> {
        match self.take_required(name)? {
            FieldValue::Enum(v) => Ok(v),
            other => Err(mismatch(name, &other)),
        }
    }

    /// Removes a nested structure field.
    pub fn take_struct(&mut self, name: &str) -> EncodingResult<StructValue> {
        match self.take_required(name)? {
            FieldValue::Struct(v) => Ok(v),
            other => Err(mismatch(name, &other)),
        }
    }

    /// Removes an array field, converting each element with `f`.
    pub fn take_array<T, F>(&mut self, name: &str, f: F) -> EncodingResult<Option<Vec<T>>>
    where
        F: Fn(FieldValue) -> EncodingResult<T>,
    {
        match self.take_required(name)? {
            FieldValue::Array(None) => Ok(None),
            FieldValue::Array(Some(values)) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| f(v).map_err(|e| e.with_field(&format!("[{}]", i))))
                .collect::<EncodingResult<Vec<T>>>()
                .map(Some)
                .map_err(|e| e.with_field(name)),
            other => Err(mismatch(name, &other)),
        }
    }
}

/// Converts an array element holding a scalar.
pub fn scalar_element<T>(value: FieldValue) -> EncodingResult<T>
where
    T: TryFrom<Variant, Error = Variant>,
{
    match value {
        FieldValue::Scalar(v) => T::try_from(v).map_err(|v| mismatch("", &v)),
        other => Err(mismatch("", &other)),
    }
}

/// Converts an array element holding a structure.
pub fn struct_element(value: FieldValue) -> EncodingResult<StructValue> {
    match value {
        FieldValue::Struct(v) => Ok(v),
        other => Err(mismatch("", &other)),
    }
}

fn mismatch<T: std::fmt::Debug>(name: &str, value: &T) -> EncodingError {
    EncodingError::decoding_status(
        StatusCode::BadTypeMismatch,
        format!("unexpected value {:?}", value),
    )
    .with_field(name)
}
