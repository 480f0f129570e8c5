// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the `Array` held by an array `Variant`.

use crate::{
    encoding::{EncodingError, EncodingResult},
    status_code::StatusCode,
    variant::Variant,
    variant_type_id::{EncodingMask, VariantTypeId},
};

/// An array is a vector of values with an optional number of dimensions.
///
/// Multi dimension arrays hold their values flattened with the higher rank dimensions serialized
/// first. For example an array with dimensions [2,2,2] is written in this order - [0,0,0],
/// [0,0,1], [0,1,0], [0,1,1], [1,0,0], [1,0,1], [1,1,0], [1,1,1]. The product of the dimensions
/// always equals the number of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    // Type of elements in the array
    pub value_type: VariantTypeId,

    /// Values are stored sequentially, `None` for a null array
    pub values: Option<Vec<Variant>>,

    /// Dimensions of a matrix, empty for a single dimension array.
    pub dimensions: Vec<u32>,
}

impl Array {
    pub fn new_single<V>(value_type: VariantTypeId, values: V) -> EncodingResult<Array>
    where
        V: Into<Vec<Variant>>,
    {
        let values = values.into();
        Self::validate_array_type_to_values(value_type, &values)?;
        Ok(Array {
            value_type,
            values: Some(values),
            dimensions: Vec::new(),
        })
    }

    /// A null array of the type, which is distinct from an empty array on every encoding.
    pub fn null(value_type: VariantTypeId) -> Array {
        Array {
            value_type,
            values: None,
            dimensions: Vec::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.values.is_none()
    }

    /// The values of the array, empty for a null array.
    pub fn values(&self) -> &[Variant] {
        self.values.as_deref().unwrap_or(&[])
    }

    pub fn new_multi<V, D>(value_type: VariantTypeId, values: V, dimensions: D) -> EncodingResult<Array>
    where
        V: Into<Vec<Variant>>,
        D: Into<Vec<u32>>,
    {
        let values = values.into();
        let dimensions = dimensions.into();
        Self::validate_array_type_to_values(value_type, &values)?;
        let length = dimensions_length(&dimensions).ok_or_else(|| {
            EncodingError::encoding_status(
                StatusCode::BadTypeMismatch,
                format!("invalid array dimensions {:?}", dimensions),
            )
        })?;
        if length != values.len() {
            error!(
                "Array dimensions {:?} do not match array length {}",
                dimensions,
                values.len()
            );
            return Err(EncodingError::encoding_status(
                StatusCode::BadTypeMismatch,
                format!(
                    "array dimensions {:?} do not match {} values",
                    dimensions,
                    values.len()
                ),
            ));
        }
        Ok(Array {
            value_type,
            values: Some(values),
            dimensions,
        })
    }

    /// This is a runtime check to ensure the type of the array also matches the types of the variants in the array.
    fn validate_array_type_to_values(
        value_type: VariantTypeId,
        values: &[Variant],
    ) -> EncodingResult<()> {
        if value_type == VariantTypeId::Empty {
            error!("Invalid array type supplied");
            Err(EncodingError::encoding_status(
                StatusCode::BadTypeMismatch,
                "array has no element type",
            ))
        } else if values.iter().any(|v| v.is_array()) {
            // Nested arrays are explicitly NOT allowed
            error!("Variant array contains a nested array");
            Err(EncodingError::encoding_status(
                StatusCode::BadTypeMismatch,
                "array contains a nested array",
            ))
        } else if !values_are_of_type(values, value_type) {
            Err(EncodingError::encoding_status(
                StatusCode::BadTypeMismatch,
                format!("array of {:?} holds values of another type", value_type),
            ))
        } else {
            Ok(())
        }
    }

    /// Checks the array still holds the invariants its constructors enforce. Fields are public so
    /// this is called before encoding.
    pub fn validate(&self) -> EncodingResult<()> {
        let values = match self.values {
            Some(ref values) => values.as_slice(),
            None if self.has_dimensions() => {
                error!("Null array has dimensions {:?}", self.dimensions);
                return Err(EncodingError::encoding_status(
                    StatusCode::BadTypeMismatch,
                    "null array with array dimensions",
                ));
            }
            None => &[],
        };
        Self::validate_array_type_to_values(self.value_type, values)?;
        if self.has_dimensions() {
            match dimensions_length(&self.dimensions) {
                Some(length) if length == values.len() => Ok(()),
                _ => Err(EncodingError::encoding_status(
                    StatusCode::BadTypeMismatch,
                    format!(
                        "array dimensions {:?} do not match {} values",
                        self.dimensions,
                        values.len()
                    ),
                )),
            }
        } else {
            Ok(())
        }
    }

    pub fn has_dimensions(&self) -> bool {
        !self.dimensions.is_empty()
    }

    pub fn encoding_mask(&self) -> u8 {
        let mut encoding_mask = self.value_type.code();
        encoding_mask |= EncodingMask::ARRAY_VALUES_BIT;
        if self.has_dimensions() {
            encoding_mask |= EncodingMask::ARRAY_DIMENSIONS_BIT;
        }
        encoding_mask
    }
}

/// Returns the checked product of the dimensions, or `None` when a dimension is 0 or the product
/// overflows.
pub fn dimensions_length(dimensions: &[u32]) -> Option<usize> {
    dimensions.iter().try_fold(1usize, |length, d| {
        if *d == 0 {
            None
        } else {
            length.checked_mul(*d as usize)
        }
    })
}

/// Check that all elements in the slice of arrays are the same type.
pub fn values_are_of_type(values: &[Variant], expected_type: VariantTypeId) -> bool {
    // Ensure all remaining elements are the same type as the first element
    let found_unexpected = values.iter().any(|v| v.type_id() != expected_type);
    if found_unexpected {
        error!(
            "Variant array's type is expected to be {:?} but found other types in it",
            expected_type
        );
    };
    !found_unexpected
}
