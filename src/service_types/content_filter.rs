// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::convert::TryFrom;

use crate::{
    encoding::{EncodingError, EncodingResult},
    extension_object::ExtensionObject,
    node_id::NodeId,
    node_ids::DataTypeId,
    status_code::StatusCode,
    struct_codec::{scalar_element, struct_element, FieldValue, StructValue},
};

use super::{FilterOperand, UaStructure};

/// The operator of a content filter element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Equals = 0,
    IsNull = 1,
    GreaterThan = 2,
    LessThan = 3,
    GreaterThanOrEqual = 4,
    LessThanOrEqual = 5,
    Like = 6,
    Not = 7,
    Between = 8,
    InList = 9,
    And = 10,
    Or = 11,
    Cast = 12,
    InView = 13,
    OfType = 14,
    RelatedTo = 15,
    BitwiseAnd = 16,
    BitwiseOr = 17,
}

/// Every operator with its name, in value order.
pub(crate) const FILTER_OPERATORS: [(&str, FilterOperator); 18] = [
    ("Equals", FilterOperator::Equals),
    ("IsNull", FilterOperator::IsNull),
    ("GreaterThan", FilterOperator::GreaterThan),
    ("LessThan", FilterOperator::LessThan),
    ("GreaterThanOrEqual", FilterOperator::GreaterThanOrEqual),
    ("LessThanOrEqual", FilterOperator::LessThanOrEqual),
    ("Like", FilterOperator::Like),
    ("Not", FilterOperator::Not),
    ("Between", FilterOperator::Between),
    ("InList", FilterOperator::InList),
    ("And", FilterOperator::And),
    ("Or", FilterOperator::Or),
    ("Cast", FilterOperator::Cast),
    ("InView", FilterOperator::InView),
    ("OfType", FilterOperator::OfType),
    ("RelatedTo", FilterOperator::RelatedTo),
    ("BitwiseAnd", FilterOperator::BitwiseAnd),
    ("BitwiseOr", FilterOperator::BitwiseOr),
];

impl TryFrom<i32> for FilterOperator {
    type Error = EncodingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        FILTER_OPERATORS
            .iter()
            .map(|(_, op)| *op)
            .find(|op| *op as i32 == value)
            .ok_or_else(|| {
                error!("Invalid value {} for enum FilterOperator", value);
                EncodingError::decoding_status(
                    StatusCode::BadOutOfRange,
                    format!("{} is not a FilterOperator", value),
                )
            })
    }
}

/// One element of a content filter, an operator applied to its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentFilterElement {
    pub filter_operator: FilterOperator,
    pub filter_operands: Option<Vec<ExtensionObject>>,
}

impl UaStructure for ContentFilterElement {
    fn data_type_id() -> NodeId {
        DataTypeId::ContentFilterElement.into()
    }

    fn to_struct_value(&self) -> StructValue {
        let filter_operands = FieldValue::Array(
            self.filter_operands
                .as_ref()
                .map(|ops| ops.iter().cloned().map(FieldValue::from).collect()),
        );
        StructValue::new(DataTypeId::ContentFilterElement)
            .with("FilterOperator", FieldValue::Enum(self.filter_operator as i32))
            .with("FilterOperands", filter_operands)
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(ContentFilterElement {
            filter_operator: FilterOperator::try_from(value.take_enum("FilterOperator")?)
                .map_err(|e| e.with_field("FilterOperator"))?,
            filter_operands: value
                .take_array("FilterOperands", scalar_element::<ExtensionObject>)?,
        })
    }
}

impl From<(FilterOperator, Vec<FilterOperand>)> for ContentFilterElement {
    fn from(v: (FilterOperator, Vec<FilterOperand>)) -> ContentFilterElement {
        ContentFilterElement {
            filter_operator: v.0,
            filter_operands: Some(v.1.iter().map(|op| op.into()).collect()),
        }
    }
}

impl ContentFilterElement {
    /// The operands of the element. Fails if an operand was not decoded into a filter operand.
    pub fn operands(&self) -> EncodingResult<Vec<FilterOperand>> {
        self.filter_operands
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, op)| {
                FilterOperand::try_from(op)
                    .map_err(|e| e.with_field(&format!("[{}]", i)).with_field("FilterOperands"))
            })
            .collect()
    }
}

/// A filter made of elements, the first element is the root of the expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentFilter {
    pub elements: Option<Vec<ContentFilterElement>>,
}

impl UaStructure for ContentFilter {
    fn data_type_id() -> NodeId {
        DataTypeId::ContentFilter.into()
    }

    fn to_struct_value(&self) -> StructValue {
        let elements = FieldValue::Array(self.elements.as_ref().map(|elements| {
            elements
                .iter()
                .map(|e| FieldValue::from(e.to_struct_value()))
                .collect()
        }));
        StructValue::new(DataTypeId::ContentFilter).with("Elements", elements)
    }

    fn from_struct_value(mut value: StructValue) -> EncodingResult<Self> {
        Ok(ContentFilter {
            elements: value.take_array("Elements", |v| {
                ContentFilterElement::from_struct_value(struct_element(v)?)
            })?,
        })
    }
}

/// This is a convenience for building a [`ContentFilter`] using operands as building blocks.
/// The builder does not check that the filter is valid, i.e. if you reference an element by
/// index that doesn't exist, or introduce a loop then you will not get an error until a server
/// rejects it.
pub struct ContentFilterBuilder {
    elements: Vec<ContentFilterElement>,
}

impl Default for ContentFilterBuilder {
    fn default() -> Self {
        ContentFilterBuilder {
            elements: Vec::with_capacity(20),
        }
    }
}

impl ContentFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_element(mut self, filter_operator: FilterOperator, filter_operands: Vec<FilterOperand>) -> Self {
        self.elements
            .push(ContentFilterElement::from((filter_operator, filter_operands)));
        self
    }

    pub fn eq<T, S>(self, o1: T, o2: S) -> Self
    where
        T: Into<FilterOperand>,
        S: Into<FilterOperand>,
    {
        self.add_element(FilterOperator::Equals, vec![o1.into(), o2.into()])
    }

    pub fn null<T>(self, o1: T) -> Self
    where
        T: Into<FilterOperand>,
    {
        self.add_element(FilterOperator::IsNull, vec![o1.into()])
    }

    pub fn gt<T, S>(self, o1: T, o2: S) -> Self
    where
        T: Into<FilterOperand>,
        S: Into<FilterOperand>,
    {
        self.add_element(FilterOperator::GreaterThan, vec![o1.into(), o2.into()])
    }

    pub fn lt<T, S>(self, o1: T, o2: S) -> Self
    where
        T: Into<FilterOperand>,
        S: Into<FilterOperand>,
    {
        self.add_element(FilterOperator::LessThan, vec![o1.into(), o2.into()])
    }

    pub fn like<T, S>(self, o1: T, o2: S) -> Self
    where
        T: Into<FilterOperand>,
        S: Into<FilterOperand>,
    {
        self.add_element(FilterOperator::Like, vec![o1.into(), o2.into()])
    }

    pub fn not<T>(self, o1: T) -> Self
    where
        T: Into<FilterOperand>,
    {
        self.add_element(FilterOperator::Not, vec![o1.into()])
    }

    pub fn between<T, S, U>(self, o1: T, o2: S, o3: U) -> Self
    where
        T: Into<FilterOperand>,
        S: Into<FilterOperand>,
        U: Into<FilterOperand>,
    {
        self.add_element(FilterOperator::Between, vec![o1.into(), o2.into(), o3.into()])
    }

    pub fn in_list<T, S>(self, o1: T, list_items: Vec<S>) -> Self
    where
        T: Into<FilterOperand>,
        S: Into<FilterOperand>,
    {
        // The operand first and then the items
        let filter_operands = std::iter::once(o1.into())
            .chain(list_items.into_iter().map(|item| item.into()))
            .collect();
        self.add_element(FilterOperator::InList, filter_operands)
    }

    pub fn and<T, S>(self, o1: T, o2: S) -> Self
    where
        T: Into<FilterOperand>,
        S: Into<FilterOperand>,
    {
        self.add_element(FilterOperator::And, vec![o1.into(), o2.into()])
    }

    pub fn or<T, S>(self, o1: T, o2: S) -> Self
    where
        T: Into<FilterOperand>,
        S: Into<FilterOperand>,
    {
        self.add_element(FilterOperator::Or, vec![o1.into(), o2.into()])
    }

    pub fn build(self) -> ContentFilter {
        ContentFilter {
            elements: Some(self.elements),
        }
    }
}
