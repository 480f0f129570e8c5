// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The standard namespace 0 types the codec knows without being told.

use crate::{
    encoding::EncodingResult,
    node_ids::{DataTypeId, ObjectId},
    service_types::content_filter::FILTER_OPERATORS,
    type_registry::{EnumDescriptor, FieldDescriptor, TypeDescriptor, TypeRegistry, TypeRegistryBuilder},
    variant_type_id::VariantTypeId,
};

lazy_static! {
    static ref STANDARD_REGISTRY: TypeRegistry = match standard_types() {
        Ok(registry) => registry,
        Err(err) => panic!("The standard type table is invalid, {}", err),
    };
}

/// Returns the registry of the standard structures, enumerations and simple types. It is built
/// on first use and shared afterwards.
///
/// An application with types of its own seeds a builder from it,
/// `TypeRegistryBuilder::from(standard_registry())`, and registers them on top.
pub fn standard_registry() -> &'static TypeRegistry {
    &STANDARD_REGISTRY
}

fn field(name: &str, data_type_id: DataTypeId) -> FieldDescriptor {
    FieldDescriptor::new(name, data_type_id)
}

fn structure(
    data_type_id: DataTypeId,
    name: &str,
    binary: ObjectId,
    xml: ObjectId,
    json: ObjectId,
) -> TypeDescriptor {
    TypeDescriptor::new(data_type_id, name)
        .encodings(binary, xml, json)
        .super_type(DataTypeId::Structure)
}

/// A leaf of the FilterOperand family.
fn filter_operand(
    data_type_id: DataTypeId,
    name: &str,
    binary: ObjectId,
    xml: ObjectId,
    json: ObjectId,
) -> TypeDescriptor {
    structure(data_type_id, name, binary, xml, json).super_type(DataTypeId::FilterOperand)
}

fn standard_types() -> EncodingResult<TypeRegistry> {
    let mut builder = TypeRegistryBuilder::new();

    // Simple types
    builder
        .register_simple(DataTypeId::IntegerId, "IntegerId", VariantTypeId::UInt32)?
        .register_simple(DataTypeId::Counter, "Counter", VariantTypeId::UInt32)?
        .register_simple(DataTypeId::Duration, "Duration", VariantTypeId::Double)?
        .register_simple(DataTypeId::NumericRange, "NumericRange", VariantTypeId::String)?
        .register_simple(DataTypeId::UtcTime, "UtcTime", VariantTypeId::DateTime)?
        .register_simple(DataTypeId::LocaleId, "LocaleId", VariantTypeId::String)?
        .register_simple(DataTypeId::AccessLevelType, "AccessLevelType", VariantTypeId::Byte)?
        .register_simple(
            DataTypeId::AccessRestrictionType,
            "AccessRestrictionType",
            VariantTypeId::UInt16,
        )?
        .register_simple(
            DataTypeId::AccessLevelExType,
            "AccessLevelExType",
            VariantTypeId::UInt32,
        )?
        .register_simple(
            DataTypeId::EventNotifierType,
            "EventNotifierType",
            VariantTypeId::Byte,
        )?;

    // Enumerations
    let filter_operators: Vec<(&str, i32)> = FILTER_OPERATORS
        .iter()
        .map(|(name, op)| (*name, *op as i32))
        .collect();
    builder.register_enum(EnumDescriptor::new(
        DataTypeId::FilterOperator,
        "FilterOperator",
        &filter_operators,
    ))?;

    // Structures
    builder
        .register(
            structure(
                DataTypeId::Range,
                "Range",
                ObjectId::Range_Encoding_DefaultBinary,
                ObjectId::Range_Encoding_DefaultXml,
                ObjectId::Range_Encoding_DefaultJson,
            )
            .field(field("Low", DataTypeId::Double))
            .field(field("High", DataTypeId::Double)),
        )?
        .register(
            structure(
                DataTypeId::EUInformation,
                "EUInformation",
                ObjectId::EUInformation_Encoding_DefaultBinary,
                ObjectId::EUInformation_Encoding_DefaultXml,
                ObjectId::EUInformation_Encoding_DefaultJson,
            )
            .field(field("NamespaceUri", DataTypeId::String))
            .field(field("UnitId", DataTypeId::Int32))
            .field(field("DisplayName", DataTypeId::LocalizedText))
            .field(field("Description", DataTypeId::LocalizedText)),
        )?
        .register(
            structure(
                DataTypeId::Argument,
                "Argument",
                ObjectId::Argument_Encoding_DefaultBinary,
                ObjectId::Argument_Encoding_DefaultXml,
                ObjectId::Argument_Encoding_DefaultJson,
            )
            .field(field("Name", DataTypeId::String))
            .field(field("DataType", DataTypeId::NodeId))
            .field(field("ValueRank", DataTypeId::Int32))
            .field(field("ArrayDimensions", DataTypeId::UInt32).array())
            .field(field("Description", DataTypeId::LocalizedText)),
        )?
        .register(
            structure(
                DataTypeId::XVType,
                "XVType",
                ObjectId::XVType_Encoding_DefaultBinary,
                ObjectId::XVType_Encoding_DefaultXml,
                ObjectId::XVType_Encoding_DefaultJson,
            )
            .field(field("X", DataTypeId::Double))
            .field(field("Value", DataTypeId::Float)),
        )?
        .register(
            structure(
                DataTypeId::RelativePathElement,
                "RelativePathElement",
                ObjectId::RelativePathElement_Encoding_DefaultBinary,
                ObjectId::RelativePathElement_Encoding_DefaultXml,
                ObjectId::RelativePathElement_Encoding_DefaultJson,
            )
            .field(field("ReferenceTypeId", DataTypeId::NodeId))
            .field(field("IsInverse", DataTypeId::Boolean))
            .field(field("IncludeSubtypes", DataTypeId::Boolean))
            .field(field("TargetName", DataTypeId::QualifiedName)),
        )?
        .register(
            structure(
                DataTypeId::RelativePath,
                "RelativePath",
                ObjectId::RelativePath_Encoding_DefaultBinary,
                ObjectId::RelativePath_Encoding_DefaultXml,
                ObjectId::RelativePath_Encoding_DefaultJson,
            )
            .field(field("Elements", DataTypeId::RelativePathElement).array()),
        )?
        .register(
            structure(
                DataTypeId::ContentFilterElement,
                "ContentFilterElement",
                ObjectId::ContentFilterElement_Encoding_DefaultBinary,
                ObjectId::ContentFilterElement_Encoding_DefaultXml,
                ObjectId::ContentFilterElement_Encoding_DefaultJson,
            )
            .field(field("FilterOperator", DataTypeId::FilterOperator))
            .field(field("FilterOperands", DataTypeId::FilterOperand).array()),
        )?
        .register(
            structure(
                DataTypeId::ContentFilter,
                "ContentFilter",
                ObjectId::ContentFilter_Encoding_DefaultBinary,
                ObjectId::ContentFilter_Encoding_DefaultXml,
                ObjectId::ContentFilter_Encoding_DefaultJson,
            )
            .field(field("Elements", DataTypeId::ContentFilterElement).array()),
        )?;

    // The FilterOperand family
    builder
        .register(
            TypeDescriptor::new(DataTypeId::FilterOperand, "FilterOperand")
                .super_type(DataTypeId::Structure)
                .abstract_type(),
        )?
        .register(
            filter_operand(
                DataTypeId::ElementOperand,
                "ElementOperand",
                ObjectId::ElementOperand_Encoding_DefaultBinary,
                ObjectId::ElementOperand_Encoding_DefaultXml,
                ObjectId::ElementOperand_Encoding_DefaultJson,
            )
            .field(field("Index", DataTypeId::UInt32)),
        )?
        .register(
            filter_operand(
                DataTypeId::LiteralOperand,
                "LiteralOperand",
                ObjectId::LiteralOperand_Encoding_DefaultBinary,
                ObjectId::LiteralOperand_Encoding_DefaultXml,
                ObjectId::LiteralOperand_Encoding_DefaultJson,
            )
            .field(field("Value", DataTypeId::BaseDataType)),
        )?
        .register(
            filter_operand(
                DataTypeId::AttributeOperand,
                "AttributeOperand",
                ObjectId::AttributeOperand_Encoding_DefaultBinary,
                ObjectId::AttributeOperand_Encoding_DefaultXml,
                ObjectId::AttributeOperand_Encoding_DefaultJson,
            )
            .field(field("NodeId", DataTypeId::NodeId))
            .field(field("Alias", DataTypeId::String))
            .field(field("BrowsePath", DataTypeId::RelativePath))
            .field(field("AttributeId", DataTypeId::IntegerId))
            .field(field("IndexRange", DataTypeId::NumericRange)),
        )?
        .register(
            filter_operand(
                DataTypeId::SimpleAttributeOperand,
                "SimpleAttributeOperand",
                ObjectId::SimpleAttributeOperand_Encoding_DefaultBinary,
                ObjectId::SimpleAttributeOperand_Encoding_DefaultXml,
                ObjectId::SimpleAttributeOperand_Encoding_DefaultJson,
            )
            .field(field("TypeDefinitionId", DataTypeId::NodeId))
            .field(field("BrowsePath", DataTypeId::QualifiedName).array())
            .field(field("AttributeId", DataTypeId::IntegerId))
            .field(field("IndexRange", DataTypeId::NumericRange)),
        )?;

    builder.build()
}
