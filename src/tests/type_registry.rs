// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use crate::*;

fn point(type_id: u32) -> TypeDescriptor {
    TypeDescriptor::new(NodeId::new(1, type_id), "Point")
        .binary_encoding(NodeId::new(1, type_id + 1))
        .field(FieldDescriptor::new("X", DataTypeId::Double))
        .field(FieldDescriptor::new("Y", DataTypeId::Double))
}

fn schema_error<T: std::fmt::Debug>(result: EncodingResult<T>) {
    let err = result.unwrap_err();
    assert!(err.is_schema(), "expected a schema error, got {:?}", err);
    assert_eq!(err.status(), StatusCode::BadConfigurationError);
}

#[test]
fn duplicate_types() {
    let mut builder = TypeRegistryBuilder::new();
    builder.register(point(100)).unwrap();
    schema_error(builder.register(point(100)));
    // The encoding id is already taken by the first point
    schema_error(builder.register(
        TypeDescriptor::new(NodeId::new(1, 200u32), "Other").binary_encoding(NodeId::new(1, 101u32)),
    ));
    // Builtins cannot be registered again
    schema_error(builder.register_simple(DataTypeId::Int32, "Int32", VariantTypeId::Int32));
    schema_error(builder.register_enum(EnumDescriptor::new(NodeId::new(1, 100u32), "E", &[])));
}

#[test]
fn encodings_are_checked() {
    let mut builder = TypeRegistryBuilder::new();
    schema_error(builder.register(TypeDescriptor::new(NodeId::new(1, 1u32), "NoEncoding")));
    schema_error(builder.register(point(10).abstract_type()));
    schema_error(builder.register_simple(NodeId::new(1, 20u32), "Nothing", VariantTypeId::Empty));
    builder
        .register(TypeDescriptor::new(NodeId::new(1, 30u32), "Abstract").abstract_type())
        .unwrap();
}

#[test]
fn build_checks_relations() {
    let mut builder = TypeRegistryBuilder::new();
    builder
        .register(point(100).super_type(NodeId::new(1, 999u32)))
        .unwrap();
    schema_error(builder.build());

    // Two types that are each other's supertype
    let mut builder = TypeRegistryBuilder::new();
    builder
        .register(point(100).super_type(NodeId::new(1, 200u32)))
        .unwrap()
        .register(
            TypeDescriptor::new(NodeId::new(1, 200u32), "Loop")
                .binary_encoding(NodeId::new(1, 201u32))
                .super_type(NodeId::new(1, 100u32)),
        )
        .unwrap();
    schema_error(builder.build());

    let mut builder = TypeRegistryBuilder::new();
    builder
        .register(point(100).field(FieldDescriptor::new("Z", NodeId::new(1, 555u32))))
        .unwrap();
    schema_error(builder.build());
}

#[test]
fn resolve_standard_types() {
    let registry = standard_registry();
    let range = registry
        .resolve(&ObjectId::Range_Encoding_DefaultBinary.into(), EncodingKind::Binary)
        .unwrap();
    assert_eq!(range.name, "Range");
    assert_eq!(range.type_id, NodeId::from(DataTypeId::Range));

    // The same id is not a json encoding
    let err = registry
        .resolve(&ObjectId::Range_Encoding_DefaultBinary.into(), EncodingKind::Json)
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BadDataTypeIdUnknown);
    assert!(!registry
        .resolve_unknown(&NodeId::new(5, 1u32), EncodingKind::Binary)
        .is_registered());

    assert_eq!(
        registry.encoding_id(&DataTypeId::Range.into(), EncodingKind::Xml),
        Some(&NodeId::from(ObjectId::Range_Encoding_DefaultXml))
    );
    let names: Vec<&str> = registry
        .fields(&DataTypeId::EUInformation.into())
        .unwrap()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, ["NamespaceUri", "UnitId", "DisplayName", "Description"]);
}

#[test]
fn field_types() {
    let registry = standard_registry();
    assert!(matches!(
        registry.field_type(&DataTypeId::Double.into()),
        Ok(FieldType::Builtin(VariantTypeId::Double))
    ));
    // Simple types are encoded as their builtin
    assert!(matches!(
        registry.field_type(&DataTypeId::Duration.into()),
        Ok(FieldType::Builtin(VariantTypeId::Double))
    ));
    // Abstract structures travel as extension objects
    assert!(matches!(
        registry.field_type(&DataTypeId::FilterOperand.into()),
        Ok(FieldType::Builtin(VariantTypeId::ExtensionObject))
    ));
    match registry.field_type(&DataTypeId::FilterOperator.into()) {
        Ok(FieldType::Enumeration(e)) => {
            assert_eq!(e.name_of(0), Some("Equals"));
            assert_eq!(e.value_of("IsNull"), Some(1));
            assert_eq!(e.value_of("Nope"), None);
        }
        other => panic!("unexpected field type {:?}", other),
    }
    assert!(matches!(
        registry.field_type(&DataTypeId::Range.into()),
        Ok(FieldType::Structure(_))
    ));
    schema_error(registry.field_type(&NodeId::new(3, "nothing")));
}

#[test]
fn subtypes() {
    let registry = standard_registry();
    let operand: NodeId = DataTypeId::FilterOperand.into();
    assert!(registry.is_subtype_of(&DataTypeId::ElementOperand.into(), &operand));
    assert!(registry.is_subtype_of(&DataTypeId::SimpleAttributeOperand.into(), &operand));
    assert!(registry.is_subtype_of(&operand, &operand));
    assert!(!registry.is_subtype_of(&DataTypeId::Range.into(), &operand));
}

#[test]
fn extended_registry_keeps_standard_types() {
    let mut builder = TypeRegistryBuilder::from(standard_registry());
    builder.register(point(100)).unwrap();
    let registry = builder.build().unwrap();
    assert_eq!(registry.len(), standard_registry().len() + 1);
    assert!(registry.get(&DataTypeId::Range.into()).is_some());
    assert!(registry
        .resolve_unknown(&NodeId::new(1, 101u32), EncodingKind::Binary)
        .is_registered());
    // Without xml or json encodings the type only resolves as binary
    assert!(registry.encoding_id(&NodeId::new(1, 100u32), EncodingKind::Json).is_none());

    // The standard registry itself is unchanged
    assert!(standard_registry().get(&NodeId::new(1, 100u32)).is_none());
}
