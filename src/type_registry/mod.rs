// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The type registry maps encoding ids onto the field schema of structured types.
//!
//! A registry is assembled once through a [`TypeRegistryBuilder`] and is immutable afterwards, so
//! it can be read from any number of threads without locking.

use std::{collections::HashMap, convert::TryFrom};

use crate::{
    encoding::{EncodingError, EncodingResult},
    node_id::NodeId,
    node_ids::DataTypeId,
    status_code::StatusCode,
    variant_type_id::VariantTypeId,
};

mod descriptor;

pub use self::descriptor::*;

/// How a field's data type is encoded.
#[derive(Debug, Clone, Copy)]
pub enum FieldType<'a> {
    /// A builtin kind, including simple subtypes of a builtin and abstract structures which
    /// travel as extension objects.
    Builtin(VariantTypeId),
    Enumeration(&'a EnumDescriptor),
    Structure(&'a TypeDescriptor),
}

/// The outcome of resolving an encoding id that may not be registered.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    Registered(&'a TypeDescriptor),
    Unregistered,
}

impl<'a> Resolution<'a> {
    pub fn is_registered(&self) -> bool {
        matches!(self, Resolution::Registered(_))
    }
}

/// An immutable registry of structure, enumeration and simple data types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<NodeId, TypeDescriptor>,
    encodings: HashMap<(NodeId, EncodingKind), NodeId>,
    enums: HashMap<NodeId, EnumDescriptor>,
    simple_types: HashMap<NodeId, SimpleTypeDescriptor>,
    /// Flattened field lists, supertype fields first
    fields: HashMap<NodeId, Vec<FieldDescriptor>>,
}

impl TypeRegistry {
    /// Returns the structure registered under an encoding id of the kind. An unknown id is a
    /// decoding error.
    pub fn resolve(&self, encoding_id: &NodeId, kind: EncodingKind) -> EncodingResult<&TypeDescriptor> {
        match self.resolve_unknown(encoding_id, kind) {
            Resolution::Registered(descriptor) => Ok(descriptor),
            Resolution::Unregistered => Err(EncodingError::decoding_status(
                StatusCode::BadDataTypeIdUnknown,
                format!("no type is registered for {:?} encoding id {}", kind, encoding_id),
            )),
        }
    }

    /// Resolves an encoding id of the kind, returning `Unregistered` when it is not known.
    pub fn resolve_unknown(&self, encoding_id: &NodeId, kind: EncodingKind) -> Resolution<'_> {
        self.encodings
            .get(&(encoding_id.clone(), kind))
            .and_then(|type_id| self.types.get(type_id))
            .map(Resolution::Registered)
            .unwrap_or(Resolution::Unregistered)
    }

    /// Returns the structure with the data type id.
    pub fn get(&self, type_id: &NodeId) -> Option<&TypeDescriptor> {
        self.types.get(type_id)
    }

    pub fn get_enum(&self, type_id: &NodeId) -> Option<&EnumDescriptor> {
        self.enums.get(type_id)
    }

    /// Returns the encoding id of the kind for a data type.
    pub fn encoding_id(&self, type_id: &NodeId, kind: EncodingKind) -> Option<&NodeId> {
        self.types.get(type_id).and_then(|d| d.encoding_id(kind))
    }

    /// Returns every field of a structure, the fields of its supertypes first and then each
    /// subtype's own fields in declaration order.
    pub fn fields(&self, type_id: &NodeId) -> Option<&[FieldDescriptor]> {
        self.fields.get(type_id).map(|f| f.as_slice())
    }

    /// Classifies a field data type.
    pub fn field_type(&self, data_type_id: &NodeId) -> EncodingResult<FieldType<'_>> {
        if let Ok(kind) = VariantTypeId::try_from(data_type_id) {
            Ok(FieldType::Builtin(kind))
        } else if let Some(simple) = self.simple_types.get(data_type_id) {
            Ok(FieldType::Builtin(simple.kind))
        } else if let Some(descriptor) = self.enums.get(data_type_id) {
            Ok(FieldType::Enumeration(descriptor))
        } else if let Some(descriptor) = self.types.get(data_type_id) {
            if descriptor.is_abstract {
                // Abstract structures are only ever carried by extension objects
                Ok(FieldType::Builtin(VariantTypeId::ExtensionObject))
            } else {
                Ok(FieldType::Structure(descriptor))
            }
        } else {
            Err(EncodingError::schema(format!(
                "data type {} is not known to the registry",
                data_type_id
            )))
        }
    }

    /// Tests if the data type is the type or one of its subtypes.
    pub fn is_subtype_of(&self, type_id: &NodeId, super_type_id: &NodeId) -> bool {
        let mut current = Some(type_id);
        while let Some(type_id) = current {
            if type_id == super_type_id {
                return true;
            }
            current = self
                .types
                .get(type_id)
                .and_then(|d| d.super_type_id.as_ref());
        }
        false
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn contains_type(&self, type_id: &NodeId) -> bool {
        self.types.contains_key(type_id)
            || self.enums.contains_key(type_id)
            || self.simple_types.contains_key(type_id)
            || VariantTypeId::try_from(type_id).is_ok()
    }
}

/// Assembles a [`TypeRegistry`]. Registration checks each descriptor on its own, `build`
/// checks the relations between them.
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    registry: TypeRegistry,
}

impl From<&TypeRegistry> for TypeRegistryBuilder {
    /// Seeds a builder with the types of an existing registry, e.g. to extend the standard
    /// types with an application's own.
    fn from(registry: &TypeRegistry) -> Self {
        TypeRegistryBuilder {
            registry: registry.clone(),
        }
    }
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a structure.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> EncodingResult<&mut Self> {
        if self.registry.contains_type(&descriptor.type_id) {
            return Err(EncodingError::schema(format!(
                "type {} ({}) is already registered",
                descriptor.name, descriptor.type_id
            )));
        }
        if descriptor.is_abstract {
            if descriptor.encoding_ids().next().is_some() {
                return Err(EncodingError::schema(format!(
                    "abstract type {} cannot have encoding ids",
                    descriptor.name
                )));
            }
        } else if descriptor.binary_encoding_id.is_none() {
            return Err(EncodingError::schema(format!(
                "type {} has no binary encoding id",
                descriptor.name
            )));
        }
        for (kind, encoding_id) in descriptor.encoding_ids() {
            if let Some(existing) = self.registry.encodings.get(&(encoding_id.clone(), kind)) {
                return Err(EncodingError::schema(format!(
                    "{:?} encoding id {} of {} is already used by {}",
                    kind, encoding_id, descriptor.name, existing
                )));
            }
        }
        trace!("Registering type {} {}", descriptor.name, descriptor.type_id);
        for (kind, encoding_id) in descriptor.encoding_ids() {
            self.registry
                .encodings
                .insert((encoding_id.clone(), kind), descriptor.type_id.clone());
        }
        self.registry
            .types
            .insert(descriptor.type_id.clone(), descriptor);
        Ok(self)
    }

    /// Registers an enumeration.
    pub fn register_enum(&mut self, descriptor: EnumDescriptor) -> EncodingResult<&mut Self> {
        if self.registry.contains_type(&descriptor.type_id) {
            return Err(EncodingError::schema(format!(
                "enumeration {} ({}) is already registered",
                descriptor.name, descriptor.type_id
            )));
        }
        self.registry
            .enums
            .insert(descriptor.type_id.clone(), descriptor);
        Ok(self)
    }

    /// Registers a data type that is encoded as a builtin kind.
    pub fn register_simple<T, N>(
        &mut self,
        type_id: T,
        name: N,
        kind: VariantTypeId,
    ) -> EncodingResult<&mut Self>
    where
        T: Into<NodeId>,
        N: Into<String>,
    {
        let type_id = type_id.into();
        let name = name.into();
        if self.registry.contains_type(&type_id) {
            return Err(EncodingError::schema(format!(
                "simple type {} ({}) is already registered",
                name, type_id
            )));
        }
        if kind == VariantTypeId::Empty {
            return Err(EncodingError::schema(format!(
                "simple type {} has no builtin kind",
                name
            )));
        }
        self.registry.simple_types.insert(
            type_id.clone(),
            SimpleTypeDescriptor {
                type_id,
                name,
                kind,
            },
        );
        Ok(self)
    }

    /// Seals the registry. Fails when a supertype is missing, the supertypes of a type form a
    /// cycle, or a field refers to an unknown data type.
    pub fn build(self) -> EncodingResult<TypeRegistry> {
        let mut registry = self.registry;
        let structure_id: NodeId = DataTypeId::Structure.into();

        // Sorted so the first failure reported does not depend on hash order
        let mut type_ids: Vec<&NodeId> = registry.types.keys().collect();
        type_ids.sort_by_key(|id| id.to_string());

        let mut flattened = HashMap::with_capacity(type_ids.len());
        for type_id in type_ids {
            let mut chain = Vec::new();
            let mut current = registry.types.get(type_id);
            while let Some(descriptor) = current {
                if chain.iter().any(|d: &&TypeDescriptor| d.type_id == descriptor.type_id) {
                    return Err(EncodingError::schema(format!(
                        "supertypes of {} form a cycle",
                        descriptor.name
                    )));
                }
                chain.push(descriptor);
                current = match descriptor.super_type_id {
                    None => None,
                    Some(ref super_type_id) if *super_type_id == structure_id => None,
                    Some(ref super_type_id) => {
                        let super_type = registry.types.get(super_type_id).ok_or_else(|| {
                            EncodingError::schema(format!(
                                "supertype {} of {} is not registered",
                                super_type_id, descriptor.name
                            ))
                        })?;
                        Some(super_type)
                    }
                };
            }
            let fields: Vec<FieldDescriptor> = chain
                .iter()
                .rev()
                .flat_map(|d| d.fields.iter().cloned())
                .collect();
            for field in &fields {
                registry.field_type(&field.data_type_id).map_err(|_| {
                    EncodingError::schema(format!(
                        "field {} of {} has unknown data type {}",
                        field.name, chain[0].name, field.data_type_id
                    ))
                })?;
            }
            flattened.insert(type_id.clone(), fields);
        }
        registry.fields = flattened;
        Ok(registry)
    }
}
