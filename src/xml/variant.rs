// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! XML encoding of `Variant`, `DataValue` and `DiagnosticInfo`.

use super::*;
use crate::array::Array;

const LIST_OF: &str = "ListOf";
const MATRIX: &str = "Matrix";
const DIMENSIONS: &str = "Dimensions";
const ELEMENTS: &str = "Elements";

fn kind_of(name: &str, node: &XmlNode) -> EncodingResult<VariantTypeId> {
    match VariantTypeId::from_name(name) {
        Some(kind) if kind != VariantTypeId::Empty => Ok(kind),
        _ => Err(unexpected("a builtin type element", node)),
    }
}

fn encode_elements(
    node: &mut XmlNode,
    kind: VariantTypeId,
    values: &[Variant],
    ctx: &Context<'_>,
) -> EncodingResult<()> {
    for (i, value) in values.iter().enumerate() {
        let child = node.add_child(XmlNode::new(kind.name()));
        encode_value(value, child, ctx).map_err(|e| e.with_field(&format!("[{}]", i)))?;
    }
    Ok(())
}

fn decode_elements(
    children: &[XmlNode],
    kind: VariantTypeId,
    ctx: &Context<'_>,
) -> EncodingResult<Vec<Variant>> {
    ctx.options().check_array_length(children.len())?;
    children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            if child.name != kind.name() {
                return Err(unexpected(kind.name(), child).with_field(&format!("[{}]", i)));
            }
            decode_value(kind, child, ctx).map_err(|e| e.with_field(&format!("[{}]", i)))
        })
        .collect()
}

impl XmlEncoder for Variant {
    fn encode_xml(&self, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()> {
        match self {
            Variant::Empty => Ok(()),
            Variant::Variant(_) => {
                error!("Variant contains a nested variant outside of an array");
                Err(EncodingError::encoding(
                    "a variant cannot directly contain another variant",
                ))
            }
            Variant::Array(array) => {
                array.validate()?;
                if array.has_dimensions() {
                    let matrix = node.add_child(XmlNode::new(MATRIX));
                    let dimensions = matrix.add_child(XmlNode::new(DIMENSIONS));
                    for dimension in &array.dimensions {
                        let dimension = i32::try_from(*dimension).map_err(|_| {
                            EncodingError::encoding(format!(
                                "matrix dimension {} is too large",
                                dimension
                            ))
                        })?;
                        dimensions.add_child(XmlNode::with_text("Int32", dimension.to_string()));
                    }
                    let elements = matrix.add_child(XmlNode::new(ELEMENTS));
                    encode_elements(elements, array.value_type, array.values(), ctx)
                } else {
                    let list = node.add_child(XmlNode::new(format!(
                        "{}{}",
                        LIST_OF,
                        array.value_type.name()
                    )));
                    match array.values {
                        Some(ref values) => encode_elements(list, array.value_type, values, ctx),
                        None => {
                            list.set_nil();
                            Ok(())
                        }
                    }
                }
            }
            value => {
                let kind = value.type_id();
                let child = node.add_child(XmlNode::new(kind.name()));
                encode_value(value, child, ctx)
            }
        }
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        let child = match node.children.first() {
            None => return Ok(Variant::Empty),
            Some(child) => child,
        };
        if child.name == MATRIX {
            let dimensions = child
                .child(DIMENSIONS)
                .map(|d| decode_elements(&d.children, VariantTypeId::Int32, ctx))
                .transpose()?
                .unwrap_or_default();
            let dimensions = dimensions
                .into_iter()
                .map(|d| match d {
                    Variant::Int32(d) if d > 0 => Ok(d as u32),
                    d => {
                        error!("Invalid matrix dimension {:?}", d);
                        Err(EncodingError::decoding(format!(
                            "invalid matrix dimension {}",
                            d
                        )))
                    }
                })
                .collect::<EncodingResult<Vec<u32>>>()?;
            let elements = child.child(ELEMENTS).map(|e| e.children.as_slice()).unwrap_or(&[]);
            let kind = match elements.first() {
                Some(first) => kind_of(&first.name, first)?,
                None => {
                    error!("Matrix has no elements");
                    return Err(EncodingError::decoding("matrix has no elements"));
                }
            };
            let values = decode_elements(elements, kind, ctx)?;
            Array::new_multi(kind, values, dimensions)
                .map(Variant::from)
                .map_err(|e| {
                    error!("Matrix is invalid, {}", e);
                    EncodingError::decoding(e.to_string())
                })
        } else if let Some(kind_name) = child.name.strip_prefix(LIST_OF) {
            let kind = kind_of(kind_name, child)?;
            if child.is_nil() {
                return Ok(Variant::from(Array::null(kind)));
            }
            let values = decode_elements(&child.children, kind, ctx)?;
            Array::new_single(kind, values)
                .map(Variant::from)
                .map_err(|e| EncodingError::decoding(e.to_string()))
        } else {
            let kind = kind_of(&child.name, child)?;
            if kind == VariantTypeId::Variant {
                error!("Variant contains a nested variant outside of an array");
                return Err(EncodingError::decoding(
                    "a variant cannot directly contain another variant",
                ));
            }
            decode_value(kind, child, ctx).map_err(|e| e.with_field(&child.name))
        }
    }
}

impl XmlEncoder for DataValue {
    fn encode_xml(&self, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()> {
        if let Some(ref value) = self.value {
            encode_child(node, "Value", value, ctx)?;
        }
        if let Some(ref status) = self.status {
            encode_child(node, "StatusCode", status, ctx)?;
        }
        if let Some(ref source_timestamp) = self.source_timestamp {
            encode_child(node, "SourceTimestamp", source_timestamp, ctx)?;
            if let Some(ref source_picoseconds) = self.source_picoseconds {
                encode_child(node, "SourcePicoseconds", source_picoseconds, ctx)?;
            }
        }
        if let Some(ref server_timestamp) = self.server_timestamp {
            encode_child(node, "ServerTimestamp", server_timestamp, ctx)?;
            if let Some(ref server_picoseconds) = self.server_picoseconds {
                encode_child(node, "ServerPicoseconds", server_picoseconds, ctx)?;
            }
        }
        Ok(())
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        let source_timestamp: Option<DateTime> = {
            // The source timestamp is never adjusted for clock skew
            let options = DecodingOptions {
                client_offset: chrono::Duration::zero(),
                ..ctx.options().clone()
            };
            let ctx = ctx.clone().with_options(options);
            decode_optional_child(node, "SourceTimestamp", &ctx)?
        };
        let server_timestamp: Option<DateTime> = decode_optional_child(node, "ServerTimestamp", ctx)?;
        let source_picoseconds: Option<u16> = decode_optional_child(node, "SourcePicoseconds", ctx)?;
        let server_picoseconds: Option<u16> = decode_optional_child(node, "ServerPicoseconds", ctx)?;
        // An empty <Value/> is a present null variant
        let value = match node.child("Value") {
            Some(child) => Some(Variant::decode_xml(child, ctx).map_err(|e| e.with_field("Value"))?),
            None => None,
        };
        Ok(DataValue {
            value,
            status: decode_optional_child(node, "StatusCode", ctx)?,
            source_picoseconds: source_timestamp.and(source_picoseconds),
            source_timestamp,
            server_picoseconds: server_timestamp.and(server_picoseconds),
            server_timestamp,
        })
    }
}

impl XmlEncoder for DiagnosticInfo {
    fn encode_xml(&self, node: &mut XmlNode, ctx: &Context<'_>) -> EncodingResult<()> {
        let indices = [
            ("SymbolicId", self.symbolic_id),
            ("NamespaceUri", self.namespace_uri),
            ("Locale", self.locale),
            ("LocalizedText", self.localized_text),
        ];
        for (name, index) in indices {
            if let Some(index) = index {
                encode_child(node, name, &index, ctx)?;
            }
        }
        if let Some(ref additional_info) = self.additional_info {
            encode_child(node, "AdditionalInfo", additional_info, ctx)?;
        }
        if let Some(ref inner_status_code) = self.inner_status_code {
            encode_child(node, "InnerStatusCode", inner_status_code, ctx)?;
        }
        if let Some(ref inner_diagnostic_info) = self.inner_diagnostic_info {
            encode_child(node, "InnerDiagnosticInfo", &**inner_diagnostic_info, ctx)?;
        }
        Ok(())
    }

    fn decode_xml(node: &XmlNode, ctx: &Context<'_>) -> EncodingResult<Self> {
        let inner_diagnostic_info = match node.child("InnerDiagnosticInfo") {
            None => None,
            Some(child) => {
                let _depth_lock = ctx.depth_lock()?;
                let inner = DiagnosticInfo::decode_xml(child, ctx)
                    .map_err(|e| e.with_field("InnerDiagnosticInfo"))?;
                Some(Box::new(inner))
            }
        };
        // Additional info is kept apart from a nil string
        let additional_info = node
            .child("AdditionalInfo")
            .map(|child| UAString::decode_xml(child, ctx))
            .transpose()
            .map_err(|e| e.with_field("AdditionalInfo"))?;
        Ok(DiagnosticInfo {
            symbolic_id: decode_optional_child(node, "SymbolicId", ctx)?,
            namespace_uri: decode_optional_child(node, "NamespaceUri", ctx)?,
            locale: decode_optional_child(node, "Locale", ctx)?,
            localized_text: decode_optional_child(node, "LocalizedText", ctx)?,
            additional_info,
            inner_status_code: decode_optional_child(node, "InnerStatusCode", ctx)?,
            inner_diagnostic_info,
        })
    }
}
