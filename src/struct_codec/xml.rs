// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! XML framing of structures. A structure is an element named after its type with a child per
//! present field, array items are named after their type and matrices hold `<Dimensions>` and
//! `<Elements>`.

use crate::{
    encoding::*,
    type_registry::EnumDescriptor,
    variant::Variant,
    variant_type_id::VariantTypeId,
    xml::{self, XmlEncoder, XmlNode},
};

const DIMENSIONS: &str = "Dimensions";
const ELEMENTS: &str = "Elements";

/// Stands in for a structure element that is absent, all of its fields read as null.
static EMPTY: XmlNode = XmlNode {
    name: String::new(),
    attributes: Vec::new(),
    children: Vec::new(),
    text: None,
    raw: None,
};

/// Builds the element of a structure.
pub struct XmlStructEncoder {
    stack: Vec<XmlNode>,
    root: Option<XmlNode>,
}

impl Default for XmlStructEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlStructEncoder {
    pub fn new() -> Self {
        XmlStructEncoder {
            stack: Vec::new(),
            root: None,
        }
    }

    /// Returns the encoded structure.
    pub fn into_node(self) -> EncodingResult<XmlNode> {
        if !self.stack.is_empty() {
            return Err(EncodingError::encoding("structure was not completed"));
        }
        self.root
            .ok_or_else(|| EncodingError::encoding("no structure was encoded"))
    }

    fn put(&mut self, node: XmlNode) {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.add_child(node);
            }
            None => self.root = Some(node),
        }
    }

    fn close(&mut self) -> EncodingResult<()> {
        let node = self
            .stack
            .pop()
            .ok_or_else(|| EncodingError::encoding("unbalanced structure"))?;
        self.put(node);
        Ok(())
    }
}

impl super::StructEncoder for XmlStructEncoder {
    fn begin_struct(&mut self, name: &str, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.stack.push(XmlNode::new(name));
        Ok(())
    }

    fn end_struct(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.close()
    }

    fn write_switch(&mut self, name: &str, value: u32, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.put(XmlNode::with_text(name, value.to_string()));
        Ok(())
    }

    fn write_scalar(
        &mut self,
        name: &str,
        kind: VariantTypeId,
        value: &Variant,
        ctx: &Context<'_>,
    ) -> EncodingResult<()> {
        let mut node = XmlNode::new(name);
        if kind == VariantTypeId::Variant {
            value.encode_xml(&mut node, ctx)?;
        } else {
            xml::encode_value(value, &mut node, ctx)?;
        }
        self.put(node);
        Ok(())
    }

    fn write_enum(
        &mut self,
        name: &str,
        value: i32,
        descriptor: &EnumDescriptor,
        _ctx: &Context<'_>,
    ) -> EncodingResult<()> {
        let text = match descriptor.name_of(value) {
            Some(value_name) => format!("{}_{}", value_name, value),
            None => value.to_string(),
        };
        self.put(XmlNode::with_text(name, text));
        Ok(())
    }

    fn write_null_array(&mut self, name: &str, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.put(XmlNode::nil(name));
        Ok(())
    }

    fn begin_array(&mut self, name: &str, _len: usize, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.stack.push(XmlNode::new(name));
        Ok(())
    }

    fn end_array(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.close()
    }

    fn begin_matrix(
        &mut self,
        name: &str,
        dimensions: &[u32],
        _ctx: &Context<'_>,
    ) -> EncodingResult<()> {
        let mut matrix = XmlNode::new(name);
        let node = matrix.add_child(XmlNode::new(DIMENSIONS));
        for dimension in dimensions {
            node.add_child(XmlNode::with_text(
                VariantTypeId::Int32.name(),
                dimension.to_string(),
            ));
        }
        self.stack.push(matrix);
        self.stack.push(XmlNode::new(ELEMENTS));
        Ok(())
    }

    fn end_matrix(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        // Elements then the matrix itself
        self.close()?;
        self.close()
    }
}

enum DecoderFrame<'n> {
    Struct(&'n XmlNode),
    List(&'n [XmlNode], usize),
}

/// Reads a structure from its element.
pub struct XmlStructDecoder<'n> {
    root: &'n XmlNode,
    stack: Vec<DecoderFrame<'n>>,
}

impl<'n> XmlStructDecoder<'n> {
    pub fn new(root: &'n XmlNode) -> Self {
        XmlStructDecoder {
            root,
            stack: Vec::new(),
        }
    }

    /// The named child of the enclosing structure, or the next item of the enclosing array.
    fn next(&mut self, name: &str) -> Option<&'n XmlNode> {
        match self.stack.last_mut() {
            Some(DecoderFrame::Struct(node)) => {
                let node: &'n XmlNode = *node;
                node.child(name)
            }
            Some(DecoderFrame::List(items, index)) => {
                let items: &'n [XmlNode] = *items;
                let item = items.get(*index);
                *index += 1;
                item
            }
            None => Some(self.root),
        }
    }

    fn pop(&mut self) -> EncodingResult<()> {
        self.stack
            .pop()
            .map(|_| ())
            .ok_or_else(|| EncodingError::decoding("unbalanced structure"))
    }
}

fn decode_or_nil<T: XmlEncoder>(node: Option<&XmlNode>, name: &str, ctx: &Context<'_>) -> EncodingResult<T> {
    match node {
        Some(node) => T::decode_xml(node, ctx),
        None => T::decode_xml(&XmlNode::nil(name), ctx),
    }
}

impl<'n> super::StructDecoder for XmlStructDecoder<'n> {
    fn enter_struct(&mut self, name: &str, _ctx: &Context<'_>) -> EncodingResult<()> {
        let node = match self.next(name) {
            Some(node) if !node.is_nil() => node,
            _ => &EMPTY,
        };
        self.stack.push(DecoderFrame::Struct(node));
        Ok(())
    }

    fn leave_struct(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.pop()
    }

    fn read_switch(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<u32> {
        let node = self.next(name);
        decode_or_nil::<u32>(node, name, ctx).map_err(|e| e.with_field(name))
    }

    fn read_scalar(
        &mut self,
        name: &str,
        kind: VariantTypeId,
        ctx: &Context<'_>,
    ) -> EncodingResult<Variant> {
        let node = self.next(name);
        if kind == VariantTypeId::Variant {
            decode_or_nil::<Variant>(node, name, ctx)
        } else {
            match node {
                Some(node) => xml::decode_value(kind, node, ctx),
                None => xml::decode_value(kind, &XmlNode::nil(name), ctx),
            }
        }
    }

    fn read_enum(
        &mut self,
        name: &str,
        descriptor: &EnumDescriptor,
        _ctx: &Context<'_>,
    ) -> EncodingResult<i32> {
        let node = match self.next(name) {
            Some(node) => node,
            None => return Ok(0),
        };
        // Enumerations are written as Name_Value, the value wins over the name
        let text = node.text().trim();
        if text.is_empty() {
            return Ok(0);
        }
        let value = match text.rsplit_once('_') {
            Some((value_name, value)) => value
                .parse::<i32>()
                .ok()
                .or_else(|| descriptor.value_of(value_name)),
            None => text
                .parse::<i32>()
                .ok()
                .or_else(|| descriptor.value_of(text)),
        };
        value.ok_or_else(|| xml::unexpected(&format!("a value of {}", descriptor.name), node))
    }

    fn enter_array(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<Option<usize>> {
        match self.next(name) {
            Some(node) if !node.is_nil() => {
                ctx.options().check_array_length(node.children.len())?;
                self.stack
                    .push(DecoderFrame::List(node.children.as_slice(), 0));
                Ok(Some(node.children.len()))
            }
            _ => Ok(None),
        }
    }

    fn leave_array(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.pop()
    }

    fn enter_matrix(&mut self, name: &str, ctx: &Context<'_>) -> EncodingResult<Option<Vec<u32>>> {
        let node = match self.next(name) {
            Some(node) if !node.is_nil() => node,
            _ => return Ok(None),
        };
        let dimension_nodes = node.child(DIMENSIONS).map(|d| d.children.as_slice()).unwrap_or(&[]);
        ctx.options().check_array_length(dimension_nodes.len())?;
        let dimensions = dimension_nodes
            .iter()
            .map(|d| match i32::decode_xml(d, ctx)? {
                d if d > 0 => Ok(d as u32),
                d => {
                    error!("Matrix dimension {} is invalid", d);
                    Err(EncodingError::decoding(format!(
                        "invalid matrix dimension {}",
                        d
                    )))
                }
            })
            .collect::<EncodingResult<Vec<u32>>>()?;
        let elements = node.child(ELEMENTS).map(|e| e.children.as_slice()).unwrap_or(&[]);
        let len = super::matrix_length(&dimensions, ctx)?;
        if len != elements.len() {
            error!(
                "Matrix dimensions {:?} do not match {} elements",
                dimensions,
                elements.len()
            );
            return Err(EncodingError::decoding(format!(
                "matrix dimensions {:?} do not match {} elements",
                dimensions,
                elements.len()
            )));
        }
        self.stack.push(DecoderFrame::List(elements, 0));
        Ok(Some(dimensions))
    }

    fn leave_matrix(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.pop()
    }
}
