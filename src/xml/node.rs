// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains `XmlNode`, an owned XML element tree.

use std::fmt::Write;

use regex::Regex;

use crate::{constants, encoding::*};

lazy_static! {
    /// Namespace declarations of a start tag, the prefix is empty for the default namespace.
    static ref XMLNS_DECLARATION: Regex = Regex::new(r"\sxmlns(?::([^\s=]+))?\s*=").unwrap();
}

/// Attribute that marks a null value or null array.
pub const XSI_NIL: &str = "xsi:nil";

/// An XML element with its attributes, child elements and text. Element names are local names,
/// the only namespaced attribute kept is `xsi:nil`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    /// The text of an element without child elements.
    pub text: Option<String>,
    /// Source markup of an element from a foreign namespace. It is written out verbatim in place
    /// of the element, so namespaces and prefixes the tree does not model survive a round trip.
    pub raw: Option<String>,
}

impl XmlNode {
    pub fn new<T: Into<String>>(name: T) -> XmlNode {
        XmlNode {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_text<T: Into<String>, V: Into<String>>(name: T, text: V) -> XmlNode {
        XmlNode {
            name: name.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// An element marked `xsi:nil="true"`.
    pub fn nil<T: Into<String>>(name: T) -> XmlNode {
        let mut node = XmlNode::new(name);
        node.set_nil();
        node
    }

    pub fn set_nil(&mut self) {
        if !self.is_nil() {
            self.attributes.push((XSI_NIL.to_string(), "true".to_string()));
        }
    }

    pub fn is_nil(&self) -> bool {
        self.attribute(XSI_NIL) == Some("true")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The first child element with the name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn add_child(&mut self, child: XmlNode) -> &mut XmlNode {
        self.children.push(child);
        // The child was just pushed so the vec cannot be empty
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// The text of the element, empty when it has none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Parses a document and returns its root element.
    pub fn parse(xml: &str) -> EncodingResult<XmlNode> {
        let document = roxmltree::Document::parse(xml).map_err(|err| {
            error!("Cannot parse XML document, {}", err);
            EncodingError::decoding(format!("invalid XML: {}", err))
        })?;
        Ok(Self::from_roxmltree(document.root_element(), xml, false))
    }

    fn from_roxmltree(element: roxmltree::Node<'_, '_>, source: &str, in_foreign: bool) -> XmlNode {
        let foreign = is_foreign(element);
        let raw = if foreign && !in_foreign {
            Some(foreign_markup(element, source))
        } else {
            None
        };
        let attributes = element
            .attributes()
            .map(|a| {
                let name = if a.namespace() == Some(constants::XML_SCHEMA_INSTANCE_NAMESPACE) {
                    format!("xsi:{}", a.name())
                } else {
                    a.name().to_string()
                };
                (name, a.value().to_string())
            })
            .collect();
        let children: Vec<XmlNode> = element
            .children()
            .filter(|c| c.is_element())
            .map(|c| Self::from_roxmltree(c, source, in_foreign || foreign))
            .collect();
        let text = if children.is_empty() {
            let text: String = element.children().filter_map(|c| c.text()).collect();
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        } else {
            None
        };
        XmlNode {
            name: element.tag_name().name().to_string(),
            attributes,
            children,
            text,
            raw,
        }
    }

    /// Writes the element as a document whose root declares the OPC UA types namespace.
    pub fn to_document(&self) -> String {
        let mut root = self.clone();
        root.attributes.insert(
            0,
            (
                "xmlns:xsi".to_string(),
                constants::XML_SCHEMA_INSTANCE_NAMESPACE.to_string(),
            ),
        );
        root.attributes.insert(
            0,
            (
                "xmlns".to_string(),
                constants::OPC_UA_TYPES_XML_NAMESPACE.to_string(),
            ),
        );
        let mut out = String::new();
        root.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        if let Some(ref raw) = self.raw {
            out.push_str(raw);
            return;
        }
        let _ = write!(out, "<{}", self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(ref text) = self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write(out);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

/// An element in a namespace other than the OPC UA types namespace. Elements without a namespace
/// are treated as OPC UA elements.
fn is_foreign(element: roxmltree::Node<'_, '_>) -> bool {
    matches!(element.tag_name().namespace(), Some(ns) if ns != constants::OPC_UA_TYPES_XML_NAMESPACE)
}

/// The markup of the element as it appears in the source. Namespaces the element uses but
/// inherits from its ancestors are declared on its start tag so the markup stands on its own.
fn foreign_markup(element: roxmltree::Node<'_, '_>, source: &str) -> String {
    let markup = &source[element.range()];
    let start_tag = &markup[..start_tag_len(markup)];
    let declared: Vec<&str> = XMLNS_DECLARATION
        .captures_iter(start_tag)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .collect();

    let mut used = Vec::new();
    for node in element.descendants().filter(|n| n.is_element()) {
        used.extend(node.tag_name().namespace());
        used.extend(node.attributes().filter_map(|a| a.namespace()));
    }

    let mut declarations = String::new();
    for namespace in element.namespaces() {
        let prefix = namespace.name().unwrap_or("");
        if prefix == "xml" || declared.contains(&prefix) || !used.contains(&namespace.uri()) {
            continue;
        }
        let _ = match namespace.name() {
            Some(prefix) => write!(
                declarations,
                " xmlns:{}=\"{}\"",
                prefix,
                escape(namespace.uri())
            ),
            None => write!(declarations, " xmlns=\"{}\"", escape(namespace.uri())),
        };
    }
    if declarations.is_empty() {
        return markup.to_string();
    }
    // Declarations go straight after the element name
    let name_len = markup[1..]
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .map_or(markup.len(), |i| i + 1);
    format!("{}{}{}", &markup[..name_len], declarations, &markup[name_len..])
}

/// Length of the start tag at the beginning of the markup. A `>` inside a quoted attribute
/// value does not end the tag.
fn start_tag_len(markup: &str) -> usize {
    let mut quote = None;
    for (i, c) in markup.char_indices() {
        match (quote, c) {
            (None, '"') | (None, '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return i + 1,
            _ => {}
        }
    }
    markup.len()
}

/// Escapes the characters XML reserves.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
