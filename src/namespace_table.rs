// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the `NamespaceTable`.

use std::collections::HashMap;

use crate::{
    constants,
    encoding::{EncodingError, EncodingResult},
};

/// The ordered list of namespace uris a message's namespace indices refer to. Index 0 is always
/// the OPC UA namespace and cannot be replaced.
///
/// Tables belong to one peer or one message; indices are only meaningful against the table they
/// came from, and `translate` moves an index from one table to another through its uri.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceTable {
    uris: Vec<String>,
    indices: HashMap<String, u16>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTable {
    /// Creates a table holding only the OPC UA namespace.
    pub fn new() -> NamespaceTable {
        let mut table = NamespaceTable {
            uris: Vec::new(),
            indices: HashMap::new(),
        };
        table.push(constants::OPC_UA_NAMESPACE_URI);
        table
    }

    /// Creates a table from the uris that follow the OPC UA namespace, i.e. the first uri gets
    /// index 1.
    pub fn with_uris<T, I>(uris: I) -> EncodingResult<NamespaceTable>
    where
        T: AsRef<str>,
        I: IntoIterator<Item = T>,
    {
        let mut table = NamespaceTable::new();
        for uri in uris {
            table.add(uri.as_ref())?;
        }
        Ok(table)
    }

    /// Adds a uri to the table, returning its index. A uri already in the table keeps its
    /// existing index.
    pub fn add(&mut self, uri: &str) -> EncodingResult<u16> {
        if let Some(index) = self.index_of(uri) {
            Ok(index)
        } else if self.uris.len() > u16::MAX as usize {
            Err(EncodingError::remap(format!(
                "namespace table is full, cannot add {}",
                uri
            )))
        } else {
            Ok(self.push(uri))
        }
    }

    fn push(&mut self, uri: &str) -> u16 {
        let index = self.uris.len() as u16;
        self.uris.push(uri.to_string());
        self.indices.insert(uri.to_string(), index);
        index
    }

    /// Returns the index of the uri.
    pub fn index_of(&self, uri: &str) -> Option<u16> {
        self.indices.get(uri).copied()
    }

    /// Returns the uri at the index.
    pub fn uri(&self, index: u16) -> Option<&str> {
        self.uris.get(index as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    pub fn uris(&self) -> &[String] {
        &self.uris
    }

    /// Maps an index in `from` to the index of the same uri in `to`.
    pub fn translate(index: u16, from: &NamespaceTable, to: &NamespaceTable) -> EncodingResult<u16> {
        if index == 0 {
            return Ok(0);
        }
        let uri = from.uri(index).ok_or_else(|| {
            EncodingError::remap(format!("namespace index {} is not in the source table", index))
        })?;
        to.index_of(uri).ok_or_else(|| {
            EncodingError::remap(format!(
                "namespace uri {} is not in the target table",
                uri
            ))
        })
    }
}
