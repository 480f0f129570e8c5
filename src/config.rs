// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Codec configuration that can be kept in a YAML file.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{
    constants,
    encoding::{DecodingOptions, DepthGauge, EncodingResult},
    namespace_table::NamespaceTable,
};

/// A trait that handles the loading / saving and validity of configuration information.
pub trait Config: serde::Serialize {
    fn save(&self, path: &Path) -> Result<(), ()> {
        if !self.is_valid() {
            error!("Config isn't valid and won't be saved");
            return Err(());
        }
        let s = serde_yaml::to_string(&self).map_err(|err| {
            error!("Cannot serialize configuration, error reason: {}", err);
        })?;
        let mut f = File::create(path).map_err(|err| {
            error!(
                "Cannot create the path {} to save the config, error reason: {}",
                path.to_string_lossy(),
                err
            );
        })?;
        f.write_all(s.as_bytes()).map_err(|err| {
            error!("Could not save config - error = {:?}", err);
        })
    }

    fn load<A>(path: &Path) -> Result<A, ()>
    where
        for<'de> A: Config + serde::Deserialize<'de>,
    {
        let mut f = File::open(path).map_err(|_| {
            error!("Cannot open configuration file {}", path.to_string_lossy());
        })?;
        let mut s = String::new();
        f.read_to_string(&mut s).map_err(|_| {
            error!(
                "Cannot read configuration file {} to string",
                path.to_string_lossy()
            );
        })?;
        serde_yaml::from_str(&s).map_err(|err| {
            error!(
                "Cannot deserialize configuration from {}, error reason: {}",
                path.to_string_lossy(),
                err
            );
        })
    }

    fn is_valid(&self) -> bool;
}

/// The decoding limits and namespaces of a codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum length in bytes of a string, 0 means no string is permitted
    pub max_string_length: usize,
    /// Maximum length in bytes of a byte string
    pub max_byte_string_length: usize,
    /// Maximum number of array elements
    pub max_array_length: usize,
    /// Maximum nesting of structures, variants and extension objects
    pub max_decoding_depth: usize,
    /// Milliseconds subtracted from every decoded DateTime
    #[serde(default)]
    pub client_offset_ms: i64,
    /// Namespace uris after namespace 0, the first gets index 1
    #[serde(default)]
    pub namespaces: Vec<String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_string_length: constants::MAX_STRING_LENGTH,
            max_byte_string_length: constants::MAX_BYTE_STRING_LENGTH,
            max_array_length: constants::MAX_ARRAY_LENGTH,
            max_decoding_depth: constants::MAX_DECODING_DEPTH,
            client_offset_ms: 0,
            namespaces: Vec::new(),
        }
    }
}

impl Config for CodecConfig {
    fn is_valid(&self) -> bool {
        let mut valid = true;
        if self.max_decoding_depth == 0 {
            error!("Max decoding depth must be greater than 0");
            valid = false;
        }
        if self.namespaces.iter().any(|uri| uri.is_empty()) {
            error!("Namespace uris cannot be empty");
            valid = false;
        }
        if self
            .namespaces
            .iter()
            .any(|uri| uri == constants::OPC_UA_NAMESPACE_URI)
        {
            error!("Namespace 0 is implied and cannot be listed");
            valid = false;
        }
        valid
    }
}

impl CodecConfig {
    /// The decoding options of the limits. Every call gets a gauge of its own.
    pub fn decoding_options(&self) -> DecodingOptions {
        DecodingOptions {
            client_offset: chrono::Duration::milliseconds(self.client_offset_ms),
            max_string_length: self.max_string_length,
            max_byte_string_length: self.max_byte_string_length,
            max_array_length: self.max_array_length,
            decoding_depth_gauge: Arc::new(Mutex::new(DepthGauge::new(self.max_decoding_depth))),
        }
    }

    /// The namespace table holding namespace 0 and the configured uris.
    pub fn namespace_table(&self) -> EncodingResult<NamespaceTable> {
        NamespaceTable::with_uris(&self.namespaces)
    }
}

impl From<&CodecConfig> for DecodingOptions {
    fn from(config: &CodecConfig) -> Self {
        config.decoding_options()
    }
}
