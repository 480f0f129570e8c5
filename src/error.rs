// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains `EncodingError`, the error type returned by every codec operation.

use thiserror::Error;

use crate::status_code::StatusCode;

/// Errors raised while building a type registry, encoding or decoding a value, or remapping
/// namespace indices between tables.
///
/// Decoding and encoding errors carry the path of the field being processed when the failure
/// happened, e.g. `Elements[2].FilterOperands[0]`, and the status code the failure maps to.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error("schema error: {0}")]
    Schema(String),
    #[error("decoding error{}: {message} ({status})", display_path(.path))]
    Decoding {
        status: StatusCode,
        path: String,
        message: String,
    },
    #[error("encoding error{}: {message} ({status})", display_path(.path))]
    Encoding {
        status: StatusCode,
        path: String,
        message: String,
    },
    #[error("remap error: {0}")]
    Remap(String),
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {}", path)
    }
}

/// The result of any encoding / decoding operation.
pub type EncodingResult<T> = std::result::Result<T, EncodingError>;

impl EncodingError {
    pub fn schema<T: Into<String>>(message: T) -> Self {
        EncodingError::Schema(message.into())
    }

    pub fn decoding<T: Into<String>>(message: T) -> Self {
        Self::decoding_status(StatusCode::BadDecodingError, message)
    }

    pub fn decoding_status<T: Into<String>>(status: StatusCode, message: T) -> Self {
        EncodingError::Decoding {
            status,
            path: String::new(),
            message: message.into(),
        }
    }

    pub fn encoding<T: Into<String>>(message: T) -> Self {
        Self::encoding_status(StatusCode::BadEncodingError, message)
    }

    pub fn encoding_status<T: Into<String>>(status: StatusCode, message: T) -> Self {
        EncodingError::Encoding {
            status,
            path: String::new(),
            message: message.into(),
        }
    }

    pub fn remap<T: Into<String>>(message: T) -> Self {
        EncodingError::Remap(message.into())
    }

    /// Prefixes the field path of a decoding or encoding error with `field`. Array indices are
    /// passed as `[n]` and attach to the preceding segment without a separator.
    pub fn with_field(self, field: &str) -> Self {
        match self {
            EncodingError::Decoding {
                status,
                path,
                message,
            } => EncodingError::Decoding {
                status,
                path: join_path(field, &path),
                message,
            },
            EncodingError::Encoding {
                status,
                path,
                message,
            } => EncodingError::Encoding {
                status,
                path: join_path(field, &path),
                message,
            },
            other => other,
        }
    }

    /// Returns the field path of the error, empty when the error is not tied to a field.
    pub fn path(&self) -> &str {
        match self {
            EncodingError::Decoding { path, .. } | EncodingError::Encoding { path, .. } => path,
            _ => "",
        }
    }

    /// Maps the error onto the status code reported on the wire.
    pub fn status(&self) -> StatusCode {
        match self {
            EncodingError::Schema(_) => StatusCode::BadConfigurationError,
            EncodingError::Decoding { status, .. } | EncodingError::Encoding { status, .. } => {
                *status
            }
            EncodingError::Remap(_) => StatusCode::BadNodeIdUnknown,
        }
    }

    pub fn is_decoding(&self) -> bool {
        matches!(self, EncodingError::Decoding { .. })
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, EncodingError::Encoding { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, EncodingError::Schema(_))
    }

    pub fn is_remap(&self) -> bool {
        matches!(self, EncodingError::Remap(_))
    }
}

fn join_path(field: &str, path: &str) -> String {
    if field.is_empty() {
        path.to_string()
    } else if path.is_empty() {
        field.to_string()
    } else if path.starts_with('[') {
        format!("{}{}", field, path)
    } else {
        format!("{}.{}", field, path)
    }
}

impl From<EncodingError> for StatusCode {
    fn from(err: EncodingError) -> StatusCode {
        err.status()
    }
}
