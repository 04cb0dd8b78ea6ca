// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for model persistence.
use std::path::PathBuf;

use hydronet_core::{ConfigError, NetworkError};
use hydronet_schema::SchemaError;
use thiserror::Error;

use crate::store::StoreError;

/// Failure to write or read a model.
#[derive(Debug, Error)]
pub enum IoError {
    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A table blob is not a JSON array of objects.
    #[error("{key}: {source}")]
    Json {
        /// Store key of the blob.
        key: String,
        /// Parser error.
        source: serde_json::Error,
    },
    /// The manifest could not be parsed.
    #[error("manifest: {0}")]
    ManifestDecode(#[from] toml::de::Error),
    /// The manifest could not be rendered.
    #[error("manifest: {0}")]
    ManifestEncode(#[from] toml::ser::Error),
    /// The manifest blob is not UTF-8.
    #[error("manifest: {0}")]
    ManifestEncoding(#[from] std::string::FromUtf8Error),
    /// Manifest paths must name a `.toml` file.
    #[error("model path must end in .toml, got {}", .0.display())]
    ManifestPath(PathBuf),
    /// A row that cannot become a node or edge.
    #[error("{key}: {message}")]
    InvalidRecord {
        /// Store key of the table.
        key: String,
        /// What is wrong.
        message: String,
    },
    /// The network is invalid or could not be rebuilt.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// A table does not match its schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Invalid global settings.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
