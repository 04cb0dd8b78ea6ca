// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The TOML manifest: global settings plus the writer version.
use hydronet_core::ModelConfig;
use serde::{Deserialize, Serialize};

use crate::error::IoError;

/// Version stamped into every manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// On-disk manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Version of the writer.
    #[serde(default)]
    pub hydronet_version: String,
    /// Global settings.
    #[serde(flatten)]
    pub config: ModelConfig,
}

impl Manifest {
    /// Manifest for `config` stamped with this crate's version.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            hydronet_version: VERSION.to_owned(),
            config,
        }
    }

    /// Renders the manifest.
    pub fn to_toml(&self) -> Result<String, IoError> {
        Ok(toml::to_string(self)?)
    }

    /// Parses and checks a manifest.
    pub fn from_toml(text: &str) -> Result<Self, IoError> {
        let manifest: Self = toml::from_str(text)?;
        manifest.config.validate()?;
        Ok(manifest)
    }
}
