//! File formats accepted for unit files and manifests.

use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Extension appended to seed names given without one.
pub const DEFAULT_UNIT_EXTENSION: &str = "yml";

/// Serialization format of a unit or manifest file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFormat {
    Yaml,
    Json,
}

impl UnitFormat {
    /// Detect the format from a path's extension.
    ///
    /// Returns `None` for anything other than `yml`, `yaml`, or `json`.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Some(UnitFormat::Yaml),
            Some("json") => Some(UnitFormat::Json),
            _ => None,
        }
    }

    /// Canonical file extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            UnitFormat::Yaml => "yml",
            UnitFormat::Json => "json",
        }
    }

    /// Deserialize `content` in this format.
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> CoreResult<T> {
        match self {
            UnitFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            UnitFormat::Json => Ok(serde_json::from_str(content)?),
        }
    }

    /// Read and deserialize the file at `path`, picking the format from its extension.
    pub fn load<T: DeserializeOwned>(path: &Path) -> CoreResult<T> {
        let format = Self::from_path(path).ok_or_else(|| CoreError::UnsupportedFormat {
            path: path.display().to_string(),
        })?;
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        format.parse(&content)
    }
}
