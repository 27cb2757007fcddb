//! Default seed manifest.
//!
//! The manifest is a small JSON (or YAML) document with a single recognized
//! field:
//!
//! ```json
//! { "seeders": ["user_seeder", "orders_seeder.json"] }
//! ```
//!
//! The order of `seeders` is the execution order. Entries are kept as
//! written; each one is validated as a [`SeedName`](crate::SeedName) when it
//! is applied, so a bad entry only affects itself.

use crate::error::{CoreError, CoreResult};
use crate::format::UnitFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered list of seeds applied by default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeedManifest {
    pub seeders: Vec<String>,
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    seeders: Option<Vec<String>>,
}

impl SeedManifest {
    /// Load the manifest at `path`.
    ///
    /// Fails with [`CoreError::ManifestNotFound`] when the path is absent or
    /// not a regular file, [`CoreError::ManifestMalformed`] when it cannot be
    /// parsed, and [`CoreError::ManifestMissingSeeders`] when the `seeders`
    /// field is absent.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let not_found = || CoreError::ManifestNotFound {
            path: path.display().to_string(),
        };
        let meta = std::fs::symlink_metadata(path).map_err(|_| not_found())?;
        if !meta.is_file() {
            return Err(not_found());
        }

        // Anything that is not YAML by extension is read as JSON.
        let format = match UnitFormat::from_path(path) {
            Some(UnitFormat::Yaml) => UnitFormat::Yaml,
            _ => UnitFormat::Json,
        };
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        let raw: RawManifest =
            format
                .parse(&content)
                .map_err(|e| CoreError::ManifestMalformed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;

        match raw.seeders {
            Some(seeders) => Ok(Self { seeders }),
            None => Err(CoreError::ManifestMissingSeeders {
                path: path.display().to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.seeders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeders.is_empty()
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
