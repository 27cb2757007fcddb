//! Migration unit discovery.
//!
//! Scans a single directory (non-recursively) for migration unit files and
//! returns them sorted by [`MigrationId`]. The listing is rebuilt on every
//! call; nothing is cached between runner invocations.

use crate::error::{CoreError, CoreResult};
use crate::format::UnitFormat;
use crate::migration_id::MigrationId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A migration unit file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Identifier derived from the file name without extension
    pub id: MigrationId,

    /// Path to the unit file
    pub path: PathBuf,

    /// Format selected by the file extension
    pub format: UnitFormat,
}

/// List the migration unit files in `dir`, ascending by identifier.
///
/// Files with a unit extension (`yml`, `yaml`, `json`) whose name does not
/// follow the `<number>_<slug>` convention are skipped with a warning.
/// Subdirectories and other files are ignored. Two files mapping to the same
/// identifier are an error, as is a missing or unreadable directory.
pub fn list_migrations(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationsDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut found: BTreeMap<MigrationId, MigrationFile> = BTreeMap::new();

    for entry in entries {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();

        let file_type = entry.file_type().map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        if !file_type.is_file() {
            log::debug!(path:% = path.display(); "Ignoring non-file entry in migrations directory");
            continue;
        }

        let Some(format) = UnitFormat::from_path(&path) else {
            log::debug!(path:% = path.display(); "Ignoring file without a unit extension");
            continue;
        };

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            log::warn!(path:% = path.display(); "Skipping migration file with a non UTF-8 name");
            continue;
        };

        let id = match MigrationId::parse(stem) {
            Ok(id) => id,
            Err(e) => {
                log::warn!(path:% = path.display(), reason:% = e; "Skipping migration file that does not follow the naming convention");
                continue;
            }
        };

        if let Some(existing) = found.get(&id) {
            return Err(CoreError::DuplicateMigration {
                id: id.to_string(),
                path1: existing.path.display().to_string(),
                path2: path.display().to_string(),
            });
        }

        found.insert(id.clone(), MigrationFile { id, path, format });
    }

    Ok(found.into_values().collect())
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
