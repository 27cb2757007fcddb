//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Path value that selects a throwaway in-memory store.
pub const MEMORY_STORE: &str = ":memory:";

/// Project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Default database that unit files operate on
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding the migration ledger
    #[serde(default = "default_migration_collection")]
    pub migration_collection: String,

    /// Directory containing migration unit files
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// Directory containing seed unit files
    #[serde(default = "default_seeders_path")]
    pub seeders_path: String,

    /// Default seed manifest, relative to `seeders_path`
    #[serde(default = "default_seed_manifest")]
    pub seed_manifest: String,

    /// Document store connection settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Document store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Snapshot file of the embedded store, or `:memory:`
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_database() -> String {
    "datastore".to_string()
}

fn default_migration_collection() -> String {
    "migrations".to_string()
}

fn default_migrations_path() -> String {
    "migrations".to_string()
}

fn default_seeders_path() -> String {
    "seeders".to_string()
}

fn default_seed_manifest() -> String {
    "default.json".to_string()
}

fn default_store_path() -> String {
    "target/store.json".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("tidemark.yml");
        let yaml_path = dir.join("tidemark.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let required = [
            ("name", &self.name),
            ("database", &self.database),
            ("migration_collection", &self.migration_collection),
            ("migrations_path", &self.migrations_path),
            ("seeders_path", &self.seeders_path),
            ("seed_manifest", &self.seed_manifest),
            ("store.path", &self.store.path),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("'{}' cannot be empty", field),
                });
            }
        }
        if self.migration_collection.contains('$') {
            return Err(CoreError::ConfigInvalid {
                message: "'migration_collection' cannot contain '$'".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute migrations directory
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_path)
    }

    /// Absolute seeders directory
    pub fn seeders_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.seeders_path)
    }

    /// Absolute path of the default seed manifest
    pub fn seed_manifest_absolute(&self, root: &Path) -> PathBuf {
        self.seeders_path_absolute(root).join(&self.seed_manifest)
    }

    /// Store path to open.
    ///
    /// `override_path` (e.g. from `--store`) wins and is used as given, so a
    /// relative override stays relative to the working directory. The
    /// configured `store.path` is resolved against the project root unless it
    /// is `:memory:` or absolute.
    pub fn store_path(&self, root: &Path, override_path: Option<&str>) -> String {
        if let Some(path) = override_path {
            return path.to_string();
        }
        let path = self.store.path.as_str();
        if path == MEMORY_STORE || Path::new(path).is_absolute() {
            path.to_string()
        } else {
            root.join(path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
