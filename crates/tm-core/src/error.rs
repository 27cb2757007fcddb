//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Migrations directory missing or not a directory
    #[error("[E004] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E005: File name does not follow the `<number>_<slug>` convention
    #[error("[E005] Invalid migration identifier '{name}': {reason}")]
    InvalidMigrationId { name: String, reason: String },

    /// E006: Two unit files resolve to the same identifier
    #[error("[E006] Duplicate migration '{id}' in {path1} and {path2}")]
    DuplicateMigration {
        id: String,
        path1: String,
        path2: String,
    },

    /// E007: Seed manifest file missing or not a regular file
    #[error("[E007] Seed manifest not found: {path}")]
    ManifestNotFound { path: String },

    /// E008: Seed manifest could not be parsed
    #[error("[E008] Malformed seed manifest {path}: {reason}")]
    ManifestMalformed { path: String, reason: String },

    /// E009: Seed manifest parsed but lacks the `seeders` list
    #[error("[E009] Seed manifest {path} is missing the 'seeders' list")]
    ManifestMissingSeeders { path: String },

    /// E010: Unit file extension is not one of yml, yaml, json
    #[error("[E010] Unsupported unit file format: {path}")]
    UnsupportedFormat { path: String },

    /// E011: IO error
    #[error("[E011] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E012: IO error with file path context
    #[error("[E012] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E013: YAML parse error
    #[error("[E013] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E014: JSON parse error
    #[error("[E014] JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
