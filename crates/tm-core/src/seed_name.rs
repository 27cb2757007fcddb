//! Strongly-typed seed name.
//!
//! A seed name is either a bare identifier (`user_seeder`) or a file name
//! with an extension (`user_seeder.json`). It may name a file in a
//! subdirectory of the seeders directory but may never escape it.

use crate::format::DEFAULT_UNIT_EXTENSION;
use crate::newtype_string::define_newtype_string;
use std::path::{Component, Path, PathBuf};

define_newtype_string! {
    /// A seed identifier as written in the manifest or on the command line.
    pub struct SeedName;
    validate = validate_seed_name;
}

fn validate_seed_name(s: &str) -> Result<(), String> {
    if s.trim().is_empty() {
        return Err("must not be empty".to_string());
    }
    let path = Path::new(s);
    if path.is_absolute() {
        return Err("must be relative to the seeders directory".to_string());
    }
    if path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err("must not leave the seeders directory".to_string());
    }
    Ok(())
}

impl SeedName {
    /// Whether the name already carries a file extension.
    pub fn has_extension(&self) -> bool {
        Path::new(self.as_str()).extension().is_some()
    }

    /// Name with any extension removed, used as the registry key.
    pub fn stem(&self) -> &str {
        match self.as_str().rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() && self.has_extension() => stem,
            _ => self.as_str(),
        }
    }

    /// Resolve the seed file inside `seed_dir`, inferring
    /// [`DEFAULT_UNIT_EXTENSION`] when the name has no extension.
    pub fn resolve(&self, seed_dir: &Path) -> PathBuf {
        if self.has_extension() {
            seed_dir.join(self.as_str())
        } else {
            seed_dir.join(format!("{}.{}", self.as_str(), DEFAULT_UNIT_EXTENSION))
        }
    }
}
