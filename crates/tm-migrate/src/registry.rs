//! Unit registries.
//!
//! A registry is the explicit table of units a runner iterates. It is built
//! once at process start, either from unit files on disk, from Rust types
//! registered in code, or both.

use crate::declarative::FileMigration;
use crate::error::{MigrateError, MigrateResult};
use crate::unit::{Migration, Seeder};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tm_core::{list_migrations, MigrationId, SeedName};

/// Migration units keyed by identifier, iterated in ascending identifier order
#[derive(Clone, Default)]
pub struct MigrationRegistry {
    units: BTreeMap<MigrationId, Arc<dyn Migration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the unit files in `dir`.
    pub fn discover(dir: &Path, default_database: &str) -> MigrateResult<Self> {
        let mut registry = Self::new();
        for file in list_migrations(dir)? {
            let unit = FileMigration::load(&file, default_database)?;
            registry.register(file.id, Arc::new(unit))?;
        }
        Ok(registry)
    }

    /// Add a unit; an identifier may only be registered once.
    pub fn register(&mut self, id: MigrationId, unit: Arc<dyn Migration>) -> MigrateResult<()> {
        if self.units.contains_key(&id) {
            return Err(MigrateError::DuplicateMigration(id.to_string()));
        }
        self.units.insert(id, unit);
        Ok(())
    }

    /// Builder-style [`register`](Self::register) that parses the identifier.
    pub fn with(mut self, id: &str, unit: impl Migration + 'static) -> MigrateResult<Self> {
        let id = MigrationId::parse(id)?;
        self.register(id, Arc::new(unit))?;
        Ok(self)
    }

    /// Merge another registry into this one, rejecting shared identifiers.
    pub fn extend(&mut self, other: MigrationRegistry) -> MigrateResult<()> {
        for (id, unit) in other.units {
            self.register(id, unit)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &MigrationId) -> Option<&Arc<dyn Migration>> {
        self.units.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MigrationId, &Arc<dyn Migration>)> {
        self.units.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &MigrationId> {
        self.units.keys()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.units.keys()).finish()
    }
}

/// Code-defined seeds keyed by name without extension
#[derive(Clone, Default)]
pub struct SeedRegistry {
    seeds: BTreeMap<String, Arc<dyn Seeder>>,
}

impl SeedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: SeedName, seeder: Arc<dyn Seeder>) -> MigrateResult<()> {
        let key = name.stem().to_string();
        if self.seeds.contains_key(&key) {
            return Err(MigrateError::DuplicateSeed(key));
        }
        self.seeds.insert(key, seeder);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: &str, seeder: impl Seeder + 'static) -> MigrateResult<Self> {
        let name = SeedName::try_new(name).map_err(MigrateError::InvalidSeedName)?;
        self.register(name, Arc::new(seeder))?;
        Ok(self)
    }

    /// Look up a seed; `user_seeder` and `user_seeder.yml` resolve to the same entry.
    pub fn get(&self, name: &SeedName) -> Option<&Arc<dyn Seeder>> {
        self.seeds.get(name.stem())
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

impl fmt::Debug for SeedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.seeds.keys()).finish()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
