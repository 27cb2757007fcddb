//! Migration identifiers.
//!
//! An identifier is the unit's file name without extension and must start
//! with a numeric ordering prefix followed by a descriptive slug, e.g.
//! `1591998925_users_collection`. The prefix is compared numerically so that
//! `5_a < 20_b < 100_c` regardless of how the file system lists them.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A validated migration identifier.
///
/// Ordered by numeric prefix first, then by the full identifier string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MigrationId {
    raw: String,
    prefix: u64,
    slug_start: usize,
}

impl MigrationId {
    /// Parse and validate an identifier.
    pub fn parse(name: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidMigrationId {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let digits = name.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(invalid("must start with a numeric ordering prefix"));
        }
        let prefix: u64 = name[..digits]
            .parse()
            .map_err(|_| invalid("numeric prefix is too large"))?;

        match name.as_bytes().get(digits) {
            Some(b'_') | Some(b'-') => {}
            Some(_) => return Err(invalid("prefix must be followed by '_' or '-'")),
            None => return Err(invalid("missing descriptive slug after the prefix")),
        }

        let slug = &name[digits + 1..];
        if slug.is_empty() {
            return Err(invalid("missing descriptive slug after the prefix"));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(invalid(
                "slug may only contain ASCII letters, digits, '_' and '-'",
            ));
        }

        Ok(Self {
            raw: name.to_string(),
            prefix,
            slug_start: digits + 1,
        })
    }

    /// Numeric ordering prefix
    pub fn prefix(&self) -> u64 {
        self.prefix
    }

    /// Descriptive part after the prefix separator
    pub fn slug(&self) -> &str {
        &self.raw[self.slug_start..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for MigrationId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix
            .cmp(&other.prefix)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for MigrationId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for MigrationId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MigrationId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<MigrationId> for String {
    fn from(id: MigrationId) -> Self {
        id.raw
    }
}

impl AsRef<str> for MigrationId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
#[path = "migration_id_test.rs"]
mod tests;
