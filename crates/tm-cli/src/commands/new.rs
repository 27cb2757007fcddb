//! New command implementation

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tm_core::MigrationId;

use crate::cli::{GlobalArgs, NewArgs, NewFormat};
use crate::commands::common;

const YAML_TEMPLATE: &str = r#"description: "{slug}"
# Operations run in order by `tm migrate`. Example:
#   - op: create_collection
#     collection: users
#   - op: create_index
#     collection: users
#     keys: [email]
#     unique: true
up: []
# Operations that revert `up`; never run automatically.
down: []
"#;

const JSON_TEMPLATE: &str = r#"{
  "description": "{slug}",
  "up": [],
  "down": []
}
"#;

/// Execute the new command
pub async fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let project = common::load_project(global)?;
    let dir = project.config.migrations_path_absolute(&project.root);
    let path = create_migration(&dir, &args.slug, args.format, Utc::now().timestamp())?;
    println!("Created {}", path.display());
    Ok(())
}

/// Write `<prefix>_<slug>.<ext>` into `dir`, creating the directory if needed.
pub(crate) fn create_migration(
    dir: &Path,
    slug: &str,
    format: NewFormat,
    prefix: i64,
) -> Result<PathBuf> {
    let id = MigrationId::parse(&format!("{}_{}", prefix, slug))
        .with_context(|| format!("Invalid migration name '{}'", slug))?;
    let (ext, template) = match format {
        NewFormat::Yml => ("yml", YAML_TEMPLATE),
        NewFormat::Json => ("json", JSON_TEMPLATE),
    };
    let path = dir.join(format!("{}.{}", id, ext));
    if path.exists() {
        bail!("Migration file already exists: {}", path.display());
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    std::fs::write(&path, template.replace("{slug}", id.slug()))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!(file:% = path.display(); "Created migration");
    Ok(path)
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
