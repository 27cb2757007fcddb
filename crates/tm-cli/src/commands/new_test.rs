use super::*;
use tempfile::TempDir;
use tm_core::list_migrations;
use tm_migrate::{declarative::MigrationSpec, FileMigration};

#[test]
fn test_creates_parseable_yaml_unit() {
    let dir = TempDir::new().unwrap();
    let migrations = dir.path().join("migrations");

    let path = create_migration(&migrations, "users_collection_migration", NewFormat::Yml, 1591998925)
        .unwrap();
    assert_eq!(
        path.file_name().unwrap(),
        "1591998925_users_collection_migration.yml"
    );

    let files = list_migrations(&migrations).unwrap();
    assert_eq!(files.len(), 1);
    let unit = FileMigration::load(&files[0], "datastore").unwrap();
    let spec: &MigrationSpec = unit.spec();
    assert_eq!(spec.description.as_deref(), Some("users_collection_migration"));
    assert!(spec.up.is_empty());
}

#[test]
fn test_creates_parseable_json_unit() {
    let dir = TempDir::new().unwrap();
    let path = create_migration(dir.path(), "orders", NewFormat::Json, 42).unwrap();
    assert!(path.ends_with("42_orders.json"));

    let files = list_migrations(dir.path()).unwrap();
    assert!(FileMigration::load(&files[0], "datastore").is_ok());
}

#[test]
fn test_rejects_invalid_slug() {
    let dir = TempDir::new().unwrap();
    assert!(create_migration(dir.path(), "has space", NewFormat::Yml, 1).is_err());
    assert!(create_migration(dir.path(), "", NewFormat::Yml, 1).is_err());
}

#[test]
fn test_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    create_migration(dir.path(), "users", NewFormat::Yml, 7).unwrap();
    let err = create_migration(dir.path(), "users", NewFormat::Yml, 7).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}
