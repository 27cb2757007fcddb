use super::*;
use serde_json::json;
use tempfile::TempDir;
use tm_store::MemoryStore;

const USERS_MIGRATION: &str = r#"
description: Users collection with a unique email index
up:
  - op: create_collection
    collection: users
  - op: create_index
    collection: users
    keys: [email]
    unique: true
down:
  - op: drop_collection
    collection: users
"#;

fn write_migration(dir: &Path, name: &str, content: &str) -> MigrationFile {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    let stem = path.file_stem().unwrap().to_str().unwrap();
    MigrationFile {
        id: MigrationId::parse(stem).unwrap(),
        format: UnitFormat::from_path(&path).unwrap(),
        path,
    }
}

#[test]
fn test_parse_operations() {
    let ops: Vec<Operation> = serde_json::from_value(json!([
        {"op": "create_collection", "collection": "users"},
        {"op": "create_index", "collection": "users", "keys": ["email"], "unique": true},
        {"op": "insert", "collection": "users", "documents": [{"email": "a"}]},
        {"op": "update", "collection": "users", "filter": {"email": "a"}, "set": {"name": "A"}},
        {"op": "delete", "collection": "users", "filter": {}},
        {"op": "drop_index", "collection": "users", "name": "email_1", "database": "other"},
    ]))
    .unwrap();

    assert_eq!(ops.len(), 6);
    assert_eq!(ops[1].describe(), "create_index users");
    assert_eq!(ops[5].database_override(), Some("other"));
    assert_eq!(ops[0].database_override(), None);
}

#[test]
fn test_unknown_operation_rejected() {
    let result: Result<Operation, _> =
        serde_json::from_value(json!({"op": "rename_collection", "collection": "users"}));
    assert!(result.is_err());
}

#[test]
fn test_load_migration_file() {
    let dir = TempDir::new().unwrap();
    let file = write_migration(dir.path(), "1591998925_users.yml", USERS_MIGRATION);

    let unit = FileMigration::load(&file, "datastore").unwrap();
    assert_eq!(unit.id.as_str(), "1591998925_users");
    assert_eq!(
        unit.description(),
        Some("Users collection with a unique email index")
    );
    assert_eq!(unit.spec().up.len(), 2);
    assert_eq!(unit.spec().down.len(), 1);
}

#[test]
fn test_invalid_migration_file() {
    let dir = TempDir::new().unwrap();
    let file = write_migration(dir.path(), "1_broken.json", r#"{"down": []}"#);

    let err = FileMigration::load(&file, "datastore").unwrap_err();
    assert!(matches!(err, MigrateError::InvalidUnit { .. }));
}

#[tokio::test]
async fn test_up_then_down_leaves_collection_absent() {
    let dir = TempDir::new().unwrap();
    let file = write_migration(dir.path(), "1_users.yml", USERS_MIGRATION);
    let unit = FileMigration::load(&file, "datastore").unwrap();
    let store = MemoryStore::in_memory();

    assert!(unit.up(&store).await.unwrap());
    assert!(store.collection_exists("datastore", "users").await.unwrap());
    let indexes = store.list_indexes("datastore", "users").await.unwrap();
    assert_eq!(indexes, vec![IndexSpec::new(["email"]).unique(true)]);

    assert!(unit.down(&store).await.unwrap());
    assert!(!store.collection_exists("datastore", "users").await.unwrap());
}

#[tokio::test]
async fn test_file_database_overrides_default() {
    let dir = TempDir::new().unwrap();
    let file = write_migration(
        dir.path(),
        "2_audit.json",
        r#"{"database": "audit", "up": [{"op": "create_collection", "collection": "events"}]}"#,
    );
    let unit = FileMigration::load(&file, "datastore").unwrap();
    let store = MemoryStore::in_memory();

    unit.up(&store).await.unwrap();
    assert!(store.collection_exists("audit", "events").await.unwrap());
    assert!(!store.collection_exists("datastore", "events").await.unwrap());
}

#[tokio::test]
async fn test_failing_step_reports_position() {
    let dir = TempDir::new().unwrap();
    let file = write_migration(
        dir.path(),
        "3_dup.yml",
        r#"
up:
  - op: create_collection
    collection: users
  - op: create_collection
    collection: users
"#,
    );
    let unit = FileMigration::load(&file, "datastore").unwrap();
    let store = MemoryStore::in_memory();

    let err = unit.up(&store).await.unwrap_err();
    assert!(err.to_string().contains("step 2 (create_collection users)"));
}

#[tokio::test]
async fn test_file_seed_runs_steps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("user_seeder.yml");
    std::fs::write(
        &path,
        r#"
steps:
  - op: insert
    collection: users
    documents:
      - name: Mocky Mockery
        email: test@gmail.com
"#,
    )
    .unwrap();

    let seed = FileSeed::load(&path, "datastore").unwrap();
    let store = MemoryStore::in_memory();
    seed.run(&store).await.unwrap();
    seed.run(&store).await.unwrap();

    let count = store
        .count("datastore", "users", &Filter::eq("email", "test@gmail.com"))
        .await
        .unwrap();
    assert_eq!(count, 2);
}
