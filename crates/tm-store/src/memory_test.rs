use super::*;
use serde_json::json;

const DB: &str = "datastore";

fn doc(v: Value) -> Document {
    v.as_object().unwrap().clone()
}

#[tokio::test]
async fn test_in_memory() {
    let store = MemoryStore::in_memory();
    assert_eq!(store.store_type(), "memory");
    assert!(store.list_collections(DB).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_new_handles_memory_path() {
    let store = MemoryStore::new(MEMORY_STORE).unwrap();
    assert!(store.snapshot.is_none());
}

#[tokio::test]
async fn test_create_and_drop_collection() {
    let store = MemoryStore::in_memory();
    store.create_collection(DB, "users").await.unwrap();
    assert!(store.collection_exists(DB, "users").await.unwrap());

    let err = store.create_collection(DB, "users").await.unwrap_err();
    assert!(matches!(err, StoreError::CollectionExists { .. }));

    store.drop_collection(DB, "users").await.unwrap();
    assert!(!store.collection_exists(DB, "users").await.unwrap());

    let err = store.drop_collection(DB, "users").await.unwrap_err();
    assert!(matches!(err, StoreError::CollectionNotFound { .. }));
}

#[tokio::test]
async fn test_databases_are_isolated() {
    let store = MemoryStore::in_memory();
    store.create_collection("a", "users").await.unwrap();
    assert!(!store.collection_exists("b", "users").await.unwrap());
    assert_eq!(store.list_collections("a").await.unwrap(), vec!["users"]);
}

#[tokio::test]
async fn test_insert_creates_collection_and_assigns_id() {
    let store = MemoryStore::in_memory();
    store
        .insert_one(DB, "users", doc(json!({"name": "Mocky Mockery"})))
        .await
        .unwrap();

    assert!(store.collection_exists(DB, "users").await.unwrap());
    let docs = store.find(DB, "users", &Filter::all()).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert!(docs[0].get(ID_FIELD).is_some_and(Value::is_string));
}

#[tokio::test]
async fn test_duplicate_id_rejected() {
    let store = MemoryStore::in_memory();
    store
        .insert_one(DB, "users", doc(json!({"_id": 1})))
        .await
        .unwrap();
    let err = store
        .insert_one(DB, "users", doc(json!({"_id": 1})))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { ref index, .. } if index == "_id"));
}

#[tokio::test]
async fn test_unique_index_enforced() {
    let store = MemoryStore::in_memory();
    store.create_collection(DB, "users").await.unwrap();
    store
        .create_index(DB, "users", IndexSpec::new(["email"]).unique(true))
        .await
        .unwrap();

    store
        .insert_one(DB, "users", doc(json!({"email": "test@gmail.com"})))
        .await
        .unwrap();
    let err = store
        .insert_one(DB, "users", doc(json!({"email": "test@gmail.com"})))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { ref index, .. } if index == "email_1"));
    assert_eq!(store.count(DB, "users", &Filter::all()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_index_is_idempotent_but_detects_conflicts() {
    let store = MemoryStore::in_memory();
    let idx = IndexSpec::new(["email"]).unique(true);
    store.create_index(DB, "users", idx.clone()).await.unwrap();
    store.create_index(DB, "users", idx).await.unwrap();
    assert_eq!(store.list_indexes(DB, "users").await.unwrap().len(), 1);

    let err = store
        .create_index(DB, "users", IndexSpec::new(["email"]))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::IndexConflict { .. }));
}

#[tokio::test]
async fn test_unique_index_over_duplicates_fails() {
    let store = MemoryStore::in_memory();
    store
        .insert_many(
            DB,
            "users",
            vec![doc(json!({"email": "a"})), doc(json!({"email": "a"}))],
        )
        .await
        .unwrap();

    let err = store
        .create_index(DB, "users", IndexSpec::new(["email"]).unique(true))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { .. }));
    assert!(store.list_indexes(DB, "users").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_insert_many_is_all_or_nothing() {
    let store = MemoryStore::in_memory();
    store
        .create_index(DB, "users", IndexSpec::new(["email"]).unique(true))
        .await
        .unwrap();

    let err = store
        .insert_many(
            DB,
            "users",
            vec![
                doc(json!({"email": "a"})),
                doc(json!({"email": "b"})),
                doc(json!({"email": "a"})),
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { .. }));
    assert_eq!(store.count(DB, "users", &Filter::all()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_update_delete() {
    let store = MemoryStore::in_memory();
    store
        .insert_many(
            DB,
            "orders",
            vec![
                doc(json!({"status": "open", "total": 10})),
                doc(json!({"status": "open", "total": 20})),
                doc(json!({"status": "closed", "total": 30})),
            ],
        )
        .await
        .unwrap();

    let open = Filter::eq("status", "open");
    assert_eq!(store.count(DB, "orders", &open).await.unwrap(), 2);

    let mut set = Document::new();
    set.insert("status".to_string(), json!("archived"));
    let updated = store.update_many(DB, "orders", &open, set).await.unwrap();
    assert_eq!(updated, 2);
    assert_eq!(store.count(DB, "orders", &open).await.unwrap(), 0);

    let deleted = store
        .delete_many(DB, "orders", &Filter::eq("status", "archived"))
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let rest = store.find(DB, "orders", &Filter::all()).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0]["total"], json!(30));
}

#[tokio::test]
async fn test_update_cannot_break_unique_index() {
    let store = MemoryStore::in_memory();
    store
        .create_index(DB, "users", IndexSpec::new(["email"]).unique(true))
        .await
        .unwrap();
    store
        .insert_many(
            DB,
            "users",
            vec![doc(json!({"email": "a"})), doc(json!({"email": "b"}))],
        )
        .await
        .unwrap();

    let mut set = Document::new();
    set.insert("email".to_string(), json!("a"));
    let err = store
        .update_many(DB, "users", &Filter::eq("email", "b"), set)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { .. }));
    assert_eq!(
        store
            .count(DB, "users", &Filter::eq("email", "b"))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_reads_on_missing_collection_are_empty() {
    let store = MemoryStore::in_memory();
    assert!(store.find(DB, "nope", &Filter::all()).await.unwrap().is_empty());
    assert_eq!(store.count(DB, "nope", &Filter::all()).await.unwrap(), 0);
    assert_eq!(
        store
            .delete_many(DB, "nope", &Filter::all())
            .await
            .unwrap(),
        0
    );
    assert!(store.list_indexes(DB, "nope").await.is_err());
}

#[tokio::test]
async fn test_drop_index() {
    let store = MemoryStore::in_memory();
    store
        .create_index(DB, "users", IndexSpec::new(["email"]))
        .await
        .unwrap();
    store.drop_index(DB, "users", "email_1").await.unwrap();
    let err = store.drop_index(DB, "users", "email_1").await.unwrap_err();
    assert!(matches!(err, StoreError::IndexNotFound { .. }));
}

#[tokio::test]
async fn test_snapshot_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target").join("store.json");

    {
        let store = MemoryStore::open(&path).unwrap();
        store.create_collection(DB, "users").await.unwrap();
        store
            .insert_one(DB, "users", doc(json!({"email": "test@gmail.com"})))
            .await
            .unwrap();
    }
    assert!(path.exists());

    let reopened = MemoryStore::open(&path).unwrap();
    assert!(reopened.collection_exists(DB, "users").await.unwrap());
    assert_eq!(
        reopened
            .count(DB, "users", &Filter::eq("email", "test@gmail.com"))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_corrupt_snapshot_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "not json").unwrap();
    let err = MemoryStore::open(&path).err().unwrap();
    assert!(matches!(err, StoreError::ConnectionError(_)));
}
