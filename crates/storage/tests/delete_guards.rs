#![forbid(unsafe_code)]

use catalog_storage::{
    Category, CreateCategoryRequest, DB_FILE_NAME, ListCategoriesRequest, SqliteStore, StoreError,
    UpdateCategoryRequest,
};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("catalog_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn create(store: &mut SqliteStore, name: &str, parent_id: Option<i64>) -> Category {
    store
        .category_create(CreateCategoryRequest {
            name: name.to_string(),
            parent_id,
            ..CreateCategoryRequest::default()
        })
        .expect("create category")
}

fn insert_product(storage_dir: &Path, category_id: i64, name: &str, is_deleted: bool) -> i64 {
    let conn = Connection::open(storage_dir.join(DB_FILE_NAME)).expect("open raw db");
    conn.execute(
        "INSERT INTO products(category_id, name, is_deleted, created_at_ms) VALUES (?1, ?2, ?3, 0)",
        params![category_id, name, i64::from(is_deleted)],
    )
    .expect("insert product");
    conn.last_insert_rowid()
}

#[test]
fn delete_with_live_children_is_refused() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let electronics = create(&mut store, "Electronics", None);
    let phones = create(&mut store, "Phones", Some(electronics.id));

    for force in [false, true] {
        let err = store
            .category_delete(electronics.id, force)
            .expect_err("has children");
        assert!(matches!(err, StoreError::HasChildren), "got {err:?}");
        assert_eq!(err.status_code(), 400);
    }

    // Soft-deleted children no longer block the parent.
    assert!(store.category_delete(phones.id, false).expect("delete child"));
    assert!(store.category_delete(electronics.id, false).expect("delete parent"));
}

#[test]
fn delete_with_live_products_is_refused() {
    let storage_dir = temp_dir("delete_with_live_products_is_refused");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let phones = create(&mut store, "Phones", None);
    let tablets = create(&mut store, "Tablets", None);

    insert_product(&storage_dir, phones.id, "Handset X", false);
    insert_product(&storage_dir, tablets.id, "Slate Y", true);

    let err = store
        .category_delete(phones.id, false)
        .expect_err("has products");
    assert!(matches!(err, StoreError::HasProducts), "got {err:?}");
    let err = store
        .category_delete(phones.id, true)
        .expect_err("has products, forced");
    assert!(matches!(err, StoreError::HasProducts), "got {err:?}");
    assert!(!store.category_get(phones.id).expect("still live").is_deleted);

    // Deleted products do not count.
    assert!(store.category_delete(tablets.id, false).expect("delete tablets"));
}

#[test]
fn soft_delete_hides_the_row_and_bumps_version() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let phones = create(&mut store, "Phones", None);

    assert!(store.category_delete(phones.id, false).expect("soft delete"));

    let err = store.category_get(phones.id).expect_err("hidden");
    assert!(matches!(err, StoreError::NotFound), "got {err:?}");

    let row = store
        .category_find(phones.id, true)
        .expect("find")
        .expect("row kept");
    assert!(row.is_deleted);
    assert_eq!(row.version, 2);
    assert_eq!(row.path, "Phones");

    // A second soft delete changes nothing.
    assert!(!store.category_delete(phones.id, false).expect("repeat delete"));
    let row = store
        .category_find(phones.id, true)
        .expect("find")
        .expect("row kept");
    assert_eq!(row.version, 2);

    let listed = store
        .category_list(ListCategoriesRequest::default())
        .expect("list");
    assert!(listed.categories.is_empty());
    let listed = store
        .category_list(ListCategoriesRequest {
            include_deleted: true,
            ..ListCategoriesRequest::default()
        })
        .expect("list with deleted");
    assert_eq!(listed.categories.len(), 1);
}

#[test]
fn hard_delete_removes_the_row() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let phones = create(&mut store, "Phones", None);
    let archived = create(&mut store, "Archived", None);
    assert!(store.category_delete(archived.id, false).expect("soft delete"));

    assert!(store.category_delete(phones.id, true).expect("hard delete"));
    assert!(store.category_find(phones.id, true).expect("find").is_none());

    // Soft-deleted rows can still be purged.
    assert!(store.category_delete(archived.id, true).expect("purge"));
    assert!(store.category_find(archived.id, true).expect("find").is_none());

    let err = store
        .category_delete(phones.id, false)
        .expect_err("already gone");
    assert!(matches!(err, StoreError::NotFound), "got {err:?}");
    assert_eq!(err.status_code(), 404);
}

#[test]
fn audit_stays_clean_across_a_mixed_workload() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let electronics = create(&mut store, "Electronics", None);
    let computers = create(&mut store, "Computers", None);
    let laptops = create(&mut store, "Laptops", Some(electronics.id));
    let gaming = create(&mut store, "Gaming", Some(laptops.id));
    let retired = create(&mut store, "Retired", Some(gaming.id));
    assert!(store.category_delete(retired.id, false).expect("soft delete"));

    store
        .category_move(laptops.id, Some(computers.id), None)
        .expect("move");
    store
        .category_move(gaming.id, None, None)
        .expect("move to root");
    assert!(store.category_delete(electronics.id, true).expect("purge empty root"));

    assert!(store.category_audit().expect("audit").is_empty());
    let retired_after = store
        .category_find(retired.id, true)
        .expect("find")
        .expect("row kept");
    assert_eq!(retired_after.path, "Gaming.Retired");
}

#[test]
fn soft_deleted_row_can_be_renamed_after_its_parent_is_purged() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let garden = create(&mut store, "Garden", None);
    let tools = create(&mut store, "Tools", Some(garden.id));

    assert!(store.category_delete(tools.id, false).expect("soft delete child"));
    assert!(store.category_delete(garden.id, true).expect("purge parent"));

    let renamed = store
        .category_update(
            tools.id,
            UpdateCategoryRequest {
                name: Some("Equipment".to_string()),
                ..UpdateCategoryRequest::default()
            },
        )
        .expect("rename orphaned row");
    assert_eq!(renamed.path, "Garden.Equipment");
    assert_eq!(renamed.parent_id, Some(garden.id));
    assert_eq!(renamed.version, 3);
    assert!(renamed.is_deleted);

    assert!(store.category_audit().expect("audit").is_empty());
}
