#![forbid(unsafe_code)]

use catalog_storage::{
    CreateCategoryRequest, DB_FILE_NAME, HierarchyViolation, ListCategoriesRequest, SqliteStore,
    StoreError,
};
use rusqlite::{Connection, params};
use std::path::PathBuf;

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

fn create_root(store: &mut SqliteStore, name: &str) -> i64 {
    store
        .category_create(CreateCategoryRequest {
            name: name.to_string(),
            ..CreateCategoryRequest::default()
        })
        .expect("create category")
        .id
}

#[test]
fn list_pages_are_ordered_by_name() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    for name in ["Toys", "Books", "Garden", "Audio", "Food"] {
        create_root(&mut store, name);
    }

    let first = store
        .category_list(ListCategoriesRequest {
            page: 1,
            size: 2,
            ..ListCategoriesRequest::default()
        })
        .expect("first page");
    let names: Vec<&str> = first.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Audio", "Books"]);
    assert!(first.has_more);

    let last = store
        .category_list(ListCategoriesRequest {
            page: 3,
            size: 2,
            ..ListCategoriesRequest::default()
        })
        .expect("last page");
    let names: Vec<&str> = last.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Toys"]);
    assert!(!last.has_more);

    let beyond = store
        .category_list(ListCategoriesRequest {
            page: 9,
            size: 2,
            ..ListCategoriesRequest::default()
        })
        .expect("empty page");
    assert!(beyond.categories.is_empty());
    assert!(!beyond.has_more);
}

#[test]
fn list_filters_by_parent() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let electronics = create_root(&mut store, "Electronics");
    create_root(&mut store, "Books");
    for name in ["Phones", "Laptops"] {
        store
            .category_create(CreateCategoryRequest {
                name: name.to_string(),
                parent_id: Some(electronics),
                ..CreateCategoryRequest::default()
            })
            .expect("create child");
    }

    let page = store
        .category_list(ListCategoriesRequest {
            parent_id: Some(electronics),
            ..ListCategoriesRequest::default()
        })
        .expect("list children");
    let names: Vec<&str> = page.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Laptops", "Phones"]);
    assert_eq!(page.size, 20);
}

#[test]
fn list_rejects_out_of_range_paging() {
    let store = SqliteStore::open_in_memory().expect("open store");
    for (page, size) in [(0, 10), (1, 0), (1, 101)] {
        let err = store
            .category_list(ListCategoriesRequest {
                page,
                size,
                ..ListCategoriesRequest::default()
            })
            .expect_err("invalid paging");
        assert!(matches!(err, StoreError::InvalidInput(_)), "got {err:?}");
    }
}

#[test]
fn reopen_keeps_data_and_passes_the_schema_gate() {
    let storage_dir = temp_dir("reopen_keeps_data_and_passes_the_schema_gate");
    let id = {
        let mut store = SqliteStore::open(&storage_dir).expect("open store");
        create_root(&mut store, "Electronics")
    };

    let store = SqliteStore::open(&storage_dir).expect("reopen store");
    assert_eq!(store.storage_dir(), Some(storage_dir.as_path()));
    assert_eq!(store.category_get(id).expect("get").path, "Electronics");
}

#[test]
fn schema_gate_rejects_foreign_databases() {
    let storage_dir = temp_dir("schema_gate_rejects_foreign_databases");
    {
        let conn = Connection::open(storage_dir.join(DB_FILE_NAME)).expect("open raw db");
        conn.execute_batch("CREATE TABLE legacy_items(id INTEGER PRIMARY KEY);")
            .expect("create foreign table");
    }

    let err = SqliteStore::open(&storage_dir).expect_err("foreign schema");
    match err {
        StoreError::InvalidInput(message) => assert!(message.starts_with("RESET_REQUIRED")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn schema_gate_rejects_version_mismatch() {
    let storage_dir = temp_dir("schema_gate_rejects_version_mismatch");
    SqliteStore::open(&storage_dir).expect("create store");
    {
        let conn = Connection::open(storage_dir.join(DB_FILE_NAME)).expect("open raw db");
        conn.execute(
            "UPDATE catalog_state SET schema_version=?1 WHERE singleton=1",
            params![99],
        )
        .expect("bump version");
    }

    let err = SqliteStore::open(&storage_dir).expect_err("version mismatch");
    assert!(matches!(err, StoreError::InvalidInput(_)), "got {err:?}");
}

#[test]
fn audit_reports_rows_corrupted_outside_the_engine() {
    let storage_dir = temp_dir("audit_reports_rows_corrupted_outside_the_engine");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let electronics = create_root(&mut store, "Electronics");
    let phones = store
        .category_create(CreateCategoryRequest {
            name: "Phones".to_string(),
            parent_id: Some(electronics),
            ..CreateCategoryRequest::default()
        })
        .expect("create child")
        .id;
    assert!(store.category_audit().expect("audit").is_empty());

    let raw = Connection::open(storage_dir.join(DB_FILE_NAME)).expect("open raw db");
    raw.execute(
        "UPDATE categories SET path='Stale.Phones' WHERE id=?1",
        params![phones],
    )
    .expect("corrupt path");

    let violations = store.category_audit().expect("audit");
    assert_eq!(violations.len(), 1, "violations: {violations:?}");
    match &violations[0] {
        HierarchyViolation::PathMismatch {
            id,
            expected,
            actual,
        } => {
            assert_eq!(*id, phones);
            assert_eq!(expected, "Electronics.Phones");
            assert_eq!(actual, "Stale.Phones");
        }
        other => panic!("expected PathMismatch, got {other:?}"),
    }
}

#[test]
fn error_kinds_and_status_codes_are_stable() {
    let cases = [
        (StoreError::NotFound, "not_found", 404),
        (StoreError::DuplicateSibling, "duplicate_sibling", 400),
        (StoreError::CycleDetected, "cycle_detected", 400),
        (StoreError::SelfParent, "self_parent", 400),
        (StoreError::ParentDeleted, "parent_deleted", 400),
        (StoreError::ParentNotFound, "parent_not_found", 400),
        (
            StoreError::ConcurrentModification {
                expected: 1,
                actual: 2,
            },
            "concurrent_modification",
            400,
        ),
        (StoreError::HasChildren, "has_children", 400),
        (StoreError::HasProducts, "has_products", 400),
        (StoreError::InvalidInput("bad"), "invalid_input", 400),
    ];
    for (err, kind, status) in cases {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.status_code(), status, "{err}");
    }
}
