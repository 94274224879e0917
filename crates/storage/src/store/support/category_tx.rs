#![forbid(unsafe_code)]

use super::super::{Category, StoreError};
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params, params_from_iter};
use serde_json::{Map, Value};

pub(in crate::store) const CATEGORY_COLUMNS: &str = "id, name, description, attributes_json, parent_id, path, version, is_deleted, created_at_ms, updated_at_ms";

/// Fields a single-row update may touch. `version` is always written.
#[derive(Clone, Debug, Default)]
pub(in crate::store) struct CategoryFieldSet {
    pub(in crate::store) name: Option<String>,
    pub(in crate::store) description: Option<Option<String>>,
    pub(in crate::store) attributes: Option<Map<String, Value>>,
    pub(in crate::store) parent_id: Option<Option<i64>>,
    pub(in crate::store) is_deleted: Option<bool>,
    pub(in crate::store) version: i64,
}

pub(in crate::store) struct NewCategory<'a> {
    pub(in crate::store) name: &'a str,
    pub(in crate::store) description: Option<&'a str>,
    pub(in crate::store) attributes: &'a Map<String, Value>,
    pub(in crate::store) parent_id: Option<i64>,
    pub(in crate::store) path: &'a str,
    pub(in crate::store) now_ms: i64,
}

pub(in crate::store) fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    let attributes_json = row.get::<_, String>(3)?;
    let attributes = match serde_json::from_str::<Value>(&attributes_json) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(err) => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                Box::new(err),
            ));
        }
    };

    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        attributes,
        parent_id: row.get(4)?,
        path: row.get(5)?,
        version: row.get(6)?,
        is_deleted: row.get::<_, i64>(7)? != 0,
        created_at_ms: row.get(8)?,
        updated_at_ms: row.get(9)?,
    })
}

pub(in crate::store) fn attributes_to_json(attributes: &Map<String, Value>) -> String {
    Value::Object(attributes.clone()).to_string()
}

pub(in crate::store) fn find_by_id_tx(
    conn: &Connection,
    id: i64,
    include_deleted: bool,
) -> Result<Option<Category>, StoreError> {
    let sql = format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id=?1 AND (?2 OR is_deleted=0)"
    );
    Ok(conn
        .query_row(&sql, params![id, include_deleted], category_from_row)
        .optional()?)
}

pub(in crate::store) fn find_by_name_and_parent_tx(
    conn: &Connection,
    name: &str,
    parent_id: Option<i64>,
) -> Result<Option<Category>, StoreError> {
    let sql = format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE name=?1 AND parent_id IS ?2 AND is_deleted=0"
    );
    Ok(conn
        .query_row(&sql, params![name, parent_id], category_from_row)
        .optional()?)
}

pub(in crate::store) fn count_children_tx(conn: &Connection, id: i64) -> Result<i64, StoreError> {
    Ok(conn.query_row(
        "SELECT COUNT(1) FROM categories WHERE parent_id=?1 AND is_deleted=0",
        params![id],
        |row| row.get::<_, i64>(0),
    )?)
}

/// Rows whose path starts with `prefix.`; the prefix row itself is excluded.
/// Compared with `substr` so `%` and `_` in names stay literal.
pub(in crate::store) fn find_by_path_prefix_tx(
    conn: &Connection,
    prefix: &str,
) -> Result<Vec<Category>, StoreError> {
    let sql = format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories \
         WHERE substr(path, 1, length(?1) + 1) = ?1 || '.' \
         ORDER BY path ASC, id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![prefix], category_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub(in crate::store) fn load_all_tx(conn: &Connection) -> Result<Vec<Category>, StoreError> {
    let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], category_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub(in crate::store) fn insert_category_tx(
    conn: &Connection,
    category: &NewCategory<'_>,
) -> Result<Category, StoreError> {
    let insert = conn.execute(
        "INSERT INTO categories(name, description, attributes_json, parent_id, path, version, is_deleted, created_at_ms, updated_at_ms) \
         VALUES (?1, ?2, ?3, ?4, ?5, 1, 0, ?6, ?6)",
        params![
            category.name,
            category.description,
            attributes_to_json(category.attributes),
            category.parent_id,
            category.path,
            category.now_ms,
        ],
    );
    if let Err(err) = insert {
        return Err(map_sibling_conflict(err));
    }

    let id = conn.last_insert_rowid();
    find_by_id_tx(conn, id, true)?.ok_or(StoreError::NotFound)
}

/// Compare-and-swap write: only applies while the row still carries
/// `expected_version`.
pub(in crate::store) fn update_fields_tx(
    conn: &Connection,
    id: i64,
    expected_version: i64,
    fields: &CategoryFieldSet,
    now_ms: i64,
) -> Result<(), StoreError> {
    let mut assignments: Vec<&'static str> = Vec::new();
    let mut values: Vec<SqlValue> = vec![SqlValue::Integer(id), SqlValue::Integer(expected_version)];

    let mut push = |column: &'static str, value: SqlValue| {
        assignments.push(column);
        values.push(value);
    };

    if let Some(name) = &fields.name {
        push("name", SqlValue::Text(name.clone()));
    }
    if let Some(description) = &fields.description {
        push(
            "description",
            description.clone().map_or(SqlValue::Null, SqlValue::Text),
        );
    }
    if let Some(attributes) = &fields.attributes {
        push("attributes_json", SqlValue::Text(attributes_to_json(attributes)));
    }
    if let Some(parent_id) = fields.parent_id {
        push("parent_id", parent_id.map_or(SqlValue::Null, SqlValue::Integer));
    }
    if let Some(is_deleted) = fields.is_deleted {
        push("is_deleted", SqlValue::Integer(i64::from(is_deleted)));
    }
    push("version", SqlValue::Integer(fields.version));
    push("updated_at_ms", SqlValue::Integer(now_ms));

    let set_clause = assignments
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{column}=?{}", index + 3))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE categories SET {set_clause} WHERE id=?1 AND version=?2");

    let updated = match conn.execute(&sql, params_from_iter(values.iter())) {
        Ok(updated) => updated,
        Err(err) => return Err(map_sibling_conflict(err)),
    };
    if updated > 0 {
        return Ok(());
    }

    match current_version_tx(conn, id)? {
        Some(actual) => Err(StoreError::ConcurrentModification {
            expected: expected_version,
            actual,
        }),
        None => Err(StoreError::NotFound),
    }
}

pub(in crate::store) fn update_path_tx(
    conn: &Connection,
    id: i64,
    path: &str,
    now_ms: i64,
) -> Result<(), StoreError> {
    let updated = conn.execute(
        "UPDATE categories SET path=?2, updated_at_ms=?3 WHERE id=?1",
        params![id, path, now_ms],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub(in crate::store) fn hard_delete_tx(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let deleted = conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    if deleted == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

fn current_version_tx(conn: &Connection, id: i64) -> Result<Option<i64>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT version FROM categories WHERE id=?1",
            params![id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?)
}

fn map_sibling_conflict(err: rusqlite::Error) -> StoreError {
    if is_unique_violation(&err) {
        return StoreError::DuplicateSibling;
    }
    StoreError::Sql(err)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                && message
                    .as_deref()
                    .is_some_and(|value| value.contains("UNIQUE constraint failed"))
        }
        _ => false,
    }
}
