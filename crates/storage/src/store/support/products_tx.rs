#![forbid(unsafe_code)]

use super::super::StoreError;
use rusqlite::{Connection, params};

/// Non-deleted products filed under `category_id`. The only question the
/// hierarchy asks of the product catalog.
pub(in crate::store) fn count_products_tx(
    conn: &Connection,
    category_id: i64,
) -> Result<i64, StoreError> {
    Ok(conn.query_row(
        "SELECT COUNT(1) FROM products WHERE category_id=?1 AND is_deleted=0",
        params![category_id],
        |row| row.get::<_, i64>(0),
    )?)
}
