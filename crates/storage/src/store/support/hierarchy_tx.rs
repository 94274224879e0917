#![forbid(unsafe_code)]

use super::super::{Category, StoreError};
use super::category_tx::{find_by_path_prefix_tx, update_path_tx};
use catalog_core::hierarchy::Forest;
use catalog_core::paths::rewrite_prefix;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;

/// Writes `new_path` on `target` and rewrites every descendant path.
///
/// Descendants come from the path-prefix scan, narrowed to rows actually
/// linked to `target` through `parent_id` (a soft-deleted namesake sibling
/// shares the textual prefix but not the ancestry). Descendant versions are
/// left alone. Returns the number of rewritten descendants.
pub(in crate::store) fn cascade_path_tx(
    conn: &Connection,
    target: &Category,
    new_path: &str,
    now_ms: i64,
) -> Result<usize, StoreError> {
    let old_path = target.path.as_str();
    if old_path == new_path {
        return Ok(0);
    }

    update_path_tx(conn, target.id, new_path, now_ms)?;

    let candidates = find_by_path_prefix_tx(conn, old_path)?;
    let forest = Forest::build(
        candidates
            .iter()
            .map(Category::hierarchy_node)
            .chain(std::iter::once(target.hierarchy_node())),
    );
    let linked: BTreeSet<i64> = forest.descendants_of(target.id).into_iter().collect();

    let mut rewritten = 0usize;
    for descendant in candidates.iter().filter(|row| linked.contains(&row.id)) {
        let path = rewrite_prefix(&descendant.path, old_path, new_path)?;
        update_path_tx(conn, descendant.id, &path, now_ms)?;
        tracing::debug!(
            category_id = descendant.id,
            old_path = %descendant.path,
            new_path = %path,
            "descendant path rewritten"
        );
        rewritten += 1;
    }

    Ok(rewritten)
}

/// True when `needle` appears on the parent chain starting at `start`
/// (inclusive). Chain length is unbounded; a chain that loops without
/// reaching `needle` ends the walk with `false`.
pub(in crate::store) fn parent_chain_contains_tx(
    conn: &Connection,
    start: i64,
    needle: i64,
) -> Result<bool, StoreError> {
    let mut current = Some(start);
    let mut seen = BTreeSet::new();

    while let Some(id) = current {
        if id == needle {
            return Ok(true);
        }
        if !seen.insert(id) {
            tracing::warn!(
                start,
                looping_at = id,
                "parent chain loops without reaching the moved category"
            );
            return Ok(false);
        }
        current = conn
            .query_row(
                "SELECT parent_id FROM categories WHERE id=?1",
                params![id],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?
            .flatten();
    }

    Ok(false)
}
