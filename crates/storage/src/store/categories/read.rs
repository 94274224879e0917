use super::super::*;
use catalog_core::hierarchy::Forest;
use rusqlite::params;
use std::collections::BTreeSet;

impl SqliteStore {
    /// Live category by id.
    pub fn category_get(&self, id: i64) -> Result<Category, StoreError> {
        find_by_id_tx(&self.conn, id, false)?.ok_or(StoreError::NotFound)
    }

    pub fn category_find(
        &self,
        id: i64,
        include_deleted: bool,
    ) -> Result<Option<Category>, StoreError> {
        find_by_id_tx(&self.conn, id, include_deleted)
    }

    pub fn category_list(
        &self,
        request: ListCategoriesRequest,
    ) -> Result<CategoryPage, StoreError> {
        if request.page == 0 {
            return Err(StoreError::InvalidInput("page must be at least 1"));
        }
        if request.size == 0 || request.size > MAX_PAGE_SIZE {
            return Err(StoreError::InvalidInput("size must be between 1 and 100"));
        }

        let offset = (request.page - 1)
            .checked_mul(request.size)
            .and_then(|value| i64::try_from(value).ok())
            .ok_or(StoreError::InvalidInput("numeric overflow"))?;
        // One extra row tells whether another page exists.
        let limit = i64::try_from(request.size + 1)
            .map_err(|_| StoreError::InvalidInput("numeric overflow"))?;

        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE (?1 OR is_deleted=0) AND (?2 IS NULL OR parent_id=?2) \
             ORDER BY name ASC, id ASC \
             LIMIT ?3 OFFSET ?4"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![request.include_deleted, request.parent_id, limit, offset],
            category_from_row,
        )?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }

        let has_more = categories.len() > request.size;
        categories.truncate(request.size);
        tracing::debug!(
            page = request.page,
            size = request.size,
            returned = categories.len(),
            "categories listed"
        );
        Ok(CategoryPage {
            categories,
            page: request.page,
            size: request.size,
            has_more,
        })
    }

    /// Live descendants of a live category, ordered by path.
    pub fn category_descendants(&self, id: i64) -> Result<Vec<Category>, StoreError> {
        let target = find_by_id_tx(&self.conn, id, false)?.ok_or(StoreError::NotFound)?;
        let candidates = find_by_path_prefix_tx(&self.conn, &target.path)?;

        let forest = Forest::build(
            candidates
                .iter()
                .map(Category::hierarchy_node)
                .chain(std::iter::once(target.hierarchy_node())),
        );
        let linked: BTreeSet<i64> = forest.descendants_of(target.id).into_iter().collect();

        Ok(candidates
            .into_iter()
            .filter(|row| !row.is_deleted && linked.contains(&row.id))
            .collect())
    }
}
