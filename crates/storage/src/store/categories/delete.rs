use super::super::*;

impl SqliteStore {
    /// Soft delete by default, hard delete with `force`.
    ///
    /// Returns `false` when nothing changed: a soft delete of an already
    /// soft-deleted category.
    pub fn category_delete(&mut self, id: i64, force: bool) -> Result<bool, StoreError> {
        let now_ms = now_ms();
        let tx = self.write_tx()?;

        let target = find_by_id_tx(&tx, id, true)?.ok_or(StoreError::NotFound)?;

        if count_children_tx(&tx, id)? > 0 {
            return Err(StoreError::HasChildren);
        }
        if count_products_tx(&tx, id)? > 0 {
            return Err(StoreError::HasProducts);
        }

        if force {
            hard_delete_tx(&tx, id)?;
            tx.commit()?;
            tracing::info!(category_id = id, path = %target.path, "category hard-deleted");
            return Ok(true);
        }

        if target.is_deleted {
            tracing::debug!(category_id = id, "category already soft-deleted");
            return Ok(false);
        }

        let fields = CategoryFieldSet {
            is_deleted: Some(true),
            version: target.version + 1,
            ..CategoryFieldSet::default()
        };
        update_fields_tx(&tx, id, target.version, &fields, now_ms)?;
        tx.commit()?;

        tracing::info!(
            category_id = id,
            version = fields.version,
            "category soft-deleted"
        );
        Ok(true)
    }
}
