use super::super::*;
use super::{check_description, check_name, live_parent_tx};
use catalog_core::paths::{compute_path, is_descendant_path, parent_path};

impl SqliteStore {
    pub fn category_update(
        &mut self,
        id: i64,
        request: UpdateCategoryRequest,
    ) -> Result<Category, StoreError> {
        if request.is_empty() {
            return Err(StoreError::InvalidInput("no fields to update"));
        }
        if let Some(name) = request.name.as_deref() {
            check_name(name)?;
        }
        if let Some(description) = &request.description {
            check_description(description.as_deref())?;
        }

        let now_ms = now_ms();
        let tx = self.write_tx()?;

        let target = find_by_id_tx(&tx, id, true)?.ok_or(StoreError::NotFound)?;

        if let Some(expected) = request.expected_version
            && expected != target.version
        {
            tracing::warn!(
                category_id = id,
                expected,
                actual = target.version,
                "stale category version rejected"
            );
            return Err(StoreError::ConcurrentModification {
                expected,
                actual: target.version,
            });
        }

        let parent_change = request.parent_id.filter(|parent| *parent != target.parent_id);
        let new_parent = match parent_change {
            Some(Some(parent_id)) => {
                if parent_id == id {
                    return Err(StoreError::SelfParent);
                }
                if let Some(candidate) = find_by_id_tx(&tx, parent_id, true)?
                    && (is_descendant_path(&candidate.path, &target.path)
                        || parent_chain_contains_tx(&tx, candidate.id, id)?)
                {
                    return Err(StoreError::CycleDetected);
                }
                Some(live_parent_tx(&tx, parent_id)?)
            }
            Some(None) | None => None,
        };
        let resulting_parent_id = parent_change.unwrap_or(target.parent_id);

        let name_change = request.name.filter(|name| *name != target.name);
        let resulting_name = name_change.as_deref().unwrap_or(&target.name);
        // A live row entering a new sibling set must not collide either.
        if (name_change.is_some() || (parent_change.is_some() && !target.is_deleted))
            && let Some(existing) =
                find_by_name_and_parent_tx(&tx, resulting_name, resulting_parent_id)?
            && existing.id != id
        {
            return Err(StoreError::DuplicateSibling);
        }

        let hierarchy_changed = name_change.is_some() || parent_change.is_some();
        let new_path = if hierarchy_changed {
            let parent_prefix = match (&new_parent, resulting_parent_id) {
                (Some(parent), _) => Some(parent.path.clone()),
                (None, Some(parent_id)) => match find_by_id_tx(&tx, parent_id, true)? {
                    Some(parent) => Some(parent.path),
                    // Parent purged after this row was soft-deleted.
                    None => parent_path(&target.path).map(str::to_string),
                },
                (None, None) => None,
            };
            Some(compute_path(resulting_name, parent_prefix.as_deref()))
        } else {
            None
        };

        let fields = CategoryFieldSet {
            name: name_change,
            description: request.description,
            attributes: request.attributes,
            parent_id: parent_change,
            is_deleted: None,
            version: target.version + 1,
        };
        update_fields_tx(&tx, id, target.version, &fields, now_ms)?;

        let rewritten = match new_path.as_deref() {
            Some(path) => cascade_path_tx(&tx, &target, path, now_ms)?,
            None => 0,
        };

        let updated = find_by_id_tx(&tx, id, true)?.ok_or(StoreError::NotFound)?;
        tx.commit()?;

        tracing::info!(
            category_id = id,
            version = updated.version,
            path = %updated.path,
            descendants_rewritten = rewritten,
            "category updated"
        );
        Ok(updated)
    }

    /// Re-parents `id` under `new_parent_id` (`None` for root). Same rules as
    /// [`SqliteStore::category_update`].
    pub fn category_move(
        &mut self,
        id: i64,
        new_parent_id: Option<i64>,
        expected_version: Option<i64>,
    ) -> Result<Category, StoreError> {
        self.category_update(
            id,
            UpdateCategoryRequest {
                parent_id: Some(new_parent_id),
                expected_version,
                ..UpdateCategoryRequest::default()
            },
        )
    }
}
