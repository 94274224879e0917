use super::super::*;
use super::{check_description, check_name, live_parent_tx};
use catalog_core::paths::compute_path;
use serde_json::Map;

impl SqliteStore {
    pub fn category_create(
        &mut self,
        request: CreateCategoryRequest,
    ) -> Result<Category, StoreError> {
        check_name(&request.name)?;
        check_description(request.description.as_deref())?;

        let now_ms = now_ms();
        let tx = self.write_tx()?;

        let parent = match request.parent_id {
            Some(parent_id) => Some(live_parent_tx(&tx, parent_id)?),
            None => None,
        };

        if find_by_name_and_parent_tx(&tx, &request.name, request.parent_id)?.is_some() {
            return Err(StoreError::DuplicateSibling);
        }

        let path = compute_path(&request.name, parent.as_ref().map(|p| p.path.as_str()));
        let attributes = request.attributes.unwrap_or_else(Map::new);
        let category = insert_category_tx(
            &tx,
            &NewCategory {
                name: &request.name,
                description: request.description.as_deref(),
                attributes: &attributes,
                parent_id: request.parent_id,
                path: &path,
                now_ms,
            },
        )?;

        tx.commit()?;
        tracing::info!(
            category_id = category.id,
            path = %category.path,
            version = category.version,
            "category created"
        );
        Ok(category)
    }
}
