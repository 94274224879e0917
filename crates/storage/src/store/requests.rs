#![forbid(unsafe_code)]

use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub attributes: Option<Map<String, Value>>,
}

/// Partial update. `None` leaves a field untouched; for the nullable fields
/// `Some(None)` clears the value (for `parent_id` that means "move to root").
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub parent_id: Option<Option<i64>>,
    pub attributes: Option<Map<String, Value>>,
    pub expected_version: Option<i64>,
}

impl UpdateCategoryRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.parent_id.is_none()
            && self.attributes.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListCategoriesRequest {
    pub parent_id: Option<i64>,
    pub include_deleted: bool,
    pub page: usize,
    pub size: usize,
}

impl Default for ListCategoriesRequest {
    fn default() -> Self {
        Self {
            parent_id: None,
            include_deleted: false,
            page: 1,
            size: super::DEFAULT_PAGE_SIZE,
        }
    }
}
