#![forbid(unsafe_code)]

use crate::timestamps::ts_ms_to_rfc3339;
use catalog_core::paths::path_depth;
use catalog_storage::{
    Category, CategoryPage, CreateCategoryRequest, HierarchyViolation, ListCategoriesRequest,
    UpdateCategoryRequest,
};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value, json};

#[derive(Debug, Deserialize)]
pub(crate) struct Request {
    #[serde(default)]
    pub(crate) id: Option<Value>,
    pub(crate) method: String,
    #[serde(default)]
    pub(crate) params: Option<Value>,
}

pub(crate) fn ok_response(id: Option<Value>, status: u16, result: Value) -> Value {
    json!({ "id": id, "status": status, "result": result })
}

pub(crate) fn error_response(id: Option<Value>, status: u16, kind: &str, message: &str) -> Value {
    json!({ "id": id, "status": status, "error": { "kind": kind, "message": message } })
}

/// Missing field -> `None`, explicit `null` -> `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CreateParams {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parent_id: Option<i64>,
    #[serde(default)]
    attributes: Option<Map<String, Value>>,
}

impl From<CreateParams> for CreateCategoryRequest {
    fn from(value: CreateParams) -> Self {
        Self {
            name: value.name,
            description: value.description,
            parent_id: value.parent_id,
            attributes: value.attributes,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct UpdateParams {
    pub(crate) id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    parent_id: Option<Option<i64>>,
    #[serde(default)]
    attributes: Option<Map<String, Value>>,
    #[serde(default)]
    expected_version: Option<i64>,
}

impl From<UpdateParams> for UpdateCategoryRequest {
    fn from(value: UpdateParams) -> Self {
        Self {
            name: value.name,
            description: value.description,
            parent_id: value.parent_id,
            attributes: value.attributes,
            expected_version: value.expected_version,
        }
    }
}

/// `parent_id` absent or `null` moves the category to the root level.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MoveParams {
    pub(crate) id: i64,
    #[serde(default)]
    pub(crate) parent_id: Option<i64>,
    #[serde(default)]
    pub(crate) expected_version: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct IdParams {
    pub(crate) id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DeleteParams {
    pub(crate) id: i64,
    #[serde(default)]
    pub(crate) force: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ListParams {
    #[serde(default)]
    parent_id: Option<i64>,
    #[serde(default)]
    include_deleted: bool,
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    size: Option<usize>,
}

impl From<ListParams> for ListCategoriesRequest {
    fn from(value: ListParams) -> Self {
        let defaults = ListCategoriesRequest::default();
        Self {
            parent_id: value.parent_id,
            include_deleted: value.include_deleted,
            page: value.page.unwrap_or(defaults.page),
            size: value.size.unwrap_or(defaults.size),
        }
    }
}

pub(crate) fn category_json(category: &Category) -> Value {
    json!({
        "id": category.id,
        "name": category.name,
        "description": category.description,
        "attributes": Value::Object(category.attributes.clone()),
        "parent_id": category.parent_id,
        "path": category.path,
        "depth": path_depth(&category.path),
        "version": category.version,
        "is_deleted": category.is_deleted,
        "created_at": ts_ms_to_rfc3339(category.created_at_ms),
        "updated_at": ts_ms_to_rfc3339(category.updated_at_ms),
    })
}

pub(crate) fn category_list_json(categories: &[Category]) -> Value {
    Value::Array(categories.iter().map(category_json).collect())
}

pub(crate) fn page_json(page: &CategoryPage) -> Value {
    json!({
        "categories": category_list_json(&page.categories),
        "page": page.page,
        "size": page.size,
        "has_more": page.has_more,
    })
}

pub(crate) fn violation_json(violation: &HierarchyViolation) -> Value {
    let mut out = match violation {
        HierarchyViolation::Cycle { id } => json!({ "id": id }),
        HierarchyViolation::DanglingParent { id, parent_id } => {
            json!({ "id": id, "parent_id": parent_id })
        }
        HierarchyViolation::PathMismatch {
            id,
            expected,
            actual,
        } => json!({ "id": id, "expected": expected, "actual": actual }),
        HierarchyViolation::DuplicateSibling {
            parent_id,
            name,
            ids,
        } => json!({ "parent_id": parent_id, "name": name, "ids": ids }),
    };
    if let Some(obj) = out.as_object_mut() {
        obj.insert("kind".to_string(), Value::from(violation.kind()));
    }
    out
}
