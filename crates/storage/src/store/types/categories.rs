#![forbid(unsafe_code)]

use catalog_core::hierarchy::HierarchyNode;
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub attributes: Map<String, Value>,
    pub parent_id: Option<i64>,
    pub path: String,
    pub version: i64,
    pub is_deleted: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn hierarchy_node(&self) -> HierarchyNode {
        HierarchyNode {
            id: self.id,
            parent_id: self.parent_id,
            name: self.name.clone(),
            path: self.path.clone(),
            is_deleted: self.is_deleted,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CategoryPage {
    pub categories: Vec<Category>,
    pub page: usize,
    pub size: usize,
    pub has_more: bool,
}
