use super::super::*;
use catalog_core::hierarchy::{Forest, HierarchyViolation};

impl SqliteStore {
    /// Checks every stored row against the hierarchy invariants: acyclic
    /// parent links, path consistency and live sibling-name uniqueness.
    pub fn category_audit(&self) -> Result<Vec<HierarchyViolation>, StoreError> {
        let rows = load_all_tx(&self.conn)?;
        let forest = Forest::build(rows.iter().map(Category::hierarchy_node));
        let violations = forest.audit();
        if !violations.is_empty() {
            tracing::warn!(
                rows = forest.len(),
                violations = violations.len(),
                "category hierarchy audit found violations"
            );
        }
        Ok(violations)
    }
}
