#![forbid(unsafe_code)]

//! Arena view of a category set.
//!
//! A `Forest` is rebuilt from a flat row list on every call; it never mutates
//! shared rows. The children index is computed separately from the node map.

use crate::paths::compute_path;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchyNode {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub path: String,
    pub is_deleted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HierarchyViolation {
    Cycle {
        id: i64,
    },
    DanglingParent {
        id: i64,
        parent_id: i64,
    },
    PathMismatch {
        id: i64,
        expected: String,
        actual: String,
    },
    DuplicateSibling {
        parent_id: Option<i64>,
        name: String,
        ids: Vec<i64>,
    },
}

impl HierarchyViolation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cycle { .. } => "cycle",
            Self::DanglingParent { .. } => "dangling_parent",
            Self::PathMismatch { .. } => "path_mismatch",
            Self::DuplicateSibling { .. } => "duplicate_sibling",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Forest {
    nodes: BTreeMap<i64, HierarchyNode>,
    children: BTreeMap<i64, Vec<i64>>,
    roots: Vec<i64>,
}

impl Forest {
    pub fn build(nodes: impl IntoIterator<Item = HierarchyNode>) -> Self {
        let nodes: BTreeMap<i64, HierarchyNode> =
            nodes.into_iter().map(|node| (node.id, node)).collect();

        let mut children: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        let mut roots = Vec::new();
        for node in nodes.values() {
            match node.parent_id {
                Some(parent_id) => children.entry(parent_id).or_default().push(node.id),
                None => roots.push(node.id),
            }
        }

        Self {
            nodes,
            children,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&HierarchyNode> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> &[i64] {
        &self.roots
    }

    pub fn children_of(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids reachable from `id` through child links, in depth-first pre-order.
    /// `id` itself is not included.
    pub fn descendants_of(&self, id: i64) -> Vec<i64> {
        let mut out = Vec::new();
        let mut seen = BTreeSet::from([id]);
        let mut stack: Vec<i64> = self.children_of(id).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children_of(current).iter().rev().copied());
        }
        out
    }

    pub fn audit(&self) -> Vec<HierarchyViolation> {
        let mut out = Vec::new();
        let mut on_cycle = BTreeSet::new();

        for node in self.nodes.values() {
            if self.loops_back_to(node.id) {
                on_cycle.insert(node.id);
                out.push(HierarchyViolation::Cycle { id: node.id });
            }
        }

        for node in self.nodes.values() {
            let Some(parent_id) = node.parent_id else {
                continue;
            };
            if !node.is_deleted && !self.nodes.contains_key(&parent_id) {
                out.push(HierarchyViolation::DanglingParent {
                    id: node.id,
                    parent_id,
                });
            }
        }

        // Path consistency only holds for rows reachable from a root.
        for root in &self.roots {
            for id in std::iter::once(*root).chain(self.descendants_of(*root)) {
                if on_cycle.contains(&id) {
                    continue;
                }
                let Some(node) = self.nodes.get(&id) else {
                    continue;
                };
                let parent_path = node
                    .parent_id
                    .and_then(|parent_id| self.nodes.get(&parent_id))
                    .map(|parent| parent.path.as_str());
                let expected = compute_path(&node.name, parent_path);
                if expected != node.path {
                    out.push(HierarchyViolation::PathMismatch {
                        id,
                        expected,
                        actual: node.path.clone(),
                    });
                }
            }
        }

        let mut siblings: BTreeMap<(Option<i64>, &str), Vec<i64>> = BTreeMap::new();
        for node in self.nodes.values().filter(|node| !node.is_deleted) {
            siblings
                .entry((node.parent_id, node.name.as_str()))
                .or_default()
                .push(node.id);
        }
        for ((parent_id, name), ids) in siblings {
            if ids.len() > 1 {
                out.push(HierarchyViolation::DuplicateSibling {
                    parent_id,
                    name: name.to_string(),
                    ids,
                });
            }
        }

        out
    }

    fn loops_back_to(&self, id: i64) -> bool {
        let mut current = self.nodes.get(&id).and_then(|node| node.parent_id);
        let mut steps = 0usize;
        while let Some(parent_id) = current {
            if parent_id == id {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.nodes.get(&parent_id).and_then(|node| node.parent_id);
        }
        false
    }
}
