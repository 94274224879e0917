#![forbid(unsafe_code)]

mod store;

pub use catalog_core::hierarchy::HierarchyViolation;
pub use store::*;
