#![forbid(unsafe_code)]

//! Materialized path codec.
//!
//! A path is the `.`-joined chain of category names from the root down to the
//! category itself, e.g. `Electronics.Laptops.Gaming`.

pub const PATH_SEPARATOR: char = '.';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathError {
    PrefixMismatch { path: String, prefix: String },
}

impl PathError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::PrefixMismatch { .. } => "path does not start with the expected prefix",
        }
    }
}

pub fn compute_path(name: &str, parent_path: Option<&str>) -> String {
    match parent_path {
        Some(parent) => format!("{parent}{PATH_SEPARATOR}{name}"),
        None => name.to_string(),
    }
}

/// Replaces the leading `old_prefix` of `descendant_path` with `new_prefix`.
///
/// The prefix has to end on a segment boundary: `Electronics` is a prefix of
/// `Electronics.Laptops` but not of `ElectronicsOutlet.Laptops`.
pub fn rewrite_prefix(
    descendant_path: &str,
    old_prefix: &str,
    new_prefix: &str,
) -> Result<String, PathError> {
    let mismatch = || PathError::PrefixMismatch {
        path: descendant_path.to_string(),
        prefix: old_prefix.to_string(),
    };

    let rest = descendant_path.strip_prefix(old_prefix).ok_or_else(mismatch)?;
    if !rest.is_empty() && !rest.starts_with(PATH_SEPARATOR) {
        return Err(mismatch());
    }
    Ok(format!("{new_prefix}{rest}"))
}

pub fn is_descendant_path(candidate_path: &str, ancestor_path: &str) -> bool {
    candidate_path
        .strip_prefix(ancestor_path)
        .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
}

pub fn path_depth(path: &str) -> usize {
    if path.is_empty() {
        return 0;
    }
    path.split(PATH_SEPARATOR).count()
}

pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once(PATH_SEPARATOR).map(|(parent, _)| parent)
}
