#![forbid(unsafe_code)]

use catalog_core::paths::PathError;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    InvalidPath(PathError),
    NotFound,
    ParentNotFound,
    ParentDeleted,
    DuplicateSibling,
    SelfParent,
    CycleDetected,
    ConcurrentModification { expected: i64, actual: i64 },
    HasChildren,
    HasProducts,
}

impl StoreError {
    /// Stable snake_case label for logs and wire envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) | Self::Sql(_) => "storage_failure",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidPath(_) => "invalid_path",
            Self::NotFound => "not_found",
            Self::ParentNotFound => "parent_not_found",
            Self::ParentDeleted => "parent_deleted",
            Self::DuplicateSibling => "duplicate_sibling",
            Self::SelfParent => "self_parent",
            Self::CycleDetected => "cycle_detected",
            Self::ConcurrentModification { .. } => "concurrent_modification",
            Self::HasChildren => "has_children",
            Self::HasProducts => "has_products",
        }
    }

    /// HTTP-style status a transport layer should report for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::DuplicateSibling
            | Self::CycleDetected
            | Self::SelfParent
            | Self::ParentDeleted
            | Self::ParentNotFound
            | Self::ConcurrentModification { .. }
            | Self::HasChildren
            | Self::HasProducts
            | Self::InvalidInput(_) => 400,
            Self::Io(_) | Self::Sql(_) | Self::InvalidPath(_) => 500,
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidPath(err) => match err {
                PathError::PrefixMismatch { path, prefix } => write!(
                    f,
                    "invalid path: {} (path={path}, prefix={prefix})",
                    err.message()
                ),
            },
            Self::NotFound => write!(f, "category not found"),
            Self::ParentNotFound => write!(f, "parent category not found"),
            Self::ParentDeleted => write!(f, "parent category is deleted"),
            Self::DuplicateSibling => {
                write!(f, "category with this name already exists at this level")
            }
            Self::SelfParent => write!(f, "category cannot be its own parent"),
            Self::CycleDetected => {
                write!(f, "moving category would create a circular reference")
            }
            Self::ConcurrentModification { expected, actual } => write!(
                f,
                "category has been modified concurrently (expected={expected}, actual={actual})"
            ),
            Self::HasChildren => write!(f, "cannot delete category with children"),
            Self::HasProducts => write!(f, "cannot delete category with products"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sql(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<PathError> for StoreError {
    fn from(value: PathError) -> Self {
        Self::InvalidPath(value)
    }
}
