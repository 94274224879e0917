#![forbid(unsafe_code)]

use super::*;
use catalog_core::names::{CategoryName, validate_description};

mod audit;
mod create;
mod delete;
mod read;
mod update;

fn check_name(name: &str) -> Result<(), StoreError> {
    CategoryName::try_new(name)
        .map(|_| ())
        .map_err(|err| StoreError::InvalidInput(err.message()))
}

fn check_description(description: Option<&str>) -> Result<(), StoreError> {
    match description {
        Some(value) => {
            validate_description(value).map_err(|err| StoreError::InvalidInput(err.message()))
        }
        None => Ok(()),
    }
}

/// Parent lookup shared by create and move: must exist and must be live.
fn live_parent_tx(conn: &rusqlite::Connection, parent_id: i64) -> Result<Category, StoreError> {
    let parent = find_by_id_tx(conn, parent_id, true)?.ok_or(StoreError::ParentNotFound)?;
    if parent.is_deleted {
        return Err(StoreError::ParentDeleted);
    }
    Ok(parent)
}
