#![forbid(unsafe_code)]

mod category_tx;
mod hierarchy_tx;
mod products_tx;
mod schema;
mod time;

pub(super) use category_tx::*;
pub(super) use hierarchy_tx::*;
pub(super) use products_tx::*;
pub(super) use schema::{install_schema, preflight_gate};
pub(super) use time::now_ms;
