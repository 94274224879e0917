#![forbid(unsafe_code)]

mod categories;

pub use categories::*;
