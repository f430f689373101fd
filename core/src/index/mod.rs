//! index/mod.rs
//! In-memory header record: an ordered, tag-addressed collection of typed
//! entries, possibly backed by a verbatim region blob.

pub mod types;
pub mod store;

pub use types::*;
pub use store::*;
