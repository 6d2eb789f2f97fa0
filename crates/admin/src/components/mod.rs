//! Reusable view pieces for admin tables.

pub mod pager;

pub use pager::{PageQuery, Pager};
