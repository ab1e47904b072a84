//! Canonical table model

mod builder;
mod elements;

pub use builder::build_table;
pub use elements::*;
