//! Copy-on-write trees with tri-state selection, plus the node flavours,
//! seed loading and change dispatch built around them.

pub mod config;
pub mod kinds;
pub mod render;
pub mod store;
pub mod tree;
