//! Persistent tree with copy-on-write edits and derived node state.
//!
//! A [`Tree`] is never changed in place. Each edit copies the nodes on the
//! path from a root to the edited node and shares every other subtree with
//! the previous version, re-deriving aggregate state along the copied path.

mod node;
mod selection;
mod status;
#[allow(clippy::module_inception)]
mod tree;

pub use node::{Node, NodeData, NodeId};
pub use selection::{Selectable, derive_status};
pub use status::Status;
pub use tree::{Iter, Position, Tree, TreeError};
