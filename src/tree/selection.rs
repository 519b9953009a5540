use tracing::debug;

use super::node::{NodeData, NodeId};
use super::status::Status;
use super::tree::{Tree, TreeError};

/// Payloads carrying a tri-state [`Status`].
///
/// Implementors are expected to derive their status from their children in
/// [`NodeData::derive`], typically through [`derive_status`].
pub trait Selectable: NodeData {
    fn status(&self) -> Status;
    fn set_status(&mut self, status: Status);
}

/// Status of a node given the statuses of its children.
///
/// A node without children keeps its own status, except that it can never be
/// partially selected.
pub fn derive_status(own: Status, children: impl IntoIterator<Item = Status>) -> Status {
    Status::aggregate(children).unwrap_or_else(|| own.settled())
}

impl<D: Selectable> Tree<D> {
    pub fn status_of(&self, id: NodeId) -> Result<Status, TreeError> {
        self.get(id)
            .map(|node| node.data().status())
            .ok_or(TreeError::NodeNotFound { id })
    }

    /// Flips the node's status and forces it onto every descendant. Ancestors
    /// are re-derived on the way back up.
    pub fn toggle(&self, id: NodeId) -> Result<Self, TreeError> {
        let target = self.status_of(id)?.toggled();
        debug!("Toggling node {id} to {target}");
        self.update_subtree(id, |data| data.set_status(target))
    }

    pub fn set_all(&self, status: Status) -> Self {
        let status = status.settled();
        self.update_all(|data| data.set_status(status))
    }
}
