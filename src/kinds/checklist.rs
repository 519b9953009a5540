use std::sync::Arc;

use crate::tree::{
    Node, NodeData, NodeId, Position, Selectable, Status, Tree, TreeError, derive_status,
};

/// An entry of a nested checkbox list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    pub label: String,
    status: Status,
}

impl CheckItem {
    pub fn new(label: impl Into<String>, status: Status) -> Self {
        Self {
            label: label.into(),
            status,
        }
    }

    pub fn unchecked(label: impl Into<String>) -> Self {
        Self::new(label, Status::Unchecked)
    }

    pub fn checked(label: impl Into<String>) -> Self {
        Self::new(label, Status::Checked)
    }
}

impl NodeData for CheckItem {
    fn is_container(&self) -> bool {
        true
    }

    fn derive(&mut self, children: &[Arc<Node<Self>>]) {
        self.status = derive_status(
            self.status,
            children.iter().map(|child| child.data().status),
        );
    }
}

impl Selectable for CheckItem {
    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

impl Tree<CheckItem> {
    pub fn add_item(
        &self,
        parent: Option<NodeId>,
        label: impl Into<String>,
        position: Position,
    ) -> Result<(Self, NodeId), TreeError> {
        self.insert_new_at(parent, CheckItem::unchecked(label), position)
    }

    pub fn rename(&self, id: NodeId, label: impl Into<String>) -> Result<Self, TreeError> {
        let label = label.into();
        self.update(id, |item| item.label = label)
    }
}
