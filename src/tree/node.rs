use std::fmt::Debug;
use std::sync::Arc;

use derive_more::{Display, From, Into};
use snafu::OptionExt;

use super::tree::{IdSpaceExhaustedSnafu, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Result<Self, TreeError> {
        self.0
            .checked_add(1)
            .map(Self)
            .context(IdSpaceExhaustedSnafu { id: self })
    }
}

/// Payload carried by every node of a [`Tree`](super::Tree).
///
/// The engine treats the payload as opaque apart from two hooks: whether the
/// node may hold children, and how its derived state follows from its
/// children.
pub trait NodeData: Clone + Debug {
    fn is_container(&self) -> bool;

    fn derive(&mut self, _children: &[Arc<Node<Self>>]) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<D> {
    id: NodeId,
    data: D,
    children: Vec<Arc<Node<D>>>,
}

impl<D: NodeData> Node<D> {
    pub fn leaf(id: impl Into<NodeId>, data: D) -> Self {
        Self {
            id: id.into(),
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(
        id: impl Into<NodeId>,
        data: D,
        children: impl IntoIterator<Item = Node<D>>,
    ) -> Self {
        Self {
            id: id.into(),
            data,
            children: children.into_iter().map(Arc::new).collect(),
        }
    }

    pub(crate) fn from_parts(id: NodeId, data: D, children: Vec<Arc<Node<D>>>) -> Self {
        Self { id, data, children }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn children(&self) -> &[Arc<Node<D>>] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Arc<Node<D>>> {
        &mut self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn rederive(&mut self) {
        self.data.derive(&self.children);
    }

    pub(crate) fn rederive_all(&self) -> Node<D> {
        let children = self
            .children
            .iter()
            .map(|child| Arc::new(child.rederive_all()))
            .collect();
        let mut node = Node::from_parts(self.id, self.data.clone(), children);
        node.rederive();
        node
    }

    pub(crate) fn map_all(&self, apply: &mut impl FnMut(&mut D)) -> Node<D> {
        let mut data = self.data.clone();
        apply(&mut data);
        let children = self
            .children
            .iter()
            .map(|child| Arc::new(child.map_all(&mut *apply)))
            .collect();
        let mut node = Node::from_parts(self.id, data, children);
        node.rederive();
        node
    }

    pub(crate) fn collect_ids(&self, ids: &mut Vec<NodeId>) {
        ids.push(self.id);
        for child in &self.children {
            child.collect_ids(ids);
        }
    }
}
