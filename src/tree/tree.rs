use std::collections::HashSet;
use std::sync::Arc;

use snafu::prelude::*;
use tracing::debug;

use super::node::{Node, NodeData, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    First,
    Last,
}

/// An immutable forest of nodes.
///
/// Every mutating operation takes `&self` and returns a new tree. Only the
/// nodes between a root and the edited node are reallocated; every other
/// subtree is shared with the previous version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<D> {
    roots: Vec<Arc<Node<D>>>,
    next_id: NodeId,
}

enum Rewrite<D> {
    Replace(Node<D>),
    Remove,
}

impl<D: NodeData> Default for Tree<D> {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            next_id: NodeId::new(1),
        }
    }
}

impl<D: NodeData> Tree<D> {
    pub fn new(roots: impl IntoIterator<Item = Node<D>>) -> Result<Self, TreeError> {
        let roots = roots.into_iter().collect::<Vec<_>>();

        let mut seen = HashSet::new();
        for root in &roots {
            Self::validate_subtree(root, &mut seen)?;
        }

        let next_id = match seen.iter().max() {
            Some(highest) => highest.next()?,
            None => NodeId::new(1),
        };

        let roots = roots
            .iter()
            .map(|root| Arc::new(root.rederive_all()))
            .collect();

        debug!("Built tree with {} nodes", seen.len());
        Ok(Self { roots, next_id })
    }

    fn validate_subtree(node: &Node<D>, seen: &mut HashSet<NodeId>) -> Result<(), TreeError> {
        ensure!(seen.insert(node.id()), DuplicateIdSnafu { id: node.id() });
        ensure!(
            node.is_leaf() || node.data().is_container(),
            InvalidParentSnafu { id: node.id() }
        );
        for child in node.children() {
            Self::validate_subtree(child, seen)?;
        }
        Ok(())
    }

    pub fn roots(&self) -> &[Arc<Node<D>>] {
        &self.roots
    }

    pub fn next_id(&self) -> NodeId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<D>> {
        self.iter().map(|(_, node)| node).find(|node| node.id() == id)
    }

    /// Ids on the path from a root down to the node's parent, root first.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut path = Vec::new();
        ensure!(
            Self::find_path(&self.roots, id, &mut path),
            NodeNotFoundSnafu { id }
        );
        path.pop();
        Ok(path)
    }

    fn find_path(level: &[Arc<Node<D>>], id: NodeId, path: &mut Vec<NodeId>) -> bool {
        for node in level {
            path.push(node.id());
            if node.id() == id || Self::find_path(node.children(), id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    pub fn iter(&self) -> Iter<'_, D> {
        Iter {
            stack: self.roots.iter().rev().map(|node| (0, node.as_ref())).collect(),
        }
    }

    pub fn insert(
        &self,
        parent: Option<NodeId>,
        node: Node<D>,
        position: Position,
    ) -> Result<Self, TreeError> {
        Self::validate_subtree(&node, &mut HashSet::new())?;
        let mut incoming = Vec::new();
        node.collect_ids(&mut incoming);
        if let Some(id) = incoming.iter().copied().find(|id| self.contains(*id)) {
            return DuplicateIdSnafu { id }.fail();
        }

        let node = Arc::new(node.rederive_all());
        let highest = incoming.iter().copied().max().unwrap_or(node.id());
        let next_id = self.next_id.max(highest.next()?);

        let roots = match parent {
            None => {
                let mut roots = self.roots.clone();
                Self::place(&mut roots, node, position);
                roots
            }
            Some(parent_id) => self.rewrite(parent_id, |parent| {
                ensure!(
                    parent.data().is_container(),
                    InvalidParentSnafu { id: parent_id }
                );
                let mut parent = parent.clone();
                Self::place(parent.children_mut(), node, position);
                Ok(Rewrite::Replace(parent))
            })?,
        };

        debug!("Inserted node {} under {:?}", incoming[0], parent);
        Ok(Self { roots, next_id })
    }

    pub fn insert_new(&self, parent: Option<NodeId>, data: D) -> Result<(Self, NodeId), TreeError> {
        self.insert_new_at(parent, data, Position::First)
    }

    pub fn insert_new_at(
        &self,
        parent: Option<NodeId>,
        data: D,
        position: Position,
    ) -> Result<(Self, NodeId), TreeError> {
        let id = self.next_id;
        let tree = self.insert(parent, Node::leaf(id, data), position)?;
        Ok((tree, id))
    }

    fn place(level: &mut Vec<Arc<Node<D>>>, node: Arc<Node<D>>, position: Position) {
        match position {
            Position::First => level.insert(0, node),
            Position::Last => level.push(node),
        }
    }

    pub fn update(&self, id: NodeId, edit: impl FnOnce(&mut D)) -> Result<Self, TreeError> {
        let roots = self.rewrite(id, |node| {
            let mut node = node.clone();
            edit(node.data_mut());
            Ok(Rewrite::Replace(node))
        })?;
        Ok(self.with_roots(roots))
    }

    pub fn update_subtree(&self, id: NodeId, mut apply: impl FnMut(&mut D)) -> Result<Self, TreeError> {
        let roots = self.rewrite(id, |node| Ok(Rewrite::Replace(node.map_all(&mut apply))))?;
        Ok(self.with_roots(roots))
    }

    pub fn remove(&self, id: NodeId) -> Result<(Self, Arc<Node<D>>), TreeError> {
        let mut removed = None;
        let roots = self.rewrite(id, |node| {
            removed = Some(Arc::new(node.clone()));
            Ok(Rewrite::Remove)
        })?;
        let removed = removed.context(NodeNotFoundSnafu { id })?;
        debug!("Removed node {id}");
        Ok((self.with_roots(roots), removed))
    }

    pub fn update_all(&self, mut apply: impl FnMut(&mut D)) -> Self {
        let roots = self
            .roots
            .iter()
            .map(|root| Arc::new(root.map_all(&mut apply)))
            .collect();
        self.with_roots(roots)
    }

    pub fn rederived(&self) -> Self {
        let roots = self
            .roots
            .iter()
            .map(|root| Arc::new(root.rederive_all()))
            .collect();
        self.with_roots(roots)
    }

    fn with_roots(&self, roots: Vec<Arc<Node<D>>>) -> Self {
        Self {
            roots,
            next_id: self.next_id,
        }
    }

    fn rewrite(
        &self,
        target: NodeId,
        edit: impl FnOnce(&Node<D>) -> Result<Rewrite<D>, TreeError>,
    ) -> Result<Vec<Arc<Node<D>>>, TreeError> {
        let mut edit = Some(edit);
        Self::rewrite_level(&self.roots, target, &mut edit)?.context(NodeNotFoundSnafu { id: target })
    }

    // Returns `None` when `target` is not below this level.
    fn rewrite_level<F>(
        level: &[Arc<Node<D>>],
        target: NodeId,
        edit: &mut Option<F>,
    ) -> Result<Option<Vec<Arc<Node<D>>>>, TreeError>
    where
        F: FnOnce(&Node<D>) -> Result<Rewrite<D>, TreeError>,
    {
        for (index, node) in level.iter().enumerate() {
            if node.id() == target {
                let Some(edit) = edit.take() else {
                    return Ok(None);
                };
                let mut copy = level.to_vec();
                match edit(node)? {
                    Rewrite::Replace(mut replacement) => {
                        replacement.rederive();
                        copy[index] = Arc::new(replacement);
                    }
                    Rewrite::Remove => {
                        copy.remove(index);
                    }
                }
                return Ok(Some(copy));
            }

            if let Some(children) = Self::rewrite_level(node.children(), target, edit)? {
                let mut parent = Node::from_parts(node.id(), node.data().clone(), children);
                parent.rederive();
                let mut copy = level.to_vec();
                copy[index] = Arc::new(parent);
                return Ok(Some(copy));
            }
        }
        Ok(None)
    }
}

pub struct Iter<'a, D> {
    stack: Vec<(usize, &'a Node<D>)>,
}

impl<'a, D: NodeData> Iterator for Iter<'a, D> {
    type Item = (usize, &'a Node<D>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack.extend(
            node.children()
                .iter()
                .rev()
                .map(|child| (depth + 1, child.as_ref())),
        );
        Some((depth, node))
    }
}

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum TreeError {
    #[snafu(display("No node with id {id} exists in the tree"))]
    NodeNotFound { id: NodeId },
    #[snafu(display("Node {id} cannot hold children"))]
    InvalidParent { id: NodeId },
    #[snafu(display("Node id {id} is already in use"))]
    DuplicateId { id: NodeId },
    #[snafu(display("No ids are left to allocate after {id}"))]
    IdSpaceExhausted { id: NodeId },
}
