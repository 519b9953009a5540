use std::fmt::Display;

use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::tree::{NodeData, Tree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<D> {
    pub revision: u64,
    pub tree: Tree<D>,
}

#[derive(Debug)]
pub struct Store<D> {
    tree: Tree<D>,
    revision: u64,
    subscribers: Vec<UnboundedSender<Change<D>>>,
}

impl<D: NodeData> Store<D> {
    pub fn new(tree: Tree<D>) -> Self {
        Self {
            tree,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn tree(&self) -> &Tree<D> {
        &self.tree
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn into_tree(self) -> Tree<D> {
        self.tree
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<Change<D>> {
        let (sender, receiver) = mpsc::unbounded();
        self.subscribers.push(sender);
        debug!("Added subscriber, {} in total", self.subscribers.len());
        receiver
    }

    /// On failure nothing changes and no subscriber is notified.
    pub fn apply<E: Display>(
        &mut self,
        operation: impl FnOnce(&Tree<D>) -> Result<Tree<D>, E>,
    ) -> Result<&Tree<D>, E> {
        let tree = operation(&self.tree).inspect_err(|err| warn!("Operation rejected: {err}"))?;
        self.tree = tree;
        self.revision += 1;
        self.dispatch();
        Ok(&self.tree)
    }

    fn dispatch(&mut self) {
        let change = Change {
            revision: self.revision,
            tree: self.tree.clone(),
        };
        self.subscribers
            .retain(|subscriber| subscriber.unbounded_send(change.clone()).is_ok());
        debug!(
            "Dispatched revision {} to {} subscribers",
            self.revision,
            self.subscribers.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::CheckItem;
    use crate::tree::{Node, NodeId, Status, TreeError};
    use futures::StreamExt;
    use futures::executor::block_on;

    fn store() -> Store<CheckItem> {
        let tree = Tree::new([Node::with_children(
            1,
            CheckItem::unchecked("R"),
            [
                Node::leaf(2, CheckItem::unchecked("A")),
                Node::leaf(3, CheckItem::unchecked("B")),
            ],
        )])
        .unwrap();
        Store::new(tree)
    }

    #[test]
    fn successful_operations_reach_every_subscriber() {
        let mut store = store();
        let first = store.subscribe();
        let second = store.subscribe();

        store.apply(|tree| tree.toggle(NodeId::new(2))).unwrap();
        store.apply(|tree| tree.toggle(NodeId::new(3))).unwrap();
        let latest = store.tree().clone();
        drop(store);

        for receiver in [first, second] {
            let changes = block_on(receiver.collect::<Vec<_>>());
            assert_eq!(
                changes.iter().map(|change| change.revision).collect::<Vec<_>>(),
                vec![1, 2]
            );
            assert_eq!(
                changes[0].tree.status_of(NodeId::new(1)),
                Ok(Status::Indeterminate)
            );
            assert_eq!(changes[1].tree, latest);
        }
    }

    #[test]
    fn failed_operations_change_nothing_and_notify_nobody() {
        let mut store = store();
        let receiver = store.subscribe();
        let before = store.tree().clone();

        let result = store.apply(|tree| tree.toggle(NodeId::new(99)));
        assert_eq!(
            result.map(|_| ()),
            Err(TreeError::NodeNotFound { id: NodeId::new(99) })
        );
        assert_eq!(store.tree(), &before);
        assert_eq!(store.revision(), 0);
        drop(store);

        assert!(block_on(receiver.collect::<Vec<_>>()).is_empty());
    }

    #[test]
    fn closed_subscribers_are_pruned() {
        let mut store = store();
        let kept = store.subscribe();
        drop(store.subscribe());

        store.apply(|tree| tree.toggle(NodeId::new(1))).unwrap();
        assert_eq!(store.subscribers.len(), 1);

        let tree = store.into_tree();
        let changes = block_on(kept.collect::<Vec<_>>());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].tree, tree);
    }
}
