use crate::tree::{NodeData, NodeId, Position, Tree, TreeError};

/// A comment in a threaded discussion. Children are its replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub content: String,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl NodeData for Comment {
    fn is_container(&self) -> bool {
        true
    }
}

impl Tree<Comment> {
    /// Adds a comment at the top of the thread, or as the newest reply to
    /// `parent`.
    pub fn insert_comment(
        &self,
        parent: Option<NodeId>,
        content: impl Into<String>,
    ) -> Result<(Self, NodeId), TreeError> {
        self.insert_comment_at(parent, content, Position::First)
    }

    pub fn insert_comment_at(
        &self,
        parent: Option<NodeId>,
        content: impl Into<String>,
        position: Position,
    ) -> Result<(Self, NodeId), TreeError> {
        self.insert_new_at(parent, Comment::new(content), position)
    }

    pub fn edit(&self, id: NodeId, content: impl Into<String>) -> Result<Self, TreeError> {
        let content = content.into();
        self.update(id, |comment| comment.content = content)
    }
}
