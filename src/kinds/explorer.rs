use derive_more::{Display, IsVariant};

use crate::tree::{NodeData, NodeId, Position, Tree, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IsVariant)]
pub enum EntryKind {
    #[display("file")]
    File,
    #[display("folder")]
    Folder,
}

/// A file or folder in an explorer tree. Only folders hold children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Folder,
        }
    }
}

impl NodeData for Entry {
    fn is_container(&self) -> bool {
        match self.kind {
            EntryKind::Folder => true,
            EntryKind::File => false,
        }
    }
}

impl Tree<Entry> {
    pub fn add_file(
        &self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        position: Position,
    ) -> Result<(Self, NodeId), TreeError> {
        self.insert_new_at(parent, Entry::file(name), position)
    }

    pub fn add_folder(
        &self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        position: Position,
    ) -> Result<(Self, NodeId), TreeError> {
        self.insert_new_at(parent, Entry::folder(name), position)
    }

    pub fn rename(&self, id: NodeId, name: impl Into<String>) -> Result<Self, TreeError> {
        let name = name.into();
        self.update(id, |entry| entry.name = name)
    }
}
