//! Plain-text view of a tree: one line per node, indented by depth.

use colored::Colorize;

use crate::kinds::{CheckItem, Comment, Entry, EntryKind};
use crate::tree::{NodeData, Selectable, Status, Tree};

const INDENT: &str = "  ";

pub trait Describe: NodeData {
    fn describe(&self) -> String;
}

impl Describe for CheckItem {
    fn describe(&self) -> String {
        let marker = match self.status() {
            Status::Checked => "[x]".green(),
            Status::Unchecked => "[ ]".normal(),
            Status::Indeterminate => "[-]".yellow(),
        };
        format!("{marker} {}", self.label)
    }
}

impl Describe for Entry {
    fn describe(&self) -> String {
        match self.kind {
            EntryKind::Folder => format!("{}/", self.name).blue().bold().to_string(),
            EntryKind::File => self.name.clone(),
        }
    }
}

impl Describe for Comment {
    fn describe(&self) -> String {
        self.content.clone()
    }
}

pub fn render<D: Describe>(tree: &Tree<D>) -> String {
    tree.iter()
        .map(|(depth, node)| {
            let id = format!("(#{})", node.id()).dimmed();
            format!("{}{} {id}\n", INDENT.repeat(depth), node.data().describe())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, NodeId};

    fn plain<D: Describe>(tree: &Tree<D>) -> String {
        colored::control::set_override(false);
        render(tree)
    }

    #[test]
    fn renders_checklist_with_markers() {
        let tree = Tree::new([Node::with_children(
            1,
            CheckItem::unchecked("Fruits"),
            [
                Node::leaf(2, CheckItem::checked("Apple")),
                Node::leaf(3, CheckItem::unchecked("Pear")),
            ],
        )])
        .unwrap();

        assert_eq!(
            plain(&tree),
            "[-] Fruits (#1)\n  [x] Apple (#2)\n  [ ] Pear (#3)\n"
        );
    }

    #[test]
    fn renders_folders_with_trailing_slash() {
        let tree = Tree::new([Node::with_children(
            1,
            Entry::folder("src"),
            [Node::leaf(2, Entry::file("main.rs"))],
        )])
        .unwrap();

        assert_eq!(plain(&tree), "src/ (#1)\n  main.rs (#2)\n");
    }

    #[test]
    fn renders_nested_replies() {
        let (tree, first) = Tree::<Comment>::default().insert_comment(None, "hello").unwrap();
        let (tree, _) = tree.insert_comment(Some(first), "hi").unwrap();
        assert_eq!(first, NodeId::new(1));
        assert_eq!(plain(&tree), "hello (#1)\n  hi (#2)\n");
    }

    #[test]
    fn empty_tree_renders_nothing() {
        assert_eq!(plain(&Tree::<Comment>::default()), "");
    }
}
