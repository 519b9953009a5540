use futures::StreamExt;
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use canopy::config::{Document, DocumentKind, SeedError};
use canopy::kinds::{CheckItem, Comment, Entry};
use canopy::render::{Describe, render};
use canopy::store::Store;
use canopy::tree::{NodeId, Position, Tree, TreeError};

use crate::application::RuntimeConfig;
use crate::cli::Command;

type Operation<D> = fn(&Tree<D>, &Command) -> Result<Tree<D>, ApplicationError>;

pub struct Application;

impl Application {
    /// Loads the seed, applies the requested command and returns the
    /// rendered tree.
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<String, ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let document = Document::read(&app_config.seed)
            .await
            .context(SeedSnafu)?;
        debug!("Loaded {} seed", document.kind());

        Self::execute(document, &app_config.command).await
    }

    pub async fn execute(document: Document, command: &Command) -> Result<String, ApplicationError> {
        match document {
            Document::Checklist(tree) => Self::apply(tree, command, checklist_operation).await,
            Document::Explorer(tree) => Self::apply(tree, command, explorer_operation).await,
            Document::Comments(tree) => Self::apply(tree, command, comments_operation).await,
        }
    }

    async fn apply<D: Describe>(
        tree: Tree<D>,
        command: &Command,
        operation: Operation<D>,
    ) -> Result<String, ApplicationError> {
        let mut store = Store::new(tree);
        let mut changes = store.subscribe();

        if *command != Command::Show {
            store.apply(|tree| operation(tree, command))?;
        }

        let tree = store.into_tree();
        while let Some(change) = changes.next().await {
            info!(
                "Applied '{}' as revision {}, tree now holds {} nodes",
                command.name(),
                change.revision,
                change.tree.len()
            );
        }

        Ok(render(&tree))
    }
}

fn position(last: bool) -> Position {
    if last { Position::Last } else { Position::First }
}

fn remove<D: Describe>(tree: &Tree<D>, id: u64) -> Result<Tree<D>, ApplicationError> {
    let (tree, removed) = tree.remove(NodeId::new(id)).context(OperationSnafu)?;
    debug!("Removed subtree rooted at {}", removed.id());
    Ok(tree)
}

fn unsupported<D>(command: &Command, kind: DocumentKind) -> Result<Tree<D>, ApplicationError> {
    UnsupportedCommandSnafu {
        command: command.name(),
        kind,
    }
    .fail()
}

fn checklist_operation(
    tree: &Tree<CheckItem>,
    command: &Command,
) -> Result<Tree<CheckItem>, ApplicationError> {
    match command {
        Command::Toggle { id } => tree.toggle(NodeId::new(*id)).context(OperationSnafu),
        Command::Insert {
            parent,
            last,
            folder: false,
            text,
        } => tree
            .add_item(parent.map(NodeId::new), text.as_str(), position(*last))
            .map(|(tree, _)| tree)
            .context(OperationSnafu),
        Command::Rename { id, text } => tree
            .rename(NodeId::new(*id), text.as_str())
            .context(OperationSnafu),
        Command::Delete { id } => remove(tree, *id),
        Command::Show | Command::Insert { .. } => unsupported(command, DocumentKind::Checklist),
    }
}

fn explorer_operation(tree: &Tree<Entry>, command: &Command) -> Result<Tree<Entry>, ApplicationError> {
    match command {
        Command::Insert {
            parent,
            last,
            folder,
            text,
        } => {
            let parent = parent.map(NodeId::new);
            let inserted = if *folder {
                tree.add_folder(parent, text.as_str(), position(*last))
            } else {
                tree.add_file(parent, text.as_str(), position(*last))
            };
            inserted.map(|(tree, _)| tree).context(OperationSnafu)
        }
        Command::Rename { id, text } => tree
            .rename(NodeId::new(*id), text.as_str())
            .context(OperationSnafu),
        Command::Delete { id } => remove(tree, *id),
        Command::Show | Command::Toggle { .. } => unsupported(command, DocumentKind::Explorer),
    }
}

fn comments_operation(
    tree: &Tree<Comment>,
    command: &Command,
) -> Result<Tree<Comment>, ApplicationError> {
    match command {
        Command::Insert {
            parent,
            last,
            folder: false,
            text,
        } => tree
            .insert_comment_at(parent.map(NodeId::new), text.as_str(), position(*last))
            .map(|(tree, _)| tree)
            .context(OperationSnafu),
        Command::Rename { id, text } => tree
            .edit(NodeId::new(*id), text.as_str())
            .context(OperationSnafu),
        Command::Delete { id } => remove(tree, *id),
        Command::Show | Command::Toggle { .. } | Command::Insert { .. } => {
            unsupported(command, DocumentKind::Comments)
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the seed"))]
    SeedError { source: SeedError },
    #[snafu(display("The requested operation could not be applied"))]
    OperationError { source: TreeError },
    #[snafu(display("Command '{}' is not supported for {} seeds", command, kind))]
    UnsupportedCommand { command: String, kind: DocumentKind },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CHECKLIST: &str = r#"
kind: checklist
nodes:
  - id: 1
    label: R
    children:
      - id: 2
        label: A
      - id: 3
        label: B
"#;

    const EXPLORER: &str = r#"
kind: explorer
nodes:
  - id: 1
    name: root
    type: folder
    children:
      - id: 2
        name: notes.txt
"#;

    fn document(seed: &str) -> Document {
        colored::control::set_override(false);
        seed.try_into().unwrap()
    }

    fn run(seed: &str, command: Command) -> Result<String, ApplicationError> {
        futures::executor::block_on(Application::execute(document(seed), &command))
    }

    #[test]
    fn toggle_renders_propagated_status() {
        let output = run(CHECKLIST, Command::Toggle { id: 2 }).unwrap();
        assert_eq!(output, "[-] R (#1)\n  [x] A (#2)\n  [ ] B (#3)\n");
    }

    #[test]
    fn show_leaves_the_tree_alone() {
        let output = run(CHECKLIST, Command::Show).unwrap();
        assert_eq!(output, "[ ] R (#1)\n  [ ] A (#2)\n  [ ] B (#3)\n");
    }

    #[test]
    fn insert_folder_into_explorer() {
        let command = Command::Insert {
            parent: Some(1),
            last: true,
            folder: true,
            text: "src".into(),
        };
        let output = run(EXPLORER, command).unwrap();
        assert_eq!(output, "root/ (#1)\n  notes.txt (#2)\n  src/ (#3)\n");
    }

    #[rstest]
    #[case(false, "[ ] R (#1)\n  [ ] C (#4)\n  [ ] A (#2)\n  [ ] B (#3)\n")]
    #[case(true, "[ ] R (#1)\n  [ ] A (#2)\n  [ ] B (#3)\n  [ ] C (#4)\n")]
    fn insert_item_into_checklist(#[case] last: bool, #[case] expected: &str) {
        let command = Command::Insert {
            parent: Some(1),
            last,
            folder: false,
            text: "C".into(),
        };
        assert_eq!(run(CHECKLIST, command).unwrap(), expected);
    }

    #[rstest]
    #[case(EXPLORER, Command::Toggle { id: 1 })]
    #[case(
        CHECKLIST,
        Command::Insert { parent: None, last: false, folder: true, text: "x".into() }
    )]
    fn unsupported_commands_are_reported(#[case] seed: &str, #[case] command: Command) {
        let result = run(seed, command);
        assert!(matches!(result, Err(ApplicationError::UnsupportedCommand { .. })));
    }

    #[rstest]
    #[case(Command::Toggle { id: 9 })]
    #[case(Command::Delete { id: 9 })]
    #[case(Command::Rename { id: 9, text: "x".into() })]
    fn missing_ids_surface_as_errors(#[case] command: Command) {
        let result = run(CHECKLIST, command);
        assert!(matches!(
            result,
            Err(ApplicationError::OperationError {
                source: TreeError::NodeNotFound { .. }
            })
        ));
    }

    #[test]
    fn file_cannot_receive_children() {
        let command = Command::Insert {
            parent: Some(2),
            last: false,
            folder: false,
            text: "x".into(),
        };
        let result = run(EXPLORER, command);
        assert!(matches!(
            result,
            Err(ApplicationError::OperationError {
                source: TreeError::InvalidParent { .. }
            })
        ));
    }

    #[compio::test]
    async fn run_reads_seed_from_disk() {
        colored::control::set_override(false);
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "{CHECKLIST}").expect("Failed to write seed");

        let config = RuntimeConfig {
            seed: file.path().to_path_buf(),
            command: Command::Delete { id: 3 },
        };
        let output = Application::run(config).await.unwrap();
        assert_eq!(output, "[ ] R (#1)\n  [ ] A (#2)\n");
    }

    #[compio::test]
    async fn run_reports_missing_seed() {
        let config = RuntimeConfig {
            seed: "does-not-exist.yaml".into(),
            command: Command::Show,
        };
        let result = Application::run(config).await;
        assert!(matches!(result, Err(ApplicationError::SeedError { .. })));
    }
}
