use compio::{fs::File, io::AsyncReadExt, io::BufReader};
use derive_more::{Display, IsVariant};
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    io::Cursor,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::kinds::{CheckItem, Comment, Entry};
use crate::tree::{Node, NodeData, NodeId, Status, Tree, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IsVariant)]
pub enum DocumentKind {
    #[display("checklist")]
    Checklist,
    #[display("explorer")]
    Explorer,
    #[display("comments")]
    Comments,
}

/// A tree loaded from a seed file, tagged with the flavour of its nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Checklist(Tree<CheckItem>),
    Explorer(Tree<Entry>),
    Comments(Tree<Comment>),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Checklist(_) => DocumentKind::Checklist,
            Document::Explorer(_) => DocumentKind::Explorer,
            Document::Comments(_) => DocumentKind::Comments,
        }
    }

    pub async fn read(path: &Path) -> Result<Self, SeedError> {
        debug!("Opening seed file: {}", display_path(path));
        let file = File::open(path).await.context(ReadSnafu {
            file_path: display_path(path),
        })?;

        let cursor = Cursor::new(file);
        let mut reader = BufReader::new(cursor);
        let res = reader.read_to_string(String::new()).await;
        match res.0 {
            Ok(n) => debug!("Read seed file: {n} bytes"),
            Err(source) => {
                return Err(SeedError::ReadError {
                    file_path: display_path(path),
                    source,
                });
            }
        }
        res.1.as_str().try_into()
    }
}

fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| PathBuf::from(path))
        .display()
        .to_string()
}

impl TryFrom<&str> for Document {
    type Error = SeedError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let top_level = documents
            .first()
            .context(MalformedSeedSnafu)?
            .as_mapping()
            .context(TopLevelNotMapSnafu)?;

        let kind = match field(top_level, "kind") {
            Some(Yaml::Value(Scalar::String(kind))) => kind.to_string(),
            Some(_) | None => return MissingKindSnafu.fail(),
        };
        let nodes: &[Yaml<'_>] = match field(top_level, "nodes") {
            Some(Yaml::Sequence(nodes)) => nodes.as_slice(),
            None => &[],
            Some(_) => return NodesNotSequenceSnafu.fail(),
        };

        let document = match kind.as_str() {
            "checklist" => Document::Checklist(build_tree(nodes, parse_check_item)?),
            "explorer" => Document::Explorer(build_tree(nodes, parse_entry)?),
            "comments" => Document::Comments(build_tree(nodes, parse_comment)?),
            other => {
                return UnknownKindSnafu {
                    kind: other.to_string(),
                }
                .fail();
            }
        };
        debug!("Parsed {} seed", document.kind());
        Ok(document)
    }
}

type Mapping<'a> = LinkedHashMap<Yaml<'a>, Yaml<'a>>;

fn field<'m, 'a>(mapping: &'m Mapping<'a>, name: &str) -> Option<&'m Yaml<'a>> {
    mapping
        .iter()
        .find(|(key, _)| matches!(key, Yaml::Value(Scalar::String(key)) if key == name))
        .map(|(_, value)| value)
}

fn children_field<'m, 'a>(mapping: &'m Mapping<'a>) -> Option<&'m Yaml<'a>> {
    field(mapping, "children").or_else(|| field(mapping, "replies"))
}

fn text_field(mapping: &Mapping<'_>, name: &str) -> Option<String> {
    match field(mapping, name)? {
        Yaml::Value(Scalar::String(value)) => Some(value.to_string()),
        Yaml::Value(Scalar::Integer(value)) => Some(value.to_string()),
        _ => None,
    }
}

struct SeedNode<D> {
    id: Option<NodeId>,
    data: D,
    children: Vec<SeedNode<D>>,
}

fn build_tree<D: NodeData>(
    nodes: &[Yaml<'_>],
    parse: fn(&Mapping<'_>) -> Result<D, SeedError>,
) -> Result<Tree<D>, SeedError> {
    let seeds = nodes
        .iter()
        .map(|node| parse_node(node, parse))
        .collect::<Result<Vec<_>, _>>()?;

    let mut next_id = seeds
        .iter()
        .filter_map(highest_explicit_id)
        .max()
        .map_or(1, |id| id.get().saturating_add(1));

    let roots = seeds
        .into_iter()
        .map(|seed| assign_ids(seed, &mut next_id))
        .collect::<Vec<_>>();

    Tree::new(roots).context(InvalidTreeSnafu)
}

fn parse_node<D>(
    node: &Yaml<'_>,
    parse: fn(&Mapping<'_>) -> Result<D, SeedError>,
) -> Result<SeedNode<D>, SeedError> {
    let mapping = node.as_mapping().context(InvalidNodeSnafu {
        reason: "every node must be a map",
    })?;

    let id = match field(mapping, "id") {
        None => None,
        Some(Yaml::Value(Scalar::Integer(id))) if *id >= 0 => Some(NodeId::new(*id as u64)),
        Some(_) => {
            return InvalidNodeSnafu {
                reason: "node ids must be non-negative integers",
            }
            .fail();
        }
    };

    let children = match children_field(mapping) {
        None => Vec::new(),
        Some(Yaml::Sequence(children)) => children
            .iter()
            .map(|child| parse_node(child, parse))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return InvalidNodeSnafu {
                reason: "children must be a list",
            }
            .fail();
        }
    };

    Ok(SeedNode {
        id,
        data: parse(mapping)?,
        children,
    })
}

fn highest_explicit_id<D>(seed: &SeedNode<D>) -> Option<NodeId> {
    seed.children
        .iter()
        .filter_map(highest_explicit_id)
        .chain(seed.id)
        .max()
}

fn assign_ids<D: NodeData>(seed: SeedNode<D>, next_id: &mut u64) -> Node<D> {
    let id = seed.id.unwrap_or_else(|| {
        let id = NodeId::new(*next_id);
        *next_id = next_id.saturating_add(1);
        id
    });
    let children = seed
        .children
        .into_iter()
        .map(|child| assign_ids(child, next_id))
        .collect::<Vec<_>>();
    Node::with_children(id, seed.data, children)
}

fn parse_check_item(mapping: &Mapping<'_>) -> Result<CheckItem, SeedError> {
    let label = text_field(mapping, "label").context(InvalidNodeSnafu {
        reason: "checklist items need a label",
    })?;
    let status = match field(mapping, "status") {
        None => Status::Unchecked,
        Some(Yaml::Value(Scalar::Boolean(true))) => Status::Checked,
        Some(Yaml::Value(Scalar::Boolean(false))) => Status::Unchecked,
        Some(Yaml::Value(Scalar::String(value))) => {
            Status::parse(value).context(InvalidStatusSnafu {
                value: value.to_string(),
            })?
        }
        Some(_) => {
            return InvalidStatusSnafu {
                value: "<non-scalar>",
            }
            .fail();
        }
    };
    Ok(CheckItem::new(label, status))
}

fn parse_entry(mapping: &Mapping<'_>) -> Result<Entry, SeedError> {
    let name = text_field(mapping, "name").context(InvalidNodeSnafu {
        reason: "explorer entries need a name",
    })?;
    let has_children = children_field(mapping).is_some();
    match text_field(mapping, "type").as_deref() {
        Some("folder") => Ok(Entry::folder(name)),
        Some("file") => Ok(Entry::file(name)),
        None if has_children => Ok(Entry::folder(name)),
        None => Ok(Entry::file(name)),
        Some(_) => InvalidNodeSnafu {
            reason: "entry type must be 'file' or 'folder'",
        }
        .fail(),
    }
}

fn parse_comment(mapping: &Mapping<'_>) -> Result<Comment, SeedError> {
    let content = text_field(mapping, "content").context(InvalidNodeSnafu {
        reason: "comments need content",
    })?;
    Ok(Comment::new(content))
}

#[derive(Debug, Snafu)]
pub enum SeedError {
    #[snafu(display("Failed to read the seed file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the seed file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted seed file"))]
    MalformedSeed,
    #[snafu(display("Top level of the seed should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The seed does not declare its kind"))]
    MissingKind,
    #[snafu(display("Unknown seed kind '{}'", kind))]
    UnknownKind { kind: String },
    #[snafu(display("Nodes section should be a list"))]
    NodesNotSequence,
    #[snafu(display("Invalid node: {}", reason))]
    InvalidNode { reason: String },
    #[snafu(display("Invalid status '{}'", value))]
    InvalidStatus { value: String },
    #[snafu(display("The seeded nodes do not form a valid tree"))]
    InvalidTree { source: TreeError },
}
