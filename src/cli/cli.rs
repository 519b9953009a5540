use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Edit a seeded tree and print the result")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// YAML seed describing the initial tree
    #[clap(long, short, default_value = "seed.yaml", global = true)]
    pub seed: PathBuf,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the tree as seeded
    Show,
    /// Flip a checklist item together with everything below it
    Toggle { id: u64 },
    /// Add a node, at the top level unless a parent is given
    Insert {
        #[clap(long, short)]
        parent: Option<u64>,
        /// Append instead of prepending
        #[clap(long)]
        last: bool,
        /// Create a folder rather than a file (explorer seeds only)
        #[clap(long)]
        folder: bool,
        text: String,
    },
    /// Replace the label, name or content of a node
    Rename { id: u64, text: String },
    /// Remove a node and its whole subtree
    Delete { id: u64 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Show => "show",
            Command::Toggle { .. } => "toggle",
            Command::Insert { .. } => "insert",
            Command::Rename { .. } => "rename",
            Command::Delete { .. } => "delete",
        }
    }
}
