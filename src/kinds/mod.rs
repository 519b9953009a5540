//! Node payloads for the three tree flavours: nested checklists, file
//! explorers and comment threads.

mod checklist;
mod comments;
mod explorer;

pub use checklist::CheckItem;
pub use comments::Comment;
pub use explorer::{Entry, EntryKind};
