mod seed;

pub use seed::{Document, DocumentKind, SeedError};
