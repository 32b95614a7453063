//! Schema documents and the canonical table model

mod loader;
mod metadata;
mod options;
mod schema_parser;

pub use loader::*;
pub use metadata::*;
pub use options::*;
pub use schema_parser::*;
