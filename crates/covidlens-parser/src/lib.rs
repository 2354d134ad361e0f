pub mod errors;
pub mod model;
mod reader;
pub mod schema;

pub use errors::{LoadError, ParseError};
pub use model::{LoadOptions, ParsedTable, SourceMetadata};
pub use reader::{load_bytes, load_path, load_table};
