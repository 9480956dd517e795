//! Upload parsing and source metadata.

mod parser;
mod source;

pub use parser::{NOT_CSV_MESSAGE, Parser, ParserConfig};
pub use source::{SourceMetadata, Upload};
