//! Loading datasets from delimited files and writing results back out.

mod parser;
mod source;
mod writer;

pub use parser::{Parser, ParserConfig};
pub use source::{Dataset, SourceMetadata};
pub use writer::{OUTPUT_INFIX, output_path_for, write_csv};
