pub mod builder;
pub mod cache;
pub mod loader;
pub mod parser;
pub mod source;
pub mod types;

pub use builder::ScmBuilder;
pub use cache::SourceLinesCache;
pub use loader::{ScmLoader, ScmOrigin, ScmStrategy};
pub use parser::{parse_blame_output, scm_from_blame};
pub use source::{LineIndex, MemoryLineIndex, MemoryReport, ReportReader};
pub use types::*;
