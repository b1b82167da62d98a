pub mod stream;
pub mod types;

pub use stream::StreamLineCoverage;
pub use types::CoverageEvent;
