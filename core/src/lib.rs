pub mod blame;
pub mod coverage;
pub mod error;
pub mod line;
pub mod pipeline;

use wasm_bindgen::prelude::*;

pub use blame::{ScmOrigin, SourceLinesCache};
pub use coverage::{CoverageEvent, StreamLineCoverage};
pub use error::{EnrichError, Result};
pub use line::{SourceLine, StreamLine};
pub use pipeline::{enrich_file, issue_authors, EnrichRequest, EnrichResponse};

// ---------------------------------------------------------------------------
// JSON error wrapper
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
struct ErrorResult {
    error: String,
}

fn json_error(msg: &str) -> String {
    serde_json::to_string(&ErrorResult {
        error: msg.to_string(),
    })
    .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", msg))
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| json_error(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM-exported functions
// ---------------------------------------------------------------------------

/// Enrich the lines of one file.
///
/// Input: JSON [`EnrichRequest`] with `fileUuid`, `reportRef`, `lineCount`,
/// an optional `reportScm`, the `indexLines` fallback, line-sorted
/// `coverage` events and the `issueLines` to attribute.
/// Returns: JSON { lines, issueAuthors, lastCommit, origin } or { error }.
#[wasm_bindgen]
pub fn enrich_source_lines(request_json: &str) -> String {
    let request: EnrichRequest = match serde_json::from_str(request_json) {
        Ok(request) => request,
        Err(e) => return json_error(&EnrichError::from(e).to_string()),
    };

    match pipeline::run_request(request) {
        Ok(response) => to_json(&response),
        Err(e) => json_error(&e.to_string()),
    }
}

/// Parse raw `git blame --incremental` output into the line attribution of
/// the blamed file.
///
/// Returns: JSON { changesets, changesetIndexByLine }.
#[wasm_bindgen]
pub fn parse_blame(raw_blame: &[u8]) -> String {
    let entries = blame::parse_blame_output(raw_blame);
    to_json(&blame::scm_from_blame(&entries))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
