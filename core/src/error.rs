/// Errors surfaced while enriching the lines of a source file.
///
/// Missing blame or coverage data is never an error: it resolves to unset
/// fields on the produced lines. Only a misused cache or a failing
/// collaborator ends up here.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// Lines were queried before a complete file identity was set.
    #[error("file uuid and report reference must both be set before reading source lines")]
    MissingFileIdentity,

    /// The incremental report could not be read for a component.
    #[error("failed to read scm of component {report_ref} from the report: {source}")]
    Report {
        report_ref: i32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The persisted line index could not be queried for a file.
    #[error("failed to read indexed lines of file {uuid}: {source}")]
    Index {
        uuid: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A JSON request handed to the WASM surface was malformed.
    #[error("invalid enrichment request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
