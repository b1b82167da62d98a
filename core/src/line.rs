use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Enriched record of one source line. Unset fields mean "no data".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLine {
    pub line: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scm_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scm_revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scm_date: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ut_line_hits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ut_conditions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ut_covered_conditions: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub it_line_hits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub it_conditions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub it_covered_conditions: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_line_hits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_conditions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_covered_conditions: Option<u32>,
}

impl SourceLine {
    pub fn new(line: usize) -> Self {
        SourceLine {
            line,
            ..Default::default()
        }
    }
}

/// A per-line data source feeding [`SourceLine`] records.
///
/// Lines must be read in ascending order, each at most once.
pub trait StreamLine {
    fn read_line(&mut self, line: usize, builder: &mut SourceLine) -> Result<()>;
}
