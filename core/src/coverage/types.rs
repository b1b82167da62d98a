use serde::{Deserialize, Serialize};

/// Coverage measured on a single line by unit tests (`ut`), integration
/// tests (`it`) and both combined (`overall`).
///
/// `conditions` is the total number of conditions on the line, shared by the
/// three categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageEvent {
    pub line: usize,
    pub ut_hits: Option<bool>,
    pub it_hits: Option<bool>,
    pub conditions: Option<u32>,
    pub ut_covered_conditions: Option<u32>,
    pub it_covered_conditions: Option<u32>,
    pub overall_covered_conditions: Option<u32>,
}

impl CoverageEvent {
    pub fn new(line: usize) -> Self {
        CoverageEvent {
            line,
            ..Default::default()
        }
    }

    pub fn has_ut_hits(&self) -> bool {
        self.ut_hits == Some(true)
    }

    pub fn has_it_hits(&self) -> bool {
        self.it_hits == Some(true)
    }
}
