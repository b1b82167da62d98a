//! Collaborators the blame cache reads from.
//!
//! Both readers are plain blocking calls. Their failures are expected to be
//! reported as [`EnrichError::Report`](crate::EnrichError::Report) or
//! [`EnrichError::Index`](crate::EnrichError::Index) by the implementation
//! and are handed back to the caller untouched.

use std::collections::HashMap;

use super::types::{IndexedLine, Scm};
use crate::error::Result;

/// Reader of the incremental report produced by the current analysis.
pub trait ReportReader {
    /// Line attribution of a component, or `None` when the component was not
    /// analyzed with scm data in this report.
    fn read_component_scm(&self, report_ref: i32) -> Result<Option<Scm>>;
}

/// Persisted line metadata from previous analyses.
pub trait LineIndex {
    /// All lines of a file, in line order.
    fn get_lines(&self, file_uuid: &str) -> Result<Vec<IndexedLine>>;
}

impl<T: ReportReader + ?Sized> ReportReader for &T {
    fn read_component_scm(&self, report_ref: i32) -> Result<Option<Scm>> {
        (**self).read_component_scm(report_ref)
    }
}

impl<T: LineIndex + ?Sized> LineIndex for &T {
    fn get_lines(&self, file_uuid: &str) -> Result<Vec<IndexedLine>> {
        (**self).get_lines(file_uuid)
    }
}

/// Report held in memory, keyed by component reference.
#[derive(Debug, Default, Clone)]
pub struct MemoryReport {
    scms: HashMap<i32, Scm>,
}

impl MemoryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, report_ref: i32, scm: Scm) {
        self.scms.insert(report_ref, scm);
    }
}

impl ReportReader for MemoryReport {
    fn read_component_scm(&self, report_ref: i32) -> Result<Option<Scm>> {
        Ok(self.scms.get(&report_ref).cloned())
    }
}

/// Line index held in memory, keyed by file uuid. Unknown files have no lines.
#[derive(Debug, Default, Clone)]
pub struct MemoryLineIndex {
    lines: HashMap<String, Vec<IndexedLine>>,
}

impl MemoryLineIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_uuid: impl Into<String>, lines: Vec<IndexedLine>) {
        self.lines.insert(file_uuid.into(), lines);
    }
}

impl LineIndex for MemoryLineIndex {
    fn get_lines(&self, file_uuid: &str) -> Result<Vec<IndexedLine>> {
        Ok(self.lines.get(file_uuid).cloned().unwrap_or_default())
    }
}
