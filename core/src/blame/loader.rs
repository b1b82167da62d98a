use serde::{Deserialize, Serialize};
use tracing::debug;

use super::builder::ScmBuilder;
use super::source::{LineIndex, ReportReader};
use super::types::{FileIdentity, Scm};
use crate::error::Result;

/// Where the line attribution of a file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScmOrigin {
    /// Read as-is from the incremental report.
    Report,
    /// Rebuilt from the persisted line index.
    Index,
}

/// One way of obtaining the [`Scm`] of a file.
pub trait ScmStrategy {
    fn origin(&self) -> ScmOrigin;

    /// `Ok(None)` hands over to the next strategy.
    fn load(&self, file: &FileIdentity) -> Result<Option<Scm>>;
}

struct FromReport<'a, R>(&'a R);

impl<R: ReportReader> ScmStrategy for FromReport<'_, R> {
    fn origin(&self) -> ScmOrigin {
        ScmOrigin::Report
    }

    fn load(&self, file: &FileIdentity) -> Result<Option<Scm>> {
        self.0.read_component_scm(file.report_ref)
    }
}

struct FromIndex<'a, I>(&'a I);

impl<I: LineIndex> ScmStrategy for FromIndex<'_, I> {
    fn origin(&self) -> ScmOrigin {
        ScmOrigin::Index
    }

    fn load(&self, file: &FileIdentity) -> Result<Option<Scm>> {
        let mut builder = ScmBuilder::new();
        for line in self.0.get_lines(&file.file_uuid)? {
            builder.push_line(&line.revision, line.author.as_deref(), line.date);
        }
        Ok(Some(builder.build()))
    }
}

/// Loads the attribution of a file, preferring the incremental report and
/// falling back to the line index.
#[derive(Debug)]
pub struct ScmLoader<R, I> {
    report: R,
    index: I,
}

impl<R: ReportReader, I: LineIndex> ScmLoader<R, I> {
    pub fn new(report: R, index: I) -> Self {
        ScmLoader { report, index }
    }

    pub fn load(&self, file: &FileIdentity) -> Result<(Scm, ScmOrigin)> {
        let from_report = FromReport(&self.report);
        let from_index = FromIndex(&self.index);
        let strategies: [&dyn ScmStrategy; 2] = [&from_report, &from_index];

        for strategy in strategies {
            if let Some(scm) = strategy.load(file)? {
                let origin = strategy.origin();
                debug!(
                    file_uuid = %file.file_uuid,
                    report_ref = file.report_ref,
                    ?origin,
                    changesets = scm.changesets.len(),
                    lines = scm.line_count(),
                    "loaded line attribution"
                );
                return Ok((scm, origin));
            }
        }
        Ok((Scm::default(), ScmOrigin::Index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blame::source::{MemoryLineIndex, MemoryReport};
    use crate::blame::types::{Changeset, IndexedLine};

    fn file() -> FileIdentity {
        FileIdentity {
            file_uuid: "uuid-1".to_string(),
            report_ref: 7,
        }
    }

    fn indexed(revision: &str, author: &str, date: i64) -> IndexedLine {
        IndexedLine {
            revision: revision.to_string(),
            author: Some(author.to_string()),
            date: Some(date),
        }
    }

    #[test]
    fn test_report_is_preferred() {
        let scm = Scm {
            changesets: vec![Changeset {
                revision: "r9".to_string(),
                author: Some("zoe".to_string()),
                date: Some(9),
            }],
            changeset_index_by_line: vec![0],
        };
        let mut report = MemoryReport::new();
        report.insert(7, scm.clone());
        let mut index = MemoryLineIndex::new();
        index.insert("uuid-1", vec![indexed("r1", "alice", 1)]);

        let (loaded, origin) = ScmLoader::new(report, index).load(&file()).unwrap();
        assert_eq!(origin, ScmOrigin::Report);
        assert_eq!(loaded, scm);
    }

    #[test]
    fn test_falls_back_to_index_with_dedup() {
        let mut index = MemoryLineIndex::new();
        index.insert(
            "uuid-1",
            vec![
                indexed("r1", "alice", 100),
                indexed("r2", "bob", 200),
                indexed("r1", "alice", 100),
                indexed("r2", "bob", 200),
            ],
        );

        let (scm, origin) = ScmLoader::new(MemoryReport::new(), index)
            .load(&file())
            .unwrap();
        assert_eq!(origin, ScmOrigin::Index);
        assert_eq!(scm.changesets.len(), 2);
        assert_eq!(scm.changeset_index_by_line, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_unknown_file_yields_empty_scm() {
        let (scm, origin) = ScmLoader::new(MemoryReport::new(), MemoryLineIndex::new())
            .load(&file())
            .unwrap();
        assert_eq!(origin, ScmOrigin::Index);
        assert_eq!(scm, Scm::default());
    }
}
