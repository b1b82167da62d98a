//! Per-file enrichment loop: attribution and coverage merged into one record
//! per line.

use serde::{Deserialize, Serialize};

use crate::blame::{
    IndexedLine, LastCommit, LineIndex, MemoryLineIndex, MemoryReport, ReportReader, Scm,
    ScmOrigin, SourceLinesCache,
};
use crate::coverage::{CoverageEvent, StreamLineCoverage};
use crate::error::Result;
use crate::line::{SourceLine, StreamLine};

/// Feeds the author, revision and date of the last change of each line.
pub struct StreamLineScm<'a, R, I> {
    cache: &'a mut SourceLinesCache<R, I>,
}

impl<'a, R: ReportReader, I: LineIndex> StreamLineScm<'a, R, I> {
    pub fn new(cache: &'a mut SourceLinesCache<R, I>) -> Self {
        StreamLineScm { cache }
    }
}

impl<R: ReportReader, I: LineIndex> StreamLine for StreamLineScm<'_, R, I> {
    fn read_line(&mut self, line: usize, builder: &mut SourceLine) -> Result<()> {
        builder.scm_author = self.cache.line_author(Some(line))?;
        if let Some(changeset) = self.cache.line_changeset(line)? {
            builder.scm_revision = Some(changeset.revision.clone());
            builder.scm_date = changeset.date;
        }
        Ok(())
    }
}

/// Builds the enriched records of lines `0..line_count` of a file.
///
/// The cache is switched to the file first, so anything cached for a
/// previous file is dropped. Coverage events must be sorted by line.
pub fn enrich_file<R, I, E>(
    cache: &mut SourceLinesCache<R, I>,
    file_uuid: &str,
    report_ref: Option<i32>,
    line_count: usize,
    coverage: E,
) -> Result<Vec<SourceLine>>
where
    R: ReportReader,
    I: LineIndex,
    E: IntoIterator<Item = CoverageEvent>,
{
    cache.reset(file_uuid, report_ref);

    let mut scm = StreamLineScm::new(cache);
    let mut coverage = StreamLineCoverage::new(coverage);
    let mut streams: [&mut dyn StreamLine; 2] = [&mut scm, &mut coverage];

    (0..line_count)
        .map(|line| -> Result<SourceLine> {
            let mut builder = SourceLine::new(line);
            for stream in streams.iter_mut() {
                stream.read_line(line, &mut builder)?;
            }
            Ok(builder)
        })
        .collect()
}

/// Authors of issues located on the current file, `None` for issues on the
/// file as a whole.
pub fn issue_authors<R, I>(
    cache: &mut SourceLinesCache<R, I>,
    issue_lines: &[Option<usize>],
) -> Result<Vec<Option<String>>>
where
    R: ReportReader,
    I: LineIndex,
{
    issue_lines
        .iter()
        .map(|&line| cache.line_author(line))
        .collect()
}

/// Everything needed to enrich one file, as handed over the WASM boundary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrichRequest {
    pub file_uuid: String,
    pub report_ref: Option<i32>,
    pub line_count: usize,
    /// Attribution from the incremental report, absent when the file was not
    /// analyzed with scm data.
    pub report_scm: Option<Scm>,
    /// Persisted lines, used when `report_scm` is absent.
    pub index_lines: Vec<IndexedLine>,
    pub coverage: Vec<CoverageEvent>,
    pub issue_lines: Vec<Option<usize>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichResponse {
    pub lines: Vec<SourceLine>,
    pub issue_authors: Vec<Option<String>>,
    pub last_commit: Option<LastCommit>,
    pub origin: Option<ScmOrigin>,
}

/// Runs [`enrich_file`] and [`issue_authors`] over in-memory collaborators.
pub fn run_request(request: EnrichRequest) -> Result<EnrichResponse> {
    let mut report = MemoryReport::new();
    if let (Some(report_ref), Some(scm)) = (request.report_ref, request.report_scm) {
        report.insert(report_ref, scm);
    }
    let mut index = MemoryLineIndex::new();
    index.insert(request.file_uuid.clone(), request.index_lines);

    let mut cache = SourceLinesCache::new(report, index);
    let lines = enrich_file(
        &mut cache,
        &request.file_uuid,
        request.report_ref,
        request.line_count,
        request.coverage,
    )?;
    let issue_authors = issue_authors(&mut cache, &request.issue_lines)?;
    let last_commit = cache.last_commit()?.cloned();

    Ok(EnrichResponse {
        lines,
        issue_authors,
        last_commit,
        origin: cache.origin(),
    })
}
