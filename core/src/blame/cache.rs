use tracing::{debug, warn};

use super::loader::{ScmLoader, ScmOrigin};
use super::source::{LineIndex, ReportReader};
use super::types::{Changeset, FileIdentity, LastCommit, Scm};
use crate::error::{EnrichError, Result};

struct LoadedScm {
    scm: Scm,
    last_commit: Option<LastCommit>,
    origin: ScmOrigin,
}

/// Line attribution of the file currently being processed.
///
/// Only a single file is kept in memory at a time, and its data is loaded on
/// the first query after [`reset`](Self::reset), so files without anything to
/// attribute never touch the report or the index. The line index is assumed
/// to be up to date with the file when it is read.
pub struct SourceLinesCache<R, I> {
    loader: ScmLoader<R, I>,
    file: Option<FileIdentity>,
    /// `None` until the first query after a reset.
    loaded: Option<LoadedScm>,
}

impl<R: ReportReader, I: LineIndex> SourceLinesCache<R, I> {
    pub fn new(report: R, index: I) -> Self {
        SourceLinesCache {
            loader: ScmLoader::new(report, index),
            file: None,
            loaded: None,
        }
    }

    /// Marks the file being processed and drops whatever was cached for the
    /// previous one. A file without report reference cannot be queried.
    pub fn reset(&mut self, file_uuid: impl Into<String>, report_ref: Option<i32>) {
        let file_uuid = file_uuid.into();
        match report_ref {
            Some(report_ref) => {
                debug!(%file_uuid, report_ref, "switching source lines cache to file");
                self.file = Some(FileIdentity {
                    file_uuid,
                    report_ref,
                });
            }
            None => {
                warn!(%file_uuid, "file has no report reference, lines cannot be attributed");
                self.file = None;
            }
        }
        self.clear();
    }

    /// Frees the cached attribution. The next query reloads it.
    pub fn clear(&mut self) {
        if self.loaded.take().is_some() {
            debug!("cleared cached line attribution");
        }
    }

    pub fn file(&self) -> Option<&FileIdentity> {
        self.file.as_ref()
    }

    /// Which collaborator the cached attribution was read from, if loaded.
    pub fn origin(&self) -> Option<ScmOrigin> {
        self.loaded.as_ref().map(|loaded| loaded.origin)
    }

    /// Last committer of a line (0-based). Without a line, for an issue on
    /// the file itself, the last committer of the whole file is returned.
    /// Lines with no or an empty author fall back to that same committer.
    pub fn line_author(&mut self, line: Option<usize>) -> Result<Option<String>> {
        let loaded = self.load_if_needed()?;
        let last_author = loaded.last_commit.as_ref().map(|commit| commit.author.clone());
        let Some(line) = line else {
            return Ok(last_author);
        };

        let author = loaded
            .scm
            .changeset_for_line(line)
            .and_then(|changeset| changeset.author.as_deref())
            .filter(|author| !author.is_empty());
        Ok(author.map(str::to_string).or(last_author))
    }

    /// Changeset that last touched a line (0-based).
    pub fn line_changeset(&mut self, line: usize) -> Result<Option<&Changeset>> {
        Ok(self.load_if_needed()?.scm.changeset_for_line(line))
    }

    pub fn last_commit(&mut self) -> Result<Option<&LastCommit>> {
        Ok(self.load_if_needed()?.last_commit.as_ref())
    }

    fn load_if_needed(&mut self) -> Result<&LoadedScm> {
        let file = self.file.as_ref().ok_or(EnrichError::MissingFileIdentity)?;
        let loaded = match self.loaded.take() {
            Some(loaded) => loaded,
            None => {
                let (scm, origin) = self.loader.load(file)?;
                LoadedScm {
                    last_commit: scm.last_commit(),
                    scm,
                    origin,
                }
            }
        };
        Ok(&*self.loaded.insert(loaded))
    }
}
