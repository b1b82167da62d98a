use serde::{Deserialize, Serialize};

/// One commit that last touched at least one line of a file.
/// Changesets of a file are unique by `revision`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changeset {
    pub revision: String,
    pub author: Option<String>,
    /// Commit date in epoch milliseconds.
    pub date: Option<i64>,
}

/// Line attribution of a single file: deduplicated changesets plus, for each
/// 0-based line, the index of the changeset that last touched it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scm {
    pub changesets: Vec<Changeset>,
    pub changeset_index_by_line: Vec<usize>,
}

impl Scm {
    /// Changeset covering `line`, if the line is attributed.
    pub fn changeset_for_line(&self, line: usize) -> Option<&Changeset> {
        self.changeset_index_by_line
            .get(line)
            .and_then(|&index| self.changesets.get(index))
    }

    pub fn line_count(&self) -> usize {
        self.changeset_index_by_line.len()
    }

    /// Latest changeset carrying both an author and a date.
    ///
    /// Dates must be strictly greater than the best seen so far, starting
    /// from 0, so the first changeset reaching the maximum wins.
    pub fn last_commit(&self) -> Option<LastCommit> {
        let mut last_date = 0i64;
        let mut last = None;
        for changeset in &self.changesets {
            if let (Some(author), Some(date)) = (&changeset.author, changeset.date) {
                if date > last_date {
                    last_date = date;
                    last = Some(LastCommit {
                        date,
                        author: author.clone(),
                    });
                }
            }
        }
        last
    }
}

/// Author and date of the most recent commit on a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastCommit {
    pub date: i64,
    pub author: String,
}

/// A line as recorded by a previous analysis in the persisted line index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedLine {
    pub revision: String,
    pub author: Option<String>,
    pub date: Option<i64>,
}

/// A file whose lines can be enriched: both its uuid and its reference in the
/// incremental report are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    pub file_uuid: String,
    pub report_ref: i32,
}

/// A single chunk from `git blame --incremental` output.
/// Each chunk attributes a range of final lines to a specific commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlameEntry {
    pub sha: String,
    pub orig_line: u32,
    /// 1-based first line of the chunk in the current file.
    pub final_line: u32,
    pub num_lines: u32,
    pub author: String,
    pub author_mail: String,
    /// Epoch seconds.
    pub author_time: i64,
    pub committer: String,
    pub committer_time: i64,
    pub summary: String,
    pub filename: String,
}
