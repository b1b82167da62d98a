use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::builder::ScmBuilder;
use super::types::{BlameEntry, Scm};

/// `<40-hex sha> <orig_line> <final_line> [<num_lines>]`
fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^([0-9a-f]{40}) (\d+) (\d+)(?: (\d+))?$").expect("valid blame header regex")
    })
}

/// Commit metadata. `git blame --incremental` only prints it the first time
/// a commit shows up, later chunks of that commit carry the header alone.
#[derive(Debug, Clone, Default)]
struct CommitInfo {
    author: String,
    author_mail: String,
    author_time: i64,
    committer: String,
    committer_time: i64,
    summary: String,
}

#[derive(Debug)]
struct Chunk {
    sha: String,
    orig_line: u32,
    final_line: u32,
    num_lines: u32,
    filename: Option<String>,
}

impl Chunk {
    fn into_entry(self, info: &CommitInfo) -> Option<BlameEntry> {
        let filename = self.filename?;
        Some(BlameEntry {
            sha: self.sha,
            orig_line: self.orig_line,
            final_line: self.final_line,
            num_lines: self.num_lines,
            author: info.author.clone(),
            author_mail: info.author_mail.clone(),
            author_time: info.author_time,
            committer: info.committer.clone(),
            committer_time: info.committer_time,
            summary: info.summary.clone(),
            filename,
        })
    }
}

/// Parse `git blame --incremental` output into blame chunks.
///
/// The output is a sequence of chunks:
/// ```text
/// <40-char sha> <orig_line> <final_line> <num_lines>
/// author <name>
/// author-mail <<email>>
/// author-time <epoch>
/// author-tz <tz>
/// committer <name>
/// committer-mail <<email>>
/// committer-time <epoch>
/// committer-tz <tz>
/// summary <text>
/// previous <sha> <filename>
/// filename <path>
/// ```
/// A chunk is complete once its `filename` line is seen; chunks cut short
/// are dropped. Non UTF-8 input yields no chunks.
pub fn parse_blame_output(raw: &[u8]) -> Vec<BlameEntry> {
    let Ok(input) = std::str::from_utf8(raw) else {
        return Vec::new();
    };

    let mut commits: HashMap<String, CommitInfo> = HashMap::new();
    let mut entries = Vec::new();
    let mut chunk: Option<Chunk> = None;

    for line in input.lines().map(str::trim_end) {
        if line.is_empty() || line.starts_with('\t') {
            continue;
        }

        if let Some(caps) = header_regex().captures(line) {
            if let Some(done) = chunk.take() {
                let info = commits.get(&done.sha).cloned().unwrap_or_default();
                entries.extend(done.into_entry(&info));
            }
            chunk = Some(Chunk {
                sha: caps[1].to_string(),
                orig_line: caps[2].parse().unwrap_or(0),
                final_line: caps[3].parse().unwrap_or(0),
                num_lines: caps.get(4).and_then(|m| m.as_str().parse().ok()).unwrap_or(1),
                filename: None,
            });
            continue;
        }

        let Some(current) = chunk.as_mut() else {
            continue;
        };
        let info = commits.entry(current.sha.clone()).or_default();

        if let Some(val) = line.strip_prefix("author-mail ") {
            info.author_mail = val.trim_start_matches('<').trim_end_matches('>').to_string();
        } else if let Some(val) = line.strip_prefix("author-time ") {
            info.author_time = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("author ") {
            info.author = val.to_string();
        } else if let Some(val) = line.strip_prefix("committer-time ") {
            info.committer_time = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("committer ") {
            info.committer = val.to_string();
        } else if let Some(val) = line.strip_prefix("summary ") {
            info.summary = val.to_string();
        } else if let Some(val) = line.strip_prefix("filename ") {
            current.filename = Some(val.to_string());
        }
        // author-tz, committer-mail, committer-tz, previous, boundary: unused
    }

    if let Some(done) = chunk {
        let info = commits.get(&done.sha).cloned().unwrap_or_default();
        entries.extend(done.into_entry(&info));
    }

    entries
}

/// Upper bound on the lines attributed from blame output.
const MAX_BLAME_LINES: u64 = 1 << 22;

/// Build the line attribution of a file from its blame chunks.
///
/// Chunks may come in any order. Lines are attributed from line 1 onward
/// until the first line no chunk covers; later lines stay unattributed.
/// A chunk reaching past the number of lines all chunks report together
/// (or past [`MAX_BLAME_LINES`]) is ignored. Author times are converted to
/// epoch milliseconds; an empty author, a non-positive time or one that does
/// not fit in milliseconds counts as missing.
pub fn scm_from_blame(entries: &[BlameEntry]) -> Scm {
    let reported: u64 = entries.iter().map(|entry| u64::from(entry.num_lines)).sum();
    let limit = reported.min(MAX_BLAME_LINES);

    let mut chunks: Vec<&BlameEntry> = entries
        .iter()
        .filter(|entry| entry.final_line > 0 && entry.num_lines > 0)
        .filter(|entry| u64::from(entry.final_line) - 1 + u64::from(entry.num_lines) <= limit)
        .collect();
    chunks.sort_by_key(|entry| entry.final_line);

    let mut builder = ScmBuilder::new();
    let mut next_line = 1u64;
    for entry in chunks {
        let first = u64::from(entry.final_line);
        if first < next_line {
            // overlaps lines already attributed
            continue;
        }
        if first > next_line {
            break;
        }

        let author = Some(entry.author.as_str()).filter(|a| !a.is_empty());
        let date = Some(entry.author_time)
            .filter(|&t| t > 0)
            .and_then(|t| t.checked_mul(1000));
        for _ in 0..entry.num_lines {
            builder.push_line(&entry.sha, author, date);
        }
        next_line = first + u64::from(entry.num_lines);
    }
    builder.build()
}
