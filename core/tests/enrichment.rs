use std::cell::Cell;
use std::collections::HashMap;

use lines_core::blame::{Changeset, IndexedLine, LineIndex, ReportReader, Scm};
use lines_core::{
    enrich_file, issue_authors, CoverageEvent, EnrichError, ScmOrigin, SourceLinesCache,
};

/// Report that counts how often it is read.
#[derive(Default)]
struct CountingReport {
    scms: HashMap<i32, Scm>,
    reads: Cell<usize>,
}

impl ReportReader for CountingReport {
    fn read_component_scm(&self, report_ref: i32) -> lines_core::Result<Option<Scm>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.scms.get(&report_ref).cloned())
    }
}

/// Line index that counts how often it is queried.
#[derive(Default)]
struct CountingIndex {
    lines: HashMap<String, Vec<IndexedLine>>,
    reads: Cell<usize>,
}

impl LineIndex for CountingIndex {
    fn get_lines(&self, file_uuid: &str) -> lines_core::Result<Vec<IndexedLine>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.lines.get(file_uuid).cloned().unwrap_or_default())
    }
}

struct FailingIndex;

impl LineIndex for FailingIndex {
    fn get_lines(&self, file_uuid: &str) -> lines_core::Result<Vec<IndexedLine>> {
        Err(EnrichError::Index {
            uuid: file_uuid.to_string(),
            source: "connection refused".into(),
        })
    }
}

fn indexed(revision: &str, author: &str, date: i64) -> IndexedLine {
    IndexedLine {
        revision: revision.to_string(),
        author: Some(author.to_string()),
        date: Some(date),
    }
}

fn alice_and_bob_index() -> CountingIndex {
    let mut index = CountingIndex::default();
    index.lines.insert(
        "file-a".to_string(),
        vec![
            indexed("R1", "alice", 100),
            indexed("R2", "bob", 200),
            indexed("R2", "bob", 200),
        ],
    );
    index
}

#[test]
fn single_load_per_file_from_index() {
    let report = CountingReport::default();
    let index = alice_and_bob_index();
    let mut cache = SourceLinesCache::new(&report, &index);

    cache.reset("file-a", Some(1));
    assert_eq!(report.reads.get(), 0);
    assert_eq!(index.reads.get(), 0);

    assert_eq!(cache.line_author(Some(0)).unwrap().as_deref(), Some("alice"));
    assert_eq!(cache.line_author(Some(1)).unwrap().as_deref(), Some("bob"));
    assert_eq!(cache.line_author(Some(2)).unwrap().as_deref(), Some("bob"));
    assert_eq!(cache.line_author(None).unwrap().as_deref(), Some("bob"));

    assert_eq!(report.reads.get(), 1);
    assert_eq!(index.reads.get(), 1);
    assert_eq!(cache.origin(), Some(ScmOrigin::Index));
}

#[test]
fn lines_of_one_revision_share_a_changeset() {
    let report = CountingReport::default();
    let index = alice_and_bob_index();
    let mut cache = SourceLinesCache::new(&report, &index);
    cache.reset("file-a", Some(1));

    let first = cache.line_changeset(1).unwrap().cloned().unwrap();
    let second = cache.line_changeset(2).unwrap().cloned().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.revision, "R2");
}

#[test]
fn report_short_circuits_the_index() {
    let mut report = CountingReport::default();
    report.scms.insert(
        5,
        Scm {
            changesets: vec![Changeset {
                revision: "R7".to_string(),
                author: Some("carol".to_string()),
                date: Some(700),
            }],
            changeset_index_by_line: vec![0],
        },
    );
    let index = alice_and_bob_index();
    let mut cache = SourceLinesCache::new(&report, &index);

    cache.reset("file-a", Some(5));
    assert_eq!(cache.line_author(Some(0)).unwrap().as_deref(), Some("carol"));
    assert_eq!(cache.origin(), Some(ScmOrigin::Report));
    assert_eq!(report.reads.get(), 1);
    assert_eq!(index.reads.get(), 0);
}

#[test]
fn switching_files_loads_each_once() {
    let report = CountingReport::default();
    let mut index = alice_and_bob_index();
    index
        .lines
        .insert("file-b".to_string(), vec![indexed("R3", "dave", 300)]);
    let mut cache = SourceLinesCache::new(&report, &index);

    let lines = enrich_file(&mut cache, "file-a", Some(1), 3, Vec::new()).unwrap();
    assert_eq!(lines[2].scm_author.as_deref(), Some("bob"));
    let authors = issue_authors(&mut cache, &[Some(0), None, Some(2)]).unwrap();
    assert_eq!(
        authors,
        vec![
            Some("alice".to_string()),
            Some("bob".to_string()),
            Some("bob".to_string())
        ]
    );
    assert_eq!(index.reads.get(), 1);

    let coverage = vec![CoverageEvent {
        ut_hits: Some(true),
        ..CoverageEvent::new(0)
    }];
    let lines = enrich_file(&mut cache, "file-b", Some(2), 1, coverage).unwrap();
    assert_eq!(lines[0].scm_author.as_deref(), Some("dave"));
    assert_eq!(lines[0].ut_line_hits, Some(1));
    assert_eq!(index.reads.get(), 2);
    assert_eq!(report.reads.get(), 2);
}

#[test]
fn file_without_lines_to_attribute_is_never_loaded() {
    let report = CountingReport::default();
    let index = alice_and_bob_index();
    let mut cache = SourceLinesCache::new(&report, &index);

    let lines = enrich_file(&mut cache, "file-a", Some(1), 0, Vec::new()).unwrap();
    assert!(lines.is_empty());
    assert_eq!(report.reads.get(), 0);
    assert_eq!(index.reads.get(), 0);
}

#[test]
fn index_failures_propagate() {
    let report = CountingReport::default();
    let mut cache = SourceLinesCache::new(&report, FailingIndex);
    cache.reset("file-a", Some(1));

    let err = cache.line_author(Some(0)).unwrap_err();
    assert!(matches!(err, EnrichError::Index { ref uuid, .. } if uuid == "file-a"));
    assert!(err.to_string().contains("connection refused"));
    // nothing was cached, the next query tries again
    assert_eq!(cache.origin(), None);
}
