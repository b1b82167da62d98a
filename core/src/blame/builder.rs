use std::collections::HashMap;

use super::types::{Changeset, Scm};

/// Builds an [`Scm`] line by line, keeping a single changeset per revision.
///
/// The first line seen for a revision defines its author and date; later
/// lines of the same revision only point back at it.
#[derive(Debug, Default)]
pub struct ScmBuilder {
    changesets: Vec<Changeset>,
    index_by_revision: HashMap<String, usize>,
    changeset_index_by_line: Vec<usize>,
}

impl ScmBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute the next line to `revision`. Returns the changeset index.
    pub fn push_line(&mut self, revision: &str, author: Option<&str>, date: Option<i64>) -> usize {
        let index = match self.index_by_revision.get(revision) {
            Some(&index) => index,
            None => {
                let index = self.changesets.len();
                self.changesets.push(Changeset {
                    revision: revision.to_string(),
                    author: author.map(str::to_string),
                    date,
                });
                self.index_by_revision.insert(revision.to_string(), index);
                index
            }
        };
        self.changeset_index_by_line.push(index);
        index
    }

    pub fn changeset_count(&self) -> usize {
        self.changesets.len()
    }

    pub fn build(self) -> Scm {
        Scm {
            changesets: self.changesets,
            changeset_index_by_line: self.changeset_index_by_line,
        }
    }
}
