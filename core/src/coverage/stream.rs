use super::types::CoverageEvent;
use crate::error::Result;
use crate::line::{SourceLine, StreamLine};

/// Merges a sparse, line-ascending sequence of coverage events into source
/// lines read in ascending order.
///
/// Holds at most one event ahead of the current line: it is applied when its
/// line is read and kept for later otherwise.
pub struct StreamLineCoverage<I> {
    events: I,
    pending: Option<CoverageEvent>,
}

impl<I: Iterator<Item = CoverageEvent>> StreamLineCoverage<I> {
    pub fn new<T>(events: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        StreamLineCoverage {
            events: events.into_iter(),
            pending: None,
        }
    }

    /// Takes the pending event if it belongs to `line`.
    fn next_for_line(&mut self, line: usize) -> Option<CoverageEvent> {
        if self.pending.is_none() {
            self.pending = self.events.next();
        }
        if self.pending.as_ref().is_some_and(|event| event.line == line) {
            self.pending.take()
        } else {
            None
        }
    }
}

impl<I: Iterator<Item = CoverageEvent>> StreamLine for StreamLineCoverage<I> {
    fn read_line(&mut self, line: usize, builder: &mut SourceLine) -> Result<()> {
        if let Some(event) = self.next_for_line(line) {
            apply_unit_tests(&event, builder);
            apply_integration_tests(&event, builder);
            apply_overall(&event, builder);
        }
        Ok(())
    }
}

fn apply_unit_tests(event: &CoverageEvent, builder: &mut SourceLine) {
    if event.has_ut_hits() {
        builder.ut_line_hits = Some(1);
    }
    if let (Some(conditions), Some(covered)) = (event.conditions, event.ut_covered_conditions) {
        builder.ut_conditions = Some(conditions);
        builder.ut_covered_conditions = Some(covered);
    }
}

fn apply_integration_tests(event: &CoverageEvent, builder: &mut SourceLine) {
    if event.has_it_hits() {
        builder.it_line_hits = Some(1);
    }
    if let (Some(conditions), Some(covered)) = (event.conditions, event.it_covered_conditions) {
        builder.it_conditions = Some(conditions);
        builder.it_covered_conditions = Some(covered);
    }
}

// Overall hits are the union of unit and integration hits, overall condition
// coverage is reported on its own.
fn apply_overall(event: &CoverageEvent, builder: &mut SourceLine) {
    if event.has_ut_hits() || event.has_it_hits() {
        builder.overall_line_hits = Some(1);
    }
    if let (Some(conditions), Some(covered)) =
        (event.conditions, event.overall_covered_conditions)
    {
        builder.overall_conditions = Some(conditions);
        builder.overall_covered_conditions = Some(covered);
    }
}
