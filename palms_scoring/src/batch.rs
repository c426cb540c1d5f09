// ******** Batch processing *********

use log::{debug, error, info, warn};
use std::sync::Mutex;

use crate::accumulate::apply;
use crate::config::*;
use crate::reconcile::{resolve, Resolution};
use crate::roster::Roster;

/// The maximum number of unmatched names and errors quoted in a status line.
pub const DISPLAY_LIMIT: usize = 5;

/// What happened to the rows of one batch.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub rows_processed: usize,
    pub rows_matched: usize,
    /// Rows without any name.
    pub rows_skipped: usize,
    /// The names that did not match any member, in row order.
    pub unmatched: Vec<String>,
    /// Cells that could not be read, prefixed with their row number.
    pub errors: Vec<String>,
}

impl ProcessingSummary {
    /// A one-line report of the batch.
    pub fn status_message(&self) -> String {
        let mut msg = format!(
            "{} rows processed: {} matched, {} skipped",
            self.rows_processed, self.rows_matched, self.rows_skipped
        );
        if !self.unmatched.is_empty() {
            msg.push_str(&format!(
                "; {} not found: {}",
                self.unmatched.len(),
                abbreviate(&self.unmatched)
            ));
        }
        if !self.errors.is_empty() {
            msg.push_str(&format!(
                "; {} unreadable cells: {}",
                self.errors.len(),
                abbreviate(&self.errors)
            ));
        }
        msg
    }
}

fn abbreviate(items: &[String]) -> String {
    let shown: Vec<&str> = items
        .iter()
        .take(DISPLAY_LIMIT)
        .map(|s| s.as_str())
        .collect();
    let mut res = shown.join(", ");
    if items.len() > DISPLAY_LIMIT {
        res.push_str(&format!(" (+{} more)", items.len() - DISPLAY_LIMIT));
    }
    res
}

/// The result of a successful batch: the roster to publish and the summary.
#[derive(PartialEq, Debug, Clone)]
pub struct BatchOutcome {
    pub roster: Roster,
    pub summary: ProcessingSummary,
}

/// Applies all the rows of a report to a copy of the roster.
///
/// The input roster is never modified. On success the returned roster
/// carries a bumped version and should replace the current one. A batch
/// without rows is rejected.
pub fn process_batch(
    roster: &Roster,
    rows: &[Row],
    columns: &NameColumns,
) -> Result<BatchOutcome, ScoringErrors> {
    if rows.is_empty() {
        error!("process_batch: no data rows");
        return Err(ScoringErrors::EmptyBatch);
    }
    let mut working = roster.clone();
    let mut summary = ProcessingSummary::default();
    for (idx, row) in rows.iter().enumerate() {
        summary.rows_processed += 1;
        // Row numbers as seen in a spreadsheet, below the header line.
        let row_number = idx + 2;
        match resolve(row, &working, columns) {
            Resolution::Skipped => {
                debug!("process_batch: row {}: skipped", row_number);
                summary.rows_skipped += 1;
            }
            Resolution::Unmatched(name) => {
                warn!(
                    "process_batch: row {}: member {:?} not found in any team",
                    row_number, name
                );
                summary.unmatched.push(name);
            }
            Resolution::Matched(r) => {
                let member = working
                    .member_mut(r)
                    .ok_or_else(|| ScoringErrors::UnknownMember(format!("{:?}", r)))?;
                let issues = apply(&mut member.counters, row, columns);
                summary.rows_matched += 1;
                for issue in issues {
                    summary.errors.push(format!("row {}: {}", row_number, issue));
                }
            }
        }
    }
    working.bump_version();
    info!(
        "process_batch: version {}: {}",
        working.version(),
        summary.status_message()
    );
    Ok(BatchOutcome {
        roster: working,
        summary,
    })
}

/// A roster that can be shared between threads.
///
/// An upload holds the lock for the whole batch, so readers see either the
/// roster before the batch or the roster after it.
#[derive(Debug)]
pub struct SharedRoster {
    roster: Mutex<Roster>,
}

impl SharedRoster {
    pub fn new(roster: Roster) -> SharedRoster {
        SharedRoster {
            roster: Mutex::new(roster),
        }
    }

    pub fn upload(
        &self,
        rows: &[Row],
        columns: &NameColumns,
    ) -> Result<ProcessingSummary, ScoringErrors> {
        let mut guard = self
            .roster
            .lock()
            .map_err(|_| ScoringErrors::RosterUnavailable)?;
        let outcome = process_batch(&guard, rows, columns)?;
        *guard = outcome.roster;
        Ok(outcome.summary)
    }

    pub fn record_late(&self, name: &str) -> Result<u64, ScoringErrors> {
        let mut guard = self
            .roster
            .lock()
            .map_err(|_| ScoringErrors::RosterUnavailable)?;
        guard.record_late(name)
    }

    pub fn clear_counters(&self) -> Result<(), ScoringErrors> {
        let mut guard = self
            .roster
            .lock()
            .map_err(|_| ScoringErrors::RosterUnavailable)?;
        guard.clear_counters();
        Ok(())
    }

    /// A copy of the currently published roster.
    pub fn snapshot(&self) -> Result<Roster, ScoringErrors> {
        let guard = self
            .roster
            .lock()
            .map_err(|_| ScoringErrors::RosterUnavailable)?;
        Ok(guard.clone())
    }
}
