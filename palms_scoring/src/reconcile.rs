use log::debug;

use crate::config::*;
use crate::roster::{collapse_whitespace, MemberRef, Roster};

/// The outcome of matching a report row against the roster.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Resolution {
    /// The row belongs to this member.
    Matched(MemberRef),
    /// The row does not carry any name. Blank lines are common in exports.
    Skipped,
    /// The row names someone who is not in any team.
    Unmatched(String),
}

/// Extracts the member name written in a row.
///
/// The first/last name pair is preferred. If it yields nothing, the
/// full-name columns are tried in order and the first non-empty one wins.
/// The result is trimmed and may be empty.
pub fn candidate_name(row: &Row, columns: &NameColumns) -> String {
    let first = first_non_empty(row, &columns.first);
    let last = first_non_empty(row, &columns.last);
    let parts: Vec<String> = [first, last].into_iter().flatten().collect();
    if !parts.is_empty() {
        return collapse_whitespace(&parts.join(" "));
    }
    first_non_empty(row, &columns.full)
        .map(|s| collapse_whitespace(&s))
        .unwrap_or_default()
}

/// Finds the member a row refers to.
pub fn resolve(row: &Row, roster: &Roster, columns: &NameColumns) -> Resolution {
    let candidate = candidate_name(row, columns);
    if candidate.is_empty() {
        debug!("resolve: no name in row {:?}", row);
        return Resolution::Skipped;
    }
    match roster.find_member(&candidate) {
        Some(r) => {
            debug!("resolve: {:?} -> {:?}", candidate, r);
            Resolution::Matched(r)
        }
        None => Resolution::Unmatched(candidate),
    }
}

/// True if the header is one of the name columns. These columns are never
/// read as metrics.
pub fn is_name_column(header: &str, columns: &NameColumns) -> bool {
    let h = header.trim().to_lowercase();
    columns
        .first
        .iter()
        .chain(columns.last.iter())
        .chain(columns.full.iter())
        .any(|c| c.trim().to_lowercase() == h)
}

fn first_non_empty(row: &Row, headers: &[String]) -> Option<String> {
    headers
        .iter()
        .filter_map(|h| row.get(h))
        .map(|v| v.as_text().trim().to_string())
        .find(|s| !s.is_empty())
}
