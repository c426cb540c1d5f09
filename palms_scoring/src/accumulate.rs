use log::{debug, warn};
use std::fmt::Display;

use crate::config::*;
use crate::headers::normalize;
use crate::reconcile::is_name_column;
use crate::roster::MemberCounters;

/// A metric cell whose content could not be read as a number. The cell
/// counts as zero.
#[derive(PartialEq, Debug, Clone)]
pub struct CellIssue {
    pub header: String,
    pub metric: MetricKey,
    pub content: String,
}

impl Display for CellIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "column {:?}: could not read {:?} as a number",
            self.header, self.content
        )
    }
}

/// Adds every recognized metric of a row to the counters.
///
/// Values are added to what is already there. Unknown columns and the name
/// columns are ignored. Unreadable cells contribute nothing and are
/// returned so that they can be reported.
pub fn apply(counters: &mut MemberCounters, row: &Row, columns: &NameColumns) -> Vec<CellIssue> {
    let mut issues: Vec<CellIssue> = Vec::new();
    for (header, value) in row.cells() {
        if is_name_column(header, columns) {
            continue;
        }
        let key = match normalize(header) {
            Some(k) => k,
            None => continue,
        };
        match cell_amount(value) {
            Some(x) if x > 0.0 => {
                debug!("apply: {:?} += {} (column {:?})", key, x, header);
                counters.add(key, x);
            }
            Some(_) => {
                // Zero or negative: nothing to add.
            }
            None => {
                warn!("apply: column {:?}: unreadable value {:?}", header, value);
                issues.push(CellIssue {
                    header: header.clone(),
                    metric: key,
                    content: value.as_text(),
                });
            }
        }
    }
    issues
}

/// Reads the numeric content of a cell.
///
/// Empty cells are zero. Text may carry a currency sign and thousands
/// separators (`₹1,200`). Returns None when the content is not a number.
pub fn cell_amount(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Empty => Some(0.0),
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Number(_) => None,
        CellValue::Text(s) => {
            let t = s.trim();
            if t.is_empty() {
                return Some(0.0);
            }
            let cleaned: String = t
                .trim_start_matches(|c: char| matches!(c, '$' | '₹' | '€' | '£'))
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok().filter(|x| x.is_finite())
        }
    }
}
