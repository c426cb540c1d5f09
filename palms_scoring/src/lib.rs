/*!
Reconciliation and scoring of PALMS reports.

A PALMS report is a table exported by the tracking tool of a networking
group: one row per member, with columns for attendance, referrals, visitors,
one-to-one meetings and closed business. This crate matches every row to a
member of a team roster, accumulates the counters of the member, and turns
the counters into points and leaderboards.

```
use palms_scoring::builder::RosterBuilder;
use palms_scoring::*;

let mut builder = RosterBuilder::new().team("teamA", "Team A", "Sajid Hasan", None)?;
builder.add_member("teamA", "Sajid Hasan")?;
let roster = builder.build()?;

let rows = vec![Row::from_text(&[("Name", "Sajid Hasan"), ("P", "4"), ("V", "1")])];
let rules = CompetitionRules::standard();
let outcome = process_batch(&roster, &rows, &rules.name_columns)?;
assert_eq!(outcome.summary.rows_matched, 1);

let board = team_leaderboard(&outcome.roster, &rules);
assert_eq!(board[0].total_score, 55);
# Ok::<(), ScoringErrors>(())
```

See the [manual] for the supported column headers and the scoring rules.
 */

mod batch;
pub mod builder;
mod config;
mod leaderboard;
mod roster;

pub mod accumulate;
pub mod headers;
pub mod manual;
pub mod reconcile;
pub mod scoring;

pub use crate::batch::*;
pub use crate::config::*;
pub use crate::leaderboard::*;
pub use crate::roster::*;
pub use crate::scoring::{score_member, MemberScore};
