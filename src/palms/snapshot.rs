// The counters of a competition, saved between runs.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::palms::*;

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountersSnapshot {
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub medical: u64,
    pub substitute: u64,
    #[serde(rename = "referralsGivenInside")]
    pub referrals_given_inside: u64,
    #[serde(rename = "referralsGivenOutside")]
    pub referrals_given_outside: u64,
    #[serde(rename = "referralsReceivedInside")]
    pub referrals_received_inside: u64,
    #[serde(rename = "referralsReceivedOutside")]
    pub referrals_received_outside: u64,
    pub visitors: u64,
    #[serde(rename = "oneToOnes")]
    pub one_to_ones: u64,
    pub tyfcb: f64,
    pub ceu: u64,
    pub inductions: u64,
    #[serde(rename = "lateOnTime")]
    pub late_on_time: u64,
    #[serde(rename = "lateMild")]
    pub late_mild: u64,
    #[serde(rename = "lateSignificant")]
    pub late_significant: u64,
}

impl CountersSnapshot {
    fn from_counters(c: &MemberCounters) -> CountersSnapshot {
        CountersSnapshot {
            present: c.present,
            absent: c.absent,
            late: c.late,
            medical: c.medical,
            substitute: c.substitute,
            referrals_given_inside: c.referrals_given_inside,
            referrals_given_outside: c.referrals_given_outside,
            referrals_received_inside: c.referrals_received_inside,
            referrals_received_outside: c.referrals_received_outside,
            visitors: c.visitors,
            one_to_ones: c.one_to_ones,
            tyfcb: c.tyfcb,
            ceu: c.ceu,
            inductions: c.inductions,
            late_on_time: c.late_on_time,
            late_mild: c.late_mild,
            late_significant: c.late_significant,
        }
    }

    fn to_counters(&self) -> MemberCounters {
        MemberCounters {
            present: self.present,
            absent: self.absent,
            late: self.late,
            medical: self.medical,
            substitute: self.substitute,
            referrals_given_inside: self.referrals_given_inside,
            referrals_given_outside: self.referrals_given_outside,
            referrals_received_inside: self.referrals_received_inside,
            referrals_received_outside: self.referrals_received_outside,
            visitors: self.visitors,
            one_to_ones: self.one_to_ones,
            tyfcb: self.tyfcb,
            ceu: self.ceu,
            inductions: self.inductions,
            late_on_time: self.late_on_time,
            late_mild: self.late_mild,
            late_significant: self.late_significant,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub name: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub counters: CountersSnapshot,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub key: String,
    pub name: String,
    pub captain: String,
    pub color: Option<String>,
    pub members: Vec<MemberSnapshot>,
}

/// Teams are a list so that the order of the roster survives a round trip.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub version: u64,
    pub teams: Vec<TeamSnapshot>,
}

impl RosterSnapshot {
    pub fn from_roster(roster: &Roster) -> RosterSnapshot {
        RosterSnapshot {
            version: roster.version(),
            teams: roster
                .teams()
                .iter()
                .map(|t| TeamSnapshot {
                    key: t.key.clone(),
                    name: t.name.clone(),
                    captain: t.captain.clone(),
                    color: t.color.clone(),
                    members: t
                        .members
                        .iter()
                        .map(|m| MemberSnapshot {
                            name: m.name.clone(),
                            first_name: m.first_name.clone(),
                            last_name: m.last_name.clone(),
                            counters: CountersSnapshot::from_counters(&m.counters),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn to_roster(&self) -> Result<Roster, ScoringErrors> {
        let teams: Vec<Team> = self
            .teams
            .iter()
            .map(|t| Team {
                key: t.key.clone(),
                name: t.name.clone(),
                captain: t.captain.clone(),
                color: t.color.clone(),
                members: t
                    .members
                    .iter()
                    .map(|m| Member {
                        name: m.name.clone(),
                        first_name: m.first_name.clone(),
                        last_name: m.last_name.clone(),
                        counters: m.counters.to_counters(),
                    })
                    .collect(),
            })
            .collect();
        Roster::from_parts(teams, self.version)
    }
}

/// Loads the roster saved in a state file. A missing file is not an error:
/// the competition has not started yet.
pub fn load_snapshot(path: &str) -> BPalmsResult<Option<Roster>> {
    if !Path::new(path).exists() {
        info!("load_snapshot: no state in {:?}, starting from zero", path);
        return Ok(None);
    }
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let snapshot: RosterSnapshot =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let roster = snapshot.to_roster().context(ScoringSnafu {
        message: format!("Invalid state file {}", path),
    })?;
    info!(
        "load_snapshot: restored version {} from {:?}",
        roster.version(),
        path
    );
    Ok(Some(roster))
}

pub fn save_snapshot(path: &str, roster: &Roster) -> BPalmsResult<()> {
    let snapshot = RosterSnapshot::from_roster(roster);
    let js = serde_json::to_string_pretty(&snapshot).context(ParsingJsonSnafu {})?;
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingFileSnafu { path })?;
        }
    }
    fs::write(path, js).context(WritingFileSnafu { path })?;
    info!(
        "save_snapshot: saved version {} to {:?}",
        roster.version(),
        path
    );
    Ok(())
}

/// Carries the counters of a saved roster over to the roster of the
/// configuration.
///
/// The teams and members come from the configuration, which may have changed
/// since the state was saved. Saved members that are no longer in the
/// configuration are dropped with a warning.
pub fn restore_counters(configured: &Roster, saved: &Roster) -> BPalmsResult<Roster> {
    let mut teams: Vec<Team> = configured.teams().to_vec();
    for t in teams.iter_mut() {
        for m in t.members.iter_mut() {
            if let Some(m2) = saved.find_member(&m.name).and_then(|r| saved.member(r)) {
                m.counters = m2.counters.clone();
            }
        }
    }
    for t in saved.teams() {
        for m in t.members.iter() {
            if configured.find_member(&m.name).is_none() {
                warn!(
                    "restore_counters: {} (team {}) is no longer in the configuration, dropping its counters",
                    m.name, t.key
                );
            }
        }
    }
    let roster = Roster::from_parts(teams, saved.version()).context(ScoringSnafu {
        message: "Cannot restore the saved counters".to_string(),
    })?;
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palms_scoring::builder::RosterBuilder;

    fn roster() -> Roster {
        let mut b = RosterBuilder::new()
            .team("teamA", "Team A", "Sajid Hasan", Some("#dc2626"))
            .unwrap()
            .team("teamB", "Team B", "Vijay Gupta", None)
            .unwrap();
        b.add_member("teamA", "Sajid Hasan").unwrap();
        b.add_member_parts("teamB", "Vijay", "Gupta").unwrap();
        b.build().unwrap()
    }

    fn with_counters() -> Roster {
        let rows = vec![
            Row::from_text(&[("Name", "Sajid Hasan"), ("P", "4"), ("TYFCB", "1250.75")]),
            Row::from_text(&[("Name", "Vijay Gupta"), ("On Time", "2"), ("RRO", "1")]),
        ];
        let mut r = process_batch(&roster(), &rows, &NameColumns::default())
            .unwrap()
            .roster;
        r.record_late("Vijay Gupta").unwrap();
        r
    }

    #[test]
    fn save_then_load_is_lossless() {
        let r = with_counters();
        let path = std::env::temp_dir()
            .join(format!("palmsboard-{}-snapshot.json", std::process::id()))
            .display()
            .to_string();
        save_snapshot(&path, &r).unwrap();
        let loaded = load_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded, r);
        assert_eq!(loaded.version(), 2);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_state_file() {
        assert_eq!(load_snapshot("/nonexistent/palms_state.json").unwrap(), None);
    }

    #[test]
    fn counters_follow_the_configuration() {
        let saved = with_counters();
        let mut b = RosterBuilder::new()
            .team("teamA", "Team A", "Sajid Hasan", None)
            .unwrap();
        b.add_member("teamA", "sajid  hasan").unwrap();
        b.add_member("teamA", "Abhinav Gupta").unwrap();
        let configured = b.build().unwrap();
        let r = restore_counters(&configured, &saved).unwrap();
        assert_eq!(r.version(), saved.version());
        assert_eq!(r.teams().len(), 1);
        assert_eq!(r.teams()[0].members[0].counters.present, 4);
        assert_eq!(r.teams()[0].members[0].counters.tyfcb, 1250.75);
        assert_eq!(r.teams()[0].members[1].counters, MemberCounters::default());
    }
}
