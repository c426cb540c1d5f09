use log::{debug, info};
use std::collections::HashSet;

use crate::config::*;

/// The running counters of a member. All the counts only grow through
/// accumulation, until `clear` is called.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct MemberCounters {
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub medical: u64,
    pub substitute: u64,
    pub referrals_given_inside: u64,
    pub referrals_given_outside: u64,
    pub referrals_received_inside: u64,
    pub referrals_received_outside: u64,
    pub visitors: u64,
    pub one_to_ones: u64,
    /// Summed closed-business amount (currency).
    pub tyfcb: f64,
    pub ceu: u64,
    pub inductions: u64,
    pub late_on_time: u64,
    pub late_mild: u64,
    pub late_significant: u64,
}

impl MemberCounters {
    /// The current value of a counter.
    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Tyfcb => self.tyfcb,
            _ => self.count(key) as f64,
        }
    }

    /// Adds an amount to the counter of the given key.
    ///
    /// Amounts that are not strictly positive are ignored. The integer
    /// counters keep the whole part of the amount.
    pub fn add(&mut self, key: MetricKey, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        if key == MetricKey::Tyfcb {
            self.tyfcb += amount;
            return;
        }
        let whole = amount.floor() as u64;
        if let Some(c) = self.count_mut(key) {
            *c = c.saturating_add(whole);
        }
    }

    /// Adds all the counters of another member. Counts saturate.
    pub fn merge(&mut self, other: &MemberCounters) {
        self.tyfcb += other.tyfcb;
        for key in MetricKey::ALL {
            let added = other.count(key);
            if let Some(c) = self.count_mut(key) {
                *c = c.saturating_add(added);
            }
        }
    }

    pub fn clear(&mut self) {
        *self = MemberCounters::default();
    }

    fn count(&self, key: MetricKey) -> u64 {
        match key {
            MetricKey::Present => self.present,
            MetricKey::Absent => self.absent,
            MetricKey::Late => self.late,
            MetricKey::Medical => self.medical,
            MetricKey::Substitute => self.substitute,
            MetricKey::ReferralGivenInside => self.referrals_given_inside,
            MetricKey::ReferralGivenOutside => self.referrals_given_outside,
            MetricKey::ReferralReceivedInside => self.referrals_received_inside,
            MetricKey::ReferralReceivedOutside => self.referrals_received_outside,
            MetricKey::Visitors => self.visitors,
            MetricKey::OneToOnes => self.one_to_ones,
            MetricKey::Tyfcb => self.tyfcb.floor() as u64,
            MetricKey::Ceu => self.ceu,
            MetricKey::Inductions => self.inductions,
            MetricKey::LateOnTime => self.late_on_time,
            MetricKey::LateMild => self.late_mild,
            MetricKey::LateSignificant => self.late_significant,
        }
    }

    // None for the currency amount, which is not a count.
    fn count_mut(&mut self, key: MetricKey) -> Option<&mut u64> {
        let c = match key {
            MetricKey::Present => &mut self.present,
            MetricKey::Absent => &mut self.absent,
            MetricKey::Late => &mut self.late,
            MetricKey::Medical => &mut self.medical,
            MetricKey::Substitute => &mut self.substitute,
            MetricKey::ReferralGivenInside => &mut self.referrals_given_inside,
            MetricKey::ReferralGivenOutside => &mut self.referrals_given_outside,
            MetricKey::ReferralReceivedInside => &mut self.referrals_received_inside,
            MetricKey::ReferralReceivedOutside => &mut self.referrals_received_outside,
            MetricKey::Visitors => &mut self.visitors,
            MetricKey::OneToOnes => &mut self.one_to_ones,
            MetricKey::Tyfcb => return None,
            MetricKey::Ceu => &mut self.ceu,
            MetricKey::Inductions => &mut self.inductions,
            MetricKey::LateOnTime => &mut self.late_on_time,
            MetricKey::LateMild => &mut self.late_mild,
            MetricKey::LateSignificant => &mut self.late_significant,
        };
        Some(c)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Member {
    /// The full name, used to match the rows of a report.
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub counters: MemberCounters,
}

impl Member {
    pub fn new(name: &str) -> Member {
        Member {
            name: collapse_whitespace(name),
            first_name: None,
            last_name: None,
            counters: MemberCounters::default(),
        }
    }

    pub fn from_parts(first_name: &str, last_name: &str) -> Member {
        let first = first_name.trim();
        let last = last_name.trim();
        let name: Vec<&str> = [first, last].into_iter().filter(|s| !s.is_empty()).collect();
        Member {
            name: collapse_whitespace(&name.join(" ")),
            first_name: Some(first.to_string()).filter(|s| !s.is_empty()),
            last_name: Some(last.to_string()).filter(|s| !s.is_empty()),
            counters: MemberCounters::default(),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Team {
    pub key: String,
    pub name: String,
    pub captain: String,
    /// Display color, not used for scoring.
    pub color: Option<String>,
    pub members: Vec<Member>,
}

/// The position of a member inside a roster.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct MemberRef {
    pub team_index: usize,
    pub member_index: usize,
}

/// A member with late arrivals on record.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Latecomer {
    pub member: String,
    pub team_key: String,
    pub late: u64,
}

/// All the teams of a competition, in a fixed order.
///
/// The version is bumped every time a mutation is published.
#[derive(PartialEq, Debug, Clone)]
pub struct Roster {
    teams: Vec<Team>,
    version: u64,
}

impl Roster {
    /// Assembles a roster from teams that already carry counters, for example
    /// when restoring a snapshot.
    ///
    /// Team keys and member names must be unique.
    pub fn from_parts(teams: Vec<Team>, version: u64) -> Result<Roster, ScoringErrors> {
        let mut team_keys: HashSet<String> = HashSet::new();
        let mut member_names: HashSet<String> = HashSet::new();
        for t in teams.iter() {
            if !team_keys.insert(t.key.clone()) {
                return Err(ScoringErrors::DuplicateTeam(t.key.clone()));
            }
            for m in t.members.iter() {
                if m.name.trim().is_empty() {
                    return Err(ScoringErrors::EmptyMemberName);
                }
                if !member_names.insert(name_key(&m.name)) {
                    return Err(ScoringErrors::DuplicateMember(m.name.clone()));
                }
            }
        }
        debug!(
            "Roster::from_parts: {} teams, {} members, version {}",
            teams.len(),
            member_names.len(),
            version
        );
        Ok(Roster { teams, version })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, key: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.key == key)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn member(&self, r: MemberRef) -> Option<&Member> {
        self.teams
            .get(r.team_index)
            .and_then(|t| t.members.get(r.member_index))
    }

    pub(crate) fn member_mut(&mut self, r: MemberRef) -> Option<&mut Member> {
        self.teams
            .get_mut(r.team_index)
            .and_then(|t| t.members.get_mut(r.member_index))
    }

    pub(crate) fn bump_version(&mut self) {
        self.version = self.version.saturating_add(1);
    }

    /// Finds a member by name, ignoring case and repeated whitespace.
    /// Teams are searched in order.
    pub fn find_member(&self, name: &str) -> Option<MemberRef> {
        let wanted = name_key(name);
        if wanted.is_empty() {
            return None;
        }
        for (team_index, t) in self.teams.iter().enumerate() {
            for (member_index, m) in t.members.iter().enumerate() {
                if name_key(&m.name) == wanted {
                    return Some(MemberRef {
                        team_index,
                        member_index,
                    });
                }
            }
        }
        None
    }

    /// Records one late arrival for the given member and returns the new
    /// late count.
    pub fn record_late(&mut self, name: &str) -> Result<u64, ScoringErrors> {
        if name.trim().is_empty() {
            return Err(ScoringErrors::EmptyMemberName);
        }
        let r = self
            .find_member(name)
            .ok_or_else(|| ScoringErrors::UnknownMember(name.trim().to_string()))?;
        let m = self
            .member_mut(r)
            .ok_or_else(|| ScoringErrors::UnknownMember(name.trim().to_string()))?;
        m.counters.add(MetricKey::Late, 1.0);
        let late = m.counters.late;
        info!("record_late: {} is now late {} time(s)", m.name, late);
        self.bump_version();
        Ok(late)
    }

    /// The members with at least one late arrival, in roster order.
    pub fn latecomers(&self) -> Vec<Latecomer> {
        let mut res: Vec<Latecomer> = Vec::new();
        for t in self.teams.iter() {
            for m in t.members.iter() {
                if m.counters.late > 0 {
                    res.push(Latecomer {
                        member: m.name.clone(),
                        team_key: t.key.clone(),
                        late: m.counters.late,
                    });
                }
            }
        }
        res
    }

    /// Resets the counters of every member. The teams and members stay.
    pub fn clear_counters(&mut self) {
        for t in self.teams.iter_mut() {
            for m in t.members.iter_mut() {
                m.counters.clear();
            }
        }
        info!("clear_counters: all counters reset");
        self.bump_version();
    }
}

/// The form of a name used for comparisons.
pub(crate) fn name_key(name: &str) -> String {
    collapse_whitespace(name).to_lowercase()
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<&str>>().join(" ")
}
