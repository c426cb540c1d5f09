use log::{debug, info};

use crate::config::*;
use crate::roster::{MemberCounters, Roster, Team};
use crate::scoring::{count, raw_count, score_member, total};

/// The raw counters of all the members of a team, summed.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct TeamTotals {
    pub counters: MemberCounters,
}

impl TeamTotals {
    /// The team-wide value that a bonus requirement is checked against.
    pub fn metric(&self, m: TeamMetric) -> f64 {
        let c = &self.counters;
        match m {
            TeamMetric::Present => c.present as f64,
            TeamMetric::OneToOnes => c.one_to_ones as f64,
            TeamMetric::ReferralsGivenInside => c.referrals_given_inside as f64,
            TeamMetric::ReferralsGivenOutside => c.referrals_given_outside as f64,
            TeamMetric::ReferralsGiven => {
                count(&[c.referrals_given_inside, c.referrals_given_outside]) as f64
            }
            TeamMetric::Visitors => c.visitors as f64,
            TeamMetric::Inductions => c.inductions as f64,
            TeamMetric::TyfcbAmount => c.tyfcb,
            TeamMetric::Ceu => c.ceu as f64,
        }
    }
}

pub fn team_totals(team: &Team) -> TeamTotals {
    let mut t = MemberCounters::default();
    for m in team.members.iter() {
        t.merge(&m.counters);
    }
    TeamTotals { counters: t }
}

/// The bonus rules met by a team. Each rule counts once, whatever the
/// number of members.
pub fn achieved_bonuses<'a>(totals: &TeamTotals, rules: &'a [BonusRule]) -> Vec<&'a BonusRule> {
    rules
        .iter()
        .filter(|r| {
            !r.requirements.is_empty()
                && r
                    .requirements
                    .iter()
                    .all(|req| totals.metric(req.metric) >= req.at_least)
        })
        .collect()
}

pub fn score_team(team: &Team, rules: &CompetitionRules) -> TeamScore {
    let member_points: Vec<i64> = team
        .members
        .iter()
        .map(|m| score_member(&m.counters, &rules.weights).total)
        .collect();
    let individual_points = total(&member_points);
    let totals = team_totals(team);
    let bonuses = achieved_bonuses(&totals, &rules.bonus_rules);
    let bonus_points = bonuses
        .iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.points));
    debug!(
        "score_team: {}: individual {} bonuses {:?}",
        team.key, individual_points, bonuses
    );
    let c = &totals.counters;
    TeamScore {
        team_key: team.key.clone(),
        name: team.name.clone(),
        captain: team.captain.clone(),
        color: team.color.clone(),
        individual_points,
        bonus_points,
        total_score: individual_points.saturating_add(bonus_points),
        bonuses: bonuses.iter().map(|r| r.label.clone()).collect(),
        stats: TeamStats {
            total_present: c.present,
            total_referrals_given: count(&[
                c.referrals_given_inside,
                c.referrals_given_outside,
            ]),
            total_visitors: c.visitors,
            total_one_to_ones: c.one_to_ones,
            total_tyfcb: c.tyfcb,
        },
    }
}

/// All the teams, best score first. Teams with the same score keep the
/// roster order.
pub fn team_leaderboard(roster: &Roster, rules: &CompetitionRules) -> Vec<TeamScore> {
    let mut res: Vec<TeamScore> = roster
        .teams()
        .iter()
        .map(|t| score_team(t, rules))
        .collect();
    res.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    for (idx, ts) in res.iter().enumerate() {
        info!(
            "team_leaderboard: {}. {} ({}) {} = {} + {} bonus",
            idx + 1,
            ts.name,
            ts.team_key,
            ts.total_score,
            ts.individual_points,
            ts.bonus_points
        );
    }
    res
}

/// All the members, ranked by their points in one category. Members with
/// the same points keep the roster order. If `top` is provided, only the
/// first `top` entries are returned.
pub fn individual_leaderboard(
    roster: &Roster,
    category: Category,
    weights: &ScoringWeights,
    top: Option<usize>,
) -> Vec<IndividualScore> {
    let mut res: Vec<IndividualScore> = Vec::new();
    for t in roster.teams().iter() {
        for m in t.members.iter() {
            let s = score_member(&m.counters, weights);
            res.push(IndividualScore {
                member: m.name.clone(),
                team: t.name.clone(),
                color: t.color.clone(),
                category,
                points: s.points(category),
                raw_count: raw_count(&m.counters, category),
                total: s.total,
            });
        }
    }
    res.sort_by(|a, b| b.points.cmp(&a.points));
    if let Some(n) = top {
        res.truncate(n);
    }
    debug!(
        "individual_leaderboard: category {} -> {} entries",
        category.name(),
        res.len()
    );
    res
}
