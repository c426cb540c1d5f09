pub use crate::config::*;
use crate::roster::{Member, Roster, Team};

/// A builder for setting up the teams of a competition.
///
/// Teams are kept in the order in which they are declared. This order is
/// also the tie-break order of the leaderboards.
///
/// ```
/// pub use palms_scoring::builder::RosterBuilder;
/// # use palms_scoring::ScoringErrors;
///
/// let mut builder = RosterBuilder::new()
///     .team("teamA", "Team A", "Sajid Hasan", Some("#dc2626"))?
///     .team("teamB", "Team B", "Vijay Gupta", None)?;
///
/// builder.add_member("teamA", "Sajid Hasan")?;
/// builder.add_member_parts("teamB", "Vijay", "Gupta")?;
///
/// let roster = builder.build()?;
/// assert_eq!(roster.teams().len(), 2);
///
/// # Ok::<(), ScoringErrors>(())
/// ```
pub struct RosterBuilder {
    pub(crate) _teams: Vec<Team>,
}

impl RosterBuilder {
    pub fn new() -> RosterBuilder {
        RosterBuilder { _teams: Vec::new() }
    }

    /// Declares a new team, without members.
    pub fn team(
        self,
        key: &str,
        name: &str,
        captain: &str,
        color: Option<&str>,
    ) -> Result<RosterBuilder, ScoringErrors> {
        if self._teams.iter().any(|t| t.key == key) {
            return Err(ScoringErrors::DuplicateTeam(key.to_string()));
        }
        let mut teams = self._teams;
        teams.push(Team {
            key: key.to_string(),
            name: name.to_string(),
            captain: captain.trim().to_string(),
            color: color.map(|c| c.to_string()),
            members: Vec::new(),
        });
        Ok(RosterBuilder { _teams: teams })
    }

    /// Adds a member with a full name to a declared team.
    pub fn add_member(&mut self, team_key: &str, name: &str) -> Result<(), ScoringErrors> {
        self.add_member_entry(team_key, Member::new(name))
    }

    /// Adds a member whose first and last names are known separately.
    pub fn add_member_parts(
        &mut self,
        team_key: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), ScoringErrors> {
        self.add_member_entry(team_key, Member::from_parts(first_name, last_name))
    }

    /// Adds a member as is, counters included.
    pub fn add_member_entry(
        &mut self,
        team_key: &str,
        member: Member,
    ) -> Result<(), ScoringErrors> {
        if member.name.is_empty() {
            return Err(ScoringErrors::EmptyMemberName);
        }
        let team = self
            ._teams
            .iter_mut()
            .find(|t| t.key == team_key)
            .ok_or_else(|| ScoringErrors::UnknownTeam(team_key.to_string()))?;
        team.members.push(member);
        Ok(())
    }

    /// Checks that the member names are unique across all the teams and
    /// returns a fresh roster with all the counters at zero.
    pub fn build(self) -> Result<Roster, ScoringErrors> {
        Roster::from_parts(self._teams, 0)
    }
}

impl Default for RosterBuilder {
    fn default() -> Self {
        RosterBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_unique_across_teams() {
        let mut b = RosterBuilder::new()
            .team("a", "A", "Ann Lee", None)
            .unwrap()
            .team("b", "B", "Bo Kim", None)
            .unwrap();
        b.add_member("a", "Ann Lee").unwrap();
        b.add_member("b", "ANN LEE").unwrap();
        assert_eq!(
            b.build(),
            Err(ScoringErrors::DuplicateMember("ANN LEE".to_string()))
        );
    }

    #[test]
    fn unknown_team_and_empty_names() {
        let mut b = RosterBuilder::new().team("a", "A", "Ann Lee", None).unwrap();
        assert_eq!(
            b.add_member("z", "Ann Lee"),
            Err(ScoringErrors::UnknownTeam("z".to_string()))
        );
        assert_eq!(b.add_member("a", "  "), Err(ScoringErrors::EmptyMemberName));
        assert!(matches!(
            RosterBuilder::new()
                .team("a", "A", "x", None)
                .unwrap()
                .team("a", "A2", "y", None),
            Err(ScoringErrors::DuplicateTeam(_))
        ));
    }

    #[test]
    fn member_entries_keep_their_counters() {
        let mut b = RosterBuilder::new().team("a", "A", "Ann Lee", None).unwrap();
        let mut ann = Member::new("Ann Lee");
        ann.counters.add(MetricKey::Visitors, 3.0);
        b.add_member_entry("a", ann).unwrap();
        let roster = b.build().unwrap();
        let r = roster.find_member("ann lee").unwrap();
        assert_eq!(roster.member(r).unwrap().counters.visitors, 3);
        let mut b = RosterBuilder::new().team("a", "A", "Ann Lee", None).unwrap();
        assert_eq!(
            b.add_member_entry("b", Member::new("Bo Kim")),
            Err(ScoringErrors::UnknownTeam("b".to_string()))
        );
    }
}
